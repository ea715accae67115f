//! Integration tests for levels and their collision grids
