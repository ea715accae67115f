//! Input management system
//!
//! Hit testing of clickable components against world-space points.

pub mod clickable;

pub use clickable::{ClickableComponent, ClickableWorld};
