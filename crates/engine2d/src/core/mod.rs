//! # Core Engine Module
//!
//! This module contains the core engine functionality and shared abstractions
//! that are used throughout the engine. It provides the foundational components
//! that other subsystems depend on.
//!
//! ## Organization
//!
//! - **Config**: Unified configuration system for all engine subsystems
//! - **Foundation**: Low-level utilities (math, collections, logging)

pub mod config;

// Re-export foundation modules for convenience
pub use crate::foundation;

// Re-export commonly used config types
pub use config::{
    ApplicationConfig,
    EngineConfig,
    CollisionConfig,
    ClickableConfig,
    Config,
    ConfigError,
};
