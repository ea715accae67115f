//! # Unified Configuration System
//!
//! This module consolidates the configuration structures of the engine into a
//! single, coherent system. Every value here is read once at startup and is
//! immutable for the lifetime of a level: changing a chunk size requires
//! building a new level.
//!
//! ## Configuration Categories
//!
//! - **Engine Config**: logging and debug features
//! - **Collision Config**: collision grid chunk size and rect scaling policy
//! - **Clickable Config**: chunk size of the independent clickable grid
//! - **Application Config**: top-level container loaded from TOML or RON

use serde::{Serialize, Deserialize};

use crate::foundation::math::Vec2;
use crate::physics::collision::RectScaling;

// Re-export from the old config module for compatibility
pub use crate::config::{Config, ConfigError};

/// Default collision grid cell size in world units
pub const DEFAULT_COLLISION_CHUNK_SIZE: f32 = 256.0;

/// Default clickable grid cell size in world units
pub const DEFAULT_CLICKABLE_CHUNK_SIZE: f32 = 128.0;

fn validate_chunk_size(name: &str, size: Vec2) -> Result<(), ConfigError> {
    if !(size.x.is_finite() && size.y.is_finite()) {
        return Err(ConfigError::Invalid(format!("{name} chunk size must be finite")));
    }
    if size.x <= 0.0 || size.y <= 0.0 {
        return Err(ConfigError::Invalid(format!(
            "{name} chunk size must be positive, got ({}, {})",
            size.x, size.y
        )));
    }
    Ok(())
}

/// # Engine Configuration
///
/// Core engine behavior configuration including logging and debug features.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Log level for the engine, used when `RUST_LOG` is unset
    pub log_level: String,
    /// Whether to enable debug features (grid dumps)
    pub debug_mode: bool,
}

impl EngineConfig {
    /// Create a new engine configuration
    pub fn new() -> Self {
        Self {
            log_level: "info".to_string(),
            debug_mode: cfg!(debug_assertions),
        }
    }

    /// Set log level
    pub fn with_log_level(mut self, level: impl Into<String>) -> Self {
        self.log_level = level.into();
        self
    }

    /// Enable debug mode
    pub fn with_debug(mut self, enabled: bool) -> Self {
        self.debug_mode = enabled;
        self
    }
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Collision Configuration
///
/// Parameters of the collision broad-phase grid.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CollisionConfig {
    /// World-space size of one grid chunk
    pub chunk_size: Vec2,
    /// How rectangle shapes apply world scale to their extent
    pub rect_scaling: RectScaling,
}

impl CollisionConfig {
    /// Create a collision configuration with the default chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: Vec2::new(DEFAULT_COLLISION_CHUNK_SIZE, DEFAULT_COLLISION_CHUNK_SIZE),
            rect_scaling: RectScaling::default(),
        }
    }

    /// Set chunk size
    pub fn with_chunk_size(mut self, chunk_size: Vec2) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Set rect scaling policy
    pub fn with_rect_scaling(mut self, rect_scaling: RectScaling) -> Self {
        self.rect_scaling = rect_scaling;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_chunk_size("collision", self.chunk_size)
    }
}

impl Default for CollisionConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Clickable Configuration
///
/// The clickable grid shares the collision grid's design but keeps its own
/// cell size.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ClickableConfig {
    /// World-space size of one grid chunk
    pub chunk_size: Vec2,
}

impl ClickableConfig {
    /// Create a clickable configuration with the default chunk size
    pub fn new() -> Self {
        Self {
            chunk_size: Vec2::new(DEFAULT_CLICKABLE_CHUNK_SIZE, DEFAULT_CLICKABLE_CHUNK_SIZE),
        }
    }

    /// Set chunk size
    pub fn with_chunk_size(mut self, chunk_size: Vec2) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        validate_chunk_size("clickable", self.chunk_size)
    }
}

impl Default for ClickableConfig {
    fn default() -> Self {
        Self::new()
    }
}

/// # Complete Application Configuration
///
/// Top-level configuration that encompasses all engine subsystems.
/// This is the main configuration structure applications should use.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ApplicationConfig {
    /// Engine core configuration
    pub engine: EngineConfig,
    /// Collision grid configuration
    pub collision: CollisionConfig,
    /// Clickable grid configuration
    pub clickable: ClickableConfig,
}

impl ApplicationConfig {
    /// Create a new application configuration with defaults
    pub fn new() -> Self {
        Self::default()
    }

    /// Validate the entire configuration
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.collision.validate()?;
        self.clickable.validate()?;
        Ok(())
    }
}

impl Config for ApplicationConfig {}
