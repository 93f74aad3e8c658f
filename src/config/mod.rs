//! Configuration module for slider-motion.
//!
//! Provides types for loading and validating the slider configuration
//! from TOML files (with `std` feature) or pre-built values.

mod coordinator;
mod homing;
#[cfg(feature = "std")]
mod loader;
mod motion;
mod system;
pub mod units;
mod validation;

pub use coordinator::CoordinatorConfig;
pub use homing::HomingConfig;
pub use motion::MotionConfig;
pub use system::SliderConfig;
pub use validation::validate_config;

#[cfg(feature = "std")]
pub use loader::{load_config, parse_config};

// Re-export unit types at config level
pub use units::{Hertz, StepsPerSec, StepsPerSecSquared};
