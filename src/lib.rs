//! # slider-motion
//!
//! Interrupt-driven trapezoidal step generation and slider coordination for a
//! single stepper axis.
//!
//! ## Features
//!
//! - **Integer trapezoidal profiles**: accel/cruise/decel computed per step in
//!   the step timer interrupt, triangle profiles for short moves
//! - **embedded-hal 1.0**: `OutputPin` for STEP/DIR, `DelayNs` for the pulse width
//! - **Interrupt-safe sharing**: the engine lives behind a critical-section
//!   mutex and reports completion through an `embassy-sync` signal
//! - **Slider coordinator**: home/move/stop requests from any task, applied by
//!   one cooperative run loop, with a consistent status snapshot
//! - **no_std compatible**: core library works without standard library
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use slider_motion::{MotionEngine, SharedMotion, Slider, SliderConfig};
//!
//! let config = SliderConfig::default();
//! let engine = MotionEngine::new(step_pin, dir_pin, pulse_delay, step_timer, config.motion);
//! let motion = SharedMotion::new(engine);
//!
//! // step timer interrupt handler
//! motion.on_timer_interrupt();
//!
//! // slider task
//! let slider = Slider::new(&motion, config);
//! slider.init()?;
//! slider.request_home()?;
//! slider.run(&mut delay);
//! ```
//!
//! ## Feature Flags
//!
//! - `std` (default): Enables file I/O, TOML parsing and `log` output
//! - `log`: Log through the `log` facade
//! - `defmt`: Log through defmt and derive `defmt::Format` for public types

#![cfg_attr(not(feature = "std"), no_std)]
#![warn(missing_docs)]
#![warn(clippy::all)]
#![deny(unsafe_code)]

// This must go first so the macros are visible to every other module.
#[macro_use]
mod fmt;

// Core modules
pub mod config;
pub mod error;
pub mod hardware;
pub mod motion;
pub mod slider;

// Re-exports for ergonomic API
pub use config::{validate_config, SliderConfig};
pub use error::{Error, FaultCode, Result};
pub use hardware::StepTimer;
pub use motion::{Direction, MotionControl, MotionEngine, MotionOutcome, MotionPhase, SharedMotion};
pub use slider::{Slider, SliderState, SliderStatus};

// Configuration loading (std only)
#[cfg(feature = "std")]
pub use config::load_config;

// Unit types
pub use config::units::{Hertz, StepsPerSec, StepsPerSecSquared};
