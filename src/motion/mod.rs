//! Motion module for slider-motion.
//!
//! Provides the integer profile kinematics, the interrupt-driven step
//! generator and its shared, interrupt-safe wrapper.

mod engine;
pub mod profile;
mod shared;

pub use engine::{MotionEngine, MotionOutcome, MotionSnapshot};
pub use profile::{Direction, MotionPhase};
pub use shared::{MotionControl, SharedMotion};
