//! Slider module for slider-motion.
//!
//! Turns home/move/stop requests into motion engine commands and keeps the
//! externally visible state in sync with the engine.

mod coordinator;
mod state;

pub use coordinator::Slider;
pub use state::{SliderState, SliderStatus};
