//! Slider states and status snapshot.

use crate::error::FaultCode;

/// Externally visible state of the slider.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum SliderState {
    /// Ready for a home or move request.
    #[default]
    Idle,
    /// Executing a requested move.
    Moving,
    /// Executing a homing pass.
    Homing,
    /// Faulted. Only re-initialisation leaves this state.
    Error,
}

impl SliderState {
    /// Get the state name as a static string.
    pub const fn name(self) -> &'static str {
        match self {
            SliderState::Idle => "IDLE",
            SliderState::Moving => "MOVING",
            SliderState::Homing => "HOMING",
            SliderState::Error => "ERROR",
        }
    }

    /// Whether the engine is expected to be running in this state.
    #[inline]
    pub const fn is_in_motion(self) -> bool {
        matches!(self, SliderState::Moving | SliderState::Homing)
    }
}

/// Consistent snapshot returned by [`Slider::status`](super::Slider::status).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SliderStatus {
    /// Current state.
    pub state: SliderState,
    /// Last device fault, `FaultCode::None` if there is none.
    pub error_code: FaultCode,
    /// Live engine position in steps.
    pub position: i32,
    /// A homing pass has completed since the last re-initialisation.
    pub homed: bool,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_state_names() {
        assert_eq!(SliderState::Idle.name(), "IDLE");
        assert_eq!(SliderState::Error.name(), "ERROR");
    }

    #[test]
    fn test_in_motion() {
        assert!(SliderState::Moving.is_in_motion());
        assert!(SliderState::Homing.is_in_motion());
        assert!(!SliderState::Idle.is_in_motion());
        assert!(!SliderState::Error.is_in_motion());
    }
}
