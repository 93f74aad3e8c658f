//! Outbound hardware actuation interface.
//!
//! STEP and DIR are plain `embedded_hal::digital::OutputPin`s and the minimum
//! STEP pulse width is held with an `embedded_hal::delay::DelayNs`. The only
//! piece embedded-hal does not cover is a one-channel timer whose period is
//! reprogrammed on every step, which [`StepTimer`] describes.

/// A periodic timer that raises the step interrupt.
///
/// Intervals are in timer input clock ticks. Implementations are expected to
/// restart counting from zero when the interval changes.
pub trait StepTimer {
    /// Program `interval_ticks` and start raising interrupts.
    fn start(&mut self, interval_ticks: u32);

    /// Reprogram the interval of a running timer for the next period.
    fn set_interval(&mut self, interval_ticks: u32);

    /// Stop raising interrupts.
    fn stop(&mut self);
}
