//! Error types for slider-motion.
//!
//! Provides unified error handling across configuration, hardware actuation,
//! motion start-up and slider requests.

use core::fmt;

/// Result type alias using the library's Error type.
pub type Result<T> = core::result::Result<T, Error>;

/// Unified error type for all slider-motion operations.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Error {
    /// Configuration parsing or validation error
    Config(ConfigError),
    /// Hardware actuation error
    Motor(MotorError),
    /// Motion engine rejected a command
    Motion(MotionError),
    /// Slider request rejected synchronously
    Request(RequestError),
}

/// Configuration-related errors.
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum ConfigError {
    /// Failed to parse TOML configuration
    ParseError(heapless::String<128>),
    /// Speed range is empty or starts at zero
    InvalidSpeedRange {
        /// Configured minimum speed
        min: u32,
        /// Configured maximum speed
        max: u32,
    },
    /// Acceleration must be > 0
    InvalidAcceleration(u32),
    /// Timer clock cannot produce an interval of at least one tick at max speed
    InvalidTimerClock {
        /// Timer clock in Hz
        clock_hz: u32,
        /// Maximum speed in steps/sec
        max_speed: u32,
    },
    /// Homing speed outside the motion speed range
    InvalidHomingSpeed(u32),
    /// Homing distance must be in 1..=i32::MAX
    InvalidHomingDistance(u32),
    /// Coordinator timeouts must be > 0
    InvalidTimeout(u32),
    /// File I/O error (std only)
    #[cfg(feature = "std")]
    IoError(heapless::String<128>),
}

/// Hardware actuation errors.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotorError {
    /// Pin operation failed
    PinError,
}

/// Motion engine command errors. None of them change engine state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum MotionError {
    /// A move is already in flight
    AlreadyRunning,
    /// A move of zero steps was requested
    ZeroSteps,
}

/// Synchronous rejections returned by the slider request façade.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum RequestError {
    /// The slider is not idle
    Busy,
    /// The slider has not been homed. Reserved; no request raises it yet.
    NotHomed,
    /// Zero steps or zero speed
    InvalidParam,
}

/// Device-level fault surfaced through the slider status.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum FaultCode {
    /// No fault
    #[default]
    None,
    /// Homing did not find the endstop
    EndstopNotFound,
    /// A hard travel limit was hit
    LimitReached,
    /// A move did not finish in time
    MoveTimeout,
}

impl FaultCode {
    /// Numeric code reported on the status line.
    pub const fn code(self) -> u8 {
        match self {
            FaultCode::None => 0,
            FaultCode::EndstopNotFound => 10,
            FaultCode::LimitReached => 20,
            FaultCode::MoveTimeout => 21,
        }
    }

    /// Look a fault up by its numeric code.
    pub const fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(FaultCode::None),
            10 => Some(FaultCode::EndstopNotFound),
            20 => Some(FaultCode::LimitReached),
            21 => Some(FaultCode::MoveTimeout),
            _ => None,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Error::Config(e) => write!(f, "Configuration error: {}", e),
            Error::Motor(e) => write!(f, "Motor error: {}", e),
            Error::Motion(e) => write!(f, "Motion error: {}", e),
            Error::Request(e) => write!(f, "Request error: {}", e),
        }
    }
}

impl fmt::Display for ConfigError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigError::ParseError(msg) => write!(f, "Parse error: {}", msg),
            ConfigError::InvalidSpeedRange { min, max } => {
                write!(f, "Invalid speed range: min ({}) must be > 0 and <= max ({})", min, max)
            }
            ConfigError::InvalidAcceleration(v) => write!(f, "Invalid acceleration: {}. Must be > 0", v),
            ConfigError::InvalidTimerClock { clock_hz, max_speed } => {
                write!(f, "Timer clock {} Hz is too slow for {} steps/sec", clock_hz, max_speed)
            }
            ConfigError::InvalidHomingSpeed(v) => {
                write!(f, "Invalid homing speed: {}. Must be within the motion speed range", v)
            }
            ConfigError::InvalidHomingDistance(v) => write!(f, "Invalid homing distance: {}", v),
            ConfigError::InvalidTimeout(v) => write!(f, "Invalid timeout: {} ms. Must be > 0", v),
            #[cfg(feature = "std")]
            ConfigError::IoError(msg) => write!(f, "I/O error: {}", msg),
        }
    }
}

impl fmt::Display for MotorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotorError::PinError => write!(f, "GPIO pin operation failed"),
        }
    }
}

impl fmt::Display for MotionError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MotionError::AlreadyRunning => write!(f, "A move is already running"),
            MotionError::ZeroSteps => write!(f, "Move of zero steps"),
        }
    }
}

impl fmt::Display for RequestError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RequestError::Busy => write!(f, "Slider is busy"),
            RequestError::NotHomed => write!(f, "Slider is not homed"),
            RequestError::InvalidParam => write!(f, "Invalid parameter"),
        }
    }
}

impl fmt::Display for FaultCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            FaultCode::None => "NONE",
            FaultCode::EndstopNotFound => "ENDSTOP_NOT_FOUND",
            FaultCode::LimitReached => "LIMIT_REACHED",
            FaultCode::MoveTimeout => "MOVE_TIMEOUT",
        };
        f.write_str(name)
    }
}

// Conversion impls
impl From<ConfigError> for Error {
    fn from(e: ConfigError) -> Self {
        Error::Config(e)
    }
}

impl From<MotorError> for Error {
    fn from(e: MotorError) -> Self {
        Error::Motor(e)
    }
}

impl From<MotionError> for Error {
    fn from(e: MotionError) -> Self {
        Error::Motion(e)
    }
}

impl From<RequestError> for Error {
    fn from(e: RequestError) -> Self {
        Error::Request(e)
    }
}

#[cfg(feature = "std")]
impl std::error::Error for Error {}

#[cfg(feature = "std")]
impl std::error::Error for ConfigError {}

#[cfg(feature = "std")]
impl std::error::Error for MotorError {}

#[cfg(feature = "std")]
impl std::error::Error for MotionError {}

#[cfg(feature = "std")]
impl std::error::Error for RequestError {}
