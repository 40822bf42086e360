//! Unified error types for the pulse oximeter firmware.
//!
//! A single `Error` enum that every subsystem can convert into. All
//! variants are `Copy` so they can be stored in the FSM context and
//! carried in application events without allocation.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A collaborator failed to initialise. Fatal.
    Setup(SetupFailure),
    /// The sensor stopped producing samples or the bus failed.
    Sensor(SensorError),
}

impl Error {
    /// What this error amounts to when raised while bringing up hardware.
    pub fn as_setup_failure(self) -> SetupFailure {
        match self {
            Self::Setup(f) => f,
            Self::Sensor(_) => SetupFailure::Sensor,
        }
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Setup(e) => write!(f, "setup: {e}"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
        }
    }
}

// ---------------------------------------------------------------------------
// Setup failures
// ---------------------------------------------------------------------------

/// Boot-time failures. Any of these parks the FSM in `Error` until restart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SetupFailure {
    /// PPG sensor missing, wrong part id, or configuration write failed.
    Sensor,
    /// Display controller did not acknowledge.
    Display,
    /// Compiled-in configuration failed validation.
    Config(&'static str),
}

impl fmt::Display for SetupFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor => write!(f, "sensor init failed"),
            Self::Display => write!(f, "display init failed"),
            Self::Config(msg) => write!(f, "invalid config: {msg}"),
        }
    }
}

impl From<SetupFailure> for Error {
    fn from(e: SetupFailure) -> Self {
        Self::Setup(e)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// No sample became available within the poll budget.
    Timeout,
    /// I2C transfer to the sensor failed.
    Bus,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Timeout => write!(f, "sample timeout"),
            Self::Bus => write!(f, "bus error"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
