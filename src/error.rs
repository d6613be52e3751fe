//! Unified error types for the PomoDesk firmware.
//!
//! A single `Error` enum that every subsystem converts into, keeping the
//! board bring-up path uniform.  All variants are `Copy` so they can be
//! passed through the control loop and logged without allocation.
//!
//! None of these are fatal at runtime: the service maps sensor and reader
//! failures onto safe readings ("absent", "no card") and drops failed
//! writes to the write-only outputs after logging them.

use core::fmt;

use embedded_hal::i2c::ErrorKind as I2cErrorKind;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// A sensor could not be read or returned implausible data.
    Sensor(SensorError),
    /// The contactless card reader did not produce an identifier.
    Reader(ReaderError),
    /// An actuator command failed.
    Actuator(ActuatorError),
    /// A transaction on the two-wire bus failed.
    Bus(I2cErrorKind),
    /// Configuration is invalid.
    Config(&'static str),
    /// Peripheral initialisation failed.
    Init(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Reader(e) => write!(f, "card reader: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Bus(kind) => write!(f, "i2c: {kind}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

impl From<I2cErrorKind> for Error {
    fn from(kind: I2cErrorKind) -> Self {
        Self::Bus(kind)
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The bus or GPIO read returned an error.
    ReadFailed,
    /// The sensor did not answer within its conversion window.
    NotResponding,
    /// Reading is outside the physically plausible range.
    OutOfRange,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::ReadFailed => write!(f, "read failed"),
            Self::NotResponding => write!(f, "not responding"),
            Self::OutOfRange => write!(f, "reading out of range"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
    }
}

// ---------------------------------------------------------------------------
// Card reader errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ReaderError {
    /// No card answered the request.
    NoCard,
    /// More than one card answered and anticollision failed.
    Collision,
    /// The identifier checksum did not match.
    Checksum,
    /// The reader chip did not respond.
    NotResponding,
}

impl fmt::Display for ReaderError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NoCard => write!(f, "no card in field"),
            Self::Collision => write!(f, "anticollision failed"),
            Self::Checksum => write!(f, "UID checksum mismatch"),
            Self::NotResponding => write!(f, "reader not responding"),
        }
    }
}

impl From<ReaderError> for Error {
    fn from(e: ReaderError) -> Self {
        Self::Reader(e)
    }
}

// ---------------------------------------------------------------------------
// Actuator errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ActuatorError {
    /// PWM duty-cycle write failed.
    PwmWriteFailed,
    /// GPIO set failed.
    GpioWriteFailed,
}

impl fmt::Display for ActuatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::PwmWriteFailed => write!(f, "PWM write failed"),
            Self::GpioWriteFailed => write!(f, "GPIO write failed"),
        }
    }
}

impl From<ActuatorError> for Error {
    fn from(e: ActuatorError) -> Self {
        Self::Actuator(e)
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias.
pub type Result<T> = core::result::Result<T, Error>;
