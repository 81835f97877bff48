//! Unified error types for the PlantCare firmware.
//!
//! A single `Error` enum that every pipeline stage converts into, so each
//! task loop can log and count failures the same way.  All variants are
//! `Copy`: they travel through event sinks and statistics without
//! allocation.
//!
//! Runtime errors (transport, parse, contention, sensor) are absorbed by the
//! task that hit them.  Only `Init` and `Config` are fatal, and only at
//! startup.

use core::fmt;

// ---------------------------------------------------------------------------
// Top-level firmware error
// ---------------------------------------------------------------------------

/// Every fallible operation in the firmware funnels into this type.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The serial link to the co-processor failed or went silent.
    Transport(TransportError),
    /// A response line was received but could not be accepted.
    Parse(ParseError),
    /// A bounded lock or resource wait expired.
    Contention(Resource),
    /// A local sensor conversion failed.
    Sensor(SensorError),
    /// An actuator output could not be driven.
    Actuator(ActuatorError),
    /// Peripheral initialisation failed.
    Init(&'static str),
    /// Configuration is invalid.
    Config(&'static str),
}

impl Error {
    /// Fatal errors halt startup; everything else is a skipped cycle.
    pub const fn is_fatal(&self) -> bool {
        matches!(self, Self::Init(_) | Self::Config(_))
    }
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transport(e) => write!(f, "transport: {e}"),
            Self::Parse(e) => write!(f, "parse: {e}"),
            Self::Contention(r) => write!(f, "contention: {r} busy"),
            Self::Sensor(e) => write!(f, "sensor: {e}"),
            Self::Actuator(e) => write!(f, "actuator: {e}"),
            Self::Init(msg) => write!(f, "init: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl std::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransportError {
    /// The underlying UART write returned an error.
    WriteFailed,
    /// The UART accepted fewer bytes than the line length.
    WriteStalled,
    /// No framed response arrived before the request deadline.
    ResponseTimeout,
    /// An outbound line could not be encoded.
    EncodeFailed,
}

impl fmt::Display for TransportError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed => write!(f, "write failed"),
            Self::WriteStalled => write!(f, "short write"),
            Self::ResponseTimeout => write!(f, "response timeout"),
            Self::EncodeFailed => write!(f, "encode failed"),
        }
    }
}

impl From<TransportError> for Error {
    fn from(e: TransportError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Parse / validation errors
// ---------------------------------------------------------------------------

/// Which numeric field of a remote reading a parse error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Field {
    Temperature,
    Humidity,
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Temperature => write!(f, "temperature"),
            Self::Humidity => write!(f, "humidity"),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseError {
    /// Neither accepted key for the field appears in the line.
    MissingKey(Field),
    /// The key was found but no decimal number follows it.
    MalformedNumber(Field),
    /// The number parsed but is physically implausible.
    OutOfRange(Field),
}

impl ParseError {
    pub const fn field(&self) -> Field {
        match self {
            Self::MissingKey(f) | Self::MalformedNumber(f) | Self::OutOfRange(f) => *f,
        }
    }
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::MissingKey(field) => write!(f, "{field} key missing"),
            Self::MalformedNumber(field) => write!(f, "{field} value malformed"),
            Self::OutOfRange(field) => write!(f, "{field} out of range"),
        }
    }
}

impl From<ParseError> for Error {
    fn from(e: ParseError) -> Self {
        Self::Parse(e)
    }
}

// ---------------------------------------------------------------------------
// Contended resources
// ---------------------------------------------------------------------------

/// Shared resources guarded by a bounded-wait lock.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Resource {
    /// Transmit side of the co-processor UART.
    SerialLink,
    /// The shared sensor record.
    SensorStore,
    /// The single ADC unit.
    AdcUnit,
}

impl fmt::Display for Resource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::SerialLink => write!(f, "serial link"),
            Self::SensorStore => write!(f, "sensor store"),
            Self::AdcUnit => write!(f, "ADC unit"),
        }
    }
}

// ---------------------------------------------------------------------------
// Sensor errors
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SensorError {
    /// The ADC driver refused to start a conversion.
    StartFailed,
    /// The conversion did not complete before its deadline.
    ConversionTimeout,
}

impl fmt::Display for SensorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::StartFailed => write!(f, "ADC start failed"),
            Self::ConversionTimeout => write!(f, "ADC conversion timed out"),
        }
    }
}

impl From<SensorError> for Error {
    fn from(e: SensorError) -> Self {
        Self::Sensor(e)
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

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn only_startup_errors_are_fatal() {
        assert!(Error::Init("adc").is_fatal());
        assert!(Error::Config("thresholds").is_fatal());
        assert!(!Error::Contention(Resource::SensorStore).is_fatal());
        assert!(!Error::from(TransportError::ResponseTimeout).is_fatal());
        assert!(!Error::from(ParseError::OutOfRange(Field::Humidity)).is_fatal());
    }

    #[test]
    fn display_names_the_field() {
        let e = Error::from(ParseError::MissingKey(Field::Temperature));
        assert_eq!(e.to_string(), "parse: temperature key missing");
        assert_eq!(
            Error::Contention(Resource::AdcUnit).to_string(),
            "contention: ADC unit busy"
        );
    }
}
