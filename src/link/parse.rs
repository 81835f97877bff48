//! Response-line scanner for the co-processor's DHT readings.
//!
//! Accepts lines such as `{"temp":25.5,"humidity":60.2}`.  This is not a
//! JSON parser: each field is located by a fixed quoted key, then a colon,
//! then a plain decimal number.  Key order, extra fields and surrounding
//! punctuation are ignored.

use core::ops::RangeInclusive;

use crate::error::{Field, ParseError};

/// Quoted keys accepted for each field, most specific first.
const TEMPERATURE_KEYS: [&[u8]; 2] = [b"\"temperature\"", b"\"temp\""];
const HUMIDITY_KEYS: [&[u8]; 2] = [b"\"humidity\"", b"\"hum\""];

/// Plausible DHT22 output, °C.
pub const TEMPERATURE_RANGE: RangeInclusive<f32> = -40.0..=80.0;
/// Relative humidity, %.
pub const HUMIDITY_RANGE: RangeInclusive<f32> = 0.0..=100.0;

/// Validated temperature/humidity pair from one response line.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RemoteReading {
    pub temperature_c: f32,
    pub humidity_pct: f32,
}

/// Extract and validate both fields.  Pure: no state, no allocation.
pub fn parse_remote_reading(line: &[u8]) -> Result<RemoteReading, ParseError> {
    let temperature_c = scan_field(line, &TEMPERATURE_KEYS, Field::Temperature, &TEMPERATURE_RANGE)?;
    let humidity_pct = scan_field(line, &HUMIDITY_KEYS, Field::Humidity, &HUMIDITY_RANGE)?;
    Ok(RemoteReading {
        temperature_c,
        humidity_pct,
    })
}

fn scan_field(
    line: &[u8],
    keys: &[&[u8]],
    field: Field,
    range: &RangeInclusive<f32>,
) -> Result<f32, ParseError> {
    let after_key = keys
        .iter()
        .find_map(|key| find(line, key).map(|at| at + key.len()))
        .ok_or(ParseError::MissingKey(field))?;

    let rest = skip_whitespace(&line[after_key..]);
    let rest = match rest.split_first() {
        Some((b':', tail)) => skip_whitespace(tail),
        _ => return Err(ParseError::MalformedNumber(field)),
    };

    let span = rest
        .iter()
        .position(|b| !is_number_byte(*b))
        .unwrap_or(rest.len());

    let value: f32 = core::str::from_utf8(&rest[..span])
        .ok()
        .and_then(|s| s.parse().ok())
        .ok_or(ParseError::MalformedNumber(field))?;

    if !range.contains(&value) {
        return Err(ParseError::OutOfRange(field));
    }
    Ok(value)
}

fn find(haystack: &[u8], needle: &[u8]) -> Option<usize> {
    haystack.windows(needle.len()).position(|w| w == needle)
}

fn skip_whitespace(bytes: &[u8]) -> &[u8] {
    let start = bytes
        .iter()
        .position(|b| !b.is_ascii_whitespace())
        .unwrap_or(bytes.len());
    &bytes[start..]
}

const fn is_number_byte(b: u8) -> bool {
    matches!(b, b'0'..=b'9' | b'+' | b'-' | b'.' | b'e' | b'E')
}
