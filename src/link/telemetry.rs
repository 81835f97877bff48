//! Outbound local-sensor telemetry.
//!
//! After each sampling cycle the sampler task reports its readings to the
//! co-processor as one line:
//!
//! ```text
//! {"photo":1834,"water":57}\n
//! ```
//!
//! Telemetry shares the transmit lock with the protocol client.  A report
//! waits out an exchange in flight (up to its own bound, normally the
//! request timeout plus the lock wait) and is skipped only past that.

use serde::Serialize;

use embassy_time::Duration;

use super::protocol::SerialLink;
use crate::app::ports::Transport;
use crate::error::{Result, TransportError};
use crate::sensors::LocalReading;

/// Wire shape of one telemetry line.  Field order is the wire order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LocalTelemetry {
    pub photo: u16,
    pub water: u8,
}

impl From<&LocalReading> for LocalTelemetry {
    fn from(r: &LocalReading) -> Self {
        Self {
            photo: r.light_raw,
            water: r.water_pct,
        }
    }
}

impl LocalTelemetry {
    /// Encode as a newline-terminated JSON line.
    pub fn to_line(&self) -> Result<Vec<u8>> {
        let mut line = serde_json::to_vec(self).map_err(|_| TransportError::EncodeFailed)?;
        line.push(b'\n');
        Ok(line)
    }
}

pub struct TelemetryPublisher<'a, T> {
    link: &'a SerialLink<T>,
    wait: Duration,
}

impl<'a, T: Transport> TelemetryPublisher<'a, T> {
    /// `wait` bounds how long a report queues behind an exchange.
    pub fn new(link: &'a SerialLink<T>, wait: Duration) -> Self {
        Self { link, wait }
    }

    /// Send one report, or fail with `Contention` if the link stays busy
    /// for longer than `wait`.
    pub async fn publish(&self, reading: &LocalReading) -> Result<()> {
        let line = LocalTelemetry::from(reading).to_line()?;
        let mut tx = self.link.acquire_within(self.wait).await?;
        tx.send_line(&line)
    }
}
