//! Request/response client for the co-processor's DHT readings.
//!
//! One request outstanding at a time:
//!
//! ```text
//!   Idle ──send GET_DHT──▶ AwaitingResponse ──line──▶ Succeeded ─────┐
//!                               │  │    └──store busy──▶ StoreSkipped ─┤
//!                               │  └──bad line─────────▶ ParseFailed ──┤
//!                               └──deadline────────────▶ TimedOut ─────┼──▶ Idle
//!   (link busy / write error) ─────────────────────────▶ LinkFailed ───┘
//! ```
//!
//! The transmit side stays reserved from the request until the response
//! or the deadline, so no other line can be interleaved with an exchange.
//! A failed exchange writes nothing; the next period simply tries again.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::mutex::{Mutex, MutexGuard};
use embassy_time::{Duration, Ticker, with_timeout};
use log::debug;

use super::channels::LineChannel;
use super::parse::{RemoteReading, parse_remote_reading};
use crate::app::events::PipelineEvent;
use crate::app::ports::{EventSink, Transport};
use crate::error::{Error, Resource, Result, TransportError};
use crate::store::SensorStore;

/// Fixed request line understood by the co-processor.
pub const REQUEST_LINE: &[u8] = b"GET_DHT\n";

// ── Serial link ────────────────────────────────────────────────

/// Transmit side of the UART, guarded by a bounded-wait lock.
pub struct SerialLink<T> {
    tx: Mutex<CriticalSectionRawMutex, T>,
    lock_wait: Duration,
}

impl<T: Transport> SerialLink<T> {
    pub const fn new(transport: T, lock_wait: Duration) -> Self {
        Self {
            tx: Mutex::new(transport),
            lock_wait,
        }
    }

    /// Reserve the transmit side, or give up after `lock_wait`.
    pub async fn acquire(&self) -> Result<LinkGuard<'_, T>> {
        self.acquire_within(self.lock_wait).await
    }

    /// Reserve the transmit side, waiting at most `wait`.
    pub async fn acquire_within(&self, wait: Duration) -> Result<LinkGuard<'_, T>> {
        let tx = with_timeout(wait, self.tx.lock())
            .await
            .map_err(|_| Error::Contention(Resource::SerialLink))?;
        Ok(LinkGuard { tx })
    }
}

/// Exclusive use of the link; released on drop.
pub struct LinkGuard<'a, T: Transport> {
    tx: MutexGuard<'a, CriticalSectionRawMutex, T>,
}

impl<T: Transport> LinkGuard<'_, T> {
    /// Write one complete line (terminator included) and flush it.
    pub fn send_line(&mut self, line: &[u8]) -> Result<()> {
        let written = self.tx.write(line).map_err(|e| {
            debug!("link: write error {:?}", e);
            TransportError::WriteFailed
        })?;
        if written < line.len() {
            return Err(TransportError::WriteStalled.into());
        }
        self.tx.flush().map_err(|e| {
            debug!("link: flush error {:?}", e);
            TransportError::WriteFailed
        })?;
        Ok(())
    }
}

// ── Exchange state & statistics ────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExchangeState {
    Idle,
    AwaitingResponse,
    Succeeded,
    ParseFailed,
    TimedOut,
    LinkFailed,
    StoreSkipped,
}

/// Running counters, never reset.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ExchangeStats {
    pub attempts: u32,
    pub successes: u32,
    pub timeouts: u32,
    pub parse_failures: u32,
    /// Write errors or the link being held by another sender.
    pub link_failures: u32,
    /// Valid responses lost to store contention.
    pub store_skips: u32,
    /// Unsolicited lines discarded before a request.
    pub stale_discarded: u32,
}

impl ExchangeStats {
    fn record_failure(&mut self, err: Error) -> ExchangeState {
        match err {
            Error::Transport(TransportError::ResponseTimeout) => {
                self.timeouts += 1;
                ExchangeState::TimedOut
            }
            Error::Parse(_) => {
                self.parse_failures += 1;
                ExchangeState::ParseFailed
            }
            Error::Contention(Resource::SensorStore) => {
                self.store_skips += 1;
                ExchangeState::StoreSkipped
            }
            _ => {
                self.link_failures += 1;
                ExchangeState::LinkFailed
            }
        }
    }
}

// ── Protocol client ────────────────────────────────────────────

pub struct ProtocolClient<'a, T: Transport, E: EventSink> {
    link: &'a SerialLink<T>,
    lines: &'a LineChannel,
    store: &'a SensorStore,
    sink: E,
    request_timeout: Duration,
    state: ExchangeState,
    last_outcome: ExchangeState,
    stats: ExchangeStats,
}

impl<'a, T: Transport, E: EventSink> ProtocolClient<'a, T, E> {
    pub fn new(
        link: &'a SerialLink<T>,
        lines: &'a LineChannel,
        store: &'a SensorStore,
        sink: E,
        request_timeout: Duration,
    ) -> Self {
        Self {
            link,
            lines,
            store,
            sink,
            request_timeout,
            state: ExchangeState::Idle,
            last_outcome: ExchangeState::Idle,
            stats: ExchangeStats::default(),
        }
    }

    /// Run one request/response cycle.  The store is written only when
    /// the whole response validates.
    pub async fn exchange(&mut self) -> Result<RemoteReading> {
        self.stats.attempts += 1;
        let result = self.request_reading().await;

        match result {
            Ok(reading) => {
                self.stats.successes += 1;
                self.last_outcome = ExchangeState::Succeeded;
                self.sink.emit(&PipelineEvent::RemoteUpdated(reading));
            }
            Err(e) => {
                self.last_outcome = self.stats.record_failure(e);
                self.sink.emit(&PipelineEvent::ExchangeFailed(e));
            }
        }
        self.state = ExchangeState::Idle;
        result
    }

    async fn request_reading(&mut self) -> Result<RemoteReading> {
        let link = self.link;
        let mut tx = link.acquire().await?;

        self.discard_stale_lines();
        tx.send_line(REQUEST_LINE)?;
        self.state = ExchangeState::AwaitingResponse;

        let msg = with_timeout(self.request_timeout, self.lines.receive())
            .await
            .map_err(|_| TransportError::ResponseTimeout)?;
        drop(tx);

        if msg.is_truncated() {
            debug!("link: response truncated at {} bytes", msg.len());
        }
        let reading = parse_remote_reading(msg.as_bytes())?;
        self.store
            .update_remote_readings(reading.temperature_c, reading.humidity_pct)
            .await?;
        Ok(reading)
    }

    fn discard_stale_lines(&mut self) {
        while self.lines.try_receive().is_ok() {
            self.stats.stale_discarded += 1;
        }
    }

    /// Poll forever, one exchange per `period`.
    pub async fn run(&mut self, period: Duration) -> ! {
        let mut ticker = Ticker::every(period);
        loop {
            // Failures are already logged, counted and emitted.
            let _ = self.exchange().await;
            ticker.next().await;
        }
    }

    pub fn state(&self) -> ExchangeState {
        self.state
    }

    pub fn last_outcome(&self) -> ExchangeState {
        self.last_outcome
    }

    pub fn stats(&self) -> ExchangeStats {
        self.stats
    }
}
