//! Interrupt → task handoff for received lines.
//!
//! ```text
//! ┌──────────────┐  RawMessage  ┌─────────────────┐
//! │  UART RX ISR │─────────────▶│ Protocol client │
//! │  (RxFramer)  │  try_send    │ receive+timeout │
//! └──────────────┘              └─────────────────┘
//! ```
//!
//! Bounded `embassy-sync` channel: the producer never blocks, the consumer
//! waits with a deadline.

use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use super::framer::RawMessage;

/// Lines buffered between the receive path and the protocol client.
pub const LINE_QUEUE_DEPTH: usize = 4;

pub type LineChannel = Channel<CriticalSectionRawMutex, RawMessage, LINE_QUEUE_DEPTH>;

/// Device-wide receive queue for the co-processor link.
pub static LINK_LINES: LineChannel = Channel::new();
