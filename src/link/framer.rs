//! Line framer for the co-processor UART.
//!
//! Wire format: ASCII lines terminated by `\n` (a `\r` also ends a line, so
//! CRLF senders yield one message, not two).
//!
//! The framer accumulates bytes into a fixed buffer and yields a
//! [`RawMessage`] per complete line.  A line that outgrows the buffer is
//! cut at `LINE_CAPACITY - 1` bytes, delivered flagged `truncated`, and the
//! byte that overflowed it is discarded; framing resumes with the next
//! byte.  Nothing here inspects message content.

use heapless::Vec;

use super::channels::LineChannel;

/// Receive buffer size, including the slot a C-string terminator would use.
pub const LINE_CAPACITY: usize = 64;

/// Longest payload a single message can carry.
pub const MAX_LINE_LEN: usize = LINE_CAPACITY - 1;

/// One received line, without its terminator.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RawMessage {
    bytes: Vec<u8, MAX_LINE_LEN>,
    truncated: bool,
}

impl RawMessage {
    pub fn as_bytes(&self) -> &[u8] {
        &self.bytes
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// The sender's line was longer than the buffer.
    pub fn is_truncated(&self) -> bool {
        self.truncated
    }
}

/// Streaming byte → line framer.  Never allocates, never blocks.
#[derive(Debug, Default)]
pub struct LineFramer {
    buf: Vec<u8, MAX_LINE_LEN>,
}

impl LineFramer {
    pub const fn new() -> Self {
        Self { buf: Vec::new() }
    }

    /// Feed one byte.  Returns a message when this byte completes one.
    pub fn push(&mut self, byte: u8) -> Option<RawMessage> {
        if is_terminator(byte) {
            if self.buf.is_empty() {
                return None;
            }
            return Some(self.take(false));
        }

        if self.buf.push(byte).is_err() {
            return Some(self.take(true));
        }
        None
    }

    /// Bytes buffered towards the next message.
    pub fn pending(&self) -> usize {
        self.buf.len()
    }

    /// Drop any partial line (e.g. after a UART FIFO overrun).
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    fn take(&mut self, truncated: bool) -> RawMessage {
        RawMessage {
            bytes: core::mem::take(&mut self.buf),
            truncated,
        }
    }
}

const fn is_terminator(byte: u8) -> bool {
    byte == b'\n' || byte == b'\r'
}

// ── Interrupt-side handoff ─────────────────────────────────────

/// Framer bound to the handoff channel, owned by the UART receive path.
///
/// Completed lines go out with `try_send`: when the protocol client has
/// not drained the queue, the newest line is dropped and counted.
pub struct RxFramer<'a> {
    framer: LineFramer,
    lines: &'a LineChannel,
    dropped: u32,
    truncated: u32,
}

impl<'a> RxFramer<'a> {
    pub const fn new(lines: &'a LineChannel) -> Self {
        Self {
            framer: LineFramer::new(),
            lines,
            dropped: 0,
            truncated: 0,
        }
    }

    /// Interrupt-safe: no blocking, no allocation.
    pub fn on_byte(&mut self, byte: u8) {
        let Some(msg) = self.framer.push(byte) else {
            return;
        };
        if msg.is_truncated() {
            self.truncated = self.truncated.wrapping_add(1);
        }
        if self.lines.try_send(msg).is_err() {
            self.dropped = self.dropped.wrapping_add(1);
        }
    }

    pub fn on_bytes(&mut self, bytes: &[u8]) {
        for &b in bytes {
            self.on_byte(b);
        }
    }

    /// Abandon a partial line after a receive error.
    pub fn resync(&mut self) {
        self.framer.reset();
    }

    /// Lines lost because the handoff queue was full.
    pub fn dropped_lines(&self) -> u32 {
        self.dropped
    }

    /// Lines delivered cut short.
    pub fn truncated_lines(&self) -> u32 {
        self.truncated
    }
}
