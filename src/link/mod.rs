//! Co-processor serial link.
//!
//! | Module      | Role                                             |
//! |-------------|--------------------------------------------------|
//! | `framer`    | byte stream → `RawMessage` lines (ISR side)      |
//! | `channels`  | bounded ISR → task line queue                    |
//! | `parse`     | response line → validated `RemoteReading`        |
//! | `protocol`  | `GET_DHT` request/response client, link lock     |
//! | `telemetry` | `{"photo":..,"water":..}` outbound reports       |

pub mod channels;
pub mod framer;
pub mod parse;
pub mod protocol;
pub mod telemetry;
