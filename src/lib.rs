//! # Socket.IO / Engine.IO Wire Protocol Decoder
//!
//! This library decodes the socket.io/engine.io family of wire encodings
//! from raw byte streams into structured, typed packets usable by a server
//! runtime. It covers both protocol generations, the legacy colon-delimited
//! format and the later numeric-typed multiplexable framing format, and the
//! length-prefixed multi-frame mode used on stream transports.
//!
//! ## Features
//!
//! - Single forward-pass byte scanning with exact cursor accounting
//! - Legacy colon-format decoding (type, message id, endpoint, payload)
//! - Modern two-level typed decoding (outer kind, inner subtype,
//!   `namespace,ackId` header, JSON payload)
//! - Length-prefixed frame demultiplexing for multi-frame stream buffers
//! - Acknowledgment-id correlation against an external callback registry
//! - Pluggable JSON layer for payload deserialization
//!
//! ## Main Components
//!
//! - `Decoder`: The facade exposing the two decode entry points.
//! - `Packet`: The decoded unit handed to the runtime layer.
//! - `JsonSupport`: Seam for payload deserialization, with a
//!   `serde_json`-backed default.
//! - `AckRegistry`: Seam for acknowledgment-callback lookups.
//! - `DecoderConfig`: Decoder limits, loadable via serde.
//!
//! ## Getting Started
//!
//! To use this library, add it to your `Cargo.toml`:
//!
//! ```toml
//! [dependencies]
//! socketio_decoder = "0.1.0"
//! ```
//!
//! Then decode packets as they arrive on a connection:
//!
//! ```no_run
//! use bytes::Bytes;
//! use socketio_decoder::{Decoder, NoopAckRegistry, SerdeJsonSupport};
//! use uuid::Uuid;
//!
//! let decoder = Decoder::new(SerdeJsonSupport, NoopAckRegistry);
//! let session_id = Uuid::new_v4();
//!
//! // A single legacy-format packet in textual form.
//! let packet = decoder
//!     .decode_packet("5:::{\"name\":\"chat\",\"args\":[\"hi\"]}", session_id)
//!     .unwrap();
//! assert_eq!(packet.name.as_deref(), Some("chat"));
//!
//! // One packet out of a stream buffer; the cursor advances exactly past
//! // the consumed frame, so looping drains multi-frame buffers.
//! let mut buffer = Bytes::from_static(b"42[\"chat\",{\"msg\":\"hi\"}]");
//! let packet = decoder.decode_packets(&mut buffer, session_id).unwrap();
//! assert!(buffer.is_empty());
//! ```
//!
//! ## Concurrency
//!
//! The decoder is stateless and never blocks; one instance may be shared
//! across threads. A stream buffer, by contrast, carries a cursor and must
//! only be fed to one decode call at a time — one buffer per connection's
//! receive path.

mod ack;
mod config;
mod decoder;
mod error;
mod json;
mod models;
mod utils;

pub use ack::*;
pub use config::*;
pub use decoder::*;
pub use error::*;
pub use json::*;
pub use models::*;

#[cfg(test)]
#[path = "tests/test_decoder.rs"]
mod test_decoder;
