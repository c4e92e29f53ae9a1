//! Data models for the wire protocol.
//!
//! This module defines the decoded `Packet` struct, the closed packet-type
//! enumerations of both protocol generations, and the transient shapes the
//! JSON layer deserializes payloads into.

use serde::de::{self, Deserializer};
use serde::Deserialize;
use serde_json::Value;

use crate::error::{DecodeError, Result};

/// Namespace used whenever a packet carries no explicit endpoint.
pub const DEFAULT_NAMESPACE: &str = "";

/// Outer packet kinds across both protocol generations.
///
/// The legacy colon-delimited format and the modern numeric-typed format use
/// different code tables over an overlapping set of kinds, so each table has
/// its own constructor: [`PacketType::from_legacy_code`] and
/// [`PacketType::from_code`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketType {
    /// Legacy connection teardown (legacy code 0).
    Disconnect,
    /// Legacy connection establishment (legacy code 1).
    Connect,
    /// Legacy keep-alive (legacy code 2).
    Heartbeat,
    /// Plain message envelope (legacy code 3, modern code 4).
    Message,
    /// Legacy JSON message (legacy code 4).
    Json,
    /// Legacy named event (legacy code 5).
    Event,
    /// Legacy acknowledgment (legacy code 6).
    Ack,
    /// Legacy error report (legacy code 7).
    Error,
    /// No-op filler (legacy code 8, modern code 6).
    Noop,
    /// Transport open (modern code 0).
    Open,
    /// Transport close (modern code 1).
    Close,
    /// Transport ping (modern code 2).
    Ping,
    /// Transport pong (modern code 3).
    Pong,
    /// Transport upgrade (modern code 5).
    Upgrade,
}

impl PacketType {
    /// Maps a legacy (colon-format) type code to its variant.
    pub fn from_legacy_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(PacketType::Disconnect),
            1 => Ok(PacketType::Connect),
            2 => Ok(PacketType::Heartbeat),
            3 => Ok(PacketType::Message),
            4 => Ok(PacketType::Json),
            5 => Ok(PacketType::Event),
            6 => Ok(PacketType::Ack),
            7 => Ok(PacketType::Error),
            8 => Ok(PacketType::Noop),
            other => Err(DecodeError::UnknownType(other)),
        }
    }

    /// Maps a modern (numeric-framed) outer type code to its variant.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(PacketType::Open),
            1 => Ok(PacketType::Close),
            2 => Ok(PacketType::Ping),
            3 => Ok(PacketType::Pong),
            4 => Ok(PacketType::Message),
            5 => Ok(PacketType::Upgrade),
            6 => Ok(PacketType::Noop),
            other => Err(DecodeError::UnknownType(other)),
        }
    }
}

/// Inner subtype carried inside a modern envelope packet.
///
/// Inner codes do not share the outer table's numbering.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PacketSubType {
    Connect,
    Disconnect,
    Event,
    Ack,
    Error,
    BinaryEvent,
    BinaryAck,
}

impl PacketSubType {
    /// Maps an inner subtype code to its variant.
    pub fn from_code(code: u8) -> Result<Self> {
        match code {
            0 => Ok(PacketSubType::Connect),
            1 => Ok(PacketSubType::Disconnect),
            2 => Ok(PacketSubType::Event),
            3 => Ok(PacketSubType::Ack),
            4 => Ok(PacketSubType::Error),
            5 => Ok(PacketSubType::BinaryEvent),
            6 => Ok(PacketSubType::BinaryAck),
            other => Err(DecodeError::UnknownSubType(other)),
        }
    }
}

/// Reason code carried by a legacy ERROR packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorReason {
    TransportNotSupported,
    ClientNotHandshaken,
    Unauthorized,
}

impl ErrorReason {
    /// Maps a reason code to its variant.
    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            0 => Ok(ErrorReason::TransportNotSupported),
            1 => Ok(ErrorReason::ClientNotHandshaken),
            2 => Ok(ErrorReason::Unauthorized),
            other => Err(DecodeError::UnknownReason(other)),
        }
    }
}

/// Advice code carried by a legacy ERROR packet.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorAdvice {
    Reconnect,
}

impl ErrorAdvice {
    /// Maps an advice code to its variant.
    pub fn from_code(code: u64) -> Result<Self> {
        match code {
            0 => Ok(ErrorAdvice::Reconnect),
            other => Err(DecodeError::UnknownAdvice(other)),
        }
    }
}

/// A decoded packet, constructed fresh per decode call and owned by the
/// caller.
#[derive(Debug, Clone, PartialEq)]
pub struct Packet {
    /// Outer packet kind.
    pub packet_type: PacketType,
    /// Inner subtype, set only by the modern decoder.
    pub sub_type: Option<PacketSubType>,
    /// Namespace the packet is addressed to.
    pub nsp: String,
    /// Acknowledgment correlation id, when the packet expects or carries one.
    pub ack_id: Option<u64>,
    /// Event name, for event packets.
    pub name: Option<String>,
    /// Payload: raw text for transport pings, event or ack arguments
    /// otherwise.
    pub data: Option<Value>,
    /// Error reason, legacy ERROR packets only.
    pub reason: Option<ErrorReason>,
    /// Error advice, legacy ERROR packets only.
    pub advice: Option<ErrorAdvice>,
}

impl Packet {
    /// Creates an empty packet of the given kind addressed to the default
    /// namespace.
    pub fn new(packet_type: PacketType) -> Self {
        Packet {
            packet_type,
            sub_type: None,
            nsp: DEFAULT_NAMESPACE.to_string(),
            ack_id: None,
            name: None,
            data: None,
            reason: None,
            advice: None,
        }
    }
}

/// Transient shape an event payload deserializes into.
///
/// Accepts both wire forms: the legacy object `{"name": ..., "args": [...]}`
/// and the modern inline array `["name", args...]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Event {
    pub name: String,
    pub args: Vec<Value>,
}

impl<'de> Deserialize<'de> for Event {
    fn deserialize<D>(deserializer: D) -> std::result::Result<Self, D::Error>
    where
        D: Deserializer<'de>,
    {
        #[derive(Deserialize)]
        #[serde(untagged)]
        enum Repr {
            Named {
                name: String,
                #[serde(default)]
                args: Vec<Value>,
            },
            Inline(Vec<Value>),
        }

        match Repr::deserialize(deserializer)? {
            Repr::Named { name, args } => Ok(Event { name, args }),
            Repr::Inline(mut items) => {
                if items.is_empty() {
                    return Err(de::Error::custom("event array is empty"));
                }
                match items.remove(0) {
                    Value::String(name) => Ok(Event { name, args: items }),
                    other => Err(de::Error::custom(format!(
                        "event name must be a string, got {other}"
                    ))),
                }
            }
        }
    }
}

/// Transient shape an acknowledgment payload deserializes into.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(transparent)]
pub struct AckArgs {
    pub args: Vec<Value>,
}
