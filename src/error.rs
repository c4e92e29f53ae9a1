//! Decode error type shared by the whole crate.

use thiserror::Error;

/// Result alias used throughout the decoder.
pub type Result<T> = std::result::Result<T, DecodeError>;

/// Errors surfaced by packet decoding.
///
/// Structural failures carry the offending raw text so that callers can log
/// what the client actually sent.
#[derive(Debug, Error)]
pub enum DecodeError {
    /// The buffer cannot be parsed as a packet or frame at all.
    #[error("can't parse packet: {0:?}")]
    Malformed(String),

    /// A type digit outside the closed set of packet kinds.
    #[error("unknown packet type code: {0}")]
    UnknownType(u8),

    /// An inner subtype digit outside the closed set.
    #[error("unknown packet subtype code: {0}")]
    UnknownSubType(u8),

    /// An error-reason code outside the closed set.
    #[error("unknown error reason code: {0}")]
    UnknownReason(u64),

    /// An error-advice code outside the closed set.
    #[error("unknown error advice code: {0}")]
    UnknownAdvice(u64),

    /// A JSON payload the JSON layer could not deserialize.
    #[error("invalid json payload: {0}")]
    Json(#[from] serde_json::Error),

    /// Frame bytes that are not valid UTF-8 where text is required.
    #[error("invalid utf-8 in frame: {0}")]
    Utf8(#[from] std::str::Utf8Error),
}
