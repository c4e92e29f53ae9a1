//! JSON layer seam.
//!
//! Payload bytes are handed to an implementation of `JsonSupport` together
//! with the shape they are expected to take; the decoder itself never
//! interprets JSON.

use crate::ack::AckCallback;
use crate::error::Result;
use crate::models::{AckArgs, Event};

/// Trait for deserializing packet payloads.
pub trait JsonSupport: Send + Sync {
    /// Deserializes an event payload into its name and arguments.
    ///
    /// Both wire forms are accepted: `{"name": ..., "args": [...]}` and
    /// `["name", args...]`.
    fn read_event(&self, json: &str) -> Result<Event>;

    /// Deserializes acknowledgment arguments.
    ///
    /// When `callback` carries an argument reader, that reader defines the
    /// expected shape; otherwise the arguments decode untyped.
    fn read_ack_args(&self, json: &str, callback: Option<&AckCallback>) -> Result<AckArgs>;
}

/// `serde_json`-backed implementation of the JSON layer.
#[derive(Debug, Clone, Copy, Default)]
pub struct SerdeJsonSupport;

impl JsonSupport for SerdeJsonSupport {
    fn read_event(&self, json: &str) -> Result<Event> {
        Ok(serde_json::from_str(json)?)
    }

    fn read_ack_args(&self, json: &str, callback: Option<&AckCallback>) -> Result<AckArgs> {
        match callback.and_then(AckCallback::reader) {
            Some(reader) => Ok(reader(json)?),
            None => Ok(serde_json::from_str(json)?),
        }
    }
}
