//! Acknowledgment callback lookup seam.
//!
//! The decoder only consumes the lookup contract: callback registration and
//! lifecycle belong to the surrounding runtime.

use std::sync::Arc;

use uuid::Uuid;

use crate::models::AckArgs;

/// Deserializer a callback supplies for the arguments it expects back.
pub type AckArgsReader = Arc<dyn Fn(&str) -> serde_json::Result<AckArgs> + Send + Sync>;

/// A previously registered acknowledgment callback.
///
/// Carries the callback's expected argument shape as a reader function; an
/// untyped callback leaves the shape to the JSON layer's default.
#[derive(Clone, Default, derive_more::Debug)]
pub struct AckCallback {
    #[debug(skip)]
    reader: Option<AckArgsReader>,
}

impl AckCallback {
    /// Callback with no expected shape; arguments decode untyped.
    pub fn untyped() -> Self {
        AckCallback { reader: None }
    }

    /// Callback that deserializes its arguments through `reader`.
    pub fn typed(
        reader: impl Fn(&str) -> serde_json::Result<AckArgs> + Send + Sync + 'static,
    ) -> Self {
        AckCallback {
            reader: Some(Arc::new(reader)),
        }
    }

    /// The argument reader, if this callback supplied one.
    pub fn reader(&self) -> Option<&AckArgsReader> {
        self.reader.as_ref()
    }
}

/// Trait for looking up acknowledgment callbacks.
pub trait AckRegistry: Send + Sync {
    /// Returns the callback registered for `(session_id, ack_id)`, if any.
    ///
    /// A miss is not an error: the packet's arguments then decode untyped.
    fn callback(&self, session_id: Uuid, ack_id: u64) -> Option<AckCallback>;
}

/// Registry with no registered callbacks; every lookup misses.
///
/// Useful for callers that never emit packets expecting acknowledgments.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopAckRegistry;

impl AckRegistry for NoopAckRegistry {
    fn callback(&self, _session_id: Uuid, _ack_id: u64) -> Option<AckCallback> {
        None
    }
}
