//! Configuration module for the decoder.
//!
//! This module defines the `DecoderConfig` struct, which can be loaded from
//! a source (e.g., file, environment variables) alongside the embedding
//! server's own configuration.

use serde::Deserialize;

/// Decoder configuration struct.
#[derive(Debug, Clone, Deserialize)]
pub struct DecoderConfig {
    /// Largest declared frame length accepted from a stream buffer.
    ///
    /// A length prefix above this bound fails the decode call before any
    /// payload bytes are touched.
    #[serde(default = "default_max_frame_length")]
    pub max_frame_length: usize,
}

fn default_max_frame_length() -> usize {
    65536
}

impl Default for DecoderConfig {
    fn default() -> Self {
        DecoderConfig {
            max_frame_length: default_max_frame_length(),
        }
    }
}
