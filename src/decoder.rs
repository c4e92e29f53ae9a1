//! Wire decoding pipeline.
//!
//! This module contains the decoder facade and the three byte-level decoding
//! stages: the legacy colon-delimited packet format, the length-prefixed
//! frame demultiplexer for stream transports, and the modern numeric-typed
//! packet format.

use bytes::{Buf, Bytes};
use serde_json::Value;
use tracing::{debug, warn};
use uuid::Uuid;

use crate::ack::{AckCallback, AckRegistry};
use crate::config::DecoderConfig;
use crate::error::{DecodeError, Result};
use crate::json::JsonSupport;
use crate::models::{
    ErrorAdvice, ErrorReason, Packet, PacketSubType, PacketType, DEFAULT_NAMESPACE,
};
use crate::utils::parse_decimal;

/// Field separator of the legacy colon-delimited format.
const SEPARATOR: u8 = b':';

/// Marker splitting an ack id (or message id) from the payload behind it.
const DATA_MARKER: u8 = b'+';

/// Leading byte of a string-framed stream buffer.
const TEXT_FRAME_MARKER: u8 = 0x00;

/// Byte terminating a frame's length prefix.
const FRAME_SENTINEL: u8 = 0xFF;

/// Decodes raw wire bytes into [`Packet`]s.
///
/// The decoder holds no mutable state of its own, only the JSON layer and
/// the acknowledgment registry it delegates to, so one instance can serve
/// any number of connections concurrently. A single stream buffer, however,
/// belongs to one connection's receive path at a time.
pub struct Decoder<J, A> {
    json_support: J,
    ack_registry: A,
    config: DecoderConfig,
}

impl<J: JsonSupport, A: AckRegistry> Decoder<J, A> {
    /// Creates a decoder with the default configuration.
    ///
    /// # Arguments
    ///
    /// * `json_support` - The JSON layer payloads are deserialized through.
    /// * `ack_registry` - The registry acknowledgment callbacks are looked
    ///   up in.
    pub fn new(json_support: J, ack_registry: A) -> Self {
        Self::with_config(json_support, ack_registry, DecoderConfig::default())
    }

    /// Creates a decoder with an explicit configuration.
    pub fn with_config(json_support: J, ack_registry: A, config: DecoderConfig) -> Self {
        Decoder {
            json_support,
            ack_registry,
            config,
        }
    }

    /// Decodes a single legacy-format packet from its textual form.
    ///
    /// The text is wrapped in a disposable buffer that is released on every
    /// exit path, including decode failure.
    ///
    /// # Arguments
    ///
    /// * `text` - The complete packet text.
    /// * `session_id` - Session the packet arrived on, used to scope
    ///   acknowledgment-callback lookups.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the packet is structurally malformed or
    /// carries a code outside the protocol's closed enumerations.
    pub fn decode_packet(&self, text: &str, session_id: Uuid) -> Result<Packet> {
        let mut buffer = Bytes::copy_from_slice(text.as_bytes());
        self.decode_legacy(&mut buffer, session_id)
    }

    /// Decodes exactly one packet out of a (possibly multi-frame) stream
    /// buffer.
    ///
    /// A buffer starting with the text-frame marker is length-prefixed: the
    /// digit run up to the sentinel byte gives the frame length, and the
    /// cursor ends up exactly past the consumed frame so the next call picks
    /// up the following one. Any other buffer is treated as a single raw
    /// frame. Callers loop to drain multi-frame buffers.
    ///
    /// On failure the cursor is left where it was; no bytes are consumed.
    ///
    /// # Errors
    ///
    /// Returns a [`DecodeError`] if the framing is malformed, the declared
    /// length exceeds the configured maximum, or the frame itself does not
    /// decode.
    pub fn decode_packets(&self, buffer: &mut Bytes, session_id: Uuid) -> Result<Packet> {
        if buffer.is_empty() {
            return Err(DecodeError::Malformed(String::new()));
        }
        if buffer.chunk()[0] == TEXT_FRAME_MARKER {
            let bytes = buffer.chunk();
            let sentinel = bytes
                .iter()
                .position(|&b| b == FRAME_SENTINEL)
                .ok_or_else(|| DecodeError::Malformed(lossy(bytes)))?;
            let digits = &bytes[1..sentinel];
            if !digits.iter().all(|&b| b.is_ascii_digit() || b <= 9) {
                return Err(DecodeError::Malformed(lossy(bytes)));
            }
            let len = parse_decimal(digits) as usize;
            if len > self.config.max_frame_length {
                warn!(
                    "rejecting frame of declared length {} (limit {})",
                    len, self.config.max_frame_length
                );
                return Err(DecodeError::Malformed(lossy(&bytes[..sentinel])));
            }
            let end = sentinel + 1 + len;
            if bytes.len() < end {
                return Err(DecodeError::Malformed(lossy(bytes)));
            }
            let frame = buffer.slice(sentinel + 1..end);
            let text = std::str::from_utf8(frame.as_ref())?;
            let packet = self.decode_frame(text, session_id)?;
            buffer.advance(end);
            Ok(packet)
        } else {
            let total = buffer.remaining();
            let text = std::str::from_utf8(buffer.chunk())?;
            let packet = self.decode_frame(text, session_id)?;
            buffer.advance(total);
            Ok(packet)
        }
    }

    /// Decodes one legacy colon-delimited packet, consuming the buffer.
    ///
    /// Grammar: `type ':' [messageId] ['+'] ':' [endpoint] ':' [payload]`.
    fn decode_legacy(&self, buffer: &mut Bytes, session_id: Uuid) -> Result<Packet> {
        let total = buffer.remaining();
        let bytes = buffer.chunk();
        if total < 3 {
            return Err(DecodeError::Malformed(lossy(bytes)));
        }
        if !bytes[0].is_ascii_digit() || bytes[1] != SEPARATOR {
            return Err(DecodeError::Malformed(lossy(bytes)));
        }
        let packet_type = PacketType::from_legacy_code(bytes[0] - b'0')?;

        // Message-id field: digits, with '+' marking that a data ack is
        // expected. The accumulator stays unallocated until a byte shows up.
        let mut index = 2;
        let mut message_id: Option<Vec<u8>> = None;
        let mut wants_data_ack = false;
        while index < total {
            let byte = bytes[index];
            if byte == SEPARATOR {
                break;
            }
            if byte == DATA_MARKER {
                wants_data_ack = true;
            } else {
                message_id.get_or_insert_with(Vec::new).push(byte);
            }
            index += 1;
        }
        let ack_id = match message_id {
            Some(digits) if !digits.is_empty() => {
                if !digits.iter().all(u8::is_ascii_digit) {
                    return Err(DecodeError::Malformed(lossy(bytes)));
                }
                Some(parse_decimal(&digits))
            }
            _ => None,
        };

        // Endpoint field.
        index += 1;
        let mut endpoint: Option<Vec<u8>> = None;
        while index < total {
            let byte = bytes[index];
            if byte == SEPARATOR {
                break;
            }
            endpoint.get_or_insert_with(Vec::new).push(byte);
            index += 1;
        }
        let nsp = match endpoint {
            Some(raw) if !raw.is_empty() => {
                String::from_utf8(raw).map_err(|e| DecodeError::Utf8(e.utf8_error()))?
            }
            _ => DEFAULT_NAMESPACE.to_string(),
        };

        // Skip the separator in front of the payload, if one was reached.
        let payload_start = if index >= total { total } else { index + 1 };
        let payload = &bytes[payload_start..];

        debug!(
            "decoding legacy packet type={:?} nsp={:?} id={:?} data_ack={} on session {}",
            packet_type, nsp, ack_id, wants_data_ack, session_id
        );

        let mut packet = Packet::new(packet_type);
        packet.nsp = nsp;
        packet.ack_id = ack_id;

        match packet_type {
            PacketType::Error => {
                if !payload.is_empty() {
                    let text = std::str::from_utf8(payload)?;
                    let mut pieces = text.split('+');
                    if let Some(first) = pieces.next() {
                        if !first.trim().is_empty() {
                            let reason = parse_code(first, bytes)?;
                            packet.reason = Some(ErrorReason::from_code(reason)?);
                            if let Some(second) = pieces.next() {
                                let advice = parse_code(second, bytes)?;
                                packet.advice = Some(ErrorAdvice::from_code(advice)?);
                            }
                        }
                    }
                }
            }
            PacketType::Event => {
                let event = self.json_support.read_event(std::str::from_utf8(payload)?)?;
                packet.name = Some(event.name);
                packet.data = Some(Value::Array(event.args));
            }
            PacketType::Ack => {
                if !payload.is_empty() {
                    let mut plus_index = None;
                    let mut valid_format = true;
                    for (pos, &byte) in payload.iter().enumerate() {
                        if !byte.is_ascii_digit() {
                            if byte == DATA_MARKER {
                                plus_index = Some(pos);
                            } else {
                                valid_format = false;
                            }
                            break;
                        }
                    }
                    if !valid_format {
                        // Malformed ack field: keep the packet, drop the ack
                        // data, never abort the call.
                        warn!(
                            "malformed ack field {:?} on session {}, dropping ack data",
                            lossy(payload),
                            session_id
                        );
                    } else if let Some(pos) = plus_index {
                        packet.ack_id = Some(parse_decimal(&payload[..pos]));
                        let args_text = std::str::from_utf8(&payload[pos + 1..])?;
                        let callback = self.resolve_ack(session_id, packet.ack_id);
                        let args = self
                            .json_support
                            .read_ack_args(args_text, callback.as_ref())?;
                        packet.data = Some(Value::Array(args.args));
                    } else {
                        packet.ack_id = Some(parse_decimal(payload));
                    }
                }
            }
            PacketType::Disconnect => {}
            _ => {}
        }

        // The legacy format treats the remainder as fully consumed once
        // typed.
        buffer.advance(total);
        Ok(packet)
    }

    /// Decodes one modern-format frame.
    ///
    /// Grammar: `outerDigit [innerDigit] [nsp[',' ackId]] '[' ... ']'`.
    fn decode_frame(&self, frame: &str, session_id: Uuid) -> Result<Packet> {
        let first = *frame
            .as_bytes()
            .first()
            .ok_or_else(|| DecodeError::Malformed(frame.to_string()))?;
        if !first.is_ascii_digit() {
            return Err(DecodeError::Malformed(frame.to_string()));
        }
        let packet_type = PacketType::from_code(first - b'0')?;
        let mut packet = Packet::new(packet_type);
        let mut msg = &frame[1..];

        if packet_type == PacketType::Ping {
            // Transport ping carries its remainder verbatim.
            packet.data = Some(Value::String(msg.to_string()));
            return Ok(packet);
        }

        if msg.is_empty() {
            return Ok(packet);
        }

        let inner = msg.as_bytes()[0];
        if !inner.is_ascii_digit() {
            return Err(DecodeError::Malformed(frame.to_string()));
        }
        let sub_type = PacketSubType::from_code(inner - b'0')?;
        packet.sub_type = Some(sub_type);
        msg = &msg[1..];

        // Everything before the JSON array is the "nsp,ackId" header.
        if let Some(end) = msg.find('[') {
            if end > 0 {
                let header = &msg[..end];
                match header.split_once(',') {
                    Some((nsp, ack)) => {
                        packet.nsp = nsp.to_string();
                        if !ack.is_empty() {
                            packet.ack_id = Some(parse_ack_id(ack, frame)?);
                        }
                    }
                    None => {
                        packet.ack_id = Some(parse_ack_id(header, frame)?);
                    }
                }
                msg = &msg[end..];
            }
        }

        if packet_type == PacketType::Message {
            match sub_type {
                PacketSubType::Connect => {
                    packet.nsp = msg.to_string();
                }
                PacketSubType::Ack => {
                    let callback = self.resolve_ack(session_id, packet.ack_id);
                    let args = self.json_support.read_ack_args(msg, callback.as_ref())?;
                    packet.data = Some(Value::Array(args.args));
                }
                PacketSubType::Event => {
                    let event = self.json_support.read_event(msg)?;
                    packet.name = Some(event.name);
                    packet.data = Some(Value::Array(event.args));
                }
                _ => {}
            }
        }

        debug!(
            "decoded frame type={:?} sub_type={:?} nsp={:?} ack_id={:?} on session {}",
            packet.packet_type, packet.sub_type, packet.nsp, packet.ack_id, session_id
        );
        Ok(packet)
    }

    /// Resolves the callback an acknowledgment was registered with.
    ///
    /// An unknown ack id (late, duplicate, or a client bug) is not an error;
    /// the arguments then decode untyped.
    fn resolve_ack(&self, session_id: Uuid, ack_id: Option<u64>) -> Option<AckCallback> {
        let ack_id = ack_id?;
        let callback = self.ack_registry.callback(session_id, ack_id);
        if callback.is_none() {
            debug!(
                "no callback registered for ack {} on session {}",
                ack_id, session_id
            );
        }
        callback
    }
}

/// Parses an all-digit ack id out of a modern-format header.
fn parse_ack_id(text: &str, frame: &str) -> Result<u64> {
    let digits = text.as_bytes();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(DecodeError::Malformed(frame.to_string()));
    }
    Ok(parse_decimal(digits))
}

/// Parses an enumeration code from a legacy error payload segment.
fn parse_code(text: &str, raw: &[u8]) -> Result<u64> {
    let digits = text.as_bytes();
    if digits.is_empty() || !digits.iter().all(u8::is_ascii_digit) {
        return Err(DecodeError::Malformed(lossy(raw)));
    }
    Ok(parse_decimal(digits))
}

fn lossy(bytes: &[u8]) -> String {
    String::from_utf8_lossy(bytes).into_owned()
}
