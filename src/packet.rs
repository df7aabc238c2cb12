//! # Packet Codec
//!
//! Builds the fixed-format outgoing beacon packet.
//!
//! ## Packet Structure
//!
//! Every beacon is exactly [`TX_PAYLOAD_LENGTH`] bytes:
//! - Bytes 0-1: sequence counter, big-endian
//! - Bytes 2-3: fixed tag bytes ([`BEACON_TAG`])
//!
//! The tag bytes are a liveness marker only; they carry no protocol meaning.
//! The sequence counter is owned by the cycle state machine, which increments
//! it with 16-bit wraparound exactly once per transmitted beacon.

/// Length of the outgoing beacon payload in bytes.
pub const TX_PAYLOAD_LENGTH: usize = 4;

/// Fixed tag bytes appended after the sequence counter.
pub const BEACON_TAG: [u8; 2] = *b"aa";

/// Builds the outgoing beacon payload for the given sequence value.
///
/// Pure and deterministic: byte 0 is the high byte of the sequence, byte 1
/// the low byte, bytes 2-3 the tag. The caller stores the sequence increment
/// separately (wrapping at the 16-bit boundary, once per call).
pub fn build_packet(sequence: u16) -> [u8; TX_PAYLOAD_LENGTH] {
    [(sequence >> 8) as u8, sequence as u8, BEACON_TAG[0], BEACON_TAG[1]]
}
