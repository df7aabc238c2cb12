//! # Receive Buffer Manager
//!
//! Owns the single reusable receive data entry and its enclosing single-slot
//! queue, and turns a finished entry into a [`ReceiveResult`].
//!
//! ## Entry Lifecycle
//!
//! The radio fills the entry's data region during one receive command:
//! - Byte 0: payload length `L` as reported by the radio
//! - Bytes 1..=L: payload
//! - Byte L+1: one trailing status byte appended by the radio
//!
//! The entry must be re-armed ([`ReceiveQueue::arm`]) before every receive
//! submission and must not be read unless its status is
//! [`EntryStatus::Finished`]. Exactly one entry is supported; the queue never
//! chains a successor, so the radio stops after filling this entry.
//!
//! ## Length Guard
//!
//! The length byte comes from untrusted RF input. [`ReceiveQueue::extract`]
//! rejects a declared length that exceeds the configured maximum payload
//! before touching the payload region.

use crate::{NUM_APPENDED_BYTES, RX_MAX_PAYLOAD_LENGTH};

/// Capacity of the entry's data region: one length byte, the maximum
/// payload, and the appended header/status bytes.
pub const ENTRY_DATA_CAPACITY: usize = 1 + RX_MAX_PAYLOAD_LENGTH + NUM_APPENDED_BYTES;

/// Lifecycle status of a receive data entry.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum EntryStatus {
    /// Armed and waiting for the radio to start writing.
    Pending,
    /// The radio is currently writing into the entry.
    Busy,
    /// The radio completed the entry; it may be extracted.
    Finished,
    /// The radio gave up on the entry without completing it.
    Aborted,
}

/// Errors returned when extracting a receive result from the entry.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum ExtractError {
    /// The entry status is not [`EntryStatus::Finished`].
    NotFinished,
    /// The radio's length byte exceeds the configured maximum payload.
    LengthExceedsCapacity { declared: u8, capacity: u8 },
}

impl core::fmt::Display for ExtractError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            ExtractError::NotFinished => f.write_str("receive entry is not finished"),
            ExtractError::LengthExceedsCapacity { declared, capacity } => {
                write!(f, "declared payload length {} exceeds capacity {}", declared, capacity)
            }
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for ExtractError {}

/// A single reusable receive data entry.
///
/// `length` holds the armed capacity of the data region (not the received
/// payload length; that is byte 0 of the data region once finished). The
/// writer surface (`set_status`, `data_mut`, [`DataEntry::commit_received`])
/// is how a radio device fills the entry during one receive command.
pub struct DataEntry {
    length: u8,
    status: EntryStatus,
    data: [u8; ENTRY_DATA_CAPACITY],
}

impl DataEntry {
    pub const fn new() -> Self {
        DataEntry {
            length: 0,
            status: EntryStatus::Pending,
            data: [0u8; ENTRY_DATA_CAPACITY],
        }
    }

    pub fn status(&self) -> EntryStatus {
        self.status
    }

    /// Sets the entry status. Device-facing.
    pub fn set_status(&mut self, status: EntryStatus) {
        self.status = status;
    }

    /// Armed capacity of the data region in bytes.
    pub fn capacity(&self) -> u8 {
        self.length
    }

    pub fn data(&self) -> &[u8] {
        &self.data
    }

    /// Raw data region. Device-facing; the radio writes length byte, payload
    /// and appended status byte here.
    pub fn data_mut(&mut self) -> &mut [u8] {
        &mut self.data
    }

    /// Device-side helper: writes `payload` with its length byte and one
    /// appended status byte, then marks the entry finished.
    ///
    /// Fails if the payload does not fit the armed capacity; the entry is
    /// left untouched in that case.
    pub fn commit_received(&mut self, payload: &[u8], appended_status: u8) -> Result<(), ()> {
        let needed = 1 + payload.len() + 1;
        if payload.len() > u8::MAX as usize || needed > self.length as usize || needed > ENTRY_DATA_CAPACITY {
            return Err(());
        }
        self.data[0] = payload.len() as u8;
        self.data[1..1 + payload.len()].copy_from_slice(payload);
        self.data[1 + payload.len()] = appended_status;
        self.status = EntryStatus::Finished;
        Ok(())
    }
}

impl Default for DataEntry {
    fn default() -> Self {
        Self::new()
    }
}

/// Transient view of one finished receive entry: payload length, payload
/// bytes and the trailing status byte appended by the radio.
#[derive(PartialEq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct ReceiveResult {
    length: u8,
    payload: [u8; RX_MAX_PAYLOAD_LENGTH],
    status_byte: u8,
}

impl ReceiveResult {
    pub fn len(&self) -> usize {
        self.length as usize
    }

    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    pub fn payload(&self) -> &[u8] {
        &self.payload[..self.length as usize]
    }

    /// The status byte the radio appended after the payload.
    pub fn status_byte(&self) -> u8 {
        self.status_byte
    }
}

/// Single-slot data entry queue.
///
/// Hardware walks entries through a successor link; this queue supports
/// exactly one entry and never chains, so [`ReceiveQueue::arm`] always
/// clears the successor along with the entry state.
pub struct ReceiveQueue {
    entry: DataEntry,
    has_successor: bool,
}

impl ReceiveQueue {
    pub const fn new() -> Self {
        ReceiveQueue {
            entry: DataEntry::new(),
            has_successor: false,
        }
    }

    /// Resets the entry for a fresh receive window and hands it out for one
    /// receive command: capacity set to one length byte plus `max_payload`
    /// plus the appended bytes, status cleared to pending, no successor.
    pub fn arm(&mut self, max_payload_length: u8) -> &mut DataEntry {
        let max_payload = (max_payload_length as usize).min(RX_MAX_PAYLOAD_LENGTH);
        self.entry.length = (1 + max_payload + NUM_APPENDED_BYTES) as u8;
        self.entry.status = EntryStatus::Pending;
        self.has_successor = false;
        &mut self.entry
    }

    pub fn entry(&self) -> &DataEntry {
        &self.entry
    }

    pub fn has_successor(&self) -> bool {
        self.has_successor
    }

    /// Extracts the receive result from a finished entry.
    ///
    /// Rejects a non-finished entry and a declared length larger than
    /// `max_payload_length` without reading the payload region.
    pub fn extract(&self, max_payload_length: u8) -> Result<ReceiveResult, ExtractError> {
        if self.entry.status != EntryStatus::Finished {
            return Err(ExtractError::NotFinished);
        }
        let declared = self.entry.data[0];
        let capacity = (max_payload_length as usize).min(RX_MAX_PAYLOAD_LENGTH) as u8;
        if declared > capacity {
            return Err(ExtractError::LengthExceedsCapacity { declared, capacity });
        }
        let len = declared as usize;
        let mut payload = [0u8; RX_MAX_PAYLOAD_LENGTH];
        payload[..len].copy_from_slice(&self.entry.data[1..1 + len]);
        Ok(ReceiveResult {
            length: declared,
            payload,
            status_byte: self.entry.data[1 + len],
        })
    }
}

impl Default for ReceiveQueue {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;

    #[test]
    fn arm_resets_entry_regardless_of_prior_state() {
        let mut queue = ReceiveQueue::new();
        queue.entry.status = EntryStatus::Finished;
        queue.entry.data[0] = 0xAB;
        queue.has_successor = true;

        let entry = queue.arm(RX_MAX_PAYLOAD_LENGTH as u8);
        assert_eq!(entry.status(), EntryStatus::Pending);
        assert_eq!(entry.capacity() as usize, 1 + RX_MAX_PAYLOAD_LENGTH + NUM_APPENDED_BYTES);
        assert!(!queue.has_successor());
    }

    #[test]
    fn arm_clamps_oversized_max_payload() {
        let mut queue = ReceiveQueue::new();
        let entry = queue.arm(u8::MAX);
        assert_eq!(entry.capacity() as usize, ENTRY_DATA_CAPACITY);
    }

    #[test]
    fn extract_rejects_non_finished_entry() {
        let mut queue = ReceiveQueue::new();
        queue.arm(RX_MAX_PAYLOAD_LENGTH as u8);
        assert_eq!(queue.extract(RX_MAX_PAYLOAD_LENGTH as u8), Err(ExtractError::NotFinished));

        queue.entry.status = EntryStatus::Busy;
        assert!(matches!(queue.extract(RX_MAX_PAYLOAD_LENGTH as u8), Err(ExtractError::NotFinished)));

        queue.entry.status = EntryStatus::Aborted;
        assert!(matches!(queue.extract(RX_MAX_PAYLOAD_LENGTH as u8), Err(ExtractError::NotFinished)));
    }

    #[test]
    fn extract_rejects_length_byte_exceeding_capacity() {
        let mut queue = ReceiveQueue::new();
        queue.arm(8);
        // A radio reporting more bytes than the armed capacity must be
        // rejected before any payload read.
        queue.entry.data[0] = 200;
        queue.entry.status = EntryStatus::Finished;

        assert!(matches!(
            queue.extract(8),
            Err(ExtractError::LengthExceedsCapacity { declared: 200, capacity: 8 })
        ));
    }

    #[test]
    fn extract_returns_payload_and_trailing_status_byte() {
        let mut queue = ReceiveQueue::new();
        let entry = queue.arm(RX_MAX_PAYLOAD_LENGTH as u8);
        entry.commit_received(&[10, 20, 30], 0x2A).expect("payload fits armed entry");

        let result = queue.extract(RX_MAX_PAYLOAD_LENGTH as u8).expect("finished entry extracts");
        assert_eq!(result.len(), 3);
        assert_eq!(result.payload(), &[10, 20, 30]);
        assert_eq!(result.status_byte(), 0x2A);
    }

    #[test]
    fn commit_rejects_payload_beyond_armed_capacity() {
        let mut queue = ReceiveQueue::new();
        let entry = queue.arm(4);
        let oversized = [0u8; 16];
        assert!(entry.commit_received(&oversized, 0).is_err());
        assert_eq!(entry.status(), EntryStatus::Pending);
    }

    #[test]
    fn commit_without_arm_is_rejected() {
        let mut entry = DataEntry::new();
        assert!(entry.commit_received(&[1, 2, 3], 0).is_err());
    }
}
