//! # Radio Command Interface
//!
//! Contract the cycle state machine drives the radio through, plus the
//! single interpretation step that turns a raw command completion into one
//! tagged [`RadioOutcome`].
//!
//! ## Command Model
//!
//! Commands are strictly sequential: at most one command is outstanding at a
//! time and the caller fully consumes one command's result before issuing
//! the next. Each trait method submits a command and suspends until it
//! completes or errors, which is why every operation takes `&mut self` —
//! the exclusive borrow is the one-outstanding-command invariant.
//!
//! Completion carries two raw signals: the event mask (which awaited events
//! fired) and the command status word the radio writes back. Callers never
//! branch on the raw pair; [`interpret`] folds both into a [`RadioOutcome`].
//!
//! Cancellation is not supported. Once submitted, a command either completes
//! or (for receive) expires at its absolute deadline.

use crate::rx_buffer::DataEntry;

/// Command finished without errors.
pub const STATUS_DONE_OK: u16 = 0x3400;
/// Receive window expired before a packet arrived.
pub const STATUS_RX_TIMEOUT: u16 = 0x3402;
/// Received data did not fit the armed entry.
pub const STATUS_RX_BUFFER_OVERFLOW: u16 = 0x3804;

/// Radio-clock timestamp in device ticks.
///
/// Deadlines are absolute values of this clock, computed freshly from
/// [`RadioControl::now`] at submission time.
#[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct RadioInstant {
    ticks: u64,
}

impl RadioInstant {
    pub const fn from_ticks(ticks: u64) -> Self {
        RadioInstant { ticks }
    }

    pub const fn as_ticks(&self) -> u64 {
        self.ticks
    }

    pub const fn plus_ticks(&self, ticks: u64) -> Self {
        RadioInstant {
            ticks: self.ticks.saturating_add(ticks),
        }
    }

    /// Ticks from `earlier` to this instant, zero if `earlier` is later.
    pub const fn saturating_ticks_since(&self, earlier: RadioInstant) -> u64 {
        self.ticks.saturating_sub(earlier.ticks)
    }
}

/// Events reported when an awaited command finishes.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct EventMask(u8);

impl EventMask {
    pub const NONE: EventMask = EventMask(0);
    /// The submitted command ran to completion.
    pub const LAST_COMMAND_DONE: EventMask = EventMask(1 << 0);
    /// The command ended with an error event.
    pub const COMMAND_ERROR: EventMask = EventMask(1 << 1);

    pub const fn contains(self, events: EventMask) -> bool {
        self.0 & events.0 == events.0
    }
}

impl core::ops::BitOr for EventMask {
    type Output = EventMask;

    fn bitor(self, rhs: EventMask) -> EventMask {
        EventMask(self.0 | rhs.0)
    }
}

/// Raw record of one finished command: the events that fired and the status
/// word the radio wrote back on the command structure.
#[derive(Clone, Copy)]
#[cfg_attr(feature = "std", derive(Debug))]
pub struct CommandCompletion {
    pub events: EventMask,
    pub status: u16,
}

impl CommandCompletion {
    pub const fn new(events: EventMask, status: u16) -> Self {
        CommandCompletion { events, status }
    }
}

/// Classified command outcome, produced by [`interpret`] in one step.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum RadioOutcome {
    /// Command finished and the radio reported success.
    Done,
    /// The command error event fired, or the done event never did.
    Error,
    /// The receive window expired at its deadline.
    Timeout,
    /// The radio reported a status word with no dedicated handling; the raw
    /// code is carried verbatim.
    Unclassified(u16),
}

/// Folds the event mask and the command status word into one outcome.
///
/// The error event dominates: a completion without a clean done event is an
/// [`RadioOutcome::Error`] no matter what the status word says.
pub fn interpret(completion: &CommandCompletion) -> RadioOutcome {
    if completion.events.contains(EventMask::COMMAND_ERROR) || !completion.events.contains(EventMask::LAST_COMMAND_DONE) {
        return RadioOutcome::Error;
    }
    match completion.status {
        STATUS_DONE_OK => RadioOutcome::Done,
        STATUS_RX_TIMEOUT => RadioOutcome::Timeout,
        code => RadioOutcome::Unclassified(code),
    }
}

/// Radio command submission errors.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum RadioError {
    /// The device was not initialized before the command was submitted.
    NotInitialized,
    /// The device refused to accept the command.
    Rejected,
}

impl core::fmt::Display for RadioError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            RadioError::NotInitialized => f.write_str("radio device not initialized"),
            RadioError::Rejected => f.write_str("radio device rejected the command"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for RadioError {}

/// Interface the cycle state machine drives a radio device through.
///
/// Device construction and hardware bring-up are not part of this trait;
/// they are highly implementation-dependent, the same way radio device
/// initialization differs per chip. A constructed device owns exclusive
/// access to its radio for the process lifetime.
pub trait RadioControl {
    /// Tunes the radio. Errors are non-fatal to the cycle; the caller logs
    /// and continues.
    async fn set_frequency(&mut self, frequency_mhz: u16) -> Result<(), RadioError>;

    /// Submits a transmit command for `payload` and suspends until it
    /// finishes. `Err` means the command was never accepted.
    async fn transmit(&mut self, payload: &[u8]) -> Result<CommandCompletion, RadioError>;

    /// Submits a receive command into `entry`, ending at the absolute
    /// `deadline`, and suspends until it finishes. The device owns the
    /// entry for exactly the duration of this call.
    async fn receive(&mut self, entry: &mut DataEntry, max_payload_length: u8, deadline: RadioInstant) -> Result<CommandCompletion, RadioError>;

    /// Current radio-clock time.
    fn now(&self) -> RadioInstant;

    /// Nominal radio-clock ticks per second, used for deadline computation.
    fn ticks_per_second(&self) -> u32;
}
