//! # Echo Radio Device - Loopback for Hardware-Free Operation
//!
//! The simplest radio device: a transmitted beacon is held by the device
//! and delivered back on the next receive window, as if a perfectly placed
//! peer repeated everything immediately. With nothing pending, a receive
//! window idles until its deadline and completes with a timeout status.
//!
//! ## Clock
//!
//! The radio clock is a microsecond counter over [`embassy_time::Instant`]
//! (1 000 000 ticks per second). A short fixed airtime is simulated before
//! every delivery so the loop is observable in real time.
//!
//! ## Use Cases
//!
//! - Exercising the full TX/RX data path without hardware
//! - Demo runs of the cycle (the default device of the std binary)
//! - Smoke testing entry arming and extraction

use embassy_time::{Duration, Instant, Timer};

use crate::radio::{CommandCompletion, EventMask, RadioControl, RadioError, RadioInstant, STATUS_DONE_OK, STATUS_RX_BUFFER_OVERFLOW, STATUS_RX_TIMEOUT};
use crate::rx_buffer::{DataEntry, EntryStatus};
use crate::RX_MAX_PAYLOAD_LENGTH;

/// Radio-clock ticks per second (microsecond clock).
const TICKS_PER_SECOND: u32 = 1_000_000;

/// Simulated time on air per packet, in radio ticks.
const AIRTIME_TICKS: u64 = 2_000;

/// Status byte appended after an echoed payload, standing in for the
/// signal-quality byte a real radio appends.
const ECHO_STATUS_BYTE: u8 = 0x3F;

/// Loopback radio device.
pub struct RadioDevice {
    tuned_frequency_mhz: Option<u16>,
    pending_echo: Option<([u8; RX_MAX_PAYLOAD_LENGTH], usize)>,
}

impl RadioDevice {
    pub const fn new() -> Self {
        RadioDevice {
            tuned_frequency_mhz: None,
            pending_echo: None,
        }
    }
}

impl Default for RadioDevice {
    fn default() -> Self {
        Self::new()
    }
}

impl RadioControl for RadioDevice {
    async fn set_frequency(&mut self, frequency_mhz: u16) -> Result<(), RadioError> {
        self.tuned_frequency_mhz = Some(frequency_mhz);
        log::debug!("Echo radio tuned to {} MHz", frequency_mhz);
        Ok(())
    }

    async fn transmit(&mut self, payload: &[u8]) -> Result<CommandCompletion, RadioError> {
        if self.tuned_frequency_mhz.is_none() {
            return Err(RadioError::NotInitialized);
        }
        if payload.is_empty() || payload.len() > RX_MAX_PAYLOAD_LENGTH {
            return Err(RadioError::Rejected);
        }
        Timer::after(Duration::from_micros(AIRTIME_TICKS)).await;
        let mut data = [0u8; RX_MAX_PAYLOAD_LENGTH];
        data[..payload.len()].copy_from_slice(payload);
        self.pending_echo = Some((data, payload.len()));
        log::trace!("Echoing back {} bytes on the next receive window", payload.len());
        Ok(CommandCompletion::new(EventMask::LAST_COMMAND_DONE, STATUS_DONE_OK))
    }

    async fn receive(&mut self, entry: &mut DataEntry, max_payload_length: u8, deadline: RadioInstant) -> Result<CommandCompletion, RadioError> {
        if self.tuned_frequency_mhz.is_none() {
            return Err(RadioError::NotInitialized);
        }
        entry.set_status(EntryStatus::Busy);
        let window_ticks = deadline.saturating_ticks_since(self.now());

        match self.pending_echo.take() {
            Some((data, length)) if window_ticks >= AIRTIME_TICKS => {
                Timer::after(Duration::from_micros(AIRTIME_TICKS)).await;
                if length > max_payload_length as usize || entry.commit_received(&data[..length], ECHO_STATUS_BYTE).is_err() {
                    entry.set_status(EntryStatus::Aborted);
                    return Ok(CommandCompletion::new(EventMask::LAST_COMMAND_DONE, STATUS_RX_BUFFER_OVERFLOW));
                }
                Ok(CommandCompletion::new(EventMask::LAST_COMMAND_DONE, STATUS_DONE_OK))
            }
            pending => {
                // Nothing to deliver (or the window is too short to land
                // it): idle until the deadline expires.
                self.pending_echo = pending;
                Timer::after(Duration::from_micros(window_ticks)).await;
                entry.set_status(EntryStatus::Pending);
                Ok(CommandCompletion::new(EventMask::LAST_COMMAND_DONE, STATUS_RX_TIMEOUT))
            }
        }
    }

    fn now(&self) -> RadioInstant {
        RadioInstant::from_ticks(Instant::now().as_micros())
    }

    fn ticks_per_second(&self) -> u32 {
        TICKS_PER_SECOND
    }
}
