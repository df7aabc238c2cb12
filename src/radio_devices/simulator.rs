//! # Radio Device Simulator - Simulated Remote Peer
//!
//! Simulates the radio environment of a single node with one remote peer
//! beaconing at randomized intervals. A receive window races the next
//! simulated peer arrival against the window deadline: if a beacon lands
//! inside the window it is delivered into the data entry, otherwise the
//! window completes with a timeout status — so both branches of the cycle
//! are exercised with realistic proportions.
//!
//! Transmissions are broadcast into the simulated void: they take airtime
//! and complete successfully, but nobody answers them directly.
//!
//! ## Timing
//!
//! The radio clock is a microsecond counter over [`embassy_time::Instant`].
//! Peer arrival offsets are drawn uniformly from
//! `[0, mean_beacon_interval_secs)` per window with a WyRand generator, so
//! the hit rate of a window is roughly `window / interval`.

use embassy_futures::select::{select, Either};
use embassy_time::{Duration, Instant, Timer};
use rand_core::RngCore;
use rand_core::SeedableRng;
use rand_wyrand::WyRand;

use crate::packet::build_packet;
use crate::radio::{CommandCompletion, EventMask, RadioControl, RadioError, RadioInstant, STATUS_DONE_OK, STATUS_RX_BUFFER_OVERFLOW, STATUS_RX_TIMEOUT};
use crate::rx_buffer::{DataEntry, EntryStatus};
use crate::RX_MAX_PAYLOAD_LENGTH;

/// Radio-clock ticks per second (microsecond clock).
const TICKS_PER_SECOND: u32 = 1_000_000;

/// Simulated time on air per packet, in radio ticks.
const AIRTIME_TICKS: u64 = 2_000;

/// Simulated remote-peer radio device.
pub struct RadioDevice {
    rng: WyRand,
    tuned_frequency_mhz: Option<u16>,
    peer_sequence: u16,
    mean_beacon_interval_secs: u32,
}

impl RadioDevice {
    /// Creates a simulator whose remote peer beacons on average once per
    /// `mean_beacon_interval_secs` (0 is treated as continuous beaconing).
    pub fn new(rng_seed: u64, mean_beacon_interval_secs: u32) -> Self {
        RadioDevice {
            rng: WyRand::seed_from_u64(rng_seed),
            tuned_frequency_mhz: None,
            peer_sequence: 0,
            mean_beacon_interval_secs,
        }
    }
}

impl RadioControl for RadioDevice {
    async fn set_frequency(&mut self, frequency_mhz: u16) -> Result<(), RadioError> {
        self.tuned_frequency_mhz = Some(frequency_mhz);
        log::debug!("Simulated radio tuned to {} MHz", frequency_mhz);
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
        log::trace!("Broadcast {} bytes into the simulated channel", payload.len());
        Ok(CommandCompletion::new(EventMask::LAST_COMMAND_DONE, STATUS_DONE_OK))
    }

    async fn receive(&mut self, entry: &mut DataEntry, max_payload_length: u8, deadline: RadioInstant) -> Result<CommandCompletion, RadioError> {
        if self.tuned_frequency_mhz.is_none() {
            return Err(RadioError::NotInitialized);
        }
        entry.set_status(EntryStatus::Busy);
        let window_ticks = deadline.saturating_ticks_since(self.now());

        let interval_ticks = (self.mean_beacon_interval_secs as u64 * TICKS_PER_SECOND as u64).max(1);
        let arrival_ticks = self.rng.next_u64() % interval_ticks;

        match select(
            Timer::after(Duration::from_micros(arrival_ticks)),
            Timer::after(Duration::from_micros(window_ticks)),
        )
        .await
        {
            Either::First(()) => {
                let beacon = build_packet(self.peer_sequence);
                self.peer_sequence = self.peer_sequence.wrapping_add(1);
                // Signal-quality byte the radio appends after the payload.
                let status_byte = (self.rng.next_u32() % 64) as u8;
                if beacon.len() > max_payload_length as usize || entry.commit_received(&beacon, status_byte).is_err() {
                    entry.set_status(EntryStatus::Aborted);
                    return Ok(CommandCompletion::new(EventMask::LAST_COMMAND_DONE, STATUS_RX_BUFFER_OVERFLOW));
                }
                Ok(CommandCompletion::new(EventMask::LAST_COMMAND_DONE, STATUS_DONE_OK))
            }
            Either::Second(()) => {
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

#[cfg(all(test, feature = "std"))]
mod tests {
    use super::*;
    use crate::radio::{interpret, RadioOutcome};
    use crate::rx_buffer::ReceiveQueue;
    use futures::executor::block_on;

    #[test]
    fn continuous_peer_delivers_a_beacon() {
        block_on(async {
            // Interval 0: every window sees an immediate arrival.
            let mut device = RadioDevice::new(3, 0);
            device.set_frequency(2450).await.expect("simulated radio tunes");
            let mut queue = ReceiveQueue::new();
            let deadline = device.now().plus_ticks(100_000);
            let entry = queue.arm(RX_MAX_PAYLOAD_LENGTH as u8);
            let completion = device.receive(entry, RX_MAX_PAYLOAD_LENGTH as u8, deadline).await.expect("receive accepted");
            assert_eq!(interpret(&completion), RadioOutcome::Done);

            let result = queue.extract(RX_MAX_PAYLOAD_LENGTH as u8).expect("finished entry extracts");
            assert_eq!(result.payload(), &build_packet(0));
        });
    }

    #[test]
    fn peer_sequence_advances_per_delivery() {
        block_on(async {
            let mut device = RadioDevice::new(3, 0);
            device.set_frequency(2450).await.expect("simulated radio tunes");
            let mut queue = ReceiveQueue::new();
            for expected in 0u16..3 {
                let deadline = device.now().plus_ticks(100_000);
                let entry = queue.arm(RX_MAX_PAYLOAD_LENGTH as u8);
                device.receive(entry, RX_MAX_PAYLOAD_LENGTH as u8, deadline).await.expect("receive accepted");
                let result = queue.extract(RX_MAX_PAYLOAD_LENGTH as u8).expect("finished entry extracts");
                assert_eq!(result.payload(), &build_packet(expected));
            }
        });
    }

    #[test]
    fn silent_peer_times_out() {
        block_on(async {
            // An hour between beacons and a 1 ms window: the arrival lands
            // far outside the window.
            let mut device = RadioDevice::new(9, 3600);
            device.set_frequency(2450).await.expect("simulated radio tunes");
            let mut queue = ReceiveQueue::new();
            let deadline = device.now().plus_ticks(1_000);
            let entry = queue.arm(RX_MAX_PAYLOAD_LENGTH as u8);
            let completion = device.receive(entry, RX_MAX_PAYLOAD_LENGTH as u8, deadline).await.expect("receive accepted");
            assert_eq!(interpret(&completion), RadioOutcome::Timeout);
            assert_eq!(queue.entry().status(), EntryStatus::Pending);
        });
    }

    #[test]
    fn transmit_completes_into_the_void() {
        block_on(async {
            let mut device = RadioDevice::new(1, 10);
            device.set_frequency(2450).await.expect("simulated radio tunes");
            let completion = device.transmit(&[1, 2, b'a', b'a']).await.expect("transmit accepted");
            assert_eq!(interpret(&completion), RadioOutcome::Done);
        });
    }
}
