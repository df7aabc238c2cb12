//! # Cycle State Machine
//!
//! Drives the endless half-duplex TX/RX cycle: build and transmit one
//! beacon, then arm the receive buffer and listen for a randomized window,
//! classify the result, loop.
//!
//! ## Cycle Shape
//!
//! ```text
//! TX_PENDING -> TX_DONE        -> RX_ARMED -> RX_DONE / RX_TIMEOUT -> TX_PENDING
//!            \-> TX_ERROR (fatal)         \-> RX_ERROR (fatal)
//! ```
//!
//! There is no terminal state under normal operation. A TX or RX command
//! error is fatal: the radio is in an unknown state and the node must not
//! keep transmitting on it. Instead of spinning in place, [`Transceiver::run`]
//! returns the fault to the caller so the surrounding runtime decides
//! whether to restart the process — the cycle never silently continues past
//! a device fault.
//!
//! Non-fatal receive results (timeout, unclassified status codes, rejected
//! entries) are logged and the cycle continues; a timeout is the designed
//! common case when no peer transmits.

use embassy_time::{Duration, Timer};
use log::{log, Level};
use rand_core::SeedableRng;
use rand_wyrand::WyRand;

use crate::indicators::{IndicatorChannel, Indicators};
use crate::packet::build_packet;
use crate::radio::{interpret, RadioControl, RadioError, RadioOutcome};
use crate::rx_buffer::{ExtractError, ReceiveQueue, ReceiveResult};
use crate::timing::{pick_timeout, rx_deadline};
use crate::TransceiverConfiguration;

/// Fatal device faults that stop the cycle.
#[derive(Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "std", derive(Debug))]
pub enum CycleFault {
    /// The transmit command was never accepted by the radio.
    TxCommandRejected(RadioError),
    /// The radio reported an error event (or no clean completion) while
    /// transmitting.
    TxFailed,
    /// The receive command was never accepted by the radio.
    RxCommandRejected(RadioError),
    /// The radio reported an error event while receiving.
    RxFailed,
}

impl core::fmt::Display for CycleFault {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        match self {
            CycleFault::TxCommandRejected(error) => write!(f, "transmit command not accepted: {}", error),
            CycleFault::TxFailed => f.write_str("radio reported an error while transmitting"),
            CycleFault::RxCommandRejected(error) => write!(f, "receive command not accepted: {}", error),
            CycleFault::RxFailed => f.write_str("radio reported an error while receiving"),
        }
    }
}

#[cfg(feature = "std")]
impl std::error::Error for CycleFault {}

/// Result of one completed (non-fatal) cycle. Drives logging and indicator
/// side effects only; the loop continues unconditionally.
#[cfg_attr(feature = "std", derive(Debug))]
pub enum CycleOutcome {
    /// A packet arrived and was extracted.
    Received(ReceiveResult),
    /// The receive window expired; `listened_secs` is the duration that was
    /// fed into the deadline computation.
    RxTimeout { listened_secs: u32 },
    /// The radio reported a status code with no dedicated handling.
    RxUnclassified { status: u16 },
    /// The command completed but the entry was rejected by the extractor.
    RxDiscarded(ExtractError),
}

/// The half-duplex transceiver: one radio, one receive buffer, one
/// monotonically wrapping sequence counter.
///
/// All state that the reference keeps in process-wide variables (radio
/// handle, receive buffer, sequence counter) lives here so a node is an
/// ordinary value that can be constructed, driven and inspected in tests.
pub struct Transceiver<R: RadioControl, I: Indicators> {
    radio: R,
    indicators: I,
    config: TransceiverConfiguration,
    sequence: u16,
    rx_queue: ReceiveQueue,
    rng: WyRand,
}

impl<R: RadioControl, I: Indicators> Transceiver<R, I> {
    pub fn new(radio: R, indicators: I, config: TransceiverConfiguration, rng_seed: u64) -> Self {
        Transceiver {
            radio,
            indicators,
            config,
            sequence: 0,
            rx_queue: ReceiveQueue::new(),
            rng: WyRand::seed_from_u64(rng_seed),
        }
    }

    /// Runs cycles until the first fatal device fault and returns it.
    ///
    /// The frequency is set once up front; a tuning error is logged and the
    /// cycle starts anyway.
    pub async fn run(&mut self) -> CycleFault {
        match self.radio.set_frequency(self.config.frequency_mhz).await {
            Ok(()) => {
                log!(Level::Info, "Frequency set to {} MHz", self.config.frequency_mhz);
            }
            Err(error) => {
                log!(Level::Warn, "Failed to set frequency to {} MHz: {}", self.config.frequency_mhz, error);
            }
        }

        loop {
            if let Err(fault) = self.run_cycle().await {
                log!(Level::Error, "Transceiver cycle halted: {}", fault);
                return fault;
            }
        }
    }

    /// Executes exactly one TX-then-RX cycle.
    pub async fn run_cycle(&mut self) -> Result<CycleOutcome, CycleFault> {
        self.transmit_beacon().await?;
        self.receive_window().await
    }

    async fn transmit_beacon(&mut self) -> Result<(), CycleFault> {
        self.indicators.toggle(IndicatorChannel::TxActive);

        let tx_packet = build_packet(self.sequence);
        self.sequence = self.sequence.wrapping_add(1);
        log!(Level::Info, "Sending data: {:?}", tx_packet);

        let completion = match self.radio.transmit(&tx_packet).await {
            Ok(completion) => completion,
            Err(error) => return Err(CycleFault::TxCommandRejected(error)),
        };

        if interpret(&completion) != RadioOutcome::Done {
            log!(Level::Error, "Error while sending (status {:#06x})", completion.status);
            return Err(CycleFault::TxFailed);
        }

        self.indicators.toggle(IndicatorChannel::TxActive);

        // Optional pacing before entering RX, for demonstration setups;
        // disabled by default.
        if self.config.inter_cycle_delay_ms > 0 {
            Timer::after(Duration::from_millis(self.config.inter_cycle_delay_ms)).await;
        }
        Ok(())
    }

    async fn receive_window(&mut self) -> Result<CycleOutcome, CycleFault> {
        self.indicators.toggle(IndicatorChannel::RxActive);

        let max_payload = self.config.max_payload_length;
        let timeout_secs = pick_timeout(&mut self.rng, self.config.rx_timeout_min_secs, self.config.rx_timeout_max_secs);
        let deadline = rx_deadline(self.radio.now(), timeout_secs, self.radio.ticks_per_second(), &self.config.deadline_scale);

        let entry = self.rx_queue.arm(max_payload);
        let completion = match self.radio.receive(entry, max_payload, deadline).await {
            Ok(completion) => completion,
            Err(error) => return Err(CycleFault::RxCommandRejected(error)),
        };

        let outcome = match interpret(&completion) {
            RadioOutcome::Error => {
                log!(Level::Error, "Error while receiving (status {:#06x})", completion.status);
                return Err(CycleFault::RxFailed);
            }
            RadioOutcome::Done => match self.rx_queue.extract(max_payload) {
                Ok(result) => {
                    // Blink while reporting reception.
                    self.indicators.toggle(IndicatorChannel::RxActive);
                    log!(Level::Info, "Data received: {:?} (len = {})", result.payload(), result.len());
                    self.indicators.toggle(IndicatorChannel::RxActive);
                    CycleOutcome::Received(result)
                }
                Err(error) => {
                    log!(Level::Warn, "Discarding receive entry: {}", error);
                    CycleOutcome::RxDiscarded(error)
                }
            },
            RadioOutcome::Timeout => {
                log!(Level::Info, "Timeout expired ({} s)", timeout_secs);
                CycleOutcome::RxTimeout { listened_secs: timeout_secs }
            }
            RadioOutcome::Unclassified(status) => {
                log!(Level::Info, "Other reason (code {:#06x})", status);
                CycleOutcome::RxUnclassified { status }
            }
        };

        self.indicators.toggle(IndicatorChannel::RxActive);
        Ok(outcome)
    }
}
