#![cfg_attr(not(feature = "std"), no_std)]
#![allow(async_fn_in_trait)] // We control the usage of this trait

//! # Beacon Transceiver
//!
//! A half-duplex packet-radio endpoint: one node alternating forever between
//! transmitting a fixed-format beacon and listening for an incoming one over
//! a single shared radio front-end.
//!
//! The crate is built around the [`Transceiver`] cycle state machine, which
//! drives a radio device through the [`RadioControl`] command interface:
//! transmit one beacon, arm the single receive data entry, listen for a
//! randomized window, classify the completion, loop. [`TransceiverNode`]
//! wraps the machine in an embassy task and surfaces the terminal fault to
//! the surrounding runtime.

#[cfg(all(feature = "radio-device-echo", feature = "radio-device-simulator"))]
compile_error!("Only one radio device feature can be enabled at a time");

#[cfg(all(not(test), not(any(feature = "radio-device-echo", feature = "radio-device-simulator"))))]
compile_error!("At least one radio device feature must be enabled");

pub mod radio_devices;

mod cycle;
mod indicators;
mod packet;
mod radio;
mod rx_buffer;
mod timing;

use embassy_executor::Spawner;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::signal::Signal;
use log::{log, Level};

pub use cycle::{CycleFault, CycleOutcome, Transceiver};
pub use indicators::{IndicatorChannel, IndicatorPair, Indicators};
pub use packet::{build_packet, BEACON_TAG, TX_PAYLOAD_LENGTH};
pub use radio::{
    interpret, CommandCompletion, EventMask, RadioControl, RadioError, RadioInstant, RadioOutcome, STATUS_DONE_OK, STATUS_RX_BUFFER_OVERFLOW,
    STATUS_RX_TIMEOUT,
};
pub use rx_buffer::{DataEntry, EntryStatus, ExtractError, ReceiveQueue, ReceiveResult, ENTRY_DATA_CAPACITY};
pub use timing::DeadlineScale;

#[cfg(any(feature = "radio-device-echo", feature = "radio-device-simulator"))]
pub use radio_devices::RadioDevice;

//Hardware dependent constants, that affect compatibility between two nodes
/// Maximum payload length in bytes the radio will accept.
pub const RX_MAX_PAYLOAD_LENGTH: usize = 30;
/// Header/status bytes the radio appends around the payload in a data entry.
pub const NUM_APPENDED_BYTES: usize = 2;

/// Configuration for one transceiver node.
///
/// Carries the boundary values the cycle accepts as configuration; the
/// defaults are the reference deployment values.
pub struct TransceiverConfiguration {
    /// Operating frequency in MHz.
    pub frequency_mhz: u16,
    /// Maximum accepted receive payload in bytes; clamped to
    /// [`RX_MAX_PAYLOAD_LENGTH`].
    pub max_payload_length: u8,
    /// Minimum receive window duration in seconds (inclusive).
    pub rx_timeout_min_secs: u32,
    /// Maximum receive window duration in seconds (exclusive).
    pub rx_timeout_max_secs: u32,
    /// Scale applied to the nominal tick rate when computing receive
    /// deadlines. The default halves the listen window, matching the
    /// reference firmware.
    pub deadline_scale: DeadlineScale,
    /// Pacing delay after each transmission in milliseconds, for
    /// demonstration setups. 0 disables it.
    pub inter_cycle_delay_ms: u64,
}

impl Default for TransceiverConfiguration {
    fn default() -> Self {
        TransceiverConfiguration {
            frequency_mhz: 2450,
            max_payload_length: RX_MAX_PAYLOAD_LENGTH as u8,
            rx_timeout_min_secs: 3,
            rx_timeout_max_secs: 7,
            deadline_scale: DeadlineScale::default(),
            inter_cycle_delay_ms: 0,
        }
    }
}

type FaultSignal = Signal<CriticalSectionRawMutex, CycleFault>;

#[cfg(all(feature = "embedded", any(feature = "radio-device-echo", feature = "radio-device-simulator")))]
static FAULT_SIGNAL: FaultSignal = Signal::new();

pub enum FaultWaitError {
    NotInited,
}

enum TransceiverNodeState {
    Uninitialized,
    Running { fault_signal: &'static FaultSignal },
}

/// Owns one transceiver's lifecycle: spawns the cycle task and exposes the
/// terminal fault.
///
/// The cycle itself never silently stops; when [`TransceiverNode::wait_fault`]
/// resolves, the radio reported a fatal fault and the node has ceased all
/// protocol activity. The surrounding runtime decides whether to restart the
/// process.
pub struct TransceiverNode {
    state: TransceiverNodeState,
}

impl TransceiverNode {
    pub const fn new() -> Self {
        TransceiverNode {
            state: TransceiverNodeState::Uninitialized,
        }
    }

    #[cfg(all(feature = "embedded", any(feature = "radio-device-echo", feature = "radio-device-simulator")))]
    pub fn initialize(
        &mut self,
        config: TransceiverConfiguration,
        spawner: Spawner,
        radio_device: RadioDevice,
        indicators: IndicatorPair,
        rng_seed: u64,
    ) -> Result<(), ()> {
        self.initialize_common(config, spawner, radio_device, indicators, rng_seed, &FAULT_SIGNAL)
    }

    #[cfg(all(feature = "std", any(feature = "radio-device-echo", feature = "radio-device-simulator")))]
    pub fn initialize(
        &mut self,
        config: TransceiverConfiguration,
        spawner: Spawner,
        radio_device: RadioDevice,
        indicators: IndicatorPair,
        rng_seed: u64,
    ) -> Result<(), ()> {
        let fault_signal_temp: FaultSignal = Signal::new();
        let fault_signal_static: &'static FaultSignal = Box::leak(Box::new(fault_signal_temp));
        self.initialize_common(config, spawner, radio_device, indicators, rng_seed, fault_signal_static)
    }

    #[cfg(any(feature = "radio-device-echo", feature = "radio-device-simulator"))]
    fn initialize_common(
        &mut self,
        config: TransceiverConfiguration,
        spawner: Spawner,
        radio_device: RadioDevice,
        indicators: IndicatorPair,
        rng_seed: u64,
        fault_signal: &'static FaultSignal,
    ) -> Result<(), ()> {
        let task_result = spawner.spawn(transceiver_task(radio_device, indicators, config, rng_seed, fault_signal));
        if task_result.is_err() {
            return Err(());
        }
        log!(Level::Debug, "Transceiver cycle task spawned");

        self.state = TransceiverNodeState::Running { fault_signal };
        Ok(())
    }

    /// Resolves when the cycle stops on a fatal device fault.
    pub async fn wait_fault(&self) -> Result<CycleFault, FaultWaitError> {
        match &self.state {
            TransceiverNodeState::Uninitialized => Err(FaultWaitError::NotInited),
            TransceiverNodeState::Running { fault_signal } => Ok(fault_signal.wait().await),
        }
    }
}

/// The transceiver cycle as an embassy task: runs until the first fatal
/// device fault, then forwards it into the fault signal and ends.
#[cfg(any(feature = "radio-device-echo", feature = "radio-device-simulator"))]
#[embassy_executor::task]
async fn transceiver_task(
    radio_device: RadioDevice,
    indicators: IndicatorPair,
    config: TransceiverConfiguration,
    rng_seed: u64,
    fault_signal: &'static FaultSignal,
) {
    let mut transceiver = Transceiver::new(radio_device, indicators, config, rng_seed);
    let fault = transceiver.run().await;
    fault_signal.signal(fault);
}
