//! Standalone beacon transceiver node.
//!
//! Runs the TX/RX cycle on the echo radio device so the full data path is
//! observable without hardware. The process logs every cycle step and exits
//! only if the radio reports a fatal fault.

use beacon_transceiver::{IndicatorPair, RadioDevice, TransceiverConfiguration, TransceiverNode};
use embassy_executor::Spawner;
use env_logger::Builder;
use log::LevelFilter;
use log::{log, Level};

#[embassy_executor::main]
async fn main(spawner: Spawner) {
    Builder::new().filter_level(LevelFilter::Info).init();

    log!(Level::Info, "Beacon transceiver starting");

    let radio_device = RadioDevice::new();
    let indicators = IndicatorPair::new();

    let rng_seed = std::time::UNIX_EPOCH
        .elapsed()
        .map(|elapsed| elapsed.as_nanos() as u64)
        .unwrap_or(0x6265_6163_6f6e);

    let mut node = TransceiverNode::new();
    let configuration = TransceiverConfiguration::default();
    if node.initialize(configuration, spawner, radio_device, indicators, rng_seed).is_err() {
        log!(Level::Error, "Error initializing transceiver node");
        return;
    }

    match node.wait_fault().await {
        Ok(fault) => log!(Level::Error, "Transceiver halted: {}", fault),
        Err(_) => log!(Level::Error, "Transceiver node is not initialized"),
    }
}
