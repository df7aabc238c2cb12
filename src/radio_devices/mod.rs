//! Radio device implementations
//!
//! This module contains the radio devices that can drive the transceiver
//! cycle through the [`RadioControl`](crate::RadioControl) contract:
//!
//! - `echo`: loopback device that hands transmitted beacons back on the
//!   next receive window; hardware-free testing of the full data path
//! - `simulator`: simulated remote peer beaconing at randomized intervals,
//!   exercising both the data path and the timeout path
//!
//! A hardware implementation would live here as another feature-gated
//! module wrapping the chip's command interface behind the same trait.

#[cfg(feature = "radio-device-echo")]
pub mod echo;

#[cfg(feature = "radio-device-simulator")]
pub mod simulator;

// Re-export the active radio device implementation
#[cfg(feature = "radio-device-echo")]
pub use echo::RadioDevice;

#[cfg(feature = "radio-device-simulator")]
pub use simulator::RadioDevice;
