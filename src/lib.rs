//! `korri-slcan` library: a `no_std` LAWICEL/CANHacker (slcan) protocol
//! engine. It turns a microcontroller with a CAN controller into a
//! serial-to-CAN adapter understood by slcan host tools.
//!
//! The crate exposes the infrastructure modules (hex and line codecs), the
//! protocol logic (frame codec, channel state machine, status register,
//! command dispatcher, receive pipeline) and the engine that ties them to
//! the injected controller, host stream and clock.
#![cfg_attr(not(test), no_std)]
//==================================================================================
/// Protocol constants (terminators, line limits, identity literals).
pub mod core;
/// Engine configuration and its builder.
pub mod config;
/// Protocol, controller and configuration errors.
pub mod error;
/// Hex and line codecs operating on fixed-capacity buffers.
pub mod infra;
/// LAWICEL protocol implementation.
pub mod protocol;
//==================================================================================

pub use config::EngineConfig;
pub use error::ErrorKind;
pub use protocol::engine::shared::SharedEngine;
pub use protocol::engine::SlcanEngine;
pub use protocol::transport::can_frame::CanFrame;
