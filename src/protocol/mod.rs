//! LAWICEL protocol: frame codec, channel state, configuration, status and
//! the engine tying them to the host stream and the CAN controller.
pub mod channel;
pub mod codec;
pub mod config;
pub mod dispatcher;
pub mod engine;
pub mod receive;
pub mod status;
pub mod timestamp;
pub mod transport;

#[cfg(test)]
pub(crate) mod test_support;
