//! Collaborator traits: CAN controller, host byte stream and clock.
pub mod can_controller;
pub mod millis_clock;
pub mod serial_stream;
