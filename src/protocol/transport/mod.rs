//! Transport layer: the binary CAN frame and the collaborator traits
//! (controller, host stream, clock) the engine is generic over.
pub mod can_frame;
pub mod traits;
