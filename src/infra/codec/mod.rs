//! Bounds-checked primitives used by the frame codec and the dispatcher.
pub mod hex;
pub mod line;
