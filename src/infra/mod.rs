//! Low-level infrastructure: ASCII hex codec and fixed-capacity line buffers.
pub mod codec;
