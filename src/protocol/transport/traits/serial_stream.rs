//! Byte-stream transport towards the host (USB CDC, UART...).
//! Writes are best effort: the engine turns failures into a status bit.

/// Outgoing byte stream.
pub trait SerialStream {
    type Error: core::fmt::Debug;

    /// Write a whole line.
    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error>;

    /// Write a single byte (error indicator).
    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        self.write(&[byte])
    }
}

impl<T: SerialStream + ?Sized> SerialStream for &mut T {
    type Error = T::Error;

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        (**self).write(bytes)
    }

    fn write_byte(&mut self, byte: u8) -> Result<(), Self::Error> {
        (**self).write_byte(byte)
    }
}

/// Debug sink discarding everything, for builds without a debug stream.
#[derive(Debug, Default, Clone, Copy)]
pub struct NoDebug;

impl core::fmt::Write for NoDebug {
    fn write_str(&mut self, _s: &str) -> core::fmt::Result {
        Ok(())
    }
}
