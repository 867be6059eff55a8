//! Engine shared between the main loop and the controller interrupt.
//!
//! The main loop feeds host commands and polls; the interrupt handler calls
//! [`SharedEngine::process_interrupt`]. Every entry runs inside the blocking
//! mutex `M`, so with `CriticalSectionRawMutex` the two contexts never
//! interleave. Closures passed to [`SharedEngine::lock`] must not re-enter
//! the same `SharedEngine`.
use core::cell::RefCell;
use core::fmt::Write;

use embassy_sync::blocking_mutex::raw::RawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::error::ErrorKind;
use crate::protocol::transport::traits::can_controller::CanController;
use crate::protocol::transport::traits::millis_clock::MillisClock;
use crate::protocol::transport::traits::serial_stream::{NoDebug, SerialStream};

use super::SlcanEngine;

pub struct SharedEngine<M: RawMutex, C, S, K, D = NoDebug> {
    inner: Mutex<M, RefCell<SlcanEngine<C, S, K, D>>>,
}

impl<M, C, S, K, D> SharedEngine<M, C, S, K, D>
where
    M: RawMutex,
    C: CanController,
    S: SerialStream,
    K: MillisClock,
    D: Write,
{
    pub const fn new(engine: SlcanEngine<C, S, K, D>) -> Self {
        Self {
            inner: Mutex::new(RefCell::new(engine)),
        }
    }

    /// Run `f` with exclusive access to the engine.
    pub fn lock<R>(&self, f: impl FnOnce(&mut SlcanEngine<C, S, K, D>) -> R) -> R {
        self.inner.lock(|engine| f(&mut engine.borrow_mut()))
    }

    pub fn receive_command(&self, line: &[u8]) -> Result<(), ErrorKind> {
        self.lock(|engine| engine.receive_command(line))
    }

    pub fn poll_receive(&self) -> Result<(), ErrorKind> {
        self.lock(|engine| engine.poll_receive())
    }

    /// Entry point for the controller interrupt handler.
    pub fn process_interrupt(&self) -> Result<(), ErrorKind> {
        self.lock(|engine| engine.process_interrupt())
    }

    pub fn into_inner(self) -> SlcanEngine<C, S, K, D> {
        self.inner.into_inner().into_inner()
    }
}
