//! In-crate doubles for unit tests.
use std::collections::VecDeque;
use std::string::String;
use std::vec::Vec;

use crate::config::EngineConfig;
use crate::error::ControllerFault;
use crate::protocol::config::BitrateSetting;
use crate::protocol::engine::SlcanEngine;
use crate::protocol::transport::can_frame::CanFrame;
use crate::protocol::transport::traits::can_controller::{
    Backend, BusMode, CanController, InterruptFlags,
};
use crate::protocol::transport::traits::millis_clock::MillisClock;
use crate::protocol::transport::traits::serial_stream::SerialStream;
use core::cell::Cell;
use embassy_time::Instant;

/// SPI-flavoured controller recording every call.
#[derive(Debug)]
pub struct MockController {
    pub init_calls: Vec<(BitrateSetting, BusMode)>,
    pub init_result: Result<(), ControllerFault>,
    pub close_calls: usize,
    pub sent: Vec<CanFrame>,
    pub send_result: Result<(), ControllerFault>,
    pub rx_queue: VecDeque<CanFrame>,
    pub dropped: u32,
    pub filter_codes: Vec<u32>,
    pub filter_masks: Vec<u32>,
    pub filter_result: Result<(), ControllerFault>,
    pub interrupts: InterruptFlags,
    pub error_capture: u8,
}

impl MockController {
    pub fn new() -> Self {
        Self {
            init_calls: Vec::new(),
            init_result: Ok(()),
            close_calls: 0,
            sent: Vec::new(),
            send_result: Ok(()),
            rx_queue: VecDeque::new(),
            dropped: 0,
            filter_codes: Vec::new(),
            filter_masks: Vec::new(),
            filter_result: Ok(()),
            interrupts: InterruptFlags::empty(),
            error_capture: 0,
        }
    }
}

impl CanController for MockController {
    const BACKEND: Backend = Backend::SpiAttached;

    fn init(&mut self, bitrate: BitrateSetting, mode: BusMode) -> Result<(), ControllerFault> {
        self.init_calls.push((bitrate, mode));
        self.init_result
    }

    fn close(&mut self) -> Result<(), ControllerFault> {
        self.close_calls += 1;
        Ok(())
    }

    fn send(&mut self, frame: &CanFrame) -> Result<(), ControllerFault> {
        self.send_result?;
        self.sent.push(*frame);
        Ok(())
    }

    fn try_receive(&mut self) -> Result<Option<CanFrame>, ControllerFault> {
        Ok(self.rx_queue.pop_front())
    }

    fn take_dropped(&mut self) -> u32 {
        core::mem::take(&mut self.dropped)
    }

    fn set_filter(&mut self, code: u32) -> Result<(), ControllerFault> {
        self.filter_result?;
        self.filter_codes.push(code);
        Ok(())
    }

    fn set_filter_mask(&mut self, mask: u32) -> Result<(), ControllerFault> {
        self.filter_result?;
        self.filter_masks.push(mask);
        Ok(())
    }

    fn interrupt_flags(&mut self) -> Result<InterruptFlags, ControllerFault> {
        Ok(core::mem::replace(&mut self.interrupts, InterruptFlags::empty()))
    }

    fn read_error_capture(&mut self) -> Result<u8, ControllerFault> {
        Ok(self.error_capture)
    }
}

/// Engine over the doubles above, with a `String` debug sink.
pub type TestEngine = SlcanEngine<MockController, MockStream, MockClock, String>;

pub fn engine() -> TestEngine {
    SlcanEngine::with_debug(
        MockController::new(),
        MockStream::default(),
        MockClock::at(0),
        String::new(),
        EngineConfig::default(),
    )
}

/// Run `line` and return what was written to the host for it.
pub fn exchange(engine: &mut TestEngine, line: &[u8]) -> Vec<u8> {
    engine.stream_mut().output.clear();
    engine.receive_command(line).ok();
    core::mem::take(&mut engine.stream_mut().output)
}

/// Stream capturing everything written.
#[derive(Debug, Default)]
pub struct MockStream {
    pub output: Vec<u8>,
}

impl SerialStream for MockStream {
    type Error = ();

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.output.extend_from_slice(bytes);
        Ok(())
    }
}

/// Manually advanced clock.
#[derive(Debug, Default)]
pub struct MockClock {
    pub millis: Cell<u64>,
}

impl MockClock {
    pub fn at(millis: u64) -> Self {
        Self {
            millis: Cell::new(millis),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.set(millis);
    }
}

impl MillisClock for MockClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.millis.get())
    }
}
