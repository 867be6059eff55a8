//! # Host Session Example
//!
//! Walks through a typical slcan session against a virtual adapter:
//! - Query identity (`V`, `N`)
//! - Configure bitrate and timestamps, open the channel
//! - Transmit a frame, then receive one from the "bus"
//! - Read the status register and close
//!
//! This example uses `std` for a quick trial run.
//!
//! ```bash
//! cargo run --example host_session
//! ```

use std::collections::VecDeque;
use std::time::Instant as StdInstant;

use embassy_time::Instant;
use korri_slcan::error::ControllerFault;
use korri_slcan::infra::codec::line::LineReader;
use korri_slcan::protocol::config::BitrateSetting;
use korri_slcan::protocol::transport::traits::{
    can_controller::{Backend, BusMode, CanController, InterruptFlags},
    millis_clock::MillisClock,
    serial_stream::SerialStream,
};
use korri_slcan::{CanFrame, EngineConfig, SlcanEngine};

/// Controller keeping transmitted frames and serving queued ones.
#[derive(Default)]
struct VirtualController {
    sent: Vec<CanFrame>,
    incoming: VecDeque<CanFrame>,
}

impl CanController for VirtualController {
    const BACKEND: Backend = Backend::SpiAttached;

    fn init(&mut self, bitrate: BitrateSetting, mode: BusMode) -> Result<(), ControllerFault> {
        println!("   [controller] init {:?} in {:?} mode", bitrate, mode);
        Ok(())
    }

    fn close(&mut self) -> Result<(), ControllerFault> {
        println!("   [controller] close");
        Ok(())
    }

    fn send(&mut self, frame: &CanFrame) -> Result<(), ControllerFault> {
        println!("   [controller] send id {:#X} data {:02X?}", frame.raw_id(), frame.data());
        self.sent.push(*frame);
        Ok(())
    }

    fn try_receive(&mut self) -> Result<Option<CanFrame>, ControllerFault> {
        Ok(self.incoming.pop_front())
    }

    fn set_filter(&mut self, _code: u32) -> Result<(), ControllerFault> {
        Ok(())
    }

    fn set_filter_mask(&mut self, _mask: u32) -> Result<(), ControllerFault> {
        Ok(())
    }

    fn interrupt_flags(&mut self) -> Result<InterruptFlags, ControllerFault> {
        Ok(InterruptFlags::empty())
    }
}

/// Prints what the adapter answers, with CR and BEL made visible.
struct Console;

impl SerialStream for Console {
    type Error = ();

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        let shown: String = bytes
            .iter()
            .map(|&b| match b {
                b'\r' => "<CR>".to_string(),
                0x07 => "<BEL>".to_string(),
                other => char::from(other).to_string(),
            })
            .collect();
        println!("   <- {}", shown);
        Ok(())
    }
}

/// Wall clock measured from program start.
struct WallClock(StdInstant);

impl MillisClock for WallClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.0.elapsed().as_millis() as u64)
    }
}

fn main() {
    println!("=== korri-slcan Host Session ===\n");

    let config = EngineConfig::builder()
        .serial_number(*b"DEMO")
        .build()
        .expect("valid identity");
    let mut adapter = SlcanEngine::new(
        VirtualController::default(),
        Console,
        WallClock(StdInstant::now()),
        config,
    );
    let mut reader = LineReader::<26>::new();

    // ======================================================================
    // 1. Identity and configuration
    // ======================================================================
    println!("1. Identity and configuration");
    for line in ["V\r", "N\r", "S6\r", "Z1\r", "O\r"] {
        println!("   -> {}", line.trim_end());
        adapter.receive_bytes(&mut reader, line.as_bytes());
    }
    println!();

    // ======================================================================
    // 2. Transmit a frame (bytes may arrive in several chunks)
    // ======================================================================
    println!("2. Transmit t1232AABB");
    adapter.receive_bytes(&mut reader, b"t1232A");
    adapter.receive_bytes(&mut reader, b"ABB\r");
    println!();

    // ======================================================================
    // 3. A frame arrives from the bus
    // ======================================================================
    println!("3. Receive a frame from the bus");
    adapter
        .controller_mut()
        .incoming
        .push_back(CanFrame::extended(0x18FE_F100, &[0x01, 0x02, 0x03]).expect("valid frame"));
    if let Err(error) = adapter.poll_receive() {
        eprintln!("   receive failed: {}", error);
    }
    println!();

    // ======================================================================
    // 4. Errors, status and close
    // ======================================================================
    println!("4. Errors, status and close");
    for line in ["O\r", "x\r", "F\r", "C\r"] {
        println!("   -> {}", line.trim_end());
        adapter.receive_bytes(&mut reader, line.as_bytes());
    }

    let (controller, ..) = adapter.into_parts();
    println!("\n   frames sent on the bus: {}", controller.sent.len());
}
