//! Test doubles simulating the CAN controller, the host stream and the clock
//! during integration tests.
use korri_slcan::error::ControllerFault;
use korri_slcan::protocol::config::BitrateSetting;
use korri_slcan::protocol::transport::{
    can_frame::CanFrame,
    traits::{
        can_controller::{Backend, BusMode, CanController, InterruptFlags},
        millis_clock::MillisClock,
        serial_stream::SerialStream,
    },
};
use korri_slcan::{EngineConfig, SlcanEngine};

use embassy_time::Instant;
use std::marker::PhantomData;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use tokio::sync::mpsc::{self, error::TryRecvError};

//==================================================================================BUS
/// One node's connection to an in-memory CAN bus.
pub struct BusPort {
    tx: mpsc::UnboundedSender<CanFrame>,
    rx: mpsc::UnboundedReceiver<CanFrame>,
}

#[allow(dead_code)]
impl BusPort {
    /// Two interconnected ports (adapter ↔ remote node).
    pub fn create_pair() -> (Self, Self) {
        let (a_tx, b_rx) = mpsc::unbounded_channel();
        let (b_tx, a_rx) = mpsc::unbounded_channel();
        (Self { tx: a_tx, rx: a_rx }, Self { tx: b_tx, rx: b_rx })
    }

    pub fn send(&self, frame: CanFrame) {
        self.tx.send(frame).expect("peer port dropped");
    }

    pub fn try_recv(&mut self) -> Option<CanFrame> {
        match self.rx.try_recv() {
            Ok(frame) => Some(frame),
            Err(TryRecvError::Empty) | Err(TryRecvError::Disconnected) => None,
        }
    }
}

//==================================================================================CONTROLLER
/// Controller family selected at the type level.
pub trait Family {
    const BACKEND: Backend;
}

pub struct Spi;
#[allow(dead_code)]
pub struct OnChip;

impl Family for Spi {
    const BACKEND: Backend = Backend::SpiAttached;
}

impl Family for OnChip {
    const BACKEND: Backend = Backend::OnChip;
}

/// Controller attached to a [`BusPort`], recording configuration calls.
#[allow(dead_code)]
pub struct MockController<F: Family> {
    pub bus: BusPort,
    pub on_bus: bool,
    pub inits: Vec<(BitrateSetting, BusMode)>,
    pub init_fault: Option<ControllerFault>,
    pub filter: (u32, u32),
    pub interrupts: InterruptFlags,
    pub dropped: u32,
    pub error_capture: u8,
    _family: PhantomData<F>,
}

#[allow(dead_code)]
impl<F: Family> MockController<F> {
    pub fn new(bus: BusPort) -> Self {
        Self {
            bus,
            on_bus: false,
            inits: Vec::new(),
            init_fault: None,
            filter: (0, 0xFFFF_FFFF),
            interrupts: InterruptFlags::empty(),
            dropped: 0,
            error_capture: 0,
            _family: PhantomData,
        }
    }
}

impl<F: Family> CanController for MockController<F> {
    const BACKEND: Backend = F::BACKEND;

    fn init(&mut self, bitrate: BitrateSetting, mode: BusMode) -> Result<(), ControllerFault> {
        self.inits.push((bitrate, mode));
        if let Some(fault) = self.init_fault {
            return Err(fault);
        }
        self.on_bus = true;
        Ok(())
    }

    fn close(&mut self) -> Result<(), ControllerFault> {
        self.on_bus = false;
        Ok(())
    }

    fn send(&mut self, frame: &CanFrame) -> Result<(), ControllerFault> {
        if !self.on_bus {
            return Err(ControllerFault::Send);
        }
        self.bus.send(*frame);
        Ok(())
    }

    fn try_receive(&mut self) -> Result<Option<CanFrame>, ControllerFault> {
        Ok(self.bus.try_recv())
    }

    fn take_dropped(&mut self) -> u32 {
        std::mem::take(&mut self.dropped)
    }

    fn set_filter(&mut self, code: u32) -> Result<(), ControllerFault> {
        self.filter.0 = code;
        Ok(())
    }

    fn set_filter_mask(&mut self, mask: u32) -> Result<(), ControllerFault> {
        self.filter.1 = mask;
        Ok(())
    }

    fn interrupt_flags(&mut self) -> Result<InterruptFlags, ControllerFault> {
        Ok(std::mem::replace(&mut self.interrupts, InterruptFlags::empty()))
    }

    fn read_error_capture(&mut self) -> Result<u8, ControllerFault> {
        Ok(self.error_capture)
    }
}

//==================================================================================HOST
/// Host side of the serial link; clones share the same buffer.
#[derive(Clone, Default)]
pub struct HostLink {
    received: Arc<Mutex<Vec<u8>>>,
}

#[allow(dead_code)]
impl HostLink {
    /// Everything written since the previous call.
    pub fn take(&self) -> Vec<u8> {
        std::mem::take(&mut *self.received.lock().unwrap())
    }
}

impl SerialStream for HostLink {
    type Error = ();

    fn write(&mut self, bytes: &[u8]) -> Result<(), Self::Error> {
        self.received.lock().unwrap().extend_from_slice(bytes);
        Ok(())
    }
}

//==================================================================================CLOCK
/// Manually advanced millisecond clock; clones share the same time.
#[derive(Clone, Default)]
pub struct ManualClock {
    millis: Arc<AtomicU64>,
}

#[allow(dead_code)]
impl ManualClock {
    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }

    pub fn advance(&self, millis: u64) {
        self.millis.fetch_add(millis, Ordering::SeqCst);
    }
}

impl MillisClock for ManualClock {
    fn now(&self) -> Instant {
        Instant::from_millis(self.millis.load(Ordering::SeqCst))
    }
}

//==================================================================================FIXTURE
pub type Adapter<F> = SlcanEngine<MockController<F>, HostLink, ManualClock>;

/// Adapter under test plus handles on its collaborators.
#[allow(dead_code)]
pub struct Rig<F: Family> {
    pub adapter: Adapter<F>,
    pub host: HostLink,
    pub clock: ManualClock,
    pub remote: BusPort,
}

#[allow(dead_code)]
impl<F: Family> Rig<F> {
    pub fn new() -> Self {
        let (adapter_port, remote) = BusPort::create_pair();
        let host = HostLink::default();
        let clock = ManualClock::default();
        let adapter = SlcanEngine::new(
            MockController::new(adapter_port),
            host.clone(),
            clock.clone(),
            EngineConfig::default(),
        );
        Self {
            adapter,
            host,
            clock,
            remote,
        }
    }

    /// Send one command line and return the adapter's answer.
    pub fn command(&mut self, line: &[u8]) -> Vec<u8> {
        self.adapter.receive_command(line).ok();
        self.host.take()
    }
}
