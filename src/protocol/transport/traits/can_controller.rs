//! Synchronous contract with the CAN controller driver (SPI-attached
//! MCP2515-class chip or on-chip peripheral). Every call returns at once;
//! the engine never waits on the bus.
use bitflags::bitflags;

use crate::error::{Capability, ControllerFault};
use crate::protocol::config::BitrateSetting;
use crate::protocol::transport::can_frame::CanFrame;

/// Hardware family behind a [`CanController`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Backend {
    /// External controller on SPI (MCP2515 and friends).
    SpiAttached,
    /// Controller integrated in the MCU (ESP32 TWAI, bxCAN...).
    OnChip,
}

bitflags! {
    /// Optional features offered by a backend.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Capabilities: u8 {
        const RAW_BITRATE = 1 << 0;
        const ERROR_CAPTURE = 1 << 1;
        const ARBITRATION_LOST_CAPTURE = 1 << 2;
        const REGISTER_ACCESS = 1 << 3;
    }
}

impl Capabilities {
    /// Flag matching a single [`Capability`].
    pub const fn of(capability: Capability) -> Self {
        match capability {
            Capability::RawBitrate => Self::RAW_BITRATE,
            Capability::ErrorCapture => Self::ERROR_CAPTURE,
            Capability::ArbitrationLostCapture => Self::ARBITRATION_LOST_CAPTURE,
            Capability::RegisterAccess => Self::REGISTER_ACCESS,
        }
    }

    pub const fn supports(self, capability: Capability) -> bool {
        self.contains(Self::of(capability))
    }
}

impl Backend {
    /// Default capability set of the family.
    ///
    /// The SPI controller exposes its BTR-style timing registers and an error
    /// flag register. The on-chip peripheral only takes preset speeds.
    pub const fn capabilities(self) -> Capabilities {
        match self {
            Backend::SpiAttached => Capabilities::RAW_BITRATE.union(Capabilities::ERROR_CAPTURE),
            Backend::OnChip => Capabilities::empty(),
        }
    }
}

bitflags! {
    /// Pending conditions reported when the controller raises its interrupt line.
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct InterruptFlags: u8 {
        /// At least one frame waits in a receive buffer.
        const RX_PENDING = 1 << 0;
        /// A receive buffer overflowed and a frame was lost.
        const RX_OVERRUN = 1 << 1;
        /// Error interrupt (error counters crossed a threshold).
        const ERROR = 1 << 2;
        /// Message error during transmission or reception.
        const MESSAGE_ERROR = 1 << 3;
        /// Controller entered error-passive state.
        const ERROR_PASSIVE = 1 << 4;
        /// Arbitration was lost on a pending transmission.
        const ARBITRATION_LOST = 1 << 5;
        /// Bus activity woke the controller up.
        const WAKE = 1 << 6;
    }
}

/// Operating mode requested at open time.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BusMode {
    Normal,
    ListenOnly,
    Loopback,
}

/// Contract with the CAN controller driver.
pub trait CanController {
    /// Hardware family, selects the default capability set.
    const BACKEND: Backend;

    /// Capabilities actually available on this instance.
    fn capabilities(&self) -> Capabilities {
        Self::BACKEND.capabilities()
    }

    /// Reset the controller, apply the bitrate and enter `mode`.
    fn init(&mut self, bitrate: BitrateSetting, mode: BusMode) -> Result<(), ControllerFault>;

    /// Leave the bus (configuration or sleep mode).
    fn close(&mut self) -> Result<(), ControllerFault>;

    /// Queue one frame for transmission.
    fn send(&mut self, frame: &CanFrame) -> Result<(), ControllerFault>;

    /// Pop at most one received frame.
    fn try_receive(&mut self) -> Result<Option<CanFrame>, ControllerFault>;

    /// Read and clear the number of frames dropped because of backlog.
    fn take_dropped(&mut self) -> u32 {
        0
    }

    /// Program the acceptance code register.
    fn set_filter(&mut self, code: u32) -> Result<(), ControllerFault>;

    /// Program the acceptance mask register.
    fn set_filter_mask(&mut self, mask: u32) -> Result<(), ControllerFault>;

    /// Read and acknowledge pending interrupt conditions.
    fn interrupt_flags(&mut self) -> Result<InterruptFlags, ControllerFault>;

    /// Error capture register. Only called with [`Capabilities::ERROR_CAPTURE`].
    fn read_error_capture(&mut self) -> Result<u8, ControllerFault> {
        Err(ControllerFault::Read)
    }

    /// Arbitration lost capture register. Only called with
    /// [`Capabilities::ARBITRATION_LOST_CAPTURE`].
    fn read_arbitration_lost(&mut self) -> Result<u8, ControllerFault> {
        Err(ControllerFault::Read)
    }

    /// Raw register read. Only called with [`Capabilities::REGISTER_ACCESS`].
    fn read_register(&mut self, _address: u8) -> Result<u8, ControllerFault> {
        Err(ControllerFault::Read)
    }

    /// Raw register write. Only called with [`Capabilities::REGISTER_ACCESS`].
    fn write_register(&mut self, _address: u8, _value: u8) -> Result<(), ControllerFault> {
        Err(ControllerFault::InitConfig)
    }
}

impl<T: CanController + ?Sized> CanController for &mut T {
    const BACKEND: Backend = T::BACKEND;

    fn capabilities(&self) -> Capabilities {
        (**self).capabilities()
    }
    fn init(&mut self, bitrate: BitrateSetting, mode: BusMode) -> Result<(), ControllerFault> {
        (**self).init(bitrate, mode)
    }
    fn close(&mut self) -> Result<(), ControllerFault> {
        (**self).close()
    }
    fn send(&mut self, frame: &CanFrame) -> Result<(), ControllerFault> {
        (**self).send(frame)
    }
    fn try_receive(&mut self) -> Result<Option<CanFrame>, ControllerFault> {
        (**self).try_receive()
    }
    fn take_dropped(&mut self) -> u32 {
        (**self).take_dropped()
    }
    fn set_filter(&mut self, code: u32) -> Result<(), ControllerFault> {
        (**self).set_filter(code)
    }
    fn set_filter_mask(&mut self, mask: u32) -> Result<(), ControllerFault> {
        (**self).set_filter_mask(mask)
    }
    fn interrupt_flags(&mut self) -> Result<InterruptFlags, ControllerFault> {
        (**self).interrupt_flags()
    }
    fn read_error_capture(&mut self) -> Result<u8, ControllerFault> {
        (**self).read_error_capture()
    }
    fn read_arbitration_lost(&mut self) -> Result<u8, ControllerFault> {
        (**self).read_arbitration_lost()
    }
    fn read_register(&mut self, address: u8) -> Result<u8, ControllerFault> {
        (**self).read_register(address)
    }
    fn write_register(&mut self, address: u8, value: u8) -> Result<(), ControllerFault> {
        (**self).write_register(address, value)
    }
}
