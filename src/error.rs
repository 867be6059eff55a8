//! Error definitions shared across library modules.
//! Every command processed by the engine terminates with `Ok(())` or exactly
//! one [`ErrorKind`]; the wire only ever sees a BEL for the latter.
use thiserror_no_std::Error;

//==================================================================================ERROR_KIND
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Outcome of a failed protocol operation.
pub enum ErrorKind {
    /// The channel is already open (`O`/`L` twice, configuration while open).
    #[error("CAN channel already open")]
    Connected,
    /// The operation needs an open channel.
    #[error("CAN channel not open")]
    NotConnected,
    /// The leading command byte is not part of the protocol.
    #[error("Unknown command")]
    UnknownCommand,
    /// The command byte is known but the line does not match its grammar.
    #[error("Invalid command")]
    InvalidCommand,
    /// A line or a frame exceeds its fixed capacity.
    #[error("Buffer overflow")]
    BufferOverflow,
    /// Transmission refused because the channel was opened with `L`.
    #[error("Listen-only mode forbids transmission")]
    ListenOnly,
    /// The attached controller backend has no equivalent for this command.
    #[error("Unsupported by controller backend: {0:?}")]
    Unsupported(Capability),
    /// Fault reported by the CAN controller collaborator.
    #[error("Controller fault: {0}")]
    Controller(#[from] ControllerFault),
}

impl ErrorKind {
    /// Grammar and state errors are resolved inside the dispatcher and never
    /// reach the controller.
    pub fn is_protocol_error(&self) -> bool {
        !matches!(self, ErrorKind::Controller(_))
    }
}

//==================================================================================CONTROLLER_FAULT
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Faults surfaced verbatim by the CAN controller.
///
/// The SPI-attached backend (MCP2515 class) can report all of them. The
/// on-chip backend only reports `InitBitrate` and `Send`.
pub enum ControllerFault {
    /// Controller reset or wake-up failed.
    #[error("Controller initialisation failed")]
    Init,
    /// Entering configuration mode failed.
    #[error("Controller refused configuration mode")]
    InitConfig,
    /// The configured bitrate (preset or raw BTR pair) was refused.
    #[error("Controller refused bitrate")]
    InitBitrate,
    /// Switching to normal, listen-only or loopback mode failed.
    #[error("Controller refused operating mode")]
    InitSetMode,
    /// Frame could not be queued for transmission.
    #[error("Controller send failed")]
    Send,
    /// Reading a received frame or register failed.
    #[error("Controller read failed")]
    Read,
    /// Acceptance code or mask was refused.
    #[error("Controller refused filter")]
    Filter,
    /// Error interrupt flag raised by the controller.
    #[error("Controller error interrupt")]
    Errif,
    /// Message error interrupt flag raised by the controller.
    #[error("Controller message error interrupt")]
    Merrf,
}

//==================================================================================CAPABILITY
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Optional controller features a backend may lack.
pub enum Capability {
    /// Raw BTR0/BTR1 timing registers (`s`).
    RawBitrate,
    /// Error capture register read (`E`).
    ErrorCapture,
    /// Arbitration lost capture register read (`A`).
    ArbitrationLostCapture,
    /// SJA1000 register read/write (`G`/`W`).
    RegisterAccess,
}

//==================================================================================CONFIG_ERROR
#[derive(Error, Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
/// Rejected [`EngineConfig`](crate::config::EngineConfig) values.
pub enum ConfigError {
    /// Identity literals must be four alphanumeric ASCII characters.
    #[error("Identity field {field} must be 4 alphanumeric ASCII characters")]
    InvalidIdentity { field: &'static str },
}
