//! In-memory representation of a classic CAN frame as exchanged with the
//! controller collaborator.
use crate::core::CAN_MAX_DLEN;
use embedded_can::{ExtendedId, Id, StandardId};

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
/// Classic CAN frame: standard or extended identifier, optional remote
/// request, up to eight payload bytes.
pub struct CanFrame {
    id: Id,
    remote: bool,
    dlc: u8,
    data: [u8; CAN_MAX_DLEN],
}

impl CanFrame {
    /// Build a data frame. Returns `None` when `data` exceeds eight bytes.
    pub fn new_data(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        if data.len() > CAN_MAX_DLEN {
            return None;
        }
        let mut payload = [0u8; CAN_MAX_DLEN];
        payload[..data.len()].copy_from_slice(data);
        Some(Self {
            id: id.into(),
            remote: false,
            dlc: data.len() as u8,
            data: payload,
        })
    }

    /// Build a remote frame requesting `dlc` bytes.
    pub fn new_remote_frame(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        if dlc > CAN_MAX_DLEN {
            return None;
        }
        Some(Self {
            id: id.into(),
            remote: true,
            dlc: dlc as u8,
            data: [0; CAN_MAX_DLEN],
        })
    }

    /// Shorthand for an 11-bit data frame; `None` on an out-of-range id.
    pub fn standard(raw_id: u16, data: &[u8]) -> Option<Self> {
        Self::new_data(StandardId::new(raw_id)?, data)
    }

    /// Shorthand for a 29-bit data frame; `None` on an out-of-range id.
    pub fn extended(raw_id: u32, data: &[u8]) -> Option<Self> {
        Self::new_data(ExtendedId::new(raw_id)?, data)
    }

    #[inline]
    pub fn id(&self) -> Id {
        self.id
    }

    /// Identifier without its width tag.
    pub fn raw_id(&self) -> u32 {
        match self.id {
            Id::Standard(id) => id.as_raw() as u32,
            Id::Extended(id) => id.as_raw(),
        }
    }

    #[inline]
    pub fn is_extended(&self) -> bool {
        matches!(self.id, Id::Extended(_))
    }

    #[inline]
    pub fn is_remote(&self) -> bool {
        self.remote
    }

    #[inline]
    pub fn dlc(&self) -> usize {
        self.dlc as usize
    }

    /// Payload bytes. Empty for remote frames.
    #[inline]
    pub fn data(&self) -> &[u8] {
        if self.remote {
            &[]
        } else {
            &self.data[..self.dlc as usize]
        }
    }
}

impl embedded_can::Frame for CanFrame {
    fn new(id: impl Into<Id>, data: &[u8]) -> Option<Self> {
        Self::new_data(id, data)
    }

    fn new_remote(id: impl Into<Id>, dlc: usize) -> Option<Self> {
        Self::new_remote_frame(id, dlc)
    }

    fn is_extended(&self) -> bool {
        CanFrame::is_extended(self)
    }

    fn is_remote_frame(&self) -> bool {
        self.remote
    }

    fn id(&self) -> Id {
        self.id
    }

    fn dlc(&self) -> usize {
        self.dlc as usize
    }

    fn data(&self) -> &[u8] {
        CanFrame::data(self)
    }
}

#[cfg(feature = "defmt")]
impl defmt::Format for CanFrame {
    fn format(&self, fmt: defmt::Formatter) {
        defmt::write!(
            fmt,
            "CanFrame {{ id: {=u32:#x}, ext: {=bool}, rtr: {=bool}, data: {=[u8]:x} }}",
            self.raw_id(),
            self.is_extended(),
            self.remote,
            self.data()
        )
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
