//! Bitrate and acceptance-filter configuration.
//!
//! Bitrate selection is stored here and handed to the controller at open
//! time. Filter values are forwarded to the controller as soon as they are
//! set; the controller does the actual frame filtering.
use crate::error::ErrorKind;
use crate::protocol::transport::traits::can_controller::CanController;

//==================================================================================BITRATE
/// Standard speeds selectable with `S0`..`S8`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Bitrate {
    Kbps10,
    Kbps20,
    Kbps50,
    Kbps100,
    Kbps125,
    Kbps250,
    Kbps500,
    Kbps800,
    Mbps1,
}

/// LAWICEL preset table, indexed by the digit following `S`.
const PRESET_TABLE: [Bitrate; 9] = [
    Bitrate::Kbps10,
    Bitrate::Kbps20,
    Bitrate::Kbps50,
    Bitrate::Kbps100,
    Bitrate::Kbps125,
    Bitrate::Kbps250,
    Bitrate::Kbps500,
    Bitrate::Kbps800,
    Bitrate::Mbps1,
];

impl Bitrate {
    /// Table entry for a preset index, `None` past the end of the table.
    pub fn from_index(index: u8) -> Option<Self> {
        PRESET_TABLE.get(index as usize).copied()
    }

    pub fn bits_per_second(self) -> u32 {
        match self {
            Bitrate::Kbps10 => 10_000,
            Bitrate::Kbps20 => 20_000,
            Bitrate::Kbps50 => 50_000,
            Bitrate::Kbps100 => 100_000,
            Bitrate::Kbps125 => 125_000,
            Bitrate::Kbps250 => 250_000,
            Bitrate::Kbps500 => 500_000,
            Bitrate::Kbps800 => 800_000,
            Bitrate::Mbps1 => 1_000_000,
        }
    }
}

/// Bitrate handed to [`CanController::init`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum BitrateSetting {
    /// Entry of the preset table.
    Preset(Bitrate),
    /// SJA1000-style bus timing registers, passed through uninterpreted.
    Raw { btr0: u8, btr1: u8 },
}

/// Bitrate selected for the next open.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BitrateConfig {
    setting: BitrateSetting,
}

impl BitrateConfig {
    pub const fn new(initial: BitrateSetting) -> Self {
        Self { setting: initial }
    }

    #[inline]
    pub fn current(&self) -> BitrateSetting {
        self.setting
    }

    /// Select a preset by table index.
    pub fn set_preset(&mut self, index: u8) -> Result<Bitrate, ErrorKind> {
        let bitrate = Bitrate::from_index(index).ok_or(ErrorKind::InvalidCommand)?;
        self.setting = BitrateSetting::Preset(bitrate);
        Ok(bitrate)
    }

    /// Store a raw timing register pair; validity is decided at open.
    pub fn set_raw(&mut self, btr0: u8, btr1: u8) {
        self.setting = BitrateSetting::Raw { btr0, btr1 };
    }
}

//==================================================================================FILTER
/// Accept-all default: every mask bit is "don't care" in SJA1000 semantics.
pub const DEFAULT_ACCEPTANCE_MASK: u32 = 0xFFFF_FFFF;

/// Acceptance code and mask last accepted by the controller.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FilterConfig {
    code: u32,
    mask: u32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl FilterConfig {
    pub const fn new() -> Self {
        Self {
            code: 0,
            mask: DEFAULT_ACCEPTANCE_MASK,
        }
    }

    #[inline]
    pub fn code(&self) -> u32 {
        self.code
    }

    #[inline]
    pub fn mask(&self) -> u32 {
        self.mask
    }

    /// Forward an acceptance code; the stored value only changes once the
    /// controller accepted it.
    pub fn set_code<C: CanController>(
        &mut self,
        controller: &mut C,
        code: u32,
    ) -> Result<(), ErrorKind> {
        controller.set_filter(code)?;
        self.code = code;
        Ok(())
    }

    /// Forward an acceptance mask.
    pub fn set_mask<C: CanController>(
        &mut self,
        controller: &mut C,
        mask: u32,
    ) -> Result<(), ErrorKind> {
        controller.set_filter_mask(mask)?;
        self.mask = mask;
        Ok(())
    }
}

//==================================================================================TESTS
#[cfg(test)]
#[path = "tests.rs"]
mod tests;
