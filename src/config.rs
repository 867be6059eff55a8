//! Engine configuration: identity literals, power-on bitrate and debug
//! output. Built once at start-up and handed to
//! [`SlcanEngine::new`](crate::protocol::engine::SlcanEngine::new).
use crate::core::{DEFAULT_HW_SW_VERSION, DEFAULT_SERIAL, DEFAULT_SW_VERSION};
use crate::error::ConfigError;
use crate::protocol::config::{Bitrate, BitrateSetting};

/// Settings that are fixed for the lifetime of the engine.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct EngineConfig {
    /// Answer to `V` (after the `V`).
    pub hw_sw_version: [u8; 4],
    /// Answer to `v` (after the `v`).
    pub sw_version: [u8; 4],
    /// Answer to `N` (after the `N`).
    pub serial: [u8; 4],
    /// Bitrate used by `O` when the host never sent `S` or `s`.
    pub default_bitrate: BitrateSetting,
    /// Write diagnostics to the debug stream.
    pub debug_output: bool,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            hw_sw_version: DEFAULT_HW_SW_VERSION,
            sw_version: DEFAULT_SW_VERSION,
            serial: DEFAULT_SERIAL,
            default_bitrate: BitrateSetting::Preset(Bitrate::Kbps500),
            debug_output: false,
        }
    }
}

impl EngineConfig {
    pub fn builder() -> EngineConfigBuilder {
        EngineConfigBuilder::new()
    }
}

/// Fluent builder validating identity literals.
#[derive(Debug, Clone, Copy)]
pub struct EngineConfigBuilder {
    config: EngineConfig,
}

impl Default for EngineConfigBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl EngineConfigBuilder {
    pub fn new() -> Self {
        Self {
            config: EngineConfig::default(),
        }
    }

    pub fn hardware_version(mut self, literal: [u8; 4]) -> Self {
        self.config.hw_sw_version = literal;
        self
    }

    pub fn software_version(mut self, literal: [u8; 4]) -> Self {
        self.config.sw_version = literal;
        self
    }

    pub fn serial_number(mut self, literal: [u8; 4]) -> Self {
        self.config.serial = literal;
        self
    }

    pub fn default_bitrate(mut self, bitrate: BitrateSetting) -> Self {
        self.config.default_bitrate = bitrate;
        self
    }

    pub fn debug_output(mut self, enabled: bool) -> Self {
        self.config.debug_output = enabled;
        self
    }

    /// Validate and return the configuration.
    pub fn build(self) -> Result<EngineConfig, ConfigError> {
        check_identity(&self.config.hw_sw_version, "hw_sw_version")?;
        check_identity(&self.config.sw_version, "sw_version")?;
        check_identity(&self.config.serial, "serial")?;
        Ok(self.config)
    }
}

fn check_identity(literal: &[u8; 4], field: &'static str) -> Result<(), ConfigError> {
    if literal.iter().all(u8::is_ascii_alphanumeric) {
        Ok(())
    } else {
        Err(ConfigError::InvalidIdentity { field })
    }
}
