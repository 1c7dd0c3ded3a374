//! Pool sizes for one display engine.
//!
//! The defaults describe the full hardware. Games sharing object memory with
//! something else (e.g. a text layer) can shrink the pools from a JSON asset.

use serde::Deserialize;

use crate::shared_constants::{AFFINE_SLOT_COUNT, MAX_TILE_UNITS, OAM_SLOT_COUNT};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct AllocatorConfig {
    /// Number of 8x8 8bpp tiles of object VRAM to manage.
    pub tile_units: u16,
    /// Number of OAM descriptors to hand out.
    pub oam_slots: usize,
    /// Number of affine parameter groups to hand out.
    pub affine_slots: usize,
}

impl Default for AllocatorConfig {
    fn default() -> AllocatorConfig {
        AllocatorConfig {
            tile_units: MAX_TILE_UNITS,
            oam_slots: OAM_SLOT_COUNT,
            affine_slots: AFFINE_SLOT_COUNT,
        }
    }
}

impl AllocatorConfig {
    /// Parse and validate a config from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<AllocatorConfig, ConfigError> {
        let config: AllocatorConfig = serde_json::from_str(json)?;
        config.validate()?;
        return Ok(config);
    }

    /// Ensure the config fits the hardware.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.tile_units > MAX_TILE_UNITS {
            return Err(ConfigError::TileMemoryTooLarge(self.tile_units));
        }
        if self.oam_slots > OAM_SLOT_COUNT {
            return Err(ConfigError::TooManyOamSlots(self.oam_slots));
        }
        if self.affine_slots > AFFINE_SLOT_COUNT {
            return Err(ConfigError::TooManyAffineSlots(self.affine_slots));
        }
        return Ok(());
    }
}

/// Failure conditions that may arise when loading an `AllocatorConfig`.
#[derive(Debug)]
pub enum ConfigError {
    /// The JSON couldn't be parsed.
    Parse(serde_json::Error),
    /// Descriptors can only address 1024 tiles.
    TileMemoryTooLarge(u16),
    TooManyOamSlots(usize),
    TooManyAffineSlots(usize),
}

impl core::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use ConfigError::*;
        match self {
            Parse(err) => write!(f, "ConfigError: Can't parse config: {}", err),
            TileMemoryTooLarge(tiles) => write!(
                f,
                "ConfigError: {} tiles requested, but at most {} are addressable",
                tiles, MAX_TILE_UNITS
            ),
            TooManyOamSlots(slots) => write!(
                f,
                "ConfigError: {} OAM slots requested, but the hardware has {}",
                slots, OAM_SLOT_COUNT
            ),
            TooManyAffineSlots(slots) => write!(
                f,
                "ConfigError: {} affine slots requested, but the hardware has {}",
                slots, AFFINE_SLOT_COUNT
            ),
        }
    }
}

impl From<serde_json::Error> for ConfigError {
    fn from(error: serde_json::Error) -> Self {
        ConfigError::Parse(error)
    }
}
