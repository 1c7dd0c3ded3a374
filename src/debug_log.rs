//! This module contains a macro and related types which allows for enabling debug output
//! for particular subsystems at compile time.
//!
//! If a subsystem's debugging is disabled, debug print invocations cause no performance penalty.
//! Enabled subsystems are forwarded to the `log` facade with the subsystem name as target,
//! so whatever logger the embedding program installs decides where the output ends up.
//!
//! Please disable all subsystems you're not currently working on before publishing a release binary!

/// List of subsystems logging can be enabled for.
#[derive(Debug, PartialEq)]
pub enum Subsystems {
    HWSprite,
    TileAlloc,
    Palette,
    Affine,
    Oam,
    Dma,
}

impl Subsystems {
    pub fn to_str(&self) -> &'static str {
        use Subsystems::*;
        match self {
            HWSprite => "HW SPRITE",
            TileAlloc => "TILE ALLOC",
            Palette => "PALETTE",
            Affine => "AFFINE",
            Oam => "OAM",
            Dma => "DMA",
        }
    }
}

/// List of subsystems to enable logging for
pub const ENABLED_SUBSYSTEMS: [Subsystems; 2] = [Subsystems::HWSprite, Subsystems::Oam];

#[macro_export]
macro_rules! debug_log {
  ($subsystem:expr, $($arg:tt)*) => {{
    let subsystem = $subsystem;
    if $crate::debug_log::ENABLED_SUBSYSTEMS.contains(&subsystem) {
        log::debug!(target: subsystem.to_str(), $($arg)*);
    }
  }};
}
