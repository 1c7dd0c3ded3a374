//! Bit layout of the three OAM attribute words.
//!
//! ```text
//! attr0: YYYY_YYYY  A D _ _ _ C  SS    Y = row, A = affine, D = disable, C = 256 colors, S = shape
//! attr1: XXXX_XXXX_X  IIIII      ZZ    X = column, I = affine index, Z = size
//! attr2: TTTT_TTTT_TT  PP              T = first tile, P = priority
//! ```
//!
//! Nothing here touches memory; `encode` is a pure function of the record.

use super::HWSpriteSize;
use crate::shared_types::Scale;
use crate::vram::AffineParameters;

const Y_MASK: u16 = 0xFF;
const AFFINE_ENABLE_BIT: u16 = 1 << 8;
const DISABLE_BIT: u16 = 1 << 9;
const COLOR_256_BIT: u16 = 1 << 13;
const SHAPE_SHIFT: u16 = 14;

const X_MASK: u16 = 0x1FF;
const AFFINE_INDEX_SHIFT: u16 = 9;
const AFFINE_INDEX_MASK: u16 = 0b1_1111;
const SIZE_SHIFT: u16 = 14;

const TILE_MASK: u16 = 0x3FF;
const PRIORITY_SHIFT: u16 = 10;
const PRIORITY_MASK: u16 = 0b11;

/// Orientation part of the hardware sprite size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjShape {
    Square = 0,
    Horizontal = 1,
    Vertical = 2,
}

/// Magnitude part of the hardware sprite size.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ObjSize {
    Zero = 0,
    One = 1,
    Two = 2,
    Three = 3,
}

/// Everything one OAM descriptor can express.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ObjAttributes {
    pub y: u8,
    pub x: u16,
    pub affine_index: Option<u8>,
    pub disabled: bool,
    pub color_256: bool,
    pub shape: ObjShape,
    pub size: ObjSize,
    pub tile_start: u16,
    pub priority: u8,
}

impl Default for ObjAttributes {
    fn default() -> ObjAttributes {
        ObjAttributes {
            y: 0,
            x: 0,
            affine_index: None,
            disabled: false,
            color_256: false,
            shape: ObjShape::Square,
            size: ObjSize::Zero,
            tile_start: 0,
            priority: 0,
        }
    }
}

impl ObjAttributes {
    /// Written to a descriptor whenever its slot is freed, so stale contents never show up on screen.
    pub const HIDDEN: [u16; 3] = [DISABLE_BIT, 0, 0];

    pub fn with_hw_size(self, hw_size: HWSpriteSize) -> ObjAttributes {
        let (size, shape) = hw_size.to_obj_size_and_shape();
        ObjAttributes { size, shape, ..self }
    }

    pub fn with_tile_start(self, tile_start: u16) -> ObjAttributes {
        ObjAttributes { tile_start, ..self }
    }

    pub fn with_color_256(self, color_256: bool) -> ObjAttributes {
        ObjAttributes { color_256, ..self }
    }

    pub fn with_position(self, x: u16, y: u8) -> ObjAttributes {
        ObjAttributes { x, y, ..self }
    }

    pub fn with_affine_index(self, affine_index: Option<u8>) -> ObjAttributes {
        ObjAttributes {
            affine_index,
            ..self
        }
    }

    /// Only the lowest 2 bits of the layer fit into the descriptor.
    pub fn with_layer(self, layer: u8) -> ObjAttributes {
        ObjAttributes {
            priority: layer & PRIORITY_MASK as u8,
            ..self
        }
    }

    /// Packs the record into the attribute words.
    pub fn encode(&self) -> [u16; 3] {
        let mut attr0 = self.y as u16 & Y_MASK;
        attr0 |= (self.shape as u16) << SHAPE_SHIFT;
        if self.color_256 {
            attr0 |= COLOR_256_BIT;
        }
        if self.disabled {
            attr0 |= DISABLE_BIT;
        }

        let mut attr1 = self.x & X_MASK;
        attr1 |= (self.size as u16) << SIZE_SHIFT;
        if let Some(index) = self.affine_index {
            attr0 |= AFFINE_ENABLE_BIT;
            attr1 |= (index as u16 & AFFINE_INDEX_MASK) << AFFINE_INDEX_SHIFT;
        }

        let mut attr2 = self.tile_start & TILE_MASK;
        attr2 |= (self.priority as u16 & PRIORITY_MASK) << PRIORITY_SHIFT;

        return [attr0, attr1, attr2];
    }

    /// Unpacks attribute words. Unused bits are dropped.
    pub fn decode(words: [u16; 3]) -> ObjAttributes {
        let [attr0, attr1, attr2] = words;
        let shape = match attr0 >> SHAPE_SHIFT {
            1 => ObjShape::Horizontal,
            2 => ObjShape::Vertical,
            _ => ObjShape::Square,
        };
        let size = match attr1 >> SIZE_SHIFT {
            1 => ObjSize::One,
            2 => ObjSize::Two,
            3 => ObjSize::Three,
            _ => ObjSize::Zero,
        };
        let affine_index = if attr0 & AFFINE_ENABLE_BIT != 0 {
            Some(((attr1 >> AFFINE_INDEX_SHIFT) & AFFINE_INDEX_MASK) as u8)
        } else {
            None
        };
        ObjAttributes {
            y: (attr0 & Y_MASK) as u8,
            x: attr1 & X_MASK,
            affine_index,
            disabled: attr0 & DISABLE_BIT != 0,
            color_256: attr0 & COLOR_256_BIT != 0,
            shape,
            size,
            tile_start: attr2 & TILE_MASK,
            priority: ((attr2 >> PRIORITY_SHIFT) & PRIORITY_MASK) as u8,
        }
    }
}

impl AffineParameters {
    /// A pure scaling matrix. The hardware maps screen to texture space,
    /// so the diagonal holds the reciprocal of the scale.
    pub fn from_scale(scale_x: Scale, scale_y: Scale) -> AffineParameters {
        AffineParameters {
            pa: reciprocal(scale_x),
            pb: 0,
            pc: 0,
            pd: reciprocal(scale_y),
        }
    }
}

/// `1 / scale` in 8.8 fixed point. A zero scale yields 0.
fn reciprocal(scale: Scale) -> u16 {
    match (1i32 << 16).checked_div(scale.to_bits()) {
        Some(value) => value as u16,
        None => 0,
    }
}
