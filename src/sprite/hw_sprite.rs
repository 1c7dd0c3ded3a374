use super::obj_attr::{ObjShape, ObjSize};
use crate::shared_constants::{OBJ_MAX_TILES, TILE_SIZE_BYTES};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
/// The sizes of sprite that the hardware supports, and are therefore possible to allocate.
pub enum HWSpriteSize {
    EightByEight,
    SixteenBySixteen,
    ThirtyTwoByThirtyTwo,
    SixtyFourBySixtyFour,

    EightBySixteen,
    EightByThirtyTwo,

    SixteenByEight,
    SixteenByThirtyTwo,

    ThirtyTwoByEight,
    ThirtyTwoBySixteen,
    ThirtyTwoBySixtyFour,

    SixtyFourByThirtyTwo,
}

impl HWSpriteSize {
    /// Returns the sprite's size in bytes.
    /// Note that this assumes 8bpp sprites.
    pub fn to_size_in_bytes(&self) -> u32 {
        self.to_num_tiles() as u32 * TILE_SIZE_BYTES as u32
    }

    /// Calculates the amount of 8x8 tiles of VRAM required to fit the sprite.
    pub fn to_num_tiles(&self) -> u16 {
        let (w, h) = self.to_size_in_tiles();
        return w as u16 * h as u16;
    }

    /// Calculates the sprite's size and shape in the format required by OAM.
    pub fn to_obj_size_and_shape(&self) -> (ObjSize, ObjShape) {
        use HWSpriteSize::*;
        use ObjShape::*;
        use ObjSize::*;
        match self {
            EightByEight => (Zero, Square),
            SixteenBySixteen => (One, Square),
            ThirtyTwoByThirtyTwo => (Two, Square),
            SixtyFourBySixtyFour => (Three, Square),

            EightBySixteen => (Zero, Vertical),
            EightByThirtyTwo => (One, Vertical),

            SixteenByEight => (Zero, Horizontal),
            SixteenByThirtyTwo => (Two, Vertical),

            ThirtyTwoByEight => (One, Horizontal),
            ThirtyTwoBySixteen => (Two, Horizontal),
            ThirtyTwoBySixtyFour => (Three, Vertical),

            SixtyFourByThirtyTwo => (Three, Horizontal),
        }
    }

    /// Returns the size in pixels in the form (x, y).
    pub fn to_size_in_px(&self) -> (u16, u16) {
        let (w, h) = self.to_size_in_tiles();
        return (w as u16 * 8, h as u16 * 8);
    }

    /// Returns the size in tiles in the form (x, y).
    pub fn to_size_in_tiles(&self) -> (u8, u8) {
        use HWSpriteSize::*;
        match self {
            EightByEight => (1, 1),
            SixteenBySixteen => (2, 2),
            ThirtyTwoByThirtyTwo => (4, 4),
            SixtyFourBySixtyFour => (8, 8),

            EightBySixteen => (1, 2),
            EightByThirtyTwo => (1, 4),

            SixteenByEight => (2, 1),
            SixteenByThirtyTwo => (2, 4),

            ThirtyTwoByEight => (4, 1),
            ThirtyTwoBySixteen => (4, 2),
            ThirtyTwoBySixtyFour => (4, 8),

            SixtyFourByThirtyTwo => (8, 4),
        }
    }

    /// Returns the hardware size with exactly these tile dimensions, if there is one.
    pub fn from_size_in_tiles(width: u8, height: u8) -> Option<HWSpriteSize> {
        use HWSpriteSize::*;
        let size = match (width, height) {
            (1, 1) => EightByEight,
            (2, 2) => SixteenBySixteen,
            (4, 4) => ThirtyTwoByThirtyTwo,
            (8, 8) => SixtyFourBySixtyFour,

            (1, 2) => EightBySixteen,
            (1, 4) => EightByThirtyTwo,

            (2, 1) => SixteenByEight,
            (2, 4) => SixteenByThirtyTwo,

            (4, 1) => ThirtyTwoByEight,
            (4, 2) => ThirtyTwoBySixteen,
            (4, 8) => ThirtyTwoBySixtyFour,

            (8, 4) => SixtyFourByThirtyTwo,
            _ => return None,
        };
        Some(size)
    }

    /// Picks the smallest hardware size that covers `width` x `height` tiles.
    ///
    /// Each edge is rounded up to 1, 2, 4 or 8 tiles. The hardware has no
    /// 64 pixel sprite narrower than 32 pixels, so if one edge becomes 8
    /// the other is raised to at least 4.
    pub fn covering(width: u8, height: u8) -> HWSpriteSize {
        let mut w = quantize_edge(width);
        let mut h = quantize_edge(height);
        if w == 8 && h < 8 {
            h = 4;
        }
        if h == 8 && w < 8 {
            w = 4;
        }
        match HWSpriteSize::from_size_in_tiles(w, h) {
            Some(size) => size,
            // Every pair the ladder produces is a hardware size
            None => HWSpriteSize::SixtyFourBySixtyFour,
        }
    }
}

/// Rounds an edge length in tiles up the 1/2/4/8 ladder.
fn quantize_edge(tiles: u8) -> u8 {
    if tiles as usize > OBJ_MAX_TILES / 2 {
        8
    } else if tiles > 2 {
        4
    } else if tiles > 1 {
        2
    } else {
        1
    }
}
