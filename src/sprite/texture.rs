use alloc::vec::Vec;

use super::TextureError;
use crate::shared_constants::{PALETTE_SLOT_COUNT, TILE_SIZE_BYTES, TILE_SIZE_IN_PX};

/// Immutable 8bpp sprite graphics with their own local palette.
///
/// Tile data is stored frame by frame, each frame row-major in tiles, each tile
/// row-major in pixels. A pixel value of 0 is transparent, value `n` refers to
/// `colors[n - 1]`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Texture {
    width_px: u16,
    height_px: u16,
    frame_count: u16,
    colors: Vec<u16>,
    tiles: Vec<u8>,
}

impl Texture {
    pub fn new(
        width_px: u16,
        height_px: u16,
        frame_count: u16,
        colors: Vec<u16>,
        tiles: Vec<u8>,
    ) -> Result<Texture, TextureError> {
        if width_px == 0 || height_px == 0 || frame_count == 0 {
            return Err(TextureError::Empty);
        }
        if colors.len() > PALETTE_SLOT_COUNT {
            return Err(TextureError::TooManyColors(colors.len()));
        }
        let texture = Texture {
            width_px,
            height_px,
            frame_count,
            colors,
            tiles,
        };
        let expected = texture.frame_size_in_bytes() * frame_count as usize;
        if texture.tiles.len() != expected {
            return Err(TextureError::TileDataLength {
                expected,
                actual: texture.tiles.len(),
            });
        }
        return Ok(texture);
    }

    /// Size in tiles in the form (x, y); partial tiles count as whole ones.
    pub fn size_in_tiles(&self) -> (u16, u16) {
        let tile = TILE_SIZE_IN_PX as u32;
        (
            ((self.width_px as u32 + tile - 1) / tile) as u16,
            ((self.height_px as u32 + tile - 1) / tile) as u16,
        )
    }

    pub fn size_in_px(&self) -> (u16, u16) {
        (self.width_px, self.height_px)
    }

    pub fn frame_count(&self) -> u16 {
        self.frame_count
    }

    pub fn color_count(&self) -> usize {
        self.colors.len()
    }

    pub fn colors(&self) -> &[u16] {
        &self.colors
    }

    pub fn tiles(&self) -> &[u8] {
        &self.tiles
    }

    /// The 64 pixels of one tile of one frame.
    pub fn tile(&self, frame: u16, tile_x: u16, tile_y: u16) -> &[u8] {
        let (tiles_w, tiles_h) = self.size_in_tiles();
        let index = frame as usize * tiles_w as usize * tiles_h as usize
            + tile_y as usize * tiles_w as usize
            + tile_x as usize;
        let begin = index * TILE_SIZE_BYTES;
        &self.tiles[begin..begin + TILE_SIZE_BYTES]
    }

    fn frame_size_in_bytes(&self) -> usize {
        let (tiles_w, tiles_h) = self.size_in_tiles();
        tiles_w as usize * tiles_h as usize * TILE_SIZE_BYTES
    }
}
