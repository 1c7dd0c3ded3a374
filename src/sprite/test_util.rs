//! Texture builders shared by the sprite tests.

use alloc::rc::Rc;
use alloc::vec::Vec;

use super::Texture;
use crate::shared_constants::TILE_SIZE_BYTES;

/// Build a texture whose pixels come from `pixel(frame, tile_x, tile_y, index_in_tile)`.
pub(crate) fn texture_with<F>(
    width_px: u16,
    height_px: u16,
    frames: u16,
    colors: Vec<u16>,
    pixel: F,
) -> Rc<Texture>
where
    F: Fn(u16, u16, u16, usize) -> u8,
{
    let tiles_w = (width_px + 7) / 8;
    let tiles_h = (height_px + 7) / 8;
    let mut tiles = Vec::new();
    for frame in 0..frames {
        for tile_y in 0..tiles_h {
            for tile_x in 0..tiles_w {
                for i in 0..TILE_SIZE_BYTES {
                    tiles.push(pixel(frame, tile_x, tile_y, i));
                }
            }
        }
    }
    Rc::new(Texture::new(width_px, height_px, frames, colors, tiles).unwrap())
}

/// Every pixel of frame `n` uses local color `n % colors + 1`.
pub(crate) fn solid_texture(
    width_px: u16,
    height_px: u16,
    frames: u16,
    colors: Vec<u16>,
) -> Rc<Texture> {
    let color_count = colors.len();
    texture_with(width_px, height_px, frames, colors, move |frame, _, _, _| {
        if color_count == 0 {
            0
        } else {
            (frame as usize % color_count + 1) as u8
        }
    })
}

/// Tiny deterministic generator so stress tests are reproducible.
pub(crate) struct Lcg(u32);

impl Lcg {
    pub(crate) fn new(seed: u32) -> Lcg {
        Lcg(seed)
    }

    pub(crate) fn next(&mut self, bound: u32) -> u32 {
        self.0 = self.0.wrapping_mul(1_103_515_245).wrapping_add(12_345);
        (self.0 >> 16) % bound
    }
}
