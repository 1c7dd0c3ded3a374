use alloc::vec::Vec;
use byte_slice_cast::AsMutByteSlice;

use super::oam_table::{cell_tiles, OamEntry};
use super::Texture;
use crate::debug_log::Subsystems;
use crate::shared_constants::{OBJ_MAX_TILES, TILE_SIZE_BYTES, TILE_SIZE_U32S};
use crate::vram::{VRAMError, VideoMemory};

/// Copies the part of a frame covered by one OAM slot into that slot's tile memory.
///
/// `staging` is cleared and refilled with the slot's tiles: pixels are remapped
/// from texture-local color indices to palette indices, 0 stays transparent, and
/// whatever the texture doesn't cover is left at 0. The whole buffer is then
/// transferred in one go.
pub fn dma_copy_slot(
    texture: &Texture,
    frame: u16,
    (grid_x, grid_y): (usize, usize),
    entry: &OamEntry,
    palette_indices: &[u8],
    staging: &mut Vec<u32>,
    vram: &mut VideoMemory,
) -> Result<(), VRAMError> {
    let (tiles_w, tiles_h) = texture.size_in_tiles();
    let (cell_w, cell_h) = cell_tiles(tiles_w, tiles_h, grid_x, grid_y);
    let (slot_w, _) = entry.size.to_size_in_tiles();

    staging.clear();
    staging.resize(entry.size.to_num_tiles() as usize * TILE_SIZE_U32S, 0);
    let bytes = staging.as_mut_slice().as_mut_byte_slice();

    for tile_y in 0..cell_h as usize {
        for tile_x in 0..cell_w as usize {
            let src = texture.tile(
                frame,
                (grid_x * OBJ_MAX_TILES + tile_x) as u16,
                (grid_y * OBJ_MAX_TILES + tile_y) as u16,
            );
            let dest_start = (tile_y * slot_w as usize + tile_x) * TILE_SIZE_BYTES;
            let dest = &mut bytes[dest_start..dest_start + TILE_SIZE_BYTES];
            for (out, pixel) in dest.iter_mut().zip(src.iter()) {
                *out = remap_pixel(*pixel, palette_indices);
            }
        }
    }

    crate::debug_log!(
        Subsystems::Dma,
        "Copying {} words of frame {} to tile {}",
        staging.len(),
        frame,
        entry.tile_start
    );
    vram.dma_copy_words(staging, entry.tile_start)
}

/// Maps a texture-local color index to its palette index.
/// Indices without a color are drawn transparent.
fn remap_pixel(pixel: u8, palette_indices: &[u8]) -> u8 {
    match pixel {
        0 => 0,
        pixel => palette_indices
            .get(pixel as usize - 1)
            .copied()
            .unwrap_or(0),
    }
}
