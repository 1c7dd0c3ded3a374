//! Bookkeeping for the object descriptors in OAM.
//!
//! Each used slot owns one range of tile memory sized for its hardware shape.
//! Sprites larger than 64x64 pixels are split into a grid of slots.

use alloc::vec::Vec;
use arrayvec::ArrayVec;

use super::tile_alloc::TileAllocator;
use super::{HWSpriteSize, ObjAttributes, OamError};
use crate::debug_log::Subsystems;
use crate::shared_constants::{OAM_SLOT_COUNT, OBJ_MAX_TILES};
use crate::vram::VideoMemory;

/// OAM slot IDs covering one sprite, row-major over its grid.
pub type OamSlotList = ArrayVec<u8, OAM_SLOT_COUNT>;

#[derive(Debug, Clone, Copy)]
pub struct OamEntry {
    pub free: bool,
    pub tile_start: u16,
    pub size: HWSpriteSize,
    /// Last attributes written to the descriptor.
    pub attrs: ObjAttributes,
}

impl Default for OamEntry {
    fn default() -> OamEntry {
        OamEntry {
            free: true,
            tile_start: 0,
            size: HWSpriteSize::EightByEight,
            attrs: ObjAttributes::default(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct OamTable {
    entries: Vec<OamEntry>,
}

impl OamTable {
    /// Create a table handing out the first `slot_count` descriptors (at most 128).
    pub fn new(slot_count: usize) -> OamTable {
        let mut entries = Vec::with_capacity(slot_count.min(OAM_SLOT_COUNT));
        entries.resize(slot_count.min(OAM_SLOT_COUNT), OamEntry::default());
        return OamTable { entries };
    }

    /// Mark every slot as free and hide every descriptor.
    pub fn reset(&mut self, vram: &mut VideoMemory) {
        for entry in self.entries.iter_mut() {
            *entry = OamEntry::default();
        }
        for slot in 0..OAM_SLOT_COUNT {
            vram.write_obj_attributes(slot as u8, ObjAttributes::HIDDEN);
        }
    }

    /// Claim the first free slot and reserve tile memory for a sprite of the given size.
    pub fn reserve_slot(
        &mut self,
        size: HWSpriteSize,
        tiles: &mut TileAllocator,
    ) -> Result<u8, OamError> {
        let id = match self.entries.iter().position(|entry| entry.free) {
            Some(id) => id,
            None => {
                crate::debug_log!(Subsystems::Oam, "Attempt to reserve slot when OAM is full");
                return Err(OamError::OutOfOamSlots);
            }
        };
        let tile_start = tiles.reserve(size.to_num_tiles())?;

        let entry = &mut self.entries[id];
        entry.free = false;
        entry.tile_start = tile_start;
        entry.size = size;
        entry.attrs = ObjAttributes::default();
        crate::debug_log!(
            Subsystems::Oam,
            "Reserved slot {} ({:?}) at tile {}",
            id,
            size,
            tile_start
        );
        return Ok(id as u8);
    }

    /// Hide the descriptor, return its tiles and mark the slot free.
    /// Freeing a free slot does nothing.
    pub fn free_slot(&mut self, id: u8, tiles: &mut TileAllocator, vram: &mut VideoMemory) {
        let entry = match self.entries.get_mut(id as usize) {
            Some(entry) if !entry.free => entry,
            _ => return,
        };
        vram.write_obj_attributes(id, ObjAttributes::HIDDEN);
        if let Err(err) = tiles.release(entry.tile_start, entry.size.to_num_tiles()) {
            log::warn!("Couldn't release tiles of OAM slot {}: {}", id, err);
        }
        *entry = OamEntry::default();
        crate::debug_log!(Subsystems::Oam, "Freed slot {}", id);
    }

    /// Reserve the grid of slots covering a sprite of `tiles_w` x `tiles_h` tiles.
    ///
    /// Inner cells are 64x64 pixels; the last column and row are shrunk to the
    /// smallest hardware size covering the remainder. If any cell fails, the
    /// cells reserved so far are released again before returning the error.
    pub fn reserve_grid(
        &mut self,
        tiles_w: u16,
        tiles_h: u16,
        tiles: &mut TileAllocator,
        vram: &mut VideoMemory,
    ) -> Result<OamSlotList, OamError> {
        let (grid_w, grid_h) = grid_dimensions(tiles_w, tiles_h);
        if grid_w * grid_h > OAM_SLOT_COUNT {
            return Err(OamError::OutOfOamSlots);
        }

        let mut slots = OamSlotList::new();
        for grid_y in 0..grid_h {
            for grid_x in 0..grid_w {
                let (cell_w, cell_h) = cell_tiles(tiles_w, tiles_h, grid_x, grid_y);
                let size = HWSpriteSize::covering(cell_w, cell_h);
                match self.reserve_slot(size, tiles) {
                    Ok(id) => slots.push(id),
                    Err(err) => {
                        crate::debug_log!(
                            Subsystems::Oam,
                            "Rolling back {} slots after {}",
                            slots.len(),
                            err
                        );
                        for id in slots.iter() {
                            self.free_slot(*id, tiles, vram);
                        }
                        return Err(err);
                    }
                }
            }
        }
        return Ok(slots);
    }

    /// Encode `attrs` into the slot's descriptor and remember them.
    pub fn write_attributes(&mut self, id: u8, attrs: ObjAttributes, vram: &mut VideoMemory) {
        if let Some(entry) = self.entries.get_mut(id as usize) {
            entry.attrs = attrs;
            vram.write_obj_attributes(id, attrs.encode());
        }
    }

    pub fn entry(&self, id: u8) -> Option<&OamEntry> {
        self.entries.get(id as usize)
    }

    pub fn entries(&self) -> &[OamEntry] {
        &self.entries
    }

    pub fn used_count(&self) -> usize {
        self.entries.iter().filter(|entry| !entry.free).count()
    }
}

/// Number of OAM slots needed horizontally and vertically.
pub fn grid_dimensions(tiles_w: u16, tiles_h: u16) -> (usize, usize) {
    let grid_w = (tiles_w as usize + OBJ_MAX_TILES - 1) / OBJ_MAX_TILES;
    let grid_h = (tiles_h as usize + OBJ_MAX_TILES - 1) / OBJ_MAX_TILES;
    (grid_w, grid_h)
}

/// Tiles of the sprite actually covered by the given grid cell.
pub fn cell_tiles(tiles_w: u16, tiles_h: u16, grid_x: usize, grid_y: usize) -> (u8, u8) {
    let (grid_w, grid_h) = grid_dimensions(tiles_w, tiles_h);
    let mut cell_w = OBJ_MAX_TILES;
    let mut cell_h = OBJ_MAX_TILES;
    if grid_x + 1 == grid_w {
        cell_w = tiles_w as usize - (grid_w - 1) * OBJ_MAX_TILES;
    }
    if grid_y + 1 == grid_h {
        cell_h = tiles_h as usize - (grid_h - 1) * OBJ_MAX_TILES;
    }
    (cell_w as u8, cell_h as u8)
}
