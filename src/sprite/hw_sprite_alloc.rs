//! This module provides the ability to manage objects (hardware sprites) in video memory.
//! The interface is allocator-like, with the ability to load and free sprites.
//!
//! A loaded sprite owns a grid of OAM slots, one range of tile memory per slot,
//! one palette reference per texture color and, while scaled, an affine slot.
//! All of them are given back when the sprite is freed, leaving the pools as if
//! the sprite had never been loaded.
//!
//! All sprites share one 256 color palette, and tile memory is expected to use 1D mapping.
//!
//! Heavily inspired by this article: https://www.gamasutra.com/view/feature/131491/gameboy_advance_resource_management.php?print=1
use alloc::vec::Vec;

use super::affine_alloc::AffineAllocator;
use super::hw_sprite_handle::{AllocationState, SpriteMemory};
use super::oam_table::{grid_dimensions, OamTable};
use super::palette_alloc::PaletteAllocator;
use super::sprite_dma::dma_copy_slot;
use super::tile_alloc::{TileAllocator, TileFreeZone};
use super::{ObjAttributes, OamError, Sprite};
use crate::config::{AllocatorConfig, ConfigError};
use crate::debug_log::Subsystems;
use crate::shared_constants::{OBJ_MAX_PX, OBJ_X_WRAP_PX, OBJ_Y_WRAP_PX};
use crate::shared_types::Coordinate;
use crate::vram::{AffineParameters, VideoMemory};

/// Copy of the state of all four pools, for comparing before and after.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PoolSnapshot {
    pub free_zones: Vec<TileFreeZone>,
    pub oam_free: Vec<bool>,
    pub palette_ref_counts: Vec<u16>,
    pub affine_used: Vec<bool>,
}

/// An allocator for managing hardware sprites in video memory.
///
/// Everything lives in this one value; there's no global state. Using two of them
/// on the same display engine will make them overwrite each other's sprites.
#[derive(Debug, Clone)]
pub struct HWSpriteAllocator {
    vram: VideoMemory,
    tiles: TileAllocator,
    palette: PaletteAllocator,
    affine: AffineAllocator,
    oam: OamTable,
    // Reused for every tile upload
    staging: Vec<u32>,
}

impl Default for HWSpriteAllocator {
    fn default() -> HWSpriteAllocator {
        HWSpriteAllocator::with_config(AllocatorConfig::default())
    }
}

impl HWSpriteAllocator {
    /// Create an allocator with all pools free and every descriptor hidden.
    pub fn new(config: AllocatorConfig) -> Result<HWSpriteAllocator, ConfigError> {
        config.validate()?;
        return Ok(HWSpriteAllocator::with_config(config));
    }

    fn with_config(config: AllocatorConfig) -> HWSpriteAllocator {
        let mut allocator = HWSpriteAllocator {
            vram: VideoMemory::new(config.tile_units),
            tiles: TileAllocator::new(config.tile_units),
            palette: PaletteAllocator::default(),
            affine: AffineAllocator::new(config.affine_slots),
            oam: OamTable::new(config.oam_slots),
            staging: Vec::new(),
        };
        allocator.reset();
        return allocator;
    }

    /// Return every pool to "fully free" and hide every descriptor.
    ///
    /// Sprites loaded before the reset still think they own resources;
    /// only call this when none are loaded.
    pub fn reset(&mut self) {
        self.tiles.reset();
        self.palette.reset();
        self.affine.reset();
        self.oam.reset(&mut self.vram);
    }

    /// Bind the sprite's colors, OAM slots and tile memory.
    ///
    /// No frame is uploaded yet; that happens on the first draw or through `load_frame`.
    /// On failure nothing stays reserved and palette colors are left as they were.
    pub fn load(&mut self, sprite: &mut Sprite) -> Result<(), OamError> {
        if sprite.memory.is_allocated() {
            return Err(OamError::AlreadyLoaded);
        }

        let binding = self
            .palette
            .reserve_colors(sprite.texture.colors(), &mut self.vram)?;

        let (tiles_w, tiles_h) = sprite.texture.size_in_tiles();
        let oam_slots = match self
            .oam
            .reserve_grid(tiles_w, tiles_h, &mut self.tiles, &mut self.vram)
        {
            Ok(slots) => slots,
            Err(err) => {
                self.palette.cancel(binding, &mut self.vram);
                return Err(err);
            }
        };

        crate::debug_log!(
            Subsystems::HWSprite,
            "Loaded {}x{} tile sprite into {} OAM slots",
            tiles_w,
            tiles_h,
            oam_slots.len()
        );
        sprite.memory = SpriteMemory {
            state: AllocationState::Allocated,
            oam_slots,
            palette_indices: binding.into_indices(),
            loaded_frame: None,
            oam_initialized: false,
            affine_slot: None,
        };
        return Ok(());
    }

    /// Upload the given frame into the sprite's tile memory.
    ///
    /// Returns `false` without touching tile memory if the frame is already uploaded.
    pub fn load_frame(&mut self, sprite: &mut Sprite, frame: u16) -> Result<bool, OamError> {
        if !sprite.memory.is_allocated() {
            return Err(OamError::NotLoaded);
        }
        let frame_count = sprite.texture.frame_count();
        if frame >= frame_count {
            return Err(OamError::InvalidFrame { frame, frame_count });
        }
        if sprite.memory.loaded_frame == Some(frame) {
            return Ok(false);
        }

        let (tiles_w, tiles_h) = sprite.texture.size_in_tiles();
        let (grid_w, _) = grid_dimensions(tiles_w, tiles_h);
        for (i, id) in sprite.memory.oam_slots.iter().enumerate() {
            let entry = match self.oam.entry(*id) {
                Some(entry) => entry,
                None => continue,
            };
            dma_copy_slot(
                &sprite.texture,
                frame,
                (i % grid_w, i / grid_w),
                entry,
                &sprite.memory.palette_indices,
                &mut self.staging,
                &mut self.vram,
            )?;
        }
        sprite.memory.loaded_frame = Some(frame);
        return Ok(true);
    }

    /// Give back everything the sprite holds.
    ///
    /// Palette references go first, then OAM slots together with their tile
    /// memory, then the affine slot. Descriptors are hidden as their slots are freed.
    pub fn free(&mut self, sprite: &mut Sprite) -> Result<(), OamError> {
        if !sprite.memory.is_allocated() {
            return Err(OamError::NotLoaded);
        }
        let memory = core::mem::take(&mut sprite.memory);

        self.palette.release_all(&memory.palette_indices);
        for id in memory.oam_slots.iter() {
            self.oam.free_slot(*id, &mut self.tiles, &mut self.vram);
        }
        if let Some(slot) = memory.affine_slot {
            self.affine.release(slot);
        }
        crate::debug_log!(
            Subsystems::HWSprite,
            "Freed sprite with {} OAM slots",
            memory.oam_slots.len()
        );
        return Ok(());
    }

    /// Per-frame update of one sprite.
    ///
    /// Advances its animation, uploads the current frame if it changed, writes the
    /// static descriptor fields the first time around and then resyncs position,
    /// layer and scale. A sprite without an uploaded frame stays hidden.
    pub fn draw_sprite(&mut self, sprite: &mut Sprite) -> Result<(), OamError> {
        if !sprite.memory.is_allocated() {
            return Err(OamError::NotLoaded);
        }
        sprite.tick();

        if sprite.memory.loaded_frame != Some(sprite.current_frame) {
            let frame = sprite.current_frame;
            if let Err(err) = self.load_frame(sprite, frame) {
                log::warn!("Keeping previous frame of sprite: {}", err);
            }
        }
        if sprite.memory.loaded_frame.is_none() {
            return Ok(());
        }

        if !sprite.memory.oam_initialized {
            self.write_static_attributes(sprite);
        }
        self.sync_position_and_scale(sprite);
        return Ok(());
    }

    /// Shape, size, color mode and first tile never change while a slot is owned.
    fn write_static_attributes(&mut self, sprite: &mut Sprite) {
        for id in sprite.memory.oam_slots.iter() {
            let entry = match self.oam.entry(*id) {
                Some(entry) => *entry,
                None => continue,
            };
            let attrs = ObjAttributes::default()
                .with_color_256(true)
                .with_hw_size(entry.size)
                .with_tile_start(entry.tile_start);
            self.oam.write_attributes(*id, attrs, &mut self.vram);
        }
        sprite.memory.oam_initialized = true;
    }

    fn sync_position_and_scale(&mut self, sprite: &mut Sprite) {
        self.update_affine_slot(sprite);
        let affine_slot = sprite.memory.affine_slot;
        if let Some(slot) = affine_slot {
            self.vram.write_affine_parameters(
                slot,
                AffineParameters::from_scale(sprite.scale_x, sprite.scale_y),
            );
        }

        let (tiles_w, tiles_h) = sprite.texture.size_in_tiles();
        let (grid_w, _) = grid_dimensions(tiles_w, tiles_h);
        for (i, id) in sprite.memory.oam_slots.iter().enumerate() {
            let attrs = match self.oam.entry(*id) {
                Some(entry) => entry.attrs,
                None => continue,
            };
            // Cells are 64 pixels apart before scaling
            let (grid_x, grid_y) = ((i % grid_w) as i32, (i / grid_w) as i32);
            let x = sprite
                .x
                .wrapping_add(sprite.scale_x.wrapping_mul_int(grid_x * OBJ_MAX_PX));
            let y = sprite
                .y
                .wrapping_add(sprite.scale_y.wrapping_mul_int(grid_y * OBJ_MAX_PX));
            let attrs = attrs
                .with_position(wrap(x, OBJ_X_WRAP_PX) as u16, wrap(y, OBJ_Y_WRAP_PX) as u8)
                .with_affine_index(affine_slot)
                .with_layer(sprite.layer);
            self.oam.write_attributes(*id, attrs, &mut self.vram);
        }
    }

    /// Claim an affine slot while the sprite is scaled and give it back once it isn't.
    fn update_affine_slot(&mut self, sprite: &mut Sprite) {
        if sprite.is_scaled() {
            if sprite.memory.affine_slot.is_none() {
                sprite.memory.affine_slot = self.affine.reserve();
                if sprite.memory.affine_slot.is_none() {
                    log::warn!("Out of affine slots, drawing sprite unscaled");
                }
            }
        } else if let Some(slot) = sprite.memory.affine_slot.take() {
            self.affine.release(slot);
        }
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        PoolSnapshot {
            free_zones: self.tiles.free_zones().to_vec(),
            oam_free: self.oam.entries().iter().map(|entry| entry.free).collect(),
            palette_ref_counts: self.palette.ref_counts().to_vec(),
            affine_used: self.affine.slots().to_vec(),
        }
    }

    /// Log the free list and every used OAM slot.
    pub fn dump_state(&self) {
        for zone in self.tiles.free_zones() {
            crate::debug_log!(
                Subsystems::HWSprite,
                "FREE ZONE {} ({} length)",
                zone.start,
                zone.length
            );
        }
        for (id, entry) in self.oam.entries().iter().enumerate() {
            if entry.free {
                continue;
            }
            crate::debug_log!(
                Subsystems::HWSprite,
                "OAM {} start {} size {:?}",
                id,
                entry.tile_start,
                entry.size
            );
        }
    }

    pub fn vram(&self) -> &VideoMemory {
        &self.vram
    }

    pub fn tiles(&self) -> &TileAllocator {
        &self.tiles
    }

    pub fn palette(&self) -> &PaletteAllocator {
        &self.palette
    }

    pub fn affine(&self) -> &AffineAllocator {
        &self.affine
    }

    pub fn oam(&self) -> &OamTable {
        &self.oam
    }
}

/// Whole pixels of `pos` wrapped into `0..modulus_px`.
fn wrap(pos: Coordinate, modulus_px: i32) -> i32 {
    pos.rem_euclid(Coordinate::from_num(modulus_px))
        .to_num::<i32>()
}
