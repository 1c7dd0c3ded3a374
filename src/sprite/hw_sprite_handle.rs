use alloc::vec::Vec;

use super::oam_table::OamSlotList;

/// Whether a sprite currently holds hardware resources.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AllocationState {
    NotAllocated,
    Allocated,
}

impl Default for AllocationState {
    fn default() -> AllocationState {
        AllocationState::NotAllocated
    }
}

/// The hardware resources bound to a sprite.
///
/// Only the allocator mutates this; it is reset to the default when the sprite is freed.
#[derive(Debug, Clone, Default)]
pub struct SpriteMemory {
    pub(super) state: AllocationState,
    /// OAM slots covering the sprite, row-major over its grid.
    pub(super) oam_slots: OamSlotList,
    /// Global palette index for each local texture color.
    pub(super) palette_indices: Vec<u8>,
    pub(super) loaded_frame: Option<u16>,
    /// Set once shape, size and tile start have been written to the descriptors.
    pub(super) oam_initialized: bool,
    pub(super) affine_slot: Option<u8>,
}

impl SpriteMemory {
    pub fn state(&self) -> AllocationState {
        self.state
    }

    pub fn is_allocated(&self) -> bool {
        self.state == AllocationState::Allocated
    }

    pub fn oam_slots(&self) -> &[u8] {
        &self.oam_slots
    }

    pub fn oam_slot_count(&self) -> usize {
        self.oam_slots.len()
    }

    pub fn palette_indices(&self) -> &[u8] {
        &self.palette_indices
    }

    /// The frame whose pixels are in tile memory, if any.
    pub fn loaded_frame(&self) -> Option<u16> {
        self.loaded_frame
    }

    pub fn affine_slot(&self) -> Option<u8> {
        self.affine_slot
    }
}
