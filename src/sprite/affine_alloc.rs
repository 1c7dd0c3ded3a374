use crate::debug_log::Subsystems;
use crate::shared_constants::AFFINE_SLOT_COUNT;

/// Keeps track of which affine parameter groups in OAM are in use.
#[derive(Debug, Clone)]
pub struct AffineAllocator {
    used: [bool; AFFINE_SLOT_COUNT],
    slot_count: usize,
}

impl AffineAllocator {
    /// Create an allocator handing out the first `slot_count` groups (at most 32).
    pub fn new(slot_count: usize) -> AffineAllocator {
        AffineAllocator {
            used: [false; AFFINE_SLOT_COUNT],
            slot_count: slot_count.min(AFFINE_SLOT_COUNT),
        }
    }

    pub fn reset(&mut self) {
        self.used = [false; AFFINE_SLOT_COUNT];
    }

    /// Claim the first free group, if any.
    pub fn reserve(&mut self) -> Option<u8> {
        let slot = self.used[..self.slot_count].iter().position(|used| !used)?;
        self.used[slot] = true;
        crate::debug_log!(Subsystems::Affine, "Reserved affine slot {}", slot);
        Some(slot as u8)
    }

    pub fn release(&mut self, slot: u8) {
        if let Some(used) = self.used.get_mut(slot as usize) {
            *used = false;
            crate::debug_log!(Subsystems::Affine, "Released affine slot {}", slot);
        }
    }

    pub fn is_used(&self, slot: u8) -> bool {
        self.used.get(slot as usize).copied().unwrap_or(false)
    }

    pub fn used_count(&self) -> usize {
        self.used.iter().filter(|used| **used).count()
    }

    pub fn slots(&self) -> &[bool] {
        &self.used[..self.slot_count]
    }
}
