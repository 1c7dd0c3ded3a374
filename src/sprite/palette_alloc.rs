//! Shared object palette with reference-counted, deduplicated entries.
//!
//! Palette index 0 is transparent and never handed out, so global slot `i`
//! (0-based here) lives at palette index `i + 1`.

use alloc::vec::Vec;

use super::OamError;
use crate::debug_log::Subsystems;
use crate::shared_constants::PALETTE_SLOT_COUNT;
use crate::vram::VideoMemory;

/// Palette indices bound for one texture, plus the colors the binding overwrote.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PaletteBinding {
    indices: Vec<u8>,
    overwritten: Vec<(u8, u16)>,
}

impl PaletteBinding {
    /// Global palette index for each local color.
    pub fn indices(&self) -> &[u8] {
        &self.indices
    }

    /// Keep the binding for good.
    pub fn into_indices(self) -> Vec<u8> {
        self.indices
    }
}

#[derive(Debug, Clone)]
pub struct PaletteAllocator {
    colors: [u16; PALETTE_SLOT_COUNT],
    ref_counts: [u16; PALETTE_SLOT_COUNT],
}

impl Default for PaletteAllocator {
    fn default() -> PaletteAllocator {
        PaletteAllocator {
            colors: [0; PALETTE_SLOT_COUNT],
            ref_counts: [0; PALETTE_SLOT_COUNT],
        }
    }
}

impl PaletteAllocator {
    /// Drop every reference. Stored colors are kept until overwritten.
    pub fn reset(&mut self) {
        self.ref_counts = [0; PALETTE_SLOT_COUNT];
    }

    /// Bind `color` to a palette index and return it.
    ///
    /// Slots are scanned in ascending order. A slot already holding the color is
    /// shared. Otherwise the first unreferenced slot seen during the scan is
    /// claimed and overwritten, even if it isn't the only one.
    pub fn reserve(&mut self, color: u16, vram: &mut VideoMemory) -> Result<u8, OamError> {
        let (index, _) = self.bind(color, vram)?;
        return Ok(index);
    }

    /// Like `reserve`, but also returns the color the slot held if it was overwritten.
    fn bind(
        &mut self,
        color: u16,
        vram: &mut VideoMemory,
    ) -> Result<(u8, Option<u16>), OamError> {
        let mut fallback: Option<usize> = None;
        let mut found: Option<usize> = None;
        for (slot, stored) in self.colors.iter().enumerate() {
            if *stored == color {
                found = Some(slot);
                break;
            }
            if fallback.is_none() && self.ref_counts[slot] == 0 {
                fallback = Some(slot);
            }
        }

        let (slot, previous) = match (found, fallback) {
            (Some(slot), _) => (slot, None),
            (None, Some(slot)) => {
                let previous = self.colors[slot];
                self.colors[slot] = color;
                vram.write_palette_color(palette_index(slot), color);
                (slot, Some(previous))
            }
            (None, None) => {
                crate::debug_log!(Subsystems::Palette, "No room for color {:04x}", color);
                return Err(OamError::OutOfPaletteSpace);
            }
        };
        self.ref_counts[slot] += 1;
        return Ok((palette_index(slot), previous));
    }

    /// Bind every color of a texture, in order.
    /// Either all of them get bound or none do, and a failure leaves the stored
    /// colors and palette RAM untouched.
    pub fn reserve_colors(
        &mut self,
        colors: &[u16],
        vram: &mut VideoMemory,
    ) -> Result<PaletteBinding, OamError> {
        let mut binding = PaletteBinding {
            indices: Vec::with_capacity(colors.len()),
            overwritten: Vec::new(),
        };
        for color in colors {
            match self.bind(*color, vram) {
                Ok((index, previous)) => {
                    binding.indices.push(index);
                    if let Some(previous) = previous {
                        binding.overwritten.push((index, previous));
                    }
                }
                Err(err) => {
                    self.cancel(binding, vram);
                    return Err(err);
                }
            }
        }
        return Ok(binding);
    }

    /// Undo a binding nothing has used yet: drop its references and put back
    /// the colors it overwrote, in palette RAM as well.
    ///
    /// Only valid while no other reservation happened since `reserve_colors`.
    pub fn cancel(&mut self, binding: PaletteBinding, vram: &mut VideoMemory) {
        self.release_all(&binding.indices);
        for (index, color) in binding.overwritten.iter().rev() {
            if let Some(slot) = slot_of(*index) {
                self.colors[slot] = *color;
                vram.write_palette_color(*index, *color);
            }
        }
        crate::debug_log!(
            Subsystems::Palette,
            "Cancelled binding of {} colors, restored {} slots",
            binding.indices.len(),
            binding.overwritten.len()
        );
    }

    /// Drop one reference to the given palette index.
    pub fn release(&mut self, index: u8) {
        let slot = match slot_of(index) {
            Some(slot) => slot,
            None => return,
        };
        match self.ref_counts[slot].checked_sub(1) {
            Some(count) => self.ref_counts[slot] = count,
            None => log::warn!("Releasing unreferenced palette index {}", index),
        }
    }

    pub fn release_all(&mut self, indices: &[u8]) {
        for index in indices {
            self.release(*index);
        }
    }

    /// Number of live bindings to the given palette index.
    pub fn ref_count(&self, index: u8) -> u16 {
        slot_of(index).map_or(0, |slot| self.ref_counts[slot])
    }

    /// Color last stored at the given palette index.
    pub fn color(&self, index: u8) -> Option<u16> {
        slot_of(index).map(|slot| self.colors[slot])
    }

    pub fn ref_counts(&self) -> &[u16] {
        &self.ref_counts
    }

    /// Colors stored in slots 1..=255, referenced or not.
    pub fn colors(&self) -> &[u16] {
        &self.colors
    }
}

fn palette_index(slot: usize) -> u8 {
    (slot + 1) as u8
}

fn slot_of(index: u8) -> Option<usize> {
    match index {
        0 => None,
        index => Some(index as usize - 1),
    }
}
