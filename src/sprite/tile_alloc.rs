//! First-fit allocator over object tile memory.
//!
//! Free space is kept as a list of zones sorted by start. Zones never overlap and
//! no two zones touch; releasing a range merges it with whatever it borders.

use alloc::vec;
use alloc::vec::Vec;

use super::OamError;
use crate::debug_log::Subsystems;

/// A contiguous run of free tiles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TileFreeZone {
    pub start: u16,
    pub length: u16,
}

impl TileFreeZone {
    /// One past the last tile of the zone.
    pub fn end(&self) -> u16 {
        self.start + self.length
    }
}

#[derive(Debug, Clone)]
pub struct TileAllocator {
    capacity: u16,
    free_zones: Vec<TileFreeZone>,
}

impl TileAllocator {
    /// Create an allocator managing `capacity` tiles, all of them free.
    pub fn new(capacity: u16) -> TileAllocator {
        let mut allocator = TileAllocator {
            capacity,
            free_zones: Vec::new(),
        };
        allocator.reset();
        return allocator;
    }

    /// Mark all of tile memory as free again.
    pub fn reset(&mut self) {
        self.free_zones = if self.capacity > 0 {
            vec![TileFreeZone {
                start: 0,
                length: self.capacity,
            }]
        } else {
            Vec::new()
        };
    }

    /// Reserve `length` contiguous tiles and return the first one.
    ///
    /// The first zone (lowest start) that is large enough is used, and the
    /// range is taken from its front.
    pub fn reserve(&mut self, length: u16) -> Result<u16, OamError> {
        if length == 0 {
            return Err(OamError::InvalidTileLength);
        }
        let idx = match self.free_zones.iter().position(|zone| zone.length >= length) {
            Some(idx) => idx,
            None => {
                crate::debug_log!(
                    Subsystems::TileAlloc,
                    "No free zone for {} tiles (largest is {})",
                    length,
                    self.largest_free_zone()
                );
                return Err(OamError::OutOfTileMemory);
            }
        };

        let zone = &mut self.free_zones[idx];
        let start = zone.start;
        if zone.length == length {
            crate::debug_log!(
                Subsystems::TileAlloc,
                "Removing free zone #{} (start {} length {})",
                idx,
                zone.start,
                zone.length
            );
            self.free_zones.remove(idx);
        } else {
            zone.start += length;
            zone.length -= length;
            crate::debug_log!(
                Subsystems::TileAlloc,
                "Shrinking free zone #{} to start {} length {}",
                idx,
                zone.start,
                zone.length
            );
        }
        return Ok(start);
    }

    /// Return `length` tiles starting at `start` to the free list.
    pub fn release(&mut self, start: u16, length: u16) -> Result<(), OamError> {
        if length == 0 {
            return Err(OamError::InvalidTileLength);
        }
        let end = start + length;
        // Index of the first zone behind the released range
        let after = self.free_zones.partition_point(|zone| zone.start <= start);
        debug_assert!(
            after == 0 || self.free_zones[after - 1].end() <= start,
            "double release of tiles {}..{}",
            start,
            end
        );
        debug_assert!(
            after == self.free_zones.len() || end <= self.free_zones[after].start,
            "double release of tiles {}..{}",
            start,
            end
        );

        let merge_prev = after > 0 && self.free_zones[after - 1].end() == start;
        let merge_next = after < self.free_zones.len() && self.free_zones[after].start == end;

        match (merge_prev, merge_next) {
            (true, true) => {
                let next = self.free_zones.remove(after);
                self.free_zones[after - 1].length += length + next.length;
            }
            (true, false) => {
                self.free_zones[after - 1].length += length;
            }
            (false, true) => {
                let next = &mut self.free_zones[after];
                next.start = start;
                next.length += length;
            }
            (false, false) => {
                self.free_zones.insert(after, TileFreeZone { start, length });
            }
        }
        crate::debug_log!(
            Subsystems::TileAlloc,
            "Released tiles {}..{} (merge prev: {}, merge next: {})",
            start,
            end,
            merge_prev,
            merge_next
        );
        return Ok(());
    }

    /// The free zones in ascending order.
    pub fn free_zones(&self) -> &[TileFreeZone] {
        &self.free_zones
    }

    /// Total number of free tiles.
    pub fn free_units(&self) -> u16 {
        self.free_zones.iter().map(|zone| zone.length).sum()
    }

    /// Length of the largest reservation that would currently succeed.
    pub fn largest_free_zone(&self) -> u16 {
        self.free_zones
            .iter()
            .map(|zone| zone.length)
            .max()
            .unwrap_or(0)
    }

    pub fn capacity(&self) -> u16 {
        self.capacity
    }
}

#[cfg(test)]
impl TileAllocator {
    /// Build an allocator with a hand-picked free list.
    pub(crate) fn with_free_zones(capacity: u16, free_zones: Vec<TileFreeZone>) -> TileAllocator {
        TileAllocator {
            capacity,
            free_zones,
        }
    }
}
