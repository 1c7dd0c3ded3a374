//! The memory regions the sprite allocator writes to: OAM, object palette RAM
//! and object tile RAM.
//!
//! On hardware these are memory-mapped. Here they're plain buffers owned by the
//! allocator, so descriptor bit patterns and uploaded tiles can be inspected directly.
//! Whatever presents the frame copies them out on VBlank.

use alloc::vec;
use alloc::vec::Vec;
use byte_slice_cast::AsByteSlice;

use crate::shared_constants::*;

/// Byte offsets of pa/pb/pc/pd inside an affine parameter group, in u16's.
const AFFINE_PARAM_OFFSETS_U16: [usize; 4] = [0x6 / 2, 0xE / 2, 0x16 / 2, 0x1E / 2];
/// One affine parameter group spans 0x20 bytes (four descriptors).
const AFFINE_GROUP_STRIDE_U16: usize = 0x20 / 2;

/// Returned on failed interactions with VRAM.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum VRAMError {
    InvalidOffset,
    InvalidSize,
}

impl core::fmt::Display for VRAMError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use VRAMError::*;
        match self {
            InvalidOffset => write!(f, "VRAMError: Destination is outside of tile memory"),
            InvalidSize => write!(f, "VRAMError: Transfer doesn't fit into tile memory"),
        }
    }
}

/// 2x2 fixed-point (8.8) transform matrix as stored in OAM.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct AffineParameters {
    pub pa: u16,
    pub pb: u16,
    pub pc: u16,
    pub pd: u16,
}

/// Object VRAM, palette RAM and OAM of one display engine.
#[derive(Debug, Clone)]
pub struct VideoMemory {
    oam: Vec<u16>,
    palette: Vec<u16>,
    tiles: Vec<u32>,
}

impl VideoMemory {
    /// Create zeroed video memory with room for `tile_units` 8bpp tiles.
    pub fn new(tile_units: u16) -> VideoMemory {
        return VideoMemory {
            oam: vec![0; OAM_SIZE_U16S],
            palette: vec![0; PALETTE_SIZE],
            tiles: vec![0; tile_units as usize * TILE_SIZE_U32S],
        };
    }

    /// Returns the three attribute words of the given descriptor.
    pub fn read_obj_attributes(&self, slot: u8) -> [u16; 3] {
        let base = slot as usize * 4;
        return [self.oam[base], self.oam[base + 1], self.oam[base + 2]];
    }

    /// Writes the three attribute words of the given descriptor.
    /// The fourth word belongs to the affine parameters and is left alone.
    pub fn write_obj_attributes(&mut self, slot: u8, attrs: [u16; 3]) {
        let base = slot as usize * 4;
        self.oam[base..base + 3].copy_from_slice(&attrs);
    }

    pub fn read_affine_parameters(&self, slot: u8) -> AffineParameters {
        let base = slot as usize * AFFINE_GROUP_STRIDE_U16;
        let [a, b, c, d] = AFFINE_PARAM_OFFSETS_U16;
        return AffineParameters {
            pa: self.oam[base + a],
            pb: self.oam[base + b],
            pc: self.oam[base + c],
            pd: self.oam[base + d],
        };
    }

    pub fn write_affine_parameters(&mut self, slot: u8, params: AffineParameters) {
        let base = slot as usize * AFFINE_GROUP_STRIDE_U16;
        let [a, b, c, d] = AFFINE_PARAM_OFFSETS_U16;
        self.oam[base + a] = params.pa;
        self.oam[base + b] = params.pb;
        self.oam[base + c] = params.pc;
        self.oam[base + d] = params.pd;
    }

    /// Raw OAM contents.
    pub fn oam(&self) -> &[u16] {
        &self.oam
    }

    pub fn palette_color(&self, index: u8) -> u16 {
        self.palette[index as usize]
    }

    pub fn write_palette_color(&mut self, index: u8, color: u16) {
        self.palette[index as usize] = color;
    }

    /// Raw object palette RAM contents.
    pub fn palette(&self) -> &[u16] {
        &self.palette
    }

    /// Returns the bytes of `count` tiles starting at tile `start`.
    pub fn tile_bytes(&self, start: u16, count: u16) -> Option<&[u8]> {
        let begin = start as usize * TILE_SIZE_U32S;
        let end = begin + count as usize * TILE_SIZE_U32S;
        self.tiles.get(begin..end).map(|words| words.as_byte_slice())
    }

    /// Bulk copy whole words into tile memory, starting at the given tile.
    ///
    /// # Errors
    /// Will return a `VRAMError` if the transfer doesn't consist of whole tiles
    /// or would write past the end of tile memory.
    pub fn dma_copy_words(&mut self, data: &[u32], dest_tile: u16) -> Result<(), VRAMError> {
        // Sanity checks
        let begin = dest_tile as usize * TILE_SIZE_U32S;
        if begin >= self.tiles.len() {
            return Err(VRAMError::InvalidOffset);
        }
        if (data.len() % TILE_SIZE_U32S) != 0 || begin + data.len() > self.tiles.len() {
            return Err(VRAMError::InvalidSize);
        }
        self.tiles[begin..begin + data.len()].copy_from_slice(data);
        return Ok(());
    }
}
