//! Constants used in multiple modules.

/// Size of a single tile edge in pixels
pub const TILE_SIZE_IN_PX: usize = 8;
/// Size of a single 8bpp tile in bytes
pub const TILE_SIZE_BYTES: usize = TILE_SIZE_IN_PX * TILE_SIZE_IN_PX;
/// Number of u32's that make up an 8bpp tile.
pub const TILE_SIZE_U32S: usize = TILE_SIZE_BYTES / 4;

/// Largest edge of a single hardware sprite in tiles.
pub const OBJ_MAX_TILES: usize = 8;
/// Largest edge of a single hardware sprite in pixels.
pub const OBJ_MAX_PX: i32 = (OBJ_MAX_TILES * TILE_SIZE_IN_PX) as i32;

/// Number of object descriptors in OAM.
pub const OAM_SLOT_COUNT: usize = 128;
/// Number of affine parameter sets interleaved with the descriptors.
pub const AFFINE_SLOT_COUNT: usize = 32;
/// Number of colors in object palette RAM, including the transparent color 0.
pub const PALETTE_SIZE: usize = 256;
/// Number of assignable palette slots (1..=255).
pub const PALETTE_SLOT_COUNT: usize = PALETTE_SIZE - 1;
/// The descriptor's tile field is 10 bits wide.
pub const MAX_TILE_UNITS: u16 = 1 << 10;

/// Size of OAM in u16's (8 bytes per descriptor).
pub const OAM_SIZE_U16S: usize = OAM_SLOT_COUNT * 4;

/// X positions wrap around at this many pixels.
pub const OBJ_X_WRAP_PX: i32 = 512;
/// Y positions wrap around at this many pixels.
pub const OBJ_Y_WRAP_PX: i32 = 256;
