mod affine_alloc;
mod error;
mod game_sprite;
mod hw_sprite;
mod hw_sprite_alloc;
mod hw_sprite_handle;
mod oam_manager;
mod oam_table;
mod obj_attr;
mod palette_alloc;
mod sprite_dma;
mod texture;
mod tile_alloc;
pub use affine_alloc::AffineAllocator;
pub use error::{OamError, TextureError};
pub use game_sprite::{Animation, Sprite};
pub use hw_sprite::HWSpriteSize;
pub use hw_sprite_alloc::{HWSpriteAllocator, PoolSnapshot};
pub use hw_sprite_handle::{AllocationState, SpriteMemory};
pub use oam_manager::{OamManager, SpriteId};
pub use oam_table::{OamEntry, OamSlotList, OamTable};
pub use obj_attr::{ObjAttributes, ObjShape, ObjSize};
pub use palette_alloc::{PaletteAllocator, PaletteBinding};
pub use texture::Texture;
pub use tile_alloc::{TileAllocator, TileFreeZone};

#[cfg(test)]
mod test_util;
#[cfg(test)]
mod hw_sprite_alloc_test;
