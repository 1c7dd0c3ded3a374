//! Allocator for the object (hardware sprite) resources of a tile-based 2D display engine.
//!
//! Sprites are bound to four fixed pools: OAM descriptors, object tile memory,
//! the shared object palette and the affine parameter groups. Everything is owned by
//! one `HWSpriteAllocator` per display engine (or an `OamManager`, which also keeps
//! the sprites and their drawing order).

#![cfg_attr(not(test), no_std)]

extern crate alloc;

pub mod debug_log;

pub mod config;
pub mod shared_constants;
pub mod shared_types;
pub mod sprite;
pub mod vram;


pub use config::{AllocatorConfig, ConfigError};
pub use sprite::{HWSpriteAllocator, OamError, OamManager, Sprite, SpriteId, Texture};
