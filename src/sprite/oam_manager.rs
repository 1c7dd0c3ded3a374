use alloc::vec::Vec;
use core::hash::BuildHasherDefault;

use hashbrown::hash_map::HashMap;
use twox_hash::XxHash64;

use super::hw_sprite_alloc::{HWSpriteAllocator, PoolSnapshot};
use super::{OamError, Sprite};
use crate::config::{AllocatorConfig, ConfigError};

/// Identifies a sprite registered with an `OamManager`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct SpriteId(u32);

/// Owns the sprites of one display engine and draws the loaded ones every frame.
///
/// Sprites are drawn in the order they were loaded. Resources freed while drawing
/// one sprite are available to every sprite drawn after it.
#[derive(Debug, Default)]
pub struct OamManager {
    allocator: HWSpriteAllocator,
    sprites: HashMap<SpriteId, Sprite, BuildHasherDefault<XxHash64>>,
    active: Vec<SpriteId>,
    next_id: u32,
}

impl OamManager {
    pub fn new(config: AllocatorConfig) -> Result<OamManager, ConfigError> {
        return Ok(OamManager {
            allocator: HWSpriteAllocator::new(config)?,
            sprites: Default::default(),
            active: Vec::new(),
            next_id: 0,
        });
    }

    /// Register a sprite. It holds no hardware resources until loaded.
    pub fn add_sprite(&mut self, sprite: Sprite) -> SpriteId {
        let id = SpriteId(self.next_id);
        self.next_id += 1;
        self.sprites.insert(id, sprite);
        return id;
    }

    /// Unregister a sprite, freeing it first if it is loaded.
    pub fn remove_sprite(&mut self, id: SpriteId) -> Option<Sprite> {
        if self.is_loaded(id) {
            if let Err(err) = self.free_sprite(id) {
                log::warn!("Failed to free sprite {:?} before removing it: {}", id, err);
            }
        }
        self.sprites.remove(&id)
    }

    pub fn sprite(&self, id: SpriteId) -> Option<&Sprite> {
        self.sprites.get(&id)
    }

    /// Game code moves, scales and animates sprites through this.
    pub fn sprite_mut(&mut self, id: SpriteId) -> Option<&mut Sprite> {
        self.sprites.get_mut(&id)
    }

    pub fn is_loaded(&self, id: SpriteId) -> bool {
        self.sprites
            .get(&id)
            .map_or(false, |sprite| sprite.memory().is_allocated())
    }

    /// Reserve hardware resources for the sprite and start drawing it.
    pub fn load_sprite(&mut self, id: SpriteId) -> Result<(), OamError> {
        let sprite = self.sprites.get_mut(&id).ok_or(OamError::NoSuchSprite)?;
        self.allocator.load(sprite)?;
        self.active.push(id);
        return Ok(());
    }

    /// Upload a frame right away instead of waiting for the next draw.
    pub fn load_sprite_frame(&mut self, id: SpriteId, frame: u16) -> Result<bool, OamError> {
        let sprite = self.sprites.get_mut(&id).ok_or(OamError::NoSuchSprite)?;
        self.allocator.load_frame(sprite, frame)
    }

    /// Stop drawing the sprite and give back its hardware resources.
    pub fn free_sprite(&mut self, id: SpriteId) -> Result<(), OamError> {
        let sprite = self.sprites.get_mut(&id).ok_or(OamError::NoSuchSprite)?;
        self.allocator.free(sprite)?;
        self.active.retain(|active| *active != id);
        return Ok(());
    }

    /// Run the per-frame update for every loaded sprite.
    pub fn draw(&mut self) {
        for id in self.active.iter() {
            if let Some(sprite) = self.sprites.get_mut(id) {
                if let Err(err) = self.allocator.draw_sprite(sprite) {
                    log::warn!("Failed to draw sprite {:?}: {}", id, err);
                }
            }
        }
    }

    /// Loaded sprites in drawing order.
    pub fn active_sprites(&self) -> &[SpriteId] {
        &self.active
    }

    pub fn allocator(&self) -> &HWSpriteAllocator {
        &self.allocator
    }

    pub fn snapshot(&self) -> PoolSnapshot {
        self.allocator.snapshot()
    }

    pub fn dump_state(&self) {
        self.allocator.dump_state();
    }
}
