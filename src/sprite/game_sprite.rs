use alloc::rc::Rc;
use alloc::vec::Vec;

use super::{SpriteMemory, Texture};
use crate::shared_types::{Coordinate, Position, Scale, IDENTITY_SCALE};

/// Frame sequence played back by a sprite.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Animation {
    frames: Vec<u16>,
    ticks_per_frame: u16,
    looping: bool,
    ticks: u16,
    position: usize,
}

impl Animation {
    /// Show each of `frames` for `ticks_per_frame` draws.
    pub fn new(frames: Vec<u16>, ticks_per_frame: u16, looping: bool) -> Animation {
        Animation {
            frames,
            ticks_per_frame: ticks_per_frame.max(1),
            looping,
            ticks: 0,
            position: 0,
        }
    }

    pub fn current_frame(&self) -> Option<u16> {
        self.frames.get(self.position).copied()
    }

    pub fn is_finished(&self) -> bool {
        !self.looping && self.position + 1 >= self.frames.len()
    }

    /// Advance by one draw.
    pub fn tick(&mut self) {
        if self.frames.is_empty() {
            return;
        }
        self.ticks += 1;
        if self.ticks < self.ticks_per_frame {
            return;
        }
        self.ticks = 0;
        if self.position + 1 < self.frames.len() {
            self.position += 1;
        } else if self.looping {
            self.position = 0;
        }
    }

    pub fn restart(&mut self) {
        self.ticks = 0;
        self.position = 0;
    }
}

/// A sprite as seen by game code: a texture plus where and how to show it.
#[derive(Debug)]
pub struct Sprite {
    pub(super) texture: Rc<Texture>,
    pub x: Coordinate,
    pub y: Coordinate,
    pub scale_x: Scale,
    pub scale_y: Scale,
    /// Only the lowest two bits end up in the descriptor's priority.
    pub layer: u8,
    pub current_frame: u16,
    pub animation: Option<Animation>,
    pub(super) memory: SpriteMemory,
}

impl Sprite {
    pub fn new(texture: Rc<Texture>) -> Sprite {
        Sprite {
            texture,
            x: Coordinate::from_num(0),
            y: Coordinate::from_num(0),
            scale_x: IDENTITY_SCALE,
            scale_y: IDENTITY_SCALE,
            layer: 0,
            current_frame: 0,
            animation: None,
            memory: SpriteMemory::default(),
        }
    }

    pub fn texture(&self) -> &Texture {
        &self.texture
    }

    pub fn memory(&self) -> &SpriteMemory {
        &self.memory
    }

    pub fn position(&self) -> Position {
        (self.x, self.y)
    }

    pub fn set_position(&mut self, (x, y): Position) {
        self.x = x;
        self.y = y;
    }

    pub fn set_scale(&mut self, scale_x: Scale, scale_y: Scale) {
        self.scale_x = scale_x;
        self.scale_y = scale_y;
    }

    /// Whether drawing needs an affine transform.
    pub fn is_scaled(&self) -> bool {
        self.scale_x != IDENTITY_SCALE || self.scale_y != IDENTITY_SCALE
    }

    pub fn set_animation(&mut self, animation: Animation) {
        if let Some(frame) = animation.current_frame() {
            self.current_frame = frame;
        }
        self.animation = Some(animation);
    }

    /// Advance the animation, if any, and pick up its frame.
    pub fn tick(&mut self) {
        if let Some(animation) = self.animation.as_mut() {
            animation.tick();
            if let Some(frame) = animation.current_frame() {
                self.current_frame = frame;
            }
        }
    }
}
