use alloc::vec;
use alloc::vec::Vec;

use super::test_util::{solid_texture, texture_with, Lcg};
use super::{
    Animation, HWSpriteAllocator, HWSpriteSize, ObjAttributes, ObjShape, ObjSize, OamError,
    Sprite,
};
use crate::config::AllocatorConfig;
use crate::shared_types::{Coordinate, Scale, IDENTITY_SCALE};

fn allocator(tile_units: u16, oam_slots: usize, affine_slots: usize) -> HWSpriteAllocator {
    HWSpriteAllocator::new(AllocatorConfig {
        tile_units,
        oam_slots,
        affine_slots,
    })
    .unwrap()
}

fn new_sprite(width_px: u16, height_px: u16, frames: u16, colors: Vec<u16>) -> Sprite {
    Sprite::new(solid_texture(width_px, height_px, frames, colors))
}

/// Stored palette colors and palette RAM, which `PoolSnapshot` doesn't cover.
fn palette_contents(alloc: &HWSpriteAllocator) -> (Vec<u16>, Vec<u16>) {
    (
        alloc.palette().colors().to_vec(),
        alloc.vram().palette().to_vec(),
    )
}

fn descriptor(alloc: &HWSpriteAllocator, slot: u8) -> ObjAttributes {
    ObjAttributes::decode(alloc.vram().read_obj_attributes(slot))
}

/// Loading, drawing and freeing a sprite leaves every pool as it was.
#[test]
fn test_load_free_round_trip() {
    let mut alloc = HWSpriteAllocator::default();
    let before = alloc.snapshot();

    let mut sprite = new_sprite(20, 20, 2, vec![0x001F, 0x03E0]);
    alloc.load(&mut sprite).unwrap();
    assert!(sprite.memory().is_allocated());
    assert_ne!(alloc.snapshot(), before);

    sprite.set_scale(Scale::from_num(2), IDENTITY_SCALE);
    alloc.draw_sprite(&mut sprite).unwrap();
    assert!(sprite.memory().affine_slot().is_some());

    let slot = sprite.memory().oam_slots()[0];
    alloc.free(&mut sprite).unwrap();
    assert!(!sprite.memory().is_allocated());
    assert!(sprite.memory().oam_slots().is_empty());
    assert_eq!(alloc.vram().read_obj_attributes(slot), ObjAttributes::HIDDEN);
    assert_eq!(alloc.snapshot(), before);
}

#[test]
fn test_load_twice() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(8, 8, 1, vec![0x1234]);
    alloc.load(&mut sprite).unwrap();
    let loaded = alloc.snapshot();
    assert_eq!(alloc.load(&mut sprite), Err(OamError::AlreadyLoaded));
    assert_eq!(alloc.snapshot(), loaded);
}

#[test]
fn test_not_loaded() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(8, 8, 1, vec![0x1234]);
    assert_eq!(alloc.free(&mut sprite), Err(OamError::NotLoaded));
    assert_eq!(alloc.load_frame(&mut sprite, 0), Err(OamError::NotLoaded));
    assert_eq!(alloc.draw_sprite(&mut sprite), Err(OamError::NotLoaded));

    alloc.load(&mut sprite).unwrap();
    alloc.free(&mut sprite).unwrap();
    assert_eq!(alloc.free(&mut sprite), Err(OamError::NotLoaded));
}

#[test]
fn test_invalid_frame() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(8, 8, 2, vec![0x1234]);
    alloc.load(&mut sprite).unwrap();
    assert_eq!(
        alloc.load_frame(&mut sprite, 2),
        Err(OamError::InvalidFrame {
            frame: 2,
            frame_count: 2
        })
    );
    assert_eq!(sprite.memory().loaded_frame(), None);
}

#[test]
fn test_load_frame_skips_current_frame() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(8, 8, 2, vec![0x1234]);
    alloc.load(&mut sprite).unwrap();
    assert_eq!(alloc.load_frame(&mut sprite, 0), Ok(true));
    assert_eq!(alloc.load_frame(&mut sprite, 0), Ok(false));
    assert_eq!(alloc.load_frame(&mut sprite, 1), Ok(true));
    assert_eq!(sprite.memory().loaded_frame(), Some(1));
}

#[test]
fn test_palette_shared_between_sprites() {
    let mut alloc = HWSpriteAllocator::default();
    let mut a = new_sprite(8, 8, 1, vec![0x7FFF]);
    let mut b = new_sprite(16, 16, 1, vec![0x7FFF]);
    alloc.load(&mut a).unwrap();
    alloc.load(&mut b).unwrap();
    assert_eq!(a.memory().palette_indices(), b.memory().palette_indices());
    assert_eq!(alloc.palette().ref_count(1), 2);

    alloc.free(&mut a).unwrap();
    assert_eq!(alloc.palette().ref_count(1), 1);
    alloc.free(&mut b).unwrap();
    assert_eq!(alloc.palette().ref_count(1), 0);
}

/// Tile ranges of different sprites never overlap.
#[test]
fn test_sprites_get_disjoint_tiles() {
    let mut alloc = HWSpriteAllocator::default();
    let mut a = new_sprite(72, 40, 1, vec![1]);
    let mut b = new_sprite(20, 20, 1, vec![2]);
    alloc.load(&mut a).unwrap();
    alloc.load(&mut b).unwrap();
    assert_eq!(a.memory().oam_slot_count(), 2);
    assert_eq!(b.memory().oam_slot_count(), 1);
    assert_tiles_disjoint(&alloc);
}

/// A 128x128 sprite needs four slots and only two are handed out.
#[test]
fn test_out_of_oam_slots_reserves_nothing() {
    let mut alloc = allocator(1024, 2, 32);
    let before = alloc.snapshot();
    let colors = palette_contents(&alloc);
    let mut sprite = new_sprite(128, 128, 1, vec![0x1111, 0x2222]);
    assert_eq!(alloc.load(&mut sprite), Err(OamError::OutOfOamSlots));
    assert!(!sprite.memory().is_allocated());
    assert_eq!(alloc.snapshot(), before);
    assert_eq!(palette_contents(&alloc), colors);
}

#[test]
fn test_out_of_tile_memory_reserves_nothing() {
    let mut alloc = allocator(100, 128, 32);
    let before = alloc.snapshot();
    let colors = palette_contents(&alloc);
    let mut sprite = new_sprite(128, 64, 1, vec![0x1111]);
    assert_eq!(alloc.load(&mut sprite), Err(OamError::OutOfTileMemory));
    assert!(!sprite.memory().is_allocated());
    assert_eq!(alloc.snapshot(), before);
    assert_eq!(palette_contents(&alloc), colors);
}

/// Load a sprite, optionally fail a second load for lack of tiles, free the first
/// and return the palette indices a new sprite gets afterwards.
fn reload_after(alloc: &mut HWSpriteAllocator, fail_in_between: bool) -> Vec<u8> {
    let mut big = new_sprite(64, 64, 1, vec![0x0001]);
    alloc.load(&mut big).unwrap();
    if fail_in_between {
        let mut other = new_sprite(64, 64, 1, vec![0x0002]);
        assert_eq!(alloc.load(&mut other), Err(OamError::OutOfTileMemory));
    }
    alloc.free(&mut big).unwrap();

    let mut small = new_sprite(8, 8, 1, vec![0x0002]);
    alloc.load(&mut small).unwrap();
    small.memory().palette_indices().to_vec()
}

/// A load that failed for lack of tiles doesn't influence which palette
/// slot a later sprite gets.
#[test]
fn test_failed_load_leaves_no_palette_trace() {
    let mut with_failure = allocator(64, 128, 32);
    let mut without_failure = allocator(64, 128, 32);
    assert_eq!(reload_after(&mut with_failure, true), [1]);
    assert_eq!(reload_after(&mut without_failure, false), [1]);
    assert_eq!(
        palette_contents(&with_failure),
        palette_contents(&without_failure)
    );
}

#[test]
fn test_out_of_palette_space_reserves_nothing() {
    let mut alloc = HWSpriteAllocator::default();
    let mut full = new_sprite(8, 8, 1, (1..=254).collect());
    alloc.load(&mut full).unwrap();
    let before = alloc.snapshot();
    let colors = palette_contents(&alloc);

    // 0x7000 takes the last free slot, 0x7001 finds none
    let mut sprite = new_sprite(8, 8, 1, vec![0x0001, 0x7000, 0x7001]);
    assert_eq!(alloc.load(&mut sprite), Err(OamError::OutOfPaletteSpace));
    assert_eq!(alloc.snapshot(), before);
    assert_eq!(palette_contents(&alloc), colors);

    // Colors already in the palette can still be shared
    let mut shared = new_sprite(8, 8, 1, vec![0x0001, 0x0002]);
    alloc.load(&mut shared).unwrap();
    assert_eq!(shared.memory().palette_indices(), &[1, 2]);
}

/// Pixels are rewritten from local color indices to palette indices, 0 stays transparent.
#[test]
fn test_frame_upload_remaps_colors() {
    let mut alloc = HWSpriteAllocator::default();
    let mut first = new_sprite(8, 8, 1, vec![0x0002]);
    alloc.load(&mut first).unwrap();

    let texture = texture_with(8, 8, 1, vec![0x0001, 0x0002], |_, _, _, i| (i % 3) as u8);
    let mut sprite = Sprite::new(texture);
    alloc.load(&mut sprite).unwrap();
    assert_eq!(sprite.memory().palette_indices(), &[2, 1]);
    assert_eq!(alloc.load_frame(&mut sprite, 0), Ok(true));

    let entry = *alloc.oam().entry(sprite.memory().oam_slots()[0]).unwrap();
    assert_eq!(entry.tile_start, 1);
    let bytes = alloc.vram().tile_bytes(entry.tile_start, 1).unwrap();
    for (i, byte) in bytes.iter().enumerate() {
        let expected = match i % 3 {
            0 => 0,
            1 => 2,
            _ => 1,
        };
        assert_eq!(*byte, expected, "pixel {}", i);
    }
}

/// Tiles of a slot not covered by the texture are cleared, not left with stale pixels.
#[test]
fn test_uncovered_tiles_are_cleared() {
    let mut alloc = HWSpriteAllocator::default();
    let stale = texture_with(32, 32, 1, vec![0x1111, 0x3333], |_, _, _, _| 2);
    let mut stale = Sprite::new(stale);
    alloc.load(&mut stale).unwrap();
    alloc.load_frame(&mut stale, 0).unwrap();
    alloc.free(&mut stale).unwrap();

    let mut sprite = new_sprite(20, 20, 1, vec![0x2222]);
    alloc.load(&mut sprite).unwrap();
    alloc.load_frame(&mut sprite, 0).unwrap();
    let entry = *alloc.oam().entry(sprite.memory().oam_slots()[0]).unwrap();
    assert_eq!(entry.size, HWSpriteSize::ThirtyTwoByThirtyTwo);
    assert_eq!(entry.tile_start, 0);

    let bytes = alloc.vram().tile_bytes(0, 16).unwrap();
    for (tile, pixels) in bytes.chunks(64).enumerate() {
        let covered = tile % 4 < 3 && tile / 4 < 3;
        let expected = if covered { 1 } else { 0 };
        assert!(pixels.iter().all(|pixel| *pixel == expected), "tile {}", tile);
    }
}

#[test]
fn test_draw_writes_descriptor() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(16, 16, 1, vec![0x1234]);
    sprite.set_position((Coordinate::from_num(10), Coordinate::from_num(20)));
    sprite.layer = 5;
    alloc.load(&mut sprite).unwrap();
    let slot = sprite.memory().oam_slots()[0];
    // Nothing visible before the first draw
    assert_eq!(alloc.vram().read_obj_attributes(slot), ObjAttributes::HIDDEN);

    alloc.draw_sprite(&mut sprite).unwrap();
    let attrs = descriptor(&alloc, slot);
    assert!(!attrs.disabled);
    assert!(attrs.color_256);
    assert_eq!((attrs.size, attrs.shape), (ObjSize::One, ObjShape::Square));
    assert_eq!(attrs.tile_start, alloc.oam().entry(slot).unwrap().tile_start);
    assert_eq!((attrs.x, attrs.y), (10, 20));
    assert_eq!(attrs.priority, 1);
    assert_eq!(attrs.affine_index, None);

    sprite.set_position((Coordinate::from_num(11), Coordinate::from_num(21)));
    alloc.draw_sprite(&mut sprite).unwrap();
    let attrs = descriptor(&alloc, slot);
    assert_eq!((attrs.x, attrs.y), (11, 21));
}

/// Positions wrap around the coordinate space; grid cells are offset by scaled 64 pixel steps.
#[test]
fn test_position_wraps_and_follows_grid() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(72, 8, 1, vec![0x1234]);
    sprite.set_position((Coordinate::from_num(-8), Coordinate::from_num(-1)));
    alloc.load(&mut sprite).unwrap();
    let slots: Vec<u8> = sprite.memory().oam_slots().to_vec();
    assert_eq!(
        alloc.oam().entry(slots[0]).unwrap().size,
        HWSpriteSize::SixtyFourByThirtyTwo
    );
    assert_eq!(
        alloc.oam().entry(slots[1]).unwrap().size,
        HWSpriteSize::EightByEight
    );

    alloc.draw_sprite(&mut sprite).unwrap();
    let (first, second) = (descriptor(&alloc, slots[0]), descriptor(&alloc, slots[1]));
    assert_eq!((first.x, first.y), (504, 255));
    assert_eq!((second.x, second.y), (56, 255));

    sprite.set_scale(Scale::from_num(2), IDENTITY_SCALE);
    alloc.draw_sprite(&mut sprite).unwrap();
    let second = descriptor(&alloc, slots[1]);
    assert_eq!(second.x, 120);
}

/// An affine slot is held exactly while the sprite is scaled.
#[test]
fn test_affine_slot_follows_scale() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(8, 8, 1, vec![0x1234]);
    alloc.load(&mut sprite).unwrap();
    let slot = sprite.memory().oam_slots()[0];

    alloc.draw_sprite(&mut sprite).unwrap();
    assert_eq!(sprite.memory().affine_slot(), None);
    assert_eq!(alloc.affine().used_count(), 0);

    sprite.set_scale(Scale::from_num(2), Scale::from_num(0.5));
    alloc.draw_sprite(&mut sprite).unwrap();
    assert_eq!(sprite.memory().affine_slot(), Some(0));
    assert_eq!(descriptor(&alloc, slot).affine_index, Some(0));
    let params = alloc.vram().read_affine_parameters(0);
    assert_eq!((params.pa, params.pb, params.pc, params.pd), (128, 0, 0, 512));

    sprite.set_scale(IDENTITY_SCALE, IDENTITY_SCALE);
    alloc.draw_sprite(&mut sprite).unwrap();
    assert_eq!(sprite.memory().affine_slot(), None);
    assert_eq!(descriptor(&alloc, slot).affine_index, None);
    assert_eq!(alloc.affine().used_count(), 0);
}

#[test]
fn test_out_of_affine_slots_draws_unscaled() {
    let mut alloc = allocator(1024, 128, 1);
    let mut a = new_sprite(8, 8, 1, vec![0x1234]);
    let mut b = new_sprite(8, 8, 1, vec![0x1234]);
    alloc.load(&mut a).unwrap();
    alloc.load(&mut b).unwrap();
    a.set_scale(Scale::from_num(2), Scale::from_num(2));
    b.set_scale(Scale::from_num(2), Scale::from_num(2));
    alloc.draw_sprite(&mut a).unwrap();
    alloc.draw_sprite(&mut b).unwrap();

    assert_eq!(a.memory().affine_slot(), Some(0));
    assert_eq!(b.memory().affine_slot(), None);
    let slot = b.memory().oam_slots()[0];
    assert_eq!(descriptor(&alloc, slot).affine_index, None);
    assert!(!descriptor(&alloc, slot).disabled);

    // Freed affine slots go to the next sprite asking for one
    alloc.free(&mut a).unwrap();
    alloc.draw_sprite(&mut b).unwrap();
    assert_eq!(b.memory().affine_slot(), Some(0));
}

/// Each draw advances the animation and uploads the frame it lands on.
#[test]
fn test_animation_uploads_frames() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(8, 8, 3, vec![0x0001, 0x0002, 0x0003]);
    sprite.set_animation(Animation::new(vec![0, 1, 2], 1, true));
    alloc.load(&mut sprite).unwrap();
    let tile_start = alloc
        .oam()
        .entry(sprite.memory().oam_slots()[0])
        .unwrap()
        .tile_start;

    for expected in [1, 2, 0, 1].iter() {
        alloc.draw_sprite(&mut sprite).unwrap();
        assert_eq!(sprite.memory().loaded_frame(), Some(*expected));
        let bytes = alloc.vram().tile_bytes(tile_start, 1).unwrap();
        assert!(bytes.iter().all(|pixel| *pixel == *expected as u8 + 1));
    }
}

#[test]
fn test_bad_frame_keeps_sprite_hidden() {
    let mut alloc = HWSpriteAllocator::default();
    let mut sprite = new_sprite(8, 8, 1, vec![0x1234]);
    alloc.load(&mut sprite).unwrap();
    let slot = sprite.memory().oam_slots()[0];

    sprite.current_frame = 5;
    assert_eq!(alloc.draw_sprite(&mut sprite), Ok(()));
    assert_eq!(sprite.memory().loaded_frame(), None);
    assert_eq!(alloc.vram().read_obj_attributes(slot), ObjAttributes::HIDDEN);

    sprite.current_frame = 0;
    alloc.draw_sprite(&mut sprite).unwrap();
    assert!(!descriptor(&alloc, slot).disabled);
}

fn assert_tiles_disjoint(alloc: &HWSpriteAllocator) {
    let mut ranges: Vec<(u16, u16)> = alloc
        .oam()
        .entries()
        .iter()
        .filter(|entry| !entry.free)
        .map(|entry| (entry.tile_start, entry.size.to_num_tiles()))
        .collect();
    ranges.sort();
    for pair in ranges.windows(2) {
        assert!(pair[0].0 + pair[0].1 <= pair[1].0, "{:?} overlaps", pair);
    }
    let used: u16 = ranges.iter().map(|(_, length)| *length).sum();
    assert_eq!(used + alloc.tiles().free_units(), alloc.tiles().capacity());
}

/// Random loads, draws and frees never leak or double-book anything.
#[test]
fn test_stress() {
    const SIZES: [(u16, u16); 7] = [
        (8, 8),
        (16, 16),
        (20, 20),
        (64, 64),
        (72, 40),
        (128, 128),
        (24, 8),
    ];
    let mut rng = Lcg::new(0xBEEF);
    let mut alloc = HWSpriteAllocator::default();
    let before = alloc.snapshot();

    let mut sprites: Vec<Sprite> = (0..16)
        .map(|i| {
            let (w, h) = SIZES[i % SIZES.len()];
            let colors = (0..rng.next(4) + 1).map(|_| rng.next(8) as u16).collect();
            new_sprite(w, h, rng.next(3) as u16 + 1, colors)
        })
        .collect();

    for _ in 0..3000 {
        let sprite = &mut sprites[rng.next(16) as usize];
        if !sprite.memory().is_allocated() {
            match alloc.load(sprite) {
                Ok(()) => {}
                Err(OamError::OutOfTileMemory) | Err(OamError::OutOfOamSlots) => {
                    assert!(!sprite.memory().is_allocated());
                }
                Err(err) => panic!("unexpected {}", err),
            }
        } else if rng.next(4) == 0 {
            alloc.free(sprite).unwrap();
        } else {
            sprite.current_frame = rng.next(sprite.texture().frame_count() as u32) as u16;
            let scale = if rng.next(2) == 0 {
                IDENTITY_SCALE
            } else {
                Scale::from_num(2)
            };
            sprite.set_scale(scale, IDENTITY_SCALE);
            alloc.draw_sprite(sprite).unwrap();
        }
        assert_tiles_disjoint(&alloc);
    }

    for sprite in sprites.iter_mut() {
        if sprite.memory().is_allocated() {
            alloc.free(sprite).unwrap();
        }
    }
    assert_eq!(alloc.snapshot(), before);
    for slot in 0..128 {
        assert_eq!(alloc.vram().read_obj_attributes(slot), ObjAttributes::HIDDEN);
    }
}
