//! This module contains types that don't really belong into other modules,
//! yet are used by several of them.

use fixed::{types::extra::U8, FixedI32};

/// A fixed-point coordinate is used because the target hardware has no FPU.
/// The coordinate has 23 bits of precision before and 8 after the comma.
pub type Coordinate = FixedI32<U8>;
pub type Position = (Coordinate, Coordinate);

/// Scale factors share the coordinate format, `1.0` meaning no scaling.
pub type Scale = FixedI32<U8>;
/// The scale at which no affine transform is needed.
pub const IDENTITY_SCALE: Scale = Scale::from_bits(1 << 8);
