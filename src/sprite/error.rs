use crate::vram::VRAMError;

/// The error returned in sprite allocation-related failure cases.
///
/// Every failure is local: an operation that returns one of these leaves the
/// tile memory, OAM, palette and affine pools exactly as they were before the call.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OamError {
    /// The sprite already holds hardware resources.
    AlreadyLoaded,
    /// The sprite holds no hardware resources.
    NotLoaded,
    /// No free OAM slot remains.
    OutOfOamSlots,
    /// No free zone of tile memory is large enough.
    OutOfTileMemory,
    /// Every palette slot is referenced and none matches the requested color.
    OutOfPaletteSpace,
    /// The requested animation frame does not exist in the texture.
    InvalidFrame { frame: u16, frame_count: u16 },
    /// Tile reservations and releases must cover at least one tile.
    InvalidTileLength,
    /// No sprite is registered under the given ID.
    NoSuchSprite,
    /// Bulk copy into tile memory was rejected.
    Vram(VRAMError),
}

impl core::fmt::Display for OamError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use OamError::*;
        match self {
            AlreadyLoaded => write!(f, "OamError: Sprite is already loaded"),
            NotLoaded => write!(f, "OamError: Sprite is not loaded"),
            OutOfOamSlots => write!(
                f,
                "OamError: Can't create sprite because OAM is full"
            ),
            OutOfTileMemory => write!(
                f,
                "OamError: No contiguous free block of tile memory available to allocate hardware sprite"
            ),
            OutOfPaletteSpace => write!(
                f,
                "OamError: No matching or unreferenced palette slot available"
            ),
            InvalidFrame { frame, frame_count } => write!(
                f,
                "OamError: Frame {} is out of range (texture has {} frames)",
                frame, frame_count
            ),
            InvalidTileLength => write!(f, "OamError: Tile ranges must not be empty"),
            NoSuchSprite => write!(f, "OamError: No sprite registered under that ID"),
            Vram(err) => write!(f, "OamError: Tile upload failed: {}", err),
        }
    }
}

impl From<VRAMError> for OamError {
    fn from(error: VRAMError) -> Self {
        OamError::Vram(error)
    }
}

/// Failure conditions for constructing a texture.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum TextureError {
    /// The tile data doesn't match `frames * tiles_w * tiles_h` 8bpp tiles.
    TileDataLength { expected: usize, actual: usize },
    /// A texture can reference at most 255 colors, as index 0 is transparent.
    TooManyColors(usize),
    /// Width, height and frame count must all be non-zero.
    Empty,
}

impl core::fmt::Display for TextureError {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        use TextureError::*;
        match self {
            TileDataLength { expected, actual } => write!(
                f,
                "TextureError: Expected {} bytes of tile data, got {}",
                expected, actual
            ),
            TooManyColors(count) => write!(
                f,
                "TextureError: {} colors don't fit into a 255 entry palette",
                count
            ),
            Empty => write!(f, "TextureError: Texture has no pixels or no frames"),
        }
    }
}
