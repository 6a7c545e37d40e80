use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Default chunk width (X and Z) in voxels.
pub const CHUNK_WIDTH: usize = 16;
/// Default chunk height (Y) in voxels.
pub const CHUNK_HEIGHT: usize = 256;
/// Largest supported chunk width.
pub const MAX_CHUNK_WIDTH: usize = 64;
/// Largest supported chunk height; per-column height bounds are stored as `u8`.
pub const MAX_CHUNK_HEIGHT: usize = 256;

/// Error returned when constructing invalid [`ChunkDims`].
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum DimsError {
    /// Width outside `1..=MAX_CHUNK_WIDTH`.
    #[error("chunk width {0} out of range (1..={MAX_CHUNK_WIDTH})")]
    Width(usize),
    /// Height outside `1..=MAX_CHUNK_HEIGHT`.
    #[error("chunk height {0} out of range (1..={MAX_CHUNK_HEIGHT})")]
    Height(usize),
}

/// Chunk extents: a square `width x width` footprint, `height` layers tall.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "RawDims", into = "RawDims")]
pub struct ChunkDims {
    width: usize,
    height: usize,
}

impl ChunkDims {
    /// Validate and construct chunk dimensions.
    pub fn new(width: usize, height: usize) -> Result<Self, DimsError> {
        if width == 0 || width > MAX_CHUNK_WIDTH {
            return Err(DimsError::Width(width));
        }
        if height == 0 || height > MAX_CHUNK_HEIGHT {
            return Err(DimsError::Height(height));
        }
        Ok(Self { width, height })
    }

    /// Interior width (X and Z).
    #[inline]
    pub const fn width(&self) -> usize {
        self.width
    }

    /// Number of Y layers.
    #[inline]
    pub const fn height(&self) -> usize {
        self.height
    }

    /// Width of the padded view (interior plus a 1-cell border per side).
    #[inline]
    pub const fn padded_width(&self) -> usize {
        self.width + 2
    }

    /// Voxel count of one chunk interior.
    #[inline]
    pub const fn volume(&self) -> usize {
        self.width * self.width * self.height
    }

    /// Voxel count of the padded view.
    #[inline]
    pub const fn padded_volume(&self) -> usize {
        self.padded_width() * self.padded_width() * self.height
    }
}

impl Default for ChunkDims {
    fn default() -> Self {
        Self {
            width: CHUNK_WIDTH,
            height: CHUNK_HEIGHT,
        }
    }
}

#[derive(Serialize, Deserialize)]
struct RawDims {
    width: usize,
    height: usize,
}

impl TryFrom<RawDims> for ChunkDims {
    type Error = DimsError;

    fn try_from(raw: RawDims) -> Result<Self, Self::Error> {
        ChunkDims::new(raw.width, raw.height)
    }
}

impl From<ChunkDims> for RawDims {
    fn from(dims: ChunkDims) -> Self {
        Self {
            width: dims.width,
            height: dims.height,
        }
    }
}
