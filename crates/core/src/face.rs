use serde::{Deserialize, Serialize};

/// Faces corresponding to a block's six sides.
///
/// The discriminant is the stable face index used by per-face tables
/// (`BlockData::faces`) and by emitted quads: `2 * axis + (negative as u8)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[repr(u8)]
pub enum BlockFace {
    /// Positive X face.
    East = 0,
    /// Negative X face.
    West = 1,
    /// Positive Y / top face.
    Up = 2,
    /// Negative Y / bottom face.
    Down = 3,
    /// Positive Z face.
    South = 4,
    /// Negative Z face.
    North = 5,
}

impl BlockFace {
    /// All faces in index order.
    pub const ALL: [BlockFace; 6] = [
        BlockFace::East,
        BlockFace::West,
        BlockFace::Up,
        BlockFace::Down,
        BlockFace::South,
        BlockFace::North,
    ];

    /// Stable index in `0..6`.
    #[inline]
    pub const fn index(self) -> usize {
        self as usize
    }

    /// Inverse of [`BlockFace::index`].
    pub const fn from_index(index: usize) -> Option<Self> {
        match index {
            0 => Some(BlockFace::East),
            1 => Some(BlockFace::West),
            2 => Some(BlockFace::Up),
            3 => Some(BlockFace::Down),
            4 => Some(BlockFace::South),
            5 => Some(BlockFace::North),
            _ => None,
        }
    }

    /// Axis the face normal lies on (0 = X, 1 = Y, 2 = Z).
    #[inline]
    pub const fn axis(self) -> usize {
        self.index() / 2
    }

    /// +1 for faces pointing along the positive axis, -1 otherwise.
    #[inline]
    pub const fn sign(self) -> i32 {
        if self.index() % 2 == 0 {
            1
        } else {
            -1
        }
    }

    /// Whether the normal points along the positive axis.
    #[inline]
    pub const fn is_positive(self) -> bool {
        self.index() % 2 == 0
    }

    /// The face pointing the other way on the same axis.
    pub const fn opposite(self) -> Self {
        match self {
            BlockFace::East => BlockFace::West,
            BlockFace::West => BlockFace::East,
            BlockFace::Up => BlockFace::Down,
            BlockFace::Down => BlockFace::Up,
            BlockFace::South => BlockFace::North,
            BlockFace::North => BlockFace::South,
        }
    }

    /// Integer unit normal.
    pub const fn normal(self) -> [i32; 3] {
        let mut normal = [0; 3];
        normal[self.axis()] = self.sign();
        normal
    }

    /// In-plane axes `(u, v)` used for mask layout and greedy growth.
    #[inline]
    pub const fn tangent_axes(self) -> (usize, usize) {
        let axis = self.axis();
        ((axis + 1) % 3, (axis + 2) % 3)
    }
}
