use std::fmt;

use voxmesh_core::{BlockId, ChunkDims};

/// Chunk coordinate (X,Z) in chunk space.
/// Implements Ord for deterministic iteration in BTreeMap/BTreeSet (sorts by x, then z).
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, serde::Serialize, serde::Deserialize,
)]
pub struct ChunkPos {
    /// Chunk X coordinate.
    pub x: i32,
    /// Chunk Z coordinate.
    pub z: i32,
}

impl ChunkPos {
    /// Construct a chunk position.
    pub const fn new(x: i32, z: i32) -> Self {
        Self { x, z }
    }

    /// Position offset by a chunk-space delta.
    pub const fn offset(self, delta: [i32; 2]) -> Self {
        Self::new(self.x + delta[0], self.z + delta[1])
    }
}

impl fmt::Display for ChunkPos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({}, {})", self.x, self.z)
    }
}

bitflags::bitflags! {
    #[derive(Clone, Copy, Debug, PartialEq, Eq)]
    /// Dirty flags set whenever chunk data changes.
    pub struct DirtyFlags: u8 {
        /// The chunk's own blocks changed.
        const MESH = 0b0000_0001;
        /// A neighbour's edge blocks changed; the border copy is stale.
        const BORDER = 0b0000_0010;
    }
}

impl Default for DirtyFlags {
    fn default() -> Self {
        DirtyFlags::empty()
    }
}

/// Chunk storing its interior block ids plus dirty flags.
///
/// Blocks are laid out `(y * width + z) * width + x`.
pub struct Chunk {
    position: ChunkPos,
    dims: ChunkDims,
    blocks: Vec<BlockId>,
    dirty: DirtyFlags,
}

impl Chunk {
    /// Allocate a fresh chunk filled with block 0.
    pub fn new(position: ChunkPos, dims: ChunkDims) -> Self {
        Self::filled(position, dims, 0)
    }

    /// Allocate a chunk filled with `block`.
    pub fn filled(position: ChunkPos, dims: ChunkDims, block: BlockId) -> Self {
        Self {
            position,
            dims,
            blocks: vec![block; dims.volume()],
            dirty: DirtyFlags::all(),
        }
    }

    /// Chunk-space position.
    #[inline]
    pub fn position(&self) -> ChunkPos {
        self.position
    }

    /// Interior dimensions.
    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    #[inline]
    fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let w = self.dims.width();
        debug_assert!(x < w && z < w && y < self.dims.height());
        (y * w + z) * w + x
    }

    /// Fetch a block id.
    #[inline]
    pub fn block(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.blocks[self.index(x, y, z)]
    }

    /// Set a block and mark the mesh dirty if it changed.
    pub fn set_block(&mut self, x: usize, y: usize, z: usize, block: BlockId) -> bool {
        let idx = self.index(x, y, z);
        if self.blocks[idx] == block {
            return false;
        }
        self.blocks[idx] = block;
        self.dirty.insert(DirtyFlags::MESH);
        true
    }

    /// Fill every layer in `ys` with one block.
    pub fn fill_layers(&mut self, ys: std::ops::Range<usize>, block: BlockId) {
        let layer = self.dims.width() * self.dims.width();
        let start = ys.start * layer;
        let end = ys.end.min(self.dims.height()) * layer;
        if start < end {
            self.blocks[start..end].fill(block);
            self.dirty.insert(DirtyFlags::MESH);
        }
    }

    /// Borrow raw block storage.
    pub fn blocks(&self) -> &[BlockId] {
        &self.blocks
    }

    /// Add dirty flags without touching blocks.
    pub fn mark_dirty(&mut self, flags: DirtyFlags) {
        self.dirty.insert(flags);
    }

    /// Current dirty flags.
    pub fn dirty_flags(&self) -> DirtyFlags {
        self.dirty
    }

    /// Consume and return the current dirty flags.
    pub fn take_dirty_flags(&mut self) -> DirtyFlags {
        let flags = self.dirty;
        self.dirty = DirtyFlags::empty();
        flags
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn dims() -> ChunkDims {
        ChunkDims::new(4, 8).unwrap()
    }

    #[test]
    fn set_and_get_block_marks_dirty() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), dims());
        assert!(chunk.take_dirty_flags().contains(DirtyFlags::MESH));
        assert!(chunk.set_block(1, 2, 3, 5));
        assert_eq!(chunk.block(1, 2, 3), 5);
        assert!(chunk.take_dirty_flags().contains(DirtyFlags::MESH));
    }

    #[test]
    fn set_same_block_no_dirty() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), dims());
        chunk.take_dirty_flags();
        assert!(!chunk.set_block(0, 0, 0, 0));
        assert!(chunk.take_dirty_flags().is_empty());
    }

    #[test]
    fn chunk_reports_position_and_dims() {
        let chunk = Chunk::filled(ChunkPos::new(-2, 5), dims(), 3);
        assert_eq!(chunk.position(), ChunkPos::new(-2, 5));
        assert_eq!(chunk.dims(), dims());
        assert_eq!(chunk.blocks().len(), dims().volume());
    }

    #[test]
    fn layout_is_y_major() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), dims());
        chunk.set_block(3, 1, 0, 9);
        assert_eq!(chunk.blocks()[16 + 3], 9);
    }

    #[test]
    fn fill_layers_clamps_to_height() {
        let mut chunk = Chunk::new(ChunkPos::new(0, 0), dims());
        chunk.take_dirty_flags();
        chunk.fill_layers(6..20, 2);
        assert_eq!(chunk.block(0, 5, 0), 0);
        assert_eq!(chunk.block(3, 7, 3), 2);
        assert!(chunk.dirty_flags().contains(DirtyFlags::MESH));
    }

    #[test]
    fn chunk_pos_display_and_offset() {
        let pos = ChunkPos::new(5, -3);
        assert_eq!(format!("{}", pos), "(5, -3)");
        assert_eq!(pos.offset([-1, 1]), ChunkPos::new(4, -2));
    }

    #[test]
    fn chunk_pos_ordering() {
        let pos1 = ChunkPos::new(0, 0);
        let pos2 = ChunkPos::new(1, 0);
        let pos3 = ChunkPos::new(0, 1);
        assert!(pos1 < pos2);
        assert!(pos1 < pos3);
    }

    #[test]
    fn chunk_pos_serialization() {
        let pos = ChunkPos::new(-5, 10);
        let serialized = serde_json::to_string(&pos).unwrap();
        let deserialized: ChunkPos = serde_json::from_str(&serialized).unwrap();
        assert_eq!(deserialized, pos);
    }
}
