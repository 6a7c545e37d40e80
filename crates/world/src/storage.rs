use std::collections::BTreeMap;
use std::num::NonZeroUsize;

use lru::LruCache;
use voxmesh_core::{BlockId, ChunkDims};

use crate::{Chunk, ChunkPos, DirtyFlags};

/// In-memory chunk arena with an LRU eviction policy.
/// Uses BTreeMap for deterministic iteration order.
pub struct ChunkStorage {
    chunks: BTreeMap<ChunkPos, Chunk>,
    lru: LruCache<ChunkPos, ()>,
    capacity: usize,
    dims: ChunkDims,
    evicted: Vec<ChunkPos>,
}

impl ChunkStorage {
    /// Create a storage with the desired maximum chunk count.
    pub fn new(capacity: usize, dims: ChunkDims) -> Self {
        let capacity = capacity.max(1);
        let cap = NonZeroUsize::new(capacity).unwrap_or(NonZeroUsize::MIN);
        Self {
            chunks: BTreeMap::new(),
            lru: LruCache::new(cap),
            capacity,
            dims,
            evicted: Vec::new(),
        }
    }

    /// Dimensions shared by every stored chunk.
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Number of resident chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Returns true when no chunks are currently stored.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }

    /// Obtain mutable access to a chunk, creating it if necessary.
    pub fn ensure_chunk(&mut self, pos: ChunkPos) -> &mut Chunk {
        if !self.chunks.contains_key(&pos) {
            self.evict_if_needed();
            self.chunks.insert(pos, Chunk::new(pos, self.dims));
            self.mark_neighbors(pos, DirtyFlags::BORDER);
        }
        self.touch(pos);
        self.chunks
            .entry(pos)
            .or_insert_with(|| Chunk::new(pos, self.dims))
    }

    /// Attempt to fetch a chunk immutably.
    pub fn get(&self, pos: ChunkPos) -> Option<&Chunk> {
        self.chunks.get(&pos)
    }

    /// Fetch a chunk mutably (without creating it).
    pub fn get_mut(&mut self, pos: ChunkPos) -> Option<&mut Chunk> {
        if self.chunks.contains_key(&pos) {
            self.touch(pos);
        }
        self.chunks.get_mut(&pos)
    }

    /// Set a block in a resident chunk.
    ///
    /// Edits on the chunk's outer columns also flag the neighbours whose
    /// border copies include that column. Returns false if the chunk is not
    /// resident or the block was unchanged.
    pub fn set_block(&mut self, pos: ChunkPos, x: usize, y: usize, z: usize, block: BlockId) -> bool {
        let changed = match self.get_mut(pos) {
            Some(chunk) => chunk.set_block(x, y, z, block),
            None => return false,
        };
        if changed {
            let last = self.dims.width() - 1;
            for dz in edge_sides(z, last) {
                for dx in edge_sides(x, last) {
                    if dx == 0 && dz == 0 {
                        continue;
                    }
                    if let Some(neighbor) = self.chunks.get_mut(&pos.offset([dx, dz])) {
                        neighbor.mark_dirty(DirtyFlags::BORDER);
                    }
                }
            }
        }
        changed
    }

    /// Iterate over currently resident chunk positions.
    pub fn iter_positions(&self) -> impl Iterator<Item = ChunkPos> + '_ {
        self.chunks.keys().copied()
    }

    /// Iterate over resident chunks.
    pub fn iter(&self) -> impl Iterator<Item = &Chunk> + '_ {
        self.chunks.values()
    }

    /// Drain dirty flags of every resident chunk, returning the non-empty ones.
    pub fn take_dirty(&mut self) -> Vec<(ChunkPos, DirtyFlags)> {
        self.chunks
            .iter_mut()
            .filter_map(|(&pos, chunk)| {
                let flags = chunk.take_dirty_flags();
                (!flags.is_empty()).then_some((pos, flags))
            })
            .collect()
    }

    /// Drain positions evicted since the last call.
    ///
    /// A position may since have been reloaded; check [`Self::get`] before
    /// dropping anything derived from it.
    pub fn take_evicted(&mut self) -> Vec<ChunkPos> {
        std::mem::take(&mut self.evicted)
    }

    fn mark_neighbors(&mut self, pos: ChunkPos, flags: DirtyFlags) {
        for dz in -1..=1 {
            for dx in -1..=1 {
                if dx == 0 && dz == 0 {
                    continue;
                }
                if let Some(neighbor) = self.chunks.get_mut(&pos.offset([dx, dz])) {
                    neighbor.mark_dirty(flags);
                }
            }
        }
    }

    fn touch(&mut self, pos: ChunkPos) {
        self.lru.put(pos, ());
    }

    fn evict_if_needed(&mut self) {
        while self.chunks.len() >= self.capacity {
            if let Some((oldest, _)) = self.lru.pop_lru() {
                self.chunks.remove(&oldest);
                self.mark_neighbors(oldest, DirtyFlags::BORDER);
                self.evicted.push(oldest);
                tracing::trace!(%oldest, "evicted chunk");
            } else {
                break;
            }
        }
    }
}

/// Chunk-space deltas whose border copy includes column `coord`.
fn edge_sides(coord: usize, last: usize) -> impl Iterator<Item = i32> {
    let low = (coord == 0).then_some(-1);
    let high = (coord == last).then_some(1);
    std::iter::once(0).chain(low).chain(high)
}
