use std::collections::HashMap;

use voxmesh_world::ChunkPos;

use crate::{ChunkQuads, MeshHash};

/// Mesh cache keyed by chunk position.
#[derive(Default)]
pub struct ChunkMeshCache {
    entries: HashMap<ChunkPos, ChunkQuads>,
}

impl ChunkMeshCache {
    /// Create an empty cache.
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Store the latest quads for `pos`. Returns true if they differ from
    /// what was cached.
    pub fn update(&mut self, pos: ChunkPos, quads: ChunkQuads) -> bool {
        match self.entries.get_mut(&pos) {
            Some(entry) if *entry == quads => false,
            Some(entry) => {
                *entry = quads;
                true
            }
            None => {
                self.entries.insert(pos, quads);
                true
            }
        }
    }

    /// Retrieve the mesh if it's cached.
    pub fn get(&self, pos: ChunkPos) -> Option<&ChunkQuads> {
        self.entries.get(&pos)
    }

    /// Hash of the cached mesh, if any.
    pub fn hash(&self, pos: ChunkPos) -> Option<MeshHash> {
        self.entries.get(&pos).map(ChunkQuads::hash)
    }

    /// Drop the cached mesh for `pos`.
    pub fn remove(&mut self, pos: ChunkPos) -> Option<ChunkQuads> {
        self.entries.remove(&pos)
    }

    /// Number of cached meshes.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether the cache holds nothing.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
