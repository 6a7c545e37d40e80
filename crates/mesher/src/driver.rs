use std::path::Path;

use anyhow::Result;
use rayon::prelude::*;
use tracing::{debug, info, warn};
use voxmesh_assets::Registry;
use voxmesh_core::MeshInput;
use voxmesh_testkit::{ChunkMeshMetric, MeshMetricSink};
use voxmesh_world::{
    assemble_mesh_input, AssemblyError, BorderFill, ChunkPos, ChunkStorage, DirtyFlags,
};

use crate::{ChunkMeshCache, ChunkQuads, MeshHash, Mesher, MesherOptions};

/// Mesh stats for a chunk update pass.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChunkMeshStat {
    /// Chunk position this mesh belongs to.
    pub position: ChunkPos,
    /// Quads in the solid stream.
    pub solid_quads: usize,
    /// Quads in the water stream.
    pub water_quads: usize,
    /// Neighbours replaced by the placeholder block.
    pub missing_neighbors: usize,
    /// Whether the cached mesh changed.
    pub changed: bool,
    /// Mesh hash for determinism comparisons.
    pub hash: MeshHash,
}

impl ChunkMeshStat {
    /// Triangles a renderer would draw for this chunk.
    pub fn triangles(&self) -> usize {
        (self.solid_quads + self.water_quads) * 2
    }
}

/// Processes dirty chunks and refreshes mesh cache entries.
pub struct ChunkMeshDriver<'a> {
    storage: &'a mut ChunkStorage,
    cache: &'a mut ChunkMeshCache,
    registry: &'a Registry,
    fill: BorderFill,
    options: MesherOptions,
}

impl<'a> ChunkMeshDriver<'a> {
    /// Create a new driver spanning storage/cache/registry.
    pub fn new(
        storage: &'a mut ChunkStorage,
        cache: &'a mut ChunkMeshCache,
        registry: &'a Registry,
        fill: BorderFill,
        options: MesherOptions,
    ) -> Self {
        Self {
            storage,
            cache,
            registry,
            fill,
            options,
        }
    }

    /// Drop meshes of evicted chunks, then drain dirty flags and return the
    /// chunks that need a new mesh.
    fn dirty_positions(&mut self) -> Vec<ChunkPos> {
        for pos in self.storage.take_evicted() {
            if self.storage.get(pos).is_none() && self.cache.remove(pos).is_some() {
                debug!(%pos, "dropped mesh of evicted chunk");
            }
        }
        self.storage
            .take_dirty()
            .into_iter()
            .filter(|(_, flags)| flags.intersects(DirtyFlags::MESH | DirtyFlags::BORDER))
            .map(|(pos, _)| pos)
            .collect()
    }

    /// Mesh all dirty chunks on the calling thread and return stats.
    pub fn process(&mut self) -> Vec<ChunkMeshStat> {
        let positions = self.dirty_positions();
        let dims = self.storage.dims();
        let mut mesher = Mesher::new(self.registry, dims, self.options);
        let mut input = MeshInput::new(dims);

        let mut stats = Vec::with_capacity(positions.len());
        for pos in positions {
            match assemble_mesh_input(self.storage, pos, &self.fill, self.registry, &mut input) {
                Ok(report) => {
                    mesher.mesh_chunk(&input);
                    let quads = mesher.take_output();
                    stats.push(self.store(pos, quads, report.missing_neighbors.len()));
                }
                Err(err) => warn!(%err, "skipping chunk"),
            }
        }
        info!(chunks = stats.len(), "mesh pass complete");
        stats
    }

    /// Mesh all dirty chunks across the rayon pool, one [`Mesher`] per
    /// worker. Stats come back in the same order as [`Self::process`].
    pub fn process_parallel(&mut self) -> Vec<ChunkMeshStat> {
        let positions = self.dirty_positions();
        let dims = self.storage.dims();
        let storage: &ChunkStorage = self.storage;
        let registry = self.registry;
        let fill = self.fill;
        let options = self.options;

        let results: Vec<_> = positions
            .into_par_iter()
            .map_init(
                || (Mesher::new(registry, dims, options), MeshInput::new(dims)),
                |(mesher, input), pos| -> Result<_, AssemblyError> {
                    let report = assemble_mesh_input(storage, pos, &fill, registry, input)?;
                    mesher.mesh_chunk(input);
                    Ok((pos, mesher.take_output(), report.missing_neighbors.len()))
                },
            )
            .collect();

        let mut stats = Vec::with_capacity(results.len());
        for result in results {
            match result {
                Ok((pos, quads, missing)) => stats.push(self.store(pos, quads, missing)),
                Err(err) => warn!(%err, "skipping chunk"),
            }
        }
        info!(
            chunks = stats.len(),
            threads = rayon::current_num_threads(),
            "parallel mesh pass complete"
        );
        stats
    }

    fn store(&mut self, pos: ChunkPos, quads: ChunkQuads, missing: usize) -> ChunkMeshStat {
        let hash = quads.hash();
        let solid_quads = quads.solid.len();
        let water_quads = quads.water.len();
        let changed = self.cache.update(pos, quads);
        ChunkMeshStat {
            position: pos,
            solid_quads,
            water_quads,
            missing_neighbors: missing,
            changed,
            hash,
        }
    }

    /// Convert stats into serializable metrics for CI artifacts.
    pub fn stats_to_metrics(stats: &[ChunkMeshStat]) -> Vec<ChunkMeshMetric> {
        stats
            .iter()
            .map(|stat| ChunkMeshMetric {
                chunk: [stat.position.x, stat.position.z],
                solid_quads: stat.solid_quads,
                water_quads: stat.water_quads,
                triangles: stat.triangles(),
                hash: stat.hash.to_string(),
            })
            .collect()
    }

    /// Write metrics to disk using the testkit sink.
    pub fn write_metrics_to_file<P: AsRef<Path>>(stats: &[ChunkMeshStat], path: P) -> Result<()> {
        let metrics = Self::stats_to_metrics(stats);
        let mut sink = MeshMetricSink::create(path)?;
        sink.write(&metrics)?;
        Ok(())
    }
}
