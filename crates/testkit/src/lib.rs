#![warn(missing_docs)]
//! Deterministic testing surfaces: brute-force meshing oracle and metric sinks.

mod metrics;
mod reference;

use anyhow::Result;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

pub use metrics::*;
pub use reference::{reference_faces, UnitFace};

/// Mesh metric snapshot for a chunk.
#[derive(Debug, Serialize)]
pub struct ChunkMeshMetric {
    /// Chunk coordinates [x, z].
    pub chunk: [i32; 2],
    /// Quads in the solid stream.
    pub solid_quads: usize,
    /// Quads in the water stream.
    pub water_quads: usize,
    /// Triangle count for the chunk mesh.
    pub triangles: usize,
    /// Mesh hash (hex string) for deterministic comparisons.
    pub hash: String,
}

/// Writes chunk mesh metrics to JSON for CI artifacts.
pub struct MeshMetricSink {
    file: File,
}

impl MeshMetricSink {
    /// Create a sink pointed at the supplied path, creating parent dirs if needed.
    pub fn create<P: AsRef<Path>>(path: P) -> Result<Self> {
        if let Some(parent) = path.as_ref().parent() {
            fs::create_dir_all(parent)?;
        }
        Ok(Self {
            file: File::create(path)?,
        })
    }

    /// Persist the provided metrics as pretty JSON.
    pub fn write(&mut self, metrics: &[ChunkMeshMetric]) -> Result<()> {
        let json = serde_json::to_string_pretty(metrics)?;
        self.file.write_all(json.as_bytes())?;
        Ok(())
    }
}
