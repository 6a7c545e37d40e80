//! Padded mesh-input assembly from resident chunks.

use tracing::warn;
use voxmesh_core::{mesher_offsets, BlockId, FaceEmitter, MeshInput};

use crate::{ChunkPos, ChunkStorage};

/// Blocks used where no real data exists.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
#[serde(default)]
pub struct BorderFill {
    /// Stand-in for a neighbour chunk that is not resident.
    pub placeholder: BlockId,
    /// Block assumed below the world.
    pub floor: BlockId,
    /// Block assumed above the world.
    pub ceiling: BlockId,
}

/// Failures while assembling a mesh input.
#[derive(Debug, thiserror::Error, PartialEq, Eq)]
pub enum AssemblyError {
    #[error("chunk {0} is not resident")]
    MissingChunk(ChunkPos),
}

/// What had to be substituted during assembly.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssemblyReport {
    /// Neighbour positions filled with the placeholder block.
    pub missing_neighbors: Vec<ChunkPos>,
}

impl AssemblyReport {
    /// Whether every neighbour was resident.
    pub fn is_complete(&self) -> bool {
        self.missing_neighbors.is_empty()
    }
}

/// Copy chunk `pos` and the strips of its eight neighbours into `input`.
///
/// Missing neighbours are filled with `fill.placeholder`. The vertical index
/// is rebuilt afterwards, so `input` is ready for meshing on success.
pub fn assemble_mesh_input(
    storage: &ChunkStorage,
    pos: ChunkPos,
    fill: &BorderFill,
    emitter: &dyn FaceEmitter,
    input: &mut MeshInput,
) -> Result<AssemblyReport, AssemblyError> {
    let dims = storage.dims();
    assert_eq!(
        input.dims(),
        dims,
        "mesh input sized for {:?}, storage holds {:?}",
        input.dims(),
        dims
    );
    if storage.get(pos).is_none() {
        return Err(AssemblyError::MissingChunk(pos));
    }

    let mut report = AssemblyReport::default();
    for offset in mesher_offsets(dims.width()).iter() {
        let source_pos = pos.offset(offset.delta);
        match storage.get(source_pos) {
            Some(chunk) => input.copy_region(offset, |x, y, z| chunk.block(x, y, z)),
            None => {
                input.fill_region(offset, fill.placeholder);
                report.missing_neighbors.push(source_pos);
            }
        }
    }
    if !report.is_complete() {
        warn!(
            chunk = %pos,
            missing = report.missing_neighbors.len(),
            placeholder = fill.placeholder,
            "assembled mesh input with placeholder borders"
        );
    }

    input.set_vertical_boundary(fill.floor, fill.ceiling);
    input.rebuild_vertical_index(emitter);
    Ok(report)
}
