#![warn(missing_docs)]
//! Core primitives shared across the workspace.
//!
//! Block and material identifiers, the six face directions, chunk
//! dimensions, and the padded input contract consumed by the meshing core.

mod dims;
mod face;
mod ids;
mod input;

pub use dims::{ChunkDims, DimsError, CHUNK_HEIGHT, CHUNK_WIDTH, MAX_CHUNK_HEIGHT, MAX_CHUNK_WIDTH};
pub use face::BlockFace;
pub use ids::{BlockId, Material, MaybeMaterial};
pub use input::{mesher_offsets, FaceEmitter, MeshInput, MesherOffset, MESHER_OFFSETS};
