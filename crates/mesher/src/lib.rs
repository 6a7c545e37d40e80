#![warn(missing_docs)]
//! Greedy meshing core: visible-face masks, ambient occlusion and quad
//! merging over a padded chunk view, plus cache/driver glue for chunk
//! storage.

mod ao;
mod cache;
mod driver;
mod mask;
mod mesher;
mod quad;

pub use ao::{corner_ao, face_ao, pack_ao, sample_ring, unpack_ao, AoRing, Diagonal, CORNER_SIGNS};
pub use cache::ChunkMeshCache;
pub use driver::{ChunkMeshDriver, ChunkMeshStat};
pub use mask::{visible_material, MaskKey};
pub use mesher::{mesh_input, Mesher, MesherOptions};
pub use quad::{ChunkQuads, MeshHash, Quad};
