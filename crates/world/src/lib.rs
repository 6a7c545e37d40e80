//! Chunk storage and border assembly feeding the meshing core.
//!
//! Nothing here is read by the mesher directly: this crate owns chunks and
//! their neighbour lookups, and turns them into a [`voxmesh_core::MeshInput`].

mod border;
mod chunk;
mod storage;

pub use border::*;
pub use chunk::*;
pub use storage::*;
