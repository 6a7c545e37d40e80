#![warn(missing_docs)]
//! Attribute registry: static rendering properties for blocks and materials.
//!
//! The registry is assembled once through [`RegistryBuilder`] (or loaded from
//! a JSON pack) and is immutable afterwards, so meshing threads can share it
//! by reference without locking.

mod loader;
mod registry;

pub use loader::{registry_from_file, registry_from_str};
pub use registry::{
    BlockData, MaterialData, Registry, RegistryBuilder, BLOCK_CAPACITY, MATERIAL_CAPACITY,
};

use serde::Deserialize;
use thiserror::Error;
use voxmesh_core::{BlockFace, BlockId};

/// Pack schema: named materials followed by named blocks.
#[derive(Debug, Deserialize)]
pub struct PackDefinition {
    /// Materials in id order.
    #[serde(default)]
    pub materials: Vec<MaterialDefinition>,
    /// Blocks in id order.
    #[serde(default)]
    pub blocks: Vec<BlockDefinition>,
}

/// Material entry in a pack.
#[derive(Debug, Deserialize)]
pub struct MaterialDefinition {
    /// Unique name referenced by block face configs.
    pub name: String,
    /// Liquid materials go to the water stream and animate.
    #[serde(default)]
    pub liquid: bool,
    /// Cutout transparency.
    #[serde(default)]
    pub alpha_test: bool,
    /// Texture atlas index.
    #[serde(default)]
    pub texture: u8,
    /// Tint color (RGBA, 0.0-1.0).
    #[serde(default = "default_color")]
    pub color: [f32; 4],
}

fn default_color() -> [f32; 4] {
    [1.0, 1.0, 1.0, 1.0]
}

/// Block entry in a pack.
#[derive(Debug, Deserialize)]
pub struct BlockDefinition {
    /// Unique name (e.g., "stone").
    pub name: String,
    /// Whether the block hides faces behind it.
    #[serde(default)]
    pub opaque: bool,
    /// Whether the block occludes ambient light; defaults to `opaque`.
    #[serde(default)]
    pub solid: Option<bool>,
    /// Self-emitted light level.
    #[serde(default)]
    pub light: i8,
    /// Per-face material names.
    #[serde(default)]
    pub faces: Option<BlockFacesConfig>,
    /// Faces that never render, by config key (e.g., "bottom").
    #[serde(default)]
    pub hidden: Vec<String>,
}

/// Configuration for per-face materials.
#[derive(Debug, Clone, Deserialize, Default)]
pub struct BlockFacesConfig {
    /// Apply to all faces when specified.
    pub all: Option<String>,
    /// Apply to all side faces when specified.
    pub side: Option<String>,
    /// Specific material for the top face.
    pub top: Option<String>,
    /// Specific material for the bottom face.
    pub bottom: Option<String>,
    /// Specific material for the north (-Z) face.
    pub north: Option<String>,
    /// Specific material for the south (+Z) face.
    pub south: Option<String>,
    /// Specific material for the east (+X) face.
    pub east: Option<String>,
    /// Specific material for the west (-X) face.
    pub west: Option<String>,
}

/// Errors emitted while building or loading a registry.
#[derive(Debug, Error)]
pub enum RegistryError {
    /// A block was registered with an id other than the next free one.
    #[error("block registered out of order: expected id {expected}, got {got}")]
    BlockOutOfOrder {
        /// Next free id.
        expected: usize,
        /// Id supplied by the caller.
        got: usize,
    },
    /// A material was registered with an id other than the next free one.
    #[error("material registered out of order: expected id {expected}, got {got}")]
    MaterialOutOfOrder {
        /// Next free id.
        expected: usize,
        /// Id supplied by the caller.
        got: usize,
    },
    /// Too many blocks.
    #[error("block table full ({BLOCK_CAPACITY} entries)")]
    BlockCapacity,
    /// Too many materials.
    #[error("material table full ({MATERIAL_CAPACITY} entries)")]
    MaterialCapacity,
    /// Two entries of the same table share a name.
    #[error("duplicate name {0:?}")]
    DuplicateName(String),
    /// A block face references a material id that was never registered.
    #[error("block {block} ({name:?}) face {face:?} references unregistered material {material}")]
    UnknownMaterial {
        /// Offending block.
        block: BlockId,
        /// Offending block's name.
        name: String,
        /// Offending face.
        face: BlockFace,
        /// Raw material index.
        material: u8,
    },
    /// A pack block references a material name that is not defined.
    #[error("block {block:?} references unknown material {material:?}")]
    UnknownMaterialName {
        /// Block name.
        block: String,
        /// Material name.
        material: String,
    },
    /// A pack block lists an unknown face key.
    #[error("block {block:?} lists unknown face {face:?}")]
    UnknownFace {
        /// Block name.
        block: String,
        /// Face key.
        face: String,
    },
    /// Wrap IO errors when reading packs.
    #[error("failed to read registry pack: {0}")]
    Io(#[from] std::io::Error),
    /// Wrap serde parsing issues.
    #[error("failed to parse registry pack: {0}")]
    Parse(#[from] serde_json::Error),
}

/// Parse a JSON string into a pack definition.
pub fn load_pack_from_str(input: &str) -> Result<PackDefinition, RegistryError> {
    Ok(serde_json::from_str(input)?)
}
