use std::collections::HashMap;

use voxmesh_core::{BlockFace, BlockId, FaceEmitter, Material, MaybeMaterial};

use crate::RegistryError;

/// Maximum number of blocks (one per `u8` id).
pub const BLOCK_CAPACITY: usize = 256;
/// Maximum number of materials; raw face value 255 is the largest encoding.
pub const MATERIAL_CAPACITY: usize = 255;

/// Static rendering properties of a material.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct MaterialData {
    /// Liquid faces are routed to the water stream and animated.
    pub liquid: bool,
    /// Cutout transparency.
    pub alpha_test: bool,
    /// Texture atlas index.
    pub texture: u8,
    /// Tint for blocks without distinct per-face textures.
    pub color: [f32; 4],
}

impl MaterialData {
    /// Opaque, untinted material sampling `texture`.
    pub const fn textured(texture: u8) -> Self {
        Self {
            liquid: false,
            alpha_test: false,
            texture,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }

    /// Liquid material sampling `texture`.
    pub const fn liquid(texture: u8) -> Self {
        Self {
            liquid: true,
            alpha_test: false,
            texture,
            color: [1.0, 1.0, 1.0, 1.0],
        }
    }
}

/// Static rendering properties of a block.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockData {
    /// Blocks visibility of faces behind it.
    pub opaque: bool,
    /// Occludes ambient light at neighbouring face corners.
    pub solid: bool,
    /// Self-emitted light level.
    pub light: i8,
    /// Material per face, indexed by [`BlockFace::index`].
    pub faces: [MaybeMaterial; 6],
}

impl BlockData {
    /// A block with no renderable faces (air).
    pub const fn empty() -> Self {
        Self {
            opaque: false,
            solid: false,
            light: 0,
            faces: [MaybeMaterial::NONE; 6],
        }
    }

    /// Opaque, solid block using `material` on every face.
    pub const fn cube(material: Material) -> Self {
        Self {
            opaque: true,
            solid: true,
            light: 0,
            faces: [MaybeMaterial::some(material); 6],
        }
    }

    /// Non-opaque, non-solid block using `material` on every face.
    pub const fn translucent(material: Material) -> Self {
        Self {
            opaque: false,
            solid: false,
            light: 0,
            faces: [MaybeMaterial::some(material); 6],
        }
    }

    /// Replace the material of one face.
    pub const fn with_face(mut self, face: BlockFace, material: MaybeMaterial) -> Self {
        self.faces[face.index()] = material;
        self
    }

    /// Material of one face.
    #[inline]
    pub const fn face(&self, face: BlockFace) -> MaybeMaterial {
        self.faces[face.index()]
    }

    /// Whether any face can render.
    pub fn emits_faces(&self) -> bool {
        self.faces.iter().any(|m| !m.is_none())
    }
}

/// Closed, validated lookup from block and material ids to their data.
///
/// Every id below the registered count is valid to query and every face
/// material of every block refers to a registered material.
#[derive(Debug, Clone)]
pub struct Registry {
    blocks: Vec<BlockData>,
    materials: Vec<MaterialData>,
    block_names: Vec<String>,
    material_names: Vec<String>,
    block_ids: HashMap<String, BlockId>,
    material_ids: HashMap<String, Material>,
}

impl Registry {
    /// Start a new builder.
    pub fn builder() -> RegistryBuilder {
        RegistryBuilder::default()
    }

    /// Number of registered blocks.
    pub fn block_count(&self) -> usize {
        self.blocks.len()
    }

    /// Number of registered materials.
    pub fn material_count(&self) -> usize {
        self.materials.len()
    }

    /// Look up a block.
    ///
    /// # Panics
    /// Panics if `block` was never registered.
    #[inline]
    pub fn block(&self, block: BlockId) -> &BlockData {
        match self.blocks.get(block as usize) {
            Some(data) => data,
            None => panic!(
                "unregistered block id {block} (registry holds {})",
                self.blocks.len()
            ),
        }
    }

    /// Look up a material.
    ///
    /// # Panics
    /// Panics if `material` was never registered.
    #[inline]
    pub fn material(&self, material: Material) -> &MaterialData {
        match self.materials.get(material.index()) {
            Some(data) => data,
            None => panic!(
                "unregistered {material} (registry holds {})",
                self.materials.len()
            ),
        }
    }

    /// Resolve the material rendered on one face of a block, if any.
    pub fn face_material(&self, block: BlockId, face: BlockFace) -> Option<(Material, &MaterialData)> {
        let material = self.block(block).face(face).material()?;
        Some((material, self.material(material)))
    }

    /// Resolve a block id by its name.
    pub fn id_by_name(&self, name: &str) -> Option<BlockId> {
        self.block_ids.get(name).copied()
    }

    /// Resolve a material by its name.
    pub fn material_by_name(&self, name: &str) -> Option<Material> {
        self.material_ids.get(name).copied()
    }

    /// Name a block was registered under.
    pub fn block_name(&self, block: BlockId) -> Option<&str> {
        self.block_names.get(block as usize).map(String::as_str)
    }

    /// Name a material was registered under.
    pub fn material_name(&self, material: Material) -> Option<&str> {
        self.material_names.get(material.index()).map(String::as_str)
    }
}

impl FaceEmitter for Registry {
    fn emits_faces(&self, block: BlockId) -> bool {
        self.block(block).emits_faces()
    }
}

/// Sequential registration of blocks and materials.
///
/// Ids are assigned in strictly increasing order from zero. Ordering and
/// capacity are checked on every call; cross references (block faces to
/// materials) are checked by [`RegistryBuilder::build`].
#[derive(Debug, Default)]
pub struct RegistryBuilder {
    blocks: Vec<BlockData>,
    materials: Vec<MaterialData>,
    block_names: Vec<String>,
    material_names: Vec<String>,
    block_ids: HashMap<String, BlockId>,
    material_ids: HashMap<String, Material>,
}

impl RegistryBuilder {
    /// Register a material under the next free id.
    pub fn add_material(
        &mut self,
        name: impl Into<String>,
        data: MaterialData,
    ) -> Result<Material, RegistryError> {
        let next = self.materials.len();
        if next >= MATERIAL_CAPACITY {
            return Err(RegistryError::MaterialCapacity);
        }
        self.register_material(Material(next as u8), name, data)
    }

    /// Register a material under an explicit id, which must be the next free one.
    pub fn register_material(
        &mut self,
        material: Material,
        name: impl Into<String>,
        data: MaterialData,
    ) -> Result<Material, RegistryError> {
        let expected = self.materials.len();
        if material.index() != expected {
            return Err(RegistryError::MaterialOutOfOrder {
                expected,
                got: material.index(),
            });
        }
        if expected >= MATERIAL_CAPACITY {
            return Err(RegistryError::MaterialCapacity);
        }
        let name = name.into();
        if self.material_ids.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.material_ids.insert(name.clone(), material);
        self.material_names.push(name);
        self.materials.push(data);
        Ok(material)
    }

    /// Register a block under the next free id.
    pub fn add_block(
        &mut self,
        name: impl Into<String>,
        data: BlockData,
    ) -> Result<BlockId, RegistryError> {
        let next = self.blocks.len();
        if next >= BLOCK_CAPACITY {
            return Err(RegistryError::BlockCapacity);
        }
        self.register_block(next as BlockId, name, data)
    }

    /// Register a block under an explicit id, which must be the next free one.
    pub fn register_block(
        &mut self,
        block: BlockId,
        name: impl Into<String>,
        data: BlockData,
    ) -> Result<BlockId, RegistryError> {
        let expected = self.blocks.len();
        if expected >= BLOCK_CAPACITY {
            return Err(RegistryError::BlockCapacity);
        }
        if block as usize != expected {
            return Err(RegistryError::BlockOutOfOrder {
                expected,
                got: block as usize,
            });
        }
        let name = name.into();
        if self.block_ids.contains_key(&name) {
            return Err(RegistryError::DuplicateName(name));
        }
        self.block_ids.insert(name.clone(), block);
        self.block_names.push(name);
        self.blocks.push(data);
        Ok(block)
    }

    /// Material registered so far under `name`.
    pub fn material_by_name(&self, name: &str) -> Option<Material> {
        self.material_ids.get(name).copied()
    }

    /// Validate cross references and close the registry.
    pub fn build(self) -> Result<Registry, RegistryError> {
        for (id, data) in self.blocks.iter().enumerate() {
            for face in BlockFace::ALL {
                if let Some(material) = data.face(face).material() {
                    if material.index() >= self.materials.len() {
                        return Err(RegistryError::UnknownMaterial {
                            block: id as BlockId,
                            name: self.block_names[id].clone(),
                            face,
                            material: material.0,
                        });
                    }
                }
            }
        }

        tracing::debug!(
            blocks = self.blocks.len(),
            materials = self.materials.len(),
            "registry closed"
        );

        Ok(Registry {
            blocks: self.blocks,
            materials: self.materials,
            block_names: self.block_names,
            material_names: self.material_names,
            block_ids: self.block_ids,
            material_ids: self.material_ids,
        })
    }
}
