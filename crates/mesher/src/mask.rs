//! Face visibility and the packed per-cell mask key.

use voxmesh_assets::Registry;
use voxmesh_core::{BlockFace, BlockId, Material, MaybeMaterial};

/// Material of the face `face` of `block` if it shows against `neighbor`.
///
/// - opaque blocks show faces toward anything non-opaque;
/// - liquid faces show toward opaque neighbours, and toward any other
///   neighbour whose facing side has a different material;
/// - other faces show toward non-opaque neighbours with a different facing material.
///
/// A face without a material never shows.
pub fn visible_material(
    registry: &Registry,
    block: BlockId,
    neighbor: BlockId,
    face: BlockFace,
) -> Option<Material> {
    let data = registry.block(block);
    let own = data.face(face);
    let material = own.material()?;
    let other = registry.block(neighbor);
    let facing = other.face(face.opposite());

    let visible = if data.opaque {
        !other.opaque
    } else if registry.material(material).liquid {
        other.opaque || facing != own
    } else {
        !other.opaque && facing != own
    };
    visible.then_some(material)
}

/// Packed mask value: material raw value (bits 0-7), AO (8-15), wave (16).
///
/// Zero is reserved for "no visible face"; every visible face has a non-zero
/// material byte, so equal keys mean mergeable faces.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[repr(transparent)]
pub struct MaskKey(u32);

impl MaskKey {
    /// No visible face.
    pub const EMPTY: Self = Self(0);

    const WAVE: u32 = 1 << 16;

    /// Pack a visible face.
    #[inline]
    pub fn new(material: Material, ao: u8, wave: bool) -> Self {
        let raw = u32::from(MaybeMaterial::some(material).raw());
        Self(raw | u32::from(ao) << 8 | if wave { Self::WAVE } else { 0 })
    }

    /// Whether the cell holds no face.
    #[inline]
    pub fn is_empty(self) -> bool {
        self.0 == 0
    }

    /// Material of a non-empty key.
    #[inline]
    pub fn material(self) -> Option<Material> {
        MaybeMaterial::from_raw(self.0 as u8).material()
    }

    /// Packed AO byte.
    #[inline]
    pub fn ao(self) -> u8 {
        (self.0 >> 8) as u8
    }

    /// Liquid flag, which also selects the water stream.
    #[inline]
    pub fn wave(self) -> bool {
        self.0 & Self::WAVE != 0
    }
}
