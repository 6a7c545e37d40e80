use std::fmt;

use serde::{Deserialize, Serialize};

/// Block identifier referencing the registry's block table.
pub type BlockId = u8;

/// Index into the registry's material table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Material(pub u8);

impl Material {
    /// Table index of this material.
    #[inline]
    pub const fn index(self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for Material {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "material#{}", self.0)
    }
}

/// Per-face material reference with a "no material" sentinel.
///
/// The raw value 0 means the face is never rendered; any other value `n`
/// refers to `Material(n - 1)`.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Default, Serialize, Deserialize,
)]
pub struct MaybeMaterial(u8);

impl MaybeMaterial {
    /// Sentinel for hidden faces.
    pub const NONE: Self = Self(0);

    /// Wrap a real material. Material 255 has no encoding and is rejected by
    /// the registry before it can reach this point.
    #[inline]
    pub const fn some(material: Material) -> Self {
        Self(material.0 + 1)
    }

    /// Reinterpret a raw encoded value.
    #[inline]
    pub const fn from_raw(raw: u8) -> Self {
        Self(raw)
    }

    /// Raw encoded value (0 for [`MaybeMaterial::NONE`]).
    #[inline]
    pub const fn raw(self) -> u8 {
        self.0
    }

    /// Whether this is the "no material" sentinel.
    #[inline]
    pub const fn is_none(self) -> bool {
        self.0 == 0
    }

    /// Decode into a real material, if any.
    #[inline]
    pub const fn material(self) -> Option<Material> {
        match self.0 {
            0 => None,
            raw => Some(Material(raw - 1)),
        }
    }
}

impl From<Material> for MaybeMaterial {
    fn from(material: Material) -> Self {
        Self::some(material)
    }
}

impl From<Option<Material>> for MaybeMaterial {
    fn from(material: Option<Material>) -> Self {
        material.map_or(Self::NONE, Self::some)
    }
}
