use std::fmt;

use blake3::Hasher;
use voxmesh_core::{BlockFace, Material};

use crate::ao::{unpack_ao, Diagonal};

/// Hash of the combined solid + water quad lists.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct MeshHash(pub [u8; 32]);

impl fmt::Display for MeshHash {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for byte in self.0 {
            write!(f, "{byte:02x}")?;
        }
        Ok(())
    }
}

/// One merged rectangle of identical unit faces.
///
/// `position` is the chunk-local block the rectangle starts at; `width`
/// extends along the face's first tangent axis and `height` along the second
/// (see [`BlockFace::tangent_axes`]).
#[repr(C)]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, bytemuck::Pod, bytemuck::Zeroable)]
pub struct Quad {
    /// Origin block in chunk-local coordinates.
    pub position: [i32; 3],
    /// Extent along the first tangent axis, in blocks.
    pub width: u16,
    /// Extent along the second tangent axis, in blocks.
    pub height: u16,
    face: u8,
    material: u8,
    ao: u8,
    flags: u8,
}

impl Quad {
    /// Animated (liquid) surface.
    pub const FLAG_WAVE: u8 = 0b01;
    /// Triangulate along corners 1-3 instead of 0-2.
    pub const FLAG_SPLIT_13: u8 = 0b10;

    pub(crate) fn new(
        position: [i32; 3],
        size: (u16, u16),
        face: BlockFace,
        material: Material,
        ao: u8,
        wave: bool,
    ) -> Self {
        let mut flags = 0;
        if wave {
            flags |= Self::FLAG_WAVE;
        }
        if Diagonal::for_ao(unpack_ao(ao)) == Diagonal::Corners13 {
            flags |= Self::FLAG_SPLIT_13;
        }
        Self {
            position,
            width: size.0,
            height: size.1,
            face: face.index() as u8,
            material: material.0,
            ao,
            flags,
        }
    }

    /// Face direction.
    #[inline]
    pub fn face(&self) -> BlockFace {
        match BlockFace::from_index(self.face as usize) {
            Some(face) => face,
            None => unreachable!("quad built with face index {}", self.face),
        }
    }

    /// Material rendered on the quad.
    #[inline]
    pub fn material(&self) -> Material {
        Material(self.material)
    }

    /// Per-corner AO, corners ordered `(-u,-v), (+u,-v), (+u,+v), (-u,+v)`.
    /// 3 is unoccluded.
    #[inline]
    pub fn ao(&self) -> [u8; 4] {
        unpack_ao(self.ao)
    }

    /// Packed AO byte (2 bits per corner, corner 0 in the low bits).
    #[inline]
    pub fn packed_ao(&self) -> u8 {
        self.ao
    }

    /// Whether the quad animates as liquid.
    #[inline]
    pub fn wave(&self) -> bool {
        self.flags & Self::FLAG_WAVE != 0
    }

    /// Diagonal the quad should be split along.
    #[inline]
    pub fn diagonal(&self) -> Diagonal {
        if self.flags & Self::FLAG_SPLIT_13 != 0 {
            Diagonal::Corners13
        } else {
            Diagonal::Corners02
        }
    }

    /// Corner indices of the two triangles, sharing the split diagonal.
    pub fn triangle_indices(&self) -> [u8; 6] {
        match self.diagonal() {
            Diagonal::Corners02 => [0, 1, 2, 0, 2, 3],
            Diagonal::Corners13 => [1, 2, 3, 1, 3, 0],
        }
    }

    /// Vertex positions in AO corner order, on the block-grid lattice.
    pub fn corners(&self) -> [[i32; 3]; 4] {
        let face = self.face();
        let axis = face.axis();
        let (u, v) = face.tangent_axes();
        let mut base = self.position;
        if face.is_positive() {
            base[axis] += 1;
        }
        let (w, h) = (i32::from(self.width), i32::from(self.height));
        [(0, 0), (w, 0), (w, h), (0, h)].map(|(du, dv)| {
            let mut corner = base;
            corner[u] += du;
            corner[v] += dv;
            corner
        })
    }

    /// Blocks whose face this quad covers, `u` fastest.
    pub fn cells(&self) -> impl Iterator<Item = [i32; 3]> {
        let (u, v) = self.face().tangent_axes();
        let origin = self.position;
        let width = i32::from(self.width);
        (0..i32::from(self.height)).flat_map(move |dv| {
            (0..width).map(move |du| {
                let mut cell = origin;
                cell[u] += du;
                cell[v] += dv;
                cell
            })
        })
    }

    /// Number of unit faces covered.
    #[inline]
    pub fn area(&self) -> usize {
        usize::from(self.width) * usize::from(self.height)
    }
}

/// Meshing output for one chunk.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChunkQuads {
    /// Static geometry.
    pub solid: Vec<Quad>,
    /// Liquid geometry, animated by the renderer.
    pub water: Vec<Quad>,
}

impl ChunkQuads {
    /// Construct an empty mesh (useful for initialization).
    pub fn empty() -> Self {
        Self::default()
    }

    /// Total quad count over both streams.
    pub fn len(&self) -> usize {
        self.solid.len() + self.water.len()
    }

    /// Whether both streams are empty.
    pub fn is_empty(&self) -> bool {
        self.solid.is_empty() && self.water.is_empty()
    }

    /// Triangles a renderer would draw for both streams.
    pub fn triangles(&self) -> usize {
        self.len() * 2
    }

    /// Stable hash of both streams for cache comparisons.
    pub fn hash(&self) -> MeshHash {
        hash_streams(&self.solid, &self.water)
    }
}

pub(crate) fn hash_streams(solid: &[Quad], water: &[Quad]) -> MeshHash {
    let mut hasher = Hasher::new();
    hasher.update(&(solid.len() as u64).to_le_bytes());
    hasher.update(bytemuck::cast_slice(solid));
    hasher.update(&(water.len() as u64).to_le_bytes());
    hasher.update(bytemuck::cast_slice(water));
    MeshHash(*hasher.finalize().as_bytes())
}
