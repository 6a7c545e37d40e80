//! Brute-force face visibility, one unit face at a time.
//!
//! Deliberately naive: no masks, no vertical ranges, no merging. Meshing
//! tests expand merged quads back into unit faces and compare them with
//! this set.

use std::collections::BTreeSet;

use voxmesh_assets::Registry;
use voxmesh_core::{BlockFace, BlockId, Material, MeshInput};

/// One visible unit face and the attributes it renders with.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct UnitFace {
    /// Chunk-local block owning the face.
    pub position: [i32; 3],
    /// Direction the face points.
    pub face: BlockFace,
    /// Rendered material.
    pub material: Material,
    /// Corner AO, `(-u,-v), (+u,-v), (+u,+v), (-u,+v)`; 3 is unoccluded.
    pub ao: [u8; 4],
    /// Liquid surface.
    pub wave: bool,
}

fn block_at(input: &MeshInput, [x, y, z]: [i32; 3]) -> BlockId {
    let height = input.dims().height() as i32;
    if y < 0 {
        input.floor()
    } else if y >= height {
        input.ceiling()
    } else {
        input.voxel((x + 1) as usize, y as usize, (z + 1) as usize)
    }
}

fn shows(registry: &Registry, block: BlockId, neighbor: BlockId, face: BlockFace) -> Option<Material> {
    let own = registry.block(block);
    let other = registry.block(neighbor);
    let material = own.face(face).material()?;
    let same_facing = other.face(face.opposite()) == own.face(face);
    let liquid = registry.material(material).liquid;
    let visible = match (own.opaque, other.opaque) {
        (true, other_opaque) => !other_opaque,
        (false, true) => liquid,
        (false, false) => !same_facing,
    };
    visible.then_some(material)
}

fn occlusion(registry: &Registry, input: &MeshInput, front: [i32; 3], face: BlockFace) -> [u8; 4] {
    let axis = face.axis();
    let u = (axis + 1) % 3;
    let v = (axis + 2) % 3;
    let solid = |du: i32, dv: i32| {
        let mut p = front;
        p[u] += du;
        p[v] += dv;
        registry.block(block_at(input, p)).solid
    };
    let mut ao = [3u8; 4];
    for (corner, (su, sv)) in [(-1, -1), (1, -1), (1, 1), (-1, 1)].into_iter().enumerate() {
        let side_u = solid(su, 0);
        let side_v = solid(0, sv);
        let diagonal = solid(su, sv);
        ao[corner] = if side_u && side_v {
            0
        } else {
            3 - [side_u, side_v, diagonal].iter().filter(|&&s| s).count() as u8
        };
    }
    ao
}

/// Every unit face the visibility rule shows for the interior of `input`.
pub fn reference_faces(registry: &Registry, input: &MeshInput) -> BTreeSet<UnitFace> {
    let dims = input.dims();
    let width = dims.width() as i32;
    let height = dims.height() as i32;
    let mut faces = BTreeSet::new();
    for y in 0..height {
        for z in 0..width {
            for x in 0..width {
                let position = [x, y, z];
                let block = block_at(input, position);
                for face in BlockFace::ALL {
                    let n = face.normal();
                    let front = [x + n[0], y + n[1], z + n[2]];
                    let Some(material) = shows(registry, block, block_at(input, front), face)
                    else {
                        continue;
                    };
                    faces.insert(UnitFace {
                        position,
                        face,
                        material,
                        ao: occlusion(registry, input, front, face),
                        wave: registry.material(material).liquid,
                    });
                }
            }
        }
    }
    faces
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxmesh_assets::{BlockData, MaterialData};
    use voxmesh_core::ChunkDims;

    fn registry() -> Registry {
        let mut builder = Registry::builder();
        let stone = builder
            .add_material("stone", MaterialData::textured(0))
            .unwrap();
        let water = builder
            .add_material("water", MaterialData::liquid(1))
            .unwrap();
        builder.add_block("air", BlockData::empty()).unwrap();
        builder.add_block("stone", BlockData::cube(stone)).unwrap();
        builder
            .add_block("water", BlockData::translucent(water))
            .unwrap();
        builder.build().unwrap()
    }

    #[test]
    fn lone_block_shows_six_faces() {
        let registry = registry();
        let mut input = MeshInput::new(ChunkDims::new(3, 3).unwrap());
        input.set_interior(1, 1, 1, 1);
        let faces = reference_faces(&registry, &input);
        assert_eq!(faces.len(), 6);
        assert!(faces.iter().all(|f| f.ao == [3; 4] && !f.wave));
    }

    #[test]
    fn neighbor_below_darkens_side_corners() {
        let registry = registry();
        let mut input = MeshInput::new(ChunkDims::new(3, 3).unwrap());
        input.set_interior(1, 1, 1, 1);
        // Stone under the block's east neighbour.
        input.set_interior(2, 0, 1, 1);
        let faces = reference_faces(&registry, &input);
        let east = faces
            .iter()
            .find(|f| f.position == [1, 1, 1] && f.face == BlockFace::East)
            .unwrap();
        // East: u = Y, so the -u corners (0 and 3) see the block below.
        assert_eq!(east.ao, [2, 3, 3, 2]);
    }

    #[test]
    fn water_against_stone_shows_from_both_sides() {
        let registry = registry();
        let mut input = MeshInput::new(ChunkDims::new(1, 2).unwrap());
        input.fill(2);
        input.set_interior(0, 0, 0, 1);
        input.set_vertical_boundary(1, 2);
        let faces = reference_faces(&registry, &input);
        let up: Vec<_> = faces.iter().filter(|f| f.face == BlockFace::Up).collect();
        assert_eq!(up.len(), 1);
        assert_eq!(up[0].position, [0, 0, 0]);
        let down: Vec<_> = faces.iter().filter(|f| f.face == BlockFace::Down).collect();
        assert_eq!(down.len(), 1);
        assert!(down[0].wave);
    }
}
