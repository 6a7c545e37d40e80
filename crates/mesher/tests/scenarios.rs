//! Fixed meshing scenarios with hand-checked expectations.

mod common;

use common::*;
use voxmesh_core::{BlockFace, ChunkDims, MeshInput};
use voxmesh_mesher::{mesh_input, Mesher, MesherOptions};
use voxmesh_testkit::reference_faces;

const BOTH: [MesherOptions; 2] = [
    MesherOptions {
        vertical_reduction: true,
    },
    MesherOptions {
        vertical_reduction: false,
    },
];

fn filled(dims: ChunkDims, border: u8, interior: u8) -> MeshInput {
    let mut input = MeshInput::new(dims);
    input.fill(border);
    for y in 0..dims.height() {
        for z in 0..dims.width() {
            for x in 0..dims.width() {
                input.set_interior(x, y, z, interior);
            }
        }
    }
    input
}

#[test]
fn buried_chunk_emits_nothing() {
    let registry = registry();
    let dims = ChunkDims::new(16, 32).unwrap();
    let mut input = filled(dims, STONE, STONE);
    input.set_vertical_boundary(STONE, STONE);
    input.rebuild_vertical_index(&registry);

    for options in BOTH {
        let quads = mesh_input(&registry, &input, options);
        assert!(quads.solid.is_empty());
        assert!(quads.water.is_empty());
    }
}

#[test]
fn exposed_chunk_emits_one_quad_per_side() {
    let registry = registry();
    let dims = ChunkDims::new(16, 32).unwrap();
    let mut input = filled(dims, AIR, STONE);
    input.set_vertical_boundary(AIR, AIR);
    input.rebuild_vertical_index(&registry);

    for options in BOTH {
        let quads = mesh_input(&registry, &input, options);
        assert!(quads.water.is_empty());
        assert_eq!(quads.solid.len(), 6);

        for face in BlockFace::ALL {
            let quad = quads
                .solid
                .iter()
                .find(|q| q.face() == face)
                .unwrap_or_else(|| panic!("no quad for {face:?}"));
            let expected = match face {
                BlockFace::Up | BlockFace::Down => (16, 16),
                BlockFace::East | BlockFace::West => (32, 16),
                BlockFace::South | BlockFace::North => (16, 32),
            };
            assert_eq!((quad.width, quad.height), expected, "{face:?}");
            assert_eq!(quad.ao(), [3; 4], "{face:?}");
            assert!(!quad.wave());

            let mut origin = [0, 0, 0];
            if face.is_positive() {
                origin[face.axis()] = if face.axis() == 1 { 31 } else { 15 };
            }
            assert_eq!(quad.position, origin, "{face:?}");
        }
    }
}

fn slab_input() -> MeshInput {
    let mut input = MeshInput::new(ChunkDims::new(8, 8).unwrap());
    for z in 3..5 {
        for x in 3..5 {
            input.set_interior(x, 4, z, STONE);
        }
    }
    input
}

#[test]
fn small_slab_emits_six_quads() {
    let registry = registry();
    let mut input = slab_input();
    input.rebuild_vertical_index(&registry);

    let quads = mesh_input(&registry, &input, MesherOptions::default());
    assert!(quads.water.is_empty());
    assert_eq!(quads.solid.len(), 6);
    for quad in &quads.solid {
        let expected = match quad.face() {
            BlockFace::Up | BlockFace::Down => (2, 2),
            BlockFace::East | BlockFace::West => (1, 2),
            BlockFace::South | BlockFace::North => (2, 1),
        };
        assert_eq!((quad.width, quad.height), expected, "{:?}", quad.face());
        assert_eq!(quad.ao(), [3; 4]);
    }
}

#[test]
fn diagonal_neighbor_darkens_only_touching_corners() {
    let registry = registry();
    let mut input = slab_input();
    // Diagonally above the slab's (+x, +z) corner block.
    input.set_interior(5, 5, 5, STONE);
    input.rebuild_vertical_index(&registry);

    let quads = mesh_input(&registry, &input, MesherOptions::default());
    let faces = common::expand(&quads);
    assert_eq!(faces, reference_faces(&registry, &input));

    let slab_up: Vec<_> = faces
        .iter()
        .filter(|f| f.face == BlockFace::Up && f.position[1] == 4)
        .collect();
    assert_eq!(slab_up.len(), 4);
    for face in slab_up {
        if face.position == [4, 4, 4] {
            // Up: u = Z, v = X, so (+1, +1) is corner 2.
            assert_eq!(face.ao, [3, 3, 2, 3]);
        } else {
            assert_eq!(face.ao, [3; 4]);
        }
    }

    let east = faces
        .iter()
        .find(|f| f.face == BlockFace::East && f.position == [4, 4, 4])
        .unwrap();
    assert_eq!(east.ao, [3, 3, 2, 3]);
    let east_other = faces
        .iter()
        .find(|f| f.face == BlockFace::East && f.position == [4, 4, 3])
        .unwrap();
    assert_eq!(east_other.ao, [3; 4]);
}

#[test]
fn liquid_between_air_and_stone_shows_two_faces() {
    let registry = registry();
    let dims = ChunkDims::new(1, 3).unwrap();
    let mut input = MeshInput::new(dims);
    let p = dims.padded_width();
    for (y, block) in [STONE, WATER, AIR].into_iter().enumerate() {
        for z in 0..p {
            for x in 0..p {
                input.set_voxel(x, y, z, block);
            }
        }
    }
    input.set_vertical_boundary(STONE, AIR);
    input.rebuild_vertical_index(&registry);

    let mut mesher = Mesher::new(&registry, dims, MesherOptions::default());
    mesher.mesh_chunk(&input);

    let water = mesher.water();
    assert_eq!(water.len(), 2);
    let mut faces: Vec<_> = water.iter().map(|q| q.face()).collect();
    faces.sort();
    assert_eq!(faces, vec![BlockFace::Up, BlockFace::Down]);
    for quad in water {
        assert!(quad.wave());
        assert_eq!(quad.position, [0, 1, 0]);
        assert_eq!((quad.width, quad.height), (1, 1));
    }

    // The stone below still shows its top through the water.
    assert_eq!(mesher.solid().len(), 1);
    assert_eq!(mesher.solid()[0].face(), BlockFace::Up);
}

#[test]
fn hidden_face_material_suppresses_the_face() {
    let registry = registry();
    let mut input = MeshInput::new(ChunkDims::new(4, 4).unwrap());
    input.set_interior(1, 2, 1, BEDROCK);
    input.rebuild_vertical_index(&registry);

    let quads = mesh_input(&registry, &input, MesherOptions::default());
    assert_eq!(quads.solid.len(), 5);
    assert!(quads.solid.iter().all(|q| q.face() != BlockFace::Down));
}

#[test]
fn per_face_materials_split_merges() {
    let registry = registry();
    let dims = ChunkDims::new(4, 4).unwrap();
    let mut input = MeshInput::new(dims);
    for z in 0..4 {
        for x in 0..4 {
            input.set_interior(x, 0, z, if x < 2 { GRASS } else { STONE });
        }
    }
    input.set_vertical_boundary(STONE, AIR);
    input.rebuild_vertical_index(&registry);

    let quads = mesh_input(&registry, &input, MesherOptions::default());
    let up: Vec<_> = quads
        .solid
        .iter()
        .filter(|q| q.face() == BlockFace::Up)
        .collect();
    assert_eq!(up.len(), 2);
    assert_ne!(up[0].material(), up[1].material());
    assert_eq!(common::expand(&quads), reference_faces(&registry, &input));
}

#[test]
fn border_blocks_shape_edge_faces() {
    let registry = registry();
    let dims = ChunkDims::new(4, 2).unwrap();
    let mut input = MeshInput::new(dims);
    input.set_interior(0, 0, 0, STONE);
    // Padded (0, 0, 1) is the -X neighbour at the same height.
    input.set_voxel(0, 0, 1, STONE);
    // Chunk-local (-1, 0, -1) and (0, 1, -1), both in front of the North face.
    input.set_voxel(0, 0, 0, STONE);
    input.set_voxel(1, 1, 0, STONE);
    input.rebuild_vertical_index(&registry);

    let quads = mesh_input(&registry, &input, MesherOptions::default());
    let faces = common::expand(&quads);
    assert_eq!(faces, reference_faces(&registry, &input));
    assert!(!faces
        .iter()
        .any(|f| f.position == [0, 0, 0] && f.face == BlockFace::West));
    let north = faces
        .iter()
        .find(|f| f.position == [0, 0, 0] && f.face == BlockFace::North)
        .unwrap();
    // North: u = X, v = Y; both edges of corner 3 (-u, +v) are solid.
    assert_eq!(north.ao[3], 0);
}
