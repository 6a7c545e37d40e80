#![allow(dead_code)]

use std::collections::BTreeSet;

use voxmesh_assets::{BlockData, MaterialData, Registry};
use voxmesh_core::{BlockFace, BlockId, MaybeMaterial};
use voxmesh_mesher::{ChunkQuads, Quad};
use voxmesh_testkit::UnitFace;

pub const AIR: BlockId = 0;
pub const STONE: BlockId = 1;
pub const GLASS: BlockId = 2;
pub const WATER: BlockId = 3;
pub const GRASS: BlockId = 4;
pub const BEDROCK: BlockId = 5;
pub const LEAVES: BlockId = 6;
pub const BLOCK_COUNT: BlockId = 7;

pub fn registry() -> Registry {
    let mut builder = Registry::builder();
    let stone = builder
        .add_material("stone", MaterialData::textured(0))
        .unwrap();
    let glass = builder
        .add_material("glass", MaterialData::textured(1))
        .unwrap();
    let water = builder
        .add_material("water", MaterialData::liquid(2))
        .unwrap();
    let grass_top = builder
        .add_material("grass_top", MaterialData::textured(3))
        .unwrap();
    let dirt = builder
        .add_material("dirt", MaterialData::textured(4))
        .unwrap();
    let leaves = builder
        .add_material(
            "leaves",
            MaterialData {
                alpha_test: true,
                ..MaterialData::textured(5)
            },
        )
        .unwrap();

    builder.add_block("air", BlockData::empty()).unwrap();
    builder.add_block("stone", BlockData::cube(stone)).unwrap();
    builder
        .add_block("glass", BlockData::translucent(glass))
        .unwrap();
    builder
        .add_block("water", BlockData::translucent(water))
        .unwrap();
    builder
        .add_block(
            "grass",
            BlockData::cube(dirt).with_face(BlockFace::Up, MaybeMaterial::some(grass_top)),
        )
        .unwrap();
    builder
        .add_block(
            "bedrock",
            BlockData::cube(stone).with_face(BlockFace::Down, MaybeMaterial::NONE),
        )
        .unwrap();
    builder
        .add_block(
            "leaves",
            BlockData {
                solid: true,
                ..BlockData::translucent(leaves)
            },
        )
        .unwrap();
    builder.build().unwrap()
}

/// Expand one quad into the unit faces it covers.
pub fn quad_faces(quad: &Quad) -> impl Iterator<Item = UnitFace> + '_ {
    quad.cells().map(move |position| UnitFace {
        position,
        face: quad.face(),
        material: quad.material(),
        ao: quad.ao(),
        wave: quad.wave(),
    })
}

/// Expand both streams, asserting no unit face is covered twice.
pub fn expand(quads: &ChunkQuads) -> BTreeSet<UnitFace> {
    let mut faces = BTreeSet::new();
    for quad in quads.solid.iter().chain(&quads.water) {
        for face in quad_faces(quad) {
            assert!(faces.insert(face), "unit face covered twice: {face:?}");
        }
    }
    faces
}
