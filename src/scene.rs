//! Demo worlds for the CLI.

use anyhow::{Context, Result};
use rand::{rngs::StdRng, Rng, SeedableRng};
use serde::{Deserialize, Serialize};
use voxmesh_assets::Registry;
use voxmesh_core::BlockId;
use voxmesh_world::{ChunkPos, ChunkStorage};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, clap::ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum SceneKind {
    /// Rolling hills with a sea level.
    Terrain,
    /// Every chunk solid stone.
    Buried,
    /// One solid stone chunk, nothing around it.
    Exposed,
    /// A 2x2 stone slab floating in each chunk.
    Slab,
    /// Water pooled on stone, open to the sky.
    Pond,
}

struct Palette {
    stone: BlockId,
    dirt: BlockId,
    grass: BlockId,
    sand: BlockId,
    water: BlockId,
    bedrock: BlockId,
}

impl Palette {
    fn resolve(registry: &Registry) -> Result<Self> {
        let id = |name: &str| {
            registry
                .id_by_name(name)
                .with_context(|| format!("scene needs a block named {name:?}"))
        };
        Ok(Self {
            stone: id("stone")?,
            dirt: id("dirt")?,
            grass: id("grass")?,
            sand: id("sand")?,
            water: id("water")?,
            bedrock: id("bedrock")?,
        })
    }
}

/// Chunk positions covered by a square of `radius` around the origin.
pub fn chunk_positions(radius: i32) -> impl Iterator<Item = ChunkPos> {
    (-radius..=radius).flat_map(move |z| (-radius..=radius).map(move |x| ChunkPos::new(x, z)))
}

/// Fill `storage` with `scene`. Returns the number of chunks written.
pub fn populate(
    storage: &mut ChunkStorage,
    registry: &Registry,
    scene: SceneKind,
    radius: i32,
    seed: u64,
) -> Result<usize> {
    let palette = Palette::resolve(registry)?;
    let dims = storage.dims();
    let (width, height) = (dims.width(), dims.height());
    let radius = if scene == SceneKind::Exposed { 0 } else { radius.max(0) };

    let mut count = 0;
    for pos in chunk_positions(radius) {
        let chunk = storage.ensure_chunk(pos);
        match scene {
            SceneKind::Buried | SceneKind::Exposed => chunk.fill_layers(0..height, palette.stone),
            SceneKind::Slab => {
                let y = height / 2;
                let mid = width / 2;
                for z in mid.saturating_sub(1)..(mid + 1).min(width) {
                    for x in mid.saturating_sub(1)..(mid + 1).min(width) {
                        chunk.set_block(x, y, z, palette.stone);
                    }
                }
            }
            SceneKind::Pond => {
                let floor = (height / 4).max(1);
                chunk.fill_layers(0..floor, palette.stone);
                chunk.fill_layers(floor..(floor + 2).min(height), palette.water);
            }
            SceneKind::Terrain => {
                let mut rng = StdRng::seed_from_u64(chunk_seed(seed, pos));
                let base = height / 4;
                let sea = base + 2;
                let amplitude = (height / 16).max(1);
                for z in 0..width {
                    for x in 0..width {
                        let top = (base + rng.gen_range(0..=amplitude)).min(height - 1);
                        fill_column(chunk, x, z, top, sea.min(height - 1), &palette);
                    }
                }
            }
        }
        count += 1;
    }
    Ok(count)
}

fn fill_column(
    chunk: &mut voxmesh_world::Chunk,
    x: usize,
    z: usize,
    top: usize,
    sea: usize,
    palette: &Palette,
) {
    chunk.set_block(x, 0, z, palette.bedrock);
    for y in 1..=top {
        let block = if y == top {
            if top < sea {
                palette.sand
            } else {
                palette.grass
            }
        } else if y + 3 >= top {
            palette.dirt
        } else {
            palette.stone
        };
        chunk.set_block(x, y, z, block);
    }
    for y in top + 1..=sea {
        chunk.set_block(x, y, z, palette.water);
    }
}

fn chunk_seed(seed: u64, pos: ChunkPos) -> u64 {
    let x = pos.x as i64 as u64;
    let z = pos.z as i64 as u64;
    seed ^ x.wrapping_mul(0x9E37_79B9_7F4A_7C15) ^ z.wrapping_mul(0xC2B2_AE3D_27D4_EB4F)
}
