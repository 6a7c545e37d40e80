use std::ops::Range;

use tracing::{debug, trace};
use voxmesh_assets::Registry;
use voxmesh_core::{BlockFace, BlockId, ChunkDims, MeshInput};

use crate::ao::{face_ao, pack_ao, sample_ring};
use crate::mask::{visible_material, MaskKey};
use crate::quad::{hash_streams, ChunkQuads, MeshHash, Quad};

/// Tuning switches that never change the emitted quads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MesherOptions {
    /// Skip vertical ranges and uniform layers that cannot emit faces.
    pub vertical_reduction: bool,
}

impl Default for MesherOptions {
    fn default() -> Self {
        Self {
            vertical_reduction: true,
        }
    }
}

/// Greedy mesher for chunks of one fixed size.
///
/// Owns its mask scratch buffer and output lists, so one instance per
/// thread meshes independent chunks without synchronization. The registry
/// is shared read-only.
pub struct Mesher<'a> {
    registry: &'a Registry,
    dims: ChunkDims,
    options: MesherOptions,
    // One mask serves both streams: the wave bit is part of the key, so
    // liquid and solid cells never merge and emission routes on it.
    mask: Vec<MaskKey>,
    solid: Vec<Quad>,
    water: Vec<Quad>,
}

impl<'a> Mesher<'a> {
    /// Create a mesher and size its scratch buffer for `dims`.
    pub fn new(registry: &'a Registry, dims: ChunkDims, options: MesherOptions) -> Self {
        let width = dims.width();
        let cells = (width * width).max(width * dims.height());
        Self {
            registry,
            dims,
            options,
            mask: vec![MaskKey::EMPTY; cells],
            solid: Vec::new(),
            water: Vec::new(),
        }
    }

    /// Chunk size this mesher accepts.
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Active options.
    pub fn options(&self) -> MesherOptions {
        self.options
    }

    /// Static quads from the last call.
    pub fn solid(&self) -> &[Quad] {
        &self.solid
    }

    /// Liquid quads from the last call.
    pub fn water(&self) -> &[Quad] {
        &self.water
    }

    /// Hash of the last call's output.
    pub fn hash(&self) -> MeshHash {
        hash_streams(&self.solid, &self.water)
    }

    /// Move the last call's output out, leaving the lists empty.
    pub fn take_output(&mut self) -> ChunkQuads {
        ChunkQuads {
            solid: std::mem::take(&mut self.solid),
            water: std::mem::take(&mut self.water),
        }
    }

    /// Mesh one chunk, replacing the previous output.
    ///
    /// # Panics
    /// Panics if `input` was sized for different dimensions, or if it holds
    /// a block id the registry does not know.
    pub fn mesh_chunk(&mut self, input: &MeshInput) {
        assert_eq!(
            input.dims(),
            self.dims,
            "mesh input sized for {:?}, mesher expects {:?}",
            input.dims(),
            self.dims
        );
        self.solid.clear();
        self.water.clear();

        let ys = self.vertical_range(input);
        if ys.is_empty() {
            debug!(y_min = ys.start, y_max = ys.end, "nothing to mesh");
            return;
        }
        for face in BlockFace::ALL {
            self.mesh_face(input, face, ys.clone());
        }
        debug!(
            solid = self.solid.len(),
            water = self.water.len(),
            y_min = ys.start,
            y_max = ys.end,
            "meshed chunk"
        );
    }

    /// Interior layers that can hold a visible face.
    ///
    /// The top comes from the height bounds. The bottom skips every layer
    /// that, together with its whole padded neighbourhood, is made of the
    /// floor block, as long as that block hides faces against itself.
    pub fn vertical_range(&self, input: &MeshInput) -> Range<usize> {
        let height = self.dims.height();
        if !self.options.vertical_reduction {
            return 0..height;
        }
        let top = input
            .heightmap()
            .iter()
            .map(|&h| h as usize + 1)
            .max()
            .unwrap_or(0)
            .min(height);

        let floor = input.floor();
        let bottom = if self.hides_itself(floor) {
            let layer = self.dims.padded_width() * self.dims.padded_width();
            input
                .voxels()
                .chunks_exact(layer)
                .take_while(|cells| cells.iter().all(|&b| b == floor))
                .count()
                .saturating_sub(1)
        } else {
            0
        };
        bottom..top.max(bottom)
    }

    fn hides_itself(&self, block: BlockId) -> bool {
        BlockFace::ALL
            .iter()
            .all(|&face| visible_material(self.registry, block, block, face).is_none())
    }

    /// Whether every Up/Down face of a uniform layer is hidden by an
    /// identical uniform layer on the far side.
    fn skip_layer(&self, input: &MeshInput, face: BlockFace, y: usize) -> bool {
        if !input.equilevel(y) {
            return false;
        }
        let block = input.interior(0, y, 0);
        let next = y as i32 + face.sign();
        let beyond = if next < 0 {
            input.floor()
        } else if next as usize >= self.dims.height() {
            input.ceiling()
        } else if input.equilevel(next as usize) {
            input.interior(0, next as usize, 0)
        } else {
            return false;
        };
        beyond == block && visible_material(self.registry, block, block, face).is_none()
    }

    fn mesh_face(&mut self, input: &MeshInput, face: BlockFace, ys: Range<usize>) {
        let axis = face.axis();
        let (u_axis, v_axis) = face.tangent_axes();
        let width = self.dims.width();
        let lo = [0, ys.start, 0];
        let hi = [width, ys.end, width];
        let size_u = hi[u_axis] - lo[u_axis];
        let size_v = hi[v_axis] - lo[v_axis];

        for layer in lo[axis]..hi[axis] {
            if axis == 1 && self.options.vertical_reduction && self.skip_layer(input, face, layer) {
                trace!(?face, layer, "skipped uniform layer");
                continue;
            }

            for j in 0..size_v {
                for i in 0..size_u {
                    let mut pos = [0i32; 3];
                    pos[axis] = layer as i32;
                    pos[u_axis] = (lo[u_axis] + i) as i32;
                    pos[v_axis] = (lo[v_axis] + j) as i32;
                    let key = self.face_key(input, pos, face);
                    self.mask[j * size_u + i] = key;
                }
            }

            let mut origin = [0i32; 3];
            origin[axis] = layer as i32;
            origin[u_axis] = lo[u_axis] as i32;
            origin[v_axis] = lo[v_axis] as i32;
            self.merge(face, origin, size_u, size_v);
        }
    }

    fn face_key(&self, input: &MeshInput, pos: [i32; 3], face: BlockFace) -> MaskKey {
        let block = sample(input, pos);
        let normal = face.normal();
        let front = [pos[0] + normal[0], pos[1] + normal[1], pos[2] + normal[2]];
        let Some(material) = visible_material(self.registry, block, sample(input, front), face)
        else {
            return MaskKey::EMPTY;
        };

        let (u_axis, v_axis) = face.tangent_axes();
        let ring = sample_ring(|du, dv| {
            let mut p = front;
            p[u_axis] += du;
            p[v_axis] += dv;
            self.registry.block(sample(input, p)).solid
        });
        let liquid = self.registry.material(material).liquid;
        MaskKey::new(material, pack_ao(face_ao(&ring)), liquid)
    }

    /// Greedy pass over the first `size_u * size_v` mask cells, rows of `v`
    /// outer and `u` inner, growing along `u` before `v`.
    fn merge(&mut self, face: BlockFace, origin: [i32; 3], size_u: usize, size_v: usize) {
        let (u_axis, v_axis) = face.tangent_axes();
        let Self {
            mask, solid, water, ..
        } = self;
        let mask = &mut mask[..size_u * size_v];

        let mut j = 0;
        while j < size_v {
            let mut i = 0;
            while i < size_u {
                let key = mask[j * size_u + i];
                if key.is_empty() {
                    i += 1;
                    continue;
                }

                let mut quad_width = 1;
                while i + quad_width < size_u && mask[j * size_u + i + quad_width] == key {
                    quad_width += 1;
                }

                let mut quad_height = 1;
                'scan: while j + quad_height < size_v {
                    let row = (j + quad_height) * size_u + i;
                    for cell in &mask[row..row + quad_width] {
                        if *cell != key {
                            break 'scan;
                        }
                    }
                    quad_height += 1;
                }

                for dv in 0..quad_height {
                    let row = (j + dv) * size_u + i;
                    mask[row..row + quad_width].fill(MaskKey::EMPTY);
                }

                if let Some(material) = key.material() {
                    let mut position = origin;
                    position[u_axis] += i as i32;
                    position[v_axis] += j as i32;
                    let quad = Quad::new(
                        position,
                        (quad_width as u16, quad_height as u16),
                        face,
                        material,
                        key.ao(),
                        key.wave(),
                    );
                    if key.wave() {
                        water.push(quad);
                    } else {
                        solid.push(quad);
                    }
                }
                i += quad_width;
            }
            j += 1;
        }
    }
}

/// Block at chunk-local `pos`, reading the border for `x, z` in `-1..=width`
/// and the floor/ceiling blocks outside `0..height`.
#[inline]
fn sample(input: &MeshInput, pos: [i32; 3]) -> BlockId {
    let [x, y, z] = pos;
    if y < 0 {
        input.floor()
    } else if y as usize >= input.dims().height() {
        input.ceiling()
    } else {
        input.voxel((x + 1) as usize, y as usize, (z + 1) as usize)
    }
}

/// Mesh one chunk with a throwaway [`Mesher`].
pub fn mesh_input(registry: &Registry, input: &MeshInput, options: MesherOptions) -> ChunkQuads {
    let mut mesher = Mesher::new(registry, input.dims(), options);
    mesher.mesh_chunk(input);
    mesher.take_output()
}

#[cfg(test)]
mod tests {
    use super::*;
    use voxmesh_assets::{BlockData, MaterialData};

    fn registry() -> Registry {
        let mut builder = Registry::builder();
        let stone = builder
            .add_material("stone", MaterialData::textured(0))
            .unwrap();
        builder.add_block("air", BlockData::empty()).unwrap();
        builder.add_block("stone", BlockData::cube(stone)).unwrap();
        builder.build().unwrap()
    }

    fn dims() -> ChunkDims {
        ChunkDims::new(4, 8).unwrap()
    }

    #[test]
    fn single_block_emits_six_unit_quads() {
        let registry = registry();
        let mut input = MeshInput::new(dims());
        input.set_interior(1, 3, 2, 1);
        input.rebuild_vertical_index(&registry);

        let mut mesher = Mesher::new(&registry, dims(), MesherOptions::default());
        mesher.mesh_chunk(&input);
        assert_eq!(mesher.solid().len(), 6);
        assert!(mesher.water().is_empty());
        for quad in mesher.solid() {
            assert_eq!(quad.position, [1, 3, 2]);
            assert_eq!((quad.width, quad.height), (1, 1));
            assert_eq!(quad.ao(), [3; 4]);
        }
    }

    #[test]
    fn output_is_cleared_between_calls() {
        let registry = registry();
        let mut input = MeshInput::new(dims());
        input.set_interior(0, 0, 0, 1);
        let mut mesher = Mesher::new(&registry, dims(), MesherOptions::default());
        mesher.mesh_chunk(&input);
        assert!(!mesher.solid().is_empty());

        input.set_interior(0, 0, 0, 0);
        input.rebuild_vertical_index(&registry);
        mesher.mesh_chunk(&input);
        assert!(mesher.solid().is_empty());
    }

    #[test]
    fn range_stops_at_the_height_bound() {
        let registry = registry();
        let mut input = MeshInput::new(dims());
        for z in 0..4 {
            for x in 0..4 {
                input.set_interior(x, 0, z, 1);
                input.set_interior(x, 1, z, 1);
            }
        }
        input.set_vertical_boundary(1, 0);
        input.rebuild_vertical_index(&registry);

        let mesher = Mesher::new(&registry, dims(), MesherOptions::default());
        assert_eq!(mesher.vertical_range(&input), 0..2);

        let full = Mesher::new(
            &registry,
            dims(),
            MesherOptions {
                vertical_reduction: false,
            },
        );
        assert_eq!(full.vertical_range(&input), 0..8);
    }

    #[test]
    fn range_skips_buried_floor_layers() {
        let registry = registry();
        let mut input = MeshInput::new(dims());
        input.fill(1);
        for y in 5..8 {
            for z in 0..6 {
                for x in 0..6 {
                    input.set_voxel(x, y, z, 0);
                }
            }
        }
        input.set_vertical_boundary(1, 0);
        input.rebuild_vertical_index(&registry);

        let mesher = Mesher::new(&registry, dims(), MesherOptions::default());
        assert_eq!(mesher.vertical_range(&input), 4..5);
        assert_eq!(mesh_input(&registry, &input, MesherOptions::default()).solid.len(), 1);
    }

    #[test]
    #[should_panic(expected = "mesh input sized for")]
    fn mismatched_dims_panic() {
        let registry = registry();
        let input = MeshInput::new(ChunkDims::new(2, 2).unwrap());
        let mut mesher = Mesher::new(&registry, dims(), MesherOptions::default());
        mesher.mesh_chunk(&input);
    }
}
