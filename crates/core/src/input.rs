//! Padded input contract for the meshing core.
//!
//! The caller copies a chunk's interior into the centre of a padded view and
//! the adjacent 1-cell strips of its eight horizontal neighbours into the
//! border, using the nine-entry [`MesherOffset`] table. Face visibility and
//! ambient occlusion can then be evaluated at chunk edges without any
//! boundary branches in the scanning loops.

use crate::{BlockId, ChunkDims, CHUNK_WIDTH};

/// One entry of the border-assembly table. All pairs are `(x, z)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MesherOffset {
    /// Chunk-space delta from the meshed chunk to the source chunk.
    pub delta: [i32; 2],
    /// Destination origin inside the padded view.
    pub dst: [usize; 2],
    /// Source origin inside the source chunk's interior.
    pub src: [usize; 2],
    /// Rectangle size.
    pub size: [usize; 2],
}

/// Border-assembly table for chunks `width` voxels wide.
///
/// Entry 0 copies the chunk itself, entries 1-4 the four edge strips
/// (-X, +X, -Z, +Z) and entries 5-8 the four corner cells.
pub const fn mesher_offsets(width: usize) -> [MesherOffset; 9] {
    let w = width;
    let l = width - 1;
    let n = width + 1;
    const fn entry(
        delta: [i32; 2],
        dst: [usize; 2],
        src: [usize; 2],
        size: [usize; 2],
    ) -> MesherOffset {
        MesherOffset {
            delta,
            dst,
            src,
            size,
        }
    }
    [
        entry([0, 0], [1, 1], [0, 0], [w, w]),
        entry([-1, 0], [0, 1], [l, 0], [1, w]),
        entry([1, 0], [n, 1], [0, 0], [1, w]),
        entry([0, -1], [1, 0], [0, l], [w, 1]),
        entry([0, 1], [1, n], [0, 0], [w, 1]),
        entry([-1, -1], [0, 0], [l, l], [1, 1]),
        entry([-1, 1], [0, n], [l, 0], [1, 1]),
        entry([1, -1], [n, 0], [0, l], [1, 1]),
        entry([1, 1], [n, n], [0, 0], [1, 1]),
    ]
}

/// Border-assembly table for the default chunk width.
pub const MESHER_OFFSETS: [MesherOffset; 9] = mesher_offsets(CHUNK_WIDTH);

/// Answers whether a block can ever contribute a visible face.
///
/// Used to derive the per-column height bound; implementations must never
/// return `false` for a block that has a face material.
pub trait FaceEmitter {
    /// Whether `block` has at least one renderable face.
    fn emits_faces(&self, block: BlockId) -> bool;
}

/// Everything the meshing core reads for one chunk.
///
/// - `voxels`: padded view, `(width + 2) x height x (width + 2)`, indexed
///   `(y * P + z) * P + x` with `P = width + 2`. The interior sits at
///   `1..=width` on both horizontal axes.
/// - `equilevels`: per layer, whether every interior cell holds one block id.
/// - `heightmap`: per interior column, the highest `y` whose block can emit
///   a face. It is a performance bound; undercounting drops faces.
/// - `floor` / `ceiling`: blocks assumed below `y = 0` and above the top layer.
///
/// A fresh input is conservative (no equilevels, full-height bounds), so a
/// caller that skips [`MeshInput::rebuild_vertical_index`] only loses speed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MeshInput {
    dims: ChunkDims,
    voxels: Vec<BlockId>,
    equilevels: Vec<bool>,
    heightmap: Vec<u8>,
    floor: BlockId,
    ceiling: BlockId,
}

impl MeshInput {
    /// Allocate an input filled with block 0.
    pub fn new(dims: ChunkDims) -> Self {
        Self {
            dims,
            voxels: vec![0; dims.padded_volume()],
            equilevels: vec![false; dims.height()],
            heightmap: vec![(dims.height() - 1) as u8; dims.width() * dims.width()],
            floor: 0,
            ceiling: 0,
        }
    }

    /// Dimensions this input was sized for.
    #[inline]
    pub fn dims(&self) -> ChunkDims {
        self.dims
    }

    /// Linear index of a padded-view cell.
    #[inline]
    pub fn index(&self, x: usize, y: usize, z: usize) -> usize {
        let p = self.dims.padded_width();
        debug_assert!(x < p && z < p && y < self.dims.height());
        (y * p + z) * p + x
    }

    /// Block at padded coordinates.
    #[inline]
    pub fn voxel(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.voxels[self.index(x, y, z)]
    }

    /// Overwrite a block at padded coordinates.
    #[inline]
    pub fn set_voxel(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        let idx = self.index(x, y, z);
        self.voxels[idx] = block;
    }

    /// Block at interior (chunk-local) coordinates.
    #[inline]
    pub fn interior(&self, x: usize, y: usize, z: usize) -> BlockId {
        self.voxel(x + 1, y, z + 1)
    }

    /// Overwrite a block at interior (chunk-local) coordinates.
    #[inline]
    pub fn set_interior(&mut self, x: usize, y: usize, z: usize, block: BlockId) {
        self.set_voxel(x + 1, y, z + 1, block);
    }

    /// Raw padded view.
    pub fn voxels(&self) -> &[BlockId] {
        &self.voxels
    }

    /// Fill the whole padded view (interior and border) with one block.
    pub fn fill(&mut self, block: BlockId) {
        self.voxels.fill(block);
    }

    /// Copy one offset-table rectangle across the full height.
    ///
    /// `source(x, y, z)` is sampled in the source chunk's interior
    /// coordinates, starting at `offset.src`.
    pub fn copy_region<F>(&mut self, offset: &MesherOffset, mut source: F)
    where
        F: FnMut(usize, usize, usize) -> BlockId,
    {
        let [dst_x, dst_z] = offset.dst;
        let [src_x, src_z] = offset.src;
        let [size_x, size_z] = offset.size;
        for y in 0..self.dims.height() {
            for dz in 0..size_z {
                for dx in 0..size_x {
                    let block = source(src_x + dx, y, src_z + dz);
                    self.set_voxel(dst_x + dx, y, dst_z + dz, block);
                }
            }
        }
    }

    /// Fill one offset-table rectangle with a placeholder block.
    pub fn fill_region(&mut self, offset: &MesherOffset, block: BlockId) {
        self.copy_region(offset, |_, _, _| block);
    }

    /// Block assumed below `y = 0`.
    #[inline]
    pub fn floor(&self) -> BlockId {
        self.floor
    }

    /// Block assumed above the top layer.
    #[inline]
    pub fn ceiling(&self) -> BlockId {
        self.ceiling
    }

    /// Set the blocks assumed below and above the chunk.
    pub fn set_vertical_boundary(&mut self, floor: BlockId, ceiling: BlockId) {
        self.floor = floor;
        self.ceiling = ceiling;
    }

    /// Whether interior layer `y` holds a single block id.
    #[inline]
    pub fn equilevel(&self, y: usize) -> bool {
        self.equilevels[y]
    }

    /// Per-layer uniformity flags.
    pub fn equilevels(&self) -> &[bool] {
        &self.equilevels
    }

    /// Set the uniformity flag for a layer.
    pub fn set_equilevel(&mut self, y: usize, uniform: bool) {
        self.equilevels[y] = uniform;
    }

    /// Height bound for interior column `(x, z)`.
    #[inline]
    pub fn height_bound(&self, x: usize, z: usize) -> u8 {
        self.heightmap[z * self.dims.width() + x]
    }

    /// Per-column height bounds, indexed `z * width + x`.
    pub fn heightmap(&self) -> &[u8] {
        &self.heightmap
    }

    /// Set the height bound for interior column `(x, z)`.
    pub fn set_height_bound(&mut self, x: usize, z: usize, bound: u8) {
        let idx = z * self.dims.width() + x;
        self.heightmap[idx] = bound;
    }

    /// Recompute equilevels and height bounds from the current interior.
    pub fn rebuild_vertical_index(&mut self, emitter: &dyn FaceEmitter) {
        let width = self.dims.width();
        let height = self.dims.height();

        for y in 0..height {
            let first = self.interior(0, y, 0);
            let uniform = (0..width)
                .all(|z| (0..width).all(|x| self.interior(x, y, z) == first));
            self.equilevels[y] = uniform;
        }

        for z in 0..width {
            for x in 0..width {
                let top = (0..height)
                    .rev()
                    .find(|&y| emitter.emits_faces(self.interior(x, y, z)))
                    .unwrap_or(0);
                self.heightmap[z * width + x] = top as u8;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NonZero;

    impl FaceEmitter for NonZero {
        fn emits_faces(&self, block: BlockId) -> bool {
            block != 0
        }
    }

    fn dims() -> ChunkDims {
        ChunkDims::new(4, 6).unwrap()
    }

    #[test]
    fn offset_table_tiles_the_padded_footprint() {
        let width = 4;
        let p = width + 2;
        let mut covered = vec![0u8; p * p];
        for offset in mesher_offsets(width) {
            for dz in 0..offset.size[1] {
                for dx in 0..offset.size[0] {
                    covered[(offset.dst[1] + dz) * p + offset.dst[0] + dx] += 1;
                }
            }
        }
        assert!(covered.iter().all(|&c| c == 1));
    }

    #[test]
    fn offset_sources_are_adjacent_strips() {
        let width = 4;
        for offset in mesher_offsets(width) {
            for axis in 0..2 {
                let src = offset.src[axis];
                let size = offset.size[axis];
                assert!(src + size <= width);
                match offset.delta[axis] {
                    -1 => assert_eq!((src, size), (width - 1, 1)),
                    1 => assert_eq!((src, size), (0, 1)),
                    _ => assert_eq!((src, size), (0, width)),
                }
            }
        }
    }

    #[test]
    fn default_table_matches_default_width() {
        assert_eq!(MESHER_OFFSETS, mesher_offsets(CHUNK_WIDTH));
        assert_eq!(MESHER_OFFSETS[0].size, [CHUNK_WIDTH, CHUNK_WIDTH]);
    }

    #[test]
    fn fresh_input_is_conservative() {
        let input = MeshInput::new(dims());
        assert!(input.equilevels().iter().all(|&e| !e));
        assert!(input.heightmap().iter().all(|&h| h == 5));
    }

    #[test]
    fn interior_coordinates_are_offset_by_one() {
        let mut input = MeshInput::new(dims());
        input.set_interior(0, 2, 3, 9);
        assert_eq!(input.voxel(1, 2, 4), 9);
        assert_eq!(input.interior(0, 2, 3), 9);
    }

    #[test]
    fn copy_region_reads_source_rectangle() {
        let mut input = MeshInput::new(dims());
        let offsets = mesher_offsets(4);
        // +X neighbour: its x = 0 column lands at padded x = 5.
        input.copy_region(&offsets[2], |x, _, z| (x * 10 + z + 1) as BlockId);
        for z in 0..4 {
            assert_eq!(input.voxel(5, 0, z + 1), (z + 1) as BlockId);
        }
        assert_eq!(input.voxel(5, 0, 0), 0);
        assert_eq!(input.voxel(5, 0, 5), 0);
    }

    #[test]
    fn rebuild_vertical_index_tracks_uniform_layers_and_tops() {
        let mut input = MeshInput::new(dims());
        for z in 0..4 {
            for x in 0..4 {
                input.set_interior(x, 0, z, 1);
            }
        }
        input.set_interior(2, 3, 1, 1);
        // Border content must not affect uniformity.
        input.set_voxel(0, 1, 0, 7);
        input.rebuild_vertical_index(&NonZero);

        assert!(input.equilevel(0));
        assert!(input.equilevel(1));
        assert!(!input.equilevel(3));
        assert_eq!(input.height_bound(2, 1), 3);
        assert_eq!(input.height_bound(0, 0), 0);
    }
}
