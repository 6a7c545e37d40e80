//! Per-corner ambient occlusion and triangulation choice.
//!
//! A face's AO is read from the 3x3 ring of blocks in the layer the face
//! looks into, centred on the block directly in front of it. The ring is
//! indexed `(dv + 1) * 3 + (du + 1)` for in-plane offsets `du, dv` in
//! `-1..=1`; the centre entry is ignored.

/// In-plane offsets of the four corners, in corner order.
pub const CORNER_SIGNS: [(i32, i32); 4] = [(-1, -1), (1, -1), (1, 1), (-1, 1)];

/// Solidity of the eight blocks around a face, see the module docs.
pub type AoRing = [bool; 9];

#[inline]
const fn ring_index(du: i32, dv: i32) -> usize {
    ((dv + 1) * 3 + (du + 1)) as usize
}

/// Build a ring by querying each of the eight neighbours at `(du, dv)`.
#[inline]
pub fn sample_ring<F>(mut solid: F) -> AoRing
where
    F: FnMut(i32, i32) -> bool,
{
    let mut ring = [false; 9];
    for dv in -1..=1 {
        for du in -1..=1 {
            if du != 0 || dv != 0 {
                ring[ring_index(du, dv)] = solid(du, dv);
            }
        }
    }
    ring
}

/// Occlusion of one corner from its two edge neighbours and the diagonal.
///
/// Returns 3 for an open corner and 0 when both edges are solid, whatever
/// the diagonal holds.
#[inline]
pub const fn corner_ao(side_u: bool, side_v: bool, diagonal: bool) -> u8 {
    if side_u && side_v {
        return 0;
    }
    3 - (side_u as u8 + side_v as u8 + diagonal as u8)
}

/// AO levels for all four corners.
pub fn face_ao(ring: &AoRing) -> [u8; 4] {
    CORNER_SIGNS.map(|(su, sv)| {
        corner_ao(
            ring[ring_index(su, 0)],
            ring[ring_index(0, sv)],
            ring[ring_index(su, sv)],
        )
    })
}

/// Pack four 2-bit levels, corner 0 in the low bits.
#[inline]
pub const fn pack_ao(ao: [u8; 4]) -> u8 {
    (ao[0] & 3) | (ao[1] & 3) << 2 | (ao[2] & 3) << 4 | (ao[3] & 3) << 6
}

/// Inverse of [`pack_ao`].
#[inline]
pub const fn unpack_ao(packed: u8) -> [u8; 4] {
    [
        packed & 3,
        (packed >> 2) & 3,
        (packed >> 4) & 3,
        (packed >> 6) & 3,
    ]
}

/// Diagonal shared by a quad's two triangles.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Diagonal {
    /// Split along corners 0 and 2.
    Corners02,
    /// Split along corners 1 and 3.
    Corners13,
}

impl Diagonal {
    /// Split along the brighter diagonal so interpolation follows the AO
    /// gradient; ties keep 0-2.
    pub fn for_ao(ao: [u8; 4]) -> Self {
        let d02 = ao[0] + ao[2];
        let d13 = ao[1] + ao[3];
        if d13 > d02 {
            Diagonal::Corners13
        } else {
            Diagonal::Corners02
        }
    }
}
