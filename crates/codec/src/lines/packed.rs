//! Packed 4:2:2 and 4:1:1 YUV: YUY2, UYVY, YVYU, v216 and IYU1.

use pixpack_core::prelude::{ChromaSite, FormatInfo, Plane, PlaneMut, COMP_U, COMP_V, COMP_Y};

use super::{avg2, avg2_16, get16, quad_average, read16, set_pixel16, write16};
use crate::PackFlags;

/// Byte positions of the Y, U and V samples for pixel `i`.
#[inline]
fn positions(info: &FormatInfo, i: usize) -> (usize, usize, usize) {
    let ps = &info.pixel_stride;
    let off = &info.offset;
    (
        i * ps[COMP_Y] + off[COMP_Y],
        (i >> info.w_sub[COMP_U]) * ps[COMP_U] + off[COMP_U],
        (i >> info.w_sub[COMP_V]) * ps[COMP_V] + off[COMP_V],
    )
}

pub(crate) fn unpack_yuv422(
    info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    for (i, d) in dest[..width * 4].chunks_exact_mut(4).enumerate() {
        let (py, pu, pv) = positions(info, i);
        d.copy_from_slice(&[0xff, s[py], s[pu], s[pv]]);
    }
}

/// Chroma is the rounded mean of each pixel pair. A trailing odd pixel
/// fills both luma slots of its macropixel.
pub(crate) fn pack_yuv422(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for (j, pair) in src[..width * 4].chunks(8).enumerate() {
        let (py0, pu, pv) = positions(info, j * 2);
        let (py1, _, _) = positions(info, j * 2 + 1);
        d[py0] = pair[1];
        if pair.len() == 8 {
            d[py1] = pair[5];
            d[pu] = avg2(pair[2], pair[6]);
            d[pv] = avg2(pair[3], pair[7]);
        } else {
            d[py1] = pair[1];
            d[pu] = pair[2];
            d[pv] = pair[3];
        }
    }
}

/// v216 stores little-endian 16-bit samples in U Y0 V Y1 order.
pub(crate) fn unpack_v216(
    info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    for i in 0..width {
        let (py, pu, pv) = positions(info, i);
        let px = [0xffff, read16(s, py, true), read16(s, pu, true), read16(s, pv, true)];
        set_pixel16(dest, i, px);
    }
}

pub(crate) fn pack_v216(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for j in 0..width.div_ceil(2) {
        let i0 = j * 2;
        let i1 = (i0 + 1).min(width - 1);
        let (py0, pu, pv) = positions(info, i0);
        let (py1, _, _) = positions(info, i0 + 1);
        let sample = |i: usize, c: usize| get16(src, i * 4 + c);
        write16(d, py0, sample(i0, 1), true);
        write16(d, py1, sample(i1, 1), true);
        write16(d, pu, avg2_16(sample(i0, 2), sample(i1, 2)), true);
        write16(d, pv, avg2_16(sample(i0, 3), sample(i1, 3)), true);
    }
}

/// Byte offsets inside an IYU1 group of four pixels (U Y0 Y1 V Y2 Y3).
const IYU1_LUMA: [usize; 4] = [1, 2, 4, 5];
const IYU1_U: usize = 0;
const IYU1_V: usize = 3;

pub(crate) fn unpack_iyu1(
    _info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    for (i, d) in dest[..width * 4].chunks_exact_mut(4).enumerate() {
        let base = (i >> 2) * 6;
        d.copy_from_slice(&[0xff, s[base + IYU1_LUMA[i & 3]], s[base + IYU1_U], s[base + IYU1_V]]);
    }
}

/// Chroma is the truncated mean of each group of up to four pixels.
pub(crate) fn pack_iyu1(
    _info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for (g, quad) in src[..width * 4].chunks(16).enumerate() {
        let base = g * 6;
        let n = quad.len() / 4;
        for (k, px) in quad.chunks_exact(4).enumerate() {
            d[base + IYU1_LUMA[k]] = px[1];
        }
        let sum = |c: usize| quad.chunks_exact(4).map(|p| p[c] as u32).sum::<u32>();
        d[base + IYU1_U] = quad_average(sum(2), n, false);
        d[base + IYU1_V] = quad_average(sum(3), n, false);
    }
}
