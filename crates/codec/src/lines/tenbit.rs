//! 10-bit layouts: v210, UYVP, r210 and the 10-bit planar I420/I422
//! variants. All unpack into 16-bit canonical pixels.

use pixpack_core::prelude::{ChromaSite, FormatInfo, Plane, PlaneMut, COMP_U, COMP_V, COMP_Y};

use super::{avg2_16, comp_line, comp_line_mut, get16, read16, set_pixel16, widen16, write16};
use crate::PackFlags;

#[inline]
fn read_le32(s: &[u8], at: usize) -> u32 {
    u32::from_le_bytes([s[at], s[at + 1], s[at + 2], s[at + 3]])
}

/// Six pixels per 16-byte group of four little-endian words, each word
/// holding three 10-bit samples at bits 0, 10 and 20.
pub(crate) fn unpack_v210(
    _info: &FormatInfo,
    flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    for g in 0..width.div_ceil(6) {
        let a = [0, 4, 8, 12].map(|k| read_le32(s, g * 16 + k));
        let sample = |word: u32, pos: u32| widen16(((word >> pos) & 0x3ff) as u16, 10, flags);

        let (u0, y0, v0) = (sample(a[0], 0), sample(a[0], 10), sample(a[0], 20));
        let (y1, u2, y2) = (sample(a[1], 0), sample(a[1], 10), sample(a[1], 20));
        let (v2, y3, u4) = (sample(a[2], 0), sample(a[2], 10), sample(a[2], 20));
        let (y4, v4, y5) = (sample(a[3], 0), sample(a[3], 10), sample(a[3], 20));

        let group = [
            (y0, u0, v0),
            (y1, u0, v0),
            (y2, u2, v2),
            (y3, u2, v2),
            (y4, u4, v4),
            (y5, u4, v4),
        ];
        for (k, (yy, uu, vv)) in group.into_iter().enumerate() {
            let i = g * 6 + k;
            if i >= width {
                break;
            }
            set_pixel16(dest, i, [0xffff, yy, uu, vv]);
        }
    }
}

/// Pixels past the end of a partial group repeat the last pixel.
pub(crate) fn pack_v210(
    _info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for g in 0..width.div_ceil(6) {
        let px = |k: usize| (g * 6 + k).min(width - 1);
        let luma = |k: usize| (get16(src, px(k) * 4 + 1) >> 6) as u32;
        let chroma = |k: usize, c: usize| {
            (get16(src, px(k) * 4 + c) as u32 + get16(src, px(k + 1) * 4 + c) as u32 + 1) >> 7
        };

        let (u0, u1, u2) = (chroma(0, 2), chroma(2, 2), chroma(4, 2));
        let (v0, v1, v2) = (chroma(0, 3), chroma(2, 3), chroma(4, 3));
        let words = [
            u0 | luma(0) << 10 | v0 << 20,
            luma(1) | u1 << 10 | luma(2) << 20,
            v1 | luma(3) << 10 | u2 << 20,
            luma(4) | v2 << 10 | luma(5) << 20,
        ];
        for (k, w) in words.into_iter().enumerate() {
            let at = g * 16 + k * 4;
            d[at..at + 4].copy_from_slice(&w.to_le_bytes());
        }
    }
}

/// Two pixels per five bytes: U0 Y0 V0 Y1 as consecutive big-endian 10-bit
/// fields.
pub(crate) fn unpack_uyvp(
    _info: &FormatInfo,
    flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    for g in 0..width.div_ceil(2) {
        let b = |k: usize| s[g * 5 + k] as u16;
        let u = widen16((b(0) << 2) | (b(1) >> 6), 10, flags);
        let y0 = widen16(((b(1) & 0x3f) << 4) | (b(2) >> 4), 10, flags);
        let v = widen16(((b(2) & 0x0f) << 6) | (b(3) >> 2), 10, flags);
        let y1 = widen16(((b(3) & 0x03) << 8) | b(4), 10, flags);

        set_pixel16(dest, g * 2, [0xffff, y0, u, v]);
        if g * 2 + 1 < width {
            set_pixel16(dest, g * 2 + 1, [0xffff, y1, u, v]);
        }
    }
}

pub(crate) fn pack_uyvp(
    _info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for g in 0..width.div_ceil(2) {
        let i0 = g * 2;
        let i1 = (i0 + 1).min(width - 1);
        let y0 = get16(src, i0 * 4 + 1);
        let y1 = get16(src, i1 * 4 + 1);
        let u = avg2_16(get16(src, i0 * 4 + 2), get16(src, i1 * 4 + 2));
        let v = avg2_16(get16(src, i0 * 4 + 3), get16(src, i1 * 4 + 3));

        let out = &mut d[g * 5..g * 5 + 5];
        out[0] = (u >> 8) as u8;
        out[1] = ((u & 0xc0) | (y0 >> 10)) as u8;
        out[2] = (((y0 & 0x3c0) >> 2) | (v >> 12)) as u8;
        out[3] = (((v & 0xfc0) >> 4) | (y1 >> 14)) as u8;
        out[4] = (y1 >> 6) as u8;
    }
}

/// One big-endian word per pixel: 2 pad bits, then 10-bit R, G and B.
pub(crate) fn unpack_r210(
    _info: &FormatInfo,
    flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    for i in 0..width {
        let x = u32::from_be_bytes([s[i * 4], s[i * 4 + 1], s[i * 4 + 2], s[i * 4 + 3]]);
        let c = |shift: u32| widen16(((x >> shift) & 0x3ff) as u16, 10, flags);
        set_pixel16(dest, i, [0xffff, c(20), c(10), c(0)]);
    }
}

pub(crate) fn pack_r210(
    _info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for i in 0..width {
        let c = |k: usize| (get16(src, i * 4 + k) & 0xffc0) as u32;
        let x = (c(1) << 14) | (c(2) << 4) | (c(3) >> 6);
        d[i * 4..i * 4 + 4].copy_from_slice(&x.to_be_bytes());
    }
}

/// 10-bit samples in the low bits of 16-bit words, byte order per format.
pub(crate) fn unpack_planar10(
    info: &FormatInfo,
    flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let le = info.is_le();
    let sy = comp_line(info, planes, COMP_Y, y);
    let su = comp_line(info, planes, COMP_U, y >> info.h_sub[COMP_U]);
    let sv = comp_line(info, planes, COMP_V, y >> info.h_sub[COMP_V]);
    let sample = |line: &[u8], idx: usize| widen16(read16(line, idx * 2, le) & 0x3ff, 10, flags);

    for i in 0..width {
        let px = [
            0xffff,
            sample(sy, i),
            sample(su, i >> info.w_sub[COMP_U]),
            sample(sv, i >> info.w_sub[COMP_V]),
        ];
        set_pixel16(dest, i, px);
    }
}

pub(crate) fn pack_planar10(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let le = info.is_le();
    let dy = comp_line_mut(info, planes, COMP_Y, y);
    for i in 0..width {
        write16(dy, i * 2, get16(src, i * 4 + 1) >> 6, le);
    }

    for comp in [COMP_U, COMP_V] {
        let c = 1 + comp;
        let line = comp_line_mut(info, planes, comp, y >> info.h_sub[comp]);
        for j in 0..width.div_ceil(2) {
            let i0 = j * 2;
            let i1 = (i0 + 1).min(width - 1);
            let v = avg2_16(get16(src, i0 * 4 + c), get16(src, i1 * 4 + c)) >> 6;
            write16(line, j * 2, v, le);
        }
    }
}
