//! Byte-permutation layouts: 24-bit RGB/BGR/v308, the 32-bit RGB and
//! AYUV orders, and the 64-bit canonical formats.

use pixpack_core::prelude::{ChromaSite, FormatInfo, Plane, PlaneMut};

use crate::PackFlags;

pub(crate) fn unpack_shuffle3(
    info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    let off = &info.offset;
    for (d, px) in dest[..width * 4].chunks_exact_mut(4).zip(s.chunks_exact(3)) {
        d.copy_from_slice(&[0xff, px[off[0]], px[off[1]], px[off[2]]]);
    }
}

pub(crate) fn pack_shuffle3(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    let off = &info.offset;
    for (px, s) in d.chunks_exact_mut(3).zip(src[..width * 4].chunks_exact(4)) {
        px[off[0]] = s[1];
        px[off[1]] = s[2];
        px[off[2]] = s[3];
    }
}

pub(crate) fn unpack_shuffle4(
    info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    let off = &info.offset;
    let alpha = info.has_alpha();
    for (d, px) in dest[..width * 4].chunks_exact_mut(4).zip(s.chunks_exact(4)) {
        let a = if alpha { px[off[3]] } else { 0xff };
        d.copy_from_slice(&[a, px[off[0]], px[off[1]], px[off[2]]]);
    }
}

/// Formats without alpha get 0xff in their padding byte.
pub(crate) fn pack_shuffle4(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    let off = &info.offset;
    // the color offsets are a permutation of three of 0..4
    let fill = if info.has_alpha() { off[3] } else { 6 - off[0] - off[1] - off[2] };
    let alpha = info.has_alpha();
    for (px, s) in d.chunks_exact_mut(4).zip(src[..width * 4].chunks_exact(4)) {
        px[off[0]] = s[1];
        px[off[1]] = s[2];
        px[off[2]] = s[3];
        px[fill] = if alpha { s[0] } else { 0xff };
    }
}

/// ARGB64 and AYUV64 already are the canonical layout.
pub(crate) fn unpack_copy8(
    _info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    dest[..width * 8].copy_from_slice(&planes[0].line(y)[..width * 8]);
}

pub(crate) fn pack_copy8(
    _info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    planes[0].line_mut(y)[..width * 8].copy_from_slice(&src[..width * 8]);
}
