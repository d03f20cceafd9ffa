//! 15- and 16-bit packed RGB, stored as one host-order word per pixel.
//!
//! Component positions come straight from the registry's `shift` and
//! `depth` arrays.

use pixpack_core::prelude::{ChromaSite, FormatInfo, Plane, PlaneMut};

use super::{read16, widen8, write16};
use crate::PackFlags;

pub(crate) fn unpack_rgb16(
    info: &FormatInfo,
    flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    let le = info.is_le();
    for (i, d) in dest[..width * 4].chunks_exact_mut(4).enumerate() {
        let p = read16(s, i * 2, le);
        d[0] = 0xff;
        for c in 0..3 {
            let bits = info.depth[c];
            let v = (p >> info.shift[c]) & ((1 << bits) - 1);
            d[1 + c] = widen8(v as u8, bits, flags);
        }
    }
}

pub(crate) fn pack_rgb16(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    let le = info.is_le();
    for (i, s) in src[..width * 4].chunks_exact(4).enumerate() {
        let p = (0..3).fold(0u16, |acc, c| {
            acc | ((s[1 + c] as u16) >> (8 - info.depth[c])) << info.shift[c]
        });
        write16(d, i * 2, p, le);
    }
}
