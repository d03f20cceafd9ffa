//! RGB8P: 8-bit indices into a 256-entry palette of host-order ARGB words
//! stored in plane 1.

use pixpack_core::prelude::{ChromaSite, FormatInfo, Plane, PlaneMut};

use crate::PackFlags;

/// Number of palette entries.
pub const PALETTE_SIZE: usize = 256;

/// Index written for pixels whose alpha is below half.
pub const TRANSPARENT_INDEX: u8 = 216;

/// Color cube that [`FormatCodec::pack`](crate::FormatCodec::pack) quantizes
/// RGB8P pixels against.
///
/// Entry `r * 36 + g * 6 + b` is the opaque color with components
/// `r * 0x33`, `g * 0x33` and `b * 0x33`. Entries from
/// [`TRANSPARENT_INDEX`] on are fully transparent black.
///
/// # Example
/// ```rust
/// use pixpack_codec::lines::palette::default_palette;
///
/// let palette = default_palette();
/// assert_eq!(palette[0], 0xff00_0000);
/// assert_eq!(palette[215], 0xffff_ffff);
/// assert_eq!(palette[216], 0);
/// ```
pub fn default_palette() -> [u32; PALETTE_SIZE] {
    let mut palette = [0u32; PALETTE_SIZE];
    for r in 0..6u32 {
        for g in 0..6u32 {
            for b in 0..6u32 {
                palette[(r * 36 + g * 6 + b) as usize] =
                    0xff00_0000 | (r * 0x33) << 16 | (g * 0x33) << 8 | b * 0x33;
            }
        }
    }
    palette
}

/// Store `palette` into an RGB8P palette plane.
///
/// Returns `false` when the plane cannot hold all entries.
pub fn write_palette(plane: &mut PlaneMut<'_>, palette: &[u32; PALETTE_SIZE]) -> bool {
    let data = plane.data();
    if data.len() < PALETTE_SIZE * 4 {
        return false;
    }
    for (dst, entry) in data.chunks_exact_mut(4).zip(palette) {
        dst.copy_from_slice(&entry.to_ne_bytes());
    }
    true
}

pub(crate) fn unpack_rgb8p(
    _info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    let palette = planes[1].data();
    for (d, &idx) in dest[..width * 4].chunks_exact_mut(4).zip(s) {
        let at = idx as usize * 4;
        let v = u32::from_ne_bytes([palette[at], palette[at + 1], palette[at + 2], palette[at + 3]]);
        d.copy_from_slice(&v.to_be_bytes());
    }
}

/// Quantizes against [`default_palette`]; the palette plane is left alone.
pub(crate) fn pack_rgb8p(
    _info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for (idx, s) in d.iter_mut().zip(src[..width * 4].chunks_exact(4)) {
        *idx = if s[0] < 0x80 {
            TRANSPARENT_INDEX
        } else {
            let level = |c: u8| c / 47 % 6;
            level(s[1]) * 36 + level(s[2]) * 6 + level(s[3])
        };
    }
}
