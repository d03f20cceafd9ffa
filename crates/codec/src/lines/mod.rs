//! Per-format scanline routines.
//!
//! Every routine follows the [`UnpackFn`](crate::UnpackFn) /
//! [`PackFn`](crate::PackFn) calling convention and reads its geometry from
//! the registry entry it is handed. Callers guarantee that each plane holds
//! the requested line and `width` pixels; out-of-range access panics.

use pixpack_core::prelude::{FormatInfo, Plane, PlaneMut};

use crate::PackFlags;

pub(crate) mod gray;
pub(crate) mod packed;
pub mod palette;
pub(crate) mod planar;
pub(crate) mod rgb16;
pub(crate) mod shuffle;
pub(crate) mod tenbit;

/// Bytes of component `comp` on `line`, starting at the component's offset.
#[inline]
pub(crate) fn comp_line<'a>(
    info: &FormatInfo,
    planes: &[Plane<'a>],
    comp: usize,
    line: usize,
) -> &'a [u8] {
    &planes[info.plane[comp]].line(line)[info.offset[comp]..]
}

/// Writable bytes of component `comp` on `line`, starting at its offset.
#[inline]
pub(crate) fn comp_line_mut<'p>(
    info: &FormatInfo,
    planes: &'p mut [PlaneMut<'_>],
    comp: usize,
    line: usize,
) -> &'p mut [u8] {
    let offset = info.offset[comp];
    &mut planes[info.plane[comp]].line_mut(line)[offset..]
}

/// Sample `idx` of a 16-bit canonical buffer.
#[inline]
pub(crate) fn get16(buf: &[u8], idx: usize) -> u16 {
    u16::from_ne_bytes([buf[idx * 2], buf[idx * 2 + 1]])
}

#[inline]
pub(crate) fn set16(buf: &mut [u8], idx: usize, v: u16) {
    buf[idx * 2..idx * 2 + 2].copy_from_slice(&v.to_ne_bytes());
}

/// Store one canonical 16-bit pixel (alpha, c1, c2, c3) at pixel index `i`.
#[inline]
pub(crate) fn set_pixel16(buf: &mut [u8], i: usize, px: [u16; 4]) {
    for (k, v) in px.into_iter().enumerate() {
        set16(buf, i * 4 + k, v);
    }
}

#[inline]
pub(crate) fn read16(bytes: &[u8], at: usize, le: bool) -> u16 {
    let raw = [bytes[at], bytes[at + 1]];
    if le {
        u16::from_le_bytes(raw)
    } else {
        u16::from_be_bytes(raw)
    }
}

#[inline]
pub(crate) fn write16(bytes: &mut [u8], at: usize, v: u16, le: bool) {
    let raw = if le { v.to_le_bytes() } else { v.to_be_bytes() };
    bytes[at..at + 2].copy_from_slice(&raw);
}

/// Move a `bits`-wide sample to the top of a byte.
///
/// Unless the range is truncated the vacated low bits repeat the top bits,
/// so full-scale input maps to 0xff.
#[inline]
pub(crate) fn widen8(v: u8, bits: u32, flags: PackFlags) -> u8 {
    let c = v << (8 - bits);
    if flags.contains(PackFlags::TRUNCATE_RANGE) {
        c
    } else {
        c | (c >> bits)
    }
}

/// 16-bit counterpart of [`widen8`].
#[inline]
pub(crate) fn widen16(v: u16, bits: u32, flags: PackFlags) -> u16 {
    let c = v << (16 - bits);
    if flags.contains(PackFlags::TRUNCATE_RANGE) {
        c
    } else {
        c | (c >> bits)
    }
}

#[inline]
pub(crate) fn avg2(a: u8, b: u8) -> u8 {
    ((a as u16 + b as u16 + 1) >> 1) as u8
}

#[inline]
pub(crate) fn avg2_16(a: u16, b: u16) -> u16 {
    ((a as u32 + b as u32 + 1) >> 1) as u16
}

/// Mean of the `n` (1..=4) samples summed in `sum`.
///
/// `rounded` adds half the divisor before dividing; the 4:1:0 and IYU1
/// layouts truncate instead.
#[inline]
pub(crate) fn quad_average(sum: u32, n: usize, rounded: bool) -> u8 {
    let v = match (n, rounded) {
        (4, true) => (sum + 2) >> 2,
        (4, false) => sum >> 2,
        (3, true) => (sum + 1) / 3,
        (3, false) => sum / 3,
        (2, true) => (sum + 1) >> 1,
        (2, false) => sum >> 1,
        _ => sum,
    };
    v as u8
}

#[cfg(test)]
pub(crate) mod testutil {
    use pixpack_core::prelude::{Plane, PlaneMut, Resolution, VideoFormat, VideoInfo};

    /// Zeroed planes laid out per [`VideoInfo`].
    pub struct Planes {
        pub info: VideoInfo,
        pub bufs: Vec<Vec<u8>>,
    }

    impl Planes {
        pub fn new(format: VideoFormat, width: u32, height: u32) -> Self {
            let info = VideoInfo::new(format, Resolution::new(width, height).unwrap()).unwrap();
            let bufs = (0..info.n_planes())
                .map(|p| vec![0u8; info.plane_size(p)])
                .collect();
            Self { info, bufs }
        }

        pub fn planes(&self) -> Vec<Plane<'_>> {
            self.bufs
                .iter()
                .enumerate()
                .map(|(p, b)| Plane::new(b, self.info.stride(p)))
                .collect()
        }

        pub fn planes_mut(&mut self) -> Vec<PlaneMut<'_>> {
            let strides: Vec<usize> = (0..self.bufs.len()).map(|p| self.info.stride(p)).collect();
            self.bufs
                .iter_mut()
                .zip(strides)
                .map(|(b, s)| PlaneMut::new(b, s))
                .collect()
        }
    }

    /// Canonical 8-bit pixels flattened to bytes.
    pub fn ayuv(pixels: &[[u8; 4]]) -> Vec<u8> {
        pixels.iter().flatten().copied().collect()
    }

    /// Canonical 16-bit pixels flattened to native-endian bytes.
    pub fn ayuv64(pixels: &[[u16; 4]]) -> Vec<u8> {
        pixels
            .iter()
            .flatten()
            .flat_map(|v| v.to_ne_bytes())
            .collect()
    }

    pub fn words(bytes: &[u8]) -> Vec<u16> {
        bytes
            .chunks_exact(2)
            .map(|c| u16::from_ne_bytes([c[0], c[1]]))
            .collect()
    }
}
