//! Single-channel gray formats. Chroma unpacks to the neutral midpoint.

use pixpack_core::prelude::{ChromaSite, FormatInfo, Plane, PlaneMut};

use super::{get16, read16, set_pixel16, write16};
use crate::PackFlags;

pub(crate) fn unpack_gray8(
    _info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    for (d, &v) in dest[..width * 4].chunks_exact_mut(4).zip(s) {
        d.copy_from_slice(&[0xff, v, 0x80, 0x80]);
    }
}

pub(crate) fn pack_gray8(
    _info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    let d = planes[0].line_mut(y);
    for (v, s) in d.iter_mut().zip(src[..width * 4].chunks_exact(4)) {
        *v = s[1];
    }
}

pub(crate) fn unpack_gray16(
    info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let s = planes[0].line(y);
    let le = info.is_le();
    for i in 0..width {
        set_pixel16(dest, i, [0xffff, read16(s, i * 2, le), 0x8000, 0x8000]);
    }
}

pub(crate) fn pack_gray16(
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
    for i in 0..width {
        write16(d, i * 2, get16(src, i * 4 + 1), le);
    }
}

#[cfg(test)]
mod tests {
    use pixpack_core::prelude::VideoFormat;

    use crate::{
        FormatCodec,
        lines::testutil::{Planes, ayuv64, words},
    };

    use super::*;

    #[test]
    fn gray8_drops_chroma() {
        let codec = FormatCodec::for_format(VideoFormat::Gray8).unwrap();
        let mut planes = Planes::new(VideoFormat::Gray8, 2, 1);
        let src = [0x10, 0x20, 0x30, 0x40, 0x10, 0x60, 0x70, 0x80];
        codec.pack(PackFlags::empty(), &src, &mut planes.planes_mut(), ChromaSite::Unknown, 0, 2);
        assert_eq!(&planes.bufs[0][..2], &[0x20, 0x60]);
        let mut out = [0u8; 8];
        codec.unpack(PackFlags::empty(), &mut out, &planes.planes(), 0, 0, 2);
        assert_eq!(out, [0xff, 0x20, 0x80, 0x80, 0xff, 0x60, 0x80, 0x80]);
    }

    #[test]
    fn gray16_byte_order() {
        let src = ayuv64(&[[0xffff, 0x1234, 0x8000, 0x8000]]);
        for (format, bytes) in [(VideoFormat::Gray16Be, [0x12, 0x34]), (VideoFormat::Gray16Le, [0x34, 0x12])] {
            let codec = FormatCodec::for_format(format).unwrap();
            let mut planes = Planes::new(format, 1, 1);
            codec.pack(PackFlags::empty(), &src, &mut planes.planes_mut(), ChromaSite::Unknown, 0, 1);
            assert_eq!(&planes.bufs[0][..2], &bytes, "{format}");
            let mut out = vec![0u8; 8];
            codec.unpack(PackFlags::empty(), &mut out, &planes.planes(), 0, 0, 1);
            assert_eq!(words(&out), words(&src), "{format}");
        }
    }
}
