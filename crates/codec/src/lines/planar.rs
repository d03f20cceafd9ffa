//! 8-bit planar and semi-planar YUV: I420, YV12, Y41B, Y42B, Y444, NV12,
//! NV21, A420, YUV9 and YVU9.
//!
//! Chroma sample `i >> w_sub` of component `c` sits at
//! `(i >> w_sub) * pixel_stride[c]` on line `y >> h_sub[c]`, which covers
//! the interleaved NV12/NV21 chroma plane as well.

use pixpack_core::prelude::{ChromaSite, FormatInfo, Plane, PlaneMut, COMP_A, COMP_U, COMP_V, COMP_Y};

use super::{avg2, comp_line, comp_line_mut, quad_average};
use crate::PackFlags;

pub(crate) fn unpack_planar(
    info: &FormatInfo,
    _flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    _x: usize,
    y: usize,
    width: usize,
) {
    let sy = comp_line(info, planes, COMP_Y, y);
    let su = comp_line(info, planes, COMP_U, y >> info.h_sub[COMP_U]);
    let sv = comp_line(info, planes, COMP_V, y >> info.h_sub[COMP_V]);
    let sa = info
        .has_alpha()
        .then(|| comp_line(info, planes, COMP_A, y >> info.h_sub[COMP_A]));
    let (wu, pu) = (info.w_sub[COMP_U], info.pixel_stride[COMP_U]);
    let (wv, pv) = (info.w_sub[COMP_V], info.pixel_stride[COMP_V]);

    for (i, d) in dest[..width * 4].chunks_exact_mut(4).enumerate() {
        d[0] = sa.map_or(0xff, |a| a[i]);
        d[1] = sy[i];
        d[2] = su[(i >> wu) * pu];
        d[3] = sv[(i >> wv) * pv];
    }
}

fn pack_luma(info: &FormatInfo, src: &[u8], planes: &mut [PlaneMut<'_>], y: usize, width: usize) {
    let dy = comp_line_mut(info, planes, COMP_Y, y);
    for (i, s) in src[..width * 4].chunks_exact(4).enumerate() {
        dy[i] = s[1];
    }
    if info.has_alpha() {
        let da = comp_line_mut(info, planes, COMP_A, y >> info.h_sub[COMP_A]);
        for (i, s) in src[..width * 4].chunks_exact(4).enumerate() {
            da[i] = s[0];
        }
    }
}

/// Pack for layouts with at most 2:1 horizontal chroma subsampling.
///
/// Horizontally subsampled chroma is the rounded mean of each pixel pair;
/// an odd trailing pixel is stored as is. Chroma is written on every line,
/// so for 4:2:0 the odd line of each pair determines the stored value.
pub(crate) fn pack_planar(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    pack_luma(info, src, planes, y, width);

    for comp in [COMP_U, COMP_V] {
        let ps = info.pixel_stride[comp];
        let byte = 1 + comp;
        let line = comp_line_mut(info, planes, comp, y >> info.h_sub[comp]);
        if info.w_sub[comp] == 0 {
            for (i, s) in src[..width * 4].chunks_exact(4).enumerate() {
                line[i * ps] = s[byte];
            }
        } else {
            for (j, pair) in src[..width * 4].chunks(8).enumerate() {
                line[j * ps] = match pair.len() {
                    8 => avg2(pair[byte], pair[4 + byte]),
                    _ => pair[byte],
                };
            }
        }
    }
}

/// Pack for 4:1:1 (Y41B) and 4:1:0 (YUV9, YVU9).
///
/// Each chroma sample is the mean of up to four horizontal pixels. Y41B
/// rounds; the 4:1:0 layouts truncate and only store chroma on lines that
/// are a multiple of four.
pub(crate) fn pack_quad(
    info: &FormatInfo,
    _flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    _chroma_site: ChromaSite,
    y: usize,
    width: usize,
) {
    pack_luma(info, src, planes, y, width);

    let v_sub = info.h_sub[COMP_U];
    if y % (1 << v_sub) != 0 {
        return;
    }
    let rounded = v_sub == 0;
    for comp in [COMP_U, COMP_V] {
        let byte = 1 + comp;
        let line = comp_line_mut(info, planes, comp, y >> info.h_sub[comp]);
        for (j, quad) in src[..width * 4].chunks(16).enumerate() {
            let sum: u32 = quad.chunks_exact(4).map(|p| p[byte] as u32).sum();
            line[j] = quad_average(sum, quad.len() / 4, rounded);
        }
    }
}

#[cfg(test)]
mod tests {
    use pixpack_core::prelude::VideoFormat;

    use crate::{
        FormatCodec,
        lines::testutil::{Planes, ayuv},
    };

    use super::*;

    fn unpack_rows(codec: &FormatCodec, planes: &Planes, width: usize, height: usize) -> Vec<u8> {
        let view = planes.planes();
        let mut out = vec![0u8; width * height * 4];
        for (y, row) in out.chunks_exact_mut(width * 4).enumerate() {
            codec.unpack(PackFlags::empty(), row, &view, 0, y, width);
        }
        out
    }

    fn pack_rows(codec: &FormatCodec, planes: &mut Planes, src: &[u8], width: usize) {
        let mut view = planes.planes_mut();
        for (y, row) in src.chunks_exact(width * 4).enumerate() {
            codec.pack(PackFlags::empty(), row, &mut view, ChromaSite::Unknown, y, width);
        }
    }

    #[test]
    fn i420_four_by_two() {
        let codec = FormatCodec::for_format(VideoFormat::I420).unwrap();
        let mut planes = Planes::new(VideoFormat::I420, 4, 2);
        planes.bufs[0][..4].copy_from_slice(&[10, 20, 30, 40]);
        planes.bufs[0][4..8].copy_from_slice(&[50, 60, 70, 80]);
        planes.bufs[1][..2].copy_from_slice(&[100, 110]);
        planes.bufs[2][..2].copy_from_slice(&[200, 210]);

        let out = unpack_rows(&codec, &planes, 4, 2);
        assert_eq!(
            &out[..16],
            &ayuv(&[
                [255, 10, 100, 200],
                [255, 20, 100, 200],
                [255, 30, 110, 210],
                [255, 40, 110, 210],
            ])[..]
        );
        assert_eq!(&out[16..20], &[255, 50, 100, 200]);

        let mut repacked = Planes::new(VideoFormat::I420, 4, 2);
        pack_rows(&codec, &mut repacked, &out, 4);
        assert_eq!(repacked.bufs, planes.bufs);
    }

    #[test]
    fn subsampled_round_trip_with_flat_chroma_blocks() {
        for format in [
            VideoFormat::I420,
            VideoFormat::Yv12,
            VideoFormat::Y42b,
            VideoFormat::Y41b,
            VideoFormat::Yuv9,
            VideoFormat::Yvu9,
            VideoFormat::Nv12,
            VideoFormat::Nv21,
        ] {
            let codec = FormatCodec::for_format(format).unwrap();
            let (width, height) = (9usize, 5usize);
            let mut pixels = Vec::new();
            for y in 0..height {
                for x in 0..width {
                    // constant over any 4x4 block
                    let block = (x / 4 + 3 * (y / 4)) as u8;
                    pixels.push([255, (x * 7 + y * 13) as u8, 16 + block, 200 - block]);
                }
            }
            let src = ayuv(&pixels);
            let mut planes = Planes::new(format, width as u32, height as u32);
            pack_rows(&codec, &mut planes, &src, width);
            assert_eq!(unpack_rows(&codec, &planes, width, height), src, "{format}");
        }
    }

    #[test]
    fn y444_and_a420_are_lossless_where_unsampled() {
        let codec = FormatCodec::for_format(VideoFormat::Y444).unwrap();
        let src: Vec<u8> = (0..3 * 2 * 4)
            .map(|i| if i % 4 == 0 { 255 } else { (i * 11) as u8 })
            .collect();
        let mut planes = Planes::new(VideoFormat::Y444, 3, 2);
        pack_rows(&codec, &mut planes, &src, 3);
        assert_eq!(unpack_rows(&codec, &planes, 3, 2), src);

        let codec = FormatCodec::for_format(VideoFormat::A420).unwrap();
        let src = ayuv(&[[7, 1, 50, 60], [9, 2, 50, 60]]);
        let mut planes = Planes::new(VideoFormat::A420, 2, 1);
        pack_rows(&codec, &mut planes, &src, 2);
        assert_eq!(&planes.bufs[3][..2], &[7, 9]);
        assert_eq!(unpack_rows(&codec, &planes, 2, 1), src);
    }

    #[test]
    fn pair_average_rounds_and_odd_tail_is_copied() {
        let codec = FormatCodec::for_format(VideoFormat::Y42b).unwrap();
        let src = ayuv(&[[255, 0, 10, 20], [255, 0, 11, 21], [255, 0, 99, 98]]);
        let mut planes = Planes::new(VideoFormat::Y42b, 3, 1);
        pack_rows(&codec, &mut planes, &src, 3);
        assert_eq!(&planes.bufs[1][..2], &[11, 99]);
        assert_eq!(&planes.bufs[2][..2], &[21, 98]);
    }

    #[test]
    fn y41b_tails() {
        let codec = FormatCodec::for_format(VideoFormat::Y41b).unwrap();
        let row = |us: &[u8]| ayuv(&us.iter().map(|&u| [255, u, u, u]).collect::<Vec<_>>());
        for (us, expected) in [
            (&[1u8, 2, 2, 2, 5][..], [2u8, 5]),
            (&[0, 0, 0, 0, 1, 2, 2][..], [0, 2]),
            (&[0, 0, 0, 0, 1, 2][..], [0, 2]),
        ] {
            let mut planes = Planes::new(VideoFormat::Y41b, us.len() as u32, 1);
            pack_rows(&codec, &mut planes, &row(us), us.len());
            assert_eq!(&planes.bufs[1][..2], &expected);
            assert_eq!(&planes.bufs[0][..us.len()], us);
        }
    }

    #[test]
    fn yuv9_chroma_only_on_every_fourth_line() {
        let codec = FormatCodec::for_format(VideoFormat::Yuv9).unwrap();
        let mut planes = Planes::new(VideoFormat::Yuv9, 5, 8);
        let mut view = planes.planes_mut();
        let line = |u: u8| ayuv(&[[255, 1, u, u]; 5]);
        for y in 0..8 {
            let u = if y % 4 == 0 { 40 } else { 90 };
            codec.pack(PackFlags::empty(), &line(u), &mut view, ChromaSite::Unknown, y, 5);
        }
        drop(view);
        assert_eq!(&planes.bufs[1][..2], &[40, 40]);
        assert_eq!(&planes.bufs[1][4..6], &[40, 40]);
    }

    #[test]
    fn yuv9_truncates_quad_means() {
        let codec = FormatCodec::for_format(VideoFormat::Yuv9).unwrap();
        let mut planes = Planes::new(VideoFormat::Yuv9, 4, 1);
        let src = ayuv(&[[255, 0, 1, 0], [255, 0, 2, 0], [255, 0, 2, 0], [255, 0, 2, 0]]);
        pack_rows(&codec, &mut planes, &src, 4);
        assert_eq!(planes.bufs[1][0], 1);
    }
}
