use smallvec::SmallVec;

use crate::{
    buffer::PlaneLayout,
    format::Resolution,
    registry::{FormatInfo, MAX_PLANES, VideoFormat},
};

const fn round_up(v: usize, n: usize) -> usize {
    (v + n - 1) & !(n - 1)
}

/// Plane strides and heights for a format at a given resolution.
///
/// Rows are aligned to 4 bytes (v210 uses its native 128-byte groups), so
/// every line satisfies the pack/unpack calling convention.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::{Resolution, VideoFormat, VideoInfo};
///
/// let info = VideoInfo::new(VideoFormat::I420, Resolution::new(5, 3).unwrap()).unwrap();
/// assert_eq!(info.stride(0), 8);
/// assert_eq!(info.stride(1), 4);
/// assert_eq!(info.plane_height(1), 2);
/// assert_eq!(info.size(), 8 * 3 + 2 * 4 * 2);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VideoInfo {
    format: VideoFormat,
    resolution: Resolution,
    n_planes: usize,
    strides: [usize; MAX_PLANES],
    heights: [usize; MAX_PLANES],
}

impl VideoInfo {
    /// Compute geometry; `None` for the sentinel formats.
    pub fn new(format: VideoFormat, resolution: Resolution) -> Option<Self> {
        let w = resolution.width();
        let h = resolution.height();
        let half_h = round_up(h, 2) / 2;
        let mut strides = [0usize; MAX_PLANES];
        let mut heights = [h, 0, 0, 0];

        match format {
            VideoFormat::Unknown | VideoFormat::Encoded => return None,
            VideoFormat::I420 | VideoFormat::Yv12 | VideoFormat::A420 => {
                strides[0] = round_up(w, 4);
                strides[1] = round_up(round_up(w, 2) / 2, 4);
                strides[2] = strides[1];
                heights[1] = half_h;
                heights[2] = half_h;
                if format == VideoFormat::A420 {
                    strides[3] = strides[0];
                    heights[3] = h;
                }
            }
            VideoFormat::Yuy2 | VideoFormat::Yvyu | VideoFormat::Uyvy => {
                strides[0] = round_up(round_up(w, 2) * 2, 4);
            }
            VideoFormat::Ayuv
            | VideoFormat::Rgbx
            | VideoFormat::Bgrx
            | VideoFormat::Xrgb
            | VideoFormat::Xbgr
            | VideoFormat::Rgba
            | VideoFormat::Bgra
            | VideoFormat::Argb
            | VideoFormat::Abgr
            | VideoFormat::R210 => strides[0] = w * 4,
            VideoFormat::Rgb16
            | VideoFormat::Bgr16
            | VideoFormat::Rgb15
            | VideoFormat::Bgr15
            | VideoFormat::Gray16Be
            | VideoFormat::Gray16Le => strides[0] = round_up(w * 2, 4),
            VideoFormat::Rgb | VideoFormat::Bgr | VideoFormat::V308 => {
                strides[0] = round_up(w * 3, 4)
            }
            VideoFormat::Y41b => {
                strides[0] = round_up(w, 4);
                strides[1] = round_up(w, 16) / 4;
                strides[2] = strides[1];
                heights[1] = h;
                heights[2] = h;
            }
            VideoFormat::Y42b => {
                strides[0] = round_up(w, 4);
                strides[1] = round_up(w, 8) / 2;
                strides[2] = strides[1];
                heights[1] = h;
                heights[2] = h;
            }
            VideoFormat::Y444 => {
                strides = [round_up(w, 4); MAX_PLANES];
                strides[3] = 0;
                heights[1] = h;
                heights[2] = h;
            }
            VideoFormat::V210 => strides[0] = w.div_ceil(48) * 128,
            VideoFormat::V216 => strides[0] = round_up(w * 4, 8),
            VideoFormat::Nv12 | VideoFormat::Nv21 => {
                strides[0] = round_up(w, 4);
                strides[1] = strides[0];
                heights[1] = half_h;
            }
            VideoFormat::Gray8 => strides[0] = round_up(w, 4),
            VideoFormat::Uyvp => strides[0] = round_up(round_up(w, 2) * 5 / 2, 4),
            VideoFormat::Rgb8p => {
                strides[0] = round_up(w, 4);
                strides[1] = 4;
                heights[1] = 256;
            }
            VideoFormat::Yuv9 | VideoFormat::Yvu9 => {
                strides[0] = round_up(w, 4);
                strides[1] = round_up(round_up(w, 4) / 4, 4);
                strides[2] = strides[1];
                heights[1] = round_up(h, 4) / 4;
                heights[2] = heights[1];
            }
            VideoFormat::Iyu1 => strides[0] = round_up(round_up(w, 4) + round_up(w, 4) / 2, 4),
            VideoFormat::Argb64 | VideoFormat::Ayuv64 => strides[0] = w * 8,
            VideoFormat::I42010be | VideoFormat::I42010le => {
                strides[0] = round_up(w * 2, 4);
                strides[1] = round_up(w, 4);
                strides[2] = strides[1];
                heights[1] = half_h;
                heights[2] = half_h;
            }
            VideoFormat::I42210be | VideoFormat::I42210le => {
                strides[0] = round_up(w * 2, 4);
                strides[1] = round_up(w, 4);
                strides[2] = strides[1];
                heights[1] = h;
                heights[2] = h;
            }
        }

        Some(Self {
            format,
            resolution,
            n_planes: format.info().n_planes,
            strides,
            heights,
        })
    }

    pub fn format(&self) -> VideoFormat {
        self.format
    }

    pub fn format_info(&self) -> &'static FormatInfo {
        self.format.info()
    }

    pub fn resolution(&self) -> Resolution {
        self.resolution
    }

    pub fn width(&self) -> usize {
        self.resolution.width()
    }

    pub fn height(&self) -> usize {
        self.resolution.height()
    }

    pub fn n_planes(&self) -> usize {
        self.n_planes
    }

    /// Row stride of `plane` in bytes.
    pub fn stride(&self, plane: usize) -> usize {
        self.strides[plane]
    }

    /// Number of rows stored in `plane`.
    pub fn plane_height(&self, plane: usize) -> usize {
        self.heights[plane]
    }

    /// Bytes occupied by `plane`.
    pub fn plane_size(&self, plane: usize) -> usize {
        self.strides[plane] * self.heights[plane]
    }

    /// Total bytes across all planes.
    pub fn size(&self) -> usize {
        (0..self.n_planes).map(|p| self.plane_size(p)).sum()
    }

    /// One layout per plane, each starting at offset zero of its own buffer.
    pub fn layouts(&self) -> SmallVec<[PlaneLayout; MAX_PLANES]> {
        (0..self.n_planes)
            .map(|p| PlaneLayout {
                offset: 0,
                len: self.plane_size(p),
                stride: self.strides[p],
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn info(format: VideoFormat, w: u32, h: u32) -> VideoInfo {
        VideoInfo::new(format, Resolution::new(w, h).unwrap()).unwrap()
    }

    #[test]
    fn sentinels_have_no_geometry() {
        let res = Resolution::new(2, 2).unwrap();
        assert!(VideoInfo::new(VideoFormat::Unknown, res).is_none());
        assert!(VideoInfo::new(VideoFormat::Encoded, res).is_none());
    }

    #[test]
    fn every_pixel_format_has_positive_planes() {
        for fmt in crate::registry::all_formats().iter().skip(2) {
            for (w, h) in [(1, 1), (7, 5), (64, 48)] {
                let vi = info(fmt.format, w, h);
                assert_eq!(vi.layouts().len(), fmt.n_planes, "{}", fmt.name);
                for p in 0..vi.n_planes() {
                    assert!(vi.plane_size(p) > 0, "{} plane {p} at {w}x{h}", fmt.name);
                }
            }
        }
    }

    #[test]
    fn subsampled_strides() {
        let yuv9 = info(VideoFormat::Yuv9, 10, 9);
        assert_eq!(yuv9.stride(0), 12);
        assert_eq!(yuv9.stride(1), 4);
        assert_eq!(yuv9.plane_height(1), 3);

        let nv12 = info(VideoFormat::Nv12, 6, 3);
        assert_eq!(nv12.stride(1), 8);
        assert_eq!(nv12.plane_height(1), 2);

        let v210 = info(VideoFormat::V210, 49, 1);
        assert_eq!(v210.stride(0), 256);

        let rgb8p = info(VideoFormat::Rgb8p, 3, 3);
        assert_eq!(rgb8p.plane_size(1), 1024);
    }
}
