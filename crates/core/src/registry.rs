//! Static pixel-format registry.
//!
//! Every supported raw layout has one immutable [`FormatInfo`] entry in a
//! static table indexed by [`VideoFormat`]. Lookups never allocate and need
//! no synchronization.

use std::fmt;

use bitflags::bitflags;

use crate::format::{Endianness, FourCc};

/// Index of the luma (or red) component.
pub const COMP_Y: usize = 0;
/// Index of the first chroma (or green) component.
pub const COMP_U: usize = 1;
/// Index of the second chroma (or blue) component.
pub const COMP_V: usize = 2;
/// Index of the alpha component.
pub const COMP_A: usize = 3;
/// Red is stored where luma would be.
pub const COMP_R: usize = 0;
/// Green is stored where the first chroma would be.
pub const COMP_G: usize = 1;
/// Blue is stored where the second chroma would be.
pub const COMP_B: usize = 2;

/// Upper bound on planes and components per format.
pub const MAX_PLANES: usize = 4;

/// Supported raw pixel formats, in registry order.
///
/// `Unknown` and `Encoded` are sentinels without pixel geometry.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::VideoFormat;
///
/// let nv12 = VideoFormat::from_string("NV12");
/// assert_eq!(nv12, VideoFormat::Nv12);
/// assert_eq!(nv12.info().n_planes, 2);
/// assert_eq!(VideoFormat::from_string("nv12"), VideoFormat::Unknown);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
#[repr(u32)]
pub enum VideoFormat {
    #[default]
    Unknown = 0,
    Encoded,
    I420,
    Yv12,
    Yuy2,
    Uyvy,
    Ayuv,
    Rgbx,
    Bgrx,
    Xrgb,
    Xbgr,
    Rgba,
    Bgra,
    Argb,
    Abgr,
    Rgb,
    Bgr,
    Y41b,
    Y42b,
    Yvyu,
    Y444,
    V210,
    V216,
    Nv12,
    Nv21,
    Gray8,
    Gray16Be,
    Gray16Le,
    V308,
    Rgb16,
    Bgr16,
    Rgb15,
    Bgr15,
    Uyvp,
    A420,
    Rgb8p,
    Yuv9,
    Yvu9,
    Iyu1,
    Argb64,
    Ayuv64,
    R210,
    I42010be,
    I42010le,
    I42210be,
    I42210le,
}

bitflags! {
    /// Family and storage properties of a format.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    pub struct FormatFlags: u32 {
        /// Components are luma and two chroma differences.
        const YUV = 1 << 0;
        /// Components are red, green and blue.
        const RGB = 1 << 1;
        /// Single luma component.
        const GRAY = 1 << 2;
        /// Carries a real alpha component.
        const ALPHA = 1 << 3;
        /// Multi-byte words are stored little-endian.
        const LE = 1 << 4;
        /// Components are bit-packed and cannot be described by shift/depth alone.
        const COMPLEX = 1 << 5;
        /// Pixels are indices into a palette plane.
        const PALETTE = 1 << 6;
        /// The format is itself one of the canonical unpack formats.
        const UNPACK = 1 << 7;
    }
}

/// Immutable geometry of one pixel format.
///
/// Component `i` lives in plane `plane[i]`, starts `offset[i]` bytes into
/// each pixel and advances `pixel_stride[i]` bytes per horizontally adjacent
/// sample. Subsampled components use `w_sub`/`h_sub` as right-shift amounts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FormatInfo {
    pub format: VideoFormat,
    /// Canonical name; stable across releases.
    pub name: &'static str,
    pub description: &'static str,
    pub fourcc: Option<FourCc>,
    pub flags: FormatFlags,
    /// Nominal bit depth used for container sizing.
    pub bits: u32,
    pub n_components: usize,
    pub shift: [u32; MAX_PLANES],
    pub depth: [u32; MAX_PLANES],
    pub pixel_stride: [usize; MAX_PLANES],
    pub n_planes: usize,
    pub plane: [usize; MAX_PLANES],
    pub offset: [usize; MAX_PLANES],
    pub w_sub: [u32; MAX_PLANES],
    pub h_sub: [u32; MAX_PLANES],
    /// Canonical format this one unpacks into.
    pub unpack_format: VideoFormat,
    /// Source lines consumed per unpack call.
    pub n_unpack_lines: usize,
    /// Destination lines produced per pack call.
    pub pack_lines: usize,
}

impl FormatInfo {
    pub fn is_yuv(&self) -> bool {
        self.flags.contains(FormatFlags::YUV)
    }

    pub fn is_rgb(&self) -> bool {
        self.flags.contains(FormatFlags::RGB)
    }

    pub fn is_gray(&self) -> bool {
        self.flags.contains(FormatFlags::GRAY)
    }

    pub fn has_alpha(&self) -> bool {
        self.flags.contains(FormatFlags::ALPHA)
    }

    pub fn is_le(&self) -> bool {
        self.flags.contains(FormatFlags::LE)
    }

    pub fn is_complex(&self) -> bool {
        self.flags.contains(FormatFlags::COMPLEX)
    }

    pub fn has_palette(&self) -> bool {
        self.flags.contains(FormatFlags::PALETTE)
    }

    /// Width of component `comp` for a frame `width` pixels wide, rounding up.
    ///
    /// # Example
    /// ```rust
    /// use pixpack_core::prelude::VideoFormat;
    ///
    /// let info = VideoFormat::Yuv9.info();
    /// assert_eq!(info.scale_width(1, 7), 2);
    /// assert_eq!(info.scale_width(0, 7), 7);
    /// ```
    pub fn scale_width(&self, comp: usize, width: usize) -> usize {
        scale_ceil(width, self.w_sub[comp])
    }

    /// Height of component `comp` for a frame `height` lines tall, rounding up.
    pub fn scale_height(&self, comp: usize, height: usize) -> usize {
        scale_ceil(height, self.h_sub[comp])
    }

    /// Bytes per pixel of the canonical format this one unpacks into.
    pub fn unpack_pixel_bytes(&self) -> usize {
        if self.unpack_format.info().bits > 8 {
            8
        } else {
            4
        }
    }
}

fn scale_ceil(len: usize, sub: u32) -> usize {
    (len + (1 << sub) - 1) >> sub
}

impl VideoFormat {
    /// Registry entry for this format.
    pub fn info(self) -> &'static FormatInfo {
        &FORMATS[self as usize]
    }

    /// Format at registry position `index`, `None` when outside the table.
    ///
    /// # Example
    /// ```rust
    /// use pixpack_core::prelude::VideoFormat;
    ///
    /// assert_eq!(VideoFormat::from_index(2), Some(VideoFormat::I420));
    /// assert_eq!(VideoFormat::from_index(4096), None);
    /// ```
    pub fn from_index(index: u32) -> Option<Self> {
        format_info_by_index(index).map(|info| info.format)
    }

    /// Canonical name, e.g. `"I420_10LE"`.
    pub fn name(self) -> &'static str {
        self.info().name
    }

    /// Exact, case-sensitive name lookup. Unknown names give [`VideoFormat::Unknown`].
    pub fn from_string(name: &str) -> Self {
        FORMATS
            .iter()
            .find(|info| info.name == name)
            .map(|info| info.format)
            .unwrap_or(VideoFormat::Unknown)
    }

    /// Map a legacy FOURCC to a format.
    ///
    /// Only a subset of formats are reachable this way; RGB and most
    /// bit-packed layouts have no FOURCC and must be looked up by name.
    ///
    /// # Example
    /// ```rust
    /// use pixpack_core::prelude::{FourCc, VideoFormat};
    ///
    /// assert_eq!(VideoFormat::from_fourcc(FourCc::new(*b"GREY")), VideoFormat::Gray8);
    /// assert_eq!(VideoFormat::from_fourcc(FourCc::new(*b"RGBA")), VideoFormat::Unknown);
    /// ```
    pub fn from_fourcc(fourcc: FourCc) -> Self {
        match &fourcc.bytes() {
            b"I420" => VideoFormat::I420,
            b"YV12" => VideoFormat::Yv12,
            b"YUY2" => VideoFormat::Yuy2,
            b"YVYU" => VideoFormat::Yvyu,
            b"UYVY" => VideoFormat::Uyvy,
            b"AYUV" => VideoFormat::Ayuv,
            b"Y41B" => VideoFormat::Y41b,
            b"Y42B" => VideoFormat::Y42b,
            b"Y444" => VideoFormat::Y444,
            b"v210" => VideoFormat::V210,
            b"v216" => VideoFormat::V216,
            b"NV12" => VideoFormat::Nv12,
            b"NV21" => VideoFormat::Nv21,
            b"v308" => VideoFormat::V308,
            b"Y800" | b"Y8  " | b"GREY" => VideoFormat::Gray8,
            b"Y16 " => VideoFormat::Gray16Le,
            b"UYVP" => VideoFormat::Uyvp,
            b"A420" => VideoFormat::A420,
            b"YUV9" => VideoFormat::Yuv9,
            b"YVU9" => VideoFormat::Yvu9,
            b"IYU1" => VideoFormat::Iyu1,
            b"AY64" => VideoFormat::Ayuv64,
            _ => VideoFormat::Unknown,
        }
    }

    /// FOURCC registered for this format, if any.
    pub fn to_fourcc(self) -> Option<FourCc> {
        self.info().fourcc
    }

    /// Infer an RGB layout from channel masks.
    ///
    /// Masks for 24 and 32 bpp describe a big-endian pixel; little-endian
    /// masks are byte-swapped first, and 24 bpp masks are then shifted down
    /// by one byte. 15/16 bpp masks only match in the host byte order.
    ///
    /// # Example
    /// ```rust
    /// use pixpack_core::prelude::{Endianness, VideoFormat};
    ///
    /// let fmt = VideoFormat::from_masks(16, 16, Endianness::native(), 0xf800, 0x07e0, 0x001f, 0);
    /// assert_eq!(fmt, VideoFormat::Rgb16);
    ///
    /// let fmt = VideoFormat::from_masks(24, 32, Endianness::Little, 0xff, 0xff00, 0xff0000, 0);
    /// assert_eq!(fmt, VideoFormat::Rgbx);
    /// ```
    #[allow(clippy::too_many_arguments)]
    pub fn from_masks(
        depth: u32,
        bpp: u32,
        endianness: Endianness,
        red_mask: u32,
        green_mask: u32,
        blue_mask: u32,
        alpha_mask: u32,
    ) -> Self {
        let (mut r, mut g, mut b) = (red_mask, green_mask, blue_mask);
        let mut endianness = endianness;
        if (bpp == 24 || bpp == 32) && endianness == Endianness::Little {
            r = r.swap_bytes();
            g = g.swap_bytes();
            b = b.swap_bytes();
            endianness = Endianness::Big;
            if bpp == 24 {
                r >>= 8;
                g >>= 8;
                b >>= 8;
            }
        }

        match (depth, bpp) {
            (30, 32) => VideoFormat::R210,
            (24, 32) => from_rgb32_masks(r, g, b),
            (32, 32) if alpha_mask != 0 => from_rgba32_masks(r, g, b, alpha_mask),
            (24, 24) => from_rgb24_masks(r, g, b),
            (15 | 16, 16) if endianness == Endianness::native() => from_rgb16_masks(r, g, b),
            (8, 8) => VideoFormat::Rgb8p,
            (64, 64) => match from_rgba32_masks(r, g, b, alpha_mask) {
                VideoFormat::Argb => VideoFormat::Argb64,
                _ => VideoFormat::Unknown,
            },
            _ => VideoFormat::Unknown,
        }
    }
}

impl fmt::Display for VideoFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

fn from_rgb32_masks(r: u32, g: u32, b: u32) -> VideoFormat {
    match (r, g, b) {
        (0xff00_0000, 0x00ff_0000, 0x0000_ff00) => VideoFormat::Rgbx,
        (0x0000_ff00, 0x00ff_0000, 0xff00_0000) => VideoFormat::Bgrx,
        (0x00ff_0000, 0x0000_ff00, 0x0000_00ff) => VideoFormat::Xrgb,
        (0x0000_00ff, 0x0000_ff00, 0x00ff_0000) => VideoFormat::Xbgr,
        _ => VideoFormat::Unknown,
    }
}

fn from_rgba32_masks(r: u32, g: u32, b: u32, a: u32) -> VideoFormat {
    match (r, g, b, a) {
        (0xff00_0000, 0x00ff_0000, 0x0000_ff00, 0x0000_00ff) => VideoFormat::Rgba,
        (0x0000_ff00, 0x00ff_0000, 0xff00_0000, 0x0000_00ff) => VideoFormat::Bgra,
        (0x00ff_0000, 0x0000_ff00, 0x0000_00ff, 0xff00_0000) => VideoFormat::Argb,
        (0x0000_00ff, 0x0000_ff00, 0x00ff_0000, 0xff00_0000) => VideoFormat::Abgr,
        _ => VideoFormat::Unknown,
    }
}

fn from_rgb24_masks(r: u32, g: u32, b: u32) -> VideoFormat {
    match (r, g, b) {
        (0xff_0000, 0x00_ff00, 0x00_00ff) => VideoFormat::Rgb,
        (0x00_00ff, 0x00_ff00, 0xff_0000) => VideoFormat::Bgr,
        _ => VideoFormat::Unknown,
    }
}

fn from_rgb16_masks(r: u32, g: u32, b: u32) -> VideoFormat {
    match (r, g, b) {
        (0xf800, 0x07e0, 0x001f) => VideoFormat::Rgb16,
        (0x001f, 0x07e0, 0xf800) => VideoFormat::Bgr16,
        (0x7c00, 0x03e0, 0x001f) => VideoFormat::Rgb15,
        (0x001f, 0x03e0, 0x7c00) => VideoFormat::Bgr15,
        _ => VideoFormat::Unknown,
    }
}

/// Registry entry for `format`.
pub fn format_info(format: VideoFormat) -> &'static FormatInfo {
    format.info()
}

/// Registry entry at `index`, `None` outside `[0, len)`.
pub fn format_info_by_index(index: u32) -> Option<&'static FormatInfo> {
    FORMATS.get(usize::try_from(index).ok()?)
}

/// All registry entries in index order, sentinels included.
pub fn all_formats() -> &'static [FormatInfo] {
    &FORMATS
}

struct Depth {
    bits: u32,
    n_components: usize,
    shift: [u32; 4],
    depth: [u32; 4],
}

const DPTH0: Depth = Depth { bits: 0, n_components: 0, shift: [0; 4], depth: [0; 4] };
const DPTH8: Depth = Depth { bits: 8, n_components: 1, shift: [0; 4], depth: [8, 0, 0, 0] };
const DPTH8_32: Depth = Depth { bits: 8, n_components: 2, shift: [0; 4], depth: [8, 32, 0, 0] };
const DPTH888: Depth = Depth { bits: 8, n_components: 3, shift: [0; 4], depth: [8, 8, 8, 0] };
const DPTH8888: Depth = Depth { bits: 8, n_components: 4, shift: [0; 4], depth: [8, 8, 8, 8] };
const DPTH10_10_10: Depth = Depth { bits: 10, n_components: 3, shift: [0; 4], depth: [10, 10, 10, 0] };
const DPTH16: Depth = Depth { bits: 16, n_components: 1, shift: [0; 4], depth: [16, 0, 0, 0] };
const DPTH16_16_16: Depth = Depth { bits: 16, n_components: 3, shift: [0; 4], depth: [16, 16, 16, 0] };
const DPTH16_16_16_16: Depth = Depth { bits: 16, n_components: 4, shift: [0; 4], depth: [16, 16, 16, 16] };
const DPTH565: Depth = Depth { bits: 16, n_components: 3, shift: [11, 5, 0, 0], depth: [5, 6, 5, 0] };
const DPTH565_BGR: Depth = Depth { bits: 16, n_components: 3, shift: [0, 5, 11, 0], depth: [5, 6, 5, 0] };
const DPTH555: Depth = Depth { bits: 16, n_components: 3, shift: [10, 5, 0, 0], depth: [5, 5, 5, 0] };
const DPTH555_BGR: Depth = Depth { bits: 16, n_components: 3, shift: [0, 5, 10, 0], depth: [5, 5, 5, 0] };

const PSTR0: [usize; 4] = [0, 0, 0, 0];
const PSTR1: [usize; 4] = [1, 0, 0, 0];
const PSTR14: [usize; 4] = [1, 4, 0, 0];
const PSTR111: [usize; 4] = [1, 1, 1, 0];
const PSTR1111: [usize; 4] = [1, 1, 1, 1];
const PSTR122: [usize; 4] = [1, 2, 2, 0];
const PSTR2: [usize; 4] = [2, 0, 0, 0];
const PSTR222: [usize; 4] = [2, 2, 2, 0];
const PSTR244: [usize; 4] = [2, 4, 4, 0];
const PSTR444: [usize; 4] = [4, 4, 4, 0];
const PSTR4444: [usize; 4] = [4, 4, 4, 4];
const PSTR333: [usize; 4] = [3, 3, 3, 0];
const PSTR488: [usize; 4] = [4, 8, 8, 0];
const PSTR8888: [usize; 4] = [8, 8, 8, 8];

struct Planes(usize, [usize; 4]);

const PLANE_NA: Planes = Planes(0, [0, 0, 0, 0]);
const PLANE0: Planes = Planes(1, [0, 0, 0, 0]);
const PLANE01: Planes = Planes(2, [0, 1, 0, 0]);
const PLANE011: Planes = Planes(2, [0, 1, 1, 0]);
const PLANE012: Planes = Planes(3, [0, 1, 2, 0]);
const PLANE0123: Planes = Planes(4, [0, 1, 2, 3]);
const PLANE021: Planes = Planes(3, [0, 2, 1, 0]);

const OFFS0: [usize; 4] = [0, 0, 0, 0];
const OFFS013: [usize; 4] = [0, 1, 3, 0];
const OFFS102: [usize; 4] = [1, 0, 2, 0];
const OFFS1230: [usize; 4] = [1, 2, 3, 0];
const OFFS012: [usize; 4] = [0, 1, 2, 0];
const OFFS210: [usize; 4] = [2, 1, 0, 0];
const OFFS123: [usize; 4] = [1, 2, 3, 0];
const OFFS321: [usize; 4] = [3, 2, 1, 0];
const OFFS0123: [usize; 4] = [0, 1, 2, 3];
const OFFS2103: [usize; 4] = [2, 1, 0, 3];
const OFFS3210: [usize; 4] = [3, 2, 1, 0];
const OFFS031: [usize; 4] = [0, 3, 1, 0];
const OFFS204: [usize; 4] = [2, 0, 4, 0];
const OFFS001: [usize; 4] = [0, 0, 1, 0];
const OFFS010: [usize; 4] = [0, 1, 0, 0];
const OFFS104: [usize; 4] = [1, 0, 4, 0];
const OFFS2460: [usize; 4] = [2, 4, 6, 0];

struct Sub([u32; 4], [u32; 4]);

const SUB410: Sub = Sub([0, 2, 2, 0], [0, 2, 2, 0]);
const SUB411: Sub = Sub([0, 2, 2, 0], [0, 0, 0, 0]);
const SUB420: Sub = Sub([0, 1, 1, 0], [0, 1, 1, 0]);
const SUB422: Sub = Sub([0, 1, 1, 0], [0, 0, 0, 0]);
const SUB444: Sub = Sub([0; 4], [0; 4]);
const SUB4204: Sub = Sub([0, 1, 1, 0], [0, 1, 1, 0]);

const NATIVE_LE: FormatFlags = if cfg!(target_endian = "little") {
    FormatFlags::LE
} else {
    FormatFlags::empty()
};

const F_YUV: FormatFlags = FormatFlags::YUV;
const F_YUV_LE: FormatFlags = FormatFlags::YUV.union(FormatFlags::LE);
const F_YUVA: FormatFlags = FormatFlags::YUV.union(FormatFlags::ALPHA);
const F_YUVA_UNPACK: FormatFlags = F_YUVA.union(FormatFlags::UNPACK);
const F_YUV_C: FormatFlags = FormatFlags::YUV.union(FormatFlags::COMPLEX);
const F_RGB: FormatFlags = FormatFlags::RGB;
const F_RGBA: FormatFlags = FormatFlags::RGB.union(FormatFlags::ALPHA);
const F_RGBA_UNPACK: FormatFlags = F_RGBA.union(FormatFlags::UNPACK);
const F_RGBAP: FormatFlags = F_RGBA.union(FormatFlags::PALETTE);
const F_GRAY: FormatFlags = FormatFlags::GRAY;
const F_GRAY_LE: FormatFlags = FormatFlags::GRAY.union(FormatFlags::LE);

#[allow(clippy::too_many_arguments)]
const fn entry(
    format: VideoFormat,
    name: &'static str,
    description: &'static str,
    fourcc: Option<[u8; 4]>,
    flags: FormatFlags,
    depth: Depth,
    pixel_stride: [usize; 4],
    planes: Planes,
    offset: [usize; 4],
    sub: Sub,
    unpack_format: VideoFormat,
) -> FormatInfo {
    FormatInfo {
        format,
        name,
        description,
        fourcc: match fourcc {
            Some(bytes) => Some(FourCc::new(bytes)),
            None => None,
        },
        flags,
        bits: depth.bits,
        n_components: depth.n_components,
        shift: depth.shift,
        depth: depth.depth,
        pixel_stride,
        n_planes: planes.0,
        plane: planes.1,
        offset,
        w_sub: sub.0,
        h_sub: sub.1,
        unpack_format,
        n_unpack_lines: 1,
        pack_lines: 1,
    }
}

const RAW: &str = "raw video";

use VideoFormat as F;

#[rustfmt::skip]
static FORMATS: [FormatInfo; 46] = [
    entry(F::Unknown, "UNKNOWN", "unknown video", None, FormatFlags::empty(), DPTH0, PSTR0, PLANE_NA, OFFS0, SUB444, F::Unknown),
    entry(F::Encoded, "ENCODED", "encoded video", None, FormatFlags::COMPLEX, DPTH0, PSTR0, PLANE_NA, OFFS0, SUB444, F::Unknown),
    entry(F::I420, "I420", RAW, Some(*b"I420"), F_YUV, DPTH888, PSTR111, PLANE012, OFFS0, SUB420, F::Ayuv),
    entry(F::Yv12, "YV12", RAW, Some(*b"YV12"), F_YUV, DPTH888, PSTR111, PLANE021, OFFS0, SUB420, F::Ayuv),
    entry(F::Yuy2, "YUY2", RAW, Some(*b"YUY2"), F_YUV, DPTH888, PSTR244, PLANE0, OFFS013, SUB422, F::Ayuv),
    entry(F::Uyvy, "UYVY", RAW, Some(*b"UYVY"), F_YUV, DPTH888, PSTR244, PLANE0, OFFS102, SUB422, F::Ayuv),
    entry(F::Ayuv, "AYUV", RAW, Some(*b"AYUV"), F_YUVA_UNPACK, DPTH8888, PSTR4444, PLANE0, OFFS1230, SUB444, F::Ayuv),
    entry(F::Rgbx, "RGBx", RAW, None, F_RGB, DPTH888, PSTR444, PLANE0, OFFS012, SUB444, F::Argb),
    entry(F::Bgrx, "BGRx", RAW, None, F_RGB, DPTH888, PSTR444, PLANE0, OFFS210, SUB444, F::Argb),
    entry(F::Xrgb, "xRGB", RAW, None, F_RGB, DPTH888, PSTR444, PLANE0, OFFS123, SUB444, F::Argb),
    entry(F::Xbgr, "xBGR", RAW, None, F_RGB, DPTH888, PSTR444, PLANE0, OFFS321, SUB444, F::Argb),
    entry(F::Rgba, "RGBA", RAW, None, F_RGBA, DPTH8888, PSTR4444, PLANE0, OFFS0123, SUB444, F::Argb),
    entry(F::Bgra, "BGRA", RAW, None, F_RGBA, DPTH8888, PSTR4444, PLANE0, OFFS2103, SUB444, F::Argb),
    entry(F::Argb, "ARGB", RAW, None, F_RGBA_UNPACK, DPTH8888, PSTR4444, PLANE0, OFFS1230, SUB444, F::Argb),
    entry(F::Abgr, "ABGR", RAW, None, F_RGBA, DPTH8888, PSTR4444, PLANE0, OFFS3210, SUB444, F::Argb),
    entry(F::Rgb, "RGB", RAW, None, F_RGB, DPTH888, PSTR333, PLANE0, OFFS012, SUB444, F::Argb),
    entry(F::Bgr, "BGR", RAW, None, F_RGB, DPTH888, PSTR333, PLANE0, OFFS210, SUB444, F::Argb),
    entry(F::Y41b, "Y41B", RAW, Some(*b"Y41B"), F_YUV, DPTH888, PSTR111, PLANE012, OFFS0, SUB411, F::Ayuv),
    entry(F::Y42b, "Y42B", RAW, Some(*b"Y42B"), F_YUV, DPTH888, PSTR111, PLANE012, OFFS0, SUB422, F::Ayuv),
    entry(F::Yvyu, "YVYU", RAW, Some(*b"YVYU"), F_YUV, DPTH888, PSTR244, PLANE0, OFFS031, SUB422, F::Ayuv),
    entry(F::Y444, "Y444", RAW, Some(*b"Y444"), F_YUV, DPTH888, PSTR111, PLANE012, OFFS0, SUB444, F::Ayuv),
    entry(F::V210, "v210", RAW, Some(*b"v210"), F_YUV_C, DPTH10_10_10, PSTR0, PLANE0, OFFS0, SUB422, F::Ayuv64),
    entry(F::V216, "v216", RAW, Some(*b"v216"), F_YUV, DPTH16_16_16, PSTR488, PLANE0, OFFS204, SUB422, F::Ayuv64),
    entry(F::Nv12, "NV12", RAW, Some(*b"NV12"), F_YUV, DPTH888, PSTR122, PLANE011, OFFS001, SUB420, F::Ayuv),
    entry(F::Nv21, "NV21", RAW, Some(*b"NV21"), F_YUV, DPTH888, PSTR122, PLANE011, OFFS010, SUB420, F::Ayuv),
    entry(F::Gray8, "GRAY8", RAW, None, F_GRAY, DPTH8, PSTR1, PLANE0, OFFS0, SUB444, F::Ayuv),
    entry(F::Gray16Be, "GRAY16_BE", RAW, None, F_GRAY, DPTH16, PSTR2, PLANE0, OFFS0, SUB444, F::Ayuv64),
    entry(F::Gray16Le, "GRAY16_LE", RAW, None, F_GRAY_LE, DPTH16, PSTR2, PLANE0, OFFS0, SUB444, F::Ayuv64),
    entry(F::V308, "v308", RAW, Some(*b"v308"), F_YUV, DPTH888, PSTR333, PLANE0, OFFS012, SUB444, F::Ayuv),
    entry(F::Rgb16, "RGB16", RAW, None, F_RGB.union(NATIVE_LE), DPTH565, PSTR222, PLANE0, OFFS0, SUB444, F::Argb),
    entry(F::Bgr16, "BGR16", RAW, None, F_RGB.union(NATIVE_LE), DPTH565_BGR, PSTR222, PLANE0, OFFS0, SUB444, F::Argb),
    entry(F::Rgb15, "RGB15", RAW, None, F_RGB.union(NATIVE_LE), DPTH555, PSTR222, PLANE0, OFFS0, SUB444, F::Argb),
    entry(F::Bgr15, "BGR15", RAW, None, F_RGB.union(NATIVE_LE), DPTH555_BGR, PSTR222, PLANE0, OFFS0, SUB444, F::Argb),
    entry(F::Uyvp, "UYVP", RAW, Some(*b"UYVP"), F_YUV_C, DPTH10_10_10, PSTR0, PLANE0, OFFS0, SUB422, F::Ayuv64),
    entry(F::A420, "A420", RAW, Some(*b"A420"), F_YUVA, DPTH8888, PSTR1111, PLANE0123, OFFS0, SUB4204, F::Ayuv),
    entry(F::Rgb8p, "RGB8P", RAW, None, F_RGBAP, DPTH8_32, PSTR14, PLANE01, OFFS0, SUB444, F::Argb),
    entry(F::Yuv9, "YUV9", RAW, Some(*b"YUV9"), F_YUV, DPTH888, PSTR111, PLANE012, OFFS0, SUB410, F::Ayuv),
    entry(F::Yvu9, "YVU9", RAW, Some(*b"YVU9"), F_YUV, DPTH888, PSTR111, PLANE021, OFFS0, SUB410, F::Ayuv),
    entry(F::Iyu1, "IYU1", RAW, Some(*b"IYU1"), F_YUV, DPTH888, PSTR0, PLANE0, OFFS104, SUB411, F::Ayuv),
    entry(F::Argb64, "ARGB64", RAW, None, F_RGBA_UNPACK.union(NATIVE_LE), DPTH16_16_16_16, PSTR8888, PLANE0, OFFS2460, SUB444, F::Argb64),
    entry(F::Ayuv64, "AYUV64", RAW, None, F_YUVA_UNPACK.union(NATIVE_LE), DPTH16_16_16_16, PSTR8888, PLANE0, OFFS2460, SUB444, F::Ayuv64),
    entry(F::R210, "r210", RAW, None, F_RGB, DPTH10_10_10, PSTR444, PLANE0, OFFS0, SUB444, F::Argb64),
    entry(F::I42010be, "I420_10BE", RAW, None, F_YUV, DPTH10_10_10, PSTR222, PLANE012, OFFS0, SUB420, F::Ayuv64),
    entry(F::I42010le, "I420_10LE", RAW, None, F_YUV_LE, DPTH10_10_10, PSTR222, PLANE012, OFFS0, SUB420, F::Ayuv64),
    entry(F::I42210be, "I422_10BE", RAW, None, F_YUV, DPTH10_10_10, PSTR222, PLANE012, OFFS0, SUB422, F::Ayuv64),
    entry(F::I42210le, "I422_10LE", RAW, None, F_YUV_LE, DPTH10_10_10, PSTR222, PLANE012, OFFS0, SUB422, F::Ayuv64),
];

#[cfg(test)]
mod tests {
    use super::*;

    const CANONICAL: [VideoFormat; 4] = [
        VideoFormat::Ayuv,
        VideoFormat::Argb,
        VideoFormat::Ayuv64,
        VideoFormat::Argb64,
    ];

    fn pixel_formats() -> impl Iterator<Item = &'static FormatInfo> {
        all_formats()
            .iter()
            .filter(|info| !matches!(info.format, VideoFormat::Unknown | VideoFormat::Encoded))
    }

    #[test]
    fn table_index_matches_discriminant() {
        for (idx, info) in all_formats().iter().enumerate() {
            assert_eq!(info.format as usize, idx, "{}", info.name);
        }
    }

    #[test]
    fn component_geometry_is_consistent() {
        for info in pixel_formats() {
            assert!((1..=4).contains(&info.n_components), "{}", info.name);
            let with_depth = info.depth.iter().filter(|d| **d > 0).count();
            assert_eq!(info.n_components, with_depth, "{}", info.name);
            for comp in 0..info.n_components {
                assert!(info.plane[comp] < info.n_planes, "{} comp {comp}", info.name);
            }
            assert!(CANONICAL.contains(&info.unpack_format), "{}", info.name);
            assert_eq!(info.n_unpack_lines, 1);
            assert_eq!(info.pack_lines, 1);
        }
    }

    #[test]
    fn names_round_trip_and_are_unique() {
        for info in all_formats() {
            assert_eq!(VideoFormat::from_string(info.name), info.format);
            assert_eq!(info.format.to_string(), info.name);
        }
        assert_eq!(VideoFormat::from_string("i420"), VideoFormat::Unknown);
        assert_eq!(VideoFormat::from_string(""), VideoFormat::Unknown);
    }

    #[test]
    fn fourcc_is_partial() {
        for info in pixel_formats() {
            match info.fourcc {
                Some(code) => assert_eq!(VideoFormat::from_fourcc(code), info.format),
                None => assert_eq!(info.format.to_fourcc(), None),
            }
        }
        for rgb in [VideoFormat::Rgba, VideoFormat::Rgb16, VideoFormat::R210] {
            assert_eq!(rgb.to_fourcc(), None);
        }
        let code = FourCc::new(*b"YUY2");
        assert_eq!(VideoFormat::from_fourcc(code).to_fourcc(), Some(code));
        assert_eq!(
            VideoFormat::from_fourcc(FourCc::new(*b"Y16 ")),
            VideoFormat::Gray16Le
        );
        assert_eq!(
            VideoFormat::from_fourcc(FourCc::new(*b"AY64")),
            VideoFormat::Ayuv64
        );
        assert_eq!(
            VideoFormat::from_fourcc(FourCc::new(*b"r210")),
            VideoFormat::Unknown
        );
    }

    #[test]
    fn index_lookup_checks_bounds() {
        assert_eq!(VideoFormat::from_index(0), Some(VideoFormat::Unknown));
        assert_eq!(VideoFormat::from_index(45), Some(VideoFormat::I42210le));
        assert_eq!(VideoFormat::from_index(46), None);
        assert!(format_info_by_index(u32::MAX).is_none());
    }

    #[test]
    fn nv12_descriptor() {
        let info = VideoFormat::from_string("NV12").info();
        assert_eq!(info.name, "NV12");
        assert_eq!(info.n_planes, 2);
        assert_eq!(info.w_sub, [0, 1, 1, 0]);
        assert_eq!(info.h_sub, [0, 1, 1, 0]);
    }

    #[test]
    fn masks_resolve_rgb_layouts() {
        let native = Endianness::native();
        assert_eq!(
            VideoFormat::from_masks(16, 16, native, 0xf800, 0x07e0, 0x001f, 0),
            VideoFormat::Rgb16
        );
        assert_eq!(
            VideoFormat::from_masks(15, 16, native, 0x001f, 0x03e0, 0x7c00, 0),
            VideoFormat::Bgr15
        );
        let foreign = match native {
            Endianness::Little => Endianness::Big,
            Endianness::Big => Endianness::Little,
        };
        assert_eq!(
            VideoFormat::from_masks(16, 16, foreign, 0xf800, 0x07e0, 0x001f, 0),
            VideoFormat::Unknown
        );
        assert_eq!(
            VideoFormat::from_masks(24, 24, Endianness::Big, 0x0000ff, 0x00ff00, 0xff0000, 0),
            VideoFormat::Bgr
        );
        assert_eq!(
            VideoFormat::from_masks(24, 24, Endianness::Little, 0x0000ff, 0x00ff00, 0xff0000, 0),
            VideoFormat::Rgb
        );
        assert_eq!(
            VideoFormat::from_masks(
                32,
                32,
                Endianness::Big,
                0x00ff_0000,
                0x0000_ff00,
                0x0000_00ff,
                0xff00_0000
            ),
            VideoFormat::Argb
        );
        assert_eq!(
            VideoFormat::from_masks(32, 32, Endianness::Big, 0x00ff_0000, 0x0000_ff00, 0xff, 0),
            VideoFormat::Unknown
        );
        assert_eq!(VideoFormat::from_masks(30, 32, Endianness::Big, 0, 0, 0, 0), VideoFormat::R210);
        assert_eq!(VideoFormat::from_masks(8, 8, Endianness::Big, 0, 0, 0, 0), VideoFormat::Rgb8p);
        assert_eq!(
            VideoFormat::from_masks(
                64,
                64,
                Endianness::Big,
                0x00ff_0000,
                0x0000_ff00,
                0x0000_00ff,
                0xff00_0000
            ),
            VideoFormat::Argb64
        );
        assert_eq!(
            VideoFormat::from_masks(
                64,
                64,
                Endianness::Big,
                0xff00_0000,
                0x00ff_0000,
                0x0000_ff00,
                0x0000_00ff
            ),
            VideoFormat::Unknown
        );
    }

    #[test]
    fn flag_helpers() {
        let argb64 = VideoFormat::Argb64.info();
        assert!(argb64.is_rgb() && argb64.has_alpha());
        assert!(argb64.flags.contains(FormatFlags::UNPACK));
        assert_eq!(argb64.unpack_pixel_bytes(), 8);
        assert!(VideoFormat::V210.info().is_complex());
        assert!(VideoFormat::Rgb8p.info().has_palette());
        assert!(VideoFormat::Gray16Le.info().is_le());
        assert!(!VideoFormat::Gray16Be.info().is_le());
        assert!(VideoFormat::Gray8.info().is_gray());
        assert!(VideoFormat::Nv21.info().is_yuv());
        assert_eq!(VideoFormat::I420.info().unpack_pixel_bytes(), 4);
    }
}
