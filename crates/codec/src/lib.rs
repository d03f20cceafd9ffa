#![doc = include_str!("../README.md")]

use bitflags::bitflags;
use pixpack_core::prelude::*;

pub mod convert;
pub mod lines;

use lines::{gray, packed, palette, planar, rgb16, shuffle, tenbit};

bitflags! {
    /// Modifiers for a single pack or unpack call.
    ///
    /// # Example
    /// ```rust
    /// use pixpack_codec::PackFlags;
    ///
    /// let flags = PackFlags::TRUNCATE_RANGE;
    /// assert!(flags.contains(PackFlags::TRUNCATE_RANGE));
    /// assert!(PackFlags::default().is_empty());
    /// ```
    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
    pub struct PackFlags: u32 {
        /// Leave the low bits zero when widening samples instead of
        /// replicating the high bits into them.
        const TRUNCATE_RANGE = 1 << 0;
    }
}

/// Expand `width` pixels of line `y` into the canonical unpack layout.
///
/// `dest` receives AYUV/ARGB (8-bit formats) or AYUV64/ARGB64 (deeper
/// formats, host-order 16-bit words). `x` is reserved and currently
/// ignored.
pub type UnpackFn = fn(
    info: &FormatInfo,
    flags: PackFlags,
    dest: &mut [u8],
    planes: &[Plane<'_>],
    x: usize,
    y: usize,
    width: usize,
);

/// Write `width` canonical pixels from `src` into line `y` of the planes.
pub type PackFn = fn(
    info: &FormatInfo,
    flags: PackFlags,
    src: &[u8],
    planes: &mut [PlaneMut<'_>],
    chroma_site: ChromaSite,
    y: usize,
    width: usize,
);

/// Errors surfaced by the frame converter.
///
/// # Example
/// ```rust
/// use pixpack_codec::CodecError;
/// use pixpack_core::prelude::VideoFormat;
///
/// let err = CodecError::NoRoutines(VideoFormat::Encoded);
/// assert_eq!(err.to_string(), "no pack/unpack routines for ENCODED");
/// ```
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    /// The format is a sentinel without a pixel layout.
    #[error("no pack/unpack routines for {0}")]
    NoRoutines(VideoFormat),
    /// Conversion would need a color matrix between RGB and YUV.
    #[error("cannot convert {from} to {to}: color model differs")]
    Unsupported {
        /// Source format.
        from: VideoFormat,
        /// Destination format.
        to: VideoFormat,
    },
    /// Source and destination frames disagree on size.
    #[error("resolution mismatch: source {src}, destination {dst}")]
    ResolutionMismatch {
        /// Source frame format.
        src: MediaFormat,
        /// Destination frame format.
        dst: MediaFormat,
    },
    /// A frame carries fewer planes than its format needs.
    #[error("{format} needs {expected} planes, frame has {actual}")]
    MissingPlanes {
        /// Format of the frame.
        format: VideoFormat,
        /// Planes required by the format.
        expected: usize,
        /// Planes present in the frame.
        actual: usize,
    },
    /// A plane's row stride is smaller than one row of pixels.
    #[error("plane {plane} stride {actual} below required {required}")]
    StrideTooSmall {
        /// Plane index.
        plane: usize,
        /// Minimum stride.
        required: usize,
        /// Stride in the frame.
        actual: usize,
    },
    /// A plane buffer is too short for its stride and height.
    #[error("plane {plane} holds {actual} bytes, needs {required}")]
    PlaneTooShort {
        /// Plane index.
        plane: usize,
        /// Bytes required.
        required: usize,
        /// Bytes available.
        actual: usize,
    },
    /// Codec-specific failure detail.
    #[error("codec error: {0}")]
    Codec(String),
}

/// Registry entry paired with the format's pack and unpack routines.
///
/// # Example
/// ```rust
/// use pixpack_codec::{FormatCodec, PackFlags};
/// use pixpack_core::prelude::*;
///
/// let codec = FormatCodec::for_format(VideoFormat::Yuy2).unwrap();
/// assert_eq!(codec.unpack_format(), VideoFormat::Ayuv);
///
/// let line = [16u8, 128, 32, 64];
/// let planes = [Plane::new(&line, 4)];
/// let mut out = [0u8; 8];
/// codec.unpack(PackFlags::empty(), &mut out, &planes, 0, 0, 2);
/// assert_eq!(out, [255, 16, 128, 64, 255, 32, 128, 64]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct FormatCodec {
    info: &'static FormatInfo,
    unpack: UnpackFn,
    pack: PackFn,
}

impl FormatCodec {
    /// Routines for `format`; `None` for [`VideoFormat::Unknown`] and
    /// [`VideoFormat::Encoded`].
    pub fn for_format(format: VideoFormat) -> Option<Self> {
        use VideoFormat as F;

        let (unpack, pack): (UnpackFn, PackFn) = match format {
            F::Unknown | F::Encoded => return None,
            F::I420 | F::Yv12 | F::Y42b | F::Y444 | F::Nv12 | F::Nv21 | F::A420 => {
                (planar::unpack_planar, planar::pack_planar)
            }
            F::Y41b | F::Yuv9 | F::Yvu9 => (planar::unpack_planar, planar::pack_quad),
            F::Yuy2 | F::Uyvy | F::Yvyu => (packed::unpack_yuv422, packed::pack_yuv422),
            F::V216 => (packed::unpack_v216, packed::pack_v216),
            F::Iyu1 => (packed::unpack_iyu1, packed::pack_iyu1),
            F::Ayuv
            | F::Rgbx
            | F::Bgrx
            | F::Xrgb
            | F::Xbgr
            | F::Rgba
            | F::Bgra
            | F::Argb
            | F::Abgr => (shuffle::unpack_shuffle4, shuffle::pack_shuffle4),
            F::Rgb | F::Bgr | F::V308 => (shuffle::unpack_shuffle3, shuffle::pack_shuffle3),
            F::Argb64 | F::Ayuv64 => (shuffle::unpack_copy8, shuffle::pack_copy8),
            F::Rgb16 | F::Bgr16 | F::Rgb15 | F::Bgr15 => (rgb16::unpack_rgb16, rgb16::pack_rgb16),
            F::Gray8 => (gray::unpack_gray8, gray::pack_gray8),
            F::Gray16Be | F::Gray16Le => (gray::unpack_gray16, gray::pack_gray16),
            F::V210 => (tenbit::unpack_v210, tenbit::pack_v210),
            F::Uyvp => (tenbit::unpack_uyvp, tenbit::pack_uyvp),
            F::R210 => (tenbit::unpack_r210, tenbit::pack_r210),
            F::I42010be | F::I42010le | F::I42210be | F::I42210le => {
                (tenbit::unpack_planar10, tenbit::pack_planar10)
            }
            F::Rgb8p => (palette::unpack_rgb8p, palette::pack_rgb8p),
        };

        Some(Self {
            info: format.info(),
            unpack,
            pack,
        })
    }

    /// Registry entry these routines operate on.
    pub fn info(&self) -> &'static FormatInfo {
        self.info
    }

    /// Canonical format produced by [`FormatCodec::unpack`].
    pub fn unpack_format(&self) -> VideoFormat {
        self.info.unpack_format
    }

    /// Lines produced by one unpack call.
    pub fn n_unpack_lines(&self) -> usize {
        self.info.n_unpack_lines
    }

    /// Lines consumed by one pack call.
    pub fn pack_lines(&self) -> usize {
        self.info.pack_lines
    }

    /// Bytes one canonical pixel occupies.
    pub fn canonical_pixel_bytes(&self) -> usize {
        self.info.unpack_pixel_bytes()
    }

    /// Unpack `width` pixels of line `y` into `dest`.
    ///
    /// # Panics
    ///
    /// When `dest` or a plane is too small for the request.
    pub fn unpack(
        &self,
        flags: PackFlags,
        dest: &mut [u8],
        planes: &[Plane<'_>],
        x: usize,
        y: usize,
        width: usize,
    ) {
        (self.unpack)(self.info, flags, dest, planes, x, y, width)
    }

    /// Pack `width` canonical pixels from `src` into line `y`.
    ///
    /// # Panics
    ///
    /// When `src` or a plane is too small for the request.
    pub fn pack(
        &self,
        flags: PackFlags,
        src: &[u8],
        planes: &mut [PlaneMut<'_>],
        chroma_site: ChromaSite,
        y: usize,
        width: usize,
    ) {
        (self.pack)(self.info, flags, src, planes, chroma_site, y, width)
    }
}

pub mod prelude {
    pub use crate::{
        CodecError, FormatCodec, PackFlags, PackFn, UnpackFn,
        convert::{ConvertOptions, ConvertStats, FrameConverter},
        lines::palette::{default_palette, write_palette},
    };
}
