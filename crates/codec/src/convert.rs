//! Whole-frame conversion through the canonical unpack layout.

use std::{
    collections::VecDeque,
    sync::{
        Arc,
        atomic::{AtomicU64, Ordering},
    },
    time::{Duration, Instant},
};

use parking_lot::Mutex;
use pixpack_core::prelude::*;
use rayon::prelude::*;

use crate::{CodecError, FormatCodec, PackFlags, lines::palette};

/// Conversion knobs.
///
/// # Example
/// ```rust
/// use pixpack_codec::{PackFlags, convert::ConvertOptions};
///
/// let opts = ConvertOptions { truncate_range: true, ..Default::default() };
/// assert_eq!(opts.pack_flags(), PackFlags::TRUNCATE_RANGE);
/// ```
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct ConvertOptions {
    /// Zero-fill instead of replicating bits when widening samples.
    pub truncate_range: bool,
    /// Siting hint passed to pack routines.
    pub chroma_site: ChromaSite,
}

impl ConvertOptions {
    pub fn pack_flags(&self) -> PackFlags {
        if self.truncate_range {
            PackFlags::TRUNCATE_RANGE
        } else {
            PackFlags::empty()
        }
    }
}

/// Counters and timings for a converter.
///
/// Clones share the same counters.
///
/// # Example
/// ```rust
/// use pixpack_codec::convert::ConvertStats;
///
/// let stats = ConvertStats::default();
/// stats.inc_processed();
/// assert_eq!(stats.processed(), 1);
/// assert_eq!(stats.avg_millis(), None);
/// ```
#[derive(Debug, Clone, Default)]
pub struct ConvertStats {
    processed: Arc<AtomicU64>,
    errors: Arc<AtomicU64>,
    last_nanos: Arc<AtomicU64>,
    window: Arc<Mutex<VecDeque<u64>>>,
}

const STATS_WINDOW: usize = 120;

impl ConvertStats {
    pub fn inc_processed(&self) {
        self.processed.fetch_add(1, Ordering::Relaxed);
    }

    pub fn inc_errors(&self) {
        self.errors.fetch_add(1, Ordering::Relaxed);
    }

    /// Frames converted successfully.
    pub fn processed(&self) -> u64 {
        self.processed.load(Ordering::Relaxed)
    }

    /// Conversions rejected with an error.
    pub fn errors(&self) -> u64 {
        self.errors.load(Ordering::Relaxed)
    }

    /// Record a conversion duration.
    pub fn record_duration(&self, dur: Duration) {
        let nanos = dur.as_nanos().min(u64::MAX as u128) as u64;
        self.last_nanos.store(nanos, Ordering::Relaxed);
        let mut win = self.window.lock();
        win.push_back(nanos);
        while win.len() > STATS_WINDOW {
            win.pop_front();
        }
    }

    /// Mean duration over the recent window in milliseconds.
    pub fn avg_millis(&self) -> Option<f64> {
        let win = self.window.lock();
        if win.is_empty() {
            return None;
        }
        let total: u128 = win.iter().map(|n| *n as u128).sum();
        Some(total as f64 / 1_000_000.0 / win.len() as f64)
    }

    /// Most recent duration in milliseconds.
    pub fn last_millis(&self) -> Option<f64> {
        match self.last_nanos.load(Ordering::Relaxed) {
            0 => None,
            n => Some(n as f64 / 1_000_000.0),
        }
    }
}

/// Converts frames between formats of the same color model.
///
/// Each source line is unpacked into the canonical layout in parallel,
/// widened or narrowed when the canonical depths differ, then packed
/// into the destination. RGB and YUV are never mixed, and gray counts as
/// YUV.
///
/// # Example
/// ```rust
/// use pixpack_codec::prelude::*;
/// use pixpack_core::prelude::*;
///
/// let pool = BufferPool::with_capacity(4, 64);
/// let res = Resolution::new(2, 1).unwrap();
/// let frame = |format| {
///     let info = VideoInfo::new(format, res).unwrap();
///     FrameLease::from_video_info(FrameMeta::new(MediaFormat::new(format, res), 0), &info, &pool)
/// };
///
/// let mut src = frame(VideoFormat::Yuy2);
/// src.planes_mut()[0].data()[..4].copy_from_slice(&[16, 128, 235, 128]);
/// let mut dst = frame(VideoFormat::I420);
///
/// FrameConverter::new(ConvertOptions::default()).convert(&src, &mut dst).unwrap();
/// assert_eq!(&dst.planes()[0].data()[..2], &[16, 235]);
/// ```
#[derive(Debug, Clone, Default)]
pub struct FrameConverter {
    options: ConvertOptions,
    stats: ConvertStats,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ColorModel {
    Rgb,
    Yuv,
}

fn color_model(info: &FormatInfo) -> ColorModel {
    if info.is_rgb() {
        ColorModel::Rgb
    } else {
        ColorModel::Yuv
    }
}

impl FrameConverter {
    pub fn new(options: ConvertOptions) -> Self {
        Self {
            options,
            stats: ConvertStats::default(),
        }
    }

    pub fn options(&self) -> ConvertOptions {
        self.options
    }

    /// Shared counters for this converter.
    pub fn stats(&self) -> ConvertStats {
        self.stats.clone()
    }

    /// Convert `src` into `dst`, which must have the same resolution.
    pub fn convert(&self, src: &FrameLease, dst: &mut FrameLease) -> Result<(), CodecError> {
        let src_fmt = src.meta().format;
        let dst_fmt = dst.meta().format;
        if src_fmt.resolution != dst_fmt.resolution {
            self.stats.inc_errors();
            return Err(CodecError::ResolutionMismatch {
                src: src_fmt,
                dst: dst_fmt,
            });
        }
        let src_planes = src.planes();
        let mut dst_planes = dst.planes_mut();
        self.convert_planes(src_fmt, &src_planes, dst_fmt.format, &mut dst_planes)
    }

    /// Convert raw plane views; both sides share `src_fmt`'s resolution.
    pub fn convert_planes(
        &self,
        src_fmt: MediaFormat,
        src: &[Plane<'_>],
        dst_format: VideoFormat,
        dst: &mut [PlaneMut<'_>],
    ) -> Result<(), CodecError> {
        let start = Instant::now();
        let result = self.convert_inner(src_fmt, src, dst_format, dst);
        match &result {
            Ok(()) => {
                self.stats.inc_processed();
                self.stats.record_duration(start.elapsed());
            }
            Err(err) => {
                self.stats.inc_errors();
                tracing::debug!(src = %src_fmt, dst = %dst_format, error = %err, "frame conversion rejected");
            }
        }
        result
    }

    fn convert_inner(
        &self,
        src_fmt: MediaFormat,
        src: &[Plane<'_>],
        dst_format: VideoFormat,
        dst: &mut [PlaneMut<'_>],
    ) -> Result<(), CodecError> {
        let src_codec =
            FormatCodec::for_format(src_fmt.format).ok_or(CodecError::NoRoutines(src_fmt.format))?;
        let dst_codec =
            FormatCodec::for_format(dst_format).ok_or(CodecError::NoRoutines(dst_format))?;
        if color_model(src_codec.info()) != color_model(dst_codec.info()) {
            return Err(CodecError::Unsupported {
                from: src_fmt.format,
                to: dst_format,
            });
        }

        let src_info = VideoInfo::new(src_fmt.format, src_fmt.resolution)
            .ok_or(CodecError::NoRoutines(src_fmt.format))?;
        let dst_info = VideoInfo::new(dst_format, src_fmt.resolution)
            .ok_or(CodecError::NoRoutines(dst_format))?;
        check_planes(&src_info, src.iter().map(|p| (p.stride(), p.data().len())))?;
        check_planes(&dst_info, dst.iter().map(|p| (p.stride(), p.len())))?;

        let width = src_info.width();
        let height = src_info.height();
        let flags = self.options.pack_flags();

        let src_row = width * src_codec.canonical_pixel_bytes();
        let mut canonical = vec![0u8; src_row * height];
        canonical
            .par_chunks_mut(src_row)
            .enumerate()
            .for_each(|(y, line)| src_codec.unpack(flags, line, src, 0, y, width));

        let canonical = match (src_codec.canonical_pixel_bytes(), dst_codec.canonical_pixel_bytes()) {
            (4, 8) => widen_samples(&canonical),
            (8, 4) => narrow_samples(&canonical),
            _ => canonical,
        };

        if dst_codec.info().has_palette() && !palette::write_palette(&mut dst[1], &palette::default_palette()) {
            return Err(CodecError::Codec("palette plane too short".into()));
        }

        let dst_row = width * dst_codec.canonical_pixel_bytes();
        for (y, line) in canonical.chunks_exact(dst_row).enumerate() {
            dst_codec.pack(flags, line, dst, self.options.chroma_site, y, width);
        }

        tracing::debug!(
            src = %src_fmt.format,
            dst = %dst_format,
            width,
            height,
            "converted frame"
        );
        Ok(())
    }
}

/// Validate plane count, strides and lengths against `info`.
fn check_planes(
    info: &VideoInfo,
    planes: impl ExactSizeIterator<Item = (usize, usize)>,
) -> Result<(), CodecError> {
    if planes.len() < info.n_planes() {
        return Err(CodecError::MissingPlanes {
            format: info.format(),
            expected: info.n_planes(),
            actual: planes.len(),
        });
    }
    for (plane, (stride, len)) in planes.take(info.n_planes()).enumerate() {
        let required = info.stride(plane);
        if stride < required {
            return Err(CodecError::StrideTooSmall {
                plane,
                required,
                actual: stride,
            });
        }
        let needed = stride
            .checked_mul(info.plane_height(plane))
            .ok_or_else(|| CodecError::Codec("plane size overflow".into()))?;
        if len < needed {
            return Err(CodecError::PlaneTooShort {
                plane,
                required: needed,
                actual: len,
            });
        }
    }
    Ok(())
}

/// 8-bit canonical samples to 16-bit by byte replication.
fn widen_samples(src: &[u8]) -> Vec<u8> {
    src.iter()
        .flat_map(|&v| (((v as u16) << 8) | v as u16).to_ne_bytes())
        .collect()
}

/// 16-bit canonical samples to 8-bit by keeping the high byte.
fn narrow_samples(src: &[u8]) -> Vec<u8> {
    src.chunks_exact(2)
        .map(|c| (u16::from_ne_bytes([c[0], c[1]]) >> 8) as u8)
        .collect()
}
