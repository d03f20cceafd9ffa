#![doc = include_str!("../README.md")]

pub mod buffer;
pub mod format;
pub mod info;
pub mod metrics;
pub mod registry;

pub mod prelude {
    pub use crate::{
        buffer::{
            BufferLease, BufferPool, BufferPoolMetrics, FrameLease, FrameMeta, Plane, PlaneLayout,
            PlaneMut,
        },
        format::{ChromaSite, Endianness, FourCc, MediaFormat, Resolution},
        info::VideoInfo,
        metrics::Metrics,
        registry::{
            COMP_A, COMP_B, COMP_G, COMP_R, COMP_U, COMP_V, COMP_Y, FormatFlags, FormatInfo,
            MAX_PLANES, VideoFormat, all_formats, format_info, format_info_by_index,
        },
    };
}
