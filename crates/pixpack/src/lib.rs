#![doc = include_str!("../README.md")]

pub use pixpack_codec as codec;
pub use pixpack_core as core;
pub use pixpack_va as va;

pub use thiserror;

use pixpack_codec::CodecError;
use pixpack_va::error::VaError;

/// Any failure surfaced by the workspace crates.
///
/// # Example
/// ```rust
/// use pixpack::prelude::*;
///
/// let err: Error = VaError::MapFailed(BufferId(4)).into();
/// assert_eq!(err.code(), "map_failed");
/// assert!(err.retryable());
/// ```
#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Codec(#[from] CodecError),
    #[error(transparent)]
    Va(#[from] VaError),
    /// A pool had no coded buffer to lend.
    #[error("coded buffer pool exhausted")]
    PoolExhausted,
}

impl Error {
    /// Stable string code for error classification.
    pub fn code(&self) -> &'static str {
        match self {
            Error::Codec(CodecError::NoRoutines(_)) => "no_routines",
            Error::Codec(CodecError::Unsupported { .. }) => "unsupported_conversion",
            Error::Codec(CodecError::ResolutionMismatch { .. }) => "resolution_mismatch",
            Error::Codec(CodecError::MissingPlanes { .. }) => "missing_planes",
            Error::Codec(CodecError::StrideTooSmall { .. }) => "stride_too_small",
            Error::Codec(CodecError::PlaneTooShort { .. }) => "plane_too_short",
            Error::Codec(CodecError::Codec(_)) => "codec_error",
            Error::Va(VaError::AllocationFailed { .. }) => "allocation_failed",
            Error::Va(VaError::MapFailed(_)) => "map_failed",
            Error::Va(VaError::ShortCopy { .. }) => "short_copy",
            Error::Va(VaError::InvalidBuffer(_)) => "invalid_buffer",
            Error::PoolExhausted => "pool_exhausted",
        }
    }

    /// Whether the operation may succeed when retried.
    pub fn retryable(&self) -> bool {
        matches!(
            self,
            Error::PoolExhausted
                | Error::Va(VaError::AllocationFailed { .. } | VaError::MapFailed(_))
        )
    }
}

pub mod prelude {
    pub use crate::Error;
    pub use pixpack_codec::prelude::*;
    pub use pixpack_core::prelude::*;
    pub use pixpack_va::prelude::*;
}
