use crate::BufferId;

/// Failures at the display boundary.
///
/// # Example
/// ```rust
/// use pixpack_va::prelude::*;
///
/// let err = VaError::ShortCopy { required: 96, available: 64 };
/// assert_eq!(err.to_string(), "coded data needs 96 bytes, destination holds 64");
/// ```
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum VaError {
    /// The backend could not allocate a buffer.
    #[error("buffer allocation of {size} bytes failed")]
    AllocationFailed {
        /// Requested size in bytes.
        size: usize,
    },
    /// The backend could not map a buffer.
    #[error("mapping buffer {0} failed")]
    MapFailed(BufferId),
    /// The destination of a copy cannot hold the mapped segments.
    #[error("coded data needs {required} bytes, destination holds {available}")]
    ShortCopy {
        /// Bytes up to the end of the segment that did not fit.
        required: usize,
        /// Destination length.
        available: usize,
    },
    /// The backend does not know the buffer.
    #[error("invalid buffer {0}")]
    InvalidBuffer(BufferId),
}
