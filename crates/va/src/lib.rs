#![doc = include_str!("../README.md")]

use std::{fmt, sync::Arc};

use smallvec::SmallVec;

pub mod coded_buffer;
pub mod display;
pub mod error;
pub mod output;
pub mod pool;
pub mod proxy;
pub mod virtual_backend;

/// Hardware buffer handle.
///
/// # Example
/// ```rust
/// use pixpack_va::BufferId;
///
/// assert!(BufferId(3).is_valid());
/// assert!(!BufferId::INVALID.is_valid());
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct BufferId(pub u32);

impl BufferId {
    /// Sentinel that never names a live buffer.
    pub const INVALID: Self = Self(u32::MAX);

    pub fn is_valid(self) -> bool {
        self != Self::INVALID
    }
}

impl fmt::Display for BufferId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_valid() {
            write!(f, "#{}", self.0)
        } else {
            f.write_str("#invalid")
        }
    }
}

/// Encoding context a buffer is bound to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub u32);

/// Kind of buffer requested from the backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[non_exhaustive]
pub enum BufferKind {
    /// Receives an encoder's compressed bitstream.
    EncCoded,
}

/// One contiguous piece of mapped coded data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Segment {
    data: Arc<[u8]>,
}

impl Segment {
    pub fn new(data: Arc<[u8]>) -> Self {
        Self { data }
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.data
    }

    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Ordered segments returned by a map call.
///
/// # Example
/// ```rust
/// use pixpack_va::{MappedSegments, Segment};
///
/// let segs: MappedSegments = [&b"abc"[..], &b"de"[..]]
///     .into_iter()
///     .map(|s| Segment::new(s.into()))
///     .collect();
/// assert_eq!(segs.total_size(), 5);
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct MappedSegments(SmallVec<[Segment; 2]>);

impl MappedSegments {
    pub fn iter(&self) -> impl Iterator<Item = &Segment> {
        self.0.iter()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Sum of all segment sizes.
    pub fn total_size(&self) -> usize {
        self.0.iter().map(Segment::len).sum()
    }
}

impl FromIterator<Segment> for MappedSegments {
    fn from_iter<I: IntoIterator<Item = Segment>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

pub mod prelude {
    pub use crate::{
        BufferId, BufferKind, ContextId, MappedSegments, Segment,
        coded_buffer::CodedBuffer,
        display::{VaBackend, VaContext, VaDisplay},
        error::VaError,
        output::read_coded_output,
        pool::{CodedBufferPool, CodedBufferPoolConfig, CodedBufferPoolMetrics},
        proxy::{CodedBufferProxy, UserData},
        virtual_backend::{CallCounts, VirtualDisplay},
    };
    pub use pixpack_core::prelude::{BufferLease, BufferPool};
}
