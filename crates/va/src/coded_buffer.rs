//! Hardware buffer holding one encoded bitstream.

use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, trace, warn};

use crate::{
    BufferId, BufferKind, MappedSegments,
    display::VaContext,
    error::VaError,
};

/// Hardware-backed storage for one encoder output.
///
/// Shared ownership goes through `Arc<CodedBuffer>`; the hardware handle is
/// released when the last reference drops. The mapping is cached, so a
/// second [`CodedBuffer::map`] returns the same segment list without a new
/// backend call.
///
/// # Example
/// ```rust
/// use pixpack_va::prelude::*;
///
/// let backend = VirtualDisplay::new();
/// let ctx = VaContext::new(backend.display(), ContextId(0));
/// let buf = CodedBuffer::new(&ctx, 4096).unwrap();
/// backend.fill(buf.id(), &[b"hdr".as_slice(), b"slice".as_slice()]);
///
/// let mut out = [0u8; 16];
/// assert_eq!(buf.copy_into(&mut out), Ok(8));
/// assert_eq!(&out[..8], b"hdrslice");
/// assert!(!buf.is_mapped());
/// ```
#[derive(Debug)]
pub struct CodedBuffer {
    context: VaContext,
    id: BufferId,
    size: usize,
    mapping: Mutex<Option<Arc<MappedSegments>>>,
}

impl CodedBuffer {
    /// Allocate a coded buffer of exactly `size` bytes in `context`.
    pub fn new(context: &VaContext, size: usize) -> Result<Arc<Self>, VaError> {
        let id = context
            .display()
            .create_buffer(context.id(), BufferKind::EncCoded, size)?;
        if !id.is_valid() {
            return Err(VaError::AllocationFailed { size });
        }
        debug!(buffer = %id, size, "created coded buffer");
        Ok(Arc::new(Self {
            context: context.clone(),
            id,
            size,
            mapping: Mutex::new(None),
        }))
    }

    pub fn id(&self) -> BufferId {
        self.id
    }

    pub fn context(&self) -> &VaContext {
        &self.context
    }

    /// Size given at allocation, not the filled length.
    pub fn requested_size(&self) -> usize {
        self.size
    }

    pub fn is_mapped(&self) -> bool {
        self.mapping.lock().is_some()
    }

    /// Map the filled content, reusing an outstanding mapping.
    pub fn map(&self) -> Result<Arc<MappedSegments>, VaError> {
        let mut mapping = self.mapping.lock();
        if let Some(segments) = mapping.as_ref() {
            return Ok(Arc::clone(segments));
        }
        let segments = Arc::new(self.context.display().map_buffer(self.id)?);
        trace!(buffer = %self.id, segments = segments.len(), "mapped");
        *mapping = Some(Arc::clone(&segments));
        Ok(segments)
    }

    /// Release the mapping; does nothing when not mapped.
    ///
    /// Segment lists handed out by [`CodedBuffer::map`] stay readable, but
    /// they no longer reflect the hardware buffer.
    pub fn unmap(&self) {
        let mut mapping = self.mapping.lock();
        if mapping.take().is_some() {
            self.context.display().unmap_buffer(self.id);
            trace!(buffer = %self.id, "unmapped");
        }
    }

    /// Filled length, summed over the mapped segments.
    ///
    /// Every call performs a full map/unmap cycle.
    pub fn size(&self) -> Result<usize, VaError> {
        let total = self.map()?.total_size();
        self.unmap();
        Ok(total)
    }

    /// Copy all segments back to back into `dest` and return the number of
    /// bytes written.
    ///
    /// Stops at the first segment that does not fit. The buffer is unmapped
    /// on every exit path.
    pub fn copy_into(&self, dest: &mut [u8]) -> Result<usize, VaError> {
        let segments = self.map()?;
        let result = copy_segments(&segments, dest);
        self.unmap();
        result
    }
}

fn copy_segments(segments: &MappedSegments, dest: &mut [u8]) -> Result<usize, VaError> {
    let mut offset = 0;
    for segment in segments.iter() {
        let end = offset + segment.len();
        let Some(target) = dest.get_mut(offset..end) else {
            return Err(VaError::ShortCopy {
                required: end,
                available: dest.len(),
            });
        };
        target.copy_from_slice(segment.as_slice());
        offset = end;
    }
    Ok(offset)
}

impl Drop for CodedBuffer {
    fn drop(&mut self) {
        if self.mapping.get_mut().take().is_some() {
            warn!(buffer = %self.id, "coded buffer dropped while mapped");
            self.context.display().unmap_buffer(self.id);
        }
        self.context.display().destroy_buffer(self.id);
        debug!(buffer = %self.id, "destroyed coded buffer");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContextId, virtual_backend::VirtualDisplay};

    fn setup() -> (VirtualDisplay, VaContext) {
        let backend = VirtualDisplay::new();
        let ctx = VaContext::new(backend.display(), ContextId(7));
        (backend, ctx)
    }

    #[test]
    fn map_is_idempotent() {
        let (backend, ctx) = setup();
        let buf = CodedBuffer::new(&ctx, 64).unwrap();
        backend.fill(buf.id(), &[b"abc".as_slice()]);

        let first = buf.map().unwrap();
        let second = buf.map().unwrap();
        assert!(Arc::ptr_eq(&first, &second));
        assert_eq!(backend.calls().mapped, 1);

        buf.unmap();
        buf.unmap();
        assert_eq!(backend.calls().unmapped, 1);
        assert!(!buf.is_mapped());
    }

    #[test]
    fn size_sums_segments_not_allocation() {
        let (backend, ctx) = setup();
        let buf = CodedBuffer::new(&ctx, 1024).unwrap();
        assert_eq!(buf.size(), Ok(0));
        backend.fill(buf.id(), &[b"1234".as_slice(), b"56".as_slice(), b"789".as_slice()]);
        assert_eq!(buf.size(), Ok(9));
        assert_eq!(buf.size(), Ok(9));
        assert_eq!(buf.requested_size(), 1024);

        let calls = backend.calls();
        assert_eq!(calls.mapped, 3);
        assert_eq!(calls.mapped, calls.unmapped);
    }

    #[test]
    fn short_copy_fails_and_unmaps() {
        let (backend, ctx) = setup();
        let buf = CodedBuffer::new(&ctx, 64).unwrap();
        backend.fill(buf.id(), &[b"abcd".as_slice(), b"efgh".as_slice()]);

        let mut dest = [0u8; 6];
        assert_eq!(
            buf.copy_into(&mut dest),
            Err(VaError::ShortCopy {
                required: 8,
                available: 6
            })
        );
        assert_eq!(&dest[..4], b"abcd");
        assert!(!buf.is_mapped());
        let calls = backend.calls();
        assert_eq!(calls.mapped, calls.unmapped);
    }

    #[test]
    fn map_failure_propagates() {
        let (backend, ctx) = setup();
        let buf = CodedBuffer::new(&ctx, 64).unwrap();
        backend.set_fail_map(true);
        assert_eq!(buf.size(), Err(VaError::MapFailed(buf.id())));
        assert_eq!(buf.copy_into(&mut [0u8; 4]), Err(VaError::MapFailed(buf.id())));
        assert!(!buf.is_mapped());
        assert_eq!(backend.calls().unmapped, 0);
    }

    #[test]
    fn allocation_failure_creates_nothing() {
        let (backend, ctx) = setup();
        backend.set_fail_create(true);
        assert!(CodedBuffer::new(&ctx, 32).is_err());
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn drop_unmaps_then_destroys() {
        let (backend, ctx) = setup();
        let buf = CodedBuffer::new(&ctx, 16).unwrap();
        let id = buf.id();
        let _segments = buf.map().unwrap();
        assert!(backend.is_mapped(id));

        drop(buf);
        let calls = backend.calls();
        assert_eq!(calls.unmapped, 1);
        assert_eq!(calls.destroyed, 1);
        assert_eq!(backend.live_buffers(), 0);
    }

    #[test]
    fn last_reference_destroys_once() {
        let (backend, ctx) = setup();
        let buf = CodedBuffer::new(&ctx, 16).unwrap();
        let clones: Vec<_> = (0..4).map(|_| Arc::clone(&buf)).collect();
        drop(buf);
        assert_eq!(backend.calls().destroyed, 0);
        drop(clones);
        assert_eq!(backend.calls().destroyed, 1);
    }
}
