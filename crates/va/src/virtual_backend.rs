//! Software display backend that keeps coded data in memory.
use std::{collections::HashMap, sync::Arc};

use parking_lot::Mutex;

use crate::{
    BufferId, BufferKind, ContextId, MappedSegments, Segment,
    display::{VaBackend, VaDisplay},
    error::VaError,
};

/// Number of calls each backend entry point has seen.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CallCounts {
    pub created: u64,
    pub destroyed: u64,
    pub mapped: u64,
    pub unmapped: u64,
}

#[derive(Debug)]
struct VirtualBuffer {
    size: usize,
    segments: Vec<Arc<[u8]>>,
    mapped: bool,
}

#[derive(Debug, Default)]
struct State {
    next_id: u32,
    buffers: HashMap<BufferId, VirtualBuffer>,
    counts: CallCounts,
    fail_create: bool,
    fail_map: bool,
}

/// In-memory display whose buffers are filled by the caller instead of an
/// encoder.
///
/// Clones share state, so a test can keep one handle for inspection while
/// the [`VaDisplay`] owns another.
///
/// # Example
/// ```rust
/// use pixpack_va::prelude::*;
///
/// let backend = VirtualDisplay::new();
/// let display = backend.display();
/// let id = display.create_buffer(ContextId(1), BufferKind::EncCoded, 64).unwrap();
/// assert!(backend.fill(id, &[b"coded".as_slice()]));
/// assert_eq!(display.map_buffer(id).unwrap().total_size(), 5);
/// display.unmap_buffer(id);
/// assert_eq!(backend.calls().mapped, backend.calls().unmapped);
/// ```
#[derive(Debug, Clone, Default)]
pub struct VirtualDisplay {
    state: Arc<Mutex<State>>,
}

impl VirtualDisplay {
    pub fn new() -> Self {
        Self::default()
    }

    /// Wrap a clone of this backend in a display handle.
    pub fn display(&self) -> VaDisplay {
        VaDisplay::new(self.clone())
    }

    /// Replace a buffer's content with `segments`, as an encoder would.
    ///
    /// Returns `false` if the buffer is unknown, currently mapped, or the
    /// data exceeds its allocation.
    pub fn fill(&self, buffer: BufferId, segments: &[&[u8]]) -> bool {
        let mut state = self.state.lock();
        let Some(buf) = state.buffers.get_mut(&buffer) else {
            return false;
        };
        let total: usize = segments.iter().map(|s| s.len()).sum();
        if buf.mapped || total > buf.size {
            return false;
        }
        buf.segments = segments.iter().map(|s| Arc::from(*s)).collect();
        true
    }

    /// Make every following allocation fail until reset.
    pub fn set_fail_create(&self, fail: bool) {
        self.state.lock().fail_create = fail;
    }

    /// Make every following map fail until reset.
    pub fn set_fail_map(&self, fail: bool) {
        self.state.lock().fail_map = fail;
    }

    pub fn calls(&self) -> CallCounts {
        self.state.lock().counts
    }

    /// Buffers created and not yet destroyed.
    pub fn live_buffers(&self) -> usize {
        self.state.lock().buffers.len()
    }

    /// Whether `buffer` currently has an outstanding mapping.
    pub fn is_mapped(&self, buffer: BufferId) -> bool {
        self.state
            .lock()
            .buffers
            .get(&buffer)
            .is_some_and(|b| b.mapped)
    }
}

impl VaBackend for VirtualDisplay {
    fn create_buffer(
        &mut self,
        _context: ContextId,
        _kind: BufferKind,
        size: usize,
    ) -> Result<BufferId, VaError> {
        let mut state = self.state.lock();
        state.counts.created += 1;
        if state.fail_create {
            return Err(VaError::AllocationFailed { size });
        }
        let id = BufferId(state.next_id);
        state.next_id += 1;
        state.buffers.insert(
            id,
            VirtualBuffer {
                size,
                segments: Vec::new(),
                mapped: false,
            },
        );
        Ok(id)
    }

    fn destroy_buffer(&mut self, buffer: BufferId) {
        let mut state = self.state.lock();
        state.counts.destroyed += 1;
        state.buffers.remove(&buffer);
    }

    fn map_buffer(&mut self, buffer: BufferId) -> Result<MappedSegments, VaError> {
        let mut state = self.state.lock();
        state.counts.mapped += 1;
        if state.fail_map {
            return Err(VaError::MapFailed(buffer));
        }
        let buf = state
            .buffers
            .get_mut(&buffer)
            .ok_or(VaError::InvalidBuffer(buffer))?;
        buf.mapped = true;
        Ok(buf.segments.iter().cloned().map(Segment::new).collect())
    }

    fn unmap_buffer(&mut self, buffer: BufferId) {
        let mut state = self.state.lock();
        state.counts.unmapped += 1;
        if let Some(buf) = state.buffers.get_mut(&buffer) {
            buf.mapped = false;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn fill_respects_allocation_and_mapping() {
        let backend = VirtualDisplay::new();
        let display = backend.display();
        let id = display
            .create_buffer(ContextId(0), BufferKind::EncCoded, 4)
            .unwrap();
        assert!(!backend.fill(id, &[b"toolong".as_slice()]));
        assert!(!backend.fill(BufferId(99), &[b"x".as_slice()]));
        assert!(backend.fill(id, &[b"ab".as_slice(), b"cd".as_slice()]));

        let segs = display.map_buffer(id).unwrap();
        assert_eq!(segs.len(), 2);
        assert!(backend.is_mapped(id));
        assert!(!backend.fill(id, &[b"x".as_slice()]));
        display.unmap_buffer(id);
        assert!(!backend.is_mapped(id));
    }

    #[test]
    fn injected_failures() {
        let backend = VirtualDisplay::new();
        let display = backend.display();
        backend.set_fail_create(true);
        assert_eq!(
            display.create_buffer(ContextId(0), BufferKind::EncCoded, 8),
            Err(VaError::AllocationFailed { size: 8 })
        );
        backend.set_fail_create(false);
        let id = display
            .create_buffer(ContextId(0), BufferKind::EncCoded, 8)
            .unwrap();
        backend.set_fail_map(true);
        assert_eq!(display.map_buffer(id), Err(VaError::MapFailed(id)));
        assert_eq!(display.map_buffer(BufferId(42)), Err(VaError::MapFailed(BufferId(42))));
        backend.set_fail_map(false);
        assert_eq!(
            display.map_buffer(BufferId(42)),
            Err(VaError::InvalidBuffer(BufferId(42)))
        );
        display.destroy_buffer(id);
        assert_eq!(backend.live_buffers(), 0);
        assert_eq!(backend.calls().created, 2);
    }
}
