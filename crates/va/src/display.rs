//! Display and context handles around a hardware backend.

use std::{fmt, sync::Arc};

use parking_lot::Mutex;

use crate::{BufferId, BufferKind, ContextId, MappedSegments, error::VaError};

/// Hardware call layer behind a [`VaDisplay`].
///
/// Calls are serialized by the display lock, so implementations never see
/// two of them at once.
///
/// # Example
/// ```rust,ignore
/// use pixpack_va::prelude::*;
///
/// struct Driver;
/// impl VaBackend for Driver {
///     fn create_buffer(&mut self, _: ContextId, _: BufferKind, _: usize) -> Result<BufferId, VaError> { todo!() }
///     fn destroy_buffer(&mut self, _: BufferId) {}
///     fn map_buffer(&mut self, id: BufferId) -> Result<MappedSegments, VaError> { Err(VaError::MapFailed(id)) }
///     fn unmap_buffer(&mut self, _: BufferId) {}
/// }
/// ```
pub trait VaBackend: Send + 'static {
    /// Allocate a buffer of exactly `size` bytes bound to `context`.
    fn create_buffer(
        &mut self,
        context: ContextId,
        kind: BufferKind,
        size: usize,
    ) -> Result<BufferId, VaError>;

    /// Release a buffer handle.
    fn destroy_buffer(&mut self, buffer: BufferId);

    /// Map the filled content of a buffer.
    fn map_buffer(&mut self, buffer: BufferId) -> Result<MappedSegments, VaError>;

    /// Release a mapping obtained from [`VaBackend::map_buffer`].
    fn unmap_buffer(&mut self, buffer: BufferId);
}

/// Shared handle to a hardware display.
///
/// Every method takes the display lock for the duration of a single
/// backend call only.
#[derive(Clone)]
pub struct VaDisplay {
    backend: Arc<Mutex<Box<dyn VaBackend>>>,
}

impl VaDisplay {
    pub fn new(backend: impl VaBackend) -> Self {
        Self {
            backend: Arc::new(Mutex::new(Box::new(backend))),
        }
    }

    pub fn create_buffer(
        &self,
        context: ContextId,
        kind: BufferKind,
        size: usize,
    ) -> Result<BufferId, VaError> {
        self.backend.lock().create_buffer(context, kind, size)
    }

    pub fn destroy_buffer(&self, buffer: BufferId) {
        self.backend.lock().destroy_buffer(buffer)
    }

    pub fn map_buffer(&self, buffer: BufferId) -> Result<MappedSegments, VaError> {
        self.backend.lock().map_buffer(buffer)
    }

    pub fn unmap_buffer(&self, buffer: BufferId) {
        self.backend.lock().unmap_buffer(buffer)
    }

    /// Whether two handles refer to the same display.
    pub fn same_display(&self, other: &VaDisplay) -> bool {
        Arc::ptr_eq(&self.backend, &other.backend)
    }
}

impl fmt::Debug for VaDisplay {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("VaDisplay")
            .field("handles", &Arc::strong_count(&self.backend))
            .finish()
    }
}

/// A display plus the encoding context buffers are created for.
#[derive(Debug, Clone)]
pub struct VaContext {
    display: VaDisplay,
    id: ContextId,
}

impl VaContext {
    pub fn new(display: VaDisplay, id: ContextId) -> Self {
        Self { display, id }
    }

    pub fn display(&self) -> &VaDisplay {
        &self.display
    }

    pub fn id(&self) -> ContextId {
        self.id
    }
}
