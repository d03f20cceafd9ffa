//! Bounded pool of coded buffers of one fixed size.

use std::{collections::VecDeque, sync::Arc};

use parking_lot::Mutex;
use pixpack_core::metrics::Metrics;
use tracing::{debug, warn};

use crate::{coded_buffer::CodedBuffer, display::VaContext, error::VaError};

/// Default number of buffers a pool may hold (lent plus free).
pub const DEFAULT_POOL_CAPACITY: usize = 4;
/// Default coded buffer size in bytes.
pub const DEFAULT_CODED_BUFFER_SIZE: usize = 1 << 20;

/// Sizing of a [`CodedBufferPool`].
///
/// A `capacity` of zero leaves the pool unbounded.
///
/// # Example
/// ```rust
/// use pixpack_va::prelude::*;
///
/// let cfg = CodedBufferPoolConfig { buffer_size: 0, ..Default::default() }.sanitized();
/// assert_eq!(cfg.buffer_size, 1);
/// ```
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[cfg_attr(feature = "serde", serde(default))]
pub struct CodedBufferPoolConfig {
    pub capacity: usize,
    pub buffer_size: usize,
}

impl Default for CodedBufferPoolConfig {
    fn default() -> Self {
        Self {
            capacity: DEFAULT_POOL_CAPACITY,
            buffer_size: DEFAULT_CODED_BUFFER_SIZE,
        }
    }
}

impl CodedBufferPoolConfig {
    pub fn sanitized(self) -> Self {
        Self {
            capacity: self.capacity,
            buffer_size: self.buffer_size.max(1),
        }
    }
}

#[derive(Debug)]
struct PoolState {
    capacity: usize,
    free: VecDeque<Arc<CodedBuffer>>,
    used: Vec<Arc<CodedBuffer>>,
}

impl PoolState {
    fn allocated(&self) -> usize {
        self.free.len() + self.used.len()
    }

    fn at_capacity(&self) -> bool {
        self.capacity != 0 && self.allocated() >= self.capacity
    }
}

#[derive(Debug)]
struct PoolInner {
    context: VaContext,
    buffer_size: usize,
    state: Mutex<PoolState>,
    metrics: Arc<Metrics>,
}

/// Lazily grown pool of [`CodedBuffer`]s.
///
/// Buffers are allocated on demand until `capacity` is reached and reused
/// in FIFO order after they come back through
/// [`CodedBufferPool::put_object`]. Clones share the same pool.
///
/// # Example
/// ```rust
/// use pixpack_va::prelude::*;
///
/// let backend = VirtualDisplay::new();
/// let ctx = VaContext::new(backend.display(), ContextId(0));
/// let pool = CodedBufferPool::new(ctx, CodedBufferPoolConfig { capacity: 1, buffer_size: 256 });
///
/// let buf = pool.get_object().unwrap();
/// assert!(pool.get_object().is_none());
/// pool.put_object(&buf);
/// assert!(pool.get_object().is_some());
/// assert_eq!(pool.metrics().backpressure(), 1);
/// ```
#[derive(Debug, Clone)]
pub struct CodedBufferPool {
    inner: Arc<PoolInner>,
}

impl CodedBufferPool {
    pub fn new(context: VaContext, config: CodedBufferPoolConfig) -> Self {
        let config = config.sanitized();
        Self {
            inner: Arc::new(PoolInner {
                context,
                buffer_size: config.buffer_size,
                state: Mutex::new(PoolState {
                    capacity: config.capacity,
                    free: VecDeque::new(),
                    used: Vec::new(),
                }),
                metrics: Arc::new(Metrics::default()),
            }),
        }
    }

    /// Borrow a buffer, allocating one if the free list is empty.
    ///
    /// Returns `None` when the pool is at capacity or the allocation fails.
    pub fn get_object(&self) -> Option<Arc<CodedBuffer>> {
        let metrics = &self.inner.metrics;
        let mut state = self.inner.state.lock();
        if let Some(buffer) = state.free.pop_front() {
            metrics.hit();
            state.used.push(Arc::clone(&buffer));
            return Some(buffer);
        }
        metrics.miss();
        if state.at_capacity() {
            metrics.backpressure();
            debug!(capacity = state.capacity, "coded buffer pool exhausted");
            return None;
        }
        match CodedBuffer::new(&self.inner.context, self.inner.buffer_size) {
            Ok(buffer) => {
                metrics.alloc();
                state.used.push(Arc::clone(&buffer));
                Some(buffer)
            }
            Err(err) => {
                warn!(error = %err, size = self.inner.buffer_size, "coded buffer allocation failed");
                None
            }
        }
    }

    /// Return a buffer obtained from [`CodedBufferPool::get_object`].
    ///
    /// Unknown buffers and second releases of the same buffer are ignored.
    pub fn put_object(&self, buffer: &Arc<CodedBuffer>) {
        let surplus = {
            let mut state = self.inner.state.lock();
            let Some(pos) = state.used.iter().position(|b| Arc::ptr_eq(b, buffer)) else {
                warn!(buffer = %buffer.id(), "buffer returned to a pool that did not lend it");
                return;
            };
            let returned = state.used.swap_remove(pos);
            self.inner.metrics.release();
            if state.capacity != 0 && state.allocated() >= state.capacity {
                Some(returned)
            } else {
                state.free.push_back(returned);
                None
            }
        };
        if let Some(buffer) = surplus {
            debug!(buffer = %buffer.id(), "releasing surplus coded buffer");
        }
    }

    /// Allocate free buffers until at least `count` exist, bounded by capacity.
    pub fn reserve(&self, count: usize) -> Result<(), VaError> {
        let mut state = self.inner.state.lock();
        while state.allocated() < count && !state.at_capacity() {
            let buffer = CodedBuffer::new(&self.inner.context, self.inner.buffer_size)?;
            self.inner.metrics.alloc();
            state.free.push_back(buffer);
        }
        Ok(())
    }

    pub fn capacity(&self) -> usize {
        self.inner.state.lock().capacity
    }

    /// Change the capacity; free buffers above the new limit are released.
    pub fn set_capacity(&self, capacity: usize) {
        let mut surplus = Vec::new();
        {
            let mut state = self.inner.state.lock();
            state.capacity = capacity;
            while state.capacity != 0 && state.allocated() > state.capacity {
                let Some(buffer) = state.free.pop_back() else {
                    break;
                };
                surplus.push(buffer);
            }
        }
        debug!(capacity, released = surplus.len(), "coded buffer pool resized");
    }

    /// Buffers currently borrowed.
    pub fn lent(&self) -> usize {
        self.inner.state.lock().used.len()
    }

    /// Buffers waiting on the free list.
    pub fn free_len(&self) -> usize {
        self.inner.state.lock().free.len()
    }

    /// Buffers owned by the pool, lent or free.
    pub fn allocated(&self) -> usize {
        self.inner.state.lock().allocated()
    }

    pub fn buffer_size(&self) -> usize {
        self.inner.buffer_size
    }

    pub fn context(&self) -> &VaContext {
        &self.inner.context
    }

    pub fn metrics(&self) -> CodedBufferPoolMetrics {
        CodedBufferPoolMetrics(Arc::clone(&self.inner.metrics))
    }
}

/// Live view of a coded buffer pool's counters.
#[derive(Clone)]
pub struct CodedBufferPoolMetrics(Arc<Metrics>);

impl CodedBufferPoolMetrics {
    pub fn hits(&self) -> u64 {
        self.0.hits()
    }

    pub fn misses(&self) -> u64 {
        self.0.misses()
    }

    pub fn allocations(&self) -> u64 {
        self.0.allocations()
    }

    /// Requests refused at capacity.
    pub fn backpressure(&self) -> u64 {
        self.0.backpressure_count()
    }

    pub fn releases(&self) -> u64 {
        self.0.releases()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{ContextId, virtual_backend::VirtualDisplay};

    fn make_pool(capacity: usize) -> (VirtualDisplay, CodedBufferPool) {
        let backend = VirtualDisplay::new();
        let ctx = VaContext::new(backend.display(), ContextId(1));
        let pool = CodedBufferPool::new(
            ctx,
            CodedBufferPoolConfig {
                capacity,
                buffer_size: 128,
            },
        );
        (backend, pool)
    }

    #[test]
    fn grows_lazily_up_to_capacity() {
        let (backend, pool) = make_pool(2);
        assert_eq!(backend.live_buffers(), 0);
        let a = pool.get_object().unwrap();
        let b = pool.get_object().unwrap();
        assert!(pool.get_object().is_none());
        assert_eq!(pool.lent(), 2);
        assert_eq!(backend.live_buffers(), 2);
        assert_eq!(a.requested_size(), 128);

        pool.put_object(&a);
        let c = pool.get_object().unwrap();
        assert!(Arc::ptr_eq(&a, &c));
        pool.put_object(&b);
        pool.put_object(&c);

        let m = pool.metrics();
        assert_eq!(m.allocations(), 2);
        assert_eq!(m.hits(), 1);
        assert_eq!(m.misses(), 3);
        assert_eq!(m.backpressure(), 1);
        assert_eq!(m.releases(), 3);
        assert_eq!(pool.free_len(), 2);
    }

    #[test]
    fn double_release_is_ignored() {
        let (_backend, pool) = make_pool(2);
        let a = pool.get_object().unwrap();
        pool.put_object(&a);
        pool.put_object(&a);
        assert_eq!(pool.free_len(), 1);
        assert_eq!(pool.metrics().releases(), 1);

        let (_other_backend, other) = make_pool(1);
        let foreign = other.get_object().unwrap();
        pool.put_object(&foreign);
        assert_eq!(pool.allocated(), 1);
    }

    #[test]
    fn zero_capacity_is_unbounded() {
        let (_backend, pool) = make_pool(0);
        let held: Vec<_> = (0..16).map(|_| pool.get_object().unwrap()).collect();
        assert_eq!(pool.lent(), 16);
        for b in &held {
            pool.put_object(b);
        }
        assert_eq!(pool.free_len(), 16);
    }

    #[test]
    fn reserve_respects_capacity() {
        let (backend, pool) = make_pool(3);
        pool.reserve(5).unwrap();
        assert_eq!(pool.free_len(), 3);
        assert_eq!(backend.live_buffers(), 3);

        let _lent = pool.get_object().unwrap();
        pool.set_capacity(1);
        assert_eq!(pool.free_len(), 0);
        assert_eq!(backend.live_buffers(), 1);
    }

    #[test]
    fn release_over_capacity_drops_buffer() {
        let (backend, pool) = make_pool(2);
        let a = pool.get_object().unwrap();
        let b = pool.get_object().unwrap();
        pool.set_capacity(1);
        assert_eq!(pool.allocated(), 2);

        pool.put_object(&a);
        assert_eq!(pool.free_len(), 0);
        assert_eq!(backend.live_buffers(), 2);
        drop(a);
        assert_eq!(backend.live_buffers(), 1);

        pool.put_object(&b);
        assert_eq!(pool.free_len(), 1);
    }

    #[test]
    fn allocation_failure_returns_none() {
        let (backend, pool) = make_pool(2);
        backend.set_fail_create(true);
        assert!(pool.get_object().is_none());
        assert!(pool.reserve(1).is_err());
        assert_eq!(pool.allocated(), 0);
        backend.set_fail_create(false);
        assert!(pool.get_object().is_some());
    }
}
