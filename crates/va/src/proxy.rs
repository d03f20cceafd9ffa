//! Short-lived handle pairing a borrowed coded buffer with its pool.

use std::{any::Any, fmt, sync::Arc};

use parking_lot::Mutex;
use tracing::trace;

use crate::{coded_buffer::CodedBuffer, error::VaError, pool::CodedBufferPool};

/// Opaque value attached to a proxy.
pub type UserData = Arc<dyn Any + Send + Sync>;

type DestroyNotify = Box<dyn FnOnce() + Send>;
type UserDataDestroy = Box<dyn FnOnce(UserData) + Send>;

struct PoolLease {
    pool: CodedBufferPool,
    buffer: Arc<CodedBuffer>,
}

impl Drop for PoolLease {
    fn drop(&mut self) {
        self.pool.put_object(&self.buffer);
        trace!(buffer = %self.buffer.id(), "proxy returned buffer");
    }
}

#[derive(Default)]
struct Hooks {
    destroy_notify: Option<DestroyNotify>,
    user_data: Option<(UserData, UserDataDestroy)>,
}

impl Drop for Hooks {
    fn drop(&mut self) {
        if let Some(notify) = self.destroy_notify.take() {
            notify();
        }
        if let Some((data, destroy)) = self.user_data.take() {
            destroy(data);
        }
    }
}

// Field order is teardown order: the buffer goes back to the pool and its
// reference is dropped before any hook fires.
struct ProxyInner {
    lease: PoolLease,
    hooks: Mutex<Hooks>,
}

/// Shared handle to a coded buffer borrowed from a [`CodedBufferPool`].
///
/// Clones share one proxy. When the last clone drops, the buffer returns to
/// its pool, then the destroy notify fires, then the user-data destroy.
///
/// # Example
/// ```rust
/// use std::sync::{Arc, atomic::{AtomicBool, Ordering}};
/// use pixpack_va::prelude::*;
///
/// let backend = VirtualDisplay::new();
/// let ctx = VaContext::new(backend.display(), ContextId(0));
/// let pool = CodedBufferPool::new(ctx, CodedBufferPoolConfig::default());
///
/// let proxy = CodedBufferProxy::new_from_pool(&pool).unwrap();
/// let gone = Arc::new(AtomicBool::new(false));
/// let flag = Arc::clone(&gone);
/// proxy.set_destroy_notify(move || flag.store(true, Ordering::SeqCst));
///
/// assert_eq!(pool.lent(), 1);
/// drop(proxy);
/// assert!(gone.load(Ordering::SeqCst));
/// assert_eq!(pool.lent(), 0);
/// ```
#[derive(Clone)]
pub struct CodedBufferProxy {
    inner: Arc<ProxyInner>,
}

impl CodedBufferProxy {
    /// Borrow a buffer from `pool`; `None` if the pool has none to lend.
    pub fn new_from_pool(pool: &CodedBufferPool) -> Option<Self> {
        let buffer = pool.get_object()?;
        Some(Self {
            inner: Arc::new(ProxyInner {
                lease: PoolLease {
                    pool: pool.clone(),
                    buffer,
                },
                hooks: Mutex::new(Hooks::default()),
            }),
        })
    }

    pub fn buffer(&self) -> &Arc<CodedBuffer> {
        &self.inner.lease.buffer
    }

    pub fn pool(&self) -> &CodedBufferPool {
        &self.inner.lease.pool
    }

    /// Filled size of the underlying buffer.
    pub fn buffer_size(&self) -> Result<usize, VaError> {
        self.buffer().size()
    }

    /// Register the callback fired once the buffer has gone back to the pool.
    ///
    /// A previously registered callback is discarded without being called.
    pub fn set_destroy_notify(&self, notify: impl FnOnce() + Send + 'static) {
        let previous = self
            .inner
            .hooks
            .lock()
            .destroy_notify
            .replace(Box::new(notify));
        drop(previous);
    }

    /// Attach `data`, calling the destroy of any value already attached
    /// before storing it.
    pub fn set_user_data(
        &self,
        data: UserData,
        destroy: impl FnOnce(UserData) + Send + 'static,
    ) {
        let mut entry: Option<(UserData, UserDataDestroy)> = Some((data, Box::new(destroy)));
        loop {
            let (old, old_destroy) = {
                let mut hooks = self.inner.hooks.lock();
                match hooks.user_data.take() {
                    Some(previous) => previous,
                    None => {
                        hooks.user_data = entry.take();
                        return;
                    }
                }
            };
            old_destroy(old);
        }
    }

    pub fn user_data(&self) -> Option<UserData> {
        self.inner
            .hooks
            .lock()
            .user_data
            .as_ref()
            .map(|(data, _)| Arc::clone(data))
    }

    /// Whether both handles share one proxy.
    pub fn ptr_eq(&self, other: &CodedBufferProxy) -> bool {
        Arc::ptr_eq(&self.inner, &other.inner)
    }

    /// Point `slot` at `new`, dropping what it held before.
    ///
    /// Returns `false` when the slot already held the same proxy.
    pub fn replace(slot: &mut Option<CodedBufferProxy>, new: Option<&CodedBufferProxy>) -> bool {
        let same = match (slot.as_ref(), new) {
            (Some(a), Some(b)) => a.ptr_eq(b),
            (None, None) => true,
            _ => false,
        };
        if same {
            return false;
        }
        *slot = new.cloned();
        true
    }
}

impl fmt::Debug for CodedBufferProxy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("CodedBufferProxy")
            .field("buffer", &self.buffer().id())
            .field("refs", &Arc::strong_count(&self.inner))
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use std::thread;

    use super::*;
    use crate::{
        ContextId, display::VaContext, pool::CodedBufferPoolConfig,
        virtual_backend::VirtualDisplay,
    };

    fn make_pool(capacity: usize) -> (VirtualDisplay, CodedBufferPool) {
        let backend = VirtualDisplay::new();
        let ctx = VaContext::new(backend.display(), ContextId(3));
        let pool = CodedBufferPool::new(
            ctx,
            CodedBufferPoolConfig {
                capacity,
                buffer_size: 64,
            },
        );
        (backend, pool)
    }

    type Log = Arc<Mutex<Vec<String>>>;

    #[test]
    fn capacity_bounds_live_proxies() {
        let (backend, pool) = make_pool(3);
        let proxies: Vec<_> = (0..3)
            .map(|_| CodedBufferProxy::new_from_pool(&pool).unwrap())
            .collect();
        assert!(CodedBufferProxy::new_from_pool(&pool).is_none());
        drop(proxies);

        let again: Vec<_> = (0..3)
            .map(|_| CodedBufferProxy::new_from_pool(&pool).unwrap())
            .collect();
        assert_eq!(again.len(), 3);
        assert_eq!(backend.calls().created, 3);
    }

    #[test]
    fn release_one_then_borrow_again() {
        let (backend, pool) = make_pool(3);
        let mut proxies: Vec<_> = (0..3)
            .map(|_| CodedBufferProxy::new_from_pool(&pool).unwrap())
            .collect();
        let released = proxies.remove(1);
        let released_id = released.buffer().id();
        drop(released);

        let next = CodedBufferProxy::new_from_pool(&pool).unwrap();
        assert_eq!(next.buffer().id(), released_id);
        assert_eq!(pool.allocated(), 3);
        assert_eq!(backend.live_buffers(), 3);
    }

    #[test]
    fn proxy_holds_its_own_buffer_reference() {
        let (_backend, pool) = make_pool(1);
        let proxy = CodedBufferProxy::new_from_pool(&pool).unwrap();
        assert_eq!(Arc::strong_count(proxy.buffer()), 2);
        let clone = proxy.clone();
        drop(proxy);
        assert_eq!(pool.lent(), 1);
        drop(clone);
        assert_eq!(pool.lent(), 0);
        assert_eq!(pool.free_len(), 1);
    }

    #[test]
    fn teardown_order() {
        let (_backend, pool) = make_pool(1);
        let log: Log = Arc::default();
        let proxy = CodedBufferProxy::new_from_pool(&pool).unwrap();

        let (l, p) = (Arc::clone(&log), pool.clone());
        proxy.set_destroy_notify(move || l.lock().push(format!("notify lent={}", p.lent())));
        let l = Arc::clone(&log);
        proxy.set_user_data(Arc::new(5u32), move |d| {
            let v = d.downcast_ref::<u32>().copied();
            l.lock().push(format!("user {v:?}"));
        });

        drop(proxy);
        assert_eq!(*log.lock(), ["notify lent=0", "user Some(5)"]);
    }

    #[test]
    fn user_data_replacement_fires_old_destroy_first() {
        let (_backend, pool) = make_pool(1);
        let log: Log = Arc::default();
        let proxy = CodedBufferProxy::new_from_pool(&pool).unwrap();
        assert!(proxy.user_data().is_none());

        for name in ["first", "second"] {
            let l = Arc::clone(&log);
            proxy.set_user_data(Arc::new(name), move |_| l.lock().push(format!("drop {name}")));
            assert_user_data(&proxy, name);
        }
        assert_eq!(*log.lock(), ["drop first"]);
        drop(proxy);
        assert_eq!(*log.lock(), ["drop first", "drop second"]);
    }

    fn assert_user_data(proxy: &CodedBufferProxy, expected: &str) {
        let data = proxy.user_data().unwrap();
        assert_eq!(data.downcast_ref::<&str>(), Some(&expected));
    }

    #[test]
    fn replaced_notify_never_fires() {
        let (_backend, pool) = make_pool(1);
        let log: Log = Arc::default();
        let proxy = CodedBufferProxy::new_from_pool(&pool).unwrap();
        for name in ["old", "new"] {
            let l = Arc::clone(&log);
            proxy.set_destroy_notify(move || l.lock().push(name.to_string()));
        }
        drop(proxy);
        assert_eq!(*log.lock(), ["new"]);
    }

    #[test]
    fn replace_handles_same_object() {
        let (_backend, pool) = make_pool(2);
        let a = CodedBufferProxy::new_from_pool(&pool).unwrap();
        let b = CodedBufferProxy::new_from_pool(&pool).unwrap();
        let mut slot = None;

        assert!(!CodedBufferProxy::replace(&mut slot, None));
        assert!(CodedBufferProxy::replace(&mut slot, Some(&a)));
        drop(a);
        let held = slot.clone().unwrap();
        assert!(!CodedBufferProxy::replace(&mut slot, Some(&held)));
        drop(held);
        assert_eq!(pool.lent(), 2);

        assert!(CodedBufferProxy::replace(&mut slot, Some(&b)));
        assert_eq!(pool.lent(), 1);
        assert!(CodedBufferProxy::replace(&mut slot, None));
        drop(b);
        assert_eq!(pool.lent(), 0);
    }

    #[test]
    fn concurrent_borrow_and_release() {
        let (backend, pool) = make_pool(4);
        thread::scope(|s| {
            for _ in 0..8 {
                let pool = pool.clone();
                s.spawn(move || {
                    for _ in 0..200 {
                        if let Some(proxy) = CodedBufferProxy::new_from_pool(&pool) {
                            let _ = proxy.buffer_size();
                        }
                    }
                });
            }
        });
        assert_eq!(pool.lent(), 0);
        assert!(pool.allocated() <= 4);
        let calls = backend.calls();
        assert_eq!(calls.mapped, calls.unmapped);
        assert_eq!(calls.created as usize, pool.allocated());
    }
}
