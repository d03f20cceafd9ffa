use std::sync::atomic::{AtomicU64, Ordering};

/// Relaxed counters shared by the CPU and coded-buffer pools.
///
/// # Example
/// ```rust
/// use pixpack_core::metrics::Metrics;
///
/// let metrics = Metrics::default();
/// metrics.hit();
/// metrics.release();
/// assert_eq!(metrics.hits(), 1);
/// assert_eq!(metrics.releases(), 1);
/// ```
#[derive(Debug, Default)]
pub struct Metrics {
    hits: AtomicU64,
    misses: AtomicU64,
    allocations: AtomicU64,
    backpressure: AtomicU64,
    releases: AtomicU64,
}

impl Metrics {
    /// A request was served from the free list.
    pub fn hit(&self) {
        self.hits.fetch_add(1, Ordering::Relaxed);
    }

    /// A request found the free list empty.
    pub fn miss(&self) {
        self.misses.fetch_add(1, Ordering::Relaxed);
    }

    /// A new buffer was allocated.
    pub fn alloc(&self) {
        self.allocations.fetch_add(1, Ordering::Relaxed);
    }

    /// A request was refused because the pool is at capacity.
    pub fn backpressure(&self) {
        self.backpressure.fetch_add(1, Ordering::Relaxed);
    }

    /// A buffer came back to the pool.
    pub fn release(&self) {
        self.releases.fetch_add(1, Ordering::Relaxed);
    }

    pub fn hits(&self) -> u64 {
        self.hits.load(Ordering::Relaxed)
    }

    pub fn misses(&self) -> u64 {
        self.misses.load(Ordering::Relaxed)
    }

    pub fn allocations(&self) -> u64 {
        self.allocations.load(Ordering::Relaxed)
    }

    pub fn backpressure_count(&self) -> u64 {
        self.backpressure.load(Ordering::Relaxed)
    }

    pub fn releases(&self) -> u64 {
        self.releases.load(Ordering::Relaxed)
    }
}

impl Clone for Metrics {
    fn clone(&self) -> Self {
        let cloned = Metrics::default();
        cloned.hits.store(self.hits(), Ordering::Relaxed);
        cloned.misses.store(self.misses(), Ordering::Relaxed);
        cloned
            .allocations
            .store(self.allocations(), Ordering::Relaxed);
        cloned
            .backpressure
            .store(self.backpressure_count(), Ordering::Relaxed);
        cloned.releases.store(self.releases(), Ordering::Relaxed);
        cloned
    }
}
