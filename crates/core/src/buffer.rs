use parking_lot::Mutex;
use smallvec::{SmallVec, smallvec};
use std::sync::Arc;

use crate::{
    format::MediaFormat,
    info::VideoInfo,
    metrics::Metrics,
    registry::MAX_PLANES,
};

/// Metadata associated with a frame.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::{FrameMeta, MediaFormat, Resolution, VideoFormat};
///
/// let res = Resolution::new(640, 480).unwrap();
/// let meta = FrameMeta::new(MediaFormat::new(VideoFormat::Nv12, res), 123);
/// assert_eq!(meta.timestamp, 123);
/// ```
#[derive(Debug, Clone)]
pub struct FrameMeta {
    /// Format describing layout and resolution.
    pub format: MediaFormat,
    /// Timestamp in ticks or nanoseconds (caller-defined).
    pub timestamp: u64,
}

impl FrameMeta {
    /// Create metadata with the given format and timestamp.
    pub fn new(format: MediaFormat, timestamp: u64) -> Self {
        Self { format, timestamp }
    }
}

/// Handle to a pooled buffer.
///
/// When dropped, the buffer is returned to the originating pool so the next
/// frame or bitstream readout can reuse the allocation.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::BufferPool;
///
/// let pool = BufferPool::with_capacity(2, 1024);
/// let mut lease = pool.lease();
/// lease.resize(16);
/// assert_eq!(lease.len(), 16);
/// ```
pub struct BufferLease {
    pool: Arc<PoolInner>,
    buf: Option<Vec<u8>>,
}

impl BufferLease {
    /// Borrow as an immutable slice.
    pub fn as_slice(&self) -> &[u8] {
        self.buf.as_deref().unwrap_or(&[])
    }

    /// Borrow as a mutable slice.
    pub fn as_mut_slice(&mut self) -> &mut [u8] {
        self.buf.as_deref_mut().unwrap_or(&mut [])
    }

    /// Current length of the buffer.
    pub fn len(&self) -> usize {
        self.buf.as_ref().map(|b| b.len()).unwrap_or(0)
    }

    /// Whether the buffer is empty.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Set the length to `len` bytes, zero-filling any newly exposed bytes.
    pub fn resize(&mut self, len: usize) {
        if let Some(buf) = self.buf.as_mut() {
            buf.resize(len, 0);
        }
    }

    /// Take the backing vector out of the pool's reach.
    pub fn into_vec(mut self) -> Vec<u8> {
        self.buf.take().unwrap_or_default()
    }
}

impl Drop for BufferLease {
    fn drop(&mut self) {
        if let Some(buf) = self.buf.take() {
            self.pool.recycle(buf);
        }
    }
}

/// Pool of reusable CPU byte buffers.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::BufferPool;
///
/// let pool = BufferPool::with_limits(4, 1 << 20, 8);
/// drop(pool.lease());
/// let _again = pool.lease();
/// assert_eq!(pool.metrics().hits(), 2);
/// ```
#[derive(Clone)]
pub struct BufferPool {
    inner: Arc<PoolInner>,
    metrics: Arc<Metrics>,
}

impl BufferPool {
    /// Create a pool with `capacity` preallocated buffers reserving `chunk_size` bytes each.
    pub fn with_capacity(capacity: usize, chunk_size: usize) -> Self {
        Self::with_limits(capacity, chunk_size, capacity)
    }

    /// Create a pool with `capacity` preallocated buffers and a maximum retained free list.
    pub fn with_limits(capacity: usize, chunk_size: usize, max_free: usize) -> Self {
        let free = (0..capacity).map(|_| Vec::with_capacity(chunk_size)).collect();
        Self {
            inner: Arc::new(PoolInner {
                free: Mutex::new(free),
                chunk_size,
                max_free,
            }),
            metrics: Arc::new(Metrics::default()),
        }
    }

    /// Acquire a buffer, allocating if the pool is empty.
    pub fn lease(&self) -> BufferLease {
        let recycled = self.inner.free.lock().pop();
        let buf = match recycled {
            Some(buf) => {
                self.metrics.hit();
                buf
            }
            None => {
                self.metrics.miss();
                self.metrics.alloc();
                Vec::with_capacity(self.inner.chunk_size)
            }
        };
        BufferLease {
            pool: self.inner.clone(),
            buf: Some(buf),
        }
    }

    /// Access metrics counters for this pool.
    pub fn metrics(&self) -> BufferPoolMetrics {
        BufferPoolMetrics(self.metrics.clone())
    }
}

struct PoolInner {
    free: Mutex<Vec<Vec<u8>>>,
    chunk_size: usize,
    max_free: usize,
}

impl PoolInner {
    fn recycle(&self, mut buf: Vec<u8>) {
        buf.clear();
        let mut free = self.free.lock();
        if free.len() < self.max_free {
            free.push(buf);
        }
    }
}

/// Observability for buffer pool behavior.
#[derive(Clone)]
pub struct BufferPoolMetrics(Arc<Metrics>);

impl BufferPoolMetrics {
    pub fn hits(&self) -> u64 {
        self.0.hits()
    }

    pub fn misses(&self) -> u64 {
        self.0.misses()
    }

    pub fn allocations(&self) -> u64 {
        self.0.allocations()
    }
}

/// Read-only view of one plane: its bytes and row stride.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::Plane;
///
/// let bytes = [1u8, 2, 3, 4, 5, 6];
/// let plane = Plane::new(&bytes, 3);
/// assert_eq!(plane.line(1), &[4, 5, 6]);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct Plane<'a> {
    data: &'a [u8],
    stride: usize,
}

/// Writable view of one plane.
#[derive(Debug)]
pub struct PlaneMut<'a> {
    data: &'a mut [u8],
    stride: usize,
}

impl<'a> Plane<'a> {
    pub fn new(data: &'a [u8], stride: usize) -> Self {
        Self { data, stride }
    }

    /// Access the raw bytes.
    pub fn data(&self) -> &'a [u8] {
        self.data
    }

    /// Stride in bytes for this plane.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Bytes from the start of row `line` to the end of the plane.
    ///
    /// Panics when `line` lies past the plane; callers size planes from
    /// [`VideoInfo`].
    pub fn line(&self, line: usize) -> &'a [u8] {
        &self.data[self.stride * line..]
    }
}

impl<'a> PlaneMut<'a> {
    pub fn new(data: &'a mut [u8], stride: usize) -> Self {
        Self { data, stride }
    }

    /// Mutable access to plane bytes.
    pub fn data(&mut self) -> &mut [u8] {
        self.data
    }

    /// Stride in bytes for this plane.
    pub fn stride(&self) -> usize {
        self.stride
    }

    /// Length of the plane in bytes.
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }

    /// Mutable bytes from the start of row `line` to the end of the plane.
    pub fn line_mut(&mut self, line: usize) -> &mut [u8] {
        &mut self.data[self.stride * line..]
    }

    /// Reborrow as a read-only plane.
    pub fn as_plane(&self) -> Plane<'_> {
        Plane {
            data: &*self.data,
            stride: self.stride,
        }
    }
}

/// Plane layout information stored with a frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PlaneLayout {
    /// Byte offset into the owning buffer.
    pub offset: usize,
    /// Length of the plane in bytes.
    pub len: usize,
    /// Stride in bytes.
    pub stride: usize,
}

/// Frame container holding one or more planes plus metadata.
///
/// # Example
/// ```rust
/// use pixpack_core::prelude::*;
///
/// let pool = BufferPool::with_capacity(3, 64);
/// let res = Resolution::new(4, 2).unwrap();
/// let info = VideoInfo::new(VideoFormat::I420, res).unwrap();
/// let meta = FrameMeta::new(MediaFormat::new(VideoFormat::I420, res), 0);
/// let frame = FrameLease::from_video_info(meta, &info, &pool);
/// assert_eq!(frame.planes().len(), 3);
/// assert_eq!(frame.planes()[1].stride(), 4);
/// ```
pub struct FrameLease {
    meta: FrameMeta,
    buffers: SmallVec<[BufferLease; MAX_PLANES]>,
    layouts: SmallVec<[PlaneLayout; MAX_PLANES]>,
}

impl FrameLease {
    /// Construct a single-plane frame using the provided buffer.
    pub fn single_plane(meta: FrameMeta, mut buffer: BufferLease, len: usize, stride: usize) -> Self {
        buffer.resize(len);
        Self {
            meta,
            layouts: smallvec![PlaneLayout {
                offset: 0,
                len,
                stride,
            }],
            buffers: smallvec![buffer],
        }
    }

    /// Construct a multi-plane frame from a list of buffers and layouts.
    pub fn multi_plane(
        meta: FrameMeta,
        buffers: SmallVec<[BufferLease; MAX_PLANES]>,
        layouts: SmallVec<[PlaneLayout; MAX_PLANES]>,
    ) -> Self {
        debug_assert_eq!(buffers.len(), layouts.len());
        Self {
            meta,
            buffers,
            layouts,
        }
    }

    /// Lease one zeroed buffer per plane sized from `info`.
    pub fn from_video_info(meta: FrameMeta, info: &VideoInfo, pool: &BufferPool) -> Self {
        let layouts = info.layouts();
        let buffers = layouts
            .iter()
            .map(|layout| {
                let mut lease = pool.lease();
                lease.resize(layout.len);
                lease
            })
            .collect();
        Self::multi_plane(meta, buffers, layouts)
    }

    /// Metadata describing this frame.
    pub fn meta(&self) -> &FrameMeta {
        &self.meta
    }

    /// Iterate planes as borrowed slices (zero-copy).
    pub fn planes(&self) -> SmallVec<[Plane<'_>; MAX_PLANES]> {
        self.layouts
            .iter()
            .zip(self.buffers.iter())
            .map(|(layout, buf)| {
                let slice = buf
                    .as_slice()
                    .get(layout.offset..layout.offset + layout.len)
                    .unwrap_or(&[]);
                Plane {
                    data: slice,
                    stride: layout.stride,
                }
            })
            .collect()
    }

    /// Iterate mutable planes for in-place writes.
    pub fn planes_mut(&mut self) -> SmallVec<[PlaneMut<'_>; MAX_PLANES]> {
        self.layouts
            .iter()
            .zip(self.buffers.iter_mut())
            .map(|(layout, buf)| {
                let len = layout.offset + layout.len;
                if buf.len() < len {
                    buf.resize(len);
                }
                let slice = buf
                    .as_mut_slice()
                    .get_mut(layout.offset..layout.offset + layout.len)
                    .unwrap_or(&mut []);
                PlaneMut {
                    data: slice,
                    stride: layout.stride,
                }
            })
            .collect()
    }

    /// Return a copy of plane layouts.
    pub fn layouts(&self) -> SmallVec<[PlaneLayout; MAX_PLANES]> {
        self.layouts.clone()
    }

    /// Convert into owned buffers and metadata.
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        FrameMeta,
        SmallVec<[PlaneLayout; MAX_PLANES]>,
        SmallVec<[Vec<u8>; MAX_PLANES]>,
    ) {
        let buffers = self.buffers.into_iter().map(BufferLease::into_vec).collect();
        (self.meta, self.layouts, buffers)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{format::Resolution, registry::VideoFormat};

    #[test]
    fn lease_returns_to_pool() {
        let pool = BufferPool::with_limits(0, 32, 1);
        let mut lease = pool.lease();
        lease.resize(8);
        lease.as_mut_slice()[0] = 7;
        drop(lease);
        let again = pool.lease();
        assert!(again.is_empty());
        assert_eq!(pool.metrics().misses(), 1);
        assert_eq!(pool.metrics().hits(), 1);
    }

    #[test]
    fn into_vec_detaches_from_pool() {
        let pool = BufferPool::with_capacity(1, 4);
        let mut lease = pool.lease();
        lease.resize(4);
        let owned = lease.into_vec();
        assert_eq!(owned.len(), 4);
        let _next = pool.lease();
        assert_eq!(pool.metrics().allocations(), 1);
    }

    #[test]
    fn frame_planes_follow_video_info() {
        let pool = BufferPool::with_capacity(2, 0);
        let res = Resolution::new(6, 4).unwrap();
        let info = VideoInfo::new(VideoFormat::Nv21, res).unwrap();
        let meta = FrameMeta::new(MediaFormat::new(VideoFormat::Nv21, res), 9);
        let mut frame = FrameLease::from_video_info(meta, &info, &pool);
        {
            let mut planes = frame.planes_mut();
            assert_eq!(planes.len(), 2);
            planes[1].line_mut(1)[0] = 0x42;
        }
        let planes = frame.planes();
        assert_eq!(planes[0].data().len(), 8 * 4);
        assert_eq!(planes[1].line(1)[0], 0x42);
        drop(planes);
        let (meta, layouts, bufs) = frame.into_parts();
        assert_eq!(meta.timestamp, 9);
        assert_eq!(layouts[1].stride, 8);
        assert_eq!(bufs[1][8], 0x42);
    }
}
