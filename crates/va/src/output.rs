//! Copying encoder output into CPU memory.

use pixpack_core::prelude::{BufferLease, BufferPool};
use tracing::debug;

use crate::{error::VaError, proxy::CodedBufferProxy};

/// Copy the coded data behind `proxy` into a buffer leased from `pool`.
///
/// The lease is trimmed to the bytes actually copied. The hardware buffer
/// is unmapped again whether or not the copy succeeds.
///
/// # Example
/// ```rust
/// use pixpack_va::prelude::*;
///
/// let backend = VirtualDisplay::new();
/// let ctx = VaContext::new(backend.display(), ContextId(0));
/// let pool = CodedBufferPool::new(ctx, CodedBufferPoolConfig::default());
/// let proxy = CodedBufferProxy::new_from_pool(&pool).unwrap();
/// backend.fill(proxy.buffer().id(), &[b"\x00\x00\x01".as_slice(), b"\x65".as_slice()]);
///
/// let cpu = BufferPool::with_capacity(2, 4096);
/// let out = read_coded_output(&proxy, &cpu).unwrap();
/// assert_eq!(out.as_slice(), b"\x00\x00\x01\x65");
/// ```
pub fn read_coded_output(
    proxy: &CodedBufferProxy,
    pool: &BufferPool,
) -> Result<BufferLease, VaError> {
    let buffer = proxy.buffer();
    let size = buffer.size()?;
    let mut lease = pool.lease();
    lease.resize(size);
    let written = buffer.copy_into(lease.as_mut_slice())?;
    lease.resize(written);
    debug!(buffer = %buffer.id(), bytes = written, "read coded output");
    Ok(lease)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        ContextId,
        display::VaContext,
        pool::{CodedBufferPool, CodedBufferPoolConfig},
        virtual_backend::VirtualDisplay,
    };

    #[test]
    fn empty_buffer_reads_empty() {
        let backend = VirtualDisplay::new();
        let ctx = VaContext::new(backend.display(), ContextId(0));
        let pool = CodedBufferPool::new(ctx, CodedBufferPoolConfig::default());
        let proxy = CodedBufferProxy::new_from_pool(&pool).unwrap();
        let cpu = BufferPool::with_capacity(1, 16);

        assert!(read_coded_output(&proxy, &cpu).unwrap().is_empty());
        backend.set_fail_map(true);
        assert!(read_coded_output(&proxy, &cpu).is_err());

        let calls = backend.calls();
        assert_eq!(calls.mapped, calls.unmapped + 1);
        assert!(!proxy.buffer().is_mapped());
    }
}
