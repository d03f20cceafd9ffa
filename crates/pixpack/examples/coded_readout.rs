use std::sync::{
    Arc,
    atomic::{AtomicUsize, Ordering},
};

use pixpack::prelude::*;

/// Fake access unit: start code, NAL header, then a frame counter.
fn access_unit(frame: u32) -> Vec<u8> {
    let mut au = vec![0, 0, 0, 1, if frame % 8 == 0 { 0x65 } else { 0x41 }];
    au.extend_from_slice(&frame.to_be_bytes());
    au
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let backend = VirtualDisplay::new();
    let context = VaContext::new(backend.display(), ContextId(1));
    let pool = CodedBufferPool::new(
        context,
        CodedBufferPoolConfig {
            capacity: 3,
            buffer_size: 64 * 1024,
        },
    );
    pool.reserve(2)?;

    let cpu = BufferPool::with_capacity(4, 64 * 1024);
    let released = Arc::new(AtomicUsize::new(0));
    let mut in_flight = Vec::new();
    let mut total_bytes = 0;

    for frame in 0..16u32 {
        // Keep up to three frames in flight, like an encoder with lookahead.
        if in_flight.len() == 3 {
            let proxy: CodedBufferProxy = in_flight.remove(0);
            let bitstream = read_coded_output(&proxy, &cpu)?;
            total_bytes += bitstream.len();
        }

        let proxy = CodedBufferProxy::new_from_pool(&pool).ok_or(Error::PoolExhausted)?;
        let counter = Arc::clone(&released);
        proxy.set_destroy_notify(move || {
            counter.fetch_add(1, Ordering::Relaxed);
        });
        proxy.set_user_data(Arc::new(frame), |_| {});

        let header = access_unit(frame);
        let payload = vec![0xa5; 100 + frame as usize * 10];
        backend.fill(proxy.buffer().id(), &[header.as_slice(), payload.as_slice()]);
        in_flight.push(proxy);
    }

    for proxy in in_flight.drain(..) {
        let frame = proxy
            .user_data()
            .and_then(|d| d.downcast_ref::<u32>().copied())
            .unwrap_or_default();
        let bitstream = read_coded_output(&proxy, &cpu)?;
        println!("frame {frame}: {} bytes", bitstream.len());
        total_bytes += bitstream.len();
    }

    let metrics = pool.metrics();
    let calls = backend.calls();
    println!(
        "read {total_bytes} bytes; released={} hits={} misses={} allocations={} backpressure={}",
        released.load(Ordering::Relaxed),
        metrics.hits(),
        metrics.misses(),
        metrics.allocations(),
        metrics.backpressure()
    );
    tracing::info!(
        created = calls.created,
        mapped = calls.mapped,
        unmapped = calls.unmapped,
        live = backend.live_buffers(),
        "virtual display calls"
    );
    Ok(())
}
