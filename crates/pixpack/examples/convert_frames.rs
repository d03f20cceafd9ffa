use pixpack::prelude::*;

fn frame(pool: &BufferPool, format: VideoFormat, res: Resolution, ts: u64) -> FrameLease {
    let meta = FrameMeta::new(MediaFormat::new(format, res), ts);
    let info = VideoInfo::new(format, res).expect("pixel format");
    FrameLease::from_video_info(meta, &info, pool)
}

fn main() -> Result<(), Error> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let res = Resolution::new(320, 240).unwrap();
    let pool = BufferPool::with_limits(8, 320 * 240 * 4, 16);

    // Horizontal luma ramp over flat chroma.
    let mut source = frame(&pool, VideoFormat::I420, res, 0);
    {
        let mut planes = source.planes_mut();
        for y in 0..res.height() {
            let line = &mut planes[0].line_mut(y)[..res.width()];
            for (x, px) in line.iter_mut().enumerate() {
                *px = (16 + x * 219 / res.width()) as u8;
            }
        }
        planes[1].data().fill(96);
        planes[2].data().fill(160);
    }

    let converter = FrameConverter::new(ConvertOptions::default());
    for (ts, target) in [
        VideoFormat::Yuy2,
        VideoFormat::Nv12,
        VideoFormat::V210,
        VideoFormat::Y444,
        VideoFormat::Gray16Le,
    ]
    .into_iter()
    .enumerate()
    {
        let mut out = frame(&pool, target, res, ts as u64 + 1);
        converter.convert(&source, &mut out)?;
        let first = out
            .planes()
            .first()
            .and_then(|p| p.data().first())
            .copied()
            .unwrap_or_default();
        println!("{} -> {} first_byte={first:#04x}", source.meta().format, out.meta().format);
    }

    // RGB and YUV need a color matrix, which the line routines do not do.
    let mut rgb = frame(&pool, VideoFormat::Rgb, res, 99);
    if let Err(err) = converter.convert(&source, &mut rgb) {
        let err = Error::from(err);
        println!("expected rejection [{}]: {err}", err.code());
    }

    let stats = converter.stats();
    println!(
        "converted={} rejected={} avg_ms={:.3?} last_ms={:.3?}",
        stats.processed(),
        stats.errors(),
        stats.avg_millis(),
        stats.last_millis()
    );
    let metrics = pool.metrics();
    tracing::info!(
        hits = metrics.hits(),
        misses = metrics.misses(),
        allocations = metrics.allocations(),
        "frame buffer pool"
    );
    Ok(())
}
