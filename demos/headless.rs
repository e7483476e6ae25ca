use osmlayer::{constants::TILE_SIZE, prelude::*};

/// Half the world-space extent a display of `pixels` covers at `zoom`
fn half_span(pixels: f64, zoom: u8) -> f64 {
    let tiles_across = pixels / TILE_SIZE as f64;
    360.0 / f64::from(1u32 << zoom) * tiles_across / 2.0
}

/// Drive the tile layer through a zoom sequence without a GPU or network
fn main() -> osmlayer::Result<()> {
    #[cfg(feature = "debug")]
    osmlayer::init_logging();

    println!("osmlayer headless example");
    println!("=========================");

    let (width, height) = (1024.0, 768.0);
    let loader = QueuedLoader::new();
    let options = CacheProfile::LowMemory.resolve();
    let mut layer = OsmLayer::new("osm", options, Box::new(loader.clone()))?;
    layer.init()?;

    let center = to_local(LatLng::new(37.7749, -122.4194))?; // San Francisco
    let center = center.as_slice()[0];
    let mut renderer = HeadlessRenderer::new(width, height);

    let start = Instant::now();
    let mut now = start;
    for zoom in [10u8, 11, 12, 11, 13] {
        let (hx, hy) = (half_span(width, zoom), half_span(height, zoom));
        renderer.set_world_window(
            Point::new(center.x - hx, center.y - hy),
            Point::new(center.x + hx, center.y + hy),
        );

        layer.update(&UpdateRequest::new(Viewport::new(zoom, width, height), now), &mut renderer)?;

        // Pretend every requested image arrived straight away
        let requests = loader.take_requests();
        for (coord, url) in &requests {
            println!("   fetch {} <- {}", coord, url);
            layer.complete_load(*coord, TileImage::new(Vec::new()), &mut renderer)?;
        }

        println!(
            "zoom {:>2}: {} new, {} live, {} visible, {} hidden",
            zoom,
            requests.len(),
            layer.live_tile_count(),
            renderer.features_in_bin(1000).len(),
            renderer.features_in_bin(0).len()
        );
        now += Duration::from_millis(400);
    }

    // Let the deferred eviction pass run
    if let Some(deadline) = layer.next_deadline() {
        if let Some(report) = layer.run_due_eviction(deadline, &mut renderer)? {
            println!(
                "eviction: {} hidden, {} evicted, {} live",
                report.hidden.len(),
                report.evicted.len(),
                layer.live_tile_count()
            );
        }
    }

    println!("elapsed (simulated): {:?}", now - start);
    Ok(())
}
