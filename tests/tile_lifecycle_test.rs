use osmlayer::prelude::*;
use osmlayer::layers::tile::{EvictionScheduler, TileLifecycle, VisibilityController};

/// End-to-end tile lifecycle scenarios driven through the public layer API
#[cfg(test)]
mod tile_lifecycle_tests {
    use super::*;

    const WIDTH: f64 = 300.0;
    const HEIGHT: f64 = 100.0;

    /// A strip just north of the equator: 3 tiles wide at zoom 5, 6 at zoom 6,
    /// 12 at zoom 7, always a single row
    fn strip_renderer() -> HeadlessRenderer {
        HeadlessRenderer::with_world_window(
            WIDTH,
            HEIGHT,
            Point::new(0.5, 1.0),
            Point::new(33.0, 2.0),
        )
    }

    fn layer_with(options: TileLayerOptions) -> (OsmLayer, QueuedLoader) {
        let loader = QueuedLoader::new();
        let mut layer = OsmLayer::new("osm", options, Box::new(loader.clone())).unwrap();
        layer.init().unwrap();
        (layer, loader)
    }

    fn update(layer: &mut OsmLayer, renderer: &mut HeadlessRenderer, zoom: u8, now: Instant) {
        let request = UpdateRequest::new(Viewport::new(zoom, WIDTH, HEIGHT), now);
        layer.update(&request, renderer).unwrap();
    }

    /// Deliver every outstanding request through the completion channel
    fn finish_loads(layer: &OsmLayer, loader: &QueuedLoader) -> Vec<TileCoord> {
        let tx = layer.completion_sender();
        loader
            .take_requests()
            .into_iter()
            .map(|(coord, _url)| {
                tx.send(LoadCompletion {
                    coord,
                    image: TileImage::new(vec![0x89, 0x50, 0x4e, 0x47]),
                })
                .unwrap();
                coord
            })
            .collect()
    }

    fn tiles_at(layer: &OsmLayer, zoom: u8) -> Vec<&Tile> {
        layer.tiles().filter(|t| t.zoom() == zoom).collect()
    }

    /// A feature may only enter the visible bin after its image was bound
    fn assert_never_visible_without_image(layer: &OsmLayer, renderer: &HeadlessRenderer) {
        for tile in layer.tiles() {
            let Some(id) = tile.feature() else { continue };
            let feature = renderer.feature(id).unwrap();
            if feature.image.is_none() {
                assert!(
                    !feature.bin_history.contains(&1000),
                    "tile {} shown before its image arrived",
                    tile.coord()
                );
            }
        }
    }

    #[test]
    fn test_repeated_update_creates_each_tile_once() {
        let (mut layer, loader) = layer_with(TileLayerOptions::default());
        let mut renderer = strip_renderer();
        let start = Instant::now();

        update(&mut layer, &mut renderer, 5, start);
        update(&mut layer, &mut renderer, 5, start + Duration::from_millis(16));

        assert_eq!(layer.live_tile_count(), 3);
        assert_eq!(loader.take_requests().len(), 3);
        assert_eq!(renderer.feature_count(), 3);
    }

    #[test]
    fn test_loading_tiles_stay_in_hidden_bin() {
        let (mut layer, loader) = layer_with(TileLayerOptions::default());
        let mut renderer = strip_renderer();
        let start = Instant::now();

        update(&mut layer, &mut renderer, 5, start);
        assert!(renderer.features_in_bin(1000).is_empty());
        assert_never_visible_without_image(&layer, &renderer);

        finish_loads(&layer, &loader);
        update(&mut layer, &mut renderer, 5, start + Duration::from_millis(16));
        assert_eq!(renderer.features_in_bin(1000).len(), 3);
        assert_never_visible_without_image(&layer, &renderer);
    }

    #[test]
    fn test_zoom_change_hides_previous_generation_under_capacity() {
        let (mut layer, loader) = layer_with(TileLayerOptions::default());
        let mut renderer = strip_renderer();
        let start = Instant::now();

        update(&mut layer, &mut renderer, 5, start);
        finish_loads(&layer, &loader);
        update(&mut layer, &mut renderer, 5, start + Duration::from_millis(16));
        assert!(tiles_at(&layer, 5).iter().all(|t| t.state() == TileState::Loaded));

        let zoom_change = start + Duration::from_millis(32);
        update(&mut layer, &mut renderer, 6, zoom_change);
        assert!(tiles_at(&layer, 5).iter().all(|t| t.state() == TileState::Hiding));
        assert_eq!(layer.next_deadline(), Some(zoom_change + Duration::from_millis(1000)));

        // Not yet due
        update(&mut layer, &mut renderer, 6, zoom_change + Duration::from_millis(999));
        assert!(tiles_at(&layer, 5).iter().all(|t| t.state() == TileState::Hiding));

        update(&mut layer, &mut renderer, 6, zoom_change + Duration::from_millis(1000));
        let old = tiles_at(&layer, 5);
        assert_eq!(old.len(), 3);
        for tile in old {
            assert_eq!(tile.state(), TileState::Hidden);
            assert_eq!(renderer.feature(tile.feature().unwrap()).unwrap().bin(), 0);
        }
        assert_eq!(layer.live_tile_count(), 3 + 6);
        assert!(layer.next_deadline().is_none());
        assert!(renderer.destroyed().is_empty());
    }

    #[test]
    fn test_over_capacity_tile_is_evicted() {
        let loader = QueuedLoader::new();
        let mut lifecycle = TileLifecycle::new(
            Box::new(TileProvider::OpenStreetMap),
            Box::new(loader.clone()),
            VisibilityController::default(),
            "EPSG:3857",
        );
        let mut renderer = HeadlessRenderer::new(720.0, 360.0);

        let stale = TileCoord::new(4, 3, 3);
        lifecycle.add_tile(stale).unwrap();
        lifecycle.attach_pending(4, &mut renderer).unwrap();
        let completion = LoadCompletion {
            coord: stale,
            image: TileImage::new(vec![1]),
        };
        assert!(lifecycle.complete_load(completion, Some(4), &mut renderer).unwrap());
        let stale_feature = lifecycle.store().get(&stale).unwrap().feature().unwrap();

        for i in 0..100 {
            lifecycle.add_tile(TileCoord::new(5, i % 32, i / 32)).unwrap();
        }
        lifecycle.attach_pending(5, &mut renderer).unwrap();
        assert_eq!(lifecycle.store().live_count(), 101);

        let queued = lifecycle.sweep(5).unwrap();
        assert_eq!(queued, vec![stale]);

        let start = Instant::now();
        let mut scheduler = EvictionScheduler::new(Duration::from_millis(1000), 100);
        scheduler.schedule(queued, start);
        let batch = scheduler.take_due(start + Duration::from_millis(1000)).unwrap();

        let visibility = *lifecycle.visibility();
        let report = scheduler
            .run_batch(batch, lifecycle.store_mut(), &visibility, &mut renderer)
            .unwrap();

        assert_eq!(report.evicted.len(), 1);
        assert_eq!(report.evicted[0].state(), TileState::Removed);
        assert!(!lifecycle.store().contains(&stale));
        assert_eq!(lifecycle.store().live_count(), 100);
        assert_eq!(renderer.destroyed(), &[stale_feature]);
        assert!(renderer.feature(stale_feature).is_none());
    }

    #[test]
    fn test_sweep_during_load_marks_unwanted_then_hides_late_image() {
        let (mut layer, loader) = layer_with(TileLayerOptions::default());
        let mut renderer = strip_renderer();
        let start = Instant::now();

        update(&mut layer, &mut renderer, 5, start);
        let in_flight: Vec<_> = loader
            .take_requests()
            .into_iter()
            .map(|(coord, _)| coord)
            .collect();

        update(&mut layer, &mut renderer, 6, start + Duration::from_millis(16));
        assert!(tiles_at(&layer, 5).iter().all(|t| t.state() == TileState::Unload));
        assert!(layer.next_deadline().is_none());
        let features_before = renderer.feature_count();

        // The z5 images finally arrive while the map sits at z6
        for coord in &in_flight {
            layer
                .complete_load(*coord, TileImage::new(vec![7]), &mut renderer)
                .unwrap();
        }
        assert_eq!(renderer.feature_count(), features_before);
        for tile in tiles_at(&layer, 5) {
            assert_eq!(tile.state(), TileState::Hidden);
            let feature = renderer.feature(tile.feature().unwrap()).unwrap();
            assert!(!feature.bin_history.contains(&1000));
        }
        assert_eq!(layer.live_tile_count(), 3 + 6);
    }

    #[test]
    fn test_returning_to_zoom_revives_tiles_before_batch() {
        let (mut layer, loader) = layer_with(TileLayerOptions::default());
        let mut renderer = strip_renderer();
        let start = Instant::now();

        update(&mut layer, &mut renderer, 5, start);
        finish_loads(&layer, &loader);
        update(&mut layer, &mut renderer, 5, start + Duration::from_millis(16));

        update(&mut layer, &mut renderer, 6, start + Duration::from_millis(100));
        update(&mut layer, &mut renderer, 5, start + Duration::from_millis(200));
        for tile in tiles_at(&layer, 5) {
            assert_eq!(tile.state(), TileState::Loaded);
            assert_eq!(renderer.feature(tile.feature().unwrap()).unwrap().bin(), 1000);
        }

        // The batch still fires but leaves the revived tiles alone
        update(&mut layer, &mut renderer, 5, start + Duration::from_millis(1100));
        assert!(layer.next_deadline().is_none());
        assert!(tiles_at(&layer, 5).iter().all(|t| t.state() == TileState::Loaded));
        assert!(tiles_at(&layer, 6).iter().all(|t| t.state() == TileState::Unload));
        assert!(loader.take_requests().iter().all(|(coord, _)| coord.z == 6));
    }

    #[test]
    fn test_rapid_zoom_changes_share_one_batch() {
        let (mut layer, loader) = layer_with(TileLayerOptions::default());
        let mut renderer = strip_renderer();
        let start = Instant::now();

        update(&mut layer, &mut renderer, 5, start);
        finish_loads(&layer, &loader);
        update(&mut layer, &mut renderer, 6, start + Duration::from_millis(100));
        finish_loads(&layer, &loader);
        update(&mut layer, &mut renderer, 6, start + Duration::from_millis(200));

        let first_change = start + Duration::from_millis(100);
        update(&mut layer, &mut renderer, 7, start + Duration::from_millis(500));
        assert_eq!(layer.next_deadline(), Some(first_change + Duration::from_millis(1000)));

        // One pass, due a delay after the first change, covers both generations
        update(&mut layer, &mut renderer, 7, first_change + Duration::from_millis(999));
        assert!(tiles_at(&layer, 5).iter().all(|t| t.state() == TileState::Hiding));

        update(&mut layer, &mut renderer, 7, first_change + Duration::from_millis(1000));
        assert!(tiles_at(&layer, 5).iter().all(|t| t.state() == TileState::Hidden));
        assert!(tiles_at(&layer, 6).iter().all(|t| t.state() == TileState::Hidden));
        assert_eq!(tiles_at(&layer, 6).len(), 6);
        assert!(layer.next_deadline().is_none());
    }

    #[test]
    fn test_continuous_zooming_still_evicts() {
        let options = TileLayerOptions::default().with_max_active_tiles(6);
        let (mut layer, loader) = layer_with(options);
        let mut renderer = strip_renderer();
        let start = Instant::now();
        let step = Duration::from_millis(900);

        let mut now = start;
        for zoom in 5..=9u8 {
            update(&mut layer, &mut renderer, zoom, now);
            finish_loads(&layer, &loader);
            update(&mut layer, &mut renderer, zoom, now + Duration::from_millis(16));
            if let Some(due) = layer.next_deadline() {
                assert!(due <= now + Duration::from_millis(1000), "batch postponed at zoom {zoom}");
            }
            now += step;
        }

        // Zooming every 900 ms must not hold off the pass queued by the first change
        assert!(!renderer.destroyed().is_empty());
        assert!(tiles_at(&layer, 5).is_empty());
        assert!(tiles_at(&layer, 6).is_empty());
    }

    #[test]
    fn test_small_cache_evicts_whole_generation() {
        let options = TileLayerOptions::default().with_max_active_tiles(6);
        let (mut layer, loader) = layer_with(options);
        let mut renderer = strip_renderer();
        let start = Instant::now();

        update(&mut layer, &mut renderer, 5, start);
        finish_loads(&layer, &loader);
        update(&mut layer, &mut renderer, 6, start + Duration::from_millis(16));
        assert_eq!(layer.live_tile_count(), 9);

        let report = layer
            .run_due_eviction(start + Duration::from_secs(2), &mut renderer)
            .unwrap()
            .unwrap();
        assert_eq!(report.evicted.len(), 3);
        assert!(report.hidden.is_empty());
        assert!(tiles_at(&layer, 5).is_empty());
        assert_eq!(layer.live_tile_count(), 6);
        assert_eq!(renderer.destroyed().len(), 3);
    }
}
