//! Host-facing OpenStreetMap raster layer

use crossbeam_channel::{Receiver, Sender};
use std::time::Instant;

use super::{
    eviction::{EvictionReport, EvictionScheduler},
    lifecycle::TileLifecycle,
    resolver::ViewportResolver,
    types::Tile,
    visibility::VisibilityController,
};
use crate::{
    core::{config::TileLayerOptions, geo::TileCoord, viewport::UpdateRequest},
    layers::base::{BaseLayer, LayerProperties, LayerType},
    tiles::{
        loader::{HttpImageLoader, ImageLoader, LoadCompletion, TileImage},
        source::TileSource,
    },
    traits::FeatureRenderer,
    MapError, Result,
};

pub struct OsmLayer {
    pub(crate) base: BaseLayer,
    pub(crate) options: TileLayerOptions,
    lifecycle: TileLifecycle,
    scheduler: EvictionScheduler,
    resolver: ViewportResolver,
    /// Zoom seen by the last update; `None` before the first one
    previous_zoom: Option<u8>,
    completions_tx: Sender<LoadCompletion>,
    completions_rx: Receiver<LoadCompletion>,
}

impl OsmLayer {
    /// Create a layer whose images are fetched by `loader`.
    ///
    /// Loaders report back through [`OsmLayer::completion_sender`] or
    /// [`OsmLayer::complete_load`].
    pub fn new(id: impl Into<String>, options: TileLayerOptions, loader: Box<dyn ImageLoader>) -> Result<Self> {
        let (completions_tx, completions_rx) = crossbeam_channel::unbounded();
        Self::build(id.into(), options, loader, completions_tx, completions_rx)
    }

    /// Create a layer that downloads tiles itself over HTTP
    pub fn with_http_loader(id: impl Into<String>, options: TileLayerOptions) -> Result<Self> {
        let (completions_tx, completions_rx) = crossbeam_channel::unbounded();
        let loader = HttpImageLoader::new(completions_tx.clone())?;
        Self::build(id.into(), options, Box::new(loader), completions_tx, completions_rx)
    }

    fn build(
        id: String,
        options: TileLayerOptions,
        loader: Box<dyn ImageLoader>,
        completions_tx: Sender<LoadCompletion>,
        completions_rx: Receiver<LoadCompletion>,
    ) -> Result<Self> {
        options.validate()?;

        let mut properties = LayerProperties::new(id, "OpenStreetMap".to_string(), LayerType::Tile);
        properties.options = serde_json::to_value(&options)?;

        let lifecycle = TileLifecycle::new(
            Box::new(options.provider.clone()),
            loader,
            VisibilityController::new(options.hidden_bin, options.visible_bin),
            options.reference_system.clone(),
        );
        let scheduler = EvictionScheduler::new(options.eviction_delay(), options.max_active_tiles);

        Ok(Self {
            base: BaseLayer::new(properties),
            options,
            lifecycle,
            scheduler,
            resolver: ViewportResolver,
            previous_zoom: None,
            completions_tx,
            completions_rx,
        })
    }

    /// Replace the URL source; tiles already created keep their URL
    pub fn with_source(mut self, source: Box<dyn TileSource>) -> Self {
        self.lifecycle.set_source(source);
        self
    }

    /// Channel end for loaders running on other threads
    pub fn completion_sender(&self) -> Sender<LoadCompletion> {
        self.completions_tx.clone()
    }

    /// One-time setup; the layer refuses to update before this
    pub fn init(&mut self) -> Result<()> {
        self.base.init(&self.options.reference_system);
        log::info!(
            "layer '{}' initialized ({})",
            self.base.properties.id,
            self.options.reference_system
        );
        Ok(())
    }

    /// Run one update cycle.
    ///
    /// Finished loads are applied first, then the viewport's tiles are
    /// acquired, then any due eviction pass runs, and only then is a zoom
    /// change swept. A batch scheduled by this cycle's sweep therefore never
    /// runs in the same cycle.
    pub fn update(&mut self, request: &UpdateRequest, renderer: &mut dyn FeatureRenderer) -> Result<()> {
        if !self.base.is_initialized() {
            return Err(MapError::Layer(format!(
                "layer '{}' updated before init",
                self.base.properties.id
            )));
        }

        self.process_completions(renderer)?;
        self.update_tiles(request, renderer)?;

        self.base.mark_modified(request.now);
        self.base.update(request);
        Ok(())
    }

    fn process_completions(&mut self, renderer: &mut dyn FeatureRenderer) -> Result<()> {
        let completions: Vec<_> = self.completions_rx.try_iter().collect();
        for completion in completions {
            self.lifecycle
                .complete_load(completion, self.previous_zoom, renderer)?;
        }
        Ok(())
    }

    fn update_tiles(&mut self, request: &UpdateRequest, renderer: &mut dyn FeatureRenderer) -> Result<()> {
        let zoom = request.viewport.zoom;

        if (self.options.min_zoom..=self.options.max_zoom).contains(&zoom) {
            let range = self.resolver.resolve(&request.viewport, &*renderer)?;
            for coord in range.coords() {
                self.lifecycle.acquire(coord, renderer)?;
            }
        } else {
            log::debug!(
                "zoom {} outside {}..={}, no tiles acquired",
                zoom,
                self.options.min_zoom,
                self.options.max_zoom
            );
        }
        self.lifecycle.attach_pending(zoom, renderer)?;

        self.run_due_eviction(request.now, renderer)?;

        match self.previous_zoom {
            Some(previous) if previous != zoom => {
                log::debug!("zoom changed {} -> {}", previous, zoom);
                let stale = self.lifecycle.sweep(zoom)?;
                self.scheduler.schedule(stale, request.now);
            }
            _ => {}
        }
        self.previous_zoom = Some(zoom);
        Ok(())
    }

    /// Apply a finished load directly, bypassing the completion channel
    pub fn complete_load(
        &mut self,
        coord: TileCoord,
        image: TileImage,
        renderer: &mut dyn FeatureRenderer,
    ) -> Result<bool> {
        self.lifecycle
            .complete_load(LoadCompletion { coord, image }, self.previous_zoom, renderer)
    }

    /// Run the pending eviction pass if its deadline has passed.
    ///
    /// Hosts with their own timer can call this at [`OsmLayer::next_deadline`];
    /// otherwise the next [`OsmLayer::update`] picks it up.
    ///
    /// A pass that hid or evicted anything only asks the renderer for a
    /// redraw. The layer's follow-up update is the host's next call to
    /// [`OsmLayer::update`], which a redraw normally triggers.
    pub fn run_due_eviction(
        &mut self,
        now: Instant,
        renderer: &mut dyn FeatureRenderer,
    ) -> Result<Option<EvictionReport>> {
        let Some(batch) = self.scheduler.take_due(now) else {
            return Ok(None);
        };
        let (store, visibility) = self.lifecycle.store_and_visibility();
        self.scheduler
            .run_batch(batch, store, visibility, renderer)
            .map(Some)
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.scheduler.next_deadline()
    }

    pub fn tile(&self, coord: &TileCoord) -> Option<&Tile> {
        self.lifecycle.store().get(coord)
    }

    pub fn tiles(&self) -> impl Iterator<Item = &Tile> {
        self.lifecycle.store().iter()
    }

    pub fn live_tile_count(&self) -> usize {
        self.lifecycle.store().live_count()
    }

    pub fn current_zoom(&self) -> Option<u8> {
        self.previous_zoom
    }

    pub fn reference_system(&self) -> Option<&str> {
        self.base.properties.reference_system.as_deref()
    }

    pub fn last_modified(&self) -> Option<Instant> {
        self.base.modified()
    }

    pub fn update_count(&self) -> u64 {
        self.base.update_count()
    }

    pub fn tile_options(&self) -> &TileLayerOptions {
        &self.options
    }

    /// Swap in new options.
    ///
    /// Capacity and delay apply to the next eviction pass, bins and provider
    /// to tiles touched from now on.
    pub fn set_tile_options(&mut self, options: TileLayerOptions) -> Result<()> {
        options.validate()?;

        self.scheduler
            .configure(options.eviction_delay(), options.max_active_tiles);
        self.lifecycle
            .set_visibility(VisibilityController::new(options.hidden_bin, options.visible_bin));
        if options.provider != self.options.provider {
            self.lifecycle.set_source(Box::new(options.provider.clone()));
        }
        self.base.properties.options = serde_json::to_value(&options)?;
        self.options = options;
        Ok(())
    }
}
