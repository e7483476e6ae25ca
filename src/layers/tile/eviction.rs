//! Deferred hide-or-evict pass over tiles left behind by a zoom change
//!
//! Stale tiles are not torn down when the zoom changes. They are collected
//! into a single [`ScheduledBatch`] that fires after a fixed delay, so a user
//! zooming back and forth does not pay for repeated teardown and reload.
//! When the batch runs, tiles are evicted while the live count is above the
//! cap and merely hidden once it is not.

use std::time::{Duration, Instant};

use super::{
    store::TileStore,
    types::{Tile, TileEvent},
    visibility::VisibilityController,
};
use crate::{core::geo::TileCoord, traits::FeatureRenderer, Result};

/// Tiles waiting for the eviction pass, and when it runs
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduledBatch {
    pub due: Instant,
    pub tiles: Vec<TileCoord>,
}

/// What one eviction pass did
#[derive(Debug, Default)]
pub struct EvictionReport {
    pub hidden: Vec<TileCoord>,
    pub evicted: Vec<Tile>,
    /// Queued tiles that were revived or already gone when the pass ran
    pub skipped: Vec<TileCoord>,
}

impl EvictionReport {
    pub fn is_empty(&self) -> bool {
        self.hidden.is_empty() && self.evicted.is_empty()
    }
}

#[derive(Debug)]
pub struct EvictionScheduler {
    delay: Duration,
    max_active_tiles: usize,
    pending: Option<ScheduledBatch>,
}

impl EvictionScheduler {
    pub fn new(delay: Duration, max_active_tiles: usize) -> Self {
        Self {
            delay,
            max_active_tiles,
            pending: None,
        }
    }

    pub fn configure(&mut self, delay: Duration, max_active_tiles: usize) {
        self.delay = delay;
        self.max_active_tiles = max_active_tiles;
    }

    pub fn max_active_tiles(&self) -> usize {
        self.max_active_tiles
    }

    /// Queue `tiles` for a pass `delay` after `now`.
    ///
    /// A batch that is already pending absorbs the new tiles and keeps its
    /// deadline, so rapid zoom changes collapse into one pass that still runs
    /// no later than `delay` after the first of them.
    pub fn schedule(&mut self, tiles: Vec<TileCoord>, now: Instant) {
        if tiles.is_empty() {
            return;
        }
        match self.pending.as_mut() {
            Some(batch) => {
                for coord in tiles {
                    if !batch.tiles.contains(&coord) {
                        batch.tiles.push(coord);
                    }
                }
            }
            None => {
                self.pending = Some(ScheduledBatch {
                    due: now + self.delay,
                    tiles,
                })
            }
        }
        if let Some(batch) = &self.pending {
            log::debug!(
                "eviction batch of {} tiles due in {:?}",
                batch.tiles.len(),
                batch.due.saturating_duration_since(now)
            );
        }
    }

    pub fn cancel(&mut self) -> Option<ScheduledBatch> {
        self.pending.take()
    }

    pub fn pending(&self) -> Option<&ScheduledBatch> {
        self.pending.as_ref()
    }

    pub fn next_deadline(&self) -> Option<Instant> {
        self.pending.as_ref().map(|batch| batch.due)
    }

    /// Hand over the pending batch if its deadline has passed
    pub fn take_due(&mut self, now: Instant) -> Option<ScheduledBatch> {
        match &self.pending {
            Some(batch) if batch.due <= now => self.pending.take(),
            _ => None,
        }
    }

    /// Hide or evict every tile of `batch` that is still waiting for it.
    pub fn run_batch(
        &self,
        batch: ScheduledBatch,
        store: &mut TileStore,
        visibility: &VisibilityController,
        renderer: &mut dyn FeatureRenderer,
    ) -> Result<EvictionReport> {
        let mut report = EvictionReport::default();

        for coord in batch.tiles {
            let waiting = store
                .get(&coord)
                .is_some_and(|tile| tile.state().awaiting_eviction());
            if !waiting {
                report.skipped.push(coord);
                continue;
            }

            if store.live_count() > self.max_active_tiles {
                let Some(mut tile) = store.remove(&coord) else {
                    continue;
                };
                tile.apply(TileEvent::Evict)?;
                if let Some(feature) = tile.take_feature() {
                    renderer.destroy(feature);
                }
                tile.release_image();
                report.evicted.push(tile);
            } else if let Some(tile) = store.get_mut(&coord) {
                tile.apply(TileEvent::Conceal)?;
                visibility.apply(tile, renderer);
                report.hidden.push(coord);
            }
        }

        log::info!(
            "eviction pass: {} hidden, {} evicted, {} skipped, {} live",
            report.hidden.len(),
            report.evicted.len(),
            report.skipped.len(),
            store.live_count()
        );
        if !report.is_empty() {
            renderer.request_draw();
        }
        Ok(report)
    }
}

impl Default for EvictionScheduler {
    fn default() -> Self {
        Self::new(
            Duration::from_millis(crate::core::constants::DEFAULT_EVICTION_DELAY_MS),
            crate::core::constants::DEFAULT_MAX_ACTIVE_TILES,
        )
    }
}
