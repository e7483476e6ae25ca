use crossbeam_channel::Sender;
use reqwest::blocking::Client;
use std::sync::{Arc, Mutex};
use std::thread;

use crate::core::geo::TileCoord;
use crate::Result;

/// Encoded tile image bytes, shared between the tile and the renderer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TileImage(Arc<Vec<u8>>);

impl TileImage {
    pub fn new(data: Vec<u8>) -> Self {
        Self(Arc::new(data))
    }

    pub fn bytes(&self) -> &[u8] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// A finished image load, delivered back to the layer
#[derive(Debug, Clone)]
pub struct LoadCompletion {
    pub coord: TileCoord,
    pub image: TileImage,
}

/// Starts tile image loads.
///
/// A load either eventually reports a [`LoadCompletion`] or never does; there
/// is no failure callback and no way to cancel a request once issued.
pub trait ImageLoader: Send + Sync {
    fn request(&self, coord: TileCoord, url: &str);
}

/// Fetches tiles over HTTP on detached threads and sends the resulting bytes
/// back over a channel.
pub struct HttpImageLoader {
    client: Client,
    tx: Sender<LoadCompletion>,
}

impl HttpImageLoader {
    /// Create a loader that reports completed downloads on `tx`.
    pub fn new(tx: Sender<LoadCompletion>) -> Result<Self> {
        // Public tile servers reject requests without a User-Agent
        let client = Client::builder()
            .user_agent(concat!("osmlayer/", env!("CARGO_PKG_VERSION")))
            .build()?;
        Ok(Self { client, tx })
    }
}

impl ImageLoader for HttpImageLoader {
    fn request(&self, coord: TileCoord, url: &str) {
        let client = self.client.clone();
        let tx = self.tx.clone();
        let url = url.to_string();

        thread::spawn(move || {
            log::debug!("fetch tile {} from {}", coord, url);
            let result: Result<Vec<u8>> = (|| {
                let resp = client.get(&url).send()?.error_for_status()?;
                Ok(resp.bytes()?.to_vec())
            })();

            match result {
                Ok(data) => {
                    log::debug!("downloaded tile {} ({} bytes)", coord, data.len());
                    let completion = LoadCompletion {
                        coord,
                        image: TileImage::new(data),
                    };
                    if tx.send(completion).is_err() {
                        log::debug!("layer dropped before tile {} arrived", coord);
                    }
                }
                // The tile stays in its loading state
                Err(e) => log::warn!("tile {} download failed: {}", coord, e),
            }
        });
    }
}

/// Records requests for a host that performs its own fetching.
///
/// The host drains [`QueuedLoader::take_requests`] and reports finished
/// images through the layer's completion sender or `complete_load`.
#[derive(Debug, Clone, Default)]
pub struct QueuedLoader {
    requests: Arc<Mutex<Vec<(TileCoord, String)>>>,
}

impl QueuedLoader {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take every request issued since the last call
    pub fn take_requests(&self) -> Vec<(TileCoord, String)> {
        self.requests
            .lock()
            .map(|mut requests| std::mem::take(&mut *requests))
            .unwrap_or_default()
    }

    pub fn pending(&self) -> usize {
        self.requests.lock().map(|r| r.len()).unwrap_or(0)
    }
}

impl ImageLoader for QueuedLoader {
    fn request(&self, coord: TileCoord, url: &str) {
        if let Ok(mut requests) = self.requests.lock() {
            requests.push((coord, url.to_string()));
        }
    }
}
