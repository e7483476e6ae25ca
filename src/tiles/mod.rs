pub mod loader;
pub mod source;

// Re-exports for convenience
pub use loader::{HttpImageLoader, ImageLoader, LoadCompletion, QueuedLoader, TileImage};
pub use source::{TileProvider, TileSource};
