pub mod loader;
pub mod manager;
pub mod source;

// Re-exports for convenience
pub use loader::{CatalogLoader, StyleCatalog, StyleResourceLoader};
pub use manager::{ActivationEvent, ActivationStatus, MapStyleManager};
pub use source::{
    OfflineDataset, RasterProviderConfig, RasterProviderDescriptor, StyleConfiguration, StyleId,
    StyleResources, TileSource,
};
