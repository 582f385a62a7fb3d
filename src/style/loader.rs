use super::source::{
    OfflineDataset, RasterProviderConfig, RasterProviderDescriptor, StyleConfiguration, StyleId,
    StyleResources,
};
use crate::core::constants::DEFAULT_OFFLINE_DATASET;
use crate::Result;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// Where each style's resources come from
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StyleCatalog {
    pub provider_a: RasterProviderConfig,
    pub provider_b: RasterProviderConfig,
    pub offline_dataset_path: PathBuf,
}

impl Default for StyleCatalog {
    fn default() -> Self {
        Self {
            provider_a: RasterProviderConfig::provider_a(),
            provider_b: RasterProviderConfig::provider_b(),
            offline_dataset_path: PathBuf::from(DEFAULT_OFFLINE_DATASET),
        }
    }
}

impl StyleCatalog {
    pub fn validate(&self) -> Result<()> {
        self.provider_a.validate()?;
        self.provider_b.validate()
    }
}

/// Builds the resource handles for a style.
///
/// Implementations may block (opening datasets, preparing sessions); the
/// style manager only ever calls `load` through a `TaskSpawner`.
pub trait StyleResourceLoader: Send + Sync + 'static {
    fn load(&self, id: StyleId) -> Result<StyleConfiguration>;
}

/// Loader backed by a [`StyleCatalog`]
#[derive(Debug, Clone, Default)]
pub struct CatalogLoader {
    catalog: StyleCatalog,
}

impl CatalogLoader {
    pub fn new(catalog: StyleCatalog) -> Self {
        Self { catalog }
    }

    pub fn catalog(&self) -> &StyleCatalog {
        &self.catalog
    }
}

impl StyleResourceLoader for CatalogLoader {
    fn load(&self, id: StyleId) -> Result<StyleConfiguration> {
        log::debug!("constructing resources for {}", id);
        let resources = match id {
            StyleId::OnlineRasterProviderA => StyleResources::Raster(
                RasterProviderDescriptor::new(self.catalog.provider_a.clone())?,
            ),
            StyleId::OnlineRasterProviderB => StyleResources::Raster(
                RasterProviderDescriptor::new(self.catalog.provider_b.clone())?,
            ),
            StyleId::OfflineVectorDataset => {
                StyleResources::Offline(OfflineDataset::open(&self.catalog.offline_dataset_path)?)
            }
        };
        Ok(StyleConfiguration::new(id, resources))
    }
}
