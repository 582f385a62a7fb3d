use crate::core::constants::{
    DEFAULT_SUBDOMAINS, PROVIDER_A_URL_TEMPLATE, PROVIDER_B_URL_TEMPLATE, TILE_SIZE,
};
use crate::core::geo::TileCoord;
use crate::{MapError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::fs::File;
use std::path::{Path, PathBuf};

/// The closed set of content sources a map view can display
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum StyleId {
    OnlineRasterProviderA,
    OnlineRasterProviderB,
    OfflineVectorDataset,
}

impl StyleId {
    pub const ALL: [StyleId; 3] = [
        StyleId::OnlineRasterProviderA,
        StyleId::OnlineRasterProviderB,
        StyleId::OfflineVectorDataset,
    ];

    pub fn is_online(&self) -> bool {
        !matches!(self, StyleId::OfflineVectorDataset)
    }
}

impl fmt::Display for StyleId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            StyleId::OnlineRasterProviderA => "online raster provider A",
            StyleId::OnlineRasterProviderB => "online raster provider B",
            StyleId::OfflineVectorDataset => "offline vector dataset",
        };
        f.write_str(name)
    }
}

/// Trait representing anything that can produce tile URLs for a given coordinate.
pub trait TileSource: Send + Sync {
    /// Build a URL for the requested `coord`.
    fn url(&self, coord: TileCoord) -> String;
}

/// Serializable description of an online raster tile provider
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RasterProviderConfig {
    pub name: String,
    /// Template with `{z}`, `{x}`, `{y}` and optionally `{s}` placeholders
    pub url_template: String,
    pub subdomains: Vec<String>,
    pub tile_size: u32,
    pub min_zoom: u8,
    pub max_zoom: u8,
    pub attribution: String,
}

impl RasterProviderConfig {
    pub fn provider_a() -> Self {
        Self {
            name: "OpenStreetMap".to_string(),
            url_template: PROVIDER_A_URL_TEMPLATE.to_string(),
            subdomains: DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            tile_size: TILE_SIZE,
            min_zoom: 0,
            max_zoom: 19,
            attribution: "© OpenStreetMap contributors".to_string(),
        }
    }

    pub fn provider_b() -> Self {
        Self {
            name: "OpenCycleMap".to_string(),
            url_template: PROVIDER_B_URL_TEMPLATE.to_string(),
            subdomains: DEFAULT_SUBDOMAINS.iter().map(|s| s.to_string()).collect(),
            tile_size: TILE_SIZE,
            min_zoom: 0,
            max_zoom: 18,
            attribution: "© OpenCycleMap, © OpenStreetMap contributors".to_string(),
        }
    }

    pub fn validate(&self) -> Result<()> {
        for placeholder in ["{z}", "{x}", "{y}"] {
            if !self.url_template.contains(placeholder) {
                return Err(MapError::InvalidProvider(format!(
                    "{}: url template '{}' lacks {}",
                    self.name, self.url_template, placeholder
                )));
            }
        }
        if self.url_template.contains("{s}") && self.subdomains.is_empty() {
            return Err(MapError::InvalidProvider(format!(
                "{}: template uses {{s}} but no subdomains are configured",
                self.name
            )));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::InvalidProvider(format!(
                "{}: min zoom {} above max zoom {}",
                self.name, self.min_zoom, self.max_zoom
            )));
        }
        if self.tile_size == 0 {
            return Err(MapError::InvalidProvider(format!(
                "{}: tile size must be positive",
                self.name
            )));
        }
        Ok(())
    }
}

/// A validated network-backed provider, ready to hand to the engine.
/// Tile fetching itself belongs to the engine.
#[derive(Debug, Clone, PartialEq)]
pub struct RasterProviderDescriptor {
    config: RasterProviderConfig,
}

impl RasterProviderDescriptor {
    pub fn new(config: RasterProviderConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &RasterProviderConfig {
        &self.config
    }

    pub fn name(&self) -> &str {
        &self.config.name
    }
}

impl TileSource for RasterProviderDescriptor {
    fn url(&self, coord: TileCoord) -> String {
        let mut url = self
            .config
            .url_template
            .replace("{z}", &coord.z.to_string())
            .replace("{x}", &coord.x.to_string())
            .replace("{y}", &coord.y.to_string());

        if !self.config.subdomains.is_empty() {
            let idx = (coord.x.wrapping_add(coord.y) % self.config.subdomains.len() as u32) as usize;
            url = url.replace("{s}", &self.config.subdomains[idx]);
        }
        url
    }
}

/// An opened offline vector dataset. The file stays open for as long as
/// the handle lives; decoding it is the engine's business.
#[derive(Debug)]
pub struct OfflineDataset {
    path: PathBuf,
    file: File,
    size_bytes: u64,
}

impl OfflineDataset {
    /// Opens the dataset, failing if it is missing, not a file, or empty
    pub fn open(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref().to_path_buf();
        let file = match File::open(&path) {
            Ok(file) => file,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(MapError::DatasetMissing(path));
            }
            Err(e) => return Err(e.into()),
        };

        let metadata = file.metadata()?;
        if !metadata.is_file() {
            return Err(MapError::DatasetCorrupt {
                path,
                reason: "not a regular file".to_string(),
            });
        }
        if metadata.len() == 0 {
            return Err(MapError::DatasetCorrupt {
                path,
                reason: "dataset is empty".to_string(),
            });
        }

        Ok(Self {
            path,
            file,
            size_bytes: metadata.len(),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn file(&self) -> &File {
        &self.file
    }

    pub fn size_bytes(&self) -> u64 {
        self.size_bytes
    }
}

/// Provider-owned handles behind a style
#[derive(Debug)]
pub enum StyleResources {
    Raster(RasterProviderDescriptor),
    Offline(OfflineDataset),
}

/// One content source plus its resource handles.
///
/// Deliberately not `Clone`: exactly one owner holds the live handles.
#[derive(Debug)]
pub struct StyleConfiguration {
    id: StyleId,
    resources: StyleResources,
}

impl StyleConfiguration {
    pub fn new(id: StyleId, resources: StyleResources) -> Self {
        Self { id, resources }
    }

    pub fn id(&self) -> StyleId {
        self.id
    }

    pub fn resources(&self) -> &StyleResources {
        &self.resources
    }

    pub fn tile_source(&self) -> Option<&dyn TileSource> {
        match &self.resources {
            StyleResources::Raster(descriptor) => Some(descriptor),
            StyleResources::Offline(_) => None,
        }
    }

    pub fn offline_dataset(&self) -> Option<&OfflineDataset> {
        match &self.resources {
            StyleResources::Offline(dataset) => Some(dataset),
            StyleResources::Raster(_) => None,
        }
    }
}
