use rizz_game::{CardCatalog, CatalogError, DataLoader, EngineConfig};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AssetError {
    #[error("failed to read {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("invalid catalog: {0}")]
    Catalog(#[from] CatalogError),
    #[error("invalid engine config {path}: {source}")]
    Config {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },
}

/// Loads the catalog and engine tuning from disk, falling back to the
/// builtin catalog and default tuning when no path is given.
#[derive(Debug, Clone, Default)]
pub struct TesterAssets {
    catalog_path: Option<PathBuf>,
    config_path: Option<PathBuf>,
}

impl TesterAssets {
    #[must_use]
    pub const fn new(catalog_path: Option<PathBuf>, config_path: Option<PathBuf>) -> Self {
        Self {
            catalog_path,
            config_path,
        }
    }

    fn read(path: &Path) -> Result<String, AssetError> {
        fs::read_to_string(path).map_err(|source| AssetError::Read {
            path: path.to_path_buf(),
            source,
        })
    }
}

impl DataLoader for TesterAssets {
    type Error = AssetError;

    fn load_catalog(&self) -> Result<CardCatalog, Self::Error> {
        match &self.catalog_path {
            Some(path) => {
                log::info!("loading catalog from {}", path.display());
                Ok(CardCatalog::from_json(&Self::read(path)?)?)
            }
            None => Ok(CardCatalog::builtin()?),
        }
    }

    fn load_engine_config(&self) -> Result<EngineConfig, Self::Error> {
        let Some(path) = &self.config_path else {
            return Ok(EngineConfig::default());
        };
        log::info!("loading engine config from {}", path.display());
        EngineConfig::from_json(&Self::read(path)?).map_err(|source| AssetError::Config {
            path: path.clone(),
            source,
        })
    }
}
