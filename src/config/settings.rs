//! Application settings read once at startup.
//!
//! Process-level settings (mode, database URL, bind address, asset directory) come
//! from environment variables, usually via `.env`. Catalog tuning and the admin
//! list come from an optional TOML file; a missing file means defaults.

use crate::{
    config::database::DEFAULT_DATABASE_URL,
    core::catalog::PromotionSizes,
    errors::{Error, Result},
    store::SnapshotLocation,
};
use serde::Deserialize;
use std::{fmt, path::Path, path::PathBuf, str::FromStr};
use tracing::{debug, info};

/// Which product store backs the catalog.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CatalogMode {
    /// Bundled JSON snapshot
    Static,
    /// Live database table
    Live,
}

impl FromStr for CatalogMode {
    type Err = Error;

    fn from_str(value: &str) -> Result<Self> {
        match value.trim().to_lowercase().as_str() {
            "static" => Ok(Self::Static),
            "live" => Ok(Self::Live),
            other => Err(Error::Config {
                message: format!("CATALOG_MODE must be 'static' or 'live', got '{other}'"),
            }),
        }
    }
}

impl fmt::Display for CatalogMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Static => "static",
            Self::Live => "live",
        })
    }
}

/// The `[catalog]` table of the TOML file.
#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct CatalogSection {
    /// Snapshot locations tried in order (paths or URLs)
    pub static_sources: Vec<String>,
    /// Carousel size
    pub carousel_size: usize,
    /// Best-seller row size
    pub best_seller_size: usize,
    /// Page size when a request gives none
    pub default_page_size: u64,
}

impl Default for CatalogSection {
    fn default() -> Self {
        Self {
            static_sources: vec![
                "data/products.json".to_string(),
                "public/data/products.json".to_string(),
                "products.json".to_string(),
            ],
            carousel_size: 10,
            best_seller_size: 8,
            default_page_size: 12,
        }
    }
}

impl CatalogSection {
    /// Parsed snapshot locations.
    #[must_use]
    pub fn snapshot_locations(&self) -> Vec<SnapshotLocation> {
        self.static_sources
            .iter()
            .map(|raw| SnapshotLocation::parse(raw))
            .collect()
    }

    /// Promotional section sizes.
    #[must_use]
    pub const fn promotions(&self) -> PromotionSizes {
        PromotionSizes {
            carousel: self.carousel_size,
            best_sellers: self.best_seller_size,
        }
    }
}

/// One `[[admins]]` entry.
#[derive(Debug, Clone, Deserialize)]
pub struct AdminSeed {
    /// Login email
    pub email: String,
    /// Credential checked at login
    pub access_key: String,
}

/// Contents of the optional TOML file.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct FileConfig {
    /// Catalog tuning
    #[serde(default)]
    pub catalog: CatalogSection,
    /// Admins seeded into the live store
    #[serde(default)]
    pub admins: Vec<AdminSeed>,
}

/// Loads the TOML file at `path`, or defaults when it does not exist.
///
/// # Errors
/// Returns an error if the file exists but cannot be read or parsed.
pub fn load_file_config<P: AsRef<Path>>(path: P) -> Result<FileConfig> {
    let path = path.as_ref();
    if !path.exists() {
        info!("No config file at {:?}, using defaults", path);
        return Ok(FileConfig::default());
    }

    debug!("Loading configuration from {:?}", path);
    let contents = std::fs::read_to_string(path).map_err(|e| Error::Config {
        message: format!("Failed to read config file {path:?}: {e}"),
    })?;

    toml::from_str(&contents).map_err(|e| Error::Config {
        message: format!("Failed to parse config file {path:?}: {e}"),
    })
}

/// Everything the binary needs to start.
#[derive(Debug, Clone)]
pub struct Settings {
    /// Store selection
    pub mode: CatalogMode,
    /// Live store URL
    pub database_url: String,
    /// HTTP listen address
    pub bind_address: String,
    /// Storefront asset directory
    pub assets_dir: PathBuf,
    /// Catalog tuning
    pub catalog: CatalogSection,
    /// Admins to seed
    pub admins: Vec<AdminSeed>,
}

impl Settings {
    /// Reads settings from the process environment.
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Reads settings through `lookup`, which maps a variable name to its value.
    ///
    /// # Errors
    /// Returns an error if `CATALOG_MODE` is unrecognised, the config file is
    /// invalid, or the default page size is zero.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let var = |key: &str, default: &str| {
            lookup(key)
                .filter(|value| !value.trim().is_empty())
                .unwrap_or_else(|| {
                    debug!("{key} not set, using default: {default}");
                    default.to_string()
                })
        };

        let mode: CatalogMode = var("CATALOG_MODE", "static").parse()?;
        let file = load_file_config(var("CATALOG_CONFIG", "catalog.toml"))?;

        if file.catalog.default_page_size == 0 {
            return Err(Error::Config {
                message: "catalog.default_page_size must be at least 1".to_string(),
            });
        }

        Ok(Self {
            mode,
            database_url: var("DATABASE_URL", DEFAULT_DATABASE_URL),
            bind_address: var("BIND_ADDRESS", "0.0.0.0:3000"),
            assets_dir: PathBuf::from(var("ASSETS_DIR", "public")),
            catalog: file.catalog,
            admins: file.admins,
        })
    }
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn test_mode_parsing() {
        assert_eq!("static".parse::<CatalogMode>().unwrap(), CatalogMode::Static);
        assert_eq!(" LIVE ".parse::<CatalogMode>().unwrap(), CatalogMode::Live);
        assert!(matches!(
            "hybrid".parse::<CatalogMode>(),
            Err(Error::Config { .. })
        ));
    }

    #[test]
    fn test_defaults_without_env_or_file() {
        let settings =
            Settings::from_lookup(lookup_from(&[("CATALOG_CONFIG", "/missing/catalog.toml")]))
                .unwrap();

        assert_eq!(settings.mode, CatalogMode::Static);
        assert_eq!(settings.database_url, DEFAULT_DATABASE_URL);
        assert_eq!(settings.bind_address, "0.0.0.0:3000");
        assert_eq!(settings.catalog.default_page_size, 12);
        assert_eq!(settings.catalog.snapshot_locations().len(), 3);
        assert!(settings.admins.is_empty());
    }

    #[test]
    fn test_env_and_file_values() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(
            &path,
            r#"
            [catalog]
            static_sources = ["https://cdn.example/products.json"]
            carousel_size = 6

            [[admins]]
            email = "owner@example.com"
            access_key = "k-123"
        "#,
        )
        .unwrap();

        let settings = Settings::from_lookup(lookup_from(&[
            ("CATALOG_MODE", "live"),
            ("CATALOG_CONFIG", path.to_str().unwrap()),
            ("DATABASE_URL", "postgres://catalog@db/catalog"),
            ("BIND_ADDRESS", "127.0.0.1:8080"),
        ]))
        .unwrap();

        assert_eq!(settings.mode, CatalogMode::Live);
        assert_eq!(settings.database_url, "postgres://catalog@db/catalog");
        assert_eq!(settings.bind_address, "127.0.0.1:8080");
        assert_eq!(settings.catalog.promotions().carousel, 6);
        // Unset keys in a present table keep their defaults
        assert_eq!(settings.catalog.promotions().best_sellers, 8);
        assert_eq!(
            settings.catalog.snapshot_locations(),
            vec![SnapshotLocation::Url(
                "https://cdn.example/products.json".to_string()
            )]
        );
        assert_eq!(settings.admins.len(), 1);
        assert_eq!(settings.admins[0].access_key, "k-123");
    }

    #[test]
    fn test_invalid_file_is_config_error() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, "[catalog]\ncarousel_size = \"lots\"\n").unwrap();

        let result = Settings::from_lookup(lookup_from(&[(
            "CATALOG_CONFIG",
            path.to_str().unwrap(),
        )]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }

    #[test]
    fn test_zero_page_size_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("catalog.toml");
        std::fs::write(&path, "[catalog]\ndefault_page_size = 0\n").unwrap();

        let result = Settings::from_lookup(lookup_from(&[(
            "CATALOG_CONFIG",
            path.to_str().unwrap(),
        )]));
        assert!(matches!(result, Err(Error::Config { .. })));
    }
}
