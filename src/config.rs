use std::fs;
use std::path::PathBuf;

use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::catalog::DEFAULT_CATALOG;

#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Config {
    #[serde(default = "default_theme")]
    pub theme: String,
    /// Catalog profile name, resolved through the user catalogs dir and then
    /// the bundled profiles.
    #[serde(default = "default_catalog")]
    pub catalog: String,
    /// Explicit catalog file; wins over `catalog` when set.
    #[serde(default)]
    pub catalog_file: Option<PathBuf>,
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_theme() -> String {
    "terminal-default".to_string()
}
fn default_catalog() -> String {
    DEFAULT_CATALOG.to_string()
}
fn default_log_level() -> String {
    "info".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            theme: default_theme(),
            catalog: default_catalog(),
            catalog_file: None,
            log_level: default_log_level(),
        }
    }
}

impl Config {
    pub fn load() -> Result<Self> {
        let path = Self::config_path();
        if path.exists() {
            let content = fs::read_to_string(&path)?;
            let config: Config = toml::from_str(&content)?;
            Ok(config)
        } else {
            Ok(Config::default())
        }
    }

    pub fn save(&self) -> Result<()> {
        let path = Self::config_path();
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent)?;
        }
        let content = toml::to_string_pretty(self)?;
        fs::write(&path, content)?;
        Ok(())
    }

    pub fn config_path() -> PathBuf {
        dirs::config_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join("eodlog")
            .join("config.toml")
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_serde_defaults_from_empty() {
        let config: Config = toml::from_str("").unwrap();
        assert_eq!(config.theme, "terminal-default");
        assert_eq!(config.catalog, "standard");
        assert!(config.catalog_file.is_none());
        assert_eq!(config.log_level, "info");
    }

    #[test]
    fn test_config_partial_fields() {
        let toml_str = r#"
catalog = "extended"
catalog_file = "/srv/shop/catalog.toml"
"#;
        let config: Config = toml::from_str(toml_str).unwrap();
        assert_eq!(config.catalog, "extended");
        assert_eq!(
            config.catalog_file,
            Some(PathBuf::from("/srv/shop/catalog.toml"))
        );
        assert_eq!(config.theme, "terminal-default");
    }

    #[test]
    fn test_config_serde_roundtrip() {
        let config = Config::default();
        let serialized = toml::to_string_pretty(&config).unwrap();
        let deserialized: Config = toml::from_str(&serialized).unwrap();
        assert_eq!(config.theme, deserialized.theme);
        assert_eq!(config.catalog, deserialized.catalog);
        assert_eq!(config.log_level, deserialized.log_level);
    }
}
