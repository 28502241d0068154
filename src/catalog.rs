use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::{Path, PathBuf};

use rust_embed::Embed;
use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Embed)]
#[folder = "assets/catalogs/"]
struct CatalogAssets;

/// Picker sentinel that switches an entry to free-text rep code input.
pub const OTHER_REP_CODE: &str = "Other";

pub const DEFAULT_CATALOG: &str = "standard";

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("catalog profile '{0}' not found")]
    NotFound(String),
    #[error("failed to read catalog {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
    #[error("failed to parse catalog: {0}")]
    Parse(#[from] toml::de::Error),
    #[error("invalid catalog '{name}': {reason}")]
    Invalid { name: String, reason: String },
}

#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub tag: String,
    pub products: Vec<String>,
    /// Whether reps may add free-text products while this category is selected.
    #[serde(default)]
    pub allows_custom: bool,
}

impl Category {
    pub fn contains(&self, product: &str) -> bool {
        self.products.iter().any(|p| p == product)
    }
}

/// A versioned category -> product mapping, loaded once at startup.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Catalog {
    pub name: String,
    #[serde(default = "default_version")]
    pub version: u32,
    #[serde(default)]
    pub rep_codes: Vec<String>,
    pub categories: Vec<Category>,
}

fn default_version() -> u32 {
    1
}

impl Catalog {
    /// Resolve a profile by name: user catalogs dir first, then the bundled set.
    pub fn load(name: &str) -> Result<Self, CatalogError> {
        if let Some(config_dir) = dirs::config_dir() {
            let user_path = config_dir
                .join("eodlog")
                .join("catalogs")
                .join(format!("{name}.toml"));
            if user_path.exists() {
                return Self::from_path(&user_path);
            }
        }
        Self::bundled(name)
    }

    pub fn bundled(name: &str) -> Result<Self, CatalogError> {
        let file = CatalogAssets::get(&format!("{name}.toml"))
            .ok_or_else(|| CatalogError::NotFound(name.to_string()))?;
        let content = String::from_utf8_lossy(file.data.as_ref());
        Self::from_toml(&content)
    }

    pub fn from_path(path: &Path) -> Result<Self, CatalogError> {
        let content = fs::read_to_string(path).map_err(|source| CatalogError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml(&content)
    }

    pub fn from_toml(content: &str) -> Result<Self, CatalogError> {
        let catalog: Catalog = toml::from_str(content)?;
        catalog.validate()?;
        Ok(catalog)
    }

    pub fn available_profiles() -> Vec<String> {
        let mut names: Vec<String> = CatalogAssets::iter()
            .filter_map(|f| f.strip_suffix(".toml").map(|n| n.to_string()))
            .collect();
        names.sort();
        names
    }

    fn validate(&self) -> Result<(), CatalogError> {
        let invalid = |reason: String| CatalogError::Invalid {
            name: self.name.clone(),
            reason,
        };

        if self.categories.is_empty() {
            return Err(invalid("no categories defined".to_string()));
        }

        let mut seen = HashSet::new();
        let mut owners: HashMap<&str, &str> = HashMap::new();
        for category in &self.categories {
            if category.tag.trim().is_empty() {
                return Err(invalid("category with empty tag".to_string()));
            }
            if !seen.insert(category.tag.as_str()) {
                return Err(invalid(format!("duplicate category '{}'", category.tag)));
            }
            // Counts are keyed by product name, so a product may belong to one category only.
            for product in &category.products {
                if let Some(owner) = owners.insert(product.as_str(), category.tag.as_str()) {
                    if owner == category.tag {
                        return Err(invalid(format!("product '{product}' repeated in '{owner}'")));
                    }
                    return Err(invalid(format!(
                        "product '{product}' listed in both '{owner}' and '{}'",
                        category.tag
                    )));
                }
            }
        }

        if self.rep_codes.iter().any(|c| c == OTHER_REP_CODE) {
            return Err(invalid(format!(
                "'{OTHER_REP_CODE}' is reserved and added to the picker automatically"
            )));
        }
        Ok(())
    }

    pub fn category(&self, tag: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.tag == tag)
    }

    /// Rep codes as shown in the picker, with the free-text sentinel last.
    pub fn picker_options(&self) -> Vec<&str> {
        self.rep_codes
            .iter()
            .map(String::as_str)
            .chain(std::iter::once(OTHER_REP_CODE))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_bundled_profiles_parse() {
        let profiles = Catalog::available_profiles();
        assert!(profiles.contains(&"standard".to_string()));
        assert!(profiles.contains(&"extended".to_string()));
        for name in profiles {
            let catalog = Catalog::bundled(&name).unwrap();
            assert_eq!(catalog.name, name);
        }
    }

    #[test]
    fn test_standard_has_no_fido() {
        let catalog = Catalog::bundled("standard").unwrap();
        let tags: Vec<&str> = catalog.categories.iter().map(|c| c.tag.as_str()).collect();
        assert_eq!(tags, vec!["CBU", "RPP", "SMB", "None"]);
        assert!(catalog.categories.iter().all(|c| !c.allows_custom));
    }

    #[test]
    fn test_extended_has_fido_and_custom() {
        let catalog = Catalog::bundled("extended").unwrap();
        assert!(catalog.category("FIDO").is_some());
        assert!(catalog.category("None").unwrap().allows_custom);
        assert!(catalog.category("None").unwrap().contains("ACC"));
    }

    #[test]
    fn test_unknown_bundled_profile() {
        let err = Catalog::bundled("does-not-exist").unwrap_err();
        assert!(matches!(err, CatalogError::NotFound(_)));
    }

    #[test]
    fn test_duplicate_tag_rejected() {
        let toml_str = r#"
name = "dup"
[[categories]]
tag = "CBU"
products = ["A"]
[[categories]]
tag = "CBU"
products = ["B"]
"#;
        let err = Catalog::from_toml(toml_str).unwrap_err();
        assert!(matches!(err, CatalogError::Invalid { .. }));
    }

    #[test]
    fn test_product_shared_across_categories_rejected() {
        let toml_str = r#"
name = "shared"
[[categories]]
tag = "CBU"
products = ["ACC", "CBU TERM"]
[[categories]]
tag = "None"
products = ["DP", "ACC"]
"#;
        let err = Catalog::from_toml(toml_str).unwrap_err();
        assert!(err.to_string().contains("'ACC' listed in both 'CBU' and 'None'"));
    }

    #[test]
    fn test_repeated_product_within_category_rejected() {
        let toml_str = r#"
name = "repeat"
[[categories]]
tag = "None"
products = ["DP", "DP"]
"#;
        assert!(Catalog::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_empty_tag_rejected() {
        let toml_str = r#"
name = "blank"
[[categories]]
tag = "  "
products = []
"#;
        assert!(Catalog::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_other_sentinel_reserved() {
        let toml_str = r#"
name = "reserved"
rep_codes = ["AA8", "Other"]
[[categories]]
tag = "CBU"
products = ["CBU TERM"]
"#;
        assert!(Catalog::from_toml(toml_str).is_err());
    }

    #[test]
    fn test_picker_options_end_with_other() {
        let catalog = Catalog::bundled("standard").unwrap();
        let options = catalog.picker_options();
        assert_eq!(options.first(), Some(&"AA8"));
        assert_eq!(options.last(), Some(&OTHER_REP_CODE));
    }

    #[test]
    fn test_from_path_reads_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("shop.toml");
        fs::write(
            &path,
            "name = \"shop\"\nversion = 3\n[[categories]]\ntag = \"X\"\nproducts = [\"X1\"]\n",
        )
        .unwrap();
        let catalog = Catalog::from_path(&path).unwrap();
        assert_eq!(catalog.version, 3);
        assert_eq!(catalog.category("X").unwrap().products, vec!["X1"]);
    }

    #[test]
    fn test_from_path_missing_file() {
        let err = Catalog::from_path(Path::new("/nonexistent/eodlog.toml")).unwrap_err();
        assert!(matches!(err, CatalogError::Io { .. }));
    }
}
