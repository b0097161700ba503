use std::path::PathBuf;

use serde::{Deserialize, Serialize};

/// Configuration for the catalog module (`modules.catalog`).
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct CatalogConfig {
    /// Directory holding `<collection>.json` files. Relative paths resolve
    /// against the working directory.
    #[serde(default = "default_data_dir")]
    pub data_dir: PathBuf,
    /// Load every collection at startup instead of on first request.
    #[serde(default)]
    pub preload: bool,
}

impl Default for CatalogConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            preload: false,
        }
    }
}

fn default_data_dir() -> PathBuf {
    PathBuf::from("data")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_section_uses_defaults() {
        let cfg: CatalogConfig = serde_json::from_value(serde_json::json!({})).unwrap();
        assert_eq!(cfg.data_dir, PathBuf::from("data"));
        assert!(!cfg.preload);
    }

    #[test]
    fn unknown_keys_are_rejected() {
        let res: Result<CatalogConfig, _> =
            serde_json::from_value(serde_json::json!({"datadir": "x"}));
        assert!(res.is_err());
    }
}
