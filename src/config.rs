use serde::Deserialize;
use std::{fs, io, path::Path};

use crate::error::ConfigError;

#[derive(Debug, Clone, Deserialize, PartialEq)]
#[serde(default)]
pub struct Config {
    /// Text of the header cell that anchors the two column windows.
    pub header_marker: String,
    /// Fetched grid (JSON array of sheets).
    pub input: String,
    pub output: String,
    pub db_path: String,
    pub parallel: bool,
    pub log_filter: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            header_marker: "Electricity".to_string(),
            input: "grid.json".to_string(),
            output: "output.json".to_string(),
            db_path: "assetstore/assets.db".to_string(),
            parallel: true,
            log_filter: "info".to_string(),
        }
    }
}

impl Config {
    /// Load from a TOML file. A missing file means defaults.
    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        let content = match fs::read_to_string(path) {
            Ok(content) => content,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(Self::default()),
            Err(source) => {
                return Err(ConfigError::Io {
                    path: path.display().to_string(),
                    source,
                });
            }
        };
        toml::from_str(&content).map_err(|source| ConfigError::Parse {
            path: path.display().to_string(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_file_gives_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let cfg = Config::load(dir.path().join("nope.toml")).unwrap();
        assert_eq!(cfg, Config::default());
    }

    #[test]
    fn test_partial_file_keeps_other_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("asset_sheet.toml");
        fs::write(&path, "header_marker = \"Power\"\nparallel = false\n").unwrap();
        let cfg = Config::load(&path).unwrap();
        assert_eq!(cfg.header_marker, "Power");
        assert!(!cfg.parallel);
        assert_eq!(cfg.output, "output.json");
    }

    #[test]
    fn test_bad_toml() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("bad.toml");
        fs::write(&path, "parallel = maybe").unwrap();
        assert!(matches!(Config::load(&path), Err(ConfigError::Parse { .. })));
    }
}
