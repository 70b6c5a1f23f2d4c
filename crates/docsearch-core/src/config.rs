//! Configuration: the set of libraries known to a running process (spec §9
//! "Global configuration").
//!
//! The core itself is stateless and has no environment-variable surface;
//! this is the ambient boot-time mechanism an embedding binary (the MCP
//! server) uses to turn a TOML file on disk into the immutable
//! `&[LibraryConfig]` slice the manager is constructed with. Modeled on the
//! teacher's own hierarchical `Config::load`, trimmed to a single file with
//! no per-source overrides or env var layer, since the core has none to
//! apply.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};
use crate::types::LibraryConfig;

/// The full set of libraries a process will serve.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LibrariesConfig {
    /// One entry per documentation library.
    pub libraries: Vec<LibraryConfig>,
}

impl LibrariesConfig {
    /// Loads libraries from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the file cannot be read or parsed, or if
    /// two entries share the same `id`.
    pub fn load(path: &Path) -> Result<Self> {
        let content = fs::read_to_string(path)
            .map_err(|e| Error::Config(format!("failed to read '{}': {e}", path.display())))?;
        let config: Self = toml::from_str(&content)
            .map_err(|e| Error::Config(format!("failed to parse '{}': {e}", path.display())))?;
        config.validate()?;
        Ok(config)
    }

    /// The default config file location: `<config dir>/docsearch/libraries.toml`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Config`] if the platform config directory cannot be
    /// determined.
    pub fn default_path() -> Result<PathBuf> {
        let base = directories::BaseDirs::new()
            .ok_or_else(|| Error::Config("failed to determine config directory".into()))?;
        Ok(base.config_dir().join("docsearch").join("libraries.toml"))
    }

    fn validate(&self) -> Result<()> {
        let mut seen = std::collections::HashSet::new();
        for lib in &self.libraries {
            if !seen.insert(lib.id.as_str()) {
                return Err(Error::Config(format!("duplicate library id '{}'", lib.id)));
            }
        }
        Ok(())
    }

    /// All configured library ids, in configuration order.
    #[must_use]
    pub fn ids(&self) -> Vec<String> {
        self.libraries.iter().map(|l| l.id.clone()).collect()
    }

    /// Looks up a single library's configuration by id.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&LibraryConfig> {
        self.libraries.iter().find(|l| l.id == id)
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;

    use super::*;

    fn write_toml(content: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(content.as_bytes()).unwrap();
        file
    }

    #[test]
    fn loads_libraries_from_toml() {
        let file = write_toml(
            r#"
            [[libraries]]
            id = "react"
            index_url = "https://react.dev/llms.txt"

            [[libraries]]
            id = "vue"
            index_url = "https://vuejs.org/llms.txt"
            "#,
        );
        let config = LibrariesConfig::load(file.path()).unwrap();
        assert_eq!(config.ids(), vec!["react".to_string(), "vue".to_string()]);
        assert_eq!(config.get("vue").unwrap().index_url, "https://vuejs.org/llms.txt");
    }

    #[test]
    fn duplicate_ids_are_rejected() {
        let file = write_toml(
            r#"
            [[libraries]]
            id = "react"
            index_url = "https://react.dev/llms.txt"

            [[libraries]]
            id = "react"
            index_url = "https://other.example.com/llms.txt"
            "#,
        );
        assert!(LibrariesConfig::load(file.path()).is_err());
    }

    #[test]
    fn missing_file_is_a_config_error() {
        let result = LibrariesConfig::load(Path::new("/does/not/exist.toml"));
        assert!(matches!(result, Err(Error::Config(_))));
    }

    #[test]
    fn unknown_id_lookup_returns_none() {
        let config = LibrariesConfig::default();
        assert!(config.get("missing").is_none());
    }
}
