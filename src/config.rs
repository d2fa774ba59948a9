use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::tidy::{FileFormat, FolderFormat, NamingConfig};

/// Application configuration loaded from ~/.config/tidylibrary/config.toml
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct Config {
    #[serde(default)]
    pub naming: NamingConfig,
    #[serde(default)]
    pub library: LibraryConfig,
    #[serde(default)]
    pub log: LogConfig,
}

/// Default library location
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct LibraryConfig {
    pub path: Option<PathBuf>,
}

/// Event log written into the library root by `apply`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogConfig {
    #[serde(default = "default_log_enabled")]
    pub enabled: bool,
    #[serde(default = "default_log_file")]
    pub file: String,
}

fn default_log_enabled() -> bool {
    true
}

fn default_log_file() -> String {
    "tidy_library_log.txt".to_string()
}

impl Default for LogConfig {
    fn default() -> Self {
        Self {
            enabled: default_log_enabled(),
            file: default_log_file(),
        }
    }
}

impl Config {
    /// Load from an explicit path, or the default location when none is given
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::load_from(path),
            None => Self::load_from(&Self::config_path()?),
        }
    }

    /// Load configuration from a specific path
    pub fn load_from(path: &Path) -> Result<Self> {
        if !path.exists() {
            return Ok(Self::default());
        }

        let content =
            std::fs::read_to_string(path).with_context(|| format!("Failed to read {:?}", path))?;

        toml::from_str(&content).with_context(|| format!("Failed to parse {:?}", path))
    }

    /// Get the default config file path
    pub fn config_path() -> Result<PathBuf> {
        let config_dir = dirs::config_dir().context("Could not determine config directory")?;
        Ok(config_dir.join("tidylibrary").join("config.toml"))
    }

    /// Naming scheme, with CLI overrides taking precedence
    pub fn naming(
        &self,
        folder_override: Option<FolderFormat>,
        file_override: Option<FileFormat>,
    ) -> NamingConfig {
        NamingConfig {
            folder_format: folder_override.unwrap_or(self.naming.folder_format),
            file_format: file_override.unwrap_or(self.naming.file_format),
        }
    }

    /// Get the library path, with CLI override taking precedence
    pub fn library(&self, cli_override: Option<&PathBuf>) -> Option<PathBuf> {
        cli_override.cloned().or_else(|| self.library.path.clone())
    }

    /// Event log location for a library, if logging is enabled
    pub fn log_path(&self, library_root: &Path) -> Option<PathBuf> {
        self.log
            .enabled
            .then(|| library_root.join(&self.log.file))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_missing_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.naming, NamingConfig::default());
        assert!(config.library.path.is_none());
        assert!(config.log.enabled);
        assert_eq!(config.log.file, "tidy_library_log.txt");
    }

    #[test]
    fn test_load_valid_config() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(
            &path,
            r#"
[naming]
folder_format = "author-book"
file_format = "title-only"

[library]
path = "/home/user/audiobooks"

[log]
enabled = false
"#,
        )
        .unwrap();

        let config = Config::load(Some(&path)).unwrap();
        assert_eq!(config.naming.folder_format, FolderFormat::AuthorBook);
        assert_eq!(config.naming.file_format, FileFormat::TitleOnly);
        assert_eq!(
            config.library.path,
            Some(PathBuf::from("/home/user/audiobooks"))
        );
        assert!(!config.log.enabled);
        assert_eq!(config.log.file, "tidy_library_log.txt");
        assert_eq!(config.log_path(Path::new("/lib")), None);
    }

    #[test]
    fn test_partial_naming_section() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[naming]\nfile_format = \"keep-original\"\n").unwrap();

        let config = Config::load_from(&path).unwrap();
        assert_eq!(config.naming.folder_format, FolderFormat::AuthorSeriesBook);
        assert_eq!(config.naming.file_format, FileFormat::KeepOriginal);
    }

    #[test]
    fn test_unknown_format_is_rejected() {
        let temp = TempDir::new().unwrap();
        let path = temp.path().join("config.toml");
        std::fs::write(&path, "[naming]\nfolder_format = \"series-first\"\n").unwrap();

        assert!(Config::load_from(&path).is_err());
    }

    #[test]
    fn test_cli_override() {
        let config = Config {
            naming: NamingConfig {
                folder_format: FolderFormat::AuthorBook,
                file_format: FileFormat::TitleOnly,
            },
            library: LibraryConfig {
                path: Some(PathBuf::from("/default/path")),
            },
            log: LogConfig::default(),
        };

        // CLI override takes precedence
        let naming = config.naming(Some(FolderFormat::AuthorSeriesBook), None);
        assert_eq!(naming.folder_format, FolderFormat::AuthorSeriesBook);
        assert_eq!(naming.file_format, FileFormat::TitleOnly);
        assert_eq!(
            config.library(Some(&PathBuf::from("/cli/path"))),
            Some(PathBuf::from("/cli/path"))
        );

        // Falls back to config when no CLI override
        assert_eq!(config.naming(None, None), config.naming);
        assert_eq!(config.library(None), Some(PathBuf::from("/default/path")));
        assert_eq!(
            config.log_path(Path::new("/lib")),
            Some(PathBuf::from("/lib/tidy_library_log.txt"))
        );
    }
}
