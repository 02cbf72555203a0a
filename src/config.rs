use crate::error::{Result, SimGetError};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
#[serde(default)]
pub struct Config {
    pub archive: ArchiveConfig,
    pub paths: PathConfig,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ArchiveConfig {
    pub allowed_extensions: Vec<String>,
    pub resource_extension: String,
}

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct PathConfig {
    /// Game install's Downloads folder, used when extracting without --destination
    #[serde(skip_serializing_if = "Option::is_none")]
    pub game_downloads: Option<PathBuf>,
}

impl Default for ArchiveConfig {
    fn default() -> Self {
        Self {
            allowed_extensions: vec![
                "s1pk".to_string(),
                "sims1pack".to_string(),
                "zip".to_string(),
            ],
            resource_extension: "iff".to_string(),
        }
    }
}

impl Config {
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();

        if !path.exists() {
            return Err(SimGetError::Config {
                message: format!("Configuration file not found: {}", path.display()),
            });
        }

        let content = std::fs::read_to_string(path).map_err(|e| SimGetError::Config {
            message: format!("Failed to read config file {}: {}", path.display(), e),
        })?;

        let config: Config = toml::from_str(&content).map_err(|e| SimGetError::Config {
            message: format!("Failed to parse config file {}: {}", path.display(), e),
        })?;

        Ok(config)
    }

    pub fn load_with_defaults<P: AsRef<Path>>(config_path: Option<P>) -> Result<Self> {
        match config_path {
            Some(path) => Self::load_from_file(path),
            None => {
                let default_paths = ["simget.toml", ".simget.toml"];

                for default_path in &default_paths {
                    if Path::new(default_path).exists() {
                        log::debug!("Using configuration file {}", default_path);
                        return Self::load_from_file(default_path);
                    }
                }

                Ok(Self::default())
            }
        }
    }

    pub fn merge_with_cli_args(&mut self, cli_args: &CliOverrides) {
        if let Some(ref formats) = cli_args.formats {
            self.archive.allowed_extensions =
                formats.split(',').map(normalize_extension).filter(|s| !s.is_empty()).collect();
        }

        if let Some(ref ext) = cli_args.resource_extension {
            self.archive.resource_extension = normalize_extension(ext);
        }
    }

    /// Lowercases extensions and strips any leading dot so `.S1PK` and `s1pk` compare equal.
    pub fn normalize(&mut self) {
        self.archive.allowed_extensions = self
            .archive
            .allowed_extensions
            .iter()
            .map(|e| normalize_extension(e))
            .filter(|e| !e.is_empty())
            .collect();
        self.archive.resource_extension = normalize_extension(&self.archive.resource_extension);
    }

    pub fn validate(&self) -> Result<()> {
        if self.archive.allowed_extensions.is_empty() {
            return Err(SimGetError::Config {
                message: "At least one archive extension must be allowed".to_string(),
            });
        }

        if self.archive.resource_extension.is_empty() {
            return Err(SimGetError::Config {
                message: "Resource extension must not be empty".to_string(),
            });
        }

        if let Some(ref downloads) = self.paths.game_downloads {
            if downloads.as_os_str().is_empty() {
                return Err(SimGetError::Config {
                    message: "paths.game_downloads must not be an empty path".to_string(),
                });
            }
        }

        Ok(())
    }

    pub fn create_sample_config() -> String {
        let header = "# SimGet configuration\n\
                      #\n\
                      # [paths]\n\
                      # game_downloads = \"C:/Program Files (x86)/The Sims Complete Collection/Downloads\"\n\n";
        let body = toml::to_string_pretty(&Self::default()).unwrap_or_default();
        format!("{}{}", header, body)
    }
}

fn normalize_extension(ext: &str) -> String {
    ext.trim().trim_start_matches('.').to_lowercase()
}

#[derive(Debug, Default)]
pub struct CliOverrides {
    pub formats: Option<String>,
    pub resource_extension: Option<String>,
}

impl CliOverrides {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_formats(mut self, formats: Option<String>) -> Self {
        self.formats = formats;
        self
    }

    pub fn with_resource_extension(mut self, ext: Option<String>) -> Self {
        self.resource_extension = ext;
        self
    }
}
