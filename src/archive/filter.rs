use crate::config::ArchiveConfig;
use std::path::Path;

/// Decides which archives may be opened and which entries/files are game resources.
pub struct ArchiveFilter {
    archive_extensions: Vec<String>,
    resource_suffix: String,
}

impl ArchiveFilter {
    pub fn new(config: &ArchiveConfig) -> Self {
        let archive_extensions = config
            .allowed_extensions
            .iter()
            .map(|ext| ext.trim_start_matches('.').to_lowercase())
            .collect();

        let resource_suffix = format!(
            ".{}",
            config.resource_extension.trim_start_matches('.').to_lowercase()
        );

        Self {
            archive_extensions,
            resource_suffix,
        }
    }

    /// True when the path's extension is one of the allowed archive extensions.
    pub fn is_allowed_archive(&self, path: &Path) -> bool {
        path.extension()
            .and_then(|s| s.to_str())
            .map(|ext| {
                let ext_lower = ext.to_lowercase();
                self.archive_extensions.iter().any(|allowed| *allowed == ext_lower)
            })
            .unwrap_or(false)
    }

    pub fn is_resource_entry(&self, name: &str) -> bool {
        name.to_lowercase().ends_with(&self.resource_suffix)
    }

    pub fn is_resource_file(&self, path: &Path) -> bool {
        path.file_name()
            .and_then(|s| s.to_str())
            .is_some_and(|name| self.is_resource_entry(name))
    }

    pub fn resource_suffix(&self) -> &str {
        &self.resource_suffix
    }
}

impl Default for ArchiveFilter {
    fn default() -> Self {
        Self::new(&ArchiveConfig::default())
    }
}

/// Final path segment of a ZIP entry name. Archives built on Windows may use
/// backslashes, so both separators are honored. Directory entries yield `None`.
pub fn entry_base_name(name: &str) -> Option<&str> {
    let base = name.rsplit(['/', '\\']).next()?;

    if base.is_empty() || base == "." || base == ".." {
        None
    } else {
        Some(base)
    }
}
