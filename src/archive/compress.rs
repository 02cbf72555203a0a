use crate::archive::filter::ArchiveFilter;
use crate::archive::report::{Operation, TransferProgress, TransferReport};
use crate::config::ArchiveConfig;
use crate::error::{Result, SimGetError};
use std::fs;
use std::io::{self, BufReader};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

/// A resource file found directly inside the directory being packed.
#[derive(Debug, Clone)]
pub struct ResourceFile {
    pub path: PathBuf,
    pub name: String,
    pub size: u64,
}

/// Packs the `.iff` files of one directory into a new archive.
pub struct ArchiveCompressor {
    filter: ArchiveFilter,
    simulate: bool,
    compression: CompressionMethod,
}

impl ArchiveCompressor {
    pub fn new(config: &ArchiveConfig) -> Self {
        Self {
            filter: ArchiveFilter::new(config),
            simulate: false,
            compression: CompressionMethod::Deflated,
        }
    }

    pub fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Resource files directly under `dir`, sorted by name. Subdirectories are not entered.
    pub fn collect_resources(&self, dir: &Path) -> Result<(Vec<ResourceFile>, Vec<String>)> {
        let mut resources = Vec::new();
        let mut skipped = Vec::new();

        let walker = WalkDir::new(dir)
            .min_depth(1)
            .max_depth(1)
            .follow_links(false)
            .sort_by_file_name();

        for entry in walker {
            let entry = entry?;
            let name = entry.file_name().to_string_lossy().to_string();

            // Symlinks count when they resolve to a regular file.
            let metadata = fs::metadata(entry.path())
                .ok()
                .filter(|meta| meta.is_file() && self.filter.is_resource_file(entry.path()));

            let Some(metadata) = metadata else {
                skipped.push(name);
                continue;
            };

            resources.push(ResourceFile {
                path: entry.into_path(),
                name,
                size: metadata.len(),
            });
        }

        Ok((resources, skipped))
    }

    pub fn compress(
        &self,
        archive_path: &Path,
        source_dir: &Path,
        progress_callback: Option<&dyn Fn(&TransferProgress)>,
    ) -> Result<TransferReport> {
        if !source_dir.is_dir() {
            return Err(SimGetError::DestinationNotFound {
                path: source_dir.display().to_string(),
            });
        }

        let (resources, skipped) = self.collect_resources(source_dir)?;
        let mut progress = TransferProgress::new(resources.len());
        let mut report = TransferReport::new(
            Operation::Compress,
            archive_path.to_path_buf(),
            source_dir.to_path_buf(),
            self.simulate,
        );
        for name in skipped {
            log::debug!("Skipping {}", name);
            report.record_skipped(name);
        }

        let mut writer = if self.simulate {
            None
        } else {
            Some(ZipWriter::new(fs::File::create(archive_path)?))
        };
        let options = SimpleFileOptions::default()
            .compression_method(self.compression)
            .unix_permissions(0o644);

        for resource in resources {
            let bytes = match writer.as_mut() {
                Some(zip) => {
                    let options = options.large_file(needs_zip64(resource.size));
                    zip.start_file(resource.name.as_str(), options)?;
                    let mut reader = BufReader::new(fs::File::open(&resource.path)?);
                    io::copy(&mut reader, zip)?
                }
                None => resource.size,
            };

            log::debug!("{} -> {} ({} bytes)", resource.path.display(), resource.name, bytes);
            progress.update_file(resource.path.clone(), bytes);
            report.record_entry(resource.name, resource.path, bytes);

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        if let Some(zip) = writer {
            zip.finish()?;
        }

        Ok(report.finish(&progress))
    }
}

/// Entries at or past the 32-bit size limit must be written with ZIP64 headers.
fn needs_zip64(size: u64) -> bool {
    size >= u64::from(u32::MAX)
}
