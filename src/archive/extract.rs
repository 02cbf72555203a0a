use crate::archive::filter::{entry_base_name, ArchiveFilter};
use crate::archive::report::{Operation, TransferProgress, TransferReport};
use crate::config::ArchiveConfig;
use crate::error::{Result, SimGetError};
use crate::locator::InstallLocator;
use std::fs;
use std::io::{self, BufWriter, Write};
use std::path::{Path, PathBuf};
use zip::ZipArchive;

const WRITE_BUFFER_SIZE: usize = 64 * 1024;

/// Copies `.iff` entries out of an `.s1pk`/`.sims1pack`/`.zip` archive.
pub struct ArchiveExtractor {
    filter: ArchiveFilter,
    allowed_extensions: Vec<String>,
    simulate: bool,
    working_dir: PathBuf,
}

impl ArchiveExtractor {
    pub fn new(config: &ArchiveConfig) -> Self {
        Self {
            filter: ArchiveFilter::new(config),
            allowed_extensions: config.allowed_extensions.clone(),
            simulate: false,
            working_dir: std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")),
        }
    }

    pub fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    /// Directory reported as the destination in simulate mode.
    pub fn with_working_dir<P: Into<PathBuf>>(mut self, dir: P) -> Self {
        self.working_dir = dir.into();
        self
    }

    /// Checks every precondition in order and returns the directory entries
    /// will be written to. Nothing on disk is touched and the archive is not opened.
    pub fn resolve_destination(
        &self,
        source: &Path,
        destination: Option<&Path>,
        locator: &dyn InstallLocator,
    ) -> Result<PathBuf> {
        let mut destination = destination.map(Path::to_path_buf);

        if self.simulate {
            destination = Some(self.working_dir.clone());
        }

        if !source.is_file() {
            return Err(SimGetError::SourceNotFound {
                path: source.display().to_string(),
            });
        }

        if destination.is_none() && !self.simulate {
            destination = locator.downloads_dir();
            if let Some(ref guessed) = destination {
                log::info!("No destination given, using {}", guessed.display());
            }
        }

        if !self.filter.is_allowed_archive(source) {
            return Err(SimGetError::InvalidArchiveFormat {
                path: source.display().to_string(),
                allowed: self.allowed_extensions.clone(),
            });
        }

        let destination = destination.ok_or(SimGetError::NoDestination)?;

        if !self.simulate && !destination.is_dir() {
            return Err(SimGetError::DestinationNotFound {
                path: destination.display().to_string(),
            });
        }

        Ok(destination)
    }

    pub fn extract(
        &self,
        source: &Path,
        destination: Option<&Path>,
        locator: &dyn InstallLocator,
        progress_callback: Option<&dyn Fn(&TransferProgress)>,
    ) -> Result<TransferReport> {
        let destination = self.resolve_destination(source, destination, locator)?;

        let file = fs::File::open(source)?;
        let mut archive = ZipArchive::new(file)?;

        let total = archive
            .file_names()
            .filter_map(entry_base_name)
            .filter(|base| self.filter.is_resource_entry(base))
            .count();
        let mut progress = TransferProgress::new(total);
        let mut report = TransferReport::new(
            Operation::Extract,
            source.to_path_buf(),
            destination.clone(),
            self.simulate,
        );

        for index in 0..archive.len() {
            let mut entry = archive.by_index(index)?;
            let name = entry.name().to_string();

            let base_name = entry_base_name(&name)
                .filter(|base| !entry.is_dir() && self.filter.is_resource_entry(base))
                .map(str::to_string);

            let Some(base_name) = base_name else {
                log::debug!("Skipping entry {}", name);
                report.record_skipped(name);
                continue;
            };

            let target = destination.join(&base_name);

            let bytes = if self.simulate {
                entry.size()
            } else {
                self.write_entry(&mut entry, &target)?
            };

            log::debug!("{} -> {} ({} bytes)", name, target.display(), bytes);
            progress.update_file(target.clone(), bytes);
            report.record_entry(base_name, target, bytes);

            if let Some(callback) = progress_callback {
                callback(&progress);
            }
        }

        Ok(report.finish(&progress))
    }

    fn write_entry<R: io::Read>(&self, entry: &mut R, target: &Path) -> Result<u64> {
        let file = fs::File::create(target)?;
        let mut writer = BufWriter::with_capacity(WRITE_BUFFER_SIZE, file);
        let bytes = io::copy(entry, &mut writer)?;
        writer.flush()?;
        Ok(bytes)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::locator::{GameLocator, NoInstall};
    use std::cell::RefCell;
    use std::io::Cursor;
    use tempfile::TempDir;
    use zip::write::SimpleFileOptions;
    use zip::ZipWriter;

    fn build_archive(path: &Path, entries: &[(&str, &str)]) {
        let mut writer = ZipWriter::new(Cursor::new(Vec::new()));
        for (name, data) in entries {
            if name.ends_with('/') {
                writer.add_directory(*name, SimpleFileOptions::default()).unwrap();
            } else {
                writer.start_file(*name, SimpleFileOptions::default()).unwrap();
                writer.write_all(data.as_bytes()).unwrap();
            }
        }
        let cursor = writer.finish().unwrap();
        fs::write(path, cursor.into_inner()).unwrap();
    }

    fn sample_archive(dir: &Path, file_name: &str) -> PathBuf {
        let path = dir.join(file_name);
        build_archive(
            &path,
            &[
                ("objects/", ""),
                ("objects/chair.iff", "chair-bytes"),
                ("TABLE.IFF", "table-bytes"),
                ("readme.txt", "not a resource"),
            ],
        );
        path
    }

    #[test]
    fn test_extracts_only_resource_entries() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let archive = sample_archive(src.path(), "mod.s1pk");

        let report = ArchiveExtractor::new(&ArchiveConfig::default())
            .extract(&archive, Some(dest.path()), &NoInstall, None)
            .unwrap();

        assert_eq!(report.file_count(), 2);
        assert_eq!(fs::read(dest.path().join("chair.iff")).unwrap(), b"chair-bytes");
        assert_eq!(fs::read(dest.path().join("TABLE.IFF")).unwrap(), b"table-bytes");
        assert!(!dest.path().join("readme.txt").exists());
        assert!(!dest.path().join("objects").exists());
        assert_eq!(report.skipped, vec!["objects/", "readme.txt"]);
    }

    #[test]
    fn test_overwrites_existing_files() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let archive = sample_archive(src.path(), "mod.zip");
        fs::write(dest.path().join("chair.iff"), b"old contents that are longer").unwrap();

        ArchiveExtractor::new(&ArchiveConfig::default())
            .extract(&archive, Some(dest.path()), &NoInstall, None)
            .unwrap();

        assert_eq!(fs::read(dest.path().join("chair.iff")).unwrap(), b"chair-bytes");
    }

    #[test]
    fn test_simulate_writes_nothing() {
        let src = TempDir::new().unwrap();
        let work = TempDir::new().unwrap();
        let archive = sample_archive(src.path(), "mod.sims1pack");
        let seen = RefCell::new(Vec::new());
        let callback = |p: &TransferProgress| {
            seen.borrow_mut().push(p.current_file.clone().unwrap());
        };

        let report = ArchiveExtractor::new(&ArchiveConfig::default())
            .with_simulate(true)
            .with_working_dir(work.path())
            .extract(&archive, Some(Path::new("/does/not/exist")), &NoInstall, Some(&callback))
            .unwrap();

        assert!(report.simulated);
        assert_eq!(report.destination, work.path());
        assert_eq!(
            *seen.borrow(),
            vec![work.path().join("chair.iff"), work.path().join("TABLE.IFF")]
        );
        assert_eq!(fs::read_dir(work.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_bare_suffix_entries_are_extracted() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let archive = src.path().join("hidden.zip");
        build_archive(&archive, &[(".iff", "top"), ("objects/.iff", "nested")]);
        let totals = RefCell::new(Vec::new());
        let callback = |p: &TransferProgress| totals.borrow_mut().push(p.total_files);

        let report = ArchiveExtractor::new(&ArchiveConfig::default())
            .extract(&archive, Some(dest.path()), &NoInstall, Some(&callback))
            .unwrap();

        assert_eq!(report.file_count(), 2);
        assert!(report.skipped.is_empty());
        assert_eq!(*totals.borrow(), vec![2, 2]);
        assert_eq!(fs::read(dest.path().join(".iff")).unwrap(), b"nested");
    }

    #[test]
    fn test_missing_source_is_rejected() {
        let dest = TempDir::new().unwrap();
        let result = ArchiveExtractor::new(&ArchiveConfig::default()).extract(
            &dest.path().join("missing.s1pk"),
            Some(dest.path()),
            &NoInstall,
            None,
        );

        assert!(matches!(result, Err(SimGetError::SourceNotFound { .. })));
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_invalid_extension_is_rejected_before_opening() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        // Not a ZIP at all: opening it would fail with an archive error instead.
        let bogus = src.path().join("mod.rar");
        fs::write(&bogus, b"garbage").unwrap();

        let result = ArchiveExtractor::new(&ArchiveConfig::default()).extract(
            &bogus,
            Some(dest.path()),
            &NoInstall,
            None,
        );

        assert!(matches!(result, Err(SimGetError::InvalidArchiveFormat { .. })));
    }

    #[test]
    fn test_missing_destination_is_rejected() {
        let src = TempDir::new().unwrap();
        let archive = sample_archive(src.path(), "mod.s1pk");

        let result = ArchiveExtractor::new(&ArchiveConfig::default()).extract(
            &archive,
            Some(&src.path().join("nope")),
            &NoInstall,
            None,
        );
        assert!(matches!(result, Err(SimGetError::DestinationNotFound { .. })));

        let result = ArchiveExtractor::new(&ArchiveConfig::default()).extract(
            &archive,
            None,
            &NoInstall,
            None,
        );
        assert!(matches!(result, Err(SimGetError::NoDestination)));
    }

    #[test]
    fn test_locator_supplies_destination() {
        let src = TempDir::new().unwrap();
        let downloads = TempDir::new().unwrap();
        let archive = sample_archive(src.path(), "mod.s1pk");
        let locator = GameLocator::new(Some(downloads.path().to_path_buf()));

        let report = ArchiveExtractor::new(&ArchiveConfig::default())
            .extract(&archive, None, &locator, None)
            .unwrap();

        assert_eq!(report.destination, downloads.path());
        assert!(downloads.path().join("chair.iff").exists());
    }

    #[test]
    fn test_corrupt_archive_reports_archive_error() {
        let src = TempDir::new().unwrap();
        let dest = TempDir::new().unwrap();
        let corrupt = src.path().join("broken.zip");
        fs::write(&corrupt, b"PK\x03\x04 definitely not a zip").unwrap();

        let result = ArchiveExtractor::new(&ArchiveConfig::default()).extract(
            &corrupt,
            Some(dest.path()),
            &NoInstall,
            None,
        );

        assert!(matches!(
            result,
            Err(SimGetError::Archive { .. }) | Err(SimGetError::Io(_))
        ));
        assert_eq!(fs::read_dir(dest.path()).unwrap().count(), 0);
    }
}
