use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::{Duration, Instant};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Operation {
    Extract,
    Compress,
}

impl Operation {
    pub fn noun(&self) -> &'static str {
        match self {
            Operation::Extract => "Extraction",
            Operation::Compress => "Compression",
        }
    }
}

#[derive(Debug, Clone)]
pub struct TransferProgress {
    pub files_processed: usize,
    pub total_files: usize,
    pub bytes_processed: u64,
    pub current_file: Option<PathBuf>,
    pub start_time: Instant,
}

impl TransferProgress {
    pub fn new(total_files: usize) -> Self {
        Self {
            files_processed: 0,
            total_files,
            bytes_processed: 0,
            current_file: None,
            start_time: Instant::now(),
        }
    }

    pub fn update_file(&mut self, path: PathBuf, bytes: u64) {
        self.files_processed += 1;
        self.bytes_processed += bytes;
        self.current_file = Some(path);
    }

    pub fn elapsed(&self) -> Duration {
        self.start_time.elapsed()
    }
}

/// One file moved into or out of an archive.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct EntryRecord {
    pub name: String,
    pub path: PathBuf,
    pub size: u64,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TransferReport {
    pub operation: Operation,
    pub archive: PathBuf,
    pub destination: PathBuf,
    pub simulated: bool,
    pub entries: Vec<EntryRecord>,
    pub skipped: Vec<String>,
    pub total_bytes: u64,
    pub duration: Duration,
    pub completed_at: DateTime<Utc>,
}

impl TransferReport {
    pub fn new(operation: Operation, archive: PathBuf, destination: PathBuf, simulated: bool) -> Self {
        Self {
            operation,
            archive,
            destination,
            simulated,
            entries: Vec::new(),
            skipped: Vec::new(),
            total_bytes: 0,
            duration: Duration::ZERO,
            completed_at: Utc::now(),
        }
    }

    pub fn record_entry(&mut self, name: String, path: PathBuf, size: u64) {
        self.total_bytes += size;
        self.entries.push(EntryRecord { name, path, size });
    }

    pub fn record_skipped<S: Into<String>>(&mut self, name: S) {
        self.skipped.push(name.into());
    }

    pub fn finish(mut self, progress: &TransferProgress) -> Self {
        self.duration = progress.elapsed();
        self.completed_at = Utc::now();
        self
    }

    pub fn file_count(&self) -> usize {
        self.entries.len()
    }

    pub fn completion_message(&self) -> String {
        if self.simulated {
            format!(
                "{} simulated successfully ({} files, nothing written).",
                self.operation.noun(),
                self.file_count()
            )
        } else {
            format!("{} completed successfully.", self.operation.noun())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_progress_tracking() {
        let mut progress = TransferProgress::new(4);
        assert_eq!(progress.files_processed, 0);
        assert!(progress.current_file.is_none());

        progress.update_file(PathBuf::from("/tmp/out/a.iff"), 100);
        progress.update_file(PathBuf::from("/tmp/out/b.iff"), 20);
        assert_eq!(progress.files_processed, 2);
        assert_eq!(progress.bytes_processed, 120);
        assert_eq!(progress.current_file, Some(PathBuf::from("/tmp/out/b.iff")));
    }

    #[test]
    fn test_report_finish_records_duration() {
        let progress = TransferProgress::new(0);
        let report = TransferReport::new(
            Operation::Extract,
            PathBuf::from("mod.s1pk"),
            PathBuf::from("/tmp/out"),
            false,
        )
        .finish(&progress);
        assert!(report.duration <= progress.elapsed());
    }

    #[test]
    fn test_report_totals() {
        let mut report = TransferReport::new(
            Operation::Extract,
            PathBuf::from("mod.s1pk"),
            PathBuf::from("/tmp/out"),
            false,
        );
        report.record_entry("a.iff".to_string(), PathBuf::from("/tmp/out/a.iff"), 10);
        report.record_entry("b.iff".to_string(), PathBuf::from("/tmp/out/b.iff"), 32);
        report.record_skipped("readme.txt");

        assert_eq!(report.file_count(), 2);
        assert_eq!(report.total_bytes, 42);
        assert_eq!(report.skipped, vec!["readme.txt"]);
        assert_eq!(report.completion_message(), "Extraction completed successfully.");
    }

    #[test]
    fn test_simulated_completion_message() {
        let report = TransferReport::new(
            Operation::Compress,
            PathBuf::from("mod.zip"),
            PathBuf::from("/tmp/mods"),
            true,
        );
        assert!(report.completion_message().starts_with("Compression simulated"));
    }

    #[test]
    fn test_report_serializes_operation_lowercase() {
        let report = TransferReport::new(
            Operation::Extract,
            PathBuf::from("mod.zip"),
            PathBuf::from("out"),
            false,
        );
        let json = serde_json::to_value(&report).unwrap();
        assert_eq!(json["operation"], "extract");
        assert_eq!(json["simulated"], false);
    }
}
