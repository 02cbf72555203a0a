pub mod archive;
pub mod cli;
pub mod config;
pub mod error;
pub mod locator;
pub mod ui;

// Public API re-exports
pub use cli::{Cli, Command, OutputFormat};
pub use config::{ArchiveConfig, CliOverrides, Config, PathConfig};
pub use error::{Result, SimGetError, UserFriendlyError};

// Core functionality re-exports
pub use archive::{
    ArchiveCompressor, ArchiveExtractor, ArchiveFilter, Operation, TransferProgress,
    TransferReport,
};
pub use locator::{GameLocator, InstallLocator, NoInstall};
pub use ui::{OutputFormatter, OutputMode, ProgressManager};

use std::path::{Path, PathBuf};

/// Settings for a single extract or compress run.
#[derive(Debug, Clone, Default)]
pub struct TransferOptions {
    /// Directory extracted into, or packed from.
    pub destination: Option<PathBuf>,
    pub source_file: PathBuf,
    pub simulate: bool,
    pub verbose: bool,
}

impl TransferOptions {
    pub fn new<P: Into<PathBuf>>(source_file: P) -> Self {
        Self {
            source_file: source_file.into(),
            ..Self::default()
        }
    }

    pub fn with_destination<P: Into<PathBuf>>(mut self, destination: Option<P>) -> Self {
        self.destination = destination.map(Into::into);
        self
    }

    pub fn with_simulate(mut self, simulate: bool) -> Self {
        self.simulate = simulate;
        self
    }

    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }
}

/// Main library interface for SimGet functionality
pub struct SimGet {
    config: Config,
    locator: Box<dyn InstallLocator>,
    output_formatter: OutputFormatter,
    progress_manager: ProgressManager,
}

impl SimGet {
    /// Create a new SimGet instance with the provided configuration
    pub fn new(config: Config, output_mode: OutputMode, verbose: u8, quiet: bool) -> Self {
        let output_formatter = OutputFormatter::new(output_mode, verbose, quiet);
        let progress_manager = ProgressManager::new(output_mode == OutputMode::Human && !quiet);
        let locator = Box::new(GameLocator::from_config(&config));

        Self {
            config,
            locator,
            output_formatter,
            progress_manager,
        }
    }

    /// Create SimGet instance from CLI arguments
    pub fn from_cli(cli_args: &Cli) -> Result<Self> {
        let config = cli_args.load_config()?;
        let output_mode = match cli_args.output_format {
            OutputFormat::Human => OutputMode::Human,
            OutputFormat::Json => OutputMode::Json,
            OutputFormat::Plain => OutputMode::Plain,
        };

        Ok(Self::new(
            config,
            output_mode,
            cli_args.verbosity_level(),
            cli_args.quiet,
        ))
    }

    /// Replace the source of the default extraction directory.
    pub fn with_locator<L: InstallLocator + 'static>(mut self, locator: L) -> Self {
        self.locator = Box::new(locator);
        self
    }

    /// Copy the resource entries of `options.source_file` into the destination.
    pub fn extract(&self, options: &TransferOptions) -> Result<TransferReport> {
        self.output_formatter.start_operation(&format!(
            "Extracting {}",
            options.source_file.display()
        ));
        self.output_formatter.debug(&format!(
            "Accepted archive extensions: {}",
            self.config.archive.allowed_extensions.join(", ")
        ));

        let extractor = ArchiveExtractor::new(&self.config.archive).with_simulate(options.simulate);

        let pb = self.progress_manager.create_entry_progress(0, "Extracting");
        let callback = |progress: &TransferProgress| {
            if let Some(ref path) = progress.current_file {
                pb.suspend(|| self.output_formatter.entry_path(path));
            }
            ui::progress::update_entry_progress(&pb, progress);
        };

        let result = extractor.extract(
            &options.source_file,
            options.destination.as_deref(),
            self.locator.as_ref(),
            Some(&callback),
        );

        self.finish(&pb, result, options)
    }

    /// Pack the resource files found in the destination into `options.source_file`.
    pub fn compress(&self, options: &TransferOptions) -> Result<TransferReport> {
        let source_dir = options
            .destination
            .as_deref()
            .ok_or(SimGetError::NoPackDirectory)?;

        self.output_formatter.start_operation(&format!(
            "Packing {} into {}",
            source_dir.display(),
            options.source_file.display()
        ));

        let compressor = ArchiveCompressor::new(&self.config.archive).with_simulate(options.simulate);

        let pb = self.progress_manager.create_entry_progress(0, "Packing");
        let callback = |progress: &TransferProgress| {
            if let Some(ref path) = progress.current_file {
                pb.suspend(|| self.output_formatter.entry_path(path));
            }
            ui::progress::update_entry_progress(&pb, progress);
        };

        let result = compressor.compress(&options.source_file, source_dir, Some(&callback));

        self.finish(&pb, result, options)
    }

    fn finish(
        &self,
        pb: &indicatif::ProgressBar,
        result: Result<TransferReport>,
        options: &TransferOptions,
    ) -> Result<TransferReport> {
        let report = match result {
            Ok(report) => report,
            Err(e) => {
                pb.finish_and_clear();
                return Err(e);
            }
        };

        ui::progress::finish_progress_with_summary(
            pb,
            &format!("{} files", report.file_count()),
            report.duration,
        );

        if options.verbose {
            for skipped in &report.skipped {
                self.output_formatter.info(&format!("Skipped {}", skipped));
            }
            self.output_formatter.info(&format!(
                "{} files, {} bytes",
                report.file_count(),
                report.total_bytes
            ));
        }

        if report.entries.is_empty() {
            self.output_formatter.warning(&format!(
                "No {} files found",
                ArchiveFilter::new(&self.config.archive).resource_suffix()
            ));
        }

        Ok(report)
    }

    /// Generate sample configuration file
    pub fn generate_sample_config<P: AsRef<Path>>(output_path: P) -> Result<()> {
        let sample_config = Config::create_sample_config();
        std::fs::write(output_path.as_ref(), sample_config)?;
        Ok(())
    }

    /// Get configuration reference
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get output formatter reference
    pub fn output_formatter(&self) -> &OutputFormatter {
        &self.output_formatter
    }

    /// Handle error with user-friendly output
    pub fn handle_error(&self, error: &SimGetError) {
        self.output_formatter.print_user_friendly_error(error);
    }
}
