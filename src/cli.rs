use crate::config::{CliOverrides, Config};
use crate::error::Result;
use crate::TransferOptions;
use clap::{Args, Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "simget")]
#[command(version = env!("CARGO_PKG_VERSION"))]
#[command(about = "Extract and create .s1pk archives of .iff game resources")]
#[command(
    long_about = "SimGet unpacks the .iff resource files of a .s1pk, .sims1pack or .zip \
                  archive into the game's Downloads folder, and packs a folder of .iff \
                  files back into an archive for sharing."
)]
#[command(after_help = "EXAMPLES:\n  \
    simget extract chairs.s1pk --destination \"C:/Games/The Sims/Downloads\"\n  \
    simget extract chairs.s1pk --simulate\n  \
    simget compress chairs.s1pk --destination ./my-chairs\n  \
    simget generate-config simget.toml")]
#[command(arg_required_else_help = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Configuration file path
    #[arg(short, long, global = true, help = "Path to TOML configuration file")]
    pub config: Option<PathBuf>,

    /// Archive extensions to accept (comma-separated)
    #[arg(
        short,
        long,
        global = true,
        help = "Archive extensions to accept (e.g., s1pk,sims1pack,zip)"
    )]
    pub formats: Option<String>,

    /// Extension of the resource files to extract or pack
    #[arg(long, global = true, help = "Resource file extension (default: iff)")]
    pub resource_ext: Option<String>,

    /// Output format for results
    #[arg(long, value_enum, global = true, default_value_t = OutputFormat::Human)]
    pub output_format: OutputFormat,

    /// Verbose output level (-v, -vv)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Quiet mode (suppress non-essential output)
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Copy the .iff entries of an archive into a directory
    Extract(ExtractArgs),

    /// Pack the .iff files of a directory into a new archive
    Compress(CompressArgs),

    /// Write a sample configuration file
    GenerateConfig {
        /// Where to write the file
        #[arg(default_value = "simget.toml")]
        path: PathBuf,
    },
}

#[derive(Args, Debug, Clone)]
pub struct ExtractArgs {
    /// Archive to read (extract) or write (compress)
    pub file: PathBuf,

    /// Directory to extract into (defaults to the game's Downloads folder)
    #[arg(short, long, env = "SIMGET_DESTINATION")]
    pub destination: Option<PathBuf>,

    /// Show what would happen without touching the filesystem
    #[arg(short, long)]
    pub simulate: bool,
}

#[derive(Args, Debug, Clone)]
pub struct CompressArgs {
    /// Archive to create
    pub file: PathBuf,

    /// Directory holding the .iff files to pack
    #[arg(short, long, env = "SIMGET_DESTINATION")]
    pub destination: PathBuf,

    /// List the files that would be packed without creating the archive
    #[arg(short, long)]
    pub simulate: bool,
}

#[derive(Debug, Clone, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored output
    Human,
    /// JSON formatted output
    Json,
    /// Plain text output
    Plain,
}

impl Cli {
    pub fn load_config(&self) -> Result<Config> {
        let mut config = Config::load_with_defaults(self.config.as_ref())?;

        config.normalize();
        config.merge_with_cli_args(&self.create_cli_overrides());
        config.validate()?;

        Ok(config)
    }

    pub fn create_cli_overrides(&self) -> CliOverrides {
        CliOverrides::new()
            .with_formats(self.formats.clone())
            .with_resource_extension(self.resource_ext.clone())
    }

    /// Options for the extract/compress subcommands, `None` for the others.
    pub fn transfer_options(&self) -> Option<TransferOptions> {
        match &self.command {
            Command::Extract(args) => Some(
                TransferOptions::new(args.file.clone())
                    .with_destination(args.destination.clone())
                    .with_simulate(args.simulate)
                    .with_verbose(self.is_verbose()),
            ),
            Command::Compress(args) => Some(
                TransferOptions::new(args.file.clone())
                    .with_destination(Some(args.destination.clone()))
                    .with_simulate(args.simulate)
                    .with_verbose(self.is_verbose()),
            ),
            Command::GenerateConfig { .. } => None,
        }
    }

    pub fn is_verbose(&self) -> bool {
        self.verbose > 0 && !self.quiet
    }

    pub fn verbosity_level(&self) -> u8 {
        if self.quiet {
            0
        } else {
            self.verbose
        }
    }
}
