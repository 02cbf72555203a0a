use clap::Parser;
use simget::{
    Cli, Command, OutputFormatter, OutputMode, SimGet, SimGetError, TransferOptions,
    UserFriendlyError,
};
use std::path::Path;
use std::process;

fn main() {
    setup_logging();
    let exit_code = run();
    process::exit(exit_code);
}

fn run() -> i32 {
    let cli = Cli::parse();

    if let Command::GenerateConfig { ref path } = cli.command {
        return handle_generate_config(path);
    }

    let simget = match SimGet::from_cli(&cli) {
        Ok(simget) => simget,
        Err(e) => {
            print_startup_error(&e);
            return exit_code_for(&e);
        }
    };

    let Some(options) = cli.transfer_options() else {
        return 1;
    };

    let result = match cli.command {
        Command::Extract(_) => simget.extract(&options),
        Command::Compress(_) => simget.compress(&options),
        Command::GenerateConfig { .. } => return 1,
    };

    match result {
        Ok(report) => {
            simget.output_formatter().print_transfer_report(&report);
            0
        }
        Err(e) => {
            log::debug!("{} failed: {:?}", describe(&options), e);
            simget.handle_error(&e);
            exit_code_for(&e)
        }
    }
}

/// Maps error types to process exit codes.
fn exit_code_for(error: &SimGetError) -> i32 {
    match error {
        SimGetError::InvalidArchiveFormat { .. } => 2,
        SimGetError::SourceNotFound { .. } => 3,
        SimGetError::NoDestination
        | SimGetError::NoPackDirectory
        | SimGetError::DestinationNotFound { .. } => 4,
        SimGetError::Archive { .. } => 5,
        _ => 1,
    }
}

fn describe(options: &TransferOptions) -> String {
    format!(
        "transfer of {}{}",
        options.source_file.display(),
        if options.simulate { " (simulated)" } else { "" }
    )
}

fn handle_generate_config(path: &Path) -> i32 {
    match SimGet::generate_sample_config(path) {
        Ok(()) => {
            println!("Generated sample configuration file: {}", path.display());
            println!("\nTo use this configuration:");
            println!("  simget extract <archive> --config {}", path.display());
            0
        }
        Err(e) => {
            eprintln!("Failed to generate configuration file: {}", e.user_message());
            if let Some(suggestion) = e.suggestion() {
                eprintln!("Suggestion: {}", suggestion);
            }
            1
        }
    }
}

fn print_startup_error(error: &SimGetError) {
    let formatter = OutputFormatter::new(OutputMode::Human, 0, false);
    formatter.print_user_friendly_error(error);
}

fn setup_logging() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("simget=warn"))
        .format_timestamp(None)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_generate_config_command() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("test.toml");

        let exit_code = handle_generate_config(&config_path);
        assert_eq!(exit_code, 0);

        let content = std::fs::read_to_string(&config_path).unwrap();
        assert!(content.contains("[archive]"));
    }

    #[test]
    fn test_generate_config_into_missing_directory() {
        let temp_dir = TempDir::new().unwrap();
        let config_path = temp_dir.path().join("missing").join("test.toml");

        assert_eq!(handle_generate_config(&config_path), 1);
    }

    #[test]
    fn test_exit_codes() {
        assert_eq!(
            exit_code_for(&SimGetError::InvalidArchiveFormat {
                path: "a.rar".to_string(),
                allowed: vec![],
            }),
            2
        );
        assert_eq!(
            exit_code_for(&SimGetError::SourceNotFound {
                path: "a.s1pk".to_string()
            }),
            3
        );
        assert_eq!(exit_code_for(&SimGetError::NoDestination), 4);
        assert_eq!(exit_code_for(&SimGetError::NoPackDirectory), 4);
        assert_eq!(
            exit_code_for(&SimGetError::Config {
                message: "bad".to_string()
            }),
            1
        );
    }
}
