use thiserror::Error;

#[derive(Error, Debug)]
pub enum SimGetError {
    #[error("IO operation failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("Archive operation failed: {message}")]
    Archive {
        message: String,
        #[source]
        source: zip::result::ZipError,
    },

    #[error("Source file does not exist: {path}")]
    SourceNotFound { path: String },

    #[error("Invalid archive format: {path}")]
    InvalidArchiveFormat { path: String, allowed: Vec<String> },

    #[error("No destination directory could be determined")]
    NoDestination,

    #[error("No directory to pack was given")]
    NoPackDirectory,

    #[error("Destination directory does not exist: {path}")]
    DestinationNotFound { path: String },

    #[error("Configuration error: {message}")]
    Config { message: String },

    #[error("Path validation failed: {path}")]
    InvalidPath { path: String },
}

pub trait UserFriendlyError {
    fn user_message(&self) -> String;
    fn suggestion(&self) -> Option<String>;
}

impl UserFriendlyError for SimGetError {
    fn user_message(&self) -> String {
        match self {
            SimGetError::Archive { message, .. } => {
                format!("Could not process archive: {}", message)
            }
            SimGetError::SourceNotFound { path } => {
                format!("The file does not exist: {}", path)
            }
            SimGetError::InvalidArchiveFormat { path, allowed } => {
                format!(
                    "Invalid format: {} (expected one of: {})",
                    path,
                    allowed.join(", ")
                )
            }
            SimGetError::NoDestination => "Game not found.".to_string(),
            SimGetError::NoPackDirectory => "No directory to pack was given.".to_string(),
            SimGetError::DestinationNotFound { path } => {
                format!("Directory does not exist: {}", path)
            }
            SimGetError::Config { message } => {
                format!("Configuration error: {}", message)
            }
            SimGetError::InvalidPath { path } => {
                format!("Invalid file path: {}", path)
            }
            _ => self.to_string(),
        }
    }

    fn suggestion(&self) -> Option<String> {
        match self {
            SimGetError::SourceNotFound { .. } => Some(
                "Check the archive path. Relative paths are resolved against the current directory.".to_string()
            ),
            SimGetError::InvalidArchiveFormat { .. } => Some(
                "Rename the archive or allow its extension with --formats (e.g., --formats s1pk,zip).".to_string()
            ),
            SimGetError::NoDestination => Some(
                "Pass --destination, or set [paths] game_downloads in simget.toml.".to_string()
            ),
            SimGetError::NoPackDirectory => Some(
                "Pass --destination with the directory holding the .iff files.".to_string()
            ),
            SimGetError::DestinationNotFound { .. } => Some(
                "Create the directory first or point --destination at the game's Downloads folder.".to_string()
            ),
            SimGetError::Archive { .. } => Some(
                "The archive may be corrupt or truncated. Try re-downloading it.".to_string()
            ),
            SimGetError::Config { .. } => Some(
                "Check your configuration file syntax and ensure all required fields are present.".to_string()
            ),
            _ => None,
        }
    }
}

impl From<zip::result::ZipError> for SimGetError {
    fn from(error: zip::result::ZipError) -> Self {
        match error {
            zip::result::ZipError::Io(e) => SimGetError::Io(e),
            other => SimGetError::Archive {
                message: other.to_string(),
                source: other,
            },
        }
    }
}

impl From<walkdir::Error> for SimGetError {
    fn from(error: walkdir::Error) -> Self {
        let path = error
            .path()
            .map(|p| p.display().to_string())
            .unwrap_or_default();

        match error.into_io_error() {
            Some(io) => SimGetError::Io(io),
            None => SimGetError::InvalidPath {
                path: format!("Filesystem loop detected at {}", path),
            },
        }
    }
}

impl From<toml::de::Error> for SimGetError {
    fn from(error: toml::de::Error) -> Self {
        SimGetError::Config {
            message: error.to_string(),
        }
    }
}

pub type Result<T> = std::result::Result<T, SimGetError>;
