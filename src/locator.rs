use crate::config::Config;
use std::path::PathBuf;

/// Source of the default extraction directory when none was given.
pub trait InstallLocator {
    fn downloads_dir(&self) -> Option<PathBuf>;
}

/// Prefers the configured Downloads folder and falls back to the usual
/// install location on Windows.
#[derive(Debug, Clone, Default)]
pub struct GameLocator {
    configured: Option<PathBuf>,
}

impl GameLocator {
    pub fn new(configured: Option<PathBuf>) -> Self {
        Self { configured }
    }

    pub fn from_config(config: &Config) -> Self {
        Self::new(config.paths.game_downloads.clone())
    }
}

impl InstallLocator for GameLocator {
    fn downloads_dir(&self) -> Option<PathBuf> {
        self.configured.clone().or_else(guess_downloads_dir)
    }
}

/// Never finds anything. Used where the caller must supply a destination.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoInstall;

impl InstallLocator for NoInstall {
    fn downloads_dir(&self) -> Option<PathBuf> {
        None
    }
}

#[cfg(windows)]
pub fn guess_downloads_dir() -> Option<PathBuf> {
    const GAME_FOLDER: &str = "The Sims Complete Collection";
    const DOWNLOADS_FOLDER: &str = "Downloads";

    let program_files = std::env::var_os("ProgramFiles(x86)")
        .or_else(|| std::env::var_os("ProgramFiles"))?;

    Some(
        PathBuf::from(program_files)
            .join(GAME_FOLDER)
            .join(DOWNLOADS_FOLDER),
    )
}

#[cfg(not(windows))]
pub fn guess_downloads_dir() -> Option<PathBuf> {
    None
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_configured_path_wins() {
        let locator = GameLocator::new(Some(PathBuf::from("/games/sims/Downloads")));
        assert_eq!(
            locator.downloads_dir(),
            Some(PathBuf::from("/games/sims/Downloads"))
        );
    }

    #[test]
    fn test_from_config() {
        let mut config = Config::default();
        config.paths.game_downloads = Some(PathBuf::from("D:/Sims/Downloads"));
        let locator = GameLocator::from_config(&config);
        assert_eq!(locator.downloads_dir(), Some(PathBuf::from("D:/Sims/Downloads")));
    }

    #[test]
    fn test_no_install() {
        assert!(NoInstall.downloads_dir().is_none());
    }

    #[cfg(not(windows))]
    #[test]
    fn test_no_guess_outside_windows() {
        assert!(GameLocator::default().downloads_dir().is_none());
    }

    #[cfg(windows)]
    #[test]
    fn test_windows_guess_ends_with_downloads() {
        if let Some(path) = guess_downloads_dir() {
            assert!(path.ends_with("The Sims Complete Collection/Downloads"));
        }
    }
}
