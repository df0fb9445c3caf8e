//! Desktop platform implementations
//!
//! Provides platform-specific implementations for a terminal session using
//! the standard library and native crates.

use crate::ports::outbound::platform::{
    DownloadError, DownloadProvider, InteractionProvider, TimeProvider,
};
use crate::state::Platform;
use directories::UserDirs;
use std::fs;
use std::io::{BufRead, Write};
use std::path::PathBuf;
use std::time::{SystemTime, UNIX_EPOCH};

/// Desktop time provider using std::time
#[derive(Clone, Default)]
pub struct DesktopTimeProvider;

impl TimeProvider for DesktopTimeProvider {
    fn now_millis(&self) -> u64 {
        SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .map(|d| d.as_millis() as u64)
            .unwrap_or(0)
    }
}

/// Terminal dialogs on stderr/stdin
///
/// Questions go to stderr so skins keep stdout to themselves.
#[derive(Clone, Default)]
pub struct TerminalInteractionProvider;

impl TerminalInteractionProvider {
    fn read_answer(question: &str) -> Option<String> {
        let mut stderr = std::io::stderr();
        if let Err(e) = write!(stderr, "{question}").and_then(|_| stderr.flush()) {
            tracing::warn!("Failed to write prompt: {}", e);
        }

        let mut line = String::new();
        match std::io::stdin().lock().read_line(&mut line) {
            // EOF is the terminal's "Cancel"
            Ok(0) => None,
            Ok(_) => Some(line.trim_end_matches(['\r', '\n']).to_string()),
            Err(e) => {
                tracing::warn!("Failed to read answer: {}", e);
                None
            }
        }
    }
}

impl InteractionProvider for TerminalInteractionProvider {
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        let answer = Self::read_answer(&format!("{message} [{default}]: "))?;
        if answer.is_empty() {
            Some(default.to_string())
        } else {
            Some(answer)
        }
    }

    fn confirm(&self, message: &str) -> bool {
        Self::read_answer(&format!("{message} [y/N]: "))
            .map(|answer| answer.trim().to_ascii_lowercase().starts_with('y'))
            .unwrap_or(false)
    }
}

/// Dialog answers supplied up front on the command line, falling back to
/// the terminal for anything not supplied
#[derive(Clone, Default)]
pub struct PresetInteractionProvider {
    answer: Option<String>,
    assume_yes: bool,
    terminal: TerminalInteractionProvider,
}

impl PresetInteractionProvider {
    pub fn new(answer: Option<String>, assume_yes: bool) -> Self {
        Self {
            answer,
            assume_yes,
            terminal: TerminalInteractionProvider,
        }
    }
}

impl InteractionProvider for PresetInteractionProvider {
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        match &self.answer {
            Some(answer) => Some(answer.clone()),
            None => self.terminal.prompt(message, default),
        }
    }

    fn confirm(&self, message: &str) -> bool {
        self.assume_yes || self.terminal.confirm(message)
    }
}

/// Writes downloads into a directory
///
/// Defaults to the user's download directory:
/// - Linux: ~/Downloads (XDG_DOWNLOAD_DIR)
/// - macOS: ~/Downloads
/// - Windows: C:\Users\<User>\Downloads
#[derive(Clone)]
pub struct DirectoryDownloadProvider {
    dir: PathBuf,
}

impl DirectoryDownloadProvider {
    pub fn new(dir: PathBuf) -> Self {
        Self { dir }
    }

    /// The user's download directory, or the current directory if unavailable
    pub fn default_dir() -> PathBuf {
        UserDirs::new()
            .and_then(|dirs| dirs.download_dir().map(|dir| dir.to_path_buf()))
            .unwrap_or_else(|| PathBuf::from("."))
    }

    pub fn dir(&self) -> &PathBuf {
        &self.dir
    }
}

impl Default for DirectoryDownloadProvider {
    fn default() -> Self {
        Self::new(Self::default_dir())
    }
}

impl DownloadProvider for DirectoryDownloadProvider {
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf, DownloadError> {
        let path = self.dir.join(filename);
        fs::create_dir_all(&self.dir)
            .and_then(|_| fs::write(&path, contents))
            .map_err(|source| DownloadError::Write {
                path: path.clone(),
                source,
            })?;
        tracing::debug!("Download written to: {:?}", path);
        Ok(path)
    }
}

/// Create platform services for a terminal session
pub fn create_platform(
    download_dir: PathBuf,
    preset_answer: Option<String>,
    assume_yes: bool,
) -> Platform {
    Platform::new(
        DesktopTimeProvider,
        PresetInteractionProvider::new(preset_answer, assume_yes),
        DirectoryDownloadProvider::new(download_dir),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn directory_download_writes_file_and_creates_parents() {
        let tmp = tempfile::tempdir().unwrap();
        let provider = DirectoryDownloadProvider::new(tmp.path().join("nested"));

        let path = provider.save("lora-dataset-1.json", "[]").unwrap();

        assert_eq!(path, tmp.path().join("nested").join("lora-dataset-1.json"));
        assert_eq!(fs::read_to_string(path).unwrap(), "[]");
    }

    #[test]
    fn preset_answers_skip_the_terminal() {
        let provider = PresetInteractionProvider::new(Some("evening_run".to_string()), true);

        assert_eq!(
            provider.prompt("Enter session name:", "session_1").as_deref(),
            Some("evening_run")
        );
        assert!(provider.confirm("Reset simulation?"));
    }
}
