//! Platform abstraction ports
//!
//! These traits abstract host-specific operations so that:
//! 1. Controller code remains platform-agnostic
//! 2. Terminal/file-system code is isolated in infrastructure
//! 3. Code becomes easily testable with mock implementations
//!
//! NOTE: The `Platform` struct (DI container) that aggregates these traits
//! lives in `state/platform.rs`, not here.

use std::path::PathBuf;

/// Time operations abstraction
pub trait TimeProvider: Clone + 'static {
    /// Get current time in milliseconds since epoch
    fn now_millis(&self) -> u64;
}

/// Modal user dialogs.
///
/// Both calls block the caller until the user answers, the way a browser
/// `prompt`/`confirm` blocks its page.
pub trait InteractionProvider: Clone + 'static {
    /// Ask for a line of text. `None` when the user cancels.
    fn prompt(&self, message: &str, default: &str) -> Option<String>;

    /// Ask a yes/no question
    fn confirm(&self, message: &str) -> bool;
}

#[derive(Debug, thiserror::Error)]
pub enum DownloadError {
    #[error("Failed to write {path}: {source}")]
    Write {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Client-side file delivery (the terminal counterpart of a browser download)
pub trait DownloadProvider: Clone + 'static {
    /// Deliver `contents` under `filename`; returns where it landed
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf, DownloadError>;
}
