//! In-memory platform for tests
//!
//! Scripted dialog answers, a settable clock and captured downloads. Compiled
//! unconditionally so integration tests can build a `Platform` without a
//! terminal or file system.

use std::collections::VecDeque;
use std::path::PathBuf;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};

use crate::ports::outbound::platform::{
    DownloadError, DownloadProvider, InteractionProvider, TimeProvider,
};
use crate::state::Platform;

/// Clock that only moves when told to
#[derive(Clone, Default)]
pub struct MockTimeProvider {
    millis: Arc<AtomicU64>,
}

impl MockTimeProvider {
    pub fn new(millis: u64) -> Self {
        Self {
            millis: Arc::new(AtomicU64::new(millis)),
        }
    }

    pub fn set(&self, millis: u64) {
        self.millis.store(millis, Ordering::SeqCst);
    }
}

impl TimeProvider for MockTimeProvider {
    fn now_millis(&self) -> u64 {
        self.millis.load(Ordering::SeqCst)
    }
}

/// Dialogs answered from a script; every question is recorded
#[derive(Clone, Default)]
pub struct ScriptedInteraction {
    prompts: Arc<Mutex<VecDeque<Option<String>>>>,
    confirms: Arc<Mutex<VecDeque<bool>>>,
    asked: Arc<Mutex<Vec<String>>>,
}

impl ScriptedInteraction {
    /// Queue the answer for the next `prompt` (`None` = cancel)
    pub fn answer_prompt(&self, answer: Option<&str>) {
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(answer.map(str::to_string));
    }

    pub fn answer_confirm(&self, answer: bool) {
        self.confirms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push_back(answer);
    }

    /// Every question shown so far, in order
    pub fn asked(&self) -> Vec<String> {
        self.asked.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }

    fn record(&self, message: &str) {
        self.asked
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(message.to_string());
    }
}

impl InteractionProvider for ScriptedInteraction {
    /// Unscripted prompts accept the default
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        self.record(message);
        self.prompts
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or_else(|| Some(default.to_string()))
    }

    /// Unscripted confirmations decline
    fn confirm(&self, message: &str) -> bool {
        self.record(message);
        self.confirms
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .pop_front()
            .unwrap_or(false)
    }
}

/// A download captured in memory
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SavedDownload {
    pub filename: String,
    pub contents: String,
}

#[derive(Clone, Default)]
pub struct MemoryDownloads {
    saved: Arc<Mutex<Vec<SavedDownload>>>,
}

impl MemoryDownloads {
    pub fn saved(&self) -> Vec<SavedDownload> {
        self.saved.lock().unwrap_or_else(|e| e.into_inner()).clone()
    }
}

impl DownloadProvider for MemoryDownloads {
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf, DownloadError> {
        self.saved
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .push(SavedDownload {
                filename: filename.to_string(),
                contents: contents.to_string(),
            });
        Ok(PathBuf::from(filename))
    }
}

/// Handles onto the pieces of a mock `Platform`
#[derive(Clone, Default)]
pub struct MockPlatform {
    pub time: MockTimeProvider,
    pub interaction: ScriptedInteraction,
    pub downloads: MemoryDownloads,
}

impl MockPlatform {
    pub fn new(now_millis: u64) -> Self {
        Self {
            time: MockTimeProvider::new(now_millis),
            ..Self::default()
        }
    }

    pub fn platform(&self) -> Platform {
        Platform::new(
            self.time.clone(),
            self.interaction.clone(),
            self.downloads.clone(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripted_answers_are_consumed_in_order() {
        let mock = MockPlatform::new(1_700_000_000_000);
        mock.interaction.answer_prompt(None);
        let platform = mock.platform();

        assert_eq!(platform.prompt("Enter session name:", "s"), None);
        assert_eq!(
            platform.prompt("Enter session name:", "s").as_deref(),
            Some("s")
        );
        assert!(!platform.confirm("Reset simulation?"));
        assert_eq!(mock.interaction.asked().len(), 3);
        assert_eq!(platform.now_millis(), 1_700_000_000_000);
    }
}
