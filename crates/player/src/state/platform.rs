//! Platform DI Container
//!
//! This module provides the `Platform` struct - a dependency injection container
//! that aggregates all platform-specific service implementations behind port traits.
//!
//! Usage:
//! - Created by `create_platform()` in `infrastructure/platform/desktop.rs`, or by
//!   the mock module in tests
//! - Handed to `UiController::create`, which clones it into every operation

use std::{path::PathBuf, sync::Arc};

use crate::ports::outbound::{DownloadError, DownloadProvider, InteractionProvider, TimeProvider};

/// Unified platform services container
#[derive(Clone)]
pub struct Platform {
    time: Arc<dyn TimeProviderDyn>,
    interaction: Arc<dyn InteractionProviderDyn>,
    downloads: Arc<dyn DownloadProviderDyn>,
}

// =============================================================================
// Dynamic trait versions for Arc storage (need Send + Sync for spawned tasks)
// =============================================================================

trait TimeProviderDyn: Send + Sync {
    fn now_millis(&self) -> u64;
}

trait InteractionProviderDyn: Send + Sync {
    fn prompt(&self, message: &str, default: &str) -> Option<String>;
    fn confirm(&self, message: &str) -> bool;
}

trait DownloadProviderDyn: Send + Sync {
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf, DownloadError>;
}

// =============================================================================
// Blanket implementations - convert port traits to dyn-safe wrappers
// =============================================================================

impl<T: TimeProvider + Send + Sync> TimeProviderDyn for T {
    fn now_millis(&self) -> u64 {
        TimeProvider::now_millis(self)
    }
}

impl<T: InteractionProvider + Send + Sync> InteractionProviderDyn for T {
    fn prompt(&self, message: &str, default: &str) -> Option<String> {
        InteractionProvider::prompt(self, message, default)
    }
    fn confirm(&self, message: &str) -> bool {
        InteractionProvider::confirm(self, message)
    }
}

impl<T: DownloadProvider + Send + Sync> DownloadProviderDyn for T {
    fn save(&self, filename: &str, contents: &str) -> Result<PathBuf, DownloadError> {
        DownloadProvider::save(self, filename, contents)
    }
}

// =============================================================================
// Platform implementation
// =============================================================================

impl Platform {
    /// Create a new Platform with the given providers
    pub fn new<Tm, I, D>(time: Tm, interaction: I, downloads: D) -> Self
    where
        Tm: TimeProvider + Send + Sync,
        I: InteractionProvider + Send + Sync,
        D: DownloadProvider + Send + Sync,
    {
        Self {
            time: Arc::new(time),
            interaction: Arc::new(interaction),
            downloads: Arc::new(downloads),
        }
    }

    // -------------------------------------------------------------------------
    // Time operations
    // -------------------------------------------------------------------------

    /// Get current time in milliseconds since epoch
    pub fn now_millis(&self) -> u64 {
        self.time.now_millis()
    }

    // -------------------------------------------------------------------------
    // Dialogs
    // -------------------------------------------------------------------------

    pub fn prompt(&self, message: &str, default: &str) -> Option<String> {
        self.interaction.prompt(message, default)
    }

    pub fn confirm(&self, message: &str) -> bool {
        self.interaction.confirm(message)
    }

    // -------------------------------------------------------------------------
    // Downloads
    // -------------------------------------------------------------------------

    pub fn save_download(&self, filename: &str, contents: &str) -> Result<PathBuf, DownloadError> {
        self.downloads.save(filename, contents)
    }
}
