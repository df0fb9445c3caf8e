//! Platform-specific implementations
//!
//! This module provides implementations of the platform abstraction traits
//! defined in `ports/outbound/platform.rs`.

mod desktop;

pub mod mock;

pub use desktop::{
    create_platform, DesktopTimeProvider, DirectoryDownloadProvider, PresetInteractionProvider,
    TerminalInteractionProvider,
};
