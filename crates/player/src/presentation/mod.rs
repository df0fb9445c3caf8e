//! Presentation layer
//!
//! Pure view-model builders and text formatting. Skins in `ui` apply the
//! resulting `ViewUpdate`s.

pub mod format;
pub mod view_models;

pub use view_models::{Notice, NoticeLevel, StageDirection, ViewUpdate};
