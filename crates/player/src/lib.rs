//! Autoworld Player
//!
//! Terminal client for the Autoworld simulation backend: a typed contract
//! client, the controller and view state behind every front-end, and three
//! skins (panel, studio, diorama).
//!
//! Layers:
//! - `ports` - seams to the backend and the host platform
//! - `application` - contract client, view state, run control, pollers, controller
//! - `presentation` - pure view-model builders
//! - `ui` - skins that draw view updates
//! - `infrastructure` - HTTP adapter and platform providers

pub mod application;
pub mod config;
pub mod infrastructure;
pub mod ports;
pub mod presentation;
pub mod state;
pub mod ui;

pub use application::{ActionOutcome, Api, UiController};
pub use config::{PlayerConfig, SkinKind};
pub use state::Platform;
