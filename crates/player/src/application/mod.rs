//! Application layer
//!
//! The typed contract client, view state, the run trigger state machine,
//! pollers, and the controller that ties them together.

pub mod api;
pub mod controller;
pub mod error;
pub mod poller;
pub mod run_control;
pub mod view_bus;
pub mod view_state;

pub use api::Api;
pub use controller::{ActionOutcome, UiController};
pub use error::ServiceError;
pub use run_control::{RunControl, RunGuard};
pub use view_bus::ViewBus;
pub use view_state::{PlacementError, PlacementForm, ViewState};
