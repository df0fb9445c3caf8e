//! Outbound ports - Interfaces for external services
//!
//! These ports define the contracts that infrastructure adapters must implement,
//! allowing the controller to talk to the backend and the host platform without
//! depending on concrete implementations.

pub mod platform;
pub mod raw_api_port;

pub use platform::{DownloadError, DownloadProvider, InteractionProvider, TimeProvider};
pub use raw_api_port::{ApiError, RawApiPort};

#[cfg(any(test, feature = "testing"))]
pub use raw_api_port::MockRawApiPort;
