//! Player port definitions.
//!
//! Ports are the seams between the controller and the outside world: the
//! backend HTTP boundary and the platform services (clock, dialogs, files).

pub mod outbound;
