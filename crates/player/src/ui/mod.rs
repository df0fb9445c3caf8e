//! Skins
//!
//! A skin is the imperative half of rendering: it receives `ViewUpdate`s
//! from the controller and draws them. Three skins share one controller:
//! - `PanelSkin` - the basic panel layout, plain sections and alerts
//! - `StudioSkin` - compact chips, toasts and a map grid
//! - `DioramaApp` - the interactive terminal diorama

pub mod diorama;
pub mod panel;
pub mod studio;

use std::io;

use tokio::sync::mpsc::UnboundedReceiver;

use crate::presentation::ViewUpdate;

pub use diorama::{DioramaApp, DioramaState};
pub use panel::PanelSkin;
pub use studio::StudioSkin;

pub trait Skin {
    /// Replace whatever this update targets. Applying the same update twice
    /// leaves the same output.
    fn apply(&mut self, update: &ViewUpdate) -> io::Result<()>;
}

/// Apply every update already queued, returning how many were drawn
pub fn drain_into<S: Skin + ?Sized>(
    skin: &mut S,
    receiver: &mut UnboundedReceiver<ViewUpdate>,
) -> io::Result<usize> {
    let mut applied = 0;
    while let Ok(update) = receiver.try_recv() {
        skin.apply(&update)?;
        applied += 1;
    }
    Ok(applied)
}
