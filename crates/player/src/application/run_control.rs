//! Run trigger state machine: idle -> running -> idle.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use crate::application::ViewBus;
use crate::presentation::view_models::run_trigger;
use crate::presentation::ViewUpdate;

#[derive(Clone)]
pub struct RunControl {
    running: Arc<AtomicBool>,
    bus: ViewBus,
}

impl RunControl {
    pub fn new(bus: ViewBus) -> Self {
        Self {
            running: Arc::new(AtomicBool::new(false)),
            bus,
        }
    }

    /// Whether the trigger is enabled (no run in flight)
    pub fn is_enabled(&self) -> bool {
        !self.running.load(Ordering::SeqCst)
    }

    /// Enter `running` and disable the trigger.
    ///
    /// Returns `None` while a run is already in flight. The trigger comes
    /// back when the guard drops, whatever happened in between.
    pub fn begin(&self) -> Option<RunGuard> {
        if self.running.swap(true, Ordering::SeqCst) {
            return None;
        }
        self.bus.publish(ViewUpdate::RunTrigger(run_trigger(false)));
        Some(RunGuard {
            control: self.clone(),
        })
    }
}

#[must_use = "the run ends when the guard is dropped"]
pub struct RunGuard {
    control: RunControl,
}

impl Drop for RunGuard {
    fn drop(&mut self) {
        self.control.running.store(false, Ordering::SeqCst);
        self.control
            .bus
            .publish(ViewUpdate::RunTrigger(run_trigger(true)));
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn guard_disables_then_reenables() {
        let (bus, mut rx) = ViewBus::channel();
        let control = RunControl::new(bus);

        let guard = control.begin().unwrap();
        assert!(!control.is_enabled());
        assert!(control.begin().is_none());
        drop(guard);
        assert!(control.is_enabled());

        assert_eq!(
            rx.try_recv().unwrap(),
            ViewUpdate::RunTrigger(run_trigger(false))
        );
        assert_eq!(
            rx.try_recv().unwrap(),
            ViewUpdate::RunTrigger(run_trigger(true))
        );
    }

    #[test]
    fn trigger_returns_after_panic() {
        let (bus, _rx) = ViewBus::channel();
        let control = RunControl::new(bus);

        let inner = control.clone();
        let result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(move || {
            let _guard = inner.begin().unwrap();
            panic!("request blew up");
        }));

        assert!(result.is_err());
        assert!(control.is_enabled());
    }
}
