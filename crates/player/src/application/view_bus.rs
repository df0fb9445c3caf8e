//! View bus: the channel from the controller to whichever skin is active.

use tokio::sync::mpsc::{unbounded_channel, UnboundedReceiver, UnboundedSender};

use crate::presentation::{Notice, ViewUpdate};

#[derive(Clone)]
pub struct ViewBus {
    sender: UnboundedSender<ViewUpdate>,
}

impl ViewBus {
    pub fn channel() -> (Self, UnboundedReceiver<ViewUpdate>) {
        let (sender, receiver) = unbounded_channel();
        (Self { sender }, receiver)
    }

    pub fn publish(&self, update: ViewUpdate) {
        if self.sender.send(update).is_err() {
            tracing::trace!("View update dropped: no skin attached");
        }
    }

    pub fn notify(&self, notice: Notice) {
        self.publish(ViewUpdate::Notice(notice));
    }
}
