use super::Explorer;
use crate::kernel::services::adapters::AppMessage;
use crate::kernel::Action;
use std::sync::mpsc;
use std::time::{Duration, Instant};

impl Explorer {
    /// Feeds queued tree events, hub messages and backend responses to the
    /// store. Returns whether anything changed.
    pub fn pump(&mut self) -> bool {
        self.drain().changed
    }

    /// Pumps until no request is in flight and every queue is empty, or
    /// until `timeout` passes. Returns `false` on timeout.
    pub fn run_until_idle(&mut self, timeout: Duration) -> bool {
        let deadline = Instant::now() + timeout;
        loop {
            // Nothing handled means nothing was dispatched, so nothing new
            // can have been queued on this thread either.
            if self.drain().handled == 0 && self.store.in_flight() == 0 {
                return true;
            }
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                tracing::warn!(in_flight = self.store.in_flight(), "explorer did not settle");
                return false;
            }
            match self
                .responses
                .recv_timeout(remaining.min(Duration::from_millis(50)))
            {
                Ok(message) => {
                    self.handle_app_message(message);
                }
                Err(mpsc::RecvTimeoutError::Timeout) => {}
                Err(mpsc::RecvTimeoutError::Disconnected) => return false,
            }
        }
    }

    fn drain(&mut self) -> Drained {
        let mut drained = Drained::default();
        for _ in 0..super::MAX_TREE_DRAIN_PER_TICK {
            let Ok(event) = self.tree_events.try_recv() else {
                break;
            };
            drained.record(self.dispatch(Action::Tree(event)));
        }
        for _ in 0..super::MAX_HUB_DRAIN_PER_TICK {
            let Ok(message) = self.inbox.try_recv() else {
                break;
            };
            drained.record(self.dispatch(Action::Hub(message)));
        }
        for _ in 0..super::MAX_RESPONSE_DRAIN_PER_TICK {
            let Ok(message) = self.responses.try_recv() else {
                break;
            };
            drained.record(self.handle_app_message(message));
        }
        drained
    }

    fn handle_app_message(&mut self, message: AppMessage) -> bool {
        match message {
            AppMessage::Response { id, response } => {
                self.dispatch(Action::Response { id, response })
            }
        }
    }
}

#[derive(Default)]
struct Drained {
    handled: usize,
    changed: bool,
}

impl Drained {
    fn record(&mut self, changed: bool) {
        self.handled += 1;
        self.changed |= changed;
    }
}
