use super::Explorer;
use crate::kernel::services::ports::save_selected_workspace;
use crate::kernel::{Action, Effect};

impl Explorer {
    /// Runs `action` through the store and carries out its effects. Returns
    /// whether the tree or explorer state changed.
    pub fn dispatch(&mut self, action: Action) -> bool {
        let result = self.store.dispatch(action);
        for effect in result.effects {
            self.run_effect(effect);
        }
        result.state_changed
    }

    fn run_effect(&mut self, effect: Effect) {
        match effect {
            Effect::Request { id, request } => self.runtime.execute(id, request),
            Effect::Post { message, global } => {
                let delivered = self.hub.post_message(&message.topic, message.data, global);
                tracing::trace!(topic = %message.topic, delivered, "posted");
            }
            Effect::PersistWorkspace { name } => {
                if let Err(e) = save_selected_workspace(self.storage.as_mut(), &name) {
                    tracing::warn!(workspace = %name, error = %e, "failed to persist workspace");
                }
            }
        }
    }
}
