use serde::{Deserialize, Serialize};
use std::io;

pub const SELECTED_WORKSPACE_KEY: &str = "explorer.workspace";

/// Client-local key/value persistence.
pub trait Storage: Send {
    fn get(&self, key: &str) -> Option<String>;
    fn set(&mut self, key: &str, value: &str) -> io::Result<()>;
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SelectedWorkspace {
    pub name: String,
}

pub fn save_selected_workspace(storage: &mut dyn Storage, name: &str) -> io::Result<()> {
    let value = serde_json::to_string(&SelectedWorkspace {
        name: name.to_string(),
    })
    .map_err(io::Error::other)?;
    storage.set(SELECTED_WORKSPACE_KEY, &value)
}

/// Stored selection, or `default` (written back) when missing or unreadable.
pub fn load_selected_workspace(storage: &mut dyn Storage, default: &str) -> String {
    let stored = storage
        .get(SELECTED_WORKSPACE_KEY)
        .and_then(|raw| serde_json::from_str::<SelectedWorkspace>(&raw).ok());
    match stored {
        Some(selected) => selected.name,
        None => {
            if let Err(e) = save_selected_workspace(storage, default) {
                tracing::warn!(error = %e, "failed to persist default workspace");
            }
            default.to_string()
        }
    }
}
