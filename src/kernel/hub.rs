//! Message hub: topic-keyed publish/subscribe between panels.
//!
//! Handlers are channel senders; a handler whose receiver is gone is pruned
//! on the next post to its topic.

use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::mpsc::{self, Receiver, Sender};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HubMessage {
    pub topic: String,
    #[serde(default)]
    pub data: Value,
}

impl HubMessage {
    pub fn new(topic: impl Into<String>, data: Value) -> Self {
        Self {
            topic: topic.into(),
            data,
        }
    }

    pub fn str_field(&self, key: &str) -> Option<&str> {
        self.data.get(key).and_then(Value::as_str)
    }

    /// Answer of a form or confirmation dialog; empty when `data` has
    /// another shape.
    pub fn form_reply(&self) -> FormReply {
        FormReply::deserialize(&self.data).unwrap_or_default()
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct FormReply {
    pub button_id: Option<String>,
    pub form_data: Vec<FormField>,
    pub is_menu: bool,
}

impl FormReply {
    pub fn pressed(&self, button: &str) -> bool {
        self.button_id.as_deref() == Some(button)
    }

    pub fn value(&self, index: usize) -> Option<&str> {
        self.form_data.get(index).and_then(|f| f.value.as_str())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Deserialize)]
#[serde(default)]
pub struct FormField {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: Option<String>,
    pub value: Value,
}

pub mod topics {
    pub const STATUS_MESSAGE: &str = "ide.status.message";
    pub const STATUS_ERROR: &str = "ide.status.error";
    pub const STATUS_BUSY: &str = "ide.status.busy";
    pub const STATUS_BUSY_HIDE: &str = "ide.status.busy.hide";
    pub const ALERT: &str = "ide.alert";
    pub const DIALOG: &str = "ide.dialog";
    pub const FORM_DIALOG_SHOW: &str = "ide.formDialog.show";
    pub const FORM_DIALOG_UPDATE: &str = "ide.formDialog.update";
    pub const FORM_DIALOG_HIDE: &str = "ide.formDialog.hide";
    pub const DIALOG_WINDOW: &str = "ide.dialogWindow";
    pub const OPEN_EDITOR: &str = "ide-core.openEditor";
    pub const CLOSE_EDITOR: &str = "ide-core.closeEditor";
    pub const FILE_SELECTED: &str = "ide.file.selected";
    pub const FILE_RENAMED: &str = "ide.file.renamed";
    pub const FILE_MOVED: &str = "ide.file.moved";
    pub const FILE_SAVED: &str = "ide.file.saved";
    pub const PUBLISHED: &str = "ide.event.publish";
    pub const UNPUBLISHED: &str = "ide.event.unpublish";
    pub const WORKSPACE_CHANGED: &str = "ide.workspace.changed";
    pub const WORKSPACES_MODIFIED: &str = "ide.workspaces.modified";
    pub const SAVE_ALL: &str = "editor.file.save.all";

    pub const TREE_CONTEXT_MENU: &str = "projects.tree.contextmenu";
    pub const TREE_REFRESH: &str = "projects.tree.refresh";
    pub const TREE_SELECT: &str = "projects.tree.select";
    pub const EXPORT_ALL: &str = "projects.export.all";
    pub const CREATE_PROJECT: &str = "projects.create.project";
    pub const CREATE_WORKSPACE: &str = "projects.create.workspace";
    pub const LINK_PROJECT: &str = "projects.link.project";
    pub const DUPLICATE_PROJECT: &str = "projects.duplicate.project";
    pub const FORM_CREATE_FILE: &str = "projects.formDialog.create.file";
    pub const FORM_CREATE_FOLDER: &str = "projects.formDialog.create.folder";
    pub const FORM_RENAME: &str = "projects.formDialog.rename";
    pub const DIALOG_DELETE: &str = "projects.dialog.delete";
    pub const DIALOG_DELETE_WORKSPACE: &str = "projects.dialog.delete.workspace";
    pub const GENERATE_GENERIC: &str = "projects.generate.generic";
    pub const GENERATE_MODEL: &str = "projects.generate.model";

    /// Topics the explorer listens to.
    pub const CONSUMED: &[&str] = &[
        TREE_CONTEXT_MENU,
        TREE_REFRESH,
        TREE_SELECT,
        EXPORT_ALL,
        CREATE_PROJECT,
        CREATE_WORKSPACE,
        LINK_PROJECT,
        DUPLICATE_PROJECT,
        FORM_CREATE_FILE,
        FORM_CREATE_FOLDER,
        FORM_RENAME,
        DIALOG_DELETE,
        DIALOG_DELETE_WORKSPACE,
        GENERATE_GENERIC,
        GENERATE_MODEL,
        FILE_SAVED,
        WORKSPACE_CHANGED,
    ];
}

#[derive(Default)]
pub struct MessageHub {
    prefix: Option<String>,
    handlers: FxHashMap<String, Vec<Sender<HubMessage>>>,
}

impl MessageHub {
    pub fn new(prefix: Option<String>) -> Self {
        Self {
            prefix: prefix.filter(|p| !p.is_empty()),
            handlers: FxHashMap::default(),
        }
    }

    pub fn resolve_topic(&self, topic: &str, global: bool) -> String {
        match (&self.prefix, global) {
            (Some(prefix), false) => format!("{prefix}.{topic}"),
            _ => topic.to_string(),
        }
    }

    /// Delivers to every live handler of the resolved topic; returns how many
    /// received it.
    pub fn post_message(&mut self, topic: &str, data: Value, global: bool) -> usize {
        let topic = self.resolve_topic(topic, global);
        let Some(handlers) = self.handlers.get_mut(&topic) else {
            tracing::trace!(topic = %topic, "hub message without handlers");
            return 0;
        };
        let message = HubMessage {
            topic: topic.clone(),
            data,
        };
        handlers.retain(|tx| tx.send(message.clone()).is_ok());
        let delivered = handlers.len();
        if handlers.is_empty() {
            self.handlers.remove(&topic);
        }
        delivered
    }

    pub fn on_did_receive_message(
        &mut self,
        topic: &str,
        handler: Sender<HubMessage>,
        global: bool,
    ) {
        let topic = self.resolve_topic(topic, global);
        self.handlers.entry(topic).or_default().push(handler);
    }

    pub fn subscribe(&mut self, topic: &str, global: bool) -> Receiver<HubMessage> {
        let (tx, rx) = mpsc::channel();
        self.on_did_receive_message(topic, tx, global);
        rx
    }

    pub fn handler_count(&self, topic: &str, global: bool) -> usize {
        self.handlers
            .get(&self.resolve_topic(topic, global))
            .map_or(0, Vec::len)
    }
}

pub fn status_message(message: impl Into<String>) -> HubMessage {
    HubMessage::new(topics::STATUS_MESSAGE, json!({ "message": message.into() }))
}

pub fn status_error(message: impl Into<String>) -> HubMessage {
    HubMessage::new(topics::STATUS_ERROR, json!({ "message": message.into() }))
}

pub fn status_busy(message: impl Into<String>) -> HubMessage {
    HubMessage::new(topics::STATUS_BUSY, json!({ "message": message.into() }))
}

pub fn hide_status_busy() -> HubMessage {
    HubMessage::new(topics::STATUS_BUSY_HIDE, json!({}))
}

pub fn alert_error(title: impl Into<String>, message: impl Into<String>) -> HubMessage {
    HubMessage::new(
        topics::ALERT,
        json!({ "title": title.into(), "message": message.into(), "type": "error" }),
    )
}

pub fn open_editor(
    resource_path: &str,
    label: &str,
    content_type: Option<&str>,
    editor_id: Option<&str>,
    git_name: Option<&str>,
) -> HubMessage {
    let extra_args = git_name.map(|name| json!({ "gitName": name }));
    HubMessage::new(
        topics::OPEN_EDITOR,
        json!({
            "resourcePath": resource_path,
            "resourceLabel": label,
            "contentType": content_type,
            "editorId": editor_id,
            "extraArgs": extra_args,
        }),
    )
}

pub fn close_editor(resource_path: &str) -> HubMessage {
    HubMessage::new(topics::CLOSE_EDITOR, json!({ "resourcePath": resource_path }))
}

pub fn hide_form_dialog(form_id: &str) -> HubMessage {
    HubMessage::new(topics::FORM_DIALOG_HIDE, json!({ "formId": form_id }))
}

pub fn workspaces_modified() -> HubMessage {
    HubMessage::new(topics::WORKSPACES_MODIFIED, json!({}))
}

pub fn show_form_dialog(
    form_id: &str,
    title: &str,
    form: Value,
    buttons: Value,
    callback_topic: &str,
    loading_message: &str,
) -> HubMessage {
    HubMessage::new(
        topics::FORM_DIALOG_SHOW,
        json!({
            "formId": form_id,
            "title": title,
            "form": form,
            "buttons": buttons,
            "callbackTopic": callback_topic,
            "loadingMessage": loading_message,
        }),
    )
}

pub fn update_form_dialog(form_id: &str, form: Value, loading_message: &str) -> HubMessage {
    HubMessage::new(
        topics::FORM_DIALOG_UPDATE,
        json!({ "formId": form_id, "form": form, "loadingMessage": loading_message }),
    )
}

pub fn show_dialog(title: &str, message: &str, buttons: Value, callback_topic: &str) -> HubMessage {
    HubMessage::new(
        topics::DIALOG,
        json!({
            "title": title,
            "message": message,
            "buttons": buttons,
            "callbackTopic": callback_topic,
        }),
    )
}

pub fn show_dialog_window(dialog_id: &str, params: Value) -> HubMessage {
    HubMessage::new(
        topics::DIALOG_WINDOW,
        json!({ "dialogWindowId": dialog_id, "params": params }),
    )
}

pub fn file_selected(
    name: &str,
    path: &str,
    content_type: Option<&str>,
    workspace: &str,
) -> HubMessage {
    HubMessage::new(
        topics::FILE_SELECTED,
        json!({
            "name": name,
            "path": path,
            "contentType": content_type,
            "workspace": workspace,
        }),
    )
}

pub struct RenamedFile<'a> {
    pub old_name: &'a str,
    pub name: &'a str,
    pub old_path: &'a str,
    pub path: &'a str,
    pub content_type: Option<&'a str>,
    pub workspace: &'a str,
}

pub fn file_renamed(file: RenamedFile<'_>) -> HubMessage {
    HubMessage::new(
        topics::FILE_RENAMED,
        json!({
            "oldName": file.old_name,
            "name": file.name,
            "oldPath": file.old_path,
            "path": file.path,
            "contentType": file.content_type,
            "workspace": file.workspace,
        }),
    )
}

pub fn file_moved(name: &str, old_path: &str, path: &str, workspace: &str) -> HubMessage {
    HubMessage::new(
        topics::FILE_MOVED,
        json!({
            "name": name,
            "oldPath": old_path,
            "path": path,
            "workspace": workspace,
        }),
    )
}

pub fn announce_publish() -> HubMessage {
    HubMessage::new(topics::PUBLISHED, json!({}))
}

pub fn announce_unpublish() -> HubMessage {
    HubMessage::new(topics::UNPUBLISHED, json!({}))
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/hub.rs"]
mod tests;
