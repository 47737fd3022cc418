//! Context menu descriptions for the project tree.
//!
//! Menus are plain data: selecting an item posts `{itemId, data}` on the
//! menu's callback topic and the explorer handles it there.

use serde::Serialize;
use serde_json::{json, Value};

use super::hub::topics;
use super::services::ports::{EditorRegistry, FeatureFlags};
use super::spinner::next_free_name;
use super::state::{MenuTemplate, TemplateCatalog};
use crate::models::{file_extension, NodeId, NodeKind, TreeNode, TreeView};

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum ContextTarget {
    Background,
    Node(NodeId),
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Menu {
    pub callback_topic: String,
    pub items: Vec<MenuItem>,
}

impl Menu {
    pub fn item(&self, id: &str) -> Option<&MenuItem> {
        self.items.iter().find(|item| item.id == id)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct MenuItem {
    pub id: String,
    pub label: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shortcut: Option<String>,
    #[serde(skip_serializing_if = "is_false")]
    pub divider: bool,
    #[serde(skip_serializing_if = "is_false")]
    pub is_disabled: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<Value>,
    #[serde(skip_serializing_if = "Vec::is_empty")]
    pub items: Vec<MenuItem>,
}

fn is_false(value: &bool) -> bool {
    !*value
}

impl MenuItem {
    pub fn new(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            ..Default::default()
        }
    }

    fn icon(mut self, icon: &str) -> Self {
        self.icon = Some(format!("sap-icon--{icon}"));
        self
    }

    fn shortcut(mut self, shortcut: &str) -> Self {
        self.shortcut = Some(shortcut.to_string());
        self
    }

    fn divider(mut self) -> Self {
        self.divider = true;
        self
    }

    fn disabled(mut self, disabled: bool) -> Self {
        self.is_disabled = disabled;
        self
    }

    fn data(mut self, data: Value) -> Self {
        self.data = Some(data);
        self
    }

    fn items(mut self, items: Vec<MenuItem>) -> Self {
        self.items = items;
        self
    }
}

/// Everything besides the tree a menu depends on.
pub struct MenuContext<'a> {
    pub templates: &'a TemplateCatalog,
    pub features: FeatureFlags,
    pub can_paste: bool,
    pub editors: &'a EditorRegistry,
    pub selection: &'a [NodeId],
}

pub fn node_ref(id: NodeId) -> Value {
    json!({ "node": id })
}

pub fn build_menu<T: TreeView + ?Sized>(
    tree: &T,
    target: ContextTarget,
    ctx: &MenuContext<'_>,
) -> Option<Menu> {
    let id = match target {
        ContextTarget::Background => return Some(background_menu(ctx)),
        ContextTarget::Node(id) if id == tree.root() => return Some(background_menu(ctx)),
        ContextTarget::Node(id) => id,
    };
    let node = tree.get_node(id)?;
    let items = match node.kind() {
        NodeKind::Project => project_items(tree, id, node, ctx),
        NodeKind::Folder => folder_items(tree, id, node, ctx),
        NodeKind::File => file_items(tree, id, node, ctx),
        NodeKind::Root | NodeKind::Spinner => return None,
    };
    Some(Menu {
        callback_topic: topics::TREE_CONTEXT_MENU.to_string(),
        items,
    })
}

fn background_menu(ctx: &MenuContext<'_>) -> Menu {
    let mut items = vec![MenuItem::new("newProject", "New Project").icon("create")];
    if ctx.features.publisher {
        items.push(
            MenuItem::new("publishAll", "Publish All")
                .icon("arrow-top")
                .divider(),
        );
        items.push(MenuItem::new("unpublishAll", "Unpublish All").icon("arrow-bottom"));
    }
    items.push(
        MenuItem::new("exportProjects", "Export all")
            .icon("download-from-cloud")
            .divider(),
    );
    Menu {
        callback_topic: topics::TREE_CONTEXT_MENU.to_string(),
        items,
    }
}

fn project_items<T: TreeView + ?Sized>(
    tree: &T,
    id: NodeId,
    node: &TreeNode,
    ctx: &MenuContext<'_>,
) -> Vec<MenuItem> {
    let mut items = vec![
        new_submenu(tree, id, ctx),
        MenuItem::new("duplicateProject", "Duplicate")
            .icon("duplicate")
            .divider()
            .data(node_ref(id)),
        paste_item(id, ctx),
        rename_item(id),
        delete_item(id, ctx),
    ];
    items.extend(publish_items(node, ctx));
    if let Some(generate) = generate_item(id, ctx) {
        items.push(generate);
    }
    items.extend(import_items(id));
    items.push(
        MenuItem::new("exportProject", "Export")
            .icon("download-from-cloud")
            .divider()
            .data(node_ref(id)),
    );
    items
}

fn folder_items<T: TreeView + ?Sized>(
    tree: &T,
    id: NodeId,
    node: &TreeNode,
    ctx: &MenuContext<'_>,
) -> Vec<MenuItem> {
    let mut items = vec![
        new_submenu(tree, id, ctx),
        cut_item(id),
        copy_item(id),
        paste_item(id, ctx),
        rename_item(id),
        delete_item(id, ctx),
    ];
    items.extend(publish_items(node, ctx));
    if let Some(generate) = generate_item(id, ctx) {
        items.push(generate);
    }
    items.extend(import_items(id));
    items
}

fn file_items<T: TreeView + ?Sized>(
    tree: &T,
    id: NodeId,
    node: &TreeNode,
    ctx: &MenuContext<'_>,
) -> Vec<MenuItem> {
    let editors = ctx
        .editors
        .editors_for(node.data.content_type.as_deref())
        .into_iter()
        .map(|editor| {
            MenuItem::new("openWith", editor.label.as_str())
                .data(json!({ "node": id, "editorId": editor.id }))
        })
        .collect();

    let mut items = vec![
        MenuItem::new("open", "Open")
            .icon("action")
            .data(node_ref(id)),
        MenuItem::new("openWith", "Open With")
            .icon("action")
            .items(editors),
        cut_item(id),
        copy_item(id),
        rename_item(id),
        delete_item(id, ctx),
    ];
    items.extend(publish_items(node, ctx));

    if ctx.features.generate && ctx.templates.has_model_templates_for(node.text()) {
        // Models are only generated from the project root.
        let nested = tree.parents(id).len() > 2;
        let mut generate = MenuItem::new("generateModel", "Generate")
            .icon("create")
            .divider()
            .disabled(nested);
        if !nested {
            generate = generate.data(node_ref(id));
        }
        items.push(generate);
    }
    items
}

fn new_submenu<T: TreeView + ?Sized>(tree: &T, id: NodeId, ctx: &MenuContext<'_>) -> MenuItem {
    let mut items = vec![
        MenuItem::new("file", "File").data(node_ref(id)),
        MenuItem::new("folder", "Folder").data(node_ref(id)),
    ];
    items.extend(template_items(tree, id, &ctx.templates.menu));
    MenuItem::new("new", "New").icon("create").items(items)
}

/// One entry per menu template. `oncePerFolder` templates are disabled when a
/// sibling file already carries the extension; the first unordered template
/// opens a new divider group. Items with `staticName` create their file
/// directly, the others ask for a name first.
pub fn template_items<T: TreeView + ?Sized>(
    tree: &T,
    parent: NodeId,
    templates: &[MenuTemplate],
) -> Vec<MenuItem> {
    let sibling_exts: Vec<String> = tree
        .children(parent)
        .iter()
        .filter_map(|&c| tree.get_node(c))
        .filter(|n| n.is_file() && n.text().contains('.'))
        .map(|n| file_extension(n.text()))
        .collect();

    let mut priority = true;
    let mut items = Vec::with_capacity(templates.len());
    for (idx, template) in templates.iter().enumerate() {
        let disabled =
            template.once_per_folder && sibling_exts.iter().any(|e| *e == template.extension);
        let mut item =
            MenuItem::new(template.id.as_str(), template.label.as_str()).disabled(disabled);
        if !disabled {
            item = item.data(json!({
                "node": parent,
                "name": template_file_name(tree, parent, template),
                "content": template.data,
                "staticName": template.static_name || template.nameless,
            }));
        }
        if idx == 0 {
            item = item.divider();
        }
        if priority && template.order.is_none() {
            item = item.divider();
            priority = false;
        }
        items.push(item);
    }
    items
}

fn template_file_name<T: TreeView + ?Sized>(
    tree: &T,
    parent: NodeId,
    template: &MenuTemplate,
) -> String {
    let base = template.name.as_deref().unwrap_or("New File");
    let name = if template.nameless {
        format!(".{}", template.extension)
    } else if template.extension.is_empty() {
        base.to_string()
    } else {
        format!("{base}.{}", template.extension)
    };
    if template.static_name {
        name
    } else {
        next_free_name(tree, parent, &name)
    }
}

fn cut_item(id: NodeId) -> MenuItem {
    MenuItem::new("cut", "Cut")
        .shortcut("Ctrl+X")
        .icon("scissors")
        .divider()
        .data(node_ref(id))
}

fn copy_item(id: NodeId) -> MenuItem {
    MenuItem::new("copy", "Copy")
        .shortcut("Ctrl+C")
        .icon("copy")
        .data(node_ref(id))
}

fn paste_item(id: NodeId, ctx: &MenuContext<'_>) -> MenuItem {
    MenuItem::new("paste", "Paste")
        .shortcut("Ctrl+V")
        .icon("paste")
        .disabled(!ctx.can_paste)
        .data(node_ref(id))
}

fn rename_item(id: NodeId) -> MenuItem {
    MenuItem::new("rename", "Rename")
        .shortcut("F2")
        .icon("edit")
        .divider()
        .data(node_ref(id))
}

fn delete_item(id: NodeId, ctx: &MenuContext<'_>) -> MenuItem {
    let label = if ctx.selection.len() > 1 && ctx.selection.contains(&id) {
        format!("Delete {} items", ctx.selection.len())
    } else {
        "Delete".to_string()
    };
    MenuItem::new("delete", label)
        .shortcut("Del")
        .icon("delete")
        .data(node_ref(id))
}

fn publish_items(node: &TreeNode, ctx: &MenuContext<'_>) -> Vec<MenuItem> {
    if !ctx.features.publisher {
        return Vec::new();
    }
    let path = node.data.resource_path();
    vec![
        MenuItem::new("publish", "Publish")
            .icon("arrow-top")
            .divider()
            .data(Value::String(path.clone())),
        MenuItem::new("unpublish", "Unpublish")
            .icon("arrow-bottom")
            .data(Value::String(path)),
    ]
}

fn generate_item(id: NodeId, ctx: &MenuContext<'_>) -> Option<MenuItem> {
    (ctx.features.generate && !ctx.templates.generic.is_empty()).then(|| {
        MenuItem::new("generateGeneric", "Generate")
            .icon("create")
            .divider()
            .data(node_ref(id))
    })
}

fn import_items(id: NodeId) -> [MenuItem; 2] {
    [
        MenuItem::new("import", "Import")
            .icon("attachment")
            .divider()
            .data(node_ref(id)),
        MenuItem::new("importZip", "Import from zip")
            .icon("attachment-zip-file")
            .data(node_ref(id)),
    ]
}

#[cfg(test)]
#[path = "../../tests/unit/kernel/context_menu.rs"]
mod tests;
