use super::*;
use crate::kernel::state::TemplateDescriptor;
use crate::models::{NewNode, NodeData, ProjectTree};

struct Fixture {
    tree: ProjectTree,
    project: NodeId,
    folder: NodeId,
    root_file: NodeId,
    nested_file: NodeId,
}

fn fixture() -> Fixture {
    let mut tree = ProjectTree::new();
    let root = tree.root();
    let data = |path: &str| NodeData::new(path, "workspace");
    let project = tree
        .create_node(root, NewNode::new("demo", NodeKind::Project, data("/demo")), None)
        .unwrap();
    let folder = tree
        .create_node(project, NewNode::new("lib", NodeKind::Folder, data("/demo/lib")), None)
        .unwrap();
    let root_file = tree
        .create_node(
            project,
            NewNode::new("orders.model", NodeKind::File, data("/demo/orders.model")),
            None,
        )
        .unwrap();
    let nested_file = tree
        .create_node(
            folder,
            NewNode::new("items.model", NodeKind::File, data("/demo/lib/items.model")),
            None,
        )
        .unwrap();
    tree.create_node(
        folder,
        NewNode::new("index.html", NodeKind::File, data("/demo/lib/index.html")),
        None,
    )
    .unwrap();
    Fixture {
        tree,
        project,
        folder,
        root_file,
        nested_file,
    }
}

fn catalog() -> TemplateCatalog {
    let mut catalog = TemplateCatalog {
        menu: vec![
            MenuTemplate {
                id: "menu-html".to_string(),
                label: "HTML5 Page".to_string(),
                extension: "html".to_string(),
                order: Some(1),
                once_per_folder: true,
                ..Default::default()
            },
            MenuTemplate {
                id: "menu-js".to_string(),
                label: "JavaScript Service".to_string(),
                extension: "js".to_string(),
                data: "// service".to_string(),
                ..Default::default()
            },
        ],
        ..Default::default()
    };
    catalog.set_generation_templates(vec![
        TemplateDescriptor {
            id: "template-app".to_string(),
            name: "Application".to_string(),
            ..Default::default()
        },
        TemplateDescriptor {
            id: "template-model".to_string(),
            name: "Model UI".to_string(),
            extension: Some("model".to_string()),
            ..Default::default()
        },
    ]);
    catalog
}

fn ids(items: &[MenuItem]) -> Vec<&str> {
    items.iter().map(|i| i.id.as_str()).collect()
}

#[test]
fn background_menu_respects_publisher_flag() {
    let f = fixture();
    let templates = TemplateCatalog::default();
    let editors = EditorRegistry::default();
    let mut ctx = MenuContext {
        templates: &templates,
        features: FeatureFlags::default(),
        can_paste: false,
        editors: &editors,
        selection: &[],
    };

    let menu = build_menu(&f.tree, ContextTarget::Background, &ctx).unwrap();
    assert_eq!(menu.callback_topic, "projects.tree.contextmenu");
    assert_eq!(
        ids(&menu.items),
        vec!["newProject", "publishAll", "unpublishAll", "exportProjects"]
    );

    ctx.features.publisher = false;
    let menu = build_menu(&f.tree, ContextTarget::Background, &ctx).unwrap();
    assert_eq!(ids(&menu.items), vec!["newProject", "exportProjects"]);
}

#[test]
fn project_menu_lists_actions_in_order() {
    let f = fixture();
    let templates = catalog();
    let editors = EditorRegistry::default();
    let ctx = MenuContext {
        templates: &templates,
        features: FeatureFlags::default(),
        can_paste: false,
        editors: &editors,
        selection: &[],
    };

    let menu = build_menu(&f.tree, ContextTarget::Node(f.project), &ctx).unwrap();
    assert_eq!(
        ids(&menu.items),
        vec![
            "new",
            "duplicateProject",
            "paste",
            "rename",
            "delete",
            "publish",
            "unpublish",
            "generateGeneric",
            "import",
            "importZip",
            "exportProject",
        ]
    );
    assert!(menu.item("paste").unwrap().is_disabled);
    assert_eq!(
        menu.item("publish").unwrap().data,
        Some(Value::String("/workspace/demo".to_string()))
    );
}

#[test]
fn template_items_honor_once_per_folder_and_groups() {
    let f = fixture();
    let templates = catalog();
    let items = template_items(&f.tree, f.folder, &templates.menu);

    assert_eq!(ids(&items), vec!["menu-html", "menu-js"]);
    assert!(items[0].is_disabled);
    assert!(items[0].data.is_none());
    assert!(items[0].divider);
    assert!(items[1].divider);

    let data = items[1].data.as_ref().unwrap();
    assert_eq!(data["name"], "New File.js");
    assert_eq!(data["content"], "// service");

    let items = template_items(&f.tree, f.project, &templates.menu);
    assert!(!items[0].is_disabled);
}

#[test]
fn model_generation_is_disabled_below_project_root() {
    let f = fixture();
    let templates = catalog();
    let editors = EditorRegistry::default();
    let ctx = MenuContext {
        templates: &templates,
        features: FeatureFlags::default(),
        can_paste: true,
        editors: &editors,
        selection: &[],
    };

    let menu = build_menu(&f.tree, ContextTarget::Node(f.root_file), &ctx).unwrap();
    let generate = menu.item("generateModel").unwrap();
    assert!(!generate.is_disabled);
    assert!(generate.data.is_some());

    let menu = build_menu(&f.tree, ContextTarget::Node(f.nested_file), &ctx).unwrap();
    let generate = menu.item("generateModel").unwrap();
    assert!(generate.is_disabled);
    assert!(generate.data.is_none());
    assert_eq!(menu.item("openWith").unwrap().items.len(), 1);
}

#[test]
fn delete_label_counts_selection() {
    let f = fixture();
    let templates = TemplateCatalog::default();
    let editors = EditorRegistry::default();
    let selection = [f.root_file, f.nested_file];
    let ctx = MenuContext {
        templates: &templates,
        features: FeatureFlags::default(),
        can_paste: false,
        editors: &editors,
        selection: &selection,
    };

    let menu = build_menu(&f.tree, ContextTarget::Node(f.root_file), &ctx).unwrap();
    assert_eq!(menu.item("delete").unwrap().label, "Delete 2 items");

    let menu = build_menu(&f.tree, ContextTarget::Node(f.folder), &ctx).unwrap();
    assert_eq!(menu.item("delete").unwrap().label, "Delete");
    assert!(menu.item("generateGeneric").is_none());
}

#[test]
fn serialized_menu_uses_camel_case_and_skips_defaults() {
    let f = fixture();
    let templates = TemplateCatalog::default();
    let editors = EditorRegistry::default();
    let ctx = MenuContext {
        templates: &templates,
        features: FeatureFlags::default(),
        can_paste: false,
        editors: &editors,
        selection: &[],
    };
    let menu = build_menu(&f.tree, ContextTarget::Background, &ctx).unwrap();
    let value = serde_json::to_value(&menu).unwrap();

    assert_eq!(value["callbackTopic"], "projects.tree.contextmenu");
    assert_eq!(value["items"][0]["icon"], "sap-icon--create");
    assert!(value["items"][0].get("isDisabled").is_none());
    assert_eq!(value["items"][1]["divider"], true);
}
