use super::*;

fn template(id: &str, extension: Option<&str>) -> TemplateDescriptor {
    TemplateDescriptor {
        id: id.to_string(),
        name: id.to_uppercase(),
        extension: extension.map(String::from),
        parameters: Vec::new(),
    }
}

#[test]
fn generation_templates_split_on_extension() {
    let mut catalog = TemplateCatalog::default();
    catalog.set_generation_templates(vec![
        template("page", None),
        template("crud", Some("model")),
        template("schema-ui", Some("schema")),
    ]);

    assert_eq!(catalog.generic.len(), 1);
    assert_eq!(catalog.model.len(), 2);
    assert!(catalog.has_model_templates_for("shop.MODEL"));
    assert!(!catalog.has_model_templates_for("app.js"));
    let ids: Vec<&str> = catalog
        .model_templates_for("db.schema")
        .into_iter()
        .map(|t| t.id.as_str())
        .collect();
    assert_eq!(ids, vec!["schema-ui"]);
}

#[test]
fn reloading_templates_replaces_the_old_ones() {
    let mut catalog = TemplateCatalog::default();
    catalog.set_generation_templates(vec![template("crud", Some("model"))]);
    catalog.set_generation_templates(vec![template("page", None)]);

    assert!(catalog.model.is_empty());
    assert_eq!(catalog.generic[0].id, "page");
}

#[test]
fn menu_templates_read_camel_case_flags() {
    let template: MenuTemplate = serde_json::from_value(serde_json::json!({
        "id": "html",
        "label": "HTML5 Page",
        "extension": "html",
        "staticName": true,
        "oncePerFolder": true,
        "order": 3,
    }))
    .unwrap();

    assert!(template.static_name);
    assert!(template.once_per_folder);
    assert!(!template.is_model);
    assert_eq!(template.order, Some(3));
    assert!(template.data.is_empty());
}

#[test]
fn default_workspace_is_recognised() {
    let config = ExplorerConfig::default();
    let mut state = ExplorerState::new(&config, config.default_workspace.clone());
    assert!(state.is_default_workspace());

    state.selected_workspace = "scratch".to_string();
    assert!(!state.is_default_workspace());
}
