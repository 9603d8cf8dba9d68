//! Integration tests for the Workbench API
//!
//! These tests replay small edit scripts and check the resulting model and
//! report.

use astrolabe::{
    AstrolabeError, Workbench,
    c4model,
    config::AppConfig,
    recipes::{slot, stereotype},
    script::ScriptError,
    uml::kinds,
};

const SHOP: &str = r#"
[[step]]
op = "create"
id = "shop"
kind = "Package"
name = "Shop"

[[step]]
op = "create"
id = "order"
kind = "Class"
name = "Order"

[[step]]
op = "link"
source = "shop"
relation = "packagedElement"
target = "order"

[[step]]
op = "create"
id = "class_meta"
kind = "Class"
name = "Class"

[[step]]
op = "create"
id = "entity"
kind = "Stereotype"
name = "Entity"

[[step]]
op = "extension"
metaclass = "class_meta"
stereotype = "entity"

[[step]]
op = "apply_stereotype"
id = "order_entity"
element = "order"
stereotype = "entity"

[[step]]
op = "create"
id = "total"
kind = "Property"
name = "total"

[[step]]
op = "link"
source = "order"
relation = "ownedAttribute"
target = "total"

[[step]]
op = "attribute"
element = "total"
attribute = "typeValue"
value = "int"

[[step]]
op = "default"
element = "total"
value = "0"

[[step]]
op = "slot"
instance = "order_entity"
feature = "total"
value = "audited"
"#;

#[test]
fn test_workbench_default() {
    let _workbench = Workbench::default();
}

#[test]
fn test_run_shop_script() {
    let workbench = Workbench::new(AppConfig::default());
    let model = workbench.run(SHOP).expect("Failed to replay script");

    let order = model
        .elements_of(kinds::CLASS)
        .find(|class| model.name(*class).as_deref() == Some("Order"))
        .expect("Order exists");
    let applied = stereotype::get_applied_stereotypes(&model, order).unwrap();
    assert_eq!(applied.len(), 1);
    assert_eq!(stereotype::stereotype_name(&model, applied[0]), "entity");

    let slot = model.elements_of(kinds::SLOT).next().expect("slot exists");
    assert_eq!(
        slot::slot_value_as_string(&model, slot).unwrap().as_deref(),
        Some("audited")
    );
}

#[test]
fn test_report_shop_script() {
    let workbench = Workbench::default();
    let model = workbench.run(SHOP).expect("Failed to replay script");

    let report = workbench.report(&model).expect("Failed to report");

    assert!(report.starts_with("Package Shop\n  Class Order «entity»\n"));
    assert!(report.contains("    Property total = 0\n"));
}

#[test]
fn test_c4_script() {
    let source = r#"
        [[step]]
        op = "create"
        id = "customer"
        kind = "Person"
        name = "Customer"

        [[step]]
        op = "create"
        id = "web"
        kind = "Container"
        name = "Web shop"

        [[step]]
        op = "attribute"
        element = "web"
        attribute = "technology"
        value = "Rust"

        [[step]]
        op = "dependency"
        client = "customer"
        supplier = "web"
    "#;

    let workbench = Workbench::default();
    let model = workbench.run(source).expect("Failed to replay script");

    let web = model
        .elements_of(c4model::kinds::CONTAINER)
        .next()
        .expect("container exists");
    assert_eq!(
        c4model::technology(&model, web).unwrap().as_deref(),
        Some("Rust")
    );
    let report = workbench.report(&model).unwrap();
    assert!(report.contains("Dependency Customer -> Web shop"));
}

#[test]
fn test_failing_step_reports_script_error() {
    let source = r#"
        [[step]]
        op = "create"
        id = "order"
        kind = "Class"

        [[step]]
        op = "generalization"
        general = "order"
        specific = "nobody"
    "#;

    let err = Workbench::default().run(source).unwrap_err();

    match err {
        AstrolabeError::Script { err, src } => {
            assert!(matches!(err, ScriptError::UnknownId { step: 2, .. }));
            assert_eq!(src, source);
        }
        other => panic!("Expected a script error, got {other:?}"),
    }
}

#[test]
fn test_malformed_script() {
    let result = Workbench::default().parse("[[step]\nop = ");
    assert!(matches!(
        result,
        Err(AstrolabeError::Script {
            err: ScriptError::Syntax { .. },
            ..
        })
    ));
}
