//! Integration tests for extending the UML metamodel with profile kinds.

use std::sync::OnceLock;

use astrolabe_core::{
    metamodel::{AttributeDefinition, Kind, Metamodel, RelationSpec},
    model::Model,
    uml::{self, kinds, relations as rel},
    value::AttributeType,
};

const ZONE: &str = "Geo::Zone";
const SITE: &str = "Geo::Site";

fn metamodel() -> &'static Metamodel {
    static METAMODEL: OnceLock<Metamodel> = OnceLock::new();
    METAMODEL.get_or_init(|| {
        let mut builder = uml::builder();
        builder
            .kind(ZONE, &[kinds::PACKAGE])
            .kind(SITE, &[kinds::CLASS])
            .attribute(
                SITE,
                AttributeDefinition::new("region", AttributeType::String).with_default("eu"),
            )
            .relation(
                ZONE,
                RelationSpec::many("site", SITE).composite().opposite("zone"),
            )
            .relation(SITE, RelationSpec::one("zone", ZONE).opposite("site"))
            .add_subset(kinds::NAMESPACE, rel::OWNED_MEMBER, ZONE, "site")
            .add_subset(kinds::NAMED_ELEMENT, rel::NAMESPACE, SITE, "zone");
        builder.build().expect("profile declarations are consistent")
    })
}

#[test]
fn test_profile_kinds_join_the_hierarchy() {
    let metamodel = metamodel();

    assert!(metamodel.is_a(Kind::new(SITE), kinds::CLASSIFIER));
    assert_eq!(metamodel.kind("Zone"), Some(Kind::new(ZONE)));
    assert_eq!(metamodel.kind("Package"), Some(Kind::new(kinds::PACKAGE)));
}

#[test]
fn test_profile_relation_feeds_generic_unions() {
    let mut model = Model::new(metamodel());
    let zone = model.create(ZONE).unwrap();
    let site = model.create(SITE).unwrap();

    model.set(site, "zone", Some(zone)).unwrap();

    assert_eq!(model.get(site, rel::OWNER).unwrap(), Some(zone));
    assert_eq!(model.get(site, rel::NAMESPACE).unwrap(), Some(zone));
    assert_eq!(model.related(zone, rel::OWNED_ELEMENT).unwrap(), vec![site]);
}

#[test]
fn test_profile_attribute_default() {
    let mut model = Model::new(metamodel());
    let site = model.create(SITE).unwrap();

    assert_eq!(model.attribute(site, "region").unwrap(), Some("eu".into()));
    model
        .set_attribute(site, "region", Some("us".into()))
        .unwrap();
    assert_eq!(model.attribute(site, "region").unwrap(), Some("us".into()));
}

#[test]
fn test_unlinking_a_profile_owner_cascades() {
    let mut model = Model::new(metamodel());
    let zone = model.create(ZONE).unwrap();
    let site = model.create(SITE).unwrap();
    let property = model.create(kinds::PROPERTY).unwrap();

    model.add(zone, "site", site).unwrap();
    model.add(site, rel::OWNED_ATTRIBUTE, property).unwrap();
    model.unlink(zone).unwrap();

    assert!(model.is_empty());
    assert!(!model.contains(property));
}
