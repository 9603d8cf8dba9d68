//! The built-in UML metamodel.
//!
//! This module provides:
//! - String constants for the UML kinds, relations, attributes and
//!   enumeration literals used by the model recipes
//! - [`register`], which declares them on a [`MetamodelBuilder`]
//!
//! Only the part of UML the recipes touch is declared: classifiers,
//! structural features, associations and extensions, dependencies,
//! connectors, instance specifications with slots, literal value
//! specifications and the message/occurrence pair of interactions.

use crate::{
    metamodel::{AttributeDefinition, MetamodelBuilder, RelationSpec},
    value::{AttributeType, UnlimitedNatural},
};

/// Kind names.
pub mod kinds {
    pub const ELEMENT: &str = "Element";
    pub const NAMED_ELEMENT: &str = "NamedElement";
    pub const NAMESPACE: &str = "Namespace";
    pub const PACKAGEABLE_ELEMENT: &str = "PackageableElement";
    pub const PACKAGE: &str = "Package";
    pub const DIAGRAM: &str = "Diagram";
    pub const TYPE: &str = "Type";
    pub const REDEFINABLE_ELEMENT: &str = "RedefinableElement";
    pub const CLASSIFIER: &str = "Classifier";
    pub const STRUCTURED_CLASSIFIER: &str = "StructuredClassifier";
    pub const ENCAPSULATED_CLASSIFIER: &str = "EncapsulatedClassifier";
    pub const BEHAVIORED_CLASSIFIER: &str = "BehavioredClassifier";
    pub const CLASS: &str = "Class";
    pub const INTERFACE: &str = "Interface";
    pub const DATA_TYPE: &str = "DataType";
    pub const COMPONENT: &str = "Component";
    pub const ARTIFACT: &str = "Artifact";
    pub const ACTOR: &str = "Actor";
    pub const STEREOTYPE: &str = "Stereotype";
    pub const TYPED_ELEMENT: &str = "TypedElement";
    pub const MULTIPLICITY_ELEMENT: &str = "MultiplicityElement";
    pub const FEATURE: &str = "Feature";
    pub const STRUCTURAL_FEATURE: &str = "StructuralFeature";
    pub const CONNECTABLE_ELEMENT: &str = "ConnectableElement";
    pub const PROPERTY: &str = "Property";
    pub const PORT: &str = "Port";
    pub const EXTENSION_END: &str = "ExtensionEnd";
    pub const PARAMETER: &str = "Parameter";
    pub const RELATIONSHIP: &str = "Relationship";
    pub const DIRECTED_RELATIONSHIP: &str = "DirectedRelationship";
    pub const ASSOCIATION: &str = "Association";
    pub const EXTENSION: &str = "Extension";
    pub const DEPENDENCY: &str = "Dependency";
    pub const ABSTRACTION: &str = "Abstraction";
    pub const REALIZATION: &str = "Realization";
    pub const USAGE: &str = "Usage";
    pub const GENERALIZATION: &str = "Generalization";
    pub const CONNECTOR: &str = "Connector";
    pub const CONNECTOR_END: &str = "ConnectorEnd";
    pub const INSTANCE_SPECIFICATION: &str = "InstanceSpecification";
    pub const SLOT: &str = "Slot";
    pub const VALUE_SPECIFICATION: &str = "ValueSpecification";
    pub const LITERAL_SPECIFICATION: &str = "LiteralSpecification";
    pub const LITERAL_BOOLEAN: &str = "LiteralBoolean";
    pub const LITERAL_INTEGER: &str = "LiteralInteger";
    pub const LITERAL_STRING: &str = "LiteralString";
    pub const LITERAL_UNLIMITED_NATURAL: &str = "LiteralUnlimitedNatural";
    pub const LIFELINE: &str = "Lifeline";
    pub const INTERACTION_FRAGMENT: &str = "InteractionFragment";
    pub const OCCURRENCE_SPECIFICATION: &str = "OccurrenceSpecification";
    pub const MESSAGE_OCCURRENCE_SPECIFICATION: &str = "MessageOccurrenceSpecification";
    pub const MESSAGE: &str = "Message";
}

/// Relation names.
pub mod relations {
    pub const OWNER: &str = "owner";
    pub const OWNED_ELEMENT: &str = "ownedElement";
    pub const NAMESPACE: &str = "namespace";
    pub const OWNED_MEMBER: &str = "ownedMember";
    pub const PACKAGED_ELEMENT: &str = "packagedElement";
    pub const OWNING_PACKAGE: &str = "owningPackage";
    pub const TYPE: &str = "type";
    pub const LOWER_VALUE: &str = "lowerValue";
    pub const UPPER_VALUE: &str = "upperValue";
    pub const OWNING_LOWER: &str = "owningLower";
    pub const OWNING_UPPER: &str = "owningUpper";
    pub const OWNED_ATTRIBUTE: &str = "ownedAttribute";
    pub const CLASS: &str = "class";
    pub const STRUCTURED_CLASSIFIER: &str = "structuredClassifier";
    pub const INTERFACE: &str = "interface";
    pub const DATA_TYPE: &str = "datatype";
    pub const ARTIFACT: &str = "artifact";
    pub const ASSOCIATION: &str = "association";
    pub const MEMBER_END: &str = "memberEnd";
    pub const OWNED_END: &str = "ownedEnd";
    pub const OWNING_ASSOCIATION: &str = "owningAssociation";
    pub const NAVIGABLE_OWNED_END: &str = "navigableOwnedEnd";
    pub const DEFAULT_VALUE: &str = "defaultValue";
    pub const OWNING_PROPERTY: &str = "owningProperty";
    pub const OWNING_PARAMETER: &str = "owningParameter";
    pub const SUPPLIER: &str = "supplier";
    pub const CLIENT: &str = "client";
    pub const SUPPLIER_DEPENDENCY: &str = "supplierDependency";
    pub const CLIENT_DEPENDENCY: &str = "clientDependency";
    pub const REALIZING_CLASSIFIER: &str = "realizingClassifier";
    pub const ABSTRACTION: &str = "abstraction";
    pub const REALIZATION: &str = "realization";
    pub const GENERAL: &str = "general";
    pub const SPECIFIC: &str = "specific";
    pub const GENERALIZATION: &str = "generalization";
    pub const SPECIALIZATION: &str = "specialization";
    pub const END: &str = "end";
    pub const ROLE: &str = "role";
    pub const CLASSIFIER: &str = "classifier";
    pub const SLOT: &str = "slot";
    pub const OWNING_INSTANCE: &str = "owningInstance";
    pub const APPLIED_STEREOTYPE: &str = "appliedStereotype";
    pub const EXTENDED: &str = "extended";
    pub const DEFINING_FEATURE: &str = "definingFeature";
    pub const VALUE: &str = "value";
    pub const OWNING_SLOT: &str = "owningSlot";
    pub const COVERED: &str = "covered";
    pub const COVERED_BY: &str = "coveredBy";
    pub const SEND_EVENT: &str = "sendEvent";
    pub const RECEIVE_EVENT: &str = "receiveEvent";
}

/// Attribute names.
pub mod attributes {
    pub const NAME: &str = "name";
    pub const TYPE_VALUE: &str = "typeValue";
    pub const AGGREGATION: &str = "aggregation";
    pub const NAVIGABILITY: &str = "navigability";
    pub const VALUE: &str = "value";
    pub const KIND: &str = "kind";
    pub const DIAGRAM_TYPE: &str = "diagramType";
}

/// Enumeration literals.
pub mod literals {
    pub const AGGREGATION_NONE: &str = "none";
    pub const AGGREGATION_SHARED: &str = "shared";
    pub const AGGREGATION_COMPOSITE: &str = "composite";

    pub const NAVIGABLE: &str = "navigable";
    pub const NON_NAVIGABLE: &str = "nonNavigable";
    pub const UNKNOWN: &str = "unknown";

    pub const ASSEMBLY: &str = "assembly";
    pub const DELEGATION: &str = "delegation";
}

use self::{attributes as attr, kinds::*, literals as lit, relations as rel};

fn enumeration(literals: &[&str]) -> AttributeType {
    AttributeType::Enumeration(literals.iter().map(|literal| (*literal).into()).collect())
}

/// Returns a builder with the UML declarations already registered.
pub fn builder() -> MetamodelBuilder {
    let mut builder = MetamodelBuilder::new();
    register(&mut builder);
    builder
}

/// Declares the UML kinds on `builder`.
pub fn register(builder: &mut MetamodelBuilder) {
    register_kinds(builder);
    register_attributes(builder);
    register_ownership(builder);
    register_features(builder);
    register_relationships(builder);
    register_instances(builder);
    register_interactions(builder);
}

fn register_kinds(builder: &mut MetamodelBuilder) {
    builder
        .abstract_kind(ELEMENT, &[])
        .abstract_kind(NAMED_ELEMENT, &[ELEMENT])
        .abstract_kind(NAMESPACE, &[NAMED_ELEMENT])
        .abstract_kind(PACKAGEABLE_ELEMENT, &[NAMED_ELEMENT])
        .kind(PACKAGE, &[NAMESPACE, PACKAGEABLE_ELEMENT])
        .kind(DIAGRAM, &[PACKAGEABLE_ELEMENT])
        .abstract_kind(TYPE, &[PACKAGEABLE_ELEMENT])
        .abstract_kind(REDEFINABLE_ELEMENT, &[NAMED_ELEMENT])
        .abstract_kind(CLASSIFIER, &[NAMESPACE, TYPE, REDEFINABLE_ELEMENT])
        .abstract_kind(STRUCTURED_CLASSIFIER, &[CLASSIFIER])
        .abstract_kind(ENCAPSULATED_CLASSIFIER, &[STRUCTURED_CLASSIFIER])
        .abstract_kind(BEHAVIORED_CLASSIFIER, &[CLASSIFIER])
        .kind(CLASS, &[ENCAPSULATED_CLASSIFIER, BEHAVIORED_CLASSIFIER])
        .kind(INTERFACE, &[CLASSIFIER])
        .kind(DATA_TYPE, &[CLASSIFIER])
        .kind(COMPONENT, &[CLASS])
        .kind(ARTIFACT, &[CLASSIFIER])
        .kind(ACTOR, &[BEHAVIORED_CLASSIFIER])
        .kind(STEREOTYPE, &[CLASS])
        .abstract_kind(TYPED_ELEMENT, &[NAMED_ELEMENT])
        .abstract_kind(MULTIPLICITY_ELEMENT, &[ELEMENT])
        .abstract_kind(FEATURE, &[REDEFINABLE_ELEMENT])
        .abstract_kind(STRUCTURAL_FEATURE, &[FEATURE, TYPED_ELEMENT, MULTIPLICITY_ELEMENT])
        .abstract_kind(CONNECTABLE_ELEMENT, &[TYPED_ELEMENT])
        .kind(PROPERTY, &[STRUCTURAL_FEATURE, CONNECTABLE_ELEMENT])
        .kind(PORT, &[PROPERTY])
        .kind(EXTENSION_END, &[PROPERTY])
        .kind(PARAMETER, &[CONNECTABLE_ELEMENT, MULTIPLICITY_ELEMENT])
        .abstract_kind(RELATIONSHIP, &[ELEMENT])
        .abstract_kind(DIRECTED_RELATIONSHIP, &[RELATIONSHIP])
        .kind(ASSOCIATION, &[CLASSIFIER, RELATIONSHIP])
        .kind(EXTENSION, &[ASSOCIATION])
        .kind(DEPENDENCY, &[DIRECTED_RELATIONSHIP, PACKAGEABLE_ELEMENT])
        .kind(ABSTRACTION, &[DEPENDENCY])
        .kind(REALIZATION, &[ABSTRACTION])
        .kind(USAGE, &[DEPENDENCY])
        .kind(GENERALIZATION, &[DIRECTED_RELATIONSHIP])
        .kind(CONNECTOR, &[FEATURE])
        .kind(CONNECTOR_END, &[MULTIPLICITY_ELEMENT])
        .kind(INSTANCE_SPECIFICATION, &[PACKAGEABLE_ELEMENT])
        .kind(SLOT, &[ELEMENT])
        .abstract_kind(VALUE_SPECIFICATION, &[TYPED_ELEMENT, PACKAGEABLE_ELEMENT])
        .abstract_kind(LITERAL_SPECIFICATION, &[VALUE_SPECIFICATION])
        .kind(LITERAL_BOOLEAN, &[LITERAL_SPECIFICATION])
        .kind(LITERAL_INTEGER, &[LITERAL_SPECIFICATION])
        .kind(LITERAL_STRING, &[LITERAL_SPECIFICATION])
        .kind(LITERAL_UNLIMITED_NATURAL, &[LITERAL_SPECIFICATION])
        .kind(LIFELINE, &[NAMED_ELEMENT])
        .abstract_kind(INTERACTION_FRAGMENT, &[NAMED_ELEMENT])
        .abstract_kind(OCCURRENCE_SPECIFICATION, &[INTERACTION_FRAGMENT])
        .kind(MESSAGE_OCCURRENCE_SPECIFICATION, &[OCCURRENCE_SPECIFICATION])
        .kind(MESSAGE, &[NAMED_ELEMENT]);
}

fn register_attributes(builder: &mut MetamodelBuilder) {
    builder
        .attribute(
            NAMED_ELEMENT,
            AttributeDefinition::new(attr::NAME, AttributeType::String),
        )
        .attribute(
            TYPED_ELEMENT,
            AttributeDefinition::new(attr::TYPE_VALUE, AttributeType::String),
        )
        .attribute(
            DIAGRAM,
            AttributeDefinition::new(attr::DIAGRAM_TYPE, AttributeType::String),
        )
        .attribute(
            PROPERTY,
            AttributeDefinition::new(
                attr::AGGREGATION,
                enumeration(&[
                    lit::AGGREGATION_NONE,
                    lit::AGGREGATION_SHARED,
                    lit::AGGREGATION_COMPOSITE,
                ]),
            )
            .with_default(lit::AGGREGATION_NONE),
        )
        .attribute(
            PROPERTY,
            AttributeDefinition::new(
                attr::NAVIGABILITY,
                enumeration(&[lit::NAVIGABLE, lit::NON_NAVIGABLE, lit::UNKNOWN]),
            ),
        )
        .attribute(
            CONNECTOR,
            AttributeDefinition::new(attr::KIND, enumeration(&[lit::ASSEMBLY, lit::DELEGATION])),
        )
        .attribute(
            LITERAL_BOOLEAN,
            AttributeDefinition::new(attr::VALUE, AttributeType::Boolean).with_default(false),
        )
        .attribute(
            LITERAL_INTEGER,
            AttributeDefinition::new(attr::VALUE, AttributeType::Integer).with_default(0_i64),
        )
        .attribute(
            LITERAL_STRING,
            AttributeDefinition::new(attr::VALUE, AttributeType::String),
        )
        .attribute(
            LITERAL_UNLIMITED_NATURAL,
            AttributeDefinition::new(attr::VALUE, AttributeType::UnlimitedNatural)
                .with_default(UnlimitedNatural::Finite(0)),
        );
}

/// Ownership relations and the `owner`/`namespace` derived unions.
fn register_ownership(builder: &mut MetamodelBuilder) {
    builder
        .relation(ELEMENT, RelationSpec::one(rel::OWNER, ELEMENT).derived_union())
        .relation(
            ELEMENT,
            RelationSpec::many(rel::OWNED_ELEMENT, ELEMENT).derived_union(),
        )
        .relation(
            NAMED_ELEMENT,
            RelationSpec::one(rel::NAMESPACE, NAMESPACE).derived_union(),
        )
        .relation(
            NAMESPACE,
            RelationSpec::many(rel::OWNED_MEMBER, NAMED_ELEMENT).derived_union(),
        )
        .relation(
            PACKAGE,
            RelationSpec::many(rel::PACKAGED_ELEMENT, PACKAGEABLE_ELEMENT)
                .composite()
                .opposite(rel::OWNING_PACKAGE),
        )
        .relation(
            PACKAGEABLE_ELEMENT,
            RelationSpec::one(rel::OWNING_PACKAGE, PACKAGE).opposite(rel::PACKAGED_ELEMENT),
        )
        .relation(
            ELEMENT,
            RelationSpec::many(rel::APPLIED_STEREOTYPE, INSTANCE_SPECIFICATION)
                .composite()
                .opposite(rel::EXTENDED),
        )
        .relation(
            INSTANCE_SPECIFICATION,
            RelationSpec::many(rel::EXTENDED, ELEMENT).opposite(rel::APPLIED_STEREOTYPE),
        )
        .add_subset(NAMED_ELEMENT, rel::NAMESPACE, PACKAGEABLE_ELEMENT, rel::OWNING_PACKAGE)
        .add_subset(NAMESPACE, rel::OWNED_MEMBER, PACKAGE, rel::PACKAGED_ELEMENT)
        .add_subset(ELEMENT, rel::OWNER, NAMED_ELEMENT, rel::NAMESPACE)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, NAMESPACE, rel::OWNED_MEMBER)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, ELEMENT, rel::APPLIED_STEREOTYPE);
}

/// Typed elements, multiplicities, attributes and connectors.
fn register_features(builder: &mut MetamodelBuilder) {
    builder
        .relation(TYPED_ELEMENT, RelationSpec::one(rel::TYPE, TYPE))
        .relation(
            MULTIPLICITY_ELEMENT,
            RelationSpec::one(rel::LOWER_VALUE, VALUE_SPECIFICATION)
                .composite()
                .opposite(rel::OWNING_LOWER),
        )
        .relation(
            MULTIPLICITY_ELEMENT,
            RelationSpec::one(rel::UPPER_VALUE, VALUE_SPECIFICATION)
                .composite()
                .opposite(rel::OWNING_UPPER),
        )
        .relation(
            VALUE_SPECIFICATION,
            RelationSpec::one(rel::OWNING_LOWER, MULTIPLICITY_ELEMENT).opposite(rel::LOWER_VALUE),
        )
        .relation(
            VALUE_SPECIFICATION,
            RelationSpec::one(rel::OWNING_UPPER, MULTIPLICITY_ELEMENT).opposite(rel::UPPER_VALUE),
        )
        .relation(
            PROPERTY,
            RelationSpec::one(rel::DEFAULT_VALUE, VALUE_SPECIFICATION)
                .composite()
                .opposite(rel::OWNING_PROPERTY),
        )
        .relation(
            VALUE_SPECIFICATION,
            RelationSpec::one(rel::OWNING_PROPERTY, PROPERTY).opposite(rel::DEFAULT_VALUE),
        )
        .relation(
            PARAMETER,
            RelationSpec::one(rel::DEFAULT_VALUE, VALUE_SPECIFICATION)
                .composite()
                .opposite(rel::OWNING_PARAMETER),
        )
        .relation(
            VALUE_SPECIFICATION,
            RelationSpec::one(rel::OWNING_PARAMETER, PARAMETER).opposite(rel::DEFAULT_VALUE),
        );

    // Every classifier able to own attributes pairs `ownedAttribute` with its
    // own back reference on Property.
    let attribute_owners = [
        (CLASS, rel::CLASS),
        (STRUCTURED_CLASSIFIER, rel::STRUCTURED_CLASSIFIER),
        (INTERFACE, rel::INTERFACE),
        (DATA_TYPE, rel::DATA_TYPE),
        (ARTIFACT, rel::ARTIFACT),
    ];
    for (owner, back_reference) in attribute_owners {
        builder
            .relation(
                owner,
                RelationSpec::many(rel::OWNED_ATTRIBUTE, PROPERTY)
                    .composite()
                    .opposite(back_reference),
            )
            .relation(
                PROPERTY,
                RelationSpec::one(back_reference, owner).opposite(rel::OWNED_ATTRIBUTE),
            )
            .add_subset(NAMESPACE, rel::OWNED_MEMBER, owner, rel::OWNED_ATTRIBUTE)
            .add_subset(NAMED_ELEMENT, rel::NAMESPACE, PROPERTY, back_reference);
    }

    builder
        .relation(
            CONNECTOR,
            RelationSpec::many(rel::END, CONNECTOR_END).composite(),
        )
        .relation(
            CONNECTOR_END,
            RelationSpec::one(rel::ROLE, CONNECTABLE_ELEMENT).opposite(rel::END),
        )
        .relation(
            CONNECTABLE_ELEMENT,
            RelationSpec::many(rel::END, CONNECTOR_END).opposite(rel::ROLE),
        )
        .add_subset(ELEMENT, rel::OWNER, VALUE_SPECIFICATION, rel::OWNING_LOWER)
        .add_subset(ELEMENT, rel::OWNER, VALUE_SPECIFICATION, rel::OWNING_UPPER)
        .add_subset(ELEMENT, rel::OWNER, VALUE_SPECIFICATION, rel::OWNING_PROPERTY)
        .add_subset(ELEMENT, rel::OWNER, VALUE_SPECIFICATION, rel::OWNING_PARAMETER)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, MULTIPLICITY_ELEMENT, rel::LOWER_VALUE)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, MULTIPLICITY_ELEMENT, rel::UPPER_VALUE)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, PROPERTY, rel::DEFAULT_VALUE)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, PARAMETER, rel::DEFAULT_VALUE)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, CONNECTOR, rel::END);
}

/// Associations, dependencies and generalizations.
fn register_relationships(builder: &mut MetamodelBuilder) {
    builder
        .relation(
            ASSOCIATION,
            RelationSpec::many(rel::MEMBER_END, PROPERTY).opposite(rel::ASSOCIATION),
        )
        .relation(
            PROPERTY,
            RelationSpec::one(rel::ASSOCIATION, ASSOCIATION).opposite(rel::MEMBER_END),
        )
        .relation(
            ASSOCIATION,
            RelationSpec::many(rel::OWNED_END, PROPERTY)
                .composite()
                .opposite(rel::OWNING_ASSOCIATION),
        )
        .relation(
            PROPERTY,
            RelationSpec::one(rel::OWNING_ASSOCIATION, ASSOCIATION).opposite(rel::OWNED_END),
        )
        .relation(
            ASSOCIATION,
            RelationSpec::many(rel::NAVIGABLE_OWNED_END, PROPERTY),
        )
        .add_subset(NAMESPACE, rel::OWNED_MEMBER, ASSOCIATION, rel::OWNED_END)
        .add_subset(NAMED_ELEMENT, rel::NAMESPACE, PROPERTY, rel::OWNING_ASSOCIATION)
        .relation(
            DEPENDENCY,
            RelationSpec::one(rel::SUPPLIER, NAMED_ELEMENT).opposite(rel::SUPPLIER_DEPENDENCY),
        )
        .relation(
            DEPENDENCY,
            RelationSpec::one(rel::CLIENT, NAMED_ELEMENT).opposite(rel::CLIENT_DEPENDENCY),
        )
        .relation(
            NAMED_ELEMENT,
            RelationSpec::many(rel::SUPPLIER_DEPENDENCY, DEPENDENCY).opposite(rel::SUPPLIER),
        )
        .relation(
            NAMED_ELEMENT,
            RelationSpec::many(rel::CLIENT_DEPENDENCY, DEPENDENCY).opposite(rel::CLIENT),
        )
        .relation(
            REALIZATION,
            RelationSpec::one(rel::REALIZING_CLASSIFIER, CLASSIFIER),
        )
        .relation(
            REALIZATION,
            RelationSpec::one(rel::ABSTRACTION, COMPONENT).opposite(rel::REALIZATION),
        )
        .relation(
            COMPONENT,
            RelationSpec::many(rel::REALIZATION, REALIZATION).opposite(rel::ABSTRACTION),
        )
        .relation(
            GENERALIZATION,
            RelationSpec::one(rel::GENERAL, CLASSIFIER).opposite(rel::SPECIALIZATION),
        )
        .relation(
            GENERALIZATION,
            RelationSpec::one(rel::SPECIFIC, CLASSIFIER).opposite(rel::GENERALIZATION),
        )
        .relation(
            CLASSIFIER,
            RelationSpec::many(rel::GENERALIZATION, GENERALIZATION)
                .composite()
                .opposite(rel::SPECIFIC),
        )
        .relation(
            CLASSIFIER,
            RelationSpec::many(rel::SPECIALIZATION, GENERALIZATION).opposite(rel::GENERAL),
        )
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, CLASSIFIER, rel::GENERALIZATION)
        .add_subset(ELEMENT, rel::OWNER, GENERALIZATION, rel::SPECIFIC);
}

/// Instance specifications and slots.
fn register_instances(builder: &mut MetamodelBuilder) {
    builder
        .relation(
            INSTANCE_SPECIFICATION,
            RelationSpec::many(rel::CLASSIFIER, CLASSIFIER),
        )
        .relation(
            INSTANCE_SPECIFICATION,
            RelationSpec::many(rel::SLOT, SLOT)
                .composite()
                .opposite(rel::OWNING_INSTANCE),
        )
        .relation(
            SLOT,
            RelationSpec::one(rel::OWNING_INSTANCE, INSTANCE_SPECIFICATION).opposite(rel::SLOT),
        )
        .relation(
            SLOT,
            RelationSpec::one(rel::DEFINING_FEATURE, STRUCTURAL_FEATURE),
        )
        .relation(
            SLOT,
            RelationSpec::one(rel::VALUE, VALUE_SPECIFICATION)
                .composite()
                .opposite(rel::OWNING_SLOT),
        )
        .relation(
            VALUE_SPECIFICATION,
            RelationSpec::one(rel::OWNING_SLOT, SLOT).opposite(rel::VALUE),
        )
        .add_subset(ELEMENT, rel::OWNER, SLOT, rel::OWNING_INSTANCE)
        .add_subset(ELEMENT, rel::OWNER, VALUE_SPECIFICATION, rel::OWNING_SLOT)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, INSTANCE_SPECIFICATION, rel::SLOT)
        .add_subset(ELEMENT, rel::OWNED_ELEMENT, SLOT, rel::VALUE);
}

/// Lifelines, messages and their occurrence specifications.
fn register_interactions(builder: &mut MetamodelBuilder) {
    builder
        .relation(
            OCCURRENCE_SPECIFICATION,
            RelationSpec::one(rel::COVERED, LIFELINE).opposite(rel::COVERED_BY),
        )
        .relation(
            LIFELINE,
            RelationSpec::many(rel::COVERED_BY, OCCURRENCE_SPECIFICATION).opposite(rel::COVERED),
        )
        .relation(
            MESSAGE,
            RelationSpec::one(rel::SEND_EVENT, MESSAGE_OCCURRENCE_SPECIFICATION).composite(),
        )
        .relation(
            MESSAGE,
            RelationSpec::one(rel::RECEIVE_EVENT, MESSAGE_OCCURRENCE_SPECIFICATION).composite(),
        );
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        metamodel::{Kind, Upper},
        value::AttributeValue,
    };

    #[test]
    fn test_uml_metamodel_builds() {
        let metamodel = builder().build().expect("UML declarations are consistent");
        assert!(metamodel.contains(Kind::new(CLASS)));
        assert!(metamodel.definition(Kind::new(CLASSIFIER)).unwrap().is_abstract());
    }

    #[test]
    fn test_classifier_hierarchy() {
        let metamodel = builder().build().unwrap();

        assert!(metamodel.is_a(Kind::new(STEREOTYPE), CLASS));
        assert!(metamodel.is_a(Kind::new(COMPONENT), STRUCTURED_CLASSIFIER));
        assert!(metamodel.is_a(Kind::new(PORT), CONNECTABLE_ELEMENT));
        assert!(metamodel.is_a(Kind::new(EXTENSION_END), PROPERTY));
        assert!(metamodel.is_a(Kind::new(LITERAL_UNLIMITED_NATURAL), VALUE_SPECIFICATION));
        assert!(!metamodel.is_a(Kind::new(INTERFACE), STRUCTURED_CLASSIFIER));
        assert!(!metamodel.is_a(Kind::new(ACTOR), STRUCTURED_CLASSIFIER));
    }

    #[test]
    fn test_owned_attribute_resolves_per_owner() {
        let metamodel = builder().build().unwrap();

        let on_class = metamodel
            .relation(Kind::new(COMPONENT), rel::OWNED_ATTRIBUTE)
            .unwrap();
        let on_interface = metamodel
            .relation(Kind::new(INTERFACE), rel::OWNED_ATTRIBUTE)
            .unwrap();

        assert_eq!(on_class.owner(), Kind::new(CLASS));
        assert_eq!(on_interface.owner(), Kind::new(INTERFACE));
        assert!(metamodel.relation(Kind::new(ACTOR), rel::OWNED_ATTRIBUTE).is_none());
    }

    #[test]
    fn test_member_end_pairs_with_association() {
        let metamodel = builder().build().unwrap();
        let member_end = metamodel
            .relation(Kind::new(EXTENSION), rel::MEMBER_END)
            .unwrap();
        let association = metamodel
            .relation(Kind::new(EXTENSION_END), rel::ASSOCIATION)
            .unwrap();

        assert_eq!(member_end.opposite(), Some(association.key()));
        assert_eq!(association.upper(), Upper::One);
        assert!(metamodel
            .relation(Kind::new(ASSOCIATION), rel::NAVIGABLE_OWNED_END)
            .unwrap()
            .opposite()
            .is_none());
    }

    #[test]
    fn test_literal_value_defaults() {
        let metamodel = builder().build().unwrap();
        let integer = metamodel
            .attribute(Kind::new(LITERAL_INTEGER), attr::VALUE)
            .unwrap();
        assert_eq!(integer.ty(), &AttributeType::Integer);
        assert_eq!(integer.default(), Some(&AttributeValue::Integer(0)));
    }
}
