//! The C4 architecture profile.
//!
//! Adds persons, containers and databases on top of the UML kinds. Containers
//! nest through `ownerContainer`/`owningContainer`, which are registered as
//! subsets of the generic `namespace`/`ownedMember` unions so that generic
//! ownership queries see them.

use astrolabe_core::{
    metamodel::{AttributeDefinition, MetamodelBuilder, RelationSpec},
    model::{ElementId, Model},
    uml,
    value::AttributeType,
};

use crate::error::RecipeError;

/// Kind names.
pub mod kinds {
    pub const PERSON: &str = "C4Model::Person";
    pub const CONTAINER: &str = "C4Model::Container";
    pub const DATABASE: &str = "C4Model::Database";
    pub const DEPENDENCY: &str = "C4Model::Dependency";
    pub const DIAGRAM: &str = "C4Model::C4Diagram";
}

/// Attribute names.
pub mod attributes {
    pub const DESCRIPTION: &str = "description";
    pub const LOCATION: &str = "location";
    pub const TECHNOLOGY: &str = "technology";
    pub const TYPE: &str = "type";
}

/// Relation names.
pub mod relations {
    /// The enclosing container.
    pub const OWNER_CONTAINER: &str = "ownerContainer";
    /// The nested containers.
    pub const OWNING_CONTAINER: &str = "owningContainer";
}

use self::{attributes as attr, kinds::*, relations as rel};

/// Declares the C4 kinds on `builder`. The UML kinds must be registered too.
pub fn register(builder: &mut MetamodelBuilder) {
    let text = |name: &str| AttributeDefinition::new(name, AttributeType::String);

    builder
        .kind(PERSON, &[uml::kinds::ACTOR])
        .attribute(PERSON, text(attr::DESCRIPTION))
        .attribute(PERSON, text(attr::LOCATION))
        .kind(CONTAINER, &[uml::kinds::PACKAGE])
        .attribute(CONTAINER, text(attr::DESCRIPTION))
        .attribute(CONTAINER, text(attr::LOCATION))
        .attribute(CONTAINER, text(attr::TECHNOLOGY))
        .attribute(CONTAINER, text(attr::TYPE))
        .kind(DATABASE, &[CONTAINER])
        .kind(DEPENDENCY, &[uml::kinds::DEPENDENCY])
        .attribute(DEPENDENCY, text(attr::TECHNOLOGY))
        .kind(DIAGRAM, &[uml::kinds::DIAGRAM])
        .attribute(
            DIAGRAM,
            text(uml::attributes::DIAGRAM_TYPE).with_default("c4"),
        )
        .relation(
            CONTAINER,
            RelationSpec::one(rel::OWNER_CONTAINER, CONTAINER).opposite(rel::OWNING_CONTAINER),
        )
        .relation(
            CONTAINER,
            RelationSpec::many(rel::OWNING_CONTAINER, CONTAINER)
                .composite()
                .opposite(rel::OWNER_CONTAINER),
        )
        .add_subset(
            uml::kinds::NAMED_ELEMENT,
            uml::relations::NAMESPACE,
            CONTAINER,
            rel::OWNER_CONTAINER,
        )
        .add_subset(
            uml::kinds::NAMESPACE,
            uml::relations::OWNED_MEMBER,
            CONTAINER,
            rel::OWNING_CONTAINER,
        );
}

fn create_named(model: &mut Model, kind: &str, name: &str) -> Result<ElementId, RecipeError> {
    let element = model.create(kind)?;
    model.set_name(element, name)?;
    Ok(element)
}

/// Creates a named person.
pub fn create_person(model: &mut Model, name: &str) -> Result<ElementId, RecipeError> {
    create_named(model, PERSON, name)
}

/// Creates a named container.
pub fn create_container(model: &mut Model, name: &str) -> Result<ElementId, RecipeError> {
    create_named(model, CONTAINER, name)
}

/// Creates a named database container.
pub fn create_database(model: &mut Model, name: &str) -> Result<ElementId, RecipeError> {
    create_named(model, DATABASE, name)
}

/// Nests `container` inside `owner`, or detaches it with `None`.
pub fn set_owner_container(
    model: &mut Model,
    container: ElementId,
    owner: Option<ElementId>,
) -> Result<(), RecipeError> {
    if owner.is_some_and(|owner| owner.model() != container.model()) {
        return Err(RecipeError::DifferentModels {
            what: "Container and owner container",
        });
    }
    model.set(container, rel::OWNER_CONTAINER, owner)?;
    Ok(())
}

fn text_attribute(
    model: &Model,
    element: ElementId,
    name: &str,
) -> Result<Option<String>, RecipeError> {
    Ok(model
        .attribute(element, name)?
        .and_then(|value| value.as_str().map(str::to_string)))
}

fn set_text_attribute(
    model: &mut Model,
    element: ElementId,
    name: &str,
    value: Option<&str>,
) -> Result<(), RecipeError> {
    model.set_attribute(element, name, value.map(Into::into))?;
    Ok(())
}

pub fn description(model: &Model, element: ElementId) -> Result<Option<String>, RecipeError> {
    text_attribute(model, element, attr::DESCRIPTION)
}

pub fn set_description(
    model: &mut Model,
    element: ElementId,
    description: Option<&str>,
) -> Result<(), RecipeError> {
    set_text_attribute(model, element, attr::DESCRIPTION, description)
}

pub fn technology(model: &Model, element: ElementId) -> Result<Option<String>, RecipeError> {
    text_attribute(model, element, attr::TECHNOLOGY)
}

pub fn set_technology(
    model: &mut Model,
    element: ElementId,
    technology: Option<&str>,
) -> Result<(), RecipeError> {
    set_text_attribute(model, element, attr::TECHNOLOGY, technology)
}
