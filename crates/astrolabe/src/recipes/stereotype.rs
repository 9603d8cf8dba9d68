//! Stereotypes and extensions.
//!
//! A stereotype is applied to an element by creating an
//! `InstanceSpecification` classified by the stereotype and attaching it to
//! the element's `appliedStereotype` collection. Which stereotypes may be
//! applied is decided by the extensions in the model: an `Extension` links a
//! metaclass (a `Class` named after an element kind) to a stereotype.

use indexmap::IndexSet;
use log::{debug, trace};

use astrolabe_core::{
    model::{ElementId, Model},
    uml::{attributes as attr, kinds, literals, relations as rel},
};

use super::{ensure_kind, ensure_same_model};
use crate::error::RecipeError;

/// Name of the property through which a stereotype refers to its metaclass.
pub const BASE_CLASS: &str = "baseClass";

/// Display name of a stereotype.
///
/// The first character is lowercased unless the second one is uppercase, so
/// acronyms like `FOOBar` keep their spelling.
pub fn stereotype_name(model: &Model, stereotype: ElementId) -> String {
    let name = model.name(stereotype).unwrap_or_default();
    let mut chars = name.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    if chars.next().is_some_and(char::is_uppercase) {
        return name;
    }
    first.to_lowercase().chain(name.chars().skip(1)).collect()
}

/// Label listing `extra` followed by the stereotypes applied to `element`,
/// e.g. `«entity, persistent»`. Empty when there is nothing to list.
pub fn stereotypes_str(model: &Model, element: Option<ElementId>, extra: &[&str]) -> String {
    let applied = element
        .and_then(|element| get_applied_stereotypes(model, element).ok())
        .unwrap_or_default();
    let names: Vec<String> = extra
        .iter()
        .map(|name| (*name).to_string())
        .chain(
            applied
                .into_iter()
                .map(|stereotype| stereotype_name(model, stereotype)),
        )
        .collect();
    if names.is_empty() {
        String::new()
    } else {
        format!("«{}»", names.join(", "))
    }
}

/// Applies `stereotype` to `element` and returns the created instance
/// specification.
pub fn apply_stereotype(
    model: &mut Model,
    element: ElementId,
    stereotype: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "Element and Stereotype", &[element, stereotype])?;
    model.kind(element)?;
    ensure_kind(model, stereotype, kinds::STEREOTYPE)?;

    let instance = model.create(kinds::INSTANCE_SPECIFICATION)?;
    model.add(instance, rel::CLASSIFIER, stereotype)?;
    model.add(element, rel::APPLIED_STEREOTYPE, instance)?;
    debug!(
        element:% = element,
        stereotype:% = stereotype,
        instance:% = instance;
        "Stereotype applied"
    );
    Ok(instance)
}

/// Removes the first application of `stereotype` from `element` and discards
/// its instance specification. Does nothing when the stereotype is not
/// applied.
pub fn remove_stereotype(
    model: &mut Model,
    element: ElementId,
    stereotype: ElementId,
) -> Result<(), RecipeError> {
    let applied = model.related(element, rel::APPLIED_STEREOTYPE)?;
    for instance in applied {
        let classifiers = model.related(instance, rel::CLASSIFIER)?;
        if classifiers.first() == Some(&stereotype) {
            model.remove(element, rel::APPLIED_STEREOTYPE, instance)?;
            model.unlink(instance)?;
            debug!(element:% = element, stereotype:% = stereotype; "Stereotype removed");
            break;
        }
    }
    Ok(())
}

/// The stereotypes applied to `element`, in application order.
pub fn get_applied_stereotypes(
    model: &Model,
    element: ElementId,
) -> Result<Vec<ElementId>, RecipeError> {
    let mut stereotypes = Vec::new();
    for instance in model.related(element, rel::APPLIED_STEREOTYPE)? {
        stereotypes.extend(model.related(instance, rel::CLASSIFIER)?);
    }
    Ok(stereotypes)
}

/// The stereotypes applicable to `element`, sorted by name.
///
/// A class in the model acts as a metaclass for `element` when its name
/// resolves to a registered kind `element` is an instance of. The
/// stereotypes extending such a class are applicable, together with every
/// stereotype specializing one of them. Stereotypes themselves cannot be
/// stereotyped.
pub fn get_stereotypes(model: &Model, element: ElementId) -> Result<Vec<ElementId>, RecipeError> {
    model.kind(element)?;
    if model.is_a(element, kinds::STEREOTYPE) {
        return Ok(Vec::new());
    }

    let metamodel = model.metamodel();
    let metaclasses: Vec<ElementId> = model
        .elements_of(kinds::CLASS)
        .filter(|class| {
            model
                .name(*class)
                .and_then(|name| metamodel.kind(&name))
                .is_some_and(|kind| model.is_a(element, kind))
        })
        .collect();

    let mut stereotypes = IndexSet::new();
    for metaclass in metaclasses {
        for extension in extensions(model, metaclass)? {
            stereotypes.extend(extension_stereotype(model, extension)?);
        }
    }

    // Specializations found on the way are searched as well.
    let mut index = 0;
    while let Some(&stereotype) = stereotypes.get_index(index) {
        for generalization in model.related(stereotype, rel::SPECIALIZATION)? {
            let specific = model.get(generalization, rel::SPECIFIC)?;
            let specific =
                specific.filter(|specific| model.is_a(*specific, kinds::STEREOTYPE));
            if let Some(specific) = specific {
                stereotypes.insert(specific);
            }
        }
        index += 1;
    }

    let mut stereotypes: Vec<(String, ElementId)> = stereotypes
        .into_iter()
        .map(|stereotype| (model.name(stereotype).unwrap_or_default(), stereotype))
        .collect();
    stereotypes.sort_by(|(left, _), (right, _)| left.cmp(right));
    trace!(element:% = element, count = stereotypes.len(); "Applicable stereotypes collected");
    Ok(stereotypes.into_iter().map(|(_, stereotype)| stereotype).collect())
}

/// The stereotype on the owned end of `extension`.
fn extension_stereotype(
    model: &Model,
    extension: ElementId,
) -> Result<Option<ElementId>, RecipeError> {
    for end in model.related(extension, rel::OWNED_END)? {
        if model.is_a(end, kinds::EXTENSION_END) {
            return Ok(model.get(end, rel::TYPE)?);
        }
    }
    Ok(None)
}

/// Creates an `Extension` from `metaclass` to `stereotype`.
///
/// The stereotype gets a `baseClass` property typed by the metaclass; the
/// metaclass owns the composite extension end typed by the stereotype.
pub fn create_extension(
    model: &mut Model,
    metaclass: ElementId,
    stereotype: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(model, "Metaclass and Stereotype", &[metaclass, stereotype])?;
    ensure_kind(model, metaclass, kinds::CLASS)?;
    ensure_kind(model, stereotype, kinds::STEREOTYPE)?;

    let extension = model.create(kinds::EXTENSION)?;
    let base = model.create(kinds::PROPERTY)?;
    let extension_end = model.create(kinds::EXTENSION_END)?;

    model.add(extension, rel::MEMBER_END, base)?;
    model.add(extension, rel::MEMBER_END, extension_end)?;
    model.add(extension, rel::OWNED_END, extension_end)?;
    model.set(extension_end, rel::TYPE, Some(stereotype))?;
    model.set_attribute(
        extension_end,
        attr::AGGREGATION,
        Some(literals::AGGREGATION_COMPOSITE.into()),
    )?;
    model.set(base, rel::TYPE, Some(metaclass))?;
    model.set_name(base, BASE_CLASS)?;
    model.add(stereotype, rel::OWNED_ATTRIBUTE, base)?;
    model.add(metaclass, rel::OWNED_ATTRIBUTE, extension_end)?;

    debug!(
        extension:% = extension,
        metaclass:% = metaclass,
        stereotype:% = stereotype;
        "Extension created"
    );
    Ok(extension)
}

/// The extensions reaching `class`, found through the extension ends it
/// owns.
pub fn extensions(model: &Model, class: ElementId) -> Result<Vec<ElementId>, RecipeError> {
    if !model.is_a(class, kinds::CLASS) {
        return Ok(Vec::new());
    }
    let mut extensions = IndexSet::new();
    for attribute in model.related(class, rel::OWNED_ATTRIBUTE)? {
        if !model.is_a(attribute, kinds::EXTENSION_END) {
            continue;
        }
        if let Some(extension) = model.get(attribute, rel::ASSOCIATION)? {
            extensions.insert(extension);
        }
    }
    Ok(extensions.into_iter().collect())
}

/// Whether `element` is a class extended by at least one stereotype.
pub fn is_metaclass(model: &Model, element: ElementId) -> bool {
    !model.is_a(element, kinds::STEREOTYPE)
        && extensions(model, element).is_ok_and(|extensions| !extensions.is_empty())
}

#[cfg(test)]
mod tests {
    use astrolabe_core::value::AttributeValue;

    use super::*;
    use crate::{recipes::relationship::create_generalization, registry};

    fn named(model: &mut Model, kind: &str, name: &str) -> ElementId {
        let element = model.create(kind).unwrap();
        model.set_name(element, name).unwrap();
        element
    }

    #[test]
    fn test_stereotype_name() {
        let mut model = registry::new_model();
        let cases = [
            ("Foobar", "foobar"),
            ("FOOBar", "FOOBar"),
            ("X", "x"),
            ("Éclair", "éclair"),
            ("", ""),
        ];

        for (name, expected) in cases {
            let stereotype = named(&mut model, kinds::STEREOTYPE, name);
            assert_eq!(stereotype_name(&model, stereotype), expected, "name {name:?}");
        }

        let unnamed = model.create(kinds::STEREOTYPE).unwrap();
        assert_eq!(stereotype_name(&model, unnamed), "");
    }

    #[test]
    fn test_stereotypes_str() {
        let mut model = registry::new_model();
        let class = model.create(kinds::CLASS).unwrap();
        let entity = named(&mut model, kinds::STEREOTYPE, "Entity");
        let persistent = named(&mut model, kinds::STEREOTYPE, "Persistent");

        assert_eq!(stereotypes_str(&model, Some(class), &[]), "");
        assert_eq!(stereotypes_str(&model, None, &["interface"]), "«interface»");

        apply_stereotype(&mut model, class, entity).unwrap();
        apply_stereotype(&mut model, class, persistent).unwrap();

        assert_eq!(
            stereotypes_str(&model, Some(class), &["extra"]),
            "«extra, entity, persistent»"
        );
    }

    #[test]
    fn test_apply_and_remove_stereotype() {
        let mut model = registry::new_model();
        let class = model.create(kinds::CLASS).unwrap();
        let stereotype = named(&mut model, kinds::STEREOTYPE, "Entity");

        let instance = apply_stereotype(&mut model, class, stereotype).unwrap();

        assert_eq!(get_applied_stereotypes(&model, class).unwrap(), vec![stereotype]);
        assert!(model.related(class, rel::OWNED_ELEMENT).unwrap().contains(&instance));
        assert_eq!(model.related(instance, rel::EXTENDED).unwrap(), vec![class]);

        remove_stereotype(&mut model, class, stereotype).unwrap();

        assert!(get_applied_stereotypes(&model, class).unwrap().is_empty());
        assert!(!model.contains(instance));
    }

    #[test]
    fn test_remove_unapplied_stereotype_is_noop() {
        let mut model = registry::new_model();
        let class = model.create(kinds::CLASS).unwrap();
        let applied = named(&mut model, kinds::STEREOTYPE, "Applied");
        let other = named(&mut model, kinds::STEREOTYPE, "Other");
        apply_stereotype(&mut model, class, applied).unwrap();
        let before = model.len();

        remove_stereotype(&mut model, class, other).unwrap();

        assert_eq!(model.len(), before);
        assert_eq!(get_applied_stereotypes(&model, class).unwrap(), vec![applied]);
    }

    #[test]
    fn test_remove_only_first_application() {
        let mut model = registry::new_model();
        let class = model.create(kinds::CLASS).unwrap();
        let stereotype = named(&mut model, kinds::STEREOTYPE, "Entity");
        apply_stereotype(&mut model, class, stereotype).unwrap();
        let second = apply_stereotype(&mut model, class, stereotype).unwrap();

        remove_stereotype(&mut model, class, stereotype).unwrap();

        assert_eq!(
            model.related(class, rel::APPLIED_STEREOTYPE).unwrap(),
            vec![second]
        );
    }

    #[test]
    fn test_create_extension_structure() {
        let mut model = registry::new_model();
        let metaclass = named(&mut model, kinds::CLASS, "Class");
        let stereotype = named(&mut model, kinds::STEREOTYPE, "Entity");

        let extension = create_extension(&mut model, metaclass, stereotype).unwrap();

        let ends = model.related(extension, rel::MEMBER_END).unwrap();
        assert_eq!(ends.len(), 2);
        let (base, extension_end) = (ends[0], ends[1]);
        assert_eq!(model.name(base).as_deref(), Some(BASE_CLASS));
        assert_eq!(model.get(base, rel::TYPE).unwrap(), Some(metaclass));
        assert_eq!(model.get(base, rel::CLASS).unwrap(), Some(stereotype));
        assert!(model.is_a(extension_end, kinds::EXTENSION_END));
        assert_eq!(model.get(extension_end, rel::TYPE).unwrap(), Some(stereotype));
        assert_eq!(
            model.attribute(extension_end, attr::AGGREGATION).unwrap(),
            Some(AttributeValue::from(literals::AGGREGATION_COMPOSITE))
        );
        assert_eq!(
            model.related(extension, rel::OWNED_END).unwrap(),
            vec![extension_end]
        );
        assert_eq!(extensions(&model, metaclass).unwrap(), vec![extension]);
        assert!(is_metaclass(&model, metaclass));
        assert!(!is_metaclass(&model, stereotype));
    }

    #[test]
    fn test_get_stereotypes_by_kind_hierarchy() {
        let mut model = registry::new_model();
        let classifier_metaclass = named(&mut model, kinds::CLASS, "Classifier");
        let package_metaclass = named(&mut model, kinds::CLASS, "Package");
        let entity = named(&mut model, kinds::STEREOTYPE, "Entity");
        let boundary = named(&mut model, kinds::STEREOTYPE, "Boundary");
        let folder = named(&mut model, kinds::STEREOTYPE, "Folder");
        create_extension(&mut model, classifier_metaclass, entity).unwrap();
        create_extension(&mut model, classifier_metaclass, boundary).unwrap();
        create_extension(&mut model, package_metaclass, folder).unwrap();

        let interface = model.create(kinds::INTERFACE).unwrap();
        let package = model.create(kinds::PACKAGE).unwrap();

        assert_eq!(get_stereotypes(&model, interface).unwrap(), vec![boundary, entity]);
        assert_eq!(get_stereotypes(&model, package).unwrap(), vec![folder]);
        assert!(get_stereotypes(&model, entity).unwrap().is_empty());
    }

    #[test]
    fn test_get_stereotypes_includes_specializations() {
        let mut model = registry::new_model();
        let metaclass = named(&mut model, kinds::CLASS, "Class");
        let entity = named(&mut model, kinds::STEREOTYPE, "Entity");
        let aggregate = named(&mut model, kinds::STEREOTYPE, "Aggregate");
        let root = named(&mut model, kinds::STEREOTYPE, "Root");
        create_extension(&mut model, metaclass, entity).unwrap();
        create_generalization(&mut model, entity, aggregate).unwrap();
        create_generalization(&mut model, aggregate, root).unwrap();

        let class = model.create(kinds::CLASS).unwrap();

        assert_eq!(
            get_stereotypes(&model, class).unwrap(),
            vec![aggregate, entity, root]
        );
    }

    #[test]
    fn test_cross_model_application_fails() {
        let mut model = registry::new_model();
        let mut other = registry::new_model();
        let class = model.create(kinds::CLASS).unwrap();
        let stereotype = other.create(kinds::STEREOTYPE).unwrap();

        let result = apply_stereotype(&mut model, class, stereotype);

        assert_eq!(
            result,
            Err(RecipeError::DifferentModels {
                what: "Element and Stereotype"
            })
        );
        assert_eq!(model.len(), 1);
    }
}
