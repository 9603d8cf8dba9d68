//! Slots of instance specifications.

use log::debug;

use astrolabe_core::{
    model::{ElementId, Model},
    uml::{attributes as attr, kinds, relations as rel},
};

use super::{ensure_kind, ensure_same_model};
use crate::error::RecipeError;

/// Adds a slot for `defining_feature` to `instance`.
pub fn add_slot(
    model: &mut Model,
    instance: ElementId,
    defining_feature: ElementId,
) -> Result<ElementId, RecipeError> {
    ensure_same_model(
        model,
        "Instance and Defining feature",
        &[instance, defining_feature],
    )?;
    ensure_kind(model, instance, kinds::INSTANCE_SPECIFICATION)?;
    ensure_kind(model, defining_feature, kinds::STRUCTURAL_FEATURE)?;

    let slot = model.create(kinds::SLOT)?;
    model.set(slot, rel::DEFINING_FEATURE, Some(defining_feature))?;
    model.add(instance, rel::SLOT, slot)?;
    Ok(slot)
}

/// The value specification held by `slot`.
pub fn slot_value(model: &Model, slot: ElementId) -> Result<Option<ElementId>, RecipeError> {
    Ok(model.get(slot, rel::VALUE)?)
}

/// The value of `slot` when it holds a string literal.
pub fn slot_value_as_string(model: &Model, slot: ElementId) -> Result<Option<String>, RecipeError> {
    let Some(value) = slot_value(model, slot)? else {
        return Ok(None);
    };
    if !model.is_a(value, kinds::LITERAL_STRING) {
        return Ok(None);
    }
    Ok(model
        .attribute(value, attr::VALUE)?
        .map(|value| value.to_string()))
}

/// Replaces the value of `slot` with a string literal holding `value`.
pub fn set_slot_value(model: &mut Model, slot: ElementId, value: &str) -> Result<(), RecipeError> {
    ensure_kind(model, slot, kinds::SLOT)?;
    if let Some(previous) = slot_value(model, slot)? {
        model.unlink(previous)?;
    }
    let literal = model.create(kinds::LITERAL_STRING)?;
    model.set_attribute(literal, attr::VALUE, Some(value.into()))?;
    model.set(slot, rel::VALUE, Some(literal))?;
    debug!(slot:% = slot, value = value; "Slot value set");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{recipes::literal::create_value_specification_for_type_and_value, registry};

    fn instance_with_feature(model: &mut Model) -> (ElementId, ElementId) {
        let instance = model.create(kinds::INSTANCE_SPECIFICATION).unwrap();
        let feature = model.create(kinds::PROPERTY).unwrap();
        (instance, feature)
    }

    #[test]
    fn test_add_slot() {
        let mut model = registry::new_model();
        let (instance, feature) = instance_with_feature(&mut model);

        let slot = add_slot(&mut model, instance, feature).unwrap();

        assert_eq!(model.related(instance, rel::SLOT).unwrap(), vec![slot]);
        assert_eq!(model.get(slot, rel::OWNING_INSTANCE).unwrap(), Some(instance));
        assert_eq!(model.get(slot, rel::DEFINING_FEATURE).unwrap(), Some(feature));
        assert_eq!(slot_value_as_string(&model, slot).unwrap(), None);
    }

    #[test]
    fn test_set_slot_value_replaces_literal() {
        let mut model = registry::new_model();
        let (instance, feature) = instance_with_feature(&mut model);
        let slot = add_slot(&mut model, instance, feature).unwrap();

        set_slot_value(&mut model, slot, "first").unwrap();
        let first = slot_value(&model, slot).unwrap().unwrap();
        set_slot_value(&mut model, slot, "second").unwrap();

        assert!(!model.contains(first));
        assert_eq!(
            slot_value_as_string(&model, slot).unwrap().as_deref(),
            Some("second")
        );
        assert_eq!(model.elements_of(kinds::LITERAL_STRING).count(), 1);
    }

    #[test]
    fn test_non_string_value_reads_as_none() {
        let mut model = registry::new_model();
        let (instance, feature) = instance_with_feature(&mut model);
        let slot = add_slot(&mut model, instance, feature).unwrap();
        let literal =
            create_value_specification_for_type_and_value(&mut model, Some("int"), Some("3"))
                .unwrap()
                .unwrap();
        model.set(slot, rel::VALUE, Some(literal)).unwrap();

        assert_eq!(slot_value(&model, slot).unwrap(), Some(literal));
        assert_eq!(slot_value_as_string(&model, slot).unwrap(), None);
    }

    #[test]
    fn test_removing_instance_discards_slots() {
        let mut model = registry::new_model();
        let (instance, feature) = instance_with_feature(&mut model);
        let slot = add_slot(&mut model, instance, feature).unwrap();
        set_slot_value(&mut model, slot, "value").unwrap();

        model.unlink(instance).unwrap();

        assert!(!model.contains(slot));
        assert_eq!(model.elements_of(kinds::LITERAL_STRING).count(), 0);
        assert!(model.contains(feature));
    }
}
