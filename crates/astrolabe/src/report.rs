//! Plain text model reports.
//!
//! Elements without an owner are listed in creation order, each followed by
//! its owned elements indented below it:
//!
//! ```text
//! Package Shop
//!   Class Order «entity»
//!     Property lines : OrderLine [0..*] {navigable}
//! Association
//!   Property : Order {unknown}
//! Dependency Order -> Catalog
//! ```

use std::fmt::Write;

use log::debug;

use astrolabe_core::{
    model::{ElementId, Model},
    uml::{kinds, relations as rel},
};

use crate::{
    config::ReportConfig,
    error::AstrolabeError,
    recipes::{literal, navigability, slot, stereotype},
};

const INDENT: &str = "  ";

/// Renders `model` as an indented outline.
///
/// # Errors
///
/// Returns [`AstrolabeError::Recipe`] if a recipe query fails, which only
/// happens for a model violating its own metamodel.
pub fn render(model: &Model, config: &ReportConfig) -> Result<String, AstrolabeError> {
    let mut out = String::new();
    let roots: Vec<ElementId> = model
        .elements()
        .filter(|element| matches!(model.get(*element, rel::OWNER), Ok(None)))
        .filter(|element| !is_stereotype_application(model, *element))
        .collect();
    for root in &roots {
        render_element(model, config, *root, 0, &mut out)?;
    }
    debug!(roots = roots.len(), elements = model.len(); "Report rendered");
    Ok(out)
}

fn render_element(
    model: &Model,
    config: &ReportConfig,
    element: ElementId,
    depth: usize,
    out: &mut String,
) -> Result<(), AstrolabeError> {
    let kind = model.kind(element)?;
    let mut line = format!("{}{}", INDENT.repeat(depth), kind.name());
    if let Some(name) = model.name(element).filter(|name| !name.is_empty()) {
        line.push(' ');
        line.push_str(&name);
    }
    if config.show_ids() {
        let _ = write!(line, " ({element})");
    }

    if model.is_a(element, kinds::TYPED_ELEMENT) {
        if let Some(ty) = model.get(element, rel::TYPE)? {
            let _ = write!(line, " : {}", display_name(model, ty));
        }
    }
    if config.show_multiplicity() && model.is_a(element, kinds::MULTIPLICITY_ELEMENT) {
        let lower = literal::lower_value_as_string(model, element)?;
        let upper = literal::upper_value_as_string(model, element)?;
        if lower.is_some() || upper.is_some() {
            let _ = write!(
                line,
                " [{}..{}]",
                lower.as_deref().unwrap_or("1"),
                upper.as_deref().unwrap_or("1")
            );
        }
    }
    if model.is_a(element, kinds::PROPERTY) {
        if let Some(default) = literal::default_value_as_string(model, element)? {
            let _ = write!(line, " = {default}");
        }
        if config.show_navigability() && model.get(element, rel::ASSOCIATION)?.is_some() {
            let _ = write!(line, " {{{}}}", navigability::navigability(model, element)?);
        }
    }
    if model.is_a(element, kinds::SLOT) {
        if let Some(feature) = model.get(element, rel::DEFINING_FEATURE)? {
            let _ = write!(line, " {}", display_name(model, feature));
        }
        if let Some(value) = slot::slot_value_as_string(model, element)? {
            let _ = write!(line, " = {value:?}");
        }
    }
    if model.is_a(element, kinds::DEPENDENCY) {
        let client = model.get(element, rel::CLIENT)?;
        let supplier = model.get(element, rel::SUPPLIER)?;
        if let (Some(client), Some(supplier)) = (client, supplier) {
            let _ = write!(
                line,
                " {} -> {}",
                display_name(model, client),
                display_name(model, supplier)
            );
        }
    }

    let stereotypes = stereotype::stereotypes_str(model, Some(element), &[]);
    if !stereotypes.is_empty() {
        line.push(' ');
        line.push_str(&stereotypes);
    }
    out.push_str(&line);
    out.push('\n');

    for owned in model.related(element, rel::OWNED_ELEMENT)? {
        // Stereotype applications and values are part of the owner's line.
        if is_stereotype_application(model, owned)
            || model.is_a(owned, kinds::VALUE_SPECIFICATION)
        {
            continue;
        }
        render_element(model, config, owned, depth + 1, out)?;
    }
    Ok(())
}

fn is_stereotype_application(model: &Model, element: ElementId) -> bool {
    model.is_a(element, kinds::INSTANCE_SPECIFICATION)
        && model
            .related(element, rel::EXTENDED)
            .is_ok_and(|extended| !extended.is_empty())
}

fn display_name(model: &Model, element: ElementId) -> String {
    model
        .name(element)
        .filter(|name| !name.is_empty())
        .unwrap_or_else(|| element.to_string())
}
