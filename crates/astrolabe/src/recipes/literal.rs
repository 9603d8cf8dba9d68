//! Literal value specifications.
//!
//! Properties and parameters carry their default value, and every
//! multiplicity element its lower and upper bound, as a separate literal
//! element. Each of these slots holds at most one literal: setting a new
//! value discards the previous literal first.
//!
//! Lower bounds are always `LiteralInteger`s and upper bounds always
//! `LiteralUnlimitedNatural`s. Default values take whatever literal kind
//! matches the owner's declared type.

use std::fmt;

use log::debug;

use astrolabe_core::{
    model::{ElementId, Model},
    uml::{attributes as attr, kinds, relations as rel},
    value::{AttributeValue, UnlimitedNatural},
};

use crate::error::RecipeError;

/// A place holding at most one literal value specification.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueSlot {
    /// `defaultValue` of a property or parameter.
    Default,
    /// `lowerValue` of a multiplicity element.
    Lower,
    /// `upperValue` of a multiplicity element.
    Upper,
}

impl ValueSlot {
    /// Relation linking the owner to its literal.
    pub fn relation(&self) -> &'static str {
        match self {
            Self::Default => rel::DEFAULT_VALUE,
            Self::Lower => rel::LOWER_VALUE,
            Self::Upper => rel::UPPER_VALUE,
        }
    }
}

impl fmt::Display for ValueSlot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.relation())
    }
}

/// The literal currently held by `slot` of `owner`.
pub fn value(
    model: &Model,
    owner: ElementId,
    slot: ValueSlot,
) -> Result<Option<ElementId>, RecipeError> {
    Ok(model.get(owner, slot.relation())?)
}

/// Renders a literal value specification.
///
/// Booleans become `true`/`false`, integers and finite unlimited naturals
/// their decimal form, the unbounded natural `*` and strings their raw
/// value. Any other value specification, and no value at all, yield `None`.
pub fn literal_value_as_string(
    model: &Model,
    value: Option<ElementId>,
) -> Result<Option<String>, RecipeError> {
    let Some(value) = value else {
        return Ok(None);
    };
    let is_literal = [
        kinds::LITERAL_UNLIMITED_NATURAL,
        kinds::LITERAL_INTEGER,
        kinds::LITERAL_STRING,
        kinds::LITERAL_BOOLEAN,
    ]
    .into_iter()
    .any(|kind| model.is_a(value, kind));
    if !is_literal {
        model.kind(value)?;
        return Ok(None);
    }
    Ok(model
        .attribute(value, attr::VALUE)?
        .map(|value| value.to_string()))
}

/// Parsed value of a literal.
#[derive(Debug, Clone, PartialEq)]
enum LiteralValue {
    Boolean(bool),
    Integer(i64),
    String(String),
    UnlimitedNatural(UnlimitedNatural),
}

impl LiteralValue {
    fn kind(&self) -> &'static str {
        match self {
            Self::Boolean(_) => kinds::LITERAL_BOOLEAN,
            Self::Integer(_) => kinds::LITERAL_INTEGER,
            Self::String(_) => kinds::LITERAL_STRING,
            Self::UnlimitedNatural(_) => kinds::LITERAL_UNLIMITED_NATURAL,
        }
    }

    fn into_attribute(self) -> AttributeValue {
        match self {
            Self::Boolean(value) => value.into(),
            Self::Integer(value) => value.into(),
            Self::String(value) => value.into(),
            Self::UnlimitedNatural(value) => value.into(),
        }
    }
}

/// A literal ready to be materialized, together with the name of its
/// element.
#[derive(Debug, Clone, PartialEq)]
struct Literal {
    value: LiteralValue,
    name: String,
}

impl Literal {
    /// A literal named after the decimal form of its value.
    fn from_value(value: LiteralValue) -> Self {
        let name = match &value {
            LiteralValue::Boolean(value) => value.to_string(),
            LiteralValue::Integer(value) => value.to_string(),
            LiteralValue::String(value) => value.replace('"', ""),
            LiteralValue::UnlimitedNatural(value) => value.to_string(),
        };
        Self { value, name }
    }

    /// A literal named after the text it was parsed from. Booleans are
    /// named `true`/`false`, the unbounded natural `*`, and string literals
    /// drop their quote characters.
    fn from_text(value: LiteralValue, text: &str) -> Self {
        let keeps_text = matches!(
            value,
            LiteralValue::Integer(_) | LiteralValue::UnlimitedNatural(UnlimitedNatural::Finite(_))
        );
        if !keeps_text {
            return Self::from_value(value);
        }
        Self {
            value,
            name: text.to_string(),
        }
    }

    /// Parses `value` as the UML type named `ty`, inferring the type from
    /// the text when it is absent. Unknown type names yield `None`.
    fn parse(ty: Option<&str>, value: &str) -> Result<Option<Self>, RecipeError> {
        let ty = ty.unwrap_or_else(|| infer_type(value));
        let parsed = match ty {
            "bool" | "Boolean" => LiteralValue::Boolean(value == "true"),
            "str" | "String" => LiteralValue::String(value.to_string()),
            "int" | "Integer" => LiteralValue::Integer(parse_integer(value)?),
            "UnlimitedNatural" => LiteralValue::UnlimitedNatural(parse_unlimited_natural(value)?),
            _ => return Ok(None),
        };
        Ok(Some(Self::from_text(parsed, value)))
    }

    fn create(self, model: &mut Model) -> Result<ElementId, RecipeError> {
        let element = model.create(self.value.kind())?;
        model.set_name(element, &self.name)?;
        model.set_attribute(element, attr::VALUE, Some(self.value.into_attribute()))?;
        Ok(element)
    }
}

/// Digits that fit an `Integer` are inferred as one; longer digit runs stay
/// strings so their text is kept.
fn infer_type(value: &str) -> &'static str {
    if value == "true" || value == "false" {
        "bool"
    } else if !value.is_empty()
        && value.chars().all(char::is_numeric)
        && value.parse::<i64>().is_ok()
    {
        "int"
    } else {
        "str"
    }
}

fn parse_integer(value: &str) -> Result<i64, RecipeError> {
    value
        .trim()
        .parse()
        .map_err(|_| RecipeError::InvalidLiteral {
            ty: "Integer",
            value: value.to_string(),
        })
}

fn parse_unlimited_natural(value: &str) -> Result<UnlimitedNatural, RecipeError> {
    value.parse().map_err(|_| RecipeError::InvalidLiteral {
        ty: "UnlimitedNatural",
        value: value.to_string(),
    })
}

/// Creates a detached literal for `value`.
///
/// Without a `ty`, `true`/`false` become booleans, all-digit text fitting
/// an `i64` an integer and anything else a string. Recognized type names are
/// `bool`/`Boolean`, `str`/`String`, `int`/`Integer` and
/// `UnlimitedNatural`; other names and a missing value yield `None`.
///
/// # Errors
///
/// [`RecipeError::InvalidLiteral`] if the text does not parse as the
/// requested type. Nothing is created in that case.
pub fn create_value_specification_for_type_and_value(
    model: &mut Model,
    ty: Option<&str>,
    value: Option<&str>,
) -> Result<Option<ElementId>, RecipeError> {
    let Some(value) = value else {
        return Ok(None);
    };
    match Literal::parse(ty, value)? {
        Some(literal) => literal.create(model).map(Some),
        None => Ok(None),
    }
}

/// Unlinks the literal in `slot`, then attaches `literal` if given.
fn replace_literal(
    model: &mut Model,
    owner: ElementId,
    slot: ValueSlot,
    literal: Option<Literal>,
) -> Result<(), RecipeError> {
    if let Some(previous) = model.get(owner, slot.relation())? {
        model.unlink(previous)?;
    }
    if let Some(literal) = literal {
        let element = literal.create(model)?;
        model.set(owner, slot.relation(), Some(element))?;
        debug!(owner:% = owner, slot:% = slot, literal:% = element; "Literal attached");
    }
    Ok(())
}

/// The default value specification of a property or parameter.
pub fn default_value(model: &Model, owner: ElementId) -> Result<Option<ElementId>, RecipeError> {
    value(model, owner, ValueSlot::Default)
}

pub fn default_value_as_string(
    model: &Model,
    owner: ElementId,
) -> Result<Option<String>, RecipeError> {
    literal_value_as_string(model, default_value(model, owner)?)
}

/// Replaces the default value with an existing value specification.
pub fn set_default_value(
    model: &mut Model,
    owner: ElementId,
    value: Option<ElementId>,
) -> Result<(), RecipeError> {
    let operands: Vec<ElementId> = std::iter::once(owner).chain(value).collect();
    super::ensure_same_model(model, "Owner and value", &operands)?;
    if let Some(value) = value {
        super::ensure_kind(model, value, kinds::VALUE_SPECIFICATION)?;
    }
    if let Some(previous) = model.get(owner, rel::DEFAULT_VALUE)? {
        if Some(previous) == value {
            return Ok(());
        }
        model.unlink(previous)?;
    }
    model.set(owner, rel::DEFAULT_VALUE, value)?;
    Ok(())
}

/// Replaces the default value with a literal parsed according to the
/// owner's `typeValue`.
pub fn set_default_value_from_string(
    model: &mut Model,
    owner: ElementId,
    value: Option<&str>,
) -> Result<(), RecipeError> {
    let ty = model
        .attribute(owner, attr::TYPE_VALUE)?
        .and_then(|ty| ty.as_str().map(str::to_string));
    let literal = match value {
        Some(value) => Literal::parse(ty.as_deref(), value)?,
        None => None,
    };
    replace_literal(model, owner, ValueSlot::Default, literal)
}

/// The lower bound, if held by a `LiteralInteger`.
pub fn lower_value(model: &Model, owner: ElementId) -> Result<Option<i64>, RecipeError> {
    let Some(lower) = value(model, owner, ValueSlot::Lower)? else {
        return Ok(None);
    };
    if !model.is_a(lower, kinds::LITERAL_INTEGER) {
        return Ok(None);
    }
    Ok(model
        .attribute(lower, attr::VALUE)?
        .and_then(|value| value.as_integer()))
}

pub fn lower_value_as_string(
    model: &Model,
    owner: ElementId,
) -> Result<Option<String>, RecipeError> {
    Ok(lower_value(model, owner)?.map(|value| value.to_string()))
}

pub fn set_lower_value(
    model: &mut Model,
    owner: ElementId,
    value: Option<i64>,
) -> Result<(), RecipeError> {
    let literal = value.map(|value| Literal::from_value(LiteralValue::Integer(value)));
    replace_literal(model, owner, ValueSlot::Lower, literal)
}

pub fn set_lower_value_from_string(
    model: &mut Model,
    owner: ElementId,
    value: Option<&str>,
) -> Result<(), RecipeError> {
    let literal = value
        .map(|text| {
            parse_integer(text).map(|value| Literal::from_text(LiteralValue::Integer(value), text))
        })
        .transpose()?;
    replace_literal(model, owner, ValueSlot::Lower, literal)
}

/// The upper bound, if held by a `LiteralUnlimitedNatural`.
pub fn upper_value(
    model: &Model,
    owner: ElementId,
) -> Result<Option<UnlimitedNatural>, RecipeError> {
    let Some(upper) = value(model, owner, ValueSlot::Upper)? else {
        return Ok(None);
    };
    if !model.is_a(upper, kinds::LITERAL_UNLIMITED_NATURAL) {
        return Ok(None);
    }
    Ok(model
        .attribute(upper, attr::VALUE)?
        .and_then(|value| value.as_unlimited_natural()))
}

/// The upper bound as text; `*` when unbounded.
pub fn upper_value_as_string(
    model: &Model,
    owner: ElementId,
) -> Result<Option<String>, RecipeError> {
    Ok(upper_value(model, owner)?.map(|value| value.to_string()))
}

pub fn set_upper_value(
    model: &mut Model,
    owner: ElementId,
    value: Option<UnlimitedNatural>,
) -> Result<(), RecipeError> {
    let literal = value.map(|value| Literal::from_value(LiteralValue::UnlimitedNatural(value)));
    replace_literal(model, owner, ValueSlot::Upper, literal)
}

pub fn set_upper_value_from_string(
    model: &mut Model,
    owner: ElementId,
    value: Option<&str>,
) -> Result<(), RecipeError> {
    let literal = value
        .map(|text| {
            parse_unlimited_natural(text)
                .map(|value| Literal::from_text(LiteralValue::UnlimitedNatural(value), text))
        })
        .transpose()?;
    replace_literal(model, owner, ValueSlot::Upper, literal)
}


#[cfg(test)]
mod proptest_tests {
    use proptest::prelude::*;

    use super::*;
    use crate::registry;

    fn check_lower_round_trip(lower: u32) -> Result<(), TestCaseError> {
        let mut model = registry::new_model();
        let property = model
            .create(kinds::PROPERTY)
            .map_err(|err| TestCaseError::fail(format!("{err}")))?;
        let text = lower.to_string();

        set_lower_value_from_string(&mut model, property, Some(&text))
            .map_err(|err| TestCaseError::fail(format!("{err}")))?;
        let read = lower_value_as_string(&model, property)
            .map_err(|err| TestCaseError::fail(format!("{err}")))?;

        prop_assert_eq!(read, Some(text));
        Ok(())
    }

    fn check_inferred_default_round_trip(text: &str) -> Result<(), TestCaseError> {
        let mut model = registry::new_model();
        let property = model
            .create(kinds::PROPERTY)
            .map_err(|err| TestCaseError::fail(format!("{err}")))?;

        set_default_value_from_string(&mut model, property, Some(text))
            .map_err(|err| TestCaseError::fail(format!("{err}")))?;
        let read = default_value_as_string(&model, property)
            .map_err(|err| TestCaseError::fail(format!("{err}")))?;

        prop_assert_eq!(read.as_deref(), Some(text));
        Ok(())
    }

    proptest! {
        #[test]
        fn lower_round_trip(lower in any::<u32>()) {
            check_lower_round_trip(lower)?;
        }

        #[test]
        fn inferred_default_round_trip(
            text in "[a-zA-Z][a-zA-Z0-9 ]{0,12}|true|false|[1-9][0-9]{0,8}|[1-9][0-9]{19,24}"
        ) {
            check_inferred_default_round_trip(&text)?;
        }
    }
}
