//! Declarative assembly of a [`Metamodel`].

use std::collections::{HashMap, VecDeque};

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};

use super::{
    AttributeDefinition, Kind, KindDefinition, Metamodel, RelationDefinition, RelationKey,
    RelationSpec,
};
use crate::{error::MetamodelError, identifier::Id};

#[derive(Debug)]
struct PendingKind {
    bases: Vec<Kind>,
    is_abstract: bool,
}

#[derive(Debug)]
struct PendingSubset {
    union_kind: Kind,
    union: Id,
    subset_kind: Kind,
    subset: Id,
}

/// Collects kind, attribute and relation declarations and validates them as
/// a whole in [`build`](Self::build).
///
/// Declarations may arrive in any order: a relation may be declared before
/// its target kind. Errors are reported by `build`, not by the individual
/// declaration methods.
///
/// # Examples
///
/// ```
/// use astrolabe_core::{
///     metamodel::{AttributeDefinition, Metamodel, RelationSpec},
///     value::AttributeType,
/// };
///
/// let mut builder = Metamodel::builder();
/// builder
///     .abstract_kind("Element", &[])
///     .kind("Package", &["Element"])
///     .attribute("Package", AttributeDefinition::new("name", AttributeType::String))
///     .relation(
///         "Package",
///         RelationSpec::many("nested", "Package").composite().opposite("parent"),
///     )
///     .relation("Package", RelationSpec::one("parent", "Package").opposite("nested"));
///
/// let metamodel = builder.build().expect("valid metamodel");
/// assert!(metamodel.is_a("Package".into(), "Element"));
/// ```
#[derive(Debug, Default)]
pub struct MetamodelBuilder {
    kinds: IndexMap<Kind, PendingKind>,
    attributes: Vec<(Kind, AttributeDefinition)>,
    relations: Vec<(Kind, RelationSpec)>,
    subsets: Vec<PendingSubset>,
    errors: Vec<MetamodelError>,
}

impl MetamodelBuilder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares a concrete kind generalizing `bases`.
    pub fn kind(&mut self, name: &str, bases: &[&str]) -> &mut Self {
        self.declare(name, bases, false)
    }

    /// Declares a kind that cannot be instantiated.
    pub fn abstract_kind(&mut self, name: &str, bases: &[&str]) -> &mut Self {
        self.declare(name, bases, true)
    }

    fn declare(&mut self, name: &str, bases: &[&str], is_abstract: bool) -> &mut Self {
        let kind = Kind::new(name);
        if self.kinds.contains_key(&kind) {
            self.errors.push(MetamodelError::DuplicateKind(kind));
            return self;
        }
        let bases = bases.iter().map(|base| Kind::new(base)).collect();
        self.kinds.insert(kind, PendingKind { bases, is_abstract });
        self
    }

    /// Whether `name` has been declared.
    pub fn contains(&self, name: &str) -> bool {
        self.kinds.contains_key(&Kind::new(name))
    }

    /// Adds a scalar attribute to `kind`. Redeclaring an inherited attribute
    /// on a specialization overrides its default.
    pub fn attribute(&mut self, kind: &str, attribute: AttributeDefinition) -> &mut Self {
        self.attributes.push((Kind::new(kind), attribute));
        self
    }

    /// Adds a relation to `kind`.
    pub fn relation(&mut self, kind: &str, spec: RelationSpec) -> &mut Self {
        self.relations.push((Kind::new(kind), spec));
        self
    }

    /// Registers `subset_kind.subset` as part of the derived union
    /// `union_kind.union`.
    ///
    /// This is how a profile hooks its own ownership relations into the
    /// generic `owner`/`namespace` unions after the fact.
    pub fn add_subset(
        &mut self,
        union_kind: &str,
        union: &str,
        subset_kind: &str,
        subset: &str,
    ) -> &mut Self {
        self.subsets.push(PendingSubset {
            union_kind: Kind::new(union_kind),
            union: Id::new(union),
            subset_kind: Kind::new(subset_kind),
            subset: Id::new(subset),
        });
        self
    }

    /// Validates every declaration and produces the immutable registry.
    ///
    /// # Errors
    ///
    /// Returns the first [`MetamodelError`] found: duplicate or unknown
    /// kinds, cyclic generalizations, unknown relation targets, opposites
    /// that do not resolve or do not point back, and subsets registered on
    /// plain relations.
    pub fn build(self) -> Result<Metamodel, MetamodelError> {
        let Self {
            kinds: pending_kinds,
            attributes,
            relations: relation_specs,
            subsets,
            errors,
        } = self;

        if let Some(err) = errors.into_iter().next() {
            return Err(err);
        }

        for (kind, pending) in &pending_kinds {
            if let Some(base) = pending
                .bases
                .iter()
                .find(|base| !pending_kinds.contains_key(*base))
            {
                return Err(MetamodelError::UnknownBase {
                    kind: *kind,
                    base: *base,
                });
            }
        }

        let mut kinds = IndexMap::with_capacity(pending_kinds.len());
        for (kind, pending) in &pending_kinds {
            let ancestors = ancestor_closure(*kind, &pending_kinds)?;
            kinds.insert(
                *kind,
                KindDefinition {
                    kind: *kind,
                    bases: pending.bases.clone(),
                    is_abstract: pending.is_abstract,
                    attributes: IndexMap::new(),
                    relations: IndexMap::new(),
                    ancestors,
                },
            );
        }

        for (kind, attribute) in attributes {
            let definition = kinds
                .get_mut(&kind)
                .ok_or(MetamodelError::UnknownKind(kind))?;
            definition.attributes.insert(attribute.name(), attribute);
        }

        let mut short_names = HashMap::new();
        for kind in kinds.keys() {
            short_names.entry(kind.name()).or_insert(*kind);
        }

        let mut metamodel = Metamodel {
            kinds,
            relations: Vec::with_capacity(relation_specs.len()),
            short_names,
        };

        let mut opposite_names = Vec::with_capacity(relation_specs.len());
        for (owner, spec) in relation_specs {
            if !metamodel.contains(spec.target) {
                return Err(MetamodelError::UnknownTarget {
                    kind: owner,
                    relation: spec.name,
                    target: spec.target,
                });
            }
            let key = RelationKey(metamodel.relations.len());
            let definition = metamodel
                .kinds
                .get_mut(&owner)
                .ok_or(MetamodelError::UnknownKind(owner))?;
            if definition.relations.insert(spec.name, key).is_some() {
                return Err(MetamodelError::DuplicateRelation {
                    kind: owner,
                    relation: spec.name,
                });
            }
            metamodel.relations.push(RelationDefinition {
                key,
                owner,
                name: spec.name,
                target: spec.target,
                upper: spec.upper,
                composite: spec.composite,
                opposite: None,
                derived: spec.derived,
                subsets: Vec::new(),
            });
            opposite_names.push(spec.opposite);
        }

        resolve_opposites(&mut metamodel, &opposite_names)?;

        for pending in subsets {
            let union = metamodel
                .relation(pending.union_kind, pending.union)
                .ok_or(MetamodelError::UnknownRelation {
                    kind: pending.union_kind,
                    relation: pending.union,
                })?;
            if !union.is_derived() {
                return Err(MetamodelError::NotDerived {
                    kind: pending.union_kind,
                    relation: pending.union,
                });
            }
            let union_key = union.key();
            let subset_key = metamodel
                .relation(pending.subset_kind, pending.subset)
                .ok_or(MetamodelError::UnknownRelation {
                    kind: pending.subset_kind,
                    relation: pending.subset,
                })?
                .key();
            let union = &mut metamodel.relations[union_key.0];
            if !union.subsets.contains(&subset_key) {
                trace!(
                    derived_union:% = union.name,
                    subset:% = pending.subset;
                    "Registered subset"
                );
                union.subsets.push(subset_key);
            }
        }

        debug!(
            kinds = metamodel.kinds.len(),
            relations = metamodel.relations.len();
            "Metamodel built"
        );

        Ok(metamodel)
    }
}

/// Breadth-first ancestor closure, the kind itself first.
fn ancestor_closure(
    kind: Kind,
    pending: &IndexMap<Kind, PendingKind>,
) -> Result<IndexSet<Kind>, MetamodelError> {
    let mut ancestors = IndexSet::new();
    let mut queue = VecDeque::from([kind]);
    while let Some(current) = queue.pop_front() {
        if !ancestors.insert(current) {
            continue;
        }
        for base in &pending[&current].bases {
            if *base == kind {
                return Err(MetamodelError::CyclicGeneralization(kind));
            }
            queue.push_back(*base);
        }
    }
    Ok(ancestors)
}

fn resolve_opposites(
    metamodel: &mut Metamodel,
    opposite_names: &[Option<Id>],
) -> Result<(), MetamodelError> {
    let mut resolved = Vec::with_capacity(opposite_names.len());
    for (index, opposite) in opposite_names.iter().enumerate() {
        let relation = &metamodel.relations[index];
        let Some(opposite) = opposite else {
            resolved.push(None);
            continue;
        };
        let opposite_definition = metamodel.relation(relation.target, *opposite).ok_or(
            MetamodelError::UnresolvedOpposite {
                kind: relation.owner,
                relation: relation.name,
                target: relation.target,
                opposite: *opposite,
            },
        )?;
        if !metamodel.is_a(relation.owner, opposite_definition.target) {
            return Err(MetamodelError::MismatchedOpposite {
                kind: relation.owner,
                relation: relation.name,
                opposite: *opposite,
            });
        }
        resolved.push(Some(opposite_definition.key));
    }

    for (index, opposite) in resolved.iter().enumerate() {
        let Some(opposite) = opposite else {
            continue;
        };
        if resolved[opposite.0] != Some(RelationKey(index)) {
            let relation = &metamodel.relations[index];
            return Err(MetamodelError::MismatchedOpposite {
                kind: relation.owner,
                relation: relation.name,
                opposite: metamodel.relations[opposite.0].name,
            });
        }
    }

    for (relation, opposite) in metamodel.relations.iter_mut().zip(resolved) {
        relation.opposite = opposite;
    }
    Ok(())
}
