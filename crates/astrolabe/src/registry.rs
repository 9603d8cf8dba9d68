//! The process-wide metamodel.
//!
//! The UML kinds and the enabled domain profiles are assembled once, before
//! the first model is created, and stay immutable for the rest of the
//! process. Every [`Model`] created through [`new_model`] borrows the
//! installed registry.

use std::sync::OnceLock;

use log::{info, warn};

use astrolabe_core::{MetamodelError, metamodel::Metamodel, model::Model, uml};

use crate::{
    c4model,
    config::{MetamodelConfig, Profile},
};

static METAMODEL: OnceLock<Metamodel> = OnceLock::new();

/// Builds a metamodel with the UML kinds and every profile enabled in
/// `config`, without installing it.
///
/// # Errors
///
/// Returns the [`MetamodelError`] reported by the builder.
pub fn build(config: &MetamodelConfig) -> Result<Metamodel, MetamodelError> {
    let mut builder = uml::builder();
    for profile in config.profiles() {
        match profile {
            Profile::C4 => c4model::register(&mut builder),
        }
    }
    builder.build()
}

/// Installs the process-wide metamodel.
///
/// Only the first installation takes effect; later calls log a warning and
/// return the registry already in place.
///
/// # Errors
///
/// Returns the [`MetamodelError`] reported by the builder.
pub fn install(config: &MetamodelConfig) -> Result<&'static Metamodel, MetamodelError> {
    if let Some(installed) = METAMODEL.get() {
        warn!(
            profiles:? = config.profiles();
            "Metamodel already installed, ignoring configuration"
        );
        return Ok(installed);
    }

    let metamodel = build(config)?;
    let installed = METAMODEL.get_or_init(|| metamodel);
    info!(
        kinds = installed.kinds().count(),
        profiles:? = config.profiles();
        "Metamodel installed"
    );
    Ok(installed)
}

/// The installed metamodel, installing the default profiles on first use.
pub fn metamodel() -> &'static Metamodel {
    METAMODEL.get_or_init(|| {
        build(&MetamodelConfig::default()).expect("Built-in metamodel declarations are consistent")
    })
}

/// Creates an empty model over the installed metamodel.
pub fn new_model() -> Model {
    Model::new(metamodel())
}
