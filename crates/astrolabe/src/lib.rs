//! Astrolabe - UML model recipes over a registry-driven element graph.
//!
//! The recipes create and query the richer UML structures (associations,
//! extensions, stereotype applications, slots, literal values) while keeping
//! the model well formed. Domain profiles such as the C4 model are
//! registered into the process-wide metamodel before the first model is
//! created.

pub mod c4model;
pub mod config;
pub mod recipes;
pub mod registry;
pub mod report;
pub mod script;

mod error;

pub use astrolabe_core::{identifier, metamodel, model, uml, value};

pub use error::{AstrolabeError, RecipeError};

use log::{debug, info, trace};

use config::AppConfig;
use model::Model;
use script::Script;

/// Entry point for replaying edit scripts and reporting models.
///
/// # Examples
///
/// ```rust,no_run
/// use astrolabe::{Workbench, config::AppConfig};
///
/// let source = r#"
/// [[step]]
/// op = "create"
/// id = "order"
/// kind = "Class"
/// name = "Order"
/// "#;
///
/// let workbench = Workbench::new(AppConfig::default());
/// let model = workbench.run(source).expect("Failed to replay");
/// let report = workbench.report(&model).expect("Failed to report");
/// assert_eq!(report, "Class Order\n");
/// ```
#[derive(Debug, Default)]
pub struct Workbench {
    config: AppConfig,
}

impl Workbench {
    /// Create a new workbench with the given configuration.
    ///
    /// # Arguments
    ///
    /// * `config` - Application configuration including profiles and report options
    pub fn new(config: AppConfig) -> Self {
        Self { config }
    }

    /// Parse an edit script.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Script` for malformed scripts.
    pub fn parse(&self, source: &str) -> Result<Script, AstrolabeError> {
        Script::parse(source).map_err(|err| AstrolabeError::new_script_error(err, source))
    }

    /// Create an empty model over the metamodel selected by the
    /// configuration.
    ///
    /// The first call in a process installs the metamodel; later calls reuse
    /// it.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Metamodel` if the profiles do not combine.
    pub fn new_model(&self) -> Result<Model, AstrolabeError> {
        let metamodel = registry::install(self.config.metamodel())?;
        Ok(Model::new(metamodel))
    }

    /// Parse `source` and replay it on a fresh model.
    ///
    /// # Errors
    ///
    /// Returns `AstrolabeError::Script` for malformed scripts and for the
    /// first step that fails.
    pub fn run(&self, source: &str) -> Result<Model, AstrolabeError> {
        info!("Replaying script");
        let script = self.parse(source)?;
        let mut model = self.new_model()?;
        let bindings = script
            .apply(&mut model)
            .map_err(|err| AstrolabeError::new_script_error(err, source))?;
        debug!(bound = bindings.len(), elements = model.len(); "Model ready");
        trace!(model:?; "Replayed model");
        Ok(model)
    }

    /// Render `model` as a plain text outline.
    ///
    /// # Errors
    ///
    /// Returns an error if a model query fails.
    pub fn report(&self, model: &Model) -> Result<String, AstrolabeError> {
        report::render(model, self.config.report())
    }
}
