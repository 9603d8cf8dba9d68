//! Configuration types for Astrolabe.
//!
//! This module provides configuration structures that control which domain
//! profiles extend the UML metamodel and how models are reported. All types
//! implement [`serde::Deserialize`] for loading from external sources.
//!
//! # Overview
//!
//! - [`AppConfig`] - Top-level application configuration.
//! - [`MetamodelConfig`] - Selects the [`Profile`]s registered next to UML.
//! - [`ReportConfig`] - Controls what a model report shows.
//!
//! # Example
//!
//! ```
//! # use astrolabe::config::{AppConfig, Profile};
//! // Use default configuration
//! let config = AppConfig::default();
//! assert_eq!(config.metamodel().profiles(), &[Profile::C4]);
//! assert!(config.report().show_navigability());
//! ```

use std::fmt;

use serde::Deserialize;

/// Top-level application configuration combining metamodel and report
/// settings.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct AppConfig {
    /// Metamodel configuration section.
    #[serde(default)]
    metamodel: MetamodelConfig,

    /// Report configuration section.
    #[serde(default)]
    report: ReportConfig,
}

impl AppConfig {
    /// Creates a new [`AppConfig`] with the specified sections.
    ///
    /// # Arguments
    ///
    /// * `metamodel` - Profiles registered into the metamodel.
    /// * `report` - Report options.
    pub fn new(metamodel: MetamodelConfig, report: ReportConfig) -> Self {
        Self { metamodel, report }
    }

    /// Returns the metamodel configuration.
    pub fn metamodel(&self) -> &MetamodelConfig {
        &self.metamodel
    }

    /// Returns the report configuration.
    pub fn report(&self) -> &ReportConfig {
        &self.report
    }
}

/// A domain profile that can extend the UML metamodel.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Profile {
    /// The C4 architecture model: persons, containers, databases.
    C4,
}

impl fmt::Display for Profile {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::C4 => f.write_str("c4"),
        }
    }
}

/// Selects the profiles registered next to the built-in UML kinds.
#[derive(Debug, Clone, Deserialize)]
pub struct MetamodelConfig {
    #[serde(default = "default_profiles")]
    profiles: Vec<Profile>,
}

fn default_profiles() -> Vec<Profile> {
    vec![Profile::C4]
}

impl Default for MetamodelConfig {
    fn default() -> Self {
        Self {
            profiles: default_profiles(),
        }
    }
}

impl MetamodelConfig {
    /// Creates a [`MetamodelConfig`] enabling exactly `profiles`.
    pub fn new(profiles: Vec<Profile>) -> Self {
        Self { profiles }
    }

    /// Returns the enabled profiles in registration order.
    pub fn profiles(&self) -> &[Profile] {
        &self.profiles
    }
}

/// Options for model reports.
#[derive(Debug, Clone, Deserialize)]
pub struct ReportConfig {
    /// Print element handles next to names.
    #[serde(default)]
    show_ids: bool,

    /// Print the navigability of association ends.
    #[serde(default = "enabled")]
    show_navigability: bool,

    /// Print `[lower..upper]` multiplicities.
    #[serde(default = "enabled")]
    show_multiplicity: bool,
}

fn enabled() -> bool {
    true
}

impl Default for ReportConfig {
    fn default() -> Self {
        Self {
            show_ids: false,
            show_navigability: true,
            show_multiplicity: true,
        }
    }
}

impl ReportConfig {
    pub fn new(show_ids: bool, show_navigability: bool, show_multiplicity: bool) -> Self {
        Self {
            show_ids,
            show_navigability,
            show_multiplicity,
        }
    }

    pub fn show_ids(&self) -> bool {
        self.show_ids
    }

    pub fn show_navigability(&self) -> bool {
        self.show_navigability
    }

    pub fn show_multiplicity(&self) -> bool {
        self.show_multiplicity
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_document_uses_defaults() {
        let config: AppConfig = toml::from_str("").expect("empty config parses");

        assert_eq!(config.metamodel().profiles(), &[Profile::C4]);
        assert!(!config.report().show_ids());
        assert!(config.report().show_multiplicity());
    }

    #[test]
    fn test_sections_override_defaults() {
        let config: AppConfig = toml::from_str(
            r#"
            [metamodel]
            profiles = []

            [report]
            show_ids = true
            show_navigability = false
            "#,
        )
        .expect("valid config");

        assert!(config.metamodel().profiles().is_empty());
        assert!(config.report().show_ids());
        assert!(!config.report().show_navigability());
        assert!(config.report().show_multiplicity());
    }

    #[test]
    fn test_unknown_profile_is_rejected() {
        let result: Result<AppConfig, _> = toml::from_str(
            r#"
            [metamodel]
            profiles = ["sysml"]
            "#,
        );
        assert!(result.is_err());
    }
}
