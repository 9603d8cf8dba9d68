//! Locating and reading the CLI configuration.
//!
//! The configuration is the first of these TOML files that exists:
//!
//! | source      | path                                        |
//! |-------------|---------------------------------------------|
//! | `--config`  | as given; it is an error when it is missing |
//! | workspace   | `astrolabe/config.toml` under the cwd       |
//! | user        | `config.toml` in the platform config dir    |
//!
//! Without any of them the built-in defaults apply.

use std::{
    fmt, fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use thiserror::Error;

use astrolabe::{AstrolabeError, config::AppConfig};

/// File name looked up in the workspace and user locations.
const CONFIG_FILE: &str = "config.toml";

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to parse TOML configuration: {0}")]
    Parse(String),

    #[error("Missing configuration file: {0}")]
    MissingFile(PathBuf),
}

impl From<ConfigError> for AstrolabeError {
    fn from(err: ConfigError) -> Self {
        AstrolabeError::Config(err.to_string())
    }
}

/// Where a configuration file was found.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ConfigSource {
    Explicit,
    Workspace,
    User,
}

impl fmt::Display for ConfigSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Explicit => "command line",
            Self::Workspace => "workspace",
            Self::User => "user config directory",
        })
    }
}

/// The implicit locations, in lookup order.
fn implicit_candidates() -> Vec<(ConfigSource, PathBuf)> {
    let mut candidates = vec![(
        ConfigSource::Workspace,
        Path::new("astrolabe").join(CONFIG_FILE),
    )];
    match ProjectDirs::from("com", "astrolabe", "astrolabe") {
        Some(dirs) => candidates.push((ConfigSource::User, dirs.config_dir().join(CONFIG_FILE))),
        None => debug!("No user config directory on this platform"),
    }
    candidates
}

/// Loads the configuration for this run.
///
/// An `explicit_path` must exist. Otherwise the workspace and user locations
/// are tried in turn, falling back to [`AppConfig::default`].
///
/// # Errors
///
/// Returns [`AstrolabeError::Config`] when the explicit file is missing or
/// the selected file is not a valid configuration, and
/// [`AstrolabeError::Io`] when it cannot be read.
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<AppConfig, AstrolabeError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        if !path.exists() {
            return Err(ConfigError::MissingFile(path.to_path_buf()).into());
        }
        return read_config(ConfigSource::Explicit, path);
    }

    let found = implicit_candidates().into_iter().find(|(source, path)| {
        let exists = path.exists();
        debug!(source:% = source, path:? = path, exists; "Checked configuration location");
        exists
    });
    match found {
        Some((source, path)) => read_config(source, &path),
        None => {
            debug!("Using built-in configuration");
            Ok(AppConfig::default())
        }
    }
}

fn read_config(source: ConfigSource, path: &Path) -> Result<AppConfig, AstrolabeError> {
    info!(source:% = source, path:? = path; "Reading configuration");
    let content = fs::read_to_string(path)?;
    toml::from_str(&content).map_err(|err| ConfigError::Parse(err.to_string()).into())
}

#[cfg(test)]
mod tests {
    use astrolabe::config::Profile;
    use tempfile::tempdir;

    use super::*;

    #[test]
    fn test_load_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(
            &path,
            "[metamodel]\nprofiles = []\n\n[report]\nshow_ids = true\n",
        )
        .unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert!(config.metamodel().profiles().is_empty());
        assert!(config.report().show_ids());
        assert!(config.report().show_navigability());
    }

    #[test]
    fn test_missing_explicit_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("absent.toml");

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(err, AstrolabeError::Config(message) if message.contains("absent.toml")));
    }

    #[test]
    fn test_invalid_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[metamodel]\nprofiles = [\"uml2\"]\n").unwrap();

        let err = load_config(Some(&path)).unwrap_err();

        assert!(matches!(
            err,
            AstrolabeError::Config(message) if message.starts_with("Failed to parse")
        ));
    }

    #[test]
    fn test_workspace_location_is_tried_first() {
        let candidates = implicit_candidates();

        assert_eq!(
            candidates.first(),
            Some(&(ConfigSource::Workspace, PathBuf::from("astrolabe/config.toml")))
        );
        assert!(
            candidates[1..]
                .iter()
                .all(|(source, _)| *source == ConfigSource::User)
        );
    }

    #[test]
    fn test_profiles_default_to_c4() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("config.toml");
        fs::write(&path, "[report]\nshow_multiplicity = false\n").unwrap();

        let config = load_config(Some(&path)).unwrap();

        assert_eq!(config.metamodel().profiles(), &[Profile::C4]);
        assert!(!config.report().show_multiplicity());
    }
}
