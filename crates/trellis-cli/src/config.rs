//! Configuration file loading for the CLI
//!
//! This module handles finding and loading TOML configuration files
//! from various locations (explicit path, local directory, system directory).
//! Layout options live in the file's `[layout]` table; options it does not
//! name keep their defaults.

use std::{
    fs,
    path::{Path, PathBuf},
};

use directories::ProjectDirs;
use log::{debug, info};
use serde::Deserialize;

use trellis::LayoutOptions;

use crate::CliError;

/// Location of the project-local configuration file.
const LOCAL_CONFIG: &str = "trellis/config.toml";

/// Contents of a configuration file.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
struct ConfigFile {
    layout: LayoutOptions,
}

/// Find and load configuration from various locations
///
/// Search order:
/// 1. Explicit path if provided
/// 2. Local project directory (trellis/config.toml)
/// 3. Platform-specific config directory
/// 4. Default options if none found
///
/// # Errors
///
/// Returns error if:
/// - Explicit path is provided but file doesn't exist
/// - Config file exists but cannot be read or parsed
pub fn load_config(explicit_path: Option<impl AsRef<Path>>) -> Result<LayoutOptions, CliError> {
    if let Some(path) = explicit_path {
        let path = path.as_ref();
        info!(path = path.display().to_string(); "Loading configuration from explicit path");
        return load_config_file(path);
    }

    let local_config = Path::new(LOCAL_CONFIG);
    if local_config.exists() {
        info!(path = local_config.display().to_string(); "Loading configuration from local path");
        return load_config_file(local_config);
    }

    if let Some(system_config) = system_config_path() {
        if system_config.exists() {
            info!(
                path = system_config.display().to_string();
                "Loading configuration from system path"
            );
            return load_config_file(&system_config);
        }
        debug!(path = system_config.display().to_string(); "System configuration file not found");
    } else {
        debug!("Could not determine platform-specific config directory");
    }

    debug!("No configuration file found, using default configuration");
    Ok(LayoutOptions::default())
}

fn system_config_path() -> Option<PathBuf> {
    ProjectDirs::from("com", "trellis", "trellis")
        .map(|dirs| dirs.config_dir().join("config.toml"))
}

/// Load layout options from a TOML file
///
/// # Errors
///
/// Returns error if:
/// - File doesn't exist
/// - File cannot be read
/// - TOML parsing fails
fn load_config_file(path: &Path) -> Result<LayoutOptions, CliError> {
    if !path.exists() {
        return Err(CliError::MissingConfig(path.to_path_buf()));
    }

    let src = fs::read_to_string(path)?;
    let config: ConfigFile = toml::from_str(&src).map_err(|err| CliError::Config {
        path: path.to_path_buf(),
        src: src.clone(),
        err,
    })?;

    Ok(config.layout)
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use tempfile::NamedTempFile;
    use trellis::AlgorithmSelection;

    use super::*;

    fn config_file(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().expect("temp file");
        file.write_all(contents.as_bytes()).expect("write config");
        file
    }

    #[test]
    fn test_explicit_path_is_loaded() {
        let file = config_file(
            r#"
            [layout]
            algorithm = "tree"
            padding = 12.0

            [layout.tree]
            level_spacing = 200.0
            "#,
        );

        let options = load_config(Some(file.path())).expect("valid config");
        assert_eq!(options.algorithm(), AlgorithmSelection::Tree);
        assert_eq!(options.padding(), 12.0);
        assert_eq!(options.tree().level_spacing, 200.0);
        assert_eq!(options.grid(), LayoutOptions::default().grid());
    }

    #[test]
    fn test_file_without_layout_table_uses_defaults() {
        let file = config_file("# nothing here\n");
        let options = load_config(Some(file.path())).expect("valid config");
        assert_eq!(options, LayoutOptions::default());
    }

    #[test]
    fn test_missing_explicit_path_is_an_error() {
        let dir = tempfile::tempdir().expect("temp dir");
        let missing = dir.path().join("absent.toml");

        assert!(matches!(
            load_config(Some(&missing)),
            Err(CliError::MissingConfig(path)) if path == missing
        ));
    }

    #[test]
    fn test_malformed_config_keeps_source() {
        let file = config_file("[layout]\npadding = \"wide\"\n");

        match load_config(Some(file.path())) {
            Err(CliError::Config { src, err, .. }) => {
                assert!(src.contains("wide"));
                assert!(err.span().is_some());
            }
            other => panic!("expected a configuration error, got {other:?}"),
        }
    }
}
