//! Default rc file shipped with the crate
//!
//! The template is embedded at compile time and written to the user's config
//! directory the first time bindings are loaded.

use std::fs;
use std::path::{Path, PathBuf};

use super::binding::BindingTree;
use super::config::{load_config_str, ConfigError};

/// Default rc YAML embedded at compile time
pub const DEFAULT_RC_YAML: &str = include_str!("../../default_rc.yaml");

/// File name of the rc file inside the config directory
pub const RC_FILE_NAME: &str = ".leaderkeyrc.yaml";

/// Bindings described by the embedded template
pub fn default_bindings() -> Result<BindingTree, ConfigError> {
    load_config_str(DEFAULT_RC_YAML, None)
}

/// Return the rc file in `dir`, writing the default template if it is missing
pub fn find_or_create_rc_file(dir: &Path) -> Result<PathBuf, ConfigError> {
    let path = dir.join(RC_FILE_NAME);
    if path.exists() {
        return Ok(path);
    }

    let io_error = |source| ConfigError::Io {
        path: path.clone(),
        source,
    };
    fs::create_dir_all(dir).map_err(io_error)?;
    fs::write(&path, DEFAULT_RC_YAML).map_err(io_error)?;
    tracing::info!("Created default rc file at {}", path.display());

    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::keymap::types::KeyPhase;

    #[test]
    fn test_default_template_parses() {
        let tree = default_bindings().expect("embedded template should parse");
        let session = tree.get("q").and_then(|b| b.as_group()).expect("q group");
        assert_eq!(session.description(), "Session...");
        assert_eq!(session.key().phase, KeyPhase::Press);

        let open = session.children().get("f").and_then(|b| b.as_terminal()).unwrap();
        assert_eq!(open.actions(), ["OpenLeaderKeyConfig".to_string()]);
    }

    #[test]
    fn test_creates_missing_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = find_or_create_rc_file(dir.path()).unwrap();

        assert_eq!(path, dir.path().join(RC_FILE_NAME));
        assert_eq!(fs::read_to_string(&path).unwrap(), DEFAULT_RC_YAML);
    }

    #[test]
    fn test_keeps_existing_rc_file() {
        let dir = tempfile::tempdir().unwrap();
        let existing = dir.path().join(RC_FILE_NAME);
        fs::write(&existing, "bindings: {}\n").unwrap();

        let path = find_or_create_rc_file(dir.path()).unwrap();
        assert_eq!(path, existing);
        assert_eq!(fs::read_to_string(&path).unwrap(), "bindings: {}\n");
    }

    #[test]
    fn test_creates_missing_config_dir() {
        let dir = tempfile::tempdir().unwrap();
        let nested = dir.path().join("nested").join("config");
        let path = find_or_create_rc_file(&nested).unwrap();
        assert!(path.exists());
    }
}
