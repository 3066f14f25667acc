//! Binding configuration service
//!
//! Owns the active binding tree and reloads it from the rc file on demand.
//! A failed reload leaves the previous tree in place.

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use crate::keymap::{
    find_or_create_rc_file, load_config_file, Binding, BindingTree, ConfigError, KeyDescriptor,
};

/// Holder of the current bindings for one host product
#[derive(Debug, Clone)]
pub struct ConfigService {
    dir: PathBuf,
    product_code: Option<String>,
    bindings: BindingTree,
    bindings_map: HashMap<KeyDescriptor, Binding>,
}

impl ConfigService {
    /// Create a service reading from `dir`, starting with no bindings
    pub fn new(dir: impl Into<PathBuf>, product_code: Option<String>) -> Self {
        Self {
            dir: dir.into(),
            product_code,
            bindings: BindingTree::empty(),
            bindings_map: HashMap::new(),
        }
    }

    /// Service rooted at [`crate::config_paths::config_dir`]
    pub fn from_env(product_code: Option<String>) -> Option<Self> {
        let Some(dir) = crate::config_paths::config_dir() else {
            tracing::warn!("No config directory available");
            return None;
        };
        Some(Self::new(dir, product_code))
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    pub fn product_code(&self) -> Option<&str> {
        self.product_code.as_deref()
    }

    /// Path of the rc file, created from the default template if missing
    pub fn rc_file(&self) -> Result<PathBuf, ConfigError> {
        find_or_create_rc_file(&self.dir)
    }

    /// Re-read the rc file and replace the bindings on success
    pub fn reload(&mut self) -> Result<&BindingTree, ConfigError> {
        let path = self.rc_file()?;

        match load_config_file(&path, self.product_code.as_deref()) {
            Ok(tree) => {
                tracing::info!(
                    "Loaded {} leader bindings from {}",
                    tree.terminal_count(),
                    path.display()
                );
                self.set_bindings(tree);
                Ok(&self.bindings)
            }
            Err(e) => {
                tracing::warn!(
                    "Failed to load bindings from {}, keeping previous: {}",
                    path.display(),
                    e
                );
                Err(e)
            }
        }
    }

    pub fn set_bindings(&mut self, bindings: BindingTree) {
        self.bindings_map = bindings.iter().map(|b| (b.key(), b.clone())).collect();
        self.bindings = bindings;
    }

    pub fn bindings(&self) -> &BindingTree {
        &self.bindings
    }

    /// Top-level bindings by trigger descriptor
    pub fn bindings_map(&self) -> &HashMap<KeyDescriptor, Binding> {
        &self.bindings_map
    }
}
