//! YAML configuration parsing for leader bindings
//!
//! A config document holds a common `bindings` mapping and, optionally, a
//! mapping keyed by the host product code that overrides it:
//!
//! ```yaml
//! bindings:
//!   q:
//!     description: Session...
//!     bindings:
//!       f: { actionId: OpenConfig, description: Open config }
//!   w: { actionId: [SplitVertically, Unsplit], description: Split }
//! IC:
//!   w: { actionId: Unsplit, description: Unsplit }
//! ```
//!
//! Schema problems are collected for every entry before failing, so a broken
//! config is reported once with all of its problems.

use std::path::{Path, PathBuf};

use serde_yaml::Value;

use super::binding::{Binding, BindingTree, GroupBinding, TerminalBinding};
use super::layout::key_for_char;
use super::merge::merge_bindings;
use super::types::{KeyCode, KeyDescriptor, KeyPhase, Modifiers};

pub const BINDINGS_KEYWORD: &str = "bindings";
pub const DESCRIPTION_KEYWORD: &str = "description";
pub const ACTION_ID_KEYWORD: &str = "actionId";

/// Highest function key a label may name
const MAX_FUNCTION_KEY: u8 = 24;

/// Errors that can occur when loading a binding config
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// The text is not valid YAML
    #[error("Config is malformed. Aborting...\n{0}")]
    Malformed(String),

    /// One message per offending entry
    #[error("Bindings schema is invalid. Aborting...\n{}", .0.join("\n"))]
    InvalidSchema(Vec<String>),

    #[error("Could not access config file {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl ConfigError {
    /// Per-entry schema messages, empty for other errors
    pub fn schema_messages(&self) -> &[String] {
        match self {
            ConfigError::InvalidSchema(messages) => messages,
            _ => &[],
        }
    }
}

/// Load and parse a config file for the given product
pub fn load_config_file(path: &Path, product_code: Option<&str>) -> Result<BindingTree, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
        path: path.to_path_buf(),
        source,
    })?;

    load_config_str(&content, product_code)
}

/// Parse a whole config document: the common `bindings` section merged with
/// the section keyed by `product_code`, if present
pub fn load_config_str(text: &str, product_code: Option<&str>) -> Result<BindingTree, ConfigError> {
    let doc = parse_document(text)?;
    if doc.is_null() {
        return Ok(BindingTree::empty());
    }

    let Some(root) = doc.as_mapping() else {
        return Err(ConfigError::InvalidSchema(vec![
            "document root must be a mapping".to_string(),
        ]));
    };

    let common = root.get(BINDINGS_KEYWORD);
    let product = product_code.and_then(|code| {
        root.get(code)
            .map(|section| (code, unwrap_product_section(section)))
    });

    parse_sections((BINDINGS_KEYWORD, common), product)
}

/// Parse raw YAML text into a document value
pub fn parse_document(text: &str) -> Result<Value, ConfigError> {
    if text.trim().is_empty() {
        return Ok(Value::Null);
    }
    serde_yaml::from_str(text).map_err(|e| ConfigError::Malformed(e.to_string()))
}

/// Parse a common and an optional override binding mapping, then merge them
pub fn parse_config(common: &Value, override_doc: Option<&Value>) -> Result<BindingTree, ConfigError> {
    parse_sections(
        (BINDINGS_KEYWORD, Some(common)),
        override_doc.map(|doc| ("override", doc)),
    )
}

/// Parse a single binding mapping into a tree
pub fn parse_bindings(doc: &Value) -> Result<BindingTree, ConfigError> {
    let mut errors = Vec::new();
    let tree = build_tree(doc, BINDINGS_KEYWORD, &mut errors);
    if errors.is_empty() {
        Ok(tree)
    } else {
        Err(ConfigError::InvalidSchema(errors))
    }
}

fn parse_sections(
    common: (&str, Option<&Value>),
    product: Option<(&str, &Value)>,
) -> Result<BindingTree, ConfigError> {
    let mut errors = Vec::new();

    let (common_name, common_doc) = common;
    let common = match common_doc {
        Some(doc) => build_tree(doc, common_name, &mut errors),
        None => BindingTree::empty(),
    };
    let overrides = product.map(|(name, doc)| build_tree(doc, name, &mut errors));

    if !errors.is_empty() {
        return Err(ConfigError::InvalidSchema(errors));
    }

    Ok(match overrides {
        Some(overrides) => {
            tracing::debug!(
                "Merging {} override bindings over {} common bindings",
                overrides.len(),
                common.len()
            );
            merge_bindings(&common, &overrides)
        }
        None => common,
    })
}

/// A product section may be the label mapping itself or wrap it in `bindings`
fn unwrap_product_section(section: &Value) -> &Value {
    match section.as_mapping() {
        Some(mapping) if mapping.len() == 1 => mapping.get(BINDINGS_KEYWORD).unwrap_or(section),
        _ => section,
    }
}

fn build_tree(doc: &Value, path: &str, errors: &mut Vec<String>) -> BindingTree {
    if doc.is_null() {
        return BindingTree::empty();
    }

    let Some(mapping) = doc.as_mapping() else {
        errors.push(format!("{}: expected a mapping of bindings", path));
        return BindingTree::empty();
    };

    let mut bindings: Vec<Binding> = Vec::with_capacity(mapping.len());
    for (key, body) in mapping {
        let Some(label) = label_text(key) else {
            errors.push(format!("{}: binding label {:?} must be a string", path, key));
            continue;
        };
        let entry_path = format!("{}.{}", path, label);

        match build_binding(&label, body, &entry_path, errors) {
            Ok(binding) => {
                if let Some(existing) = bindings.iter_mut().find(|b| b.key() == binding.key()) {
                    tracing::warn!(
                        "{}: key {} is bound twice, keeping the last definition",
                        entry_path,
                        binding.key()
                    );
                    *existing = binding;
                } else {
                    bindings.push(binding);
                }
            }
            Err(message) => errors.push(format!("{}: {}", entry_path, message)),
        }
    }

    BindingTree::new(bindings)
}

fn build_binding(
    label: &str,
    body: &Value,
    path: &str,
    errors: &mut Vec<String>,
) -> Result<Binding, String> {
    if !body.is_mapping() {
        return Err(format!(
            "expected a mapping with `{}` or `{}`",
            ACTION_ID_KEYWORD, BINDINGS_KEYWORD
        ));
    }

    let description = match body.get(DESCRIPTION_KEYWORD) {
        None | Some(Value::Null) => String::new(),
        Some(value) => scalar_text(value)
            .ok_or_else(|| format!("`{}` must be a string", DESCRIPTION_KEYWORD))?,
    };

    if let Some(action) = body.get(ACTION_ID_KEYWORD) {
        let key = key_for_label(label, KeyPhase::Release)?;
        let actions = parse_actions(action)?;
        let terminal =
            TerminalBinding::new(key, label, description, actions).map_err(|e| e.to_string())?;
        return Ok(terminal.into());
    }

    if let Some(children) = body.get(BINDINGS_KEYWORD) {
        let key = key_for_label(label, KeyPhase::Press)?;
        if !children.is_mapping() && !children.is_null() {
            return Err(format!("`{}` must be a mapping", BINDINGS_KEYWORD));
        }
        let children = build_tree(children, path, errors);
        return Ok(GroupBinding::new(key, label, description, children).into());
    }

    Err(format!(
        "binding has neither `{}` nor `{}`",
        ACTION_ID_KEYWORD, BINDINGS_KEYWORD
    ))
}

/// `actionId` is a single id or a non-empty list of ids
fn parse_actions(value: &Value) -> Result<Vec<String>, String> {
    match value {
        Value::String(id) => Ok(vec![id.clone()]),
        Value::Sequence(items) => {
            if items.is_empty() {
                return Err(format!("`{}` list is empty", ACTION_ID_KEYWORD));
            }
            items
                .iter()
                .map(|item| {
                    item.as_str().map(str::to_string).ok_or_else(|| {
                        format!("`{}` list items must be strings", ACTION_ID_KEYWORD)
                    })
                })
                .collect()
        }
        _ => Err(format!(
            "`{}` must be a string or a list of strings",
            ACTION_ID_KEYWORD
        )),
    }
}

/// Resolve a label to the descriptor that triggers it
///
/// Single characters go through the keyboard table; `F1`..`F24` name
/// function keys. Anything else is rejected.
pub fn key_for_label(label: &str, phase: KeyPhase) -> Result<KeyDescriptor, String> {
    let mut chars = label.chars();
    if let (Some(c), None) = (chars.next(), chars.next()) {
        let (code, mods) =
            key_for_char(c).ok_or_else(|| format!("unsupported key {:?}", label))?;
        return Ok(KeyDescriptor::new(code, mods, phase));
    }

    if let Some(n) = function_key_number(label) {
        return Ok(KeyDescriptor::new(KeyCode::F(n), Modifiers::NONE, phase));
    }

    Err(format!(
        "unsupported key {:?}, expected a single character or F1-F{}",
        label, MAX_FUNCTION_KEY
    ))
}

fn function_key_number(label: &str) -> Option<u8> {
    let digits = label.strip_prefix('F')?;
    if digits.is_empty() || !digits.chars().all(|c| c.is_ascii_digit()) {
        return None;
    }
    let n: u8 = digits.parse().ok()?;
    (1..=MAX_FUNCTION_KEY).contains(&n).then_some(n)
}

/// Mapping keys: strings, plus numbers for unquoted digit labels
fn label_text(key: &Value) -> Option<String> {
    match key {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        _ => None,
    }
}

fn scalar_text(value: &Value) -> Option<String> {
    match value {
        Value::String(s) => Some(s.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Bool(b) => Some(b.to_string()),
        _ => None,
    }
}
