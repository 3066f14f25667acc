//! Binding tree: terminal bindings that fire actions and groups that nest
//! further bindings

use std::cmp::Ordering;
use std::collections::HashMap;
use std::ops::Deref;
use std::sync::Arc;

use serde::{Serialize, Serializer};

use super::types::KeyDescriptor;

/// Attempted to build a terminal binding without any action
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("binding `{label}` has no actions")]
pub struct InvalidBindingError {
    pub label: String,
}

/// A leaf of the tree: fires its actions, in order, when matched
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TerminalBinding {
    key: KeyDescriptor,
    label: String,
    description: String,
    actions: Vec<String>,
}

impl TerminalBinding {
    pub fn new(
        key: KeyDescriptor,
        label: impl Into<String>,
        description: impl Into<String>,
        actions: Vec<String>,
    ) -> Result<Self, InvalidBindingError> {
        let label = label.into();
        if actions.is_empty() {
            return Err(InvalidBindingError { label });
        }
        Ok(Self {
            key,
            label,
            description: description.into(),
            actions,
        })
    }

    pub fn key(&self) -> KeyDescriptor {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    /// Action ids, never empty
    pub fn actions(&self) -> &[String] {
        &self.actions
    }
}

/// An inner node: matching it opens its children
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupBinding {
    key: KeyDescriptor,
    label: String,
    description: String,
    children: BindingTree,
}

impl GroupBinding {
    pub fn new(
        key: KeyDescriptor,
        label: impl Into<String>,
        description: impl Into<String>,
        children: BindingTree,
    ) -> Self {
        Self {
            key,
            label: label.into(),
            description: description.into(),
            children,
        }
    }

    pub fn key(&self) -> KeyDescriptor {
        self.key
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn description(&self) -> &str {
        &self.description
    }

    pub fn children(&self) -> &BindingTree {
        &self.children
    }

    /// Same header, different children
    pub fn with_children(&self, children: BindingTree) -> Self {
        Self {
            children,
            ..self.clone()
        }
    }
}

/// One entry of the leader menu
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Binding {
    Terminal(TerminalBinding),
    Group(GroupBinding),
}

impl Binding {
    pub fn key(&self) -> KeyDescriptor {
        match self {
            Binding::Terminal(t) => t.key(),
            Binding::Group(g) => g.key(),
        }
    }

    pub fn label(&self) -> &str {
        match self {
            Binding::Terminal(t) => t.label(),
            Binding::Group(g) => g.label(),
        }
    }

    pub fn description(&self) -> &str {
        match self {
            Binding::Terminal(t) => t.description(),
            Binding::Group(g) => g.description(),
        }
    }

    pub fn is_group(&self) -> bool {
        matches!(self, Binding::Group(_))
    }

    pub fn as_group(&self) -> Option<&GroupBinding> {
        match self {
            Binding::Group(g) => Some(g),
            Binding::Terminal(_) => None,
        }
    }

    pub fn as_terminal(&self) -> Option<&TerminalBinding> {
        match self {
            Binding::Terminal(t) => Some(t),
            Binding::Group(_) => None,
        }
    }

    /// The label as a single character, if it is one
    pub fn label_char(&self) -> Option<char> {
        let mut chars = self.label().chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => Some(c),
            _ => None,
        }
    }
}

impl From<TerminalBinding> for Binding {
    fn from(binding: TerminalBinding) -> Self {
        Binding::Terminal(binding)
    }
}

impl From<GroupBinding> for Binding {
    fn from(binding: GroupBinding) -> Self {
        Binding::Group(binding)
    }
}

/// Menu order: lower-cased label ascending, then original label descending,
/// so `a` comes right before `A`
pub fn sibling_order(a: &Binding, b: &Binding) -> Ordering {
    a.label()
        .to_lowercase()
        .cmp(&b.label().to_lowercase())
        .then_with(|| b.label().cmp(a.label()))
}

/// An immutable, ordered list of sibling bindings
///
/// Cloning is cheap: the list is shared. Every constructor sorts with
/// [`sibling_order`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BindingTree {
    bindings: Arc<Vec<Binding>>,
}

impl BindingTree {
    pub fn new(mut bindings: Vec<Binding>) -> Self {
        bindings.sort_by(sibling_order);
        Self {
            bindings: Arc::new(bindings),
        }
    }

    pub fn empty() -> Self {
        Self::default()
    }

    /// Find a sibling by its label
    pub fn get(&self, label: &str) -> Option<&Binding> {
        self.bindings.iter().find(|b| b.label() == label)
    }

    /// Descriptor → position index; on collision the later sibling wins
    pub fn key_index(&self) -> HashMap<KeyDescriptor, usize> {
        self.bindings
            .iter()
            .enumerate()
            .map(|(idx, b)| (b.key(), idx))
            .collect()
    }

    /// Single-character label → position index; longer labels are skipped
    pub fn char_index(&self) -> HashMap<char, usize> {
        self.bindings
            .iter()
            .enumerate()
            .filter_map(|(idx, b)| b.label_char().map(|c| (c, idx)))
            .collect()
    }

    /// Number of terminal bindings in the whole tree
    pub fn terminal_count(&self) -> usize {
        self.bindings
            .iter()
            .map(|b| match b {
                Binding::Terminal(_) => 1,
                Binding::Group(g) => g.children().terminal_count(),
            })
            .sum()
    }

    /// Whether two trees share the same allocation
    pub fn ptr_eq(&self, other: &BindingTree) -> bool {
        Arc::ptr_eq(&self.bindings, &other.bindings)
    }
}

impl Deref for BindingTree {
    type Target = [Binding];

    fn deref(&self) -> &Self::Target {
        &self.bindings
    }
}

impl<'a> IntoIterator for &'a BindingTree {
    type Item = &'a Binding;
    type IntoIter = std::slice::Iter<'a, Binding>;

    fn into_iter(self) -> Self::IntoIter {
        self.bindings.iter()
    }
}

impl FromIterator<Binding> for BindingTree {
    fn from_iter<T: IntoIterator<Item = Binding>>(iter: T) -> Self {
        Self::new(iter.into_iter().collect())
    }
}

impl Serialize for BindingTree {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.bindings.iter())
    }
}
