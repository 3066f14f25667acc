//! Merging a common binding tree with a product-specific override tree

use std::collections::HashMap;

use super::binding::{Binding, BindingTree};

/// Merge `overrides` into `common`, matching entries by label
///
/// - Entries only in one tree are kept as they are
/// - Two groups with the same label merge recursively; the override's
///   key and description win
/// - Any other pair resolves to the override entry
pub fn merge_bindings(common: &BindingTree, overrides: &BindingTree) -> BindingTree {
    let by_label: HashMap<&str, &Binding> =
        overrides.iter().map(|b| (b.label(), b)).collect();

    let mut merged: Vec<Binding> = common
        .iter()
        .map(|base| match by_label.get(base.label()) {
            Some(over) => merge_entry(base, over),
            None => base.clone(),
        })
        .collect();

    merged.extend(
        overrides
            .iter()
            .filter(|over| common.get(over.label()).is_none())
            .cloned(),
    );

    BindingTree::new(merged)
}

fn merge_entry(base: &Binding, over: &Binding) -> Binding {
    match (base, over) {
        (Binding::Group(base_group), Binding::Group(over_group)) => {
            let children = merge_bindings(base_group.children(), over_group.children());
            Binding::Group(over_group.with_children(children))
        }
        _ => over.clone(),
    }
}
