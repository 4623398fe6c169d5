//! Property-based tests for CategoryTree structural invariants.

use proptest::prelude::*;

use crate::category::tree::CategoryTree;
use crate::test_support::category;

/// Each entry picks an earlier node as parent (or none for a root).
fn arb_shape() -> impl Strategy<Value = Vec<Option<prop::sample::Index>>> {
    prop::collection::vec(prop::option::weighted(0.8, any::<prop::sample::Index>()), 1..40)
}

fn build(shape: &[Option<prop::sample::Index>]) -> CategoryTree {
    let mut tree = CategoryTree::new();
    let mut ids = Vec::new();
    for (i, pick) in shape.iter().enumerate() {
        let parent = match pick {
            Some(index) if !ids.is_empty() => Some(*index.get(&ids)),
            _ => None,
        };
        let node = category(&format!("{}", 1000 + i), parent);
        ids.push(node.id);
        tree.insert(node).unwrap();
    }
    tree
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// is_group is true exactly when a node has children.
    #[test]
    fn prop_is_group_iff_children(shape in arb_shape()) {
        let tree = build(&shape);
        for node in tree.iter() {
            prop_assert_eq!(node.is_group, !tree.children(node.id).is_empty());
        }
    }

    /// Every parent chain reaches a root within `len` steps.
    #[test]
    fn prop_parent_chains_terminate(shape in arb_shape()) {
        let tree = build(&shape);
        prop_assert!(tree.check_integrity().is_ok());
        for node in tree.iter() {
            let path = tree.path(node.id).unwrap();
            prop_assert!(path.len() <= tree.len());
            prop_assert!(path[0].parent_id.is_none());
        }
    }

    /// Post-order visits every node once, children before parents.
    #[test]
    fn prop_post_order_children_first(shape in arb_shape()) {
        let tree = build(&shape);
        let order = tree.post_order();
        prop_assert_eq!(order.len(), tree.len());
        let position: std::collections::HashMap<_, _> =
            order.iter().enumerate().map(|(i, id)| (*id, i)).collect();
        for node in tree.iter() {
            if let Some(parent) = node.parent_id {
                prop_assert!(position[&node.id] < position[&parent]);
            }
        }
    }

    /// Reloading stored rows reproduces the same structure.
    #[test]
    fn prop_reload_matches(shape in arb_shape()) {
        let tree = build(&shape);
        let rows: Vec<_> = tree.iter().cloned().collect();
        let reloaded = CategoryTree::from_categories(rows).unwrap();
        for node in tree.iter() {
            prop_assert_eq!(tree.children(node.id), reloaded.children(node.id));
            prop_assert_eq!(node.is_group, reloaded.get(node.id).unwrap().is_group);
        }
    }

    /// Removing leaves one by one always keeps is_group consistent.
    #[test]
    fn prop_remove_leaves_keeps_groups_consistent(shape in arb_shape()) {
        let mut tree = build(&shape);
        loop {
            let next = tree.iter().find(|c| !c.is_group).map(|c| c.id);
            let Some(leaf) = next else { break };
            tree.remove(leaf).unwrap();
            for node in tree.iter() {
                prop_assert_eq!(node.is_group, !tree.children(node.id).is_empty());
            }
        }
        prop_assert!(tree.is_empty());
    }
}
