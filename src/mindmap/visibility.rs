//! Fold state transformations over a [`TreeNode`] subtree.
//!
//! None of these functions render; repainting and viewport fitting are the
//! caller's job (see [`super::command::dispatch`]).

use super::{MindMap, TreeNode};

/// Highest level `show_to_depth` reveals. Anything above folds everything.
pub const MAX_REVEAL_LEVEL: usize = 7;

/// Fold `node` and every descendant.
pub fn fold_recursive(node: &mut TreeNode) {
    set_fold_recursive(node, true);
}

/// Unfold `node` and every descendant.
pub fn unfold_recursive(node: &mut TreeNode) {
    set_fold_recursive(node, false);
}

fn set_fold_recursive(node: &mut TreeNode, fold: bool) {
    node.fold = fold;
    for child in &mut node.children {
        set_fold_recursive(child, fold);
    }
}

/// Reveal the subtree rooted at `node` down to `level`.
///
/// Every node whose depth relative to `node` is below `level - 1` is
/// unfolded, every other node is folded. Relative depth comes from the
/// nodes' paths, not from traversal counting. A level of 0 or 1 leaves the
/// subtree as it is; levels above `MAX_REVEAL_LEVEL` fold all of it.
pub fn show_to_depth(node: &mut TreeNode, level: usize) {
    if level <= 1 {
        return;
    }
    let threshold = if level <= MAX_REVEAL_LEVEL { level - 1 } else { 0 };
    let base = node.depth();
    reveal(node, base, threshold);
}

fn reveal(node: &mut TreeNode, base: usize, threshold: usize) {
    node.fold = node.depth().saturating_sub(base) >= threshold;
    for child in &mut node.children {
        reveal(child, base, threshold);
    }
}

/// Flip the fold flag of the map's root only. Returns the new value.
pub fn toggle_root_fold(map: &mut MindMap) -> bool {
    let root = map.root_mut();
    root.fold = !root.fold;
    root.fold
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::mindmap::tests::sample_map;
    use crate::mindmap::{NodeKind, TreeNode};
    use proptest::prelude::*;

    fn folds(map: &MindMap) -> Vec<(String, bool)> {
        map.root()
            .descendants()
            .map(|n| (n.content.text(), n.fold))
            .collect()
    }

    #[test]
    fn test_fold_recursive_folds_whole_subtree() {
        let mut map = sample_map();
        fold_recursive(map.root_mut());
        assert!(map.root().descendants().all(|n| n.fold));
    }

    #[test]
    fn test_fold_recursive_on_inner_node() {
        let mut map = sample_map();
        fold_recursive(&mut map.root_mut().children[0]);
        assert_eq!(
            folds(&map),
            [
                ("root".to_string(), false),
                ("a".to_string(), true),
                ("a1".to_string(), true),
                ("a1x".to_string(), true),
                ("a2".to_string(), true),
                ("b".to_string(), false),
            ]
        );
    }

    #[test]
    fn test_unfold_after_fold() {
        let mut map = sample_map();
        fold_recursive(map.root_mut());
        unfold_recursive(map.root_mut());
        assert!(map.root().descendants().all(|n| !n.fold));
    }

    #[test]
    fn test_show_to_depth_three() {
        let mut map = sample_map();
        show_to_depth(map.root_mut(), 3);
        // depth 0-1 relative to the root unfolded, deeper folded
        assert!(!map.find("0").unwrap().fold);
        assert!(!map.find("0.0").unwrap().fold);
        assert!(!map.find("0.1").unwrap().fold);
        assert!(map.find("0.0.0").unwrap().fold);
        assert!(map.find("0.0.1").unwrap().fold);
        assert!(map.find("0.0.0.0").unwrap().fold);
    }

    #[test]
    fn test_show_to_depth_is_relative_to_target() {
        let mut map = sample_map();
        fold_recursive(map.root_mut());
        show_to_depth(&mut map.root_mut().children[0], 2);
        assert!(map.find("0").unwrap().fold);
        assert!(!map.find("0.0").unwrap().fold);
        assert!(map.find("0.0.0").unwrap().fold);
        assert!(map.find("0.0.1").unwrap().fold);
    }

    #[test]
    fn test_show_to_depth_below_two_changes_nothing() {
        for level in [0, 1] {
            let mut map = sample_map();
            map.root_mut().children[1].fold = true;
            let before = map.clone();
            show_to_depth(map.root_mut(), level);
            assert_eq!(map, before, "level {level}");
        }
    }

    #[test]
    fn test_show_to_depth_above_seven_folds_everything() {
        for level in [8, 100] {
            let mut map = sample_map();
            show_to_depth(map.root_mut(), level);
            assert!(
                map.root().descendants().all(|n| n.fold),
                "level {level} should fold everything"
            );
        }
    }

    #[test]
    fn test_show_to_depth_missing_path_counts_as_depth_zero() {
        let mut root = TreeNode::leaf(NodeKind::Heading(1), "root");
        root.path = "0".to_string();
        let mut orphan = TreeNode::leaf(NodeKind::ListItem, "orphan");
        orphan.fold = true;
        root.children.push(orphan);

        show_to_depth(&mut root, 2);
        assert!(!root.fold);
        assert!(!root.children[0].fold);
    }

    #[test]
    fn test_toggle_root_fold_only_touches_root() {
        let mut map = sample_map();
        assert!(toggle_root_fold(&mut map));
        assert!(map.root().fold);
        assert!(map.root().descendants().skip(1).all(|n| !n.fold));
        assert!(!toggle_root_fold(&mut map));
        assert!(!map.root().fold);
    }

    fn arb_tree() -> impl Strategy<Value = TreeNode> {
        let leaf = any::<bool>().prop_map(|fold| {
            let mut node = TreeNode::leaf(NodeKind::ListItem, "leaf");
            node.fold = fold;
            node
        });
        leaf.prop_recursive(6, 64, 5, |inner| {
            (any::<bool>(), prop::collection::vec(inner, 0..5)).prop_map(|(fold, children)| {
                let mut node = TreeNode::leaf(NodeKind::ListItem, "branch").with_children(children);
                node.fold = fold;
                node
            })
        })
    }

    proptest! {
        #[test]
        fn prop_fold_then_unfold_clears_every_flag(root in arb_tree()) {
            let mut map = MindMap::new(root);
            fold_recursive(map.root_mut());
            prop_assert!(map.root().descendants().all(|n| n.fold));
            unfold_recursive(map.root_mut());
            prop_assert!(map.root().descendants().all(|n| !n.fold));
        }

        #[test]
        fn prop_show_to_depth_splits_on_threshold(root in arb_tree(), level in 2usize..=7) {
            let mut map = MindMap::new(root);
            fold_recursive(map.root_mut());
            show_to_depth(map.root_mut(), level);
            for node in map.root().descendants() {
                let relative = node.depth() - 1;
                prop_assert_eq!(node.fold, relative >= level - 1, "node {}", node.path);
            }
        }

        #[test]
        fn prop_toggle_root_twice_is_identity(root in arb_tree()) {
            let mut map = MindMap::new(root);
            let before = map.clone();
            toggle_root_fold(&mut map);
            toggle_root_fold(&mut map);
            prop_assert_eq!(map, before);
        }
    }
}
