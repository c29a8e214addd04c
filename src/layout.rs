use crate::coordinate_system::apply_orientation;
use crate::types::{LayoutConfig, Orientation, TreeNode};

/// Assign pixel coordinates to every node of a built tree.
///
/// The traversal is post-order: children are laid out first so the parent can
/// center itself over them. Leaves are placed at the running cursor, which
/// then advances by `node_width + h_gap`. The caller's tree is never mutated;
/// layout runs on a private clone.
pub fn layout_tree(root: &TreeNode, config: &LayoutConfig) -> TreeNode {
    let mut node = root.clone();
    let mut cursor = 0.0;

    // The pass always works in the vertical frame; horizontal orientation is
    // the same algorithm with the axes swapped afterwards
    layout_subtree(&mut node, 0, &mut cursor, config);

    if config.orientation == Orientation::Horizontal {
        apply_orientation(&mut node);
    }

    node
}

fn layout_subtree(node: &mut TreeNode, level: usize, cursor: &mut f64, config: &LayoutConfig) {
    node.level = level;
    node.width = config.node_width;
    node.height = config.node_height;
    node.y = level as f64 * (config.node_height + config.v_gap);

    if node.children.is_empty() {
        // Leaf rule: place at the cursor, then advance it
        node.x = *cursor;
        *cursor += config.node_width + config.h_gap;
    } else {
        for child in &mut node.children {
            layout_subtree(child, level + 1, cursor, config);
        }

        // Internal rule: center the parent over the first and last child
        let first = &node.children[0];
        let last = &node.children[node.children.len() - 1];
        let first_center = first.x + first.width / 2.0;
        let last_center = last.x + last.width / 2.0;
        node.x = (first_center + last_center) / 2.0 - config.node_width / 2.0;
    }

    place_spouses(node, config);
}

// Spouses line up next to their anchor along the sibling axis, half a gap
// tighter than sibling spacing
fn place_spouses(node: &mut TreeNode, config: &LayoutConfig) {
    let anchor_x = node.x;
    let anchor_y = node.y;
    let level = node.level;

    for (i, spouse) in node.spouses.iter_mut().enumerate() {
        spouse.width = config.node_width;
        spouse.height = config.node_height;
        spouse.level = level;
        spouse.x = anchor_x + (i as f64 + 1.0) * (config.node_width + config.h_gap / 2.0);
        spouse.y = anchor_y;
    }
}
