use crate::types::{NodeRect, TreeNode};

// Bounding box of a laid-out node set
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
    pub width: f64,
    pub height: f64,
}

/// Swap the generation and sibling axes of a laid-out tree in place,
/// turning a vertical layout into the horizontal one.
pub fn apply_orientation(node: &mut TreeNode) {
    std::mem::swap(&mut node.x, &mut node.y);
    std::mem::swap(&mut node.width, &mut node.height);

    for spouse in &mut node.spouses {
        std::mem::swap(&mut spouse.x, &mut spouse.y);
        std::mem::swap(&mut spouse.width, &mut spouse.height);
    }

    for child in &mut node.children {
        apply_orientation(child);
    }
}

/// Measure the bounding box of a flat positioned node set.
pub fn measure_bounds(nodes: &[NodeRect]) -> Bounds {
    if nodes.is_empty() {
        return Bounds::default();
    }

    let mut min_x = f64::MAX;
    let mut min_y = f64::MAX;
    let mut max_x = f64::MIN;
    let mut max_y = f64::MIN;

    for node in nodes {
        min_x = min_x.min(node.x);
        min_y = min_y.min(node.y);
        max_x = max_x.max(node.x + node.width);
        max_y = max_y.max(node.y + node.height);
    }

    Bounds {
        min_x,
        min_y,
        max_x,
        max_y,
        width: max_x - min_x,
        height: max_y - min_y,
    }
}

/// Shift every node so the layout starts at the origin. Returns the measured
/// bounds after the shift.
pub fn translate_to_origin(nodes: &mut [NodeRect]) -> Bounds {
    let bounds = measure_bounds(nodes);
    if nodes.is_empty() {
        return bounds;
    }

    let dx = -bounds.min_x;
    let dy = -bounds.min_y;

    if dx != 0.0 || dy != 0.0 {
        for node in nodes.iter_mut() {
            node.x += dx;
            node.y += dy;
        }
    }

    Bounds {
        min_x: 0.0,
        min_y: 0.0,
        max_x: bounds.width,
        max_y: bounds.height,
        width: bounds.width,
        height: bounds.height,
    }
}
