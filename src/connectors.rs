use crate::types::{Connector, ConnectorKind, NodeRect, Orientation};
use indexmap::IndexMap;

/// Generate connector geometry for a positioned node set.
///
/// Parent-child connectors run from the parent's bottom-center to the child's
/// top-center (vertical), or right-center to left-center (horizontal). Spouse
/// connectors are emitted once per pair, from the lower id to the higher id,
/// so the symmetric relation never produces the same edge twice.
///
/// Output order follows the index's insertion order and is therefore stable
/// for a given input.
pub fn generate(index: &IndexMap<String, NodeRect>, orientation: Orientation) -> Vec<Connector> {
    let mut connectors = Vec::new();

    for node in index.values() {
        if let Some(parent_id) = &node.parent_id {
            if let Some(parent) = index.get(parent_id) {
                connectors.push(parent_child_connector(parent, node, orientation));
            }
        }
    }

    for node in index.values() {
        for spouse_id in &node.spouse_ids {
            if let Some(spouse) = index.get(spouse_id) {
                // Tie-break on the total order of ids to emit each pair once
                if node.id < *spouse_id {
                    connectors.push(spouse_connector(node, spouse, orientation));
                }
            }
        }
    }

    connectors
}

fn parent_child_connector(parent: &NodeRect, child: &NodeRect, orientation: Orientation) -> Connector {
    let (from_x, from_y, to_x, to_y) = match orientation {
        Orientation::Vertical => (
            parent.x + parent.width / 2.0,
            parent.y + parent.height,
            child.x + child.width / 2.0,
            child.y,
        ),
        Orientation::Horizontal => (
            parent.x + parent.width,
            parent.y + parent.height / 2.0,
            child.x,
            child.y + child.height / 2.0,
        ),
    };

    Connector {
        id: format!("pc-{}-{}", parent.id, child.id),
        kind: ConnectorKind::ParentChild,
        from_id: parent.id.clone(),
        to_id: child.id.clone(),
        from_x,
        from_y,
        to_x,
        to_y,
    }
}

// Spouses sit along the sibling axis, so the anchors swap with the orientation
// just like the layout itself
fn spouse_connector(from: &NodeRect, to: &NodeRect, orientation: Orientation) -> Connector {
    let (from_x, from_y, to_x, to_y) = match orientation {
        Orientation::Vertical => (
            from.x + from.width,
            from.y + from.height / 2.0,
            to.x,
            to.y + to.height / 2.0,
        ),
        Orientation::Horizontal => (
            from.x + from.width / 2.0,
            from.y + from.height,
            to.x + to.width / 2.0,
            to.y,
        ),
    };

    Connector {
        id: format!("sp-{}-{}", from.id, to.id),
        kind: ConnectorKind::Spouse,
        from_id: from.id.clone(),
        to_id: to.id.clone(),
        from_x,
        from_y,
        to_x,
        to_y,
    }
}
