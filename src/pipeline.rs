use crate::builder;
use crate::connectors;
use crate::coordinate_system::translate_to_origin;
use crate::layout::layout_tree;
use crate::types::{LaidOutNode, LayoutConfig, LayoutResult, Member, NodeRect, TreeNode};
use ahash::AHashMap as HashMap;
use indexmap::IndexMap;
use tracing::debug;

/// The canonical build → layout → connectors → bounds path.
///
/// Both the synchronous caller and the worker execute exactly this function;
/// only the execution context differs. Input the builder cannot turn into a
/// tree yields an empty result, never an error.
pub fn compute_layout(
    members: &[Member],
    root_id: Option<&str>,
    config: &LayoutConfig,
) -> LayoutResult {
    let root = match builder::build(members, root_id) {
        Some(root) => root,
        None => return LayoutResult::empty(),
    };

    let positioned = layout_tree(&root, config);

    let member_index: HashMap<&str, &Member> =
        members.iter().map(|m| (m.id.as_str(), m)).collect();

    let mut flat = flatten_tree(&positioned, &member_index);
    let bounds = translate_to_origin(&mut flat);

    let index: IndexMap<String, NodeRect> = flat
        .iter()
        .map(|rect| (rect.id.clone(), rect.clone()))
        .collect();
    let connectors = connectors::generate(&index, config.orientation);

    let nodes: Vec<LaidOutNode> = flat
        .into_iter()
        .filter_map(|rect| {
            let member = member_index.get(rect.id.as_str())?;
            Some(LaidOutNode {
                id: rect.id,
                x: rect.x,
                y: rect.y,
                width: rect.width,
                height: rect.height,
                member: (*member).clone(),
            })
        })
        .collect();

    debug!(
        nodes = nodes.len(),
        connectors = connectors.len(),
        "layout pipeline complete"
    );

    LayoutResult {
        nodes,
        connectors,
        total_width: bounds.width,
        total_height: bounds.height,
    }
}

/// Flatten a laid-out tree into positioned rects, pre-order: each node, then
/// its spouses, then its children.
///
/// A member can surface twice when it is both somebody's spouse and somebody's
/// child; the primary (non-spouse) occurrence wins so each id appears once.
pub fn flatten_tree(root: &TreeNode, member_index: &HashMap<&str, &Member>) -> Vec<NodeRect> {
    let mut flat: Vec<NodeRect> = Vec::new();
    let mut seen: HashMap<String, usize> = HashMap::new();
    collect_rects(root, member_index, &mut flat, &mut seen);
    flat
}

fn collect_rects(
    node: &TreeNode,
    member_index: &HashMap<&str, &Member>,
    flat: &mut Vec<NodeRect>,
    seen: &mut HashMap<String, usize>,
) {
    let rect = to_rect(node, member_index);
    match seen.get(&node.id) {
        // An earlier spouse copy loses to the primary occurrence
        Some(&position) => flat[position] = rect,
        None => {
            seen.insert(node.id.clone(), flat.len());
            flat.push(rect);
        }
    }

    for spouse in &node.spouses {
        if !seen.contains_key(&spouse.id) {
            seen.insert(spouse.id.clone(), flat.len());
            flat.push(to_rect(spouse, member_index));
        }
    }

    for child in &node.children {
        collect_rects(child, member_index, flat, seen);
    }
}

// Spouse links come from the source member record; the tree itself only
// stores spouse nodes, not their ids
fn to_rect(node: &TreeNode, member_index: &HashMap<&str, &Member>) -> NodeRect {
    let spouse_ids = member_index
        .get(node.id.as_str())
        .map(|m| m.spouse_ids.clone())
        .unwrap_or_default();

    NodeRect {
        id: node.id.clone(),
        parent_id: node.parent_id.clone(),
        spouse_ids,
        x: node.x,
        y: node.y,
        width: node.width,
        height: node.height,
    }
}
