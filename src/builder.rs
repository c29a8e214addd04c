use crate::types::{Gender, Member, TreeNode};
use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use std::cmp::Ordering;
use tracing::{debug, warn};

/// Convert a flat, relationally-linked member list into a tree rooted at
/// `root_id`, or at the auto-selected root when `root_id` is `None`.
///
/// Returns `None` for an empty list, for an explicit root id that does not
/// exist, or when no member without a parent can be found. Dangling references
/// are skipped; cyclic references are truncated so the build always terminates.
pub fn build(members: &[Member], root_id: Option<&str>) -> Option<TreeNode> {
    if members.is_empty() {
        return None;
    }

    let index: HashMap<&str, &Member> = members.iter().map(|m| (m.id.as_str(), m)).collect();

    let root_id = match root_id {
        Some(id) => {
            if !index.contains_key(id) {
                warn!(root = id, "root id not found in member list");
                return None;
            }
            id.to_string()
        }
        None => select_root(members)?.to_string(),
    };

    // Visited ids along the current recursion path only, so a member may
    // legitimately appear in two separate branches
    let mut path: HashSet<String> = HashSet::new();
    build_node(&root_id, &index, &mut path)
}

// Root selection when none is given: members without a parent, earliest
// birth date first, undated last
fn select_root(members: &[Member]) -> Option<&str> {
    let mut roots: Vec<&Member> = members.iter().filter(|m| m.parent_id.is_none()).collect();
    if roots.is_empty() {
        warn!("no member without a parent; cannot select a root");
        return None;
    }

    roots.sort_by(|a, b| compare_birth_dates(a.birth_date.as_deref(), b.birth_date.as_deref()));
    debug!(root = roots[0].id.as_str(), "auto-selected root member");
    Some(roots[0].id.as_str())
}

fn build_node(
    id: &str,
    index: &HashMap<&str, &Member>,
    path: &mut HashSet<String>,
) -> Option<TreeNode> {
    let member = match index.get(id) {
        Some(m) => *m,
        None => {
            warn!(id, "dangling member reference, skipping");
            return None;
        }
    };

    let mut node = TreeNode::from_member(member);
    node.spouses = resolve_spouses(member, index);

    path.insert(member.id.clone());

    for child_id in &member.children_ids {
        if path.contains(child_id.as_str()) {
            // The child is its own ancestor on this path. Emit it without its
            // subtree instead of recursing, so malformed input still terminates.
            warn!(id = child_id.as_str(), "cyclic reference, truncating subtree");
            if let Some(child) = index.get(child_id.as_str()) {
                let mut stub = TreeNode::from_member(child);
                stub.spouses = resolve_spouses(child, index);
                node.children.push(stub);
            }
            continue;
        }

        if let Some(child) = build_node(child_id, index, path) {
            node.children.push(child);
        }
    }

    path.remove(member.id.as_str());

    // Stable sort keeps input order as the final tie-break
    node.children.sort_by(|a, b| {
        compare_siblings(
            a.gender,
            a.birth_date.as_deref(),
            b.gender,
            b.birth_date.as_deref(),
        )
    });

    Some(node)
}

// Spouses are flat copies: they never host a subtree of their own
fn resolve_spouses(member: &Member, index: &HashMap<&str, &Member>) -> Vec<TreeNode> {
    member
        .spouse_ids
        .iter()
        .filter_map(|spouse_id| match index.get(spouse_id.as_str()) {
            Some(spouse) => Some(TreeNode::from_member(spouse)),
            None => {
                warn!(id = spouse_id.as_str(), "dangling spouse reference, skipping");
                None
            }
        })
        .collect()
}

// Sibling order: male before female, then ascending birth date, undated last
pub(crate) fn compare_siblings(
    gender_a: Gender,
    birth_a: Option<&str>,
    gender_b: Gender,
    birth_b: Option<&str>,
) -> Ordering {
    gender_a
        .order_rank()
        .cmp(&gender_b.order_rank())
        .then_with(|| compare_birth_dates(birth_a, birth_b))
}

// ISO-8601 dates compare lexicographically; missing dates sort last
pub(crate) fn compare_birth_dates(a: Option<&str>, b: Option<&str>) -> Ordering {
    match (a, b) {
        (None, None) => Ordering::Equal,
        (None, Some(_)) => Ordering::Greater,
        (Some(_), None) => Ordering::Less,
        (Some(a), Some(b)) => a.cmp(b),
    }
}
