use crate::builder::compare_siblings;
use crate::types::{Gender, Member, TreeNode};
use ahash::{AHashMap as HashMap, AHashSet as HashSet};
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, VecDeque};

/// Members grouped by their dataset generation label, each generation sorted
/// by the sibling order rule. Generations come out ascending.
pub fn group_by_generation(members: &[Member]) -> BTreeMap<i32, Vec<&Member>> {
    let mut generations: BTreeMap<i32, Vec<&Member>> = BTreeMap::new();
    for member in members {
        generations.entry(member.generation).or_default().push(member);
    }

    for group in generations.values_mut() {
        group.sort_by(|a, b| {
            compare_siblings(
                a.gender,
                a.birth_date.as_deref(),
                b.gender,
                b.birth_date.as_deref(),
            )
        });
    }

    generations
}

/// Ancestors of a member, nearest first, at most `levels` generations up
/// (`None` for the whole chain). Cycles in the parent chain terminate the walk.
pub fn ancestors<'a>(
    member_id: &str,
    members: &'a [Member],
    levels: Option<usize>,
) -> Vec<&'a Member> {
    let index = member_index(members);
    let mut result = Vec::new();
    let mut visited: HashSet<&str> = HashSet::new();
    let mut current = member_id;

    loop {
        if let Some(limit) = levels {
            if result.len() >= limit {
                break;
            }
        }
        if !visited.insert(current) {
            break;
        }

        let parent = index
            .get(current)
            .and_then(|m| m.parent_id.as_deref())
            .and_then(|pid| index.get(pid));
        match parent {
            Some(parent) => {
                result.push(*parent);
                current = parent.id.as_str();
            }
            None => break,
        }
    }

    result
}

/// Descendants of a member in depth-first order, at most `levels` generations
/// down (`None` for all of them).
pub fn descendants<'a>(
    member_id: &str,
    members: &'a [Member],
    levels: Option<usize>,
) -> Vec<&'a Member> {
    let index = member_index(members);
    let mut result = Vec::new();
    let mut visited: HashSet<&'a str> = HashSet::new();

    if let Some(root) = index.get(member_id) {
        let root_id = root.id.as_str();
        visited.insert(root_id);
        collect_descendants(root_id, &index, levels, 0, &mut visited, &mut result);
    }

    result
}

fn collect_descendants<'a>(
    id: &str,
    index: &HashMap<&str, &'a Member>,
    levels: Option<usize>,
    depth: usize,
    visited: &mut HashSet<&'a str>,
    result: &mut Vec<&'a Member>,
) {
    if let Some(limit) = levels {
        if depth >= limit {
            return;
        }
    }

    let member = match index.get(id) {
        Some(m) => *m,
        None => return,
    };

    for child_id in &member.children_ids {
        if let Some(child) = index.get(child_id.as_str()) {
            if !visited.insert(child.id.as_str()) {
                continue;
            }
            result.push(*child);
            collect_descendants(child_id, index, levels, depth + 1, visited, result);
        }
    }
}

/// Nearest common ancestor of two members, following parent chains only.
pub fn lowest_common_ancestor<'a>(
    id_a: &str,
    id_b: &str,
    members: &'a [Member],
) -> Option<&'a str> {
    if id_a == id_b {
        return members.iter().find(|m| m.id == id_a).map(|m| m.id.as_str());
    }

    let index = member_index(members);

    let mut chain_a: HashSet<&str> = HashSet::new();
    let mut current = id_a;
    while let Some(member) = index.get(current) {
        if !chain_a.insert(member.id.as_str()) {
            break;
        }
        match member.parent_id.as_deref() {
            Some(parent_id) => current = parent_id,
            None => break,
        }
    }

    let mut seen: HashSet<&str> = HashSet::new();
    let mut current = id_b;
    while let Some(member) = index.get(current) {
        if chain_a.contains(member.id.as_str()) {
            return Some(member.id.as_str());
        }
        if !seen.insert(member.id.as_str()) {
            break;
        }
        match member.parent_id.as_deref() {
            Some(parent_id) => current = parent_id,
            None => break,
        }
    }

    None
}

/// Shortest chain of member ids linking two members over parent, spouse and
/// child edges, endpoints included. Empty when no path exists.
pub fn relation_path(start_id: &str, end_id: &str, members: &[Member]) -> Vec<String> {
    if start_id == end_id {
        return vec![start_id.to_string()];
    }

    let index = member_index(members);
    if !index.contains_key(start_id) || !index.contains_key(end_id) {
        return Vec::new();
    }

    // Breadth-first search, tracking each node's predecessor
    let mut predecessor: HashMap<&str, &str> = HashMap::new();
    let mut queue: VecDeque<&str> = VecDeque::new();
    queue.push_back(start_id);
    predecessor.insert(start_id, start_id);

    while let Some(current) = queue.pop_front() {
        let member = match index.get(current) {
            Some(m) => *m,
            None => continue,
        };

        let related = member
            .parent_id
            .iter()
            .chain(member.spouse_ids.iter())
            .chain(member.children_ids.iter());

        for next in related {
            if !index.contains_key(next.as_str()) || predecessor.contains_key(next.as_str()) {
                continue;
            }
            predecessor.insert(next.as_str(), current);

            if next == end_id {
                let mut path = vec![next.as_str()];
                let mut step = current;
                while step != start_id {
                    path.push(step);
                    step = predecessor[step];
                }
                path.push(start_id);
                path.reverse();
                return path.into_iter().map(str::to_string).collect();
            }

            queue.push_back(next.as_str());
        }
    }

    Vec::new()
}

/// Nodes in a built tree, spouses included.
pub fn count_nodes(node: &TreeNode) -> usize {
    let mut count = 1 + node.spouses.len();
    for child in &node.children {
        count += count_nodes(child);
    }
    count
}

/// Widest level of a built tree: the maximum number of nodes, spouses
/// included, on any single level.
pub fn tree_width(node: &TreeNode) -> usize {
    let mut widths: Vec<usize> = Vec::new();
    collect_widths(node, 0, &mut widths);
    widths.into_iter().max().unwrap_or(0)
}

fn collect_widths(node: &TreeNode, depth: usize, widths: &mut Vec<usize>) {
    if widths.len() <= depth {
        widths.resize(depth + 1, 0);
    }
    widths[depth] += 1 + node.spouses.len();

    for child in &node.children {
        collect_widths(child, depth + 1, widths);
    }
}

/// Highest generation label in a member list, `None` when the list is empty.
pub fn latest_generation(members: &[Member]) -> Option<i32> {
    members.iter().map(|m| m.generation).max()
}

/// Depth of a built tree in levels.
pub fn tree_height(node: &TreeNode) -> usize {
    1 + node
        .children
        .iter()
        .map(tree_height)
        .max()
        .unwrap_or(0)
}

// Aggregate statistics over a member list
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GenealogySummary {
    pub total_members: usize,
    pub male_count: usize,
    pub female_count: usize,
    pub generation_count: usize,
    pub oldest_birth_year: Option<i32>,
    pub youngest_birth_year: Option<i32>,
    pub average_age: i32,
}

/// Summarize a member list. Ages of living members are measured against
/// `reference_year` so the result stays reproducible.
pub fn summary(members: &[Member], reference_year: i32) -> GenealogySummary {
    let male_count = members.iter().filter(|m| m.gender == Gender::Male).count();
    let female_count = members
        .iter()
        .filter(|m| m.gender == Gender::Female)
        .count();

    let generation_count = members
        .iter()
        .map(|m| m.generation)
        .collect::<HashSet<i32>>()
        .len();

    let birth_years: Vec<i32> = members
        .iter()
        .filter_map(|m| year_of(m.birth_date.as_deref()))
        .collect();

    let mut age_sum = 0i64;
    let mut age_count = 0i64;
    for member in members {
        if let Some(birth_year) = year_of(member.birth_date.as_deref()) {
            let end_year = year_of(member.death_date.as_deref()).unwrap_or(reference_year);
            age_sum += i64::from(end_year - birth_year);
            age_count += 1;
        }
    }

    GenealogySummary {
        total_members: members.len(),
        male_count,
        female_count,
        generation_count,
        oldest_birth_year: birth_years.iter().min().copied(),
        youngest_birth_year: birth_years.iter().max().copied(),
        average_age: if age_count > 0 {
            ((age_sum as f64 / age_count as f64).round()) as i32
        } else {
            0
        },
    }
}

// ISO-8601 dates carry the year in the first four characters
fn year_of(date: Option<&str>) -> Option<i32> {
    date?.get(..4)?.parse().ok()
}

fn member_index(members: &[Member]) -> HashMap<&str, &Member> {
    members.iter().map(|m| (m.id.as_str(), m)).collect()
}
