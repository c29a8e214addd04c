mod common;

use common::{member, sample_family, with_birth, with_gender};
use pedigree_layout::analysis::count_nodes;
use pedigree_layout::{build, Gender, Member, TreeNode};

#[test]
fn builds_tree_rooted_at_requested_member() {
    let members = sample_family();
    let tree = build(&members, Some("f")).expect("tree");
    assert_eq!(tree.id, "f");
    assert_eq!(tree.children.len(), 2);
}

#[test]
fn empty_member_list_yields_no_tree() {
    assert_eq!(build(&[], None), None);
    assert_eq!(build(&[], Some("anything")), None);
}

#[test]
fn unknown_root_id_yields_no_tree() {
    let members = sample_family();
    assert_eq!(build(&members, Some("missing")), None);
}

#[test]
fn auto_selects_parentless_member_with_earliest_birth_date() {
    // Both `g` (1940) and `m` (1967) lack a parent; the earlier birth wins
    let members = sample_family();
    let tree = build(&members, None).expect("tree");
    assert_eq!(tree.id, "g");
}

#[test]
fn undated_roots_sort_after_dated_ones() {
    let members = vec![
        member("undated", None, &[]),
        with_birth(member("dated", None, &[]), "1970-01-01"),
    ];
    let tree = build(&members, None).expect("tree");
    assert_eq!(tree.id, "dated");
}

#[test]
fn no_parentless_member_yields_no_tree() {
    let members = vec![member("a", Some("b"), &[]), member("b", Some("a"), &[])];
    assert_eq!(build(&members, None), None);
}

#[test]
fn siblings_sort_male_first_then_by_birth_date() {
    let members = vec![
        member("p", None, &["d1", "s1", "d2", "s2"]),
        with_birth(with_gender(member("d1", Some("p"), &[]), Gender::Female), "1980-01-01"),
        with_birth(with_gender(member("s1", Some("p"), &[]), Gender::Male), "1985-01-01"),
        with_birth(with_gender(member("d2", Some("p"), &[]), Gender::Female), "1978-05-05"),
        with_birth(with_gender(member("s2", Some("p"), &[]), Gender::Male), "1982-02-02"),
    ];

    let tree = build(&members, None).expect("tree");
    let order: Vec<&str> = tree.children.iter().map(|c| c.id.as_str()).collect();
    assert_eq!(order, vec!["s2", "s1", "d2", "d1"]);
}

#[test]
fn spouses_are_flat_copies_without_subtrees() {
    let members = sample_family();
    let tree = build(&members, Some("f")).expect("tree");

    assert_eq!(tree.spouses.len(), 1);
    assert_eq!(tree.spouses[0].id, "m");
    assert!(tree.spouses[0].children.is_empty());
    assert!(tree.spouses[0].spouses.is_empty());
}

#[test]
fn dangling_references_are_skipped() {
    let members = vec![
        let_spouse_dangle(member("r", None, &["c", "ghost"])),
        member("c", Some("r"), &[]),
    ];

    let tree = build(&members, None).expect("tree");
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].id, "c");
    assert!(tree.spouses.is_empty());
}

fn let_spouse_dangle(mut member: Member) -> Member {
    member.spouse_ids = vec!["nobody".to_string()];
    member
}

#[test]
fn cyclic_parent_child_input_terminates_with_finite_tree() {
    // A and B each claim the other as parent and child
    let members = vec![member("A", Some("B"), &["B"]), member("B", Some("A"), &["A"])];

    let tree = build(&members, Some("A")).expect("tree");
    assert_eq!(tree.id, "A");
    assert_eq!(tree.children.len(), 1);
    assert_eq!(tree.children[0].id, "B");
    // The cycle back to A is truncated: B's copy of A has no subtree
    assert_eq!(tree.children[0].children.len(), 1);
    assert!(tree.children[0].children[0].children.is_empty());
    assert_eq!(count_nodes(&tree), 3);
}

#[test]
fn self_referencing_member_terminates() {
    let members = vec![member("loop", None, &["loop"])];
    let tree = build(&members, None).expect("tree");
    assert_eq!(tree.children.len(), 1);
    assert!(tree.children[0].children.is_empty());
}

#[test]
fn tree_json_round_trip_preserves_structure() {
    let members = sample_family();
    let tree = build(&members, None).expect("tree");

    let json = tree.to_json();
    assert_eq!(TreeNode::from_json(&json), Some(tree));
}

#[test]
fn malformed_tree_json_parses_to_none() {
    assert_eq!(TreeNode::from_json("not json at all"), None);
    assert_eq!(TreeNode::from_json("{\"id\":"), None);
}

#[test]
fn member_wire_format_is_camel_case() {
    let json = r#"{
        "id": "x",
        "parentId": "p",
        "spouseIds": ["s"],
        "childrenIds": ["c1", "c2"],
        "generation": 3,
        "gender": "female",
        "birthDate": "1980-01-02"
    }"#;

    let member: Member = serde_json::from_str(json).expect("member");
    assert_eq!(member.parent_id.as_deref(), Some("p"));
    assert_eq!(member.spouse_ids, vec!["s"]);
    assert_eq!(member.children_ids, vec!["c1", "c2"]);
    assert_eq!(member.generation, 3);
    assert_eq!(member.gender, Gender::Female);
    assert_eq!(member.birth_date.as_deref(), Some("1980-01-02"));
}

#[test]
fn unrecognized_gender_becomes_unknown() {
    let member: Member =
        serde_json::from_str(r#"{"id":"x","gender":"nonbinary"}"#).expect("member");
    assert_eq!(member.gender, Gender::Unknown);
}
