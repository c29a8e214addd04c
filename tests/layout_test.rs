mod common;

use common::{member, sample_family};
use pedigree_layout::{
    build, compute_layout, filter_visible, layout_tree, ConnectorKind, LayoutConfig, Member,
    NodeRect, Orientation, TreeNode, Viewport,
};

const EPS: f64 = 1e-9;

fn test_config() -> LayoutConfig {
    LayoutConfig {
        node_width: 100.0,
        node_height: 100.0,
        h_gap: 20.0,
        v_gap: 50.0,
        orientation: Orientation::Vertical,
    }
}

fn three_member_family() -> Vec<Member> {
    vec![
        member("r", None, &["c1", "c2"]),
        member("c1", Some("r"), &[]),
        member("c2", Some("r"), &[]),
    ]
}

fn find<'a>(result: &'a pedigree_layout::LayoutResult, id: &str) -> &'a pedigree_layout::LaidOutNode {
    result.nodes.iter().find(|n| n.id == id).expect("node")
}

#[test]
fn end_to_end_three_member_layout() {
    let result = compute_layout(&three_member_family(), Some("r"), &test_config());

    let c1 = find(&result, "c1");
    let c2 = find(&result, "c2");
    let r = find(&result, "r");

    assert!((c1.x - 0.0).abs() < EPS);
    assert!((c1.y - 150.0).abs() < EPS);
    assert!((c2.x - 120.0).abs() < EPS);
    assert!((c2.y - 150.0).abs() < EPS);
    // Centered over the children: (50 + 170) / 2 - 50
    assert!((r.x - 60.0).abs() < EPS);
    assert!((r.y - 0.0).abs() < EPS);

    // One parent-child connector per child, anchored at r's bottom-center
    let down: Vec<_> = result
        .connectors
        .iter()
        .filter(|c| c.kind == ConnectorKind::ParentChild)
        .collect();
    assert_eq!(down.len(), 2);
    for connector in &down {
        assert_eq!(connector.from_id, "r");
        assert!((connector.from_x - (r.x + 50.0)).abs() < EPS);
        assert!((connector.from_y - (r.y + 100.0)).abs() < EPS);
    }
    let to_c1 = down.iter().find(|c| c.to_id == "c1").expect("connector");
    assert!((to_c1.to_x - (c1.x + 50.0)).abs() < EPS);
    assert!((to_c1.to_y - c1.y).abs() < EPS);

    assert!((result.total_width - 220.0).abs() < EPS);
    assert!((result.total_height - 250.0).abs() < EPS);
}

#[test]
fn childless_root_is_a_single_leaf_at_origin() {
    let members = vec![member("only", None, &[])];
    let tree = build(&members, None).expect("tree");
    let laid = layout_tree(&tree, &test_config());

    assert!((laid.x - 0.0).abs() < EPS);
    assert!((laid.y - 0.0).abs() < EPS);
    assert_eq!(laid.level, 0);
}

#[test]
fn relayout_is_bit_identical() {
    let members = sample_family();
    let config = test_config();

    let first = compute_layout(&members, None, &config);
    let second = compute_layout(&members, None, &config);

    assert_eq!(first, second);
    // Byte identity of the serialized form, not just approximate equality
    assert_eq!(
        serde_json::to_string(&first).unwrap(),
        serde_json::to_string(&second).unwrap()
    );
}

#[test]
fn internal_nodes_center_over_their_children() {
    let members = sample_family();
    let config = test_config();
    let tree = build(&members, None).expect("tree");
    let laid = layout_tree(&tree, &config);

    assert_centered(&laid, config.node_width);
}

fn assert_centered(node: &TreeNode, node_width: f64) {
    if !node.children.is_empty() {
        let first = &node.children[0];
        let last = &node.children[node.children.len() - 1];
        let expected = (first.x + first.width / 2.0 + last.x + last.width / 2.0) / 2.0
            - node_width / 2.0;
        assert!(
            (node.x - expected).abs() < EPS,
            "node {} not centered: x={} expected={}",
            node.id,
            node.x,
            expected
        );
    }
    for child in &node.children {
        assert_centered(child, node_width);
    }
}

#[test]
fn siblings_keep_at_least_width_plus_gap() {
    let members = sample_family();
    let config = test_config();
    let tree = build(&members, None).expect("tree");
    let laid = layout_tree(&tree, &config);

    assert_sibling_gaps(&laid, &config);
}

fn assert_sibling_gaps(node: &TreeNode, config: &LayoutConfig) {
    for pair in node.children.windows(2) {
        let gap = (pair[1].x - pair[0].x).abs();
        assert!(
            gap + EPS >= config.node_width + config.h_gap,
            "siblings {} and {} too close: {}",
            pair[0].id,
            pair[1].id,
            gap
        );
    }
    for child in &node.children {
        assert_sibling_gaps(child, config);
    }
}

#[test]
fn spouses_offset_along_the_sibling_axis() {
    let members = sample_family();
    let config = test_config();
    let tree = build(&members, Some("f")).expect("tree");
    let laid = layout_tree(&tree, &config);

    let spouse = &laid.spouses[0];
    assert!((spouse.x - (laid.x + config.node_width + config.h_gap / 2.0)).abs() < EPS);
    assert!((spouse.y - laid.y).abs() < EPS);
    assert_eq!(spouse.level, laid.level);
}

#[test]
fn horizontal_orientation_swaps_the_axes() {
    let members = sample_family();
    let vertical = test_config();
    let horizontal = LayoutConfig {
        orientation: Orientation::Horizontal,
        ..vertical
    };

    let tree = build(&members, None).expect("tree");
    let v = layout_tree(&tree, &vertical);
    let h = layout_tree(&tree, &horizontal);

    assert_swapped(&v, &h);
}

fn assert_swapped(v: &TreeNode, h: &TreeNode) {
    assert_eq!(v.id, h.id);
    assert!((v.x - h.y).abs() < EPS);
    assert!((v.y - h.x).abs() < EPS);
    assert!((v.width - h.height).abs() < EPS);
    assert!((v.height - h.width).abs() < EPS);
    for (vs, hs) in v.spouses.iter().zip(h.spouses.iter()) {
        assert!((vs.x - hs.y).abs() < EPS);
        assert!((vs.y - hs.x).abs() < EPS);
    }
    for (vc, hc) in v.children.iter().zip(h.children.iter()) {
        assert_swapped(vc, hc);
    }
}

#[test]
fn horizontal_connectors_leave_from_the_right_edge() {
    let horizontal = LayoutConfig {
        orientation: Orientation::Horizontal,
        ..test_config()
    };
    let result = compute_layout(&three_member_family(), Some("r"), &horizontal);

    let r = find(&result, "r");
    let c1 = find(&result, "c1");
    let connector = result
        .connectors
        .iter()
        .find(|c| c.to_id == "c1")
        .expect("connector");

    assert!((connector.from_x - (r.x + r.width)).abs() < EPS);
    assert!((connector.from_y - (r.y + r.height / 2.0)).abs() < EPS);
    assert!((connector.to_x - c1.x).abs() < EPS);
    assert!((connector.to_y - (c1.y + c1.height / 2.0)).abs() < EPS);
}

#[test]
fn spouse_connector_is_emitted_once_from_the_lower_id() {
    let members = sample_family();
    let result = compute_layout(&members, None, &test_config());

    let spouse_edges: Vec<_> = result
        .connectors
        .iter()
        .filter(|c| c.kind == ConnectorKind::Spouse)
        .collect();

    assert_eq!(spouse_edges.len(), 1);
    assert_eq!(spouse_edges[0].from_id, "f");
    assert_eq!(spouse_edges[0].to_id, "m");
    assert_eq!(spouse_edges[0].id, "sp-f-m");
}

#[test]
fn unbuildable_input_yields_empty_result() {
    let empty = compute_layout(&[], None, &test_config());
    assert!(empty.nodes.is_empty());
    assert!(empty.connectors.is_empty());
    assert_eq!(empty.total_width, 0.0);

    let orphan_cycle = vec![member("a", Some("b"), &[]), member("b", Some("a"), &[])];
    let result = compute_layout(&orphan_cycle, None, &test_config());
    assert!(result.nodes.is_empty());
}

#[test]
fn visibility_includes_intersecting_and_drops_distant_nodes() {
    let nodes = vec![rect("n", 0.0, 0.0, 50.0, 50.0)];

    let near = Viewport {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        buffer: 0.0,
    };
    assert_eq!(filter_visible(&nodes, &near), vec!["n"]);

    let far = Viewport {
        x: 1000.0,
        y: 1000.0,
        width: 100.0,
        height: 100.0,
        buffer: 0.0,
    };
    assert!(filter_visible(&nodes, &far).is_empty());
}

#[test]
fn visibility_buffer_expands_the_viewport() {
    let nodes = vec![rect("edge", 110.0, 0.0, 50.0, 50.0)];
    let viewport = Viewport {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        buffer: 0.0,
    };
    assert!(filter_visible(&nodes, &viewport).is_empty());

    let buffered = Viewport {
        buffer: 20.0,
        ..viewport
    };
    assert_eq!(filter_visible(&nodes, &buffered), vec!["edge"]);
}

#[test]
fn visibility_counts_touching_boxes_as_visible() {
    let nodes = vec![rect("touch", 100.0, 0.0, 50.0, 50.0)];
    let viewport = Viewport {
        x: 0.0,
        y: 0.0,
        width: 100.0,
        height: 100.0,
        buffer: 0.0,
    };
    assert_eq!(filter_visible(&nodes, &viewport), vec!["touch"]);
}

fn rect(id: &str, x: f64, y: f64, width: f64, height: f64) -> NodeRect {
    NodeRect {
        id: id.to_string(),
        parent_id: None,
        spouse_ids: Vec::new(),
        x,
        y,
        width,
        height,
    }
}
