use serde::{Deserialize, Serialize};

// Constants for layout orientation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Orientation {
    #[default]
    #[serde(rename = "vertical")]
    Vertical, // generations top to bottom
    #[serde(rename = "horizontal")]
    Horizontal, // generations left to right
}

impl Orientation {
    pub fn as_str(&self) -> &'static str {
        match self {
            Orientation::Vertical => "vertical",
            Orientation::Horizontal => "horizontal",
        }
    }
}

// Member gender, used only for sibling ordering
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Gender {
    Male,
    Female,
    #[default]
    #[serde(other)]
    Unknown,
}

impl Gender {
    // Sort rank: male before female, anything else last
    pub(crate) fn order_rank(&self) -> u8 {
        match self {
            Gender::Male => 0,
            Gender::Female => 1,
            Gender::Unknown => 2,
        }
    }
}

// A person record as delivered by the member repository.
// Read-only snapshot: the engine never mutates the caller's list.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Member {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spouse_ids: Vec<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children_ids: Vec<String>,
    // Generation label assigned by the dataset, independent of layout level
    #[serde(default)]
    pub generation: i32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
}

// A built tree node: member data plus position, size and depth.
// Spouses are flat copies (leaves), never recursively expanded, so a spouse's
// own descendants are not duplicated under two anchors.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TreeNode {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default)]
    pub generation: i32,
    #[serde(default)]
    pub gender: Gender,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub birth_date: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub death_date: Option<String>,
    #[serde(default)]
    pub x: f64,
    #[serde(default)]
    pub y: f64,
    #[serde(default)]
    pub width: f64,
    #[serde(default)]
    pub height: f64,
    #[serde(default)]
    pub level: usize,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spouses: Vec<TreeNode>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub children: Vec<TreeNode>,
}

impl TreeNode {
    pub(crate) fn from_member(member: &Member) -> Self {
        TreeNode {
            id: member.id.clone(),
            name: member.name.clone(),
            parent_id: member.parent_id.clone(),
            generation: member.generation,
            gender: member.gender,
            birth_date: member.birth_date.clone(),
            death_date: member.death_date.clone(),
            x: 0.0,
            y: 0.0,
            width: 0.0,
            height: 0.0,
            level: 0,
            spouses: Vec::new(),
            children: Vec::new(),
        }
    }

    /// Serialize the tree to JSON for caching.
    pub fn to_json(&self) -> String {
        serde_json::to_string(self).unwrap_or_else(|_| "{}".to_string())
    }

    /// Parse a cached tree. Returns `None` on malformed JSON rather than failing.
    pub fn from_json(json: &str) -> Option<TreeNode> {
        serde_json::from_str(json).ok()
    }
}

// Flat positioned node record used on the wire and for connector generation.
// parentId/spouseIds are omitted when the record only carries geometry
// (e.g. a visibility check).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NodeRect {
    pub id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub parent_id: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub spouse_ids: Vec<String>,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

// Constants for connector kinds
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum ConnectorKind {
    #[serde(rename = "parent-child")]
    ParentChild,
    #[serde(rename = "spouse")]
    Spouse,
}

impl ConnectorKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConnectorKind::ParentChild => "parent-child",
            ConnectorKind::Spouse => "spouse",
        }
    }
}

// Line descriptor between two node positions, consumed by the renderer
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Connector {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: ConnectorKind,
    pub from_id: String,
    pub to_id: String,
    pub from_x: f64,
    pub from_y: f64,
    pub to_x: f64,
    pub to_y: f64,
}

// Visible region of the render surface. The buffer margin is added on all
// sides before the containment test.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Viewport {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    #[serde(default)]
    pub buffer: f64,
}

// Configuration options for the layout algorithm
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutConfig {
    pub node_width: f64,
    pub node_height: f64,
    pub h_gap: f64,
    pub v_gap: f64,
    #[serde(default)]
    pub orientation: Orientation,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        // node_height + v_gap reproduces the original 150px level pitch
        LayoutConfig {
            node_width: 80.0,
            node_height: 100.0,
            h_gap: 20.0,
            v_gap: 50.0,
            orientation: Orientation::Vertical,
        }
    }
}

// One positioned node in the final layout output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LaidOutNode {
    pub id: String,
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    pub member: Member,
}

// Rendering-ready result: positioned nodes, connector geometry, overall size
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LayoutResult {
    pub nodes: Vec<LaidOutNode>,
    pub connectors: Vec<Connector>,
    pub total_width: f64,
    pub total_height: f64,
}

impl LayoutResult {
    pub fn empty() -> Self {
        LayoutResult {
            nodes: Vec::new(),
            connectors: Vec::new(),
            total_width: 0.0,
            total_height: 0.0,
        }
    }
}
