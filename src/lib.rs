// Genealogy tree construction, layout and visibility engine.
// Converts a flat, relationally-linked member list into a positioned tree
// with connector geometry, filtered by viewport for rendering.

#![deny(clippy::all)]

// Internal modules (implementation details)
mod coordinate_system;

// Public modules (user-facing API)
pub mod analysis;
pub mod builder;
pub mod connectors;
pub mod layout;
pub mod pipeline;
pub mod types;
pub mod visibility;
pub mod worker;

// WASM bindings (exposed to the JS host)
#[cfg(feature = "wasm")]
pub mod wasm;

// ===== Essential Public API (for 99% of users) =====
/// One-call pipeline: members in, rendering-ready layout out
pub use pipeline::compute_layout;

/// Execution strategy: background worker with a synchronous fallback
pub use worker::{BridgeError, BridgeState, LayoutBridge, LayoutWorker};

/// Input/output types for the engine
pub use types::{
    Connector, ConnectorKind, Gender, LaidOutNode, LayoutConfig, LayoutResult, Member, NodeRect,
    Orientation, TreeNode, Viewport,
};

// ===== Advanced Public API (individual pipeline stages) =====
/// Flat member list -> tree
pub use builder::build;

/// Tree -> positioned tree
pub use layout::layout_tree;

/// Positioned nodes -> connector geometry
pub use connectors::generate as generate_connectors;

/// Positioned nodes + viewport -> visible id set
pub use visibility::{filter_visible, Bounded};

/// Overall bounds of a positioned node set
pub use coordinate_system::{measure_bounds, Bounds};
