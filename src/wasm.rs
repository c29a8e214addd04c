use crate::pipeline::compute_layout;
use crate::types::{LayoutConfig, Member, NodeRect, Viewport};
use crate::visibility::filter_visible;
use wasm_bindgen::prelude::*;

#[wasm_bindgen(start)]
pub fn wasm_init() {
    console_error_panic_hook::set_once();
}

#[wasm_bindgen]
pub struct WasmLayoutResult {
    nodes_json: String,
    connectors_json: String,
    total_width: f64,
    total_height: f64,
}

#[wasm_bindgen]
impl WasmLayoutResult {
    #[wasm_bindgen(getter)]
    pub fn nodes(&self) -> String {
        self.nodes_json.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn connectors(&self) -> String {
        self.connectors_json.clone()
    }

    #[wasm_bindgen(getter)]
    pub fn total_width(&self) -> f64 {
        self.total_width
    }

    #[wasm_bindgen(getter)]
    pub fn total_height(&self) -> f64 {
        self.total_height
    }
}

#[wasm_bindgen]
pub fn layout_wasm(
    members_json: &str,
    config_json: Option<String>,
) -> Result<WasmLayoutResult, JsValue> {
    let members: Vec<Member> =
        serde_json::from_str(members_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let config: LayoutConfig = if let Some(config_str) = config_json {
        serde_json::from_str(&config_str).map_err(|e| JsValue::from_str(&e.to_string()))?
    } else {
        LayoutConfig::default()
    };

    let result = compute_layout(&members, None, &config);

    let nodes_json =
        serde_json::to_string(&result.nodes).map_err(|e| JsValue::from_str(&e.to_string()))?;
    let connectors_json =
        serde_json::to_string(&result.connectors).map_err(|e| JsValue::from_str(&e.to_string()))?;

    Ok(WasmLayoutResult {
        nodes_json,
        connectors_json,
        total_width: result.total_width,
        total_height: result.total_height,
    })
}

#[wasm_bindgen]
pub fn visibility_wasm(nodes_json: &str, viewport_json: &str) -> Result<String, JsValue> {
    let nodes: Vec<NodeRect> =
        serde_json::from_str(nodes_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let viewport: Viewport =
        serde_json::from_str(viewport_json).map_err(|e| JsValue::from_str(&e.to_string()))?;

    let visible = filter_visible(&nodes, &viewport);
    serde_json::to_string(&visible).map_err(|e| JsValue::from_str(&e.to_string()))
}

#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
