//! spangrid - virtualized spannable grid layout
//!
//! Packs items with heterogeneous row/column spans into a fixed-column grid and
//! realizes only the cells intersecting a scrollable viewport:
//! - Greedy row-major first-fit packing that honours pinned items
//! - Square rows, cell gaps, side padding and right-to-left mirroring
//! - Id-keyed instance recycling with view-type compatible reuse
//! - Visibility work only when the visible row range grows past the last one
//!
//! # Usage (Rust)
//!
//! ```rust
//! use spangrid::{pack, CellDefinition};
//!
//! let items = vec![
//!     CellDefinition::new("hero".to_string(), 2, 2),
//!     CellDefinition::new("side".to_string(), 1, 1),
//! ];
//! let grid = pack(3, &items).unwrap();
//! assert_eq!(grid.get(&"side".to_string()).unwrap().col_start, 2);
//! ```
//!
//! # Usage (JavaScript)
//!
//! ```javascript
//! import init, { SpanGrid } from 'spangrid';
//! await init();
//! const grid = new SpanGrid(scroller, { columnCount: 4, cellGap: 8 }, createCell, bindCell);
//! grid.setItems(items);
//! ```

pub mod error;
pub mod layout;
pub mod render;
pub mod types;
pub mod viewer;

use wasm_bindgen::prelude::*;

pub use error::{GridError, Result};
pub use layout::{pack, CellFrame, GridGeometry, PackedGrid, Viewport, VisibleWindow};
pub use render::{CellAdapter, GridContainer, ViewType};
pub use types::*;
pub use viewer::{GridView, RenderPass};

#[cfg(target_arch = "wasm32")]
pub use viewer::dom::SpanGrid;

/// Pack a JSON item list and return the resolved layout as JSON.
///
/// Items are `{ "id": string, "rowSpan", "colSpan", "rowStart"?, "colStart"? }`;
/// extra fields are ignored.
///
/// # Errors
/// Returns an error for malformed JSON, zero spans, duplicate ids or a zero
/// column count.
pub fn pack_json(json: &str, column_count: u32) -> Result<String> {
    let definitions: Vec<CellDefinition<String>> = serde_json::from_str(json)?;
    let grid = pack(column_count, &definitions)?;
    Ok(serde_json::to_string(&grid)?)
}

/// Pack a JSON item list and return the resolved layout as a JSON string
///
/// # Errors
/// Returns an error if the items are invalid.
#[wasm_bindgen]
pub fn pack_layout(json: &str, column_count: u32) -> std::result::Result<String, JsValue> {
    pack_json(json, column_count).map_err(|e| JsValue::from_str(&e.to_string()))
}

/// Get the library version
#[must_use]
#[wasm_bindgen]
pub fn version() -> String {
    env!("CARGO_PKG_VERSION").to_string()
}
