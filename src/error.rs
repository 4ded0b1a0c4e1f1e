//! Structured error types for spangrid.
//!
//! Only API-boundary calls return these. Event handlers (geometry, scroll)
//! never fail; unsatisfiable fixed placements degrade to auto placement.

/// All errors that can occur while packing or querying a grid.
#[derive(Debug, thiserror::Error)]
pub enum GridError {
    /// A definition with a zero row or column span.
    #[error("Invalid span for item {id}: {row_span}x{col_span} (spans must be positive)")]
    InvalidSpan {
        id: String,
        row_span: u32,
        col_span: u32,
    },

    /// Column count must be at least one.
    #[error("Invalid column count: {0}")]
    InvalidColumnCount(u32),

    /// Two definitions in one set share an id.
    #[error("Duplicate item id: {0}")]
    DuplicateId(String),

    /// An id that has no definition in the current set.
    #[error("Unknown item id: {0}")]
    UnknownId(String),

    /// The view was re-entered from one of its own cell callbacks.
    #[error("Grid is busy: called from inside a cell callback")]
    Busy,

    /// Item definition JSON could not be read or written.
    #[error("JSON: {0}")]
    Json(#[from] serde_json::Error),

    /// Catch-all for string errors.
    #[error("{0}")]
    Other(String),
}

/// Convenience alias used throughout the crate.
pub type Result<T> = std::result::Result<T, GridError>;

impl From<String> for GridError {
    fn from(s: String) -> Self {
        Self::Other(s)
    }
}

impl From<&str> for GridError {
    fn from(s: &str) -> Self {
        Self::Other(s.to_string())
    }
}

#[cfg(target_arch = "wasm32")]
impl From<GridError> for wasm_bindgen::JsValue {
    fn from(e: GridError) -> Self {
        wasm_bindgen::JsValue::from_str(&e.to_string())
    }
}
