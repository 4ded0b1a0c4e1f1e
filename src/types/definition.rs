use serde::{Deserialize, Serialize};

/// Caller-supplied descriptor of one grid item.
///
/// `row_start`/`col_start` are either both supplied (a fixed item) or treated
/// as unresolved (an auto item). Supplying only one of them counts as auto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CellDefinition<K> {
    pub id: K,
    pub row_span: u32,
    pub col_span: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub row_start: Option<u32>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub col_start: Option<u32>,
}

impl<K> CellDefinition<K> {
    /// Create an auto-placed definition
    pub fn new(id: K, row_span: u32, col_span: u32) -> Self {
        Self {
            id,
            row_span,
            col_span,
            row_start: None,
            col_start: None,
        }
    }

    /// Create a definition pinned at (`row_start`, `col_start`)
    pub fn fixed(id: K, row_span: u32, col_span: u32, row_start: u32, col_start: u32) -> Self {
        Self::new(id, row_span, col_span).at(row_start, col_start)
    }

    /// Pin this definition at the given origin
    #[must_use]
    pub fn at(mut self, row_start: u32, col_start: u32) -> Self {
        self.row_start = Some(row_start);
        self.col_start = Some(col_start);
        self
    }

    /// Supplied origin as (row, col), only when both coordinates are present
    pub fn fixed_origin(&self) -> Option<(u32, u32)> {
        self.row_start.zip(self.col_start)
    }

    pub fn is_fixed(&self) -> bool {
        self.fixed_origin().is_some()
    }
}

/// How a resolved cell got its coordinates
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PlacementKind {
    /// Kept the caller-supplied origin
    Fixed,
    /// Placed by the packer
    Auto,
    /// Supplied origin conflicted with an earlier fixed item, placed by the packer
    Fallback,
}

/// A definition with resolved coordinates.
///
/// Occupies `[row_start, max_row) x [col_start, max_col)`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GridCell<K> {
    pub id: K,
    pub row_start: u32,
    pub col_start: u32,
    pub row_span: u32,
    pub col_span: u32,
    pub placement: PlacementKind,
}

impl<K> GridCell<K> {
    /// Exclusive bottom row
    pub fn max_row(&self) -> u32 {
        self.row_start.saturating_add(self.row_span)
    }

    /// Exclusive right column
    pub fn max_col(&self) -> u32 {
        self.col_start.saturating_add(self.col_span)
    }

    /// True if the grid slot (row, col) lies inside this cell
    pub fn contains(&self, row: u32, col: u32) -> bool {
        (self.row_start..self.max_row()).contains(&row)
            && (self.col_start..self.max_col()).contains(&col)
    }

    /// True if the two rectangles share at least one grid slot
    pub fn overlaps<J>(&self, other: &GridCell<J>) -> bool {
        self.row_start < other.max_row()
            && other.row_start < self.max_row()
            && self.col_start < other.max_col()
            && other.col_start < self.max_col()
    }

    /// Column index seen from the leading edge, mirrored for right-to-left grids
    pub fn leading_col(&self, column_count: u32, right_to_left: bool) -> u32 {
        if right_to_left {
            column_count.saturating_sub(self.max_col())
        } else {
            self.col_start
        }
    }
}
