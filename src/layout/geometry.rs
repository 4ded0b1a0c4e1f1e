//! Pixel geometry for resolved grid cells.

use crate::types::{GridCell, GridConfig};

/// Absolute pixel rectangle of a cell inside the content area, with the
/// trailing margins that separate it from its neighbours
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CellFrame {
    /// X position (left edge)
    pub x: u32,
    /// Y position (top edge)
    pub y: u32,
    pub width: u32,
    pub height: u32,
    pub margin_right: u32,
    pub margin_bottom: u32,
}

/// Column sizing and gap policy for one layout pass
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GridGeometry {
    /// Width of one column in pixels; rows use the same height
    pub column_width: u32,
    pub column_count: u32,
    pub row_count: u32,
    pub cell_gap: u32,
    pub side_padding: bool,
    pub right_to_left: bool,
}

impl GridGeometry {
    /// Geometry for a container `container_width` pixels wide.
    ///
    /// Returns `None` when the columns would be zero pixels wide (geometry not
    /// known yet).
    pub fn new(
        container_width: u32,
        config: &GridConfig,
        column_count: u32,
        row_count: u32,
    ) -> Option<Self> {
        if column_count == 0 {
            return None;
        }
        let column_width = container_width.saturating_sub(config.side_gap()) / column_count;
        if column_width == 0 {
            return None;
        }
        Some(Self {
            column_width,
            column_count,
            row_count,
            cell_gap: config.cell_gap,
            side_padding: config.side_padding,
            right_to_left: config.right_to_left,
        })
    }

    /// Inset on the leading edge
    pub fn side_gap(&self) -> u32 {
        if self.side_padding {
            self.cell_gap
        } else {
            0
        }
    }

    /// Inset above row 0
    pub fn top_gap(&self) -> u32 {
        self.side_gap()
    }

    fn span_px(&self, span: u32) -> u32 {
        self.column_width.saturating_mul(span)
    }

    /// Y of the top edge of `row`
    pub fn row_offset(&self, row: u32) -> u32 {
        self.top_gap().saturating_add(self.span_px(row))
    }

    pub fn content_width(&self) -> u32 {
        self.side_gap()
            .saturating_add(self.span_px(self.column_count))
    }

    pub fn content_height(&self) -> u32 {
        self.row_offset(self.row_count)
    }

    fn origin<K>(&self, cell: &GridCell<K>) -> (u32, u32) {
        let col = cell.leading_col(self.column_count, self.right_to_left);
        (
            self.side_gap().saturating_add(self.span_px(col)),
            self.row_offset(cell.row_start),
        )
    }

    /// Full-slot rectangle for the invisible placeholder of `cell`
    pub fn placeholder_frame<K>(&self, cell: &GridCell<K>) -> CellFrame {
        let (x, y) = self.origin(cell);
        CellFrame {
            x,
            y,
            width: self.span_px(cell.col_span),
            height: self.span_px(cell.row_span),
            margin_right: 0,
            margin_bottom: 0,
        }
    }

    /// Rectangle for a live cell.
    ///
    /// The trailing gap is dropped on the outer right and bottom edges when side
    /// padding is off.
    pub fn cell_frame<K>(&self, cell: &GridCell<K>) -> CellFrame {
        let (x, y) = self.origin(cell);
        let leading_col = cell.leading_col(self.column_count, self.right_to_left);
        let right_gap = if !self.side_padding && leading_col + cell.col_span >= self.column_count {
            0
        } else {
            self.cell_gap
        };
        let bottom_gap = if !self.side_padding && cell.max_row() >= self.row_count {
            0
        } else {
            self.cell_gap
        };
        CellFrame {
            x,
            y,
            width: self.span_px(cell.col_span).saturating_sub(right_gap),
            height: self.span_px(cell.row_span).saturating_sub(bottom_gap),
            margin_right: right_gap,
            margin_bottom: bottom_gap,
        }
    }

    /// Grid slot (row, col) under a content-space point
    pub fn slot_at(&self, x: u32, y: u32) -> Option<(u32, u32)> {
        let x = x.checked_sub(self.side_gap())?;
        let y = y.checked_sub(self.top_gap())?;
        let visual_col = x / self.column_width;
        if visual_col >= self.column_count {
            return None;
        }
        let col = if self.right_to_left {
            self.column_count - 1 - visual_col
        } else {
            visual_col
        };
        Some((y / self.column_width, col))
    }
}
