//! Viewport state and visible row computation.
//!
//! Rows are square: a row is as tall as a column is wide.

use crate::types::GridCell;

use super::GridGeometry;

/// Inclusive range of grid rows intersecting the viewport
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VisibleWindow {
    pub first_row: u32,
    pub last_row: u32,
}

impl VisibleWindow {
    pub fn new(first_row: u32, last_row: u32) -> Self {
        Self {
            first_row,
            last_row,
        }
    }

    /// True if `other` lies entirely inside this window
    pub fn contains(&self, other: &VisibleWindow) -> bool {
        self.first_row <= other.first_row && other.last_row <= self.last_row
    }

    pub fn contains_row(&self, row: u32) -> bool {
        (self.first_row..=self.last_row).contains(&row)
    }

    /// Visibility test used for realizing cells.
    ///
    /// A cell whose exclusive bottom edge equals `first_row` still counts as
    /// visible, so the row just above the window stays realized.
    pub fn intersects<K>(&self, cell: &GridCell<K>) -> bool {
        cell.max_row() >= self.first_row && cell.row_start <= self.last_row
    }

    /// Number of rows covered
    pub fn row_count(&self) -> u32 {
        self.last_row.saturating_sub(self.first_row) + 1
    }
}

/// Rows intersecting a viewport of `viewport_height` pixels scrolled to `scroll_offset`.
///
/// `top_gap` is the content inset above row 0. Returns `None` while the column
/// width is still unknown (zero).
pub fn visible_row_range(
    scroll_offset: u32,
    column_width: u32,
    viewport_height: u32,
    top_gap: u32,
) -> Option<VisibleWindow> {
    if column_width == 0 {
        return None;
    }
    let first_row = scroll_offset.saturating_sub(top_gap) / column_width;
    let visible_rows = viewport_height.div_ceil(column_width);
    Some(VisibleWindow::new(
        first_row,
        first_row.saturating_add(visible_rows),
    ))
}

/// Viewport state - the visible area of the scroll container
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Viewport {
    /// Vertical scroll position in content pixels
    pub scroll_y: u32,
    /// Viewport width in pixels
    pub width: u32,
    /// Viewport height in pixels
    pub height: u32,
}

impl Viewport {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            scroll_y: 0,
            width,
            height,
        }
    }

    /// Visible rows for the current scroll position, `None` until geometry is known
    pub fn visible_window(&self, geometry: &GridGeometry) -> Option<VisibleWindow> {
        visible_row_range(
            self.scroll_y,
            geometry.column_width,
            self.height,
            geometry.top_gap(),
        )
    }

    /// Largest scroll offset that still shows content at the bottom
    pub fn max_scroll(&self, content_height: u32) -> u32 {
        content_height.saturating_sub(self.height)
    }

    pub fn set_scroll(&mut self, scroll_y: u32) {
        self.scroll_y = scroll_y;
    }

    pub fn resize(&mut self, width: u32, height: u32) {
        self.width = width;
        self.height = height;
    }
}
