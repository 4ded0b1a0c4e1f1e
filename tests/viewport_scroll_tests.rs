//! Viewport and scroll tests
//!
//! Tests for visible row calculation, cell geometry, scroll-to-item offsets
//! and hit testing.

#![allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]

mod fixtures;

use fixtures::{column_items, view_with};
use spangrid::layout::visible_row_range;
use spangrid::{
    pack, CellDefinition, CellFrame, GridConfig, GridError, GridGeometry, RenderPass, Viewport,
    VisibleWindow,
};
use test_case::test_case;

// ============================================================================
// Visible Row Range
// ============================================================================

#[test_case(0, 100, 500, 0 => Some((0, 5)) ; "top of content")]
#[test_case(99, 100, 500, 0 => Some((0, 5)) ; "just before the second row")]
#[test_case(300, 100, 500, 0 => Some((3, 8)) ; "scrolled three rows")]
#[test_case(0, 100, 450, 0 => Some((0, 5)) ; "partial row rounds up")]
#[test_case(15, 100, 200, 20 => Some((0, 2)) ; "scroll inside the top gap")]
#[test_case(120, 100, 200, 20 => Some((1, 3)) ; "top gap shifts rows")]
#[test_case(500, 0, 500, 0 => None ; "unknown column width")]
fn test_visible_row_range(scroll: u32, column_width: u32, height: u32, top_gap: u32) -> Option<(u32, u32)> {
    visible_row_range(scroll, column_width, height, top_gap).map(|w| (w.first_row, w.last_row))
}

#[test]
fn test_viewport_window_uses_geometry() {
    let config = GridConfig {
        column_count: 2,
        cell_gap: 10,
        ..GridConfig::default()
    };
    let geometry = GridGeometry::new(210, &config, 2, 10).unwrap();
    assert_eq!(geometry.column_width, 100);

    let mut viewport = Viewport::new(210, 300);
    assert_eq!(viewport.visible_window(&geometry), Some(VisibleWindow::new(0, 3)));
    viewport.set_scroll(210);
    assert_eq!(viewport.visible_window(&geometry), Some(VisibleWindow::new(2, 5)));
    assert_eq!(viewport.max_scroll(geometry.content_height()), 1010 - 300);
}

// ============================================================================
// Geometry
// ============================================================================

#[test]
fn test_zero_width_container_has_no_geometry() {
    let config = GridConfig::with_columns(3);
    assert!(GridGeometry::new(0, &config, 3, 4).is_none());
    assert!(GridGeometry::new(2, &config, 3, 4).is_none());
}

#[test]
fn test_frames_with_side_padding() {
    let config = GridConfig {
        column_count: 2,
        cell_gap: 10,
        side_padding: true,
        right_to_left: false,
    };
    let grid = pack(2, &[CellDefinition::new(0u32, 1, 1), CellDefinition::new(1, 1, 1)]).unwrap();
    let geometry = GridGeometry::new(210, &config, grid.column_count, grid.row_count).unwrap();

    let right = grid.get(&1).unwrap();
    assert_eq!(
        geometry.placeholder_frame(right),
        CellFrame {
            x: 110,
            y: 10,
            width: 100,
            height: 100,
            margin_right: 0,
            margin_bottom: 0,
        }
    );
    assert_eq!(
        geometry.cell_frame(right),
        CellFrame {
            x: 110,
            y: 10,
            width: 90,
            height: 90,
            margin_right: 10,
            margin_bottom: 10,
        }
    );
    assert_eq!(geometry.content_width(), 210);
    assert_eq!(geometry.content_height(), 110);
}

#[test]
fn test_edge_cells_drop_trailing_gap_without_side_padding() {
    let config = GridConfig {
        column_count: 2,
        cell_gap: 10,
        side_padding: false,
        right_to_left: false,
    };
    let grid = pack(2, &column_items(4)).unwrap();
    let geometry = GridGeometry::new(200, &config, grid.column_count, grid.row_count).unwrap();

    let inner = geometry.cell_frame(grid.get(&0).unwrap());
    assert_eq!((inner.x, inner.y, inner.width, inner.height), (0, 0, 90, 90));

    let bottom_right = geometry.cell_frame(grid.get(&3).unwrap());
    assert_eq!((bottom_right.x, bottom_right.y), (100, 100));
    assert_eq!((bottom_right.width, bottom_right.height), (100, 100));
    assert_eq!((bottom_right.margin_right, bottom_right.margin_bottom), (0, 0));
}

#[test]
fn test_right_to_left_mirrors_columns() {
    let config = GridConfig {
        column_count: 3,
        right_to_left: true,
        ..GridConfig::default()
    };
    let defs = vec![CellDefinition::new(0u32, 1, 1), CellDefinition::new(1, 1, 2)];
    let grid = pack(3, &defs).unwrap();
    let geometry = GridGeometry::new(300, &config, 3, grid.row_count).unwrap();

    assert_eq!(geometry.cell_frame(grid.get(&0).unwrap()).x, 200);
    assert_eq!(geometry.cell_frame(grid.get(&1).unwrap()).x, 0);
    assert_eq!(geometry.slot_at(250, 50), Some((0, 0)));
    assert_eq!(geometry.slot_at(50, 50), Some((0, 2)));
}

// ============================================================================
// Scrolling a View
// ============================================================================

#[test]
fn test_scroll_within_window_touches_nothing() {
    let mut view = view_with(GridConfig::with_columns(1), column_items(20));
    view.on_geometry_ready(100, 500);
    let placements = view.container().placements.len();
    let binds = view.adapter().binds.len();

    for offset in [10, 50, 99, 0] {
        let pass = view.on_scroll(offset);
        assert_eq!(pass, RenderPass::Unchanged(VisibleWindow::new(0, 5)));
        assert!(pass.is_noop());
    }
    assert_eq!(view.container().placements.len(), placements);
    assert_eq!(view.adapter().binds.len(), binds);
}

#[test]
fn test_scroll_records_latest_window() {
    let mut view = view_with(GridConfig::with_columns(1), column_items(20));
    view.on_geometry_ready(100, 500);

    view.on_scroll(300);
    assert_eq!(view.visible_window(), Some(VisibleWindow::new(3, 8)));
    assert_eq!(view.viewport().scroll_y, 300);

    // Rows 0..=5 are not inside rows 3..=8, so scrolling back does work
    let pass = view.on_scroll(0);
    assert!(!pass.is_noop());
    assert_eq!(pass.window(), Some(VisibleWindow::new(0, 5)));
}

#[test]
fn test_scroll_offset_for_item() {
    let mut view = view_with(GridConfig::with_columns(1), column_items(20));
    assert_eq!(view.scroll_offset_for(&7).unwrap(), None);

    view.on_geometry_ready(100, 500);
    assert_eq!(view.scroll_offset_for(&7).unwrap(), Some(700));
    // Clamped so the last page stays full
    assert_eq!(view.scroll_offset_for(&19).unwrap(), Some(1500));
    assert!(matches!(
        view.scroll_offset_for(&99),
        Err(GridError::UnknownId(_))
    ));
}

#[test]
fn test_scroll_to_item_moves_container_and_window() {
    let mut view = view_with(GridConfig::with_columns(1), column_items(20));
    view.on_geometry_ready(100, 500);

    let pass = view.scroll_to_item(&7).unwrap();
    assert_eq!(pass.window(), Some(VisibleWindow::new(7, 12)));
    assert_eq!(view.container().scroll_offset, Some(700));
    assert_eq!(view.viewport().scroll_y, 700);
    assert!(view.instance(&12).is_some());
}

#[test]
fn test_item_at_point() {
    let defs = vec![
        CellDefinition::new(0u32, 2, 2),
        CellDefinition::new(1, 1, 1),
        CellDefinition::new(2, 1, 1),
    ];
    let mut view = view_with(GridConfig::with_columns(3), defs);
    assert_eq!(view.item_at(10, 10), None);

    view.on_geometry_ready(300, 300);
    assert_eq!(view.item_at(150, 150), Some(&0));
    assert_eq!(view.item_at(250, 50), Some(&1));
    assert_eq!(view.item_at(250, 150), Some(&2));
    assert_eq!(view.item_at(50, 250), None);
    assert_eq!(view.item_at(400, 50), None);
}
