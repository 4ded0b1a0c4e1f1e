//! Greedy bin-packing of spanning items into a fixed-column grid.
//!
//! Fixed items (both coordinates supplied) are placed first as obstacles. Auto
//! items are then placed in input order, each at the first row (top to bottom)
//! whose first free column can hold the item's whole rectangle. A fixed item
//! that collides with an earlier fixed item is demoted to auto placement and
//! queued just before the next auto item that followed it in the input.

use std::collections::{BTreeMap, HashMap};
use std::fmt::Debug;
use std::hash::Hash;

use serde::Serialize;
use tracing::{debug, trace};

use crate::error::{GridError, Result};
use crate::types::{CellDefinition, GridCell, PlacementKind};

/// Result of packing one definition set.
///
/// `cells` keeps the input order; ids are unique.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PackedGrid<K> {
    /// Effective column count (at least the requested count)
    pub column_count: u32,
    /// Number of occupied rows (max `max_row` over all cells)
    pub row_count: u32,
    pub cells: Vec<GridCell<K>>,
    #[serde(skip)]
    index: HashMap<K, usize>,
}

impl<K: Eq + Hash> PackedGrid<K> {
    /// A grid with no items
    pub fn empty(column_count: u32) -> Self {
        Self {
            column_count,
            row_count: 0,
            cells: Vec::new(),
            index: HashMap::new(),
        }
    }

    pub fn len(&self) -> usize {
        self.cells.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cells.is_empty()
    }

    /// Look up a resolved cell by id
    pub fn get(&self, id: &K) -> Option<&GridCell<K>> {
        self.index.get(id).and_then(|&i| self.cells.get(i))
    }

    pub fn contains(&self, id: &K) -> bool {
        self.index.contains_key(id)
    }

    /// Cell occupying the grid slot (row, col), if any
    pub fn item_at(&self, row: u32, col: u32) -> Option<&GridCell<K>> {
        self.cells.iter().find(|cell| cell.contains(row, col))
    }

    pub fn iter(&self) -> std::slice::Iter<'_, GridCell<K>> {
        self.cells.iter()
    }
}

/// Pack `definitions` into a grid of at least `column_count` columns.
///
/// Every definition receives a placement; none is dropped. The grid is widened
/// to the right edge of the widest fixed item and the widest auto item.
///
/// # Errors
/// Returns an error for a zero column count, a zero span, or a duplicated id.
pub fn pack<K>(column_count: u32, definitions: &[CellDefinition<K>]) -> Result<PackedGrid<K>>
where
    K: Clone + Eq + Hash + Debug,
{
    if column_count == 0 {
        return Err(GridError::InvalidColumnCount(column_count));
    }

    let mut index = HashMap::with_capacity(definitions.len());
    for (i, def) in definitions.iter().enumerate() {
        if def.row_span == 0 || def.col_span == 0 {
            return Err(GridError::InvalidSpan {
                id: format!("{:?}", def.id),
                row_span: def.row_span,
                col_span: def.col_span,
            });
        }
        if index.insert(def.id.clone(), i).is_some() {
            return Err(GridError::DuplicateId(format!("{:?}", def.id)));
        }
    }

    let mut fixed = Vec::new();
    let mut auto = Vec::new();
    for (i, def) in definitions.iter().enumerate() {
        match def.fixed_origin() {
            Some(origin) => fixed.push((i, def, origin)),
            None => auto.push((i, PlacementKind::Auto)),
        }
    }

    let columns = fixed
        .iter()
        .map(|(_, def, (_, col))| col.saturating_add(def.col_span))
        .chain(definitions.iter().filter(|d| !d.is_fixed()).map(|d| d.col_span))
        .fold(column_count, u32::max);
    let seed_rows = fixed
        .iter()
        .map(|(_, def, (row, _))| row.saturating_add(def.row_span))
        .max()
        .unwrap_or(1);

    let mut grid = Occupancy::new(columns, seed_rows);
    let mut placements: Vec<Option<(u32, u32, PlacementKind)>> = vec![None; definitions.len()];

    for &(i, def, (row, col)) in &fixed {
        if grid.can_fit(row, col, def.row_span, def.col_span) {
            grid.occupy(row, col, def.row_span, def.col_span);
            if let Some(slot) = placements.get_mut(i) {
                *slot = Some((row, col, PlacementKind::Fixed));
            }
            continue;
        }

        debug!(id = ?def.id, row, col, "fixed placement conflicts, falling back to auto placement");
        let anchor = definitions
            .iter()
            .enumerate()
            .skip(i + 1)
            .find(|(_, d)| !d.is_fixed())
            .map(|(j, _)| j);
        let at = anchor
            .and_then(|j| auto.iter().position(|&(k, _)| k == j))
            .unwrap_or(auto.len());
        auto.insert(at, (i, PlacementKind::Fallback));
    }

    for (i, kind) in auto {
        let Some(def) = definitions.get(i) else {
            continue;
        };
        let (row, col) = grid.find_slot(def.row_span, def.col_span);
        trace!(id = ?def.id, row, col, "auto placed");
        grid.occupy(row, col, def.row_span, def.col_span);
        if let Some(slot) = placements.get_mut(i) {
            *slot = Some((row, col, kind));
        }
    }

    let cells: Vec<GridCell<K>> = definitions
        .iter()
        .zip(placements)
        .filter_map(|(def, placement)| {
            placement.map(|(row_start, col_start, placement)| GridCell {
                id: def.id.clone(),
                row_start,
                col_start,
                row_span: def.row_span,
                col_span: def.col_span,
                placement,
            })
        })
        .collect();
    let row_count = cells.iter().map(GridCell::max_row).max().unwrap_or(0);

    debug!(
        items = cells.len(),
        columns,
        rows = row_count,
        "packed grid"
    );

    Ok(PackedGrid {
        column_count: columns,
        row_count,
        cells,
        index,
    })
}

/// Occupied column intervals `[start, end)`, sorted and disjoint
type Spans = Vec<(u32, u32)>;

fn spans_free(spans: &[(u32, u32)], col: u32, end: u32) -> bool {
    spans.iter().all(|&(s, e)| e <= col || end <= s)
}

fn first_free(spans: &[(u32, u32)], columns: u32) -> Option<u32> {
    let mut col = 0;
    for &(s, e) in spans {
        if s > col {
            break;
        }
        col = col.max(e);
    }
    (col < columns).then_some(col)
}

fn insert_span(spans: &mut Spans, col: u32, end: u32) {
    spans.push((col, end));
    spans.sort_unstable();
    let mut merged: Spans = Vec::with_capacity(spans.len());
    for &(s, e) in spans.iter() {
        match merged.last_mut() {
            Some(last) if s <= last.1 => last.1 = last.1.max(e),
            _ => merged.push((s, e)),
        }
    }
    *spans = merged;
}

/// Sparse occupancy map.
///
/// Consecutive rows with identical occupancy share one band, keyed by its
/// first row. Rows outside every band are empty, so far-away coordinates and
/// tall spans cost one band each.
struct Occupancy {
    columns: u32,
    /// Rows at or past this count as free
    bottom: u32,
    /// first row -> (end row, occupied spans)
    bands: BTreeMap<u32, (u32, Spans)>,
}

impl Occupancy {
    fn new(columns: u32, rows: u32) -> Self {
        Self {
            columns,
            bottom: rows,
            bands: BTreeMap::new(),
        }
    }

    /// Bands intersecting rows `[row, end)`
    fn bands_in(&self, row: u32, end: u32) -> impl Iterator<Item = (&u32, &(u32, Spans))> + '_ {
        self.bands
            .range(..row)
            .next_back()
            .filter(|(_, (band_end, _))| *band_end > row)
            .into_iter()
            .chain(self.bands.range(row..end))
    }

    fn can_fit(&self, row: u32, col: u32, row_span: u32, col_span: u32) -> bool {
        let right = col.saturating_add(col_span);
        if right > self.columns {
            return false;
        }
        self.bands_in(row, row.saturating_add(row_span))
            .all(|(_, (_, spans))| spans_free(spans, col, right))
    }

    /// Make `row` the first row of a band if it falls inside one.
    fn split_at(&mut self, row: u32) {
        let Some((start, end, spans)) = self
            .bands
            .range(..row)
            .next_back()
            .filter(|(_, (end, _))| *end > row)
            .map(|(start, (end, spans))| (*start, *end, spans.clone()))
        else {
            return;
        };
        self.bands.insert(start, (row, spans.clone()));
        self.bands.insert(row, (end, spans));
    }

    fn occupy(&mut self, row: u32, col: u32, row_span: u32, col_span: u32) {
        let end = row.saturating_add(row_span);
        let right = col.saturating_add(col_span);
        self.split_at(row);
        self.split_at(end);

        let mut gaps = Vec::new();
        let mut cursor = row;
        for (&start, &(band_end, _)) in self.bands.range(row..end) {
            if start > cursor {
                gaps.push((cursor, start));
            }
            cursor = band_end;
        }
        if cursor < end {
            gaps.push((cursor, end));
        }
        for (start, band_end) in gaps {
            self.bands.insert(start, (band_end, Vec::new()));
        }

        for (_, (_, spans)) in self.bands.range_mut(row..end) {
            insert_span(spans, col, right);
        }
        self.bottom = self.bottom.max(end);
    }

    /// First row whose first free column fits the item, else a fresh row at the bottom.
    ///
    /// Every row of a band (or of an empty run) has the same first free column,
    /// and a lower start row only covers fewer rows below, so testing the first
    /// row of each run is enough.
    fn find_slot(&self, row_span: u32, col_span: u32) -> (u32, u32) {
        let mut cursor = 0;
        for (&start, (end, spans)) in &self.bands {
            if start >= self.bottom {
                break;
            }
            if cursor < start && self.can_fit(cursor, 0, row_span, col_span) {
                return (cursor, 0);
            }
            if let Some(col) = first_free(spans, self.columns) {
                if self.can_fit(start, col, row_span, col_span) {
                    return (start, col);
                }
            }
            cursor = *end;
        }
        if cursor < self.bottom && self.can_fit(cursor, 0, row_span, col_span) {
            return (cursor, 0);
        }
        (self.bottom, 0)
    }
}

#[cfg(test)]
#[allow(
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic
)]
mod tests {
    use super::*;

    fn origin(grid: &PackedGrid<u32>, id: u32) -> (u32, u32) {
        let cell = grid.get(&id).unwrap();
        (cell.row_start, cell.col_start)
    }

    #[test]
    fn test_single_column_stacks_rows() {
        let defs = vec![CellDefinition::new(0u32, 1, 1), CellDefinition::new(1, 1, 1)];
        let grid = pack(1, &defs).unwrap();

        assert_eq!(origin(&grid, 0), (0, 0));
        assert_eq!(origin(&grid, 1), (1, 0));
        assert_eq!(grid.row_count, 2);
        assert_eq!(grid.column_count, 1);
    }

    #[test]
    fn test_auto_items_fill_first_free_column() {
        // 3 columns: a 2x2 block, then two 1x1 items that fit beside it
        let defs = vec![
            CellDefinition::new(0u32, 2, 2),
            CellDefinition::new(1, 1, 1),
            CellDefinition::new(2, 1, 1),
            CellDefinition::new(3, 1, 3),
        ];
        let grid = pack(3, &defs).unwrap();

        assert_eq!(origin(&grid, 0), (0, 0));
        assert_eq!(origin(&grid, 1), (0, 2));
        assert_eq!(origin(&grid, 2), (1, 2));
        assert_eq!(origin(&grid, 3), (2, 0));
        assert_eq!(grid.row_count, 3);
    }

    #[test]
    fn test_first_free_column_only_is_tested_per_row() {
        // Row 0 has columns 1 and 3 free; a 1x2 item cannot sit at column 1
        // (column 2 is taken), so it drops to the next row.
        let defs = vec![
            CellDefinition::fixed(0u32, 1, 1, 0, 0),
            CellDefinition::fixed(1, 1, 1, 0, 2),
            CellDefinition::new(2, 1, 2),
            CellDefinition::new(3, 1, 1),
        ];
        let grid = pack(4, &defs).unwrap();

        assert_eq!(origin(&grid, 2), (1, 0));
        // The 1x1 item back-fills the hole left in row 0
        assert_eq!(origin(&grid, 3), (0, 1));
    }

    #[test]
    fn test_auto_items_fill_holes_above_fixed_items() {
        let defs = vec![
            CellDefinition::fixed(0u32, 1, 2, 2, 0),
            CellDefinition::new(1, 2, 2),
            CellDefinition::new(2, 1, 2),
        ];
        let grid = pack(2, &defs).unwrap();

        assert_eq!(origin(&grid, 0), (2, 0));
        assert_eq!(origin(&grid, 1), (0, 0));
        assert_eq!(origin(&grid, 2), (3, 0));
    }

    #[test]
    fn test_tall_item_spills_past_seeded_rows() {
        let defs = vec![CellDefinition::new(0u32, 3, 1), CellDefinition::new(1, 2, 1)];
        let grid = pack(2, &defs).unwrap();

        assert_eq!(origin(&grid, 0), (0, 0));
        assert_eq!(origin(&grid, 1), (0, 1));
        assert_eq!(grid.row_count, 3);
    }

    #[test]
    fn test_conflicting_fixed_item_is_queued_before_next_auto_item() {
        let defs = vec![
            CellDefinition::new(0u32, 1, 1),
            CellDefinition::fixed(1, 1, 2, 0, 0),
            CellDefinition::fixed(2, 1, 1, 0, 1),
            CellDefinition::new(3, 1, 1),
            CellDefinition::new(4, 1, 1),
        ];
        let grid = pack(2, &defs).unwrap();

        assert_eq!(grid.get(&1).unwrap().placement, PlacementKind::Fixed);
        assert_eq!(grid.get(&2).unwrap().placement, PlacementKind::Fallback);
        // Auto order: 0, (2 before 3), 3, 4
        assert_eq!(origin(&grid, 0), (1, 0));
        assert_eq!(origin(&grid, 2), (1, 1));
        assert_eq!(origin(&grid, 3), (2, 0));
        assert_eq!(origin(&grid, 4), (2, 1));
    }

    #[test]
    fn test_conflicting_fixed_item_without_later_auto_item_is_kept() {
        let defs = vec![
            CellDefinition::new(0u32, 1, 1),
            CellDefinition::fixed(1, 1, 1, 0, 0),
            CellDefinition::fixed(2, 1, 1, 0, 0),
        ];
        let grid = pack(1, &defs).unwrap();

        assert_eq!(grid.len(), 3);
        assert_eq!(origin(&grid, 1), (0, 0));
        assert_eq!(origin(&grid, 0), (1, 0));
        assert_eq!(origin(&grid, 2), (2, 0));
        assert_eq!(grid.get(&2).unwrap().placement, PlacementKind::Fallback);
    }

    #[test]
    fn test_grid_widens_for_wide_items() {
        let defs = vec![
            CellDefinition::fixed(0u32, 1, 2, 0, 3),
            CellDefinition::new(1, 1, 4),
        ];
        let grid = pack(2, &defs).unwrap();
        assert_eq!(grid.column_count, 5);

        let defs = vec![CellDefinition::new(0u32, 1, 4)];
        assert_eq!(pack(2, &defs).unwrap().column_count, 4);
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            pack::<u32>(0, &[]),
            Err(GridError::InvalidColumnCount(0))
        ));
        assert!(matches!(
            pack(2, &[CellDefinition::new(0u32, 0, 1)]),
            Err(GridError::InvalidSpan { row_span: 0, .. })
        ));
        assert!(matches!(
            pack(2, &[CellDefinition::new(0u32, 1, 1), CellDefinition::new(0, 1, 1)]),
            Err(GridError::DuplicateId(_))
        ));
    }

    #[test]
    fn test_item_at_and_empty_grid() {
        let grid = pack::<u32>(3, &[]).unwrap();
        assert!(grid.is_empty());
        assert_eq!(grid.row_count, 0);

        let defs = vec![CellDefinition::new(9u32, 2, 2)];
        let grid = pack(3, &defs).unwrap();
        assert_eq!(grid.item_at(1, 1).map(|c| c.id), Some(9));
        assert!(grid.item_at(0, 2).is_none());
    }

    #[test]
    fn test_far_coordinates_stay_sparse() {
        let defs = vec![
            CellDefinition::fixed(0u32, 1, 1, 3_000_000_000, 0),
            CellDefinition::new(1, 1, 1),
        ];
        let grid = pack(1, &defs).unwrap();
        assert_eq!(origin(&grid, 0), (3_000_000_000, 0));
        assert_eq!(origin(&grid, 1), (0, 0));
        assert_eq!(grid.row_count, 3_000_000_001);

        let defs = vec![
            CellDefinition::fixed(0u32, 1, 1, 0, 3_000_000_000),
            CellDefinition::new(1, 1, 1),
        ];
        let grid = pack(1, &defs).unwrap();
        assert_eq!(grid.column_count, 3_000_000_001);
        assert_eq!(origin(&grid, 1), (0, 0));
    }

    #[test]
    fn test_occupancy_bands_split_and_fill() {
        let mut grid = Occupancy::new(4, 1);
        grid.occupy(0, 0, 10, 2);
        grid.occupy(4, 2, 1, 2);
        assert_eq!(grid.bands.len(), 3);
        assert!(!grid.can_fit(3, 2, 2, 1));
        assert!(grid.can_fit(5, 2, 5, 2));
        // Rows 0..4 keep columns 2..4 free; a 5-tall item there would hit row 4
        assert_eq!(grid.find_slot(5, 2), (5, 2));
        assert_eq!(grid.find_slot(4, 2), (0, 2));
        assert_eq!(grid.find_slot(1, 3), (10, 0));
    }
}
