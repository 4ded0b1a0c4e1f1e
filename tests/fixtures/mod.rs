//! Test fixtures: a recording adapter and container plus item generators.
//!
//! The adapter hands out numbered instances and logs every create and bind;
//! the container logs every call the view makes on it, so tests can assert on
//! exactly which cells were touched by a render pass.
//!
//! # Example
//!
//! ```rust
//! use fixtures::{column_items, view_with};
//!
//! let mut view = view_with(GridConfig::with_columns(1), column_items(20));
//! view.on_geometry_ready(100, 500);
//! ```
#![allow(
    dead_code,
    clippy::unwrap_used,
    clippy::expect_used,
    clippy::indexing_slicing,
    clippy::panic,
    clippy::cast_possible_truncation
)]

use std::collections::HashSet;

use spangrid::render::{CellAdapter, GridContainer, ViewType};
use spangrid::{CellDefinition, CellFrame, GridConfig, GridView};

// ============================================================================
// Recording Adapter
// ============================================================================

/// Numbered cell instance; the serial is unique per adapter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Tile {
    pub serial: u32,
    pub view_type: ViewType,
}

/// Adapter that records creations and binds
pub struct RecordingAdapter {
    pub created: Vec<Tile>,
    /// (instance serial, id) per bind call, in call order
    pub binds: Vec<(u32, u32)>,
    view_type_of: fn(&u32) -> ViewType,
}

impl RecordingAdapter {
    /// Every id uses the default view type
    pub fn new() -> Self {
        Self::with_view_types(|_| ViewType::DEFAULT)
    }

    pub fn with_view_types(view_type_of: fn(&u32) -> ViewType) -> Self {
        Self {
            created: Vec::new(),
            binds: Vec::new(),
            view_type_of,
        }
    }

    /// Id most recently bound to `serial`
    pub fn bound_id(&self, serial: u32) -> Option<u32> {
        self.binds
            .iter()
            .rev()
            .find(|(s, _)| *s == serial)
            .map(|(_, id)| *id)
    }

    pub fn reset_counts(&mut self) {
        self.created.clear();
        self.binds.clear();
    }
}

impl Default for RecordingAdapter {
    fn default() -> Self {
        Self::new()
    }
}

impl CellAdapter<u32> for RecordingAdapter {
    type Instance = Tile;

    fn view_type(&self, id: &u32) -> ViewType {
        (self.view_type_of)(id)
    }

    fn create_instance(&mut self, view_type: ViewType) -> Tile {
        let tile = Tile {
            serial: self.created.len() as u32 + 1,
            view_type,
        };
        self.created.push(tile);
        tile
    }

    fn bind(&mut self, instance: &mut Tile, id: &u32) {
        self.binds.push((instance.serial, *id));
    }
}

/// View type from the id's parity
pub fn parity(id: &u32) -> ViewType {
    ViewType(id % 2)
}

// ============================================================================
// Recording Container
// ============================================================================

/// Container that records every call made on it
#[derive(Debug, Default)]
pub struct RecordingContainer {
    pub content_size: Option<(u32, u32)>,
    pub scroll_offset: Option<u32>,
    pub placeholders: Vec<CellFrame>,
    /// (serial, frame) per place call, in call order
    pub placements: Vec<(u32, CellFrame)>,
    pub attached: HashSet<u32>,
    pub removed: Vec<u32>,
    pub clears: usize,
}

impl RecordingContainer {
    /// Frame of the latest placement of `serial`
    pub fn frame_of(&self, serial: u32) -> Option<CellFrame> {
        self.placements
            .iter()
            .rev()
            .find(|(s, _)| *s == serial)
            .map(|(_, frame)| *frame)
    }
}

impl GridContainer for RecordingContainer {
    type Instance = Tile;

    fn set_content_size(&mut self, width: u32, height: u32) {
        self.content_size = Some((width, height));
    }

    fn set_scroll_offset(&mut self, offset: u32) {
        self.scroll_offset = Some(offset);
    }

    fn add_placeholder(&mut self, frame: &CellFrame) {
        self.placeholders.push(*frame);
    }

    fn place(&mut self, instance: &Tile, frame: &CellFrame) {
        self.placements.push((instance.serial, *frame));
        self.attached.insert(instance.serial);
    }

    fn remove(&mut self, instance: &Tile) {
        self.removed.push(instance.serial);
        self.attached.remove(&instance.serial);
    }

    fn clear(&mut self) {
        self.clears += 1;
        self.placeholders.clear();
        self.attached.clear();
    }
}

// ============================================================================
// Views and Items
// ============================================================================

pub type TestView = GridView<u32, RecordingAdapter, RecordingContainer>;

/// View with a default-typed adapter loaded with `items`
pub fn view_with(config: GridConfig, items: Vec<CellDefinition<u32>>) -> TestView {
    view_with_adapter(config, RecordingAdapter::new(), items)
}

pub fn view_with_adapter(
    config: GridConfig,
    adapter: RecordingAdapter,
    items: Vec<CellDefinition<u32>>,
) -> TestView {
    let mut view = GridView::new(config, adapter, RecordingContainer::default()).unwrap();
    view.set_definitions(items).unwrap();
    view
}

/// `count` auto-placed 1x1 items with ids `0..count`
pub fn column_items(count: u32) -> Vec<CellDefinition<u32>> {
    (0..count).map(|id| CellDefinition::new(id, 1, 1)).collect()
}

/// Small deterministic generator (64-bit LCG) for reproducible item sets
pub struct Lcg(u64);

impl Lcg {
    pub fn new(seed: u64) -> Self {
        Self(seed.wrapping_mul(0x9E37_79B9_7F4A_7C15) | 1)
    }

    pub fn next_u32(&mut self) -> u32 {
        self.0 = self
            .0
            .wrapping_mul(6_364_136_223_846_793_005)
            .wrapping_add(1_442_695_040_888_963_407);
        (self.0 >> 33) as u32
    }

    /// Uniform-ish value in `low..=high`
    pub fn range(&mut self, low: u32, high: u32) -> u32 {
        low + self.next_u32() % (high - low + 1)
    }
}

/// `count` items with spans up to `max_span`; roughly one in `fixed_every`
/// is pinned somewhere inside `column_count` columns (0 disables pinning).
pub fn random_items(
    seed: u64,
    count: u32,
    column_count: u32,
    max_span: u32,
    fixed_every: u32,
) -> Vec<CellDefinition<u32>> {
    let mut rng = Lcg::new(seed);
    (0..count)
        .map(|id| {
            let row_span = rng.range(1, max_span);
            let col_span = rng.range(1, max_span.min(column_count));
            let def = CellDefinition::new(id, row_span, col_span);
            if fixed_every > 0 && rng.next_u32() % fixed_every == 0 {
                let col = rng.range(0, column_count - col_span);
                let row = rng.range(0, count / column_count + 1);
                def.at(row, col)
            } else {
                def
            }
        })
        .collect()
}

// ============================================================================
// JSON Fixtures
// ============================================================================

pub const BASIC_ITEMS: &str = include_str!("../../demos/basic.json");
pub const PREDEFINED_ITEMS: &str = include_str!("../../demos/predefined.json");
