//! `GridView` - orchestrates packing, geometry and cell recycling against a
//! toolkit container.
//!
//! The view reacts to two serialized signals:
//! - geometry ready: the container's pixel size became known or changed
//! - scroll: the vertical scroll offset changed
//!
//! On geometry it sizes the columns, installs one placeholder per item (so
//! attaching or moving live cells never shifts sibling layout) and realizes the
//! visible window. On scroll it recomputes the window and only touches cells
//! when the new window is not contained in the previous one.

mod scroll;
mod shared;

#[cfg(target_arch = "wasm32")]
pub mod dom;

use std::fmt::Debug;
use std::hash::Hash;

use tracing::debug;

use crate::error::{GridError, Result};
use crate::layout::{pack, CellFrame, GridGeometry, PackedGrid, Viewport, VisibleWindow};
use crate::render::{CellAdapter, GridContainer, RecyclingCache};
use crate::types::{CellDefinition, GridConfig};

pub use shared::{SharedView, WeakView};

/// Outcome of one geometry or scroll event
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderPass {
    /// Geometry is not known yet; nothing was laid out
    Deferred,
    /// The new window lies inside the previous one; no cell was touched
    Unchanged(VisibleWindow),
    /// Cells were retired and realized for `window`
    Updated {
        window: VisibleWindow,
        /// Ids that left the window in this pass
        retired: usize,
        created: usize,
        reused: usize,
    },
}

impl RenderPass {
    /// Visible window after the pass, if geometry is known
    pub fn window(&self) -> Option<VisibleWindow> {
        match *self {
            Self::Deferred => None,
            Self::Unchanged(window) | Self::Updated { window, .. } => Some(window),
        }
    }

    /// True if no instance was created, reused or retired
    pub fn is_noop(&self) -> bool {
        matches!(self, Self::Deferred | Self::Unchanged(_))
    }
}

/// Virtualized spannable grid bound to one adapter and one container
pub struct GridView<K, A, C>
where
    A: CellAdapter<K>,
{
    config: GridConfig,
    adapter: A,
    container: C,
    /// Definitions as supplied, kept for repacking on column changes
    definitions: Vec<CellDefinition<K>>,
    grid: PackedGrid<K>,
    geometry: Option<GridGeometry>,
    /// Last size from the geometry signal
    container_size: Option<(u32, u32)>,
    viewport: Viewport,
    /// Window recorded by the last visibility pass
    window: Option<VisibleWindow>,
    cache: RecyclingCache<K, A::Instance>,
}

impl<K, A, C> GridView<K, A, C>
where
    K: Clone + Eq + Hash + Debug,
    A: CellAdapter<K>,
    C: GridContainer<Instance = A::Instance>,
{
    /// Create an empty view. Nothing is laid out until geometry arrives.
    ///
    /// # Errors
    /// Returns an error if `config.column_count` is zero.
    pub fn new(config: GridConfig, adapter: A, container: C) -> Result<Self> {
        if config.column_count == 0 {
            return Err(GridError::InvalidColumnCount(0));
        }
        Ok(Self {
            config,
            adapter,
            container,
            definitions: Vec::new(),
            grid: PackedGrid::empty(config.column_count),
            geometry: None,
            container_size: None,
            viewport: Viewport::default(),
            window: None,
            cache: RecyclingCache::new(),
        })
    }

    pub fn config(&self) -> &GridConfig {
        &self.config
    }

    pub fn grid(&self) -> &PackedGrid<K> {
        &self.grid
    }

    pub fn definitions(&self) -> &[CellDefinition<K>] {
        &self.definitions
    }

    /// Geometry of the current layout pass, `None` until the container has a usable size
    pub fn geometry(&self) -> Option<&GridGeometry> {
        self.geometry.as_ref()
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    /// Window recorded by the last visibility pass
    pub fn visible_window(&self) -> Option<VisibleWindow> {
        self.window
    }

    pub fn cache(&self) -> &RecyclingCache<K, A::Instance> {
        &self.cache
    }

    pub fn adapter(&self) -> &A {
        &self.adapter
    }

    pub fn adapter_mut(&mut self) -> &mut A {
        &mut self.adapter
    }

    pub fn container(&self) -> &C {
        &self.container
    }

    pub fn container_mut(&mut self) -> &mut C {
        &mut self.container
    }

    /// Instance currently realized for `id`
    pub fn instance(&self, id: &K) -> Option<&A::Instance> {
        self.cache.get(id)
    }

    /// Replace the item set: repack, drop all instances and re-render from row 0.
    ///
    /// # Errors
    /// Returns an error for zero spans or duplicate ids; the current layout is
    /// kept in that case.
    pub fn set_definitions(&mut self, definitions: Vec<CellDefinition<K>>) -> Result<RenderPass> {
        self.grid = pack(self.config.column_count, &definitions)?;
        self.definitions = definitions;
        self.viewport.set_scroll(0);
        self.container.set_scroll_offset(0);
        Ok(self.relayout())
    }

    /// Swap the adapter. Instances from the old adapter are dropped and the
    /// visible cells are rebuilt.
    pub fn set_adapter(&mut self, adapter: A) -> A {
        let previous = std::mem::replace(&mut self.adapter, adapter);
        self.relayout();
        previous
    }

    /// Change the requested column count and repack.
    ///
    /// # Errors
    /// Returns an error if `column_count` is zero.
    pub fn set_column_count(&mut self, column_count: u32) -> Result<RenderPass> {
        self.set_config(GridConfig {
            column_count,
            ..self.config
        })
    }

    /// Apply new options, repacking when the column count changed.
    ///
    /// # Errors
    /// Returns an error if the new column count is zero.
    pub fn set_config(&mut self, config: GridConfig) -> Result<RenderPass> {
        if config.column_count == 0 {
            return Err(GridError::InvalidColumnCount(0));
        }
        if config.column_count != self.config.column_count {
            self.grid = pack(config.column_count, &self.definitions)?;
        }
        self.config = config;
        Ok(self.relayout())
    }

    /// Container size became known or changed.
    ///
    /// A repeated signal with an unchanged size is ignored.
    pub fn on_geometry_ready(&mut self, width: u32, height: u32) -> RenderPass {
        if self.container_size == Some((width, height)) && self.geometry.is_some() {
            return self.window.map_or(RenderPass::Deferred, RenderPass::Unchanged);
        }
        self.container_size = Some((width, height));
        self.relayout()
    }

    /// Pixel frame of a live cell for `id`, `None` while geometry is unknown.
    ///
    /// # Errors
    /// Returns an error if `id` has no definition.
    pub fn frame_of(&self, id: &K) -> Result<Option<CellFrame>> {
        let cell = self
            .grid
            .get(id)
            .ok_or_else(|| GridError::UnknownId(format!("{id:?}")))?;
        Ok(self.geometry.map(|geometry| geometry.cell_frame(cell)))
    }

    /// Id of the item under a content-space point
    pub fn item_at(&self, x: u32, y: u32) -> Option<&K> {
        let (row, col) = self.geometry?.slot_at(x, y)?;
        self.grid.item_at(row, col).map(|cell| &cell.id)
    }

    /// Rebuild the whole layout pass: drop instances and placeholders, size the
    /// columns, install placeholders and realize the visible window.
    fn relayout(&mut self) -> RenderPass {
        self.discard_instances();
        self.container.clear();
        self.window = None;

        let Some((width, height)) = self.container_size else {
            debug!("container size unknown, deferring layout");
            self.geometry = None;
            return RenderPass::Deferred;
        };
        self.viewport.resize(width, height);
        self.geometry = GridGeometry::new(
            width,
            &self.config,
            self.grid.column_count,
            self.grid.row_count,
        );
        let Some(geometry) = self.geometry else {
            debug!(width, "columns would be zero pixels wide, deferring layout");
            return RenderPass::Deferred;
        };

        self.container
            .set_content_size(geometry.content_width(), geometry.content_height());
        for cell in self.grid.iter() {
            self.container
                .add_placeholder(&geometry.placeholder_frame(cell));
        }
        debug!(
            items = self.grid.len(),
            columns = geometry.column_count,
            column_width = geometry.column_width,
            rows = geometry.row_count,
            "grid laid out"
        );

        self.render_visible()
    }

    fn discard_instances(&mut self) {
        for (_, instance) in self.cache.drain() {
            self.container.remove(&instance);
        }
    }
}
