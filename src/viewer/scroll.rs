//! Scroll handling for `GridView`.
//!
//! Includes the visibility pass that retires and realizes cells, and
//! scroll-to-item offsets.

use std::fmt::Debug;
use std::hash::Hash;

use tracing::trace;

use super::{GridView, RenderPass};
use crate::error::{GridError, Result};
use crate::render::{Acquired, CellAdapter, GridContainer};

impl<K, A, C> GridView<K, A, C>
where
    K: Clone + Eq + Hash + Debug,
    A: CellAdapter<K>,
    C: GridContainer<Instance = A::Instance>,
{
    /// Scroll position changed
    pub fn on_scroll(&mut self, offset_y: u32) -> RenderPass {
        self.viewport.set_scroll(offset_y);
        self.render_visible()
    }

    /// Scroll offset that brings the top row of `id` to the top of the
    /// viewport, clamped to the scrollable range. `None` while geometry is
    /// unknown.
    ///
    /// # Errors
    /// Returns an error if `id` has no definition.
    pub fn scroll_offset_for(&self, id: &K) -> Result<Option<u32>> {
        let cell = self
            .grid
            .get(id)
            .ok_or_else(|| GridError::UnknownId(format!("{id:?}")))?;
        Ok(self.geometry.map(|geometry| {
            geometry
                .row_offset(cell.row_start)
                .min(self.viewport.max_scroll(geometry.content_height()))
        }))
    }

    /// Scroll the container so `id` is at the top and render the new window.
    ///
    /// # Errors
    /// Returns an error if `id` has no definition.
    pub fn scroll_to_item(&mut self, id: &K) -> Result<RenderPass> {
        let Some(offset) = self.scroll_offset_for(id)? else {
            return Ok(RenderPass::Deferred);
        };
        self.container.set_scroll_offset(offset);
        Ok(self.on_scroll(offset))
    }

    /// Realize the cells intersecting the current window.
    ///
    /// Skipped when the window is contained in the previously recorded one.
    pub(crate) fn render_visible(&mut self) -> RenderPass {
        let Some(geometry) = self.geometry else {
            return RenderPass::Deferred;
        };
        let Some(window) = self.viewport.visible_window(&geometry) else {
            return RenderPass::Deferred;
        };
        let previous = self.window.replace(window);
        if previous.is_some_and(|prev| prev.contains(&window)) {
            trace!(?window, "visible window unchanged");
            return RenderPass::Unchanged(window);
        }

        let diff = self.cache.plan(&self.grid, window);
        self.cache.retire(&diff.retired);

        let mut created = 0;
        let mut reused = 0;
        for id in &diff.realized {
            let Some(cell) = self.grid.get(id) else {
                continue;
            };
            let (instance, view_type, origin) = self.cache.acquire(id, &mut self.adapter);
            match origin {
                Acquired::Created => created += 1,
                Acquired::Reused(_) => reused += 1,
            }
            self.container.place(&instance, &geometry.cell_frame(cell));
            self.cache.insert(id.clone(), instance, view_type);
        }

        trace!(
            ?window,
            retired = diff.retired.len(),
            created,
            reused,
            "visible window updated"
        );
        RenderPass::Updated {
            window,
            retired: diff.retired.len(),
            created,
            reused,
        }
    }
}
