//! Capabilities the grid needs from the surrounding toolkit.
//!
//! A `CellAdapter` creates and binds opaque cell instances per item id; a
//! `GridContainer` attaches and positions them. Implementations exist for the
//! browser DOM (`viewer::dom`) and for tests.

use serde::{Deserialize, Serialize};

use crate::layout::CellFrame;

/// Reuse-compatibility tag for cell instances.
///
/// An instance created for one view type is only ever rebound to ids of the
/// same view type.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct ViewType(pub u32);

impl ViewType {
    pub const DEFAULT: ViewType = ViewType(0);
}

/// Creates and refreshes cell instances for item ids
pub trait CellAdapter<K> {
    /// Opaque handle to one displayed cell
    type Instance;

    /// Classification of `id` for instance reuse
    fn view_type(&self, _id: &K) -> ViewType {
        ViewType::DEFAULT
    }

    /// Allocate a fresh instance for `view_type`
    fn create_instance(&mut self, view_type: ViewType) -> Self::Instance;

    /// Populate or refresh `instance` with the content of `id`
    fn bind(&mut self, instance: &mut Self::Instance, id: &K);
}

/// Scrollable surface holding absolutely positioned cells
pub trait GridContainer {
    type Instance;

    /// Total scrollable content size in pixels
    fn set_content_size(&mut self, width: u32, height: u32);

    /// Move the scroll position (used when the item set is replaced)
    fn set_scroll_offset(&mut self, offset: u32);

    /// Add an invisible box reserving `frame`
    fn add_placeholder(&mut self, frame: &CellFrame);

    /// Attach `instance` at `frame`, or move it there if already attached
    fn place(&mut self, instance: &Self::Instance, frame: &CellFrame);

    /// Detach `instance` without destroying it
    fn remove(&mut self, instance: &Self::Instance);

    /// Drop every placeholder and attached instance
    fn clear(&mut self);
}
