//! Layout engine for packing items and tracking the visible window.
//!
//! This module handles:
//! - Packing spanning items into a column grid (fixed and auto placement)
//! - Pixel geometry of resolved cells (gaps, padding, right-to-left)
//! - Viewport state and the visible row range

mod geometry;
mod packer;
mod viewport;

pub use geometry::{CellFrame, GridGeometry};
pub use packer::{pack, PackedGrid};
pub use viewport::{visible_row_range, Viewport, VisibleWindow};
