//! Realizing visible cells through pluggable toolkit capabilities.
//!
//! This module provides:
//! - The adapter/container traits the grid drives
//! - The id-keyed recycling cache of cell instances

pub mod backend;
pub mod recycler;

pub use backend::{CellAdapter, GridContainer, ViewType};
pub use recycler::{Acquired, RecyclingCache, VisibilityDiff};
