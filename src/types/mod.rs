//! Data types for grid items and configuration.

mod config;
mod definition;

pub use config::*;
pub use definition::*;
