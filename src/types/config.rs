use serde::{Deserialize, Serialize};

/// Grid options recognized by [`crate::viewer::GridView`]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct GridConfig {
    /// Requested number of columns. The packer may widen the grid to fit the
    /// widest item.
    pub column_count: u32,
    /// Gap between cells in pixels
    pub cell_gap: u32,
    /// Inset the content by `cell_gap` on the top and leading edge, and keep
    /// trailing gaps on edge cells
    pub side_padding: bool,
    /// Mirror column indices so column 0 is on the right
    pub right_to_left: bool,
}

impl Default for GridConfig {
    fn default() -> Self {
        Self {
            column_count: 1,
            cell_gap: 0,
            side_padding: true,
            right_to_left: false,
        }
    }
}

impl GridConfig {
    pub fn with_columns(column_count: u32) -> Self {
        Self {
            column_count,
            ..Self::default()
        }
    }

    /// Gap applied at the top and leading edge (0 without side padding)
    pub fn side_gap(&self) -> u32 {
        if self.side_padding {
            self.cell_gap
        } else {
            0
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_json_uses_defaults() {
        let config: GridConfig = serde_json::from_str(r#"{"columnCount":4,"cellGap":8}"#).unwrap();
        assert_eq!(config.column_count, 4);
        assert_eq!(config.cell_gap, 8);
        assert!(config.side_padding);
        assert!(!config.right_to_left);
        assert_eq!(config.side_gap(), 8);
    }

    #[test]
    fn test_side_gap_disabled() {
        let config = GridConfig {
            cell_gap: 6,
            side_padding: false,
            ..GridConfig::default()
        };
        assert_eq!(config.side_gap(), 0);
    }
}
