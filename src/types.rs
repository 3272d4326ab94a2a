//! Core data types for the code block editor.
//!
//! This module defines the identifiers, the editor interaction mode, and the
//! block panel geometry shared by the rest of the crate.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Unique identifier for blocks on the canvas.
pub type BlockId = Uuid;

/// Unique identifier for views observing a scene.
pub type ViewId = Uuid;

/// Interaction mode of a code editor.
///
/// The mode is broadcast to every view of the owning scene so that all views
/// agree on which editor (if any) is currently receiving input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum Mode {
    /// Idle: input events pass through to the canvas
    #[default]
    Noop,
    /// The editor is actively receiving keyboard input
    Editing,
}

/// Vertical layout of a block: a title bar, a source editor panel and an
/// output display panel stacked inside the block's total height.
///
/// The following holds after every call to [`BlockGeometry::layout`]:
///
/// `output_panel_height + source_panel_height + 2 * edge_size + title_height == height`
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BlockGeometry {
    /// Total block height
    pub height: f32,
    /// Height of the title bar
    pub title_height: f32,
    /// Thickness of the block border (applied top and bottom)
    pub edge_size: f32,
    /// Height allocated to the output display panel
    pub output_panel_height: f32,
    /// Height allocated to the source editor panel
    pub source_panel_height: f32,
    /// Smallest allowed output panel height
    pub min_output_panel_height: f32,
    /// Smallest allowed source panel height
    pub min_source_panel_height: f32,
}

impl Default for BlockGeometry {
    fn default() -> Self {
        let mut geometry = Self {
            height: 300.0,
            title_height: 24.0,
            edge_size: 2.0,
            output_panel_height: 100.0,
            source_panel_height: 0.0,
            min_output_panel_height: 20.0,
            min_source_panel_height: 20.0,
        };
        geometry.layout();
        geometry
    }
}

impl BlockGeometry {
    /// Re-establishes the layout invariant after a height or panel mutation.
    ///
    /// The output panel is clamped to its minimum and to the available space;
    /// the source panel receives whatever remains. If the two minimums do not
    /// fit in the current height, the block grows.
    pub fn layout(&mut self) {
        let fixed = self.title_height + 2.0 * self.edge_size;
        let min_height = fixed + self.min_output_panel_height + self.min_source_panel_height;
        if self.height < min_height {
            self.height = min_height;
        }
        let available = self.height - fixed;
        self.output_panel_height = self.output_panel_height.clamp(
            self.min_output_panel_height,
            available - self.min_source_panel_height,
        );
        self.source_panel_height = available - self.output_panel_height;
    }

    /// Returns true if the layout invariant currently holds.
    pub fn is_consistent(&self) -> bool {
        let sum = self.output_panel_height
            + self.source_panel_height
            + 2.0 * self.edge_size
            + self.title_height;
        (sum - self.height).abs() < f32::EPSILON * self.height.max(1.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_default_is_noop() {
        assert_eq!(Mode::default(), Mode::Noop);
    }

    #[test]
    fn test_default_geometry_is_consistent() {
        let geometry = BlockGeometry::default();
        assert!(geometry.is_consistent());
        assert!(geometry.source_panel_height >= geometry.min_source_panel_height);
    }

    #[test]
    fn test_layout_after_height_change() {
        let mut geometry = BlockGeometry::default();
        geometry.height = 500.0;
        geometry.layout();
        assert!(geometry.is_consistent());
    }

    #[test]
    fn test_layout_clamps_output_panel() {
        let mut geometry = BlockGeometry::default();
        geometry.output_panel_height = 5000.0;
        geometry.layout();
        assert!(geometry.is_consistent());
        assert!(geometry.source_panel_height >= geometry.min_source_panel_height);
    }

    #[test]
    fn test_layout_grows_undersized_block() {
        let mut geometry = BlockGeometry::default();
        geometry.height = 10.0;
        geometry.layout();
        assert!(geometry.is_consistent());
        assert!(geometry.output_panel_height >= geometry.min_output_panel_height);
        assert!(geometry.source_panel_height >= geometry.min_source_panel_height);
    }
}
