//! # Codeflow
//!
//! Editor-state core of a node-based visual programming tool: blocks holding
//! code snippets live on a canvas, and each block pairs an in-block code
//! editor with an output display panel.
//!
//! ## Features
//! - Sequence-grouped undo/redo scoped to each editor (one unit per typed
//!   line, Ctrl+Z / Ctrl+Y)
//! - A two-state interaction mode broadcast to every view of the scene
//! - Block `source` / `stdout` / `image` properties mirrored into the editor
//!   buffer and the display surface
//! - Scene checkpoints recorded when an editor commits its buffer
//! - An explicit theme registry with subscribe/unsubscribe for editor styling

#![warn(missing_docs)]
#![deny(unsafe_code)]

mod app;
pub mod block;
pub mod editor;
pub mod scene;
pub mod theme;
mod types;

pub use app::CodeFlowApp;
pub use block::{Block, DisplaySurface};
pub use editor::{CodeEditor, KeyPress};
pub use scene::{Scene, SceneHistory, ViewObserver};
pub use theme::{SubscriptionId, Theme, ThemeRegistry};
pub use types::{BlockGeometry, BlockId, Mode, ViewId};

/// Runs the block editor application with default settings.
///
/// Initializes the egui application window and starts the main event loop.
///
/// # Returns
///
/// Returns `Ok(())` if the application runs successfully, or an
/// `eframe::Error` if initialization fails.
///
/// # Example
///
/// ```no_run
/// fn main() -> Result<(), eframe::Error> {
///     codeflow::run_app()
/// }
/// ```
pub fn run_app() -> Result<(), eframe::Error> {
    let options = eframe::NativeOptions::default();
    eframe::run_native(
        "Codeflow",
        options,
        Box::new(|_cc| Ok(Box::new(CodeFlowApp::default()))),
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_app_default() {
        let app = CodeFlowApp::default();
        assert!(app.blocks.is_empty());
        assert_eq!(app.scene.views.len(), 1);
        assert!(!app.scene.history.is_modified());
    }

    #[test]
    fn test_block_starts_with_consistent_geometry() {
        let block = Block::new("Block 1");
        assert!(block.geometry.is_consistent());
        assert_eq!(block.source(), "");
        assert_eq!(block.stdout(), "");
        assert_eq!(block.image(), "");
    }
}
