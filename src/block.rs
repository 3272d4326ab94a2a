//! Code blocks: a source editor panel on top of an output display panel.
//!
//! A block owns one [`CodeEditor`] and one [`DisplaySurface`]. Its `source`,
//! `stdout` and `image` properties mirror into the editor buffer and the
//! display; the setter semantics (in particular the asymmetric clearing
//! between `stdout` and `image`) are part of the block's public contract.

use crate::editor::CodeEditor;
use crate::scene::Scene;
use crate::theme::ThemeRegistry;
use crate::types::{BlockGeometry, BlockId};
use base64::Engine;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Label recorded in scene history when an editor commits its buffer.
const SOURCE_UPDATED_LABEL: &str = "A code block source was updated";

/// Output area of a block, showing either text or a decoded bitmap.
///
/// Pixel decoding of the bitmap payload is the renderer's job; the surface
/// only keeps the raw bytes.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DisplaySurface {
    text: String,
    #[serde(skip)]
    image_bytes: Option<Vec<u8>>,
}

impl DisplaySurface {
    /// Text currently shown.
    pub fn text(&self) -> &str {
        &self.text
    }

    /// Decoded bitmap payload currently shown, if any.
    pub fn image_bytes(&self) -> Option<&[u8]> {
        self.image_bytes.as_deref()
    }

    /// Shows text, discarding any bitmap.
    pub fn show_text(&mut self, text: &str) {
        self.text = text.to_string();
        self.image_bytes = None;
    }

    /// Shows a base64-encoded bitmap, discarding the text.
    ///
    /// A malformed payload leaves the surface unchanged.
    pub fn show_image(&mut self, base64_payload: &str) {
        match base64::engine::general_purpose::STANDARD.decode(base64_payload) {
            Ok(bytes) => {
                self.text.clear();
                self.image_bytes = Some(bytes);
            }
            Err(err) => {
                log::warn!("ignoring malformed image payload: {err}");
            }
        }
    }
}

/// A code block on the canvas.
#[derive(Debug, Serialize, Deserialize)]
pub struct Block {
    /// Unique identifier for this block
    pub id: BlockId,
    /// User-displayable block title
    pub title: String,
    /// Panel layout of the block
    pub geometry: BlockGeometry,
    /// Output area below the source editor
    pub display: DisplaySurface,
    source: String,
    stdout: String,
    image: String,
    /// Present once `init_editor` ran; property setters called earlier only
    /// touch the stored values
    #[serde(skip)]
    editor: Option<CodeEditor>,
}

impl Block {
    /// Creates a block without an editor; call [`Block::init_editor`] once a
    /// theme registry is available.
    pub fn new(title: &str) -> Self {
        Self {
            id: Uuid::new_v4(),
            title: title.to_string(),
            geometry: BlockGeometry::default(),
            display: DisplaySurface::default(),
            source: String::new(),
            stdout: String::new(),
            image: String::new(),
            editor: None,
        }
    }

    /// Constructs the source editor, seeding it with the current `source`.
    pub fn init_editor(&mut self, themes: &mut ThemeRegistry) {
        self.editor = Some(CodeEditor::new(&self.source, themes));
    }

    /// Tears the editor down, releasing its theme subscription.
    pub fn drop_editor(&mut self, themes: &mut ThemeRegistry) {
        if let Some(mut editor) = self.editor.take() {
            editor.teardown(themes);
        }
    }

    /// The source editor, if constructed.
    pub fn editor(&self) -> Option<&CodeEditor> {
        self.editor.as_ref()
    }

    /// Mutable access to the source editor, if constructed.
    pub fn editor_mut(&mut self) -> Option<&mut CodeEditor> {
        self.editor.as_mut()
    }

    /// Source code of the block.
    pub fn source(&self) -> &str {
        &self.source
    }

    /// Sets the source code, overwriting the editor buffer if the editor
    /// exists.
    pub fn set_source(&mut self, value: &str) {
        self.source = value.to_string();
        if let Some(editor) = self.editor.as_mut() {
            editor.set_text(value);
        }
    }

    /// Text output of the block's code. Also carries stderr.
    pub fn stdout(&self) -> &str {
        &self.stdout
    }

    /// Sets the text output: clears `image` and shows the text on the
    /// display.
    pub fn set_stdout(&mut self, value: &str) {
        self.stdout = value.to_string();
        if self.editor.is_some() {
            self.image = String::new();
            self.display.show_text(&self.stdout);
        }
    }

    /// Base64-encoded image output of the block's code.
    pub fn image(&self) -> &str {
        &self.image
    }

    /// Sets the image output: a non-empty value clears the displayed text
    /// and renders the bitmap. An empty value leaves the display as
    /// configured by the last meaningful set.
    ///
    /// Note the asymmetry with [`Block::set_stdout`]: that setter always
    /// clears `image`, this one never touches `stdout`. Callers should not
    /// set both in one logical update.
    pub fn set_image(&mut self, value: &str) {
        self.image = value.to_string();
        if self.editor.is_some() && !self.image.is_empty() {
            self.display.show_image(&self.image);
        }
    }

    /// Serialize the block to a JSON string.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize a block from a JSON string. The editor is not part of the
    /// payload; call [`Block::init_editor`] afterwards.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Commits the editor buffer after a focus loss.
    ///
    /// Runs the editor's focus-out handling (close the undo sequence, mode
    /// back to noop, broadcast), then performs exactly one `source` write and
    /// one scene checkpoint, in that order.
    pub fn sync_on_focus_out(&mut self, scene: &mut Scene) {
        let Some(editor) = self.editor.as_mut() else {
            return;
        };
        editor.focus_out(scene);
        self.source = editor.text().to_string();
        scene.history.checkpoint(SOURCE_UPDATED_LABEL, true);
    }
}
