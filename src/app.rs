//! Thin egui shell hosting code blocks.
//!
//! The shell renders each block's buffer and output panel and translates raw
//! egui input (pointer presses, key events, scroll deltas) into calls on the
//! headless editor. egui's own text editing and undo are deliberately not
//! used; the [`crate::editor::CodeEditor`] is the single authority over the
//! buffer.

use crate::block::Block;
use crate::editor::KeyPress;
use crate::scene::Scene;
use crate::theme::{Theme, ThemeRegistry};
use crate::types::BlockId;
use eframe::egui;

/// The main application: a scene of code blocks plus the theme registry.
pub struct CodeFlowApp {
    /// Scene shared by all blocks (views, checkpoint history)
    pub scene: Scene,
    /// Theme registry every editor subscribes to
    pub themes: ThemeRegistry,
    /// Blocks currently on the canvas
    pub blocks: Vec<Block>,
    /// Block whose editor currently has keyboard focus
    pub focused_block: Option<BlockId>,
    /// Counter for generating default block titles
    pub block_counter: u32,
    /// Whether the control modifier was down last frame (edge detection for
    /// the editor's modifier latch)
    ctrl_was_down: bool,
}

impl Default for CodeFlowApp {
    fn default() -> Self {
        let mut scene = Scene::new();
        scene.add_view();
        Self {
            scene,
            themes: ThemeRegistry::new(),
            blocks: Vec::new(),
            focused_block: None,
            block_counter: 0,
            ctrl_was_down: false,
        }
    }
}

impl CodeFlowApp {
    /// Adds a new empty block and returns its id.
    pub fn add_block(&mut self) -> BlockId {
        self.block_counter += 1;
        let mut block = Block::new(&format!("Block {}", self.block_counter));
        block.init_editor(&mut self.themes);
        let id = block.id;
        self.blocks.push(block);
        id
    }

    /// Moves keyboard focus to `target`, committing the previously focused
    /// block first.
    pub fn focus_block(&mut self, target: Option<BlockId>) {
        if self.focused_block == target {
            return;
        }
        if let Some(previous) = self.focused_block.take() {
            if let Some(block) = self.blocks.iter_mut().find(|b| b.id == previous) {
                block.sync_on_focus_out(&mut self.scene);
            }
        }
        self.focused_block = target;
    }

    /// Translates this frame's raw input into editor events for the focused
    /// block.
    fn dispatch_input(&mut self, ctx: &egui::Context) {
        let Some(focused) = self.focused_block else {
            return;
        };
        let Some(block) = self.blocks.iter_mut().find(|b| b.id == focused) else {
            self.focused_block = None;
            return;
        };
        let Some(editor) = block.editor_mut() else {
            return;
        };

        let (events, ctrl_down) =
            ctx.input(|i| (i.raw.events.clone(), i.modifiers.ctrl || i.modifiers.command));

        // The control key itself is not delivered as an egui event, so feed
        // the latch on the modifier's rising edge.
        if ctrl_down && !self.ctrl_was_down {
            editor.key_press(KeyPress::Control);
        }
        self.ctrl_was_down = ctrl_down;

        for event in events {
            match event {
                egui::Event::Text(text) if !ctrl_down => {
                    for ch in text.chars() {
                        editor.key_press(KeyPress::Char(ch));
                    }
                }
                egui::Event::Key {
                    key, pressed: true, ..
                } => match key {
                    egui::Key::Enter => editor.key_press(KeyPress::Return),
                    egui::Key::Backspace => editor.key_press(KeyPress::Backspace),
                    egui::Key::Z if ctrl_down => editor.key_press(KeyPress::Char('z')),
                    egui::Key::Y if ctrl_down => editor.key_press(KeyPress::Char('y')),
                    egui::Key::Escape => {
                        // Treated as a focus loss; committed below through
                        // focus_block
                        self.focused_block = None;
                    }
                    _ => {}
                },
                _ => {}
            }
            // Escape ends the dispatch for this frame
            if self.focused_block.is_none() {
                break;
            }
        }

        if self.focused_block.is_none() {
            if let Some(b) = self.blocks.iter_mut().find(|b| b.id == focused) {
                b.sync_on_focus_out(&mut self.scene);
            }
        }
    }

    fn draw_block(
        block: &mut Block,
        focused_block: &mut Option<BlockId>,
        scene: &mut Scene,
        ctx: &egui::Context,
    ) {
        let theme = block
            .editor()
            .map(|e| e.style().clone())
            .unwrap_or_default();
        egui::Window::new(&block.title)
            .id(egui::Id::new(block.id))
            .default_size(egui::vec2(320.0, block.geometry.height))
            .show(ctx, |ui| {
                let source_response = Self::draw_source_panel(block, &theme, ui);
                ui.separator();
                Self::draw_output_panel(block, &theme, ui);

                if source_response.clicked() {
                    let was_focused = *focused_block == Some(block.id);
                    if !was_focused {
                        *focused_block = Some(block.id);
                    }
                    if let Some(editor) = block.editor_mut() {
                        // Caret hit-testing is approximated to end-of-buffer
                        let caret = editor.buffer().char_len();
                        editor.mouse_press(egui::PointerButton::Primary, Some(caret), scene);
                    }
                }

                if source_response.hovered() {
                    let delta = ui.input(|i| i.raw_scroll_delta);
                    if delta != egui::Vec2::ZERO {
                        if let Some(editor) = block.editor() {
                            if editor.wheel(delta) {
                                ui.scroll_with_delta(delta);
                            }
                        }
                    }
                }
            });
    }

    fn draw_source_panel(block: &Block, theme: &Theme, ui: &mut egui::Ui) -> egui::Response {
        let source_height = block.geometry.source_panel_height;
        let text = block.editor().map(|e| e.text()).unwrap_or(block.source());
        let shown = if text.is_empty() { " " } else { text };
        let label = egui::Label::new(
            egui::RichText::new(shown)
                .monospace()
                .size(theme.font_point_size)
                .color(theme.foreground)
                .background_color(theme.background),
        )
        .sense(egui::Sense::click());
        ui.add_sized(egui::vec2(ui.available_width(), source_height), label)
    }

    fn draw_output_panel(block: &Block, theme: &Theme, ui: &mut egui::Ui) {
        let output_height = block.geometry.output_panel_height;
        if let Some(bytes) = block.display.image_bytes() {
            ui.add_sized(
                egui::vec2(ui.available_width(), output_height),
                egui::Label::new(
                    egui::RichText::new(format!("[image output: {} bytes]", bytes.len()))
                        .color(theme.comment),
                ),
            );
        } else {
            ui.add_sized(
                egui::vec2(ui.available_width(), output_height),
                egui::Label::new(
                    egui::RichText::new(block.display.text())
                        .monospace()
                        .size(theme.font_point_size)
                        .color(theme.foreground),
                ),
            );
        }
    }

    fn draw_toolbar(&mut self, ui: &mut egui::Ui) {
        ui.horizontal(|ui| {
            if ui.button("Add block").clicked() {
                self.add_block();
            }
            let current = self.themes.current().name.clone();
            if ui.button(format!("Theme: {current}")).clicked() {
                let next = if current == "Dark" {
                    Theme {
                        name: "Light".to_string(),
                        foreground: egui::Color32::BLACK,
                        background: egui::Color32::WHITE,
                        caret: egui::Color32::DARK_GRAY,
                        ..Theme::default()
                    }
                } else {
                    Theme::default()
                };
                self.themes.set_theme(next);
            }
            if self.scene.history.is_modified() {
                ui.label("(modified)");
            }
        });
    }
}

impl eframe::App for CodeFlowApp {
    fn update(&mut self, ctx: &egui::Context, _frame: &mut eframe::Frame) {
        self.dispatch_input(ctx);

        for block in &mut self.blocks {
            if let Some(editor) = block.editor_mut() {
                editor.refresh_theme(&mut self.themes);
            }
        }

        egui::TopBottomPanel::top("toolbar").show(ctx, |ui| {
            self.draw_toolbar(ui);
        });

        let mut focused = self.focused_block;
        egui::CentralPanel::default().show(ctx, |_ui| {
            for block in &mut self.blocks {
                Self::draw_block(block, &mut focused, &mut self.scene, ctx);
            }
        });
        if focused != self.focused_block {
            self.focus_block(focused);
        }

        // A click outside every editor drops focus
        let clicked_outside = ctx.input(|i| {
            i.pointer.any_pressed() && i.pointer.interact_pos().is_some()
        }) && !ctx.wants_pointer_input();
        if clicked_outside && self.focused_block.is_some() {
            self.focus_block(None);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::Mode;

    #[test]
    fn test_add_block_creates_editor() {
        let mut app = CodeFlowApp::default();
        let id = app.add_block();

        let block = app.blocks.iter().find(|b| b.id == id).unwrap();
        assert!(block.editor().is_some());
        assert_eq!(app.themes.subscriber_count(), 1);
    }

    #[test]
    fn test_focus_change_commits_previous_block() {
        let mut app = CodeFlowApp::default();
        let first = app.add_block();
        let second = app.add_block();

        app.focus_block(Some(first));
        {
            let block = app.blocks.iter_mut().find(|b| b.id == first).unwrap();
            let editor = block.editor_mut().unwrap();
            editor.mouse_press(egui::PointerButton::Primary, Some(0), &mut app.scene);
            editor.key_press(KeyPress::Char('a'));
        }

        app.focus_block(Some(second));

        let block = app.blocks.iter().find(|b| b.id == first).unwrap();
        assert_eq!(block.source(), "a");
        assert_eq!(block.editor().unwrap().mode(), Mode::Noop);
        assert_eq!(app.scene.history.len(), 1);
    }

    #[test]
    fn test_focus_none_is_idempotent() {
        let mut app = CodeFlowApp::default();
        let id = app.add_block();
        app.focus_block(Some(id));
        app.focus_block(None);
        let checkpoints = app.scene.history.len();

        app.focus_block(None);

        assert_eq!(app.scene.history.len(), checkpoints);
    }
}
