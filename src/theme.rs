//! Theme registry shared by every code editor in the process.
//!
//! Instead of a global singleton with implicit change signals, the registry is
//! an explicit value passed by reference to each editor at construction.
//! Editors subscribe for change notifications and must unsubscribe on
//! teardown; change delivery is a generation counter each subscriber polls,
//! which fits the immediate-mode update loop.

use egui::Color32;
use std::collections::HashMap;

/// Font and color styling applied to code editors.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    /// Human-readable theme name
    pub name: String,
    /// Recommended monospace font family for editors
    pub font_family: String,
    /// Editor font size in points
    pub font_point_size: f32,
    /// Default text color
    pub foreground: Color32,
    /// Editor background color
    pub background: Color32,
    /// Caret color
    pub caret: Color32,
    /// Keyword token color
    pub keyword: Color32,
    /// String literal token color
    pub string: Color32,
    /// Comment token color
    pub comment: Color32,
    /// Numeric literal token color
    pub number: Color32,
}

impl Default for Theme {
    /// The built-in dark theme.
    fn default() -> Self {
        Self {
            name: "Dark".to_string(),
            font_family: "monospace".to_string(),
            font_point_size: 11.0,
            foreground: Color32::from_rgb(221, 221, 221),
            background: Color32::from_rgb(33, 33, 33),
            caret: Color32::from_rgb(212, 212, 212),
            keyword: Color32::from_rgb(86, 156, 214),  // Blue
            string: Color32::from_rgb(206, 145, 120),  // Orange
            comment: Color32::from_rgb(106, 153, 85),  // Green
            number: Color32::from_rgb(181, 206, 168),  // Light green
        }
    }
}

/// Handle identifying one theme-change subscriber.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SubscriptionId(u64);

/// Process-wide theme state with explicit subscribe/unsubscribe.
///
/// Every [`Theme`] replacement bumps a generation counter; subscribers poll
/// [`ThemeRegistry::poll`] and re-apply styling when it yields a theme.
#[derive(Debug)]
pub struct ThemeRegistry {
    theme: Theme,
    generation: u64,
    /// Last generation each subscriber has acknowledged
    subscribers: HashMap<SubscriptionId, u64>,
    next_id: u64,
}

impl Default for ThemeRegistry {
    fn default() -> Self {
        Self {
            theme: Theme::default(),
            generation: 0,
            subscribers: HashMap::new(),
            next_id: 0,
        }
    }
}

impl ThemeRegistry {
    /// Creates a registry holding the default dark theme.
    pub fn new() -> Self {
        Self::default()
    }

    /// The currently active theme.
    pub fn current(&self) -> &Theme {
        &self.theme
    }

    /// Replaces the active theme and notifies subscribers on their next poll.
    pub fn set_theme(&mut self, theme: Theme) {
        if theme != self.theme {
            self.theme = theme;
            self.generation += 1;
        }
    }

    /// Registers a new subscriber.
    ///
    /// The subscriber starts one generation behind so its first poll delivers
    /// the current theme.
    pub fn subscribe(&mut self) -> SubscriptionId {
        let id = SubscriptionId(self.next_id);
        self.next_id += 1;
        self.subscribers.insert(id, self.generation.wrapping_sub(1));
        id
    }

    /// Removes a subscriber. Unknown ids are ignored.
    pub fn unsubscribe(&mut self, id: SubscriptionId) {
        self.subscribers.remove(&id);
    }

    /// Returns the current theme if it changed since `id` last polled.
    ///
    /// Returns `None` for unknown (already unsubscribed) ids.
    pub fn poll(&mut self, id: SubscriptionId) -> Option<Theme> {
        let seen = self.subscribers.get_mut(&id)?;
        if *seen != self.generation {
            *seen = self.generation;
            Some(self.theme.clone())
        } else {
            None
        }
    }

    /// Number of live subscribers.
    pub fn subscriber_count(&self) -> usize {
        self.subscribers.len()
    }
}
