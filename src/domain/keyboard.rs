// Keyboard routing - maps key presses to analytics navigation commands
use super::view::{AnalyticsPage, DashboardView};

/// Kind of element that held focus when the key was pressed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FocusTarget {
    #[default]
    Body,
    TextInput,
    Select,
    TextArea,
    Other,
}

impl FocusTarget {
    pub fn from_tag(tag: &str) -> Self {
        match tag.to_ascii_lowercase().as_str() {
            "input" => FocusTarget::TextInput,
            "select" => FocusTarget::Select,
            "textarea" => FocusTarget::TextArea,
            "body" | "" => FocusTarget::Body,
            _ => FocusTarget::Other,
        }
    }

    pub fn is_form_control(self) -> bool {
        matches!(
            self,
            FocusTarget::TextInput | FocusTarget::Select | FocusTarget::TextArea
        )
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct KeyPress {
    /// DOM `KeyboardEvent.key` value, e.g. "ArrowLeft", "7", "?"
    pub key: String,
    pub ctrl: bool,
    pub alt: bool,
    pub meta: bool,
    pub target: FocusTarget,
}

impl KeyPress {
    pub fn new(key: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            ..Self::default()
        }
    }

    fn has_modifier(&self) -> bool {
        self.ctrl || self.alt || self.meta
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyCommand {
    GoToPage(AnalyticsPage),
    ShowHelp,
}

/// An accepted key: the command plus whether the browser default must be
/// suppressed. Every accepted key suppresses it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KeyDecision {
    pub command: KeyCommand,
    pub prevent_default: bool,
}

#[derive(Debug, Clone, Copy)]
pub struct KeyboardRouter {
    enabled: bool,
}

impl KeyboardRouter {
    pub fn new(enabled: bool) -> Self {
        Self { enabled }
    }

    /// Interpret a key press against the current view and page.
    ///
    /// Keys are only accepted while analytics is active, focus is outside
    /// form controls, and no Ctrl/Alt/Meta modifier is held.
    pub fn route(
        &self,
        press: &KeyPress,
        view: DashboardView,
        page: AnalyticsPage,
    ) -> Option<KeyDecision> {
        if !self.enabled
            || view != DashboardView::Analytics
            || press.target.is_form_control()
            || press.has_modifier()
        {
            return None;
        }

        let command = match press.key.as_str() {
            "ArrowLeft" => KeyCommand::GoToPage(page.previous()),
            "ArrowRight" => KeyCommand::GoToPage(page.next()),
            "h" | "H" | "?" => KeyCommand::ShowHelp,
            key => KeyCommand::GoToPage(digit_page(key)?),
        };

        Some(KeyDecision {
            command,
            prevent_default: true,
        })
    }

    pub fn help_summary(&self) -> String {
        let pages = AnalyticsPage::ALL
            .iter()
            .take(10)
            .enumerate()
            .map(|(i, page)| format!("{}={}", (i + 1) % 10, page.label()))
            .collect::<Vec<_>>()
            .join(", ");
        format!(
            "Keyboard shortcuts: ←/→ previous/next page, 1-9 and 0 jump to page ({}), H or ? show this help",
            pages
        )
    }
}

impl Default for KeyboardRouter {
    fn default() -> Self {
        Self::new(true)
    }
}

/// `1`-`9` select pages 1-9, `0` selects page 10
fn digit_page(key: &str) -> Option<AnalyticsPage> {
    let mut chars = key.chars();
    let digit = chars.next()?.to_digit(10)?;
    if chars.next().is_some() {
        return None;
    }
    let position = if digit == 0 { 10 } else { digit as usize };
    AnalyticsPage::at(position - 1)
}
