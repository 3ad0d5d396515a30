use ratatui::style::Color;
use ratatui::widgets::BorderType;

use crate::Theme;

/// Visual parameters shared by all alert variants.
///
/// Plain data: every field may be overridden after construction and is read
/// fresh on each render pass.
#[derive(Debug, Clone, Copy)]
pub struct AlertStyle {
    /// Fill for the full-screen overlay behind the body.
    pub obscured_background: Color,
    pub border_color: Color,
    pub text_color: Color,
    pub body_background: Color,
    pub title_color: Color,
    pub okay_button_color: Color,
    pub cancel_button_color: Color,
    /// Color of the validation label shown on rejected input.
    pub validation_color: Color,
    pub field_background: Color,
    pub field_text_color: Color,
    pub hint_color: Color,
    pub border_type: BorderType,
}

impl AlertStyle {
    #[must_use]
    pub const fn from_theme(theme: &Theme) -> Self {
        Self {
            obscured_background: theme.crust(),
            border_color: theme.border(),
            text_color: theme.text(),
            body_background: theme.base(),
            title_color: theme.mauve(),
            okay_button_color: theme.green(),
            cancel_button_color: theme.overlay1(),
            validation_color: theme.error(),
            field_background: theme.surface0(),
            field_text_color: theme.text(),
            hint_color: theme.overlay0(),
            border_type: theme.border_type,
        }
    }
}

impl Default for AlertStyle {
    fn default() -> Self {
        Self::from_theme(&Theme::default())
    }
}
