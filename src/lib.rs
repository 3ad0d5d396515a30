//! Customizable modal alerts for ratatui.
//!
//! Two alert variants over a shared shell: [`ui::ConfirmationAlert`] (title,
//! message, okay/cancel) and [`ui::ValidatedInputAlert`] (adds a text field,
//! live validation feedback, and keyboard-avoidance layout driven by
//! [`ui::KeyboardNotifier`]). Styling comes from [`Theme`] via
//! [`ui::AlertStyle`]; key bindings from [`config`].

pub mod config;
pub mod theme;
pub mod ui;

pub use theme::Theme;
