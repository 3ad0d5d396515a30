pub mod confirm;
pub mod field;
pub mod input;
pub mod keyboard;
pub mod shell;
pub mod style;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::Rect;

pub use color_eyre::Result;

use crate::Theme;

pub use confirm::ConfirmationAlert;
pub use field::InputField;
pub use input::ValidatedInputAlert;
pub use keyboard::{KeyboardInfo, KeyboardNotifier, KeyboardSubscription};
pub use shell::{AlertEvent, AlertShell, Dismissal};
pub use style::AlertStyle;

/// Result of handling an input event.
///
/// - `Ignored` - The handler didn't recognize or handle this input
/// - `Consumed` - The input was handled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EventResult {
    /// Input was not handled, parent should process it.
    Ignored,
    /// Input was consumed.
    Consumed,
}

impl EventResult {
    /// Returns true if the input was consumed.
    pub const fn is_consumed(&self) -> bool {
        !matches!(self, Self::Ignored)
    }
}

/// Ephemeral overlay that blocks the screen below.
///
/// Modals capture all input until dismissed. Dismissal is animated, so the
/// modal stays attached while it fades; the tick hook reports the terminal
/// event when the animation has finished and the host may drop the modal.
pub trait Modal {
    /// The message type produced by this modal.
    type Output;

    /// Handle a key event.
    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult>;

    /// Advance animations; returns an output when one completes.
    fn handle_tick(&mut self) -> Option<Self::Output> {
        None
    }

    /// Render the modal to the frame.
    fn render(&mut self, frame: &mut Frame, area: Rect, theme: &Theme);
}
