use std::sync::Arc;

use crossterm::event::KeyEvent;

use crate::config::actions::{DialogAction, GlobalAction};
use crate::config::keybindings::KeybindingsConfig;

/// Resolves key events against the configured bindings.
pub struct KeyResolver {
    pub keybindings: Arc<KeybindingsConfig>,
}

impl KeyResolver {
    pub const fn new(keybindings: Arc<KeybindingsConfig>) -> Self {
        Self { keybindings }
    }

    pub fn matches_global(&self, event: &KeyEvent, action: GlobalAction) -> bool {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.matches(event),
            GlobalAction::Theme => kb.theme.matches(event),
            GlobalAction::Confirm => kb.confirm_demo.matches(event),
            GlobalAction::Input => kb.input_demo.matches(event),
        }
    }

    pub fn display_global(&self, action: GlobalAction) -> String {
        let kb = &self.keybindings.global;
        match action {
            GlobalAction::Quit => kb.quit.display(),
            GlobalAction::Theme => kb.theme.display(),
            GlobalAction::Confirm => kb.confirm_demo.display(),
            GlobalAction::Input => kb.input_demo.display(),
        }
    }

    pub fn matches_dialog(&self, event: &KeyEvent, action: DialogAction) -> bool {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => kb.confirm.matches(event),
            DialogAction::Cancel => kb.cancel.matches(event),
        }
    }

    pub fn display_dialog(&self, action: DialogAction) -> String {
        let kb = &self.keybindings.dialog;
        match action {
            DialogAction::Confirm => kb.confirm.display(),
            DialogAction::Cancel => kb.cancel.display(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crossterm::event::{KeyCode, KeyModifiers};

    fn resolver() -> KeyResolver {
        KeyResolver::new(Arc::new(KeybindingsConfig::default()))
    }

    #[test]
    fn default_dialog_confirm_matches_enter_and_y() {
        let r = resolver();
        for code in [KeyCode::Enter, KeyCode::Char('y')] {
            let event = KeyEvent::new(code, KeyModifiers::NONE);
            assert!(r.matches_dialog(&event, DialogAction::Confirm));
        }
    }

    #[test]
    fn default_dialog_cancel_matches_esc_and_n() {
        let r = resolver();
        for code in [KeyCode::Esc, KeyCode::Char('n')] {
            let event = KeyEvent::new(code, KeyModifiers::NONE);
            assert!(r.matches_dialog(&event, DialogAction::Cancel));
        }
    }
}
