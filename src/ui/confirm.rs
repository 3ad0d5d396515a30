use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Margin, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Wrap};

use crate::Theme;
use crate::config::{DialogAction, KeyResolver};
use crate::ui::shell::{AlertEvent, AlertShell, Dismissal, fit_height};
use crate::ui::style::AlertStyle;
use crate::ui::{EventResult, Modal, Result};

type Callback = Box<dyn FnMut() + Send>;

/// Confirmation alert: title, message, okay/cancel buttons, no input.
///
/// Okay invokes the okay callback and fades out; cancel drops the body to
/// the overlay bottom, invokes the cancel callback, and fades out. Both
/// callbacks are optional; absence is a silent no-op.
pub struct ConfirmationAlert {
    shell: AlertShell,
    resolver: Arc<KeyResolver>,
    on_okay: Option<Callback>,
    on_cancel: Option<Callback>,
}

impl ConfirmationAlert {
    pub fn new(
        title: Option<String>,
        message: impl Into<String>,
        style: AlertStyle,
        resolver: Arc<KeyResolver>,
    ) -> Self {
        let mut shell = AlertShell::new(title, message, style);
        shell.set_button_hints(
            resolver.display_dialog(DialogAction::Confirm),
            resolver.display_dialog(DialogAction::Cancel),
        );
        let mut alert = Self {
            shell,
            resolver,
            on_okay: None,
            on_cancel: None,
        };
        alert.layout();
        alert
    }

    #[must_use]
    pub fn on_okay(mut self, action: impl FnMut() + Send + 'static) -> Self {
        self.on_okay = Some(Box::new(action));
        self
    }

    #[must_use]
    pub fn on_cancel(mut self, action: impl FnMut() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(action));
        self
    }

    pub const fn shell(&self) -> &AlertShell {
        &self.shell
    }

    // --- runtime setters; each re-runs the layout recompute ---

    pub fn set_title(&mut self, title: Option<String>) {
        self.shell.set_title(title, None);
        self.layout();
    }

    pub fn set_message(&mut self, message: impl Into<String>) {
        self.shell.set_message(message, None);
        self.layout();
    }

    pub fn set_okay_text(
        &mut self,
        text: impl Into<String>,
        color: Option<ratatui::style::Color>,
    ) {
        self.shell.set_okay_text(text, color);
        self.layout();
    }

    pub fn set_cancel_text(
        &mut self,
        text: impl Into<String>,
        color: Option<ratatui::style::Color>,
    ) {
        self.shell.set_cancel_text(text, color);
        self.layout();
    }

    /// Recompute the shell's layout targets from current content. The body
    /// height follows the message-length heuristic.
    fn layout(&mut self) {
        if self.shell.is_closed() {
            return;
        }
        self.shell
            .request_height_fraction(fit_height(self.shell.message()));
    }

    fn okay_pressed(&mut self) {
        if let Some(action) = self.on_okay.as_mut() {
            action();
        }
        self.shell.begin_fade(Dismissal::Okay);
    }

    fn cancel_pressed(&mut self) {
        self.shell.anchor_bottom();
        if let Some(action) = self.on_cancel.as_mut() {
            action();
        }
        self.shell.begin_fade(Dismissal::Cancel);
    }
}

impl Modal for ConfirmationAlert {
    type Output = AlertEvent;

    fn handle_key(&mut self, key: KeyEvent) -> Result<EventResult> {
        // A closed alert no longer captures input; the host just hasn't
        // dropped it yet.
        if self.shell.is_closed() {
            return Ok(EventResult::Ignored);
        }
        if self.shell.is_dismissing() {
            return Ok(EventResult::Consumed);
        }
        if self.resolver.matches_dialog(&key, DialogAction::Confirm) {
            self.okay_pressed();
        } else if self.resolver.matches_dialog(&key, DialogAction::Cancel) {
            self.cancel_pressed();
        }
        // Consume all other keys; the overlay blocks the screen below.
        Ok(EventResult::Consumed)
    }

    fn handle_tick(&mut self) -> Option<Self::Output> {
        self.shell.tick()
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _theme: &Theme) {
        let Some(regions) = self.shell.render_chrome(frame, area) else {
            return;
        };
        let content = regions.content.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });
        let message = Paragraph::new(self.shell.message().to_string())
            .style(Style::default().fg(self.shell.style().text_color))
            .alignment(Alignment::Center)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, content);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::keybindings::KeybindingsConfig;
    use crossterm::event::{KeyCode, KeyModifiers};
    use std::sync::atomic::{AtomicUsize, Ordering};

    fn resolver() -> Arc<KeyResolver> {
        Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())))
    }

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn run_to_close(alert: &mut ConfirmationAlert) -> Vec<AlertEvent> {
        (0..10).filter_map(|_| alert.handle_tick()).collect()
    }

    #[test]
    fn okay_invokes_callback_then_closes_once() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut alert =
            ConfirmationAlert::new(Some("Confirm".into()), "Proceed?", AlertStyle::default(), resolver())
                .on_okay(move || {
                    seen.fetch_add(1, Ordering::SeqCst);
                });

        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);

        let events = run_to_close(&mut alert);
        assert_eq!(events, vec![AlertEvent::Closed(Dismissal::Okay)]);
    }

    #[test]
    fn cancel_invokes_callback_and_reports_cancel() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut alert = ConfirmationAlert::new(None, "Sure?", AlertStyle::default(), resolver())
            .on_cancel(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        alert.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(run_to_close(&mut alert), vec![AlertEvent::Closed(Dismissal::Cancel)]);
    }

    #[test]
    fn missing_callbacks_are_silent_no_ops() {
        let mut alert = ConfirmationAlert::new(None, "Sure?", AlertStyle::default(), resolver());
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(run_to_close(&mut alert), vec![AlertEvent::Closed(Dismissal::Okay)]);
    }

    #[test]
    fn keys_during_fade_are_swallowed() {
        let count = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&count);
        let mut alert = ConfirmationAlert::new(None, "Sure?", AlertStyle::default(), resolver())
            .on_okay(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        alert.handle_key(key(KeyCode::Enter)).unwrap();
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(count.load(Ordering::SeqCst), 1);
        assert_eq!(run_to_close(&mut alert).len(), 1);
    }

    #[test]
    fn unrelated_keys_are_consumed_not_ignored() {
        let mut alert = ConfirmationAlert::new(None, "Sure?", AlertStyle::default(), resolver());
        let result = alert.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert!(result.is_consumed());
        assert!(alert.handle_tick().is_none());
    }

    #[test]
    fn closed_alert_stops_capturing_keys() {
        let mut alert = ConfirmationAlert::new(None, "Sure?", AlertStyle::default(), resolver());
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        run_to_close(&mut alert);

        let result = alert.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(result, EventResult::Ignored);
    }
}
