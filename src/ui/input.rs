//! Text-input alert with live validation and keyboard avoidance.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Margin, Rect};
use ratatui::style::Style;
use ratatui::widgets::{Paragraph, Wrap};
use tracing::debug;

use crate::Theme;
use crate::ui::field::{FieldKey, InputField};
use crate::ui::keyboard::{KeyboardNotifier, KeyboardSubscription};
use crate::ui::shell::{
    AlertEvent, AlertShell, BUTTON_FRACTION, Dismissal, fit_height, wrapped_line_count,
};
use crate::ui::style::AlertStyle;
use crate::ui::{EventResult, Modal, Result};

/// Height of the input row as a fraction of the overlay.
pub const INPUT_FRACTION: f32 = 0.05;
/// Height of the spacer between the text stack and the input row.
pub const SPACER_FRACTION: f32 = 0.05;
/// Rows of breathing room added around the wrapped text when fitting.
const TEXT_PAD_ROWS: f32 = 2.0;

type OkayCallback = Box<dyn FnMut(&str) + Send>;
type CancelCallback = Box<dyn FnMut() + Send>;
type Validator = Box<dyn Fn(&str) -> bool + Send>;
type MessageProducer = Box<dyn Fn(&str) -> Option<String> + Send>;

/// Vertical space left above the keyboard.
pub(crate) fn open_space(overlay_h: f32, keyboard_h: f32, inset: f32) -> f32 {
    overlay_h - keyboard_h - inset / 2.0
}

/// Center row of the area left open above the keyboard.
pub(crate) fn open_area_center(overlay_h: f32, keyboard_h: f32, inset: f32) -> f32 {
    (overlay_h - keyboard_h + inset / 4.0) / 2.0
}

/// Body height in rows once the keyboard is up: the fractional regions plus
/// the wrapped text, capped by the open space.
pub(crate) fn keyboard_fit_rows(
    overlay_h: f32,
    keyboard_h: f32,
    inset: f32,
    base_fraction: f32,
    text_rows: f32,
) -> f32 {
    let scaled = overlay_h.mul_add(base_fraction, text_rows + TEXT_PAD_ROWS);
    scaled.min(open_space(overlay_h, keyboard_h, inset))
}

/// Modal alert with a single-line input field, validated on submit and (after
/// the first rejection) on every subsequent edit.
///
/// Construction registers one keyboard-show observer; the registration is
/// dropped when the dismiss fade completes, strictly before the closed event
/// reaches the host.
pub struct ValidatedInputAlert {
    shell: AlertShell,
    field: InputField,
    validation_text: Option<String>,
    /// Latches on the first failed validation; never resets.
    was_validated_once: bool,
    keyboard_height: Option<u16>,
    safe_area_inset: f32,
    subscription: Option<KeyboardSubscription>,
    on_okay: Option<OkayCallback>,
    on_cancel: Option<CancelCallback>,
    validate: Option<Validator>,
    validation_message: Option<MessageProducer>,
}

impl ValidatedInputAlert {
    pub fn new(
        title: Option<String>,
        message: impl Into<String>,
        style: AlertStyle,
        notifier: &KeyboardNotifier,
    ) -> Self {
        let mut shell = AlertShell::new(title, message, style);
        shell.set_button_hints("Enter", "Esc");
        let mut field = InputField::new();
        field.focus();
        let mut alert = Self {
            shell,
            field,
            validation_text: None,
            was_validated_once: false,
            keyboard_height: None,
            safe_area_inset: 0.0,
            subscription: Some(notifier.subscribe()),
            on_okay: None,
            on_cancel: None,
            validate: None,
            validation_message: None,
        };
        alert.layout();
        alert
    }

    #[must_use]
    pub fn on_okay(mut self, action: impl FnMut(&str) + Send + 'static) -> Self {
        self.on_okay = Some(Box::new(action));
        self
    }

    #[must_use]
    pub fn on_cancel(mut self, action: impl FnMut() + Send + 'static) -> Self {
        self.on_cancel = Some(Box::new(action));
        self
    }

    #[must_use]
    pub fn validator(mut self, action: impl Fn(&str) -> bool + Send + 'static) -> Self {
        self.validate = Some(Box::new(action));
        self
    }

    #[must_use]
    pub fn validation_message(
        mut self,
        producer: impl Fn(&str) -> Option<String> + Send + 'static,
    ) -> Self {
        self.validation_message = Some(Box::new(producer));
        self
    }

    #[must_use]
    pub fn placeholder(mut self, text: impl Into<String>) -> Self {
        self.field = InputField::new().with_placeholder(text);
        self.field.focus();
        self
    }

    /// Rows subtracted from the overlay bottom before keyboard math, for
    /// hosts that reserve a status line or similar.
    #[must_use]
    pub const fn safe_area_inset(mut self, rows: f32) -> Self {
        self.safe_area_inset = rows;
        self
    }

    pub const fn shell(&self) -> &AlertShell {
        &self.shell
    }

    pub fn text(&self) -> &str {
        self.field.value()
    }

    pub fn validation_label(&self) -> Option<&str> {
        self.validation_text.as_deref()
    }

    pub const fn is_focused(&self) -> bool {
        self.field.is_focused()
    }

    // --- runtime setters ---

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

    /// Replace the validation pair and refit.
    pub fn set_validation(
        &mut self,
        action: impl Fn(&str) -> bool + Send + 'static,
        message: impl Fn(&str) -> Option<String> + Send + 'static,
    ) {
        self.validate = Some(Box::new(action));
        self.validation_message = Some(Box::new(message));
        self.layout();
    }

    pub fn set_text(&mut self, text: impl Into<String>) {
        self.field.set_value(text);
        if self.was_validated_once {
            self.revalidate();
        }
    }

    // --- layout ---

    /// Recompute the shell's targets. Before the keyboard appears the body
    /// follows the message-length heuristic; afterwards it is fitted into
    /// the space the keyboard leaves open.
    fn layout(&mut self) {
        if self.shell.is_closed() {
            return;
        }
        let Some(keyboard_h) = self.keyboard_height else {
            self.shell
                .request_height_fraction(fit_height(self.shell.message()));
            return;
        };
        let overlay_h = f32::from(self.shell.viewport().height);
        if overlay_h <= 0.0 {
            // Not rendered yet; retried on the next tick.
            return;
        }
        let keyboard_h = f32::from(keyboard_h);

        self.shell.anchor_row(open_area_center(
            overlay_h,
            keyboard_h,
            self.safe_area_inset,
        ));

        let wrap_width = self.shell.content_width().saturating_sub(2).max(1);
        let mut text_rows = wrapped_line_count(self.shell.message(), wrap_width);
        if let Some(label) = &self.validation_text {
            text_rows += wrapped_line_count(label, wrap_width);
        }

        let base = self.shell.title_fraction() + INPUT_FRACTION + SPACER_FRACTION + BUTTON_FRACTION;
        let rows = keyboard_fit_rows(
            overlay_h,
            keyboard_h,
            self.safe_area_inset,
            base,
            f32::from(text_rows),
        );
        self.shell.request_height_rows(rows);
    }

    fn keyboard_shown(&mut self, height: u16) {
        debug!(height, "keyboard shown, refitting alert");
        self.keyboard_height = Some(height);
        self.layout();
    }

    // --- validation ---

    /// Runs after every edit once the first rejection has happened.
    fn revalidate(&mut self) {
        if self.shell.is_closed() {
            return;
        }
        if self.validate.is_none() || self.validation_message.is_none() {
            return;
        }
        let text = self.field.value().to_string();
        let invalid = self.validate.as_ref().is_some_and(|validate| !validate(&text));
        self.validation_text = if invalid {
            self.validation_message
                .as_ref()
                .and_then(|producer| producer(&text))
        } else {
            None
        };
        self.layout();
    }

    fn okay_pressed(&mut self) {
        let text = self.field.value().to_string();
        let rejected = self.validate.as_ref().is_some_and(|validate| !validate(&text));
        if rejected {
            // Without a message producer (or with one that declines)
            // nothing visible happens; the alert stays up.
            let Some(message) = self
                .validation_message
                .as_ref()
                .and_then(|producer| producer(&text))
            else {
                return;
            };
            self.validation_text = Some(message);
            self.was_validated_once = true;
            self.layout();
        } else {
            if let Some(action) = self.on_okay.as_mut() {
                action(&text);
            }
            self.field.unfocus();
            self.shell.begin_fade(Dismissal::Okay);
        }
    }

    fn cancel_pressed(&mut self) {
        self.field.unfocus();
        self.shell.anchor_bottom();
        if let Some(action) = self.on_cancel.as_mut() {
            action();
        }
        self.shell.begin_fade(Dismissal::Cancel);
    }

    /// Teardown on fade completion: the keyboard registration is released
    /// before the closed event is handed to the host, so the observer can
    /// never outlive the alert.
    fn finish(&mut self, event: AlertEvent) -> AlertEvent {
        drop(self.subscription.take());
        event
    }
}

impl Modal for ValidatedInputAlert {
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
        match key.code {
            KeyCode::Enter => self.okay_pressed(),
            KeyCode::Esc => self.cancel_pressed(),
            _ => {
                if self.field.handle_key(key) == FieldKey::Edited && self.was_validated_once {
                    self.revalidate();
                }
            }
        }
        Ok(EventResult::Consumed)
    }

    fn handle_tick(&mut self) -> Option<Self::Output> {
        if let Some(info) = self.subscription.as_mut().and_then(KeyboardSubscription::try_recv) {
            self.keyboard_shown(info.height);
        } else if self.keyboard_height.is_some()
            && !self.shell.is_dismissing()
            && !self.shell.is_closed()
        {
            // Keeps the fit current while text or viewport changes.
            self.layout();
        }
        self.shell.tick().map(|event| self.finish(event))
    }

    fn render(&mut self, frame: &mut Frame, area: Rect, _theme: &Theme) {
        let Some(regions) = self.shell.render_chrome(frame, area) else {
            return;
        };
        let style = *self.shell.style();
        let content = regions.content.inner(Margin {
            horizontal: 1,
            vertical: 1,
        });

        let overlay_h = f32::from(area.height);
        let input_rows = ((overlay_h * INPUT_FRACTION).round() as u16).max(1);
        let spacer_rows = ((overlay_h * SPACER_FRACTION).round() as u16).max(1);

        let [text_area, _spacer, input_area] = Layout::vertical([
            Constraint::Min(0),
            Constraint::Length(spacer_rows),
            Constraint::Length(input_rows),
        ])
        .areas(content);

        let message_rows = wrapped_line_count(self.shell.message(), text_area.width.max(1));
        let [message_area, validation_area] = Layout::vertical([
            Constraint::Length(message_rows),
            Constraint::Min(0),
        ])
        .areas(text_area);

        let message = Paragraph::new(self.shell.message().to_string())
            .style(Style::default().fg(style.text_color))
            .alignment(Alignment::Left)
            .wrap(Wrap { trim: true });
        frame.render_widget(message, message_area);

        if let Some(label) = &self.validation_text {
            let validation = Paragraph::new(label.clone())
                .style(Style::default().fg(style.validation_color))
                .alignment(Alignment::Left)
                .wrap(Wrap { trim: true });
            frame.render_widget(validation, validation_area);
        }

        self.field.render(frame, input_area, &style);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ui::keyboard::KeyboardInfo;
    use crossterm::event::KeyModifiers;
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Mutex;

    fn key(code: KeyCode) -> KeyEvent {
        KeyEvent::new(code, KeyModifiers::NONE)
    }

    fn type_str(alert: &mut ValidatedInputAlert, s: &str) {
        for c in s.chars() {
            alert.handle_key(key(KeyCode::Char(c))).unwrap();
        }
    }

    fn run_to_close(alert: &mut ValidatedInputAlert) -> Vec<AlertEvent> {
        (0..10).filter_map(|_| alert.handle_tick()).collect()
    }

    // --- pure keyboard math ---

    #[test]
    fn open_space_subtracts_keyboard_and_half_inset() {
        assert!((open_space(40.0, 12.0, 4.0) - 26.0).abs() < f32::EPSILON);
    }

    #[test]
    fn open_area_center_adds_quarter_inset() {
        assert!((open_area_center(40.0, 12.0, 4.0) - 14.5).abs() < f32::EPSILON);
    }

    #[test]
    fn keyboard_fit_caps_at_open_space() {
        // Huge text: the cap wins.
        let capped = keyboard_fit_rows(40.0, 12.0, 0.0, 0.25, 100.0);
        assert!((capped - 28.0).abs() < f32::EPSILON);
        // Small text: the scaled height wins.
        let scaled = keyboard_fit_rows(40.0, 12.0, 0.0, 0.25, 2.0);
        assert!((scaled - 14.0).abs() < f32::EPSILON);
    }

    // --- validation lifecycle ---

    #[test]
    fn always_failing_validator_blocks_okay_and_pins_label() {
        let notifier = KeyboardNotifier::new();
        let okay_calls = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&okay_calls);
        let mut alert =
            ValidatedInputAlert::new(None, "Enter something", AlertStyle::default(), &notifier)
                .on_okay(move |_| {
                    seen.fetch_add(1, Ordering::SeqCst);
                })
                .validator(|_| false)
                .validation_message(|_| Some("bad".to_string()));

        for _ in 0..3 {
            alert.handle_key(key(KeyCode::Enter)).unwrap();
            assert_eq!(alert.validation_label(), Some("bad"));
        }
        assert_eq!(okay_calls.load(Ordering::SeqCst), 0);
        assert!(run_to_close(&mut alert).is_empty());
        assert_eq!(notifier.observer_count(), 1);
    }

    #[test]
    fn passing_validator_invokes_okay_with_text_exactly_once() {
        let notifier = KeyboardNotifier::new();
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&submitted);
        let mut alert =
            ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier)
                .on_okay(move |text| {
                    seen.lock().unwrap().push(text.to_string());
                })
                .validator(|_| true);

        type_str(&mut alert, "Bob");
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(*submitted.lock().unwrap(), vec!["Bob".to_string()]);
        assert_eq!(
            run_to_close(&mut alert),
            vec![AlertEvent::Closed(Dismissal::Okay)]
        );
    }

    #[test]
    fn silent_message_producer_suppresses_label_and_keeps_alert() {
        let notifier = KeyboardNotifier::new();
        let mut alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier)
            .validator(|_| false)
            .validation_message(|_| None);

        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(alert.validation_label(), None);
        assert!(run_to_close(&mut alert).is_empty());
    }

    #[test]
    fn edits_do_not_validate_before_first_rejection() {
        let notifier = KeyboardNotifier::new();
        let mut alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier)
            .validator(str::is_empty)
            .validation_message(|_| Some("nope".to_string()));

        type_str(&mut alert, "invalid text");
        assert_eq!(alert.validation_label(), None);
    }

    #[test]
    fn edits_after_first_rejection_revalidate_live() {
        let notifier = KeyboardNotifier::new();
        let mut alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier)
            .validator(|text| !text.is_empty())
            .validation_message(|_| Some("Required".to_string()));

        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(alert.validation_label(), Some("Required"));

        // A valid edit clears the label immediately.
        type_str(&mut alert, "A");
        assert_eq!(alert.validation_label(), None);

        // Deleting back to empty brings it back.
        alert.handle_key(key(KeyCode::Backspace)).unwrap();
        assert_eq!(alert.validation_label(), Some("Required"));
    }

    #[test]
    fn end_to_end_required_name_flow() {
        let notifier = KeyboardNotifier::new();
        let submitted = Arc::new(Mutex::new(Vec::new()));
        let seen = Arc::clone(&submitted);
        let mut alert =
            ValidatedInputAlert::new(None, "Enter name", AlertStyle::default(), &notifier)
                .on_okay(move |text| {
                    seen.lock().unwrap().push(text.to_string());
                })
                .validator(|text| !text.is_empty())
                .validation_message(|_| Some("Required".to_string()));
        assert_eq!(notifier.observer_count(), 1);

        // Empty submit: rejected, label shown, callback untouched.
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(submitted.lock().unwrap().is_empty());
        assert_eq!(alert.validation_label(), Some("Required"));

        // Valid submit: callback once, closed after the fade, observer gone.
        type_str(&mut alert, "Alice");
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(*submitted.lock().unwrap(), vec!["Alice".to_string()]);
        assert_eq!(
            run_to_close(&mut alert),
            vec![AlertEvent::Closed(Dismissal::Okay)]
        );
        assert_eq!(notifier.observer_count(), 0);
    }

    // --- observer lifetime ---

    #[test]
    fn construction_registers_exactly_one_observer() {
        let notifier = KeyboardNotifier::new();
        let alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier);
        assert_eq!(notifier.observer_count(), 1);
        drop(alert);
        assert_eq!(notifier.observer_count(), 0);
    }

    #[test]
    fn cancel_path_unregisters_observer_after_fade() {
        let notifier = KeyboardNotifier::new();
        let cancels = Arc::new(AtomicUsize::new(0));
        let seen = Arc::clone(&cancels);
        let mut alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier)
            .on_cancel(move || {
                seen.fetch_add(1, Ordering::SeqCst);
            });

        alert.handle_key(key(KeyCode::Esc)).unwrap();
        assert_eq!(cancels.load(Ordering::SeqCst), 1);
        // Observer stays registered during the fade, gone once closed.
        assert_eq!(notifier.observer_count(), 1);
        assert_eq!(
            run_to_close(&mut alert),
            vec![AlertEvent::Closed(Dismissal::Cancel)]
        );
        assert_eq!(notifier.observer_count(), 0);
        assert!(!alert.is_focused());
    }

    #[test]
    fn keyboard_event_is_drained_on_tick() {
        let notifier = KeyboardNotifier::new();
        let mut alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier);
        notifier.post(KeyboardInfo { height: 10 });
        assert!(alert.handle_tick().is_none());
        assert_eq!(alert.keyboard_height, Some(10));
    }

    #[test]
    fn focus_is_requested_immediately() {
        let notifier = KeyboardNotifier::new();
        let alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier);
        assert!(alert.is_focused());
    }

    #[test]
    fn validated_once_flag_never_resets() {
        let notifier = KeyboardNotifier::new();
        let mut alert = ValidatedInputAlert::new(None, "Name", AlertStyle::default(), &notifier)
            .validator(|text| !text.is_empty())
            .validation_message(|_| Some("Required".to_string()));

        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert!(alert.was_validated_once);
        type_str(&mut alert, "ok now");
        assert!(alert.was_validated_once);
    }

    #[test]
    fn closed_alert_is_inert() {
        let notifier = KeyboardNotifier::new();
        let mut alert = ValidatedInputAlert::new(None, "Enter name", AlertStyle::default(), &notifier)
            .validator(|text| !text.trim().is_empty())
            .validation_message(|_| Some("Required".to_string()));

        // Latch validation, then submit successfully and fade out.
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(alert.validation_label(), Some("Required"));
        type_str(&mut alert, "Alice");
        alert.handle_key(key(KeyCode::Enter)).unwrap();
        assert_eq!(run_to_close(&mut alert).len(), 1);

        // After the close, edits no longer revalidate and keys are no
        // longer captured; extra ticks stay silent.
        alert.set_text("");
        assert_eq!(alert.validation_label(), None);
        let result = alert.handle_key(key(KeyCode::Char('x'))).unwrap();
        assert_eq!(result, EventResult::Ignored);
        assert!(alert.handle_tick().is_none());
    }
}
