//! Base alert chrome: overlay, body, title row, button row, sizing.
//!
//! [`AlertShell`] owns everything the alert variants share: the obscured
//! full-screen overlay, the centered rounded body, title/button regions with
//! their divider borders, the message-length sizing heuristic, and the
//! tick-driven animations (relayout tweens and the dismiss fade). Variants
//! compose a shell and feed it layout targets; they never touch geometry
//! directly.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tracing::debug;

use crate::ui::style::AlertStyle;

/// Height of the title row as a fraction of the overlay, when a title is set.
pub const TITLE_FRACTION: f32 = 0.075;
/// Height of the button row as a fraction of the overlay.
pub const BUTTON_FRACTION: f32 = 0.075;
/// Body width as a fraction of the overlay width.
pub const BODY_WIDTH_FRACTION: f32 = 0.9;
/// Fallback body height fraction when the message heuristic declines.
pub const DEFAULT_HEIGHT_FRACTION: f32 = 0.25;

/// Ticks the dismiss fade runs for (0.5s at the 4 ticks/s demo rate).
pub const FADE_TICKS: u8 = 2;
/// Ticks a relayout animates over.
pub const RELAYOUT_TICKS: u8 = 2;

/// Which action dismissed the alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Dismissal {
    Okay,
    Cancel,
}

/// Terminal event reported by an alert.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertEvent {
    /// The fade-out finished; the host should drop the alert.
    Closed(Dismissal),
}

/// Body height requested by the current layout.
#[derive(Debug, Clone, Copy, PartialEq)]
enum HeightIntent {
    /// Fraction of the overlay height.
    Fraction(f32),
    /// Absolute rows (keyboard-avoidance layout).
    Rows(f32),
}

/// Vertical anchor of the body within the overlay.
#[derive(Debug, Clone, Copy, PartialEq)]
enum Anchor {
    /// Centered in the overlay.
    Center,
    /// Centered on a specific overlay row (open area above the keyboard).
    Row(f32),
    /// Flush with the overlay bottom (the cancel path).
    Bottom,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    Shown,
    FadingOut {
        dismissal: Dismissal,
        ticks_left: u8,
    },
    Closed,
}

/// A value animating linearly toward a target, stepped on ticks.
#[derive(Debug, Clone, Copy)]
pub(crate) struct Tween {
    from: f32,
    to: f32,
    ticks_total: u8,
    ticks_left: u8,
}

impl Tween {
    pub(crate) const fn snap(value: f32) -> Self {
        Self {
            from: value,
            to: value,
            ticks_total: 0,
            ticks_left: 0,
        }
    }

    /// Start animating toward `to` from the current interpolated value.
    /// A retarget mid-flight restarts from wherever the value is now.
    pub(crate) fn retarget(&mut self, to: f32, ticks: u8) {
        if (self.to - to).abs() < f32::EPSILON {
            return;
        }
        self.from = self.current();
        self.to = to;
        self.ticks_total = ticks;
        self.ticks_left = ticks;
    }

    pub(crate) fn tick(&mut self) {
        self.ticks_left = self.ticks_left.saturating_sub(1);
    }

    pub(crate) fn current(&self) -> f32 {
        if self.ticks_left == 0 || self.ticks_total == 0 {
            return self.to;
        }
        let progress = 1.0 - f32::from(self.ticks_left) / f32::from(self.ticks_total);
        (self.to - self.from).mul_add(progress, self.from)
    }

    pub(crate) const fn target(&self) -> f32 {
        self.to
    }
}

/// Regions of the alert body handed back to the variant for its content.
#[derive(Debug, Clone, Copy)]
pub struct BodyRegions {
    /// Space between the title divider and the button divider.
    pub content: Rect,
    /// The button row, already rendered; exposed for hit/hint purposes.
    pub buttons: Rect,
}

/// Shared container for all alert variants.
pub struct AlertShell {
    style: AlertStyle,
    title: Option<String>,
    title_fraction: f32,
    message: String,
    okay_text: String,
    cancel_text: String,
    okay_hint: Option<String>,
    cancel_hint: Option<String>,
    phase: Phase,
    height_intent: HeightIntent,
    anchor: Anchor,
    height_rows: Tween,
    center_row: Tween,
    viewport: Rect,
}

/// Body height fraction for a message of the given character count.
///
/// Literal port of the historical heuristic, quirks included: the second
/// branch (`scale > 0.5` capping at 0.5) is shadowed by the first for every
/// scale in (0.5, 0.7), so it only fires for scale >= 0.7 — where it then
/// *lowers* the fraction to 0.5. First match wins.
#[must_use]
pub fn fit_height(message: &str) -> f32 {
    fraction_for_scale(message.chars().count() as f32 * 0.0017)
}

pub(crate) fn fraction_for_scale(scale: f32) -> f32 {
    let mut fraction = DEFAULT_HEIGHT_FRACTION;
    if scale < 0.7 && scale > 0.25 {
        fraction = scale;
    } else if scale > 0.5 {
        fraction = 0.5;
    }
    fraction
}

/// Number of lines `text` occupies when greedily word-wrapped to `width`
/// columns. Matches `Paragraph` with trimmed wrapping closely enough for
/// sizing; an overlong word takes as many full rows as it needs.
pub(crate) fn wrapped_line_count(text: &str, width: u16) -> u16 {
    if width == 0 {
        return 0;
    }
    let width = usize::from(width);
    let mut lines: u16 = 0;
    for raw_line in text.lines() {
        let mut used = 0usize;
        let mut line_count: u16 = 1;
        for word in raw_line.split_whitespace() {
            let len = word.chars().count();
            if used == 0 {
                used = len.min(width);
                line_count += (len.saturating_sub(1) / width) as u16;
            } else if used + 1 + len <= width {
                used += 1 + len;
            } else {
                line_count += 1 + (len.saturating_sub(1) / width) as u16;
                used = len.min(width);
            }
        }
        lines += line_count;
    }
    lines.max(1)
}

impl AlertShell {
    pub fn new(title: Option<String>, message: impl Into<String>, style: AlertStyle) -> Self {
        let title_fraction = if title.is_some() { TITLE_FRACTION } else { 0.0 };
        let message = message.into();
        Self {
            style,
            title,
            title_fraction,
            message,
            okay_text: "OK".to_string(),
            cancel_text: "Cancel".to_string(),
            okay_hint: None,
            cancel_hint: None,
            phase: Phase::Shown,
            height_intent: HeightIntent::Fraction(DEFAULT_HEIGHT_FRACTION),
            anchor: Anchor::Center,
            height_rows: Tween::snap(0.0),
            center_row: Tween::snap(0.0),
            viewport: Rect::ZERO,
        }
    }

    pub const fn style(&self) -> &AlertStyle {
        &self.style
    }

    pub const fn style_mut(&mut self) -> &mut AlertStyle {
        &mut self.style
    }

    pub fn message(&self) -> &str {
        &self.message
    }

    pub const fn title_fraction(&self) -> f32 {
        self.title_fraction
    }

    pub const fn has_title(&self) -> bool {
        self.title.is_some()
    }

    // --- setters (variants re-run their layout after calling these) ---

    /// Set or clear the title. Clearing collapses the title row to zero
    /// height; setting restores the default fraction.
    pub fn set_title(&mut self, title: Option<String>, color: Option<Color>) {
        if self.is_closed() {
            return;
        }
        match title {
            Some(t) => {
                self.title = Some(t);
                self.title_fraction = TITLE_FRACTION;
            }
            None => {
                self.title = None;
                self.title_fraction = 0.0;
            }
        }
        if let Some(color) = color {
            self.style.title_color = color;
        }
    }

    pub fn set_message(&mut self, message: impl Into<String>, color: Option<Color>) {
        if self.is_closed() {
            return;
        }
        self.message = message.into();
        if let Some(color) = color {
            self.style.text_color = color;
        }
    }

    pub fn set_okay_text(&mut self, text: impl Into<String>, color: Option<Color>) {
        if self.is_closed() {
            return;
        }
        self.okay_text = text.into();
        if let Some(color) = color {
            self.style.okay_button_color = color;
        }
    }

    pub fn set_cancel_text(&mut self, text: impl Into<String>, color: Option<Color>) {
        if self.is_closed() {
            return;
        }
        self.cancel_text = text.into();
        if let Some(color) = color {
            self.style.cancel_button_color = color;
        }
    }

    pub fn set_button_hints(&mut self, okay: impl Into<String>, cancel: impl Into<String>) {
        self.okay_hint = Some(okay.into());
        self.cancel_hint = Some(cancel.into());
    }

    // --- layout targets ---

    pub fn request_height_fraction(&mut self, fraction: f32) {
        self.height_intent = HeightIntent::Fraction(fraction);
    }

    pub fn request_height_rows(&mut self, rows: f32) {
        self.height_intent = HeightIntent::Rows(rows);
    }

    pub fn anchor_center(&mut self) {
        self.anchor = Anchor::Center;
    }

    /// Re-anchor the body's vertical center to an absolute overlay row,
    /// replacing the centered anchor.
    pub fn anchor_row(&mut self, row: f32) {
        self.anchor = Anchor::Row(row);
    }

    /// Drop the vertical-center anchor and pin the body to the overlay
    /// bottom (the cancel dismissal path).
    pub fn anchor_bottom(&mut self) {
        self.anchor = Anchor::Bottom;
    }

    // --- lifecycle ---

    /// Begin the fade-out. Teardown is deferred to the tick where the fade
    /// completes; until then the alert keeps rendering at waning opacity.
    pub fn begin_fade(&mut self, dismissal: Dismissal) {
        if matches!(self.phase, Phase::Shown) {
            debug!(?dismissal, "alert dismissing");
            self.phase = Phase::FadingOut {
                dismissal,
                ticks_left: FADE_TICKS,
            };
        }
    }

    pub const fn is_dismissing(&self) -> bool {
        matches!(self.phase, Phase::FadingOut { .. })
    }

    pub const fn is_closed(&self) -> bool {
        matches!(self.phase, Phase::Closed)
    }

    /// Advance animations. Reports `Closed` exactly once, on the tick the
    /// fade finishes; after that the shell is inert.
    pub fn tick(&mut self) -> Option<AlertEvent> {
        if self.is_closed() {
            return None;
        }
        self.height_rows.tick();
        self.center_row.tick();
        if let Phase::FadingOut {
            dismissal,
            ticks_left,
        } = self.phase
        {
            let ticks_left = ticks_left.saturating_sub(1);
            if ticks_left == 0 {
                self.phase = Phase::Closed;
                debug!(?dismissal, "alert closed");
                return Some(AlertEvent::Closed(dismissal));
            }
            self.phase = Phase::FadingOut {
                dismissal,
                ticks_left,
            };
        }
        None
    }

    /// Current opacity in [0, 1]; drives color blending during the fade.
    pub fn opacity(&self) -> f32 {
        match self.phase {
            Phase::Shown => 1.0,
            Phase::FadingOut { ticks_left, .. } => {
                f32::from(ticks_left) / f32::from(FADE_TICKS)
            }
            Phase::Closed => 0.0,
        }
    }

    /// Blend `color` toward the obscured background by the current opacity.
    fn faded(&self, color: Color) -> Color {
        blend(color, self.style.obscured_background, self.opacity())
    }

    // --- geometry ---

    pub const fn viewport(&self) -> Rect {
        self.viewport
    }

    /// Width of the body's content area (inside borders) for the current
    /// viewport; used for wrap estimates before the frame is drawn.
    pub fn content_width(&self) -> u16 {
        (f32::from(self.viewport.width) * BODY_WIDTH_FRACTION) as u16
    }

    fn update_viewport(&mut self, area: Rect) {
        let first_frame = self.viewport.height == 0;
        let resized = self.viewport != area;
        self.viewport = area;

        let overlay_h = f32::from(area.height);
        let target_height = match self.height_intent {
            HeightIntent::Fraction(fraction) => overlay_h * fraction,
            HeightIntent::Rows(rows) => rows,
        }
        .clamp(4.0, overlay_h);

        let target_center = match self.anchor {
            Anchor::Center => overlay_h / 2.0,
            Anchor::Row(row) => row,
            Anchor::Bottom => overlay_h - target_height / 2.0,
        };

        if first_frame || resized {
            self.height_rows = Tween::snap(target_height);
            self.center_row = Tween::snap(target_center);
        } else {
            self.height_rows.retarget(target_height, RELAYOUT_TICKS);
            self.center_row.retarget(target_center, RELAYOUT_TICKS);
        }
    }

    /// Body rectangle for the current animation state.
    fn body_rect(&self) -> Rect {
        let area = self.viewport;
        let width = (f32::from(area.width) * BODY_WIDTH_FRACTION) as u16;
        let height = (self.height_rows.current().round() as u16)
            .clamp(4, area.height.max(4));
        let x = area.x + (area.width.saturating_sub(width)) / 2;
        let center = self.center_row.current().round() as i32;
        let half = i32::from(height / 2);
        let max_y = i32::from(area.height.saturating_sub(height));
        let y = (center - half).clamp(0, max_y.max(0)) as u16;
        Rect::new(x, area.y + y, width, height)
    }

    /// Render the overlay and the body chrome; returns the inner regions
    /// the variant fills with its content. Returns `None` once closed.
    pub fn render_chrome(&mut self, frame: &mut Frame, area: Rect) -> Option<BodyRegions> {
        if self.is_closed() {
            return None;
        }
        // Too small to place even a minimal body without clipping.
        if area.height < 6 || area.width < 10 {
            return None;
        }
        self.update_viewport(area);

        // Obscured full-screen overlay behind the body.
        frame.render_widget(Clear, area);
        frame.render_widget(
            Block::default().style(Style::default().bg(self.style.obscured_background)),
            area,
        );

        let body = self.body_rect();
        let border_style = Style::default().fg(self.faded(self.style.border_color));
        let block = Block::default()
            .borders(Borders::ALL)
            .border_type(self.style.border_type)
            .border_style(border_style)
            .style(Style::default().bg(self.style.body_background));
        let inner = block.inner(body);
        frame.render_widget(block, body);

        let overlay_h = f32::from(area.height);
        let title_rows = if self.title.is_some() {
            ((overlay_h * self.title_fraction).round() as u16).max(2)
        } else {
            0
        };
        let button_rows = ((overlay_h * BUTTON_FRACTION).round() as u16).max(2);

        let [title_area, content, buttons] = Layout::vertical([
            Constraint::Length(title_rows),
            Constraint::Min(0),
            Constraint::Length(button_rows),
        ])
        .areas(inner);

        if let Some(title) = &self.title {
            let title_block = Block::default()
                .borders(Borders::BOTTOM)
                .border_style(border_style);
            let paragraph = Paragraph::new(title.clone())
                .style(
                    Style::default()
                        .fg(self.faded(self.style.title_color))
                        .add_modifier(Modifier::BOLD),
                )
                .alignment(Alignment::Center)
                .block(title_block);
            frame.render_widget(paragraph, title_area);
        }

        self.render_buttons(frame, buttons, border_style);

        Some(BodyRegions { content, buttons })
    }

    /// Okay on the left, cancel on the right, equal widths, divider borders
    /// above and between them.
    fn render_buttons(&self, frame: &mut Frame, area: Rect, border_style: Style) {
        let row = Block::default()
            .borders(Borders::TOP)
            .border_style(border_style);
        let inner = row.inner(area);
        frame.render_widget(row, area);

        let [okay_area, cancel_area] =
            Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)])
                .areas(inner);

        let divider = Block::default()
            .borders(Borders::RIGHT)
            .border_style(border_style);
        let okay_inner = divider.inner(okay_area);
        frame.render_widget(divider, okay_area);

        self.render_button(
            frame,
            okay_inner,
            self.okay_hint.as_deref(),
            &self.okay_text,
            self.style.okay_button_color,
        );
        self.render_button(
            frame,
            cancel_area,
            self.cancel_hint.as_deref(),
            &self.cancel_text,
            self.style.cancel_button_color,
        );
    }

    fn render_button(
        &self,
        frame: &mut Frame,
        area: Rect,
        hint: Option<&str>,
        text: &str,
        color: Color,
    ) {
        let mut spans = Vec::new();
        if let Some(hint) = hint {
            spans.push(Span::styled(
                format!("[{hint}] "),
                Style::default().fg(self.faded(self.style.hint_color)),
            ));
        }
        spans.push(Span::styled(
            text.to_string(),
            Style::default()
                .fg(self.faded(color))
                .add_modifier(Modifier::BOLD),
        ));
        let paragraph = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
        // Vertically center within the row.
        let y = area.y + area.height / 2;
        let line_area = Rect::new(area.x, y.min(area.bottom().saturating_sub(1)), area.width, 1);
        frame.render_widget(paragraph, line_area);
    }
}

/// Linear blend of two colors; `t = 1` yields `a`, `t = 0` yields `b`.
/// Non-RGB colors cannot be interpolated and snap at the midpoint.
fn blend(a: Color, b: Color, t: f32) -> Color {
    match (a, b) {
        (Color::Rgb(ar, ag, ab), Color::Rgb(br, bg, bb)) => {
            let mix = |x: u8, y: u8| -> u8 {
                (f32::from(y) + (f32::from(x) - f32::from(y)) * t).round() as u8
            };
            Color::Rgb(mix(ar, br), mix(ag, bg), mix(ab, bb))
        }
        _ if t >= 0.5 => a,
        _ => b,
    }
}
