use std::sync::Arc;

use crossterm::event::KeyEvent;
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};
use tokio::sync::mpsc;
use tokio::sync::mpsc::{UnboundedReceiver, UnboundedSender};
use tracing::info;

use ratalert::config::{self, GlobalAction, KeyResolver};
use ratalert::theme::{ThemeInfo, available_themes};
use ratalert::ui::{
    AlertStyle, ConfirmationAlert, KeyboardInfo, KeyboardNotifier, Modal, ValidatedInputAlert,
};

use crate::tui::{Event, Tui};

enum ActiveAlert {
    Confirm(ConfirmationAlert),
    Input(ValidatedInputAlert),
}

/// Demo host screen: opens the alert variants, plays the platform role for
/// the input alert by showing an on-screen keyboard panel and posting its
/// height, and logs callback invocations.
pub struct App {
    resolver: Arc<KeyResolver>,
    themes: Vec<ThemeInfo>,
    theme_index: usize,
    alert: Option<ActiveAlert>,
    notifier: KeyboardNotifier,
    posted_keyboard_rows: Option<u16>,
    results: Vec<String>,
    result_tx: UnboundedSender<String>,
    result_rx: UnboundedReceiver<String>,
    should_quit: bool,
}

impl App {
    pub fn new(resolver: Arc<KeyResolver>, theme_name: &str) -> Self {
        let themes = available_themes();
        let theme_index = themes
            .iter()
            .position(|t| t.name.eq_ignore_ascii_case(theme_name))
            .unwrap_or(0);
        let (result_tx, result_rx) = mpsc::unbounded_channel();
        Self {
            resolver,
            themes,
            theme_index,
            alert: None,
            notifier: KeyboardNotifier::new(),
            posted_keyboard_rows: None,
            results: Vec::new(),
            result_tx,
            result_rx,
            should_quit: false,
        }
    }

    pub async fn run(&mut self) -> color_eyre::Result<()> {
        let mut tui = Tui::new(60.0, 4.0)?;
        tui.enter()?;

        loop {
            self.handle_events(&mut tui).await?;
            if self.should_quit {
                break;
            }
        }

        tui.exit()?;
        Ok(())
    }

    async fn handle_events(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        let Some(event) = tui.next_event().await else {
            self.should_quit = true;
            return Ok(());
        };

        match event {
            Event::Quit => self.should_quit = true,
            Event::Tick => self.handle_tick(),
            Event::Render | Event::Init => self.render(tui)?,
            Event::Resize(width, height) => {
                tui.resize(Rect::new(0, 0, width, height))?;
                self.render(tui)?;
            }
            Event::Key(key) => self.handle_key(key)?,
            Event::Error(message) => {
                self.results.push(format!("error: {message}"));
            }
        }

        while let Ok(line) = self.result_rx.try_recv() {
            info!(result = %line, "alert callback");
            self.results.push(line);
        }

        Ok(())
    }

    fn handle_tick(&mut self) {
        let closed = match &mut self.alert {
            Some(ActiveAlert::Confirm(alert)) => alert.handle_tick().is_some(),
            Some(ActiveAlert::Input(alert)) => alert.handle_tick().is_some(),
            None => false,
        };
        if closed {
            // The alert has detached itself; dropping it is the removal.
            self.alert = None;
            self.posted_keyboard_rows = None;
        }
    }

    fn handle_key(&mut self, key: KeyEvent) -> color_eyre::Result<()> {
        if let Some(alert) = &mut self.alert {
            match alert {
                ActiveAlert::Confirm(alert) => {
                    alert.handle_key(key)?;
                }
                ActiveAlert::Input(alert) => {
                    alert.handle_key(key)?;
                }
            }
            return Ok(());
        }

        if self.resolver.matches_global(&key, GlobalAction::Quit) {
            self.should_quit = true;
        } else if self.resolver.matches_global(&key, GlobalAction::Theme) {
            self.cycle_theme()?;
        } else if self.resolver.matches_global(&key, GlobalAction::Confirm) {
            self.open_confirm();
        } else if self.resolver.matches_global(&key, GlobalAction::Input) {
            self.open_input();
        }
        Ok(())
    }

    fn cycle_theme(&mut self) -> color_eyre::Result<()> {
        self.theme_index = (self.theme_index + 1) % self.themes.len();
        config::save_theme(self.themes[self.theme_index].name)?;
        Ok(())
    }

    fn theme(&self) -> &ThemeInfo {
        &self.themes[self.theme_index]
    }

    fn open_confirm(&mut self) {
        let style = AlertStyle::from_theme(&self.theme().theme);
        let okay_tx = self.result_tx.clone();
        let cancel_tx = self.result_tx.clone();
        let alert = ConfirmationAlert::new(
            Some("Confirm".to_string()),
            "Delete the selected item? This cannot be undone.",
            style,
            Arc::clone(&self.resolver),
        )
        .on_okay(move || {
            let _ = okay_tx.send("confirm: okay".to_string());
        })
        .on_cancel(move || {
            let _ = cancel_tx.send("confirm: cancelled".to_string());
        });
        self.alert = Some(ActiveAlert::Confirm(alert));
    }

    fn open_input(&mut self) {
        let style = AlertStyle::from_theme(&self.theme().theme);
        let okay_tx = self.result_tx.clone();
        let cancel_tx = self.result_tx.clone();
        let alert = ValidatedInputAlert::new(
            Some("New item".to_string()),
            "Enter a name for the item.",
            style,
            &self.notifier,
        )
        .placeholder("name")
        .validator(|text| !text.trim().is_empty())
        .validation_message(|_| Some("A name is required".to_string()))
        .on_okay(move |text| {
            let _ = okay_tx.send(format!("input: okay({text:?})"));
        })
        .on_cancel(move || {
            let _ = cancel_tx.send("input: cancelled".to_string());
        });
        self.posted_keyboard_rows = None;
        self.alert = Some(ActiveAlert::Input(alert));
    }

    fn render(&mut self, tui: &mut Tui) -> color_eyre::Result<()> {
        tui.draw(|frame| {
            let area = frame.area();
            self.render_home(frame, area);

            // Keyboard panel reserves the bottom third while the field has
            // focus; its height is what the notifier reports.
            let keyboard_rows = if self.input_has_focus() {
                area.height / 3
            } else {
                0
            };

            let theme = self.themes[self.theme_index].theme;
            match &mut self.alert {
                Some(ActiveAlert::Confirm(alert)) => alert.render(frame, area, &theme),
                Some(ActiveAlert::Input(alert)) => alert.render(frame, area, &theme),
                None => {}
            }

            if keyboard_rows > 0 {
                Self::render_keyboard_panel(frame, area, keyboard_rows, &theme);
                self.post_keyboard_if_needed(keyboard_rows);
            }
        })?;
        Ok(())
    }

    /// Post the keyboard height when it first appears and again whenever
    /// the panel height changes (a terminal resize changes it).
    fn post_keyboard_if_needed(&mut self, rows: u16) {
        if self.posted_keyboard_rows != Some(rows) {
            self.notifier.post(KeyboardInfo { height: rows });
            self.posted_keyboard_rows = Some(rows);
        }
    }

    fn input_has_focus(&self) -> bool {
        matches!(&self.alert, Some(ActiveAlert::Input(alert)) if alert.is_focused())
    }

    fn render_home(&self, frame: &mut Frame, area: Rect) {
        let theme = &self.theme().theme;
        let key_style = Style::default()
            .fg(theme.peach())
            .add_modifier(Modifier::BOLD);
        let text_style = Style::default().fg(theme.text());
        let dim_style = Style::default().fg(theme.overlay1());

        let binding = |action| format!("[{}]", self.resolver.display_global(action));
        let mut lines = vec![
            Line::from(""),
            Line::from(vec![
                Span::styled(binding(GlobalAction::Confirm), key_style),
                Span::styled(" confirmation alert    ", text_style),
                Span::styled(binding(GlobalAction::Input), key_style),
                Span::styled(" input alert", text_style),
            ]),
            Line::from(vec![
                Span::styled(binding(GlobalAction::Theme), key_style),
                Span::styled(format!(" theme ({})    ", self.theme().name), text_style),
                Span::styled(binding(GlobalAction::Quit), key_style),
                Span::styled(" quit", text_style),
            ]),
            Line::from(""),
        ];
        for result in self.results.iter().rev().take(8) {
            lines.push(Line::from(Span::styled(result.clone(), dim_style)));
        }

        let block = Block::default()
            .title(" ratalert demo ")
            .title_style(
                Style::default()
                    .fg(theme.mauve())
                    .add_modifier(Modifier::BOLD),
            )
            .borders(Borders::ALL)
            .border_type(theme.border_type)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.base()));

        let paragraph = Paragraph::new(lines)
            .block(block)
            .alignment(Alignment::Center);
        frame.render_widget(paragraph, area);
    }

    fn render_keyboard_panel(frame: &mut Frame, area: Rect, rows: u16, theme: &ratalert::Theme) {
        let [_, panel] =
            Layout::vertical([Constraint::Min(0), Constraint::Length(rows)]).areas(area);
        frame.render_widget(Clear, panel);
        let block = Block::default()
            .title(" keyboard ")
            .title_style(Style::default().fg(theme.overlay1()))
            .borders(Borders::TOP)
            .border_style(Style::default().fg(theme.border()))
            .style(Style::default().bg(theme.mantle));
        frame.render_widget(block, panel);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ratalert::config::keybindings::KeybindingsConfig;

    fn app() -> App {
        let resolver = Arc::new(KeyResolver::new(Arc::new(KeybindingsConfig::default())));
        App::new(resolver, "Catppuccin Mocha")
    }

    #[test]
    fn keyboard_height_is_posted_once_per_height() {
        let mut app = app();
        let mut sub = app.notifier.subscribe();

        app.post_keyboard_if_needed(8);
        app.post_keyboard_if_needed(8);
        assert_eq!(sub.try_recv(), Some(KeyboardInfo { height: 8 }));
        assert_eq!(sub.try_recv(), None);
    }

    #[test]
    fn resized_keyboard_panel_is_reposted() {
        let mut app = app();
        let mut sub = app.notifier.subscribe();

        app.post_keyboard_if_needed(8);
        app.post_keyboard_if_needed(12);
        // try_recv coalesces; the latest height is the resized one.
        assert_eq!(sub.try_recv(), Some(KeyboardInfo { height: 12 }));
    }
}
