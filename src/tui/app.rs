//! Main TUI application state and logic

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::{
    backend::Backend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};
use std::sync::Arc;
use tracing::{debug, info};

use super::components::{DropdownOption, FormField, FormFieldType, ResultPanel};
use super::ui::{self, Styles, SPINNER_FRAMES};
use crate::config::Config;
use crate::controller::{validation, FormController, Phase};
use crate::models::{Airline, FieldName, PNR_LENGTH};
use crate::service::BoardingPassService;

const FORM_WIDTH: u16 = 72;

/// Focusable elements of the form, in tab order
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Focus {
    Airline,
    Pnr,
    LastName,
    Submit,
}

impl Focus {
    const ORDER: [Focus; 4] = [Focus::Airline, Focus::Pnr, Focus::LastName, Focus::Submit];

    fn index(self) -> usize {
        Self::ORDER.iter().position(|f| *f == self).unwrap_or(0)
    }

    pub fn next(self) -> Focus {
        Self::ORDER[(self.index() + 1) % Self::ORDER.len()]
    }

    pub fn previous(self) -> Focus {
        let len = Self::ORDER.len();
        Self::ORDER[(self.index() + len - 1) % len]
    }

    fn field(self) -> Option<FieldName> {
        match self {
            Focus::Airline => Some(FieldName::Airline),
            Focus::Pnr => Some(FieldName::Pnr),
            Focus::LastName => Some(FieldName::LastName),
            Focus::Submit => None,
        }
    }
}

/// Main TUI application state
pub struct App {
    /// Application configuration
    pub config: Config,
    pub controller: FormController,

    pub airline_field: FormField,
    pub pnr_field: FormField,
    pub last_name_field: FormField,
    pub focus: Focus,

    pub should_quit: bool,
    tick: usize,
}

impl App {
    pub fn new(config: Config, service: Arc<dyn BoardingPassService>) -> Self {
        let controller = FormController::new(service, config.submit_timeout());

        let mut options = vec![DropdownOption::new("", "Choose your airline")];
        options.extend(
            Airline::ALL
                .iter()
                .map(|airline| DropdownOption::new(airline.id(), airline.label())),
        );

        let mut app = Self {
            config,
            controller,
            airline_field: FormField::new("Select Airline *", FormFieldType::Dropdown)
                .with_placeholder("Choose your airline")
                .with_dropdown_options(options),
            pnr_field: FormField::new("PNR Number *", FormFieldType::Text)
                .with_placeholder("Enter your 6-character PNR")
                .with_max_len(PNR_LENGTH)
                .with_char_filter(validation::is_pnr_char),
            last_name_field: FormField::new("Last Name *", FormFieldType::Text)
                .with_placeholder("Enter passenger's last name"),
            focus: Focus::Airline,
            should_quit: false,
            tick: 0,
        };
        app.update_focus();
        app
    }

    /// Run the main application loop
    pub async fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> Result<()> {
        let tick_rate = self.config.tick_rate();

        loop {
            // Draw the UI
            terminal.draw(|f| self.draw(f))?;

            // Handle events
            if event::poll(tick_rate)? {
                if let Event::Key(key) = event::read()? {
                    if key.kind == KeyEventKind::Press {
                        self.handle_key_event(key)?;
                    }
                }
            }

            self.on_tick();

            if self.should_quit {
                break;
            }
        }

        self.controller.dispose();
        Ok(())
    }

    /// Advance the spinner and pick up finished submissions
    pub fn on_tick(&mut self) {
        self.tick = self.tick.wrapping_add(1);
        if let Some(phase) = self.controller.try_resolve() {
            debug!(?phase, "Submission settled");
        }
    }

    /// Handle keyboard input events
    pub fn handle_key_event(&mut self, key: KeyEvent) -> Result<()> {
        if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
            self.should_quit = true;
            return Ok(());
        }

        if self.airline_field.show_dropdown {
            return self.handle_dropdown_event(key);
        }

        match key.code {
            KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab | KeyCode::Down => {
                self.focus = self.focus.next();
                self.update_focus();
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.focus = self.focus.previous();
                self.update_focus();
            }
            KeyCode::Enter => match self.focus {
                Focus::Airline => self.airline_field.toggle_dropdown(),
                _ => self.submit(),
            },
            KeyCode::Char(c) => {
                if let Some(field) = self.focused_field_mut() {
                    if field.insert_char(c) {
                        self.push_focused_value();
                    }
                }
            }
            KeyCode::Backspace | KeyCode::Delete if self.focus == Focus::Airline => {
                self.controller.on_field_change(FieldName::Airline, "");
                self.airline_field.sync_value("");
            }
            KeyCode::Backspace => {
                if let Some(field) = self.focused_field_mut() {
                    if field.delete_char() {
                        self.push_focused_value();
                    }
                }
            }
            KeyCode::Delete => {
                if let Some(field) = self.focused_field_mut() {
                    if field.delete_char_forward() {
                        self.push_focused_value();
                    }
                }
            }
            KeyCode::Left => {
                if let Some(field) = self.focused_field_mut() {
                    field.move_cursor_left();
                }
            }
            KeyCode::Right => {
                if let Some(field) = self.focused_field_mut() {
                    field.move_cursor_right();
                }
            }
            KeyCode::Home => {
                if let Some(field) = self.focused_field_mut() {
                    field.move_cursor_to_start();
                }
            }
            KeyCode::End => {
                if let Some(field) = self.focused_field_mut() {
                    field.move_cursor_to_end();
                }
            }
            _ => {}
        }

        Ok(())
    }

    fn handle_dropdown_event(&mut self, key: KeyEvent) -> Result<()> {
        match key.code {
            KeyCode::Up => self.airline_field.dropdown_up(),
            KeyCode::Down => self.airline_field.dropdown_down(),
            KeyCode::Enter => {
                if let Some(value) = self.airline_field.select_dropdown_value() {
                    self.controller.on_field_change(FieldName::Airline, &value);
                    info!("Airline selected: {}", if value.is_empty() { "none" } else { value.as_str() });
                }
            }
            KeyCode::Esc => self.airline_field.close_dropdown(),
            _ => {}
        }
        Ok(())
    }

    /// Submit the form if the submit button is enabled
    fn submit(&mut self) {
        if !self.controller.can_submit() {
            debug!("Submit ignored while disabled");
            return;
        }
        let phase = self.controller.on_submit();
        if phase == Phase::Pending {
            self.tick = 0;
        }
    }

    fn focused_field_mut(&mut self) -> Option<&mut FormField> {
        match self.focus {
            Focus::Airline => Some(&mut self.airline_field),
            Focus::Pnr => Some(&mut self.pnr_field),
            Focus::LastName => Some(&mut self.last_name_field),
            Focus::Submit => None,
        }
    }

    /// Send the focused widget's text to the controller and show the stored value
    fn push_focused_value(&mut self) {
        let Some(name) = self.focus.field() else {
            return;
        };
        let Some(field) = self.focused_field_mut() else {
            return;
        };
        let raw = field.value.clone();
        self.controller.on_field_change(name, &raw);

        let stored = self.controller.form_data().get(name).to_string();
        if let Some(field) = self.focused_field_mut() {
            field.sync_value(&stored);
        }
    }

    fn update_focus(&mut self) {
        self.airline_field.set_focus(self.focus == Focus::Airline);
        self.pnr_field.set_focus(self.focus == Focus::Pnr);
        self.last_name_field.set_focus(self.focus == Focus::LastName);
    }

    /// Draw the UI
    pub fn draw(&mut self, f: &mut Frame) {
        let size = f.size();

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Min(0),
                Constraint::Length(3),
            ])
            .split(size);

        self.draw_header(f, chunks[0]);
        self.draw_form(f, ui::centered_column(FORM_WIDTH, chunks[1]));
        self.draw_status_bar(f, chunks[2]);
    }

    fn draw_header(&self, f: &mut Frame, area: Rect) {
        let lines = vec![
            Line::from(Span::styled("✈ Boarding Pass Generator", Styles::title())),
            Line::from(Span::styled(
                "Skip the queues, get your boarding pass instantly",
                Styles::inactive(),
            )),
        ];
        let header = Paragraph::new(lines).block(Block::default().borders(Borders::BOTTOM));
        f.render_widget(header, area);
    }

    fn draw_form(&mut self, f: &mut Frame, area: Rect) {
        let result_height = ResultPanel::height(self.controller.result());

        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([
                Constraint::Length(4),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(3),
                Constraint::Length(result_height),
                Constraint::Length(4),
                Constraint::Min(0),
            ])
            .split(area);

        self.draw_form_header(f, chunks[0]);
        self.airline_field.render(f, chunks[1]);
        self.pnr_field.render(f, chunks[2]);
        self.last_name_field.render(f, chunks[3]);
        self.draw_submit_button(f, chunks[4]);

        if let Some(result) = self.controller.result() {
            ResultPanel::render(f, chunks[5], result);
        }

        self.draw_supported_airlines(f, chunks[6]);

        // Dropdown goes last so it overlays the fields below it
        let popup = ui::dropdown_rect(chunks[1], self.airline_field.dropdown_height(), f.size());
        self.airline_field.render_dropdown(f, popup);
    }

    fn draw_form_header(&self, f: &mut Frame, area: Rect) {
        let accent = self.controller.accent();
        let prefix = self
            .controller
            .selected_airline()
            .map(|airline| format!("{} - ", airline.label()))
            .unwrap_or_default();

        let lines = vec![
            Line::from(Span::styled(
                "Generate Your Boarding Pass",
                ui::accent_style(accent),
            )),
            Line::from(vec![
                Span::styled(prefix, ui::accent_style(accent)),
                Span::raw("Enter your booking details to get started"),
            ]),
        ];

        let block = Block::default()
            .borders(Borders::ALL)
            .border_style(ui::accent_border(accent));

        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    fn draw_submit_button(&self, f: &mut Frame, area: Rect) {
        let accent = self.controller.accent();

        let label = if self.controller.is_loading() {
            let frame = SPINNER_FRAMES[self.tick % SPINNER_FRAMES.len()];
            format!("{} Generating Boarding Pass...", frame)
        } else {
            "⬇ Generate Boarding Pass".to_string()
        };

        let style = if self.controller.can_submit() {
            ui::accent_button(accent)
        } else {
            Styles::disabled()
        };

        let border_style = if self.focus == Focus::Submit {
            Styles::active_border()
        } else {
            Styles::inactive_border()
        };

        let button = Paragraph::new(label)
            .style(style)
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::ALL).border_style(border_style));

        f.render_widget(button, area);
    }

    fn draw_supported_airlines(&self, f: &mut Frame, area: Rect) {
        let entry = |airline: Airline| {
            vec![
                Span::styled("● ", ui::accent_style(airline.accent())),
                Span::raw(format!("{:<20}", airline.label())),
            ]
        };

        let lines: Vec<Line> = Airline::ALL
            .chunks(2)
            .map(|pair| Line::from(pair.iter().flat_map(|a| entry(*a)).collect::<Vec<_>>()))
            .collect();

        let block = Block::default()
            .title("Supported Airlines")
            .borders(Borders::ALL)
            .border_style(Styles::inactive_border());

        f.render_widget(Paragraph::new(lines).block(block), area);
    }

    /// Draw status bar with shortcuts
    fn draw_status_bar(&self, f: &mut Frame, area: Rect) {
        let text = if self.airline_field.show_dropdown {
            "↑/↓: Choose | Enter: Select | Esc: Close"
        } else {
            "Tab/↑/↓: Move | Enter: Select / Submit | Esc: Quit"
        };

        let status_bar = Paragraph::new(text)
            .style(Styles::inactive())
            .block(Block::default().borders(Borders::ALL));

        f.render_widget(status_bar, area);
    }
}
