//! Registration screen: name, college email and password.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::RegistrationField;
use crate::tui::action::{Action, ScreenHandler};
use crate::tui::widgets::form::{Form, FormField, draw_form};

/// State for the registration screen.
///
/// Kept for the lifetime of the app, so typed values survive logout.
#[derive(Debug, Clone)]
pub struct RegistrationState {
    form: Form,
}

impl Default for RegistrationState {
    fn default() -> Self {
        Self::new()
    }
}

impl RegistrationState {
    /// Creates the registration form with empty fields.
    pub fn new() -> Self {
        let fields = RegistrationField::all()
            .iter()
            .map(|field| {
                let form_field = FormField::new(field.label(), placeholder(*field));
                match field {
                    RegistrationField::Password => form_field.masked(),
                    _ => form_field,
                }
            })
            .collect();
        Self {
            form: Form::new(fields),
        }
    }

    /// Returns a reference to the form for rendering.
    pub fn form(&self) -> &Form {
        &self.form
    }

    /// Returns the field that currently has focus.
    pub fn focused_field(&self) -> RegistrationField {
        RegistrationField::all()[self.form.focus()]
    }

    /// Reports the focused field's new value to the app.
    fn field_changed(&self) -> Action {
        Action::UpdateField(
            self.focused_field(),
            self.form.value(self.form.focus()).to_string(),
        )
    }
}

impl ScreenHandler for RegistrationState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Tab | KeyCode::Down => {
                self.form.focus_next();
                Action::None
            }
            KeyCode::BackTab | KeyCode::Up => {
                self.form.focus_prev();
                Action::None
            }
            KeyCode::Char(ch) => {
                self.form.insert_char(ch);
                self.field_changed()
            }
            KeyCode::Backspace => {
                self.form.delete_char();
                self.field_changed()
            }
            KeyCode::Enter => Action::SubmitRegistration,
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }
}

fn placeholder(field: RegistrationField) -> &'static str {
    match field {
        RegistrationField::Name => "Enter your name",
        RegistrationField::Email => "example@college.ac.in",
        RegistrationField::Password => "Min 6 characters",
    }
}

/// Renders the registration screen.
#[mutants::skip]
pub fn draw_registration(state: &RegistrationState, loading: bool, frame: &mut Frame, area: Rect) {
    let block = Block::default()
        .title(" CampusSphere ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [subtitle_area, form_area, button_area, _spacer, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(9),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let subtitle = Paragraph::new(Line::from("Join your college network"))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(subtitle, subtitle_area);

    draw_form(state.form(), frame, form_area);

    let button = if loading {
        Span::styled("Please wait...", Style::default().fg(Color::Yellow))
    } else {
        Span::styled(
            "[ Verify Email & Join ]",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )
    };
    frame.render_widget(Paragraph::new(Line::from(button)), button_area);

    let footer = Paragraph::new(Line::from(
        "Tab/Shift+Tab: next/prev  Enter: join  Esc: quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
