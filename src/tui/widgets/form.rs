//! Reusable form widget for text input screens.

use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

/// Character drawn in place of each character of a masked value.
const MASK_CHAR: char = '\u{2022}';

/// A single field within a [`Form`].
#[derive(Debug, Clone)]
pub struct FormField {
    /// Display label shown in the field's border.
    pub label: String,
    /// Current text value.
    pub value: String,
    /// Hint shown while the value is empty.
    pub placeholder: String,
    /// Whether the value is drawn masked (passwords).
    pub masked: bool,
}

impl FormField {
    /// Creates a new plain-text form field.
    pub fn new(label: impl Into<String>, placeholder: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: String::new(),
            placeholder: placeholder.into(),
            masked: false,
        }
    }

    /// Marks the field as masked.
    pub fn masked(mut self) -> Self {
        self.masked = true;
        self
    }

    /// Returns the text to draw for the current value.
    pub fn display_value(&self) -> String {
        if self.masked {
            self.value.chars().map(|_| MASK_CHAR).collect()
        } else {
            self.value.clone()
        }
    }
}

/// A multi-field text form with focus management.
#[derive(Debug, Clone)]
pub struct Form {
    fields: Vec<FormField>,
    focus: usize,
}

impl Form {
    /// Creates a new form with the given fields. Focus starts on the first field.
    pub fn new(fields: Vec<FormField>) -> Self {
        Self { fields, focus: 0 }
    }

    /// Returns the index of the currently focused field.
    pub fn focus(&self) -> usize {
        self.focus
    }

    /// Moves focus to the next field, wrapping around.
    pub fn focus_next(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + 1) % self.fields.len();
    }

    /// Moves focus to the previous field, wrapping around.
    pub fn focus_prev(&mut self) {
        if self.fields.is_empty() {
            return;
        }
        self.focus = (self.focus + self.fields.len() - 1) % self.fields.len();
    }

    /// Inserts a character at the end of the focused field.
    pub fn insert_char(&mut self, ch: char) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.push(ch);
        }
    }

    /// Deletes the last character from the focused field.
    pub fn delete_char(&mut self) {
        if let Some(field) = self.fields.get_mut(self.focus) {
            field.value.pop();
        }
    }

    /// Returns the value of the field at `index`, or an empty string if out of bounds.
    pub fn value(&self, index: usize) -> &str {
        self.fields
            .get(index)
            .map(|f| f.value.as_str())
            .unwrap_or("")
    }

    /// Returns all field values as a vector of string slices.
    pub fn values(&self) -> Vec<&str> {
        self.fields.iter().map(|f| f.value.as_str()).collect()
    }

    /// Returns a reference to the fields.
    pub fn fields(&self) -> &[FormField] {
        &self.fields
    }
}

/// Renders a form within the given area.
#[cfg_attr(coverage_nightly, coverage(off))]
#[mutants::skip]
pub fn draw_form(form: &Form, frame: &mut Frame, area: Rect) {
    let row_height = 3_u16;
    let constraints: Vec<Constraint> = form
        .fields
        .iter()
        .map(|_| Constraint::Length(row_height))
        .collect();

    let rows = Layout::vertical(constraints).split(area);

    for (i, field) in form.fields.iter().enumerate() {
        let is_focused = i == form.focus;

        let border_color = if is_focused {
            Color::Magenta
        } else {
            Color::DarkGray
        };

        let block = Block::default()
            .title(field.label.as_str())
            .borders(Borders::ALL)
            .border_style(Style::default().fg(border_color));

        let mut spans = if field.value.is_empty() && !is_focused {
            vec![Span::styled(
                field.placeholder.as_str(),
                Style::default().fg(Color::DarkGray),
            )]
        } else {
            vec![Span::raw(field.display_value())]
        };
        if is_focused {
            spans.push(Span::styled(
                "\u{2588}",
                Style::default().add_modifier(Modifier::SLOW_BLINK),
            ));
        }

        let paragraph = Paragraph::new(Line::from(spans)).block(block);
        frame.render_widget(paragraph, rows[i]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn make_form() -> Form {
        Form::new(vec![
            FormField::new("Full Name", "Enter your name"),
            FormField::new("College Email ID", "example@college.ac.in"),
            FormField::new("Password", "Min 6 characters").masked(),
        ])
    }

    // --- Focus management ---

    #[test]
    fn focus_starts_at_zero() {
        let form = make_form();
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn focus_next_advances_and_wraps() {
        let mut form = make_form();
        form.focus_next();
        assert_eq!(form.focus(), 1);
        form.focus_next();
        assert_eq!(form.focus(), 2);
        form.focus_next();
        assert_eq!(form.focus(), 0);
    }

    #[test]
    fn focus_prev_wraps() {
        let mut form = make_form();
        form.focus_prev();
        assert_eq!(form.focus(), 2);
    }

    #[test]
    fn focus_on_empty_form_is_noop() {
        let mut form = Form::new(vec![]);
        form.focus_next();
        form.focus_prev();
        assert_eq!(form.focus(), 0);
    }

    // --- Character insert/delete ---

    #[test]
    fn insert_char_appends_to_focused() {
        let mut form = make_form();
        form.insert_char('A');
        form.insert_char('s');
        assert_eq!(form.value(0), "As");
        assert_eq!(form.value(1), "");
    }

    #[test]
    fn delete_char_removes_last() {
        let mut form = make_form();
        form.insert_char('A');
        form.insert_char('B');
        form.delete_char();
        assert_eq!(form.value(0), "A");
    }

    #[test]
    fn delete_char_on_empty_is_noop() {
        let mut form = make_form();
        form.delete_char();
        assert_eq!(form.value(0), "");
    }

    #[test]
    fn insert_on_empty_form_is_noop() {
        let mut form = Form::new(vec![]);
        form.insert_char('x');
        assert!(form.values().is_empty());
    }

    // --- Values ---

    #[test]
    fn values_returns_all_field_values() {
        let mut form = make_form();
        form.insert_char('A');
        form.focus_next();
        form.insert_char('B');
        assert_eq!(form.values(), vec!["A", "B", ""]);
    }

    #[test]
    fn value_out_of_bounds_returns_empty() {
        let form = make_form();
        assert_eq!(form.value(99), "");
    }

    // --- Masking ---

    #[test]
    fn masked_field_hides_value() {
        let mut form = make_form();
        form.focus_prev();
        for ch in "hunter22".chars() {
            form.insert_char(ch);
        }
        let field = &form.fields()[2];
        assert_eq!(field.value, "hunter22");
        assert_eq!(field.display_value(), "\u{2022}".repeat(8));
    }

    #[test]
    fn plain_field_shows_value() {
        let mut form = make_form();
        form.insert_char('A');
        assert_eq!(form.fields()[0].display_value(), "A");
    }

    #[test]
    fn fields_returns_correct_labels() {
        let form = make_form();
        let labels: Vec<&str> = form.fields().iter().map(|f| f.label.as_str()).collect();
        assert_eq!(labels, vec!["Full Name", "College Email ID", "Password"]);
    }
}
