//! Profile setup screen: department chips and the "Enter Campus" button.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};

use crate::model::Department;
use crate::tui::action::{Action, ScreenHandler};

/// State for the profile setup screen.
#[derive(Debug, Clone, Default)]
pub struct ProfileState {
    /// Index of the highlighted chip in [`Department::all`].
    cursor: usize,
}

impl ProfileState {
    /// Creates the screen with the first chip highlighted.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the highlighted department.
    pub fn highlighted(&self) -> Department {
        Department::all()[self.cursor]
    }

    fn move_right(&mut self) {
        self.cursor = (self.cursor + 1) % Department::all().len();
    }

    fn move_left(&mut self) {
        let len = Department::all().len();
        self.cursor = (self.cursor + len - 1) % len;
    }
}

impl ScreenHandler for ProfileState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Right | KeyCode::Tab => {
                self.move_right();
                Action::None
            }
            KeyCode::Left | KeyCode::BackTab => {
                self.move_left();
                Action::None
            }
            KeyCode::Char(' ') => Action::SelectDepartment(self.highlighted()),
            KeyCode::Char(ch) => match ch.to_digit(10) {
                Some(n) if (1..=Department::all().len()).contains(&(n as usize)) => {
                    self.cursor = n as usize - 1;
                    Action::SelectDepartment(self.highlighted())
                }
                _ => Action::None,
            },
            KeyCode::Enter => Action::ConfirmProfile,
            KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }
}

/// Renders the profile setup screen.
///
/// `selected` is the department currently stored in the form, which may
/// differ from the highlighted chip.
#[mutants::skip]
pub fn draw_profile(
    state: &ProfileState,
    selected: Option<Department>,
    frame: &mut Frame,
    area: Rect,
) {
    let block = Block::default()
        .title(" Professional Profile ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Magenta));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let [subtitle_area, chips_area, button_area, _spacer, footer_area] = Layout::vertical([
        Constraint::Length(2),
        Constraint::Length(2),
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(inner);

    let subtitle = Paragraph::new(Line::from("Choose your department and section"))
        .style(Style::default().fg(Color::Gray));
    frame.render_widget(subtitle, subtitle_area);

    let mut chips = Vec::new();
    for (i, dept) in Department::all().iter().enumerate() {
        let is_selected = selected == Some(*dept);
        let mut style = if is_selected {
            Style::default()
                .fg(Color::White)
                .bg(Color::Magenta)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default().fg(Color::Magenta)
        };
        if i == state.cursor {
            style = style.add_modifier(Modifier::UNDERLINED);
        }
        chips.push(Span::styled(format!("({}) {}", i + 1, dept.label()), style));
        chips.push(Span::raw("  "));
    }
    frame.render_widget(Paragraph::new(Line::from(chips)), chips_area);

    let button = Span::styled(
        "[ Enter Campus ]",
        Style::default()
            .fg(Color::Magenta)
            .add_modifier(Modifier::BOLD),
    );
    frame.render_widget(Paragraph::new(Line::from(button)), button_area);

    let footer = Paragraph::new(Line::from(
        "\u{2190}/\u{2192}: move  Space/1-4: select  Enter: enter campus",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}

#[cfg(test)]
mod tests {
    use crossterm::event::{KeyEventKind, KeyEventState, KeyModifiers};

    use super::*;

    fn press(code: KeyCode) -> KeyEvent {
        KeyEvent {
            code,
            modifiers: KeyModifiers::NONE,
            kind: KeyEventKind::Press,
            state: KeyEventState::NONE,
        }
    }

    #[test]
    fn starts_on_first_chip() {
        assert_eq!(ProfileState::new().highlighted(), Department::BTechCs);
    }

    #[test]
    fn arrows_move_and_wrap() {
        let mut state = ProfileState::new();
        state.handle_key(press(KeyCode::Left));
        assert_eq!(state.highlighted(), Department::Medical);
        state.handle_key(press(KeyCode::Right));
        assert_eq!(state.highlighted(), Department::BTechCs);
        state.handle_key(press(KeyCode::Tab));
        assert_eq!(state.highlighted(), Department::Mechanical);
    }

    #[test]
    fn moving_does_not_select() {
        let mut state = ProfileState::new();
        assert_eq!(state.handle_key(press(KeyCode::Right)), Action::None);
    }

    #[test]
    fn space_selects_highlighted() {
        let mut state = ProfileState::new();
        state.handle_key(press(KeyCode::Right));
        state.handle_key(press(KeyCode::Right));
        assert_eq!(
            state.handle_key(press(KeyCode::Char(' '))),
            Action::SelectDepartment(Department::BCom)
        );
    }

    #[test]
    fn digits_select_directly() {
        let mut state = ProfileState::new();
        assert_eq!(
            state.handle_key(press(KeyCode::Char('4'))),
            Action::SelectDepartment(Department::Medical)
        );
        assert_eq!(state.highlighted(), Department::Medical);
    }

    #[test]
    fn out_of_range_digits_ignored() {
        let mut state = ProfileState::new();
        assert_eq!(state.handle_key(press(KeyCode::Char('0'))), Action::None);
        assert_eq!(state.handle_key(press(KeyCode::Char('5'))), Action::None);
        assert_eq!(state.highlighted(), Department::BTechCs);
    }

    #[test]
    fn enter_confirms_without_selection() {
        let mut state = ProfileState::new();
        assert_eq!(state.handle_key(press(KeyCode::Enter)), Action::ConfirmProfile);
    }

    #[test]
    fn esc_quits() {
        let mut state = ProfileState::new();
        assert_eq!(state.handle_key(press(KeyCode::Esc)), Action::Quit);
    }

    mod rendering {
        use ratatui::Terminal;
        use ratatui::backend::TestBackend;

        use super::*;

        fn buffer_to_string(buf: &ratatui::buffer::Buffer) -> String {
            let mut s = String::new();
            for y in 0..buf.area.height {
                for x in 0..buf.area.width {
                    s.push(buf[(x, y)].symbol().chars().next().unwrap_or(' '));
                }
                s.push('\n');
            }
            s
        }

        #[test]
        fn renders_all_chips_and_button() {
            let backend = TestBackend::new(80, 12);
            let mut terminal = Terminal::new(backend).unwrap();
            terminal
                .draw(|frame| {
                    draw_profile(&ProfileState::new(), None, frame, frame.area());
                })
                .unwrap();
            let output = buffer_to_string(terminal.backend().buffer());
            assert!(output.contains("Professional Profile"));
            for dept in Department::all() {
                assert!(output.contains(dept.label()), "missing chip {dept}");
            }
            assert!(output.contains("Enter Campus"));
        }
    }
}
