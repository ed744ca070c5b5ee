//! Feed screen: greeting header and the section discussion post.

use crossterm::event::{KeyCode, KeyEvent};
use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};

use crate::model::FormInput;
use crate::tui::action::{Action, ScreenHandler};

/// State for the feed screen.
#[derive(Debug, Clone, Default)]
pub struct FeedState {
    /// Lines scrolled off the top of the post list.
    scroll: u16,
}

impl FeedState {
    /// Creates the feed scrolled to the top.
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the current scroll offset.
    pub fn scroll(&self) -> u16 {
        self.scroll
    }
}

impl ScreenHandler for FeedState {
    fn handle_key(&mut self, key: KeyEvent) -> Action {
        match key.code {
            KeyCode::Down | KeyCode::Char('j') => {
                self.scroll = self.scroll.saturating_add(1);
                Action::None
            }
            KeyCode::Up | KeyCode::Char('k') => {
                self.scroll = self.scroll.saturating_sub(1);
                Action::None
            }
            KeyCode::Char('l') => Action::Logout,
            KeyCode::Char('q') | KeyCode::Esc => Action::Quit,
            _ => Action::None,
        }
    }
}

/// Text of the welcome post for the student's section.
pub fn welcome_post(form: &FormInput) -> String {
    let group = form.section.map_or("campus", |d| d.label());
    format!(
        "Welcome to the official {group} group! You can also post anonymous confessions here."
    )
}

/// Renders the feed screen.
#[mutants::skip]
pub fn draw_feed(state: &FeedState, form: &FormInput, frame: &mut Frame, area: Rect) {
    let [header_area, posts_area, footer_area] = Layout::vertical([
        Constraint::Length(4),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    let header_block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray));
    let header_inner = header_block.inner(header_area);
    frame.render_widget(header_block, header_area);

    let [greeting_area, avatar_area] =
        Layout::horizontal([Constraint::Min(0), Constraint::Length(7)]).areas(header_inner);

    let greeting = Paragraph::new(vec![
        Line::from(Span::styled(
            format!("Hi, {} \u{1F44B}", form.display_name()),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            format!("{} | Verified", form.section_label()),
            Style::default().fg(Color::Gray),
        )),
    ]);
    frame.render_widget(greeting, greeting_area);

    let avatar = Paragraph::new(Line::from(Span::styled(
        format!("( {} )", form.initial()),
        Style::default().add_modifier(Modifier::BOLD),
    )))
    .alignment(Alignment::Right);
    frame.render_widget(avatar, avatar_area);

    let post = Paragraph::new(vec![
        Line::from(Span::styled(
            "Section Discussion",
            Style::default()
                .fg(Color::Magenta)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(welcome_post(form)),
    ])
    .wrap(Wrap { trim: true })
    .scroll((state.scroll, 0))
    .block(Block::default().borders(Borders::ALL));
    frame.render_widget(post, posts_area);

    let footer = Paragraph::new(Line::from(
        "\u{2191}/\u{2193}: scroll  l: logout  q: quit",
    ))
    .style(Style::default().fg(Color::DarkGray));
    frame.render_widget(footer, footer_area);
}
