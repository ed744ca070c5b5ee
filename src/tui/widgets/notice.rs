//! Modal notice widget for success and error messages.

use ratatui::Frame;
use ratatui::layout::{Alignment, Constraint, Flex, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::flow::{Notice, NoticeKind};

/// Width of the popup, clamped to the available area.
const POPUP_WIDTH: u16 = 50;
/// Height of the popup, clamped to the available area.
const POPUP_HEIGHT: u16 = 7;

/// Renders `notice` as a centered popup over whatever is already drawn.
#[mutants::skip]
pub fn draw_notice(notice: &Notice, frame: &mut Frame, area: Rect) {
    let color = match notice.kind {
        NoticeKind::Success => Color::Green,
        NoticeKind::Error => Color::Red,
    };

    let [popup] = Layout::horizontal([Constraint::Length(POPUP_WIDTH.min(area.width))])
        .flex(Flex::Center)
        .areas(area);
    let [popup] = Layout::vertical([Constraint::Length(POPUP_HEIGHT.min(area.height))])
        .flex(Flex::Center)
        .areas(popup);

    let block = Block::default()
        .title(format!(" {} ", notice.title))
        .title_style(Style::default().fg(color).add_modifier(Modifier::BOLD))
        .borders(Borders::ALL)
        .border_style(Style::default().fg(color));

    let lines = vec![
        Line::from(notice.message.as_str()),
        Line::from(""),
        Line::from("Enter: OK").style(Style::default().fg(Color::DarkGray)),
    ];
    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .block(block);

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
