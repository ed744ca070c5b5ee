//! Status bar widget: persistent one-line flow context display.

use ratatui::Frame;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::Paragraph;

use crate::model::Step;

/// Data passed to the status bar widget.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct StatusBarContext {
    /// The screen being shown.
    pub step: Step,
    /// Email of the signed-in user, if any.
    pub signed_in_as: Option<String>,
    /// Whether a registration request is in flight.
    pub loading: bool,
}

/// Renders a one-line status bar.
///
/// Display format (left-aligned):
/// - `Step 1/3 Registration`
/// - `Step 1/3 Registration  Please wait...` while a request is in flight
/// - `Step 3/3 Feed  asha@iitd.ac.in` when signed in (email in Green)
#[mutants::skip]
pub fn draw_status_bar(ctx: &StatusBarContext, frame: &mut Frame, area: Rect) {
    let cyan = Style::default().fg(Color::Cyan);
    let green = Style::default().fg(Color::Green);
    let yellow = Style::default().fg(Color::Yellow);

    let mut spans = vec![Span::styled(
        format!(
            "Step {}/{} {}",
            ctx.step.number(),
            Step::all().len(),
            ctx.step.label()
        ),
        cyan,
    )];

    if ctx.loading {
        spans.push(Span::styled("  Please wait...", yellow));
    }
    if let Some(email) = &ctx.signed_in_as {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(email.clone(), green));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}
