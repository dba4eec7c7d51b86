//! Loading and blocking-error panels.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use crate::tui::style::Styles;

use super::popup::centered_fixed;

/// Centered error box with a retry hint.
pub fn render_error_panel(frame: &mut Frame, area: Rect, title: &str, message: &str) {
    let popup_area = centered_fixed(area.width.saturating_mul(2) / 3, 8, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!(" {title} "))
        .borders(Borders::ALL)
        .border_style(Styles::error());
    let content = vec![
        Line::from(Span::styled(message.to_string(), Styles::default())),
        Line::from(""),
        Line::from(vec![
            Span::styled("r", Styles::help_key()),
            Span::styled(" retry", Styles::help()),
        ]),
    ];
    let paragraph = Paragraph::new(content)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);
}

/// Plain message inside a bordered pane.
pub fn render_placeholder(frame: &mut Frame, area: Rect, block: Block<'_>, message: &str) {
    let paragraph = Paragraph::new(message.to_string())
        .block(block)
        .style(Styles::dim())
        .alignment(Alignment::Center);
    frame.render_widget(paragraph, area);
}
