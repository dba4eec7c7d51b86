//! Quit confirmation popup widget.

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph};

use super::popup::centered_fixed;

/// Renders a centered quit confirmation popup.
pub fn render_quit_confirm(frame: &mut Frame, area: Rect) {
    let popup_width = (area.width / 2).clamp(40, 60);
    let popup_area = centered_fixed(popup_width, 7, area);

    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Exit kindview ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let key = Style::default().fg(Color::Yellow);
    let dim = Style::default().fg(Color::DarkGray);
    let content = vec![
        Line::from(Span::styled(
            "Quit and print the current location?",
            Style::default().fg(Color::White),
        )),
        Line::from(""),
        Line::from(vec![
            Span::styled("Enter", key),
            Span::styled(" or ", dim),
            Span::styled("q", key),
            Span::styled(" → quit   ", dim),
            Span::styled("Esc", key),
            Span::styled(" or ", dim),
            Span::styled("n", key),
            Span::styled(" → cancel", dim),
        ]),
    ];

    let paragraph = Paragraph::new(content).alignment(Alignment::Center);
    frame.render_widget(paragraph, inner);
}
