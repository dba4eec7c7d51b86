//! Location input popup (`o`).

use ratatui::Frame;
use ratatui::layout::{Alignment, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};

use super::popup::centered_fixed;

pub fn render_location_input(frame: &mut Frame, area: Rect, input: &str) {
    let popup_width = (area.width / 10 * 7).clamp(50, 90);
    let popup_area = centered_fixed(popup_width, 9, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(" Open location ")
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));
    let inner = block.inner(popup_area);
    frame.render_widget(block, popup_area);

    let dim = Style::default().fg(Color::DarkGray);
    let lines = vec![
        Line::from(vec![
            Span::styled("Location: ", Style::default().fg(Color::Yellow)),
            Span::styled(
                format!("{input}█"),
                Style::default()
                    .fg(Color::White)
                    .add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(""),
        Line::from(Span::styled("Examples:", dim)),
        Line::from(Span::styled("  /?kind=order", dim)),
        Line::from(Span::styled(
            "  /?kind=order&sortKey=createdAt&sortDirection=desc",
            dim,
        )),
        Line::from(vec![
            Span::styled("Enter", Style::default().fg(Color::Yellow)),
            Span::styled(" → open", dim),
            Span::styled("   Esc", Style::default().fg(Color::Yellow)),
            Span::styled(" → cancel", dim),
        ]),
    ];

    let paragraph = Paragraph::new(lines)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .style(Style::default().fg(Color::White));
    frame.render_widget(paragraph, inner);
}
