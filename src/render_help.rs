use crate::tui_mode::app::App;
use intcalc::session::HELP_LINES;
use ratatui::{
    layout::Alignment,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Clear, Paragraph, Wrap},
    Frame,
};

const NAVIGATION_LINES: &[&str] = &[
    "Navigation:",
    "  ← → : Move cursor left/right",
    "  Ctrl+←/→ : Move cursor by words",
    "  Home/End : Move to start/end of line",
    "  ↑ ↓ : Navigate calculation history",
    "  PgUp/PgDn : Page through history",
    "  Mouse wheel : Scroll through history",
    "  Ctrl+U : Clear current input",
    "  F1 : Show this help, Esc to close",
    "",
    "Examples:",
    "  9 - 5 - 2",
    "  (2 + 3) * 4",
    "  100 / 7 % 4",
];

fn styled_line(text: &'static str, index: usize) -> Line<'static> {
    if index == 0 {
        Line::from(Span::styled(
            text,
            Style::default().fg(Color::Green).add_modifier(Modifier::BOLD),
        ))
    } else if text.ends_with(':') {
        Line::from(Span::styled(
            text,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED),
        ))
    } else {
        Line::from(text)
    }
}

pub fn render_help(frame: &mut Frame, app: &mut App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Double)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Help ")
        .title_alignment(Alignment::Center)
        .style(Style::default().bg(Color::Black));

    let help_text: Vec<Line> = HELP_LINES
        .iter()
        .chain(std::iter::once(&""))
        .chain(NAVIGATION_LINES)
        .enumerate()
        .map(|(i, text)| styled_line(*text, i))
        .collect();

    let paragraph = Paragraph::new(help_text)
        .block(block)
        .alignment(Alignment::Left)
        .wrap(Wrap { trim: true })
        .scroll((app.help_scroll as u16, 0));

    frame.render_widget(Clear, frame.size());
    frame.render_widget(paragraph, frame.size());
}
