use super::app::{App, HistoryEntry};
use super::helpers::{format_expression, highlight_expression, wrap_text};
use crate::render_help::render_help;
use anyhow::Result;
use crossterm::event::{Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers, MouseEventKind};
use intcalc::session::{Report, Verdict};
use intcalc::Dialect;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame, Terminal,
};
use std::time::Duration;
use unicode_segmentation::UnicodeSegmentation;
use unicode_width::UnicodeWidthStr;

const MIN_TERMINAL_WIDTH: u16 = 50;
const MIN_TERMINAL_HEIGHT: u16 = 10;

pub fn run_ui_loop(
    terminal: &mut Terminal<CrosstermBackend<std::io::Stdout>>,
    app: &mut App,
) -> Result<()> {
    loop {
        terminal.draw(|f| {
            if app.show_help {
                render_help(f, app);
            } else {
                ui(f, app);
            }
        })?;

        if app.should_quit {
            break;
        }

        if crossterm::event::poll(Duration::from_millis(50))? {
            match crossterm::event::read()? {
                Event::Key(KeyEvent { code, modifiers, kind, .. }) if kind == KeyEventKind::Press => {
                    handle_key_event(app, code, modifiers);
                }
                Event::Mouse(event) => {
                    handle_mouse_event(app, event);
                }
                _ => {}
            }
        }
    }
    Ok(())
}

fn handle_key_event(app: &mut App, code: KeyCode, modifiers: KeyModifiers) {
    if app.show_help {
        match code {
            KeyCode::Down => app.help_scroll = app.help_scroll.saturating_add(1),
            KeyCode::Up => app.help_scroll = app.help_scroll.saturating_sub(1),
            KeyCode::PageDown => app.help_scroll = app.help_scroll.saturating_add(10),
            KeyCode::PageUp => app.help_scroll = app.help_scroll.saturating_sub(10),
            KeyCode::Esc => {
                app.show_help = false;
                app.help_scroll = 0;
            }
            _ => {}
        }
        return;
    }

    match code {
        KeyCode::Char('c') | KeyCode::Char('d') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.should_quit = true;
        }
        KeyCode::Char('u') | KeyCode::Char('U') if modifiers.contains(KeyModifiers::CONTROL) => {
            app.clear_input();
        }
        KeyCode::Char(c) if !modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) => {
            app.insert_char(c);
        }
        KeyCode::Backspace => app.delete_backward(),
        KeyCode::Delete => app.delete_forward(),
        KeyCode::Left if modifiers.contains(KeyModifiers::CONTROL) => app.move_cursor_by_words(-1),
        KeyCode::Right if modifiers.contains(KeyModifiers::CONTROL) => app.move_cursor_by_words(1),
        KeyCode::Left => app.move_cursor(-1),
        KeyCode::Right => app.move_cursor(1),
        KeyCode::Home => {
            app.cursor_position = 0;
            app.input_scroll = 0;
        }
        KeyCode::End => app.cursor_position = app.input_len(),
        KeyCode::Up => app.navigate_history(-1),
        KeyCode::Down => app.navigate_history(1),
        KeyCode::PageUp => app.scroll_history(-1),
        KeyCode::PageDown => app.scroll_history(1),
        KeyCode::Enter => app.submit(),
        KeyCode::F(1) => {
            app.show_help = true;
            app.help_scroll = 0;
        }
        _ => {}
    }
}

fn handle_mouse_event(app: &mut App, event: crossterm::event::MouseEvent) {
    let scroll = if app.show_help {
        &mut app.help_scroll
    } else {
        &mut app.history_scroll
    };
    match event.kind {
        MouseEventKind::ScrollDown => *scroll = scroll.saturating_add(3),
        MouseEventKind::ScrollUp => *scroll = scroll.saturating_sub(3),
        _ => {}
    }
}

fn ui(frame: &mut Frame, app: &mut App) {
    let terminal_size = frame.size();

    app.terminal_too_small =
        terminal_size.width < MIN_TERMINAL_WIDTH || terminal_size.height < MIN_TERMINAL_HEIGHT;

    if app.terminal_too_small {
        render_resize_message(frame, terminal_size);
        return;
    }

    let layout = Layout::default()
        .direction(Direction::Vertical)
        .constraints(vec![
            Constraint::Length(3),
            Constraint::Length(1),
            Constraint::Min(3),
        ])
        .split(terminal_size);

    render_input(frame, app, layout[0]);
    render_status(frame, app, layout[1]);
    render_history(frame, app, layout[2]);
    app.list_height = layout[2].height as usize;
}

fn render_resize_message(frame: &mut Frame, area: Rect) {
    let message = format!(
        "Terminal too small! Min size: {}x{}. Current: {}x{}",
        MIN_TERMINAL_WIDTH, MIN_TERMINAL_HEIGHT, area.width, area.height
    );

    let text = vec![
        Line::from(Span::styled(
            message,
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Please resize your terminal window",
            Style::default().fg(Color::Yellow),
        )),
    ];

    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Red))
        .title(" Resize Required ")
        .title_alignment(Alignment::Center);

    let paragraph = Paragraph::new(text)
        .block(block)
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true });

    frame.render_widget(paragraph, area);
}

/// Indented block of wrapped lines under a history entry.
fn detail_items(text: &str, width: usize, style: Style) -> Vec<ListItem<'static>> {
    wrap_text(text, width)
        .into_iter()
        .enumerate()
        .map(|(i, line)| {
            let prefix = if i == 0 { "    - " } else { "      " };
            ListItem::new(Line::from(Span::styled(format!("{}{}", prefix, line), style)))
        })
        .collect()
}

fn report_items(report: &Report, dialect: Dialect, is_selected: bool, wrap_width: usize) -> Vec<ListItem<'static>> {
    let mut items = Vec::new();
    let base_style = Style::default().fg(if is_selected { Color::Yellow } else { Color::Cyan });

    let mut spans = vec![Span::styled("> ", Style::default().fg(Color::Green))];
    spans.extend(highlight_expression(&report.input, dialect, base_style));
    if let Verdict::Value(value) = report.verdict {
        spans.push(Span::styled(" = ", Style::default().fg(Color::Gray)));
        spans.push(Span::styled(
            value.to_string(),
            Style::default().fg(Color::LightMagenta).add_modifier(Modifier::BOLD),
        ));
    }
    items.push(ListItem::new(Line::from(spans)));

    if let Some(tree) = &report.tree {
        // Tree lines keep their indentation, so they are not wrapped.
        for line in tree {
            items.push(ListItem::new(Line::from(Span::styled(
                format!("    {}", line),
                Style::default().fg(Color::Cyan),
            ))));
        }
    }

    if !report.is_success() {
        let error_style = Style::default().fg(Color::Red).add_modifier(Modifier::BOLD);
        for line in report.message_lines() {
            items.extend(detail_items(&line, wrap_width, error_style));
        }
    }

    let time = format!(
        "{}  ({:.3} ms)",
        format_expression(&report.input, dialect),
        report.duration.as_secs_f64() * 1000.0
    );
    items.extend(detail_items(&time, wrap_width, Style::default().fg(Color::DarkGray)));
    items
}

fn render_history(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" History ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    if app.history.is_empty() {
        let empty_msg = Paragraph::new("No calculations yet. Enter an expression to see results here.")
            .style(Style::default().fg(Color::DarkGray))
            .alignment(Alignment::Center);
        frame.render_widget(empty_msg, inner_area);
        return;
    }

    let mut items = Vec::new();
    app.item_start_indices.clear();

    let wrap_width = inner_area.width.saturating_sub(8) as usize;
    let dialect = app.session.dialect;

    for (i, entry) in app.history.iter().enumerate() {
        app.item_start_indices.push(items.len());
        let is_selected = i == app.cursor_history;

        match entry {
            HistoryEntry::Evaluated(report) => {
                items.extend(report_items(report, dialect, is_selected, wrap_width));
            }
            HistoryEntry::Notice(text) => {
                items.push(ListItem::new(Line::from(Span::styled(
                    text.clone(),
                    Style::default().fg(Color::Gray).add_modifier(Modifier::ITALIC),
                ))));
            }
        }

        if i < app.history.len() - 1 {
            let separator = Span::styled(
                "-".repeat(inner_area.width as usize),
                Style::default().fg(Color::DarkGray),
            );
            items.push(ListItem::new(Line::from(separator)));
        }
    }

    if app.scroll_to_bottom {
        app.history_scroll = items.len().saturating_sub(inner_area.height as usize);
        app.scroll_to_bottom = false;
    }

    let selected_index = app.item_start_indices.get(app.cursor_history).copied();

    let list = List::new(items)
        .block(Block::default())
        .highlight_style(Style::default().bg(Color::DarkGray).add_modifier(Modifier::BOLD));

    let mut state = ListState::default()
        .with_selected(selected_index)
        .with_offset(app.history_scroll);

    frame.render_stateful_widget(list, inner_area, &mut state);
}

fn render_status(frame: &mut Frame, app: &App, area: Rect) {
    let keys = [
        ("Enter", "Calculate"),
        ("Up/Down", "History"),
        ("F1", "Help"),
        ("Ctrl+U", "Clear Input"),
        ("Ctrl+C", "Quit"),
    ];

    let mut spans: Vec<Span> = keys
        .iter()
        .flat_map(|(key, desc)| {
            vec![
                Span::styled(*key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
                Span::styled(format!(" {} ", desc), Style::default().fg(Color::DarkGray)),
            ]
        })
        .collect();

    let tree = if app.session.show_tree { "tree on" } else { "tree off" };
    spans.push(Span::styled(
        format!("[{:?}, {}]", app.session.dialect, tree),
        Style::default().fg(Color::Cyan),
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_input(frame: &mut Frame, app: &mut App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Expression ")
        .title_alignment(Alignment::Center);

    let inner_area = block.inner(area);
    frame.render_widget(block, area);

    let visible_width = inner_area.width.saturating_sub(2) as usize;
    let total = app.input_len();
    app.adjust_input_scroll(visible_width);

    let visible_input: String = app
        .input
        .graphemes(true)
        .skip(app.input_scroll)
        .take(visible_width)
        .collect();

    let mut spans = vec![Span::raw("> ")];
    spans.extend(highlight_expression(&visible_input, app.session.dialect, Style::default()));
    frame.render_widget(Paragraph::new(Line::from(spans)), inner_area);

    let visible_cursor = app.cursor_position.saturating_sub(app.input_scroll);
    let visible_prefix: String = visible_input.graphemes(true).take(visible_cursor).collect();
    let cursor_x = inner_area.x + 2 + visible_prefix.width() as u16;
    frame.set_cursor(cursor_x, inner_area.y);

    let scroll_indicator_style = Style::default().fg(Color::DarkGray);

    if app.input_scroll > 0 {
        let left_indicator = Paragraph::new("<").style(scroll_indicator_style);
        frame.render_widget(left_indicator, Rect::new(inner_area.x, inner_area.y, 1, 1));
    }

    if total > app.input_scroll + visible_width {
        let right_indicator = Paragraph::new(">").style(scroll_indicator_style);
        frame.render_widget(
            right_indicator,
            Rect::new(inner_area.x + inner_area.width - 1, inner_area.y, 1, 1),
        );
    }
}
