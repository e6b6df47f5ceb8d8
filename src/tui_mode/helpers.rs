use intcalc::{Dialect, Lexer, SyntaxKind};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Span;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

pub fn wrap_text(text: &str, width: usize) -> Vec<String> {
    if width == 0 {
        return vec!["".to_string()];
    }

    let mut lines = Vec::new();
    let mut current_line = String::new();
    let mut current_width = 0;

    for word in text.split_whitespace() {
        let word_width = word.width();

        if word_width > width {
            let mut remaining = word;
            while !remaining.is_empty() {
                let mut chunk_width = 0;
                let mut chunk_byte_len = 0;

                for c in remaining.chars() {
                    let char_width = UnicodeWidthChar::width(c).unwrap_or(1);
                    if chunk_width + char_width > width && chunk_byte_len > 0 {
                        break;
                    }
                    chunk_width += char_width;
                    chunk_byte_len += c.len_utf8();
                }

                if !current_line.is_empty() {
                    lines.push(std::mem::take(&mut current_line));
                    current_width = 0;
                }

                lines.push(remaining[..chunk_byte_len].to_string());
                remaining = &remaining[chunk_byte_len..];
            }
            continue;
        }

        if current_width + word_width + 1 > width && !current_line.is_empty() {
            lines.push(std::mem::take(&mut current_line));
            current_width = 0;
        }

        if !current_line.is_empty() {
            current_line.push(' ');
            current_width += 1;
        }

        current_line.push_str(word);
        current_width += word_width;
    }

    if !current_line.is_empty() {
        lines.push(current_line);
    }

    lines
}

/// Re-spaces an expression from its tokens: binary operators get a space on
/// each side, brackets hug their contents.
pub fn format_expression(expr: &str, dialect: Dialect) -> String {
    let mut result = String::new();
    for token in Lexer::with_dialect(expr, dialect) {
        match token.kind {
            SyntaxKind::Whitespace | SyntaxKind::EndOfFile => {}
            SyntaxKind::OpenBracket | SyntaxKind::CloseBracket => result.push_str(token.text()),
            kind if kind.is_additive() || kind.is_multiplicative() => {
                result.push(' ');
                result.push_str(token.text());
                result.push(' ');
            }
            _ => result.push_str(token.text()),
        }
    }
    result.split_whitespace().collect::<Vec<_>>().join(" ")
}

fn token_style(kind: SyntaxKind, base_style: Style) -> Style {
    match kind {
        SyntaxKind::Number => Style::default().fg(Color::LightGreen),
        SyntaxKind::UndefinedToken => Style::default()
            .fg(Color::Red)
            .add_modifier(Modifier::UNDERLINED),
        SyntaxKind::OpenBracket | SyntaxKind::CloseBracket => Style::default()
            .fg(Color::LightBlue)
            .add_modifier(Modifier::BOLD),
        kind if kind.is_additive() || kind.is_multiplicative() => Style::default()
            .fg(Color::Yellow)
            .add_modifier(Modifier::BOLD),
        _ => base_style,
    }
}

/// Colors each token of an expression by its kind.
pub fn highlight_expression(expr: &str, dialect: Dialect, base_style: Style) -> Vec<Span<'static>> {
    Lexer::with_dialect(expr, dialect)
        .filter(|token| token.kind != SyntaxKind::EndOfFile)
        .map(|token| Span::styled(token.text().to_string(), token_style(token.kind, base_style)))
        .collect()
}
