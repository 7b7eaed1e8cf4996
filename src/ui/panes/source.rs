//! Pascal source pane rendering with syntax highlighting
//!
//! This module renders the source pane, which displays the Pascal program
//! being translated with basic syntax highlighting.
//!
//! # Features
//!
//! - Syntax highlighting for keywords, types, strings, numbers and comments
//! - The line of the selected token is highlighted and kept at a fixed row
//! - The line of a lexical or syntax error is shown in red
//! - Line numbering
//!
//! # Rendering
//!
//! Keyword recognition reuses [`TokenKind::keyword`], so the highlighter and
//! the lexer agree on what a keyword is. Everything else is a simple
//! character scan per line; block comments spanning lines are only coloured
//! on their first line.

use super::utils::{inner_height, pane_block};
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::TokenKind;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::Paragraph,
    Frame,
};

/// Simple syntax highlighting for one line of Pascal
pub(crate) fn highlight_pascal(line: &str) -> Line<'_> {
    let mut spans = Vec::new();
    let mut current_word = String::new();

    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte, c) = chars[i];

        let comment_end = if c == '/' && matches!(chars.get(i + 1), Some((_, '/'))) {
            Some(line.len())
        } else if c == '{' {
            Some(line[byte..].find('}').map_or(line.len(), |end| byte + end + 1))
        } else if c == '(' && matches!(chars.get(i + 1), Some((_, '*'))) {
            Some(line[byte..].find("*)").map_or(line.len(), |end| byte + end + 2))
        } else {
            None
        };
        if let Some(end) = comment_end {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(
                line[byte..end].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            i = chars.partition_point(|(b, _)| *b < end);
            continue;
        }

        if c == '\'' || c == '"' {
            flush_word(&mut spans, &mut current_word, false);
            let end = line[byte + 1..]
                .find(c)
                .map_or(line.len(), |end| byte + 1 + end + 1);
            spans.push(Span::styled(
                line[byte..end].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = chars.partition_point(|(b, _)| *b < end);
            continue;
        }

        if !c.is_alphanumeric() && c != '_' && !(c == '.' && starts_with_digit(&current_word)) {
            flush_word(&mut spans, &mut current_word, c == '(');
            let style = match c {
                '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
                _ => Style::default().fg(DEFAULT_THEME.fg),
            };
            spans.push(Span::styled(c.to_string(), style));
            i += 1;
            continue;
        }

        current_word.push(c);
        i += 1;
    }

    flush_word(&mut spans, &mut current_word, false);
    Line::from(spans)
}

fn starts_with_digit(word: &str) -> bool {
    word.chars().next().is_some_and(|c| c.is_ascii_digit())
}

fn flush_word(spans: &mut Vec<Span<'static>>, word: &mut String, is_call: bool) {
    if word.is_empty() {
        return;
    }
    let style = word_style(word, is_call);
    spans.push(Span::styled(std::mem::take(word), style));
}

fn word_style(word: &str, is_call: bool) -> Style {
    match TokenKind::keyword(word) {
        Some(kind) if kind.is_type_name() => Style::default().fg(DEFAULT_THEME.type_name),
        Some(TokenKind::True | TokenKind::False) => Style::default().fg(DEFAULT_THEME.number),
        Some(kind) if kind.is_keyword() => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        _ if starts_with_digit(word) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Scroll state for the source pane
#[derive(Debug, Default)]
pub struct SourceScrollState {
    pub offset: usize,
    pub target_line_row: Option<usize>,
}

/// Render the source code pane
pub fn render_source_pane(
    frame: &mut Frame,
    area: Rect,
    source_code: &str,
    selected: Option<SourceLocation>,
    error: Option<SourceLocation>,
    is_focused: bool,
    scroll_state: &mut SourceScrollState,
) {
    let title = match selected {
        Some(loc) => format!(" Pascal Source ({}:{}) ", loc.line, loc.column),
        None => " Pascal Source ".to_string(),
    };
    let block = pane_block(title, is_focused);

    let lines: Vec<&str> = source_code.lines().collect();
    let total_lines = lines.len();
    let visible_height = inner_height(area);

    if scroll_state.target_line_row.is_none() {
        scroll_state.target_line_row = Some(visible_height / 2);
    }
    let target_row = scroll_state
        .target_line_row
        .unwrap_or_default()
        .min(visible_height.saturating_sub(1));
    scroll_state.target_line_row = Some(target_row);

    let current_line = selected.map_or(0, |loc| loc.line);
    let error_line = error.map_or(0, |loc| loc.line);

    // Keep the focus line (the error, else the selected token) at the target row
    let focus_line = if error_line > 0 { error_line } else { current_line };
    if focus_line > 0 && focus_line <= total_lines {
        let offset = (focus_line - 1).saturating_sub(target_row);
        scroll_state.offset = if total_lines > visible_height {
            offset.min(total_lines - visible_height)
        } else {
            0
        };
    }

    let visible_lines: Vec<Line> = lines
        .iter()
        .enumerate()
        .skip(scroll_state.offset)
        .take(visible_height)
        .map(|(idx, line)| {
            let line_num = idx + 1;
            let line_num_str = format!("{:4} ", line_num);
            let mut content = highlight_pascal(line);

            let num_style = if line_num == error_line {
                for span in &mut content.spans {
                    span.style = Style::default()
                        .bg(DEFAULT_THEME.error)
                        .fg(Color::White)
                        .add_modifier(Modifier::BOLD);
                }
                Style::default()
                    .fg(DEFAULT_THEME.error)
                    .add_modifier(Modifier::BOLD)
            } else if line_num == current_line {
                let bg = Style::default().bg(DEFAULT_THEME.current_line_bg);
                for span in &mut content.spans {
                    span.style = span.style.patch(bg);
                }
                Style::default()
                    .fg(DEFAULT_THEME.secondary)
                    .add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(DEFAULT_THEME.comment)
            };

            let mut spans = vec![Span::styled(line_num_str, num_style)];
            spans.extend(content.spans);
            Line::from(spans)
        })
        .collect();

    let paragraph = Paragraph::new(visible_lines).block(block);
    frame.render_widget(paragraph, area);
}
