//! Generated C++ pane rendering
//!
//! Shows the translation with light C++ highlighting, or the error that
//! stopped the pipeline.

use super::utils::{clamp_scroll, inner_height, pane_block};
use crate::error::CompileError;
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Paragraph, Wrap},
    Frame,
};

/// Simple syntax highlighting for generated C++
pub(crate) fn highlight_cpp(line: &str) -> Line<'_> {
    if line.trim_start().starts_with('#') {
        return Line::from(Span::styled(
            line.to_string(),
            Style::default().fg(DEFAULT_THEME.directive),
        ));
    }

    let mut spans = Vec::new();
    let mut current_word = String::new();
    let chars: Vec<(usize, char)> = line.char_indices().collect();
    let mut i = 0;

    while i < chars.len() {
        let (byte, c) = chars[i];

        if c == '/' && matches!(chars.get(i + 1), Some((_, '/'))) {
            flush_word(&mut spans, &mut current_word, false);
            spans.push(Span::styled(
                line[byte..].to_string(),
                Style::default().fg(DEFAULT_THEME.comment),
            ));
            break;
        }

        // String and char literals, honouring backslash escapes
        if c == '"' || c == '\'' {
            flush_word(&mut spans, &mut current_word, false);
            let mut end = i + 1;
            while end < chars.len() && chars[end].1 != c {
                end += if chars[end].1 == '\\' { 2 } else { 1 };
            }
            let end = (end + 1).min(chars.len());
            let end_byte = chars.get(end).map_or(line.len(), |(b, _)| *b);
            spans.push(Span::styled(
                line[byte..end_byte].to_string(),
                Style::default().fg(DEFAULT_THEME.string),
            ));
            i = end;
            continue;
        }

        if !c.is_alphanumeric() && c != '_' && !(c == '.' && starts_with_digit(&current_word)) {
            flush_word(&mut spans, &mut current_word, c == '(');
            let style = match c {
                '{' | '}' | '(' | ')' | '[' | ']' => Style::default().fg(DEFAULT_THEME.primary),
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
    match word {
        "int" | "double" | "bool" | "char" | "void" | "auto" | "string" => {
            Style::default().fg(DEFAULT_THEME.type_name)
        }
        "if" | "else" | "while" | "for" | "do" | "return" => Style::default()
            .fg(DEFAULT_THEME.keyword)
            .add_modifier(Modifier::BOLD),
        "true" | "false" => Style::default().fg(DEFAULT_THEME.number),
        "std" | "cout" | "cin" | "endl" | "flush" => Style::default().fg(DEFAULT_THEME.secondary),
        _ if starts_with_digit(word) => Style::default().fg(DEFAULT_THEME.number),
        _ if is_call => Style::default().fg(DEFAULT_THEME.function),
        _ => Style::default().fg(DEFAULT_THEME.fg),
    }
}

/// Render the generated code pane
pub fn render_output_pane(
    frame: &mut Frame,
    area: Rect,
    output: &Result<String, CompileError>,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    match output {
        Ok(code) => {
            let block = pane_block(" Generated C++ ".to_string(), is_focused);
            let lines: Vec<&str> = code.lines().collect();
            let visible_height = inner_height(area);
            *scroll_offset = clamp_scroll(*scroll_offset, lines.len(), visible_height);

            let visible: Vec<Line> = lines
                .iter()
                .skip(*scroll_offset)
                .take(visible_height)
                .map(|line| highlight_cpp(line))
                .collect();

            frame.render_widget(Paragraph::new(visible).block(block), area);
        }
        Err(err) => {
            *scroll_offset = 0;
            let block = pane_block(format!(" {} error ", err.class()), is_focused)
                .border_style(Style::default().fg(DEFAULT_THEME.error));
            let paragraph = Paragraph::new(err.to_string())
                .block(block)
                .style(
                    Style::default()
                        .fg(DEFAULT_THEME.error)
                        .add_modifier(Modifier::BOLD),
                )
                .wrap(Wrap { trim: true });
            frame.render_widget(paragraph, area);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_highlight_keeps_text_intact() {
        let line = "    std::cout << \"a \\\"b\\\"\" << 'c' << std::endl;";
        let joined: String = highlight_cpp(line)
            .spans
            .iter()
            .map(|span| span.content.to_string())
            .collect();
        assert_eq!(joined, line);
    }

    #[test]
    fn test_include_is_one_span() {
        let line = highlight_cpp("#include <iostream>");
        assert_eq!(line.spans.len(), 1);
        assert_eq!(line.spans[0].style.fg, Some(DEFAULT_THEME.directive));
    }

    #[test]
    fn test_function_names_before_parenthesis() {
        let line = highlight_cpp("int square(int n) {");
        let square = line
            .spans
            .iter()
            .find(|span| span.content == "square")
            .unwrap();
        assert_eq!(square.style.fg, Some(DEFAULT_THEME.function));
    }
}
