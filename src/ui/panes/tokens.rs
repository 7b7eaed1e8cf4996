//! Token list pane rendering

use super::utils::{follow_selection, inner_height, pane_block};
use crate::parser::lexer::{Token, TokenKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{List, ListItem, Paragraph},
    Frame,
};

fn kind_style(kind: TokenKind) -> Style {
    match kind {
        k if k.is_type_name() => Style::default().fg(DEFAULT_THEME.type_name),
        TokenKind::True | TokenKind::False => Style::default().fg(DEFAULT_THEME.number),
        k if k.is_keyword() => Style::default().fg(DEFAULT_THEME.keyword),
        TokenKind::IntegerLiteral | TokenKind::RealLiteral => {
            Style::default().fg(DEFAULT_THEME.number)
        }
        TokenKind::StringLiteral => Style::default().fg(DEFAULT_THEME.string),
        TokenKind::Identifier => Style::default().fg(DEFAULT_THEME.fg),
        _ => Style::default().fg(DEFAULT_THEME.comment),
    }
}

/// Render the token list; the selected token is highlighted and kept visible.
pub fn render_tokens_pane(
    frame: &mut Frame,
    area: Rect,
    tokens: &[Token],
    selected: usize,
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let title = if tokens.is_empty() {
        " Tokens ".to_string()
    } else {
        format!(" Tokens {}/{} ", selected + 1, tokens.len())
    };
    let block = pane_block(title, is_focused);

    if tokens.is_empty() {
        let paragraph = Paragraph::new("(no tokens)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let visible_height = inner_height(area);
    *scroll_offset = follow_selection(*scroll_offset, selected, visible_height);

    let items: Vec<ListItem> = tokens
        .iter()
        .enumerate()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|(idx, token)| {
            let position = format!(
                "{:>4}:{:<3} ",
                token.location.line, token.location.column
            );
            let line = Line::from(vec![
                Span::styled(position, Style::default().fg(DEFAULT_THEME.comment)),
                Span::styled(format!("{:<16}", token.kind.name()), kind_style(token.kind)),
                Span::styled(token.lexeme.clone(), Style::default().fg(DEFAULT_THEME.fg)),
            ]);

            let item = ListItem::new(line);
            if idx == selected {
                item.style(
                    Style::default()
                        .bg(DEFAULT_THEME.current_line_bg)
                        .add_modifier(Modifier::BOLD),
                )
            } else {
                item
            }
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
