//! Global symbol table pane rendering

use super::utils::{clamp_scroll, inner_height, pane_block};
use crate::parser::symbols::{Symbol, SymbolKind};
use crate::ui::theme::DEFAULT_THEME;
use ratatui::{
    layout::Rect,
    style::Style,
    text::{Line, Span},
    widgets::{List, ListItem, Padding, Paragraph},
    Frame,
};

/// Render the program-scope symbols in declaration order
pub fn render_symbols_pane(
    frame: &mut Frame,
    area: Rect,
    symbols: &[Symbol],
    is_focused: bool,
    scroll_offset: &mut usize,
) {
    let block = pane_block(format!(" Symbols ({}) ", symbols.len()), is_focused);

    if symbols.is_empty() {
        let paragraph = Paragraph::new("(no symbols)")
            .block(block)
            .style(Style::default().fg(DEFAULT_THEME.comment));
        frame.render_widget(paragraph, area);
        return;
    }

    let block = block.padding(Padding::new(1, 0, 0, 0));
    let visible_height = inner_height(area);
    *scroll_offset = clamp_scroll(*scroll_offset, symbols.len(), visible_height);

    let name_width = symbols.iter().map(|s| s.name.len()).max().unwrap_or(0);

    let items: Vec<ListItem> = symbols
        .iter()
        .skip(*scroll_offset)
        .take(visible_height)
        .map(|symbol| {
            let kind_color = match symbol.kind {
                SymbolKind::Function | SymbolKind::Procedure => DEFAULT_THEME.function,
                SymbolKind::Variable | SymbolKind::Parameter => DEFAULT_THEME.fg,
            };
            let ty = symbol
                .ty
                .as_ref()
                .map_or_else(String::new, |ty| ty.to_string());
            ListItem::new(Line::from(vec![
                Span::styled(
                    format!("{:<width$} ", symbol.name, width = name_width),
                    Style::default().fg(kind_color),
                ),
                Span::styled(
                    format!("{:<10}", symbol.kind.to_string()),
                    Style::default().fg(DEFAULT_THEME.keyword),
                ),
                Span::styled(ty, Style::default().fg(DEFAULT_THEME.type_name)),
                Span::styled(
                    format!("  line {}", symbol.location.line),
                    Style::default().fg(DEFAULT_THEME.comment),
                ),
            ]))
        })
        .collect();

    frame.render_widget(List::new(items).block(block), area);
}
