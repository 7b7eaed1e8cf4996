//! Main TUI application state and logic

use super::panes::{self, SourceScrollState};
use crate::error::CompileError;
use crate::parser::ast::SourceLocation;
use crate::parser::lexer::{Lexer, Token, TokenKind};
use crate::parser::symbols::Symbol;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};
use std::io;

/// Rows moved by PageUp/PageDown
const PAGE: usize = 10;

/// Which pane is currently focused
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusedPane {
    Source,
    Tokens,
    Output,
    Symbols,
}

impl FocusedPane {
    /// Move focus to the next pane (source -> tokens -> output -> symbols)
    pub fn next(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Tokens,
            FocusedPane::Tokens => FocusedPane::Output,
            FocusedPane::Output => FocusedPane::Symbols,
            FocusedPane::Symbols => FocusedPane::Source,
        }
    }

    /// Move focus to the previous pane
    pub fn prev(self) -> Self {
        match self {
            FocusedPane::Source => FocusedPane::Symbols,
            FocusedPane::Tokens => FocusedPane::Source,
            FocusedPane::Output => FocusedPane::Tokens,
            FocusedPane::Symbols => FocusedPane::Output,
        }
    }
}

/// The main application state
pub struct App {
    /// The Pascal source being translated
    pub source_code: String,

    /// Tokens up to the end of input, or up to the first lexical error
    pub tokens: Vec<Token>,

    /// Generated C++ or the error that stopped the pipeline
    pub output: Result<String, CompileError>,

    /// Program-scope symbols (empty when parsing failed)
    pub symbols: Vec<Symbol>,

    /// Currently focused pane
    pub focused_pane: FocusedPane,

    /// Index into `tokens`
    pub selected_token: usize,

    /// Per-pane scroll offsets
    pub source_scroll: SourceScrollState,
    pub token_scroll: usize,
    pub output_scroll: usize,
    pub symbol_scroll: usize,

    /// Whether the app should quit
    pub should_quit: bool,

    /// Status message to display
    pub status_message: String,
}

impl App {
    /// Run the whole pipeline over `source_code` and prepare the panes.
    pub fn new(source_code: String) -> Self {
        let tokens: Vec<Token> = Lexer::new(&source_code)
            .tokens()
            .map_while(Result::ok)
            .filter(|token| token.kind != TokenKind::Eof)
            .collect();

        let (output, symbols) = match crate::parse(&source_code) {
            Ok(program) => {
                let symbols = program.symbols.globals();
                let output = crate::codegen::generate(&program.root).map_err(CompileError::from);
                (output, symbols)
            }
            Err(e) => (Err(e), Vec::new()),
        };

        let status_message = match &output {
            Ok(code) => format!("Translated to {} lines of C++", code.lines().count()),
            Err(e) => match e.location() {
                Some(loc) => format!("Translation stopped at {}", loc),
                None => "Translation stopped".to_string(),
            },
        };

        App {
            source_code,
            tokens,
            output,
            symbols,
            focused_pane: FocusedPane::Tokens,
            selected_token: 0,
            source_scroll: SourceScrollState::default(),
            token_scroll: 0,
            output_scroll: 0,
            symbol_scroll: 0,
            should_quit: false,
            status_message,
        }
    }

    /// Run the TUI application
    pub fn run<B: Backend>(&mut self, terminal: &mut Terminal<B>) -> io::Result<()> {
        loop {
            terminal.draw(|f| self.render(f))?;

            if self.should_quit {
                break;
            }

            if let Event::Key(key) = event::read()? {
                if key.kind == KeyEventKind::Press {
                    self.handle_key_event(key);
                }
            }
        }

        Ok(())
    }

    /// Location of the selected token, if there are any tokens
    pub fn selected_location(&self) -> Option<SourceLocation> {
        self.tokens.get(self.selected_token).map(|token| token.location)
    }

    /// Location of the lexical or syntax error, if translation failed
    pub fn error_location(&self) -> Option<SourceLocation> {
        self.output.as_ref().err().and_then(CompileError::location)
    }

    /// Render the UI
    fn render(&mut self, frame: &mut Frame) {
        let size = frame.area();

        // Panes above, status bar at bottom
        let main_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(0), Constraint::Length(1)])
            .split(size);

        let pane_area = main_chunks[0];
        let status_area = main_chunks[1];

        let columns = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
            .split(pane_area);

        // Left column: Source (top) | Tokens (bottom)
        let left_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
            .split(columns[0]);

        // Right column: C++ (top) | Symbols (bottom)
        let right_rows = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(70), Constraint::Percentage(30)])
            .split(columns[1]);

        panes::render_source_pane(
            frame,
            left_rows[0],
            &self.source_code,
            self.selected_location(),
            self.error_location(),
            self.focused_pane == FocusedPane::Source,
            &mut self.source_scroll,
        );

        panes::render_tokens_pane(
            frame,
            left_rows[1],
            &self.tokens,
            self.selected_token,
            self.focused_pane == FocusedPane::Tokens,
            &mut self.token_scroll,
        );

        panes::render_output_pane(
            frame,
            right_rows[0],
            &self.output,
            self.focused_pane == FocusedPane::Output,
            &mut self.output_scroll,
        );

        panes::render_symbols_pane(
            frame,
            right_rows[1],
            &self.symbols,
            self.focused_pane == FocusedPane::Symbols,
            &mut self.symbol_scroll,
        );

        panes::render_status_bar(
            frame,
            status_area,
            &self.status_message,
            self.tokens.len(),
            self.output.as_ref().err().map(CompileError::class),
        );
    }

    /// Handle keyboard events
    pub fn handle_key_event(&mut self, key: KeyEvent) {
        match key.code {
            KeyCode::Char('q') | KeyCode::Char('Q') | KeyCode::Esc => {
                self.should_quit = true;
            }
            KeyCode::Tab => {
                self.focused_pane = self.focused_pane.next();
            }
            KeyCode::BackTab => {
                self.focused_pane = self.focused_pane.prev();
            }
            KeyCode::Up => self.scroll_up(1),
            KeyCode::Down => self.scroll_down(1),
            KeyCode::PageUp => self.scroll_up(PAGE),
            KeyCode::PageDown => self.scroll_down(PAGE),
            KeyCode::Home => self.scroll_up(usize::MAX),
            KeyCode::End => self.scroll_down(usize::MAX),
            _ => {}
        }
    }

    fn scroll_up(&mut self, rows: usize) {
        match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling up makes the current line move down visually
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_add(rows));
                }
            }
            FocusedPane::Tokens => {
                self.select_token(self.selected_token.saturating_sub(rows));
            }
            FocusedPane::Output => {
                self.output_scroll = self.output_scroll.saturating_sub(rows);
            }
            FocusedPane::Symbols => {
                self.symbol_scroll = self.symbol_scroll.saturating_sub(rows);
            }
        }
    }

    fn scroll_down(&mut self, rows: usize) {
        match self.focused_pane {
            FocusedPane::Source => {
                // Scrolling down makes the current line move up visually
                if let Some(row) = self.source_scroll.target_line_row {
                    self.source_scroll.target_line_row = Some(row.saturating_sub(rows));
                }
            }
            FocusedPane::Tokens => {
                let last = self.tokens.len().saturating_sub(1);
                self.select_token(self.selected_token.saturating_add(rows).min(last));
            }
            FocusedPane::Output => {
                self.output_scroll = self.output_scroll.saturating_add(rows);
            }
            FocusedPane::Symbols => {
                self.symbol_scroll = self.symbol_scroll.saturating_add(rows);
            }
        }
    }

    fn select_token(&mut self, index: usize) {
        self.selected_token = index;
        if let Some(token) = self.tokens.get(index) {
            self.status_message = format!("{} at {}", token, token.location);
        }
    }
}
