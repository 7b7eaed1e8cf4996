//! Main parser coordinator
//!
//! This module provides the [`Parser`] struct and core parsing infrastructure,
//! including the syntax error type, lookahead helpers, and the main parse entry
//! point.
//!
//! # Parser Architecture
//!
//! The Parser is recursive descent over a single lookahead token:
//! - This module: Parser struct, helper methods, program and statement lists
//! - `declarations`: `var`, `function` and `procedure` declarations, types
//! - `statements`: assignments and control flow
//! - `expressions`: expressions, calls and array indexing
//!
//! Tokens are pulled from the [`Lexer`] one at a time; the parser only keeps
//! the cursor after the current token. There is no backtracking and no error
//! recovery: the first mismatch aborts the parse.
//!
//! # Implementation
//!
//! Parser methods are split across multiple files using `impl Parser` blocks,
//! allowing each module to extend the Parser with related functionality while
//! maintaining access to the shared parser state.

use crate::error::CompileError;
use crate::parser::ast::*;
use crate::parser::lexer::{Cursor, Lexer, Token, TokenKind};
use crate::parser::symbols::SymbolTable;
use thiserror::Error;

/// The current token did not match what the grammar requires.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Syntax error at {location}: expected {expected}, found {found}")]
pub struct SyntaxError {
    pub expected: String,
    pub found: Token,
    pub location: SourceLocation,
}

pub type ParseResult<T> = Result<T, CompileError>;

/// Deepest nesting of statements, routine bodies and factors accepted
/// before parsing stops with a syntax error.
pub const MAX_NESTING: usize = 128;

/// Recursive descent parser for the Pascal subset
pub struct Parser<'src> {
    lexer: Lexer<'src>,
    cursor: Cursor,
    pub(crate) current: Token,
    pub(crate) symbols: SymbolTable,
    depth: usize,
}

impl<'src> Parser<'src> {
    pub fn new(source: &'src str) -> Result<Self, CompileError> {
        let lexer = Lexer::new(source);
        let (current, cursor) = lexer.next_token(Cursor::start())?;
        Ok(Self {
            lexer,
            cursor,
            current,
            symbols: SymbolTable::new(),
            depth: 0,
        })
    }

    /// Parse the whole input.
    ///
    /// ```text
    /// program ::= [ "program" identifier ";" ] statement*
    ///             [ "begin" statement* "end" "." | "end" "." ] EOF
    /// ```
    ///
    /// Statements of the main block join the top-level statement list.
    pub fn parse_program(&mut self) -> ParseResult<Program> {
        let loc = self.current_location();

        let name = if self.match_kind(TokenKind::Program)? {
            let name = self.expect_identifier("after 'program'")?;
            self.expect(TokenKind::Semicolon, "after program name")?;
            Some(name.lexeme)
        } else {
            None
        };

        let mut statements = self.parse_statements()?;

        if self.match_kind(TokenKind::Begin)? {
            statements.extend(self.parse_statements()?);
            self.expect(TokenKind::End, "to close the main block")?;
            self.expect(TokenKind::Dot, "after final 'end'")?;
        } else if self.match_kind(TokenKind::End)? {
            self.expect(TokenKind::Dot, "after final 'end'")?;
        }

        self.expect(TokenKind::Eof, "after end of program")?;

        let list = AstNode::new(NodeKind::StatementList, statements, None, loc)?;
        let root = AstNode::new(NodeKind::Program, vec![list], name, loc)?;

        Ok(Program {
            root,
            symbols: std::mem::take(&mut self.symbols),
        })
    }

    /// Parse statements while the current token can start one.
    pub(crate) fn parse_statements(&mut self) -> ParseResult<Vec<AstNode>> {
        let mut statements = Vec::new();
        while self.starts_statement() {
            statements.push(self.parse_statement()?);
        }
        Ok(statements)
    }

    /// Parse a (possibly empty) flat statement list node.
    pub(crate) fn parse_statement_list(&mut self) -> ParseResult<AstNode> {
        let loc = self.current_location();
        let statements = self.parse_statements()?;
        Ok(AstNode::new(NodeKind::StatementList, statements, None, loc)?)
    }

    /// `begin statement* end` (the trailing `;` is left to the caller)
    pub(crate) fn parse_block(&mut self, ctx: &str) -> ParseResult<AstNode> {
        self.expect(TokenKind::Begin, ctx)?;
        let body = self.parse_statement_list()?;
        self.expect(TokenKind::End, "to close block")?;
        Ok(body)
    }

    // ===== Helper methods =====

    pub(crate) fn starts_statement(&self) -> bool {
        matches!(
            self.current.kind,
            TokenKind::Identifier
                | TokenKind::Var
                | TokenKind::Function
                | TokenKind::Procedure
                | TokenKind::If
                | TokenKind::While
                | TokenKind::For
                | TokenKind::Repeat
                | TokenKind::Write
                | TokenKind::Writeln
                | TokenKind::Read
                | TokenKind::Readln
                | TokenKind::IntegerLiteral
                | TokenKind::RealLiteral
                | TokenKind::StringLiteral
                | TokenKind::True
                | TokenKind::False
                | TokenKind::LParen
                | TokenKind::Minus
                | TokenKind::Not
        )
    }

    pub(crate) fn check(&self, kind: TokenKind) -> bool {
        self.current.kind == kind
    }

    /// Consume the current token and pull the next one from the lexer.
    pub(crate) fn advance(&mut self) -> ParseResult<Token> {
        let (next, cursor) = self.lexer.next_token(self.cursor)?;
        self.cursor = cursor;
        Ok(std::mem::replace(&mut self.current, next))
    }

    /// Run `parse` one nesting level deeper, failing once the nesting
    /// exceeds [`MAX_NESTING`] so deep input cannot exhaust the stack.
    pub(crate) fn nested<T>(
        &mut self,
        parse: impl FnOnce(&mut Self) -> ParseResult<T>,
    ) -> ParseResult<T> {
        if self.depth >= MAX_NESTING {
            return Err(self.error(format!("at most {} levels of nesting", MAX_NESTING)));
        }
        self.depth += 1;
        let result = parse(self);
        self.depth -= 1;
        result
    }

    pub(crate) fn match_kind(&mut self, kind: TokenKind) -> ParseResult<bool> {
        if self.check(kind) {
            self.advance()?;
            Ok(true)
        } else {
            Ok(false)
        }
    }

    pub(crate) fn current_location(&self) -> SourceLocation {
        self.current.location
    }

    /// Consume a token of `kind` or fail with a syntax error.
    pub(crate) fn expect(&mut self, kind: TokenKind, ctx: &str) -> ParseResult<Token> {
        if self.check(kind) {
            self.advance()
        } else {
            Err(self.error(format!("{} {}", kind, ctx)))
        }
    }

    pub(crate) fn expect_identifier(&mut self, ctx: &str) -> ParseResult<Token> {
        self.expect(TokenKind::Identifier, ctx)
    }

    pub(crate) fn expect_semicolon(&mut self, ctx: &str) -> ParseResult<Token> {
        self.expect(TokenKind::Semicolon, ctx)
    }

    /// Syntax error at the current token.
    pub(crate) fn error(&self, expected: impl Into<String>) -> CompileError {
        CompileError::Syntax(SyntaxError {
            expected: expected.into(),
            found: self.current.clone(),
            location: self.current.location,
        })
    }
}
