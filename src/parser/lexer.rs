//! Lexer (tokenizer) for Pascal source code
//!
//! The lexer never mutates itself: [`Lexer::next_token`] is a pure transition
//! from a [`Cursor`] to the next [`Token`] and the cursor after it. The parser
//! pulls tokens one at a time by threading the cursor through successive calls.
//!
//! Whitespace and comments (`// ...`, `{ ... }`, `(* ... *)`) are discarded
//! unless the lexer is built [`with_trivia`](Lexer::with_trivia), in which case
//! comments, newlines and tabs are reported as tokens for raw dumps.

use super::ast::SourceLocation;
use std::fmt;
use thiserror::Error;

/// All token kinds produced by the lexer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Keywords
    Program,
    Var,
    Begin,
    End,
    If,
    Then,
    Else,
    While,
    Do,
    For,
    To,
    Function,
    Procedure,
    Array,
    Of,
    Repeat,
    Until,
    And,
    Or,
    Not,
    Div,
    Mod,
    In,

    // Built-in statements
    Write,
    Writeln,
    Read,
    Readln,

    // Type names
    IntegerType,
    RealType,
    StringType,
    BooleanType,
    CharType,

    // Literals
    IntegerLiteral,
    RealLiteral,
    StringLiteral,
    True,
    False,

    Identifier,

    // Operators
    Assign,       // :=
    Equal,        // =
    Less,         // <
    Greater,      // >
    LessEqual,    // <=
    GreaterEqual, // >=
    NotEqual,     // <>
    Plus,         // +
    Minus,        // -
    Star,         // *
    Slash,        // /

    // Punctuation
    LParen,    // (
    RParen,    // )
    LBracket,  // [
    RBracket,  // ]
    Comma,     // ,
    Colon,     // :
    Semicolon, // ;
    Dot,       // .
    DoubleDot, // ..

    // Trivia (only in raw mode)
    Comment,
    Newline,
    Tab,

    Eof,
}

impl TokenKind {
    /// Look up a word in the keyword table (ASCII case-insensitive).
    pub fn keyword(word: &str) -> Option<TokenKind> {
        let kind = match word.to_ascii_lowercase().as_str() {
            "program" => TokenKind::Program,
            "var" => TokenKind::Var,
            "begin" => TokenKind::Begin,
            "end" => TokenKind::End,
            "if" => TokenKind::If,
            "then" => TokenKind::Then,
            "else" => TokenKind::Else,
            "while" => TokenKind::While,
            "do" => TokenKind::Do,
            "for" => TokenKind::For,
            "to" => TokenKind::To,
            "function" => TokenKind::Function,
            "procedure" => TokenKind::Procedure,
            "array" => TokenKind::Array,
            "of" => TokenKind::Of,
            "repeat" => TokenKind::Repeat,
            "until" => TokenKind::Until,
            "and" => TokenKind::And,
            "or" => TokenKind::Or,
            "not" => TokenKind::Not,
            "div" => TokenKind::Div,
            "mod" => TokenKind::Mod,
            "in" => TokenKind::In,
            "write" => TokenKind::Write,
            "writeln" => TokenKind::Writeln,
            "read" => TokenKind::Read,
            "readln" => TokenKind::Readln,
            "integer" => TokenKind::IntegerType,
            "real" => TokenKind::RealType,
            "string" => TokenKind::StringType,
            "boolean" => TokenKind::BooleanType,
            "char" => TokenKind::CharType,
            "true" => TokenKind::True,
            "false" => TokenKind::False,
            _ => return None,
        };
        Some(kind)
    }

    /// Short name used by token dumps.
    pub fn name(self) -> &'static str {
        match self {
            TokenKind::Program => "program",
            TokenKind::Var => "var",
            TokenKind::Begin => "begin",
            TokenKind::End => "end",
            TokenKind::If => "if",
            TokenKind::Then => "then",
            TokenKind::Else => "else",
            TokenKind::While => "while",
            TokenKind::Do => "do",
            TokenKind::For => "for",
            TokenKind::To => "to",
            TokenKind::Function => "function",
            TokenKind::Procedure => "procedure",
            TokenKind::Array => "array",
            TokenKind::Of => "of",
            TokenKind::Repeat => "repeat",
            TokenKind::Until => "until",
            TokenKind::And => "and",
            TokenKind::Or => "or",
            TokenKind::Not => "not",
            TokenKind::Div => "div",
            TokenKind::Mod => "mod",
            TokenKind::In => "in",
            TokenKind::Write => "write",
            TokenKind::Writeln => "writeln",
            TokenKind::Read => "read",
            TokenKind::Readln => "readln",
            TokenKind::IntegerType => "integer",
            TokenKind::RealType => "real",
            TokenKind::StringType => "string",
            TokenKind::BooleanType => "boolean",
            TokenKind::CharType => "char",
            TokenKind::IntegerLiteral => "integer_literal",
            TokenKind::RealLiteral => "real_literal",
            TokenKind::StringLiteral => "string_literal",
            TokenKind::True => "true",
            TokenKind::False => "false",
            TokenKind::Identifier => "identifier",
            TokenKind::Assign => "assign",
            TokenKind::Equal => "equal",
            TokenKind::Less => "less",
            TokenKind::Greater => "greater",
            TokenKind::LessEqual => "le",
            TokenKind::GreaterEqual => "ge",
            TokenKind::NotEqual => "noteq",
            TokenKind::Plus => "plus",
            TokenKind::Minus => "minus",
            TokenKind::Star => "multiply",
            TokenKind::Slash => "divide",
            TokenKind::LParen => "lparen",
            TokenKind::RParen => "rparen",
            TokenKind::LBracket => "lbracket",
            TokenKind::RBracket => "rbracket",
            TokenKind::Comma => "comma",
            TokenKind::Colon => "colon",
            TokenKind::Semicolon => "semicolon",
            TokenKind::Dot => "dot",
            TokenKind::DoubleDot => "doubleDot",
            TokenKind::Comment => "comment",
            TokenKind::Newline => "newline",
            TokenKind::Tab => "tab",
            TokenKind::Eof => "eof",
        }
    }

    pub fn is_keyword(self) -> bool {
        matches!(
            self,
            TokenKind::Program
                | TokenKind::Var
                | TokenKind::Begin
                | TokenKind::End
                | TokenKind::If
                | TokenKind::Then
                | TokenKind::Else
                | TokenKind::While
                | TokenKind::Do
                | TokenKind::For
                | TokenKind::To
                | TokenKind::Function
                | TokenKind::Procedure
                | TokenKind::Array
                | TokenKind::Of
                | TokenKind::Repeat
                | TokenKind::Until
                | TokenKind::And
                | TokenKind::Or
                | TokenKind::Not
                | TokenKind::Div
                | TokenKind::Mod
                | TokenKind::In
                | TokenKind::Write
                | TokenKind::Writeln
                | TokenKind::Read
                | TokenKind::Readln
                | TokenKind::True
                | TokenKind::False
        )
    }

    pub fn is_type_name(self) -> bool {
        matches!(
            self,
            TokenKind::IntegerType
                | TokenKind::RealType
                | TokenKind::StringType
                | TokenKind::BooleanType
                | TokenKind::CharType
        )
    }
}

/// How a kind is described in syntax errors ("expected ':=' ...").
impl fmt::Display for TokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let symbol = match self {
            TokenKind::IntegerLiteral => return write!(f, "integer literal"),
            TokenKind::RealLiteral => return write!(f, "real literal"),
            TokenKind::StringLiteral => return write!(f, "string literal"),
            TokenKind::Identifier => return write!(f, "identifier"),
            TokenKind::Comment => return write!(f, "comment"),
            TokenKind::Newline => return write!(f, "newline"),
            TokenKind::Tab => return write!(f, "tab"),
            TokenKind::Eof => return write!(f, "end of file"),
            TokenKind::Assign => ":=",
            TokenKind::Equal => "=",
            TokenKind::Less => "<",
            TokenKind::Greater => ">",
            TokenKind::LessEqual => "<=",
            TokenKind::GreaterEqual => ">=",
            TokenKind::NotEqual => "<>",
            TokenKind::Plus => "+",
            TokenKind::Minus => "-",
            TokenKind::Star => "*",
            TokenKind::Slash => "/",
            TokenKind::LParen => "(",
            TokenKind::RParen => ")",
            TokenKind::LBracket => "[",
            TokenKind::RBracket => "]",
            TokenKind::Comma => ",",
            TokenKind::Colon => ":",
            TokenKind::Semicolon => ";",
            TokenKind::Dot => ".",
            TokenKind::DoubleDot => "..",
            other => other.name(),
        };
        write!(f, "'{}'", symbol)
    }
}

/// A lexical token: kind, source text and the position of its first character.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token {
    pub kind: TokenKind,
    pub lexeme: String,
    pub location: SourceLocation,
}

impl Token {
    pub fn new(kind: TokenKind, lexeme: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            lexeme: lexeme.into(),
            location,
        }
    }
}

impl fmt::Display for Token {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.kind {
            TokenKind::Identifier => write!(f, "identifier '{}'", self.lexeme),
            TokenKind::IntegerLiteral => write!(f, "integer literal {}", self.lexeme),
            TokenKind::RealLiteral => write!(f, "real literal {}", self.lexeme),
            TokenKind::StringLiteral => write!(f, "string literal '{}'", self.lexeme),
            kind => write!(f, "{}", kind),
        }
    }
}

/// Lexer error type
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("Lexer error at {location}: {message}")]
pub struct LexError {
    pub message: String,
    pub location: SourceLocation,
}

impl LexError {
    fn new(message: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            message: message.into(),
            location,
        }
    }
}

/// Position in the input: byte offset plus 1-based line and column.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor {
    pub offset: usize,
    pub line: usize,
    pub column: usize,
}

impl Cursor {
    pub fn start() -> Self {
        Self {
            offset: 0,
            line: 1,
            column: 1,
        }
    }

    pub fn location(&self) -> SourceLocation {
        SourceLocation::new(self.line, self.column)
    }
}

impl Default for Cursor {
    fn default() -> Self {
        Self::start()
    }
}

/// Lexer for Pascal source code
#[derive(Debug, Clone, Copy)]
pub struct Lexer<'src> {
    source: &'src str,
    trivia: bool,
}

impl<'src> Lexer<'src> {
    /// Create a new lexer for the given source string.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            trivia: false,
        }
    }

    /// Report comments, newlines and tabs as tokens instead of skipping them.
    pub fn with_trivia(mut self) -> Self {
        self.trivia = true;
        self
    }

    /// Scan the token starting at `cursor`.
    ///
    /// Returns the token and the cursor just past it. At end of input this
    /// returns [`TokenKind::Eof`] with the cursor unchanged, however often it
    /// is called.
    pub fn next_token(&self, cursor: Cursor) -> Result<(Token, Cursor), LexError> {
        let cursor = self.skip_whitespace_and_comments(cursor)?;
        let loc = cursor.location();

        let Some(ch) = self.peek(cursor) else {
            return Ok((Token::new(TokenKind::Eof, "", loc), cursor));
        };

        match ch {
            '\n' if self.trivia => Ok((Token::new(TokenKind::Newline, "\n", loc), self.bump(cursor))),
            '\t' if self.trivia => Ok((Token::new(TokenKind::Tab, "\t", loc), self.bump(cursor))),
            '/' if self.peek_ahead(cursor, 1) == Some('/') => Ok(self.line_comment(cursor)),
            '{' => self.brace_comment(cursor),
            '(' if self.peek_ahead(cursor, 1) == Some('*') => self.paren_comment(cursor),

            '0'..='9' => self.number_literal(cursor),
            'a'..='z' | 'A'..='Z' | '_' => Ok(self.identifier_or_keyword(cursor)),
            '\'' | '"' => self.string_literal(cursor, ch),

            // Digraphs fall back to their first character
            ':' => Ok(self.digraph(cursor, &[('=', TokenKind::Assign)], TokenKind::Colon)),
            '<' => Ok(self.digraph(
                cursor,
                &[('=', TokenKind::LessEqual), ('>', TokenKind::NotEqual)],
                TokenKind::Less,
            )),
            '>' => Ok(self.digraph(cursor, &[('=', TokenKind::GreaterEqual)], TokenKind::Greater)),
            '.' => Ok(self.digraph(cursor, &[('.', TokenKind::DoubleDot)], TokenKind::Dot)),

            '+' => Ok(self.single(cursor, TokenKind::Plus)),
            '-' => Ok(self.single(cursor, TokenKind::Minus)),
            '*' => Ok(self.single(cursor, TokenKind::Star)),
            '/' => Ok(self.single(cursor, TokenKind::Slash)),
            '(' => Ok(self.single(cursor, TokenKind::LParen)),
            ')' => Ok(self.single(cursor, TokenKind::RParen)),
            '[' => Ok(self.single(cursor, TokenKind::LBracket)),
            ']' => Ok(self.single(cursor, TokenKind::RBracket)),
            ',' => Ok(self.single(cursor, TokenKind::Comma)),
            ';' => Ok(self.single(cursor, TokenKind::Semicolon)),
            '=' => Ok(self.single(cursor, TokenKind::Equal)),

            _ => Err(LexError::new(format!("Unexpected symbol '{}'", ch), loc)),
        }
    }

    /// Iterate over the tokens of the whole input, ending with `Eof`.
    pub fn tokens(&self) -> Tokens<'src> {
        Tokens {
            lexer: *self,
            cursor: Cursor::start(),
            done: false,
        }
    }

    /// Tokenize the entire input; the last token is always `Eof`.
    pub fn tokenize(&self) -> Result<Vec<Token>, LexError> {
        self.tokens().collect()
    }

    fn single(&self, cursor: Cursor, kind: TokenKind) -> (Token, Cursor) {
        let end = self.bump(cursor);
        (Token::new(kind, self.slice(cursor, end), cursor.location()), end)
    }

    fn digraph(
        &self,
        cursor: Cursor,
        seconds: &[(char, TokenKind)],
        fallback: TokenKind,
    ) -> (Token, Cursor) {
        let after_first = self.bump(cursor);
        let next = self.peek(after_first);
        for &(second, kind) in seconds {
            if next == Some(second) {
                let end = self.bump(after_first);
                return (Token::new(kind, self.slice(cursor, end), cursor.location()), end);
            }
        }
        (
            Token::new(fallback, self.slice(cursor, after_first), cursor.location()),
            after_first,
        )
    }

    /// Parse numeric literal (integer or real)
    fn number_literal(&self, start: Cursor) -> Result<(Token, Cursor), LexError> {
        let loc = start.location();
        let mut end = self.skip_digits(start);
        let mut kind = TokenKind::IntegerLiteral;

        if self.peek(end) == Some('.') {
            match self.peek_ahead(end, 1) {
                Some(d) if d.is_ascii_digit() => {
                    end = self.skip_digits(self.bump(end));
                    kind = TokenKind::RealLiteral;
                    if self.peek(end) == Some('.') {
                        return Err(LexError::new(
                            format!(
                                "Malformed real literal '{}.': second '.'",
                                self.slice(start, end)
                            ),
                            loc,
                        ));
                    }
                }
                // `1..10`: integer followed by a range operator
                Some('.') => {}
                _ => {
                    return Err(LexError::new(
                        format!(
                            "Malformed real literal '{}.': expected digit after '.'",
                            self.slice(start, end)
                        ),
                        loc,
                    ));
                }
            }
        }

        if let Some(ch) = self.peek(end) {
            if ch.is_ascii_alphabetic() || ch == '_' {
                return Err(LexError::new(
                    format!(
                        "Invalid identifier start after digit: '{}{}'",
                        self.slice(start, end),
                        ch
                    ),
                    loc,
                ));
            }
        }

        Ok((Token::new(kind, self.slice(start, end), loc), end))
    }

    /// Parse identifier or keyword
    fn identifier_or_keyword(&self, start: Cursor) -> (Token, Cursor) {
        let mut end = start;
        while let Some(ch) = self.peek(end) {
            if ch.is_ascii_alphanumeric() || ch == '_' {
                end = self.bump(end);
            } else {
                break;
            }
        }

        let word = self.slice(start, end);
        let kind = TokenKind::keyword(word).unwrap_or(TokenKind::Identifier);
        (Token::new(kind, word, start.location()), end)
    }

    /// Parse string literal delimited by `quote`; no escape sequences.
    fn string_literal(&self, start: Cursor, quote: char) -> Result<(Token, Cursor), LexError> {
        let content_start = self.bump(start);
        let mut end = content_start;

        while let Some(ch) = self.peek(end) {
            if ch == quote {
                let text = self.slice(content_start, end);
                return Ok((
                    Token::new(TokenKind::StringLiteral, text, start.location()),
                    self.bump(end),
                ));
            }
            end = self.bump(end);
        }

        Err(LexError::new("Unterminated string literal", start.location()))
    }

    fn line_comment(&self, start: Cursor) -> (Token, Cursor) {
        let mut end = start;
        while let Some(ch) = self.peek(end) {
            if ch == '\n' {
                break;
            }
            end = self.bump(end);
        }
        (
            Token::new(TokenKind::Comment, self.slice(start, end), start.location()),
            end,
        )
    }

    fn brace_comment(&self, start: Cursor) -> Result<(Token, Cursor), LexError> {
        self.block_comment(start, 1, "}")
    }

    fn paren_comment(&self, start: Cursor) -> Result<(Token, Cursor), LexError> {
        self.block_comment(start, 2, "*)")
    }

    fn block_comment(
        &self,
        start: Cursor,
        open_len: usize,
        close: &str,
    ) -> Result<(Token, Cursor), LexError> {
        let mut end = start;
        for _ in 0..open_len {
            end = self.bump(end);
        }

        while self.peek(end).is_some() {
            if self.source[end.offset..].starts_with(close) {
                for _ in 0..close.len() {
                    end = self.bump(end);
                }
                return Ok((
                    Token::new(TokenKind::Comment, self.slice(start, end), start.location()),
                    end,
                ));
            }
            end = self.bump(end);
        }

        Err(LexError::new("Unterminated comment", start.location()))
    }

    /// Skip whitespace and comments (only whitespace in trivia mode)
    fn skip_whitespace_and_comments(&self, mut cursor: Cursor) -> Result<Cursor, LexError> {
        loop {
            match self.peek(cursor) {
                Some(' ') | Some('\r') => cursor = self.bump(cursor),
                Some('\t') | Some('\n') if !self.trivia => cursor = self.bump(cursor),
                _ if self.trivia => return Ok(cursor),
                Some('/') if self.peek_ahead(cursor, 1) == Some('/') => {
                    let (_, end) = self.line_comment(cursor);
                    // The terminating newline belongs to the comment
                    cursor = if self.peek(end) == Some('\n') {
                        self.bump(end)
                    } else {
                        end
                    };
                }
                Some('{') => cursor = self.brace_comment(cursor)?.1,
                Some('(') if self.peek_ahead(cursor, 1) == Some('*') => {
                    cursor = self.paren_comment(cursor)?.1
                }
                _ => return Ok(cursor),
            }
        }
    }

    fn skip_digits(&self, mut cursor: Cursor) -> Cursor {
        while matches!(self.peek(cursor), Some(ch) if ch.is_ascii_digit()) {
            cursor = self.bump(cursor);
        }
        cursor
    }

    /// Peek at the character under the cursor
    fn peek(&self, cursor: Cursor) -> Option<char> {
        self.source[cursor.offset..].chars().next()
    }

    /// Peek ahead n characters
    fn peek_ahead(&self, cursor: Cursor, n: usize) -> Option<char> {
        self.source[cursor.offset..].chars().nth(n)
    }

    /// Cursor after the character under `cursor`
    fn bump(&self, cursor: Cursor) -> Cursor {
        match self.peek(cursor) {
            None => cursor,
            Some('\n') => Cursor {
                offset: cursor.offset + 1,
                line: cursor.line + 1,
                column: 1,
            },
            Some(ch) => Cursor {
                offset: cursor.offset + ch.len_utf8(),
                line: cursor.line,
                column: cursor.column + 1,
            },
        }
    }

    fn slice(&self, start: Cursor, end: Cursor) -> &'src str {
        &self.source[start.offset..end.offset]
    }
}

/// Iterator over a lexer's tokens. Yields `Eof` once, or stops after the
/// first error.
pub struct Tokens<'src> {
    lexer: Lexer<'src>,
    cursor: Cursor,
    done: bool,
}

impl Iterator for Tokens<'_> {
    type Item = Result<Token, LexError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.lexer.next_token(self.cursor) {
            Ok((token, cursor)) => {
                self.cursor = cursor;
                self.done = token.kind == TokenKind::Eof;
                Some(Ok(token))
            }
            Err(e) => {
                self.done = true;
                Some(Err(e))
            }
        }
    }
}

/// Tokenize `source` with trivia skipped.
pub fn tokenize(source: &str) -> Result<Vec<Token>, LexError> {
    Lexer::new(source).tokenize()
}

/// Render tokens one per line as `Type: <kind>  Value: <lexeme>  (<line>:<column>)`.
/// The trailing `Eof` token is omitted.
pub fn format_token_dump(tokens: &[Token]) -> String {
    let mut out = String::new();
    for token in tokens.iter().filter(|t| t.kind != TokenKind::Eof) {
        let value = match token.kind {
            TokenKind::Newline => "\\n",
            TokenKind::Tab => "\\t",
            _ => token.lexeme.as_str(),
        };
        out.push_str(&format!(
            "Type: {}  Value: {}  ({}:{})\n",
            token.kind.name(),
            value,
            token.location.line,
            token.location.column
        ));
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    fn kinds(source: &str) -> Vec<TokenKind> {
        tokenize(source)
            .unwrap()
            .into_iter()
            .map(|t| t.kind)
            .collect()
    }

    #[test]
    fn test_program_header() {
        use TokenKind::*;
        assert_eq!(
            kinds("program test; end."),
            vec![Program, Identifier, Semicolon, End, Dot, Eof]
        );
    }

    #[test]
    fn test_var_declaration() {
        use TokenKind::*;
        let tokens = tokenize("var x: integer; end.").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![Var, Identifier, Colon, IntegerType, Semicolon, End, Dot, Eof]
        );
        assert_eq!(tokens[1].lexeme, "x");
    }

    #[test]
    fn test_while_loop() {
        use TokenKind::*;
        let tokens = tokenize("while i < 10 do i := i + 1; end.").unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(
            kinds,
            vec![
                While, Identifier, Less, IntegerLiteral, Do, Identifier, Assign, Identifier,
                Plus, IntegerLiteral, Semicolon, End, Dot, Eof
            ]
        );
        assert_eq!(tokens[3].lexeme, "10");
        assert_eq!(tokens[9].lexeme, "1");
    }

    #[test]
    fn test_digraphs_and_fallbacks() {
        use TokenKind::*;
        assert_eq!(
            kinds(":= : <= <> < >= > .. ."),
            vec![Assign, Colon, LessEqual, NotEqual, Less, GreaterEqual, Greater, DoubleDot, Dot, Eof]
        );
    }

    #[test]
    fn test_positions() {
        let tokens = tokenize("x := 1;\n  y := 2.5;").unwrap();
        assert_eq!(tokens[0].location, SourceLocation::new(1, 1));
        assert_eq!(tokens[1].location, SourceLocation::new(1, 3));
        assert_eq!(tokens[4].location, SourceLocation::new(2, 3));
        assert_eq!(tokens[6].kind, TokenKind::RealLiteral);
        assert_eq!(tokens[6].lexeme, "2.5");
        assert_eq!(tokens[6].location, SourceLocation::new(2, 8));
    }

    #[test]
    fn test_range_bounds_are_integers() {
        use TokenKind::*;
        assert_eq!(
            kinds("[1..10]"),
            vec![LBracket, IntegerLiteral, DoubleDot, IntegerLiteral, RBracket, Eof]
        );
    }

    #[test]
    fn test_keywords_case_insensitive() {
        let tokens = tokenize("BEGIN End wRiTeLn Foo").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::Begin);
        assert_eq!(tokens[0].lexeme, "BEGIN");
        assert_eq!(tokens[1].kind, TokenKind::End);
        assert_eq!(tokens[2].kind, TokenKind::Writeln);
        assert_eq!(tokens[3].kind, TokenKind::Identifier);
    }

    #[test]
    fn test_comments() {
        use TokenKind::*;
        let source = "x // line\n{ brace\n comment } y (* paren *) z";
        assert_eq!(kinds(source), vec![Identifier, Identifier, Identifier, Eof]);
        let tokens = tokenize(source).unwrap();
        assert_eq!(tokens[1].location, SourceLocation::new(3, 12));
    }

    #[test]
    fn test_string_literals() {
        let tokens = tokenize("'Hello, World!' \"it's\"").unwrap();
        assert_eq!(tokens[0].kind, TokenKind::StringLiteral);
        assert_eq!(tokens[0].lexeme, "Hello, World!");
        assert_eq!(tokens[1].lexeme, "it's");
        assert_eq!(tokens[1].location, SourceLocation::new(1, 17));
    }

    #[test]
    fn test_unterminated_string_reports_opening_quote() {
        let err = tokenize("x := 1;\n  s := 'abc\n\n").unwrap_err();
        assert_eq!(err.message, "Unterminated string literal");
        assert_eq!(err.location, SourceLocation::new(2, 8));
    }

    #[test]
    fn test_number_errors() {
        let err = tokenize("x := 12abc;").unwrap_err();
        assert!(err.message.contains("Invalid identifier start after digit"));
        assert_eq!(err.location, SourceLocation::new(1, 6));

        let err = tokenize("x := 1.;").unwrap_err();
        assert!(err.message.contains("Malformed real literal"));

        let err = tokenize("x := 1.2.3;").unwrap_err();
        assert!(err.message.contains("second '.'"));
    }

    #[test]
    fn test_unexpected_symbol() {
        let err = tokenize("x := 1 @ 2").unwrap_err();
        assert_eq!(err.message, "Unexpected symbol '@'");
        assert_eq!(err.location, SourceLocation::new(1, 8));
    }

    #[test]
    fn test_unterminated_comment() {
        let err = tokenize("x { never closed").unwrap_err();
        assert_eq!(err.message, "Unterminated comment");
        assert_eq!(err.location, SourceLocation::new(1, 3));
    }

    #[test]
    fn test_eof_is_sticky() {
        let lexer = Lexer::new("x");
        let (_, cursor) = lexer.next_token(Cursor::start()).unwrap();
        let (eof, after) = lexer.next_token(cursor).unwrap();
        assert_eq!(eof.kind, TokenKind::Eof);
        let (again, _) = lexer.next_token(after).unwrap();
        assert_eq!(again, eof);
    }

    #[test]
    fn test_tokenizing_is_deterministic() {
        let source = "program p; var a: array[1..3] of real; begin a[1] := 2.0; end.";
        assert_eq!(tokenize(source).unwrap(), tokenize(source).unwrap());
    }

    #[test]
    fn test_trivia_mode() {
        use TokenKind::*;
        let tokens = Lexer::new("x // note\n\ty").with_trivia().tokenize().unwrap();
        let kinds: Vec<_> = tokens.iter().map(|t| t.kind).collect();
        assert_eq!(kinds, vec![Identifier, Comment, Newline, Tab, Identifier, Eof]);
        assert_eq!(tokens[1].lexeme, "// note");
    }

    #[test]
    fn test_token_dump_format() {
        let tokens = tokenize("x := 1").unwrap();
        let dump = format_token_dump(&tokens);
        assert_eq!(
            dump,
            "Type: identifier  Value: x  (1:1)\n\
             Type: assign  Value: :=  (1:3)\n\
             Type: integer_literal  Value: 1  (1:6)\n"
        );
    }
}
