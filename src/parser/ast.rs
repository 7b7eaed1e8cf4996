// AST (Abstract Syntax Tree) definitions for the Pascal translator

use std::fmt;
use thiserror::Error;

/// Source location information for error reporting
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

impl fmt::Display for SourceLocation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}, column {}", self.line, self.column)
    }
}

/// Literal flavours carried by [`NodeKind::Literal`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LiteralKind {
    Integer,
    Real,
    String,
    /// A one-character quoted literal not used as a `string`
    Char,
    Boolean,
}

/// Type names carried by [`NodeKind::Type`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TypeName {
    Integer,
    Real,
    String,
    Boolean,
    Char,
    Array,
}

/// The closed set of node kinds.
///
/// The code generator matches on this exhaustively, so a new kind without a
/// rendering rule does not compile.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum NodeKind {
    Program,
    StatementList,
    Assignment,
    VarDecl,
    FunctionDecl,
    ProcedureDecl,
    FunctionCall,
    ParamList,
    Parameter,
    ArgumentList,
    If,
    ElseBlock,
    While,
    For,
    Repeat,
    Write,
    Read,
    ExpressionStatement,
    BinaryExpression,
    UnaryExpression,
    ArrayAccess,
    Identifier,
    Literal(LiteralKind),
    Type(TypeName),
    ArrayBounds,
}

/// Allowed child counts for a node kind
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Arity {
    Exact(usize),
    Between(usize, usize),
    Any,
}

impl Arity {
    pub fn accepts(self, count: usize) -> bool {
        match self {
            Arity::Exact(n) => count == n,
            Arity::Between(lo, hi) => (lo..=hi).contains(&count),
            Arity::Any => true,
        }
    }
}

impl fmt::Display for Arity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Arity::Exact(n) => write!(f, "{}", n),
            Arity::Between(lo, hi) => write!(f, "{} to {}", lo, hi),
            Arity::Any => write!(f, "any number of"),
        }
    }
}

impl NodeKind {
    /// Fixed child count for each kind.
    pub fn arity(self) -> Arity {
        match self {
            NodeKind::Program => Arity::Exact(1),
            NodeKind::StatementList | NodeKind::ParamList | NodeKind::ArgumentList => Arity::Any,
            NodeKind::Assignment => Arity::Exact(2),
            NodeKind::VarDecl | NodeKind::Parameter => Arity::Exact(2),
            NodeKind::FunctionDecl => Arity::Exact(3),
            NodeKind::ProcedureDecl => Arity::Exact(2),
            NodeKind::FunctionCall => Arity::Exact(1),
            NodeKind::If => Arity::Between(2, 3),
            NodeKind::ElseBlock => Arity::Exact(1),
            NodeKind::While | NodeKind::Repeat => Arity::Exact(2),
            NodeKind::For => Arity::Exact(3),
            NodeKind::Write | NodeKind::Read => Arity::Exact(1),
            NodeKind::ExpressionStatement => Arity::Exact(1),
            NodeKind::BinaryExpression => Arity::Exact(2),
            NodeKind::UnaryExpression | NodeKind::ArrayAccess => Arity::Exact(1),
            NodeKind::Identifier | NodeKind::Literal(_) => Arity::Exact(0),
            NodeKind::Type(TypeName::Array) => Arity::Exact(2),
            NodeKind::Type(_) => Arity::Exact(0),
            NodeKind::ArrayBounds => Arity::Exact(2),
        }
    }
}

/// Contract violations between parser and generator.
///
/// These never stem from user input; they indicate a bug in the translator.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InternalError {
    #[error("internal error: {kind:?} node expects {expected} children, found {found}")]
    Arity {
        kind: NodeKind,
        expected: Arity,
        found: usize,
    },

    #[error("internal error: unexpected {kind:?} node in {context}")]
    UnexpectedNode {
        context: &'static str,
        kind: NodeKind,
    },
}

/// A tagged AST node: kind, ordered children and an optional scalar value
/// (identifier name, literal text or operator symbol).
#[derive(Debug, Clone, PartialEq)]
pub struct AstNode {
    pub kind: NodeKind,
    pub children: Vec<AstNode>,
    pub value: Option<String>,
    pub location: SourceLocation,
}

impl AstNode {
    /// Build a node, checking the child count against [`NodeKind::arity`].
    pub fn new(
        kind: NodeKind,
        children: Vec<AstNode>,
        value: Option<String>,
        location: SourceLocation,
    ) -> Result<Self, InternalError> {
        let expected = kind.arity();
        if !expected.accepts(children.len()) {
            return Err(InternalError::Arity {
                kind,
                expected,
                found: children.len(),
            });
        }
        Ok(Self {
            kind,
            children,
            value,
            location,
        })
    }

    /// Leaf node (identifier, literal, simple type)
    pub fn leaf(kind: NodeKind, value: impl Into<String>, location: SourceLocation) -> Self {
        Self {
            kind,
            children: Vec::new(),
            value: Some(value.into()),
            location,
        }
    }

    /// The scalar value, or an empty string when absent.
    pub fn value_str(&self) -> &str {
        self.value.as_deref().unwrap_or("")
    }

    /// Error for a node whose children do not match its kind.
    pub fn arity_error(&self) -> InternalError {
        InternalError::Arity {
            kind: self.kind,
            expected: self.kind.arity(),
            found: self.children.len(),
        }
    }

    /// Error for a node that may not appear where it was found.
    pub fn misplaced(&self, context: &'static str) -> InternalError {
        InternalError::UnexpectedNode {
            context,
            kind: self.kind,
        }
    }
}

/// Parse result: the `program` root plus the global symbol scope.
#[derive(Debug, Clone)]
pub struct Program {
    pub root: AstNode,
    pub symbols: super::symbols::SymbolTable,
}

impl Program {
    /// Program name from the `program <name>;` header, if any.
    pub fn name(&self) -> Option<&str> {
        self.root.value.as_deref()
    }

    /// Top-level statements in source order.
    pub fn statements(&self) -> &[AstNode] {
        self.root
            .children
            .first()
            .map(|list| list.children.as_slice())
            .unwrap_or(&[])
    }
}
