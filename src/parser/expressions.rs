//! Expression parsing implementation
//!
//! One grammar rule per precedence level, lowest first:
//!
//! ```text
//! expression        ::= simple_expression [ relop simple_expression ]
//! simple_expression ::= term { ("+" | "-" | "or") term }
//! term              ::= factor { ("*" | "/" | "div" | "mod" | "and") factor }
//! factor            ::= integer | real | string | "true" | "false"
//!                     | "(" expression ")"
//!                     | ("-" | "not") factor
//!                     | identifier [ "(" arguments ")" | "[" expression "]" ]
//! ```
//!
//! Binary operators fold to the left, so `a - b - c` is `(a - b) - c`.
//! Relational operators do not chain.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseResult, Parser};
use crate::parser::symbols::{Symbol, TypeDesc};

impl Parser<'_> {
    /// Parse expression (entry point)
    pub(crate) fn parse_expression(&mut self) -> ParseResult<AstNode> {
        let left = self.parse_simple_expression()?;
        self.parse_relation_rest(left)
    }

    /// Finish an expression whose first factor was already parsed.
    pub(crate) fn parse_expression_from(&mut self, first: AstNode) -> ParseResult<AstNode> {
        let term = self.parse_term_rest(first)?;
        let simple = self.parse_simple_rest(term)?;
        self.parse_relation_rest(simple)
    }

    fn parse_relation_rest(&mut self, left: AstNode) -> ParseResult<AstNode> {
        if !is_relational(self.current.kind) {
            return Ok(left);
        }
        let op = self.advance()?;
        let right = self.parse_simple_expression()?;
        let left = self.widen_char(left, &right);
        let right = self.widen_char(right, &left);
        Ok(binary(op, left, right)?)
    }

    fn parse_simple_expression(&mut self) -> ParseResult<AstNode> {
        let left = self.parse_term()?;
        self.parse_simple_rest(left)
    }

    fn parse_simple_rest(&mut self, mut left: AstNode) -> ParseResult<AstNode> {
        while matches!(
            self.current.kind,
            TokenKind::Plus | TokenKind::Minus | TokenKind::Or
        ) {
            let op = self.advance()?;
            let right = self.parse_term()?;
            left = binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_term(&mut self) -> ParseResult<AstNode> {
        let left = self.parse_factor()?;
        self.parse_term_rest(left)
    }

    fn parse_term_rest(&mut self, mut left: AstNode) -> ParseResult<AstNode> {
        while matches!(
            self.current.kind,
            TokenKind::Star | TokenKind::Slash | TokenKind::Div | TokenKind::Mod | TokenKind::And
        ) {
            let op = self.advance()?;
            let right = self.parse_factor()?;
            left = binary(op, left, right)?;
        }
        Ok(left)
    }

    fn parse_factor(&mut self) -> ParseResult<AstNode> {
        self.nested(Self::parse_factor_inner)
    }

    fn parse_factor_inner(&mut self) -> ParseResult<AstNode> {
        let literal = match self.current.kind {
            TokenKind::IntegerLiteral => Some(LiteralKind::Integer),
            TokenKind::RealLiteral => Some(LiteralKind::Real),
            TokenKind::StringLiteral if self.current.lexeme.chars().count() == 1 => {
                Some(LiteralKind::Char)
            }
            TokenKind::StringLiteral => Some(LiteralKind::String),
            TokenKind::True | TokenKind::False => Some(LiteralKind::Boolean),
            _ => None,
        };
        if let Some(kind) = literal {
            let token = self.advance()?;
            let value = match kind {
                LiteralKind::Boolean => token.lexeme.to_ascii_lowercase(),
                _ => token.lexeme,
            };
            return Ok(AstNode::leaf(NodeKind::Literal(kind), value, token.location));
        }

        match self.current.kind {
            TokenKind::LParen => {
                self.advance()?;
                let expr = self.parse_expression()?;
                self.expect(TokenKind::RParen, "to close parenthesized expression")?;
                Ok(expr)
            }
            TokenKind::Minus | TokenKind::Not => {
                let op = self.advance()?;
                let operand = self.parse_factor()?;
                Ok(AstNode::new(
                    NodeKind::UnaryExpression,
                    vec![operand],
                    Some(op.lexeme.to_ascii_lowercase()),
                    op.location,
                )?)
            }
            TokenKind::Identifier => {
                let name = self.advance()?;
                self.parse_identifier_factor(name)
            }
            _ => Err(self.error("expression")),
        }
    }

    /// Decide what an already consumed identifier denotes: a call with
    /// arguments, an array element, a call of a declared routine without
    /// arguments, or a plain variable.
    pub(crate) fn parse_identifier_factor(&mut self, name: Token) -> ParseResult<AstNode> {
        match self.current.kind {
            TokenKind::LParen => self.parse_function_call(name),
            TokenKind::LBracket => self.parse_array_access(name),
            _ => {
                let callable = self
                    .symbols
                    .resolve(&name.lexeme)
                    .is_some_and(|symbol| symbol.kind.is_callable());
                if callable {
                    let args = AstNode::new(NodeKind::ArgumentList, Vec::new(), None, name.location)?;
                    Ok(AstNode::new(
                        NodeKind::FunctionCall,
                        vec![args],
                        Some(name.lexeme),
                        name.location,
                    )?)
                } else {
                    Ok(AstNode::leaf(NodeKind::Identifier, name.lexeme, name.location))
                }
            }
        }
    }

    /// `name ( [ expr { , expr } ] )`
    pub(crate) fn parse_function_call(&mut self, name: Token) -> ParseResult<AstNode> {
        let args = self.parse_argument_list()?;
        Ok(AstNode::new(
            NodeKind::FunctionCall,
            vec![args],
            Some(name.lexeme),
            name.location,
        )?)
    }

    pub(crate) fn parse_argument_list(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::LParen, "to open argument list")?.location;
        let mut args = Vec::new();
        if !self.check(TokenKind::RParen) {
            loop {
                args.push(self.parse_expression()?);
                if !self.match_kind(TokenKind::Comma)? {
                    break;
                }
            }
        }
        self.expect(TokenKind::RParen, "after arguments")?;
        Ok(AstNode::new(NodeKind::ArgumentList, args, None, loc)?)
    }

    /// `name [ expr ]`, with the index shifted so the declared lower bound
    /// maps to element 0.
    pub(crate) fn parse_array_access(&mut self, name: Token) -> ParseResult<AstNode> {
        self.expect(TokenKind::LBracket, "to open array index")?;
        let index = self.parse_expression()?;
        self.expect(TokenKind::RBracket, "to close array index")?;

        let low = match self.symbols.resolve(&name.lexeme) {
            Some(Symbol {
                ty: Some(TypeDesc::Array { low, .. }),
                ..
            }) => *low,
            _ => 0,
        };

        Ok(AstNode::new(
            NodeKind::ArrayAccess,
            vec![rebase(index, low)?],
            Some(name.lexeme),
            name.location,
        )?)
    }

    /// Turn a one-character literal into a string literal when the operand
    /// it meets is declared `string`.
    pub(crate) fn widen_char(&self, node: AstNode, other: &AstNode) -> AstNode {
        if node.kind == NodeKind::Literal(LiteralKind::Char) && self.is_string(other) {
            AstNode {
                kind: NodeKind::Literal(LiteralKind::String),
                ..node
            }
        } else {
            node
        }
    }

    fn is_string(&self, node: &AstNode) -> bool {
        let declared = || self.symbols.resolve(node.value_str()).and_then(|s| s.ty.as_ref());
        match node.kind {
            NodeKind::Literal(LiteralKind::String) => true,
            NodeKind::Identifier | NodeKind::FunctionCall => {
                matches!(declared(), Some(TypeDesc::String))
            }
            NodeKind::ArrayAccess => matches!(
                declared(),
                Some(TypeDesc::Array { element, .. }) if **element == TypeDesc::String
            ),
            _ => false,
        }
    }
}

fn is_relational(kind: TokenKind) -> bool {
    matches!(
        kind,
        TokenKind::Equal
            | TokenKind::NotEqual
            | TokenKind::Less
            | TokenKind::LessEqual
            | TokenKind::Greater
            | TokenKind::GreaterEqual
    )
}

fn binary(op: Token, left: AstNode, right: AstNode) -> Result<AstNode, InternalError> {
    AstNode::new(
        NodeKind::BinaryExpression,
        vec![left, right],
        Some(op.lexeme.to_ascii_lowercase()),
        op.location,
    )
}

/// Subtract `low` from an index expression. Integer literals are folded.
fn rebase(index: AstNode, low: i64) -> Result<AstNode, InternalError> {
    if low == 0 {
        return Ok(index);
    }

    if index.kind == NodeKind::Literal(LiteralKind::Integer) {
        if let Some(folded) = index
            .value_str()
            .parse::<i64>()
            .ok()
            .and_then(|value| value.checked_sub(low))
            .filter(|value| *value >= 0)
        {
            return Ok(AstNode::leaf(index.kind, folded.to_string(), index.location));
        }
    }

    let loc = index.location;
    let (op, amount) = if low > 0 { ("-", low) } else { ("+", -low) };
    let offset = AstNode::leaf(NodeKind::Literal(LiteralKind::Integer), amount.to_string(), loc);
    AstNode::new(
        NodeKind::BinaryExpression,
        vec![index, offset],
        Some(op.to_string()),
        loc,
    )
}
