//! Statement parsing implementation
//!
//! This module handles all statement types:
//!
//! - Declarations (dispatched to `declarations`)
//! - Assignments: `x := expr;`, `a[i] := expr;`
//! - Control flow: if/else, while, for, repeat/until
//! - Console I/O: `write`, `writeln`, `read`, `readln`
//! - Expression statements (procedure calls and bare expressions)
//!
//! Every statement consumes its own terminating `;`.

use crate::parser::ast::*;
use crate::parser::lexer::{Token, TokenKind};
use crate::parser::parse::{ParseResult, Parser};

impl Parser<'_> {
    /// Parse a single statement, dispatching on the current token.
    pub(crate) fn parse_statement(&mut self) -> ParseResult<AstNode> {
        self.nested(|parser| match parser.current.kind {
            TokenKind::Var => parser.parse_var_declaration(),
            TokenKind::Function => parser.parse_function_declaration(),
            TokenKind::Procedure => parser.parse_procedure_declaration(),
            TokenKind::If => parser.parse_if_statement(),
            TokenKind::While => parser.parse_while_statement(),
            TokenKind::For => parser.parse_for_statement(),
            TokenKind::Repeat => parser.parse_repeat_statement(),
            TokenKind::Write | TokenKind::Writeln => parser.parse_write_statement(),
            TokenKind::Read | TokenKind::Readln => parser.parse_read_statement(),
            TokenKind::Identifier => parser.parse_identifier_statement(),
            _ => parser.parse_expression_statement(),
        })
    }

    /// A statement starting with an identifier is an assignment when `:=`
    /// follows the target, otherwise an expression statement whose first
    /// factor has already been read.
    fn parse_identifier_statement(&mut self) -> ParseResult<AstNode> {
        let name = self.advance()?;
        let loc = name.location;

        let primary = if self.check(TokenKind::Assign) {
            AstNode::leaf(NodeKind::Identifier, name.lexeme, name.location)
        } else {
            self.parse_identifier_factor(name)?
        };

        let assignable = matches!(primary.kind, NodeKind::Identifier | NodeKind::ArrayAccess);
        if assignable && self.match_kind(TokenKind::Assign)? {
            let value = self.parse_expression()?;
            let value = self.widen_char(value, &primary);
            self.expect_semicolon("after assignment")?;
            return Ok(AstNode::new(NodeKind::Assignment, vec![primary, value], None, loc)?);
        }

        let expr = self.parse_expression_from(primary)?;
        self.expect_semicolon("after expression")?;
        Ok(AstNode::new(NodeKind::ExpressionStatement, vec![expr], None, loc)?)
    }

    fn parse_expression_statement(&mut self) -> ParseResult<AstNode> {
        let loc = self.current_location();
        let expr = self.parse_expression()?;
        self.expect_semicolon("after expression")?;
        Ok(AstNode::new(NodeKind::ExpressionStatement, vec![expr], None, loc)?)
    }

    /// Parse if statement.
    ///
    /// ```text
    /// if_stmt ::= "if" expr "then" "begin" statement*
    ///             ( "else" "begin" statement* "end" ";" "end" ";"
    ///             | "end" [ "else" "begin" statement* "end" ] ";" )
    /// ```
    ///
    /// The first alternative nests the else block inside the then block.
    fn parse_if_statement(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::If, "to start statement")?.location;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Then, "after if condition")?;
        self.expect(TokenKind::Begin, "after 'then'")?;
        let then_branch = self.parse_statement_list()?;

        let mut children = vec![condition, then_branch];

        if self.check(TokenKind::Else) {
            children.push(self.parse_else_block()?);
            self.expect_semicolon("after else block")?;
            self.expect(TokenKind::End, "to close if statement")?;
        } else {
            self.expect(TokenKind::End, "to close then block")?;
            if self.check(TokenKind::Else) {
                children.push(self.parse_else_block()?);
            }
        }

        self.expect_semicolon("after if statement")?;
        Ok(AstNode::new(NodeKind::If, children, None, loc)?)
    }

    fn parse_else_block(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::Else, "to start else block")?.location;
        let body = self.parse_block("after 'else'")?;
        Ok(AstNode::new(NodeKind::ElseBlock, vec![body], None, loc)?)
    }

    /// `while expr do begin statement* end ;`
    fn parse_while_statement(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::While, "to start statement")?.location;
        let condition = self.parse_expression()?;
        self.expect(TokenKind::Do, "after while condition")?;
        let body = self.parse_block("after 'do'")?;
        self.expect_semicolon("after while loop")?;
        Ok(AstNode::new(NodeKind::While, vec![condition, body], None, loc)?)
    }

    /// `for id := expr (to | ..) expr do begin statement* end ;`
    fn parse_for_statement(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::For, "to start statement")?.location;
        let var = self.expect_identifier("after 'for'")?;
        self.expect(TokenKind::Assign, "after loop variable")?;
        let start = self.parse_expression()?;

        if !(self.match_kind(TokenKind::To)? || self.match_kind(TokenKind::DoubleDot)?) {
            return Err(self.error("'to' or '..' between loop bounds"));
        }

        let end = self.parse_expression()?;
        self.expect(TokenKind::Do, "after loop bounds")?;
        let body = self.parse_block("after 'do'")?;
        self.expect_semicolon("after for loop")?;

        Ok(AstNode::new(
            NodeKind::For,
            vec![start, end, body],
            Some(var.lexeme),
            loc,
        )?)
    }

    /// `repeat statement* until expr ;`
    fn parse_repeat_statement(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::Repeat, "to start statement")?.location;
        let body = self.parse_statement_list()?;
        self.expect(TokenKind::Until, "to close repeat loop")?;
        let condition = self.parse_expression()?;
        self.expect_semicolon("after until condition")?;
        Ok(AstNode::new(NodeKind::Repeat, vec![body, condition], None, loc)?)
    }

    /// `write[ln] [ "(" expr { "," expr } ")" ] ;`
    fn parse_write_statement(&mut self) -> ParseResult<AstNode> {
        let keyword = self.advance()?;
        let args = if self.check(TokenKind::LParen) {
            self.parse_argument_list()?
        } else {
            AstNode::new(NodeKind::ArgumentList, Vec::new(), None, keyword.location)?
        };
        self.expect_semicolon("after write statement")?;
        Ok(AstNode::new(
            NodeKind::Write,
            vec![args],
            Some(keyword.kind.name().to_string()),
            keyword.location,
        )?)
    }

    /// `read[ln] [ "(" target { "," target } ")" ] ;` where every target
    /// is a variable or array element.
    fn parse_read_statement(&mut self) -> ParseResult<AstNode> {
        let keyword = self.advance()?;
        let loc = self.current_location();
        let mut targets = Vec::new();

        if self.match_kind(TokenKind::LParen)? {
            if !self.check(TokenKind::RParen) {
                loop {
                    targets.push(self.parse_read_target()?);
                    if !self.match_kind(TokenKind::Comma)? {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "after read targets")?;
        }
        self.expect_semicolon("after read statement")?;

        let args = AstNode::new(NodeKind::ArgumentList, targets, None, loc)?;
        Ok(AstNode::new(
            NodeKind::Read,
            vec![args],
            Some(keyword.kind.name().to_string()),
            keyword.location,
        )?)
    }

    fn parse_read_target(&mut self) -> ParseResult<AstNode> {
        if !self.check(TokenKind::Identifier) {
            return Err(self.error("variable to read into"));
        }
        let name: Token = self.advance()?;
        if self.check(TokenKind::LBracket) {
            self.parse_array_access(name)
        } else {
            Ok(AstNode::leaf(NodeKind::Identifier, name.lexeme, name.location))
        }
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CompileError;
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;

    fn statements(source: &str) -> Vec<AstNode> {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_program().unwrap().statements().to_vec()
    }

    fn single(source: &str) -> AstNode {
        let mut stmts = statements(source);
        assert_eq!(stmts.len(), 1, "expected exactly one statement");
        stmts.remove(0)
    }

    fn syntax_error(source: &str) -> String {
        let mut parser = Parser::new(source).unwrap();
        match parser.parse_program() {
            Err(CompileError::Syntax(e)) => e.to_string(),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_assignment() {
        let stmt = single("x := x + 1;");
        assert_eq!(stmt.kind, NodeKind::Assignment);
        assert_eq!(stmt.children[0].kind, NodeKind::Identifier);
        assert_eq!(stmt.children[0].value_str(), "x");
        assert_eq!(stmt.children[1].kind, NodeKind::BinaryExpression);
        assert_eq!(stmt.children[1].value_str(), "+");
    }

    #[test]
    fn test_if_with_nested_else() {
        let stmt = single(
            "if x > 0 then begin\n\
               y := 1;\n\
             else begin\n\
               y := 2;\n\
             end;\n\
             end;",
        );
        assert_eq!(stmt.kind, NodeKind::If);
        assert_eq!(stmt.children.len(), 3);
        assert_eq!(stmt.children[1].children.len(), 1);
        assert_eq!(stmt.children[2].kind, NodeKind::ElseBlock);
        assert_eq!(stmt.children[2].children[0].kind, NodeKind::StatementList);
    }

    #[test]
    fn test_if_with_trailing_else() {
        let stmt = single("if done then begin x := 1; end else begin x := 2; end;");
        assert_eq!(stmt.children.len(), 3);
        assert_eq!(stmt.children[2].kind, NodeKind::ElseBlock);
    }

    #[test]
    fn test_if_without_else() {
        let stmt = single("if a = b then begin end;");
        assert_eq!(stmt.children.len(), 2);
        assert!(stmt.children[1].children.is_empty());
    }

    #[test]
    fn test_while_loop() {
        let stmt = single("while i < 10 do begin i := i + 1; end;");
        assert_eq!(stmt.kind, NodeKind::While);
        assert_eq!(stmt.children[0].value_str(), "<");
        assert_eq!(stmt.children[1].children.len(), 1);
    }

    #[test]
    fn test_for_loop_accepts_to_and_double_dot() {
        for source in [
            "for i := 1 to 10 do begin x := i; end;",
            "for i := 1 .. 10 do begin x := i; end;",
        ] {
            let stmt = single(source);
            assert_eq!(stmt.kind, NodeKind::For);
            assert_eq!(stmt.value_str(), "i");
            assert_eq!(stmt.children[0].value_str(), "1");
            assert_eq!(stmt.children[1].value_str(), "10");
        }
    }

    #[test]
    fn test_repeat_until() {
        let stmt = single("repeat n := n - 1; until n = 0;");
        assert_eq!(stmt.kind, NodeKind::Repeat);
        assert_eq!(stmt.children[0].children.len(), 1);
        assert_eq!(stmt.children[1].value_str(), "=");
    }

    #[test]
    fn test_write_and_read() {
        let stmts = statements("writeln('x = ', x); write; readln(a, t[2]);");
        assert_eq!(stmts[0].kind, NodeKind::Write);
        assert_eq!(stmts[0].value_str(), "writeln");
        assert_eq!(stmts[0].children[0].children.len(), 2);
        assert_eq!(stmts[1].value_str(), "write");
        assert!(stmts[1].children[0].children.is_empty());
        assert_eq!(stmts[2].kind, NodeKind::Read);
        assert_eq!(stmts[2].children[0].children[1].kind, NodeKind::ArrayAccess);
    }

    #[test]
    fn test_read_rejects_expressions() {
        let message = syntax_error("read(1);");
        assert!(message.contains("expected variable to read into"));
    }

    #[test]
    fn test_procedure_call_statement() {
        let stmt = single("greet('world');");
        assert_eq!(stmt.kind, NodeKind::ExpressionStatement);
        let call = &stmt.children[0];
        assert_eq!(call.kind, NodeKind::FunctionCall);
        assert_eq!(call.value_str(), "greet");
        assert_eq!(call.children[0].children.len(), 1);
    }

    #[test]
    fn test_declared_procedure_called_without_parentheses() {
        let stmts = statements("procedure tick; begin end;\ntick;");
        assert_eq!(stmts[1].kind, NodeKind::ExpressionStatement);
        assert_eq!(stmts[1].children[0].kind, NodeKind::FunctionCall);
    }

    #[test]
    fn test_expression_statement_continues_after_identifier() {
        let stmt = single("a + b * c;");
        assert_eq!(stmt.kind, NodeKind::ExpressionStatement);
        let expr = &stmt.children[0];
        assert_eq!(expr.value_str(), "+");
        assert_eq!(expr.children[1].value_str(), "*");
    }

    #[test]
    fn test_array_element_assignment() {
        let stmt = single("v[0] := 5;");
        assert_eq!(stmt.children[0].kind, NodeKind::ArrayAccess);
        assert_eq!(stmt.children[0].value_str(), "v");
    }

    #[test]
    fn test_missing_then_reports_found_token() {
        let message = syntax_error("if x begin end;");
        assert_eq!(
            message,
            "Syntax error at line 1, column 6: expected 'then' after if condition, found 'begin'"
        );
    }

    #[test]
    fn test_unterminated_block_reports_eof() {
        let message = syntax_error("while x do begin y := 1;");
        assert!(message.ends_with("found end of file"));
    }
}
