//! Declaration parsing implementation
//!
//! This module handles the declaring statements of the language:
//!
//! - Variable declarations: `var x: integer;`
//! - Function declarations: `function f(a: integer): real; begin ... end;`
//! - Procedure declarations: `procedure p(var s: string); begin ... end;`
//! - Type parsing: simple types and `array[lo..hi] of T`
//!
//! # Grammar
//!
//! ```text
//! var_decl    ::= "var" identifier ":" type ";"
//! func_decl   ::= "function" identifier params ":" simple_type ";" body
//! proc_decl   ::= "procedure" identifier params ";" body
//! params      ::= [ "(" [ group { (";" | ",") group } ] ")" ]
//! group       ::= [ "var" ] identifier { "," identifier } ":" type
//! body        ::= { var_decl | func_decl | proc_decl } "begin" statement* "end" ";"
//! type        ::= "array" "[" bound ".." bound "]" "of" simple_type | simple_type
//! bound       ::= [ "-" ] integer
//! ```
//!
//! Declarations are entered into the symbol table as soon as they are parsed.
//! A routine's own name goes into the enclosing scope before its body is
//! parsed (so recursive calls resolve); parameters and locals live in a scope
//! that is popped when the body ends.

use crate::parser::ast::*;
use crate::parser::lexer::TokenKind;
use crate::parser::parse::{ParseResult, Parser};
use crate::parser::symbols::{Symbol, SymbolKind, TypeDesc};

impl Parser<'_> {
    /// Parse `var name : type ;`
    pub(crate) fn parse_var_declaration(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::Var, "to start declaration")?.location;
        let name = self.expect_identifier("after 'var'")?;
        self.expect(TokenKind::Colon, "after variable name")?;
        let (type_node, ty) = self.parse_type()?;

        self.symbols.declare(Symbol::new(
            name.lexeme.clone(),
            SymbolKind::Variable,
            Some(ty),
            name.location,
        ));

        self.expect_semicolon("after variable declaration")?;

        let ident = AstNode::leaf(NodeKind::Identifier, name.lexeme, name.location);
        Ok(AstNode::new(NodeKind::VarDecl, vec![ident, type_node], None, loc)?)
    }

    /// Parse function declaration
    pub(crate) fn parse_function_declaration(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::Function, "to start declaration")?.location;
        let name = self.expect_identifier("after 'function'")?;
        let (param_list, params) = self.parse_parameters()?;
        self.expect(TokenKind::Colon, "before function result type")?;
        let (result_node, result_ty) = self.parse_simple_type()?;
        self.expect_semicolon("after function header")?;

        self.symbols.declare(Symbol::new(
            name.lexeme.clone(),
            SymbolKind::Function,
            Some(result_ty),
            name.location,
        ));

        let body = self.parse_routine_body(params)?;

        Ok(AstNode::new(
            NodeKind::FunctionDecl,
            vec![param_list, result_node, body],
            Some(name.lexeme),
            loc,
        )?)
    }

    /// Parse procedure declaration
    pub(crate) fn parse_procedure_declaration(&mut self) -> ParseResult<AstNode> {
        let loc = self.expect(TokenKind::Procedure, "to start declaration")?.location;
        let name = self.expect_identifier("after 'procedure'")?;
        let (param_list, params) = self.parse_parameters()?;
        self.expect_semicolon("after procedure header")?;

        self.symbols.declare(Symbol::new(
            name.lexeme.clone(),
            SymbolKind::Procedure,
            None,
            name.location,
        ));

        let body = self.parse_routine_body(params)?;

        Ok(AstNode::new(
            NodeKind::ProcedureDecl,
            vec![param_list, body],
            Some(name.lexeme),
            loc,
        )?)
    }

    /// Local declarations and `begin ... end ;` inside a fresh scope.
    /// Locals become the first statements of the returned list.
    fn parse_routine_body(&mut self, params: Vec<Symbol>) -> ParseResult<AstNode> {
        self.nested(|parser| {
            parser.symbols.push_scope();
            for param in params {
                parser.symbols.declare(param);
            }

            let loc = parser.current_location();
            let mut statements = Vec::new();
            loop {
                let declaration = match parser.current.kind {
                    TokenKind::Var => parser.parse_var_declaration()?,
                    TokenKind::Function => parser.parse_function_declaration()?,
                    TokenKind::Procedure => parser.parse_procedure_declaration()?,
                    _ => break,
                };
                statements.push(declaration);
            }

            parser.expect(TokenKind::Begin, "to open routine body")?;
            statements.extend(parser.parse_statements()?);
            parser.expect(TokenKind::End, "to close routine body")?;
            parser.expect_semicolon("after routine body")?;

            parser.symbols.pop_scope();

            Ok(AstNode::new(NodeKind::StatementList, statements, None, loc)?)
        })
    }

    /// Parse the optional parenthesized parameter list
    fn parse_parameters(&mut self) -> ParseResult<(AstNode, Vec<Symbol>)> {
        let loc = self.current_location();
        let mut nodes = Vec::new();
        let mut symbols = Vec::new();

        if self.match_kind(TokenKind::LParen)? {
            if !self.check(TokenKind::RParen) {
                loop {
                    self.parse_parameter_group(&mut nodes, &mut symbols)?;
                    if !(self.match_kind(TokenKind::Semicolon)? || self.match_kind(TokenKind::Comma)?) {
                        break;
                    }
                }
            }
            self.expect(TokenKind::RParen, "after parameters")?;
        }

        let list = AstNode::new(NodeKind::ParamList, nodes, None, loc)?;
        Ok((list, symbols))
    }

    /// `[var] a, b : type`: one Parameter node per name
    fn parse_parameter_group(
        &mut self,
        nodes: &mut Vec<AstNode>,
        symbols: &mut Vec<Symbol>,
    ) -> ParseResult<()> {
        let by_reference = self.match_kind(TokenKind::Var)?;

        let mut names = vec![self.expect_identifier("in parameter list")?];
        while self.match_kind(TokenKind::Comma)? {
            names.push(self.expect_identifier("after ',' in parameter list")?);
        }

        self.expect(TokenKind::Colon, "after parameter name")?;
        let (type_node, ty) = self.parse_type()?;

        for name in names {
            let ident = AstNode::leaf(NodeKind::Identifier, name.lexeme.clone(), name.location);
            nodes.push(AstNode::new(
                NodeKind::Parameter,
                vec![ident, type_node.clone()],
                by_reference.then(|| "var".to_string()),
                name.location,
            )?);
            symbols.push(Symbol::new(
                name.lexeme,
                SymbolKind::Parameter,
                Some(ty.clone()),
                name.location,
            ));
        }

        Ok(())
    }

    /// Parse type: simple type or single-dimension array
    pub(crate) fn parse_type(&mut self) -> ParseResult<(AstNode, TypeDesc)> {
        if !self.check(TokenKind::Array) {
            return self.parse_simple_type();
        }

        let loc = self.expect(TokenKind::Array, "to start array type")?.location;
        self.expect(TokenKind::LBracket, "after 'array'")?;
        let (low_node, low) = self.parse_bound(None)?;
        self.expect(TokenKind::DoubleDot, "between array bounds")?;
        let (high_node, high) = self.parse_bound(Some(low))?;
        self.expect(TokenKind::RBracket, "after array bounds")?;
        self.expect(TokenKind::Of, "after array bounds")?;
        let (element_node, element) = self.parse_simple_type()?;

        let bounds = AstNode::new(NodeKind::ArrayBounds, vec![low_node, high_node], None, loc)?;
        let node = AstNode::new(
            NodeKind::Type(TypeName::Array),
            vec![bounds, element_node],
            None,
            loc,
        )?;

        Ok((
            node,
            TypeDesc::Array {
                low,
                high,
                element: Box::new(element),
            },
        ))
    }

    /// integer | boolean | real | string | char
    pub(crate) fn parse_simple_type(&mut self) -> ParseResult<(AstNode, TypeDesc)> {
        let (name, ty) = match self.current.kind {
            TokenKind::IntegerType => (TypeName::Integer, TypeDesc::Integer),
            TokenKind::RealType => (TypeName::Real, TypeDesc::Real),
            TokenKind::StringType => (TypeName::String, TypeDesc::String),
            TokenKind::BooleanType => (TypeName::Boolean, TypeDesc::Boolean),
            TokenKind::CharType => (TypeName::Char, TypeDesc::Char),
            _ => return Err(self.error("type name")),
        };

        let token = self.advance()?;
        let node = AstNode::leaf(
            NodeKind::Type(name),
            token.lexeme.to_ascii_lowercase(),
            token.location,
        );
        Ok((node, ty))
    }

    /// Signed integer array bound, at least `min` when given
    fn parse_bound(&mut self, min: Option<i64>) -> ParseResult<(AstNode, i64)> {
        let loc = self.current_location();
        let negative = self.match_kind(TokenKind::Minus)?;

        if !self.check(TokenKind::IntegerLiteral) {
            return Err(self.error("integer literal as array bound"));
        }
        let magnitude: i64 = self
            .current
            .lexeme
            .parse()
            .map_err(|_| self.error("array bound that fits in 64 bits"))?;
        let value = if negative { -magnitude } else { magnitude };

        if let Some(min) = min {
            if value < min {
                return Err(self.error(format!("upper bound of at least {}", min)));
            }
        }
        self.advance()?;

        let node = AstNode::leaf(
            NodeKind::Literal(LiteralKind::Integer),
            value.to_string(),
            loc,
        );
        Ok((node, value))
    }
}

#[cfg(test)]
mod tests {
    use crate::error::CompileError;
    use crate::parser::ast::*;
    use crate::parser::parse::Parser;
    use crate::parser::symbols::{SymbolKind, TypeDesc};

    fn parse(source: &str) -> Program {
        let mut parser = Parser::new(source).unwrap();
        parser.parse_program().unwrap()
    }

    #[test]
    fn test_var_declaration() {
        let program = parse("var x: integer;");
        let decl = &program.statements()[0];
        assert_eq!(decl.kind, NodeKind::VarDecl);
        assert_eq!(decl.children[0].value_str(), "x");
        assert_eq!(decl.children[1].kind, NodeKind::Type(TypeName::Integer));

        let symbol = program.symbols.resolve("x").unwrap();
        assert_eq!(symbol.kind, SymbolKind::Variable);
        assert_eq!(symbol.ty, Some(TypeDesc::Integer));
    }

    #[test]
    fn test_array_declaration() {
        let program = parse("var a: array[1..10] of real;");
        let ty = &program.statements()[0].children[1];
        assert_eq!(ty.kind, NodeKind::Type(TypeName::Array));
        let bounds = &ty.children[0];
        assert_eq!(bounds.children[0].value_str(), "1");
        assert_eq!(bounds.children[1].value_str(), "10");
        assert_eq!(ty.children[1].kind, NodeKind::Type(TypeName::Real));

        assert_eq!(
            program.symbols.resolve("a").unwrap().ty,
            Some(TypeDesc::Array {
                low: 1,
                high: 10,
                element: Box::new(TypeDesc::Real),
            })
        );
    }

    #[test]
    fn test_negative_bounds() {
        let program = parse("var t: array[-5..5] of integer;");
        let bounds = &program.statements()[0].children[1].children[0];
        assert_eq!(bounds.children[0].value_str(), "-5");
    }

    #[test]
    fn test_inverted_bounds_rejected() {
        let mut parser = Parser::new("var a: array[10..1] of integer;").unwrap();
        match parser.parse_program().unwrap_err() {
            CompileError::Syntax(e) => assert!(e.expected.contains("at least 10")),
            other => panic!("Expected syntax error, got {:?}", other),
        }
    }

    #[test]
    fn test_function_declaration_shape() {
        let program = parse(
            "function add(a, b: integer; c: real): real;\n\
             begin\n\
               add := a + b + c;\n\
             end;",
        );
        let func = &program.statements()[0];
        assert_eq!(func.kind, NodeKind::FunctionDecl);
        assert_eq!(func.value_str(), "add");
        let [params, result, body] = func.children.as_slice() else {
            panic!("Expected three children");
        };
        assert_eq!(params.children.len(), 3);
        assert_eq!(params.children[1].children[0].value_str(), "b");
        assert_eq!(params.children[2].children[1].kind, NodeKind::Type(TypeName::Real));
        assert_eq!(result.kind, NodeKind::Type(TypeName::Real));
        assert_eq!(body.children.len(), 1);
    }

    #[test]
    fn test_parameters_do_not_leak_between_routines() {
        let program = parse(
            "function f(n: integer): integer; begin f := n; end;\n\
             procedure g(n: string); begin writeln(n); end;",
        );
        // Parameters lived in popped scopes; only the routines are global.
        assert!(program.symbols.resolve("n").is_none());
        assert_eq!(program.symbols.resolve("f").unwrap().kind, SymbolKind::Function);
        assert_eq!(program.symbols.resolve("g").unwrap().kind, SymbolKind::Procedure);
        assert_eq!(program.symbols.resolve("g").unwrap().ty, None);
    }

    #[test]
    fn test_local_vars_and_by_reference_params() {
        let program = parse(
            "procedure swap(var x, y: integer);\n\
             var t: integer;\n\
             begin\n\
               t := x; x := y; y := t;\n\
             end;",
        );
        let proc_decl = &program.statements()[0];
        assert_eq!(proc_decl.kind, NodeKind::ProcedureDecl);
        let params = &proc_decl.children[0];
        assert_eq!(params.children[0].value.as_deref(), Some("var"));
        let body = &proc_decl.children[1];
        assert_eq!(body.children[0].kind, NodeKind::VarDecl);
        assert_eq!(body.children.len(), 4);
    }

    #[test]
    fn test_function_without_parentheses() {
        let program = parse("function answer: integer; begin answer := 42; end;");
        let params = &program.statements()[0].children[0];
        assert_eq!(params.kind, NodeKind::ParamList);
        assert!(params.children.is_empty());
    }

    #[test]
    fn test_missing_type_reports_found_token() {
        let mut parser = Parser::new("var x: ;").unwrap();
        let err = parser.parse_program().unwrap_err();
        assert_eq!(
            err.to_string(),
            "Syntax error at line 1, column 8: expected type name, found ';'"
        );
    }
}
