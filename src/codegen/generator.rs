//! Code generation: render the parsed AST as C++ source text.
//!
//! Program-level `var`, `function` and `procedure` declarations become file
//! scope definitions; every other top-level statement goes into `main`.
//! Routines declared inside other routines become `[&]` lambdas so they can
//! still see the enclosing locals.

use crate::parser::ast::*;

const INDENT: &str = "    ";

/// Enclosing functions, outermost first. On the left of `:=` each of
/// their names stands for that function's result variable.
#[derive(Debug, Clone, Copy, Default)]
struct Scope<'a> {
    functions: &'a [&'a str],
}

impl Scope<'_> {
    fn returns_through(&self, name: &str) -> bool {
        self.functions.iter().any(|function| *function == name)
    }
}

/// Emit C++ for a `Program` root.
pub fn generate(root: &AstNode) -> Result<String, InternalError> {
    if root.kind != NodeKind::Program {
        return Err(root.misplaced("program root"));
    }
    let [list] = root.children.as_slice() else {
        return Err(root.arity_error());
    };
    if list.kind != NodeKind::StatementList {
        return Err(list.misplaced("program body"));
    }

    let mut out = String::new();
    if let Some(name) = &root.value {
        out.push_str(&format!("// program {}\n", name));
    }
    out.push_str("#include <iostream>\n");
    out.push_str("#include <string>\n\n");

    let scope = Scope::default();
    let (declarations, body): (Vec<&AstNode>, Vec<&AstNode>) = list
        .children
        .iter()
        .partition(|node| is_file_scope(node.kind));

    for decl in declarations {
        if decl.kind != NodeKind::VarDecl || out.ends_with("}\n") {
            blank_line(&mut out);
        }
        emit_statement(decl, 0, scope, &mut out)?;
    }

    blank_line(&mut out);
    out.push_str("int main() {\n");
    for stmt in body {
        emit_statement(stmt, 1, scope, &mut out)?;
    }
    line(&mut out, 1, "return 0;");
    out.push_str("}\n");

    Ok(out)
}

fn is_file_scope(kind: NodeKind) -> bool {
    matches!(
        kind,
        NodeKind::VarDecl | NodeKind::FunctionDecl | NodeKind::ProcedureDecl
    )
}

fn emit_statement(
    node: &AstNode,
    depth: usize,
    scope: Scope<'_>,
    out: &mut String,
) -> Result<(), InternalError> {
    match node.kind {
        NodeKind::Assignment => {
            let [target, value] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            let text = format!(
                "{} = {};",
                assignment_target(target, scope)?,
                expression(value)?
            );
            line(out, depth, &text);
        }
        NodeKind::VarDecl => {
            let [ident, ty] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            line(out, depth, &format!("{};", declaration(ty, name_of(ident)?)?));
        }
        NodeKind::FunctionDecl => emit_function(node, depth, scope, out)?,
        NodeKind::ProcedureDecl => emit_procedure(node, depth, scope, out)?,
        NodeKind::If => {
            let (condition, then_branch, else_block) = match node.children.as_slice() {
                [condition, then_branch] => (condition, then_branch, None),
                [condition, then_branch, else_block] => (condition, then_branch, Some(else_block)),
                _ => return Err(node.arity_error()),
            };
            line(out, depth, &format!("if ({}) {{", expression(condition)?));
            emit_block(then_branch, depth + 1, scope, out)?;
            if let Some(else_block) = else_block {
                if else_block.kind != NodeKind::ElseBlock {
                    return Err(else_block.misplaced("else branch"));
                }
                let [body] = else_block.children.as_slice() else {
                    return Err(else_block.arity_error());
                };
                line(out, depth, "} else {");
                emit_block(body, depth + 1, scope, out)?;
            }
            line(out, depth, "}");
        }
        NodeKind::While => {
            let [condition, body] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            line(out, depth, &format!("while ({}) {{", expression(condition)?));
            emit_block(body, depth + 1, scope, out)?;
            line(out, depth, "}");
        }
        NodeKind::For => {
            let [start, end, body] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            let var = node.value_str();
            line(
                out,
                depth,
                &format!(
                    "for ({var} = {}; {var} <= {}; {var}++) {{",
                    expression(start)?,
                    expression(end)?
                ),
            );
            emit_block(body, depth + 1, scope, out)?;
            line(out, depth, "}");
        }
        NodeKind::Repeat => {
            let [body, condition] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            line(out, depth, "do {");
            emit_block(body, depth + 1, scope, out)?;
            line(out, depth, &format!("}} while (!({}));", expression(condition)?));
        }
        NodeKind::Write => {
            let [args] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            let args = arguments(args)?;
            let mut text = String::from("std::cout");
            for arg in &args {
                text.push_str(" << ");
                text.push_str(arg);
            }
            if node.value_str() == "writeln" {
                text.push_str(" << std::endl");
            } else if args.is_empty() {
                text.push_str(" << std::flush");
            }
            text.push(';');
            line(out, depth, &text);
        }
        NodeKind::Read => {
            let [args] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            if args.kind != NodeKind::ArgumentList {
                return Err(args.misplaced("read targets"));
            }
            if args.children.is_empty() {
                line(out, depth, "std::cin.get();");
            } else {
                let mut text = String::from("std::cin");
                for target in &args.children {
                    text.push_str(" >> ");
                    text.push_str(&assignment_target(target, scope)?);
                }
                text.push(';');
                line(out, depth, &text);
            }
        }
        NodeKind::ExpressionStatement => {
            let [expr] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            line(out, depth, &format!("{};", expression(expr)?));
        }
        NodeKind::Program
        | NodeKind::StatementList
        | NodeKind::FunctionCall
        | NodeKind::ParamList
        | NodeKind::Parameter
        | NodeKind::ArgumentList
        | NodeKind::ElseBlock
        | NodeKind::BinaryExpression
        | NodeKind::UnaryExpression
        | NodeKind::ArrayAccess
        | NodeKind::Identifier
        | NodeKind::Literal(_)
        | NodeKind::Type(_)
        | NodeKind::ArrayBounds => return Err(node.misplaced("statement position")),
    }
    Ok(())
}

fn emit_block(
    list: &AstNode,
    depth: usize,
    scope: Scope<'_>,
    out: &mut String,
) -> Result<(), InternalError> {
    if list.kind != NodeKind::StatementList {
        return Err(list.misplaced("block body"));
    }
    for stmt in &list.children {
        emit_statement(stmt, depth, scope, out)?;
    }
    Ok(())
}

fn emit_function(
    node: &AstNode,
    depth: usize,
    scope: Scope<'_>,
    out: &mut String,
) -> Result<(), InternalError> {
    let [params, result, body] = node.children.as_slice() else {
        return Err(node.arity_error());
    };
    let name = node.value_str();
    let result_type = simple_type(result)?;
    let params = parameters(params)?;

    if depth == 0 {
        line(out, depth, &format!("{} {}({}) {{", result_type, name, params));
    } else {
        line(
            out,
            depth,
            &format!("auto {} = [&]({}) -> {} {{", name, params, result_type),
        );
    }
    line(out, depth + 1, &format!("{} {}_result;", result_type, name));
    let mut functions = scope.functions.to_vec();
    functions.push(name);
    emit_block(body, depth + 1, Scope { functions: &functions }, out)?;
    line(out, depth + 1, &format!("return {}_result;", name));
    line(out, depth, closing(depth));
    Ok(())
}

fn emit_procedure(
    node: &AstNode,
    depth: usize,
    scope: Scope<'_>,
    out: &mut String,
) -> Result<(), InternalError> {
    let [params, body] = node.children.as_slice() else {
        return Err(node.arity_error());
    };
    let name = node.value_str();
    let params = parameters(params)?;

    if depth == 0 {
        line(out, depth, &format!("void {}({}) {{", name, params));
    } else {
        line(out, depth, &format!("auto {} = [&]({}) {{", name, params));
    }
    // Outer function results stay assignable from nested procedures.
    emit_block(body, depth + 1, scope, out)?;
    line(out, depth, closing(depth));
    Ok(())
}

fn closing(depth: usize) -> &'static str {
    if depth == 0 {
        "}"
    } else {
        "};"
    }
}

fn parameters(list: &AstNode) -> Result<String, InternalError> {
    if list.kind != NodeKind::ParamList {
        return Err(list.misplaced("parameter list"));
    }
    let mut rendered = Vec::with_capacity(list.children.len());
    for param in &list.children {
        if param.kind != NodeKind::Parameter {
            return Err(param.misplaced("parameter list"));
        }
        let [ident, ty] = param.children.as_slice() else {
            return Err(param.arity_error());
        };
        let name = name_of(ident)?;
        let by_reference = param.value.as_deref() == Some("var");
        if by_reference && ty.kind != NodeKind::Type(TypeName::Array) {
            rendered.push(format!("{}& {}", simple_type(ty)?, name));
        } else {
            rendered.push(declaration(ty, name)?);
        }
    }
    Ok(rendered.join(", "))
}

fn name_of(ident: &AstNode) -> Result<&str, InternalError> {
    if ident.kind != NodeKind::Identifier {
        return Err(ident.misplaced("declared name"));
    }
    Ok(ident.value_str())
}

/// `T name` or `T name[size]`
fn declaration(ty: &AstNode, name: &str) -> Result<String, InternalError> {
    if ty.kind != NodeKind::Type(TypeName::Array) {
        return Ok(format!("{} {}", simple_type(ty)?, name));
    }

    let [bounds, element] = ty.children.as_slice() else {
        return Err(ty.arity_error());
    };
    if bounds.kind != NodeKind::ArrayBounds {
        return Err(bounds.misplaced("array type"));
    }
    let [low, high] = bounds.children.as_slice() else {
        return Err(bounds.arity_error());
    };
    let size = bound(high)?
        .checked_sub(bound(low)?)
        .and_then(|span| span.checked_add(1))
        .ok_or_else(|| bounds.misplaced("array bounds"))?;

    Ok(format!("{} {}[{}]", simple_type(element)?, name, size))
}

fn bound(node: &AstNode) -> Result<i64, InternalError> {
    node.value_str()
        .parse()
        .map_err(|_| node.misplaced("array bound"))
}

fn simple_type(node: &AstNode) -> Result<&'static str, InternalError> {
    match node.kind {
        NodeKind::Type(TypeName::Integer) => Ok("int"),
        NodeKind::Type(TypeName::Real) => Ok("double"),
        NodeKind::Type(TypeName::String) => Ok("std::string"),
        NodeKind::Type(TypeName::Boolean) => Ok("bool"),
        NodeKind::Type(TypeName::Char) => Ok("char"),
        _ => Err(node.misplaced("simple type position")),
    }
}

fn assignment_target(target: &AstNode, scope: Scope<'_>) -> Result<String, InternalError> {
    match target.kind {
        NodeKind::Identifier => {
            let name = target.value_str();
            if scope.returns_through(name) {
                Ok(format!("{}_result", name))
            } else {
                Ok(name.to_string())
            }
        }
        NodeKind::ArrayAccess => expression(target),
        _ => Err(target.misplaced("assignment target")),
    }
}

fn expression(node: &AstNode) -> Result<String, InternalError> {
    match node.kind {
        NodeKind::Identifier => Ok(node.value_str().to_string()),
        NodeKind::Literal(kind) => Ok(literal(kind, node.value_str())),
        NodeKind::BinaryExpression => {
            let [left, right] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            let op = cpp_operator(node.value_str());
            let level = precedence(op);
            Ok(format!(
                "{} {} {}",
                operand(left, level, false)?,
                op,
                operand(right, level, true)?
            ))
        }
        NodeKind::UnaryExpression => {
            let [inner] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            let op = cpp_operator(node.value_str());
            let text = expression(inner)?;
            if matches!(
                inner.kind,
                NodeKind::BinaryExpression | NodeKind::UnaryExpression
            ) {
                Ok(format!("{}({})", op, text))
            } else {
                Ok(format!("{}{}", op, text))
            }
        }
        NodeKind::FunctionCall => {
            let [args] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            Ok(format!("{}({})", node.value_str(), arguments(args)?.join(", ")))
        }
        NodeKind::ArrayAccess => {
            let [index] = node.children.as_slice() else {
                return Err(node.arity_error());
            };
            Ok(format!("{}[{}]", node.value_str(), expression(index)?))
        }
        NodeKind::Program
        | NodeKind::StatementList
        | NodeKind::Assignment
        | NodeKind::VarDecl
        | NodeKind::FunctionDecl
        | NodeKind::ProcedureDecl
        | NodeKind::ParamList
        | NodeKind::Parameter
        | NodeKind::ArgumentList
        | NodeKind::If
        | NodeKind::ElseBlock
        | NodeKind::While
        | NodeKind::For
        | NodeKind::Repeat
        | NodeKind::Write
        | NodeKind::Read
        | NodeKind::ExpressionStatement
        | NodeKind::Type(_)
        | NodeKind::ArrayBounds => Err(node.misplaced("expression position")),
    }
}

/// Render a binary operand, parenthesized when C++ would otherwise
/// regroup it.
fn operand(node: &AstNode, parent: u8, right: bool) -> Result<String, InternalError> {
    let text = expression(node)?;
    if node.kind == NodeKind::BinaryExpression {
        let level = precedence(cpp_operator(node.value_str()));
        if level < parent || (right && level == parent) {
            return Ok(format!("({})", text));
        }
    }
    Ok(text)
}

fn arguments(list: &AstNode) -> Result<Vec<String>, InternalError> {
    if list.kind != NodeKind::ArgumentList {
        return Err(list.misplaced("argument list"));
    }
    list.children.iter().map(expression).collect()
}

fn cpp_operator(op: &str) -> &str {
    match op {
        "=" => "==",
        "<>" => "!=",
        "and" => "&&",
        "or" => "||",
        "not" => "!",
        "div" => "/",
        "mod" => "%",
        other => other,
    }
}

/// Binding strength in C++, higher binds tighter.
fn precedence(op: &str) -> u8 {
    match op {
        "*" | "/" | "%" => 5,
        "+" | "-" => 4,
        "<" | "<=" | ">" | ">=" => 3,
        "==" | "!=" => 2,
        "&&" => 1,
        _ => 0,
    }
}

fn literal(kind: LiteralKind, text: &str) -> String {
    match kind {
        LiteralKind::Integer | LiteralKind::Real | LiteralKind::Boolean => text.to_string(),
        LiteralKind::Char => {
            let body: String = text.chars().map(|ch| escape(ch, '\'')).collect();
            format!("'{}'", body)
        }
        LiteralKind::String => {
            let body: String = text.chars().map(|ch| escape(ch, '"')).collect();
            format!("\"{}\"", body)
        }
    }
}

fn escape(ch: char, quote: char) -> String {
    match ch {
        '\\' => "\\\\".to_string(),
        '\n' => "\\n".to_string(),
        '\t' => "\\t".to_string(),
        ch if ch == quote => format!("\\{}", ch),
        ch => ch.to_string(),
    }
}

fn blank_line(out: &mut String) {
    if !out.ends_with("\n\n") {
        out.push('\n');
    }
}

fn line(out: &mut String, depth: usize, text: &str) {
    for _ in 0..depth {
        out.push_str(INDENT);
    }
    out.push_str(text);
    out.push('\n');
}
