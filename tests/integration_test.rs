// Integration tests for the Pascal to C++ translator

use pas2cpp::codegen::generate;
use pas2cpp::parser::ast::{AstNode, NodeKind, SourceLocation};
use pas2cpp::parser::lexer::{format_token_dump, tokenize, Lexer, TokenKind};
use pas2cpp::{parse, translate, CompileError};

const DEMOS: [(&str, &str); 4] = [
    ("basics", include_str!("../demos/basics.pas")),
    ("functions", include_str!("../demos/functions.pas")),
    ("arrays", include_str!("../demos/arrays.pas")),
    ("loops", include_str!("../demos/loops.pas")),
];

fn kinds(source: &str) -> Vec<TokenKind> {
    tokenize(source)
        .expect("Tokenizing failed")
        .into_iter()
        .map(|t| t.kind)
        .collect()
}

/// Check bracket balance in generated C++, skipping string and char
/// literals and `//` comments.
fn assert_balanced(code: &str) {
    let mut stack = Vec::new();
    for (line_no, line) in code.lines().enumerate() {
        let mut chars = line.chars().peekable();
        while let Some(c) = chars.next() {
            match c {
                '/' if chars.peek() == Some(&'/') => break,
                '"' | '\'' => {
                    while let Some(inner) = chars.next() {
                        if inner == '\\' {
                            chars.next();
                        } else if inner == c {
                            break;
                        }
                    }
                }
                '(' | '[' | '{' => stack.push(c),
                ')' | ']' | '}' => {
                    let open = stack.pop();
                    let expected = match c {
                        ')' => '(',
                        ']' => '[',
                        _ => '{',
                    };
                    assert_eq!(
                        open,
                        Some(expected),
                        "Unbalanced '{}' on line {}:\n{}",
                        c,
                        line_no + 1,
                        code
                    );
                }
                _ => {}
            }
        }
    }
    assert!(stack.is_empty(), "Unclosed {:?} in:\n{}", stack, code);
}

#[test]
fn test_program_header_tokens() {
    assert_eq!(
        kinds("program test; end."),
        vec![
            TokenKind::Program,
            TokenKind::Identifier,
            TokenKind::Semicolon,
            TokenKind::End,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_var_declaration_tokens() {
    assert_eq!(
        kinds("var x: integer; end."),
        vec![
            TokenKind::Var,
            TokenKind::Identifier,
            TokenKind::Colon,
            TokenKind::IntegerType,
            TokenKind::Semicolon,
            TokenKind::End,
            TokenKind::Dot,
            TokenKind::Eof,
        ]
    );
}

#[test]
fn test_while_loop_tokens() {
    let tokens = tokenize("while i < 10 do i := i + 1; end.").expect("Tokenizing failed");
    let pairs: Vec<(TokenKind, &str)> = tokens
        .iter()
        .map(|t| (t.kind, t.lexeme.as_str()))
        .collect();
    assert_eq!(
        pairs,
        vec![
            (TokenKind::While, "while"),
            (TokenKind::Identifier, "i"),
            (TokenKind::Less, "<"),
            (TokenKind::IntegerLiteral, "10"),
            (TokenKind::Do, "do"),
            (TokenKind::Identifier, "i"),
            (TokenKind::Assign, ":="),
            (TokenKind::Identifier, "i"),
            (TokenKind::Plus, "+"),
            (TokenKind::IntegerLiteral, "1"),
            (TokenKind::Semicolon, ";"),
            (TokenKind::End, "end"),
            (TokenKind::Dot, "."),
            (TokenKind::Eof, ""),
        ]
    );
}

#[test]
fn test_tokenizing_is_deterministic() {
    for (name, source) in DEMOS {
        let first = tokenize(source).expect("Tokenizing failed");
        let second = tokenize(source).expect("Tokenizing failed");
        assert_eq!(first, second, "{} tokenized differently twice", name);
    }
}

#[test]
fn test_token_dump_format() {
    let tokens = tokenize("x := 10;").expect("Tokenizing failed");
    let dump = format_token_dump(&tokens);
    let first = dump.lines().next().expect("Dump is empty");
    assert!(first.starts_with("Type: identifier  Value: x"));
    assert_eq!(dump.lines().count(), 4);
}

#[test]
fn test_raw_token_stream_keeps_trivia() {
    let tokens = Lexer::new("x := 1; { note }\n")
        .with_trivia()
        .tokenize()
        .expect("Tokenizing failed");
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Comment));
    assert!(tokens.iter().any(|t| t.kind == TokenKind::Newline));
}

#[test]
fn test_increment_assignment() {
    let code = translate("x := x + 1;").expect("Translation failed");
    assert!(code.contains("x = x + 1;"));
    assert!(!code.contains(":="));
}

#[test]
fn test_for_loop_is_inclusive() {
    let code = translate("for i := 1 to 10 do begin writeln(i); end;").expect("Translation failed");
    assert!(code.contains("i <= 10"));
    assert!(code.contains("i++"));
}

#[test]
fn test_unterminated_string_points_at_opening_quote() {
    let source = "program p;\nbegin\n  s := 'never closed;\nend.\n";
    match translate(source) {
        Err(CompileError::Lexical(e)) => {
            assert_eq!(e.location, SourceLocation::new(3, 8));
        }
        other => panic!("Expected lexical error, got {:?}", other),
    }
}

#[test]
fn test_syntax_error_reports_expected_and_found() {
    let err = translate("program p;\nbegin\n  x := 1\nend.").unwrap_err();
    assert_eq!(err.class(), "syntax");
    assert_eq!(err.location(), Some(SourceLocation::new(4, 1)));
    assert_eq!(
        err.to_string(),
        "Syntax error at line 4, column 1: expected ';' after assignment, found 'end'"
    );
}

#[test]
fn test_deeply_nested_input_fails_cleanly() {
    let depth = 10_000;
    let source = format!("x := {}1{};", "(".repeat(depth), ")".repeat(depth));
    assert!(matches!(translate(&source), Err(CompileError::Syntax(_))));

    let source = format!(
        "{}x := 1;{}",
        "if b then begin ".repeat(depth),
        " end;".repeat(depth)
    );
    assert!(matches!(translate(&source), Err(CompileError::Syntax(_))));
}

#[test]
fn test_internal_errors_are_distinguished() {
    let bogus = AstNode {
        kind: NodeKind::Program,
        children: vec![],
        value: None,
        location: SourceLocation::default(),
    };
    let err = CompileError::from(generate(&bogus).unwrap_err());
    assert!(err.is_internal());
    assert_eq!(err.class(), "internal");
    assert_eq!(err.location(), None);
}

#[test]
fn test_parameters_are_scoped_per_routine() {
    let source = "function f(x: integer): integer; begin f := x; end;\n\
                  function g(x: string): string; begin g := x; end;";
    let program = parse(source).expect("Parsing failed");
    assert!(program.symbols.resolve("x").is_none());

    let code = translate(source).expect("Translation failed");
    assert!(code.contains("int f(int x) {"));
    assert!(code.contains("std::string g(std::string x) {"));
}

#[test]
fn test_demos_translate_with_balanced_punctuation() {
    for (name, source) in DEMOS {
        let code = translate(source).unwrap_or_else(|e| panic!("{} failed: {}", name, e));
        assert!(code.contains("int main() {"), "{} has no main", name);
        assert!(code.ends_with("    return 0;\n}\n"), "{} has no trailer", name);
        assert_balanced(&code);
    }
}

#[test]
fn test_inline_programs_have_balanced_punctuation() {
    let programs = [
        "x := (a + (b * (c - d)));",
        "if not (a < b) then begin if a = b then begin end; end;",
        "var t: array[0..9] of char; t[0] := '{'; t[1] := ')';",
        "writeln('[unbalanced( in a string');",
    ];
    for source in programs {
        assert_balanced(&translate(source).expect("Translation failed"));
    }
}

#[test]
fn test_basics_demo() {
    let code = translate(DEMOS[0].1).expect("Translation failed");
    assert!(code.starts_with("// program basics\n#include <iostream>\n#include <string>\n"));
    assert!(code.contains("std::string name;\n"));
    assert!(code.contains("double average;\n"));
    assert!(code.contains("    for (count = 1; count <= 10; count++) {\n"));
    assert!(code.contains("ok = total > 100 && !(average < 5.0);"));
    assert!(code.contains("    } else {\n"));
}

#[test]
fn test_functions_demo() {
    let code = translate(DEMOS[1].1).expect("Translation failed");
    assert!(code.contains("int power(int base, int exponent) {\n"));
    assert!(code.contains("    power_result = result;\n"));
    assert!(code.contains("void swap(int& a, int& b) {\n"));
    assert!(code.contains("    swap(x, y);\n"));
    assert!(code.contains("    std::cout << x << ' ' << y << std::endl;\n"));
}

#[test]
fn test_arrays_demo() {
    let code = translate(DEMOS[2].1).expect("Translation failed");
    assert!(code.contains("int scores[5];\n"));
    assert!(code.contains("int offsets[5];\n"));
    assert!(code.contains("scores[k - 1] = k * k % 7;"));
    assert!(code.contains("best = scores[0];"));
    assert!(code.contains("offsets[i + 2] = i * 10;"));
    assert!(code.contains("for (i = -2; i <= 2; i++) {"));
    assert!(code.contains("    fill();\n"));
}

#[test]
fn test_loops_demo() {
    let code = translate(DEMOS[3].1).expect("Translation failed");
    assert!(code.contains("    auto advance = [&]() {\n"));
    assert!(code.contains("if (start % 2 == 0) {"));
    assert!(code.contains("start = start / 2;"));
    assert!(code.contains("while (start != 1) {"));
    assert!(code.contains("    collatz_result = count;\n"));
    assert!(code.contains("    std::cin >> n;\n"));
    assert!(code.contains("    } while (!(n < 1));\n"));
}
