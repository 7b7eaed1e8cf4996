use pas2cpp::translate;

/// Translate `r := <expr>;` and return the right-hand side as emitted.
fn rendered(expr: &str) -> String {
    let code = translate(&format!("r := {};", expr)).expect("Translation failed");
    let line = code
        .lines()
        .find(|line| line.trim_start().starts_with("r = "))
        .expect("Assignment not found in output");
    line.trim()
        .trim_start_matches("r = ")
        .trim_end_matches(';')
        .to_string()
}

#[test]
fn test_arithmetic_passes_through() {
    assert_eq!(rendered("a + b - c"), "a + b - c");
    assert_eq!(rendered("a * b / c"), "a * b / c");
    assert_eq!(rendered("2 + 3 * 4"), "2 + 3 * 4");
    assert_eq!(rendered("1.5 * x"), "1.5 * x");
}

#[test]
fn test_subtraction_chains_stay_left_to_right() {
    assert_eq!(rendered("10 - 4 - 3"), "10 - 4 - 3");
    assert_eq!(rendered("10 - (4 - 3)"), "10 - (4 - 3)");
    assert_eq!(rendered("64 div 4 div 2"), "64 / 4 / 2");
    assert_eq!(rendered("64 div (4 div 2)"), "64 / (4 / 2)");
}

#[test]
fn test_pascal_operators_are_remapped() {
    assert_eq!(rendered("a <> b"), "a != b");
    assert_eq!(rendered("a = b"), "a == b");
    assert_eq!(rendered("a mod b"), "a % b");
    assert_eq!(rendered("p and q"), "p && q");
    assert_eq!(rendered("p or q"), "p || q");
    assert_eq!(rendered("not p"), "!p");
}

#[test]
fn test_pascal_precedence_survives_in_cpp() {
    // `or` binds like `+` in Pascal but looser than `&&` in C++
    assert_eq!(rendered("(a < b) or (c < d) and e"), "a < b || c < d && e");
    // relational operands of a logical operator need no parentheses in C++
    assert_eq!(rendered("(x >= 0) and (x <= 9)"), "x >= 0 && x <= 9");
    // but a logical expression under an additive one does
    assert_eq!(rendered("(p or q) * 2"), "(p || q) * 2");
}

#[test]
fn test_unary_operators() {
    assert_eq!(rendered("-x"), "-x");
    assert_eq!(rendered("-(x + 1)"), "-(x + 1)");
    assert_eq!(rendered("- -x"), "-(-x)");
    assert_eq!(rendered("not (a = b)"), "!(a == b)");
}

#[test]
fn test_literals() {
    assert_eq!(rendered("'hello'"), "\"hello\"");
    assert_eq!(rendered("'h'"), "'h'");
    assert_eq!(rendered("''"), "\"\"");
    assert_eq!(rendered("TRUE"), "true");
    assert_eq!(rendered("3.25"), "3.25");
}

#[test]
fn test_calls_and_indexing() {
    assert_eq!(rendered("max(a, b) + 1"), "max(a, b) + 1");
    assert_eq!(rendered("f()"), "f()");
    assert_eq!(rendered("v[i + 1] * 2"), "v[i + 1] * 2");
}
