// Integration tests for the Sen front end

use sen::ast::{Expr, Stmt};
use sen::token::Kind;
use sen::types::Type;
use sen::{parse_source, ErrorKind, Lexer};
use std::path::Path;

const PROGRAM: &str = r#"
hàm giai_thừa(n: số nguyên): số nguyên {
    nếu (n <= 1) {
        trả 1;
    } không thì {
        trả;
    }
}

hàm chính() {
    biến đếm: số nguyên = 0;
    biến tên = "Sen";
    biến xong: luận lý;
    trong khi (đếm < 10) {
        đếm = đếm + 1;
    }
    cho (biến i = 0; i < 3; i = i + 1) in(tên, giai_thừa(i));
}
"#;

#[test]
fn test_full_program() {
    let program = parse_source(PROGRAM).expect("Parsing failed");
    assert_eq!(program.body.len(), 2);

    let symbols = &program.symbols;
    assert_eq!(symbols.functions().count(), 2);

    let factorial = symbols.get_function("giai_thừa").unwrap();
    assert_eq!(factorial.return_type, Type::Integer);
    assert!(factorial.variables.contains_key("n"));

    let main = symbols.get_function("chính").unwrap();
    let names: Vec<&str> = main.variables.keys().map(String::as_str).collect();
    assert_eq!(names, vec!["i", "tên", "xong", "đếm"]);
    assert!(!main.variables["xong"].initialized);
    assert_eq!(main.variables["tên"].ty, Type::String);
}

#[test]
fn test_parsing_is_repeatable() {
    let first = parse_source(PROGRAM).unwrap();
    let second = parse_source(PROGRAM).unwrap();
    assert_eq!(first, second);
    assert_eq!(
        first.symbols.to_json().unwrap(),
        second.symbols.to_json().unwrap()
    );
}

#[test]
fn test_statements_valid_but_no_entry_point() {
    let source = "hàm phụ() { biến x = 1; x = x + 1; }";
    let err = parse_source(source).unwrap_err();
    assert_eq!(err.kind, ErrorKind::Semantic);
    assert!(err.message.contains("chính"));
}

#[test]
fn test_duplicate_function_reported_before_entry_point_check() {
    let err = parse_source("hàm f() {}\nhàm f() {}").unwrap_err();
    assert_eq!(err.message, "Function 'f' is already defined.");
    assert_eq!(err.line, 2);
}

#[test]
fn test_precedence_tree_shape() {
    let program = parse_source("hàm chính() { 1 + 2 * 3; }").unwrap();
    let Stmt::Function { body, .. } = &program.body[0] else {
        panic!("expected function");
    };
    let Stmt::Expression(Expr::Binary { lhs, operator, rhs }) = &body[0] else {
        panic!("expected binary expression statement");
    };
    assert_eq!(operator, "+");
    assert!(matches!(lhs.as_ref(), Expr::Literal { value, .. } if value == "1"));
    assert!(matches!(rhs.as_ref(), Expr::Binary { operator, .. } if operator == "*"));
}

#[test]
fn test_compound_keyword_does_not_lose_input() {
    let tokens = Lexer::new("không x; không thì").tokenize();
    let kinds: Vec<Kind> = tokens.iter().map(|t| t.kind).collect();
    assert_eq!(
        kinds,
        vec![Kind::Identifier, Kind::Identifier, Kind::Semicolon, Kind::Else, Kind::EOF]
    );
    assert_eq!(tokens[1].value, "x");
}

#[test]
fn test_error_rendering() {
    let source = "hàm chính() {\n    biến x: chuỗi = 5;\n}";
    let err = parse_source(source).unwrap_err();
    assert_eq!((err.line, err.column), (2, 21));

    let rendered = err.render(Path::new("vd.sen"), source);
    let lines: Vec<&str> = rendered.lines().collect();
    assert_eq!(lines[0], "SemanticError: Type mismatch: Expected 'chuỗi', but got 'số nguyên'.");
    assert_eq!(lines[1], "  --> vd.sen:2:21");
    assert_eq!(lines[2], "      biến x: chuỗi = 5;");
    assert_eq!(lines[3], format!("  {}^", " ".repeat(20)));
}

#[test]
fn test_ast_pretty_print() {
    let program = parse_source("hàm chính() { nếu (a) trả; không thì b(1); }").unwrap();
    assert_eq!(
        program.body[0].to_string(),
        "Function chính(): rỗng\n  If a\n    Return\n  Else\n    Expr (call b 1)\n"
    );
}
