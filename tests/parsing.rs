use pegc::codegen::Program;
use pegc::compiler::CompileOptions;
use pegc::grammar::Grammar;
use pegc::runtime::{pretty_format_parse_err, ParseErrorContent, ParserOptions};
use pegc::tree::{Node, Range};
use rstest::rstest;

fn program(source: &str, options: &CompileOptions) -> Program {
    Program::compile(&Grammar::parse(source).unwrap(), options).unwrap()
}

#[test]
fn ignored_spacing_is_not_in_tree() {
    let program = program(
        "S <- 'a' B\nB <- Sp 'b'\nSp <- [ \\t]*",
        &CompileOptions::new().ignore("Sp"),
    );

    let tree = program.parse("a \t b").unwrap();

    assert_eq!(
        tree,
        Node::with_children(
            "S",
            Range::new(0, 5),
            vec![Node::with_children(
                "S",
                Range::new(0, 5),
                vec![Node::new("B", Range::new(4, 5))]
            )]
        )
    );
}

#[test]
fn inlined_rules_leave_no_node() {
    let program = program(
        "S <- A A\nA <- 'a'",
        &CompileOptions::new().with_name("Doubled").inline("A"),
    );

    let tree = program.parse("aa").unwrap();

    assert_eq!(tree.name(), "Doubled");
    assert_eq!(tree.children(), &[Node::new("S", Range::new(0, 2))]);
}

#[test]
fn custom_root_rule() {
    let program = program("A <- 'a' B\nB <- 'b'+", &CompileOptions::new().with_root("B"));

    assert_eq!(program.name(), "B");
    assert!(program.parse("bbb").is_ok());
    assert!(program.parse("ab").is_err());
}

#[rstest]
#[case("S <- 'ab' / 'a' 'c'", "ax", ParseErrorContent::UnexpectedChar('x'), 1, 2)]
#[case("S <- 'a' 'c'", "a\n", ParseErrorContent::UnexpectedNewLine, 1, 2)]
#[case("S <- 'a'+", "aa\naa", ParseErrorContent::UnexpectedNewLine, 1, 3)]
#[case("S <- 'a' [0-9]+ 'z'", "a12", ParseErrorContent::UnexpectedEof, 1, 4)]
#[case("S <- 'a'* '\\n' 'b'", "aaa\nc", ParseErrorContent::UnexpectedChar('c'), 2, 1)]
fn errors_point_at_farthest_failure(
    #[case] grammar: &str,
    #[case] input: &str,
    #[case] content: ParseErrorContent,
    #[case] line: usize,
    #[case] column: usize,
) {
    let err = program(grammar, &CompileOptions::new()).parse(input).unwrap_err();

    assert_eq!(err.content(), &content);
    assert_eq!((err.line(), err.column()), (line, column));
}

#[test]
fn lookahead_failures_are_not_reported() {
    let program = program("S <- &('a' 'b' 'c') 'x' / 'a'", &CompileOptions::new());
    let err = program.parse("abd").unwrap_err();

    assert_eq!(err.content(), &ParseErrorContent::UnexpectedChar('b'));
    assert_eq!(err.column(), 2);
}

#[test]
fn recursion_limit() {
    let program = program("A <- '(' A ')' / 'x'", &CompileOptions::new());
    let options = ParserOptions { max_depth: 4 };

    assert!(program.parse_with("((x))", options).is_ok());

    let err = program.parse_with("((((((x))))))", options).unwrap_err();
    assert_eq!(err.content(), &ParseErrorContent::RecursionLimit(4));

    let outcome = program.recognize("((((((x))))))");
    assert!(outcome.accepted);
    assert_eq!(outcome.overflow, None);
}

#[test]
fn pretty_error() {
    let input = "aa\nab";
    let err = program("S <- ('a'+ '\\n')*", &CompileOptions::new())
        .parse(input)
        .unwrap_err();

    assert_eq!(
        pretty_format_parse_err(input, &err),
        "ERROR: At line 2, column 2:\n\n2 | ab\n     ^\n     Unexpected b"
    );
}
