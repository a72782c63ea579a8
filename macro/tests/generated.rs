use pegc::codegen::Program;
use pegc::compiler::CompileOptions;
use pegc::grammar::{meta_options, peg, Grammar, META_GRAMMAR};
use pegc::runtime::ParseErrorContent;
use pegc::tree::{Node, Range};
use pegc_macro::pegc_grammar;
use proptest::prelude::*;
use rstest::rstest;

#[pegc_grammar(filename = "tests/grammars/num.peg")]
mod num {}

#[pegc_grammar(filename = "tests/grammars/spaced.peg", ignore = "Sp")]
mod spaced {}

#[pegc_grammar(filename = "tests/grammars/json.peg", ignore = "Spacing", inline = "EndOfFile")]
mod json {}

#[pegc_grammar(
    filename = "../src/grammar/peg.peg",
    name = "Peg",
    ignore = "Spacing",
    inline = "IdentStart IdentCont Char LEFTARROW SLASH OPEN CLOSE Comment Space EndOfLine EndOfFile"
)]
mod meta {}

#[pegc_grammar(filename = "tests/grammars/nested.peg", max_depth = "1024")]
mod nested {}

fn json_program() -> Program {
    let grammar = Grammar::parse(include_str!("grammars/json.peg")).unwrap();
    let options = CompileOptions::new().ignore("Spacing").inline("EndOfFile");
    Program::compile(&grammar, &options).unwrap()
}

#[test]
fn generated_num_recognizer() {
    let outcome = num::recognize("123a");

    assert!(outcome.accepted);
    assert_eq!(outcome.end, 3);
    assert_eq!(outcome.tree.name(), "Num");
    assert_eq!(outcome.tree.children(), &[Node::new("Num", Range::new(0, 3))]);
}

#[rstest]
#[case("")]
#[case("7")]
#[case("123a")]
#[case("a123")]
#[case("0042")]
fn generated_and_interpreted_agree(#[case] input: &str) {
    let grammar = Grammar::parse(include_str!("grammars/num.peg")).unwrap();
    let program = Program::compile(&grammar, &CompileOptions::new()).unwrap();

    assert_eq!(num::recognize(input), program.recognize(input));
    assert_eq!(num::parse(input), program.parse(input));
}

#[test]
fn ignored_rule_is_clipped_away() {
    let tree = spaced::parse("a   b").unwrap();

    assert_eq!(
        tree.children(),
        &[Node::with_children(
            "S",
            Range::new(0, 5),
            vec![Node::new("B", Range::new(4, 5))]
        )]
    );
    assert!(tree.find("Sp").is_none());
}

#[test]
fn json_document() {
    let input = r#"{"a": [1, 2.5e3, true, null], "b\"": "x"}"#;
    let tree = json::parse(input).unwrap();

    assert_eq!(tree.name(), "Json");
    assert_eq!(tree.descendants().filter(|node| node.name() == "Member").count(), 2);
    assert_eq!(tree.descendants().filter(|node| node.name() == "Number").count(), 2);
    assert!(tree.find("Spacing").is_none());
    assert!(tree.find("EndOfFile").is_none());

    let number = tree.find("Number").unwrap();
    assert_eq!(number.text(input), "1");

    assert_eq!(tree, json_program().parse(input).unwrap());
}

#[test]
fn json_unexpected_eof() {
    let err = json::parse("[1,2").unwrap_err();

    assert_eq!(err.content(), &ParseErrorContent::UnexpectedEof);
    assert_eq!((err.line(), err.column()), (1, 5));
    assert_eq!(err.to_string(), "Unexpected EOF at line 1, column 5");

    assert_eq!(json_program().parse("[1,2").unwrap_err(), err);
}

#[test]
fn json_unexpected_char() {
    let err = json::parse("[1,\n  ?]").unwrap_err();

    assert_eq!(err.content(), &ParseErrorContent::UnexpectedChar('?'));
    assert_eq!((err.line(), err.column()), (2, 3));
}

#[rstest]
#[case(META_GRAMMAR)]
#[case(include_str!("grammars/json.peg"))]
#[case("A <- 'a' / [b-d]* !B\nB <- (A)?")]
#[case("# only a comment")]
#[case("A <- 'unterminated")]
fn generated_meta_grammar_matches_bootstrap(#[case] source: &str) {
    assert_eq!(meta::parse(source), peg::parse(source));
    assert_eq!(meta::recognize(source), peg::recognize(source));
}

#[test]
fn interpreted_meta_grammar_matches_bootstrap() {
    let grammar = Grammar::parse(META_GRAMMAR).unwrap();
    let program = Program::compile(&grammar, &meta_options()).unwrap();

    assert_eq!(program.parse(META_GRAMMAR), peg::parse(META_GRAMMAR));
}

#[test]
fn deeply_nested_grammar_with_raised_limit() {
    assert!(nested::parse("a").is_ok());
    assert!(nested::parse("aa").is_err());
}

proptest! {
    #[test]
    fn generated_json_agrees_with_interpreter(input in r#"[\[\]{}:, 0-9a-z"\\.-]{0,24}"#) {
        let program = json_program();

        prop_assert_eq!(json::recognize(&input), program.recognize(&input));
        prop_assert_eq!(json::parse(&input), program.parse(&input));
    }

    #[test]
    fn generated_json_agrees_on_arrays(items in prop::collection::vec(0u32..1000, 0..8), spaces in " {0,2}") {
        let input = format!(
            "[{}]",
            items.iter().map(u32::to_string).collect::<Vec<_>>().join(&format!(",{}", spaces))
        );

        let program = json_program();

        prop_assert!(json::parse(&input).is_ok());
        prop_assert_eq!(json::parse(&input), program.parse(&input));
    }
}
