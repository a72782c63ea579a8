use pegc::codegen::{generate, Program, Target};
use pegc::compiler::{CompileError, CompileOptions};
use pegc::grammar::{meta_options, peg, Grammar, GrammarError, META_GRAMMAR};
use pegc::runtime::{ParseErrorContent, ParserOptions};
use rstest::rstest;

const JSON_GRAMMAR: &str = include_str!("../macro/tests/grammars/json.peg");

fn json_options() -> CompileOptions {
    CompileOptions::new().ignore("Spacing").inline("EndOfFile")
}

fn to_peg(source: &str, options: &CompileOptions) -> String {
    generate(&Grammar::parse(source).unwrap(), options, Target::Peg).unwrap()
}

#[test]
fn meta_grammar_describes_itself() {
    let grammar = Grammar::parse(META_GRAMMAR).unwrap();
    let program = Program::compile(&grammar, &meta_options()).unwrap();

    assert_eq!(program.name(), "Peg");
    assert_eq!(program.parse(META_GRAMMAR), peg::parse(META_GRAMMAR));
    assert_eq!(program.parse(JSON_GRAMMAR), peg::parse(JSON_GRAMMAR));
}

#[rstest]
#[case(META_GRAMMAR, meta_options())]
#[case(JSON_GRAMMAR, json_options())]
#[case("S <- 'it\\'s' [-a] \"q\" . / !'z' [\\n\\t] S?", CompileOptions::new())]
fn generated_peg_is_a_fixed_point(#[case] source: &str, #[case] options: CompileOptions) {
    let first = to_peg(source, &options);
    let second = to_peg(&first, &options);

    assert_eq!(first, second);
}

#[rstest]
#[case("[]")]
#[case("{\"a\": [1, -2.5e3, true, null], \"b\": {}}")]
#[case("[1,2")]
#[case("  \"esc\\\"aped\"  ")]
#[case("{\"a\" 1}")]
fn generated_peg_accepts_the_same_inputs(#[case] input: &str) {
    let original = Program::compile(&Grammar::parse(JSON_GRAMMAR).unwrap(), &json_options()).unwrap();

    let regenerated = to_peg(JSON_GRAMMAR, &json_options());
    let regenerated = Program::compile(&Grammar::parse(&regenerated).unwrap(), &json_options()).unwrap();

    assert_eq!(original.recognize(input), regenerated.recognize(input));
    assert_eq!(original.parse(input), regenerated.parse(input));
}

#[test]
fn generated_peg_layout() {
    let peg = to_peg(
        "S <- A+ Sp ('x' / [0-9])\nA <- 'a'\nSp <- ' '*",
        &CompileOptions::new().ignore("Sp").inline("A"),
    );

    assert_eq!(
        peg,
        "# Grammar S (starts with S)\n\n\
         S <- 'a'+ Sp ('x' / [0-9])\n\
         A <- 'a' # inline\n\
         Sp <- ' '* # ignore\n"
    );
}

#[test]
fn generated_rust_layout() {
    let grammar = Grammar::parse("Num <- [0-9]+").unwrap();
    let code = generate(&grammar, &CompileOptions::new(), Target::Rust).unwrap();

    assert!(code.contains("pub const GRAMMAR_NAME"));
    assert!(code.contains("pub fn rule_Num"));
    assert!(code.contains("in_range"));
}

#[test]
fn targets_by_name() {
    assert_eq!("peg".parse::<Target>(), Ok(Target::Peg));
    assert_eq!("rust".parse::<Target>(), Ok(Target::Rust));
    assert!("cobol".parse::<Target>().is_err());
}

#[rstest]
#[case("A <- 'a'\nA <- 'b'")]
#[case("A <- B")]
#[case("A <- A 'a' / 'b'")]
#[case("A <- 'a")]
fn invalid_grammars(#[case] source: &str) {
    let err = Grammar::parse(source).unwrap_err();

    match &err {
        GrammarError::DuplicateRule { name, .. } => assert_eq!(name, "A"),
        GrammarError::UnknownRule { name, .. } => assert_eq!(name, "B"),
        GrammarError::LeftRecursion { cycle, .. } => assert_eq!(cycle, &["A", "A"]),
        GrammarError::Syntax(err) => assert_eq!(err.column(), 8),
        err => panic!("unexpected error: {}", err),
    }
}

#[test]
fn invalid_compile_options() {
    let grammar = Grammar::parse("S <- A\nA <- 'a' B\nB <- 'b' A / 'b'").unwrap();

    assert!(matches!(
        Program::compile(&grammar, &CompileOptions::new().with_root("Nope")),
        Err(CompileError::UnknownTarget { .. })
    ));

    assert!(matches!(
        Program::compile(&grammar, &CompileOptions::new().inline("A").inline("B")),
        Err(CompileError::RecursiveInline { .. })
    ));
}

fn parenthesized(depth: usize) -> String {
    format!("S <- {}'a'{}", "(".repeat(depth), ")".repeat(depth))
}

#[test]
fn deeply_nested_grammar() {
    let source = parenthesized(60);
    let grammar = Grammar::parse(&source).unwrap();
    let program = Program::compile(&grammar, &CompileOptions::new()).unwrap();
    assert!(program.parse("a").is_ok());

    let source = parenthesized(40);

    match Grammar::parse_with(&source, ParserOptions { max_depth: 100 }).unwrap_err() {
        GrammarError::Syntax(err) => assert_eq!(err.content(), &ParseErrorContent::RecursionLimit(100)),
        err => panic!("unexpected error: {}", err),
    }

    assert!(Grammar::parse_with(&source, ParserOptions { max_depth: 300 }).is_ok());
    assert!(Grammar::parse_nocheck_with(&source, ParserOptions { max_depth: 300 }).is_ok());
}

#[test]
fn deeply_nested_input() {
    let program = Program::compile(&Grammar::parse(JSON_GRAMMAR).unwrap(), &json_options()).unwrap();
    let input = format!("{}{}", "[".repeat(130), "]".repeat(130));

    assert!(program.parse(&input).is_ok());

    let err = program.parse_with(&input, ParserOptions { max_depth: 64 }).unwrap_err();
    assert_eq!(err.content(), &ParseErrorContent::RecursionLimit(64));
}
