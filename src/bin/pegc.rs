//! Command-line interface for pegc
//!
//! Usage:
//!   pegc generate `<grammar>` [--target rust|peg] [--name `<name>`] [--root `<rule>`] [--ignore `<rule>`]... [--inline `<rule>`]...
//!   pegc check `<grammar>`
//!   pegc parse `<grammar>` `<input>` [same options as generate]
//!
//! Every command accepts `--max-depth <n>` to allow more deeply nested grammars and inputs.

use anyhow::{anyhow, bail, Context, Result};
use clap::{value_parser, Arg, ArgAction, ArgMatches, Command};
use pegc::codegen::{generate, Program, Target};
use pegc::compiler::CompileOptions;
use pegc::grammar::{Grammar, GrammarError};
use pegc::runtime::{pretty_format_parse_err, ParserOptions};
use std::fs;

fn main() -> Result<()> {
    let matches = Command::new("pegc")
        .version(env!("CARGO_PKG_VERSION"))
        .about("PEG grammar checker, interpreter and parser generator")
        .subcommand_required(true)
        .arg_required_else_help(true)
        .arg(
            Arg::new("max-depth")
                .long("max-depth")
                .help("Maximum number of nested rules while parsing")
                .value_parser(value_parser!(usize))
                .global(true),
        )
        .subcommand(
            Command::new("generate")
                .about("Generate a parser from a grammar")
                .arg(grammar_arg())
                .arg(
                    Arg::new("target")
                        .long("target")
                        .short('t')
                        .help("Output language")
                        .value_parser(["rust", "peg"])
                        .default_value("rust"),
                )
                .args(compile_args()),
        )
        .subcommand(
            Command::new("check")
                .about("Check a grammar for errors")
                .arg(grammar_arg()),
        )
        .subcommand(
            Command::new("parse")
                .about("Parse a file with a grammar and print the resulting tree")
                .arg(grammar_arg())
                .arg(
                    Arg::new("input")
                        .help("Path to the file to parse")
                        .required(true)
                        .index(2),
                )
                .args(compile_args()),
        )
        .get_matches();

    match matches.subcommand() {
        Some(("generate", matches)) => {
            let source = read(matches, "grammar")?;
            let grammar = read_grammar(&source, parser_options(matches))?;
            let target = matches
                .get_one::<String>("target")
                .map_or(Ok(Target::Peg), |target| target.parse())
                .map_err(|err: String| anyhow!(err))?;

            let code = generate(&grammar, &compile_options(matches), target)?;
            println!("{}", code);
        }

        Some(("check", matches)) => {
            let source = read(matches, "grammar")?;
            let grammar = read_grammar(&source, parser_options(matches))?;
            println!("Grammar is valid ({} rules)", grammar.definitions()?.len());
        }

        Some(("parse", matches)) => {
            let source = read(matches, "grammar")?;
            let grammar = read_grammar(&source, parser_options(matches))?;
            let program = Program::compile(&grammar, &compile_options(matches))?;

            let input = read(matches, "input")?;

            match program.parse_with(&input, parser_options(matches)) {
                Ok(tree) => print!("{}", tree.dump(&input)),
                Err(err) => bail!("{}", pretty_format_parse_err(&input, &err)),
            }
        }

        _ => unreachable!(),
    }

    Ok(())
}

fn grammar_arg() -> Arg {
    Arg::new("grammar")
        .help("Path to the grammar")
        .required(true)
        .index(1)
}

fn compile_args() -> [Arg; 4] {
    [
        Arg::new("name")
            .long("name")
            .help("Grammar name (defaults to the root rule's name)"),
        Arg::new("root")
            .long("root")
            .help("Rule the parse starts with (defaults to the first one)"),
        Arg::new("ignore")
            .long("ignore")
            .help("Rule matching ignorable text, which doesn't create nodes")
            .action(ArgAction::Append),
        Arg::new("inline")
            .long("inline")
            .help("Rule to inline where it is referenced")
            .action(ArgAction::Append),
    ]
}

fn compile_options(matches: &ArgMatches) -> CompileOptions {
    let mut options = CompileOptions::new();

    if let Some(name) = matches.get_one::<String>("name") {
        options = options.with_name(name);
    }

    if let Some(root) = matches.get_one::<String>("root") {
        options = options.with_root(root);
    }

    for rule in matches.get_many::<String>("ignore").into_iter().flatten() {
        options = options.ignore(rule);
    }

    for rule in matches.get_many::<String>("inline").into_iter().flatten() {
        options = options.inline(rule);
    }

    options
}

fn read(matches: &ArgMatches, arg: &str) -> Result<String> {
    let path = matches
        .get_one::<String>(arg)
        .with_context(|| format!("missing argument `{}`", arg))?;

    fs::read_to_string(path).with_context(|| format!("failed to read `{}`", path))
}

fn parser_options(matches: &ArgMatches) -> ParserOptions {
    let mut options = ParserOptions::new();

    if let Some(&max_depth) = matches.get_one::<usize>("max-depth") {
        options.max_depth = max_depth;
    }

    options
}

fn read_grammar(source: &str, options: ParserOptions) -> Result<Grammar<'_>> {
    Grammar::parse_with(source, options).map_err(|err| match err {
        GrammarError::Syntax(err) => anyhow!("{}", pretty_format_parse_err(source, &err)),
        err => anyhow!(err),
    })
}
