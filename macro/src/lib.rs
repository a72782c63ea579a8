//! # pegc_macro
//!
//! Fill a module with the parser generated for a grammar:
//!
//! ```ignore
//! use pegc_macro::pegc_grammar;
//!
//! #[pegc_grammar(filename = "grammars/json.peg", ignore = "Spacing")]
//! pub mod json {}
//!
//! let tree = json::parse("[1, 2]").unwrap();
//! ```
//!
//! Available keys:
//!
//! * `filename`: path to the grammar, from the crate's root directory (required)
//! * `name`: grammar name, given to the root node
//! * `root`: rule the parse starts with
//! * `ignore`: space-separated list of ignorable rules
//! * `inline`: space-separated list of rules to inline
//! * `max_depth`: maximum rule nesting while reading the grammar (see [`ParserOptions`])

#![forbid(unsafe_code)]
#![forbid(unused_must_use)]

use lazy_static::lazy_static;
use pegc::codegen::RustBackend;
use pegc::compiler::{compile, CompileOptions};
use pegc::grammar::{Grammar, GrammarError};
use pegc::runtime::{pretty_format_parse_err, ParserOptions};
use proc_macro::TokenStream;
use quote::quote;
use regex::Regex;
use std::env;
use std::fs;
use std::path::PathBuf;
use syn::{Ident, ItemMod, Visibility};

lazy_static! {
    static ref ATTR_ENTRY: Regex = Regex::new(r#"(\w+)\s*=\s*"([^"]*)""#).unwrap();
}

/// Options decoded from the attribute
struct Options {
    /// Input file (grammar)
    grammar_file: PathBuf,

    /// Compiler options
    compile: CompileOptions,

    /// Options used to read the grammar
    reader: ParserOptions,
}

#[proc_macro_attribute]
pub fn pegc_grammar(attr: TokenStream, item: TokenStream) -> TokenStream {
    let (mod_ident, mod_vis) = parse_input_mod(item);

    let options = parse_options_attr(attr);

    if !options.grammar_file.exists() {
        panic!(
            "Grammar file was not found at path {} (tip: path starts from your crate's root directory)",
            options.grammar_file.display()
        );
    }

    let generated_rust = grammar_to_rust(&options);
    let grammar_path = options.grammar_file.to_string_lossy().to_string();

    let expanded = quote! {
        #mod_vis mod #mod_ident {
            // Rebuild when the grammar changes
            const _: &str = include_str!(#grammar_path);

            #generated_rust
        }
    };

    TokenStream::from(expanded)
}

fn parse_input_mod(item: TokenStream) -> (Ident, Visibility) {
    let item = syn::parse::<ItemMod>(item).unwrap_or_else(|_| {
        panic!("This macro must be used on a module which will be filled with the generated parser")
    });

    let mod_ident = item.ident;

    let mod_content = item.content.unwrap_or_else(|| {
        panic!(
            "This macro must be used on an inline, empty module (e.g. 'mod {} {{}}')",
            mod_ident
        )
    });

    if !mod_content.1.is_empty() {
        panic!(
            "This macro must be used on an inline, empty module (e.g. 'mod {} {{}}')",
            mod_ident
        )
    }

    (mod_ident, item.vis)
}

fn parse_options_attr(attr: TokenStream) -> Options {
    let attr = attr.to_string();

    let mut filename = None;
    let mut compile = CompileOptions::new();
    let mut reader = ParserOptions::new();

    for captured in ATTR_ENTRY.captures_iter(&attr) {
        let value = &captured[2];

        match &captured[1] {
            "filename" => filename = Some(value.to_string()),
            "name" => compile = compile.with_name(value),
            "root" => compile = compile.with_root(value),
            "ignore" => {
                for rule in value.split_whitespace() {
                    compile = compile.ignore(rule);
                }
            }
            "inline" => {
                for rule in value.split_whitespace() {
                    compile = compile.inline(rule);
                }
            }
            "max_depth" => {
                reader.max_depth = value
                    .parse()
                    .unwrap_or_else(|_| panic!("Invalid max_depth '{}' (expected a number)", value))
            }
            key => panic!(
                "Unknown key '{}' (expected one of: filename, name, root, ignore, inline, max_depth)",
                key
            ),
        }
    }

    let filename = filename.unwrap_or_else(|| {
        panic!("Please provide a grammar file path under the form: #[pegc_grammar(filename = \"<path>\")]")
    });

    let mut grammar_file = PathBuf::from(
        env::var("CARGO_MANIFEST_DIR").expect("CARGO_MANIFEST_DIR is set by cargo"),
    );
    grammar_file.push(filename);

    Options {
        grammar_file,
        compile,
        reader,
    }
}

fn grammar_to_rust(options: &Options) -> proc_macro2::TokenStream {
    let grammar_src =
        fs::read_to_string(&options.grammar_file).expect("Provided file could not be read");

    let grammar = Grammar::parse_with(&grammar_src, options.reader).unwrap_or_else(|err| match err {
        GrammarError::Syntax(err) => panic!(
            "Failed to parse grammar:\n{}",
            pretty_format_parse_err(&grammar_src, &err)
        ),
        err => panic!("Invalid grammar: {}", err),
    });

    compile(&grammar, &options.compile, RustBackend::new())
        .unwrap_or_else(|err| panic!("Failed to compile grammar: {}", err))
}
