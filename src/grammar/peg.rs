//! Bootstrapped recognizer for the PEG meta-grammar (`peg.peg`)
//!
//! This module has the shape the Rust backend emits for `peg.peg` when compiled with [`meta_options`](super::meta_options):
//! one `rule_` function per rule, `Spacing` wrapped as an ignore rule. Rules the meta-grammar inlines are private
//! helpers here, called where the generated code would paste their body; they never create nodes.
//!
//! Any change to `peg.peg` must be reflected here, tests check that both build the same trees.

use crate::runtime::{Outcome, ParseError, Parser, ParserOptions};
use crate::tree::Node;

/// Name of the root node
pub const GRAMMAR_NAME: &str = "Peg";

/// Recognize a grammar source
pub fn parse(input: &str) -> Result<Node<'static>, ParseError> {
    parse_with(input, ParserOptions::default())
}

/// Recognize a grammar source with custom options
pub fn parse_with(input: &str, options: ParserOptions) -> Result<Node<'static>, ParseError> {
    Parser::with_options(input, GRAMMAR_NAME, options).parse(rules::rule_Grammar)
}

/// Run the root rule without requiring the whole input to be consumed
pub fn recognize(input: &str) -> Outcome<'static> {
    Parser::new(input, GRAMMAR_NAME).run(rules::rule_Grammar)
}

#[allow(non_snake_case)]
pub mod rules {
    use crate::runtime::Parser;

    type P<'a> = Parser<'a, 'static>;

    pub fn rule_Grammar(p: &mut P) -> bool {
        p.add_node("Grammar", |p| {
            p.need_all(|p| rule_Spacing(p) && p.one_or_more(rule_Definition) && end_of_file(p))
        })
    }

    pub fn rule_Definition(p: &mut P) -> bool {
        p.add_node("Definition", |p| {
            p.need_all(|p| rule_Identifier(p) && left_arrow(p) && rule_Expression(p))
        })
    }

    pub fn rule_Expression(p: &mut P) -> bool {
        p.add_node("Expression", |p| {
            p.need_all(|p| {
                rule_Sequence(p)
                    && p.zero_or_more(|p| p.need_all(|p| slash(p) && rule_Sequence(p)))
            })
        })
    }

    pub fn rule_Sequence(p: &mut P) -> bool {
        p.add_node("Sequence", |p| p.zero_or_more(rule_Prefix))
    }

    pub fn rule_Prefix(p: &mut P) -> bool {
        p.add_node("Prefix", |p| {
            p.need_all(|p| {
                p.maybe(|p| p.need_one(|p| rule_AND(p) || rule_NOT(p))) && rule_Suffix(p)
            })
        })
    }

    pub fn rule_Suffix(p: &mut P) -> bool {
        p.add_node("Suffix", |p| {
            p.need_all(|p| {
                rule_Primary(p)
                    && p.maybe(|p| {
                        p.need_one(|p| rule_QUESTION(p) || rule_STAR(p) || rule_PLUS(p))
                    })
            })
        })
    }

    pub fn rule_Primary(p: &mut P) -> bool {
        p.add_node("Primary", |p| {
            p.need_one(|p| {
                p.need_all(|p| rule_Identifier(p) && p.not(left_arrow))
                    || p.need_all(|p| open(p) && rule_Expression(p) && close(p))
                    || rule_Literal(p)
                    || rule_Class(p)
                    || rule_DOT(p)
            })
        })
    }

    pub fn rule_Identifier(p: &mut P) -> bool {
        p.add_node("Identifier", |p| {
            p.need_all(|p| ident_start(p) && p.zero_or_more(ident_cont) && rule_Spacing(p))
        })
    }

    pub fn rule_Literal(p: &mut P) -> bool {
        p.add_node("Literal", |p| {
            p.need_one(|p| {
                p.need_all(|p| {
                    p.in_set("'")
                        && p.zero_or_more(|p| p.need_all(|p| p.not(|p| p.in_set("'")) && character(p)))
                        && p.in_set("'")
                        && rule_Spacing(p)
                }) || p.need_all(|p| {
                    p.in_set("\"")
                        && p.zero_or_more(|p| p.need_all(|p| p.not(|p| p.in_set("\"")) && character(p)))
                        && p.in_set("\"")
                        && rule_Spacing(p)
                })
            })
        })
    }

    pub fn rule_Class(p: &mut P) -> bool {
        p.add_node("Class", |p| {
            p.need_all(|p| {
                p.next("[")
                    && p.zero_or_more(|p| p.need_all(|p| p.not(|p| p.next("]")) && rule_Range(p)))
                    && p.next("]")
                    && rule_Spacing(p)
            })
        })
    }

    pub fn rule_Range(p: &mut P) -> bool {
        p.add_node("Range", |p| {
            p.need_one(|p| {
                p.need_all(|p| character(p) && p.next("-") && p.not(|p| p.next("]")) && character(p))
                    || character(p)
            })
        })
    }

    pub fn rule_AND(p: &mut P) -> bool {
        p.add_node("AND", |p| p.need_all(|p| p.next("&") && rule_Spacing(p)))
    }

    pub fn rule_NOT(p: &mut P) -> bool {
        p.add_node("NOT", |p| p.need_all(|p| p.next("!") && rule_Spacing(p)))
    }

    pub fn rule_QUESTION(p: &mut P) -> bool {
        p.add_node("QUESTION", |p| p.need_all(|p| p.next("?") && rule_Spacing(p)))
    }

    pub fn rule_STAR(p: &mut P) -> bool {
        p.add_node("STAR", |p| p.need_all(|p| p.next("*") && rule_Spacing(p)))
    }

    pub fn rule_PLUS(p: &mut P) -> bool {
        p.add_node("PLUS", |p| p.need_all(|p| p.next("+") && rule_Spacing(p)))
    }

    pub fn rule_DOT(p: &mut P) -> bool {
        p.add_node("DOT", |p| p.need_all(|p| p.next(".") && rule_Spacing(p)))
    }

    pub fn rule_Spacing(p: &mut P) -> bool {
        p.ignore(|p| p.zero_or_more(|p| p.need_one(|p| space(p) || comment(p))))
    }

    // Inlined rules

    fn ident_start(p: &mut P) -> bool {
        p.need_one(|p| p.in_set("_") || p.in_range('a', 'z') || p.in_range('A', 'Z'))
    }

    fn ident_cont(p: &mut P) -> bool {
        p.need_one(|p| ident_start(p) || p.in_range('0', '9'))
    }

    fn character(p: &mut P) -> bool {
        p.need_one(|p| {
            p.need_all(|p| p.next("\\") && p.in_set("nrt'\"[]\\"))
                || p.need_all(|p| {
                    p.next("\\")
                        && p.in_range('0', '2')
                        && p.in_range('0', '7')
                        && p.in_range('0', '7')
                })
                || p.need_all(|p| {
                    p.next("\\") && p.in_range('0', '7') && p.maybe(|p| p.in_range('0', '7'))
                })
                || p.need_all(|p| p.not(|p| p.next("\\")) && p.any_char())
        })
    }

    fn left_arrow(p: &mut P) -> bool {
        p.need_all(|p| p.next("<-") && rule_Spacing(p))
    }

    fn slash(p: &mut P) -> bool {
        p.need_all(|p| p.next("/") && rule_Spacing(p))
    }

    fn open(p: &mut P) -> bool {
        p.need_all(|p| p.next("(") && rule_Spacing(p))
    }

    fn close(p: &mut P) -> bool {
        p.need_all(|p| p.next(")") && rule_Spacing(p))
    }

    fn comment(p: &mut P) -> bool {
        p.need_all(|p| {
            p.next("#")
                && p.zero_or_more(|p| p.need_all(|p| p.not(end_of_line) && p.any_char()))
                && p.need_one(|p| end_of_line(p) || end_of_file(p))
        })
    }

    fn space(p: &mut P) -> bool {
        p.need_one(|p| p.next(" ") || p.next("\t") || end_of_line(p))
    }

    fn end_of_line(p: &mut P) -> bool {
        p.need_one(|p| p.next("\r\n") || p.next("\n") || p.next("\r"))
    }

    fn end_of_file(p: &mut P) -> bool {
        p.not(|p| p.any_char())
    }
}
