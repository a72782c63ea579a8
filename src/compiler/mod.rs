//! # Compiler
//!
//! Walks a [grammar's model](crate::grammar) and describes each rule to a code generation
//! [backend](crate::codegen::Backend).
//!
//! Every node kind maps to one or more backend calls:
//!
//! * an `Expression` becomes an ordered choice of its sequences (an empty one always matches)
//! * a `Sequence` becomes a sequence of its prefixes
//! * `&` / `!` and `?` / `*` / `+` wrap their operand
//! * an `Identifier` becomes a rule call, or the rule's body if the rule is [inlined](CustomAction::Inline)
//! * a `Literal` becomes a literal match, after decoding its escape sequences
//! * a `Class` becomes a choice between one set (all its single characters) and one range per range
//! * `.` matches any character
//!
//! Each rule's body is then wrapped so it creates a node named after the rule, or extends the ignore range if the
//! rule is [ignorable](CustomAction::Ignore).

mod errors;
pub mod escape;
mod options;

pub use errors::*;
pub use options::*;

use crate::codegen::{Backend, GeneratedRule, GrammarInfo, Group};
use crate::grammar::{
    class_ranges, prefixes, primary_content, sequences, split_prefix, split_suffix, Grammar, Kind,
    ModelError,
};
use crate::tree::Node;
use std::collections::HashMap;
use tracing::debug;

/// Compile a grammar with the provided backend
pub fn compile<B: Backend>(
    grammar: &Grammar,
    options: &CompileOptions,
    backend: B,
) -> Result<B::Output, CompileError> {
    let definitions = grammar.definitions()?;
    let first = definitions.first().ok_or(CompileError::NoRules)?;

    let rules: HashMap<_, _> = definitions
        .iter()
        .map(|definition| (definition.name, definition.expression))
        .collect();

    // Check the options only refer to existing rules
    for name in options
        .overrides
        .iter()
        .map(|o| &o.rule)
        .chain(options.root_rule.iter())
    {
        if !rules.contains_key(name.as_str()) {
            return Err(CompileError::UnknownTarget { name: name.clone() });
        }
    }

    let root = options
        .root_rule
        .clone()
        .unwrap_or_else(|| first.name.to_string());

    let info = GrammarInfo {
        name: options.grammar_name.clone().unwrap_or_else(|| root.clone()),
        root,
    };

    let mut compiler = Compiler {
        grammar,
        options,
        rules,
        inlining: vec![],
        backend,
    };

    let mut generated = vec![];

    for definition in &definitions {
        compiler.inlining.push(definition.name);
        let body = compiler.compile_node(definition.expression)?;
        compiler.inlining.pop();

        let action = options.action(definition.name);

        let body = match action {
            Some(CustomAction::Ignore) => compiler.backend.ignore(body),
            Some(CustomAction::Inline) | None => compiler.backend.add_node(body, definition.name),
        };

        debug!(rule = definition.name, ?action, "rule compiled");

        generated.push(GeneratedRule {
            name: definition.name.to_string(),
            function: compiler.backend.function_name(definition.name),
            body,
            action,
        });
    }

    debug!(
        grammar = %info.name,
        root = %info.root,
        rules = generated.len(),
        "grammar compiled"
    );

    Ok(compiler.backend.finish(&info, generated))
}

struct Compiler<'c, 'g, 's, B: Backend> {
    grammar: &'c Grammar<'s>,
    options: &'c CompileOptions,

    /// Body of each rule
    rules: HashMap<&'s str, &'g Node<'s>>,

    /// Rules being compiled, outermost first
    inlining: Vec<&'s str>,

    backend: B,
}

impl<'c, 'g, 's, B: Backend> Compiler<'c, 'g, 's, B> {
    fn compile_node(&mut self, node: &Node) -> Result<B::Fragment, CompileError> {
        match Kind::of(node)? {
            Kind::Expression => {
                let alternatives = sequences(node)?;

                if alternatives.is_empty() {
                    // Nothing to match
                    self.group(true, &[])
                } else {
                    self.group(false, &alternatives)
                }
            }

            Kind::Sequence => self.group(true, &prefixes(node)?),

            Kind::Prefix => {
                let (operator, suffix) = split_prefix(node)?;
                let body = self.compile_node(suffix)?;

                Ok(match operator {
                    Some(Kind::And) => self.backend.and(body),
                    Some(Kind::Not) => self.backend.not(body),
                    _ => body,
                })
            }

            Kind::Suffix => {
                let (primary, operator) = split_suffix(node)?;
                let body = self.compile_node(primary)?;

                Ok(match operator {
                    Some(Kind::Question) => self.backend.maybe(body),
                    Some(Kind::Star) => self.backend.zero_or_more(body),
                    Some(Kind::Plus) => self.backend.one_or_more(body),
                    _ => body,
                })
            }

            Kind::Primary => self.compile_node(primary_content(node)?.1),
            Kind::Identifier => self.reference(node),
            Kind::Literal => self.literal(node),
            Kind::Class => self.class(node),
            Kind::Dot => Ok(self.backend.any_char()),

            found => Err(ModelError::Unexpected {
                found,
                parent: Kind::Primary,
                range: node.range(),
            }
            .into()),
        }
    }

    fn group(&mut self, require_all: bool, members: &[&Node]) -> Result<B::Fragment, CompileError> {
        let mut group = self.backend.begin_group(require_all);

        for member in members {
            let fragment = self.compile_node(member)?;
            group.add(fragment);
        }

        Ok(self.backend.end_group(group))
    }

    fn reference(&mut self, node: &Node) -> Result<B::Fragment, CompileError> {
        let name = self.grammar.text(node);

        let body = *self
            .rules
            .get(name)
            .ok_or_else(|| CompileError::UnknownRule {
                name: name.to_string(),
                location: self.grammar.location(node),
            })?;

        if self.options.action(name) != Some(CustomAction::Inline) {
            return Ok(self.backend.make_rule_call(name));
        }

        if let Some(from) = self.inlining.iter().position(|rule| *rule == name) {
            let cycle = self.inlining[from..]
                .iter()
                .chain(std::iter::once(&name))
                .map(|rule| rule.to_string())
                .collect();

            return Err(CompileError::RecursiveInline { cycle });
        }

        self.inlining.push(name);
        let fragment = self.compile_node(body);
        self.inlining.pop();

        fragment
    }

    fn literal(&mut self, node: &Node) -> Result<B::Fragment, CompileError> {
        let text = self.grammar.text(node);

        let content = match (text.chars().next(), text.chars().last()) {
            (Some(open @ ('\'' | '"')), Some(close)) if text.len() >= 2 && open == close => {
                &text[1..text.len() - 1]
            }
            _ => return Err(self.bad_token(Kind::Literal, node)),
        };

        let literal = escape::unescape(content).map_err(|_| CompileError::InvalidEscape {
            text: text.to_string(),
            location: self.grammar.location(node),
        })?;

        Ok(self.backend.next(&literal))
    }

    fn class(&mut self, node: &Node) -> Result<B::Fragment, CompileError> {
        let mut singles = String::new();
        let mut ranges = vec![];

        for range in class_ranges(node)? {
            let text = self.grammar.text(range);

            let (lo, rest) = escape::decode_char(text).ok_or_else(|| self.invalid_escape(range))?;

            if rest.is_empty() {
                singles.push(lo);
                continue;
            }

            let (hi, rest) = rest
                .strip_prefix('-')
                .and_then(escape::decode_char)
                .ok_or_else(|| self.invalid_escape(range))?;

            if !rest.is_empty() {
                return Err(self.bad_token(Kind::Range, range));
            }

            if lo > hi {
                return Err(CompileError::InvalidClassRange {
                    lo,
                    hi,
                    location: self.grammar.location(range),
                });
            }

            ranges.push((lo, hi));
        }

        let mut group = self.backend.begin_group(false);

        if !singles.is_empty() {
            group.add(self.backend.in_set(&singles));
        }

        for (lo, hi) in ranges {
            group.add(self.backend.in_range(lo, hi));
        }

        Ok(self.backend.end_group(group))
    }

    fn invalid_escape(&self, node: &Node) -> CompileError {
        CompileError::InvalidEscape {
            text: self.grammar.text(node).to_string(),
            location: self.grammar.location(node),
        }
    }

    fn bad_token(&self, kind: Kind, node: &Node) -> CompileError {
        ModelError::BadToken {
            kind,
            text: self.grammar.text(node).to_string(),
            range: node.range(),
        }
        .into()
    }
}
