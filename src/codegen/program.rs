use super::{sealed, Backend, FragmentList, GeneratedRule, GrammarInfo};
use crate::compiler::{compile, CompileError, CompileOptions};
use crate::grammar::Grammar;
use crate::runtime::{Outcome, ParseError, Parser, ParserOptions};
use crate::tree::Node;
use std::collections::HashMap;

/// Operation of a [`Program`], one per runtime primitive
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Op {
    AnyChar,
    InRange(char, char),
    InSet(String),
    Next(String),
    Maybe(Box<Op>),
    ZeroOrMore(Box<Op>),
    OneOrMore(Box<Op>),
    And(Box<Op>),
    Not(Box<Op>),

    /// Call the rule at this index of the program
    Call(usize),

    /// Sequence
    All(Vec<Op>),

    /// Ordered choice
    One(Vec<Op>),

    /// Rule creating a node
    Node(String, Box<Op>),

    /// Ignorable rule
    Ignore(Box<Op>),
}

/// A compiled rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProgramRule {
    pub name: String,
    pub body: Op,
}

/// A grammar compiled to operations run directly on the [runtime](crate::runtime)
///
/// This is the interpreted counterpart of the code generated by the [Rust backend](super::RustBackend): both drive
/// the same primitives in the same order, so they accept the same inputs and build the same trees.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Program {
    name: String,
    root: usize,
    rules: Vec<ProgramRule>,
}

impl Program {
    /// Compile a grammar
    pub fn compile(grammar: &Grammar, options: &CompileOptions) -> Result<Self, CompileError> {
        compile(grammar, options, ProgramBackend::new())
    }

    /// Get the grammar's name
    pub fn name(&self) -> &str {
        &self.name
    }

    /// Get the rule the parse starts with
    pub fn root(&self) -> &ProgramRule {
        &self.rules[self.root]
    }

    /// Get the compiled rules
    ///
    /// Indices match the ones of [`Op::Call`].
    pub fn rules(&self) -> &[ProgramRule] {
        &self.rules
    }

    /// Parse an input, which must be entirely consumed
    pub fn parse<'s>(&'s self, input: &str) -> Result<Node<'s>, ParseError> {
        self.parse_with(input, ParserOptions::default())
    }

    /// Parse an input with custom options
    pub fn parse_with<'s>(&'s self, input: &str, options: ParserOptions) -> Result<Node<'s>, ParseError> {
        Parser::with_options(input, &self.name, options).parse(|p| self.eval(p, &self.root().body))
    }

    /// Run the root rule without requiring the whole input to be consumed
    pub fn recognize<'s>(&'s self, input: &str) -> Outcome<'s> {
        Parser::new(input, &self.name).run(|p| self.eval(p, &self.root().body))
    }

    fn eval<'s>(&'s self, p: &mut Parser<'_, 's>, op: &'s Op) -> bool {
        match op {
            Op::AnyChar => p.any_char(),
            Op::InRange(lo, hi) => p.in_range(*lo, *hi),
            Op::InSet(set) => p.in_set(set),
            Op::Next(literal) => p.next(literal),
            Op::Maybe(body) => p.maybe(|p| self.eval(p, body)),
            Op::ZeroOrMore(body) => p.zero_or_more(|p| self.eval(p, body)),
            Op::OneOrMore(body) => p.one_or_more(|p| self.eval(p, body)),
            Op::And(body) => p.and(|p| self.eval(p, body)),
            Op::Not(body) => p.not(|p| self.eval(p, body)),
            Op::Call(rule) => self
                .rules
                .get(*rule)
                .map_or(false, |rule| self.eval(p, &rule.body)),
            Op::All(members) => p.need_all(|p| members.iter().all(|op| self.eval(p, op))),
            Op::One(members) => p.need_one(|p| members.iter().any(|op| self.eval(p, op))),
            Op::Node(name, body) => p.add_node(name, |p| self.eval(p, body)),
            Op::Ignore(body) => p.ignore(|p| self.eval(p, body)),
        }
    }
}

/// Backend building a [`Program`]
#[derive(Debug, Clone, Default)]
pub struct ProgramBackend {
    /// Index of every rule, allocated on first reference
    slots: HashMap<String, usize>,
}

impl ProgramBackend {
    pub fn new() -> Self {
        Self::default()
    }

    fn slot(&mut self, rule: &str) -> usize {
        let next = self.slots.len();
        *self.slots.entry(rule.to_string()).or_insert(next)
    }
}

impl sealed::Sealed for ProgramBackend {}

impl Backend for ProgramBackend {
    type Fragment = Op;
    type Group = FragmentList<Op>;
    type Output = Program;

    fn any_char(&mut self) -> Op {
        Op::AnyChar
    }

    fn in_range(&mut self, lo: char, hi: char) -> Op {
        Op::InRange(lo, hi)
    }

    fn in_set(&mut self, set: &str) -> Op {
        Op::InSet(set.to_string())
    }

    fn next(&mut self, literal: &str) -> Op {
        Op::Next(literal.to_string())
    }

    fn maybe(&mut self, body: Op) -> Op {
        Op::Maybe(Box::new(body))
    }

    fn zero_or_more(&mut self, body: Op) -> Op {
        Op::ZeroOrMore(Box::new(body))
    }

    fn one_or_more(&mut self, body: Op) -> Op {
        Op::OneOrMore(Box::new(body))
    }

    fn and(&mut self, body: Op) -> Op {
        Op::And(Box::new(body))
    }

    fn not(&mut self, body: Op) -> Op {
        Op::Not(Box::new(body))
    }

    fn make_rule_call(&mut self, rule: &str) -> Op {
        Op::Call(self.slot(rule))
    }

    fn begin_group(&mut self, require_all: bool) -> Self::Group {
        FragmentList::new(require_all)
    }

    fn end_group(&mut self, group: Self::Group) -> Op {
        let FragmentList {
            require_all,
            mut members,
        } = group;

        if members.len() == 1 {
            members.remove(0)
        } else if require_all {
            Op::All(members)
        } else {
            Op::One(members)
        }
    }

    fn add_node(&mut self, body: Op, rule: &str) -> Op {
        Op::Node(rule.to_string(), Box::new(body))
    }

    fn ignore(&mut self, body: Op) -> Op {
        Op::Ignore(Box::new(body))
    }

    fn function_name(&self, rule: &str) -> String {
        rule.to_string()
    }

    fn finish(mut self, info: &GrammarInfo, rules: Vec<GeneratedRule<Op>>) -> Program {
        for rule in &rules {
            self.slot(&rule.name);
        }

        let root = self.slot(&info.root);

        // Rules referenced but never compiled can't match anything
        let mut slots: Vec<ProgramRule> = vec![
            ProgramRule {
                name: String::new(),
                body: Op::One(vec![]),
            };
            self.slots.len()
        ];

        for (name, &slot) in &self.slots {
            slots[slot].name = name.clone();
        }

        for rule in rules {
            if let Some(&slot) = self.slots.get(&rule.name) {
                slots[slot].body = rule.body;
            }
        }

        Program {
            name: info.name.clone(),
            root,
            rules: slots,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::Range;

    fn program(source: &str) -> Program {
        Program::compile(&Grammar::parse(source).unwrap(), &CompileOptions::new()).unwrap()
    }

    #[test]
    fn calls_are_linked() {
        let program = program("S <- A B\nA <- 'a'\nB <- 'b'");

        assert_eq!(program.name(), "S");
        assert_eq!(program.root().name, "S");

        let a = program.rules().iter().position(|r| r.name == "A").unwrap();
        let b = program.rules().iter().position(|r| r.name == "B").unwrap();

        assert_eq!(
            program.root().body,
            Op::Node("S".to_string(), Box::new(Op::All(vec![Op::Call(a), Op::Call(b)])))
        );
    }

    #[test]
    fn interprets_grammar() {
        let program = program("Num <- [0-9]+");
        let outcome = program.recognize("123a");

        assert!(outcome.accepted);
        assert_eq!(outcome.end, 3);
        assert_eq!(
            outcome.tree.children(),
            &[Node::new("Num", Range::new(0, 3))]
        );

        assert!(program.parse("123a").is_err());
        assert!(program.parse("42").is_ok());
    }
}
