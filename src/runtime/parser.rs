use super::errors::{ParseError, ParseErrorContent};
use crate::cursor::Cursor;
use crate::tree::{Node, Range};
use tracing::trace;

/// Default maximum number of nested rules
pub const DEFAULT_MAX_DEPTH: usize = 512;

/// State of a single parse
///
/// Every recognizer runs on this type: the bootstrapped grammar recognizer, the [interpreter](crate::codegen::Program)
/// and the code emitted by the Rust backend. All primitives report whether they accepted the input; a primitive that
/// rejects always leaves the position (and the tree) as it found it.
///
/// `'a` is the lifetime of the input, `'n` the one of the node names.
pub struct Parser<'a, 'n> {
    /// Input cursor
    cursor: Cursor<'a>,

    /// Root node, used as a scratch stack of pending children
    root: Node<'n>,

    /// Most recently consumed ignorable span
    ignore: Range,

    /// Rightmost position where a primitive failed
    farthest: usize,

    /// Number of lookaheads currently being evaluated
    lookahead: usize,

    /// Number of nested rules
    depth: usize,

    /// Position where the recursion limit was hit
    overflow: Option<usize>,

    /// Options
    options: ParserOptions,
}

impl<'a, 'n> Parser<'a, 'n> {
    /// Create a parser for an input, with a root node named after the grammar
    pub fn new(input: &'a str, grammar_name: &'n str) -> Self {
        Self::with_options(input, grammar_name, ParserOptions::default())
    }

    /// Create a parser with custom options
    pub fn with_options(input: &'a str, grammar_name: &'n str, options: ParserOptions) -> Self {
        Self {
            cursor: Cursor::new(input),
            root: Node::new(grammar_name, Range::default()),
            ignore: Range::default(),
            farthest: 0,
            lookahead: 0,
            depth: 0,
            overflow: None,
            options,
        }
    }

    /// Get the input
    pub fn input(&self) -> &'a str {
        self.cursor.text()
    }

    /// Get the current position
    pub fn pos(&self) -> usize {
        self.cursor.pos()
    }

    /// Get the tree built so far
    pub fn tree(&self) -> &Node<'n> {
        &self.root
    }

    /// Get the most recently consumed ignorable span
    pub fn ignore_range(&self) -> Range {
        self.ignore
    }

    /// Get the rightmost position where a primitive failed
    pub fn farthest_failure(&self) -> usize {
        self.farthest
    }

    /// Get the options
    pub fn options(&self) -> &ParserOptions {
        &self.options
    }

    /// Save the current position and ignore range
    pub fn save(&self) -> Mark {
        Mark {
            pos: self.cursor.pos(),
            ignore: self.ignore,
        }
    }

    /// Rewind to a save point, dropping the nodes built since then
    pub fn restore(&mut self, mark: Mark) {
        self.cursor.seek(mark.pos);
        self.root.discard(mark.pos);
        self.ignore = mark.ignore;
    }

    /// Record a failure at the current position
    fn fail(&mut self) {
        let pos = self.cursor.pos();

        if self.lookahead == 0 && pos > self.farthest {
            self.farthest = pos;
        }
    }

    /// Consume the next code point if it satisfies a predicate
    fn read_if(&mut self, pred: impl FnOnce(char) -> bool) -> bool {
        match self.cursor.read() {
            Some(c) if pred(c) => true,
            Some(_) => {
                self.cursor.unread();
                self.fail();
                false
            }
            None => {
                self.fail();
                false
            }
        }
    }

    /// Match any code point
    pub fn any_char(&mut self) -> bool {
        self.read_if(|_| true)
    }

    /// Match a code point in an inclusive range
    pub fn in_range(&mut self, lo: char, hi: char) -> bool {
        self.read_if(|c| lo <= c && c <= hi)
    }

    /// Match a code point among a set
    pub fn in_set(&mut self, set: &str) -> bool {
        self.read_if(|c| set.contains(c))
    }

    /// Match a literal
    pub fn next(&mut self, literal: &str) -> bool {
        if self.cursor.rest().starts_with(literal) {
            self.cursor.advance(literal.len());
            true
        } else {
            self.fail();
            false
        }
    }

    /// Run an expression, accepting whether it matched or not
    pub fn maybe(&mut self, expr: impl FnOnce(&mut Self) -> bool) -> bool {
        let mark = self.save();

        if !expr(self) {
            self.restore(mark);
        }

        true
    }

    /// Run an expression as many times as possible
    ///
    /// Stops as soon as an iteration fails, or succeeds without consuming anything.
    pub fn zero_or_more(&mut self, mut expr: impl FnMut(&mut Self) -> bool) -> bool {
        self.repeat(&mut expr);
        true
    }

    /// Run an expression as many times as possible, accepting if it matched at least once
    pub fn one_or_more(&mut self, mut expr: impl FnMut(&mut Self) -> bool) -> bool {
        let mark = self.save();

        if self.repeat(&mut expr) > 0 {
            true
        } else {
            self.restore(mark);
            false
        }
    }

    /// Repeat an expression and return the number of successful iterations
    fn repeat(&mut self, expr: &mut impl FnMut(&mut Self) -> bool) -> usize {
        let mut count = 0;

        loop {
            let mark = self.save();

            if !expr(self) {
                self.restore(mark);
                break count;
            }

            count += 1;

            if self.cursor.pos() == mark.pos {
                break count;
            }
        }
    }

    /// Run a sequence (joined with `&&`) with all-or-nothing backtracking
    pub fn need_all(&mut self, sequence: impl FnOnce(&mut Self) -> bool) -> bool {
        self.attempt(sequence)
    }

    /// Run an ordered choice (joined with `||`), rewinding if no alternative matched
    pub fn need_one(&mut self, choice: impl FnOnce(&mut Self) -> bool) -> bool {
        self.attempt(choice)
    }

    /// Run an expression and rewind if it fails, recording where it stopped
    fn attempt(&mut self, expr: impl FnOnce(&mut Self) -> bool) -> bool {
        let mark = self.save();

        if expr(self) {
            true
        } else {
            self.fail();
            self.restore(mark);
            false
        }
    }

    /// Positive lookahead: report if an expression matches, without consuming anything
    pub fn and(&mut self, expr: impl FnOnce(&mut Self) -> bool) -> bool {
        let mark = self.save();

        self.lookahead += 1;
        let matched = expr(self);
        self.lookahead -= 1;

        self.restore(mark);
        matched
    }

    /// Negative lookahead: report if an expression does not match, without consuming anything
    pub fn not(&mut self, expr: impl FnOnce(&mut Self) -> bool) -> bool {
        !self.and(expr)
    }

    /// Enter a rule, unless the recursion limit is reached
    fn enter(&mut self) -> bool {
        if self.overflow.is_some() {
            return false;
        }

        if self.depth >= self.options.max_depth {
            self.overflow = Some(self.cursor.pos());
            return false;
        }

        self.depth += 1;
        true
    }

    /// Run a rule's body and turn what it matched into a node
    ///
    /// On success, the nodes built by the body become the new node's children and the node's range is clipped
    /// against the ignore range. On failure, the nodes built by the body are discarded.
    pub fn add_node(&mut self, name: &'n str, body: impl FnOnce(&mut Self) -> bool) -> bool {
        if !self.enter() {
            return false;
        }

        let mark = self.save();
        trace!(rule = name, offset = mark.pos, "entering rule");

        let matched = body(self);
        self.depth -= 1;

        if !matched {
            trace!(rule = name, offset = mark.pos, "rule rejected");
            self.restore(mark);
            return false;
        }

        let end = self.cursor.pos();
        let mut node = self.root.cleanup(mark.pos, end);
        node.set_name(name);

        if !self.ignore.is_empty() {
            if node.range.overlaps(self.ignore) {
                node.range.clip(self.ignore);
            } else {
                self.ignore = Range::default();
            }
        }

        trace!(rule = name, range = %node.range, "rule accepted");

        self.root.append(node);
        true
    }

    /// Run an ignorable rule's body (whitespace, comments...)
    ///
    /// No node is created: the matched span extends the ignore range instead, and nodes built by the body are
    /// dropped.
    pub fn ignore(&mut self, body: impl FnOnce(&mut Self) -> bool) -> bool {
        if !self.enter() {
            return false;
        }

        let mark = self.save();
        let matched = body(self);
        self.depth -= 1;

        if !matched {
            self.restore(mark);
            return false;
        }

        let (start, end) = (mark.pos, self.cursor.pos());
        self.root.discard(start);

        if end > start {
            if self.ignore.is_empty() || self.ignore.end < start {
                self.ignore = Range::new(start, end);
            } else {
                self.ignore.end = self.ignore.end.max(end);
            }
        }

        true
    }

    /// Run a rule from the beginning of the input, without requiring it to consume everything
    pub fn run(mut self, rule: impl FnOnce(&mut Self) -> bool) -> Outcome<'n> {
        trace!(
            grammar = self.root.name(),
            len = self.cursor.len(),
            "starting parse"
        );

        let accepted = rule(&mut self);
        let end = self.cursor.pos();

        self.root.range = Range::new(0, end);

        Outcome {
            accepted,
            end,
            farthest_failure: self.farthest,
            overflow: self.overflow,
            tree: self.root,
        }
    }

    /// Run a rule which must match the whole input
    pub fn parse(self, rule: impl FnOnce(&mut Self) -> bool) -> Result<Node<'n>, ParseError> {
        let input = self.cursor.text();
        let max_depth = self.options.max_depth;

        let outcome = self.run(rule);

        if let Some(offset) = outcome.overflow {
            return Err(ParseError::new(
                input,
                offset,
                ParseErrorContent::RecursionLimit(max_depth),
            ));
        }

        if outcome.accepted && outcome.end == input.len() {
            return Ok(outcome.tree);
        }

        Err(ParseError::unexpected(
            input,
            outcome.farthest_failure.max(outcome.end),
        ))
    }
}

/// Save point (position and ignore range)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Mark {
    pos: usize,
    ignore: Range,
}

impl Mark {
    /// Get the saved position
    pub fn pos(&self) -> usize {
        self.pos
    }
}

/// Result of [running](Parser::run) a rule
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Outcome<'n> {
    /// Did the rule accept?
    pub accepted: bool,

    /// Position after the rule
    pub end: usize,

    /// Rightmost position where a primitive failed
    pub farthest_failure: usize,

    /// Position where the recursion limit was hit, if it was
    pub overflow: Option<usize>,

    /// Tree (its root is named after the grammar)
    pub tree: Node<'n>,
}

/// Parser options
#[derive(Debug, Clone, Copy)]
pub struct ParserOptions {
    /// Maximum number of nested rules before the parse is aborted
    pub max_depth: usize,
}

impl ParserOptions {
    /// Create a new set of parser options
    pub fn new() -> Self {
        Self::default()
    }
}

impl Default for ParserOptions {
    fn default() -> Self {
        Self {
            max_depth: DEFAULT_MAX_DEPTH,
        }
    }
}
