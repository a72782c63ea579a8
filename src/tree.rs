//! # Parse tree
//!
//! A single generic tree type shared by every recognizer: the bootstrapped grammar recognizer, the interpreter,
//! and the code emitted by the Rust backend.
//!
//! During a parse the root node is used as a scratch stack: rules append their nodes to it, and
//! [`Node::cleanup`] / [`Node::discard`] reconcile it after each successful or failed attempt, only by looking
//! at ranges.

use crate::cursor::DataSource;
use std::fmt;

/// Half-open `[start, end)` span of offsets in the original text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Range {
    /// First covered offset
    pub start: usize,

    /// First offset after the covered text
    pub end: usize,
}

impl Range {
    /// Create a new range
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Get the range's length
    pub fn len(&self) -> usize {
        self.end.saturating_sub(self.start)
    }

    /// Check if the range covers nothing
    pub fn is_empty(&self) -> bool {
        self.end <= self.start
    }

    /// Check if two ranges share at least one offset
    pub fn overlaps(&self, other: Range) -> bool {
        self.start < other.end && other.start < self.end
    }

    /// Exclude an ignorable region from the head or the tail of this range
    ///
    /// Only the part of `ignore` covering the range's head or tail is removed; a region strictly inside the
    /// range leaves it untouched. The start never moves past the end, and the end never goes below the start.
    ///
    /// Returns `true` if the range changed.
    pub fn clip(&mut self, ignore: Range) -> bool {
        let before = *self;

        if ignore.start <= self.start && ignore.end > self.start {
            // Head
            self.start = ignore.end.min(self.end);
        } else if ignore.start < self.end && ignore.end >= self.end {
            // Tail
            self.end = ignore.start.max(self.start);
        }

        if self.end < self.start {
            self.end = self.start;
        }

        *self != before
    }
}

impl From<std::ops::Range<usize>> for Range {
    fn from(range: std::ops::Range<usize>) -> Self {
        Self::new(range.start, range.end)
    }
}

impl fmt::Display for Range {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end)
    }
}

/// A node of the parse tree
///
/// The node only stores offsets; its text is looked up through a [`DataSource`] when asked for.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Node<'n> {
    /// Tag (rule name or grammar name)
    pub(crate) name: &'n str,

    /// Covered text
    pub(crate) range: Range,

    /// Children, in non-decreasing start order and without overlaps
    pub(crate) children: Vec<Node<'n>>,
}

impl<'n> Node<'n> {
    /// Create a childless node
    pub fn new(name: &'n str, range: Range) -> Self {
        Self {
            name,
            range,
            children: vec![],
        }
    }

    /// Create a node with the provided children
    pub fn with_children(name: &'n str, range: Range, children: Vec<Node<'n>>) -> Self {
        Self {
            name,
            range,
            children,
        }
    }

    /// Get the node's tag
    pub fn name(&self) -> &'n str {
        self.name
    }

    /// Rename the node
    pub fn set_name(&mut self, name: &'n str) {
        self.name = name;
    }

    /// Get the node's range
    pub fn range(&self) -> Range {
        self.range
    }

    /// Get the node's children
    pub fn children(&self) -> &[Node<'n>] {
        &self.children
    }

    /// Get the text covered by the node
    pub fn text<'s, S: DataSource + ?Sized>(&self, source: &'s S) -> &'s str {
        source.substring(self.range)
    }

    /// Attach a node as the new last child
    ///
    /// The caller guarantees it doesn't start before the current last child.
    pub fn append(&mut self, node: Node<'n>) {
        debug_assert!(
            self.children.last().map_or(true, |last| last.range.start <= node.range.start),
            "children must be appended in order"
        );

        self.children.push(node);
    }

    /// Reconcile the children after a rule succeeded over `[pos, end)`
    ///
    /// Trailing children ending after `pos` were built during the successful attempt: they are detached
    /// (stopping before any child starting after `end`) and become the children of a new, unnamed node spanning
    /// `[pos, end)`. The caller either appends the returned node or drops it.
    pub fn cleanup(&mut self, pos: usize, end: usize) -> Node<'n> {
        let mut first = self.children.len();

        while first > 0 && self.children[first - 1].range.end > pos {
            first -= 1;
        }

        let mut last = first;

        while last < self.children.len() && self.children[last].range.start <= end {
            last += 1;
        }

        Node {
            name: "",
            range: Range::new(pos, end),
            children: self.children.drain(first..last).collect(),
        }
    }

    /// Drop the children built during an attempt that failed and rewound to `pos`
    ///
    /// Every trailing child ending after `pos` is removed; the others are left untouched.
    pub fn discard(&mut self, pos: usize) {
        let mut keep = self.children.len();

        while keep > 0 && self.children[keep - 1].range.end > pos {
            keep -= 1;
        }

        self.children.truncate(keep);
    }

    /// Find the first descendant (in pre-order, including the node itself) with the provided name
    pub fn find(&self, name: &str) -> Option<&Node<'n>> {
        self.descendants().find(|node| node.name == name)
    }

    /// Iterate over the node and all its descendants in pre-order
    pub fn descendants(&self) -> Descendants<'_, 'n> {
        Descendants { stack: vec![self] }
    }

    /// Render the tree with the text of the leaves
    pub fn dump<S: DataSource + ?Sized>(&self, source: &S) -> String {
        let mut out = String::new();
        self.dump_into(source, 0, &mut out);
        out
    }

    fn dump_into<S: DataSource + ?Sized>(&self, source: &S, depth: usize, out: &mut String) {
        out.push_str(&"  ".repeat(depth));
        out.push_str(&format!("{} {}", self.name, self.range));

        if self.children.is_empty() {
            out.push_str(&format!(" {:?}", self.text(source)));
        }

        out.push('\n');

        for child in &self.children {
            child.dump_into(source, depth + 1, out);
        }
    }
}

impl<'n> fmt::Display for Node<'n> {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        fn write_node(node: &Node, depth: usize, f: &mut fmt::Formatter) -> fmt::Result {
            writeln!(f, "{}{} {}", "  ".repeat(depth), node.name, node.range)?;

            for child in &node.children {
                write_node(child, depth + 1, f)?;
            }

            Ok(())
        }

        write_node(self, 0, f)
    }
}

/// Pre-order iterator over a node and its descendants
pub struct Descendants<'t, 'n> {
    stack: Vec<&'t Node<'n>>,
}

impl<'t, 'n> Iterator for Descendants<'t, 'n> {
    type Item = &'t Node<'n>;

    fn next(&mut self) -> Option<Self::Item> {
        let node = self.stack.pop()?;
        self.stack.extend(node.children.iter().rev());
        Some(node)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn leaf(name: &'static str, start: usize, end: usize) -> Node<'static> {
        Node::new(name, Range::new(start, end))
    }

    #[test]
    fn clip_head_and_tail() {
        let mut range = Range::new(10, 20);
        assert!(range.clip(Range::new(0, 11)));
        assert_eq!(range, Range::new(11, 20));

        let mut range = Range::new(10, 20);
        assert!(range.clip(Range::new(15, 30)));
        assert_eq!(range, Range::new(10, 15));

        let mut range = Range::new(10, 20);
        assert!(!range.clip(Range::new(20, 30)));
        assert_eq!(range, Range::new(10, 20));
    }

    #[test]
    fn clip_inside_is_noop() {
        let mut range = Range::new(0, 10);
        assert!(!range.clip(Range::new(3, 5)));
        assert_eq!(range, Range::new(0, 10));
    }

    #[test]
    fn clip_never_inverts() {
        let mut range = Range::new(10, 20);
        assert!(range.clip(Range::new(0, 30)));
        assert_eq!(range, Range::new(20, 20));
        assert!(range.end >= range.start);
    }

    #[test]
    fn cleanup_promotes_trailing_children() {
        let mut root = Node::with_children(
            "root",
            Range::new(0, 0),
            vec![leaf("a", 0, 2), leaf("b", 2, 4), leaf("c", 4, 6)],
        );

        let node = root.cleanup(2, 6);

        assert_eq!(root.children(), &[leaf("a", 0, 2)]);
        assert_eq!(node.range(), Range::new(2, 6));
        assert_eq!(node.children(), &[leaf("b", 2, 4), leaf("c", 4, 6)]);
    }

    #[test]
    fn cleanup_stops_before_children_after_end() {
        let mut root = Node::with_children(
            "root",
            Range::new(0, 0),
            vec![leaf("a", 0, 2), leaf("b", 2, 4), leaf("c", 5, 6)],
        );

        let node = root.cleanup(1, 4);

        assert_eq!(node.children(), &[leaf("a", 0, 2), leaf("b", 2, 4)]);
        assert_eq!(root.children(), &[leaf("c", 5, 6)]);
    }

    #[test]
    fn cleanup_without_new_children() {
        let mut root = Node::with_children("root", Range::new(0, 0), vec![leaf("a", 0, 2)]);
        let node = root.cleanup(2, 3);

        assert!(node.children().is_empty());
        assert_eq!(root.children().len(), 1);
    }

    #[test]
    fn discard_only_drops_speculative_children() {
        let mut root = Node::with_children(
            "root",
            Range::new(0, 0),
            vec![leaf("a", 0, 2), leaf("b", 2, 3), leaf("c", 3, 5)],
        );

        root.discard(3);
        assert_eq!(root.children(), &[leaf("a", 0, 2), leaf("b", 2, 3)]);

        root.discard(0);
        assert!(root.children().is_empty());
    }

    #[test]
    fn descendants_are_pre_order() {
        let tree = Node::with_children(
            "root",
            Range::new(0, 4),
            vec![
                Node::with_children("x", Range::new(0, 2), vec![leaf("y", 0, 1)]),
                leaf("z", 2, 4),
            ],
        );

        let names: Vec<_> = tree.descendants().map(Node::name).collect();
        assert_eq!(names, ["root", "x", "y", "z"]);
        assert_eq!(tree.find("z").map(Node::range), Some(Range::new(2, 4)));
    }

    #[test]
    fn dump_shows_leaf_text() {
        let tree = Node::with_children(
            "S",
            Range::new(0, 3),
            vec![leaf("A", 0, 1), leaf("B", 2, 3)],
        );

        assert_eq!(
            tree.dump("a b"),
            "S [0, 3)\n  A [0, 1) \"a\"\n  B [2, 3) \"b\"\n"
        );
    }
}
