use super::{
    prefixes, primary_content, sequences, split_prefix, split_suffix, Definition, Grammar,
    GrammarError, Kind, ModelError,
};
use crate::tree::Node;
use std::collections::HashMap;
use tracing::warn;

/// Validate a grammar
///
/// Checks that rules are declared once, that every referenced rule exists and that no rule can call itself
/// without consuming input. Unused rules and repetitions of expressions that can match nothing are reported
/// as warnings.
pub fn validate(grammar: &Grammar) -> Result<(), GrammarError> {
    let definitions = grammar.definitions()?;

    if definitions.is_empty() {
        return Err(GrammarError::NoRules);
    }

    // Index rules by name
    let mut index = HashMap::new();

    for (i, definition) in definitions.iter().enumerate() {
        if let Some(&first) = index.get(definition.name) {
            let first: &Definition = &definitions[first];

            return Err(GrammarError::DuplicateRule {
                name: definition.name.to_string(),
                location: grammar.location(definition.identifier),
                first: grammar.location(first.identifier),
            });
        }

        index.insert(definition.name, i);
    }

    // Resolve references
    let mut references = vec![];

    for definition in &definitions {
        let mut called = vec![];

        for identifier in definition
            .expression
            .descendants()
            .filter(|node| node.name() == Kind::Identifier.as_str())
        {
            let name = grammar.text(identifier);

            match index.get(name) {
                Some(&i) => called.push(i),
                None => {
                    return Err(GrammarError::UnknownRule {
                        name: name.to_string(),
                        location: grammar.location(identifier),
                    })
                }
            }
        }

        references.push(called);
    }

    let analysis = Analysis::new(grammar, &definitions, &index)?;

    analysis.check_left_recursion()?;
    analysis.warn_empty_repetitions()?;

    // Report rules that can't be reached from the first one
    let mut reached = vec![false; definitions.len()];
    let mut queue = vec![0];

    while let Some(rule) = queue.pop() {
        if !reached[rule] {
            reached[rule] = true;
            queue.extend(&references[rule]);
        }
    }

    for (definition, reached) in definitions.iter().zip(reached) {
        if !reached {
            warn!(
                rule = definition.name,
                location = %grammar.location(definition.identifier),
                "rule is never used"
            );
        }
    }

    Ok(())
}

/// Emptiness and first-call analysis of a grammar's rules
struct Analysis<'a, 'g, 's> {
    grammar: &'a Grammar<'s>,
    definitions: &'a [Definition<'g, 's>],
    index: &'a HashMap<&'s str, usize>,

    /// Which rules can succeed without consuming anything
    nullable: Vec<bool>,
}

impl<'a, 'g, 's> Analysis<'a, 'g, 's> {
    fn new(
        grammar: &'a Grammar<'s>,
        definitions: &'a [Definition<'g, 's>],
        index: &'a HashMap<&'s str, usize>,
    ) -> Result<Self, ModelError> {
        let mut analysis = Self {
            grammar,
            definitions,
            index,
            nullable: vec![false; definitions.len()],
        };

        // Iterate until a fixed point is reached: a rule can only go from non-nullable to nullable
        loop {
            let mut changed = false;

            for (i, definition) in definitions.iter().enumerate() {
                if !analysis.nullable[i] && analysis.is_nullable(definition.expression)? {
                    analysis.nullable[i] = true;
                    changed = true;
                }
            }

            if !changed {
                break Ok(analysis);
            }
        }
    }

    /// Check if an expression node can succeed without consuming anything
    fn is_nullable(&self, node: &Node) -> Result<bool, ModelError> {
        Ok(match Kind::of(node)? {
            Kind::Expression => {
                let alternatives = sequences(node)?;

                alternatives.is_empty() || self.any_nullable(&alternatives)?
            }

            Kind::Sequence => {
                for prefix in prefixes(node)? {
                    if !self.is_nullable(prefix)? {
                        return Ok(false);
                    }
                }

                true
            }

            Kind::Prefix => {
                let (operator, suffix) = split_prefix(node)?;
                operator.is_some() || self.is_nullable(suffix)?
            }

            Kind::Suffix => {
                let (primary, operator) = split_suffix(node)?;
                matches!(operator, Some(Kind::Question | Kind::Star)) || self.is_nullable(primary)?
            }

            Kind::Primary => self.is_nullable(primary_content(node)?.1)?,

            Kind::Identifier => self
                .index
                .get(self.grammar.text(node))
                .map_or(false, |&i| self.nullable[i]),

            // Only the quotes
            Kind::Literal => self.grammar.text(node).len() <= 2,

            Kind::Class | Kind::Dot => false,

            found => {
                return Err(ModelError::Unexpected {
                    found,
                    parent: Kind::Primary,
                    range: node.range(),
                })
            }
        })
    }

    fn any_nullable(&self, nodes: &[&Node]) -> Result<bool, ModelError> {
        for node in nodes {
            if self.is_nullable(node)? {
                return Ok(true);
            }
        }

        Ok(false)
    }

    /// Collect the rules an expression may call before consuming anything
    fn first_calls<'t>(
        &self,
        node: &'t Node<'s>,
        out: &mut Vec<(usize, &'t Node<'s>)>,
    ) -> Result<(), ModelError> {
        match Kind::of(node)? {
            Kind::Expression => {
                for sequence in sequences(node)? {
                    self.first_calls(sequence, out)?;
                }
            }

            Kind::Sequence => {
                for prefix in prefixes(node)? {
                    self.first_calls(prefix, out)?;

                    if !self.is_nullable(prefix)? {
                        break;
                    }
                }
            }

            Kind::Prefix => self.first_calls(split_prefix(node)?.1, out)?,
            Kind::Suffix => self.first_calls(split_suffix(node)?.0, out)?,
            Kind::Primary => self.first_calls(primary_content(node)?.1, out)?,

            Kind::Identifier => {
                if let Some(&i) = self.index.get(self.grammar.text(node)) {
                    out.push((i, node));
                }
            }

            _ => {}
        }

        Ok(())
    }

    /// Look for a rule which can call itself without consuming anything
    fn check_left_recursion(&self) -> Result<(), GrammarError> {
        let mut graph = vec![];

        for definition in self.definitions {
            let mut calls = vec![];
            self.first_calls(definition.expression, &mut calls)?;
            graph.push(calls);
        }

        let mut state = vec![Visit::New; self.definitions.len()];
        let mut stack = vec![];

        for rule in 0..self.definitions.len() {
            self.visit(rule, &graph, &mut state, &mut stack)?;
        }

        Ok(())
    }

    fn visit(
        &self,
        rule: usize,
        graph: &[Vec<(usize, &Node<'s>)>],
        state: &mut [Visit],
        stack: &mut Vec<usize>,
    ) -> Result<(), GrammarError> {
        if state[rule] != Visit::New {
            return Ok(());
        }

        state[rule] = Visit::Active;
        stack.push(rule);

        for &(callee, call_site) in &graph[rule] {
            match state[callee] {
                Visit::Done => {}

                Visit::Active => {
                    let from = stack.iter().position(|&r| r == callee).unwrap_or(0);

                    let cycle = stack[from..]
                        .iter()
                        .chain(std::iter::once(&callee))
                        .map(|&r| self.definitions[r].name.to_string())
                        .collect();

                    return Err(GrammarError::LeftRecursion {
                        cycle,
                        location: self.grammar.location(call_site),
                    });
                }

                Visit::New => self.visit(callee, graph, state, stack)?,
            }
        }

        stack.pop();
        state[rule] = Visit::Done;

        Ok(())
    }

    /// Warn about `e*` and `e+` where `e` can match nothing
    fn warn_empty_repetitions(&self) -> Result<(), ModelError> {
        for definition in self.definitions {
            for suffix in definition
                .expression
                .descendants()
                .filter(|node| node.name() == Kind::Suffix.as_str())
            {
                let (primary, operator) = split_suffix(suffix)?;

                if matches!(operator, Some(Kind::Star | Kind::Plus)) && self.is_nullable(primary)? {
                    warn!(
                        rule = definition.name,
                        location = %self.grammar.location(suffix),
                        "repeated expression can match nothing"
                    );
                }
            }
        }

        Ok(())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Visit {
    New,
    Active,
    Done,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    fn check(source: &str) -> Result<(), GrammarError> {
        Grammar::parse(source).map(|_| ())
    }

    #[rstest]
    #[case("A <- 'a' B\nB <- [b]*")]
    #[case("A <- B? 'x'\nB <- 'b'")]
    #[case("Expr <- Term ('+' Term)*\nTerm <- [0-9]+ / '(' Expr ')'")]
    #[case("List <- '[' (Item (',' Item)*)? ']'\nItem <- List / 'x'")]
    fn accepts(#[case] source: &str) {
        check(source).unwrap();
    }

    #[test]
    fn duplicate_rule() {
        let err = check("A <- 'a'\nA <- 'b'").unwrap_err();

        match err {
            GrammarError::DuplicateRule { name, location, first } => {
                assert_eq!(name, "A");
                assert_eq!((location.line, location.column), (2, 1));
                assert_eq!((first.line, first.column), (1, 1));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn unknown_rule() {
        let err = check("A <- 'a' Missing").unwrap_err();

        match err {
            GrammarError::UnknownRule { name, location } => {
                assert_eq!(name, "Missing");
                assert_eq!(location.column, 10);
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[rstest]
    #[case("A <- A 'a' / 'b'", &["A", "A"])]
    #[case("A <- B 'a'\nB <- C\nC <- A / 'c'", &["A", "B", "C", "A"])]
    #[case("A <- B? A 'x'\nB <- 'b'", &["A", "A"])]
    #[case("A <- Empty A\nEmpty <- 'e'*", &["A", "A"])]
    #[case("A <- &A 'x'", &["A", "A"])]
    fn left_recursion(#[case] source: &str, #[case] expected: &[&str]) {
        match check(source).unwrap_err() {
            GrammarError::LeftRecursion { cycle, .. } => assert_eq!(cycle, expected),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn recursion_after_input_is_fine() {
        check("A <- 'a' A / 'b'").unwrap();
    }

    #[test]
    fn unchecked_grammar_skips_validation() {
        assert!(Grammar::parse_nocheck("A <- A").is_ok());
        assert!(Grammar::parse("A <- A").is_err());
    }

    #[test]
    fn syntax_errors_are_forwarded() {
        assert!(matches!(check("A <- ("), Err(GrammarError::Syntax(_))));
    }
}
