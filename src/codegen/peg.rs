use super::{sealed, Backend, FragmentList, GeneratedRule, GrammarInfo};
use crate::compiler::CustomAction;

/// Backend generating PEG source text
///
/// Useful to get back to a grammar's source after compiling it. Sub-expressions are only parenthesized when
/// needed, custom actions are written as trailing comments, and classes are written as a choice of one class per
/// part. Comments, blank lines and additional whitespaces aren't restored.
#[derive(Debug, Clone, Default)]
pub struct PegBackend;

impl PegBackend {
    pub fn new() -> Self {
        Self
    }
}

/// Binding strength of an expression, from loosest to tightest
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Precedence {
    Choice,
    Sequence,
    Prefix,
    Suffix,
    Primary,
}

/// Piece of PEG text
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PegText {
    pub text: String,
    pub precedence: Precedence,
}

impl PegText {
    fn new(text: impl Into<String>, precedence: Precedence) -> Self {
        Self {
            text: text.into(),
            precedence,
        }
    }

    /// Get the text, parenthesized if it binds looser than required
    fn at_least(&self, precedence: Precedence) -> String {
        if self.precedence >= precedence {
            self.text.clone()
        } else {
            format!("({})", self.text)
        }
    }
}

impl sealed::Sealed for PegBackend {}

impl Backend for PegBackend {
    type Fragment = PegText;
    type Group = FragmentList<PegText>;
    type Output = String;

    fn any_char(&mut self) -> PegText {
        PegText::new(".", Precedence::Primary)
    }

    fn in_range(&mut self, lo: char, hi: char) -> PegText {
        PegText::new(
            format!("[{}-{}]", escape_char(lo, ']'), escape_char(hi, ']')),
            Precedence::Primary,
        )
    }

    fn in_set(&mut self, set: &str) -> PegText {
        PegText::new(format!("[{}]", escape_str(set, ']')), Precedence::Primary)
    }

    fn next(&mut self, literal: &str) -> PegText {
        PegText::new(format!("'{}'", escape_str(literal, '\'')), Precedence::Primary)
    }

    fn maybe(&mut self, body: PegText) -> PegText {
        PegText::new(format!("{}?", body.at_least(Precedence::Primary)), Precedence::Suffix)
    }

    fn zero_or_more(&mut self, body: PegText) -> PegText {
        PegText::new(format!("{}*", body.at_least(Precedence::Primary)), Precedence::Suffix)
    }

    fn one_or_more(&mut self, body: PegText) -> PegText {
        PegText::new(format!("{}+", body.at_least(Precedence::Primary)), Precedence::Suffix)
    }

    fn and(&mut self, body: PegText) -> PegText {
        PegText::new(format!("&{}", body.at_least(Precedence::Suffix)), Precedence::Prefix)
    }

    fn not(&mut self, body: PegText) -> PegText {
        PegText::new(format!("!{}", body.at_least(Precedence::Suffix)), Precedence::Prefix)
    }

    fn make_rule_call(&mut self, rule: &str) -> PegText {
        PegText::new(rule, Precedence::Primary)
    }

    fn begin_group(&mut self, require_all: bool) -> Self::Group {
        FragmentList::new(require_all)
    }

    fn end_group(&mut self, group: Self::Group) -> PegText {
        let FragmentList {
            require_all,
            mut members,
        } = group;

        match (members.len(), require_all) {
            (1, _) => members.remove(0),
            (0, true) => PegText::new("()", Precedence::Primary),
            (0, false) => PegText::new("!()", Precedence::Prefix),
            (_, true) => PegText::new(
                members
                    .iter()
                    .map(|member| member.at_least(Precedence::Prefix))
                    .collect::<Vec<_>>()
                    .join(" "),
                Precedence::Sequence,
            ),
            (_, false) => PegText::new(
                members
                    .iter()
                    .map(|member| member.at_least(Precedence::Sequence))
                    .collect::<Vec<_>>()
                    .join(" / "),
                Precedence::Choice,
            ),
        }
    }

    fn add_node(&mut self, body: PegText, _rule: &str) -> PegText {
        body
    }

    fn ignore(&mut self, body: PegText) -> PegText {
        body
    }

    fn function_name(&self, rule: &str) -> String {
        rule.to_string()
    }

    fn finish(self, info: &GrammarInfo, rules: Vec<GeneratedRule<PegText>>) -> String {
        let mut out = format!("# Grammar {} (starts with {})\n\n", info.name, info.root);

        for rule in rules {
            out.push_str(&format!("{} <- {}", rule.name, rule.body.text));

            match rule.action {
                Some(CustomAction::Ignore) => out.push_str(" # ignore"),
                Some(CustomAction::Inline) => out.push_str(" # inline"),
                None => {}
            }

            out.push('\n');
        }

        out
    }
}

/// Escape a string for a literal or a class delimited by `delimiter`
fn escape_str(s: &str, delimiter: char) -> String {
    s.chars().map(|c| escape_char(c, delimiter)).collect()
}

fn escape_char(c: char, delimiter: char) -> String {
    match c {
        '\n' => "\\n".to_string(),
        '\r' => "\\r".to_string(),
        '\t' => "\\t".to_string(),
        '\\' => "\\\\".to_string(),
        // Inside a class, a `-` could be read as a range
        '-' if delimiter == ']' => "\\055".to_string(),
        '[' if delimiter == ']' => "\\[".to_string(),
        c if c == delimiter => format!("\\{}", c),
        c => c.to_string(),
    }
}
