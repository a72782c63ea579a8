/// Action replacing the default node-creating wrapper of a rule
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum CustomAction {
    /// The rule extends the ignore range instead of creating a node (whitespace, comments...)
    Ignore,

    /// References to the rule are replaced by its body
    Inline,
}

/// Custom action applied to a rule
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RuleOverride {
    pub rule: String,
    pub action: CustomAction,
}

/// Compiler options
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct CompileOptions {
    /// Name of the grammar, given to the root node (defaults to the root rule's name)
    pub grammar_name: Option<String>,

    /// Rule the parse starts with (defaults to the first one)
    pub root_rule: Option<String>,

    /// Custom actions (the last override of a rule wins)
    pub overrides: Vec<RuleOverride>,
}

impl CompileOptions {
    /// Create a new set of compiler options
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the grammar's name
    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.grammar_name = Some(name.into());
        self
    }

    /// Set the rule the parse starts with
    pub fn with_root(mut self, rule: impl Into<String>) -> Self {
        self.root_rule = Some(rule.into());
        self
    }

    /// Apply a custom action to a rule
    pub fn with_override(mut self, rule: impl Into<String>, action: CustomAction) -> Self {
        self.overrides.push(RuleOverride {
            rule: rule.into(),
            action,
        });
        self
    }

    /// Mark a rule as ignorable
    pub fn ignore(self, rule: impl Into<String>) -> Self {
        self.with_override(rule, CustomAction::Ignore)
    }

    /// Mark a rule as inlined
    pub fn inline(self, rule: impl Into<String>) -> Self {
        self.with_override(rule, CustomAction::Inline)
    }

    /// Get the custom action applied to a rule
    pub fn action(&self, rule: &str) -> Option<CustomAction> {
        self.overrides
            .iter()
            .rev()
            .find(|o| o.rule == rule)
            .map(|o| o.action)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_override_wins() {
        let options = CompileOptions::new().ignore("Sp").inline("Sp").ignore("Other");

        assert_eq!(options.action("Sp"), Some(CustomAction::Inline));
        assert_eq!(options.action("Other"), Some(CustomAction::Ignore));
        assert_eq!(options.action("Main"), None);
    }
}
