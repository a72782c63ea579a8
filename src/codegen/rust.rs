use super::{sealed, Backend, FragmentList, GeneratedRule, GrammarInfo};
use proc_macro2::TokenStream;
use quote::{format_ident, quote};

/// Backend generating Rust code
///
/// Each rule becomes a `rule_<Name>` function inside a `rules` module, and the output gets `parse`, `parse_with`
/// and `recognize` entry points:
///
/// ```ignore
/// pub const GRAMMAR_NAME: &str = "Num";
///
/// pub fn parse(input: &str) -> Result<Node<'static>, ParseError> { /* ... */ }
///
/// pub mod rules {
///     pub fn rule_Num(p: &mut Parser) -> bool {
///         p.add_node("Num", |p| p.one_or_more(|p| p.in_range('0', '9')))
///     }
/// }
/// ```
pub struct RustBackend {
    /// Path to this crate from the generated code
    crate_path: TokenStream,
}

impl RustBackend {
    /// Create a backend for code living outside of this crate
    pub fn new() -> Self {
        Self {
            crate_path: quote! { ::pegc },
        }
    }

    /// Use a custom path to this crate (e.g. `crate` for code generated inside it)
    pub fn with_crate_path(crate_path: TokenStream) -> Self {
        Self { crate_path }
    }
}

impl Default for RustBackend {
    fn default() -> Self {
        Self::new()
    }
}

impl sealed::Sealed for RustBackend {}

impl Backend for RustBackend {
    type Fragment = TokenStream;
    type Group = FragmentList<TokenStream>;
    type Output = TokenStream;

    fn any_char(&mut self) -> TokenStream {
        quote! { p.any_char() }
    }

    fn in_range(&mut self, lo: char, hi: char) -> TokenStream {
        quote! { p.in_range(#lo, #hi) }
    }

    fn in_set(&mut self, set: &str) -> TokenStream {
        quote! { p.in_set(#set) }
    }

    fn next(&mut self, literal: &str) -> TokenStream {
        quote! { p.next(#literal) }
    }

    fn maybe(&mut self, body: TokenStream) -> TokenStream {
        quote! { p.maybe(|p| #body) }
    }

    fn zero_or_more(&mut self, body: TokenStream) -> TokenStream {
        quote! { p.zero_or_more(|p| #body) }
    }

    fn one_or_more(&mut self, body: TokenStream) -> TokenStream {
        quote! { p.one_or_more(|p| #body) }
    }

    fn and(&mut self, body: TokenStream) -> TokenStream {
        quote! { p.and(|p| #body) }
    }

    fn not(&mut self, body: TokenStream) -> TokenStream {
        quote! { p.not(|p| #body) }
    }

    fn make_rule_call(&mut self, rule: &str) -> TokenStream {
        let function = format_ident!("{}", self.function_name(rule));
        quote! { #function(p) }
    }

    fn begin_group(&mut self, require_all: bool) -> Self::Group {
        FragmentList::new(require_all)
    }

    fn end_group(&mut self, group: Self::Group) -> TokenStream {
        let FragmentList {
            require_all,
            mut members,
        } = group;

        if members.len() == 1 {
            return members.remove(0);
        }

        // Every fragment is a call or a literal, so they can be joined without parentheses
        let joined = members.into_iter().reduce(|acc, member| {
            if require_all {
                quote! { #acc && #member }
            } else {
                quote! { #acc || #member }
            }
        });

        match (require_all, joined) {
            (true, None) => quote! { true },
            (false, None) => quote! { p.need_one(|p| false) },
            (true, Some(joined)) => quote! { p.need_all(|p| #joined) },
            (false, Some(joined)) => quote! { p.need_one(|p| #joined) },
        }
    }

    fn add_node(&mut self, body: TokenStream, rule: &str) -> TokenStream {
        quote! { p.add_node(#rule, |p| #body) }
    }

    fn ignore(&mut self, body: TokenStream) -> TokenStream {
        quote! { p.ignore(|p| #body) }
    }

    fn function_name(&self, rule: &str) -> String {
        format!("rule_{}", rule)
    }

    fn finish(self, info: &GrammarInfo, rules: Vec<GeneratedRule<TokenStream>>) -> TokenStream {
        let krate = &self.crate_path;
        let name = &info.name;
        let root = format_ident!("{}", self.function_name(&info.root));

        let functions = rules.into_iter().map(|rule| {
            let function = format_ident!("{}", rule.function);
            let body = rule.body;
            let doc = format!("Rule `{}`", rule.name);

            quote! {
                #[doc = #doc]
                pub fn #function(p: &mut P) -> bool {
                    #body
                }
            }
        });

        quote! {
            /// Name of the root node
            pub const GRAMMAR_NAME: &str = #name;

            /// Parse an input, which must be entirely consumed
            pub fn parse(input: &str) -> ::std::result::Result<#krate::tree::Node<'static>, #krate::runtime::ParseError> {
                parse_with(input, #krate::runtime::ParserOptions::default())
            }

            /// Parse an input with custom options
            pub fn parse_with(
                input: &str,
                options: #krate::runtime::ParserOptions,
            ) -> ::std::result::Result<#krate::tree::Node<'static>, #krate::runtime::ParseError> {
                #krate::runtime::Parser::with_options(input, GRAMMAR_NAME, options).parse(rules::#root)
            }

            /// Run the root rule without requiring the whole input to be consumed
            pub fn recognize(input: &str) -> #krate::runtime::Outcome<'static> {
                #krate::runtime::Parser::new(input, GRAMMAR_NAME).run(rules::#root)
            }

            #[allow(non_snake_case, dead_code, unused_parens, unused_variables, clippy::all)]
            pub mod rules {
                type P<'a> = #krate::runtime::Parser<'a, 'static>;

                #(#functions)*
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codegen::Group;

    fn group(backend: &mut RustBackend, require_all: bool, members: Vec<TokenStream>) -> TokenStream {
        let mut group = backend.begin_group(require_all);

        for member in members {
            group.add(member);
        }

        backend.end_group(group)
    }

    #[test]
    fn primitives() {
        let mut backend = RustBackend::new();

        assert_eq!(
            backend.in_range('0', '9').to_string(),
            quote! { p.in_range('0', '9') }.to_string()
        );

        let body = backend.any_char();
        assert_eq!(
            backend.not(body).to_string(),
            quote! { p.not(|p| p.any_char()) }.to_string()
        );

        assert_eq!(
            backend.make_rule_call("Expr").to_string(),
            quote! { rule_Expr(p) }.to_string()
        );
    }

    #[test]
    fn groups() {
        let mut backend = RustBackend::new();

        let a = backend.next("a");
        let b = backend.next("b");
        assert_eq!(
            group(&mut backend, true, vec![a, b]).to_string(),
            quote! { p.need_all(|p| p.next("a") && p.next("b")) }.to_string()
        );

        let a = backend.next("a");
        let b = backend.in_set("xy");
        assert_eq!(
            group(&mut backend, false, vec![a, b]).to_string(),
            quote! { p.need_one(|p| p.next("a") || p.in_set("xy")) }.to_string()
        );

        let a = backend.next("a");
        assert_eq!(
            group(&mut backend, false, vec![a]).to_string(),
            quote! { p.next("a") }.to_string()
        );

        assert_eq!(group(&mut backend, true, vec![]).to_string(), "true");
        assert_eq!(
            group(&mut backend, false, vec![]).to_string(),
            quote! { p.need_one(|p| false) }.to_string()
        );
    }

    #[test]
    fn rule_functions() {
        let mut backend = RustBackend::with_crate_path(quote! { crate });
        let body = backend.any_char();
        let body = backend.add_node(body, "Any");

        let output = backend.finish(
            &GrammarInfo {
                name: "Any".to_string(),
                root: "Any".to_string(),
            },
            vec![GeneratedRule {
                name: "Any".to_string(),
                function: "rule_Any".to_string(),
                body,
                action: None,
            }],
        );

        let code = output.to_string();
        assert!(code.contains(&quote! { pub const GRAMMAR_NAME: &str = "Any"; }.to_string()));
        assert!(code.contains(&quote! { pub fn rule_Any(p: &mut P) -> bool { p.add_node("Any", |p| p.any_char()) } }.to_string()));
        assert!(code.contains(&quote! { .run(rules::rule_Any) }.to_string()));
    }
}
