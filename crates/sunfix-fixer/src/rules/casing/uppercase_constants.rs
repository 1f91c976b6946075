//! Write the native constants true, false and null in uppercase

use sunfix_core::{Finding, Token, TokenKind, TokenStream};

use crate::rules::{finish, Mode, Rule, RuleResult};

/// Neighbour kinds that make a `true`/`false`/`null` word a name rather
/// than a constant, e.g. `Foo::null` or `new False()`
const FORBIDDEN_NEIGHBOURS: &[TokenKind] = &[
    TokenKind::As,
    TokenKind::Class,
    TokenKind::Const,
    TokenKind::Extends,
    TokenKind::Implements,
    TokenKind::Instanceof,
    TokenKind::Insteadof,
    TokenKind::Interface,
    TokenKind::New,
    TokenKind::NsSeparator,
    TokenKind::DoubleColon,
    TokenKind::Trait,
    TokenKind::Use,
    TokenKind::OpenBrace,
    TokenKind::CloseBrace,
];

/// The PHP constants `TRUE`, `FALSE` and `NULL` must be in upper case
pub struct UppercaseConstantsRule;

impl UppercaseConstantsRule {
    fn is_neighbour_accepted(stream: &TokenStream, index: Option<usize>) -> bool {
        index
            .and_then(|i| stream.get(i))
            .map_or(true, |token| !token.is_any(FORBIDDEN_NEIGHBOURS))
    }
}

impl Rule for UppercaseConstantsRule {
    fn id(&self) -> &'static str {
        "uppercase_constants"
    }

    fn description(&self) -> &'static str {
        "The PHP constants TRUE, FALSE and NULL must be in upper case"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, stream: &TokenStream) -> bool {
        stream.contains_kind(TokenKind::NativeConstant)
    }

    fn run(&self, stream: &mut TokenStream, mode: Mode) -> RuleResult {
        let mut findings = Vec::new();
        let mut changeset = stream.begin_changeset();

        for index in 0..changeset.len() {
            let token = changeset.at(index)?;
            if !token.is_native_constant() {
                continue;
            }

            let upper = token.text.to_ascii_uppercase();
            if token.text == upper {
                continue;
            }

            if !Self::is_neighbour_accepted(&changeset, changeset.previous_meaningful(index))
                || !Self::is_neighbour_accepted(&changeset, changeset.next_meaningful(index))
            {
                continue;
            }

            let line = token.line;
            findings.push(Finding::new(
                self.id(),
                index,
                line,
                format!("Constant \"{}\" must be written as \"{}\"", token.text, upper),
            ));
            changeset.replace_token(index, Token::new(TokenKind::NativeConstant, upper, line))?;
        }

        finish(changeset, mode)?;
        Ok(findings)
    }
}
