//! Add declare(strict_types=1) to PHP files
//!
//! This is a risky rule because enabling strict types can cause
//! TypeError exceptions in code that was previously working with
//! type coercion.

use sunfix_core::{Finding, Token, TokenKind, TokenStream};

use super::{open_tag, starts_with_long_open_tag, DECLARE_STRICT_TYPES};
use crate::config::{LineEnding, RuleConfig};
use crate::rules::{finish, Mode, Rule, RuleResult};

/// Adds declare(strict_types=1) after the opening PHP tag
#[derive(Debug, Clone, Default)]
pub struct DeclareStrictTypesRule {
    line_ending: LineEnding,
}

impl DeclareStrictTypesRule {
    pub fn new(config: &RuleConfig) -> Self {
        Self {
            line_ending: config.line_ending,
        }
    }

    /// Whitespace between tokens is irrelevant to the statement
    fn has_declaration(stream: &TokenStream) -> bool {
        let significant: Vec<&Token> = stream.iter().filter(|t| t.is_significant()).collect();
        significant.windows(DECLARE_STRICT_TYPES.len()).any(|window| {
            DECLARE_STRICT_TYPES
                .iter()
                .zip(window)
                .all(|(pattern, token)| pattern.matches(token))
        })
    }

    fn statement() -> Vec<Token> {
        vec![
            Token::detached(TokenKind::Declare, "declare"),
            Token::detached(TokenKind::OpenParen, "("),
            Token::detached(TokenKind::Identifier, "strict_types"),
            Token::detached(TokenKind::Equals, "="),
            Token::detached(TokenKind::Number, "1"),
            Token::detached(TokenKind::CloseParen, ")"),
            Token::detached(TokenKind::Semicolon, ";"),
        ]
    }
}

impl Rule for DeclareStrictTypesRule {
    fn id(&self) -> &'static str {
        "declare_strict_types"
    }

    fn description(&self) -> &'static str {
        "Add declare(strict_types=1) at the beginning of PHP files"
    }

    fn priority(&self) -> i32 {
        5
    }

    fn is_risky(&self) -> bool {
        true
    }

    fn is_candidate(&self, stream: &TokenStream) -> bool {
        starts_with_long_open_tag(stream) && stream.is_monolithic()
    }

    fn run(&self, stream: &mut TokenStream, mode: Mode) -> RuleResult {
        if !self.is_candidate(stream) || Self::has_declaration(stream) {
            return Ok(Vec::new());
        }

        let eol = self.line_ending.as_str();
        let mut changeset = stream.begin_changeset();
        let mut statement = Self::statement();

        // A bare `<?php` needs a break before the statement
        let tag = changeset.at(0)?;
        if !tag.text.ends_with(char::is_whitespace) {
            let retagged = open_tag(&format!("{}{}", tag.text, eol));
            changeset.replace_token(0, retagged)?;
        }

        match changeset.get(1) {
            Some(next) if next.is(TokenKind::Whitespace) => {
                let whitespace = Token::new(TokenKind::Whitespace, format!("{}{}", eol, next.text), next.line);
                changeset.replace_token(1, whitespace)?;
            }
            _ => statement.push(Token::detached(TokenKind::Whitespace, eol)),
        }
        changeset.insert_before(1, statement)?;

        let finding = Finding::new(
            self.id(),
            0,
            1,
            "Add declare(strict_types=1) for strict type checking",
        );

        finish(changeset, mode)?;
        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{assert_idempotent, assert_noop_when_not_candidate, check, fix};

    #[test]
    fn test_already_has_strict_types() {
        let (fixed, findings) = fix(&DeclareStrictTypesRule::default(), "<?php\ndeclare(strict_types=1);\n");
        assert_eq!(fixed, "<?php\ndeclare(strict_types=1);\n");
        assert!(findings.is_empty());
    }

    #[test]
    fn test_already_has_strict_types_with_space() {
        let source = "<?php\nDECLARE ( strict_types = 1 );\n";
        let (fixed, findings) = fix(&DeclareStrictTypesRule::default(), source);
        assert_eq!(fixed, source);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_adds_strict_types() {
        let (fixed, findings) = fix(&DeclareStrictTypesRule::default(), "<?php\nnamespace App;\n");
        assert_eq!(fixed, "<?php\ndeclare(strict_types=1);\nnamespace App;\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_keeps_blank_line_after_tag() {
        let (fixed, _) = fix(&DeclareStrictTypesRule::default(), "<?php\n\nnamespace App;\n");
        assert_eq!(fixed, "<?php\ndeclare(strict_types=1);\n\nnamespace App;\n");
    }

    #[test]
    fn test_crlf() {
        let rule = DeclareStrictTypesRule::new(&RuleConfig {
            line_ending: LineEnding::CrLf,
            ..Default::default()
        });
        let (fixed, _) = fix(&rule, "<?php\r\necho 1;\r\n");
        assert_eq!(fixed, "<?php\r\ndeclare(strict_types=1);\r\necho 1;\r\n");
    }

    #[test]
    fn test_not_candidate() {
        let rule = DeclareStrictTypesRule::default();
        assert!(!rule.is_candidate(&TokenStream::from_source("<html><?php echo 1; ?></html>")));
        assert!(!rule.is_candidate(&TokenStream::from_source("<?= $a ?>")));
        assert!(!rule.is_candidate(&TokenStream::from_source("")));
    }

    #[test]
    fn test_bare_open_tag() {
        let (fixed, findings) = fix(&DeclareStrictTypesRule::default(), "<?php");
        assert_eq!(fixed, "<?php\ndeclare(strict_types=1);\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_mixed_html_and_echo_tags_untouched() {
        let rule = DeclareStrictTypesRule::default();
        assert_noop_when_not_candidate(&rule, "<p>\n<?php\n$a = 1;\n");
        assert_noop_when_not_candidate(&rule, "<?= $a ?>");
    }

    #[test]
    fn test_check_mode() {
        assert_eq!(check(&DeclareStrictTypesRule::default(), "<?php\n$a = 1;\n").len(), 1);
    }

    #[test]
    fn test_is_risky() {
        assert!(DeclareStrictTypesRule::default().is_risky());
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent(&DeclareStrictTypesRule::default(), "<?php\n\nclass A {}\n");
    }
}
