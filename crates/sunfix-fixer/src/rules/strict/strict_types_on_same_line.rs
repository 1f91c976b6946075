//! Move declare(strict_types=1) onto the opening tag line

use sunfix_core::{Finding, TokenKind, TokenStream};

use super::{open_tag, starts_with_long_open_tag, DECLARE_STRICT_TYPES};
use crate::rules::{finish, Mode, Rule, RuleResult};

const SAME_LINE_TAG: &str = "<?php ";

/// Strict type declaration has to be on the same line as the opening tag
pub struct StrictTypesOnSameLineRule;

impl Rule for StrictTypesOnSameLineRule {
    fn id(&self) -> &'static str {
        "strict_types_on_same_line"
    }

    fn description(&self) -> &'static str {
        "Strict type declaration has to be on the same line as the opening tag"
    }

    /// Must run after declare_strict_types
    fn priority(&self) -> i32 {
        0
    }

    /// Short echo tags and mixed HTML files are left alone
    fn is_candidate(&self, stream: &TokenStream) -> bool {
        starts_with_long_open_tag(stream)
            && stream.is_monolithic()
            && stream.contains_all_kinds(&[
                TokenKind::Whitespace,
                TokenKind::Declare,
                TokenKind::Equals,
                TokenKind::Number,
                TokenKind::Semicolon,
            ])
    }

    fn run(&self, stream: &mut TokenStream, mode: Mode) -> RuleResult {
        if !self.is_candidate(stream) {
            return Ok(Vec::new());
        }

        let Some(declare) = stream.next_meaningful(0) else {
            return Ok(Vec::new());
        };
        let placed_first = stream
            .find_sequence(&DECLARE_STRICT_TYPES, declare)
            .is_some_and(|found| found.start == declare);
        if !placed_first {
            return Ok(Vec::new());
        }

        let retag = stream.at(0)?.text != SAME_LINE_TAG;
        if !retag && declare == 1 {
            return Ok(Vec::new());
        }

        let finding = Finding::new(
            self.id(),
            0,
            1,
            format!(
                "Strict type declaration on line {} has to be on the same line as the opening tag",
                stream.at(declare)?.line
            ),
        );

        let mut changeset = stream.begin_changeset();
        if retag {
            changeset.replace_token(0, open_tag(SAME_LINE_TAG))?;
        }
        changeset.clear_range(1..declare)?;
        finish(changeset, mode)?;

        Ok(vec![finding])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{assert_idempotent, assert_noop_when_not_candidate, check, fix};

    #[test]
    fn test_blank_line_collapsed() {
        let (fixed, findings) = fix(
            &StrictTypesOnSameLineRule,
            "<?php\n\ndeclare(strict_types=1);\n\nnamespace SomeNamespace;\n",
        );
        assert_eq!(fixed, "<?php declare(strict_types=1);\n\nnamespace SomeNamespace;\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(
            findings[0].message,
            "Strict type declaration on line 3 has to be on the same line as the opening tag"
        );
    }

    #[test]
    fn test_next_line_joined() {
        let (fixed, _) = fix(
            &StrictTypesOnSameLineRule,
            "<?php\ndeclare(strict_types=1);\n\nnamespace App;\n",
        );
        assert_eq!(fixed, "<?php declare(strict_types=1);\n\nnamespace App;\n");
    }

    #[test]
    fn test_already_on_same_line() {
        let source = "<?php declare(strict_types=1);\n\nnamespace App;\n";
        let (fixed, findings) = fix(&StrictTypesOnSameLineRule, source);
        assert_eq!(fixed, source);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_missing_declare_unchanged() {
        let source = "<?php\n\nnamespace App;\n\n$a = 1;\n";
        let (fixed, findings) = fix(&StrictTypesOnSameLineRule, source);
        assert_eq!(fixed, source);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_declare_not_first_unchanged() {
        let source = "<?php\n\n$a = 1;\ndeclare(strict_types=1);\n";
        let (fixed, findings) = fix(&StrictTypesOnSameLineRule, source);
        assert_eq!(fixed, source);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_comment_before_declare_cleared() {
        let source = "<?php\n// header\ndeclare(strict_types=1);\n";
        let (fixed, _) = fix(&StrictTypesOnSameLineRule, source);
        assert_eq!(fixed, "<?php declare(strict_types=1);\n");
    }

    #[test]
    fn test_spaced_declare_unchanged() {
        let source = "<?php\n\ndeclare(strict_types = 1);\n";
        let (fixed, findings) = fix(&StrictTypesOnSameLineRule, source);
        assert_eq!(fixed, source);
        assert!(findings.is_empty());
    }

    #[test]
    fn test_mixed_html_and_echo_tags_ignored() {
        assert_noop_when_not_candidate(
            &StrictTypesOnSameLineRule,
            "<p>\n<?php\n\ndeclare(strict_types=1);\n",
        );
        assert_noop_when_not_candidate(
            &StrictTypesOnSameLineRule,
            "<?=\n\ndeclare(strict_types=1); ?>",
        );
    }

    #[test]
    fn test_check_mode() {
        let findings = check(&StrictTypesOnSameLineRule, "<?php\n\ndeclare(strict_types=1);\n");
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].position, 0);
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent(
            &StrictTypesOnSameLineRule,
            "<?php\n\n\ndeclare(strict_types=1);\n\nclass A {}\n",
        );
    }
}
