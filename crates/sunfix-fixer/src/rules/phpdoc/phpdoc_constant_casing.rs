//! Uppercase true, false and null inside PHPDoc types

use std::sync::OnceLock;

use regex::Regex;
use sunfix_core::{Finding, Token, TokenKind, TokenStream};

use crate::rules::{finish, Mode, Rule, RuleResult};

/// Annotation tags followed by a type expression. Group 2 is the type.
fn type_tag() -> &'static Regex {
    static TYPE_TAG: OnceLock<Regex> = OnceLock::new();
    TYPE_TAG.get_or_init(|| {
        Regex::new(
            r"@(property-read|property-write|property|method|param|return|throws|type|var)[ \t]+(?:static[ \t]+)?([^\s]+)",
        )
        .expect("valid regex")
    })
}

const CONSTANTS: &[&str] = &["true", "false", "null"];

/// PHP constants in docblock types must be uppercase
pub struct PhpdocConstantCasingRule;

impl PhpdocConstantCasingRule {
    /// Normalize a whole type expression such as `?null|Foo[]`
    fn normalize_type(expr: &str) -> String {
        let mut out = String::with_capacity(expr.len());
        let mut part_start = 0;

        for (i, c) in expr.char_indices() {
            if c == '|' || c == '&' {
                out.push_str(&Self::normalize_part(&expr[part_start..i]));
                out.push(c);
                part_start = i + 1;
            }
        }
        out.push_str(&Self::normalize_part(&expr[part_start..]));
        out
    }

    /// Uppercase one union member if, without `?`, parentheses and array
    /// suffixes, it is a native constant
    fn normalize_part(part: &str) -> String {
        let core = part.trim_start_matches(|c| c == '?' || c == '(');
        let prefix = &part[..part.len() - core.len()];

        let mut name = core;
        loop {
            if let Some(stripped) = name.strip_suffix("[]") {
                name = stripped;
            } else if let Some(stripped) = name.strip_suffix(')') {
                name = stripped;
            } else {
                break;
            }
        }
        let suffix = &core[name.len()..];

        if CONSTANTS.iter().any(|c| name.eq_ignore_ascii_case(c)) {
            format!("{}{}{}", prefix, name.to_ascii_uppercase(), suffix)
        } else {
            part.to_string()
        }
    }
}

impl Rule for PhpdocConstantCasingRule {
    fn id(&self) -> &'static str {
        "phpdoc_constant_casing"
    }

    fn description(&self) -> &'static str {
        "PHP constants in PHPDoc types must be uppercase"
    }

    /// Runs before other docblock rules so alignment sees the final types
    fn priority(&self) -> i32 {
        16
    }

    fn is_candidate(&self, stream: &TokenStream) -> bool {
        stream.contains_kind(TokenKind::DocComment)
    }

    fn run(&self, stream: &mut TokenStream, mode: Mode) -> RuleResult {
        let mut findings = Vec::new();
        let mut changeset = stream.begin_changeset();

        for index in 0..changeset.len() {
            let token = changeset.at(index)?;
            if !token.is(TokenKind::DocComment) {
                continue;
            }

            let mut text = String::with_capacity(token.text.len());
            let mut cursor = 0;
            for caps in type_tag().captures_iter(&token.text) {
                let Some(ty) = caps.get(2) else { continue };
                let normalized = Self::normalize_type(ty.as_str());
                if normalized == ty.as_str() {
                    continue;
                }

                let line = token.line + token.text[..ty.start()].matches('\n').count();
                findings.push(Finding::new(
                    self.id(),
                    index,
                    line,
                    format!(
                        "PHPDoc type \"{}\" should be \"{}\"",
                        ty.as_str(),
                        normalized
                    ),
                ));
                text.push_str(&token.text[cursor..ty.start()]);
                text.push_str(&normalized);
                cursor = ty.end();
            }

            if cursor == 0 {
                continue;
            }
            text.push_str(&token.text[cursor..]);
            let line = token.line;
            changeset.replace_token(index, Token::new(TokenKind::DocComment, text, line))?;
        }

        finish(changeset, mode)?;
        Ok(findings)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::test_support::{assert_idempotent, assert_noop_when_not_candidate, check, fix};

    #[test]
    fn test_normalize_type() {
        assert_eq!(PhpdocConstantCasingRule::normalize_type("null"), "NULL");
        assert_eq!(PhpdocConstantCasingRule::normalize_type("?false"), "?FALSE");
        assert_eq!(PhpdocConstantCasingRule::normalize_type("null[]"), "NULL[]");
        assert_eq!(
            PhpdocConstantCasingRule::normalize_type("(true|int)[]"),
            "(TRUE|int)[]"
        );
        assert_eq!(
            PhpdocConstantCasingRule::normalize_type("Foo&null|string"),
            "Foo&NULL|string"
        );
        assert_eq!(PhpdocConstantCasingRule::normalize_type("nullable"), "nullable");
        assert_eq!(PhpdocConstantCasingRule::normalize_type("String[]"), "String[]");
    }

    #[test]
    fn test_param_and_return() {
        let source = "<?php\n/**\n * @param string|String[] $bar\n *\n * @return null[]\n */\n";
        let (fixed, findings) = fix(&PhpdocConstantCasingRule, source);
        assert_eq!(
            fixed,
            "<?php\n/**\n * @param string|String[] $bar\n *\n * @return NULL[]\n */\n"
        );
        assert_eq!(findings.len(), 1);
        assert_eq!(findings[0].line, 5);
        assert_eq!(findings[0].message, "PHPDoc type \"null[]\" should be \"NULL[]\"");
    }

    #[test]
    fn test_all_type_tags() {
        let source = "<?php\n/**\n * @var null\n * @property-read true $a\n * @method static false foo()\n * @throws null\n */\n";
        let (fixed, findings) = fix(&PhpdocConstantCasingRule, source);
        assert_eq!(
            fixed,
            "<?php\n/**\n * @var NULL\n * @property-read TRUE $a\n * @method static FALSE foo()\n * @throws NULL\n */\n"
        );
        assert_eq!(findings.len(), 4);
    }

    #[test]
    fn test_descriptions_untouched() {
        let source = "<?php\n/**\n * Returns null when missing.\n * @see null\n * @return int|null null if not found\n */\n";
        let (fixed, findings) = fix(&PhpdocConstantCasingRule, source);
        assert_eq!(
            fixed,
            "<?php\n/**\n * Returns null when missing.\n * @see null\n * @return int|NULL null if not found\n */\n"
        );
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_plain_comments_ignored() {
        assert_noop_when_not_candidate(
            &PhpdocConstantCasingRule,
            "<?php\n/* @var null */\n// @return null\n$a = 1;\n",
        );
    }

    #[test]
    fn test_check_mode() {
        let findings = check(&PhpdocConstantCasingRule, "<?php\n/** @var ?null $a */\n");
        assert_eq!(findings.len(), 1);
    }

    #[test]
    fn test_idempotent() {
        assert_idempotent(
            &PhpdocConstantCasingRule,
            "<?php\n/**\n * @param null|false $a\n * @return true\n */\n",
        );
    }
}
