//! Blank lines between functions and methods
//!
//! Every named function is checked twice: the blank lines after its body
//! (or after the `;` of a bodyless declaration) and the blank lines before
//! it. A gap between two functions is only reported by the after check of
//! the first one.

use std::collections::HashSet;

use sunfix_core::{Finding, Splice, Token, TokenKind, TokenStream};

use crate::config::{ConfigError, ConfigValue, IndentStyle, LineEnding, RuleConfig};
use crate::rules::{finish, Mode, OptionType, Rule, RuleOption, RuleResult};

const ID: &str = "function_spacing";

/// Checks the separation between functions
#[derive(Debug, Clone)]
pub struct FunctionSpacingRule {
    /// Blank lines expected on both sides of a function
    spacing: usize,
    indent: IndentStyle,
    line_ending: LineEnding,
}

impl Default for FunctionSpacingRule {
    fn default() -> Self {
        Self::new(1)
    }
}

impl FunctionSpacingRule {
    pub fn new(spacing: usize) -> Self {
        Self {
            spacing,
            indent: IndentStyle::default(),
            line_ending: LineEnding::default(),
        }
    }

    pub fn from_config(config: &RuleConfig) -> Result<Self, ConfigError> {
        config.ensure_known(ID, &["spacing"])?;
        let spacing = match config.number(ID, "spacing")? {
            None => 1,
            Some(n) => usize::try_from(n).map_err(|_| ConfigError::InvalidOption {
                rule: ID.to_string(),
                option: "spacing".to_string(),
                reason: format!("expected a non-negative integer, got {}", n),
            })?,
        };

        Ok(Self {
            spacing,
            indent: config.indent,
            line_ending: config.line_ending,
        })
    }

    pub fn spacing(&self) -> usize {
        self.spacing
    }

    fn message(expected: usize, position: &str, found: usize) -> String {
        format!(
            "Expected {} blank line{} {} function; {} found",
            expected,
            if expected == 1 { "" } else { "s" },
            position,
            found
        )
    }

    fn whitespace(&self, newlines: usize, indentation: &str, line: usize) -> Token {
        let text = format!("{}{}", self.line_ending.as_str().repeat(newlines), indentation);
        Token::new(TokenKind::Whitespace, text, line)
    }

    /// Blank lines between the end of the function and the next content.
    ///
    /// Closers sharing a line, like `function a() { function b() {} }`,
    /// share one gap. `claimed` holds the gaps already examined so only the
    /// outermost function reports it.
    fn check_after(
        &self,
        stream: &TokenStream,
        closer: usize,
        claimed: &mut HashSet<usize>,
    ) -> Option<(Finding, Splice)> {
        let tokens = stream.tokens();

        // Skip whatever shares the closer's line, such as a trailing comment
        let mut gap = None;
        for (i, token) in tokens.iter().enumerate().skip(closer + 1) {
            if token.is(TokenKind::Function) {
                return None;
            }
            if token.is(TokenKind::Whitespace) && token.has_newline() {
                gap = Some(i);
                break;
            }
        }
        let gap = gap?;
        if !claimed.insert(gap) {
            return None;
        }

        // End of file and the last member of a class are left alone
        let next = (gap + 1..tokens.len()).find(|&i| !tokens[i].is(TokenKind::Whitespace))?;
        if tokens[next].is(TokenKind::CloseBrace) {
            return None;
        }

        let found = stream.newlines_in(gap..next).saturating_sub(1);
        if found == self.spacing {
            return None;
        }

        let finding = Finding::new(
            ID,
            closer,
            tokens[closer].line,
            Self::message(self.spacing, "after", found),
        );
        let indentation = trailing_indentation(&tokens[gap..next]);
        let replacement = self.whitespace(self.spacing + 1, &indentation, tokens[gap].line);
        Some((finding, Splice::new(gap..next, vec![replacement])))
    }

    /// Blank lines between the previous content and the function, or the
    /// docblock and attributes stacked directly above it
    fn check_before(
        &self,
        stream: &TokenStream,
        function: usize,
        closers: &HashSet<usize>,
    ) -> Option<(Finding, Splice)> {
        let tokens = stream.tokens();
        let line = tokens[function].line;

        let mut previous = previous_line_content(tokens, function, line)?;

        // Comments have their own spacing conventions
        if tokens[previous].is(TokenKind::Comment) {
            return None;
        }

        let mut head = None;
        let mut head_line = line;
        while tokens[previous].last_line() + 1 == head_line {
            let attached = if tokens[previous].is(TokenKind::DocComment) {
                previous
            } else if let Some(open) = attribute_open(tokens, previous) {
                open
            } else {
                break;
            };
            head = Some(attached);
            head_line = tokens[attached].line;
            previous = (0..attached)
                .rev()
                .find(|&i| !tokens[i].is(TokenKind::Whitespace))?;
        }

        // First member of a class body
        if tokens[previous].is(TokenKind::OpenBrace) {
            return None;
        }

        // The gap after another function is reported by its after check
        let start = line_start(tokens, previous);
        if (start..function).any(|i| closers.contains(&i) || tokens[i].is(TokenKind::Function)) {
            return None;
        }

        // Methods right after a trait `use` are always held to one blank line
        let after_trait_use = stream.depth_at(previous) > 0
            && stream
                .find_previous(TokenKind::Use, previous)
                .is_some_and(|u| tokens[u].line == tokens[previous].line);
        let expected = if after_trait_use { 1 } else { self.spacing };

        let target = match head {
            Some(head) => head,
            None => (previous + 1..function)
                .find(|&i| !tokens[i].is(TokenKind::Whitespace))
                .unwrap_or(function),
        };

        let trailing = usize::from(tokens[previous].text.ends_with('\n'));
        let found = (stream.newlines_in(previous + 1..target) + trailing).saturating_sub(1);
        if found == expected {
            return None;
        }

        let finding = Finding::new(
            ID,
            function,
            line,
            Self::message(expected, "before", found),
        );
        let gap = &tokens[previous + 1..target];
        let indentation = if gap.is_empty() {
            self.indent.for_level(stream.depth_at(target))
        } else {
            trailing_indentation(gap)
        };
        let replacement = self.whitespace(
            (expected + 1).saturating_sub(trailing),
            &indentation,
            tokens[target].line,
        );
        Some((finding, Splice::new(previous + 1..target, vec![replacement])))
    }
}

/// Last token of the body, or the `;` of a bodyless declaration
fn closer(stream: &TokenStream, function: usize) -> Option<usize> {
    let open_paren = stream.find_next(TokenKind::OpenParen, function + 1, None)?;
    let close_paren = stream.matching_bracket(open_paren)?;
    let end = (close_paren + 1..stream.len()).find(|&i| {
        stream
            .get(i)
            .is_some_and(|t| t.is_any(&[TokenKind::OpenBrace, TokenKind::Semicolon]))
    })?;

    match stream.get(end)?.kind {
        TokenKind::OpenBrace => stream.matching_bracket(end),
        _ => Some(end),
    }
}

/// Opening `#[` of the attribute group closed at `close`
fn attribute_open(tokens: &[Token], close: usize) -> Option<usize> {
    if !tokens[close].is(TokenKind::CloseBracket) {
        return None;
    }
    let mut depth = 0usize;
    for i in (0..=close).rev() {
        match tokens[i].kind {
            TokenKind::CloseBracket => depth += 1,
            TokenKind::OpenBracket => {
                depth -= 1;
                if depth == 0 {
                    return (tokens[i].text == "#[").then_some(i);
                }
            }
            _ => {}
        }
    }
    None
}

/// `function` keywords declaring a function, paired with their closers.
/// `use function Foo\bar;` imports are not declarations.
fn declarations(stream: &TokenStream) -> Vec<(usize, usize)> {
    stream
        .iter()
        .enumerate()
        .filter(|(_, token)| token.is(TokenKind::Function))
        .filter(|&(i, _)| {
            stream
                .previous_meaningful(i)
                .and_then(|p| stream.get(p))
                .map_or(true, |p| !p.is(TokenKind::Use))
        })
        .filter_map(|(i, _)| closer(stream, i).map(|c| (i, c)))
        .collect()
}

/// Nearest non-whitespace token ending on a line above `line`
fn previous_line_content(tokens: &[Token], before: usize, line: usize) -> Option<usize> {
    (0..before)
        .rev()
        .find(|&i| !tokens[i].is(TokenKind::Whitespace) && tokens[i].last_line() < line)
}

/// First index whose token reaches the line `index` starts on
fn line_start(tokens: &[Token], index: usize) -> usize {
    let line = tokens[index].line;
    let mut start = index;
    while start > 0 && tokens[start - 1].last_line() >= line {
        start -= 1;
    }
    start
}

/// Text after the last line break of a whitespace run
fn trailing_indentation(gap: &[Token]) -> String {
    let text: String = gap.iter().map(|t| t.text.as_str()).collect();
    text.rsplit('\n').next().unwrap_or_default().to_string()
}

impl Rule for FunctionSpacingRule {
    fn id(&self) -> &'static str {
        ID
    }

    fn description(&self) -> &'static str {
        "Functions must be separated by the configured number of blank lines"
    }

    fn priority(&self) -> i32 {
        0
    }

    fn is_candidate(&self, stream: &TokenStream) -> bool {
        stream.contains_kind(TokenKind::Function)
    }

    fn run(&self, stream: &mut TokenStream, mode: Mode) -> RuleResult {
        let mut findings = Vec::new();
        let mut changeset = stream.begin_changeset();

        let declarations = declarations(&changeset);
        let closers: HashSet<usize> = declarations.iter().map(|&(_, c)| c).collect();
        let mut claimed = HashSet::new();

        for &(function, closer) in &declarations {
            let checks = [
                self.check_after(&changeset, closer, &mut claimed),
                self.check_before(&changeset, function, &closers),
            ];
            for (finding, splice) in checks.into_iter().flatten() {
                findings.push(finding);
                changeset.replace_range(splice.range, splice.replacement)?;
            }
        }

        finish(changeset, mode)?;
        Ok(findings)
    }

    fn options(&self) -> Vec<RuleOption> {
        vec![RuleOption {
            name: "spacing",
            description: "Number of blank lines before and after a function",
            option_type: OptionType::Number,
            default: Some(ConfigValue::Number(1)),
        }]
    }
}
