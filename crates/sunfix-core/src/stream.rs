//! Ordered, exclusively owned token sequence with navigation helpers
//!
//! Every derived fact (meaningful neighbours, bracket pairs, nesting depth,
//! blank lines) is computed on demand from the current tokens. Indices are
//! only valid until the next commit.

use std::ops::Range;

use crate::changeset::{apply_splices, Changeset, ChangesetHandle, StreamError};
use crate::lexer;
use crate::token::{Token, TokenKind};

/// One element of a pattern searched with [`TokenStream::find_sequence`]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TokenPattern {
    pub kind: TokenKind,
    /// Compared ignoring ASCII case when present
    pub text: Option<&'static str>,
}

impl TokenPattern {
    pub const fn kind(kind: TokenKind) -> Self {
        Self { kind, text: None }
    }

    pub const fn exact(kind: TokenKind, text: &'static str) -> Self {
        Self {
            kind,
            text: Some(text),
        }
    }

    pub fn matches(&self, token: &Token) -> bool {
        token.kind == self.kind
            && self
                .text
                .map_or(true, |text| token.text.eq_ignore_ascii_case(text))
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TokenStream {
    tokens: Vec<Token>,
}

impl TokenStream {
    /// Take ownership of a lexed sequence.
    ///
    /// Tokens without a line (0) get their lines derived from the text.
    pub fn new(tokens: Vec<Token>) -> Self {
        let mut stream = Self { tokens };
        if stream.tokens.iter().any(|t| t.line == 0) {
            stream.renumber_lines();
        }
        stream
    }

    /// Tokenize PHP source with the reference lexer
    pub fn from_source(source: &str) -> Self {
        Self::new(lexer::tokenize(source))
    }

    pub fn len(&self) -> usize {
        self.tokens.len()
    }

    pub fn is_empty(&self) -> bool {
        self.tokens.is_empty()
    }

    pub fn at(&self, index: usize) -> Result<&Token, StreamError> {
        self.tokens.get(index).ok_or(StreamError::OutOfRange {
            index,
            len: self.tokens.len(),
        })
    }

    pub fn get(&self, index: usize) -> Option<&Token> {
        self.tokens.get(index)
    }

    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    pub fn iter(&self) -> impl Iterator<Item = &Token> {
        self.tokens.iter()
    }

    pub fn into_tokens(self) -> Vec<Token> {
        self.tokens
    }

    /// Serialize back to source text
    pub fn to_source(&self) -> String {
        self.tokens.iter().map(|t| t.text.as_str()).collect()
    }

    fn is_kind(&self, index: usize, kind: TokenKind) -> bool {
        self.tokens.get(index).is_some_and(|t| t.kind == kind)
    }

    /// Smallest index after `index` holding a significant token
    pub fn next_meaningful(&self, index: usize) -> Option<usize> {
        (index + 1..self.tokens.len()).find(|&i| self.tokens[i].is_significant())
    }

    /// Largest index before `index` holding a significant token
    pub fn previous_meaningful(&self, index: usize) -> Option<usize> {
        (0..index.min(self.tokens.len()))
            .rev()
            .find(|&i| self.tokens[i].is_significant())
    }

    /// First `kind` in `from..until` (whole remaining stream without `until`)
    pub fn find_next(&self, kind: TokenKind, from: usize, until: Option<usize>) -> Option<usize> {
        let end = until.unwrap_or(self.tokens.len()).min(self.tokens.len());
        (from..end).find(|&i| self.tokens[i].kind == kind)
    }

    /// Last `kind` at or before `from`
    pub fn find_previous(&self, kind: TokenKind, from: usize) -> Option<usize> {
        if self.tokens.is_empty() {
            return None;
        }
        (0..=from.min(self.tokens.len() - 1))
            .rev()
            .find(|&i| self.tokens[i].kind == kind)
    }

    /// First contiguous run matching `pattern` starting at or after `from`.
    ///
    /// Nothing is skipped: whitespace between pattern elements breaks the
    /// match.
    pub fn find_sequence(&self, pattern: &[TokenPattern], from: usize) -> Option<Range<usize>> {
        if pattern.is_empty() || pattern.len() > self.tokens.len() {
            return None;
        }
        let last_start = self.tokens.len() - pattern.len();
        (from..=last_start)
            .find(|&start| {
                pattern
                    .iter()
                    .zip(&self.tokens[start..])
                    .all(|(p, t)| p.matches(t))
            })
            .map(|start| start..start + pattern.len())
    }

    pub fn contains_kind(&self, kind: TokenKind) -> bool {
        self.tokens.iter().any(|t| t.kind == kind)
    }

    pub fn contains_all_kinds(&self, kinds: &[TokenKind]) -> bool {
        kinds.iter().all(|&kind| self.contains_kind(kind))
    }

    pub fn count_kind(&self, kind: TokenKind) -> usize {
        self.tokens.iter().filter(|t| t.kind == kind).count()
    }

    /// A single PHP section with no inline HTML around it
    pub fn is_monolithic(&self) -> bool {
        if self.tokens.is_empty() || self.contains_kind(TokenKind::InlineHtml) {
            return false;
        }
        self.count_kind(TokenKind::OpenTag) + self.count_kind(TokenKind::OpenTagWithEcho) <= 1
    }

    /// Index of the bracket closing the one at `open`
    pub fn matching_bracket(&self, open: usize) -> Option<usize> {
        let close_kind = match self.tokens.get(open)?.kind {
            TokenKind::OpenBrace => TokenKind::CloseBrace,
            TokenKind::OpenParen => TokenKind::CloseParen,
            TokenKind::OpenBracket => TokenKind::CloseBracket,
            _ => return None,
        };
        let open_kind = self.tokens[open].kind;

        let mut depth = 0usize;
        for (i, token) in self.tokens.iter().enumerate().skip(open) {
            if token.kind == open_kind {
                depth += 1;
            } else if token.kind == close_kind {
                depth -= 1;
                if depth == 0 {
                    return Some(i);
                }
            }
        }
        None
    }

    /// Number of curly braces still open at `index`
    pub fn depth_at(&self, index: usize) -> usize {
        self.tokens[..index.min(self.tokens.len())]
            .iter()
            .fold(0usize, |depth, t| match t.kind {
                TokenKind::OpenBrace => depth + 1,
                TokenKind::CloseBrace => depth.saturating_sub(1),
                _ => depth,
            })
    }

    /// Line of the last character of the token at `index`
    pub fn last_line(&self, index: usize) -> Option<usize> {
        self.tokens.get(index).map(Token::last_line)
    }

    /// Line breaks inside the whitespace tokens of `range`
    pub fn newlines_in(&self, range: Range<usize>) -> usize {
        let end = range.end.min(self.tokens.len());
        self.tokens[range.start.min(end)..end]
            .iter()
            .filter(|t| t.kind == TokenKind::Whitespace)
            .map(Token::newlines)
            .sum()
    }

    /// True when every token in `range` is whitespace
    pub fn is_blank(&self, range: Range<usize>) -> bool {
        range.into_iter().all(|i| self.is_kind(i, TokenKind::Whitespace))
    }

    /// Open a changeset. The stream can only be read through the handle
    /// until it is committed or dropped.
    pub fn begin_changeset(&mut self) -> ChangesetHandle<'_> {
        ChangesetHandle::new(self)
    }

    /// Apply a prebuilt changeset atomically and re-derive line numbers
    pub fn apply(&mut self, changeset: Changeset) -> Result<(), StreamError> {
        if changeset.is_empty() {
            return Ok(());
        }
        let first_line = self.tokens.first().map_or(1, |t| t.line.max(1));
        self.tokens = apply_splices(&self.tokens, changeset.splices())?;
        if let Some(first) = self.tokens.first_mut() {
            first.line = first_line;
        }
        self.renumber_lines();
        Ok(())
    }

    fn renumber_lines(&mut self) {
        let mut line = self.tokens.first().map_or(1, |t| t.line.max(1));
        for token in &mut self.tokens {
            token.line = line;
            line += token.newlines();
        }
    }
}
