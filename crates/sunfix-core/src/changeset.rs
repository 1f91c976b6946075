//! Atomic token-range edits
//!
//! Rules never write into a stream directly. They buffer [`Splice`]s in a
//! [`ChangesetHandle`] and commit them in one step; a changeset that fails
//! validation or is dropped leaves the stream untouched.

use std::ops::{Deref, Range};

use thiserror::Error;

use crate::stream::TokenStream;
use crate::token::Token;

/// Errors raised by stream access and edit application
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StreamError {
    #[error("Token index {index} out of range for stream of length {len}")]
    OutOfRange { index: usize, len: usize },

    #[error("Overlapping splices detected at token {index}")]
    OverlappingSplices { index: usize },

    #[error("Malformed input: {0}")]
    MalformedInput(String),
}

/// Replace the tokens in `range` with `replacement`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Splice {
    pub range: Range<usize>,
    pub replacement: Vec<Token>,
}

impl Splice {
    pub fn new(range: Range<usize>, replacement: Vec<Token>) -> Self {
        Self { range, replacement }
    }
}

/// An ordered batch of splices expressed against one snapshot of a stream
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Changeset {
    splices: Vec<Splice>,
}

impl Changeset {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, splice: Splice) {
        self.splices.push(splice);
    }

    pub fn splices(&self) -> &[Splice] {
        &self.splices
    }

    pub fn len(&self) -> usize {
        self.splices.len()
    }

    pub fn is_empty(&self) -> bool {
        self.splices.is_empty()
    }
}

/// Apply splices to a token slice, producing the new sequence.
///
/// Splices are validated before anything is copied, so an error means the
/// input is untouched. Inserts at the same index keep their buffering order
/// and land before a replacement starting at that index.
pub(crate) fn apply_splices(tokens: &[Token], splices: &[Splice]) -> Result<Vec<Token>, StreamError> {
    let len = tokens.len();

    // Stable: equal keys keep buffering order
    let mut sorted: Vec<&Splice> = splices.iter().collect();
    sorted.sort_by_key(|s| (s.range.start, s.range.end));

    let mut prev_end: Option<usize> = None;
    for splice in &sorted {
        let Range { start, end } = splice.range;
        if start > end || end > len {
            return Err(StreamError::OutOfRange {
                index: start.max(end),
                len,
            });
        }
        if let Some(prev) = prev_end {
            if prev > start {
                return Err(StreamError::OverlappingSplices { index: start });
            }
        }
        prev_end = Some(end);
    }

    let added: usize = sorted.iter().map(|s| s.replacement.len()).sum();
    let mut result = Vec::with_capacity(len + added);
    let mut cursor = 0;

    for splice in sorted {
        result.extend_from_slice(&tokens[cursor..splice.range.start]);
        result.extend(splice.replacement.iter().cloned());
        cursor = splice.range.end;
    }
    result.extend_from_slice(&tokens[cursor..]);

    Ok(result)
}

/// Scoped edit buffer over a stream.
///
/// Reading through the handle always sees the stream as it was when the
/// changeset began; indices passed to the edit methods refer to that view.
/// Dropping the handle without [`commit`](Self::commit) discards the edits.
pub struct ChangesetHandle<'a> {
    stream: &'a mut TokenStream,
    changeset: Changeset,
}

impl<'a> ChangesetHandle<'a> {
    pub(crate) fn new(stream: &'a mut TokenStream) -> Self {
        Self {
            stream,
            changeset: Changeset::new(),
        }
    }

    fn check_index(&self, index: usize) -> Result<(), StreamError> {
        if index < self.stream.len() {
            Ok(())
        } else {
            Err(StreamError::OutOfRange {
                index,
                len: self.stream.len(),
            })
        }
    }

    fn check_range(&self, range: &Range<usize>) -> Result<(), StreamError> {
        if range.start <= range.end && range.end <= self.stream.len() {
            Ok(())
        } else {
            Err(StreamError::OutOfRange {
                index: range.start.max(range.end),
                len: self.stream.len(),
            })
        }
    }

    pub fn replace_token(&mut self, index: usize, token: Token) -> Result<(), StreamError> {
        self.check_index(index)?;
        self.changeset.push(Splice::new(index..index + 1, vec![token]));
        Ok(())
    }

    /// Insert before `index`; `index == len()` appends
    pub fn insert_before(&mut self, index: usize, tokens: Vec<Token>) -> Result<(), StreamError> {
        self.check_range(&(index..index))?;
        self.changeset.push(Splice::new(index..index, tokens));
        Ok(())
    }

    pub fn clear_range(&mut self, range: Range<usize>) -> Result<(), StreamError> {
        self.check_range(&range)?;
        if !range.is_empty() {
            self.changeset.push(Splice::new(range, Vec::new()));
        }
        Ok(())
    }

    pub fn replace_range(&mut self, range: Range<usize>, tokens: Vec<Token>) -> Result<(), StreamError> {
        self.check_range(&range)?;
        self.changeset.push(Splice::new(range, tokens));
        Ok(())
    }

    /// Apply every buffered edit at once. Returns the number of splices.
    pub fn commit(self) -> Result<usize, StreamError> {
        let count = self.changeset.len();
        if count > 0 {
            self.stream.apply(self.changeset)?;
        }
        Ok(count)
    }

    pub fn discard(self) {}
}

impl Deref for ChangesetHandle<'_> {
    type Target = TokenStream;

    fn deref(&self) -> &TokenStream {
        &*self.stream
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::token::TokenKind;

    fn ws(text: &str) -> Token {
        Token::detached(TokenKind::Whitespace, text)
    }

    fn ident(text: &str) -> Token {
        Token::detached(TokenKind::Identifier, text)
    }

    fn texts(tokens: &[Token]) -> Vec<&str> {
        tokens.iter().map(|t| t.text.as_str()).collect()
    }

    #[test]
    fn test_single_replacement() {
        let tokens = vec![ident("a"), ws(" "), ident("b")];
        let result = apply_splices(&tokens, &[Splice::new(2..3, vec![ident("c")])]).unwrap();
        assert_eq!(texts(&result), ["a", " ", "c"]);
    }

    #[test]
    fn test_insert_lands_before_replacement_at_same_index() {
        let tokens = vec![ident("a"), ident("b")];
        let splices = vec![
            Splice::new(1..2, vec![ident("B")]),
            Splice::new(1..1, vec![ident("x")]),
            Splice::new(1..1, vec![ident("y")]),
        ];
        let result = apply_splices(&tokens, &splices).unwrap();
        assert_eq!(texts(&result), ["a", "x", "y", "B"]);
    }

    #[test]
    fn test_append_at_end() {
        let tokens = vec![ident("a")];
        let result = apply_splices(&tokens, &[Splice::new(1..1, vec![ident("b")])]).unwrap();
        assert_eq!(texts(&result), ["a", "b"]);
    }

    #[test]
    fn test_overlap_rejected() {
        let tokens = vec![ident("a"), ident("b"), ident("c"), ident("d")];
        let splices = vec![
            Splice::new(0..3, vec![]),
            Splice::new(2..3, vec![ident("x")]),
        ];
        let result = apply_splices(&tokens, &splices);
        assert_eq!(result, Err(StreamError::OverlappingSplices { index: 2 }));
    }

    #[test]
    fn test_insert_inside_cleared_range_rejected() {
        let tokens = vec![ident("a"), ident("b"), ident("c")];
        let splices = vec![
            Splice::new(0..3, vec![]),
            Splice::new(1..1, vec![ident("x")]),
        ];
        assert!(matches!(
            apply_splices(&tokens, &splices),
            Err(StreamError::OverlappingSplices { .. })
        ));
    }

    #[test]
    fn test_out_of_bounds() {
        let tokens = vec![ident("a")];
        let result = apply_splices(&tokens, &[Splice::new(0..4, vec![])]);
        assert!(matches!(result, Err(StreamError::OutOfRange { len: 1, .. })));
    }

    #[test]
    fn test_empty_splices() {
        let tokens = vec![ident("a")];
        assert_eq!(apply_splices(&tokens, &[]).unwrap(), tokens);
    }
}
