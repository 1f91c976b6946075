//! sunfix-core: token-stream engine for PHP style rules
//!
//! This crate provides:
//! - `Token` / `TokenKind`: lexical PHP tokens
//! - `TokenStream`: an owned token sequence with meaningful-token navigation
//!   and sequence search
//! - `ChangesetHandle` / `Changeset`: buffered edits applied as one atomic splice
//! - `Finding`: a detected violation
//! - `lexer`: a reference tokenizer for hosts without their own

mod changeset;
mod finding;
pub mod lexer;
mod stream;
mod token;

pub use changeset::{Changeset, ChangesetHandle, Splice, StreamError};
pub use finding::Finding;
pub use stream::{TokenPattern, TokenStream};
pub use token::{Token, TokenKind};
