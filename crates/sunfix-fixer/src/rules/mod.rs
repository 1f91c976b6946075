//! Style rules operating on a token stream
//!
//! Each rule is an independent implementation of [`Rule`]. Rules hold no
//! mutable state; everything they learn about a stream is recomputed per
//! run.

mod registry;
mod runner;
pub mod casing;
pub mod phpdoc;
pub mod strict;
pub mod whitespace;

pub use registry::{RuleInfo, RuleRegistry};
pub use runner::{RuleRunner, RunReport};

use sunfix_core::{ChangesetHandle, Finding, StreamError, TokenStream};

use crate::config::ConfigValue;

/// Whether a run may mutate the stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mode {
    /// Report findings only; the stream is never modified
    Check,
    /// Report findings and commit the fixes
    Fix,
}

impl Mode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Mode::Check => "check",
            Mode::Fix => "fix",
        }
    }
}

/// Result of a single rule run
pub type RuleResult = Result<Vec<Finding>, StreamError>;

/// A style rule that can be applied to a PHP token stream
pub trait Rule: Send + Sync {
    /// Stable identifier, used in configuration and findings
    fn id(&self) -> &'static str;

    /// Human-readable description
    fn description(&self) -> &'static str;

    /// Execution priority (higher = runs first)
    fn priority(&self) -> i32;

    /// Whether this rule makes risky changes
    fn is_risky(&self) -> bool {
        false
    }

    /// Cheap pre-check; `run` is not called when this returns false
    fn is_candidate(&self, stream: &TokenStream) -> bool;

    /// Detect violations and, in fix mode, commit one changeset for them
    fn run(&self, stream: &mut TokenStream, mode: Mode) -> RuleResult;

    /// Get configurable options for this rule
    fn options(&self) -> Vec<RuleOption> {
        vec![]
    }
}

/// A configurable option for a rule
#[derive(Debug, Clone)]
pub struct RuleOption {
    pub name: &'static str,
    pub description: &'static str,
    pub option_type: OptionType,
    pub default: Option<ConfigValue>,
}

/// Type of a rule option
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum OptionType {
    Number,
}

/// Commit the buffered edits in fix mode, drop them in check mode
pub(crate) fn finish(changeset: ChangesetHandle<'_>, mode: Mode) -> Result<(), StreamError> {
    match mode {
        Mode::Fix => {
            changeset.commit()?;
        }
        Mode::Check => changeset.discard(),
    }
    Ok(())
}
