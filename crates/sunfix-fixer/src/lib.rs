//! sunfix-fixer: Sunfox coding standard rules for PHP token streams
//!
//! This crate provides the rules of the Sunfox coding standard on top of
//! the `sunfix-core` token stream, plus the registry and runner that apply
//! them in priority order.
//!
//! # Rules
//!
//! - `uppercase_constants`: `TRUE`, `FALSE` and `NULL` in upper case
//! - `phpdoc_constant_casing`: the same inside PHPDoc types
//! - `declare_strict_types` (risky): add `declare(strict_types=1)`
//! - `strict_types_on_same_line`: keep the declaration on the opening tag line
//! - `function_spacing`: blank lines around functions and methods
//!
//! # Example
//!
//! ```ignore
//! use std::path::Path;
//! use sunfix_core::TokenStream;
//! use sunfix_fixer::config::RuleSetConfig;
//! use sunfix_fixer::rules::{Mode, RuleRegistry};
//!
//! let config = RuleSetConfig::from_file(Path::new(".sunfix.toml"))?;
//! let runner = RuleRegistry::with_config(&config)?.runner_for(&config)?;
//!
//! let mut stream = TokenStream::from_source(source);
//! let report = runner.run(&mut stream, Mode::Fix);
//! let fixed = stream.to_source();
//! ```

pub mod config;
pub mod logging;
pub mod rules;

pub use config::{ConfigError, IndentStyle, LineEnding, RuleConfig, RuleSetConfig, WhitespaceConfig};
pub use rules::{Mode, Rule, RuleRegistry, RuleRunner, RunReport};
