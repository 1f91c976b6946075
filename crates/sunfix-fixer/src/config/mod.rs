//! Rule set configuration
//!
//! This module handles `.sunfix.toml` files and the settings handed to
//! individual rules.

mod presets;
mod ruleset;
mod whitespace;

pub use presets::{get_preset_rules, Preset, CASING_RULES, SUNFOX_RULES};
pub use ruleset::{ConfigError, ConfigValue, RuleConfig, RuleSetConfig, WhitespaceSection};
pub use whitespace::{IndentStyle, LineEnding, WhitespaceConfig};
