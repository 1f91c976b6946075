//! Rule set configuration
//!
//! Loaded from a `.sunfix.toml` file:
//!
//! ```toml
//! preset = "sunfox"
//! disabled = ["phpdoc_constant_casing"]
//! allow_risky = true
//!
//! [whitespace]
//! indent = "    "
//! line_ending = "\n"
//!
//! [rules.function_spacing]
//! spacing = 2
//! ```

use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};

use serde::Deserialize;
use thiserror::Error;

use super::presets::Preset;
use super::whitespace::{IndentStyle, LineEnding, WhitespaceConfig};
use crate::logging;

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Unknown preset '{0}'")]
    UnknownPreset(String),

    #[error("Unknown rule '{0}'")]
    UnknownRule(String),

    #[error("Unknown option '{option}' for rule '{rule}'")]
    UnknownOption { rule: String, option: String },

    #[error("Invalid value for option '{option}' of rule '{rule}': {reason}")]
    InvalidOption {
        rule: String,
        option: String,
        reason: String,
    },
}

/// Configuration value types for rule options
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(untagged)]
pub enum ConfigValue {
    Bool(bool),
    Number(i64),
    String(String),
    Array(Vec<String>),
}

/// Configuration handed to a single rule
#[derive(Debug, Clone, Default)]
pub struct RuleConfig {
    /// Indentation style
    pub indent: IndentStyle,
    /// Line ending style
    pub line_ending: LineEnding,
    /// Rule-specific options
    pub options: HashMap<String, ConfigValue>,
}

impl RuleConfig {
    pub fn with_option(mut self, name: &str, value: ConfigValue) -> Self {
        self.options.insert(name.to_string(), value);
        self
    }

    /// Read an integer option, rejecting other value types
    pub fn number(&self, rule: &str, option: &str) -> Result<Option<i64>, ConfigError> {
        match self.options.get(option) {
            None => Ok(None),
            Some(ConfigValue::Number(n)) => Ok(Some(*n)),
            Some(other) => Err(ConfigError::InvalidOption {
                rule: rule.to_string(),
                option: option.to_string(),
                reason: format!("expected an integer, got {:?}", other),
            }),
        }
    }

    /// Reject options not in `known`
    pub fn ensure_known(&self, rule: &str, known: &[&str]) -> Result<(), ConfigError> {
        match self.options.keys().find(|name| !known.contains(&name.as_str())) {
            Some(name) => Err(ConfigError::UnknownOption {
                rule: rule.to_string(),
                option: name.clone(),
            }),
            None => Ok(()),
        }
    }
}

impl From<&WhitespaceConfig> for RuleConfig {
    fn from(ws: &WhitespaceConfig) -> Self {
        Self {
            indent: ws.indent,
            line_ending: ws.line_ending,
            options: HashMap::new(),
        }
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct WhitespaceSection {
    /// Indentation unit, e.g. "    " or "\t"
    pub indent: Option<String>,
    /// Line ending, e.g. "\n" or "\r\n"
    pub line_ending: Option<String>,
}

/// Configuration file structure
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct RuleSetConfig {
    /// Preset to start from; all registered rules when absent
    pub preset: Option<String>,
    /// If set, only these rules will run (overrides preset)
    pub enabled: Option<Vec<String>>,
    /// Rules to exclude (applied after enabled/preset)
    pub disabled: Vec<String>,
    /// Whether risky rules may run
    pub allow_risky: bool,
    pub whitespace: WhitespaceSection,
    /// Per-rule options keyed by rule id
    pub rules: HashMap<String, HashMap<String, ConfigValue>>,
}

impl RuleSetConfig {
    pub fn from_toml_str(contents: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(contents)?)
    }

    pub fn from_file(path: &Path) -> Result<Self, ConfigError> {
        logging::log_config_load(path);
        let contents = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&contents)
    }

    /// Load `.sunfix.toml` searching from `start_dir` upward
    pub fn discover(start_dir: &Path) -> Result<Option<(Self, PathBuf)>, ConfigError> {
        let mut current = Some(start_dir);

        while let Some(dir) = current {
            let config_path = dir.join(".sunfix.toml");
            if config_path.exists() {
                let config = Self::from_file(&config_path)?;
                return Ok(Some((config, config_path)));
            }
            current = dir.parent();
        }

        Ok(None)
    }

    pub fn whitespace(&self) -> WhitespaceConfig {
        WhitespaceConfig::new(
            self.whitespace
                .indent
                .as_deref()
                .map(IndentStyle::from_config)
                .unwrap_or_default(),
            self.whitespace
                .line_ending
                .as_deref()
                .map(LineEnding::from_config)
                .unwrap_or_default(),
        )
    }

    /// Configuration for one rule: shared whitespace plus its options
    pub fn rule_config(&self, rule_id: &str) -> RuleConfig {
        let mut config = RuleConfig::from(&self.whitespace());
        if let Some(options) = self.rules.get(rule_id) {
            config.options = options.clone();
        }
        config
    }

    /// Compute the effective set of enabled rules, in `all_rules` order
    pub fn effective_rules<'a>(&self, all_rules: &[&'a str]) -> Result<Vec<&'a str>, ConfigError> {
        let selected: HashSet<String> = match (&self.enabled, &self.preset) {
            (Some(enabled), _) => enabled.iter().cloned().collect(),
            (None, Some(preset)) => Preset::from_str(preset)
                .ok_or_else(|| ConfigError::UnknownPreset(preset.clone()))?
                .rules()
                .iter()
                .map(|s| s.to_string())
                .collect(),
            (None, None) => all_rules.iter().map(|s| s.to_string()).collect(),
        };

        let named = selected
            .iter()
            .chain(&self.disabled)
            .chain(self.rules.keys());
        if let Some(unknown) = named.into_iter().find(|name| !all_rules.contains(&name.as_str())) {
            return Err(ConfigError::UnknownRule(unknown.clone()));
        }

        Ok(all_rules
            .iter()
            .copied()
            .filter(|name| selected.contains(*name))
            .filter(|name| !self.disabled.iter().any(|d| d == name))
            .collect())
    }
}
