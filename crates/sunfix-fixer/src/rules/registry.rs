//! Rule registry for managing available rules
//!
//! The registry collects all available rules and provides methods to look
//! them up by id and to build a runner for a configured selection.

use std::collections::HashMap;
use std::sync::Arc;

use super::casing::UppercaseConstantsRule;
use super::phpdoc::PhpdocConstantCasingRule;
use super::strict::{DeclareStrictTypesRule, StrictTypesOnSameLineRule};
use super::whitespace::FunctionSpacingRule;
use super::{Rule, RuleRunner};
use crate::config::{ConfigError, RuleSetConfig};
use crate::logging;

/// Information about a registered rule
#[derive(Debug, Clone)]
pub struct RuleInfo {
    pub id: &'static str,
    pub description: &'static str,
    pub priority: i32,
    pub is_risky: bool,
}

/// Registry of all available rules, in registration order
pub struct RuleRegistry {
    rules: Vec<Arc<dyn Rule>>,
    by_id: HashMap<&'static str, usize>,
}

impl Default for RuleRegistry {
    fn default() -> Self {
        Self::new()
    }
}

impl RuleRegistry {
    /// Create an empty registry
    pub fn empty() -> Self {
        Self {
            rules: Vec::new(),
            by_id: HashMap::new(),
        }
    }

    /// Create a registry with all built-in rules on their defaults
    pub fn new() -> Self {
        let mut registry = Self::empty();
        registry.register(Arc::new(UppercaseConstantsRule));
        registry.register(Arc::new(PhpdocConstantCasingRule));
        registry.register(Arc::new(DeclareStrictTypesRule::default()));
        registry.register(Arc::new(StrictTypesOnSameLineRule));
        registry.register(Arc::new(FunctionSpacingRule::default()));
        registry
    }

    /// Create a registry with all built-in rules configured from `config`
    pub fn with_config(config: &RuleSetConfig) -> Result<Self, ConfigError> {
        let plain = |rule: Arc<dyn Rule>| -> Result<Arc<dyn Rule>, ConfigError> {
            config.rule_config(rule.id()).ensure_known(rule.id(), &[])?;
            Ok(rule)
        };

        let mut registry = Self::empty();
        registry.register(plain(Arc::new(UppercaseConstantsRule))?);
        registry.register(plain(Arc::new(PhpdocConstantCasingRule))?);

        let declare = config.rule_config("declare_strict_types");
        declare.ensure_known("declare_strict_types", &[])?;
        registry.register(Arc::new(DeclareStrictTypesRule::new(&declare)));

        registry.register(plain(Arc::new(StrictTypesOnSameLineRule))?);
        registry.register(Arc::new(FunctionSpacingRule::from_config(
            &config.rule_config("function_spacing"),
        )?));

        Ok(registry)
    }

    /// Register a rule. A rule with the same id replaces the earlier one.
    pub fn register(&mut self, rule: Arc<dyn Rule>) {
        if let Some(&idx) = self.by_id.get(rule.id()) {
            self.rules[idx] = rule;
            return;
        }
        let idx = self.rules.len();
        self.by_id.insert(rule.id(), idx);
        self.rules.push(rule);
    }

    /// Get a rule by its id
    pub fn get(&self, id: &str) -> Option<&Arc<dyn Rule>> {
        self.by_id.get(id).map(|&idx| &self.rules[idx])
    }

    /// Ids of all registered rules, in registration order
    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    /// List all registered rules
    pub fn list(&self) -> Vec<RuleInfo> {
        self.rules
            .iter()
            .map(|r| RuleInfo {
                id: r.id(),
                description: r.description(),
                priority: r.priority(),
                is_risky: r.is_risky(),
            })
            .collect()
    }

    /// Runner over the given rules, in priority order
    pub fn runner(&self, ids: &[&str]) -> Result<RuleRunner, ConfigError> {
        let rules = ids
            .iter()
            .map(|id| {
                self.get(id)
                    .cloned()
                    .ok_or_else(|| ConfigError::UnknownRule(id.to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;
        Ok(RuleRunner::new(rules))
    }

    /// Runner over the rules `config` enables; risky rules need `allow_risky`
    pub fn runner_for(&self, config: &RuleSetConfig) -> Result<RuleRunner, ConfigError> {
        let all = self.ids();
        let effective = config.effective_rules(&all)?;

        let (selected, dropped): (Vec<&str>, Vec<&str>) = effective
            .into_iter()
            .partition(|id| config.allow_risky || self.get(id).map_or(true, |r| !r.is_risky()));

        let runner = self.runner(&selected)?;
        logging::log_rule_selection(&runner.ids(), &dropped);
        Ok(runner)
    }
}
