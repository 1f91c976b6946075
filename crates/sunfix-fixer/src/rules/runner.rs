//! Rule runner
//!
//! Drives a fixed set of rules over one stream in priority order. A rule
//! that errors or panics is reported as a non-fixable finding and the run
//! continues with the next rule.

use std::any::Any;
use std::cmp::Reverse;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;

use sunfix_core::{Finding, TokenStream};

use super::{Mode, Rule};
use crate::logging;

/// Outcome of a runner invocation
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RunReport {
    /// Findings from every rule, in execution order
    pub findings: Vec<Finding>,
    /// Rules whose `run` was invoked
    pub rules_run: usize,
    /// Rules skipped by their candidacy check
    pub rules_skipped: usize,
    /// Rules that returned an error or panicked
    pub faults: usize,
    /// Passes performed (always 1 for a single run)
    pub passes: usize,
}

impl RunReport {
    pub fn is_clean(&self) -> bool {
        self.findings.is_empty()
    }

    fn merge(&mut self, other: RunReport) {
        self.findings.extend(other.findings);
        self.rules_run += other.rules_run;
        self.rules_skipped += other.rules_skipped;
        self.faults += other.faults;
        self.passes += other.passes;
    }
}

/// Runs rules over token streams, higher priority first
pub struct RuleRunner {
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleRunner {
    /// Order `rules` by descending priority, keeping the given order on ties
    pub fn new(mut rules: Vec<Arc<dyn Rule>>) -> Self {
        rules.sort_by_key(|rule| Reverse(rule.priority()));
        Self { rules }
    }

    /// Rule ids in execution order
    pub fn ids(&self) -> Vec<&'static str> {
        self.rules.iter().map(|r| r.id()).collect()
    }

    pub fn rules(&self) -> &[Arc<dyn Rule>] {
        &self.rules
    }

    /// Run every rule once
    pub fn run(&self, stream: &mut TokenStream, mode: Mode) -> RunReport {
        logging::log_run_start(mode.as_str(), stream.len(), self.rules.len());

        let mut report = RunReport {
            passes: 1,
            ..Default::default()
        };

        for rule in &self.rules {
            if !rule.is_candidate(stream) {
                logging::log_rule_skipped(rule.id());
                report.rules_skipped += 1;
                continue;
            }

            report.rules_run += 1;
            match panic::catch_unwind(AssertUnwindSafe(|| rule.run(stream, mode))) {
                Ok(Ok(findings)) => {
                    logging::log_rule_findings(rule.id(), findings.len());
                    report.findings.extend(findings);
                }
                Ok(Err(err)) => {
                    report.faults += 1;
                    report.findings.push(fault(rule.as_ref(), &err.to_string()));
                }
                Err(payload) => {
                    report.faults += 1;
                    let message = format!("rule panicked: {}", panic_message(payload.as_ref()));
                    report.findings.push(fault(rule.as_ref(), &message));
                }
            }
        }

        logging::log_run_complete(report.findings.len(), report.faults);
        report
    }

    /// Fix repeatedly until a pass leaves the source unchanged or
    /// `max_passes` is reached
    pub fn fix_until_stable(&self, stream: &mut TokenStream, max_passes: usize) -> RunReport {
        let mut report = RunReport::default();

        for _ in 0..max_passes {
            let before = stream.to_source();
            report.merge(self.run(stream, Mode::Fix));
            if stream.to_source() == before {
                break;
            }
        }

        report
    }
}

fn fault(rule: &dyn Rule, message: &str) -> Finding {
    logging::log_rule_fault(rule.id(), message);
    Finding::unfixable(rule.id(), 0, 0, message)
}

fn panic_message(payload: &(dyn Any + Send)) -> &str {
    if let Some(s) = payload.downcast_ref::<&str>() {
        s
    } else if let Some(s) = payload.downcast_ref::<String>() {
        s.as_str()
    } else {
        "unknown panic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::rules::casing::UppercaseConstantsRule;
    use crate::rules::RuleResult;
    use sunfix_core::{StreamError, Token, TokenKind};

    struct FailingRule;

    impl Rule for FailingRule {
        fn id(&self) -> &'static str {
            "failing"
        }
        fn description(&self) -> &'static str {
            "Always fails"
        }
        fn priority(&self) -> i32 {
            10
        }
        fn is_candidate(&self, _stream: &TokenStream) -> bool {
            true
        }
        fn run(&self, stream: &mut TokenStream, _mode: Mode) -> RuleResult {
            let len = stream.len();
            let mut changeset = stream.begin_changeset();
            changeset.replace_token(0, Token::detached(TokenKind::Comment, "/* x */"))?;
            changeset.replace_token(len + 5, Token::detached(TokenKind::Comment, "/* y */"))?;
            changeset.commit()?;
            Ok(Vec::new())
        }
    }

    struct PanickingRule;

    impl Rule for PanickingRule {
        fn id(&self) -> &'static str {
            "panicking"
        }
        fn description(&self) -> &'static str {
            "Always panics"
        }
        fn priority(&self) -> i32 {
            20
        }
        fn is_candidate(&self, _stream: &TokenStream) -> bool {
            true
        }
        fn run(&self, _stream: &mut TokenStream, _mode: Mode) -> RuleResult {
            panic!("boom");
        }
    }

    struct NeverCandidate;

    impl Rule for NeverCandidate {
        fn id(&self) -> &'static str {
            "never"
        }
        fn description(&self) -> &'static str {
            "Never a candidate"
        }
        fn priority(&self) -> i32 {
            0
        }
        fn is_candidate(&self, _stream: &TokenStream) -> bool {
            false
        }
        fn run(&self, _stream: &mut TokenStream, _mode: Mode) -> RuleResult {
            Err(StreamError::MalformedInput("should not run".to_string()))
        }
    }

    fn runner() -> RuleRunner {
        RuleRunner::new(vec![
            Arc::new(UppercaseConstantsRule),
            Arc::new(NeverCandidate),
            Arc::new(FailingRule),
            Arc::new(PanickingRule),
        ])
    }

    #[test]
    fn test_faults_are_isolated() {
        let mut stream = TokenStream::from_source("<?php\n$a = true;\n");
        let report = runner().run(&mut stream, Mode::Fix);

        assert_eq!(report.faults, 2);
        assert_eq!(report.rules_run, 3);
        assert_eq!(report.rules_skipped, 1);

        let ids: Vec<_> = report.findings.iter().map(|f| f.rule_id.as_str()).collect();
        assert_eq!(ids, vec!["panicking", "failing", "uppercase_constants"]);
        assert!(!report.findings[0].fixable);
        assert!(report.findings[0].message.contains("boom"));
        assert!(!report.findings[1].fixable);

        // The failing rule's partial edits were never applied
        assert_eq!(stream.to_source(), "<?php\n$a = TRUE;\n");
    }

    #[test]
    fn test_check_mode_leaves_stream_unchanged() {
        let mut stream = TokenStream::from_source("<?php\n$a = true;\n");
        let before = stream.clone();
        let runner = RuleRunner::new(vec![Arc::new(UppercaseConstantsRule)]);

        let report = runner.run(&mut stream, Mode::Check);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(stream, before);
    }

    #[test]
    fn test_fix_until_stable() {
        let mut stream = TokenStream::from_source("<?php\n$a = true;\n");
        let runner = RuleRunner::new(vec![Arc::new(UppercaseConstantsRule)]);

        let report = runner.fix_until_stable(&mut stream, 5);
        assert_eq!(report.passes, 2);
        assert_eq!(report.findings.len(), 1);
        assert_eq!(stream.to_source(), "<?php\n$a = TRUE;\n");
    }

    #[test]
    fn test_empty_stream() {
        let mut stream = TokenStream::from_source("");
        let report = RuleRunner::new(vec![Arc::new(UppercaseConstantsRule)]).run(&mut stream, Mode::Fix);
        assert!(report.is_clean());
        assert_eq!(report.rules_skipped, 1);
    }
}
