//! Logging module for sunfix-fixer
//!
//! Records configuration loading and each rule run (candidacy, findings,
//! faults) to a file for debugging. Nothing is written until
//! [`init_logger`] has been called.

use std::fs::{File, OpenOptions};
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::Mutex;

/// Global logger instance
static LOGGER: Mutex<Option<RunLogger>> = Mutex::new(None);

/// File-backed logger for rule runs
pub struct RunLogger {
    file: File,
}

impl RunLogger {
    /// Create a new logger writing to the specified path
    pub fn new(log_path: &Path) -> std::io::Result<Self> {
        let file = OpenOptions::new()
            .create(true)
            .write(true)
            .truncate(true)
            .open(log_path)?;

        Ok(Self { file })
    }

    /// Write a log message
    pub fn log(&mut self, message: &str) {
        let timestamp = chrono::Local::now().format("%Y-%m-%d %H:%M:%S%.3f");
        let _ = writeln!(self.file, "[{}] {}", timestamp, message);
        let _ = self.file.flush();
    }

    /// Log a section header
    pub fn section(&mut self, title: &str) {
        let separator = "=".repeat(60);
        self.log(&separator);
        self.log(title);
        self.log(&separator);
    }
}

/// Initialize the global logger, defaulting to a timestamped file in /tmp
pub fn init_logger(log_path: Option<&Path>) -> std::io::Result<PathBuf> {
    let path = log_path.map(|p| p.to_path_buf()).unwrap_or_else(|| {
        let timestamp = chrono::Local::now().format("%Y%m%d_%H%M%S");
        PathBuf::from(format!("/tmp/sunfix-{}.log", timestamp))
    });

    let logger = RunLogger::new(&path)?;

    if let Ok(mut guard) = LOGGER.lock() {
        *guard = Some(logger);
    }

    Ok(path)
}

/// Stop logging and close the file
pub fn shutdown_logger() {
    if let Ok(mut guard) = LOGGER.lock() {
        *guard = None;
    }
}

/// Log a message to the global logger
pub fn log(message: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.log(message);
        }
    }
}

/// Log a section header
pub fn section(title: &str) {
    if let Ok(mut guard) = LOGGER.lock() {
        if let Some(ref mut logger) = *guard {
            logger.section(title);
        }
    }
}

/// Check if logging is enabled
pub fn is_enabled() -> bool {
    if let Ok(guard) = LOGGER.lock() {
        guard.is_some()
    } else {
        false
    }
}

/// Log configuration loading
pub fn log_config_load(path: &Path) {
    section("CONFIGURATION LOADING");
    log(&format!("Loading config from: {}", path.display()));
}

/// Log the rules selected for a run, in execution order
pub fn log_rule_selection(rules: &[&str], dropped_risky: &[&str]) {
    section("RULE SELECTION");
    log(&format!("Enabled rules ({}): {}", rules.len(), rules.join(", ")));
    if !dropped_risky.is_empty() {
        log(&format!(
            "Risky rules not allowed: {}",
            dropped_risky.join(", ")
        ));
    }
}

/// Log the start of a runner pass
pub fn log_run_start(mode: &str, tokens: usize, rules: usize) {
    section("RUN START");
    log(&format!(
        "Mode: {}, {} tokens, {} rules",
        mode, tokens, rules
    ));
}

/// Log a rule skipped by its candidacy check
pub fn log_rule_skipped(rule: &str) {
    log(&format!("[{}] not a candidate, skipped", rule));
}

/// Log the findings a rule produced
pub fn log_rule_findings(rule: &str, count: usize) {
    log(&format!("[{}] {} finding(s)", rule, count));
}

/// Log a rule that failed or panicked
pub fn log_rule_fault(rule: &str, error: &str) {
    log(&format!("[{}] FAULT: {}", rule, error));
}

/// Log run complete
pub fn log_run_complete(findings: usize, faults: usize) {
    section("RUN COMPLETE");
    log(&format!("Total findings: {}", findings));
    log(&format!("Rule faults: {}", faults));
}
