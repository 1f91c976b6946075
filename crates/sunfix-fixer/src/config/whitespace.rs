//! Whitespace settings used when rules generate new whitespace

use serde::{Deserialize, Serialize};

/// Indentation style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum IndentStyle {
    /// Use spaces for indentation
    Spaces(usize),
    /// Use tabs for indentation
    Tabs,
}

impl Default for IndentStyle {
    fn default() -> Self {
        IndentStyle::Spaces(4)
    }
}

impl IndentStyle {
    /// Indentation for one level
    pub fn unit(&self) -> String {
        match self {
            IndentStyle::Spaces(n) => " ".repeat(*n),
            IndentStyle::Tabs => "\t".to_string(),
        }
    }

    /// Indentation for `level` nesting levels
    pub fn for_level(&self, level: usize) -> String {
        self.unit().repeat(level)
    }

    /// Parse a config string
    /// e.g., "    " -> Spaces(4), "\t" -> Tabs
    pub fn from_config(s: &str) -> Self {
        if s == "\t" || s == "\\t" {
            IndentStyle::Tabs
        } else {
            let spaces = s.chars().filter(|c| *c == ' ').count();
            IndentStyle::Spaces(if spaces > 0 { spaces } else { 4 })
        }
    }
}

/// Line ending style
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,
    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    /// Get the line ending string
    pub fn as_str(&self) -> &'static str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }

    /// Parse a config string
    /// e.g., "\n" -> Lf, "\r\n" -> CrLf
    pub fn from_config(s: &str) -> Self {
        if s.contains("\\r\\n") || s.contains("\r\n") || s.eq_ignore_ascii_case("crlf") {
            LineEnding::CrLf
        } else {
            LineEnding::Lf
        }
    }
}

/// Combined whitespace configuration
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct WhitespaceConfig {
    pub indent: IndentStyle,
    pub line_ending: LineEnding,
}

impl WhitespaceConfig {
    pub fn new(indent: IndentStyle, line_ending: LineEnding) -> Self {
        Self { indent, line_ending }
    }
}
