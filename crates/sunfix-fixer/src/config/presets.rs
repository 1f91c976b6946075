//! Rule presets
//!
//! Maps preset names to their constituent rules.

/// Available presets
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Preset {
    /// The Sunfox coding standard additions
    Sunfox,
    /// Casing rules only
    Casing,
}

impl Preset {
    pub fn from_str(s: &str) -> Option<Self> {
        match s.to_lowercase().trim_start_matches('@') {
            "sunfox" => Some(Preset::Sunfox),
            "casing" => Some(Preset::Casing),
            _ => None,
        }
    }

    pub fn rules(&self) -> &'static [&'static str] {
        match self {
            Preset::Sunfox => SUNFOX_RULES,
            Preset::Casing => CASING_RULES,
        }
    }
}

/// Get the list of rules for a preset name; empty when unknown
pub fn get_preset_rules(preset_name: &str) -> &'static [&'static str] {
    Preset::from_str(preset_name).map_or(&[], |preset| preset.rules())
}

/// Sunfox preset rules
pub const SUNFOX_RULES: &[&str] = &[
    "uppercase_constants",
    "phpdoc_constant_casing",
    "declare_strict_types",
    "strict_types_on_same_line",
    "function_spacing",
];

/// Casing preset rules
pub const CASING_RULES: &[&str] = &["uppercase_constants", "phpdoc_constant_casing"];
