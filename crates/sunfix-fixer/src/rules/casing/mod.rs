//! Casing rules for PHP code

mod uppercase_constants;

pub use uppercase_constants::UppercaseConstantsRule;
