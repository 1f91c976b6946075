//! Whitespace rules for PHP code

mod function_spacing;

pub use function_spacing::FunctionSpacingRule;
