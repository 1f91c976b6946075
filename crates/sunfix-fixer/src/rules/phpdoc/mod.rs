//! PHPDoc rules

mod phpdoc_constant_casing;

pub use phpdoc_constant_casing::PhpdocConstantCasingRule;
