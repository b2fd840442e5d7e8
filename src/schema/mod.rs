//! Wire-shaped schema types: field definitions, conditions, and rules.

pub mod condition;
pub mod field;
pub mod rule;

pub use condition::*;
pub use field::*;
pub use rule::*;
