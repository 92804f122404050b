//! Sound change rules: parsing and application
mod change;
mod prepare_rule;
mod rule_error;
mod target;

pub use change::{Change, Rule};
pub use rule_error::RuleError;
pub use target::{Capture, TargetItem};
