//! Position and name selection, compiled against a dataset's shape on use.

pub mod pattern;
pub mod range;

pub use pattern::{PatternMatcher, PatternSpec};
pub use range::{AttributeIndex, IndexSelection, RangeSpec};
