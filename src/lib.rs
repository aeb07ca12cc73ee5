//! Attribute and instance weight modifiers for in-memory tabular datasets.
//!
//! A modifier is configured once and then applied to any number of
//! datasets. Each application runs a schema phase, which only needs the
//! attribute layout, followed by a data phase over the complete dataset:
//!
//! ```no_run
//! use reweight::{AttributeWeights, AttributeWeightsFilter};
//! # fn demo(data: &reweight::Dataset) -> reweight::Result<()> {
//! let modifier: AttributeWeights = serde_json::from_str(
//!     r#"{"modifier": "fixed-value", "range": "2-4", "weight": 2.5}"#,
//! ).expect("valid configuration");
//! let mut filter = AttributeWeightsFilter::new(modifier);
//! let announced = filter.determine_output_schema(&data.schema)?;
//! let out = filter.process(Some(data))?;
//! assert_eq!(out.schema, announced);
//! # Ok(())
//! # }
//! ```

pub mod config;
pub mod data;
pub mod driver;
pub mod error;
pub mod modifiers;
pub mod select;

pub use data::model::{Attribute, AttributeKind, Dataset, Row, Schema, Value};
pub use driver::{AttributeWeightsFilter, BatchDriver, InstanceWeightsFilter, SchemaState};
pub use error::{Result, WeightError};
pub use modifiers::attribute::AttributeWeights;
pub use modifiers::instance::InstanceWeights;
pub use modifiers::WeightsModifier;
pub use select::{AttributeIndex, IndexSelection, PatternMatcher, PatternSpec, RangeSpec};
