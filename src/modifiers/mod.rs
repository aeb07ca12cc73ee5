//! Weight modifier strategies.
//!
//! Every strategy follows the same two-phase protocol:
//!
//! 1. [`WeightsModifier::determine_output_schema`] computes the output
//!    schema from the input schema alone, without touching rows.
//! 2. [`WeightsModifier::modify`] takes the complete dataset and returns
//!    a new one whose schema agrees with phase 1 for the same input.
//!
//! Modifiers hold configuration only. Ranges and patterns are compiled
//! afresh against each dataset, so one instance can be applied to any
//! number of datasets of different shapes.

pub mod attribute;
pub mod instance;

use crate::data::model::{Attribute, Dataset, Row, Schema};
use crate::error::{Result, WeightError};

/// A strategy that rewrites attribute weights or row weights.
pub trait WeightsModifier {
    /// Registry name of the strategy.
    fn name(&self) -> &'static str;

    /// Output schema for `input`, computed without row data.
    fn determine_output_schema(&self, input: &Schema) -> Result<Schema>;

    /// Transform a complete dataset. The input is never mutated.
    fn modify(&self, data: &Dataset) -> Result<Dataset>;

    /// [`modify`](Self::modify) preceded by the no-data precondition.
    fn apply(&self, data: Option<&Dataset>) -> Result<Dataset> {
        let data = require_data(data)?;
        self.modify(data)
    }
}

/// Shared precondition: a dataset must be present.
pub fn require_data(data: Option<&Dataset>) -> Result<&Dataset> {
    data.ok_or(WeightError::NoDataProvided)
}

/// Copy of `input` where `weight_for` may replace each attribute's weight.
pub(crate) fn reweight_attributes(
    input: &Schema,
    mut weight_for: impl FnMut(usize, &Attribute) -> Option<f64>,
) -> Schema {
    let attributes = input
        .attributes
        .iter()
        .enumerate()
        .map(|(i, att)| {
            let mut att = att.clone();
            if let Some(weight) = weight_for(i, &att) {
                att.weight = weight;
            }
            att
        })
        .collect();
    Schema::new(input.relation.clone(), attributes)
}

/// Copy of `data` where `weight_for` may replace each row's weight.
pub(crate) fn reweight_rows(
    data: &Dataset,
    mut weight_for: impl FnMut(usize, &Row) -> Option<f64>,
) -> Dataset {
    let rows = data
        .rows
        .iter()
        .enumerate()
        .map(|(i, row)| {
            let mut row = row.clone();
            if let Some(weight) = weight_for(i, &row) {
                row.weight = weight;
            }
            row
        })
        .collect();
    Dataset::new(data.schema.clone(), rows)
}

/// Every row of `data` unchanged, under `schema`.
pub(crate) fn with_schema(schema: Schema, data: &Dataset) -> Dataset {
    Dataset::new(schema, data.rows.clone())
}

/// Extended validation: each row has one value per attribute, and each
/// value fits its attribute's kind.
pub fn check_rows(data: &Dataset) -> Result<()> {
    let expected = data.num_attributes();
    for (i, row) in data.rows.iter().enumerate() {
        if row.values.len() != expected {
            return Err(WeightError::RowShapeMismatch {
                row: i,
                reason: format!("{} values for {expected} attributes", row.values.len()),
            });
        }
        let misfit = row
            .values
            .iter()
            .zip(&data.schema.attributes)
            .find(|(value, att)| !value.fits(att.kind));
        if let Some((value, att)) = misfit {
            return Err(WeightError::RowShapeMismatch {
                row: i,
                reason: format!("value '{value}' does not fit {} attribute '{}'", att.kind, att.name),
            });
        }
    }
    Ok(())
}
