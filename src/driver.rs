//! Two-phase batch driver shared by every weight modifier.
//!
//! A host announces the input schema first and learns the output schema
//! before any row exists, then hands over the complete dataset once it
//! has been read. The driver keeps the two phases consistent.

use crate::data::model::{Dataset, Schema};
use crate::error::{Result, WeightError};
use crate::modifiers::attribute::AttributeWeights;
use crate::modifiers::instance::InstanceWeights;
use crate::modifiers::{WeightsModifier, require_data};

/// Where the driver stands for the current configuration.
#[derive(Debug, Clone, PartialEq)]
pub enum SchemaState {
    Pending,
    /// The last input schema seen and the output schema announced for it.
    Ready { input: Schema, output: Schema },
}

/// Runs a [`WeightsModifier`] through the schema and data phases.
#[derive(Debug, Clone)]
pub struct BatchDriver<M> {
    modifier: M,
    state: SchemaState,
}

/// Attribute weights filter; defaults to pass-through.
pub type AttributeWeightsFilter = BatchDriver<AttributeWeights>;

/// Instance weights filter.
///
/// Unlike [`AttributeWeightsFilter`] there is no default strategy, so this
/// alias does not implement `Default`; build it with [`BatchDriver::new`].
pub type InstanceWeightsFilter = BatchDriver<InstanceWeights>;

impl<M: WeightsModifier> BatchDriver<M> {
    pub fn new(modifier: M) -> Self {
        Self {
            modifier,
            state: SchemaState::Pending,
        }
    }

    pub fn modifier(&self) -> &M {
        &self.modifier
    }

    /// Swap the modifier; any announced schema is forgotten.
    pub fn set_modifier(&mut self, modifier: M) {
        self.modifier = modifier;
        self.state = SchemaState::Pending;
    }

    pub fn state(&self) -> &SchemaState {
        &self.state
    }

    pub fn is_schema_ready(&self) -> bool {
        matches!(self.state, SchemaState::Ready { .. })
    }

    /// The output schema announced by the last successful phase, if any.
    pub fn output_schema(&self) -> Option<&Schema> {
        match &self.state {
            SchemaState::Ready { output, .. } => Some(output),
            SchemaState::Pending => None,
        }
    }

    /// Schema phase. Needs no rows and may be called speculatively; calling
    /// it again with the same input yields the same schema.
    pub fn determine_output_schema(&mut self, input: &Schema) -> Result<Schema> {
        let output = self.modifier.determine_output_schema(input)?;
        log::debug!(
            "{}: announced schema for '{}' ({} attributes)",
            self.modifier.name(),
            input.relation,
            output.num_attributes()
        );
        self.state = SchemaState::Ready {
            input: input.clone(),
            output: output.clone(),
        };
        Ok(output)
    }

    /// Data phase over a complete dataset.
    ///
    /// Fails with [`WeightError::SchemaDisagreement`] when the result's
    /// schema differs from the one announced for an identical input schema.
    /// Weights compare bit for bit, see [`Schema::same_shape_and_weights`].
    pub fn process(&mut self, data: Option<&Dataset>) -> Result<Dataset> {
        let data = require_data(data)?;
        let out = self.modifier.modify(data)?;

        if let SchemaState::Ready { input, output } = &self.state {
            if input.same_shape_and_weights(&data.schema)
                && !output.same_shape_and_weights(&out.schema)
            {
                return Err(WeightError::SchemaDisagreement {
                    modifier: self.modifier.name().to_string(),
                });
            }
        }

        log::debug!(
            "{}: processed {} rows of '{}'",
            self.modifier.name(),
            out.len(),
            data.schema.relation
        );
        self.state = SchemaState::Ready {
            input: data.schema.clone(),
            output: out.schema.clone(),
        };
        Ok(out)
    }
}

/// Available only for modifiers with a default strategy, such as
/// [`AttributeWeights`]; [`InstanceWeights`] has none.
impl<M: WeightsModifier + Default> Default for BatchDriver<M> {
    fn default() -> Self {
        Self::new(M::default())
    }
}
