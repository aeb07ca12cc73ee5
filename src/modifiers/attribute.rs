//! Strategies that rewrite attribute (column) weights.
//!
//! Attribute count, order, names and kinds never change; only the
//! `weight` of each attribute may. Rows are copied unchanged.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{WeightsModifier, reweight_attributes, with_schema};
use crate::data::model::{Dataset, Schema};
use crate::data::weights;
use crate::error::{Result, WeightError};
use crate::select::{PatternSpec, RangeSpec};

// ---------------------------------------------------------------------------
// PassThrough
// ---------------------------------------------------------------------------

/// Leaves all attribute weights as they are.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PassThrough;

impl WeightsModifier for PassThrough {
    fn name(&self) -> &'static str {
        "pass-through"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        Ok(input.clone())
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        Ok(data.clone())
    }
}

// ---------------------------------------------------------------------------
// FixedValue – by position
// ---------------------------------------------------------------------------

/// Sets the attributes in `range` to `weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedValue {
    pub range: RangeSpec,
    pub weight: f64,
}

impl Default for FixedValue {
    fn default() -> Self {
        Self {
            range: RangeSpec::all(),
            weight: 1.0,
        }
    }
}

impl WeightsModifier for FixedValue {
    fn name(&self) -> &'static str {
        "fixed-value"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        let selection = self.range.bind(input.num_attributes() as i64)?;
        log::debug!(
            "range '{}' selects {} of {} attributes",
            self.range,
            selection.count(),
            input.num_attributes()
        );
        Ok(reweight_attributes(input, |i, _| {
            selection.contains(i).then_some(self.weight)
        }))
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        Ok(with_schema(self.determine_output_schema(&data.schema)?, data))
    }
}

// ---------------------------------------------------------------------------
// FixedValueByName – by attribute name
// ---------------------------------------------------------------------------

/// Sets the attributes whose name matches `pattern` to `weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedValueByName {
    #[serde(flatten)]
    pub pattern: PatternSpec,
    pub weight: f64,
}

impl Default for FixedValueByName {
    fn default() -> Self {
        Self {
            pattern: PatternSpec::default(),
            weight: 1.0,
        }
    }
}

impl WeightsModifier for FixedValueByName {
    fn name(&self) -> &'static str {
        "fixed-value-by-name"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        let matcher = self.pattern.compile()?;
        Ok(reweight_attributes(input, |_, att| {
            matcher.matches(&att.name).then_some(self.weight)
        }))
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        Ok(with_schema(self.determine_output_schema(&data.schema)?, data))
    }
}

// ---------------------------------------------------------------------------
// FromFile – one weight per attribute, read from disk
// ---------------------------------------------------------------------------

/// Assigns the i-th weight of a weights file to the i-th attribute.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FromFile {
    pub path: PathBuf,
}

impl Default for FromFile {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
        }
    }
}

impl WeightsModifier for FromFile {
    fn name(&self) -> &'static str {
        "from-file"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        let loaded = weights::load_weights(&self.path)?;
        let loaded = weights::reconcile(loaded, input.num_attributes(), "attributes")?;
        Ok(reweight_attributes(input, |i, _| loaded.get(i).copied()))
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        Ok(with_schema(self.determine_output_schema(&data.schema)?, data))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Attribute weight strategy chosen by name, with its own options.
///
/// Serialized with a `"modifier"` tag, e.g.
/// `{"modifier": "fixed-value", "range": "2-4", "weight": 2.5}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modifier", rename_all = "kebab-case")]
pub enum AttributeWeights {
    PassThrough,
    FixedValue(FixedValue),
    FixedValueByName(FixedValueByName),
    FromFile(FromFile),
}

impl AttributeWeights {
    /// Registered strategy names.
    pub const NAMES: &'static [&'static str] =
        &["pass-through", "fixed-value", "fixed-value-by-name", "from-file"];

    /// Default-configured strategy registered under `name`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "pass-through" => Ok(Self::PassThrough),
            "fixed-value" => Ok(Self::FixedValue(FixedValue::default())),
            "fixed-value-by-name" => Ok(Self::FixedValueByName(FixedValueByName::default())),
            "from-file" => Ok(Self::FromFile(FromFile::default())),
            other => Err(WeightError::UnknownModifier(other.to_string())),
        }
    }

    fn strategy(&self) -> &dyn WeightsModifier {
        match self {
            Self::PassThrough => &PassThrough,
            Self::FixedValue(m) => m,
            Self::FixedValueByName(m) => m,
            Self::FromFile(m) => m,
        }
    }
}

impl Default for AttributeWeights {
    fn default() -> Self {
        Self::PassThrough
    }
}

impl WeightsModifier for AttributeWeights {
    fn name(&self) -> &'static str {
        self.strategy().name()
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        self.strategy().determine_output_schema(input)
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        self.strategy().modify(data)
    }
}
