//! Strategies that rewrite row (instance) weights.
//!
//! The schema and every row's values, count and order are preserved;
//! only row weights change. Some strategies read a value column to
//! decide, but they never write to it.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use super::{WeightsModifier, check_rows, reweight_rows};
use crate::data::model::{AttributeKind, Dataset, Row, Schema};
use crate::data::weights;
use crate::error::{Result, WeightError};
use crate::select::{AttributeIndex, PatternMatcher, PatternSpec, RangeSpec};

/// Extended row validation unless the host opted out of it.
fn check(data: &Dataset, do_not_check_capabilities: bool) -> Result<()> {
    if do_not_check_capabilities {
        return Ok(());
    }
    check_rows(data)
}

// ---------------------------------------------------------------------------
// FixedValue – by row position
// ---------------------------------------------------------------------------

/// Sets the rows in `range` to `weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedValue {
    pub range: RangeSpec,
    pub weight: f64,
    pub do_not_check_capabilities: bool,
}

impl Default for FixedValue {
    fn default() -> Self {
        Self {
            range: RangeSpec::all(),
            weight: 1.0,
            do_not_check_capabilities: false,
        }
    }
}

impl WeightsModifier for FixedValue {
    fn name(&self) -> &'static str {
        "fixed-value"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        Ok(input.clone())
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        check(data, self.do_not_check_capabilities)?;
        let selection = self.range.bind(data.len() as i64)?;
        log::debug!(
            "range '{}' selects {} of {} rows",
            self.range,
            selection.count(),
            data.len()
        );
        Ok(reweight_rows(data, |i, _| {
            selection.contains(i).then_some(self.weight)
        }))
    }
}

// ---------------------------------------------------------------------------
// FromAttribute – weight read from a numeric column
// ---------------------------------------------------------------------------

/// Uses the value of one numeric attribute as each row's weight.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FromAttribute {
    pub attribute: AttributeIndex,
    pub do_not_check_capabilities: bool,
}

impl Default for FromAttribute {
    fn default() -> Self {
        Self {
            attribute: AttributeIndex::last(),
            do_not_check_capabilities: false,
        }
    }
}

impl FromAttribute {
    /// 0-based index of the numeric weight attribute in `schema`.
    pub fn resolve(&self, schema: &Schema) -> Result<usize> {
        let index = self.attribute.resolve(schema.num_attributes())?;
        let kind = schema.attributes[index].kind;
        if kind != AttributeKind::Numeric {
            return Err(WeightError::AttributeTypeMismatch {
                index: self.attribute.to_string(),
                expected: "numeric",
                found: kind,
            });
        }
        Ok(index)
    }
}

impl WeightsModifier for FromAttribute {
    fn name(&self) -> &'static str {
        "from-attribute"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        Ok(input.clone())
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        let index = self.resolve(&data.schema)?;
        check(data, self.do_not_check_capabilities)?;

        let mut missing = 0usize;
        let out = reweight_rows(data, |_, row| {
            let weight = row.value(index).and_then(|v| v.as_f64());
            if weight.is_none() {
                missing += 1;
            }
            Some(weight.unwrap_or(f64::NAN))
        });
        if missing > 0 {
            log::warn!(
                "{missing} of {} rows have no value for attribute {}; their weight is NaN",
                data.len(),
                self.attribute
            );
        }
        Ok(out)
    }
}

// ---------------------------------------------------------------------------
// FromFile – one weight per row, read from disk
// ---------------------------------------------------------------------------

/// Assigns the i-th weight of a weights file to the i-th row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FromFile {
    pub path: PathBuf,
    pub do_not_check_capabilities: bool,
}

impl Default for FromFile {
    fn default() -> Self {
        Self {
            path: PathBuf::from("."),
            do_not_check_capabilities: false,
        }
    }
}

impl WeightsModifier for FromFile {
    fn name(&self) -> &'static str {
        "from-file"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        Ok(input.clone())
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        check(data, self.do_not_check_capabilities)?;
        let loaded = weights::load_weights(&self.path)?;
        let loaded = weights::reconcile(loaded, data.len(), "rows")?;
        Ok(reweight_rows(data, |i, _| loaded.get(i).copied()))
    }
}

// ---------------------------------------------------------------------------
// Attribute value selection
// ---------------------------------------------------------------------------

/// Selects rows by matching one nominal or string attribute's value
/// against a pattern. Pair it with a weighting policy, such as
/// [`FixedValueByAttributeValue`], or bind it directly and use
/// [`BoundSelector::is_selected`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AttributeValueSelector {
    pub attribute: AttributeIndex,
    #[serde(flatten)]
    pub pattern: PatternSpec,
}

impl Default for AttributeValueSelector {
    fn default() -> Self {
        Self {
            attribute: AttributeIndex::first(),
            pattern: PatternSpec::default(),
        }
    }
}

impl AttributeValueSelector {
    /// Resolve the attribute and compile the pattern against `schema`.
    pub fn bind(&self, schema: &Schema) -> Result<BoundSelector> {
        let index = self.attribute.resolve(schema.num_attributes())?;
        let kind = schema.attributes[index].kind;
        if !matches!(kind, AttributeKind::Nominal | AttributeKind::String) {
            return Err(WeightError::AttributeTypeMismatch {
                index: self.attribute.to_string(),
                expected: "nominal or string",
                found: kind,
            });
        }
        Ok(BoundSelector {
            index,
            matcher: self.pattern.compile()?,
        })
    }
}

/// An [`AttributeValueSelector`] resolved against one schema.
#[derive(Debug, Clone)]
pub struct BoundSelector {
    index: usize,
    matcher: PatternMatcher,
}

impl BoundSelector {
    /// 0-based index of the attribute whose values are matched.
    pub fn index(&self) -> usize {
        self.index
    }

    /// Whether the row's value (as text; missing reads as `?`) matches.
    pub fn is_selected(&self, row: &Row) -> bool {
        row.value(self.index)
            .is_some_and(|value| self.matcher.matches(&value.to_string()))
    }
}

/// Sets rows whose attribute value is selected to `weight`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FixedValueByAttributeValue {
    #[serde(flatten)]
    pub selector: AttributeValueSelector,
    pub weight: f64,
    pub do_not_check_capabilities: bool,
}

impl Default for FixedValueByAttributeValue {
    fn default() -> Self {
        Self {
            selector: AttributeValueSelector::default(),
            weight: 1.0,
            do_not_check_capabilities: false,
        }
    }
}

impl WeightsModifier for FixedValueByAttributeValue {
    fn name(&self) -> &'static str {
        "fixed-value-by-attribute-value"
    }

    fn determine_output_schema(&self, input: &Schema) -> Result<Schema> {
        Ok(input.clone())
    }

    fn modify(&self, data: &Dataset) -> Result<Dataset> {
        let selector = self.selector.bind(&data.schema)?;
        check(data, self.do_not_check_capabilities)?;
        Ok(reweight_rows(data, |_, row| {
            selector.is_selected(row).then_some(self.weight)
        }))
    }
}

// ---------------------------------------------------------------------------
// Registry
// ---------------------------------------------------------------------------

/// Row weight strategy chosen by name, with its own options.
///
/// Serialized with a `"modifier"` tag, e.g.
/// `{"modifier": "from-attribute", "attribute": "3"}`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "modifier", rename_all = "kebab-case")]
pub enum InstanceWeights {
    FixedValue(FixedValue),
    FromAttribute(FromAttribute),
    FromFile(FromFile),
    FixedValueByAttributeValue(FixedValueByAttributeValue),
}

impl InstanceWeights {
    /// Registered strategy names.
    pub const NAMES: &'static [&'static str] = &[
        "fixed-value",
        "from-attribute",
        "from-file",
        "fixed-value-by-attribute-value",
    ];

    /// Default-configured strategy registered under `name`.
    pub fn from_name(name: &str) -> Result<Self> {
        match name {
            "fixed-value" => Ok(Self::FixedValue(FixedValue::default())),
            "from-attribute" => Ok(Self::FromAttribute(FromAttribute::default())),
            "from-file" => Ok(Self::FromFile(FromFile::default())),
            "fixed-value-by-attribute-value" => Ok(Self::FixedValueByAttributeValue(
                FixedValueByAttributeValue::default(),
            )),
            other => Err(WeightError::UnknownModifier(other.to_string())),
        }
    }

    fn strategy(&self) -> &dyn WeightsModifier {
        match self {
            Self::FixedValue(m) => m,
            Self::FromAttribute(m) => m,
            Self::FromFile(m) => m,
            Self::FixedValueByAttributeValue(m) => m,
        }
    }
}

impl WeightsModifier for InstanceWeights {
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::{Attribute, Value};
    use std::io::Write;

    /// Three rows over (colour: nominal, size: numeric, w: numeric).
    fn sample() -> Dataset {
        let schema = Schema::new(
            "sample",
            vec![
                Attribute::new("colour", AttributeKind::Nominal),
                Attribute::new("size", AttributeKind::Numeric),
                Attribute::new("w", AttributeKind::Numeric),
            ],
        );
        let row = |colour: &str, size: f64, w: f64| {
            Row::new(vec![
                Value::Nominal(colour.into()),
                Value::Numeric(size),
                Value::Numeric(w),
            ])
        };
        Dataset::new(
            schema,
            vec![row("red", 1.0, 0.1), row("green", 2.0, 0.2), row("red", 3.0, 0.3)],
        )
    }

    #[test]
    fn fixed_value_sets_selected_rows() {
        let modifier = FixedValue {
            range: "2-last".parse().unwrap(),
            weight: 5.0,
            ..Default::default()
        };
        let data = sample();
        let out = modifier.modify(&data).unwrap();
        assert_eq!(out.row_weights(), vec![1.0, 5.0, 5.0]);
        assert_eq!(out.schema, data.schema);
        for (a, b) in out.rows.iter().zip(&data.rows) {
            assert_eq!(a.values, b.values);
        }
    }

    #[test]
    fn fixed_value_rebinds_per_dataset() {
        let modifier = FixedValue {
            range: "last".parse().unwrap(),
            weight: 0.0,
            ..Default::default()
        };
        let mut data = sample();
        assert_eq!(modifier.modify(&data).unwrap().row_weights(), vec![1.0, 1.0, 0.0]);
        data.rows.pop();
        assert_eq!(modifier.modify(&data).unwrap().row_weights(), vec![1.0, 0.0]);
    }

    #[test]
    fn from_attribute_copies_numeric_column() {
        let modifier = FromAttribute {
            attribute: AttributeIndex::new("3"),
            ..Default::default()
        };
        let data = sample();
        let out = modifier.modify(&data).unwrap();
        assert_eq!(out.row_weights(), vec![0.1, 0.2, 0.3]);
        assert_eq!(out.schema, data.schema);

        // default is the last attribute, which is the same column here
        let out = FromAttribute::default().modify(&data).unwrap();
        assert_eq!(out.row_weights(), vec![0.1, 0.2, 0.3]);
    }

    #[test]
    fn from_attribute_rejects_nominal_column() {
        let modifier = FromAttribute {
            attribute: AttributeIndex::first(),
            ..Default::default()
        };
        let data = sample();
        let before = data.clone();
        assert!(matches!(
            modifier.modify(&data),
            Err(WeightError::AttributeTypeMismatch {
                found: AttributeKind::Nominal,
                ..
            })
        ));
        assert_eq!(data, before);
    }

    #[test]
    fn from_attribute_rejects_out_of_range_index() {
        let modifier = FromAttribute {
            attribute: AttributeIndex::new("9"),
            ..Default::default()
        };
        assert!(matches!(
            modifier.modify(&sample()),
            Err(WeightError::InvalidAttributeIndex { count: 3, .. })
        ));
    }

    #[test]
    fn from_attribute_missing_value_gives_nan() {
        let mut data = sample();
        data.rows[1].values[2] = Value::Missing;
        let out = FromAttribute::default().modify(&data).unwrap();
        assert!(out.rows[1].weight.is_nan());
        assert_eq!(out.rows[0].weight, 0.1);
    }

    #[test]
    fn from_file_assigns_and_truncates() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"2\n4\n6\n8\n").unwrap();
        let modifier = FromFile {
            path: file.path().to_path_buf(),
            ..Default::default()
        };
        let out = modifier.modify(&sample()).unwrap();
        assert_eq!(out.row_weights(), vec![2.0, 4.0, 6.0]);
    }

    #[test]
    fn from_file_needs_one_weight_per_row() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        file.write_all(b"2\n").unwrap();
        let modifier = FromFile {
            path: file.path().to_path_buf(),
            ..Default::default()
        };
        assert!(matches!(
            modifier.modify(&sample()),
            Err(WeightError::InsufficientWeights {
                available: 1,
                required: 3
            })
        ));
    }

    #[test]
    fn capability_check_can_be_skipped() {
        let mut data = sample();
        data.rows[0].values.pop();
        let strict = FixedValue::default();
        assert!(matches!(
            strict.modify(&data),
            Err(WeightError::RowShapeMismatch { row: 0, .. })
        ));
        let lenient = FixedValue {
            do_not_check_capabilities: true,
            ..Default::default()
        };
        assert!(lenient.modify(&data).is_ok());
    }

    #[test]
    fn selector_matches_attribute_values() {
        let data = sample();
        let selector = AttributeValueSelector {
            attribute: AttributeIndex::first(),
            pattern: PatternSpec::new("r.*", false),
        }
        .bind(&data.schema)
        .unwrap();
        let picked: Vec<bool> = data.rows.iter().map(|r| selector.is_selected(r)).collect();
        assert_eq!(picked, vec![true, false, true]);
    }

    #[test]
    fn selector_requires_nominal_or_string() {
        let selector = AttributeValueSelector {
            attribute: AttributeIndex::new("2"),
            ..Default::default()
        };
        assert!(matches!(
            selector.bind(&sample().schema),
            Err(WeightError::AttributeTypeMismatch {
                found: AttributeKind::Numeric,
                ..
            })
        ));
    }

    #[test]
    fn fixed_value_by_attribute_value_weights_matches() {
        let modifier = FixedValueByAttributeValue {
            selector: AttributeValueSelector {
                attribute: AttributeIndex::first(),
                pattern: PatternSpec::new("red", true),
            },
            weight: 9.0,
            ..Default::default()
        };
        let out = modifier.modify(&sample()).unwrap();
        assert_eq!(out.row_weights(), vec![1.0, 9.0, 1.0]);
    }

    #[test]
    fn registry_reads_tagged_json() {
        let modifier: InstanceWeights = serde_json::from_str(
            r#"{"modifier": "fixed-value-by-attribute-value", "attribute": "1", "regex": "green", "weight": 3.0}"#,
        )
        .unwrap();
        assert_eq!(modifier.modify(&sample()).unwrap().row_weights(), vec![1.0, 3.0, 1.0]);

        for name in InstanceWeights::NAMES {
            assert_eq!(InstanceWeights::from_name(name).unwrap().name(), *name);
        }
        assert!(InstanceWeights::from_name("pass-through").is_err());
    }

    #[test]
    fn no_data_is_reported() {
        assert!(matches!(
            InstanceWeights::from_name("fixed-value").unwrap().apply(None),
            Err(WeightError::NoDataProvided)
        ));
    }
}
