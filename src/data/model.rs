use std::fmt;

use serde::{Deserialize, Serialize};

// ---------------------------------------------------------------------------
// Value – a single cell of a row
// ---------------------------------------------------------------------------

/// A dynamically-typed cell value, one variant per attribute kind.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Value {
    Numeric(f64),
    /// Label of a nominal attribute.
    Nominal(String),
    String(String),
    /// ISO-8601 date string kept as text.
    Date(String),
    Missing,
}

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Value::Numeric(v) => write!(f, "{v}"),
            Value::Nominal(s) | Value::String(s) | Value::Date(s) => write!(f, "{s}"),
            Value::Missing => write!(f, "?"),
        }
    }
}

impl Value {
    /// Try to interpret the value as an `f64`.
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            Value::Numeric(v) => Some(*v),
            _ => None,
        }
    }

    pub fn is_missing(&self) -> bool {
        matches!(self, Value::Missing)
    }

    /// Whether this value may be stored under an attribute of `kind`.
    /// Missing values fit every kind.
    pub fn fits(&self, kind: AttributeKind) -> bool {
        matches!(
            (self, kind),
            (Value::Missing, _)
                | (Value::Numeric(_), AttributeKind::Numeric)
                | (Value::Nominal(_), AttributeKind::Nominal)
                | (Value::String(_), AttributeKind::String)
                | (Value::Date(_), AttributeKind::Date)
        )
    }
}

// ---------------------------------------------------------------------------
// Attribute – one column of the schema
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AttributeKind {
    Numeric,
    Nominal,
    String,
    Date,
}

impl fmt::Display for AttributeKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            AttributeKind::Numeric => "numeric",
            AttributeKind::Nominal => "nominal",
            AttributeKind::String => "string",
            AttributeKind::Date => "date",
        };
        f.write_str(name)
    }
}

/// A named, typed column carrying its own scalar weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attribute {
    pub name: String,
    pub kind: AttributeKind,
    pub weight: f64,
}

impl Attribute {
    /// New attribute with the default weight of 1.0.
    pub fn new(name: impl Into<String>, kind: AttributeKind) -> Self {
        Self {
            name: name.into(),
            kind,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }
}

// ---------------------------------------------------------------------------
// Row – one instance of the dataset
// ---------------------------------------------------------------------------

/// A single record: values aligned to the schema attributes plus a weight.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Row {
    pub values: Vec<Value>,
    pub weight: f64,
}

impl Row {
    /// New row with the default weight of 1.0.
    pub fn new(values: Vec<Value>) -> Self {
        Self {
            values,
            weight: 1.0,
        }
    }

    pub fn with_weight(mut self, weight: f64) -> Self {
        self.weight = weight;
        self
    }

    pub fn value(&self, index: usize) -> Option<&Value> {
        self.values.get(index)
    }
}

// ---------------------------------------------------------------------------
// Schema / Dataset
// ---------------------------------------------------------------------------

/// Column layout of a dataset, without any rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Schema {
    pub relation: String,
    pub attributes: Vec<Attribute>,
}

impl Schema {
    pub fn new(relation: impl Into<String>, attributes: Vec<Attribute>) -> Self {
        Self {
            relation: relation.into(),
            attributes,
        }
    }

    pub fn num_attributes(&self) -> usize {
        self.attributes.len()
    }

    pub fn attribute(&self, index: usize) -> Option<&Attribute> {
        self.attributes.get(index)
    }

    /// Attribute weights in schema order.
    pub fn weights(&self) -> Vec<f64> {
        self.attributes.iter().map(|a| a.weight).collect()
    }

    /// Structural equality where weights compare bit for bit, so two
    /// schemas carrying the same `NaN` weight are considered equal.
    pub fn same_shape_and_weights(&self, other: &Schema) -> bool {
        self.relation == other.relation
            && self.attributes.len() == other.attributes.len()
            && self
                .attributes
                .iter()
                .zip(&other.attributes)
                .all(|(a, b)| {
                    a.name == b.name && a.kind == b.kind && a.weight.to_bits() == b.weight.to_bits()
                })
    }
}

/// The full in-memory dataset: schema plus rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Dataset {
    pub schema: Schema,
    pub rows: Vec<Row>,
}

impl Dataset {
    pub fn new(schema: Schema, rows: Vec<Row>) -> Self {
        Self { schema, rows }
    }

    /// Empty dataset sharing `schema`.
    pub fn empty(schema: Schema) -> Self {
        Self {
            schema,
            rows: Vec::new(),
        }
    }

    pub fn num_attributes(&self) -> usize {
        self.schema.num_attributes()
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Whether the dataset has no rows.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    /// Row weights in row order.
    pub fn row_weights(&self) -> Vec<f64> {
        self.rows.iter().map(|r| r.weight).collect()
    }
}
