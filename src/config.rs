use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

use crate::driver::{AttributeWeightsFilter, InstanceWeightsFilter};
use crate::modifiers::attribute::AttributeWeights;
use crate::modifiers::instance::InstanceWeights;

// ---------------------------------------------------------------------------
// Host configuration file
// ---------------------------------------------------------------------------

/// Which modifiers the host applies, in JSON:
///
/// ```json
/// {
///   "attribute_weights": { "modifier": "fixed-value", "range": "2-4", "weight": 2.5 },
///   "instance_weights":  { "modifier": "from-attribute", "attribute": "last" }
/// }
/// ```
///
/// Without `attribute_weights` attributes pass through; without
/// `instance_weights` row weights are left alone.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct ReweightConfig {
    pub attribute_weights: AttributeWeights,
    pub instance_weights: Option<InstanceWeights>,
}

impl ReweightConfig {
    pub fn from_json(text: &str) -> Result<Self> {
        serde_json::from_str(text).context("parsing reweight configuration")
    }

    pub fn to_json(&self) -> Result<String> {
        serde_json::to_string_pretty(self).context("serializing reweight configuration")
    }

    /// Attribute filter for the configured strategy.
    pub fn attribute_filter(&self) -> AttributeWeightsFilter {
        AttributeWeightsFilter::new(self.attribute_weights.clone())
    }

    /// Instance filter, when a row strategy is configured.
    pub fn instance_filter(&self) -> Option<InstanceWeightsFilter> {
        self.instance_weights.clone().map(InstanceWeightsFilter::new)
    }
}

/// Read a [`ReweightConfig`] from a JSON file.
pub fn load_config(path: &Path) -> Result<ReweightConfig> {
    let text = std::fs::read_to_string(path)
        .with_context(|| format!("reading config {}", path.display()))?;
    ReweightConfig::from_json(&text).with_context(|| format!("in {}", path.display()))
}
