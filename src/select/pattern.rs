use regex::Regex;
use serde::{Deserialize, Serialize};

use crate::error::{Result, WeightError};

/// Regular expression plus match inversion, as configured by a host.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PatternSpec {
    pub regex: String,
    pub invert: bool,
}

impl PatternSpec {
    /// Pattern matching every string.
    pub const MATCH_ALL: &'static str = ".*";

    pub fn new(regex: impl Into<String>, invert: bool) -> Self {
        Self {
            regex: regex.into(),
            invert,
        }
    }

    /// Compile into an immutable matcher. Each call yields a fresh matcher,
    /// so editing the pattern afterwards never affects one already handed out.
    pub fn compile(&self) -> Result<PatternMatcher> {
        let invalid = |source: regex::Error| WeightError::InvalidPattern {
            pattern: self.regex.clone(),
            source,
        };
        // validate alone first, so a stray `)` cannot close the anchoring group
        Regex::new(&self.regex).map_err(invalid)?;
        let regex = Regex::new(&format!(r"\A(?:{})\z", self.regex)).map_err(invalid)?;
        Ok(PatternMatcher {
            regex,
            invert: self.invert,
        })
    }
}

impl Default for PatternSpec {
    fn default() -> Self {
        Self::new(Self::MATCH_ALL, false)
    }
}

/// Compiled full-string matcher.
#[derive(Debug, Clone)]
pub struct PatternMatcher {
    regex: Regex,
    invert: bool,
}

impl PatternMatcher {
    pub fn matches(&self, text: &str) -> bool {
        self.regex.is_match(text) != self.invert
    }
}
