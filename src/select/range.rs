use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::{Result, WeightError};

// ---------------------------------------------------------------------------
// Position – one side of a range token
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Position {
    First,
    Last,
    /// 1-based literal position.
    At(usize),
}

impl Position {
    fn parse(spec: &str, token: &str) -> Result<Self> {
        match token {
            "first" => Ok(Position::First),
            "last" => Ok(Position::Last),
            _ => match token.parse::<usize>() {
                Ok(0) => Err(WeightError::range(spec, "positions start at 1")),
                Ok(n) => Ok(Position::At(n)),
                Err(_) => Err(WeightError::range(
                    spec,
                    format!("'{token}' is neither a number nor first/last"),
                )),
            },
        }
    }

    /// 1-based position against `count` items, before clamping.
    fn ordinal(self, count: usize) -> usize {
        match self {
            Position::First => 1,
            Position::Last => count,
            Position::At(n) => n,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Token {
    Single(Position),
    Span(Position, Position),
}

// ---------------------------------------------------------------------------
// RangeSpec – validated range text, not yet bound to a size
// ---------------------------------------------------------------------------

/// A set of 1-based positions such as `first-3,5,6-10,last`.
///
/// The text is checked for syntax on construction; bounds that
/// depend on the dataset size (`last`) are checked by [`RangeSpec::bind`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct RangeSpec {
    text: String,
    tokens: Vec<Token>,
}

impl RangeSpec {
    /// The range selecting every position.
    pub const ALL: &'static str = "first-last";

    pub fn new(text: &str) -> Result<Self> {
        let text = text.trim();
        let mut tokens = Vec::new();
        if !text.is_empty() {
            for raw in text.split(',') {
                tokens.push(parse_token(text, raw.trim())?);
            }
        }
        Ok(Self {
            text: text.to_string(),
            tokens,
        })
    }

    pub fn all() -> Self {
        Self {
            text: Self::ALL.to_string(),
            tokens: vec![Token::Span(Position::First, Position::Last)],
        }
    }

    pub fn as_str(&self) -> &str {
        &self.text
    }

    /// Resolve the range against `count` items (attributes or rows).
    ///
    /// Literal positions past the end are clamped to the last item, so
    /// `5-10` bound to 3 selects index 2 only. Span order is checked on the
    /// resolved positions *before* clamping: `5-last` bound to 3 resolves to
    /// `5-3` and fails with [`WeightError::InvalidRangeSpec`] rather than
    /// selecting the last item.
    ///
    /// Binding again with another size yields an independent selection.
    pub fn bind(&self, count: i64) -> Result<IndexSelection> {
        let count =
            usize::try_from(count).map_err(|_| WeightError::InvalidUpperBound(count))?;
        let mut members = vec![false; count];
        if count == 0 {
            return Ok(IndexSelection { members });
        }

        for token in &self.tokens {
            let (lo, hi) = match *token {
                Token::Single(p) => (p.ordinal(count), p.ordinal(count)),
                Token::Span(a, b) => (a.ordinal(count), b.ordinal(count)),
            };
            if lo > hi {
                return Err(WeightError::range(
                    &self.text,
                    format!("span resolves to {lo}-{hi} for {count} items"),
                ));
            }
            let lo = lo.min(count) - 1;
            let hi = hi.min(count) - 1;
            for slot in &mut members[lo..=hi] {
                *slot = true;
            }
        }
        Ok(IndexSelection { members })
    }
}

fn parse_token(spec: &str, token: &str) -> Result<Token> {
    if token.is_empty() {
        return Err(WeightError::range(spec, "empty token"));
    }
    let Some((lo, hi)) = token.split_once('-') else {
        return Position::parse(spec, token).map(Token::Single);
    };
    let (lo, hi) = (lo.trim(), hi.trim());
    if lo.is_empty() || hi.is_empty() || hi.contains('-') {
        return Err(WeightError::range(spec, format!("malformed span '{token}'")));
    }
    let lo = Position::parse(spec, lo)?;
    let hi = Position::parse(spec, hi)?;
    if let (Position::At(a), Position::At(b)) = (lo, hi) {
        if a > b {
            return Err(WeightError::range(spec, format!("span {a}-{b} is reversed")));
        }
    }
    Ok(Token::Span(lo, hi))
}

impl Default for RangeSpec {
    fn default() -> Self {
        Self::all()
    }
}

impl FromStr for RangeSpec {
    type Err = WeightError;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl TryFrom<String> for RangeSpec {
    type Error = WeightError;

    fn try_from(value: String) -> Result<Self> {
        Self::new(&value)
    }
}

impl From<RangeSpec> for String {
    fn from(spec: RangeSpec) -> Self {
        spec.text
    }
}

impl fmt::Display for RangeSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

// ---------------------------------------------------------------------------
// IndexSelection – a range bound to a concrete size
// ---------------------------------------------------------------------------

/// Membership of 0-based indices in a bound [`RangeSpec`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct IndexSelection {
    members: Vec<bool>,
}

impl IndexSelection {
    /// Whether the 0-based `index` is selected; indices past the bound never are.
    pub fn contains(&self, index: usize) -> bool {
        self.members.get(index).copied().unwrap_or(false)
    }

    /// The size this selection was bound to.
    pub fn bound(&self) -> usize {
        self.members.len()
    }

    /// Selected indices in ascending order.
    pub fn indices(&self) -> impl Iterator<Item = usize> + '_ {
        self.members
            .iter()
            .enumerate()
            .filter(|(_, selected)| **selected)
            .map(|(i, _)| i)
    }

    pub fn count(&self) -> usize {
        self.members.iter().filter(|selected| **selected).count()
    }
}

// ---------------------------------------------------------------------------
// AttributeIndex – a single 1-based position or first/last
// ---------------------------------------------------------------------------

/// One attribute position: `first`, `last`, or a 1-based number.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AttributeIndex(String);

impl AttributeIndex {
    pub fn new(text: impl Into<String>) -> Self {
        Self(text.into())
    }

    pub fn first() -> Self {
        Self::new("first")
    }

    pub fn last() -> Self {
        Self::new("last")
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Resolve to a 0-based index among `count` attributes.
    pub fn resolve(&self, count: usize) -> Result<usize> {
        let text = self.0.trim();
        let position = match text {
            "first" => 1,
            "last" => count,
            _ => text.parse::<usize>().unwrap_or(0),
        };
        if position == 0 || position > count {
            return Err(WeightError::InvalidAttributeIndex {
                index: self.0.clone(),
                count,
            });
        }
        Ok(position - 1)
    }
}

impl fmt::Display for AttributeIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn selected(spec: &str, count: i64) -> Vec<usize> {
        RangeSpec::new(spec).unwrap().bind(count).unwrap().indices().collect()
    }

    #[test]
    fn mixed_tokens_resolve_to_zero_based_indices() {
        let selection = RangeSpec::new("first-3,5,6-10,last")
            .unwrap()
            .bind(11)
            .unwrap();
        for i in [0, 1, 2, 4, 5, 6, 7, 8, 9, 10] {
            assert!(selection.contains(i), "index {i} should be selected");
        }
        assert!(!selection.contains(3));
        assert!(!selection.contains(11));
    }

    #[test]
    fn default_range_selects_everything() {
        for count in 0..20 {
            let selection = RangeSpec::default().bind(count).unwrap();
            assert_eq!(selection.count(), count as usize);
        }
    }

    #[test]
    fn literal_positions_past_the_end_are_clamped() {
        assert_eq!(selected("2-10", 4), vec![1, 2, 3]);
        assert_eq!(selected("7", 3), vec![2]);
    }

    #[test]
    fn order_is_checked_before_clamping() {
        assert_eq!(selected("5-10", 3), vec![2]);
        assert!(matches!(
            RangeSpec::new("5-last").unwrap().bind(3),
            Err(WeightError::InvalidRangeSpec { .. })
        ));
        assert_eq!(selected("5-last", 5), vec![4]);
    }

    #[test]
    fn empty_text_selects_nothing() {
        assert_eq!(selected("", 5), Vec::<usize>::new());
    }

    #[test]
    fn whitespace_around_tokens_is_ignored() {
        assert_eq!(selected(" 1 , 3 - last ", 4), vec![0, 2, 3]);
    }

    #[test]
    fn malformed_tokens_are_rejected() {
        for bad in ["abc", "1-", "-2", "1-2-3", "0", "1,,2", "first-x", "4-2"] {
            assert!(
                matches!(RangeSpec::new(bad), Err(WeightError::InvalidRangeSpec { .. })),
                "'{bad}' should not parse"
            );
        }
    }

    #[test]
    fn keyword_span_checked_at_bind_time() {
        let spec = RangeSpec::new("last-3").unwrap();
        assert!(spec.bind(3).is_ok());
        assert!(matches!(
            spec.bind(5),
            Err(WeightError::InvalidRangeSpec { .. })
        ));
        // rebinding to a different size re-validates
        assert_eq!(spec.bind(2).unwrap().indices().collect::<Vec<_>>(), vec![1]);
    }

    #[test]
    fn negative_bound_is_rejected() {
        assert!(matches!(
            RangeSpec::default().bind(-1),
            Err(WeightError::InvalidUpperBound(-1))
        ));
    }

    #[test]
    fn serde_round_trips_through_text() {
        let spec: RangeSpec = serde_json::from_str("\"2-4\"").unwrap();
        assert_eq!(spec.as_str(), "2-4");
        assert_eq!(serde_json::to_string(&spec).unwrap(), "\"2-4\"");
        assert!(serde_json::from_str::<RangeSpec>("\"2-x\"").is_err());
    }

    #[test]
    fn attribute_index_resolution() {
        assert_eq!(AttributeIndex::first().resolve(4).unwrap(), 0);
        assert_eq!(AttributeIndex::last().resolve(4).unwrap(), 3);
        assert_eq!(AttributeIndex::new("2").resolve(4).unwrap(), 1);
        for bad in ["0", "5", "x", "-1"] {
            assert!(matches!(
                AttributeIndex::new(bad).resolve(4),
                Err(WeightError::InvalidAttributeIndex { .. })
            ));
        }
        assert!(AttributeIndex::first().resolve(0).is_err());
    }
}
