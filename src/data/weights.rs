use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use crate::error::{Result, SourceProblem, WeightError};

// ---------------------------------------------------------------------------
// Weights file: one floating-point literal per line
// ---------------------------------------------------------------------------

/// Make sure `path` names a single existing file before reading it.
pub fn check_source(path: &Path) -> Result<()> {
    if !path.exists() {
        return Err(WeightError::weight_source(path, SourceProblem::Missing));
    }
    if path.is_dir() {
        return Err(WeightError::weight_source(path, SourceProblem::Directory));
    }
    Ok(())
}

/// Load every weight from the file at `path`.
///
/// The file handle is dropped on every exit path, including a parse
/// failure halfway through.
pub fn load_weights(path: &Path) -> Result<Vec<f64>> {
    check_source(path)?;
    let file = File::open(path)
        .map_err(|e| WeightError::weight_source(path, SourceProblem::Unreadable(e)))?;
    parse_lines(BufReader::new(file), path)
}

/// Read weights from an already-open stream.
pub fn read_weights<R: BufRead>(reader: R) -> Result<Vec<f64>> {
    parse_lines(reader, Path::new("<stream>"))
}

fn parse_lines<R: BufRead>(reader: R, origin: &Path) -> Result<Vec<f64>> {
    // `lines()` already drops the empty piece after a final newline.
    let mut weights = Vec::new();
    for (i, line) in reader.lines().enumerate() {
        let line =
            line.map_err(|e| WeightError::weight_source(origin, SourceProblem::Unreadable(e)))?;
        let text = line.trim();
        let weight = text.parse::<f64>().map_err(|_| WeightError::MalformedWeight {
            line: i + 1,
            text: text.to_string(),
        })?;
        weights.push(weight);
    }
    Ok(weights)
}

// ---------------------------------------------------------------------------
// Count reconciliation
// ---------------------------------------------------------------------------

/// How a weight vector compares to the number of positions needing one.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Supply {
    Exact,
    /// More weights than needed; the count of unused trailing entries.
    Surplus(usize),
}

/// Compare `available` weights against `required` positions.
pub fn supply(available: usize, required: usize) -> Result<Supply> {
    if available < required {
        return Err(WeightError::InsufficientWeights {
            available,
            required,
        });
    }
    Ok(match available - required {
        0 => Supply::Exact,
        extra => Supply::Surplus(extra),
    })
}

/// Truncate `weights` to `required` entries, warning when some are unused.
/// `what` names the positions ("attributes", "rows") in the warning.
pub fn reconcile(mut weights: Vec<f64>, required: usize, what: &str) -> Result<Vec<f64>> {
    if let Supply::Surplus(_) = supply(weights.len(), required)? {
        log::warn!(
            "More weights than {what}: {} > {required}",
            weights.len()
        );
        weights.truncate(required);
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    #[test]
    fn reads_one_weight_per_line() {
        let weights = read_weights(Cursor::new("1.0\n2.5\n-3\n")).unwrap();
        assert_eq!(weights, vec![1.0, 2.5, -3.0]);
    }

    #[test]
    fn last_line_without_newline_counts() {
        let weights = read_weights(Cursor::new("1.0\n2.0")).unwrap();
        assert_eq!(weights, vec![1.0, 2.0]);
    }

    #[test]
    fn blank_line_in_the_middle_is_malformed() {
        let err = read_weights(Cursor::new("1.0\n\n2.0\n")).unwrap_err();
        assert!(matches!(err, WeightError::MalformedWeight { line: 2, .. }));
    }

    #[test]
    fn extra_trailing_blank_line_is_malformed() {
        let err = read_weights(Cursor::new("1.0\n2.0\n\n")).unwrap_err();
        assert!(matches!(err, WeightError::MalformedWeight { line: 3, .. }));
    }

    #[test]
    fn non_numeric_line_reports_text() {
        match read_weights(Cursor::new("0.5\nheavy\n")).unwrap_err() {
            WeightError::MalformedWeight { line, text } => {
                assert_eq!(line, 2);
                assert_eq!(text, "heavy");
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn supply_classifies_counts() {
        assert_eq!(supply(3, 3).unwrap(), Supply::Exact);
        assert_eq!(supply(4, 3).unwrap(), Supply::Surplus(1));
        assert!(matches!(
            supply(2, 3),
            Err(WeightError::InsufficientWeights {
                available: 2,
                required: 3
            })
        ));
    }

    #[test]
    fn reconcile_keeps_prefix() {
        let weights = reconcile(vec![1.0, 2.0, 3.0, 9.9], 3, "attributes").unwrap();
        assert_eq!(weights, vec![1.0, 2.0, 3.0]);
    }

    #[test]
    fn missing_file_and_directory_are_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_weights(dir.path()).unwrap_err();
        assert!(matches!(
            err,
            WeightError::WeightSource {
                problem: SourceProblem::Directory,
                ..
            }
        ));

        let err = load_weights(&dir.path().join("nope.txt")).unwrap_err();
        assert!(matches!(
            err,
            WeightError::WeightSource {
                problem: SourceProblem::Missing,
                ..
            }
        ));
    }
}
