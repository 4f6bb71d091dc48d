//! Representative value of a feature bucket
//!
//! Numeric buckets reduce to their arithmetic mean, text buckets to their
//! most frequent value. The caller either picks the typed function directly
//! ([`mean`], [`mode`]) or lets [`representative`] dispatch on the
//! [`FieldValue`] variants.

use crate::models::FieldValue;
use thiserror::Error;

/// Averaging errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum AverageError {
    #[error("cannot average an empty sequence")]
    EmptyInput,

    #[error("cannot average a mix of numeric and text values")]
    MixedTypes,
}

/// Arithmetic mean
pub fn mean(values: &[f64]) -> Result<f64, AverageError> {
    if values.is_empty() {
        return Err(AverageError::EmptyInput);
    }
    Ok(values.iter().sum::<f64>() / values.len() as f64)
}

/// Most frequent value
///
/// Ties go to the value that appears first in `values`.
pub fn mode<'a>(values: &[&'a str]) -> Result<&'a str, AverageError> {
    // (value, count) in first-seen order
    let mut counts: Vec<(&'a str, usize)> = Vec::new();
    for value in values {
        match counts.iter_mut().find(|(v, _)| v == value) {
            Some((_, count)) => *count += 1,
            None => counts.push((*value, 1)),
        }
    }

    let mut best: Option<(&'a str, usize)> = None;
    for (value, count) in counts {
        match best {
            Some((_, best_count)) if count <= best_count => {}
            _ => best = Some((value, count)),
        }
    }

    best.map(|(value, _)| value).ok_or(AverageError::EmptyInput)
}

/// Reduce a single-typed bucket to one value
///
/// All numeric (integers and floats may mix) → `Float(mean)`;
/// all text → `Text(mode)`.
pub fn representative(values: &[FieldValue]) -> Result<FieldValue, AverageError> {
    let first = values.first().ok_or(AverageError::EmptyInput)?;

    if first.is_numeric() {
        let numbers = values
            .iter()
            .map(FieldValue::as_f64)
            .collect::<Option<Vec<f64>>>()
            .ok_or(AverageError::MixedTypes)?;
        return mean(&numbers).map(FieldValue::Float);
    }

    let texts = values
        .iter()
        .map(FieldValue::as_text)
        .collect::<Option<Vec<&str>>>()
        .ok_or(AverageError::MixedTypes)?;
    mode(&texts).map(|s| FieldValue::Text(s.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mean_of_floats() {
        let result = mean(&[0.2, 0.4, 0.9]).unwrap();
        assert!((result - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_mean_single_value() {
        assert_eq!(mean(&[-7.25]).unwrap(), -7.25);
    }

    #[test]
    fn test_mean_empty_is_error() {
        assert_eq!(mean(&[]), Err(AverageError::EmptyInput));
    }

    #[test]
    fn test_mode_picks_most_frequent() {
        assert_eq!(mode(&["minor", "major", "major", "minor", "major"]).unwrap(), "major");
    }

    #[test]
    fn test_mode_tie_goes_to_first_seen() {
        assert_eq!(mode(&["b", "a", "a", "b"]).unwrap(), "b");
        assert_eq!(mode(&["x", "y", "z"]).unwrap(), "x");
    }

    #[test]
    fn test_mode_result_has_maximum_frequency() {
        let values = ["c", "a", "b", "a", "c", "b", "c", "a", "d"];
        let chosen = mode(&values).unwrap();
        let count_of = |v: &str| values.iter().filter(|x| **x == v).count();
        let max = values.iter().map(|v| count_of(v)).max().unwrap();
        assert_eq!(count_of(chosen), max);
    }

    #[test]
    fn test_mode_empty_is_error() {
        assert_eq!(mode(&[]), Err(AverageError::EmptyInput));
    }

    #[test]
    fn test_representative_numeric_mixes_int_and_float() {
        let values = vec![FieldValue::Int(120), FieldValue::Float(130.0), FieldValue::Int(110)];
        assert_eq!(representative(&values).unwrap(), FieldValue::Float(120.0));
    }

    #[test]
    fn test_representative_text_is_mode() {
        let values = vec![
            FieldValue::from("audio_features"),
            FieldValue::from("audio_features"),
        ];
        assert_eq!(
            representative(&values).unwrap(),
            FieldValue::from("audio_features")
        );
    }

    #[test]
    fn test_representative_mixed_is_error() {
        let numeric_first = vec![FieldValue::Float(0.1), FieldValue::from("x")];
        let text_first = vec![FieldValue::from("x"), FieldValue::Int(1)];
        assert_eq!(representative(&numeric_first), Err(AverageError::MixedTypes));
        assert_eq!(representative(&text_first), Err(AverageError::MixedTypes));
    }

    #[test]
    fn test_representative_empty_is_error() {
        assert_eq!(representative(&[]), Err(AverageError::EmptyInput));
    }
}
