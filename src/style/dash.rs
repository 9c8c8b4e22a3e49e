use crate::error::{Result, StrokeError};

/// Alternating on/off dash lengths in units of the stroke width.
///
/// An empty pattern means a solid line. Non-empty patterns have an even
/// number of strictly positive, finite entries.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct DashPattern {
    lengths: Vec<f64>,
}

impl DashPattern {
    /// Validates and creates a dash pattern.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidDashPattern`] if the pattern has an odd
    /// number of entries or an entry that is not a positive finite number.
    pub fn new(lengths: &[f64]) -> Result<Self> {
        if lengths.len() % 2 != 0 {
            return Err(StrokeError::InvalidDashPattern(format!(
                "expected an even number of entries, got {}",
                lengths.len()
            )));
        }
        if let Some(bad) = lengths.iter().find(|l| !(l.is_finite() && **l > 0.0)) {
            return Err(StrokeError::InvalidDashPattern(format!(
                "entry {bad} is not a positive length"
            )));
        }
        Ok(Self {
            lengths: lengths.to_vec(),
        })
    }

    /// The solid (empty) pattern.
    #[must_use]
    pub fn solid() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn is_solid(&self) -> bool {
        self.lengths.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.lengths
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.lengths.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lengths.is_empty()
    }

    /// Length of one full on/off cycle, in width units.
    #[must_use]
    pub fn cycle_length(&self) -> f64 {
        self.lengths.iter().sum()
    }
}

impl TryFrom<Vec<f64>> for DashPattern {
    type Error = StrokeError;

    fn try_from(lengths: Vec<f64>) -> Result<Self> {
        Self::new(&lengths)
    }
}

impl From<DashPattern> for Vec<f64> {
    fn from(pattern: DashPattern) -> Self {
        pattern.lengths
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use approx::assert_relative_eq;

    use super::*;

    #[test]
    fn valid_pattern() {
        let p = DashPattern::new(&[4.0, 2.0, 1.0, 2.0]).unwrap();
        assert_eq!(p.len(), 4);
        assert!(!p.is_solid());
        assert_relative_eq!(p.cycle_length(), 9.0);
    }

    #[test]
    fn empty_pattern_is_solid() {
        let p = DashPattern::new(&[]).unwrap();
        assert!(p.is_solid());
        assert_eq!(p, DashPattern::solid());
    }

    #[test]
    fn odd_count_rejected() {
        let err = DashPattern::new(&[1.0, 2.0, 3.0]).unwrap_err();
        assert!(matches!(err, StrokeError::InvalidDashPattern(_)));
    }

    #[test]
    fn non_positive_entry_rejected() {
        assert!(DashPattern::new(&[1.0, 0.0]).is_err());
        assert!(DashPattern::new(&[-1.0, 2.0]).is_err());
        assert!(DashPattern::new(&[f64::NAN, 2.0]).is_err());
    }

    #[test]
    fn try_from_vec() {
        let p = DashPattern::try_from(vec![3.0, 1.0]).unwrap();
        let back: Vec<f64> = p.into();
        assert_eq!(back, vec![3.0, 1.0]);
    }
}
