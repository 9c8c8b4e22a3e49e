use crate::error::{Result, StrokeError};

/// Relative offsets of parallel sub-strokes across the pen width.
///
/// Entries come in `(start, end)` pairs in `[0, 1]`, measured from the left
/// boundary (0) to the right boundary (1). Entries never decrease and each
/// pair is strictly increasing. An empty array is a single simple stroke.
#[derive(Debug, Clone, PartialEq, Default)]
#[cfg_attr(
    feature = "serialization",
    derive(serde::Serialize, serde::Deserialize),
    serde(try_from = "Vec<f64>", into = "Vec<f64>")
)]
pub struct CompoundArray {
    entries: Vec<f64>,
}

impl CompoundArray {
    /// Validates and creates a compound array.
    ///
    /// # Errors
    ///
    /// Returns [`StrokeError::InvalidCompoundArray`] for an odd entry count,
    /// an entry outside `[0, 1]`, a decreasing sequence or an empty pair.
    pub fn new(entries: &[f64]) -> Result<Self> {
        if entries.len() % 2 != 0 {
            return Err(StrokeError::InvalidCompoundArray(format!(
                "expected an even number of entries, got {}",
                entries.len()
            )));
        }
        if let Some(bad) = entries.iter().find(|e| !(0.0..=1.0).contains(*e)) {
            return Err(StrokeError::InvalidCompoundArray(format!(
                "entry {bad} is outside [0, 1]"
            )));
        }
        if entries.windows(2).any(|w| w[1] < w[0]) {
            return Err(StrokeError::InvalidCompoundArray(
                "entries must not decrease".to_owned(),
            ));
        }
        if entries.chunks_exact(2).any(|pair| pair[1] <= pair[0]) {
            return Err(StrokeError::InvalidCompoundArray(
                "each pair must be strictly increasing".to_owned(),
            ));
        }
        Ok(Self {
            entries: entries.to_vec(),
        })
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    #[must_use]
    pub fn as_slice(&self) -> &[f64] {
        &self.entries
    }

    /// Number of sub-strokes.
    #[must_use]
    pub fn pair_count(&self) -> usize {
        self.entries.len() / 2
    }

    /// The `(start, end)` fractions of every sub-stroke; a single `(0, 1)`
    /// pair when the array is empty.
    #[must_use]
    pub fn pairs(&self) -> Vec<(f64, f64)> {
        if self.entries.is_empty() {
            return vec![(0.0, 1.0)];
        }
        self.entries
            .chunks_exact(2)
            .map(|pair| (pair[0], pair[1]))
            .collect()
    }
}

impl TryFrom<Vec<f64>> for CompoundArray {
    type Error = StrokeError;

    fn try_from(entries: Vec<f64>) -> Result<Self> {
        Self::new(&entries)
    }
}

impl From<CompoundArray> for Vec<f64> {
    fn from(array: CompoundArray) -> Self {
        array.entries
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn pairs_of_valid_array() {
        let c = CompoundArray::new(&[0.0, 0.25, 0.75, 1.0]).unwrap();
        assert_eq!(c.pair_count(), 2);
        assert_eq!(c.pairs(), vec![(0.0, 0.25), (0.75, 1.0)]);
    }

    #[test]
    fn empty_array_is_single_stroke() {
        let c = CompoundArray::default();
        assert!(c.is_empty());
        assert_eq!(c.pairs(), vec![(0.0, 1.0)]);
    }

    #[test]
    fn invalid_arrays_rejected() {
        assert!(CompoundArray::new(&[0.0, 0.5, 1.0]).is_err());
        assert!(CompoundArray::new(&[0.0, 1.5]).is_err());
        assert!(CompoundArray::new(&[-0.1, 0.5]).is_err());
        assert!(CompoundArray::new(&[0.5, 0.5]).is_err());
        assert!(CompoundArray::new(&[0.0, 0.6, 0.4, 1.0]).is_err());
    }

    #[test]
    fn touching_pairs_allowed() {
        assert!(CompoundArray::new(&[0.0, 0.5, 0.5, 1.0]).is_ok());
    }
}
