//! Axis binning: continuous coordinates to discrete class indices.

use crate::error::{Error, Result};
use serde::{Deserialize, Serialize};

/// Observed coordinate extent of one axis on one page.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AxisRange {
    pub min: f64,
    pub max: f64,
}

impl AxisRange {
    /// Create a range; the bounds are swapped if given in reverse.
    pub fn new(a: f64, b: f64) -> Self {
        if a <= b {
            Self { min: a, max: b }
        } else {
            Self { min: b, max: a }
        }
    }

    /// Range covering every finite value, or `None` if there are none.
    pub fn from_values<I>(values: I) -> Option<Self>
    where
        I: IntoIterator<Item = f64>,
    {
        values
            .into_iter()
            .filter(|v| v.is_finite())
            .fold(None, |range, v| match range {
                None => Some(Self { min: v, max: v }),
                Some(r) => Some(Self {
                    min: r.min.min(v),
                    max: r.max.max(v),
                }),
            })
    }

    pub fn span(&self) -> f64 {
        self.max - self.min
    }

    /// All observed values share one coordinate.
    pub fn is_degenerate(&self) -> bool {
        self.max <= self.min
    }

    pub fn contains(&self, value: f64) -> bool {
        value >= self.min && value <= self.max
    }
}

/// Bins values of one axis into `num_classes` equal-width classes.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AxisBinner {
    range: AxisRange,
    num_classes: usize,
}

impl AxisBinner {
    /// Create a binner. Fails if `num_classes` is zero.
    pub fn new(range: AxisRange, num_classes: usize) -> Result<Self> {
        if num_classes == 0 {
            return Err(Error::Configuration(
                "number of classes must be at least 1".into(),
            ));
        }
        Ok(Self { range, num_classes })
    }

    pub fn range(&self) -> AxisRange {
        self.range
    }

    pub fn num_classes(&self) -> usize {
        self.num_classes
    }

    /// Class index of `value`, always in `[0, num_classes)`.
    ///
    /// Values outside the range clamp to the first or last class; NaN maps to 0.
    pub fn classify(&self, value: f64) -> usize {
        if self.range.is_degenerate() {
            return 0;
        }

        let position = (value - self.range.min) / self.range.span();
        let scaled = (position * self.num_classes as f64).floor();
        if scaled.is_nan() || scaled <= 0.0 {
            return 0;
        }
        // `value == max` lands exactly on `num_classes`.
        (scaled as usize).min(self.num_classes - 1)
    }
}

/// Class index of `value` within `range`, using `num_classes` classes.
///
/// # Example
/// ```
/// use ocrtab::layout::{bin, AxisRange};
///
/// let range = AxisRange::new(0.0, 100.0);
/// assert_eq!(bin(0.0, &range, 10).unwrap(), 0);
/// assert_eq!(bin(55.0, &range, 10).unwrap(), 5);
/// assert_eq!(bin(100.0, &range, 10).unwrap(), 9);
/// ```
pub fn bin(value: f64, range: &AxisRange, num_classes: usize) -> Result<usize> {
    Ok(AxisBinner::new(*range, num_classes)?.classify(value))
}
