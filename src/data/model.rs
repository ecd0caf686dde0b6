use std::collections::BTreeMap;

// ---------------------------------------------------------------------------
// Curve – one correlation measurement
// ---------------------------------------------------------------------------

/// A single correlation curve: lag time τ (x) against G(τ) (y).
#[derive(Debug, Clone, PartialEq)]
pub struct Curve {
    /// Lag time axis in seconds.
    pub x: Vec<f64>,
    /// Correlation values – same length as `x`.
    pub y: Vec<f64>,
}

impl Curve {
    /// Build a curve from parallel axes. Returns `None` when the lengths differ.
    pub fn new(x: Vec<f64>, y: Vec<f64>) -> Option<Self> {
        (x.len() == y.len()).then_some(Curve { x, y })
    }

    /// Build a curve from `(x, y)` pairs.
    pub fn from_points(points: &[[f64; 2]]) -> Self {
        Curve {
            x: points.iter().map(|p| p[0]).collect(),
            y: points.iter().map(|p| p[1]).collect(),
        }
    }

    /// Iterate the curve as `[x, y]` pairs.
    pub fn points(&self) -> impl Iterator<Item = [f64; 2]> + '_ {
        self.x.iter().zip(self.y.iter()).map(|(&x, &y)| [x, y])
    }
}

// ---------------------------------------------------------------------------
// Keyed collections handed to the selector
// ---------------------------------------------------------------------------

/// Curves by opaque key (e.g. `"#3:"`). The map order is never used for display.
pub type CurveSet = BTreeMap<String, Curve>;

/// Optional human-readable labels by key.
pub type LabelSet = BTreeMap<String, String>;

// ---------------------------------------------------------------------------
// LoadedCurves – the result of reading a curve file
// ---------------------------------------------------------------------------

/// A curve file after parsing, before the user picks what to import.
#[derive(Debug, Clone, Default)]
pub struct LoadedCurves {
    pub curves: CurveSet,
    /// Present only when the file carries a `label` column.
    pub labels: Option<LabelSet>,
    /// Present only when the file carries a `selected` column.
    pub preselect: Option<Vec<String>>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn rejects_mismatched_axes() {
        assert!(Curve::new(vec![1.0, 2.0], vec![0.5]).is_none());
        assert_eq!(Curve::new(vec![1.0], vec![0.5]).map(|c| c.x.len()), Some(1));
    }

    #[test]
    fn points_pair_up_axes() {
        let curve = Curve::from_points(&[[1e-6, 1.2], [1e-5, 1.1]]);
        let pts: Vec<[f64; 2]> = curve.points().collect();
        assert_eq!(pts, vec![[1e-6, 1.2], [1e-5, 1.1]]);
    }
}
