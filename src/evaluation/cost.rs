//! Weighted cost model.

use serde::{Deserialize, Serialize};

/// Coefficients of the three objective terms.
///
/// The weighted cost of a solution is
/// `distance * dist + tardiness * tard + max_tardiness * tmax`.
///
/// # Examples
///
/// ```
/// use u_homecare::evaluation::CostWeights;
///
/// let w = CostWeights::default().with_distance(1.0).with_tardiness(0.0).with_max_tardiness(0.0);
/// assert_eq!(w.weighted(12.0, 5.0, 3.0), 12.0);
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct CostWeights {
    /// Weight of total travel.
    pub distance: f64,
    /// Weight of total tardiness.
    pub tardiness: f64,
    /// Weight of the largest single tardiness.
    pub max_tardiness: f64,
}

impl CostWeights {
    /// Creates a weight set.
    pub fn new(distance: f64, tardiness: f64, max_tardiness: f64) -> Self {
        Self {
            distance,
            tardiness,
            max_tardiness,
        }
    }

    /// Sets the distance weight.
    pub fn with_distance(mut self, w: f64) -> Self {
        self.distance = w;
        self
    }

    /// Sets the tardiness weight.
    pub fn with_tardiness(mut self, w: f64) -> Self {
        self.tardiness = w;
        self
    }

    /// Sets the max-tardiness weight.
    pub fn with_max_tardiness(mut self, w: f64) -> Self {
        self.max_tardiness = w;
        self
    }

    /// Weighted sum of the three terms.
    pub fn weighted(&self, dist: f64, tard: f64, tmax: f64) -> f64 {
        self.distance * dist + self.tardiness * tard + self.max_tardiness * tmax
    }
}

impl Default for CostWeights {
    /// Equal weighting of the three terms.
    fn default() -> Self {
        Self::new(1.0 / 3.0, 1.0 / 3.0, 1.0 / 3.0)
    }
}

/// Headline figures of a solution.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct CostSummary {
    /// Weighted cost.
    pub cost: f64,
    /// Total travel.
    pub dist: f64,
    /// Total tardiness.
    pub tard: f64,
    /// Largest tardiness of any committed task.
    pub tmax: f64,
}

impl CostSummary {
    /// Returns `true` if every figure is within `tol` of `other`'s.
    pub fn approx_eq(&self, other: &CostSummary, tol: f64) -> bool {
        (self.cost - other.cost).abs() <= tol
            && (self.dist - other.dist).abs() <= tol
            && (self.tard - other.tard).abs() <= tol
            && (self.tmax - other.tmax).abs() <= tol
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_weights_equal() {
        let w = CostWeights::default();
        assert!((w.weighted(3.0, 3.0, 3.0) - 3.0).abs() < 1e-10);
    }

    #[test]
    fn test_weighted() {
        let w = CostWeights::new(1.0, 2.0, 10.0);
        assert!((w.weighted(5.0, 1.0, 0.5) - 12.0).abs() < 1e-10);
    }

    #[test]
    fn test_weights_from_json() {
        let w: CostWeights =
            serde_json::from_str(r#"{ "distance": 1.0, "tardiness": 0.5, "max_tardiness": 2.0 }"#)
                .expect("valid weights");
        assert_eq!(w, CostWeights::new(1.0, 0.5, 2.0));
    }

    #[test]
    fn test_summary_approx_eq() {
        let a = CostSummary {
            cost: 1.0,
            dist: 2.0,
            tard: 0.0,
            tmax: 0.0,
        };
        let mut b = a;
        b.dist += 1e-9;
        assert!(a.approx_eq(&b, 1e-6));
        b.tmax = 1.0;
        assert!(!a.approx_eq(&b, 1e-6));
    }
}
