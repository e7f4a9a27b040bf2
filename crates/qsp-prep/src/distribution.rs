//! Target probability distributions.
//!
//! A distribution only has to report the probability mass it places on a
//! half-open interval. Angle computation never needs pointwise values, so
//! closed-form CDFs, numerically integrated densities and explicit tables
//! all fit behind the same trait.

use statrs::distribution::{Continuous, ContinuousCDF, Normal};
use tracing::debug;

use crate::error::{PrepError, PrepResult};
use crate::quadrature::AdaptiveSimpson;

/// A one-dimensional probability distribution, possibly unnormalised.
pub trait ProbabilityDistribution {
    /// Mass on `[a, b)`; zero when `b <= a`.
    fn mass(&self, a: f64, b: f64) -> f64;

    /// Pointwise density, when the distribution has one.
    fn density(&self, x: f64) -> Option<f64> {
        let _ = x;
        None
    }

    /// Short human-readable description.
    fn label(&self) -> String;
}

/// Normal distribution with closed-form interval masses.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Gaussian {
    mean: f64,
    std_dev: f64,
    normal: Normal,
}

impl Gaussian {
    /// Create a normal distribution; `std_dev` must be positive and finite.
    pub fn new(mean: f64, std_dev: f64) -> PrepResult<Self> {
        if !mean.is_finite() {
            return Err(PrepError::InvalidParameter(format!(
                "gaussian mean must be finite, got {mean}"
            )));
        }
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(PrepError::InvalidParameter(format!(
                "gaussian std_dev must be positive, got {std_dev}"
            )));
        }
        let normal = Normal::new(mean, std_dev)
            .map_err(|e| PrepError::InvalidParameter(e.to_string()))?;
        Ok(Self {
            mean,
            std_dev,
            normal,
        })
    }

    /// Mean.
    pub fn mean(&self) -> f64 {
        self.mean
    }

    /// Standard deviation.
    pub fn std_dev(&self) -> f64 {
        self.std_dev
    }
}

impl ProbabilityDistribution for Gaussian {
    fn mass(&self, a: f64, b: f64) -> f64 {
        if b <= a {
            return 0.0;
        }
        // Upper tail through the survival function keeps small masses exact.
        if a >= self.mean {
            (self.normal.sf(a) - self.normal.sf(b)).max(0.0)
        } else {
            (self.normal.cdf(b) - self.normal.cdf(a)).max(0.0)
        }
    }

    fn density(&self, x: f64) -> Option<f64> {
        Some(self.normal.pdf(x))
    }

    fn label(&self) -> String {
        format!("N({}, {}²)", self.mean, self.std_dev)
    }
}

/// Arbitrary non-negative density, integrated numerically per interval.
pub struct Density<F> {
    f: F,
    label: String,
    quadrature: AdaptiveSimpson,
}

impl<F: Fn(f64) -> f64> Density<F> {
    /// Wrap a density function.
    pub fn new(label: impl Into<String>, f: F) -> Self {
        Self {
            f,
            label: label.into(),
            quadrature: AdaptiveSimpson::default(),
        }
    }

    /// Replace the quadrature rule.
    #[must_use]
    pub fn with_quadrature(mut self, quadrature: AdaptiveSimpson) -> Self {
        self.quadrature = quadrature;
        self
    }
}

impl<F: Fn(f64) -> f64> ProbabilityDistribution for Density<F> {
    fn mass(&self, a: f64, b: f64) -> f64 {
        let integral = self.quadrature.integrate(&self.f, a, b);
        if !integral.converged {
            debug!(
                "quadrature on [{}, {}) stopped at depth limit after {} evaluations",
                a, b, integral.evaluations
            );
        }
        integral.value
    }

    fn density(&self, x: f64) -> Option<f64> {
        Some((self.f)(x))
    }

    fn label(&self) -> String {
        self.label.clone()
    }
}

/// Explicit weights on the unit bins `[i, i + 1)`, uniform inside each bin.
#[derive(Debug, Clone, PartialEq)]
pub struct Tabulated {
    weights: Vec<f64>,
}

impl Tabulated {
    /// Create a table; weights must be finite and non-negative.
    pub fn new(weights: Vec<f64>) -> PrepResult<Self> {
        if weights.is_empty() {
            return Err(PrepError::InvalidParameter("empty weight table".into()));
        }
        if let Some((i, &w)) = weights
            .iter()
            .enumerate()
            .find(|(_, w)| !w.is_finite() || **w < 0.0)
        {
            #[allow(clippy::cast_precision_loss)]
            let lo = i as f64;
            let hi = lo + 1.0;
            if !w.is_finite() {
                return Err(PrepError::NonFiniteMass { lo, hi, mass: w });
            }
            return Err(PrepError::NegativeMass { lo, hi, mass: w });
        }
        Ok(Self { weights })
    }

    /// The weights.
    pub fn weights(&self) -> &[f64] {
        &self.weights
    }

    /// `[0, len)`: the support of the table.
    #[allow(clippy::cast_precision_loss)]
    pub fn support(&self) -> (f64, f64) {
        (0.0, self.weights.len() as f64)
    }
}

impl ProbabilityDistribution for Tabulated {
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn mass(&self, a: f64, b: f64) -> f64 {
        let (lo, hi) = self.support();
        let a = a.max(lo);
        let b = b.min(hi);
        if b <= a {
            return 0.0;
        }
        let first = a.floor() as usize;
        let last = (b.ceil() as usize).min(self.weights.len());
        (first..last)
            .map(|i| {
                let bin_lo = i as f64;
                let overlap = b.min(bin_lo + 1.0) - a.max(bin_lo);
                self.weights[i] * overlap.max(0.0)
            })
            .sum()
    }

    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    fn density(&self, x: f64) -> Option<f64> {
        let (lo, hi) = self.support();
        if x < lo || x >= hi {
            return Some(0.0);
        }
        self.weights.get(x.floor() as usize).copied()
    }

    fn label(&self) -> String {
        format!("table[{}]", self.weights.len())
    }
}

/// First interior index `i` with `m_i² < (1 - tolerance) · m_{i-1} m_{i+1}`.
///
/// This is the discrete form of log-concavity. The support must also be
/// contiguous: the first zero bin between the first and last positive bins
/// is a violation.
pub fn log_concavity_violation(masses: &[f64], tolerance: f64) -> Option<usize> {
    let first = masses.iter().position(|&m| m > 0.0)?;
    let last = masses.iter().rposition(|&m| m > 0.0)?;
    let support = &masses[first..=last];

    if let Some(gap) = support.iter().position(|&m| m <= 0.0) {
        return Some(first + gap);
    }
    support
        .windows(3)
        .position(|w| w[1] * w[1] < (1.0 - tolerance) * w[0] * w[2])
        .map(|i| first + i + 1)
}
