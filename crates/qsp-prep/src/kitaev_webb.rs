//! Kitaev–Webb preparation of discrete Gaussians.
//!
//! The target is `p(x) ∝ exp(-(x-μ)²/(2σ²))` on the integers
//! `0 … 2^n - 1`. Writing `x = 2y + b` splits off the least significant
//! bit: given `b`, the remaining bits `y` again follow a discrete Gaussian
//! with mean `(μ-b)/2` and width `σ/2`, and the odds of `b` are the ratio of
//! the two half-lattice sums
//!
//! ```text
//! P(b = 0) : P(b = 1) = f(μ/2, σ/2) : f((μ-1)/2, σ/2),
//! f(m, s) = Σ_{y=0}^{2^{r-1}-1} exp(-(y-m)²/(2s²))
//! ```
//!
//! where `r` is the number of bits still undecided. Sums are taken in log
//! space so far-off means do not underflow.

use tracing::{debug, instrument};

use qsp_ir::Circuit;

use crate::angle_tree::{AngleTree, BitOrder};
use crate::error::{PrepError, PrepResult};
use crate::grover_rudolph::MAX_QUBITS;

/// Discrete-Gaussian preparation on an `n`-qubit register.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct KitaevWebb {
    num_qubits: u32,
    skip_trivial_rotations: bool,
}

/// `ln Σ_{y=0}^{count-1} exp(-(y-m)²/(2s²))`.
///
/// Every `(y-m)²/(2s²)` must be finite.
#[allow(clippy::cast_precision_loss)]
fn log_lattice_sum(m: f64, s: f64, count: u64) -> f64 {
    let two_var = 2.0 * s * s;
    let sq = |y: u64| (y as f64 - m).powi(2);
    // The largest term sits at the lattice point nearest m.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    let peak = m.round().clamp(0.0, (count - 1) as f64) as u64;
    let peak_sq = sq(peak);
    let sum: f64 = (0..count)
        .map(|y| (-(sq(y) - peak_sq) / two_var).exp())
        .sum();
    -peak_sq / two_var + sum.ln()
}

impl KitaevWebb {
    /// Create a preparation for `num_qubits` qubits.
    pub fn new(num_qubits: u32) -> PrepResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(PrepError::InvalidQubitCount {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            num_qubits,
            skip_trivial_rotations: false,
        })
    }

    /// Drop identity rotations from emitted circuits.
    #[must_use]
    pub fn skip_trivial_rotations(mut self, skip: bool) -> Self {
        self.skip_trivial_rotations = skip;
        self
    }

    /// Register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Validate parameters against the register.
    ///
    /// The narrowest width used is `σ / 2^n`; every exponent `(x - μ)²/(2s²)`
    /// on the register must stay finite at that width.
    #[allow(clippy::cast_precision_loss)]
    fn check(&self, mean: f64, std_dev: f64) -> PrepResult<()> {
        let size = (1u64 << self.num_qubits) as f64;
        if !mean.is_finite() || !(mean.abs() + size).powi(2).is_finite() {
            return Err(PrepError::InvalidParameter(format!(
                "discrete gaussian mean {mean} is out of range"
            )));
        }
        if !(std_dev.is_finite() && std_dev > 0.0) {
            return Err(PrepError::InvalidParameter(format!(
                "discrete gaussian std_dev must be positive, got {std_dev}"
            )));
        }
        let narrowest = std_dev / size;
        let spread = (mean.abs() + size).powi(2);
        if !(spread / (2.0 * narrowest * narrowest)).is_finite() {
            return Err(PrepError::InvalidParameter(format!(
                "discrete gaussian std_dev {std_dev} is too small for {} qubits",
                self.num_qubits
            )));
        }
        Ok(())
    }

    /// Normalised target probabilities on `0 … 2^n - 1`.
    #[allow(clippy::cast_precision_loss)]
    pub fn target_probabilities(&self, mean: f64, std_dev: f64) -> PrepResult<Vec<f64>> {
        self.check(mean, std_dev)?;
        let size = 1u64 << self.num_qubits;
        let log_norm = log_lattice_sum(mean, std_dev, size);
        Ok((0..size)
            .map(|x| (-((x as f64 - mean).powi(2)) / (2.0 * std_dev * std_dev) - log_norm).exp())
            .collect())
    }

    /// Compute the angle of every node, least significant bit first.
    #[instrument(skip(self), fields(n = self.num_qubits))]
    #[allow(clippy::cast_precision_loss)]
    pub fn compute_angles(&self, mean: f64, std_dev: f64) -> PrepResult<AngleTree> {
        self.check(mean, std_dev)?;
        let n = self.num_qubits;
        let mut levels = Vec::with_capacity(n as usize);

        for k in 0..n {
            let scale = f64::powi(2.0, k as i32);
            // Mean and width of the bits above k, given the low bits i.
            let sigma_k = std_dev / scale;
            let half_count = 1u64 << (n - k - 1);
            let level: Vec<f64> = (0..1u64 << k)
                .map(|i| {
                    let mu_k = (mean - i as f64) / scale;
                    let l0 = log_lattice_sum(mu_k / 2.0, sigma_k / 2.0, half_count);
                    let l1 = log_lattice_sum((mu_k - 1.0) / 2.0, sigma_k / 2.0, half_count);
                    // P(b = 0) = 1 / (1 + e^{l1 - l0})
                    let p0 = 1.0 / (1.0 + (l1 - l0).exp());
                    2.0 * p0.sqrt().clamp(0.0, 1.0).acos()
                })
                .collect();
            levels.push(level);
        }

        let tree = AngleTree::from_levels(BitOrder::LsbFirst, levels);
        debug!("Computed {} angles", tree.num_angles());
        Ok(tree)
    }

    /// Preparation circuit with concrete angles.
    pub fn circuit(&self, tree: &AngleTree) -> PrepResult<Circuit> {
        tree.circuit("kitaev_webb", self.skip_trivial_rotations)
    }

    /// Compute angles and emit the circuit in one go.
    pub fn prepare(&self, mean: f64, std_dev: f64) -> PrepResult<Circuit> {
        let tree = self.compute_angles(mean, std_dev)?;
        self.circuit(&tree)
    }
}
