//! Grover–Rudolph preparation of binned distributions.
//!
//! The domain is bisected `n` times. At level `k` every node `[a, b)` with
//! midpoint `c` gets `θ = 2·acos(√(m[a,c) / m[a,b)))`, so rotating the
//! level's target qubit by `θ` under the node's control pattern splits the
//! node's amplitude between its halves in proportion to their mass.

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument, warn};

use qsp_ir::Circuit;

use crate::angle_tree::{AngleTree, BitOrder, RotationStep};
use crate::distribution::{ProbabilityDistribution, log_concavity_violation};
use crate::domain::{Domain, DyadicInterval};
use crate::error::{PrepError, PrepResult};

/// Largest register handled; the tree has `2^n - 1` angles.
pub const MAX_QUBITS: u32 = 24;

/// Masses this far below zero are quadrature noise and clamp to zero.
const MASS_NOISE: f64 = 1e-14;

/// Knobs for angle computation and circuit emission.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GroverRudolphOptions {
    /// Drop rotations whose angle is numerically zero.
    pub skip_trivial_rotations: bool,
    /// Fail with [`PrepError::NotLogConcave`] instead of warning.
    pub strict_log_concave: bool,
    /// Relative slack for the discrete log-concavity test.
    pub log_concavity_tolerance: f64,
}

impl Default for GroverRudolphOptions {
    fn default() -> Self {
        Self {
            skip_trivial_rotations: false,
            strict_log_concave: false,
            log_concavity_tolerance: 1e-9,
        }
    }
}

/// Angle computation for an `n`-qubit register over a domain.
#[derive(Debug, Clone, PartialEq)]
pub struct GroverRudolph {
    num_qubits: u32,
    domain: Domain,
    options: GroverRudolphOptions,
}

/// Rotation angle splitting `left + right` into `left : right`.
pub fn split_angle(left: f64, right: f64) -> f64 {
    let total = left + right;
    if total <= 0.0 {
        return 0.0;
    }
    2.0 * (left / total).sqrt().clamp(0.0, 1.0).acos()
}

impl GroverRudolph {
    /// Create a preparation for `num_qubits` qubits over `domain`.
    pub fn new(num_qubits: u32, domain: Domain) -> PrepResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_QUBITS {
            return Err(PrepError::InvalidQubitCount {
                num_qubits,
                max: MAX_QUBITS,
            });
        }
        Ok(Self {
            num_qubits,
            domain,
            options: GroverRudolphOptions::default(),
        })
    }

    /// Replace all options.
    #[must_use]
    pub fn with_options(mut self, options: GroverRudolphOptions) -> Self {
        self.options = options;
        self
    }

    /// Drop identity rotations from emitted circuits.
    #[must_use]
    pub fn skip_trivial_rotations(mut self, skip: bool) -> Self {
        self.options.skip_trivial_rotations = skip;
        self
    }

    /// Reject distributions that are not log-concave.
    #[must_use]
    pub fn strict_log_concave(mut self, strict: bool) -> Self {
        self.options.strict_log_concave = strict;
        self
    }

    /// Register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Discretised support.
    pub fn domain(&self) -> &Domain {
        &self.domain
    }

    /// Current options.
    pub fn options(&self) -> &GroverRudolphOptions {
        &self.options
    }

    /// Unnormalised mass of every bin.
    fn raw_leaf_masses<D>(&self, dist: &D) -> PrepResult<Vec<f64>>
    where
        D: ProbabilityDistribution + ?Sized,
    {
        let bins = 1u64 << self.num_qubits;
        (0..bins)
            .map(|x| {
                let (lo, hi) = DyadicInterval::new(self.num_qubits, x).bounds(&self.domain);
                let mass = dist.mass(lo, hi);
                if !mass.is_finite() {
                    return Err(PrepError::NonFiniteMass { lo, hi, mass });
                }
                if mass < -MASS_NOISE {
                    return Err(PrepError::NegativeMass { lo, hi, mass });
                }
                Ok(mass.max(0.0))
            })
            .collect()
    }

    /// Normalised target probability of every bin.
    pub fn leaf_masses<D>(&self, dist: &D) -> PrepResult<Vec<f64>>
    where
        D: ProbabilityDistribution + ?Sized,
    {
        let masses = self.raw_leaf_masses(dist)?;
        let total: f64 = masses.iter().sum();
        if total <= 0.0 {
            return Err(PrepError::ZeroMass);
        }
        Ok(masses.into_iter().map(|m| m / total).collect())
    }

    /// Compute the angle of every node of the bisection tree.
    ///
    /// Node masses are accumulated from the bin masses, so a node's mass is
    /// the integral over its interval and the tree reproduces the binned
    /// distribution exactly.
    #[instrument(skip(self, dist), fields(n = self.num_qubits, dist = %dist.label()))]
    pub fn compute_angles<D>(&self, dist: &D) -> PrepResult<AngleTree>
    where
        D: ProbabilityDistribution + ?Sized,
    {
        let leaves = self.raw_leaf_masses(dist)?;
        if leaves.iter().sum::<f64>() <= 0.0 {
            return Err(PrepError::ZeroMass);
        }

        if let Some(index) = log_concavity_violation(&leaves, self.options.log_concavity_tolerance)
        {
            if self.options.strict_log_concave {
                return Err(PrepError::NotLogConcave { index });
            }
            warn!(
                "{} is not log-concave at bin {}; preparing it anyway",
                dist.label(),
                index
            );
        }

        // masses[k] holds the 2^k node masses of level k.
        let mut masses = vec![leaves];
        while masses[0].len() > 1 {
            let parent = masses[0].chunks(2).map(|pair| pair[0] + pair[1]).collect();
            masses.insert(0, parent);
        }

        let levels: Vec<Vec<f64>> = masses
            .windows(2)
            .map(|pair| pair[1].chunks(2).map(|c| split_angle(c[0], c[1])).collect())
            .collect();

        let tree = AngleTree::from_levels(BitOrder::MsbFirst, levels);
        debug!("Computed {} angles", tree.num_angles());
        Ok(tree)
    }

    /// Rotations of `tree`, without identities when so configured.
    pub fn rotation_steps(&self, tree: &AngleTree) -> Vec<RotationStep> {
        tree.steps()
            .into_iter()
            .filter(|s| !(self.options.skip_trivial_rotations && s.is_trivial()))
            .collect()
    }

    /// Preparation circuit with concrete angles.
    pub fn circuit(&self, tree: &AngleTree) -> PrepResult<Circuit> {
        tree.circuit("grover_rudolph", self.options.skip_trivial_rotations)
    }

    /// Preparation template over `theta_{k}_{i}` symbols and its bindings.
    pub fn parameterized_circuit(
        &self,
        tree: &AngleTree,
    ) -> PrepResult<(Circuit, Vec<(String, f64)>)> {
        tree.parameterized_circuit("grover_rudolph")
    }

    /// Compute angles and emit the circuit in one go.
    pub fn prepare<D>(&self, dist: &D) -> PrepResult<Circuit>
    where
        D: ProbabilityDistribution + ?Sized,
    {
        let tree = self.compute_angles(dist)?;
        self.circuit(&tree)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::distribution::{Density, Gaussian, Tabulated};
    use std::f64::consts::PI;

    #[test]
    fn test_split_angle() {
        assert_eq!(split_angle(1.0, 0.0), 0.0);
        assert!((split_angle(0.0, 1.0) - PI).abs() < 1e-12);
        assert!((split_angle(1.0, 1.0) - PI / 2.0).abs() < 1e-12);
        assert_eq!(split_angle(0.0, 0.0), 0.0);
    }

    #[test]
    fn test_rejects_bad_qubit_count() {
        let domain = Domain::new(0.0, 1.0).unwrap();
        assert!(matches!(
            GroverRudolph::new(0, domain),
            Err(PrepError::InvalidQubitCount { .. })
        ));
        assert!(GroverRudolph::new(MAX_QUBITS + 1, domain).is_err());
    }

    #[test]
    fn test_single_qubit_gaussian() {
        // Symmetric about the midpoint: an even split.
        let gr = GroverRudolph::new(1, Domain::new(-1.0, 1.0).unwrap()).unwrap();
        let tree = gr.compute_angles(&Gaussian::new(0.0, 0.5).unwrap()).unwrap();
        assert!((tree.levels()[0][0] - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn test_tree_reproduces_bins() {
        let table = Tabulated::new(vec![1.0, 2.0, 4.0, 5.0, 5.0, 4.0, 2.0, 1.0]).unwrap();
        let gr = GroverRudolph::new(3, Domain::new(0.0, 8.0).unwrap()).unwrap();
        let tree = gr.compute_angles(&table).unwrap();
        let target = gr.leaf_masses(&table).unwrap();
        for (p, q) in tree.probabilities().iter().zip(&target) {
            assert!((p - q).abs() < 1e-12);
        }
        assert!((target[2] - 4.0 / 24.0).abs() < 1e-15);
    }

    #[test]
    fn test_zero_mass_subtree_gets_zero_angle() {
        let table = Tabulated::new(vec![0.0, 0.0, 1.0, 3.0]).unwrap();
        let gr = GroverRudolph::new(2, Domain::new(0.0, 4.0).unwrap()).unwrap();
        let tree = gr.compute_angles(&table).unwrap();
        // Level 1, node 0 covers the empty left half.
        assert_eq!(tree.levels()[1][0], 0.0);
        assert!((tree.levels()[0][0] - PI).abs() < 1e-12);

        let skipping = gr.clone().skip_trivial_rotations(true);
        assert_eq!(skipping.rotation_steps(&tree).len(), 2);
        assert_eq!(gr.rotation_steps(&tree).len(), 3);
    }

    #[test]
    fn test_zero_mass_is_an_error() {
        let gr = GroverRudolph::new(2, Domain::new(100.0, 101.0).unwrap()).unwrap();
        let table = Tabulated::new(vec![1.0; 4]).unwrap();
        assert!(matches!(gr.compute_angles(&table), Err(PrepError::ZeroMass)));
    }

    #[test]
    fn test_strict_log_concavity() {
        let bimodal = Tabulated::new(vec![4.0, 1.0, 1.0, 4.0]).unwrap();
        let gr = GroverRudolph::new(2, Domain::new(0.0, 4.0).unwrap()).unwrap();
        assert!(gr.compute_angles(&bimodal).is_ok());

        let strict = gr.strict_log_concave(true);
        assert!(matches!(
            strict.compute_angles(&bimodal),
            Err(PrepError::NotLogConcave { index: 1 })
        ));
    }

    #[test]
    fn test_strict_rejects_gapped_support() {
        let gapped = Tabulated::new(vec![1.0, 0.0, 0.0, 1.0]).unwrap();
        let gr = GroverRudolph::new(2, Domain::new(0.0, 4.0).unwrap())
            .unwrap()
            .strict_log_concave(true);
        assert!(matches!(
            gr.compute_angles(&gapped),
            Err(PrepError::NotLogConcave { index: 1 })
        ));
    }

    #[test]
    fn test_non_finite_mass_is_an_error() {
        let gr = GroverRudolph::new(2, Domain::new(0.0, 1.0).unwrap()).unwrap();
        let singular = Density::new("1/sqrt(x)", |x: f64| 1.0 / x.sqrt());
        assert!(matches!(
            gr.compute_angles(&singular),
            Err(PrepError::NonFiniteMass { lo, .. }) if lo == 0.0
        ));

        let infinite = Density::new("inf", |_| f64::INFINITY);
        assert!(matches!(
            gr.leaf_masses(&infinite),
            Err(PrepError::NonFiniteMass { .. })
        ));
    }

    #[test]
    fn test_options_from_partial_json() {
        let options: GroverRudolphOptions =
            serde_json::from_str(r#"{"strict_log_concave": true}"#).unwrap();
        assert!(options.strict_log_concave);
        assert!(!options.skip_trivial_rotations);
    }
}
