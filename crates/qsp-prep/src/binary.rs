//! Fixed-point approximation of rotation angles.
//!
//! A rotation `Ry(s·x)` with `x ∈ [0, 1)` written as `Σ_j b_j 2^{-j}` splits
//! into one rotation `Ry(s·2^{-j})` per set bit. The rotations commute, so a
//! register of `N` fixed small rotations can stand in for any angle up to the
//! precision of its last bit.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use qsp_ir::{Circuit, QubitId};

use crate::angle_tree::AngleTree;
use crate::error::{PrepError, PrepResult};

/// Largest supported precision; the mantissa must stay exact in an `f64`.
pub const MAX_PRECISION: u32 = 52;

/// `x ≈ Σ_{j=1}^{N} b_j 2^{-j}`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BinaryFraction {
    mantissa: u64,
    bits: u32,
}

impl BinaryFraction {
    /// Round `x ∈ [0, 1]` to the nearest `bits`-bit fraction.
    ///
    /// Values that round up to 1 saturate at `1 - 2^{-bits}`.
    #[allow(clippy::cast_possible_truncation, clippy::cast_sign_loss)]
    pub fn from_f64(x: f64, bits: u32) -> PrepResult<Self> {
        if bits == 0 || bits > MAX_PRECISION {
            return Err(PrepError::InvalidPrecision {
                bits,
                max: MAX_PRECISION,
            });
        }
        if !(0.0..=1.0).contains(&x) {
            return Err(PrepError::InvalidParameter(format!(
                "binary fraction needs 0 <= x <= 1, got {x}"
            )));
        }
        let max = (1u64 << bits) - 1;
        let mantissa = ((x * f64::powi(2.0, bits as i32)).round() as u64).min(max);
        Ok(Self { mantissa, bits })
    }

    /// Number of bits `N`.
    pub fn precision(&self) -> u32 {
        self.bits
    }

    /// The bits as an integer, `b_1` most significant.
    pub fn mantissa(&self) -> u64 {
        self.mantissa
    }

    /// Bit `b_j` for `j` in `1..=N`.
    pub fn bit(&self, j: u32) -> bool {
        (1..=self.bits).contains(&j) && (self.mantissa >> (self.bits - j)) & 1 == 1
    }

    /// Positions `j` of the set bits, ascending.
    pub fn set_bits(&self) -> impl Iterator<Item = u32> + '_ {
        (1..=self.bits).filter(|&j| self.bit(j))
    }

    /// The represented value.
    #[allow(clippy::cast_precision_loss)]
    pub fn value(&self) -> f64 {
        self.mantissa as f64 / f64::powi(2.0, self.bits as i32)
    }

    /// `|x - value|` for the original input `x`.
    pub fn error(&self, x: f64) -> f64 {
        (x - self.value()).abs()
    }
}

/// Append `Ry(scale · fraction.value())` on `target` as one rotation per set
/// bit, each conditioned on `controls` matching `ctrl_state`.
pub fn append_binary_rotation(
    circuit: &mut Circuit,
    fraction: &BinaryFraction,
    scale: f64,
    controls: &[QubitId],
    ctrl_state: u64,
    target: QubitId,
) -> PrepResult<()> {
    for j in fraction.set_bits() {
        let theta = scale * f64::powi(2.0, -(j as i32));
        circuit.mcry(theta, controls, ctrl_state, target)?;
    }
    Ok(())
}

impl AngleTree {
    /// Round every angle to a multiple of `2π · 2^{-bits}`.
    pub fn quantized(&self, bits: u32) -> PrepResult<Self> {
        let mut failure = None;
        let tree = self.map_angles(|theta| {
            match BinaryFraction::from_f64(theta.rem_euclid(TAU) / TAU, bits) {
                Ok(fraction) => TAU * fraction.value(),
                Err(e) => {
                    failure.get_or_insert(e);
                    theta
                }
            }
        });
        match failure {
            Some(e) => Err(e),
            None => Ok(tree),
        }
    }

    /// Emit the preparation with every angle split into `bits` fixed
    /// rotations of size `2π · 2^{-j}`.
    pub fn binary_circuit(&self, name: &str, bits: u32) -> PrepResult<Circuit> {
        let mut circuit = Circuit::new(name);
        circuit.add_qreg("x", self.num_qubits());
        for step in self.steps() {
            let fraction = BinaryFraction::from_f64(step.theta.rem_euclid(TAU) / TAU, bits)?;
            append_binary_rotation(
                &mut circuit,
                &fraction,
                TAU,
                &step.controls,
                step.ctrl_state,
                step.target,
            )?;
        }
        Ok(circuit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_exact_fraction() {
        let f = BinaryFraction::from_f64(0.625, 4).unwrap();
        assert_eq!(f.mantissa(), 0b1010);
        assert_eq!(f.set_bits().collect::<Vec<_>>(), vec![1, 3]);
        assert_eq!(f.value(), 0.625);
        assert_eq!(f.error(0.625), 0.0);
    }

    #[test]
    fn test_rounds_to_nearest() {
        let f = BinaryFraction::from_f64(0.3, 3).unwrap();
        // 0.3 · 8 = 2.4 → 2
        assert_eq!(f.value(), 0.25);
        assert!((f.error(0.3) - 0.05).abs() < 1e-15);
    }

    #[test]
    fn test_saturates_below_one() {
        let f = BinaryFraction::from_f64(0.99, 2).unwrap();
        assert_eq!(f.value(), 0.75);
        assert!(BinaryFraction::from_f64(1.0, 2).is_ok());
    }

    #[test]
    fn test_rejects_bad_input() {
        assert!(matches!(
            BinaryFraction::from_f64(0.5, 0),
            Err(PrepError::InvalidPrecision { .. })
        ));
        assert!(matches!(
            BinaryFraction::from_f64(0.5, 53),
            Err(PrepError::InvalidPrecision { .. })
        ));
        assert!(BinaryFraction::from_f64(-0.1, 4).is_err());
        assert!(BinaryFraction::from_f64(f64::NAN, 4).is_err());
    }

    #[test]
    fn test_error_bound() {
        for bits in 1..=20 {
            let step = f64::powi(2.0, -(bits as i32));
            for i in 0..100 {
                // Below the last representable value, rounding is never clamped.
                let x = f64::from(i) / 100.0 * (1.0 - step);
                let f = BinaryFraction::from_f64(x, bits).unwrap();
                assert!(f.error(x) <= step / 2.0 + 1e-15);
            }
        }
    }

    #[test]
    fn test_binary_rotation_gate_count() {
        let mut circuit = Circuit::with_size("bin", 2, 0);
        let f = BinaryFraction::from_f64(0.8125, 4).unwrap(); // 0b1101
        append_binary_rotation(&mut circuit, &f, TAU, &[QubitId(1)], 0, QubitId(0)).unwrap();
        assert_eq!(circuit.count_ops().get("mcry"), Some(&3));
    }
}
