//! Periodic position grid.
//!
//! `N = 2^n` points `x_j = x_min + j·dx` with `dx = (x_max - x_min)/N`;
//! `x_max` is identified with `x_min`. Grid point `j` is basis state `|j⟩`
//! of the register, qubit `q` carrying weight `2^q`.

use std::f64::consts::TAU;

use serde::{Deserialize, Serialize};

use crate::error::{EvolveError, EvolveResult};

/// Largest register a grid may span.
pub const MAX_GRID_QUBITS: u32 = 24;

/// Uniform periodic grid on `[x_min, x_max)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Grid {
    num_qubits: u32,
    x_min: f64,
    x_max: f64,
}

impl Grid {
    /// Create a grid of `2^num_qubits` points.
    pub fn new(num_qubits: u32, x_min: f64, x_max: f64) -> EvolveResult<Self> {
        if num_qubits == 0 || num_qubits > MAX_GRID_QUBITS {
            return Err(EvolveError::InvalidGrid(format!(
                "{num_qubits} qubits not in 1..={MAX_GRID_QUBITS}"
            )));
        }
        if !(x_min.is_finite() && x_max.is_finite() && x_min < x_max) {
            return Err(EvolveError::InvalidGrid(format!(
                "bounds [{x_min}, {x_max}) are not an interval"
            )));
        }
        Ok(Self {
            num_qubits,
            x_min,
            x_max,
        })
    }

    /// Register size.
    pub fn num_qubits(&self) -> u32 {
        self.num_qubits
    }

    /// Number of grid points.
    pub fn len(&self) -> usize {
        1 << self.num_qubits
    }

    /// Always false; a grid has at least two points.
    pub fn is_empty(&self) -> bool {
        false
    }

    /// Left end.
    pub fn x_min(&self) -> f64 {
        self.x_min
    }

    /// Right end, excluded.
    pub fn x_max(&self) -> f64 {
        self.x_max
    }

    /// Grid spacing.
    #[allow(clippy::cast_precision_loss)]
    pub fn dx(&self) -> f64 {
        (self.x_max - self.x_min) / self.len() as f64
    }

    /// Position of grid point `j`.
    #[allow(clippy::cast_precision_loss)]
    pub fn position(&self, j: usize) -> f64 {
        self.x_min + j as f64 * self.dx()
    }

    /// All grid positions.
    pub fn positions(&self) -> Vec<f64> {
        (0..self.len()).map(|j| self.position(j)).collect()
    }

    /// Momentum of Fourier index `k`: `2π k'/(N dx)`, with `k' = k - N` in
    /// the upper half.
    #[allow(clippy::cast_precision_loss, clippy::cast_possible_wrap)]
    pub fn momentum(&self, k: usize) -> f64 {
        let n = self.len();
        let signed = if k < n / 2 {
            k as i64
        } else {
            k as i64 - n as i64
        };
        TAU * signed as f64 / (n as f64 * self.dx())
    }

    /// Momenta in Fourier-index order.
    pub fn momenta(&self) -> Vec<f64> {
        (0..self.len()).map(|k| self.momentum(k)).collect()
    }

    /// Grid point nearest to `x`, wrapping around the period.
    #[allow(
        clippy::cast_possible_truncation,
        clippy::cast_sign_loss,
        clippy::cast_precision_loss
    )]
    pub fn nearest_index(&self, x: f64) -> usize {
        let n = self.len() as f64;
        let j = ((x - self.x_min) / self.dx()).round().rem_euclid(n);
        j as usize
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_positions() {
        let grid = Grid::new(2, -2.0, 2.0).unwrap();
        assert_eq!(grid.len(), 4);
        assert_eq!(grid.dx(), 1.0);
        assert_eq!(grid.positions(), vec![-2.0, -1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_momenta_wrap() {
        let grid = Grid::new(2, 0.0, 4.0).unwrap();
        let p = grid.momenta();
        let unit = TAU / 4.0;
        assert_eq!(p, vec![0.0, unit, -2.0 * unit, -unit]);
    }

    #[test]
    fn test_nearest_index_wraps() {
        let grid = Grid::new(3, 0.0, 8.0).unwrap();
        assert_eq!(grid.nearest_index(2.2), 2);
        assert_eq!(grid.nearest_index(7.9), 0);
        assert_eq!(grid.nearest_index(-1.0), 7);
    }

    #[test]
    fn test_rejects_bad_grid() {
        assert!(Grid::new(0, 0.0, 1.0).is_err());
        assert!(Grid::new(3, 1.0, 1.0).is_err());
        assert!(Grid::new(3, 0.0, f64::NAN).is_err());
    }
}
