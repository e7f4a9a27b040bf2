//! Expectation values of grid wavefunctions.

use num_complex::Complex64;

use crate::error::{EvolveError, EvolveResult};
use crate::grid::Grid;

/// `√Σ|ψ_j|²`.
pub fn norm(psi: &[Complex64]) -> f64 {
    psi.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt()
}

/// `|ψ_j|²` for every grid point.
pub fn probabilities(psi: &[Complex64]) -> Vec<f64> {
    psi.iter().map(Complex64::norm_sqr).collect()
}

/// State fidelity `|⟨a|b⟩|² / (⟨a|a⟩⟨b|b⟩)`, blind to global phase.
pub fn fidelity(a: &[Complex64], b: &[Complex64]) -> EvolveResult<f64> {
    if a.len() != b.len() {
        return Err(EvolveError::LengthMismatch {
            expected: a.len(),
            got: b.len(),
        });
    }
    let overlap: Complex64 = a.iter().zip(b).map(|(x, y)| x.conj() * y).sum();
    Ok(overlap.norm_sqr() / (norm(a).powi(2) * norm(b).powi(2)))
}

fn moment(grid: &Grid, probs: &[f64], f: impl Fn(f64) -> f64) -> EvolveResult<f64> {
    if probs.len() != grid.len() {
        return Err(EvolveError::LengthMismatch {
            expected: grid.len(),
            got: probs.len(),
        });
    }
    let total: f64 = probs.iter().sum();
    let weighted: f64 = grid
        .positions()
        .into_iter()
        .zip(probs)
        .map(|(x, p)| f(x) * p)
        .sum();
    Ok(weighted / total)
}

/// `⟨x⟩` of a position distribution; `probs` need not be normalised.
pub fn mean_position(grid: &Grid, probs: &[f64]) -> EvolveResult<f64> {
    moment(grid, probs, |x| x)
}

/// `⟨x²⟩ - ⟨x⟩²`.
pub fn position_variance(grid: &Grid, probs: &[f64]) -> EvolveResult<f64> {
    let mean = mean_position(grid, probs)?;
    moment(grid, probs, |x| (x - mean).powi(2))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_moments() {
        let grid = Grid::new(2, 0.0, 4.0).unwrap();
        let probs = [0.0, 1.0, 0.0, 1.0];
        assert_eq!(mean_position(&grid, &probs).unwrap(), 2.0);
        assert_eq!(position_variance(&grid, &probs).unwrap(), 1.0);
        assert!(mean_position(&grid, &[1.0]).is_err());
    }

    #[test]
    fn test_fidelity_ignores_global_phase() {
        let a = [Complex64::new(0.6, 0.0), Complex64::new(0.0, 0.8)];
        let b: Vec<_> = a.iter().map(|x| x * Complex64::from_polar(1.0, 0.9)).collect();
        assert!((fidelity(&a, &b).unwrap() - 1.0).abs() < 1e-12);
        assert!((norm(&a) - 1.0).abs() < 1e-12);
    }
}
