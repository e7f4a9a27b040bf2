//! Classical reference evolution on the grid.
//!
//! Uses the same Strang splitting and momentum convention as
//! [`SplitOperatorEvolution`](crate::SplitOperatorEvolution), with a naive
//! `O(N²)` discrete Fourier transform. Only meant for checking circuits on
//! small registers.

use std::f64::consts::TAU;

use num_complex::Complex64;

use crate::error::{EvolveError, EvolveResult};
use crate::grid::Grid;
use crate::potential::Particle1D;

/// Discrete Fourier transform `N^{-1/2} Σ_j e^{sign·2πi jk/N} ψ_j`.
///
/// `sign = -1.0` goes from position to momentum, `+1.0` back.
#[allow(clippy::cast_precision_loss)]
pub fn dft(psi: &[Complex64], sign: f64) -> Vec<Complex64> {
    let n = psi.len();
    let norm = 1.0 / (n as f64).sqrt();
    (0..n)
        .map(|k| {
            psi.iter()
                .enumerate()
                .map(|(j, &a)| {
                    let phase = sign * TAU * ((j * k) % n) as f64 / n as f64;
                    a * Complex64::from_polar(norm, phase)
                })
                .sum()
        })
        .collect()
}

fn apply_phase(psi: &mut [Complex64], values: &[f64], t: f64) {
    for (a, &v) in psi.iter_mut().zip(values) {
        *a *= Complex64::from_polar(1.0, -v * t);
    }
}

/// Evolve `psi` for time `t` in `n_steps` Strang slices.
#[allow(clippy::cast_precision_loss)]
pub fn split_operator(
    psi: &[Complex64],
    particle: &Particle1D,
    t: f64,
    n_steps: usize,
) -> EvolveResult<Vec<Complex64>> {
    let expected = particle.grid().len();
    if psi.len() != expected {
        return Err(EvolveError::LengthMismatch {
            expected,
            got: psi.len(),
        });
    }
    if n_steps == 0 {
        return Err(EvolveError::InvalidSteps(0));
    }

    let dt = t / n_steps as f64;
    let potential = particle.potential_diagonal();
    let kinetic = particle.kinetic_diagonal();

    let mut state = psi.to_vec();
    for _ in 0..n_steps {
        apply_phase(&mut state, &potential, dt / 2.0);
        let mut momentum = dft(&state, -1.0);
        apply_phase(&mut momentum, &kinetic, dt);
        state = dft(&momentum, 1.0);
        apply_phase(&mut state, &potential, dt / 2.0);
    }
    Ok(state)
}

/// Normalised Gaussian packet `∝ exp(-(x-x0)²/(4σ²) + i p0 x)` on the grid.
///
/// `σ` is the standard deviation of the position distribution `|ψ|²`.
pub fn gaussian_packet(grid: &Grid, x0: f64, sigma: f64, p0: f64) -> Vec<Complex64> {
    let amps: Vec<Complex64> = grid
        .positions()
        .into_iter()
        .map(|x| Complex64::from_polar((-(x - x0).powi(2) / (4.0 * sigma * sigma)).exp(), p0 * x))
        .collect();
    let norm = amps.iter().map(Complex64::norm_sqr).sum::<f64>().sqrt();
    amps.into_iter().map(|a| a / norm).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::observables::{mean_position, norm, probabilities};
    use crate::potential::Potential;

    #[test]
    fn test_dft_round_trip() {
        let psi: Vec<Complex64> = (0..8)
            .map(|j| Complex64::new(f64::from(j).sin(), f64::from(j).cos()))
            .collect();
        let back = dft(&dft(&psi, -1.0), 1.0);
        for (a, b) in psi.iter().zip(&back) {
            assert!((a - b).norm() < 1e-12);
        }
    }

    #[test]
    fn test_plane_wave_is_one_momentum() {
        let grid = Grid::new(3, 0.0, 8.0).unwrap();
        let p = grid.momentum(2);
        let psi = gaussian_packet(&grid, 0.0, 1e6, p);
        let phi = dft(&psi, -1.0);
        assert!((phi[2].norm_sqr() - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_free_packet_drifts() {
        let grid = Grid::new(6, -10.0, 10.0).unwrap();
        let particle = Particle1D::free(grid, 1.0).unwrap();
        let psi = gaussian_packet(&grid, -3.0, 1.0, 2.0);
        let out = split_operator(&psi, &particle, 1.5, 1).unwrap();
        assert!((norm(&out) - 1.0).abs() < 1e-12);
        let x = mean_position(&grid, &probabilities(&out)).unwrap();
        assert!((x - 0.0).abs() < 1e-2, "mean position {x}");
    }

    #[test]
    fn test_harmonic_oscillation() {
        let grid = Grid::new(6, -8.0, 8.0).unwrap();
        let particle = Particle1D::new(
            grid,
            1.0,
            Potential::Harmonic {
                omega: 1.0,
                center: 0.0,
            },
        )
        .unwrap();
        // Coherent state displaced to x0 = 2.
        let psi = gaussian_packet(&grid, 2.0, std::f64::consts::FRAC_1_SQRT_2, 0.0);
        let half = split_operator(&psi, &particle, std::f64::consts::PI, 200).unwrap();
        let x = mean_position(&grid, &probabilities(&half)).unwrap();
        assert!((x + 2.0).abs() < 1e-2, "mean position {x}");
    }

    #[test]
    fn test_length_mismatch() {
        let grid = Grid::new(2, 0.0, 1.0).unwrap();
        let particle = Particle1D::free(grid, 1.0).unwrap();
        let err = split_operator(&[Complex64::new(1.0, 0.0)], &particle, 1.0, 1).unwrap_err();
        assert!(matches!(err, EvolveError::LengthMismatch { expected: 4, got: 1 }));
    }
}
