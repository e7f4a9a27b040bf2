//! Particle on a grid and the potentials it can feel.

use serde::{Deserialize, Serialize};

use crate::error::{EvolveError, EvolveResult};
use crate::grid::Grid;

/// External potential `V(x)`.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Potential {
    /// `V = 0`.
    Free,
    /// `V = ½ m ω² (x - center)²`.
    Harmonic {
        /// Angular frequency.
        omega: f64,
        /// Minimum of the well.
        #[serde(default)]
        center: f64,
    },
    /// `V = height` on `[left, right]`, zero elsewhere.
    Barrier {
        /// Barrier height.
        height: f64,
        /// Left edge.
        left: f64,
        /// Right edge.
        right: f64,
    },
    /// `V = slope · x`.
    Linear {
        /// Force is `-slope`.
        slope: f64,
    },
}

impl Potential {
    /// Value at `x` for a particle of mass `mass`.
    pub fn value(&self, x: f64, mass: f64) -> f64 {
        match *self {
            Potential::Free => 0.0,
            Potential::Harmonic { omega, center } => 0.5 * mass * omega * omega * (x - center).powi(2),
            Potential::Barrier {
                height,
                left,
                right,
            } => {
                if (left..=right).contains(&x) {
                    height
                } else {
                    0.0
                }
            }
            Potential::Linear { slope } => slope * x,
        }
    }

    fn validate(&self) -> EvolveResult<()> {
        let finite = match *self {
            Potential::Free => true,
            Potential::Harmonic { omega, center } => omega.is_finite() && center.is_finite(),
            Potential::Barrier {
                height,
                left,
                right,
            } => height.is_finite() && left.is_finite() && right.is_finite(),
            Potential::Linear { slope } => slope.is_finite(),
        };
        if finite {
            Ok(())
        } else {
            Err(EvolveError::InvalidGrid(format!(
                "potential {self:?} has non-finite parameters"
            )))
        }
    }
}

/// A particle of mass `m` on a periodic grid, `H = p²/2m + V(x)` with ħ = 1.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Particle1D {
    grid: Grid,
    mass: f64,
    potential: Potential,
}

impl Particle1D {
    /// Create a particle; the mass must be positive.
    pub fn new(grid: Grid, mass: f64, potential: Potential) -> EvolveResult<Self> {
        if !(mass.is_finite() && mass > 0.0) {
            return Err(EvolveError::InvalidMass(mass));
        }
        potential.validate()?;
        Ok(Self {
            grid,
            mass,
            potential,
        })
    }

    /// A free particle.
    pub fn free(grid: Grid, mass: f64) -> EvolveResult<Self> {
        Self::new(grid, mass, Potential::Free)
    }

    /// The position grid.
    pub fn grid(&self) -> &Grid {
        &self.grid
    }

    /// Particle mass.
    pub fn mass(&self) -> f64 {
        self.mass
    }

    /// The potential.
    pub fn potential(&self) -> &Potential {
        &self.potential
    }

    /// `V(x_j)` for every grid point.
    pub fn potential_diagonal(&self) -> Vec<f64> {
        self.grid
            .positions()
            .into_iter()
            .map(|x| self.potential.value(x, self.mass))
            .collect()
    }

    /// `p_k² / 2m` for every Fourier index.
    pub fn kinetic_diagonal(&self) -> Vec<f64> {
        self.grid
            .momenta()
            .into_iter()
            .map(|p| p * p / (2.0 * self.mass))
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_harmonic_diagonal() {
        let grid = Grid::new(2, -2.0, 2.0).unwrap();
        let particle = Particle1D::new(
            grid,
            2.0,
            Potential::Harmonic {
                omega: 1.0,
                center: 0.0,
            },
        )
        .unwrap();
        assert_eq!(particle.potential_diagonal(), vec![4.0, 1.0, 0.0, 1.0]);
    }

    #[test]
    fn test_barrier_is_inclusive() {
        let v = Potential::Barrier {
            height: 3.0,
            left: -1.0,
            right: 1.0,
        };
        assert_eq!(v.value(-1.0, 1.0), 3.0);
        assert_eq!(v.value(1.0, 1.0), 3.0);
        assert_eq!(v.value(1.5, 1.0), 0.0);
    }

    #[test]
    fn test_kinetic_is_symmetric() {
        let grid = Grid::new(3, 0.0, 8.0).unwrap();
        let t = Particle1D::free(grid, 1.0).unwrap().kinetic_diagonal();
        assert_eq!(t[0], 0.0);
        assert!((t[1] - t[7]).abs() < 1e-15);
        assert!(t[4] > t[3]);
    }

    #[test]
    fn test_rejects_bad_mass() {
        let grid = Grid::new(2, 0.0, 1.0).unwrap();
        assert!(matches!(
            Particle1D::free(grid, 0.0),
            Err(EvolveError::InvalidMass(_))
        ));
        assert!(Particle1D::free(grid, f64::INFINITY).is_err());
    }

    #[test]
    fn test_potential_serde_tag() {
        let v: Potential = serde_json::from_str(r#"{"kind":"harmonic","omega":2.0}"#).unwrap();
        assert_eq!(
            v,
            Potential::Harmonic {
                omega: 2.0,
                center: 0.0
            }
        );
    }
}
