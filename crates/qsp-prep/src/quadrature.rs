//! Adaptive Simpson quadrature.

use serde::{Deserialize, Serialize};

/// Outcome of a numerical integration.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Integral {
    /// Estimated value.
    pub value: f64,
    /// Whether every panel met the tolerance before the depth limit.
    pub converged: bool,
    /// Number of integrand evaluations.
    pub evaluations: usize,
}

/// Recursive Simpson rule with Richardson correction.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AdaptiveSimpson {
    /// Error target over the whole interval, relative to `max(1, |integral|)`.
    pub tolerance: f64,
    /// Maximum bisection depth.
    pub max_depth: u32,
}

impl Default for AdaptiveSimpson {
    fn default() -> Self {
        Self {
            tolerance: 1e-12,
            max_depth: 40,
        }
    }
}

struct Panel {
    a: f64,
    b: f64,
    fa: f64,
    fm: f64,
    fb: f64,
    whole: f64,
}

impl AdaptiveSimpson {
    /// Create a rule with the given tolerance and depth limit.
    pub fn new(tolerance: f64, max_depth: u32) -> Self {
        Self {
            tolerance,
            max_depth,
        }
    }

    /// Integrate `f` over `[a, b]`; an empty or reversed interval gives zero.
    ///
    /// A non-finite integrand value stops refinement and is returned as the
    /// (non-finite) estimate.
    pub fn integrate<F: Fn(f64) -> f64>(&self, f: F, a: f64, b: f64) -> Integral {
        if b <= a {
            return Integral {
                value: 0.0,
                converged: true,
                evaluations: 0,
            };
        }
        let fa = f(a);
        let fb = f(b);
        let fm = f(0.5 * (a + b));
        let whole = simpson(a, b, fa, fm, fb);
        if !whole.is_finite() {
            return Integral {
                value: whole,
                converged: false,
                evaluations: 3,
            };
        }
        let tolerance = self.tolerance * whole.abs().max(1.0);
        let mut state = (0usize, true);
        let value = self.refine(
            &f,
            Panel {
                a,
                b,
                fa,
                fm,
                fb,
                whole,
            },
            tolerance,
            self.max_depth,
            &mut state,
        );
        Integral {
            value,
            converged: state.1,
            evaluations: state.0 + 3,
        }
    }

    fn refine<F: Fn(f64) -> f64>(
        &self,
        f: &F,
        p: Panel,
        tol: f64,
        depth: u32,
        state: &mut (usize, bool),
    ) -> f64 {
        let m = 0.5 * (p.a + p.b);
        let lm = 0.5 * (p.a + m);
        let rm = 0.5 * (m + p.b);
        let flm = f(lm);
        let frm = f(rm);
        state.0 += 2;

        let left = simpson(p.a, m, p.fa, flm, p.fm);
        let right = simpson(m, p.b, p.fm, frm, p.fb);
        let delta = left + right - p.whole;

        if delta.abs() <= 15.0 * tol {
            return left + right + delta / 15.0;
        }
        if depth == 0 || !delta.is_finite() {
            state.1 = false;
            return left + right + delta / 15.0;
        }
        self.refine(
            f,
            Panel {
                a: p.a,
                b: m,
                fa: p.fa,
                fm: flm,
                fb: p.fm,
                whole: left,
            },
            tol / 2.0,
            depth - 1,
            state,
        ) + self.refine(
            f,
            Panel {
                a: m,
                b: p.b,
                fa: p.fm,
                fm: frm,
                fb: p.fb,
                whole: right,
            },
            tol / 2.0,
            depth - 1,
            state,
        )
    }
}

fn simpson(a: f64, b: f64, fa: f64, fm: f64, fb: f64) -> f64 {
    (b - a) / 6.0 * (fa + 4.0 * fm + fb)
}
