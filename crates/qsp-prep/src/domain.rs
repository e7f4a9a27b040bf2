//! Discretised support and its dyadic subdivision.

use serde::{Deserialize, Serialize};

use crate::error::{PrepError, PrepResult};

/// Half-open interval `[lo, hi)` split into `2^n` equal bins by an
/// `n`-qubit register.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(try_from = "RawDomain")]
pub struct Domain {
    lo: f64,
    hi: f64,
}

#[derive(Deserialize)]
struct RawDomain {
    lo: f64,
    hi: f64,
}

impl TryFrom<RawDomain> for Domain {
    type Error = PrepError;

    fn try_from(raw: RawDomain) -> PrepResult<Self> {
        Domain::new(raw.lo, raw.hi)
    }
}

impl Domain {
    /// Create a domain; bounds must be finite with `lo < hi`.
    pub fn new(lo: f64, hi: f64) -> PrepResult<Self> {
        if !lo.is_finite() || !hi.is_finite() || lo >= hi {
            return Err(PrepError::InvalidDomain { lo, hi });
        }
        Ok(Self { lo, hi })
    }

    /// Lower bound.
    pub fn lo(&self) -> f64 {
        self.lo
    }

    /// Upper bound.
    pub fn hi(&self) -> f64 {
        self.hi
    }

    /// `hi - lo`.
    pub fn width(&self) -> f64 {
        self.hi - self.lo
    }

    /// Width of one of the `2^num_qubits` bins.
    pub fn bin_width(&self, num_qubits: u32) -> f64 {
        self.width() / f64::powi(2.0, num_qubits as i32)
    }

    /// The `2^num_qubits + 1` bin edges, first `lo`, last exactly `hi`.
    pub fn bin_edges(&self, num_qubits: u32) -> Vec<f64> {
        let bins = 1u64 << num_qubits;
        (0..=bins)
            .map(|i| DyadicInterval::edge(self, num_qubits, i))
            .collect()
    }

    /// Centre of bin `index`.
    pub fn bin_center(&self, num_qubits: u32, index: u64) -> f64 {
        let (a, b) = DyadicInterval::new(num_qubits, index).bounds(self);
        0.5 * (a + b)
    }
}

/// Node `index` at depth `level` of the binary subdivision of a domain.
///
/// The node covers the `index`-th of `2^level` equal sub-intervals.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DyadicInterval {
    /// Depth in the subdivision; the whole domain is level 0.
    pub level: u32,
    /// Position among the `2^level` intervals of this level.
    pub index: u64,
}

impl DyadicInterval {
    /// The whole domain.
    pub fn root() -> Self {
        Self { level: 0, index: 0 }
    }

    /// Node `index` of `level`.
    pub fn new(level: u32, index: u64) -> Self {
        debug_assert!(index < 1u64 << level, "index {index} out of level {level}");
        Self { level, index }
    }

    #[allow(clippy::cast_precision_loss)]
    fn edge(domain: &Domain, level: u32, i: u64) -> f64 {
        if i >= 1u64 << level {
            return domain.hi;
        }
        domain.lo + domain.width() * (i as f64 / (1u64 << level) as f64)
    }

    /// `[a, b)` covered by this node.
    pub fn bounds(&self, domain: &Domain) -> (f64, f64) {
        (
            Self::edge(domain, self.level, self.index),
            Self::edge(domain, self.level, self.index + 1),
        )
    }

    /// Point splitting this node into its two children.
    pub fn midpoint(&self, domain: &Domain) -> f64 {
        Self::edge(domain, self.level + 1, 2 * self.index + 1)
    }

    /// Left and right halves.
    pub fn children(&self) -> (Self, Self) {
        let level = self.level + 1;
        (
            Self {
                level,
                index: 2 * self.index,
            },
            Self {
                level,
                index: 2 * self.index + 1,
            },
        )
    }

    /// Enclosing node one level up.
    pub fn parent(&self) -> Option<Self> {
        (self.level > 0).then(|| Self {
            level: self.level - 1,
            index: self.index / 2,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_rejects_bad_bounds() {
        assert!(Domain::new(1.0, 1.0).is_err());
        assert!(Domain::new(2.0, 1.0).is_err());
        assert!(Domain::new(f64::NEG_INFINITY, 1.0).is_err());
        assert!(serde_json::from_str::<Domain>(r#"{"lo": 3.0, "hi": -3.0}"#).is_err());
    }

    #[test]
    fn test_bin_edges() {
        let d = Domain::new(-1.0, 1.0).unwrap();
        assert_eq!(d.bin_edges(2), vec![-1.0, -0.5, 0.0, 0.5, 1.0]);
        assert!((d.bin_width(2) - 0.5).abs() < 1e-15);
        assert!((d.bin_center(2, 3) - 0.75).abs() < 1e-15);
    }

    #[test]
    fn test_last_edge_is_exact() {
        let d = Domain::new(0.1, 0.7).unwrap();
        let edges = d.bin_edges(7);
        assert_eq!(edges.len(), 129);
        assert_eq!(*edges.last().unwrap(), 0.7);
    }

    #[test]
    fn test_dyadic_navigation() {
        let d = Domain::new(0.0, 8.0).unwrap();
        let node = DyadicInterval::new(2, 1);
        assert_eq!(node.bounds(&d), (2.0, 4.0));
        assert_eq!(node.midpoint(&d), 3.0);

        let (l, r) = node.children();
        assert_eq!(l.bounds(&d), (2.0, 3.0));
        assert_eq!(r.bounds(&d), (3.0, 4.0));
        assert_eq!(r.parent(), Some(node));
        assert_eq!(DyadicInterval::root().parent(), None);
    }
}
