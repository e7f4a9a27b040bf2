//! Distances between a target distribution and a prepared one.

use qsp_hal::Counts;

use crate::error::{PrepError, PrepResult};

fn check_lengths(p: &[f64], q: &[f64]) -> PrepResult<()> {
    if p.len() != q.len() {
        return Err(PrepError::LengthMismatch {
            expected: p.len(),
            got: q.len(),
        });
    }
    Ok(())
}

/// Total-variation distance `½ Σ |p_i - q_i|`.
pub fn total_variation(p: &[f64], q: &[f64]) -> PrepResult<f64> {
    check_lengths(p, q)?;
    Ok(0.5 * p.iter().zip(q).map(|(a, b)| (a - b).abs()).sum::<f64>())
}

/// Classical (Bhattacharyya) fidelity `(Σ √(p_i q_i))²`.
pub fn classical_fidelity(p: &[f64], q: &[f64]) -> PrepResult<f64> {
    check_lengths(p, q)?;
    let overlap: f64 = p.iter().zip(q).map(|(a, b)| (a * b).max(0.0).sqrt()).sum();
    Ok(overlap * overlap)
}

/// Empirical bin probabilities from measurement counts.
///
/// Character `j` of a bitstring is the value of qubit `j`, so
/// `"011"` lands in bin `0b110 = 6`.
#[allow(clippy::cast_precision_loss)]
pub fn probabilities_from_counts(counts: &Counts, num_qubits: u32) -> PrepResult<Vec<f64>> {
    let size = 1usize << num_qubits;
    let mut probs = vec![0.0; size];
    let total = counts.total_shots();
    if total == 0 {
        return Ok(probs);
    }

    for (bitstring, &count) in counts.iter() {
        if bitstring.len() != num_qubits as usize {
            return Err(PrepError::InvalidParameter(format!(
                "bitstring '{bitstring}' does not have {num_qubits} bits"
            )));
        }
        let mut index = 0usize;
        for (j, c) in bitstring.chars().enumerate() {
            match c {
                '0' => {}
                '1' => index |= 1 << j,
                _ => {
                    return Err(PrepError::InvalidParameter(format!(
                        "bitstring '{bitstring}' contains '{c}'"
                    )));
                }
            }
        }
        probs[index] += count as f64 / total as f64;
    }
    Ok(probs)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_identical_distributions() {
        let p = [0.1, 0.2, 0.3, 0.4];
        assert!(total_variation(&p, &p).unwrap().abs() < 1e-15);
        assert!((classical_fidelity(&p, &p).unwrap() - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_disjoint_distributions() {
        let p = [1.0, 0.0];
        let q = [0.0, 1.0];
        assert!((total_variation(&p, &q).unwrap() - 1.0).abs() < 1e-15);
        assert!(classical_fidelity(&p, &q).unwrap().abs() < 1e-15);
    }

    #[test]
    fn test_length_mismatch() {
        let err = total_variation(&[1.0], &[0.5, 0.5]).unwrap_err();
        assert!(matches!(err, PrepError::LengthMismatch { expected: 1, got: 2 }));
    }

    #[test]
    fn test_counts_are_little_endian() {
        let counts: Counts = [("011".to_string(), 3), ("000".to_string(), 1)]
            .into_iter()
            .collect();
        let probs = probabilities_from_counts(&counts, 3).unwrap();
        assert!((probs[6] - 0.75).abs() < 1e-15);
        assert!((probs[0] - 0.25).abs() < 1e-15);
    }

    #[test]
    fn test_counts_reject_malformed_bitstrings() {
        let counts: Counts = [("01".to_string(), 1)].into_iter().collect();
        assert!(probabilities_from_counts(&counts, 3).is_err());
        let counts: Counts = [("0x1".to_string(), 1)].into_iter().collect();
        assert!(probabilities_from_counts(&counts, 3).is_err());
    }
}
