//! Angles command implementation.

use anyhow::Result;
use console::style;

use qsp_prep::{Domain, Gaussian, GroverRudolph, RotationStep};

use crate::config::RunConfig;

/// Execute the angles command.
pub fn execute(config: &RunConfig, format: &str) -> Result<()> {
    let prep = &config.prep;
    let gr = GroverRudolph::new(config.num_qubits, Domain::new(prep.lo, prep.hi)?)?
        .skip_trivial_rotations(prep.skip_trivial_rotations)
        .strict_log_concave(prep.strict_log_concave);
    let tree = gr.compute_angles(&Gaussian::new(prep.mean, prep.std_dev)?)?;

    match format.to_lowercase().as_str() {
        "json" => {
            println!("{}", serde_json::to_string_pretty(&tree)?);
        }
        "table" => {
            println!(
                "{} Grover–Rudolph angles for N({}, {}) on [{}, {}) with {} qubits",
                style("→").cyan().bold(),
                prep.mean,
                prep.std_dev,
                prep.lo,
                prep.hi,
                config.num_qubits
            );
            println!(
                "\n  {:>5} {:>6} {:>6} {:>16}  {:>12}",
                style("level").bold(),
                style("node").bold(),
                style("target").bold(),
                style("controls").bold(),
                style("theta").bold()
            );
            for step in gr.rotation_steps(&tree) {
                let pattern = control_pattern(&step);
                println!(
                    "  {:>5} {:>6} {:>6} {:>16}  {:>12.8}",
                    step.level,
                    step.index,
                    format!("q{}", step.target.0),
                    pattern,
                    step.theta
                );
            }
        }
        other => anyhow::bail!("Unknown format: '{other}'. Available: table, json"),
    }
    Ok(())
}

/// Control qubits and the value each must hold, in control order.
///
/// Prints e.g. `q3q2=10`: `q3` must be |1⟩ and `q2` |0⟩.
fn control_pattern(step: &RotationStep) -> String {
    if step.controls.is_empty() {
        return "-".to_string();
    }
    let qubits: String = step.controls.iter().map(|q| format!("q{}", q.0)).collect();
    let bits: String = (0..step.controls.len())
        .map(|c| if (step.ctrl_state >> c) & 1 == 1 { '1' } else { '0' })
        .collect();
    format!("{qubits}={bits}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use qsp_prep::Tabulated;

    #[test]
    fn test_control_pattern_follows_node_prefix() {
        let gr = GroverRudolph::new(3, Domain::new(0.0, 8.0).unwrap()).unwrap();
        let table = Tabulated::new(vec![1.0; 8]).unwrap();
        let steps = gr.rotation_steps(&gr.compute_angles(&table).unwrap());

        assert_eq!(control_pattern(&steps[0]), "-");
        // Level 2, node 0b10: q2 = 1, q1 = 0.
        let step = steps
            .iter()
            .find(|s| s.level == 2 && s.index == 0b10)
            .unwrap();
        assert_eq!(control_pattern(step), "q2q1=10");
        let step = steps
            .iter()
            .find(|s| s.level == 2 && s.index == 0b01)
            .unwrap();
        assert_eq!(control_pattern(step), "q2q1=01");
    }
}
