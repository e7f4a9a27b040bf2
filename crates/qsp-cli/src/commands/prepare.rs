//! Prepare command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use qsp_prep::{Domain, Gaussian, GroverRudolph, probabilities_from_counts, total_variation};

use super::common::{
    export_circuit, print_circuit_summary, print_comparison, print_footer, print_metrics, sample,
};
use crate::config::RunConfig;

/// Execute the prepare command.
pub fn execute(config: &RunConfig, export: Option<&Path>, precision: Option<u32>) -> Result<()> {
    let prep = &config.prep;
    let n = config.num_qubits;
    let domain = Domain::new(prep.lo, prep.hi)?;
    let dist = Gaussian::new(prep.mean, prep.std_dev)?;

    println!(
        "{} Preparing N({}, {}) on [{}, {}) with {} qubits",
        style("→").cyan().bold(),
        prep.mean,
        prep.std_dev,
        prep.lo,
        prep.hi,
        n
    );

    let gr = GroverRudolph::new(n, domain)?
        .skip_trivial_rotations(prep.skip_trivial_rotations)
        .strict_log_concave(prep.strict_log_concave);
    let tree = gr.compute_angles(&dist)?;
    let target = gr.leaf_masses(&dist)?;

    let circuit = match precision {
        Some(bits) => {
            let predicted = tree.quantized(bits)?.probabilities();
            println!(
                "  Angles rounded to {} bits (predicted total variation {:.2e})",
                bits,
                total_variation(&predicted, &target)?
            );
            tree.binary_circuit("grover_rudolph_binary", bits)?
        }
        None => gr.circuit(&tree)?,
    };
    print_circuit_summary(&circuit);

    if let Some(path) = export {
        export_circuit(&circuit, path)?;
    }

    let result = sample(&circuit, config)?;
    let measured = probabilities_from_counts(&result.counts, n)?;

    let labels: Vec<String> = (0..1u64 << n)
        .map(|x| format!("{:+.3}", domain.bin_center(n, x)))
        .collect();
    print_comparison(&labels, &target, &measured);
    print_metrics(&target, &measured)?;
    print_footer(&result);
    Ok(())
}
