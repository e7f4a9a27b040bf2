//! Gaussian command implementation.

use std::path::Path;

use anyhow::Result;
use console::style;

use qsp_prep::{KitaevWebb, probabilities_from_counts};

use super::common::{
    export_circuit, print_circuit_summary, print_comparison, print_footer, print_metrics, sample,
};
use crate::config::RunConfig;

/// Execute the gaussian command.
///
/// `mean` and `std_dev` are in units of the integer grid `0 … 2^n - 1`;
/// they default to the centre and an eighth of the register.
#[allow(clippy::cast_precision_loss)]
pub fn execute(
    config: &RunConfig,
    mean: Option<f64>,
    std_dev: Option<f64>,
    export: Option<&Path>,
) -> Result<()> {
    let n = config.num_qubits;
    let size = (1u64 << n) as f64;
    let mean = mean.unwrap_or((size - 1.0) / 2.0);
    let std_dev = std_dev.unwrap_or(size / 8.0);

    println!(
        "{} Preparing discrete Gaussian (μ = {}, σ = {}) on {} qubits",
        style("→").cyan().bold(),
        mean,
        std_dev,
        n
    );

    let kw = KitaevWebb::new(n)?.skip_trivial_rotations(config.prep.skip_trivial_rotations);
    let circuit = kw.prepare(mean, std_dev)?;
    let target = kw.target_probabilities(mean, std_dev)?;
    print_circuit_summary(&circuit);

    if let Some(path) = export {
        export_circuit(&circuit, path)?;
    }

    let result = sample(&circuit, config)?;
    let measured = probabilities_from_counts(&result.counts, n)?;

    let labels: Vec<String> = (0..1u64 << n).map(|x| x.to_string()).collect();
    print_comparison(&labels, &target, &measured);
    print_metrics(&target, &measured)?;
    print_footer(&result);
    Ok(())
}
