//! Shared helpers for CLI commands.

use std::fs;
use std::path::Path;
use std::time::Duration;

use anyhow::{Context, Result};
use console::style;
use indicatif::{ProgressBar, ProgressStyle};

use qsp_adapter_sim::SimulatorBackend;
use qsp_hal::{Backend, ExecutionResult};
use qsp_ir::Circuit;
use qsp_prep::{classical_fidelity, total_variation};

use crate::config::RunConfig;

/// Rows printed by [`print_comparison`] before truncating.
const MAX_ROWS: usize = 40;

/// Bins below this probability on both sides are not printed.
const MIN_SHOWN: f64 = 5e-4;

/// Simulator honouring the configured seed.
pub fn simulator(config: &RunConfig) -> SimulatorBackend {
    let backend = SimulatorBackend::new();
    match config.seed {
        Some(seed) => backend.with_seed(seed),
        None => backend,
    }
}

/// Measure every qubit of `circuit` and sample it on the simulator.
pub fn sample(circuit: &Circuit, config: &RunConfig) -> Result<ExecutionResult> {
    let mut measured = circuit.clone();
    measured.measure_all()?;

    let spinner = ProgressBar::new_spinner();
    spinner.set_style(ProgressStyle::default_spinner().template("{spinner:.cyan} {msg}")?);
    spinner.set_message(format!("Sampling {} shots...", config.shots));
    spinner.enable_steady_tick(Duration::from_millis(100));

    let result = simulator(config).run(&measured, config.shots);
    spinner.finish_and_clear();
    Ok(result?)
}

/// Print circuit size information.
pub fn print_circuit_summary(circuit: &Circuit) {
    let ops = circuit
        .count_ops()
        .into_iter()
        .map(|(name, n)| format!("{name}: {n}"))
        .collect::<Vec<_>>()
        .join(", ");
    println!(
        "  Circuit: {} qubits, {} ops, depth {} ({})",
        circuit.num_qubits(),
        circuit.num_ops(),
        circuit.depth(),
        ops
    );
}

/// Write the circuit description as JSON.
pub fn export_circuit(circuit: &Circuit, path: &Path) -> Result<()> {
    let json = serde_json::to_string_pretty(&circuit.description())?;
    fs::write(path, json).with_context(|| format!("Failed to write {}", path.display()))?;
    println!(
        "  Exported circuit to {}",
        style(path.display()).green()
    );
    Ok(())
}

/// Print target and measured probabilities side by side with bars.
#[allow(
    clippy::cast_possible_truncation,
    clippy::cast_sign_loss,
    clippy::cast_precision_loss
)]
pub fn print_comparison(labels: &[String], target: &[f64], measured: &[f64]) {
    let peak = target
        .iter()
        .chain(measured)
        .copied()
        .fold(0.0_f64, f64::max)
        .max(f64::MIN_POSITIVE);

    println!(
        "\n  {:>10}  {:>8}  {:>8}",
        style("bin").bold(),
        style("target").bold(),
        style("measured").bold()
    );

    let shown: Vec<usize> = (0..labels.len())
        .filter(|&i| target[i] >= MIN_SHOWN || measured[i] >= MIN_SHOWN)
        .collect();
    for &i in shown.iter().take(MAX_ROWS) {
        let bar_len = (measured[i] / peak * 40.0).round() as usize;
        let bar: String = "█".repeat(bar_len);
        println!(
            "  {:>10}  {:>8.4}  {:>8.4} {}",
            style(&labels[i]).cyan(),
            target[i],
            measured[i],
            style(bar).green()
        );
    }
    if shown.len() > MAX_ROWS {
        println!("  ... and {} more bins", shown.len() - MAX_ROWS);
    }
}

/// Print distance metrics between target and measured distributions.
pub fn print_metrics(target: &[f64], measured: &[f64]) -> Result<()> {
    let tv = total_variation(target, measured)?;
    let fidelity = classical_fidelity(target, measured)?;
    println!(
        "\n  Total variation: {}   Fidelity: {}",
        style(format!("{tv:.5}")).yellow(),
        style(format!("{fidelity:.5}")).yellow()
    );
    Ok(())
}

/// Print the run footer.
pub fn print_footer(result: &ExecutionResult) {
    println!(
        "\n{} {} shots",
        style("✓").green().bold(),
        result.shots
    );
    if let Some(time_ms) = result.execution_time_ms {
        println!("  Execution time: {} ms", style(time_ms).yellow());
    }
}
