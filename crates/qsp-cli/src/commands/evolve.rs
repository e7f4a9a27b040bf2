//! Evolve command implementation.

use anyhow::Result;
use console::style;

use qsp_evolve::observables::{fidelity, mean_position, position_variance, probabilities};
use qsp_evolve::{Grid, Particle1D, SplitOperatorEvolution, phase_kick, reference};
use qsp_hal::Backend;
use qsp_prep::{KitaevWebb, probabilities_from_counts};

use super::common::{print_circuit_summary, print_comparison, print_footer, sample, simulator};
use crate::config::RunConfig;

/// Execute the evolve command.
///
/// Prepares a Kitaev–Webb packet at `center` with spatial width `width`,
/// kicks it to `momentum`, evolves it and reports position statistics.
pub fn execute(config: &RunConfig) -> Result<()> {
    let ev = &config.evolve;
    let grid = Grid::new(config.num_qubits, ev.x_min, ev.x_max)?;
    let particle = Particle1D::new(grid, ev.mass, ev.potential)?;

    println!(
        "{} Evolving packet at x = {} (σ = {}, p = {}) for t = {} in {} steps",
        style("→").cyan().bold(),
        ev.center,
        ev.width,
        ev.momentum,
        ev.time,
        ev.steps
    );
    println!(
        "  Grid: {} points on [{}, {}), dx = {:.4}",
        grid.len(),
        grid.x_min(),
        grid.x_max(),
        grid.dx()
    );

    let mu = (ev.center - grid.x_min()) / grid.dx();
    let sigma = ev.width / grid.dx();
    let mut initial = KitaevWebb::new(config.num_qubits)?.prepare(mu, sigma)?;
    phase_kick(&mut initial, &grid, ev.momentum)?;

    let evolution =
        SplitOperatorEvolution::new(particle, ev.time, ev.steps).with_initial(initial.clone());
    let circuit = evolution.circuit()?;
    print_circuit_summary(&circuit);

    let backend = simulator(config);
    let psi0 = backend.statevector(&initial)?;
    let psi_t = backend.statevector(&circuit)?;
    let exact = reference::split_operator(&psi0, &particle, ev.time, ev.steps)?;

    let before = probabilities(&psi0);
    let after = probabilities(&psi_t);
    println!(
        "\n  {:>8}  {:>10}  {:>10}",
        "",
        style("⟨x⟩").bold(),
        style("σ_x").bold()
    );
    println!(
        "  {:>8}  {:>10.4}  {:>10.4}",
        "t = 0",
        mean_position(&grid, &before)?,
        position_variance(&grid, &before)?.sqrt()
    );
    println!(
        "  {:>8}  {:>10.4}  {:>10.4}",
        format!("t = {}", ev.time),
        mean_position(&grid, &after)?,
        position_variance(&grid, &after)?.sqrt()
    );
    println!(
        "\n  Fidelity with classical reference: {}",
        style(format!("{:.10}", fidelity(&psi_t, &exact)?)).yellow()
    );

    let result = sample(&circuit, config)?;
    let measured = probabilities_from_counts(&result.counts, config.num_qubits)?;
    let labels: Vec<String> = grid
        .positions()
        .iter()
        .map(|x| format!("{x:+.3}"))
        .collect();
    print_comparison(&labels, &after, &measured);
    println!(
        "\n  Sampled ⟨x⟩: {}",
        style(format!("{:.4}", mean_position(&grid, &measured)?)).yellow()
    );
    print_footer(&result);
    Ok(())
}
