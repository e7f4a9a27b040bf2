//! qsp command-line interface.
//!
//! Prepares Grover–Rudolph and Kitaev–Webb states, prints their rotation
//! tables, and evolves Gaussian wave packets on the bundled simulator.
//!
//! Settings come from built-in defaults, then an optional YAML or JSON
//! file (`--config`), then `QSP_*` environment variables, then flags.

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};
use console::style;
use qsp_evolve::Potential;
use tracing::debug;
use tracing_subscriber::EnvFilter;

mod commands;
mod config;

use commands::{angles, evolve, gaussian, prepare, version};
use config::RunConfig;

/// qsp - quantum state preparation and particle evolution
#[derive(Parser)]
#[command(name = "qsp")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Increase verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    verbose: u8,

    /// Configuration file (YAML, or JSON by extension)
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

/// Register size and log-concave distribution.
#[derive(Args)]
struct DistArgs {
    /// Number of qubits
    #[arg(short = 'n', long)]
    qubits: Option<u32>,

    /// Distribution mean
    #[arg(long, allow_negative_numbers = true)]
    mean: Option<f64>,

    /// Distribution standard deviation
    #[arg(long)]
    std_dev: Option<f64>,

    /// Lower domain bound
    #[arg(long, allow_negative_numbers = true)]
    lo: Option<f64>,

    /// Upper domain bound
    #[arg(long, allow_negative_numbers = true)]
    hi: Option<f64>,

    /// Omit rotations that are numerically the identity
    #[arg(long)]
    skip_trivial: bool,

    /// Reject distributions whose bin masses are not log-concave
    #[arg(long)]
    strict: bool,
}

impl DistArgs {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(n) = self.qubits {
            config.num_qubits = n;
        }
        if let Some(mean) = self.mean {
            config.prep.mean = mean;
        }
        if let Some(std_dev) = self.std_dev {
            config.prep.std_dev = std_dev;
        }
        if let Some(lo) = self.lo {
            config.prep.lo = lo;
        }
        if let Some(hi) = self.hi {
            config.prep.hi = hi;
        }
        config.prep.skip_trivial_rotations |= self.skip_trivial;
        config.prep.strict_log_concave |= self.strict;
    }
}

/// Sampling options.
#[derive(Args)]
struct ShotArgs {
    /// Number of shots
    #[arg(short, long)]
    shots: Option<u32>,

    /// Seed for the simulator's sampler
    #[arg(long)]
    seed: Option<u64>,
}

impl ShotArgs {
    fn apply(&self, config: &mut RunConfig) {
        if let Some(shots) = self.shots {
            config.shots = shots;
        }
        if self.seed.is_some() {
            config.seed = self.seed;
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print the Grover–Rudolph rotation table of a Gaussian
    Angles {
        #[command(flatten)]
        dist: DistArgs,

        /// Output format (table, json)
        #[arg(short, long, default_value = "table")]
        format: String,
    },

    /// Prepare a Gaussian with Grover–Rudolph and sample it
    Prepare {
        #[command(flatten)]
        dist: DistArgs,

        #[command(flatten)]
        shots: ShotArgs,

        /// Round angles to this many bits and rotate by one gate per bit
        #[arg(long)]
        precision: Option<u32>,

        /// Write the circuit as JSON
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Prepare a discrete Gaussian with Kitaev–Webb and sample it
    Gaussian {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<u32>,

        /// Mean, in grid-index units (default: register centre)
        #[arg(long, allow_negative_numbers = true)]
        mean: Option<f64>,

        /// Standard deviation, in grid-index units (default: 2^n / 8)
        #[arg(long)]
        std_dev: Option<f64>,

        /// Omit rotations that are numerically the identity
        #[arg(long)]
        skip_trivial: bool,

        #[command(flatten)]
        shots: ShotArgs,

        /// Write the circuit as JSON
        #[arg(long)]
        export: Option<PathBuf>,
    },

    /// Evolve a Gaussian wave packet with the split-operator method
    Evolve {
        /// Number of qubits
        #[arg(short = 'n', long)]
        qubits: Option<u32>,

        /// Initial packet centre
        #[arg(long, allow_negative_numbers = true)]
        center: Option<f64>,

        /// Initial packet width
        #[arg(long)]
        width: Option<f64>,

        /// Initial momentum
        #[arg(short, long, allow_negative_numbers = true)]
        momentum: Option<f64>,

        /// Evolution time
        #[arg(short, long)]
        time: Option<f64>,

        /// Number of Trotter steps
        #[arg(long)]
        steps: Option<usize>,

        /// Particle mass
        #[arg(long)]
        mass: Option<f64>,

        /// Use a harmonic potential with this angular frequency
        #[arg(long)]
        harmonic: Option<f64>,

        #[command(flatten)]
        shots: ShotArgs,
    },

    /// Show version information
    Version,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    let filter = match cli.verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(filter))
        .with_target(false)
        .init();

    let result = execute(cli);

    if let Err(e) = result {
        eprintln!("{} {:#}", style("Error:").red().bold(), e);
        std::process::exit(1);
    }

    Ok(())
}

fn execute(cli: Cli) -> anyhow::Result<()> {
    let Cli {
        config: config_path,
        command,
        ..
    } = cli;
    let load = || RunConfig::load(config_path.as_deref());

    match command {
        Commands::Angles { dist, format } => {
            let mut config = load()?;
            dist.apply(&mut config);
            ready(&config)?;
            angles::execute(&config, &format)
        }

        Commands::Prepare {
            dist,
            shots,
            precision,
            export,
        } => {
            let mut config = load()?;
            dist.apply(&mut config);
            shots.apply(&mut config);
            ready(&config)?;
            prepare::execute(&config, export.as_deref(), precision)
        }

        Commands::Gaussian {
            qubits,
            mean,
            std_dev,
            skip_trivial,
            shots,
            export,
        } => {
            let mut config = load()?;
            if let Some(n) = qubits {
                config.num_qubits = n;
            }
            config.prep.skip_trivial_rotations |= skip_trivial;
            shots.apply(&mut config);
            ready(&config)?;
            gaussian::execute(&config, mean, std_dev, export.as_deref())
        }

        Commands::Evolve {
            qubits,
            center,
            width,
            momentum,
            time,
            steps,
            mass,
            harmonic,
            shots,
        } => {
            let mut config = load()?;
            if let Some(n) = qubits {
                config.num_qubits = n;
            }
            let ev = &mut config.evolve;
            ev.center = center.unwrap_or(ev.center);
            ev.width = width.unwrap_or(ev.width);
            ev.momentum = momentum.unwrap_or(ev.momentum);
            ev.time = time.unwrap_or(ev.time);
            ev.steps = steps.unwrap_or(ev.steps);
            ev.mass = mass.unwrap_or(ev.mass);
            if let Some(omega) = harmonic {
                ev.potential = Potential::Harmonic { omega, center: 0.0 };
            }
            shots.apply(&mut config);
            ready(&config)?;
            evolve::execute(&config)
        }

        Commands::Version => {
            version::execute();
            Ok(())
        }
    }
}

fn ready(config: &RunConfig) -> anyhow::Result<()> {
    config.validate()?;
    debug!(?config, "resolved configuration");
    Ok(())
}
