//! Blockade command-line interface.
//!
//! Run blockage sweeps from TOML (or JSON) job files:
//! ```sh
//! blockade-cli run job.toml
//! blockade-cli validate job.toml
//! blockade-cli preview job.toml --frames 6
//! blockade-cli radii CA FE Zn
//! ```

mod config;
mod runner;

use clap::{Parser, Subcommand};
use env_logger::Env;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "blockade-cli")]
#[command(about = "Blockade: ionic current blockade through solid-state nanopores")]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a full sweep from a job configuration file.
    Run {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
    },
    /// Validate a configuration file without running the simulation.
    Validate {
        /// Path to the job configuration file.
        config: PathBuf,
    },
    /// Write conductivity slices at a few sweep positions without solving.
    Preview {
        /// Path to the job configuration file.
        config: PathBuf,
        /// Output directory (overrides config file setting).
        #[arg(short, long)]
        output: Option<PathBuf>,
        /// Number of frames (overrides config file setting).
        #[arg(long)]
        frames: Option<usize>,
    },
    /// Show tabulated van der Waals radii, or resolve the given identifiers.
    Radii {
        /// Element symbols or atom names, e.g. `CA` or `Fe`.
        symbols: Vec<String>,
        /// Radius reported for unknown identifiers (Å).
        #[arg(long, default_value_t = 1.5)]
        default_radius: f64,
    },
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(Env::default().default_filter_or("info")).init();
    let cli = Cli::parse();

    match cli.command {
        Commands::Run { config, output } => {
            println!("Blockade Vertical Movement Simulation");
            println!("=====================================");
            let job = config::load_config(&config)?;
            println!("Configuration: {}", config.display());

            let out_dir = output.unwrap_or_else(|| job.output.directory.clone());
            let result = runner::run_simulation(&job, &out_dir)?;

            let prefix = &job.output.output_prefix;
            runner::write_results(&result, &out_dir.join(format!("{prefix}_results.txt")))?;
            if job.output.save_json {
                runner::write_results_json(
                    &result,
                    &out_dir.join(format!("{prefix}_results.json")),
                )?;
            }

            println!("Open pore current: {:.6e} A", result.open_current);
            if let Some(s) = result.summary {
                println!(
                    "Maximum blockage: {:.2}% at Z = {:.2} Å",
                    s.max_blockage, s.z_at_max
                );
            }
            println!("Simulation complete.");
            Ok(())
        }
        Commands::Validate { config } => {
            let job = config::load_config(&config)?;
            let params = job.validate()?;
            println!("Configuration is valid: {}", config.display());
            println!(
                "  {} pore, {} positions",
                params.pore.pore_type(),
                params.sweep.count()
            );
            Ok(())
        }
        Commands::Preview {
            config,
            output,
            frames,
        } => {
            let job = config::load_config(&config)?;
            let out_dir = output.unwrap_or_else(|| job.output.directory.clone());
            let frames = frames.unwrap_or(job.output.preview_frames);
            let written = runner::run_preview(&job, &out_dir, frames)?;
            for path in &written {
                println!("Preview written to: {}", path.display());
            }
            Ok(())
        }
        Commands::Radii {
            symbols,
            default_radius,
        } => runner::print_radii(&symbols, default_radius),
    }
}
