//! Velum CLI — simulation runs, octree statistics, and validation.

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "velum")]
#[command(version, about = "Velum — mass-spring deformable-body solver")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a cloth-sheet simulation and report energies.
    Simulate {
        /// Path to a solver config (TOML). Defaults are used when omitted.
        #[arg(short, long)]
        config: Option<String>,

        /// Number of steps to run.
        #[arg(short, long, default_value_t = 1000)]
        steps: u32,
    },

    /// Build an octree over a sampled sphere and print its statistics.
    Octree {
        /// Sphere radius for the sampled point set.
        #[arg(short, long, default_value_t = 4.0)]
        radius: f32,

        /// Maximum subdivision depth (≤ 5).
        #[arg(short, long, default_value_t = 3)]
        levels: u8,

        /// Element-count threshold that triggers a split.
        #[arg(short, long, default_value_t = 8)]
        max_elems: usize,
    },

    /// Parse and validate a solver config file.
    Validate {
        /// Path to a config file (TOML).
        path: String,
    },
}

fn main() {
    tracing_subscriber::fmt().with_target(false).init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Simulate { config, steps } => commands::simulate(config.as_deref(), steps),
        Commands::Octree {
            radius,
            levels,
            max_elems,
        } => commands::octree(radius, levels, max_elems),
        Commands::Validate { path } => commands::validate(&path),
    };

    if let Err(e) = result {
        eprintln!("Error: {e}");
        std::process::exit(1);
    }
}
