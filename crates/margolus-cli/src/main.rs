use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use margolus_core::{MetricsSnapshot, SimConfig, SimSnapshot, Simulation};
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "margolus")]
#[command(about = "Block cellular automaton simulator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation from a config file
    Run {
        /// Path to config file (JSON)
        #[arg(long)]
        config: PathBuf,

        /// Output directory for the run summary (optional)
        #[arg(long)]
        out: Option<PathBuf>,

        /// Override the configured number of generations
        #[arg(long)]
        generations: Option<usize>,

        /// Print an ASCII render of each sampled grid
        #[arg(long)]
        show_grids: bool,
    },
    /// Dump the default configuration to stdout
    DumpDefaultConfig,
}

fn render_grid(snapshot: &SimSnapshot) -> String {
    let n = snapshot.grid.size();
    let mut out = String::with_capacity(n * (n + 1));
    for row in 0..n {
        for col in 0..n {
            out.push(if snapshot.grid.get(row, col) == 1 {
                '#'
            } else {
                '.'
            });
        }
        out.push('\n');
    }
    out
}

fn print_metrics_line(m: &MetricsSnapshot) {
    println!(
        "gen {:>5}  alive {:>6.3}  stability {:>6.2}%  clusters {:>5}  variance {:.4}  avg alive {:.3}",
        m.generation,
        m.alive_ratio,
        m.stability_pct,
        m.cluster_count,
        m.variance,
        m.running_avg_alive_ratio
    );
}

fn run_simulation(
    config_path: &PathBuf,
    out: Option<PathBuf>,
    generations: Option<usize>,
    show_grids: bool,
) -> Result<()> {
    let file = File::open(config_path).context("failed to open config file")?;
    let reader = BufReader::new(file);
    let config: SimConfig = serde_json::from_reader(reader).context("failed to parse config")?;
    config.validate().context("config validation error")?;

    let generations = generations.unwrap_or(config.generations);
    let sample_every = config.sample_every.max(1);
    println!(
        "Loaded config from {:?}: {}x{} grid, wraparound={}, {} generations",
        config_path, config.grid_size, config.grid_size, config.wraparound, generations
    );

    let mut sim = Simulation::new(config).context("failed to initialize simulation")?;
    print_metrics_line(sim.latest_metrics());

    let mut samples = Vec::new();
    for k in 1..=generations {
        let snapshot = sim.step();
        if k == 1 || k % sample_every == 0 || k == generations {
            print_metrics_line(&snapshot);
            if show_grids {
                println!("{}", render_grid(&sim.snapshot()));
            }
            samples.push(snapshot);
        }
    }

    let final_snapshot = sim.snapshot();
    if !show_grids {
        println!("\nFinal grid:\n{}", render_grid(&final_snapshot));
    }

    if let Some(out_dir) = out {
        let summary = margolus_core::RunSummary {
            generations,
            sample_every,
            final_alive_ratio: final_snapshot.metrics.alive_ratio,
            samples,
        };
        std::fs::create_dir_all(&out_dir).context("failed to create output directory")?;
        let summary_path = out_dir.join("summary.json");
        let file = File::create(&summary_path).context("failed to create summary file")?;
        serde_json::to_writer_pretty(file, &summary).context("failed to write summary")?;
        println!("Run complete. Summary saved to {:?}", summary_path);
    } else {
        println!(
            "Run complete. Final alive ratio: {:.3}",
            final_snapshot.metrics.alive_ratio
        );
    }
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    match cli.command {
        Commands::DumpDefaultConfig => {
            let config = SimConfig::default();
            println!("{}", serde_json::to_string_pretty(&config)?);
        }
        Commands::Run {
            config,
            out,
            generations,
            show_grids,
        } => {
            run_simulation(&config, out, generations, show_grids)?;
        }
    }
    Ok(())
}
