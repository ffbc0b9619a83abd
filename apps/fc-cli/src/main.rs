use clap::{Parser, Subcommand, ValueEnum};
use fc_app::{AppResult, SimConfig, TimeSeries, run_simulation_with};
use fc_results::{default_plot_path, plot_series, save_csv, save_json, summarize};
use std::path::{Path, PathBuf};
use std::time::Instant;

#[derive(Parser)]
#[command(name = "fc-cli")]
#[command(about = "FusionCraft CLI - Coupled plasma/field simulation", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a simulation and export every series
    Run {
        #[command(flatten)]
        run: RunArgs,
        /// Output file path
        #[arg(short, long, default_value = "fusioncraft_run.csv")]
        out: PathBuf,
        /// Output format
        #[arg(long, value_enum, default_value_t = OutputFormat::Csv)]
        format: OutputFormat,
        /// Plot image path (.svg or bitmap; defaults to the output path with .png)
        #[arg(long, conflicts_with = "no_plot")]
        plot: Option<PathBuf>,
        /// Skip the plot image
        #[arg(long)]
        no_plot: bool,
    },
    /// Run a simulation and print min/max/final per series
    Summary {
        #[command(flatten)]
        run: RunArgs,
    },
}

#[derive(clap::Args)]
struct RunArgs {
    /// Total simulated time in seconds
    #[arg(short = 'T', long = "time", default_value_t = 5.0)]
    total_time: f64,
    /// Time step in seconds
    #[arg(long, default_value_t = 0.01)]
    dt: f64,
    /// Simulation config YAML (defaults apply to missing fields)
    #[arg(long)]
    config: Option<PathBuf>,
}

#[derive(Clone, Copy, ValueEnum)]
enum OutputFormat {
    Csv,
    Json,
}

fn main() -> AppResult<()> {
    // Initialize tracing
    tracing_subscriber::fmt::init();

    let cli = Cli::parse();

    match cli.command {
        Commands::Run {
            run,
            out,
            format,
            plot,
            no_plot,
        } => {
            let plot = match (plot, no_plot) {
                (_, true) => None,
                (Some(path), false) => Some(path),
                (None, false) => Some(default_plot_path(&out)),
            };
            cmd_run(&run, &out, format, plot.as_deref())
        }
        Commands::Summary { run } => cmd_summary(&run),
    }
}

fn simulate(args: &RunArgs) -> AppResult<TimeSeries> {
    let config = match &args.config {
        Some(path) => {
            let config = SimConfig::from_yaml_file(path)?;
            tracing::info!(path = %path.display(), "loaded simulation config");
            config
        }
        None => SimConfig::default(),
    };

    println!("Running coupled simulation");
    println!(
        "  total_time = {:.3} s, dt = {:.4} s",
        args.total_time, args.dt
    );

    let start = Instant::now();
    let series = run_simulation_with(config, args.total_time, args.dt)?;
    println!(
        "✓ Simulation completed: {} samples in {:.3} s",
        series.len(),
        start.elapsed().as_secs_f64()
    );
    Ok(series)
}

fn cmd_run(
    args: &RunArgs,
    out: &Path,
    format: OutputFormat,
    plot: Option<&Path>,
) -> AppResult<()> {
    let series = simulate(args)?;
    print_final_values(&series);

    let exported = match format {
        OutputFormat::Csv => save_csv(&series, out),
        OutputFormat::Json => save_json(&series, out),
    };
    if let Err(e) = exported {
        eprintln!("✗ Export to {} failed: {}", out.display(), e);
        return Err(e.into());
    }
    println!(
        "✓ Exported {} series to {}",
        series.series_count(),
        out.display()
    );

    if let Some(path) = plot {
        match plot_series(&series, path, None) {
            Ok(()) => println!("✓ Plot saved to {}", path.display()),
            Err(e) => {
                tracing::warn!(path = %path.display(), error = %e, "plot export failed");
                eprintln!("⚠ Plot to {} failed: {}", path.display(), e);
            }
        }
    }
    Ok(())
}

fn cmd_summary(args: &RunArgs) -> AppResult<()> {
    let series = simulate(args)?;
    println!();
    println!(
        "{:<22} {:>14} {:>14} {:>14}",
        "series", "min", "max", "final"
    );
    for s in summarize(&series) {
        println!(
            "{:<22} {:>14.6} {:>14.6} {:>14.6}",
            s.name, s.min, s.max, s.last
        );
        if s.non_finite > 0 {
            println!("  ⚠ {} non-finite samples", s.non_finite);
        }
    }
    Ok(())
}

fn print_final_values(series: &TimeSeries) {
    for name in ["time", "density", "temperature", "fusion_power", "E_field"] {
        if let Some(last) = series.get(name).and_then(|v| v.last()) {
            println!("  {} = {:.6}", name, last);
        }
    }
}
