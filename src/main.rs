use std::path::PathBuf;

use clap::{Parser, Subcommand};
use stage_sizing::analysis::report::render_two_stage;
use stage_sizing::analysis::sweep::{linspace, sweep_two_stage};
use stage_sizing::*;
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(name = "stage-sizer")]
#[command(version)]
#[command(about = "Single-stage tank sizing: minimise stage mass subject to stress and geometry limits")]
struct Args {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Model variant, overriding the configuration file
    #[arg(short, long, global = true)]
    variant: Option<ModelVariant>,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Optimise length and wall thickness
    Optimize {
        /// Random starts in addition to the configured initial design
        #[arg(long, default_value = "0")]
        starts: usize,
        /// Random seed for reproducibility
        #[arg(long, default_value = "42")]
        seed: u64,
    },
    /// Evaluate a single design
    Evaluate {
        #[arg(long)]
        length: f64,
        #[arg(long)]
        thickness: f64,
    },
    /// Evaluate a length by wall-thickness grid
    Sweep {
        #[arg(long, default_value = "50")]
        points: usize,
        #[arg(long, default_value = "10.0")]
        max_length: f64,
    },
    /// Size the two-stage stack
    TwoStage {
        #[arg(long, default_value = "8.0")]
        first_length: f64,
        #[arg(long, default_value = "2.0")]
        second_length: f64,
        /// Grid points per axis for the mass-ratio sweep
        #[arg(long, default_value = "100")]
        points: usize,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .init();

    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => RunConfig::from_json_file(path)?,
        None => RunConfig::default(),
    };
    if let Some(variant) = args.variant {
        config.variant = variant;
    }

    let command = args.command.unwrap_or(Commands::Optimize {
        starts: 0,
        seed: 42,
    });

    match command {
        Commands::Optimize { starts, seed } => {
            let problem = config.problem()?;
            let driver = Driver::new(config.driver);
            println!("Variant: {}", config.variant);

            match MultiStart::new(starts, seed).run(&driver, &problem) {
                Ok(outcome) => {
                    SizingReport::new(&problem.model, &outcome.evaluation)
                        .with_iterations(outcome.iterations)
                        .display();
                }
                Err(e @ SizingError::NotConverged { .. }) => {
                    println!("Optimization failed: {}", e);
                    return Err(e.into());
                }
                Err(e) => return Err(e.into()),
            }
        }

        Commands::Evaluate { length, thickness } => {
            let model = config.model();
            let evaluation = model.evaluate(&StageDesign::new(length, thickness))?;
            println!("Variant: {}", config.variant);
            SizingReport::new(&model, &evaluation).display();
            println!(
                "Design is {}",
                if model.is_feasible(&evaluation) {
                    "feasible"
                } else {
                    "infeasible"
                }
            );
        }

        Commands::Sweep { points, max_length } => {
            let model = config.model();
            let thickness = config.problem.thickness;
            let sweep = DesignSweep::grid(
                (config.problem.length.lower, max_length),
                (
                    thickness.lower,
                    thickness.upper.unwrap_or(THICKNESS_UPPER_BOUND),
                ),
                points,
            );
            let result = sweep.run(&model);

            println!(
                "Evaluated {} designs ({} rejected), {} feasible",
                result.points.len(),
                result.rejected,
                result.feasible_count()
            );
            match result.best_feasible() {
                Some(best) => {
                    let evaluation = model.evaluate(&best.design)?;
                    SizingReport::new(&model, &evaluation).display();
                }
                None => println!("No feasible grid point"),
            }
        }

        Commands::TwoStage {
            first_length,
            second_length,
            points,
        } => {
            let vehicle = TwoStageVehicle::new(config.two_stage);
            let sizing = vehicle.size(first_length, second_length)?;
            print!("{}", render_two_stage(first_length, second_length, &sizing));

            let grid = sweep_two_stage(
                &vehicle,
                &linspace(1.0, 8.0, points),
                &linspace(1.0, 3.0, points),
            )?;
            if let Some(lowest) = grid
                .iter()
                .min_by(|a, b| a.mass_ratio.total_cmp(&b.mass_ratio))
            {
                println!(
                    "Lowest mass ratio on grid: {:.4} at L1 = {:.3} m, L2 = {:.3} m",
                    lowest.mass_ratio, lowest.first_length, lowest.second_length
                );
            }
        }
    }

    Ok(())
}
