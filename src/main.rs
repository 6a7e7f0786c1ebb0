use std::path::PathBuf;

use anyhow::Context;
use clap::{Args, Parser, Subcommand};
use tracing::{info, warn};

use u_homecare::evaluation::{CostWeights, SolutionAuditor};
use u_homecare::models::{HhcInstance, Solution};

#[derive(Parser)]
#[clap(author, version, about, long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    #[arg(short, long, global = true)]
    debug: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Rebuild a solution file against an instance and report its cost
    #[command(visible_alias = "r")]
    Replay {
        #[command(flatten)]
        args: ReplayArgs,
    },
}

#[derive(Args)]
struct ReplayArgs {
    /// Instance description (JSON)
    #[arg(short, long)]
    instance: PathBuf,

    /// Solution file in the route listing format
    #[arg(short, long)]
    solution: PathBuf,

    /// Rewrite the replayed solution to this file
    #[arg(short, long)]
    output: Option<PathBuf>,

    /// Write edge coordinates of the replayed solution to this file
    #[arg(short, long)]
    geometry: Option<PathBuf>,

    #[arg(long, default_value_t = 1.0 / 3.0)]
    w_dist: f64,

    #[arg(long, default_value_t = 1.0 / 3.0)]
    w_tard: f64,

    #[arg(long, default_value_t = 1.0 / 3.0)]
    w_tmax: f64,
}

fn replay(args: ReplayArgs) -> anyhow::Result<()> {
    let instance = HhcInstance::from_json_file(&args.instance)
        .with_context(|| format!("loading instance {}", args.instance.display()))?;
    let weights = CostWeights::new(args.w_dist, args.w_tard, args.w_tmax);

    let solution = Solution::read_from_file_with_weights(&instance, weights, &args.solution)
        .with_context(|| format!("replaying {}", args.solution.display()))?;
    let summary = solution.summary();
    info!(
        "Replayed {}: cost = {}, dist = {}, tard = {}, tmax = {}, tasks = {}",
        instance.name(),
        summary.cost,
        summary.dist,
        summary.tard,
        summary.tmax,
        solution.task_order().len(),
    );

    let violations = SolutionAuditor::new().audit(&solution);
    if violations.is_empty() {
        info!("Audit: no violations");
    } else {
        for violation in &violations {
            warn!("{:?}", violation.kind);
        }
        info!(
            "Audit: {} violations ({} structural)",
            violations.len(),
            violations.iter().filter(|v| v.is_structural()).count(),
        );
    }

    if let Some(path) = args.output {
        solution.write_txt(&path)?;
        info!("Wrote {}", path.display());
    }
    if let Some(path) = args.geometry {
        solution.write_geometry_txt(&path)?;
        info!("Wrote {}", path.display());
    }
    Ok(())
}

fn main() -> Result<(), anyhow::Error> {
    let cli = Cli::parse();
    tracing_subscriber::fmt()
        .with_max_level(if cli.debug {
            tracing::Level::DEBUG
        } else {
            tracing::Level::INFO
        })
        .init();

    if let Some(Commands::Replay { args }) = cli.command {
        replay(args)?;
    }

    Ok(())
}
