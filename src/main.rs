use std::path::PathBuf;

use clap::{Parser, Subcommand, ValueEnum};
use tracing_subscriber::EnvFilter;

use fire_planner::core::PlanMode;
use fire_planner::report;
use fire_planner::store::{FileStorage, PlanStore};

#[derive(Copy, Clone, Debug, Eq, PartialEq, ValueEnum)]
enum CliPlanMode {
    Income,
    Goal,
}

impl From<CliPlanMode> for PlanMode {
    fn from(value: CliPlanMode) -> Self {
        match value {
            CliPlanMode::Income => PlanMode::Income,
            CliPlanMode::Goal => PlanMode::Goal,
        }
    }
}

#[derive(Parser, Debug)]
#[command(
    name = "fire-planner",
    about = "FIRE planning calculator (corpus targets, years-to-target and required-savings solvers)"
)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Serve the HTTP API and the embedded web UI.
    Serve {
        #[arg(long, default_value_t = 8080)]
        port: u16,
        #[arg(long, default_value = "fire_data.json")]
        data_file: PathBuf,
    },
    /// Print the formatted plan report to stdout.
    Report {
        #[arg(long, value_enum, default_value_t = CliPlanMode::Income)]
        mode: CliPlanMode,
        #[arg(long, default_value = "fire_data.json")]
        data_file: PathBuf,
        /// Plan permalink query string; takes precedence over persisted state.
        #[arg(long)]
        query: Option<String>,
    },
}

#[tokio::main]
async fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    match Cli::parse().command {
        Command::Serve { port, data_file } => {
            if let Err(e) = fire_planner::api::run_http_server(port, data_file).await {
                eprintln!("Server error: {e}");
                std::process::exit(1);
            }
        }
        Command::Report {
            mode,
            data_file,
            query,
        } => {
            let store = PlanStore::open(FileStorage::new(data_file), query.as_deref());
            print!("{}", report::render_report(&store.snapshot(), mode.into()));
        }
    }
}
