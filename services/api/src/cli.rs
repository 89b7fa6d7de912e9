use crate::report::{run_fleet_summary, run_ledger, run_pool, run_voyage_predict};
use crate::report::{FleetSummaryArgs, LedgerArgs, PoolArgs, VoyagePredictArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use fleet_navigator::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Fleet Navigator",
    about = "Classify fleet GHG compliance, simulate pooling, and predict voyage emissions",
    version
)]
struct Cli {
    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Start the HTTP service (default command)
    Serve(ServeArgs),
    /// Inspect the configured fleet
    Fleet {
        #[command(subcommand)]
        command: FleetCommand,
    },
    /// Work with single voyages
    Voyage {
        #[command(subcommand)]
        command: VoyageCommand,
    },
    /// Aggregate a local voyage log into vessel intensities and a derived target
    Ledger(LedgerArgs),
}

#[derive(Subcommand, Debug)]
enum FleetCommand {
    /// Print the fleet summary and insights
    Summary(FleetSummaryArgs),
    /// Pool one deficit vessel against one surplus vessel
    Pool(PoolArgs),
}

#[derive(Subcommand, Debug)]
enum VoyageCommand {
    /// Predict CO2 for a voyage and classify it
    Predict(VoyagePredictArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured compliance target
    #[arg(long)]
    pub(crate) target: Option<f64>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Fleet {
            command: FleetCommand::Summary(args),
        } => run_fleet_summary(args).await,
        Command::Fleet {
            command: FleetCommand::Pool(args),
        } => run_pool(args).await,
        Command::Voyage {
            command: VoyageCommand::Predict(args),
        } => run_voyage_predict(args).await,
        Command::Ledger(args) => run_ledger(args),
    }
}
