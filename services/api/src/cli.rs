use crate::commands::{
    run_assess, run_donor_add, run_donor_list, run_donor_match, AddDonorArgs, AssessArgs,
    MatchDonorArgs, StorageArgs,
};
use crate::server;
use clap::{Args, Parser, Subcommand};
use maternal_guard::config::AppConfig;
use maternal_guard::error::AppError;
use maternal_guard::telemetry;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "Maternal-Guard & Life-Link",
    about = "Maternal risk screening and emergency blood donor matching",
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
    /// Classify maternal risk from vitals and optionally raise an SOS alert
    Assess(AssessArgs),
    /// Register, list, and match blood donors
    Donors {
        #[command(subcommand)]
        command: DonorCommand,
    },
}

#[derive(Subcommand, Debug)]
enum DonorCommand {
    /// Append a donor to the donor table
    Add(AddDonorArgs),
    /// Print every registered donor
    List(StorageArgs),
    /// Find eligible donors for a blood group in a city
    Match(MatchDonorArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
    /// Override the configured donor CSV path
    #[arg(long)]
    pub(crate) donor_csv: Option<PathBuf>,
    /// Override the configured risk model artifact
    #[arg(long)]
    pub(crate) model: Option<PathBuf>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    let config = bootstrap()?;

    match command {
        Command::Serve(args) => server::run(config, args).await,
        Command::Assess(args) => run_assess(config, args),
        Command::Donors { command } => match command {
            DonorCommand::Add(args) => run_donor_add(config, args),
            DonorCommand::List(args) => run_donor_list(config, args),
            DonorCommand::Match(args) => run_donor_match(config, args),
        },
    }
}

/// Load configuration and install the log subscriber shared by every command.
fn bootstrap() -> Result<AppConfig, AppError> {
    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;
    Ok(config)
}
