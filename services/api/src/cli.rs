use crate::demo::{run_demo, run_raf, DemoArgs, RafArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use comp_engine::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Compensation Engine",
    about = "Run the compensation engine service or evaluate bonuses from the command line",
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
    /// Print an itemized bonus breakdown for a seeded demo employee
    Demo(DemoArgs),
    /// Compute the revenue adjustment factor from a team revenue CSV export
    Raf(RafArgs),
}

#[derive(Args, Debug, Default)]
pub(crate) struct ServeArgs {
    /// Override the configured host for the HTTP server
    #[arg(long)]
    pub(crate) host: Option<String>,
    /// Override the configured port for the HTTP server
    #[arg(long)]
    pub(crate) port: Option<u16>,
}

pub(crate) async fn run() -> Result<(), AppError> {
    let cli = Cli::parse();
    let command = cli
        .command
        .unwrap_or_else(|| Command::Serve(ServeArgs::default()));

    match command {
        Command::Serve(args) => server::run(args).await,
        Command::Demo(args) => run_demo(args),
        Command::Raf(args) => run_raf(args),
    }
}
