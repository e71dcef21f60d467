use crate::demo::{run_demo, run_roi_report, run_sales_report, DemoArgs, RoiReportArgs, SalesReportArgs};
use crate::server;
use agency_roi::error::AppError;
use clap::{Args, Parser, Subcommand};

#[derive(Parser, Debug)]
#[command(
    name = "Agency ROI Dashboard",
    about = "Compute marketing ROI and sales KPIs for agency dashboards from the command line",
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
    /// Compute marketing ROI from the three CSV exports
    Roi {
        #[command(subcommand)]
        command: RoiCommand,
    },
    /// Compute sales-dashboard KPIs from the CSV exports
    Sales {
        #[command(subcommand)]
        command: SalesCommand,
    },
    /// Run the dashboards over a built-in sample dataset
    Demo(DemoArgs),
}

#[derive(Subcommand, Debug)]
enum RoiCommand {
    /// Print the overall and per-agency ROI reports as JSON
    Report(RoiReportArgs),
}

#[derive(Subcommand, Debug)]
enum SalesCommand {
    /// Print the sales overview, lead sources, and monthly revenue as JSON
    Report(SalesReportArgs),
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
        Command::Roi {
            command: RoiCommand::Report(args),
        } => run_roi_report(args),
        Command::Sales {
            command: SalesCommand::Report(args),
        } => run_sales_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
