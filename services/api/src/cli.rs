use crate::demo::{run_demo, DemoArgs};
use crate::report::{run_eligibility_report, run_explore_report, EligibilityArgs, ExploreArgs};
use crate::server;
use clap::{Args, Parser, Subcommand};
use enrollment_portal::error::AppError;

#[derive(Parser, Debug)]
#[command(
    name = "Enrollment Portal",
    about = "Serve and inspect the student enrollment portal from the command line",
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
    /// Print the eligibility verdict for every catalog course
    Eligibility(EligibilityArgs),
    /// List catalog courses through the explore filter
    Explore(ExploreArgs),
    /// Walk through eligibility, scheduling and enrollment on sample data
    Demo(DemoArgs),
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
        Command::Eligibility(args) => run_eligibility_report(args),
        Command::Explore(args) => run_explore_report(args),
        Command::Demo(args) => run_demo(args),
    }
}
