use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "smokefree", version, about = "SmokeFree quit tracker CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// First-time setup of the quit date
    Setup(commands::setup::SetupArgs),
    /// Show elapsed time, check-in state and progress
    Status(commands::status::StatusArgs),
    /// Record today's check-in
    CheckIn,
    /// Start over from a new quit date, clearing all check-ins
    Reset(commands::reset::ResetArgs),
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

/// Log to stderr, filtered by `SMOKEFREE_LOG` (default `warn`).
fn init_logging() {
    let filter = EnvFilter::try_from_env("SMOKEFREE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Setup(args) => commands::setup::run(args),
        Commands::Status(args) => commands::status::run(args),
        Commands::CheckIn => commands::check_in::run(),
        Commands::Reset(args) => commands::reset::run(args),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
