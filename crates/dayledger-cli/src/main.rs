use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "dayledger", version, about = "Daily habit and earnings ledger")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Day check-ins (wake, sleep, early-window settings)
    Checkin {
        #[command(subcommand)]
        action: commands::checkin::CheckinAction,
    },
    /// Task catalog and per-day completed tasks
    Task {
        #[command(subcommand)]
        action: commands::task::TaskAction,
    },
    /// Study timer control
    Study {
        #[command(subcommand)]
        action: commands::study::StudyAction,
    },
    /// Earnings and study statistics
    Stats {
        #[command(subcommand)]
        action: commands::stats::StatsAction,
    },
    /// Data export (JSON / CSV)
    Export {
        #[command(subcommand)]
        action: commands::export::ExportAction,
    },
    /// Settings management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Vault maintenance
    Vault {
        #[command(subcommand)]
        action: commands::vault::VaultAction,
    },
}

#[tokio::main(flavor = "current_thread")]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Checkin { action } => commands::checkin::run(action).await,
        Commands::Task { action } => commands::task::run(action).await,
        Commands::Study { action } => commands::study::run(action).await,
        Commands::Stats { action } => commands::stats::run(action).await,
        Commands::Export { action } => commands::export::run(action).await,
        Commands::Config { action } => commands::config::run(action).await,
        Commands::Vault { action } => commands::vault::run(action).await,
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
