use chrono::{DateTime, Utc};
use clap::{Parser, Subcommand};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

mod commands;

#[derive(Parser)]
#[command(name = "learnstreak", version, about = "Learning goal and streak tracker")]
struct Cli {
    /// Evaluate as of this instant (RFC 3339) instead of the current time
    #[arg(long, global = true, value_name = "RFC3339")]
    at: Option<DateTime<Utc>>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Goal management
    Goal {
        #[command(subcommand)]
        action: commands::goal::GoalAction,
    },
    /// Log today as learned or frozen
    Log {
        #[command(subcommand)]
        action: commands::log::LogAction,
    },
    /// Streak maintenance
    Streak {
        #[command(subcommand)]
        action: commands::streak::StreakAction,
    },
    /// Calendar views
    Calendar {
        #[command(subcommand)]
        action: commands::calendar::CalendarAction,
    },
    /// Keep running and reset stale streaks at every local midnight
    Watch,
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
    /// Print shell completions
    Completions {
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

fn init_tracing() {
    let filter = EnvFilter::try_from_env("LEARNSTREAK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));
    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing();

    let now = cli.at.unwrap_or_else(Utc::now);
    let result = match cli.command {
        Commands::Goal { action } => commands::goal::run(action, now),
        Commands::Log { action } => commands::log::run(action, now),
        Commands::Streak { action } => commands::streak::run(action, now),
        Commands::Calendar { action } => commands::calendar::run(action, now),
        Commands::Watch => commands::watch::run(),
        Commands::Config { action } => commands::config::run(action),
        Commands::Completions { shell } => commands::completions::run(shell),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
