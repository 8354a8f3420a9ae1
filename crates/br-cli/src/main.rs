//! CLI frontend for the Boardroom decision game.

mod commands;

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, fmt, layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Parser)]
#[command(
    name = "boardroom",
    about = "Boardroom: timed decisions, shifting stats, and how the crowd chose",
    version,
    propagate_version = true
)]
struct Cli {
    /// Log engine events to stderr
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Play a session in the terminal
    Play {
        /// Scenario document
        #[arg(short, long, default_value = "content/scenarios.json")]
        scenarios: PathBuf,

        /// Ending document
        #[arg(short, long, default_value = "content/endings.json")]
        endings: PathBuf,

        /// Engine config file (JSON)
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// RNG seed
        #[arg(long)]
        seed: Option<u64>,

        /// Draw setups in random order instead of authored order
        #[arg(long)]
        random_order: bool,

        /// Decisions in the session
        #[arg(long)]
        max_choices: Option<usize>,

        /// Setup that arms the rare ending
        #[arg(long)]
        rare_setup: Option<u32>,

        /// Track the overall stat on its own instead of averaging
        #[arg(long)]
        independent_aggregate: bool,

        /// Crowd counter file shared between sessions
        #[arg(long)]
        leaderboard: Option<PathBuf>,

        /// Write a markdown transcript of the session
        #[arg(long)]
        transcript: Option<PathBuf>,
    },

    /// Validate scenario and ending documents
    Check {
        /// Scenario document
        #[arg(short, long, default_value = "content/scenarios.json")]
        scenarios: PathBuf,

        /// Ending document
        #[arg(short, long, default_value = "content/endings.json")]
        endings: PathBuf,

        /// Engine config file to validate against
        #[arg(short, long)]
        config: Option<PathBuf>,
    },

    /// Show how players answered
    Stats {
        /// Crowd counter file
        #[arg(long)]
        leaderboard: PathBuf,

        /// Only show answers to this setup
        #[arg(long)]
        setup: Option<u32>,
    },

    /// Delete one crowd counter (maintenance)
    Reset {
        /// Crowd counter file
        #[arg(long)]
        leaderboard: PathBuf,

        /// Answer key, e.g. Answer7B
        key: String,
    },
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"))
    };
    tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr))
        .init();
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    let result = match cli.command {
        Commands::Play {
            scenarios,
            endings,
            config,
            seed,
            random_order,
            max_choices,
            rare_setup,
            independent_aggregate,
            leaderboard,
            transcript,
        } => commands::play::run(commands::play::PlayArgs {
            scenarios,
            endings,
            config,
            seed,
            random_order,
            max_choices,
            rare_setup,
            independent_aggregate,
            leaderboard,
            transcript,
        }),
        Commands::Check {
            scenarios,
            endings,
            config,
        } => commands::check::run(&scenarios, &endings, config.as_deref()),
        Commands::Stats { leaderboard, setup } => commands::stats::run(&leaderboard, setup),
        Commands::Reset { leaderboard, key } => commands::reset::run(&leaderboard, &key),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        process::exit(1);
    }
}
