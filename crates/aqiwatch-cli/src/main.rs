//! CLI for aqiwatch, a live air quality dashboard in your terminal.

mod commands;
mod tui;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "aqiwatch")]
#[command(about = "aqiwatch: live single-location AQI dashboard (simulated sensor feed)")]
#[command(version = aqiwatch_core::VERSION)]
struct Cli {
    /// JSON config file; flags below override its values
    #[arg(long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Live interactive AQI dashboard (TUI)
    Monitor {
        #[command(flatten)]
        session: commands::SessionArgs,
    },

    /// Print one line per reading until Ctrl-C (pipe-friendly)
    Watch {
        #[command(flatten)]
        session: commands::SessionArgs,

        /// Stop after this many readings (0 = until interrupted)
        #[arg(long, default_value = "0")]
        ticks: u64,
    },

    /// Advance the feed N times and print the dashboard view as JSON
    Snapshot {
        #[command(flatten)]
        session: commands::SessionArgs,

        /// Refreshes to apply after session start
        #[arg(long, default_value = "0")]
        ticks: u64,

        /// Write JSON to this path instead of stdout
        #[arg(long)]
        output: Option<String>,
    },

    /// Show the AQI severity bands, colors and advisories
    Bands,

    /// Start an HTTP dashboard server (one window per session)
    Server {
        /// Port to listen on
        #[arg(long, default_value = "8043")]
        port: u16,

        /// Bind address
        #[arg(long, default_value = "127.0.0.1")]
        host: String,

        /// Seconds a session may sit idle before it is discarded
        #[arg(long, default_value = "1800")]
        session_ttl: u64,

        #[command(flatten)]
        session: commands::SessionArgs,
    },
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn")).init();

    let cli = Cli::parse();
    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Monitor { session } => commands::monitor::run(config_path, &session),
        Commands::Watch { session, ticks } => commands::watch::run(config_path, &session, ticks),
        Commands::Snapshot {
            session,
            ticks,
            output,
        } => commands::snapshot::run(config_path, &session, ticks, output.as_deref()),
        Commands::Bands => commands::bands::run(),
        Commands::Server {
            port,
            host,
            session_ttl,
            session,
        } => commands::server::run(config_path, &session, &host, port, session_ttl),
    }
}
