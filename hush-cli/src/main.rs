//! hush — block distracting sites through the hosts file.
//!
//! # Usage
//!
//! ```text
//! hush block <site>
//! hush unblock <site> [--minutes N]
//! hush status [--json]
//! hush site list [--json]
//! hush site add <slug> [--type social|video|news|forum|other] [--minutes N] <domain>...
//! hush daemon start|tick|install|uninstall|logs
//! ```
//!
//! Most commands rewrite the hosts file and therefore need elevated
//! privileges when pointed at the real `/etc/hosts`.

mod commands;

use anyhow::Result;
use clap::{Parser, Subcommand};

use commands::{
    block::BlockArgs, daemon::DaemonCommand, site::SiteCommand, status::StatusArgs,
    unblock::UnblockArgs, worker::TimerWorkerArgs,
};

#[derive(Parser, Debug)]
#[command(
    name = "hush",
    version,
    about = "Block distracting domains via the hosts file, with durable reblock timers",
    long_about = None,
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Re-apply the block for a site immediately (cancels any pending timer).
    Block(BlockArgs),

    /// Lift the block for a site for a limited number of minutes.
    Unblock(UnblockArgs),

    /// Show per-site blocking state, grace windows, and timer processes.
    Status(StatusArgs),

    /// Inspect or edit the site catalog.
    Site {
        #[command(subcommand)]
        command: SiteCommand,
    },

    /// Manage the reconciler daemon and its launchd registration.
    Daemon {
        #[command(subcommand)]
        command: DaemonCommand,
    },

    /// Internal: detached reblock timer process (spawned by `unblock`).
    #[command(hide = true, name = "timer-worker")]
    TimerWorker(TimerWorkerArgs),
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    match cli.command {
        Commands::Block(args) => args.run(),
        Commands::Unblock(args) => args.run(),
        Commands::Status(args) => args.run(),
        Commands::Site { command } => commands::site::run(command),
        Commands::Daemon { command } => commands::daemon::run(command),
        Commands::TimerWorker(args) => args.run(),
    }
}
