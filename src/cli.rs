// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser)]
#[command(name = "berth")]
#[command(about = "Drive the container CLI through a privileged helper")]
#[command(version)]
pub struct Cli {
    /// Path to a berth.yml file
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Helper socket path (overrides config and BERTH_SOCKET)
    #[arg(long, global = true)]
    pub socket: Option<PathBuf>,

    /// Run the container tool in this process instead of through the helper
    #[arg(long, global = true)]
    pub direct: bool,

    /// Emit JSON lines
    #[arg(long, global = true, conflicts_with = "quiet")]
    pub json: bool,

    /// Print only identifiers
    #[arg(short, long, global = true)]
    pub quiet: bool,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Write a berth.yml template in the current directory
    Init {
        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Run the privileged helper that executes the container tool
    Helper,

    /// Check that the helper is reachable
    Ping,

    /// List containers
    Ps,

    /// List images
    Images,

    /// Start a container
    Start { id: String },

    /// Stop a container
    Stop { id: String },

    /// Delete a container
    Rm { id: String },

    /// Delete an image
    Rmi { reference: String },

    /// Create and start a detached container
    Run {
        image: String,

        /// Container name
        #[arg(long)]
        name: Option<String>,
    },

    /// Show container logs
    Logs(LogsArgs),

    /// Open a shell into a container in a new terminal window
    Terminal { id: String },

    /// Manage the container system service
    #[command(subcommand)]
    System(SystemCommand),

    /// Manage local DNS domains
    #[command(subcommand)]
    Dns(DnsCommand),
}

#[derive(Args)]
pub struct LogsArgs {
    pub id: String,

    /// Number of trailing lines
    #[arg(short = 'n', long)]
    pub lines: Option<u32>,

    /// Keep streaming new output
    #[arg(short, long, conflicts_with = "boot")]
    pub follow: bool,

    /// Show boot logs instead of container output
    #[arg(long)]
    pub boot: bool,
}

#[derive(Subcommand)]
pub enum SystemCommand {
    /// Show whether the system is running and its DNS domains
    Status,
    /// Start the container system
    Start,
    /// Stop the container system
    Stop,
    /// Restart the container system
    Restart,
    /// Show system logs
    Logs {
        /// Only show entries from this trailing window, e.g. 5m
        #[arg(long)]
        last: Option<String>,

        /// Keep streaming new output
        #[arg(short, long)]
        follow: bool,
    },
}

#[derive(Subcommand)]
pub enum DnsCommand {
    /// List domains; the default is marked with *
    List,
    /// Create a domain
    Create { domain: String },
    /// Delete a domain
    Delete { domain: String },
    /// Make a domain the default
    Default { domain: String },
}
