// ABOUTME: Command-line interface definition using clap derive macros.
// ABOUTME: Defines all subcommands and their arguments.

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "stolos")]
#[command(about = "Swarm fleet reconciler: declarative manager/worker topology over docker-machine")]
#[command(version)]
pub struct Cli {
    /// Enable verbose (debug) logging
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Minimal output for CI
    #[arg(short, long, global = true, conflicts_with = "json")]
    pub quiet: bool,

    /// Emit JSON lines instead of human-readable output
    #[arg(long, global = true)]
    pub json: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize a new stolos.yml configuration file
    Init {
        /// Machine name prefix to write into the template
        #[arg(short, long)]
        prefix: Option<String>,

        /// Overwrite an existing configuration file
        #[arg(long)]
        force: bool,
    },

    /// Bootstrap a new cluster, then reconcile it to the requested topology
    Fleet {
        /// Number of manager nodes
        managers: u32,

        /// Number of worker nodes
        workers: u32,

        /// Break a held reconcile lock
        #[arg(long)]
        force: bool,
    },

    /// Reconcile an existing cluster to the requested topology
    Maintain {
        /// Number of manager nodes
        managers: u32,

        /// Number of worker nodes
        workers: u32,

        /// Break a held reconcile lock
        #[arg(long)]
        force: bool,
    },

    /// List swarm members as reported by the current leader
    Members,
}
