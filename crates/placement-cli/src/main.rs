use std::path::Path;
use std::time::Instant;

use clap::{Parser, Subcommand};

#[cfg(not(target_env = "msvc"))]
#[global_allocator]
static GLOBAL: tikv_jemallocator::Jemalloc = tikv_jemallocator::Jemalloc;

#[cfg(target_env = "msvc")]
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use placement_cli::{
    ConnectionOptions, HttpClient, PlacementTreeOptions, RenderArgs, run_main, write_output,
};
use placement_core::{Error, Result, Scope};

#[derive(Parser, Debug)]
#[command(
    name = "placement-tree",
    about = "placement-tree: draw resource provider trees and their consumers",
    version
)]
pub struct Cli {
    #[command(flatten)]
    connection: ConnectionOptions,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Show the resource provider tree containing a provider
    Show {
        /// UUID of any provider in the tree
        uuid: String,

        #[command(flatten)]
        render: RenderArgs,
    },
    /// Show every resource provider tree
    List {
        #[command(flatten)]
        render: RenderArgs,
    },
}

impl Command {
    fn into_parts(self) -> (Scope, RenderArgs) {
        match self {
            Command::Show { uuid, render } => (Scope::Tree(uuid), render),
            Command::List { render } => (Scope::Forest, render),
        }
    }
}

pub fn run(args: Cli) -> Result<()> {
    let total_start = Instant::now();

    // Initialize tracing subscriber for logging
    if std::env::var("RUST_LOG").is_ok() {
        tracing_subscriber::fmt()
            .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
            .with_writer(std::io::stderr)
            .init();
    }

    let client = HttpClient::new(&args.connection)?;
    let (scope, render) = args.command.into_parts();
    let opts = PlacementTreeOptions::new(scope, &render);

    let output = run_main(&client, &opts)?;
    write_output(render.output.as_deref().map(Path::new), &output)?;

    let total_secs = total_start.elapsed().as_secs_f64();
    tracing::info!(total_secs, "complete");
    Ok(())
}

/// Text printed after a failed run.
fn failure_report(err: &Error) -> String {
    if err.is_retryable() {
        format!("Error: {err}\nThe placement service may be temporarily unavailable, try again.")
    } else {
        format!("Error: {err}")
    }
}

pub fn main() {
    let args = Cli::parse();
    if let Err(e) = run(args) {
        tracing::error!(error = %e, retryable = e.is_retryable(), "execution failed");
        eprintln!("{}", failure_report(&e));
        std::process::exit(1);
    }
}
