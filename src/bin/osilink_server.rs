//! osilink Server Binary
//!
//! Accepts one connection at a time, reads one framed packet, replies with
//! `ACK: <payload>` and closes. Runs until killed.
//!
//! Usage:
//!   cargo run --release --bin osilink_server [OPTIONS]

use anyhow::{Context, Result};
use clap::Parser;

use osilink::config::{init_logging, ServerConfig, DEFAULT_SERVER_BIND, MAX_FRAME_SIZE};
use osilink::Responder;

#[derive(Parser, Debug)]
#[command(name = "osilink_server", version, about = "OSI simulation server (ACK responder)")]
struct Args {
    /// Bind address
    #[arg(short, long, env = "OSILINK_BIND", default_value = DEFAULT_SERVER_BIND)]
    bind: String,

    /// Frame bound in bytes; bodies must be strictly smaller
    #[arg(long, env = "OSILINK_MAX_FRAME", default_value_t = MAX_FRAME_SIZE)]
    max_frame: usize,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for ServerConfig {
    fn from(args: Args) -> Self {
        Self {
            bind_addr: args.bind,
            max_frame_size: args.max_frame,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    let config = ServerConfig::from(args);
    let mut responder = Responder::bind(&config)
        .with_context(|| format!("cannot listen on {}", config.bind_addr))?;

    responder.run().context("server loop failed")
}
