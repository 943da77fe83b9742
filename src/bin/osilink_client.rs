//! osilink Client Binary
//!
//! - Connects to the server (default 127.0.0.1:10000)
//! - Waits for exactly one monitor on port 10001
//! - For each `SEND:<payload>` line: TX progress, round trip, RX progress
//!
//! Exits when the monitor disconnects.

use std::time::Duration;

use anyhow::{anyhow, Context, Result};
use clap::Parser;

use osilink::config::{
    init_logging, ClientConfig, DEFAULT_MONITOR_BIND, DEFAULT_SERVER_ADDR, MAX_FRAME_SIZE,
};
use osilink::{MonitorListener, Session};

#[derive(Parser, Debug)]
#[command(name = "osilink_client", version, about = "OSI simulation client with monitor link")]
struct Args {
    /// Server address
    #[arg(short, long, env = "OSILINK_SERVER", default_value = DEFAULT_SERVER_ADDR)]
    server: String,

    /// Monitor listen address
    #[arg(short, long, env = "OSILINK_MONITOR", default_value = DEFAULT_MONITOR_BIND)]
    monitor: String,

    /// Frame bound in bytes; bodies must be strictly smaller
    #[arg(long, env = "OSILINK_MAX_FRAME", default_value_t = MAX_FRAME_SIZE)]
    max_frame: usize,

    /// Simulated processing time per layer pair, in milliseconds
    #[arg(long, env = "OSILINK_STAGE_DELAY_MS", default_value_t = 80)]
    stage_delay_ms: u64,

    /// Forward the server's reply packet to the monitor
    #[arg(long)]
    echo_reply: bool,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

impl From<Args> for ClientConfig {
    fn from(args: Args) -> Self {
        Self {
            server_addr: args.server,
            monitor_bind: args.monitor,
            max_frame_size: args.max_frame,
            stage_delay: Duration::from_millis(args.stage_delay_ms),
            echo_reply: args.echo_reply,
        }
    }
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);
    let config = ClientConfig::from(args);

    let server_addr = config.server_addr.clone();
    let monitor_bind = config.monitor_bind.clone();

    let session = Session::connect(config)
        .with_context(|| format!("cannot connect to server at {}", server_addr))?;

    let listener = MonitorListener::bind(&monitor_bind)
        .with_context(|| format!("failed to start monitor listener on {}", monitor_bind))?;
    log::info!("monitor listening on {}", listener.local_addr()?);

    let (stream, _) = listener.accept_once().context("monitor accept failed")?;
    let handle = session.spawn(stream).context("cannot start monitor thread")?;

    handle
        .join()
        .map_err(|_| anyhow!("monitor thread panicked"))?
        .context("monitor connection failed")?;

    log::info!("client exiting");
    Ok(())
}
