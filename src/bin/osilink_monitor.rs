//! osilink Monitor - interactive console for the client's monitor port
//!
//! Setiap baris yang diketik dikirim sebagai `SEND:<line>`; events dari
//! client dicetak satu baris per event.
//!
//! # Usage
//!
//! ```text
//! cargo run --bin osilink_monitor -- --client 127.0.0.1:10001
//! ```
//!
//! A blank line or end of input closes the connection.

use std::io::{self, BufRead, BufReader, Write};
use std::net::{Shutdown, TcpStream};
use std::thread;

use anyhow::{Context, Result};
use clap::Parser;

use osilink::config::init_logging;
use osilink::protocol::{render_line, SEND_PREFIX};

#[derive(Parser, Debug)]
#[command(name = "osilink_monitor", version, about = "Interactive monitor for osilink_client")]
struct Args {
    /// Client monitor address
    #[arg(short, long, env = "OSILINK_MONITOR_ADDR", default_value = "127.0.0.1:10001")]
    client: String,

    /// Verbose output
    #[arg(short, long)]
    verbose: bool,
}

/// Print every event line until the client closes the link.
fn recv_loop(stream: TcpStream) {
    let reader = BufReader::new(stream);
    for line in reader.lines() {
        match line {
            Ok(line) => println!("{}", render_line(&line)),
            Err(e) => {
                println!("Monitor recv error: {}", e);
                return;
            }
        }
    }
    println!("Monitor connection closed by client.");
}

fn main() -> Result<()> {
    let args = Args::parse();
    init_logging(args.verbose);

    println!("Connecting to client monitor at {} ...", args.client);
    let mut stream = TcpStream::connect(&args.client)
        .with_context(|| format!("cannot connect to client monitor at {}", args.client))?;
    stream.set_nodelay(true)?;
    println!("Connected to client. Type messages to send to server (blank line to quit).");

    let reader = stream.try_clone()?;
    let receiver = thread::Builder::new()
        .name("monitor-recv".to_string())
        .spawn(move || recv_loop(reader))?;

    let stdin = io::stdin();
    for line in stdin.lock().lines() {
        let line = line.context("failed to read stdin")?;
        let line = line.trim();
        if line.is_empty() {
            break;
        }

        let command = format!("{}{}\n", SEND_PREFIX, line);
        if let Err(e) = stream.write_all(command.as_bytes()) {
            log::warn!("send to client failed: {}", e);
            println!("Connection broken.");
            break;
        }
    }

    println!("Closing monitor connection.");
    // Unblocks the receiver thread
    let _ = stream.shutdown(Shutdown::Both);
    let _ = receiver.join();
    Ok(())
}
