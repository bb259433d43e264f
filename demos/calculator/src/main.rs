//! Calculator agent tools served over stdin/stdout.
//!
//! Stands in for the model transport: each input line is a tool call in the
//! provider's function-call shape, each output line the resulting outcome.
//! Logs go to stderr.
//!
//! ```text
//! $ echo '{"name":"add","arguments":"{\"a\":1,\"b\":2}"}' | calculator
//! {"status":"success","content":3.0}
//! ```

use std::path::PathBuf;
use std::sync::Arc;

use agent_config::AgentToolsConfig;
use agent_tools::{Dispatcher, ToolCall, tool};
use anyhow::{Context, Result};
use clap::Parser;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{info, warn};

#[derive(Debug, Parser)]
#[command(about = "Dispatch JSON tool calls read from stdin")]
struct Args {
    /// JSON configuration file.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Print the tool advertisement and exit.
    #[arg(long)]
    list: bool,
}

/// Adds two numbers.
/// :param a: first addend
/// :param b: second addend
/// :return: the sum
#[tool]
fn add(a: f64, b: f64) -> f64 {
    a + b
}

/// Subtracts `b` from `a`.
/// :param a: minuend
/// :param b: subtrahend
#[tool]
fn subtract(a: f64, b: f64) -> f64 {
    a - b
}

/// Multiplies two numbers.
/// :param a: first factor
/// :param b: second factor
#[tool]
fn multiply(a: f64, b: f64) -> f64 {
    a * b
}

/// Divides `a` by `b`.
/// :param a: dividend
/// :param b: divisor, must not be zero
/// :return: the quotient
#[tool]
fn divide(a: f64, b: f64) -> Result<f64, String> {
    if b == 0.0 {
        return Err("division by zero".to_owned());
    }
    Ok(a / b)
}

/// Rounds a number.
/// :param value: number to round
/// :param digits: decimal places to keep
#[tool]
fn round(value: f64, #[default] digits: u32) -> f64 {
    let scale = 10_f64.powi(i32::try_from(digits).unwrap_or(i32::MAX));
    (value * scale).round() / scale
}

#[tokio::main]
async fn main() -> Result<()> {
    let args = Args::parse();

    let config = match &args.config {
        Some(path) => agent_config::load_from_path(path)?,
        None => AgentToolsConfig::default(),
    };
    agent_telemetry::init(&config.telemetry)?;

    let mut builder = config.registry.builder();
    builder
        .register_collected()
        .context("failed to register calculator tools")?;
    let registry = builder.build();
    info!(tools = ?registry.names(), "calculator tools registered");

    let dispatcher = Dispatcher::new(Arc::new(registry)).with_options(config.dispatch.clone());

    let mut stdout = tokio::io::stdout();

    if args.list {
        let listing = serde_json::to_string_pretty(&dispatcher.advertisement())?;
        stdout.write_all(listing.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
        return Ok(());
    }

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await? {
        if line.trim().is_empty() {
            continue;
        }

        let call: ToolCall = match serde_json::from_str(&line) {
            Ok(call) => call,
            Err(err) => {
                warn!(error = %err, "skipping line that is not a tool call");
                continue;
            }
        };

        let outcome = dispatcher.invoke(&call).await;
        let rendered = serde_json::to_string(&outcome)?;
        stdout.write_all(rendered.as_bytes()).await?;
        stdout.write_all(b"\n").await?;
    }

    stdout.flush().await?;
    Ok(())
}
