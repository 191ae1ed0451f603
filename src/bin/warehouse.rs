//! Interactive warehouse console.
//!
//! Usage: `warehouse <config-file>`. Reads one action per line from stdin
//! until `close` or end of input. Set `RUST_LOG` for diagnostics on stderr.

use std::io::{self, BufRead, Write};

use anyhow::{bail, Context, Result};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use u_warehouse::actions::Session;
use u_warehouse::config::WarehouseConfig;
use u_warehouse::warehouse::Warehouse;

fn main() -> Result<()> {
    setup_tracing();

    let mut args = std::env::args().skip(1);
    let Some(path) = args.next() else {
        bail!("usage: warehouse <config-file>");
    };

    let config = WarehouseConfig::from_file(&path)
        .with_context(|| format!("failed to load configuration from {path}"))?;
    let warehouse = Warehouse::from_config(&config)?;
    let mut session = Session::new(warehouse);

    let stdout = io::stdout();
    let mut out = stdout.lock();
    writeln!(out, "Warehouse is open!")?;

    for line in io::stdin().lock().lines() {
        let line = line.context("failed to read from stdin")?;
        if line.trim().is_empty() {
            continue;
        }
        for output in session.execute_line(&line) {
            writeln!(out, "{output}")?;
        }
        out.flush()?;
        if session.is_closed() {
            break;
        }
    }

    Ok(())
}

fn setup_tracing() {
    let env_filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(io::stderr))
        .init();
}
