//! Vending machine simulator binary.
//!
//! Resets the controller, runs a coin script against it, prints every cycle and
//! optionally writes a VCD waveform and the Verilog for the Tiny Tapeout top level.

mod cli;

use tracing::info;
use tracing_subscriber::EnvFilter;
use vending_machine::session::run_script;
use vending_machine::tiny_tapeout::{TinyTapeoutTop, DEFAULT_MODULE_NAME};

use crate::cli::Cli;

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse_args();

    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&cli.log_level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .init();

    info!("Vending machine simulator v{}", env!("CARGO_PKG_VERSION"));

    let config = cli.config();

    if let Some(path) = &cli.verilog {
        let top = TinyTapeoutTop::new(config.controller()?);
        std::fs::write(path, top.verilog(DEFAULT_MODULE_NAME)?)?;
        info!(path = %path.display(), "wrote verilog");
    }

    let session = run_script(&config, &cli.script)?;
    print!("{}", session);

    if let Some(path) = &cli.vcd {
        session.trace().write_vcd(path)?;
        info!(path = %path.display(), "wrote waveform");
    }

    Ok(())
}
