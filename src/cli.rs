//! Command-line argument parsing.

use std::path::PathBuf;

use clap::Parser;
use vending_machine::balance_controller::PRICE;
use vending_machine::config::SimConfig;
use vending_machine::stimulus::Step;

/// Vending machine controller simulator.
#[derive(Parser, Debug, Clone)]
#[command(name = "vending-sim")]
#[command(about = "Cycle-accurate simulation of the vending machine balance controller")]
#[command(version)]
pub struct Cli {
    /// Stimulus script: coins (5, 10, 20, none) and `reset`, separated by commas or spaces.
    #[arg(value_delimiter = ',')]
    pub script: Vec<Step>,

    /// Product price, 1 to 127.
    #[arg(long, default_value_t = PRICE)]
    pub price: u8,

    /// Cycles reset is held before the script.
    #[arg(long, default_value_t = 5)]
    pub reset_cycles: usize,

    /// Idle cycles after the script.
    #[arg(long, default_value_t = 5)]
    pub settle_cycles: usize,

    /// Present every token for exactly one cycle instead of following coins with an idle cycle.
    #[arg(long)]
    pub raw: bool,

    /// Clock period in simulation time units.
    #[arg(long, default_value_t = 100)]
    pub clock_period: u64,

    /// Write a VCD waveform of the run.
    #[arg(long)]
    pub vcd: Option<PathBuf>,

    /// Write the Verilog for the Tiny Tapeout top level at the configured price.
    #[arg(long)]
    pub verilog: Option<PathBuf>,

    /// Log level (trace, debug, info, warn, error).
    #[arg(long, default_value = "info")]
    pub log_level: String,
}

impl Cli {
    /// Parse command-line arguments.
    pub fn parse_args() -> Self {
        Self::parse()
    }

    pub fn config(&self) -> SimConfig {
        SimConfig {
            price: self.price,
            reset_cycles: self.reset_cycles,
            settle_cycles: self.settle_cycles,
            spaced: !self.raw,
            clock_period: self.clock_period,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use vending_machine::coin::CoinCode;

    #[test]
    fn test_default_values() {
        let cli = Cli::parse_from(["vending-sim"]);
        assert!(cli.script.is_empty());
        assert_eq!(cli.config(), SimConfig::default());
        assert_eq!(cli.log_level, "info");
    }

    #[test]
    fn test_script_accepts_commas_and_spaces() {
        let cli = Cli::parse_from(["vending-sim", "5,10", "reset", "20"]);
        assert_eq!(
            cli.script,
            vec![
                Step::Coin(CoinCode::Five),
                Step::Coin(CoinCode::Ten),
                Step::Reset,
                Step::Coin(CoinCode::Twenty),
            ]
        );
    }

    #[test]
    fn test_raw_and_price_flags() {
        let cli = Cli::parse_from(["vending-sim", "--raw", "--price", "30", "20"]);
        let config = cli.config();
        assert!(!config.spaced);
        assert_eq!(config.price, 30);
        assert!(config.controller().is_ok());
    }

    #[test]
    fn test_unknown_token_is_rejected() {
        assert!(Cli::try_parse_from(["vending-sim", "25"]).is_err());
    }
}
