//! Cycle-accurate model of a coin-operated vending machine controller.
//!
//! Coins worth 5, 10 or 20 are accumulated until the price is met, at which point the
//! balance is cleared and a one-cycle dispense pulse is emitted.

pub mod balance_controller;
pub mod coin;
pub mod config;
pub mod error;
pub mod session;
pub mod stimulus;
pub mod testbench;
pub mod tiny_tapeout;

pub use balance_controller::{BalanceController, ControllerInput, ControllerOutput, Phase, PRICE};
pub use coin::CoinCode;
pub use error::{Result, VendingError};
