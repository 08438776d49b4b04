//! Simulation settings.

use crate::balance_controller::{BalanceController, PRICE};
use crate::error::Result;

/// Everything a simulation run needs besides its script.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SimConfig {
    /// Product price.
    pub price: u8,
    /// Cycles reset is held before the script starts.
    pub reset_cycles: usize,
    /// Idle cycles run after the script.
    pub settle_cycles: usize,
    /// Follow every coin with an idle cycle.
    pub spaced: bool,
    /// Clock period in simulation time units.
    pub clock_period: u64,
}

impl Default for SimConfig {
    fn default() -> Self {
        SimConfig {
            price: PRICE,
            reset_cycles: 5,
            settle_cycles: 5,
            spaced: true,
            clock_period: 100,
        }
    }
}

impl SimConfig {
    pub fn controller(&self) -> Result<BalanceController> {
        BalanceController::new(self.price)
    }
}
