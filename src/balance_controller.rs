//! The vending machine's balance controller.
//!
//! Coins are accumulated into a 7-bit balance register. Once the balance plus the coin
//! sampled on an edge reaches the price, the balance is cleared and the controller spends
//! one cycle in [`Phase::Dispensing`], at the end of which the dispense output goes high
//! for exactly one cycle.

use itertools::repeat_n;
use rhdl::prelude::*;
use rhdl_fpga::core::dff::DFF;
use tracing::trace;

use crate::coin::{coin_value, CoinCode};
use crate::error::{Result, VendingError};
use crate::testbench::Trace;

/// Price of the product.
pub const PRICE: u8 = 15;
/// Width of the balance register.
pub const BALANCE_WIDTH: u32 = 7;
/// Largest value the balance register holds, and so the largest accepted price.
pub const BALANCE_MAX: u8 = (1 << BALANCE_WIDTH) - 1;

// tag::interface[]
#[derive(PartialEq, Eq, Debug, Digital, Default)]
pub struct ControllerInput {
    /// Coin sampled on this edge
    pub coin: CoinCode,
    /// Synchronous reset. Pull high to clear the balance on this edge.
    pub reset: bool,
}

#[derive(PartialEq, Eq, Debug, Digital, Default)]
pub struct ControllerOutput {
    /// Credit accumulated since the last dispense or reset
    pub balance: b7,
    /// High for exactly one cycle per sale
    pub dispense: bool,
}
// end::interface[]

impl ControllerInput {
    pub const fn new(coin: CoinCode, reset: bool) -> Self {
        ControllerInput { coin, reset }
    }

    pub const fn coin(coin: CoinCode) -> Self {
        ControllerInput { coin, reset: false }
    }

    pub const fn idle() -> Self {
        ControllerInput::coin(CoinCode::None)
    }

    pub const fn reset() -> Self {
        ControllerInput {
            coin: CoinCode::None,
            reset: true,
        }
    }
}

impl ControllerOutput {
    pub fn balance(&self) -> u8 {
        self.balance.raw() as u8
    }

    /// Output word as seen on the pins: balance in bits 7..1, dispense in bit 0.
    pub fn packed(&self) -> u8 {
        (self.balance() << 1) | self.dispense as u8
    }

    pub fn from_packed(word: u8) -> Self {
        ControllerOutput {
            balance: bits((word >> 1) as u128),
            dispense: word & 1 == 1,
        }
    }
}

// tag::state[]
#[derive(PartialEq, Eq, Debug, Digital, Default)]
pub enum Phase {
    #[default]
    Accumulating,
    /// Lasts a single cycle; the coin sampled during it is not credited.
    Dispensing,
}

#[derive(Synchronous, SynchronousDQ, Clone, Debug)]
pub struct BalanceController {
    /// Holds the price; it reloads its own value every cycle.
    price: DFF<b7>,
    phase: DFF<Phase>,
    /// Balance register
    balance: DFF<b7>,
    /// Registered dispense output
    dispense: DFF<bool>,
}
// end::state[]

impl BalanceController {
    /// Create a controller that dispenses once the balance reaches `price`.
    ///
    /// The price has to be representable in the balance register, otherwise the
    /// threshold could never be observed.
    pub fn new(price: u8) -> Result<Self> {
        if price == 0 || price > BALANCE_MAX {
            return Err(VendingError::PriceOutOfRange(price));
        }
        Ok(BalanceController {
            price: DFF::new(bits(price as u128)),
            phase: DFF::new(Phase::Accumulating),
            balance: DFF::new(bits(0)),
            dispense: DFF::new(false),
        })
    }

    /// Reset, then clock in one input per edge with a `period` long clock.
    pub fn simulate(
        &self,
        inputs: Vec<ControllerInput>,
        period: u64,
    ) -> std::result::Result<Trace<ControllerInput, ControllerOutput>, RHDLError> {
        let edges = inputs.len();
        trace!(edges, period, "simulating balance controller");
        let input = inputs
            .into_iter()
            .chain(repeat_n(ControllerInput::idle(), 2))
            .with_reset(1)
            .clock_pos_edge(period);
        let samples = self.run(input)?.collect();
        Ok(Trace::new(samples, edges))
    }
}

impl Default for BalanceController {
    fn default() -> Self {
        BalanceController {
            price: DFF::new(bits(PRICE as u128)),
            phase: DFF::new(Phase::Accumulating),
            balance: DFF::new(bits(0)),
            dispense: DFF::new(false),
        }
    }
}

impl SynchronousIO for BalanceController {
    type I = ControllerInput;
    type O = ControllerOutput;
    type Kernel = balance_controller_kernel;
}

// tag::update[]
#[kernel]
pub fn balance_controller_kernel(
    _cr: ClockReset,
    input: ControllerInput,
    q: Q,
) -> (ControllerOutput, D) {
    let mut phase = Phase::Accumulating;
    let mut balance: b7 = bits(0);
    let mut dispense = false;

    match q.phase {
        Phase::Accumulating => {
            let value = coin_value(input.coin);
            // Compare against what is still owed so the sum never has to be formed
            // wider than the register. A balance at or above the price triggers as well.
            let paid_up = q.balance >= q.price;
            let owed = q.price - q.balance;
            if paid_up | (value >= owed) {
                phase = Phase::Dispensing;
            } else {
                balance = q.balance + value;
            }
        }
        Phase::Dispensing => {
            dispense = true;
        }
    }

    if input.reset {
        phase = Phase::Accumulating;
        balance = bits(0);
        dispense = false;
    }

    let output = ControllerOutput {
        balance: q.balance,
        dispense: q.dispense,
    };
    let d = D {
        price: q.price,
        phase,
        balance,
        dispense,
    };
    (output, d)
}
// end::update[]
