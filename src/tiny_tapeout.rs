//! The controller behind the Tiny Tapeout user project pinout.
//!
//! `ui_in[1:0]` carries the coin code, `rst_n` is an active-low synchronous reset and
//! `uo_out` drives `{balance[6:0], dispense}`. The bidirectional pins are unused.

use bitvec::prelude::*;
use itertools::repeat_n;
use rhdl::prelude::*;
use tracing::trace;

use crate::balance_controller::{BalanceController, ControllerInput, BALANCE_WIDTH};
use crate::coin::{coin_from_pins, CoinCode};
use crate::testbench::Trace;

pub const DEFAULT_MODULE_NAME: &str = "tt_um_vending_machine";

/// Bits of `uo_out` holding the balance.
const BALANCE_PINS: std::ops::Range<usize> = 1..1 + BALANCE_WIDTH as usize;
const DISPENSE_PIN: usize = 0;

#[derive(Synchronous, SynchronousDQ, Clone, Debug, Default)]
pub struct TinyTapeoutTop {
    controller: BalanceController,
}

impl TinyTapeoutTop {
    pub fn new(controller: BalanceController) -> Self {
        TinyTapeoutTop { controller }
    }

    /// Reset, then clock in one pin sample per edge with a `period` long clock.
    pub fn simulate(
        &self,
        inputs: Vec<TtInput>,
        period: u64,
    ) -> Result<Trace<TtInput, TtOutput>, RHDLError> {
        let edges = inputs.len();
        trace!(edges, period, "simulating tiny tapeout top");
        let input = inputs
            .into_iter()
            .chain(repeat_n(TtInput::default(), 2))
            .with_reset(1)
            .clock_pos_edge(period);
        let samples = self.run(input)?.collect();
        Ok(Trace::new(samples, edges))
    }

    /// Verilog for the whole design, with `name` as the top module.
    pub fn verilog(&self, name: &str) -> Result<String, RHDLError> {
        Ok(self.hdl(name)?.as_verilog().to_string())
    }
}

// tag::interface[]
#[derive(PartialEq, Eq, Debug, Digital)]
pub struct TtInput {
    /// Dedicated inputs, coin code in the two low bits
    pub ui_in: b8,
    /// Bidirectional inputs, ignored
    pub uio_in: b8,
    /// High while the design is selected. Coins are ignored while low.
    pub ena: bool,
    /// Active-low reset
    pub rst_n: bool,
}

#[derive(PartialEq, Eq, Debug, Digital, Default)]
pub struct TtOutput {
    /// Dedicated outputs: balance in bits 7..1, dispense in bit 0
    pub uo_out: b8,
    pub uio_out: b8,
    /// Bidirectional output enables, all inputs
    pub uio_oe: b8,
}
// end::interface[]

impl Default for TtInput {
    fn default() -> Self {
        TtInput {
            ui_in: bits(0),
            uio_in: bits(0),
            ena: true,
            rst_n: true,
        }
    }
}

impl TtInput {
    pub fn coin(coin: CoinCode) -> Self {
        TtInput {
            ui_in: bits(coin.bits() as u128),
            ..TtInput::default()
        }
    }

    pub fn reset() -> Self {
        TtInput {
            rst_n: false,
            ..TtInput::default()
        }
    }
}

impl From<ControllerInput> for TtInput {
    fn from(input: ControllerInput) -> Self {
        TtInput {
            ui_in: bits(input.coin.bits() as u128),
            rst_n: !input.reset,
            ..TtInput::default()
        }
    }
}

impl TtOutput {
    fn pins(&self) -> u8 {
        self.uo_out.raw() as u8
    }

    pub fn balance(&self) -> u8 {
        self.pins().view_bits::<Lsb0>()[BALANCE_PINS].load_le()
    }

    pub fn dispense(&self) -> bool {
        self.pins().view_bits::<Lsb0>()[DISPENSE_PIN]
    }
}

impl SynchronousIO for TinyTapeoutTop {
    type I = TtInput;
    type O = TtOutput;
    type Kernel = tiny_tapeout_kernel;
}

#[kernel]
pub fn tiny_tapeout_kernel(_cr: ClockReset, input: TtInput, q: Q) -> (TtOutput, D) {
    let mut coin = coin_from_pins(input.ui_in);
    if !input.ena {
        coin = CoinCode::None;
    }
    let d = D {
        controller: ControllerInput {
            coin,
            reset: !input.rst_n,
        },
    };

    // {balance, dispense}: doubling the widened balance shifts it past the dispense pin
    let balance: b8 = q.controller.balance.resize();
    let mut uo_out = balance + balance;
    if q.controller.dispense {
        uo_out = uo_out | bits(1);
    }
    let output = TtOutput {
        uo_out,
        uio_out: bits(0),
        uio_oe: bits(0),
    };
    (output, d)
}
