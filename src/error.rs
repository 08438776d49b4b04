use rhdl::prelude::RHDLError;
use thiserror::Error;

use crate::balance_controller::BALANCE_MAX;

/// Errors raised at the edges of the simulator.
///
/// The controller itself cannot fail; these cover decoding raw inputs, configuration,
/// running the design and writing artifacts.
#[derive(Debug, Error)]
pub enum VendingError {
    #[error("coin code {0:#04b} does not fit in two bits")]
    InvalidCoinCode(u8),
    #[error("unknown stimulus token `{0}` (expected 5, 10, 20, none or reset)")]
    UnknownToken(String),
    #[error("price {0} is outside the balance register range 1..={max}", max = BALANCE_MAX)]
    PriceOutOfRange(u8),
    #[error(transparent)]
    Hdl(#[from] RHDLError),
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

pub type Result<T> = std::result::Result<T, VendingError>;
