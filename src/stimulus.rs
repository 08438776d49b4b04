//! Input sequences for driving the controller.

use std::fmt;
use std::str::FromStr;

use itertools::{repeat_n, Itertools};

use crate::balance_controller::ControllerInput;
use crate::coin::CoinCode;
use crate::error::VendingError;

pub fn reset(cycles: usize) -> impl Iterator<Item = ControllerInput> {
    repeat_n(ControllerInput::reset(), cycles)
}

pub fn idle(cycles: usize) -> impl Iterator<Item = ControllerInput> {
    repeat_n(ControllerInput::idle(), cycles)
}

/// The coin for one cycle, followed by one idle cycle.
pub fn insert_coin(coin: CoinCode) -> impl Iterator<Item = ControllerInput> {
    [ControllerInput::coin(coin), ControllerInput::idle()].into_iter()
}

/// Every coin followed by an idle cycle.
pub fn insert_coins(
    coins: impl IntoIterator<Item = CoinCode>,
) -> impl Iterator<Item = ControllerInput> {
    coins
        .into_iter()
        .map(ControllerInput::coin)
        .interleave_shortest(std::iter::repeat(ControllerInput::idle()))
}

/// One token of a textual stimulus script.
#[derive(Copy, Clone, PartialEq, Eq, Debug)]
pub enum Step {
    Coin(CoinCode),
    Reset,
}

impl Step {
    /// Inputs for this step. Spaced steps give the controller an idle cycle after every
    /// coin, so no coin ever lands on a dispense cycle.
    pub fn inputs(self, spaced: bool) -> Vec<ControllerInput> {
        match (self, spaced) {
            (Step::Reset, _) => vec![ControllerInput::reset()],
            (Step::Coin(coin), true) => insert_coin(coin).collect(),
            (Step::Coin(coin), false) => vec![ControllerInput::coin(coin)],
        }
    }
}

impl FromStr for Step {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "reset" | "rst" => Ok(Step::Reset),
            _ => s.parse().map(Step::Coin),
        }
    }
}

impl fmt::Display for Step {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Step::Coin(coin) => write!(f, "{}", coin),
            Step::Reset => write!(f, "reset"),
        }
    }
}

/// Parse a whitespace or comma separated script such as `5, 10, reset 20`.
pub fn parse_script(script: &str) -> Result<Vec<Step>, VendingError> {
    script
        .split(|c: char| c == ',' || c.is_whitespace())
        .filter(|token| !token.is_empty())
        .map(str::parse)
        .collect()
}

#[cfg(test)]
mod tests {
    use itertools::Itertools;

    use super::{idle, insert_coin, insert_coins, parse_script, reset, Step};
    use crate::balance_controller::{BalanceController, ControllerInput};
    use crate::coin::CoinCode;

    #[test]
    fn test_insert_coins_interleaves_idle_cycles() {
        let input = insert_coins([CoinCode::Five, CoinCode::Ten]).collect_vec();
        assert_eq!(
            input,
            vec![
                ControllerInput::coin(CoinCode::Five),
                ControllerInput::idle(),
                ControllerInput::coin(CoinCode::Ten),
                ControllerInput::idle(),
            ]
        );
        assert_eq!(
            insert_coin(CoinCode::Twenty).collect_vec(),
            insert_coins([CoinCode::Twenty]).collect_vec()
        );
    }

    #[test]
    fn test_reset_then_coins_dispense_twice() {
        let input = reset(5)
            .chain(insert_coins([CoinCode::Five, CoinCode::Ten, CoinCode::Twenty]))
            .chain(idle(5))
            .collect();
        let trace = BalanceController::default().simulate(input, 100).unwrap();
        assert_eq!(trace.dispensed(), 2);
    }

    #[test]
    fn test_parse_script() {
        let steps = parse_script("5, 10 reset,20\tnone").unwrap();
        assert_eq!(
            steps,
            vec![
                Step::Coin(CoinCode::Five),
                Step::Coin(CoinCode::Ten),
                Step::Reset,
                Step::Coin(CoinCode::Twenty),
                Step::Coin(CoinCode::None),
            ]
        );
        assert!(parse_script("5 15").is_err());
        assert!(parse_script("").unwrap().is_empty());
    }

    #[test]
    fn test_step_inputs() {
        assert_eq!(Step::Reset.inputs(true), vec![ControllerInput::reset()]);
        assert_eq!(
            Step::Coin(CoinCode::Ten).inputs(false),
            vec![ControllerInput::coin(CoinCode::Ten)]
        );
        assert_eq!(Step::Coin(CoinCode::Ten).inputs(true).len(), 2);
    }
}
