use std::fmt;
use std::str::FromStr;

use rhdl::prelude::*;

use crate::error::VendingError;

/// Coin presented to the controller during one clock cycle.
///
/// Variants are declared in the order of their 2-bit code on the coin input pins.
#[derive(PartialEq, Eq, Debug, Digital, Default, Hash)]
pub enum CoinCode {
    #[default]
    None,
    Five,
    Ten,
    Twenty,
}

impl CoinCode {
    pub const ALL: [CoinCode; 4] = [
        CoinCode::None,
        CoinCode::Five,
        CoinCode::Ten,
        CoinCode::Twenty,
    ];

    /// Credit added to the balance when this coin is accepted.
    pub fn value(self) -> u8 {
        coin_value(self).raw() as u8
    }

    pub const fn bits(self) -> u8 {
        match self {
            CoinCode::None => 0b00,
            CoinCode::Five => 0b01,
            CoinCode::Ten => 0b10,
            CoinCode::Twenty => 0b11,
        }
    }

    /// Decode the two low bits of `bits`; higher bits are ignored.
    pub const fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0b00 => CoinCode::None,
            0b01 => CoinCode::Five,
            0b10 => CoinCode::Ten,
            _ => CoinCode::Twenty,
        }
    }
}

// tag::decode[]
#[kernel]
pub fn coin_value(coin: CoinCode) -> b7 {
    match coin {
        CoinCode::None => bits(0),
        CoinCode::Five => bits(5),
        CoinCode::Ten => bits(10),
        CoinCode::Twenty => bits(20),
    }
}

/// Coin code on `ui_in[1:0]`.
#[kernel]
pub fn coin_from_pins(ui_in: b8) -> CoinCode {
    let code = ui_in & bits(0b11);
    if code == bits(0b01) {
        CoinCode::Five
    } else if code == bits(0b10) {
        CoinCode::Ten
    } else if code == bits(0b11) {
        CoinCode::Twenty
    } else {
        CoinCode::None
    }
}
// end::decode[]

impl TryFrom<u8> for CoinCode {
    type Error = VendingError;

    fn try_from(code: u8) -> Result<Self, Self::Error> {
        if code > 0b11 {
            return Err(VendingError::InvalidCoinCode(code));
        }
        Ok(CoinCode::from_bits(code))
    }
}

impl FromStr for CoinCode {
    type Err = VendingError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "none" | "0" | "-" => Ok(CoinCode::None),
            "5" => Ok(CoinCode::Five),
            "10" => Ok(CoinCode::Ten),
            "20" => Ok(CoinCode::Twenty),
            other => Err(VendingError::UnknownToken(other.to_string())),
        }
    }
}

impl fmt::Display for CoinCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CoinCode::None => write!(f, "none"),
            coin => write!(f, "{}", coin.value()),
        }
    }
}

#[cfg(test)]
mod tests {
    use rhdl::prelude::*;

    use super::{coin_from_pins, CoinCode};
    use crate::error::VendingError;

    #[test]
    fn test_values_match_denominations() {
        let values: Vec<u8> = CoinCode::ALL.iter().map(|coin| coin.value()).collect();
        assert_eq!(values, vec![0, 5, 10, 20]);
    }

    #[test]
    fn test_two_bit_codes_are_exhaustive() {
        for code in 0..4u8 {
            let coin = CoinCode::try_from(code).unwrap();
            assert_eq!(coin.bits(), code);
        }
        assert!(matches!(
            CoinCode::try_from(4),
            Err(VendingError::InvalidCoinCode(4))
        ));
        assert_eq!(CoinCode::from_bits(0b1111_1110), CoinCode::Ten);
    }

    #[test]
    fn test_pin_decoder_matches_code_table() {
        for ui_in in 0..=255u8 {
            assert_eq!(
                coin_from_pins(bits(ui_in as u128)),
                CoinCode::from_bits(ui_in)
            );
        }
    }

    #[test]
    fn test_parse_and_display() {
        for coin in CoinCode::ALL {
            assert_eq!(coin.to_string().parse::<CoinCode>().unwrap(), coin);
        }
        assert_eq!(" 20 ".parse::<CoinCode>().unwrap(), CoinCode::Twenty);
        assert!("25".parse::<CoinCode>().is_err());
    }
}
