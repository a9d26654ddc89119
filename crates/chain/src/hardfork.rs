//! Named protocol upgrades that gate operations.
//!
//! | Hardfork | Code | Operations |
//! |----------|------|------------|
//! | `CustomAuthority` | `BSIP_40` | custom authority create/update/delete |
//! | `LimitOrderUpdate` | `CORE_1604` | limit order update |
//! | `TanksAndTaps` | `BSIP_72` | tanks, taps and fund connections |
//! | `Tickets` | `CORE_2103` | ticket create/update |
//! | `LiquidityPool` | `LIQUIDITY_POOL` | liquidity pool create/delete/deposit/withdraw/exchange |
//! | `SametFund` | `CORE_2351` | SameT fund operations |
//! | `CreditOffer` | `CORE_2362` | credit offers and credit deal repay/expiry |
//! | `CreditDealUpdate` | `CORE_2595` | credit deal update |
//! | `LiquidityPoolUpdate` | `CORE_2604` | liquidity pool update |

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// A protocol upgrade that gates one group of operations.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[repr(u8)]
pub enum Hardfork {
    /// BSIP 40: custom active authorities
    CustomAuthority = 0,
    /// Core 1604: updating open limit orders
    LimitOrderUpdate = 1,
    /// BSIP 72: tanks and taps
    TanksAndTaps = 2,
    /// Core 2103: voting tickets
    Tickets = 3,
    /// Liquidity pools
    LiquidityPool = 4,
    /// Core 2351: same-transaction (flash) funds
    SametFund = 5,
    /// Core 2362: credit offers and credit deals
    CreditOffer = 6,
    /// Core 2595: updating credit deals
    CreditDealUpdate = 7,
    /// Core 2604: updating liquidity pools
    LiquidityPoolUpdate = 8,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown hardfork: {name}")]
pub struct HardforkParseError {
    pub name: String,
}

impl Hardfork {
    pub const COUNT: usize = 9;

    /// Returns every hardfork in declaration order.
    pub const ALL: [Hardfork; Self::COUNT] = [
        Hardfork::CustomAuthority,
        Hardfork::LimitOrderUpdate,
        Hardfork::TanksAndTaps,
        Hardfork::Tickets,
        Hardfork::LiquidityPool,
        Hardfork::SametFund,
        Hardfork::CreditOffer,
        Hardfork::CreditDealUpdate,
        Hardfork::LiquidityPoolUpdate,
    ];

    /// The code used for this hardfork in configuration files.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::CustomAuthority => "BSIP_40",
            Self::LimitOrderUpdate => "CORE_1604",
            Self::TanksAndTaps => "BSIP_72",
            Self::Tickets => "CORE_2103",
            Self::LiquidityPool => "LIQUIDITY_POOL",
            Self::SametFund => "CORE_2351",
            Self::CreditOffer => "CORE_2362",
            Self::CreditDealUpdate => "CORE_2595",
            Self::LiquidityPoolUpdate => "CORE_2604",
        }
    }

    pub(crate) const fn index(self) -> usize {
        self as usize
    }
}

impl fmt::Display for Hardfork {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

impl FromStr for Hardfork {
    type Err = HardforkParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim();
        let code = code.strip_prefix("HARDFORK_").unwrap_or(code);
        Self::ALL
            .into_iter()
            .find(|hardfork| hardfork.code().eq_ignore_ascii_case(code))
            .ok_or_else(|| HardforkParseError {
                name: s.to_string(),
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_index_matches_declaration_order() {
        for (index, hardfork) in Hardfork::ALL.into_iter().enumerate() {
            assert_eq!(hardfork.index(), index);
        }
    }

    #[test]
    fn test_parse_codes() {
        assert_eq!("BSIP_40".parse(), Ok(Hardfork::CustomAuthority));
        assert_eq!("core_2604".parse(), Ok(Hardfork::LiquidityPoolUpdate));
        assert_eq!("HARDFORK_CORE_2362".parse(), Ok(Hardfork::CreditOffer));
        assert_eq!(
            "CORE_9999".parse::<Hardfork>(),
            Err(HardforkParseError {
                name: "CORE_9999".to_string()
            })
        );
    }

    #[test]
    fn test_display_round_trips() {
        for hardfork in Hardfork::ALL {
            assert_eq!(hardfork.to_string().parse(), Ok(hardfork));
        }
    }
}
