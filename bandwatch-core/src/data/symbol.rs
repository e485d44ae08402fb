//! Security identifier normalization.
//!
//! Accepted forms:
//! - `601061.XSHG` / `399006.XSHE`
//! - `sh600519` / `sz399006` (any case)
//! - `600519.SS` / `399006.SZ`
//! - anything else, e.g. `SPY`, passed through unchanged

use super::provider::DataError;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Exchange {
    Shanghai,
    Shenzhen,
}

impl Exchange {
    pub fn yahoo_suffix(&self) -> &'static str {
        match self {
            Exchange::Shanghai => "SS",
            Exchange::Shenzhen => "SZ",
        }
    }

    fn from_suffix(suffix: &str) -> Option<Self> {
        match suffix.to_ascii_uppercase().as_str() {
            "XSHG" | "SS" | "SH" => Some(Exchange::Shanghai),
            "XSHE" | "SZ" => Some(Exchange::Shenzhen),
            _ => None,
        }
    }

    fn from_prefix(prefix: &str) -> Option<Self> {
        match prefix.to_ascii_lowercase().as_str() {
            "sh" => Some(Exchange::Shanghai),
            "sz" => Some(Exchange::Shenzhen),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum SecurityId {
    /// Six-digit code listed on a mainland exchange.
    Listed { code: String, exchange: Exchange },
    /// Any other ticker, used verbatim.
    Ticker { symbol: String },
}

fn is_six_digits(code: &str) -> bool {
    code.len() == 6 && code.bytes().all(|b| b.is_ascii_digit())
}

impl SecurityId {
    pub fn parse(input: &str) -> Result<Self, DataError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(DataError::InvalidSymbol {
                input: input.to_string(),
                reason: "empty identifier".into(),
            });
        }

        if let Some((code, suffix)) = input.rsplit_once('.') {
            if let Some(exchange) = Exchange::from_suffix(suffix) {
                if !is_six_digits(code) {
                    return Err(DataError::InvalidSymbol {
                        input: input.to_string(),
                        reason: format!("expected a six-digit code before .{suffix}"),
                    });
                }
                return Ok(SecurityId::Listed {
                    code: code.to_string(),
                    exchange,
                });
            }
        }

        if input.len() == 8 && input.is_char_boundary(2) {
            let (prefix, code) = input.split_at(2);
            if let Some(exchange) = Exchange::from_prefix(prefix) {
                if is_six_digits(code) {
                    return Ok(SecurityId::Listed {
                        code: code.to_string(),
                        exchange,
                    });
                }
            }
        }

        Ok(SecurityId::Ticker {
            symbol: input.to_string(),
        })
    }

    /// Symbol in the form the Yahoo chart API expects.
    pub fn yahoo_symbol(&self) -> String {
        match self {
            SecurityId::Listed { code, exchange } => format!("{code}.{}", exchange.yahoo_suffix()),
            SecurityId::Ticker { symbol } => symbol.clone(),
        }
    }

    pub fn exchange(&self) -> Option<Exchange> {
        match self {
            SecurityId::Listed { exchange, .. } => Some(*exchange),
            SecurityId::Ticker { .. } => None,
        }
    }
}

impl FromStr for SecurityId {
    type Err = DataError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s)
    }
}

impl fmt::Display for SecurityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.yahoo_symbol())
    }
}
