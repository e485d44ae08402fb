//! Position of the latest close relative to the bands.

use crate::indicators::BandTriple;
use serde::{Deserialize, Serialize};

/// Four mutually exclusive regions, highest first.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PositionRegion {
    AboveUpper,
    UpperHalf,
    LowerHalf,
    BelowLower,
}

impl PositionRegion {
    pub fn label(&self) -> &'static str {
        match self {
            PositionRegion::AboveUpper => "above upper band - overbought",
            PositionRegion::UpperHalf => "between middle and upper - strong",
            PositionRegion::LowerHalf => "between lower and middle - weak",
            PositionRegion::BelowLower => "below lower band - oversold",
        }
    }
}

/// Classify `price` against the band triple, checking from the top down.
pub fn classify(price: f64, bands: &BandTriple) -> PositionRegion {
    if price > bands.upper {
        PositionRegion::AboveUpper
    } else if price > bands.middle {
        PositionRegion::UpperHalf
    } else if price > bands.lower {
        PositionRegion::LowerHalf
    } else {
        PositionRegion::BelowLower
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const BANDS: BandTriple = BandTriple {
        upper: 12.0,
        middle: 10.0,
        lower: 8.0,
    };

    #[test]
    fn regions_in_order() {
        assert_eq!(classify(12.5, &BANDS), PositionRegion::AboveUpper);
        assert_eq!(classify(11.0, &BANDS), PositionRegion::UpperHalf);
        assert_eq!(classify(9.0, &BANDS), PositionRegion::LowerHalf);
        assert_eq!(classify(7.0, &BANDS), PositionRegion::BelowLower);
    }

    #[test]
    fn boundaries_fall_to_the_lower_region() {
        assert_eq!(classify(12.0, &BANDS), PositionRegion::UpperHalf);
        assert_eq!(classify(10.0, &BANDS), PositionRegion::LowerHalf);
        assert_eq!(classify(8.0, &BANDS), PositionRegion::BelowLower);
    }

    #[test]
    fn degenerate_band_splits_at_the_line() {
        let flat = BandTriple {
            upper: 10.0,
            middle: 10.0,
            lower: 10.0,
        };
        assert_eq!(classify(10.0, &flat), PositionRegion::BelowLower);
        assert_eq!(classify(10.1, &flat), PositionRegion::AboveUpper);
    }
}
