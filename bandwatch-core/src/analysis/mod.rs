//! Regime classifiers consuming the precomputed bands.
//!
//! Every function here is pure: it reads the close series and the
//! `BandSet` and returns a value, leaving undefined inputs as explicit
//! `None` / insufficient-history outcomes.

pub mod crossing;
pub mod percent_b;
pub mod persistence;
pub mod position;
pub mod width;

pub use crossing::{BarState, CrossingKind, CrossingOutcome};
pub use percent_b::percent_b;
pub use persistence::{Continuation, MidlineTally};
pub use position::PositionRegion;
pub use width::{SlopeDirection, WidthAnalysis, WidthTrend};
