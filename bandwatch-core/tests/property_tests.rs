//! Property tests for analysis invariants.
//!
//! Uses proptest to verify:
//! 1. SMA shape: output length matches input, warmup is NaN, values are window means
//! 2. Band ordering: upper >= middle >= lower wherever defined
//! 3. %B definedness: undefined exactly when the envelope has zero width
//! 4. Crossing symmetry: reversing two bars swaps each pair's directions
//! 5. Pair exclusivity: a bar never fires both sides of one line
//! 6. Positional suppression: no %B alert in a report that carries a crossing
//! 7. Advisory precedence: the rule table's first match wins

use bandwatch_core::advisory::{advise, Advisory};
use bandwatch_core::analysis::crossing::{detect, BarState};
use bandwatch_core::analysis::{percent_b, CrossingKind, MidlineTally};
use bandwatch_core::config::{
    AdvisoryConfig, AnalysisConfig, BoundaryMode, CrossingConfig, CrossingReference,
};
use bandwatch_core::indicators::{BandTriple, Bollinger, Indicator, Sma};
use bandwatch_core::report::analyze;
use bandwatch_core::signals::SignalCategory;
use bandwatch_core::PriceSeries;
use chrono::NaiveDate;
use proptest::prelude::*;
use std::collections::HashSet;

// ── Strategies (proptest) ────────────────────────────────────────────

fn arb_closes(min: usize, max: usize) -> impl Strategy<Value = Vec<f64>> {
    prop::collection::vec((5.0..500.0_f64).prop_map(|p| (p * 100.0).round() / 100.0), min..max)
}

fn arb_bands() -> impl Strategy<Value = BandTriple> {
    (10.0..1000.0_f64, prop_oneof![Just(0.0), 0.01..50.0_f64]).prop_map(|(middle, offset)| {
        BandTriple {
            upper: middle + offset,
            middle,
            lower: middle - offset,
        }
    })
}

/// A close drawn either exactly on one of the lines or anywhere near them.
fn arb_close_near(bands: BandTriple) -> impl Strategy<Value = f64> {
    prop_oneof![
        Just(bands.upper),
        Just(bands.middle),
        Just(bands.lower),
        (bands.lower - 60.0)..(bands.upper + 60.0),
    ]
}

fn arb_crossing_config() -> impl Strategy<Value = CrossingConfig> {
    (
        prop_oneof![Just(CrossingReference::PreviousBands), Just(CrossingReference::CurrentBands)],
        prop_oneof![Just(BoundaryMode::Independent), Just(BoundaryMode::FirstMatch)],
    )
        .prop_map(|(reference, boundary_mode)| CrossingConfig {
            reference,
            boundary_mode,
        })
}

fn mirror(kind: CrossingKind) -> CrossingKind {
    match kind {
        CrossingKind::UpperBreakout => CrossingKind::UpperRejection,
        CrossingKind::UpperRejection => CrossingKind::UpperBreakout,
        CrossingKind::LowerBreakdown => CrossingKind::LowerRebound,
        CrossingKind::LowerRebound => CrossingKind::LowerBreakdown,
        CrossingKind::MidlineBullish => CrossingKind::MidlineBearish,
        CrossingKind::MidlineBearish => CrossingKind::MidlineBullish,
    }
}

fn series(closes: &[f64]) -> PriceSeries {
    let start = NaiveDate::from_ymd_opt(2024, 1, 1).unwrap();
    PriceSeries::from_closes("PROP", start, closes).unwrap()
}

// ── 1. SMA shape ─────────────────────────────────────────────────────

proptest! {
    #[test]
    fn sma_matches_window_mean(closes in arb_closes(1, 80), period in 1usize..30) {
        let sma = Sma::new(period).compute(&closes);
        prop_assert_eq!(sma.len(), closes.len());
        for (i, value) in sma.iter().enumerate() {
            if i + 1 < period {
                prop_assert!(value.is_nan(), "index {} should be warmup", i);
            } else {
                let window = &closes[i + 1 - period..=i];
                let mean = window.iter().sum::<f64>() / period as f64;
                prop_assert!((value - mean).abs() < 1e-8, "index {}: {} vs {}", i, value, mean);
            }
        }
    }
}

// ── 2. Band ordering ─────────────────────────────────────────────────

proptest! {
    #[test]
    fn bands_are_ordered(
        closes in arb_closes(1, 80),
        period in 1usize..30,
        multiplier in 0.0..4.0_f64,
    ) {
        let bands = Bollinger::new(period, multiplier).compute(&closes);
        prop_assert_eq!(bands.len(), closes.len());
        for i in 0..bands.len() {
            match bands.triple(i) {
                Some(t) => {
                    prop_assert!(t.upper >= t.middle, "index {}: {:?}", i, t);
                    prop_assert!(t.middle >= t.lower, "index {}: {:?}", i, t);
                }
                None => prop_assert!(i + 1 < period),
            }
        }
    }
}

// ── 3. %B definedness ────────────────────────────────────────────────

proptest! {
    #[test]
    fn percent_b_undefined_only_for_flat_envelope(bands in arb_bands(), price in 1.0..1100.0_f64) {
        match percent_b(price, &bands) {
            None => prop_assert_eq!(bands.upper, bands.lower),
            Some(pb) => {
                prop_assert!(bands.upper > bands.lower);
                let expected = (price - bands.lower) / (bands.upper - bands.lower);
                prop_assert_eq!(pb, expected);
            }
        }
    }
}

// ── 4. Crossing symmetry ─────────────────────────────────────────────

proptest! {
    /// With fixed bands and no close on a line, swapping the two bars
    /// turns every breakout into the matching rejection and back.
    #[test]
    fn reversed_bars_mirror_crossings(
        bands in arb_bands(),
        a in 1.0..1100.0_f64,
        b in 1.0..1100.0_f64,
    ) {
        for line in [bands.upper, bands.middle, bands.lower] {
            prop_assume!(a != line && b != line);
        }
        let config = CrossingConfig {
            reference: CrossingReference::PreviousBands,
            boundary_mode: BoundaryMode::Independent,
        };
        let at_a = BarState { close: a, bands };
        let at_b = BarState { close: b, bands };
        let forward = detect(&at_a, &at_b, &config);
        let backward = detect(&at_b, &at_a, &config);

        let mirrored: HashSet<CrossingKind> = forward.iter().copied().map(mirror).collect();
        let backward: HashSet<CrossingKind> = backward.into_iter().collect();
        prop_assert_eq!(mirrored, backward);
    }
}

// ── 5. Pair exclusivity ──────────────────────────────────────────────

proptest! {
    #[test]
    fn never_both_sides_of_a_line(
        (prev_bands, cur_bands, prev_close, close) in (arb_bands(), arb_bands())
            .prop_flat_map(|(p, c)| (Just(p), Just(c), arb_close_near(p), arb_close_near(c))),
        config in arb_crossing_config(),
    ) {
        let fired = detect(
            &BarState { close: prev_close, bands: prev_bands },
            &BarState { close, bands: cur_bands },
            &config,
        );
        for kind in &fired {
            prop_assert!(!fired.contains(&mirror(*kind)), "{:?} fired with its mirror", kind);
        }
        let unique: HashSet<CrossingKind> = fired.iter().copied().collect();
        prop_assert_eq!(unique.len(), fired.len());
    }

    #[test]
    fn first_match_fires_one_outer_crossing(
        (prev_bands, cur_bands, prev_close, close) in (arb_bands(), arb_bands())
            .prop_flat_map(|(p, c)| (Just(p), Just(c), arb_close_near(p), arb_close_near(c))),
    ) {
        let config = CrossingConfig {
            reference: CrossingReference::CurrentBands,
            boundary_mode: BoundaryMode::FirstMatch,
        };
        let fired = detect(
            &BarState { close: prev_close, bands: prev_bands },
            &BarState { close, bands: cur_bands },
            &config,
        );
        let outer = fired
            .iter()
            .filter(|k| !matches!(k, CrossingKind::MidlineBullish | CrossingKind::MidlineBearish))
            .count();
        prop_assert!(outer <= 1);
        prop_assert!(fired.len() - outer <= 1);
    }
}

// ── 6. Positional suppression ────────────────────────────────────────

proptest! {
    #![proptest_config(ProptestConfig::with_cases(64))]

    #[test]
    fn crossing_suppresses_positional_alert(closes in arb_closes(1, 60)) {
        let report = analyze(&series(&closes), &AnalysisConfig::default()).unwrap();
        let positional = report.signals.of_category(SignalCategory::Positional).count();
        if report.signals.has_crossing() {
            prop_assert_eq!(positional, 0);
        } else if report.regime.percent_b.is_some() {
            prop_assert_eq!(positional, 1);
        }
        prop_assert!(report.verify_fingerprint());
    }

    #[test]
    fn tally_never_exceeds_window(closes in arb_closes(1, 60), window in 1usize..10) {
        let bands = Bollinger::new(20, 2.0).compute(&closes);
        let tally = MidlineTally::count(&closes, &bands.middle, window);
        prop_assert!(tally.above + tally.below <= tally.defined);
        prop_assert!(tally.defined <= window.min(closes.len()));
    }
}

// ── 7. Advisory precedence ───────────────────────────────────────────

proptest! {
    #[test]
    fn advisory_first_match_wins(
        pb in prop::option::of(-0.5..1.5_f64),
        ratio in prop::option::of(0.5..1.5_f64),
    ) {
        let config = AdvisoryConfig::default();
        let advisory = advise(pb, ratio, &config);
        let Some(pb) = pb else {
            prop_assert_eq!(advisory, Advisory::InsufficientData);
            return Ok(());
        };
        let expanding = ratio.is_some_and(|r| r > config.expanding_ratio);
        let contracting = ratio.is_some_and(|r| r < config.contracting_ratio);

        if pb > config.overbought_percent_b && expanding {
            prop_assert_eq!(advisory, Advisory::ReduceExposure);
        }
        if ratio.is_none() {
            prop_assert_eq!(advisory, Advisory::FollowTrend);
        }
        match advisory {
            Advisory::WatchForRebound => prop_assert!(pb < config.oversold_percent_b && expanding),
            Advisory::RangeBound => prop_assert!(contracting && pb > config.range_low_percent_b),
            Advisory::InsufficientData => prop_assert!(false, "defined %B gave InsufficientData"),
            _ => {}
        }
    }
}
