//! Property-based tests for classification and scanning using proptest.
//!
//! A synthetic but stable calendar (`CyclicResolver`) stands in for the oracle
//! so that any Gregorian date can be generated.

mod common;

use chrono::{Datelike, Days, NaiveDate, Weekday};
use common::{ymd, CyclicResolver};
use proptest::prelude::*;
use yomtov_engine::hebrew::HebrewMonth;
use yomtov_engine::{
    holidays, next_ordinary_day, next_sacred_day, scan, DayClassifier, LabelStyle, ScanMode,
    ScanOptions,
};

// ---------------------------------------------------------------------------
// Strategies
// ---------------------------------------------------------------------------

/// Any date in 1900-2099, including month and year boundaries.
fn arb_date() -> impl Strategy<Value = NaiveDate> {
    (0u64..73_000).prop_map(|offset| ymd(1900, 1, 1) + Days::new(offset))
}

fn arb_window() -> impl Strategy<Value = u32> {
    0u32..=30
}

fn arb_style() -> impl Strategy<Value = LabelStyle> {
    prop_oneof![Just(LabelStyle::HolidayOnly), Just(LabelStyle::Joint)]
}

fn classifier(style: LabelStyle) -> DayClassifier<CyclicResolver> {
    DayClassifier::new(CyclicResolver, style)
}

fn config() -> ProptestConfig {
    ProptestConfig {
        cases: 256,
        ..ProptestConfig::default()
    }
}

// ---------------------------------------------------------------------------
// Classification
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn classification_is_deterministic(date in arb_date(), style in arb_style()) {
        let c = classifier(style);
        prop_assert_eq!(c.classify(date).unwrap(), c.classify(date).unwrap());
    }

    #[test]
    fn shabbat_iff_saturday(date in arb_date()) {
        let day = classifier(LabelStyle::HolidayOnly).classify(date).unwrap();
        prop_assert_eq!(day.is_shabbat, date.weekday() == Weekday::Sat);
    }

    #[test]
    fn holiday_iff_table_key(date in arb_date()) {
        let day = classifier(LabelStyle::HolidayOnly).classify(date).unwrap();
        let in_table = holidays::entries()
            .iter()
            .any(|h| h.month == day.hebrew_date.month && h.day == day.hebrew_date.day);
        prop_assert_eq!(day.holiday_name.is_some(), in_table);
    }

    #[test]
    fn ordinary_and_sacred_are_exclusive(date in arb_date(), style in arb_style()) {
        let day = classifier(style).classify(date).unwrap();
        prop_assert_ne!(day.is_ordinary(), day.is_sacred());
        if day.label == "ordinary" {
            prop_assert!(day.is_ordinary());
            prop_assert!(!day.is_eve_of_holiday);
        }
    }

    #[test]
    fn holiday_label_wins(date in arb_date()) {
        let day = classifier(LabelStyle::HolidayOnly).classify(date).unwrap();
        if let Some(name) = day.holiday_name {
            prop_assert_eq!(day.label.as_str(), name);
        }
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

proptest! {
    #![proptest_config(config())]

    #[test]
    fn next_ordinary_day_is_never_sacred(from in arb_date(), window in arb_window()) {
        let c = classifier(LabelStyle::HolidayOnly);
        if let Some(found) = next_ordinary_day(&c, from, &ScanOptions::window(window)).unwrap() {
            let day = c.classify(found).unwrap();
            prop_assert!(!day.is_shabbat && day.holiday_name.is_none());
            prop_assert!(found > from);
            prop_assert!((found - from).num_days() <= i64::from(window));
        }
    }

    #[test]
    fn next_sacred_day_is_the_earliest(from in arb_date(), window in arb_window()) {
        let c = classifier(LabelStyle::HolidayOnly);
        let found = next_sacred_day(&c, from, &ScanOptions::window(window)).unwrap();

        let limit = found
            .as_ref()
            .map(|s| (s.date - from).num_days() as u64)
            .unwrap_or(u64::from(window) + 1);
        for offset in 1..limit {
            let day = c.classify(from + Days::new(offset)).unwrap();
            prop_assert!(!day.is_sacred(), "{} is sacred but was skipped", day.date);
        }
        if let Some(sacred) = found {
            prop_assert!(c.classify(sacred.date).unwrap().is_sacred());
        }
    }

    #[test]
    fn windows_of_a_week_always_find_shabbat(from in arb_date()) {
        let c = classifier(LabelStyle::HolidayOnly);
        let found = next_sacred_day(&c, from, &ScanOptions::window(7)).unwrap();
        prop_assert!(found.is_some());
    }

    #[test]
    fn combined_scan_matches_separate_scans(
        from in arb_date(),
        window in arb_window(),
        style in arb_style(),
    ) {
        let c = classifier(style);
        let options = ScanOptions::window(window);
        let combined = scan(&c, from, &options).unwrap();

        prop_assert_eq!(combined.next_ordinary, next_ordinary_day(&c, from, &options).unwrap());
        prop_assert_eq!(combined.next_sacred, next_sacred_day(&c, from, &options).unwrap());
    }
}

proptest! {
    #![proptest_config(ProptestConfig { cases: 64, ..ProptestConfig::default() })]

    #[test]
    fn parallel_mode_matches_sequential(from in arb_date(), window in arb_window()) {
        let c = classifier(LabelStyle::HolidayOnly);
        let sequential = scan(&c, from, &ScanOptions::window(window)).unwrap();
        let parallel = scan(
            &c,
            from,
            &ScanOptions::window(window).with_mode(ScanMode::Parallel),
        )
        .unwrap();
        prop_assert_eq!(sequential, parallel);
    }
}

// ---------------------------------------------------------------------------
// Holiday table
// ---------------------------------------------------------------------------

#[test]
fn table_covers_exactly_the_fixed_keys() {
    let expected = [
        (HebrewMonth::Tishrei, 1),
        (HebrewMonth::Tishrei, 2),
        (HebrewMonth::Tishrei, 10),
        (HebrewMonth::Tishrei, 15),
        (HebrewMonth::Tishrei, 22),
        (HebrewMonth::Nisan, 15),
        (HebrewMonth::Nisan, 21),
        (HebrewMonth::Sivan, 6),
    ];

    for month in HebrewMonth::ALL {
        for day in 1..=30u8 {
            assert_eq!(
                holidays::lookup(month, day).is_some(),
                expected.contains(&(month, day)),
                "{month} {day}"
            );
        }
    }
}
