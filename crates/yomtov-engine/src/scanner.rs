//! Bounded forward search for the next ordinary day and the next sacred day.
//!
//! Scans visit `from + 1 ..= from + max_lookahead_days` in ascending order and
//! stop at the first match. An exhausted window is `None`, not an error.

use std::ops::ControlFlow;
use std::time::{Duration, Instant};

use chrono::{Days, NaiveDate};
use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::classifier::{DayClassification, DayClassifier};
use crate::config::DEFAULT_LOOKAHEAD_DAYS;
use crate::error::{ResolutionError, Result, YomTovError};
use crate::hebrew::HebrewDate;
use crate::resolver::{CachingResolver, HebrewDateResolver};

/// How resolver calls are issued during a scan.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ScanMode {
    /// Resolve day by day, stopping as soon as the answer is known.
    #[default]
    Sequential,
    /// Resolve the whole window concurrently up front, then classify from the cache.
    Parallel,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanOptions {
    pub max_lookahead_days: u32,
    pub mode: ScanMode,
    /// Budget for the whole scan, measured from its start. Checked before and
    /// after every lookup, and prefetch stops issuing calls once it passes.
    pub deadline: Option<Duration>,
}

impl ScanOptions {
    /// Sequential scan over `days` days with no deadline.
    pub fn window(days: u32) -> Self {
        Self {
            max_lookahead_days: days,
            mode: ScanMode::Sequential,
            deadline: None,
        }
    }

    pub fn with_mode(self, mode: ScanMode) -> Self {
        Self { mode, ..self }
    }

    pub fn with_deadline(self, deadline: Duration) -> Self {
        Self {
            deadline: Some(deadline),
            ..self
        }
    }
}

impl Default for ScanOptions {
    fn default() -> Self {
        Self::window(DEFAULT_LOOKAHEAD_DAYS)
    }
}

/// The first sacred day found by a scan.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SacredDay {
    pub date: NaiveDate,
    pub label: String,
    pub hebrew_date: HebrewDate,
}

impl From<&DayClassification> for SacredDay {
    fn from(day: &DayClassification) -> Self {
        Self {
            date: day.date,
            label: day.label.clone(),
            hebrew_date: day.hebrew_date.clone(),
        }
    }
}

/// Outcome of a combined scan.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize)]
pub struct ScanResult {
    pub next_ordinary: Option<NaiveDate>,
    pub next_sacred: Option<SacredDay>,
    /// Hebrew dates of the sacred days passed over before the next ordinary
    /// day (the whole window's sacred days when none was found).
    pub close_holy_days: Vec<HebrewDate>,
}

/// First day in the window that is neither Shabbat nor a holiday.
pub fn next_ordinary_day<R: HebrewDateResolver>(
    classifier: &DayClassifier<R>,
    from: NaiveDate,
    options: &ScanOptions,
) -> Result<Option<NaiveDate>> {
    let mut found = None;
    walk(classifier, from, options, |day| {
        if day.is_ordinary() {
            found = Some(day.date);
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    Ok(found)
}

/// First day in the window that is Shabbat or a holiday.
pub fn next_sacred_day<R: HebrewDateResolver>(
    classifier: &DayClassifier<R>,
    from: NaiveDate,
    options: &ScanOptions,
) -> Result<Option<SacredDay>> {
    let mut found = None;
    walk(classifier, from, options, |day| {
        if day.is_sacred() {
            found = Some(SacredDay::from(&day));
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    Ok(found)
}

/// Both searches in one pass; stops once both answers are known.
///
/// Yields exactly what [`next_ordinary_day`] and [`next_sacred_day`] yield
/// when run separately.
#[instrument(skip(classifier, options), fields(window = options.max_lookahead_days))]
pub fn scan<R: HebrewDateResolver>(
    classifier: &DayClassifier<R>,
    from: NaiveDate,
    options: &ScanOptions,
) -> Result<ScanResult> {
    let mut result = ScanResult::default();
    walk(classifier, from, options, |day| {
        if day.is_sacred() {
            if result.next_sacred.is_none() {
                result.next_sacred = Some(SacredDay::from(&day));
            }
            if result.next_ordinary.is_none() {
                result.close_holy_days.push(day.hebrew_date);
            }
        } else if result.next_ordinary.is_none() {
            result.next_ordinary = Some(day.date);
        }

        if result.next_ordinary.is_some() && result.next_sacred.is_some() {
            ControlFlow::Break(())
        } else {
            ControlFlow::Continue(())
        }
    })?;
    Ok(result)
}

/// Offset `from` by `days`, failing on calendar overflow.
fn shift(from: NaiveDate, days: u32) -> Result<NaiveDate> {
    from.checked_add_days(Days::new(u64::from(days)))
        .ok_or_else(|| YomTovError::Validation(format!("{from} + {days} days is out of range")))
}

/// Classify each window day in order, handing it to `visit` until it breaks.
///
/// All resolutions go through a scan-local cache, so the `date + 1` lookup of
/// one day is reused as the `date` lookup of the next.
fn walk<R, F>(
    classifier: &DayClassifier<R>,
    from: NaiveDate,
    options: &ScanOptions,
    mut visit: F,
) -> Result<()>
where
    R: HebrewDateResolver,
    F: FnMut(DayClassification) -> ControlFlow<()>,
{
    let deadline = options.deadline.and_then(|budget| Instant::now().checked_add(budget));
    let expired = |scanned_days: u32| -> Result<()> {
        match deadline {
            Some(at) if Instant::now() >= at => {
                Err(ResolutionError::DeadlineExceeded { scanned_days }.into())
            }
            _ => Ok(()),
        }
    };
    let cached = DayClassifier::new(
        CachingResolver::new(classifier.resolver()),
        classifier.style(),
    );

    if options.mode == ScanMode::Parallel && options.max_lookahead_days > 0 {
        // Window days plus the day after the last one, for its eve lookup.
        let dates = (1..=options.max_lookahead_days.saturating_add(1))
            .map(|offset| shift(from, offset))
            .collect::<Result<Vec<_>>>()?;
        let failed = cached.resolver().prefetch_until(&dates, deadline);
        debug!(prefetched = dates.len(), failed, "window prefetch complete");
        expired(0)?;
    }

    for offset in 1..=options.max_lookahead_days {
        expired(offset - 1)?;
        let day = cached.classify(shift(from, offset)?)?;
        // A slow lookup may have run past the budget; don't report its result.
        expired(offset - 1)?;

        debug!(date = %day.date, label = %day.label, "scanned");
        if visit(day).is_break() {
            break;
        }
    }

    Ok(())
}
