//! Day classification: Shabbat, fixed holiday, eve of holiday, or ordinary.

use chrono::{Datelike, NaiveDate, Weekday};
use serde::{Deserialize, Serialize};
use tracing::instrument;

use crate::error::{Result, YomTovError};
use crate::hebrew::HebrewDate;
use crate::holidays;
use crate::resolver::{join_lookups, HebrewDateResolver};

/// Label used when nothing applies.
pub const ORDINARY_LABEL: &str = "ordinary";

/// Label used for a Shabbat that is not a holiday.
pub const SHABBAT_LABEL: &str = "Shabbat";

/// How the composite label is assembled when several facts hold at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LabelStyle {
    /// Exactly one fact, by precedence: holiday > Shabbat > eve of holiday.
    #[default]
    HolidayOnly,
    /// Every applicable fact, joined with `", "`: holiday, Shabbat, then eve
    /// of holiday unless the day is itself a holiday.
    Joint,
}

/// Everything known about one Gregorian day.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DayClassification {
    pub date: NaiveDate,
    pub hebrew_date: HebrewDate,
    pub is_shabbat: bool,
    pub holiday_name: Option<&'static str>,
    pub is_eve_of_holiday: bool,
    pub eve_holiday_name: Option<&'static str>,
    /// Friday. Reported only; never part of the label or of sacredness.
    pub is_eve_of_shabbat: bool,
    pub label: String,
}

impl DayClassification {
    pub fn is_holiday(&self) -> bool {
        self.holiday_name.is_some()
    }

    /// Shabbat or a fixed holiday. An eve alone is not sacred.
    pub fn is_sacred(&self) -> bool {
        self.is_shabbat || self.is_holiday()
    }

    /// The complement of [`is_sacred`](Self::is_sacred).
    pub fn is_ordinary(&self) -> bool {
        !self.is_sacred()
    }
}

/// Whether `date` falls on Saturday.
pub fn is_shabbat(date: NaiveDate) -> bool {
    date.weekday() == Weekday::Sat
}

/// Build the composite label.
pub fn compose_label(
    style: LabelStyle,
    holiday_name: Option<&str>,
    is_shabbat: bool,
    eve_holiday_name: Option<&str>,
) -> String {
    match style {
        LabelStyle::HolidayOnly => {
            if let Some(name) = holiday_name {
                name.to_string()
            } else if is_shabbat {
                SHABBAT_LABEL.to_string()
            } else if let Some(name) = eve_holiday_name {
                format!("eve of {name}")
            } else {
                ORDINARY_LABEL.to_string()
            }
        }
        LabelStyle::Joint => {
            let mut parts: Vec<String> = Vec::with_capacity(3);
            if let Some(name) = holiday_name {
                parts.push(name.to_string());
            }
            if is_shabbat {
                parts.push(SHABBAT_LABEL.to_string());
            }
            if let (None, Some(name)) = (holiday_name, eve_holiday_name) {
                parts.push(format!("eve of {name}"));
            }
            if parts.is_empty() {
                ORDINARY_LABEL.to_string()
            } else {
                parts.join(", ")
            }
        }
    }
}

/// Classifies Gregorian dates using a resolver and the fixed holiday table.
pub struct DayClassifier<R> {
    resolver: R,
    style: LabelStyle,
}

impl<R: HebrewDateResolver> DayClassifier<R> {
    pub fn new(resolver: R, style: LabelStyle) -> Self {
        Self { resolver, style }
    }

    pub fn style(&self) -> LabelStyle {
        self.style
    }

    pub fn resolver(&self) -> &R {
        &self.resolver
    }

    /// Classify `date`.
    ///
    /// Resolves `date` and `date + 1` (concurrently). Either failure aborts the
    /// whole classification; the error for `date` is reported first when both
    /// fail.
    #[instrument(skip(self), level = "debug")]
    pub fn classify(&self, date: NaiveDate) -> Result<DayClassification> {
        let next = date.succ_opt().ok_or_else(|| {
            YomTovError::Validation(format!("{date} is the last representable date"))
        })?;

        let (today, tomorrow) = join_lookups(
            || self.resolver.resolve(date),
            || self.resolver.resolve(next),
        );
        let hebrew_date = today?;
        let next_hebrew = tomorrow?;

        let is_shabbat = is_shabbat(date);
        let holiday_name = holidays::lookup(hebrew_date.month, hebrew_date.day);
        let eve_holiday_name = holidays::lookup(next_hebrew.month, next_hebrew.day);
        let label = compose_label(self.style, holiday_name, is_shabbat, eve_holiday_name);

        Ok(DayClassification {
            date,
            hebrew_date,
            is_shabbat,
            holiday_name,
            is_eve_of_holiday: eve_holiday_name.is_some(),
            eve_holiday_name,
            is_eve_of_shabbat: date.weekday() == Weekday::Fri,
            label,
        })
    }
}
