//! Hebrew calendar dates as reported by the conversion oracle.
//!
//! Nothing here computes the Hebrew calendar; these types only carry the
//! oracle's answer in a typed form.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// One of the named Hebrew months.
///
/// `Adar` is the month that carries Purim: plain Adar in a common year and
/// Adar II in a leap year. `AdarI` only exists in leap years.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum HebrewMonth {
    Nisan,
    Iyyar,
    Sivan,
    Tamuz,
    Av,
    Elul,
    Tishrei,
    Cheshvan,
    Kislev,
    Tevet,
    Shvat,
    AdarI,
    Adar,
}

impl HebrewMonth {
    /// All months in Nisan-first order.
    pub const ALL: [HebrewMonth; 13] = [
        HebrewMonth::Nisan,
        HebrewMonth::Iyyar,
        HebrewMonth::Sivan,
        HebrewMonth::Tamuz,
        HebrewMonth::Av,
        HebrewMonth::Elul,
        HebrewMonth::Tishrei,
        HebrewMonth::Cheshvan,
        HebrewMonth::Kislev,
        HebrewMonth::Tevet,
        HebrewMonth::Shvat,
        HebrewMonth::AdarI,
        HebrewMonth::Adar,
    ];

    pub fn name(self) -> &'static str {
        match self {
            HebrewMonth::Nisan => "Nisan",
            HebrewMonth::Iyyar => "Iyyar",
            HebrewMonth::Sivan => "Sivan",
            HebrewMonth::Tamuz => "Tamuz",
            HebrewMonth::Av => "Av",
            HebrewMonth::Elul => "Elul",
            HebrewMonth::Tishrei => "Tishrei",
            HebrewMonth::Cheshvan => "Cheshvan",
            HebrewMonth::Kislev => "Kislev",
            HebrewMonth::Tevet => "Tevet",
            HebrewMonth::Shvat => "Sh'vat",
            HebrewMonth::AdarI => "Adar I",
            HebrewMonth::Adar => "Adar",
        }
    }
}

impl fmt::Display for HebrewMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// Error returned when a month name is not one the oracle uses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UnknownMonth(pub String);

impl fmt::Display for UnknownMonth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "unknown Hebrew month '{}'", self.0)
    }
}

impl std::error::Error for UnknownMonth {}

impl FromStr for HebrewMonth {
    type Err = UnknownMonth;

    /// Parse a month name as spelled by hebcal (`"Sh'vat"`, `"Adar II"`, ...).
    ///
    /// Matching ignores case, apostrophes and surrounding whitespace.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let key: String = s
            .trim()
            .chars()
            .filter(|&c| !matches!(c, '\'' | '\u{2019}'))
            .flat_map(char::to_lowercase)
            .collect();

        let month = match key.as_str() {
            "nisan" | "nissan" => HebrewMonth::Nisan,
            "iyyar" | "iyar" => HebrewMonth::Iyyar,
            "sivan" => HebrewMonth::Sivan,
            "tamuz" | "tammuz" => HebrewMonth::Tamuz,
            "av" => HebrewMonth::Av,
            "elul" => HebrewMonth::Elul,
            "tishrei" | "tishri" => HebrewMonth::Tishrei,
            "cheshvan" | "heshvan" | "marcheshvan" => HebrewMonth::Cheshvan,
            "kislev" => HebrewMonth::Kislev,
            "tevet" | "teves" => HebrewMonth::Tevet,
            "shvat" | "shevat" => HebrewMonth::Shvat,
            "adar i" | "adar 1" => HebrewMonth::AdarI,
            "adar" | "adar ii" | "adar 2" => HebrewMonth::Adar,
            _ => return Err(UnknownMonth(s.to_string())),
        };
        Ok(month)
    }
}

/// A resolved Hebrew date.
///
/// Only produced by a [`HebrewDateResolver`](crate::resolver::HebrewDateResolver).
/// `text` is the oracle's own rendering of the date (Hebrew script), when it
/// supplied one.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct HebrewDate {
    pub year: i32,
    pub month: HebrewMonth,
    pub day: u8,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub text: Option<String>,
}

impl HebrewDate {
    pub fn new(year: i32, month: HebrewMonth, day: u8) -> Self {
        Self {
            year,
            month,
            day,
            text: None,
        }
    }

    /// The oracle's rendering when present, otherwise `"<day> <Month> <year>"`.
    pub fn display_text(&self) -> String {
        match &self.text {
            Some(text) => text.clone(),
            None => self.to_string(),
        }
    }
}

impl fmt::Display for HebrewDate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.day, self.month, self.year)
    }
}
