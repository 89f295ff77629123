//! The fixed-date holiday table.
//!
//! A process-wide constant keyed by (Hebrew month, Hebrew day). Only the
//! fixed-date Yom Tov days are listed; movable and diaspora-only days are not.

use crate::hebrew::HebrewMonth;

/// Bumped whenever an entry is added, removed or renamed.
pub const TABLE_VERSION: u32 = 1;

/// A single table entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Holiday {
    pub month: HebrewMonth,
    pub day: u8,
    pub name: &'static str,
}

const HOLIDAYS: [Holiday; 8] = [
    Holiday {
        month: HebrewMonth::Tishrei,
        day: 1,
        name: "Rosh Hashanah",
    },
    Holiday {
        month: HebrewMonth::Tishrei,
        day: 2,
        name: "Rosh Hashanah",
    },
    Holiday {
        month: HebrewMonth::Tishrei,
        day: 10,
        name: "Yom Kippur",
    },
    Holiday {
        month: HebrewMonth::Tishrei,
        day: 15,
        name: "Sukkot",
    },
    Holiday {
        month: HebrewMonth::Tishrei,
        day: 22,
        name: "Simchat Torah",
    },
    Holiday {
        month: HebrewMonth::Nisan,
        day: 15,
        name: "Pesach",
    },
    Holiday {
        month: HebrewMonth::Nisan,
        day: 21,
        name: "7th day of Pesach",
    },
    Holiday {
        month: HebrewMonth::Sivan,
        day: 6,
        name: "Shavuot",
    },
];

/// Look up the holiday falling on `day` of `month`.
///
/// Returns `None` for every key outside the table; this is not an error.
pub fn lookup(month: HebrewMonth, day: u8) -> Option<&'static str> {
    HOLIDAYS
        .iter()
        .find(|h| h.month == month && h.day == day)
        .map(|h| h.name)
}

/// All table entries in calendar order (Tishrei first, as listed).
pub fn entries() -> &'static [Holiday] {
    &HOLIDAYS
}
