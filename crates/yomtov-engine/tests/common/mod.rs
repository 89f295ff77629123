//! Fixture resolvers standing in for the Hebrew-date oracle.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::thread;
use std::time::Duration;

use chrono::NaiveDate;
use yomtov_engine::hebrew::{HebrewDate, HebrewMonth};
use yomtov_engine::{HebrewDateResolver, ResolutionError};

pub fn ymd(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).unwrap()
}

pub fn heb(year: i32, month: HebrewMonth, day: u8) -> HebrewDate {
    HebrewDate::new(year, month, day)
}

fn unreachable(date: NaiveDate, message: &str) -> ResolutionError {
    ResolutionError::Unreachable {
        date,
        attempts: 1,
        message: message.to_string(),
    }
}

// ── Real calendar stretches ─────────────────────────────────────────────────

/// Answers from a run of consecutive Hebrew months starting at `anchor`
/// (day 1 of the first month). The year advances on entering Tishrei.
pub struct SequenceResolver {
    anchor: NaiveDate,
    year: i32,
    months: Vec<(HebrewMonth, u8)>,
}

impl SequenceResolver {
    pub fn new(anchor: NaiveDate, year: i32, months: Vec<(HebrewMonth, u8)>) -> Self {
        Self {
            anchor,
            year,
            months,
        }
    }

    /// 1 Elul 5785 = 2025-08-25. Rosh Hashanah 5786 is Tue 2025-09-23,
    /// Yom Kippur Thu 2025-10-02.
    pub fn autumn_5786() -> Self {
        Self::new(
            ymd(2025, 8, 25),
            5785,
            vec![
                (HebrewMonth::Elul, 29),
                (HebrewMonth::Tishrei, 30),
                (HebrewMonth::Cheshvan, 29),
                (HebrewMonth::Kislev, 30),
            ],
        )
    }

    /// 1 Nisan 5786 = 2026-03-19. Pesach is Thu 2026-04-02, Shavuot Fri 2026-05-22.
    pub fn spring_5786() -> Self {
        Self::new(
            ymd(2026, 3, 19),
            5786,
            vec![
                (HebrewMonth::Nisan, 30),
                (HebrewMonth::Iyyar, 29),
                (HebrewMonth::Sivan, 30),
            ],
        )
    }

    /// 1 Elul 5777 = 2017-08-23. Yom Kippur 5778 fell on Shabbat, 2017-09-30.
    pub fn autumn_5778() -> Self {
        Self::new(
            ymd(2017, 8, 23),
            5777,
            vec![
                (HebrewMonth::Elul, 29),
                (HebrewMonth::Tishrei, 30),
                (HebrewMonth::Cheshvan, 29),
            ],
        )
    }
}

impl HebrewDateResolver for SequenceResolver {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        let mut offset = (date - self.anchor).num_days();
        if offset < 0 {
            return Err(unreachable(date, "before fixture range"));
        }

        let mut year = self.year;
        for (i, &(month, len)) in self.months.iter().enumerate() {
            if month == HebrewMonth::Tishrei && i > 0 {
                year += 1;
            }
            if offset < i64::from(len) {
                return Ok(heb(year, month, offset as u8 + 1));
            }
            offset -= i64::from(len);
        }
        Err(unreachable(date, "after fixture range"))
    }
}

/// A made-up but stable calendar covering every date: 30-day months cycling
/// Nisan..Adar (no Adar I), 1 Nisan 5760 = 2000-01-01.
pub struct CyclicResolver;

const CYCLE: [HebrewMonth; 12] = [
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
    HebrewMonth::Adar,
];

impl HebrewDateResolver for CyclicResolver {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        let days = (date - ymd(2000, 1, 1)).num_days();
        let index = days.rem_euclid(360);
        let year = 5760 + days.div_euclid(360) as i32;
        Ok(heb(
            year,
            CYCLE[(index / 30) as usize],
            (index % 30) as u8 + 1,
        ))
    }
}

// ── Wrappers ────────────────────────────────────────────────────────────────

/// Fails for the listed dates, delegates otherwise.
pub struct FailingResolver<R> {
    pub inner: R,
    pub failing: HashSet<NaiveDate>,
}

impl<R> FailingResolver<R> {
    pub fn new(inner: R, failing: &[NaiveDate]) -> Self {
        Self {
            inner,
            failing: failing.iter().copied().collect(),
        }
    }
}

impl<R: HebrewDateResolver> HebrewDateResolver for FailingResolver<R> {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        if self.failing.contains(&date) {
            return Err(unreachable(date, "connection refused"));
        }
        self.inner.resolve(date)
    }
}

/// Records every call made through it.
pub struct CountingResolver<R> {
    pub inner: R,
    calls: AtomicUsize,
    log: Mutex<Vec<NaiveDate>>,
}

impl<R> CountingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
            log: Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Distinct dates asked for, sorted.
    pub fn dates(&self) -> Vec<NaiveDate> {
        let mut dates = self.log.lock().unwrap().clone();
        dates.sort();
        dates.dedup();
        dates
    }
}

impl<R: HebrewDateResolver> HebrewDateResolver for CountingResolver<R> {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.log.lock().unwrap().push(date);
        self.inner.resolve(date)
    }
}

/// Sleeps before every answer.
pub struct SlowResolver<R> {
    pub inner: R,
    pub delay: Duration,
}

impl<R: HebrewDateResolver> HebrewDateResolver for SlowResolver<R> {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        thread::sleep(self.delay);
        self.inner.resolve(date)
    }
}
