//! Gregorian → Hebrew date resolution.
//!
//! The conversion itself is delegated to an external oracle (hebcal.com's
//! `converter` endpoint). [`HebcalResolver`] is the network client;
//! [`CachingResolver`] memoizes answers for the lifetime of one request and can
//! prefetch a batch of dates concurrently.

use std::collections::HashMap;
use std::sync::{Mutex, OnceLock, PoisonError};
use std::thread;
use std::time::Instant;

use chrono::{Datelike, NaiveDate};
use rayon::prelude::*;
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::Deserialize;
use tracing::{debug, warn};

use crate::config::ResolverConfig;
use crate::error::ResolutionError;
use crate::hebrew::{HebrewDate, HebrewMonth};

/// Anything that can turn a Gregorian date into a Hebrew date.
///
/// Implementations must be deterministic for a stable oracle: two calls for
/// the same date agree.
pub trait HebrewDateResolver: Send + Sync {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError>;
}

impl<R: HebrewDateResolver + ?Sized> HebrewDateResolver for &R {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        (**self).resolve(date)
    }
}

impl<R: HebrewDateResolver + ?Sized> HebrewDateResolver for Box<R> {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        (**self).resolve(date)
    }
}

// ---------------------------------------------------------------------------
// Lookup pool
// ---------------------------------------------------------------------------

/// Upper bound on oracle calls in flight at once.
///
/// Lookups block on the network, so they run on their own pool instead of
/// rayon's CPU-sized global one.
pub const MAX_CONCURRENT_LOOKUPS: usize = 32;

fn lookup_pool() -> Option<&'static ThreadPool> {
    static POOL: OnceLock<Option<ThreadPool>> = OnceLock::new();
    POOL.get_or_init(|| {
        ThreadPoolBuilder::new()
            .num_threads(MAX_CONCURRENT_LOOKUPS)
            .thread_name(|i| format!("yomtov-lookup-{i}"))
            .build()
            .map_err(|e| warn!(error = %e, "lookup pool unavailable, using global pool"))
            .ok()
    })
    .as_ref()
}

/// Run two blocking lookups concurrently on the lookup pool.
pub(crate) fn join_lookups<A, B, RA, RB>(a: A, b: B) -> (RA, RB)
where
    A: FnOnce() -> RA + Send,
    B: FnOnce() -> RB + Send,
    RA: Send,
    RB: Send,
{
    match lookup_pool() {
        Some(pool) => pool.join(a, b),
        None => rayon::join(a, b),
    }
}

// ---------------------------------------------------------------------------
// hebcal client
// ---------------------------------------------------------------------------

/// The subset of the converter's JSON answer we rely on.
#[derive(Debug, Deserialize)]
pub(crate) struct ConverterPayload {
    hy: Option<i32>,
    hm: Option<String>,
    hd: Option<u32>,
    hebrew: Option<String>,
    error: Option<String>,
}

enum FetchError {
    /// No answer, or a 5xx; worth another attempt.
    Transport(String),
    /// The oracle refused the request (4xx); asking again will not help.
    Rejected(String),
    /// An answer arrived but was not the JSON we expect.
    Decode(String),
}

/// Blocking client for the hebcal converter with per-call timeout and bounded retry.
pub struct HebcalResolver {
    agent: ureq::Agent,
    config: ResolverConfig,
}

impl HebcalResolver {
    pub fn new(config: ResolverConfig) -> Self {
        let agent = ureq::AgentBuilder::new().timeout(config.timeout()).build();
        Self { agent, config }
    }

    pub fn config(&self) -> &ResolverConfig {
        &self.config
    }

    fn fetch(&self, date: NaiveDate) -> Result<ConverterPayload, FetchError> {
        let response = self
            .agent
            .get(&self.config.base_url)
            .query("cfg", "json")
            .query("gy", &date.year().to_string())
            .query("gm", &date.month().to_string())
            .query("gd", &date.day().to_string())
            .query("g2h", "1")
            .call()
            .map_err(|e| match e {
                ureq::Error::Status(code, _) if code >= 500 => {
                    FetchError::Transport(format!("HTTP status {code}"))
                }
                ureq::Error::Status(code, _) => FetchError::Rejected(format!("HTTP status {code}")),
                ureq::Error::Transport(transport) => FetchError::Transport(transport.to_string()),
            })?;

        response
            .into_json::<ConverterPayload>()
            .map_err(|e| FetchError::Decode(e.to_string()))
    }
}

impl HebrewDateResolver for HebcalResolver {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        let attempts = self.config.attempts();
        let mut backoff = self.config.retry_backoff();
        let mut last_error = String::new();

        for attempt in 1..=attempts {
            debug!(%date, attempt, "querying Hebrew date oracle");
            match self.fetch(date) {
                Ok(payload) => return parse_payload(date, payload),
                Err(FetchError::Decode(message)) => {
                    return Err(ResolutionError::Malformed { date, message });
                }
                Err(FetchError::Rejected(message)) => {
                    warn!(%date, attempt, error = %message, "Hebrew date oracle rejected request");
                    return Err(ResolutionError::Unreachable {
                        date,
                        attempts: attempt,
                        message,
                    });
                }
                Err(FetchError::Transport(message)) => {
                    debug!(%date, attempt, error = %message, "oracle call failed");
                    last_error = message;
                    if attempt < attempts {
                        thread::sleep(backoff);
                        backoff = backoff.saturating_mul(2);
                    }
                }
            }
        }

        warn!(%date, attempts, error = %last_error, "Hebrew date oracle unreachable");
        Err(ResolutionError::Unreachable {
            date,
            attempts,
            message: last_error,
        })
    }
}

/// Validate a converter payload into a [`HebrewDate`].
pub(crate) fn parse_payload(
    date: NaiveDate,
    payload: ConverterPayload,
) -> Result<HebrewDate, ResolutionError> {
    let malformed = |message: String| ResolutionError::Malformed { date, message };

    if let Some(error) = payload.error {
        return Err(malformed(format!("oracle reported: {error}")));
    }

    let month_name = payload.hm.ok_or_else(|| malformed("missing 'hm' field".into()))?;
    let day = payload.hd.ok_or_else(|| malformed("missing 'hd' field".into()))?;
    let year = payload.hy.ok_or_else(|| malformed("missing 'hy' field".into()))?;

    let month: HebrewMonth = month_name.parse().map_err(|e| malformed(format!("{e}")))?;
    let day = u8::try_from(day)
        .ok()
        .filter(|d| (1..=30).contains(d))
        .ok_or_else(|| malformed(format!("day {day} out of range 1-30")))?;

    Ok(HebrewDate {
        year,
        month,
        day,
        text: payload.hebrew,
    })
}

// ---------------------------------------------------------------------------
// In-request cache
// ---------------------------------------------------------------------------

/// Memoizing wrapper, meant to live for one request.
///
/// Only successful resolutions are cached; a failed date is asked again on the
/// next call.
pub struct CachingResolver<R> {
    inner: R,
    cache: Mutex<HashMap<NaiveDate, HebrewDate>>,
}

impl<R: HebrewDateResolver> CachingResolver<R> {
    pub fn new(inner: R) -> Self {
        Self {
            inner,
            cache: Mutex::new(HashMap::new()),
        }
    }

    /// Resolve every uncached date in `dates` concurrently.
    ///
    /// Failures are logged and left uncached. Returns how many dates failed.
    pub fn prefetch(&self, dates: &[NaiveDate]) -> usize {
        self.prefetch_until(dates, None)
    }

    /// [`prefetch`](Self::prefetch), but lookups not yet started when
    /// `deadline` passes are skipped (and counted as failed).
    pub fn prefetch_until(&self, dates: &[NaiveDate], deadline: Option<Instant>) -> usize {
        let missing: Vec<NaiveDate> = {
            let cache = self.cache.lock().unwrap_or_else(PoisonError::into_inner);
            dates
                .iter()
                .copied()
                .filter(|d| !cache.contains_key(d))
                .collect()
        };

        let fan_out = || {
            missing
                .par_iter()
                .with_max_len(1)
                .filter(|&&date| {
                    if deadline.is_some_and(|d| Instant::now() >= d) {
                        return true;
                    }
                    match self.resolve(date) {
                        Ok(_) => false,
                        Err(e) => {
                            debug!(%date, error = %e, "prefetch failed");
                            true
                        }
                    }
                })
                .count()
        };

        match lookup_pool() {
            Some(pool) => pool.install(fan_out),
            None => fan_out(),
        }
    }

    /// Number of dates currently memoized.
    pub fn cached_len(&self) -> usize {
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .len()
    }

    pub fn into_inner(self) -> R {
        self.inner
    }
}

impl<R: HebrewDateResolver> HebrewDateResolver for CachingResolver<R> {
    fn resolve(&self, date: NaiveDate) -> Result<HebrewDate, ResolutionError> {
        if let Some(hit) = self
            .cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&date)
        {
            return Ok(hit.clone());
        }

        // Not holding the lock across the oracle call.
        let resolved = self.inner.resolve(date)?;
        self.cache
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(date, resolved.clone());
        Ok(resolved)
    }
}
