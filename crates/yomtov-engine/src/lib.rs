//! # yomtov-engine
//!
//! Classifies Gregorian dates by the Jewish calendar (ordinary day, Shabbat,
//! fixed-date holiday, or the eve of one) and searches a bounded window ahead
//! for the next ordinary day and the next sacred day.
//!
//! Hebrew dates come from an external conversion oracle; this crate never
//! computes the Hebrew calendar itself.
//!
//! ## Modules
//!
//! - [`hebrew`] - `HebrewMonth` and `HebrewDate`
//! - [`holidays`] - the fixed (month, day) → holiday table
//! - [`resolver`] - oracle client, in-request cache
//! - [`classifier`] - one date → `DayClassification`
//! - [`scanner`] - next ordinary / next sacred day within a window
//! - [`date_info`] - request body → JSON answer
//! - [`config`] - `EngineConfig` (TOML + environment)
//! - [`error`] - Error types

pub mod classifier;
pub mod config;
pub mod date_info;
pub mod error;
pub mod hebrew;
pub mod holidays;
pub mod resolver;
pub mod scanner;

pub use classifier::{DayClassification, DayClassifier, LabelStyle};
pub use config::{EngineConfig, ResolverConfig, DEFAULT_LOOKAHEAD_DAYS};
pub use date_info::{date_info, DateInfo, DateInfoResponse};
pub use error::{ResolutionError, YomTovError};
pub use hebrew::{HebrewDate, HebrewMonth};
pub use resolver::{CachingResolver, HebcalResolver, HebrewDateResolver};
pub use scanner::{
    next_ordinary_day, next_sacred_day, scan, SacredDay, ScanMode, ScanOptions, ScanResult,
};
