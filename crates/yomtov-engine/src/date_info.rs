//! The inbound operation: `{ "date": "YYYY-MM-DD" }` in, a JSON object out.
//!
//! Every outcome is an object. Bad input and oracle failures become
//! `{"error": ...}`; an exhausted scan window is a successful answer with
//! `null` fields.

use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;
use tracing::{info, warn};

use crate::classifier::DayClassifier;
use crate::config::EngineConfig;
use crate::error::{Result, YomTovError};
use crate::resolver::{CachingResolver, HebrewDateResolver};
use crate::scanner;

pub const MISSING_DATE: &str = "Missing 'date' parameter";
pub const INVALID_DATE_FORMAT: &str = "Invalid date format. Use YYYY-MM-DD.";

/// Successful answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DateInfo {
    pub input_date: String,
    pub hebrew_date: String,
    pub day_type: String,
    pub is_shabbat: bool,
    pub holiday_name: Option<String>,
    pub eve_holiday_name: Option<String>,
    pub next_weekday: Option<NaiveDate>,
    pub next_holy_day_date: Option<NaiveDate>,
    pub next_holy_day_name: Option<String>,
    pub close_holy_days: Vec<String>,
}

/// Error answer.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ErrorBody {
    pub error: String,
}

/// Either shape, serialized flat.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum DateInfoResponse {
    Ok(Box<DateInfo>),
    Err(ErrorBody),
}

impl DateInfoResponse {
    pub fn is_error(&self) -> bool {
        matches!(self, DateInfoResponse::Err(_))
    }

    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or_else(|e| serde_json::json!({ "error": e.to_string() }))
    }
}

/// Pull the date out of a request body.
///
/// Checked entirely before any oracle call.
pub fn parse_request(body: &str) -> Result<NaiveDate> {
    let value: Value = serde_json::from_str(body)
        .map_err(|e| YomTovError::Validation(format!("Invalid request body: {e}")))?;
    let object = value.as_object().ok_or_else(|| {
        YomTovError::Validation("Invalid request body: expected a JSON object".to_string())
    })?;

    match object.get("date") {
        None | Some(Value::Null) => Err(YomTovError::Validation(MISSING_DATE.to_string())),
        Some(Value::String(s)) if s.trim().is_empty() => {
            Err(YomTovError::Validation(MISSING_DATE.to_string()))
        }
        Some(Value::String(s)) => parse_date(s),
        Some(_) => Err(YomTovError::Validation(INVALID_DATE_FORMAT.to_string())),
    }
}

/// Parse a strict `YYYY-MM-DD` date.
pub fn parse_date(s: &str) -> Result<NaiveDate> {
    NaiveDate::parse_from_str(s.trim(), "%Y-%m-%d")
        .map_err(|_| YomTovError::Validation(INVALID_DATE_FORMAT.to_string()))
}

/// Compute the full answer for one date.
pub fn lookup<R: HebrewDateResolver>(
    date: NaiveDate,
    resolver: &R,
    config: &EngineConfig,
) -> Result<DateInfo> {
    let classifier = DayClassifier::new(CachingResolver::new(resolver), config.label_style);

    let today = classifier.classify(date)?;
    let scan = scanner::scan(&classifier, date, &config.scan_options())?;

    Ok(DateInfo {
        input_date: date.format("%Y-%m-%d").to_string(),
        hebrew_date: today.hebrew_date.display_text(),
        day_type: today.label,
        is_shabbat: today.is_shabbat,
        holiday_name: today.holiday_name.map(str::to_string),
        eve_holiday_name: today.eve_holiday_name.map(str::to_string),
        next_weekday: scan.next_ordinary,
        next_holy_day_date: scan.next_sacred.as_ref().map(|s| s.date),
        next_holy_day_name: scan.next_sacred.map(|s| s.label),
        close_holy_days: scan
            .close_holy_days
            .iter()
            .map(|h| h.display_text())
            .collect(),
    })
}

/// Handle one request body end to end.
pub fn date_info<R: HebrewDateResolver>(
    body: &str,
    resolver: &R,
    config: &EngineConfig,
) -> DateInfoResponse {
    let outcome = parse_request(body).and_then(|date| lookup(date, resolver, config));

    match outcome {
        Ok(info) => {
            info!(date = %info.input_date, day_type = %info.day_type, "date info computed");
            DateInfoResponse::Ok(Box::new(info))
        }
        Err(YomTovError::Validation(message)) => {
            warn!(%message, "rejected request");
            DateInfoResponse::Err(ErrorBody { error: message })
        }
        Err(e @ (YomTovError::Resolution(_) | YomTovError::Config(_))) => {
            warn!(error = %e, "date info failed");
            DateInfoResponse::Err(ErrorBody {
                error: e.to_string(),
            })
        }
    }
}
