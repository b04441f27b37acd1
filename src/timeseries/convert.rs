//! Half-hourly trace conversion to 5-minute cadence.
//!
//! Market trace archives publish one row per day with 48 half-hour
//! columns. This module flattens that layout into a timestamped sequence,
//! linearly interpolates it onto the 5-minute grid, and optionally clamps
//! the result to one calendar year so it feeds
//! [`TimestampedSeries::from_rows`] directly.

use chrono::{Datelike, Duration, NaiveDate};
use serde::Deserialize;

use super::series::{
    FINE_STEP_MINUTES, SeriesError, SeriesPoint, TimestampedSeries, days_in_year,
    expected_fine_samples, year_start,
};

/// Half-hour columns per trace row.
pub const HALF_HOURS_PER_DAY: usize = 48;

/// One raw trace row: a calendar date plus its 48 half-hour readings.
///
/// Column `1` is the reading for 00:30, column `48` the reading for
/// midnight of the following day, matching the archive convention.
#[derive(Debug, Clone, Deserialize)]
pub struct TraceRow {
    /// Calendar year of the row.
    pub year: i32,
    /// Calendar month of the row.
    pub month: u32,
    /// Calendar day of the row.
    pub day: u32,
    /// Half-hour readings, column 1 through 48.
    pub values: Vec<f64>,
}

/// Flattens daily trace rows into a sorted half-hourly sequence.
///
/// # Errors
///
/// Returns `MalformedSeries` if a row has an invalid date or a column
/// count other than [`HALF_HOURS_PER_DAY`].
pub fn flatten_trace(rows: &[TraceRow]) -> Result<Vec<SeriesPoint>, SeriesError> {
    let mut points = Vec::with_capacity(rows.len() * HALF_HOURS_PER_DAY);
    for row in rows {
        if row.values.len() != HALF_HOURS_PER_DAY {
            return Err(SeriesError::MalformedSeries(format!(
                "trace row {}-{:02}-{:02} has {} columns, expected {HALF_HOURS_PER_DAY}",
                row.year,
                row.month,
                row.day,
                row.values.len()
            )));
        }
        let date = NaiveDate::from_ymd_opt(row.year, row.month, row.day).ok_or_else(|| {
            SeriesError::MalformedSeries(format!(
                "trace row has invalid date {}-{:02}-{:02}",
                row.year, row.month, row.day
            ))
        })?;
        let midnight = date.and_hms_opt(0, 0, 0).unwrap_or_default();
        for (col, value) in row.values.iter().enumerate() {
            points.push(SeriesPoint {
                timestamp: midnight + Duration::minutes(30 * (col as i64 + 1)),
                value: *value,
            });
        }
    }
    points.sort_by_key(|p| p.timestamp);
    Ok(points)
}

/// Interpolates a sorted coarse sequence onto the 5-minute grid of one
/// calendar year.
///
/// Grid slots between two source samples get the linear interpolation of
/// their neighbors; slots before the first or after the last sample hold
/// that sample's value. The output spans `[Jan 1 00:00, Dec 31 23:55]` of
/// `year` exactly.
///
/// # Errors
///
/// Returns `MalformedSeries` for empty or unordered input and
/// `YearBoundary` if no source sample falls within `year`.
pub fn interpolate_to_five_minute(
    points: &[SeriesPoint],
    year: i32,
) -> Result<Vec<SeriesPoint>, SeriesError> {
    if points.is_empty() {
        return Err(SeriesError::MalformedSeries("trace sequence is empty".into()));
    }
    for pair in points.windows(2) {
        if pair[1].timestamp <= pair[0].timestamp {
            return Err(SeriesError::MalformedSeries(format!(
                "trace timestamps not strictly increasing at {}",
                pair[1].timestamp
            )));
        }
    }
    if points.iter().all(|p| p.timestamp.year() != year) {
        return Err(SeriesError::YearBoundary(format!(
            "trace contains no samples in {year}"
        )));
    }

    let start = year_start(year)?;
    let slots = expected_fine_samples(year);
    let mut out = Vec::with_capacity(slots);
    // Index of the first source sample at or after the current grid slot.
    let mut upper = 0usize;

    for i in 0..slots {
        let t = start + Duration::minutes(FINE_STEP_MINUTES * i as i64);
        while upper < points.len() && points[upper].timestamp < t {
            upper += 1;
        }
        let value = if upper == 0 {
            points[0].value
        } else if upper == points.len() {
            points[points.len() - 1].value
        } else {
            let lo = &points[upper - 1];
            let hi = &points[upper];
            if hi.timestamp == t {
                hi.value
            } else {
                let span = (hi.timestamp - lo.timestamp).num_seconds() as f64;
                let frac = (t - lo.timestamp).num_seconds() as f64 / span;
                lo.value + (hi.value - lo.value) * frac
            }
        };
        out.push(SeriesPoint { timestamp: t, value });
    }

    Ok(out)
}

/// Converts daily half-hour trace rows into a validated full-year fine
/// series: flatten, interpolate, clamp to `year`.
///
/// # Errors
///
/// Propagates flattening and interpolation failures.
pub fn convert_half_hourly(rows: &[TraceRow], year: i32) -> Result<TimestampedSeries, SeriesError> {
    let flat = flatten_trace(rows)?;
    let fine = interpolate_to_five_minute(&flat, year)?;
    debug_assert_eq!(fine.len(), days_in_year(year) * 288);
    TimestampedSeries::from_points(fine)
}
