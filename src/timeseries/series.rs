//! Strict 5-minute calendar-year series and the raw-row parser feeding it.

use std::path::Path;

use chrono::{Datelike, Duration, NaiveDate, NaiveDateTime};
use serde::Deserialize;
use thiserror::Error;

/// Fine sampling interval in minutes.
pub const FINE_STEP_MINUTES: i64 = 5;
/// Number of fine samples per hour.
pub const SAMPLES_PER_HOUR: usize = 12;
/// Number of fine samples per day.
pub const SAMPLES_PER_DAY: usize = 288;

/// Timestamp format accepted from raw rows: `2024-01-01 00:05:00`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Errors raised by series parsing, validation, and aggregation.
#[derive(Debug, Error)]
pub enum SeriesError {
    /// Input does not match the expected cadence or has gaps/duplicates.
    #[error("malformed series: {0}")]
    MalformedSeries(String),

    /// Aggregation produced a different count than the canonical
    /// calendar-hour sequence expects.
    #[error("length mismatch: expected {expected} hourly values, produced {produced}")]
    LengthMismatch {
        /// Canonical hour count for the year.
        expected: usize,
        /// Number of hourly values actually produced.
        produced: usize,
    },

    /// Input span does not align with the requested calendar year.
    #[error("year boundary: {0}")]
    YearBoundary(String),

    /// Row provider failed while reading CSV input.
    #[error("csv: {0}")]
    Csv(#[from] csv::Error),

    /// Row provider failed at the I/O layer.
    #[error("io: {0}")]
    Io(#[from] std::io::Error),
}

/// One raw input row: a timestamp string and a numeric value.
#[derive(Debug, Clone, Deserialize)]
pub struct RawRow {
    /// Timestamp in [`TIMESTAMP_FORMAT`].
    pub timestamp: String,
    /// Observed value (MW for the series this crate ships).
    pub value: f64,
}

/// One parsed sample.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SeriesPoint {
    /// Sample timestamp.
    pub timestamp: NaiveDateTime,
    /// Sample value.
    pub value: f64,
}

/// Number of days in a calendar year.
pub fn days_in_year(year: i32) -> usize {
    if NaiveDate::from_ymd_opt(year, 2, 29).is_some() {
        366
    } else {
        365
    }
}

/// Number of 5-minute samples a full calendar year must contain.
pub fn expected_fine_samples(year: i32) -> usize {
    days_in_year(year) * SAMPLES_PER_DAY
}

/// Midnight on Jan 1 of `year`.
///
/// # Errors
///
/// Returns `YearBoundary` if `year` is outside the representable range.
pub fn year_start(year: i32) -> Result<NaiveDateTime, SeriesError> {
    NaiveDate::from_ymd_opt(year, 1, 1)
        .map(|d| d.and_hms_opt(0, 0, 0).unwrap_or_default())
        .ok_or_else(|| SeriesError::YearBoundary(format!("year {year} is out of range")))
}

/// An ordered, gap-free 5-minute series covering one calendar year.
///
/// Invariants enforced at construction: strictly increasing timestamps,
/// exact 5-minute spacing, first sample at Jan 1 00:00 and last sample at
/// Dec 31 23:55 of the target year. Once built the series is read-only.
#[derive(Debug, Clone, PartialEq)]
pub struct TimestampedSeries {
    points: Vec<SeriesPoint>,
}

impl TimestampedSeries {
    /// Parses raw rows into a validated full-year fine series.
    ///
    /// # Arguments
    ///
    /// * `rows` - Raw rows from the row provider, in file order
    /// * `year` - Target calendar year the rows must cover exactly
    ///
    /// # Errors
    ///
    /// * `MalformedSeries` - wrong row count, unparseable timestamp or
    ///   cadence irregularity (gap, duplicate, non-monotonic step)
    /// * `YearBoundary` - rows parse cleanly but do not span
    ///   `[Jan 1 00:00, Dec 31 23:55]` of `year`
    pub fn from_rows(rows: &[RawRow], year: i32) -> Result<Self, SeriesError> {
        let expected = expected_fine_samples(year);
        if rows.len() != expected {
            return Err(SeriesError::MalformedSeries(format!(
                "expected {expected} rows for {year}, got {}",
                rows.len()
            )));
        }

        let mut points = Vec::with_capacity(rows.len());
        for (i, row) in rows.iter().enumerate() {
            let timestamp = NaiveDateTime::parse_from_str(&row.timestamp, TIMESTAMP_FORMAT)
                .map_err(|e| {
                    SeriesError::MalformedSeries(format!(
                        "row {i}: cannot parse timestamp \"{}\": {e}",
                        row.timestamp
                    ))
                })?;
            points.push(SeriesPoint {
                timestamp,
                value: row.value,
            });
        }

        let series = Self::from_points(points)?;
        series.check_year_span(year)?;
        Ok(series)
    }

    /// Builds a series from already-parsed points, checking cadence only.
    ///
    /// Accepts any span (used by the half-hour converter before year
    /// filtering); full-year coverage is checked separately by
    /// [`TimestampedSeries::from_rows`].
    ///
    /// # Errors
    ///
    /// Returns `MalformedSeries` if the points are empty, not strictly
    /// increasing, or not spaced exactly [`FINE_STEP_MINUTES`] apart.
    pub fn from_points(points: Vec<SeriesPoint>) -> Result<Self, SeriesError> {
        if points.is_empty() {
            return Err(SeriesError::MalformedSeries("series is empty".into()));
        }

        let step = Duration::minutes(FINE_STEP_MINUTES);
        for pair in points.windows(2) {
            let gap = pair[1].timestamp - pair[0].timestamp;
            if gap != step {
                return Err(SeriesError::MalformedSeries(format!(
                    "expected {FINE_STEP_MINUTES}-minute spacing at {}, got {} minutes",
                    pair[0].timestamp,
                    gap.num_minutes()
                )));
            }
        }

        Ok(Self { points })
    }

    /// Builds a series from points known to lie on the canonical grid.
    ///
    /// Only used by in-crate generators that construct timestamps
    /// arithmetically; external data must go through `from_rows`.
    pub(crate) fn from_trusted_points(points: Vec<SeriesPoint>) -> Self {
        debug_assert!(!points.is_empty());
        Self { points }
    }

    fn check_year_span(&self, year: i32) -> Result<(), SeriesError> {
        let start = year_start(year)?;
        let end = start + Duration::days(days_in_year(year) as i64)
            - Duration::minutes(FINE_STEP_MINUTES);

        if self.start() != start {
            return Err(SeriesError::YearBoundary(format!(
                "series starts at {}, expected {start}",
                self.start()
            )));
        }
        if self.end() != end {
            return Err(SeriesError::YearBoundary(format!(
                "series ends at {}, expected {end}",
                self.end()
            )));
        }
        Ok(())
    }

    /// First sample timestamp.
    pub fn start(&self) -> NaiveDateTime {
        self.points[0].timestamp
    }

    /// Last sample timestamp.
    pub fn end(&self) -> NaiveDateTime {
        self.points[self.points.len() - 1].timestamp
    }

    /// Calendar year of the first sample.
    pub fn year(&self) -> i32 {
        self.start().year()
    }

    /// Number of samples.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false`; construction rejects empty input.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All samples in chronological order.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Sample values in chronological order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }

    /// Largest sample value, or 0.0 for an all-negative series floor.
    pub fn peak(&self) -> f64 {
        self.points.iter().map(|p| p.value).fold(f64::MIN, f64::max)
    }
}

/// Reads `timestamp,value` rows from a CSV file with a header line.
///
/// # Errors
///
/// Returns `Io` if the file cannot be opened and `Csv` if a record fails
/// to deserialize.
pub fn read_rows_csv(path: &Path) -> Result<Vec<RawRow>, SeriesError> {
    let file = std::fs::File::open(path)?;
    let mut rdr = csv::ReaderBuilder::new().from_reader(file);
    let mut rows = Vec::new();
    for record in rdr.deserialize() {
        rows.push(record?);
    }
    Ok(rows)
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    fn year_of_rows(year: i32, value_of: impl Fn(usize) -> f64) -> Vec<RawRow> {
        let start = year_start(year).unwrap();
        (0..expected_fine_samples(year))
            .map(|i| RawRow {
                timestamp: (start + Duration::minutes(FINE_STEP_MINUTES * i as i64))
                    .format(TIMESTAMP_FORMAT)
                    .to_string(),
                value: value_of(i),
            })
            .collect()
    }

    #[test]
    fn full_year_parses() {
        let rows = year_of_rows(2023, |i| i as f64);
        let series = TimestampedSeries::from_rows(&rows, 2023).unwrap();
        assert_eq!(series.len(), 365 * 288);
        assert_eq!(series.start(), year_start(2023).unwrap());
        assert_eq!(series.end().hour(), 23);
        assert_eq!(series.end().minute(), 55);
    }

    #[test]
    fn leap_year_expects_more_samples() {
        assert_eq!(expected_fine_samples(2024), 366 * 288);
        assert_eq!(expected_fine_samples(2023), 365 * 288);
    }

    #[test]
    fn missing_one_row_is_malformed() {
        let mut rows = year_of_rows(2023, |i| i as f64);
        rows.pop();
        let err = TimestampedSeries::from_rows(&rows, 2023).unwrap_err();
        assert!(matches!(err, SeriesError::MalformedSeries(_)));
    }

    #[test]
    fn gap_in_cadence_is_malformed() {
        let mut rows = year_of_rows(2023, |i| i as f64);
        // Remove an interior sample and duplicate the last to keep the count.
        rows.remove(100);
        rows.push(rows[rows.len() - 1].clone());
        let err = TimestampedSeries::from_rows(&rows, 2023).unwrap_err();
        assert!(matches!(err, SeriesError::MalformedSeries(_)));
    }

    #[test]
    fn wrong_year_is_boundary_error() {
        let rows = year_of_rows(2023, |i| i as f64);
        let err = TimestampedSeries::from_rows(&rows, 2024).unwrap_err();
        // 2024 is a leap year, so the count check fires first.
        assert!(matches!(err, SeriesError::MalformedSeries(_)));

        let rows = year_of_rows(2025, |i| i as f64);
        let err = TimestampedSeries::from_rows(&rows, 2023).unwrap_err();
        assert!(matches!(err, SeriesError::YearBoundary(_)));
    }

    #[test]
    fn unparseable_timestamp_is_malformed() {
        let mut rows = year_of_rows(2023, |i| i as f64);
        rows[7].timestamp = "not-a-date".into();
        let err = TimestampedSeries::from_rows(&rows, 2023).unwrap_err();
        assert!(matches!(err, SeriesError::MalformedSeries(_)));
    }

    #[test]
    fn from_points_rejects_empty() {
        let err = TimestampedSeries::from_points(Vec::new()).unwrap_err();
        assert!(matches!(err, SeriesError::MalformedSeries(_)));
    }

    #[test]
    fn peak_finds_largest_value() {
        let rows = year_of_rows(2023, |i| (i % 100) as f64);
        let series = TimestampedSeries::from_rows(&rows, 2023).unwrap();
        assert_eq!(series.peak(), 99.0);
    }
}
