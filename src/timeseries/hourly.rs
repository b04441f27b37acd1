//! Hourly aggregation against the canonical calendar-hour sequence.

use std::fmt;
use std::str::FromStr;

use chrono::{Duration, NaiveDateTime, Timelike};
use serde::Deserialize;

use super::series::{
    SeriesError, SeriesPoint, TimestampedSeries, days_in_year, year_start,
};

/// Statistic used to collapse the 12 fine samples of one hour.
///
/// The source system labeled its aggregation as an average while actually
/// taking the sample at the top of the hour; both behaviors are kept
/// selectable, with the observed one as default.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum HourlyStatistic {
    /// Value recorded at minute 0 of the hour.
    #[default]
    #[serde(rename = "first", alias = "first_sample")]
    FirstSample,
    /// Arithmetic mean of the hour's samples.
    Mean,
}

impl HourlyStatistic {
    /// Short label used in reports and CLI parsing.
    pub fn label(&self) -> &'static str {
        match self {
            Self::FirstSample => "first",
            Self::Mean => "mean",
        }
    }
}

impl fmt::Display for HourlyStatistic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

impl FromStr for HourlyStatistic {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "first" => Ok(Self::FirstSample),
            "mean" => Ok(Self::Mean),
            other => Err(format!("unknown statistic \"{other}\", expected first or mean")),
        }
    }
}

/// Hour-boundary timestamps of a calendar year: Jan 1 00:00 through
/// Dec 31 23:00, step one hour. 8760 entries, 8784 in a leap year.
///
/// # Errors
///
/// Returns `YearBoundary` if `year` is outside the representable range.
pub fn hour_sequence(year: i32) -> Result<Vec<NaiveDateTime>, SeriesError> {
    let start = year_start(year)?;
    let hours = days_in_year(year) * 24;
    Ok((0..hours)
        .map(|h| start + Duration::hours(h as i64))
        .collect())
}

/// An hourly series value-aligned to the canonical hour boundaries.
#[derive(Debug, Clone, PartialEq)]
pub struct HourlyAggregate {
    points: Vec<SeriesPoint>,
}

impl HourlyAggregate {
    /// Number of hourly entries.
    pub fn len(&self) -> usize {
        self.points.len()
    }

    /// Always `false` once constructed.
    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    /// All entries in chronological order.
    pub fn points(&self) -> &[SeriesPoint] {
        &self.points
    }

    /// Hourly values in chronological order.
    pub fn values(&self) -> impl Iterator<Item = f64> + '_ {
        self.points.iter().map(|p| p.value)
    }
}

/// Collapses a fine series into one value per calendar hour.
///
/// Samples are grouped by the hour field of their timestamps rather than
/// by fixed-count windows, then reduced with `statistic`. The output
/// timestamps are generated independently from the series' calendar year,
/// so the result has exactly one entry per hour of that year or the call
/// fails.
///
/// # Errors
///
/// Returns `LengthMismatch` if the number of hour groups differs from the
/// canonical hour count of the year (for example when a partial final
/// hour is missing), and `YearBoundary` if the year itself is invalid.
pub fn aggregate_to_hourly(
    series: &TimestampedSeries,
    statistic: HourlyStatistic,
) -> Result<HourlyAggregate, SeriesError> {
    let hours = hour_sequence(series.year())?;

    let mut values: Vec<f64> = Vec::with_capacity(hours.len());
    let mut bucket: Vec<f64> = Vec::with_capacity(12);
    let mut current: Option<NaiveDateTime> = None;

    for point in series.points() {
        let hour = point.timestamp.with_minute(0).and_then(|t| t.with_second(0));
        let Some(hour) = hour else {
            continue;
        };
        match current {
            Some(open) if open == hour => bucket.push(point.value),
            Some(_) => {
                values.push(reduce(&bucket, statistic));
                bucket.clear();
                bucket.push(point.value);
                current = Some(hour);
            }
            None => {
                bucket.push(point.value);
                current = Some(hour);
            }
        }
    }
    if !bucket.is_empty() {
        values.push(reduce(&bucket, statistic));
    }

    if values.len() != hours.len() {
        return Err(SeriesError::LengthMismatch {
            expected: hours.len(),
            produced: values.len(),
        });
    }

    let points = hours
        .into_iter()
        .zip(values)
        .map(|(timestamp, value)| SeriesPoint { timestamp, value })
        .collect();
    Ok(HourlyAggregate { points })
}

fn reduce(bucket: &[f64], statistic: HourlyStatistic) -> f64 {
    match statistic {
        HourlyStatistic::FirstSample => bucket[0],
        HourlyStatistic::Mean => bucket.iter().sum::<f64>() / bucket.len() as f64,
    }
}
