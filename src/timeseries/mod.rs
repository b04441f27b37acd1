//! Multi-resolution time-series alignment.
//!
//! One raw 5-minute series per calendar year is the unit of input. The
//! fine series feeds the economic-dispatch stage as-is; the hourly
//! aggregate, value-aligned to the canonical hour boundaries of the same
//! year, feeds the unit-commitment stage.

/// Half-hourly trace conversion to 5-minute cadence.
pub mod convert;
/// Hourly aggregation against the canonical calendar-hour sequence.
pub mod hourly;
pub mod series;
/// Seeded synthetic demo profiles.
pub mod synthetic;

pub use hourly::{HourlyAggregate, HourlyStatistic, aggregate_to_hourly, hour_sequence};
pub use series::{RawRow, SeriesError, SeriesPoint, TimestampedSeries, read_rows_csv};
