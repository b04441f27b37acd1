//! CSV export for aligned series and stage dispatch results.

use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::Path;

use crate::results::StageResultSet;
use crate::timeseries::series::{SeriesPoint, TIMESTAMP_FORMAT};
use crate::timeseries::{HourlyAggregate, TimestampedSeries};

/// Column header for series export.
const SERIES_HEADER: &str = "timestamp,value";

/// Column header for dispatch export.
const DISPATCH_HEADER: &str = "stage,step,time_hr,unit,output_mw,committed";

/// Writes timestamped points as CSV to any writer.
///
/// Values are fixed to four decimals so identical inputs always produce
/// byte-identical output.
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_points_csv(points: &[SeriesPoint], writer: impl Write) -> io::Result<()> {
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(SERIES_HEADER.split(','))?;
    for p in points {
        wtr.write_record(&[
            p.timestamp.format(TIMESTAMP_FORMAT).to_string(),
            format!("{:.4}", p.value),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports a fine series to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_series_csv(series: &TimestampedSeries, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_points_csv(series.points(), BufWriter::new(file))
}

/// Exports an hourly aggregate to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_hourly_csv(hourly: &HourlyAggregate, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_points_csv(hourly.points(), BufWriter::new(file))
}

/// Writes one stage's dispatch rows as CSV to any writer.
///
/// # Arguments
///
/// * `results` - Stage rows in (step, unit) order
/// * `writer` - Destination implementing `Write`
///
/// # Errors
///
/// Returns an `io::Error` if writing fails.
pub fn write_dispatch_csv(results: &StageResultSet, writer: impl Write) -> io::Result<()> {
    let dt_hours = f64::from(results.resolution_minutes) / 60.0;
    let mut wtr = csv::WriterBuilder::new().from_writer(writer);
    wtr.write_record(DISPATCH_HEADER.split(','))?;
    for row in &results.rows {
        wtr.write_record(&[
            results.stage.clone(),
            row.step.to_string(),
            format!("{:.2}", row.step as f64 * dt_hours),
            row.unit.clone(),
            format!("{:.4}", row.output_mw),
            row.committed.to_string(),
        ])?;
    }
    wtr.flush()?;
    Ok(())
}

/// Exports one stage's dispatch rows to a CSV file at the given path.
///
/// # Errors
///
/// Returns an `io::Error` if file creation or writing fails.
pub fn export_dispatch_csv(results: &StageResultSet, path: &Path) -> io::Result<()> {
    let file = File::create(path)?;
    write_dispatch_csv(results, BufWriter::new(file))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::results::DispatchRow;
    use crate::timeseries::synthetic::demo_demand;
    use crate::timeseries::{HourlyStatistic, aggregate_to_hourly};

    fn demo_rows() -> StageResultSet {
        StageResultSet {
            stage: "uc".to_string(),
            resolution_minutes: 60,
            rows: (0..24)
                .map(|t| DispatchRow {
                    step: t,
                    unit: "alta".to_string(),
                    output_mw: 20.0 + t as f64,
                    committed: true,
                })
                .collect(),
        }
    }

    #[test]
    fn series_header_and_row_count() {
        let series = demo_demand(5).generate_year(2023).unwrap();
        let mut buf = Vec::new();
        write_points_csv(series.points(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(SERIES_HEADER));
        assert_eq!(lines.count(), 365 * 288);
    }

    #[test]
    fn hourly_export_is_parseable_and_aligned() {
        let series = demo_demand(5).generate_year(2023).unwrap();
        let hourly = aggregate_to_hourly(&series, HourlyStatistic::FirstSample).unwrap();
        let mut buf = Vec::new();
        write_points_csv(hourly.points(), &mut buf).unwrap();

        let mut rdr = csv::ReaderBuilder::new().from_reader(buf.as_slice());
        let mut count = 0;
        for record in rdr.records() {
            let rec = record.unwrap();
            assert!(rec[0].ends_with(":00:00"), "hour boundary expected: {}", &rec[0]);
            let value: Result<f64, _> = rec[1].parse();
            assert!(value.is_ok());
            count += 1;
        }
        assert_eq!(count, 8760);
    }

    #[test]
    fn dispatch_header_and_rows() {
        let mut buf = Vec::new();
        write_dispatch_csv(&demo_rows(), &mut buf).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let mut lines = text.lines();
        assert_eq!(lines.next(), Some(DISPATCH_HEADER));
        assert_eq!(lines.count(), 24);
    }

    #[test]
    fn deterministic_output() {
        let series = demo_demand(9).generate_year(2023).unwrap();
        let mut buf1 = Vec::new();
        let mut buf2 = Vec::new();
        write_points_csv(series.points(), &mut buf1).unwrap();
        write_points_csv(series.points(), &mut buf2).unwrap();
        assert_eq!(buf1, buf2);

        let rows = demo_rows();
        let mut d1 = Vec::new();
        let mut d2 = Vec::new();
        write_dispatch_csv(&rows, &mut d1).unwrap();
        write_dispatch_csv(&rows, &mut d2).unwrap();
        assert_eq!(d1, d2);
    }
}
