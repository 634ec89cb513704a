//! Historical close-price series and CSV loading.

use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, NaiveTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, warn};

/// A single close price at a point in time.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct PriceBar {
    pub timestamp: DateTime<Utc>,
    pub close: Decimal,
}

/// Close prices ordered by timestamp.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct PriceSeries {
    bars: Vec<PriceBar>,
}

impl PriceSeries {
    /// Build a series, sorting bars by timestamp.
    pub fn new(mut bars: Vec<PriceBar>) -> Self {
        bars.sort_by_key(|b| b.timestamp);
        Self { bars }
    }

    pub fn bars(&self) -> &[PriceBar] {
        &self.bars
    }

    pub fn len(&self) -> usize {
        self.bars.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bars.is_empty()
    }

    pub fn closes(&self) -> Vec<Decimal> {
        self.bars.iter().map(|b| b.close).collect()
    }

    pub fn timestamps(&self) -> Vec<DateTime<Utc>> {
        self.bars.iter().map(|b| b.timestamp).collect()
    }

    /// First and last timestamp in the series.
    pub fn range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        match (self.bars.first(), self.bars.last()) {
            (Some(first), Some(last)) => Some((first.timestamp, last.timestamp)),
            _ => None,
        }
    }

    pub fn min_close(&self) -> Option<Decimal> {
        self.bars.iter().map(|b| b.close).min()
    }

    pub fn max_close(&self) -> Option<Decimal> {
        self.bars.iter().map(|b| b.close).max()
    }

    pub fn last_close(&self) -> Option<Decimal> {
        self.bars.last().map(|b| b.close)
    }

    /// Bars within `[start, end]`.
    pub fn between(&self, start: DateTime<Utc>, end: DateTime<Utc>) -> Self {
        Self {
            bars: self
                .bars
                .iter()
                .filter(|b| b.timestamp >= start && b.timestamp <= end)
                .copied()
                .collect(),
        }
    }
}

/// Anything that can hand over a close-price series for display.
pub trait PriceSource {
    /// Load the full series.
    fn load_series(&self) -> Result<PriceSeries>;

    /// Get the available date range in the data.
    fn available_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)>;
}

/// CSV close-price loader.
///
/// Accepts a two-column file:
/// ```csv
/// timestamp,close
/// 2024-01-02T00:00:00Z,70.38
/// ```
/// or any export whose header names a `close` column and a `date` /
/// `timestamp` column, such as `Date,Open,High,Low,Close,Adj Close,Volume`.
/// Without a header the first two columns are read as timestamp and close.
#[derive(Debug, Clone)]
pub struct CsvPriceLoader {
    series: PriceSeries,
}

impl CsvPriceLoader {
    /// Load data from a CSV file.
    pub fn new<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read CSV file: {}", path.display()))?;

        Self::from_csv_content(&content)
    }

    /// Load data from CSV content string.
    pub fn from_csv_content(content: &str) -> Result<Self> {
        let mut lines = content
            .lines()
            .enumerate()
            .filter(|(_, line)| !line.trim().is_empty())
            .peekable();

        let layout = match lines.peek() {
            Some((_, first)) => ColumnLayout::detect(first)?,
            None => anyhow::bail!("CSV file contains no data rows"),
        };
        if layout.has_header {
            lines.next();
        }

        let mut bars = Vec::new();
        let mut skipped = 0usize;

        for (line_num, line) in lines {
            match layout
                .parse_row(line)
                .with_context(|| format!("Failed to parse line {}: {}", line_num + 1, line))?
            {
                Some(bar) => bars.push(bar),
                None => skipped += 1,
            }
        }

        if skipped > 0 {
            warn!(skipped, "Skipped rows without a close price");
        }

        if bars.is_empty() {
            anyhow::bail!("CSV file contains no data rows");
        }

        debug!(bars = bars.len(), "Loaded price series");

        Ok(Self {
            series: PriceSeries::new(bars),
        })
    }

    pub fn series(&self) -> &PriceSeries {
        &self.series
    }

    pub fn into_series(self) -> PriceSeries {
        self.series
    }
}

impl PriceSource for CsvPriceLoader {
    fn load_series(&self) -> Result<PriceSeries> {
        Ok(self.series.clone())
    }

    fn available_range(&self) -> Option<(DateTime<Utc>, DateTime<Utc>)> {
        self.series.range()
    }
}

/// Where the timestamp and close columns live.
#[derive(Debug, Clone, Copy)]
struct ColumnLayout {
    has_header: bool,
    timestamp_idx: usize,
    close_idx: usize,
}

impl ColumnLayout {
    fn detect(first_line: &str) -> Result<Self> {
        let fields: Vec<&str> = first_line.split(',').map(str::trim).collect();

        if parse_timestamp(fields[0]).is_ok() {
            anyhow::ensure!(
                fields.len() >= 2,
                "Expected at least 2 columns (timestamp,close), got {}",
                fields.len()
            );
            return Ok(Self {
                has_header: false,
                timestamp_idx: 0,
                close_idx: 1,
            });
        }

        let position = |names: &[&str]| {
            fields
                .iter()
                .position(|f| names.iter().any(|n| f.eq_ignore_ascii_case(n)))
        };

        let close_idx = position(&["close"]).context("CSV header has no 'close' column")?;
        let timestamp_idx = position(&["timestamp", "date", "datetime", "time"]).unwrap_or(0);

        Ok(Self {
            has_header: true,
            timestamp_idx,
            close_idx,
        })
    }

    /// Parse one row; `Ok(None)` for rows with a blank or null close.
    fn parse_row(&self, line: &str) -> Result<Option<PriceBar>> {
        let parts: Vec<&str> = line.split(',').map(str::trim).collect();
        let needed = self.timestamp_idx.max(self.close_idx) + 1;
        if parts.len() < needed {
            anyhow::bail!("Expected at least {} columns, got {}", needed, parts.len());
        }

        let raw_close = parts[self.close_idx];
        if raw_close.is_empty() || raw_close.eq_ignore_ascii_case("null") {
            return Ok(None);
        }

        let timestamp = parse_timestamp(parts[self.timestamp_idx])?;
        let close: Decimal = raw_close
            .parse()
            .with_context(|| format!("Invalid close: {}", raw_close))?;

        Ok(Some(PriceBar { timestamp, close }))
    }
}

/// RFC 3339, `YYYY-MM-DD HH:MM:SS`, or a bare `YYYY-MM-DD` (midnight UTC).
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>> {
    if let Ok(ts) = DateTime::parse_from_rfc3339(raw) {
        return Ok(ts.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Ok(naive.and_utc());
    }
    let date = NaiveDate::parse_from_str(raw, "%Y-%m-%d")
        .with_context(|| format!("Invalid timestamp: {}", raw))?;
    Ok(date.and_time(NaiveTime::MIN).and_utc())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;
    use rust_decimal_macros::dec;

    #[test]
    fn test_two_column_csv() {
        let csv = r#"timestamp,close
2024-01-02T00:00:00Z,70.38
2024-01-03T00:00:00Z,72.70
2024-01-04T00:00:00Z,72.19
"#;

        let loader = CsvPriceLoader::from_csv_content(csv).unwrap();
        let series = loader.series();

        assert_eq!(series.len(), 3);
        assert_eq!(series.closes(), vec![dec!(70.38), dec!(72.70), dec!(72.19)]);

        let range = loader.available_range().unwrap();
        assert_eq!(range.0, Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap());
        assert_eq!(range.1, Utc.with_ymd_and_hms(2024, 1, 4, 0, 0, 0).unwrap());
    }

    #[test]
    fn test_ohlc_export_with_null_rows() {
        let csv = r#"Date,Open,High,Low,Close,Adj Close,Volume
2024-01-03,70.50,73.10,70.20,72.70,72.70,310000
2024-01-02,71.60,73.00,70.00,70.38,70.38,300000
2024-01-04,null,null,null,null,null,null
"#;

        let series = CsvPriceLoader::from_csv_content(csv).unwrap().into_series();

        // Sorted by timestamp, null row dropped
        assert_eq!(series.len(), 2);
        assert_eq!(series.closes(), vec![dec!(70.38), dec!(72.70)]);
        assert_eq!(series.min_close(), Some(dec!(70.38)));
        assert_eq!(series.max_close(), Some(dec!(72.70)));
        assert_eq!(series.last_close(), Some(dec!(72.70)));
    }

    #[test]
    fn test_headerless_csv() {
        let csv = "2024-01-02 16:00:00,1.0950\n2024-01-03 16:00:00,1.0921\n";
        let series = CsvPriceLoader::from_csv_content(csv).unwrap().into_series();

        assert_eq!(series.len(), 2);
        assert_eq!(
            series.bars()[0].timestamp,
            Utc.with_ymd_and_hms(2024, 1, 2, 16, 0, 0).unwrap()
        );
    }

    #[test]
    fn test_bad_close_reports_line() {
        let csv = "timestamp,close\n2024-01-02,70.38\n2024-01-03,abc\n";
        let err = CsvPriceLoader::from_csv_content(csv).unwrap_err();
        assert!(format!("{:#}", err).contains("line 3"));
    }

    #[test]
    fn test_missing_close_column() {
        let csv = "Date,Open,High\n2024-01-02,1,2\n";
        assert!(CsvPriceLoader::from_csv_content(csv).is_err());
    }

    #[test]
    fn test_empty_content() {
        assert!(CsvPriceLoader::from_csv_content("").is_err());
        assert!(CsvPriceLoader::from_csv_content("timestamp,close\n").is_err());
    }

    #[test]
    fn test_between_filters_inclusive() {
        let csv = "timestamp,close\n2024-01-01,1\n2024-01-02,2\n2024-01-03,3\n";
        let series = CsvPriceLoader::from_csv_content(csv).unwrap().into_series();

        let start = Utc.with_ymd_and_hms(2024, 1, 2, 0, 0, 0).unwrap();
        let end = Utc.with_ymd_and_hms(2024, 1, 3, 0, 0, 0).unwrap();
        assert_eq!(series.between(start, end).closes(), vec![dec!(2), dec!(3)]);
    }
}
