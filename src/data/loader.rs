use crate::data::bar::Bar;
use anyhow::{Context, Result};
use chrono::{DateTime, NaiveDate, NaiveDateTime, TimeZone, Utc};
use csv::ReaderBuilder;
use std::path::Path;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LoadError {
    #[error("Missing required column: {0}")]
    MissingColumn(&'static str),
    #[error("Unparseable timestamp: '{0}'")]
    BadTimestamp(String),
}

//resolved header positions for the logical ohlcv columns
#[derive(Debug)]
struct ColumnMap {
    date: usize,
    time: Option<usize>,
    open: usize,
    high: usize,
    low: usize,
    close: usize,
    volume: Option<usize>,
}

impl ColumnMap {
    //matches headers case-insensitively against a small synonym set
    fn from_headers(headers: &csv::StringRecord) -> Result<Self, LoadError> {
        let mut date = None;
        let mut time = None;
        let mut open = None;
        let mut high = None;
        let mut low = None;
        let mut close = None;
        let mut volume = None;

        for (idx, header) in headers.iter().enumerate() {
            let name = header.trim().to_lowercase();
            if name.contains("date") {
                date.get_or_insert(idx);
            } else if name.contains("time") {
                time.get_or_insert(idx);
            } else if name == "open" || name == "o" {
                open.get_or_insert(idx);
            } else if name == "high" || name == "h" {
                high.get_or_insert(idx);
            } else if name == "low" || name == "l" {
                low.get_or_insert(idx);
            } else if name == "close" || name == "c" {
                close.get_or_insert(idx);
            } else if name == "volume" || name == "vol" || name == "v" {
                volume.get_or_insert(idx);
            }
        }

        Ok(ColumnMap {
            date: date.ok_or(LoadError::MissingColumn("date"))?,
            time,
            open: open.ok_or(LoadError::MissingColumn("open"))?,
            high: high.ok_or(LoadError::MissingColumn("high"))?,
            low: low.ok_or(LoadError::MissingColumn("low"))?,
            close: close.ok_or(LoadError::MissingColumn("close"))?,
            volume,
        })
    }
}

//parses a timestamp cell: iso-like formats first, day-first on failure
fn parse_timestamp(raw: &str) -> Result<DateTime<Utc>, LoadError> {
    let raw = raw.trim();

    if let Ok(parsed) = DateTime::parse_from_rfc3339(raw) {
        return Ok(parsed.with_timezone(&Utc));
    }

    const DATETIME_FORMATS: [&str; 6] = [
        "%Y-%m-%d %H:%M:%S",
        "%Y-%m-%d %H:%M",
        "%Y/%m/%d %H:%M:%S",
        "%Y/%m/%d %H:%M",
        "%d/%m/%Y %H:%M:%S",
        "%d/%m/%Y %H:%M",
    ];
    for format in DATETIME_FORMATS {
        if let Ok(parsed) = NaiveDateTime::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&parsed));
        }
    }

    const DATE_FORMATS: [&str; 4] = ["%Y-%m-%d", "%Y/%m/%d", "%d/%m/%Y", "%d-%m-%Y"];
    for format in DATE_FORMATS {
        if let Ok(parsed) = NaiveDate::parse_from_str(raw, format) {
            return Ok(Utc.from_utc_datetime(&parsed.and_hms_opt(0, 0, 0).unwrap()));
        }
    }

    Err(LoadError::BadTimestamp(raw.to_string()))
}

fn parse_price(record: &csv::StringRecord, idx: usize, name: &str, line: usize) -> Result<f64> {
    let cell = record.get(idx).unwrap_or("");
    cell.trim()
        .parse::<f64>()
        .context(format!("Failed to parse {} '{}' at line {}", name, cell, line))
}

//loads bars from a csv file with flexible column naming
pub fn load_csv<P: AsRef<Path>>(path: P) -> Result<Vec<Bar>> {
    let path = path.as_ref();
    let mut reader = ReaderBuilder::new()
        .has_headers(true)
        .trim(csv::Trim::All)
        .from_path(path)
        .context(format!("Failed to open CSV file: {:?}", path))?;

    let headers = reader
        .headers()
        .context(format!("Failed to read CSV headers from {:?}", path))?
        .clone();
    let columns = ColumnMap::from_headers(&headers)?;

    let mut bars = Vec::new();

    for (index, result) in reader.records().enumerate() {
        let line = index + 2;
        let record = result.context(format!("Failed to read CSV record at line {}", line))?;

        //a separate time column is joined onto the date before parsing
        let date_cell = record.get(columns.date).unwrap_or("").to_string();
        let raw_timestamp = match columns.time {
            Some(time_idx) => format!("{} {}", date_cell, record.get(time_idx).unwrap_or("")),
            None => date_cell,
        };
        let timestamp = parse_timestamp(&raw_timestamp)
            .context(format!("Failed to parse timestamp at line {}", line))?;

        let open = parse_price(&record, columns.open, "open", line)?;
        let high = parse_price(&record, columns.high, "high", line)?;
        let low = parse_price(&record, columns.low, "low", line)?;
        let close = parse_price(&record, columns.close, "close", line)?;
        let volume = match columns.volume {
            Some(idx) => parse_price(&record, idx, "volume", line)?,
            None => 0.0,
        };

        let bar = Bar::new(timestamp, open, high, low, close, volume)
            .context(format!("Invalid OHLC values at line {}", line))?;
        bars.push(bar);
    }

    //sort by timestamp to ensure chronological order
    bars.sort_by(|a, b| a.timestamp.cmp(&b.timestamp));

    Ok(bars)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn write_csv(contents: &str) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents.as_bytes()).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn loads_standard_headers() {
        let file = write_csv(
            "Date,Open,High,Low,Close,Volume\n\
             2024-01-02,100,105,99,104,1500\n\
             2024-01-01,99,101,98,100,1200\n",
        );

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 2);
        //rows come back sorted by timestamp
        assert_eq!(bars[0].close, 100.0);
        assert_eq!(bars[1].close, 104.0);
        assert_eq!(bars[1].volume, 1500.0);
    }

    #[test]
    fn maps_short_synonym_headers() {
        let file = write_csv(
            "trade_date,o,h,l,c,vol\n\
             2024-03-05,10,11,9,10.5,42\n",
        );

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars.len(), 1);
        assert_eq!(bars[0].high, 11.0);
        assert_eq!(bars[0].volume, 42.0);
    }

    #[test]
    fn joins_separate_time_column() {
        let file = write_csv(
            "date,time,open,high,low,close\n\
             2024-01-01,09:30:00,1,2,0.5,1.5\n",
        );

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars[0].timestamp.to_rfc3339(), "2024-01-01T09:30:00+00:00");
        //volume column absent, defaults to zero
        assert_eq!(bars[0].volume, 0.0);
    }

    #[test]
    fn falls_back_to_day_first_dates() {
        let file = write_csv(
            "date,open,high,low,close\n\
             25/12/2023,1,2,0.5,1.5\n",
        );

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars[0].timestamp.to_rfc3339(), "2023-12-25T00:00:00+00:00");
    }

    #[test]
    fn parses_slash_dates_with_time() {
        let file = write_csv(
            "date,open,high,low,close\n\
             2024/01/02 09:30:00,1,2,0.5,1.5\n",
        );

        let bars = load_csv(file.path()).unwrap();
        assert_eq!(bars[0].timestamp.to_rfc3339(), "2024-01-02T09:30:00+00:00");
    }

    #[test]
    fn missing_close_column_is_fatal() {
        let file = write_csv("date,open,high,low\n2024-01-01,1,2,0.5\n");
        assert!(load_csv(file.path()).is_err());
    }

    #[test]
    fn invalid_ohlc_row_is_fatal() {
        //high below low on the second data row
        let file = write_csv(
            "date,open,high,low,close\n\
             2024-01-01,1,2,0.5,1.5\n\
             2024-01-02,1,0.5,2,1.5\n",
        );
        assert!(load_csv(file.path()).is_err());
    }

    #[test]
    fn negative_volume_row_is_fatal() {
        let file = write_csv(
            "date,open,high,low,close,volume\n\
             2024-01-01,1,2,0.5,1.5,-10\n",
        );
        assert!(load_csv(file.path()).is_err());
    }

    #[test]
    fn unparseable_timestamp_is_fatal() {
        let file = write_csv("date,open,high,low,close\nnot-a-date,1,2,0.5,1.5\n");
        assert!(load_csv(file.path()).is_err());
    }
}
