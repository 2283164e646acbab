use chrono::NaiveDate;
use pretty_assertions::assert_eq;
use price_forecast::source::{CsvPriceSource, PriceSource};
use price_forecast::ForecastError;
use std::fs;
use std::io::Write;
use tempfile::{tempdir, NamedTempFile};

fn write_file(dir: &std::path::Path, name: &str, body: &str) {
    fs::write(dir.join(name), body).unwrap();
}

#[test]
fn test_reads_symbol_file() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "AAPL.csv",
        "Date,Open,High,Low,Close,Volume\n\
         2023-01-03,130.0,131.0,124.0,125.07,112117500\n\
         2023-01-04,126.0,128.0,125.0,126.36,89113600\n\
         2023-01-05,127.0,127.7,124.7,125.02,80962700\n",
    );

    let source = CsvPriceSource::new(dir.path());
    let series = source.fetch_series("aapl").unwrap();

    assert_eq!(series.len(), 3);
    assert_eq!(series.first_date(), NaiveDate::from_ymd_opt(2023, 1, 3));
    assert_eq!(series.prices(), vec![125.07, 126.36, 125.02]);
}

#[test]
fn test_rows_are_sorted_and_blank_closes_skipped() {
    let dir = tempdir().unwrap();
    write_file(
        dir.path(),
        "MSFT.csv",
        "date,close\n2023-02-03,12.5\n2023-02-01,10.0\n2023-02-02,\n2023-02-06,null\n",
    );

    let series = CsvPriceSource::new(dir.path()).fetch_series("MSFT").unwrap();
    assert_eq!(series.prices(), vec![10.0, 12.5]);
    assert_eq!(series.last_date(), NaiveDate::from_ymd_opt(2023, 2, 3));
}

#[test]
fn test_adj_close_fallback() {
    let mut file = NamedTempFile::new().unwrap();
    writeln!(file, "Date,Adj Close").unwrap();
    writeln!(file, "2023-01-01 00:00:00,100.5").unwrap();
    writeln!(file, "2023-01-02 00:00:00,101.5").unwrap();

    let series = CsvPriceSource::read_file(file.path()).unwrap();
    assert_eq!(series.prices(), vec![100.5, 101.5]);
}

#[test]
fn test_missing_file_is_upstream_unavailable() {
    let dir = tempdir().unwrap();
    let err = CsvPriceSource::new(dir.path())
        .fetch_series("nope")
        .unwrap_err();

    assert!(err.is_retryable());
    match err {
        ForecastError::UpstreamDataUnavailable { symbol, .. } => assert_eq!(symbol, "NOPE"),
        other => panic!("unexpected error: {:?}", other),
    }
}

#[test]
fn test_empty_file_is_upstream_unavailable() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "EMPTY.csv", "date,close\n");

    let err = CsvPriceSource::new(dir.path())
        .fetch_series("EMPTY")
        .unwrap_err();
    assert!(matches!(err, ForecastError::UpstreamDataUnavailable { .. }));
}

#[test]
fn test_missing_close_column() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "X.csv", "date,open\n2023-01-01,1.0\n");

    let err = CsvPriceSource::new(dir.path()).fetch_series("x").unwrap_err();
    assert!(matches!(err, ForecastError::UpstreamDataUnavailable { .. }));
}

#[test]
fn test_bad_rows_are_data_errors() {
    let dir = tempdir().unwrap();
    write_file(dir.path(), "BAD.csv", "date,close\n2023-01-01,abc\n");
    let err = CsvPriceSource::new(dir.path()).fetch_series("bad").unwrap_err();
    assert!(matches!(err, ForecastError::DataError(_)));

    write_file(dir.path(), "DUP.csv", "date,close\n2023-01-01,1\n2023-01-01,2\n");
    let err = CsvPriceSource::new(dir.path()).fetch_series("dup").unwrap_err();
    assert!(matches!(err, ForecastError::DataError(_)));
}
