//! Write generated datasets to CSV

use super::SyntheticData;
use crate::error::{RiskError, Result};
use crate::portfolio::{drawdown_series, ReturnSeries};
use chrono::NaiveDate;
use csv::Writer;
use serde::Serialize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

/// One row of the market series file
#[derive(Debug, Clone, Serialize)]
pub struct MarketRow {
    pub date: Option<NaiveDate>,
    pub ret: f64,
    pub portfolio: f64,
    pub drawdown: f64,
}

pub fn market_rows(series: &ReturnSeries) -> Vec<MarketRow> {
    let drawdowns = drawdown_series(series.values());
    series
        .returns()
        .iter()
        .zip(series.values())
        .zip(drawdowns)
        .enumerate()
        .map(|(i, ((&ret, &portfolio), drawdown))| MarketRow {
            date: series.dates().get(i).copied(),
            ret,
            portfolio,
            drawdown,
        })
        .collect()
}

/// Serialize `records` with a header row; returns the number of records written
pub fn write_records<W, T>(writer: W, records: &[T]) -> Result<usize>
where
    W: io::Write,
    T: Serialize,
{
    let mut csv_writer = Writer::from_writer(writer);
    for record in records {
        csv_writer
            .serialize(record)
            .map_err(|e| RiskError::Export(e.to_string()))?;
    }
    csv_writer.flush().map_err(|e| RiskError::Export(e.to_string()))?;
    Ok(records.len())
}

fn write_file<T: Serialize>(dir: &Path, name: &str, records: &[T]) -> Result<PathBuf> {
    let path = dir.join(name);
    let file = fs::File::create(&path)
        .map_err(|e| RiskError::Export(format!("{}: {}", path.display(), e)))?;
    write_records(file, records)?;
    Ok(path)
}

/// Write credit, transaction, policy and market files into `dir`
pub fn export_all(data: &SyntheticData, dir: &Path) -> Result<Vec<PathBuf>> {
    fs::create_dir_all(dir).map_err(|e| RiskError::Export(format!("{}: {}", dir.display(), e)))?;
    Ok(vec![
        write_file(dir, "credit.csv", &data.credit)?,
        write_file(dir, "transactions.csv", &data.transactions)?,
        write_file(dir, "policies.csv", &data.policies)?,
        write_file(dir, "market.csv", &market_rows(&data.market))?,
    ])
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::synthetic::{generate, DatasetSizes};

    fn sample() -> SyntheticData {
        let sizes = DatasetSizes {
            credit: 25,
            transactions: 40,
            policies: 30,
            market_days: 22,
        };
        let end = NaiveDate::from_ymd_opt(2024, 3, 29).unwrap();
        generate(5, &sizes, 1_000_000.0, end).unwrap()
    }

    #[test]
    fn test_write_records_header_and_rows() {
        let data = sample();
        let mut buffer = Vec::new();
        let written = write_records(&mut buffer, &data.transactions).unwrap();
        assert_eq!(written, 40);

        let text = String::from_utf8(buffer).unwrap();
        let mut lines = text.lines();
        assert!(lines.next().unwrap().starts_with("txn_id,amount,hour,merch_risk"));
        assert_eq!(lines.count(), 40);
        assert!(text.contains("TXN000039"));
    }

    #[test]
    fn test_market_rows_align() {
        let data = sample();
        let rows = market_rows(&data.market);
        assert_eq!(rows.len(), 22);
        assert!(rows.iter().all(|r| r.date.is_some() && r.drawdown <= 0.0));
    }

    #[test]
    fn test_export_all_creates_files() {
        let dir = std::env::temp_dir().join(format!("risksight-export-{}", std::process::id()));
        let paths = export_all(&sample(), &dir).unwrap();
        assert_eq!(paths.len(), 4);
        for path in &paths {
            assert!(path.exists(), "{} missing", path.display());
        }
        let mut reader = csv::Reader::from_path(dir.join("policies.csv")).unwrap();
        assert_eq!(reader.records().count(), 30);
        fs::remove_dir_all(&dir).unwrap();
    }
}
