// 📤 Series Export - Monthly samples to CSV
// Writes one phase's series as rows for spreadsheet review. Months past
// the data date export empty ev/ac cells.

use crate::curve::MonthlySample;
use anyhow::{Context, Result};
use std::io::Write;
use std::path::Path;

const HEADERS: [&str; 5] = ["month", "month_index", "pv", "ev", "ac"];

/// Write a series as CSV to any writer.
pub fn write_series_csv<W: Write>(writer: W, series: &[MonthlySample]) -> Result<()> {
    let mut wtr = csv::Writer::from_writer(writer);
    wtr.write_record(HEADERS)?;

    for sample in series {
        wtr.write_record(&[
            sample.month.clone(),
            sample.month_index.to_string(),
            sample.pv.to_string(),
            sample.ev.map(|v| v.to_string()).unwrap_or_default(),
            sample.ac.map(|v| v.to_string()).unwrap_or_default(),
        ])?;
    }

    wtr.flush()?;
    Ok(())
}

/// Write a series as a CSV file at the given path.
pub fn export_series(path: &Path, series: &[MonthlySample]) -> Result<()> {
    let file = std::fs::File::create(path)
        .with_context(|| format!("failed to create export file {:?}", path))?;
    write_series_csv(file, series)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::ProjectConfig;
    use crate::curve::CurveGenerator;

    #[test]
    fn test_csv_has_header_and_one_row_per_month() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);
        let series = gen.phase_series("PESA").unwrap();

        let mut buf = Vec::new();
        write_series_csv(&mut buf, &series).unwrap();
        let text = String::from_utf8(buf).unwrap();
        let lines: Vec<&str> = text.lines().collect();

        assert_eq!(lines.len(), 1 + config.horizon_months as usize);
        assert_eq!(lines[0], "month,month_index,pv,ev,ac");
    }

    #[test]
    fn test_unreported_months_export_empty_cells() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);
        let series = gen.phase_series("PM").unwrap();

        let mut buf = Vec::new();
        write_series_csv(&mut buf, &series).unwrap();
        let text = String::from_utf8(buf).unwrap();

        // First month past the data date: pv present, ev/ac empty
        let row = text
            .lines()
            .nth(1 + config.data_date as usize + 1)
            .unwrap();
        let cells: Vec<&str> = row.split(',').collect();
        assert!(!cells[2].is_empty());
        assert!(cells[3].is_empty());
        assert!(cells[4].is_empty());
    }

    #[test]
    fn test_reported_months_export_all_values() {
        let config = ProjectConfig::demo();
        let gen = CurveGenerator::new(&config);
        let series = gen.phase_series("ALL").unwrap();

        let mut buf = Vec::new();
        write_series_csv(&mut buf, &series).unwrap();
        let text = String::from_utf8(buf).unwrap();

        let row = text.lines().nth(1 + config.data_date as usize).unwrap();
        let cells: Vec<&str> = row.split(',').collect();
        assert_eq!(cells.len(), 5);
        assert!(!cells[3].is_empty());
        assert!(!cells[4].is_empty());
    }
}
