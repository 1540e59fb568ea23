use crate::error::StorageError;
use crate::naming::RunOutputs;
use rolling::{RollingReport, WindowTable};
use serde::Serialize;
use std::io::Write;
use std::path::PathBuf;

/// Writes the tables of a rolling report as CSV files, named by `RunOutputs`.
#[derive(Debug, Clone)]
pub struct CsvRepository {
    outputs: RunOutputs,
}

impl CsvRepository {
    /// Creates the output directory if it does not exist yet.
    pub fn new(outputs: RunOutputs) -> Result<Self, StorageError> {
        std::fs::create_dir_all(outputs.dir()).map_err(|source| StorageError::Io {
            path: outputs.dir().to_path_buf(),
            source,
        })?;
        Ok(Self { outputs })
    }

    pub fn outputs(&self) -> &RunOutputs {
        &self.outputs
    }

    /// Saves every table of the report and returns the written paths.
    pub fn save_report(&self, report: &RollingReport) -> Result<Vec<PathBuf>, StorageError> {
        let mut written = Vec::with_capacity(4);

        let path = self.outputs.path("returns", "csv");
        write_window_table(csv::Writer::from_path(&path)?, &report.returns)?;
        written.push(path);

        let path = self.outputs.path("ann_returns", "csv");
        write_window_table(csv::Writer::from_path(&path)?, &report.annualized_returns)?;
        written.push(path);

        let path = self.outputs.path("bust_summary", "csv");
        write_rows(csv::Writer::from_path(&path)?, &report.bust_summary)?;
        written.push(path);

        if let Some(summary) = &report.summary {
            let path = self.outputs.path("summary_stats", "csv");
            write_rows(csv::Writer::from_path(&path)?, summary)?;
            written.push(path);
        }

        tracing::info!(run_id = %report.run_id, files = written.len(), "Saved result tables");
        Ok(written)
    }
}

/// One field of a window-table record. Values go through the same serializer as the
/// bust and summary rows, so every table writes numbers alike (`0.0`, `-0.5`).
#[derive(Serialize)]
#[serde(untagged)]
enum Cell<'a> {
    Label(&'a str),
    Value(f64),
}

/// Writes a returns-shaped table: label columns first, then one column per result column.
pub fn write_window_table<W: Write>(
    mut writer: csv::Writer<W>,
    table: &WindowTable,
) -> Result<(), StorageError> {
    writer.write_record(table.headers())?;
    for row in &table.rows {
        let mut record = Vec::with_capacity(row.values.len() + 2);
        record.push(Cell::Label(&row.start_label));
        record.push(Cell::Label(&row.end_label));
        record.extend(row.values.iter().copied().map(Cell::Value));
        writer.serialize(&record)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

/// Writes serializable rows; the field names become the header.
pub fn write_rows<W: Write, T: Serialize>(
    mut writer: csv::Writer<W>,
    rows: &[T],
) -> Result<(), StorageError> {
    for row in rows {
        writer.serialize(row)?;
    }
    writer.flush().map_err(csv::Error::from)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use core_types::Window;
    use rolling::{BustSummaryRow, WindowRow};

    fn into_string(write: impl FnOnce(csv::Writer<&mut Vec<u8>>)) -> String {
        let mut buffer = Vec::new();
        write(csv::Writer::from_writer(&mut buffer));
        String::from_utf8(buffer).unwrap()
    }

    #[test]
    fn window_table_has_label_columns_first() {
        let table = WindowTable {
            start_header: "start_date".to_string(),
            end_header: "end_date".to_string(),
            columns: vec!["portfolio_1x".to_string(), "underlying".to_string()],
            rows: vec![WindowRow {
                window: Window::new(0, 1),
                start_label: "day1".to_string(),
                end_label: "day2".to_string(),
                values: vec![1.0, -0.5],
            }],
        };

        let text = into_string(|w| write_window_table(w, &table).unwrap());
        assert_eq!(
            text,
            "start_date,end_date,portfolio_1x,underlying\nday1,day2,1.0,-0.5\n"
        );
    }

    #[test]
    fn bust_summary_header_comes_from_field_names() {
        let rows = vec![
            BustSummaryRow {
                leverage: "1".to_string(),
                bust_ratio: 0.0,
            },
            BustSummaryRow {
                leverage: "10".to_string(),
                bust_ratio: 1.0,
            },
        ];

        let text = into_string(|w| write_rows(w, &rows).unwrap());
        assert_eq!(text, "leverage,bust_ratio\n1,0.0\n10,1.0\n");
    }

    #[test]
    fn window_and_bust_tables_share_one_number_format() {
        let table = WindowTable {
            start_header: "start_date".to_string(),
            end_header: "end_date".to_string(),
            columns: vec!["portfolio_10x".to_string()],
            rows: vec![WindowRow {
                window: Window::new(0, 1),
                start_label: "1".to_string(),
                end_label: "2".to_string(),
                values: vec![0.0],
            }],
        };
        let rows = vec![BustSummaryRow {
            leverage: "10".to_string(),
            bust_ratio: 0.0,
        }];

        let window_text = into_string(|w| write_window_table(w, &table).unwrap());
        let bust_text = into_string(|w| write_rows(w, &rows).unwrap());

        let window_value = window_text.lines().nth(1).unwrap().rsplit(',').next().unwrap();
        let bust_value = bust_text.lines().nth(1).unwrap().rsplit(',').next().unwrap();
        assert_eq!(window_value, "0.0");
        assert_eq!(window_value, bust_value);
    }
}
