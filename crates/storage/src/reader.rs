use crate::error::StorageError;
use configuration::DataSettings;
use core_types::{Label, Observation, ObservationSeries};
use std::fs::File;
use std::io::Read;
use std::path::Path;

/// Loads the observation file at `path` using the column names in `data`.
pub fn load_observations(path: &Path, data: &DataSettings) -> Result<ObservationSeries, StorageError> {
    let file = File::open(path).map_err(|source| StorageError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    tracing::info!(path = %path.display(), "Loading observations");
    read_observations(file, data)
}

/// Parses observations from any CSV source.
///
/// Every referenced column must be present in the header; this is checked before the first
/// row is read. An empty dividend cell counts as no dividend paid (0.0). The result is sorted
/// by label.
pub fn read_observations<R: Read>(
    source: R,
    data: &DataSettings,
) -> Result<ObservationSeries, StorageError> {
    let mut reader = csv::ReaderBuilder::new()
        .trim(csv::Trim::All)
        .from_reader(source);

    let headers = reader.headers()?.clone();
    let locate = |column: &str| {
        headers
            .iter()
            .position(|header| header == column)
            .ok_or_else(|| StorageError::MissingColumn {
                column: column.to_string(),
            })
    };
    let date_idx = locate(&data.date_column)?;
    let price_idx = locate(&data.price_column)?;
    let dividend = match data.dividend_column.as_deref() {
        Some(column) => Some((locate(column)?, column)),
        None => None,
    };

    let mut observations = Vec::new();
    for (offset, record) in reader.records().enumerate() {
        let record = record?;
        let row = offset + 1;
        let field = |idx: usize| record.get(idx).unwrap_or_default();

        let price = parse_number(field(price_idx), row, &data.price_column)?;
        let mut observation = Observation::new(Label::parse(field(date_idx)), price);

        if let Some((idx, column)) = dividend {
            let raw = field(idx);
            let amount = if raw.is_empty() {
                0.0
            } else {
                parse_number(raw, row, column)?
            };
            observation = observation.with_dividend(amount);
        }
        observations.push(observation);
    }

    if observations.is_empty() {
        return Err(StorageError::Empty);
    }
    tracing::debug!(rows = observations.len(), "Parsed observation rows");

    Ok(ObservationSeries::from_unsorted(observations)?)
}

fn parse_number(raw: &str, row: usize, column: &str) -> Result<f64, StorageError> {
    raw.parse::<f64>().map_err(|_| StorageError::InvalidNumber {
        row,
        column: column.to_string(),
        value: raw.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settings(dividend: Option<&str>) -> DataSettings {
        DataSettings {
            date_column: "date".to_string(),
            price_column: "price".to_string(),
            dividend_column: dividend.map(str::to_string),
            ..DataSettings::default()
        }
    }

    #[test]
    fn reads_and_sorts_rows() {
        let csv = "date,price\n2024-01-03,3\n2024-01-01,1\n2024-01-02, 2 \n";
        let series = read_observations(csv.as_bytes(), &settings(None)).unwrap();

        assert_eq!(series.prices(), &[1.0, 2.0, 3.0]);
        assert!(!series.has_dividends());
    }

    #[test]
    fn missing_column_fails_before_rows_are_parsed() {
        let csv = "date,close\n2024-01-01,not-a-number\n";
        let err = read_observations(csv.as_bytes(), &settings(None)).unwrap_err();
        assert!(matches!(err, StorageError::MissingColumn { column } if column == "price"));

        let csv = "date,price\n2024-01-01,1\n";
        let err = read_observations(csv.as_bytes(), &settings(Some("div"))).unwrap_err();
        assert!(matches!(err, StorageError::MissingColumn { column } if column == "div"));
    }

    #[test]
    fn empty_dividend_cells_count_as_zero() {
        let csv = "date,price,div\n1,100,\n2,110,0.5\n";
        let series = read_observations(csv.as_bytes(), &settings(Some("div"))).unwrap();
        let window = core_types::Window::new(0, 1);

        assert_eq!(series.dividend_window(window).unwrap(), Some(&[0.0, 0.5][..]));
    }

    #[test]
    fn reports_the_offending_cell() {
        let csv = "date,price\n1,100\n2,abc\n";
        let err = read_observations(csv.as_bytes(), &settings(None)).unwrap_err();

        assert!(matches!(
            err,
            StorageError::InvalidNumber { row: 2, ref column, ref value }
                if column == "price" && value == "abc"
        ));
    }

    #[test]
    fn header_only_file_is_empty() {
        let err = read_observations("date,price\n".as_bytes(), &settings(None)).unwrap_err();
        assert!(matches!(err, StorageError::Empty));
    }

    #[test]
    fn duplicate_labels_are_rejected() {
        let csv = "date,price\n2024-01-01,1\n2024-01-01,2\n";
        let err = read_observations(csv.as_bytes(), &settings(None)).unwrap_err();
        assert!(matches!(err, StorageError::Core(_)));
    }
}
