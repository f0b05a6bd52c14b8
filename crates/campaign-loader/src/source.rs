use std::fs::File;
use std::io::ErrorKind;
use std::path::Path;

use campaign_models::TrendRecord;
use tracing::{info, warn};

use crate::error::LoaderError;

/// Columns every trend CSV must carry. Extra columns are ignored.
pub const REQUIRED_COLUMNS: [&str; 3] = ["trend", "description", "growth_rate"];

/// Parsed contents of a trend CSV.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct TrendCsv {
    pub records: Vec<TrendRecord>,
    /// Rows dropped for a wrong field count, an empty trend name or bad encoding.
    pub skipped: usize,
}

/// Read and validate the whole file up front.
///
/// Header problems fail the read; row problems are logged and counted.
pub fn read_trend_csv(path: &Path) -> Result<TrendCsv, LoaderError> {
    let file = File::open(path).map_err(|e| match e.kind() {
        ErrorKind::NotFound => LoaderError::SourceNotFound(path.to_path_buf()),
        _ => LoaderError::Io(e),
    })?;

    let mut reader = csv::ReaderBuilder::new()
        .flexible(true)
        .trim(csv::Trim::All)
        .from_reader(file);

    let headers = reader.headers()?.clone();
    for column in REQUIRED_COLUMNS {
        if !headers.iter().any(|h| h == column) {
            return Err(LoaderError::MissingColumn(column.to_string()));
        }
    }

    let mut out = TrendCsv::default();
    for result in reader.records() {
        let row = match result {
            Ok(row) => row,
            Err(e) => {
                warn!(error = %e, "Skipping undecodable row");
                out.skipped += 1;
                continue;
            }
        };
        let line = row.position().map(|p| p.line()).unwrap_or_default();

        if row.len() != headers.len() {
            warn!(
                line,
                fields = row.len(),
                expected = headers.len(),
                "Skipping row with wrong field count"
            );
            out.skipped += 1;
            continue;
        }

        let record: TrendRecord = match row.deserialize(Some(&headers)) {
            Ok(record) => record,
            Err(e) => {
                warn!(line, error = %e, "Skipping malformed row");
                out.skipped += 1;
                continue;
            }
        };

        if record.trend.trim().is_empty() {
            warn!(line, "Skipping row with empty trend name");
            out.skipped += 1;
            continue;
        }

        out.records.push(record);
    }

    info!(
        path = %path.display(),
        rows = out.records.len(),
        skipped = out.skipped,
        "Read trend CSV"
    );
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    fn csv_file(contents: &[u8]) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(contents).unwrap();
        file.flush().unwrap();
        file
    }

    #[test]
    fn reads_well_formed_rows() {
        let file = csv_file(
            b"trend,description,growth_rate\n\
              Reusable Packaging,Growing demand,18%\n\
              Live Shopping,\"Streams, replays\",9%\n",
        );

        let parsed = read_trend_csv(file.path()).unwrap();
        assert_eq!(parsed.skipped, 0);
        assert_eq!(parsed.records.len(), 2);
        assert_eq!(parsed.records[0].trend, "Reusable Packaging");
        assert_eq!(parsed.records[0].growth_rate.as_deref(), Some("18%"));
        assert_eq!(parsed.records[1].description, "Streams, replays");
    }

    #[test]
    fn column_order_and_extra_columns_do_not_matter() {
        let file = csv_file(
            b"growth_rate,source,trend,description\n\
              5%,survey,Voice Commerce,Smart speakers\n",
        );

        let parsed = read_trend_csv(file.path()).unwrap();
        assert_eq!(parsed.records.len(), 1);
        assert_eq!(parsed.records[0].trend, "Voice Commerce");
        assert_eq!(parsed.records[0].growth_rate.as_deref(), Some("5%"));
    }

    #[test]
    fn missing_file_is_source_not_found() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("campaign_data.csv");

        match read_trend_csv(&path).unwrap_err() {
            LoaderError::SourceNotFound(p) => assert_eq!(p, path),
            other => panic!("expected SourceNotFound, got {other:?}"),
        }
    }

    #[test]
    fn header_without_growth_rate_is_rejected() {
        let file = csv_file(b"trend,description\nA,B\n");
        match read_trend_csv(file.path()).unwrap_err() {
            LoaderError::MissingColumn(column) => assert_eq!(column, "growth_rate"),
            other => panic!("expected MissingColumn, got {other:?}"),
        }
    }

    #[test]
    fn empty_file_is_missing_columns() {
        let file = csv_file(b"");
        assert!(matches!(
            read_trend_csv(file.path()).unwrap_err(),
            LoaderError::MissingColumn(_)
        ));
    }

    #[test]
    fn malformed_rows_are_skipped_and_counted() {
        let file = csv_file(
            b"trend,description,growth_rate\n\
              Reusable Packaging,Growing demand,18%\n\
              Too,Many,Fields,Here\n\
              ,No name,3%\n\
              Short row\n\
              Social Resale,\xff\xfe,12%\n\
              Live Shopping,Streams,9%\n",
        );

        let parsed = read_trend_csv(file.path()).unwrap();
        let names: Vec<&str> = parsed.records.iter().map(|r| r.trend.as_str()).collect();
        assert_eq!(names, vec!["Reusable Packaging", "Live Shopping"]);
        assert_eq!(parsed.skipped, 4);
    }

    #[test]
    fn empty_growth_rate_cell_is_none() {
        let file = csv_file(b"trend,description,growth_rate\nVoice Commerce,Smart speakers,\n");

        let parsed = read_trend_csv(file.path()).unwrap();
        let doc = parsed.records[0].clone().into_document();
        assert!(doc.metadata.is_empty());
    }
}
