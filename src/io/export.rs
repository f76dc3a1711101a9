//! Export frames to CSV.
//!
//! The export is meant to be easy to consume in spreadsheets or downstream
//! scripts: for an assembled item frame the `date` column comes first, then every
//! other column in frame order. Missing values are written as empty cells. Raw
//! tables (e.g. a generated dataset) are written as they are so they read back
//! exactly like the original inputs.

use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

use polars::prelude::*;
use tracing::debug;

use crate::domain::frame::has_column;
use crate::domain::{schema, DataPaths, Dataset};
use crate::error::{TableError, TableResult};

/// Write `frame` (date first) to a CSV file at `path`.
pub fn write_table_csv(path: &Path, frame: &DataFrame) -> TableResult<()> {
    let file = create(path)?;
    write_table(file, frame, &path.display().to_string())
}

/// Write `frame` (date first) as CSV to any writer; `target` names it in errors.
pub fn write_table<W: Write>(writer: W, frame: &DataFrame, target: &str) -> TableResult<()> {
    let mut frame = date_first(frame)?;
    write_records(writer, &mut frame, target)
}

/// Write the raw tables of `dataset` into `dir` under the standard file names.
pub fn write_dataset(dataset: &Dataset, dir: &Path) -> TableResult<DataPaths> {
    fs::create_dir_all(dir).map_err(|source| TableError::Io {
        path: dir.display().to_string(),
        source,
    })?;
    let paths = DataPaths::in_dir(dir);

    let mut outputs = vec![
        (&paths.calendar, &dataset.calendar),
        (&paths.sales, &dataset.sales),
    ];
    if let (Some(path), Some(prices)) = (paths.prices.as_ref(), dataset.prices.as_ref()) {
        outputs.push((path, prices));
    }
    for (path, frame) in outputs {
        let file = create(path)?;
        write_records(file, &mut frame.clone(), &path.display().to_string())?;
        debug!(path = %path.display(), rows = frame.height(), cols = frame.width(), "wrote table");
    }

    Ok(DataPaths {
        prices: dataset.prices.as_ref().and(paths.prices.clone()),
        ..paths
    })
}

fn create(path: &Path) -> TableResult<File> {
    File::create(path).map_err(|source| TableError::Io {
        path: path.display().to_string(),
        source,
    })
}

fn date_first(frame: &DataFrame) -> TableResult<DataFrame> {
    if !has_column(frame, schema::DATE) {
        return Ok(frame.clone());
    }
    let mut order = vec![schema::DATE];
    order.extend(
        frame
            .get_column_names_str()
            .into_iter()
            .filter(|name| *name != schema::DATE),
    );
    Ok(frame.select(order)?)
}

fn write_records<W: Write>(mut writer: W, frame: &mut DataFrame, target: &str) -> TableResult<()> {
    CsvWriter::new(&mut writer)
        .include_header(true)
        .with_date_format(Some("%Y-%m-%d".to_string()))
        .finish(frame)
        .map_err(|source| TableError::Csv {
            path: target.to_string(),
            source,
        })?;
    writer.flush().map_err(|source| TableError::Io {
        path: target.to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    #[test]
    fn writes_date_then_columns() {
        let dates = vec![
            NaiveDate::from_ymd_opt(2011, 1, 29).unwrap(),
            NaiveDate::from_ymd_opt(2011, 1, 30).unwrap(),
        ];
        let frame = DataFrame::new(vec![
            Column::new("HOBBIES_1_001_CA_1_validation".into(), [Some(3i64), None]),
            Column::new("date".into(), dates),
        ])
        .unwrap();

        let mut buf = Vec::new();
        write_table(&mut buf, &frame, "mem").unwrap();
        let text = String::from_utf8(buf).unwrap();
        assert_eq!(
            text,
            "date,HOBBIES_1_001_CA_1_validation\n2011-01-29,3\n2011-01-30,\n"
        );
    }

    #[test]
    fn written_dataset_reads_back() {
        use crate::data::sample::{generate_dataset, SampleConfig};
        use crate::io::read_tables;

        let data = generate_dataset(&SampleConfig {
            days: 21,
            items: 2,
            ..SampleConfig::default()
        })
        .unwrap();
        let dir = std::env::temp_dir().join(format!("sts-dataset-{}", std::process::id()));

        let paths = write_dataset(&data, &dir).unwrap();
        let back = read_tables(&paths).unwrap();
        std::fs::remove_dir_all(&dir).ok();

        assert_eq!(back.calendar.shape(), data.calendar.shape());
        assert_eq!(back.sales.get_column_names(), data.sales.get_column_names());
        assert_eq!(back.sales, data.sales);
        assert_eq!(back.prices.map(|p| p.shape()), data.prices.map(|p| p.shape()));
    }
}
