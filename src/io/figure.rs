//! Read/write figure JSON files.
//!
//! Figure JSON is the "portable" representation of a diagnostic figure: every
//! panel's data, title and limits, so it can be re-rendered later (SVG or
//! terminal) without reloading the input tables.

use std::fs::File;
use std::io::{BufReader, BufWriter};
use std::path::Path;

use crate::error::PlotError;
use crate::plot::Figure;

/// Write a figure JSON file.
pub fn write_figure_json(path: &Path, figure: &Figure) -> Result<(), PlotError> {
    let file = File::create(path).map_err(|source| PlotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::to_writer_pretty(BufWriter::new(file), figure)
        .map_err(|e| PlotError::Render(format!("Failed to write figure JSON: {e}")))?;
    Ok(())
}

/// Read a figure JSON file.
pub fn read_figure_json(path: &Path) -> Result<Figure, PlotError> {
    let file = File::open(path).map_err(|source| PlotError::Io {
        path: path.display().to_string(),
        source,
    })?;
    serde_json::from_reader(BufReader::new(file)).map_err(|source| PlotError::Decode {
        path: path.display().to_string(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::PlotOptions;
    use crate::plot::tests::weekly_series;
    use crate::plot::{tsplot, Panel};

    #[test]
    fn saved_figure_reloads_identically() {
        let opts = PlotOptions {
            diff: 1,
            ..PlotOptions::default()
        };
        let fig = tsplot(&weekly_series(50), "saved", &opts).unwrap();
        let path = std::env::temp_dir().join(format!("sts-figure-{}.json", std::process::id()));

        write_figure_json(&path, &fig).unwrap();
        let back = read_figure_json(&path).unwrap();
        std::fs::remove_file(&path).ok();

        assert_eq!(back.ts.title, "saved");
        assert_eq!(back.ts.trace_len(), 49);
        assert!(matches!(back.hist.panel, Panel::Histogram(_)));
        assert_eq!(back.acf.xlim.0, -0.5);
    }

    #[test]
    fn garbage_is_a_decode_error() {
        let path = std::env::temp_dir().join(format!("sts-bad-figure-{}.json", std::process::id()));
        std::fs::write(&path, "{ not json").unwrap();
        let err = read_figure_json(&path).unwrap_err();
        std::fs::remove_file(&path).ok();
        assert!(matches!(err, PlotError::Decode { ref path, .. } if path.ends_with(".json")));
        assert_eq!(crate::error::AppError::from(err).exit_code(), 2);
    }
}
