use polars::prelude::PolarsError;
use thiserror::Error;

pub type TableResult<T> = Result<T, TableError>;

/// Errors raised while loading, cleaning, or reshaping tables.
#[derive(Debug, Error)]
pub enum TableError {
    #[error("Missing required column: `{0}`")]
    MissingColumn(String),

    #[error("Failed to parse `{column}` at row {row}: '{value}'")]
    ParseError {
        column: String,
        row: usize,
        value: String,
    },

    #[error("Missing value in `{column}` at row {row}")]
    MissingValue { column: String, row: usize },

    #[error("No rows match item '{item}'")]
    EmptyResult { item: String },

    #[error("Item '{item}' matches {count} rows; identifiers must be unique")]
    DuplicateItem { item: String, count: usize },

    #[error("Column `{column}` has type {found}, expected {expected}")]
    ColumnType {
        column: String,
        expected: &'static str,
        found: String,
    },

    #[error("CSV error in '{path}': {source}")]
    Csv {
        path: String,
        #[source]
        source: PolarsError,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Errors raised by the diagnostic plot.
#[derive(Debug, Error)]
pub enum PlotError {
    #[error("Difference order {order} is too high, choose 0-{max}")]
    InvalidDifferenceOrder { order: usize, max: usize },

    #[error("Need at least {needed} observations, got {got}")]
    TooFewObservations { needed: usize, got: usize },

    #[error("Render error: {0}")]
    Render(String),

    #[error("Failed to decode figure '{path}': {source}")]
    Decode {
        path: String,
        #[source]
        source: serde_json::Error,
    },

    #[error(transparent)]
    Polars(#[from] PolarsError),

    #[error("I/O error on '{path}': {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

/// Error surfaced by the `sts` binary, carrying its process exit code.
#[derive(Clone)]
pub struct AppError {
    exit_code: u8,
    message: String,
}

impl AppError {
    pub fn new(exit_code: u8, message: impl Into<String>) -> Self {
        Self {
            exit_code,
            message: message.into(),
        }
    }

    pub fn exit_code(&self) -> u8 {
        self.exit_code
    }
}

impl std::fmt::Display for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message)
    }
}

impl std::fmt::Debug for AppError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AppError")
            .field("exit_code", &self.exit_code)
            .field("message", &self.message)
            .finish()
    }
}

impl std::error::Error for AppError {}

impl From<TableError> for AppError {
    fn from(err: TableError) -> Self {
        let exit_code = match err {
            TableError::Csv { .. } | TableError::Io { .. } => 2,
            _ => 3,
        };
        AppError::new(exit_code, err.to_string())
    }
}

impl From<PlotError> for AppError {
    fn from(err: PlotError) -> Self {
        let exit_code = match err {
            PlotError::InvalidDifferenceOrder { .. } | PlotError::Decode { .. } => 2,
            PlotError::TooFewObservations { .. } => 3,
            PlotError::Render(_) | PlotError::Io { .. } | PlotError::Polars(_) => 4,
        };
        AppError::new(exit_code, err.to_string())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn table_errors_map_to_data_exit_code() {
        let err: AppError = TableError::MissingColumn("store_id".to_string()).into();
        assert_eq!(err.exit_code(), 3);
        assert_eq!(err.to_string(), "Missing required column: `store_id`");
    }

    #[test]
    fn difference_order_error_is_a_usage_error() {
        let err: AppError = PlotError::InvalidDifferenceOrder { order: 6, max: 5 }.into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().contains("0-5"));
    }

    #[test]
    fn undecodable_figure_is_an_input_error() {
        let source = serde_json::from_str::<serde_json::Value>("{ not json").unwrap_err();
        let err: AppError = PlotError::Decode {
            path: "fig.json".to_string(),
            source,
        }
        .into();
        assert_eq!(err.exit_code(), 2);
        assert!(err.to_string().starts_with("Failed to decode figure 'fig.json'"));
    }
}
