use thiserror::Error;

#[derive(Error, Debug)]
pub enum PoValidateError {
    #[error("Table not found: {0}")]
    TableNotFound(String),

    #[error("Column '{column}' in table '{table}' has {actual} values, expected {expected}")]
    ColumnLength {
        table: String,
        column: String,
        expected: usize,
        actual: usize,
    },

    #[error("Config error: {0}")]
    Config(String),

    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("YAML error: {0}")]
    Yaml(#[from] serde_yaml::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PoValidateError>;
