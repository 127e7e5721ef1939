use thiserror::Error;

#[derive(Error, Debug)]
pub enum SheetsError {
    #[error("Spreadsheet '{0}' not found")]
    SpreadsheetNotFound(String),
    #[error("Worksheet '{0}' not found")]
    WorksheetNotFound(String),
    #[error("Authorization failed: {0}")]
    Auth(String),
    #[error("Sheets API error ({status}): {message}")]
    Api { status: u16, message: String },
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("No product rows found in {0}")]
    EmptyTable(String),
}

pub type Result<T> = std::result::Result<T, SheetsError>;
