mod csv_source;
mod sheets;
mod template;
mod types;

pub use csv_source::{load_from_csv, write_template_csv};
pub use sheets::{ACCESS_TOKEN_ENV, DRIVE_API_BASE, SHEETS_API_BASE, SheetsClient};
pub use template::{
    DEFAULT_SPREADSHEET, DEFAULT_WORKSHEET, DEMO_ROWS, TEMPLATE_HEADERS, template_table,
    template_values,
};
pub use types::{Result, SheetsError};

use catalog_render::RawTable;
use std::path::PathBuf;

/// Where product rows come from
pub enum RowSource {
    Csv(PathBuf),
    Sheet {
        client: SheetsClient,
        spreadsheet: String,
        worksheet: String,
    },
}

impl RowSource {
    pub fn describe(&self) -> String {
        match self {
            RowSource::Csv(path) => path.display().to_string(),
            RowSource::Sheet {
                spreadsheet,
                worksheet,
                ..
            } => format!("{}/{}", spreadsheet, worksheet),
        }
    }

    /// Load the rows; a source without any data row is an error
    pub async fn load(&self) -> Result<RawTable> {
        let table = match self {
            RowSource::Csv(path) => load_from_csv(path).await?,
            RowSource::Sheet {
                client,
                spreadsheet,
                worksheet,
            } => client.load_catalog(spreadsheet, worksheet).await?,
        };

        if table.is_empty() {
            return Err(SheetsError::EmptyTable(self.describe()));
        }
        tracing::info!("Loaded {} rows from {}", table.rows.len(), self.describe());
        Ok(table)
    }
}
