//! Minimal Google Sheets / Drive REST client
//!
//! Authenticates with a ready OAuth access token. Every API failure is
//! surfaced as a [`SheetsError`]; nothing is retried.

use crate::template::template_values;
use crate::types::{Result, SheetsError};
use catalog_render::RawTable;
use serde::Deserialize;
use serde::de::DeserializeOwned;
use serde_json::json;

pub const SHEETS_API_BASE: &str = "https://sheets.googleapis.com";
pub const DRIVE_API_BASE: &str = "https://www.googleapis.com";

/// Environment variable the CLI reads the access token from
pub const ACCESS_TOKEN_ENV: &str = "GOOGLE_OAUTH_ACCESS_TOKEN";

const SPREADSHEET_MIME: &str = "application/vnd.google-apps.spreadsheet";

/// Grid size used when a worksheet has to be added
const NEW_WORKSHEET_ROWS: u32 = 200;
const NEW_WORKSHEET_COLS: u32 = 10;

#[derive(Debug, Deserialize)]
struct FileList {
    #[serde(default)]
    files: Vec<DriveFile>,
}

#[derive(Debug, Deserialize)]
struct DriveFile {
    id: String,
}

#[derive(Debug, Deserialize)]
struct ValueRange {
    #[serde(default)]
    values: Vec<Vec<serde_json::Value>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SpreadsheetMeta {
    spreadsheet_id: Option<String>,
    #[serde(default)]
    sheets: Vec<SheetEntry>,
}

#[derive(Debug, Deserialize)]
struct SheetEntry {
    properties: SheetProperties,
}

#[derive(Debug, Deserialize)]
struct SheetProperties {
    title: String,
}

#[derive(Debug, Deserialize)]
struct ApiErrorBody {
    error: ApiErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ApiErrorDetail {
    #[serde(default)]
    message: String,
}

/// Which resource a failed request addressed, for error classification
enum Target<'a> {
    Spreadsheet(&'a str),
    Worksheet(&'a str),
}

pub struct SheetsClient {
    http: reqwest::Client,
    access_token: String,
    sheets_base: String,
    drive_base: String,
}

impl SheetsClient {
    pub fn new(access_token: impl Into<String>) -> Self {
        Self::with_base_urls(access_token, SHEETS_API_BASE, DRIVE_API_BASE)
    }

    /// Client against alternate API hosts
    pub fn with_base_urls(
        access_token: impl Into<String>,
        sheets_base: impl Into<String>,
        drive_base: impl Into<String>,
    ) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: access_token.into(),
            sheets_base: sheets_base.into().trim_end_matches('/').to_string(),
            drive_base: drive_base.into().trim_end_matches('/').to_string(),
        }
    }

    /// Look up a spreadsheet id by its exact name
    pub async fn find_spreadsheet(&self, name: &str) -> Result<Option<String>> {
        let query = format!(
            "name = '{}' and mimeType = '{}' and trashed = false",
            name.replace('\\', "\\\\").replace('\'', "\\'"),
            SPREADSHEET_MIME
        );
        let url = format!(
            "{}/drive/v3/files?q={}&fields=files(id)&pageSize=1",
            self.drive_base,
            urlencoding::encode(&query)
        );

        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let list: FileList = decode(check(response, Target::Spreadsheet(name)).await?).await?;

        Ok(list.files.into_iter().next().map(|f| f.id))
    }

    /// Like [`find_spreadsheet`](Self::find_spreadsheet) but a missing
    /// spreadsheet is an error
    pub async fn open_spreadsheet(&self, name: &str) -> Result<String> {
        self.find_spreadsheet(name)
            .await?
            .ok_or_else(|| SheetsError::SpreadsheetNotFound(name.to_string()))
    }

    /// Titles of every worksheet in the spreadsheet
    pub async fn worksheet_titles(&self, spreadsheet_id: &str) -> Result<Vec<String>> {
        let url = format!(
            "{}/v4/spreadsheets/{}?fields=sheets.properties.title",
            self.sheets_base, spreadsheet_id
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let meta: SpreadsheetMeta =
            decode(check(response, Target::Spreadsheet(spreadsheet_id)).await?).await?;

        Ok(meta.sheets.into_iter().map(|s| s.properties.title).collect())
    }

    /// Read a worksheet: first row as headers, the rest as records.
    /// Short rows are padded and fully empty rows skipped.
    pub async fn read_worksheet(&self, spreadsheet_id: &str, worksheet: &str) -> Result<RawTable> {
        let url = format!(
            "{}/v4/spreadsheets/{}/values/{}",
            self.sheets_base,
            spreadsheet_id,
            urlencoding::encode(worksheet)
        );
        let response = self
            .http
            .get(&url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;
        let range: ValueRange = decode(check(response, Target::Worksheet(worksheet)).await?).await?;

        let mut rows = range.values.into_iter().map(|row| {
            row.into_iter()
                .map(|cell| cell_text(&cell))
                .collect::<Vec<String>>()
        });

        let Some(headers) = rows.next() else {
            return Ok(RawTable::default());
        };
        let mut table = RawTable::new(headers.into_iter().map(|h| h.trim().to_string()).collect());
        for row in rows {
            if row.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            table.push_values(row);
        }

        tracing::debug!("Read {} rows from worksheet '{}'", table.rows.len(), worksheet);
        Ok(table)
    }

    /// Open a spreadsheet by name and read one of its worksheets
    pub async fn load_catalog(&self, spreadsheet: &str, worksheet: &str) -> Result<RawTable> {
        let id = self.open_spreadsheet(spreadsheet).await?;
        self.read_worksheet(&id, worksheet).await
    }

    /// Create a spreadsheet holding a single worksheet; returns its id
    pub async fn create_spreadsheet(&self, title: &str, worksheet: &str) -> Result<String> {
        let body = json!({
            "properties": { "title": title },
            "sheets": [{ "properties": { "title": worksheet } }],
        });
        let response = self
            .http
            .post(format!("{}/v4/spreadsheets", self.sheets_base))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        let meta: SpreadsheetMeta =
            decode(check(response, Target::Spreadsheet(title)).await?).await?;

        meta.spreadsheet_id.ok_or_else(|| SheetsError::Api {
            status: 200,
            message: "Create response carried no spreadsheetId".to_string(),
        })
    }

    /// Add the worksheet unless a worksheet with that title already exists
    pub async fn ensure_worksheet(&self, spreadsheet_id: &str, worksheet: &str) -> Result<()> {
        let titles = self.worksheet_titles(spreadsheet_id).await?;
        if titles.iter().any(|t| t == worksheet) {
            return Ok(());
        }

        tracing::info!("Adding worksheet '{}'", worksheet);
        let body = json!({
            "requests": [{
                "addSheet": {
                    "properties": {
                        "title": worksheet,
                        "gridProperties": {
                            "rowCount": NEW_WORKSHEET_ROWS,
                            "columnCount": NEW_WORKSHEET_COLS,
                        },
                    },
                },
            }],
        });
        let response = self
            .http
            .post(format!(
                "{}/v4/spreadsheets/{}:batchUpdate",
                self.sheets_base, spreadsheet_id
            ))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        check(response, Target::Spreadsheet(spreadsheet_id)).await?;
        Ok(())
    }

    /// Overwrite the worksheet starting at A1 with the given rows
    pub async fn write_rows(
        &self,
        spreadsheet_id: &str,
        worksheet: &str,
        rows: Vec<Vec<String>>,
    ) -> Result<()> {
        let range = format!("{}!A1", worksheet);
        let body = json!({
            "range": range,
            "majorDimension": "ROWS",
            "values": rows,
        });
        let response = self
            .http
            .put(format!(
                "{}/v4/spreadsheets/{}/values/{}?valueInputOption=RAW",
                self.sheets_base,
                spreadsheet_id,
                urlencoding::encode(&range)
            ))
            .bearer_auth(&self.access_token)
            .json(&body)
            .send()
            .await?;
        check(response, Target::Worksheet(worksheet)).await?;
        Ok(())
    }

    /// Make sure the named spreadsheet and worksheet exist, then write the
    /// template headers and demo rows. Returns the spreadsheet id.
    pub async fn create_template(&self, spreadsheet: &str, worksheet: &str) -> Result<String> {
        let id = match self.find_spreadsheet(spreadsheet).await? {
            Some(id) => {
                self.ensure_worksheet(&id, worksheet).await?;
                id
            }
            None => {
                tracing::info!("Creating spreadsheet '{}'", spreadsheet);
                self.create_spreadsheet(spreadsheet, worksheet).await?
            }
        };

        self.write_rows(&id, worksheet, template_values()).await?;
        Ok(id)
    }
}

/// Sheets returns numbers and booleans as JSON scalars when unformatted
fn cell_text(cell: &serde_json::Value) -> String {
    match cell {
        serde_json::Value::String(s) => s.clone(),
        serde_json::Value::Null => String::new(),
        other => other.to_string(),
    }
}

async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> Result<T> {
    let body = response.bytes().await?;
    Ok(serde_json::from_slice(&body)?)
}

/// Pass successful responses through; classify failures
async fn check(response: reqwest::Response, target: Target<'_>) -> Result<reqwest::Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response.text().await.unwrap_or_default();
    let message = serde_json::from_str::<ApiErrorBody>(&body)
        .map(|b| b.error.message)
        .unwrap_or(body);
    tracing::warn!("Sheets API returned {}: {}", status, message);

    Err(match (status.as_u16(), target) {
        (401 | 403, _) => SheetsError::Auth(message),
        (404, Target::Spreadsheet(name)) => SheetsError::SpreadsheetNotFound(name.to_string()),
        (400, Target::Worksheet(name)) if message.contains("Unable to parse range") => {
            SheetsError::WorksheetNotFound(name.to_string())
        }
        (code, _) => SheetsError::Api {
            status: code,
            message,
        },
    })
}
