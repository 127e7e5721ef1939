use crate::template::{DEMO_ROWS, TEMPLATE_HEADERS};
use crate::types::{Result, SheetsError};
use catalog_render::RawTable;
use std::path::Path;

/// Load a CSV file whose first line holds the column headers.
///
/// Short records are padded with empty cells; fully empty records are skipped.
pub async fn load_from_csv(path: impl AsRef<Path>) -> Result<RawTable> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let table = tokio::task::spawn_blocking(move || {
        let mut reader = csv::ReaderBuilder::new()
            .flexible(true)
            .trim(csv::Trim::Headers)
            .from_reader(contents.as_bytes());

        let headers = reader.headers()?.iter().map(str::to_string).collect();
        let mut table = RawTable::new(headers);

        for result in reader.records() {
            let record = result?;
            if record.iter().all(|cell| cell.trim().is_empty()) {
                continue;
            }
            table.push_values(record.iter());
        }
        Ok::<_, SheetsError>(table)
    })
    .await??;

    tracing::debug!(
        "Loaded {} rows from {}",
        table.rows.len(),
        path.display()
    );
    Ok(table)
}

/// Write the template headers and demo rows to a CSV file
pub async fn write_template_csv(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref().to_owned();

    let bytes = tokio::task::spawn_blocking(move || {
        let mut writer = csv::Writer::from_writer(Vec::new());
        writer.write_record(TEMPLATE_HEADERS)?;
        for row in DEMO_ROWS {
            writer.write_record(row)?;
        }
        writer
            .into_inner()
            .map_err(|e| SheetsError::Io(e.into_error()))
    })
    .await??;

    tokio::fs::write(&path, bytes).await?;
    Ok(())
}
