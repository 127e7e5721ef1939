use catalog_sheets::*;
use httpmock::prelude::*;
use serde_json::json;

const TOKEN: &str = "test-token";

fn client(server: &MockServer) -> SheetsClient {
    SheetsClient::with_base_urls(TOKEN, server.base_url(), server.base_url())
}

async fn mock_drive_lookup(server: &MockServer, files: serde_json::Value) -> httpmock::Mock<'_> {
    server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/drive/v3/files")
                .query_param_exists("q")
                .header("authorization", format!("Bearer {}", TOKEN));
            then.status(200).json_body(json!({ "files": files }));
        })
        .await
}

#[tokio::test]
async fn test_load_catalog_reads_worksheet() {
    let server = MockServer::start_async().await;
    let lookup = mock_drive_lookup(&server, json!([{ "id": "sheet123" }])).await;
    let values = server
        .mock_async(|when, then| {
            when.method(GET)
                .path("/v4/spreadsheets/sheet123/values/Catalogo");
            then.status(200).json_body(json!({
                "range": "Catalogo!A1:Z100",
                "majorDimension": "ROWS",
                "values": [
                    ["categoria", "nombre", "precio"],
                    ["Hogar", "Silla"],
                    [],
                    ["Ropa", "Camiseta", 30]
                ]
            }));
        })
        .await;

    let table = client(&server)
        .load_catalog(DEFAULT_SPREADSHEET, DEFAULT_WORKSHEET)
        .await
        .unwrap();

    lookup.assert_async().await;
    values.assert_async().await;
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0]["precio"], "");
    assert_eq!(table.rows[1]["precio"], "30");
}

#[tokio::test]
async fn test_missing_spreadsheet() {
    let server = MockServer::start_async().await;
    mock_drive_lookup(&server, json!([])).await;

    let err = client(&server)
        .load_catalog("Inexistente", DEFAULT_WORKSHEET)
        .await
        .unwrap_err();
    assert!(matches!(err, SheetsError::SpreadsheetNotFound(name) if name == "Inexistente"));
}

#[tokio::test]
async fn test_missing_worksheet() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v4/spreadsheets/abc/values/Otra");
            then.status(400).json_body(json!({
                "error": { "code": 400, "message": "Unable to parse range: Otra", "status": "INVALID_ARGUMENT" }
            }));
        })
        .await;

    let err = client(&server).read_worksheet("abc", "Otra").await.unwrap_err();
    assert!(matches!(err, SheetsError::WorksheetNotFound(name) if name == "Otra"));
}

#[tokio::test]
async fn test_unauthorized() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/drive/v3/files");
            then.status(401).json_body(json!({
                "error": { "code": 401, "message": "Invalid Credentials" }
            }));
        })
        .await;

    let err = client(&server).find_spreadsheet("Catalogo").await.unwrap_err();
    assert!(matches!(err, SheetsError::Auth(message) if message == "Invalid Credentials"));
}

#[tokio::test]
async fn test_other_api_errors_surface_status() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v4/spreadsheets/abc/values/Catalogo");
            then.status(500).body("backend error");
        })
        .await;

    let err = client(&server)
        .read_worksheet("abc", "Catalogo")
        .await
        .unwrap_err();
    assert!(matches!(err, SheetsError::Api { status: 500, ref message } if message == "backend error"));
}

#[tokio::test]
async fn test_empty_worksheet_is_empty_table() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v4/spreadsheets/abc/values/Catalogo");
            then.status(200).json_body(json!({ "range": "Catalogo!A1:Z1000" }));
        })
        .await;

    let table = client(&server)
        .read_worksheet("abc", "Catalogo")
        .await
        .unwrap();
    assert!(table.is_empty());
    assert!(table.headers.is_empty());
}

#[tokio::test]
async fn test_create_template_creates_spreadsheet() {
    let server = MockServer::start_async().await;
    mock_drive_lookup(&server, json!([])).await;
    let create = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v4/spreadsheets")
                .body_contains("\"title\":\"Catalogo\"");
            then.status(200).json_body(json!({ "spreadsheetId": "new1" }));
        })
        .await;
    let write = server
        .mock_async(|when, then| {
            when.method(PUT)
                .path_contains("/v4/spreadsheets/new1/values/")
                .query_param("valueInputOption", "RAW")
                .body_contains("Silla ergonómica");
            then.status(200).json_body(json!({ "updatedRows": 5 }));
        })
        .await;

    let id = client(&server)
        .create_template(DEFAULT_SPREADSHEET, DEFAULT_WORKSHEET)
        .await
        .unwrap();

    assert_eq!(id, "new1");
    create.assert_async().await;
    write.assert_async().await;
}

#[tokio::test]
async fn test_create_template_adds_missing_worksheet() {
    let server = MockServer::start_async().await;
    mock_drive_lookup(&server, json!([{ "id": "old1" }])).await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v4/spreadsheets/old1");
            then.status(200).json_body(json!({
                "sheets": [{ "properties": { "title": "Hoja 1" } }]
            }));
        })
        .await;
    let add = server
        .mock_async(|when, then| {
            when.method(POST)
                .path("/v4/spreadsheets/old1:batchUpdate")
                .body_contains("addSheet");
            then.status(200).json_body(json!({ "replies": [] }));
        })
        .await;
    let write = server
        .mock_async(|when, then| {
            when.method(PUT).path_contains("/v4/spreadsheets/old1/values/");
            then.status(200).json_body(json!({}));
        })
        .await;

    client(&server)
        .create_template(DEFAULT_SPREADSHEET, DEFAULT_WORKSHEET)
        .await
        .unwrap();

    add.assert_async().await;
    write.assert_async().await;
}

#[tokio::test]
async fn test_existing_worksheet_is_not_added_again() {
    let server = MockServer::start_async().await;
    server
        .mock_async(|when, then| {
            when.method(GET).path("/v4/spreadsheets/old1");
            then.status(200).json_body(json!({
                "sheets": [{ "properties": { "title": "Catalogo" } }]
            }));
        })
        .await;
    let add = server
        .mock_async(|when, then| {
            when.method(POST).path("/v4/spreadsheets/old1:batchUpdate");
            then.status(200);
        })
        .await;

    client(&server)
        .ensure_worksheet("old1", DEFAULT_WORKSHEET)
        .await
        .unwrap();
    add.assert_hits_async(0).await;
}
