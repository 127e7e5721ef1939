use catalog_sheets::*;

#[tokio::test]
async fn test_load_csv_with_headers() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("productos.csv");
    tokio::fs::write(
        &path,
        "categoria,nombre,precio\nHogar,Silla,80\nRopa,Camiseta\n,,\n",
    )
    .await
    .unwrap();

    let table = load_from_csv(&path).await.unwrap();

    assert_eq!(table.headers, vec!["categoria", "nombre", "precio"]);
    assert_eq!(table.rows.len(), 2);
    assert_eq!(table.rows[0]["nombre"], "Silla");
    assert_eq!(table.rows[1]["precio"], "");
}

#[tokio::test]
async fn test_load_missing_file() {
    let result = load_from_csv("/nonexistent/productos.csv").await;
    assert!(matches!(result, Err(SheetsError::Io(_))));
}

#[tokio::test]
async fn test_template_csv_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("plantilla.csv");

    write_template_csv(&path).await.unwrap();
    let table = load_from_csv(&path).await.unwrap();

    assert_eq!(table.headers, TEMPLATE_HEADERS.to_vec());
    assert_eq!(table, template_table());
}

#[tokio::test]
async fn test_csv_source_rejects_header_only_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("vacio.csv");
    tokio::fs::write(&path, "categoria,nombre\n").await.unwrap();

    let source = RowSource::Csv(path);
    assert!(matches!(source.load().await, Err(SheetsError::EmptyTable(_))));
}

#[test]
fn test_demo_rows_group_into_three_categories() {
    let table = catalog_render::normalize_table(&template_table());
    let groups = catalog_render::group_by_category(&table);

    let names: Vec<&str> = groups.iter().map(|g| g.category.as_str()).collect();
    assert_eq!(names, vec!["Electrónica", "Hogar", "Ropa"]);
    assert_eq!(groups[0].records.len(), 2);
}

#[test]
fn test_template_values_start_with_headers() {
    let values = template_values();
    assert_eq!(values.len(), 5);
    assert_eq!(values[0], TEMPLATE_HEADERS.map(String::from).to_vec());
}
