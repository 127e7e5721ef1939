mod common;

use catalog_render::catalog::*;
use catalog_render::flow::{Block, FlowDocument, cm, frame_size};
use catalog_render::layout::{CardElement, plan_catalog};
use catalog_render::mockup::{ZONES, mockup_blocks};
use catalog_render::resolve::FetchedResponse;
use catalog_render::*;
use common::{RecordingFetcher, demo_table, png_bytes, record};

fn no_cover() -> RenderConfig {
    RenderConfig {
        include_cover: false,
        ..RenderConfig::default()
    }
}

fn headings(blocks: &[Block]) -> Vec<&str> {
    blocks
        .iter()
        .filter(|b| b.style_name() == Some("CategoriaTitle"))
        .filter_map(|b| b.text())
        .collect()
}

/// True when any card of any grid embeds a picture
fn has_card_images(blocks: &[Block]) -> bool {
    blocks.iter().any(|b| match b {
        Block::Table(grid) => grid
            .rows
            .iter()
            .flatten()
            .flat_map(|cell| cell.content.iter())
            .any(|inner| match inner {
                Block::Table(card) => card
                    .rows
                    .iter()
                    .flatten()
                    .any(|c| c.content.iter().any(|x| matches!(x, Block::Image(_)))),
                _ => false,
            }),
        _ => false,
    })
}

#[tokio::test]
async fn test_demo_catalog_sections() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let groups = group_by_category(&demo_table());
    let planned = plan_catalog(&groups, 2, false, &resolver).await;

    let blocks = catalog_blocks(&planned, &no_cover());

    assert_eq!(headings(&blocks), vec!["Electrónica", "Hogar", "Ropa"]);
    assert_eq!(blocks.iter().filter(|b| b.is_page_break()).count(), 3);
    assert!(blocks.last().is_some_and(Block::is_page_break));

    // Electrónica: one row holding both products
    match &blocks[2] {
        Block::Table(table) => {
            assert_eq!(table.rows.len(), 1);
            assert_eq!(table.rows[0].len(), 2);
        }
        other => panic!("expected card grid, got {other:?}"),
    }
}

#[tokio::test]
async fn test_catalog_with_cover_paginates() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let groups = group_by_category(&demo_table());
    let planned = plan_catalog(&groups, 2, false, &resolver).await;

    let doc = catalog_document(&planned, &RenderConfig::default());
    let pages = doc.paginate();

    // Cover, three categories, then the page left open by the final break
    assert_eq!(pages.len(), 5);
    assert!(pages[0].texts().contains(&"Catálogo de Productos"));
    assert_eq!(pages[1].texts(), vec!["Electrónica"]);
    assert_eq!(pages[3].texts(), vec!["Ropa"]);
    assert!(pages[4].is_empty());
}

#[test]
fn test_cover_blocks() {
    let config = RenderConfig {
        cover_title: "Mi Tienda".to_string(),
        cover_logo: Some(png_bytes()),
        ..RenderConfig::default()
    };
    let blocks = cover_blocks(&config, &CatalogStyles::new(config.theme_color));

    assert!(blocks.iter().any(|b| matches!(b, Block::Image(_))));
    assert!(blocks.iter().any(|b| b.text() == Some("Mi Tienda")));
    assert!(
        blocks
            .iter()
            .filter_map(Block::text)
            .any(|t| t.starts_with("Generado: "))
    );
    assert!(blocks.last().is_some_and(Block::is_page_break));
}

#[test]
fn test_undecodable_cover_logo_is_skipped() {
    let config = RenderConfig {
        cover_logo: Some(b"not an image".to_vec()),
        ..RenderConfig::default()
    };
    let blocks = cover_blocks(&config, &CatalogStyles::new(config.theme_color));
    assert!(!blocks.iter().any(|b| matches!(b, Block::Image(_))));
}

#[tokio::test]
async fn test_placeholder_card_shows_text() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let table = ProductTable {
        records: vec![record("Ropa", "Camiseta", "")],
        has_category: true,
    };
    let planned = plan_catalog(&group_by_category(&table), 2, false, &resolver).await;
    let card = &planned[0].rows[0].cards[0];

    let styles = CatalogStyles::new(RgbColor::BLACK);
    let table = card_table(card, None, &styles);
    assert_eq!(table.rows[0][0].content[0].text(), Some(PLACEHOLDER_TEXT));
}

#[tokio::test]
async fn test_html_served_as_png_becomes_placeholder() {
    let resolver = ImageResolver::new(RecordingFetcher::with_response(Ok(FetchedResponse {
        status: 200,
        content_type: Some("image/png".to_string()),
        body: b"<html>".to_vec(),
    })));
    let table = ProductTable {
        records: vec![
            record("Hogar", "Silla", "https://example.com/silla.png"),
            record("Hogar", "Mesa", "https://example.com/mesa.png"),
            record("Hogar", "Lámpara", "https://example.com/lampara.png"),
        ],
        has_category: true,
    };
    let planned = plan_catalog(&group_by_category(&table), 2, false, &resolver).await;
    assert_eq!(planned[0].card_count(), 3);

    // The content type passes, so the body only fails when it is decoded
    let card = &planned[0].rows[0].cards[0];
    assert!(matches!(card.elements[0], CardElement::Image(_)));
    let styles = CatalogStyles::new(RgbColor::BLACK);
    let table = card_table(card, None, &styles);
    assert_eq!(table.rows[0][0].content[0].text(), Some(PLACEHOLDER_TEXT));
    assert_eq!(table.rows[1][0].content[0].text(), Some("Silla"));

    let blocks = catalog_blocks(&planned, &no_cover());
    let grid_cards: usize = blocks
        .iter()
        .filter_map(|b| match b {
            Block::Table(grid) => Some(grid.rows.iter().map(Vec::len).sum::<usize>()),
            _ => None,
        })
        .sum();
    assert_eq!(grid_cards, 3);
    assert!(!has_card_images(&blocks));
}

#[tokio::test]
async fn test_template_page_group_fits_one_page() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let table = ProductTable {
        records: (0..6)
            .map(|i| record("Hogar", &format!("p{i}"), &format!("https://example.com/{i}.png")))
            .collect(),
        has_category: true,
    };
    let config = no_cover();
    let planned = plan_catalog(
        &group_by_category(&table),
        config.cards_per_row,
        false,
        &resolver,
    )
    .await;
    assert_eq!(planned[0].rows.len(), config.rows_per_page);

    let doc = template_document(&planned, &config);
    let pages = doc.paginate();
    assert_eq!(pages.len(), 2);
    assert_eq!(pages[0].texts(), vec!["Hogar"]);
    assert!(pages[1].is_empty());

    // Three rows of full-size pictures overflow the page, so they shrink
    let blocks = template_blocks(&planned, &config);
    let grid = blocks
        .iter()
        .find_map(|b| match b {
            Block::Table(grid) => Some(grid),
            _ => None,
        })
        .unwrap();
    let (_, frame_height) = frame_size(config.paper);
    assert!(grid.height() < frame_height);
    assert!(has_card_images(&blocks));
}

#[tokio::test]
async fn test_fit_card_images_keeps_full_size_when_grid_fits() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let table = ProductTable {
        records: vec![record("Hogar", "Silla", "https://example.com/silla.png")],
        has_category: true,
    };
    let planned = plan_catalog(&group_by_category(&table), 2, false, &resolver).await;
    let styles = CatalogStyles::new(RgbColor::BLACK);
    let mut grid = rows_table(&planned[0].rows, 2, None, &styles).unwrap();
    let before = grid.height();

    assert_eq!(fit_card_images(&mut grid, 10_000.0), cm(5.0));
    assert_eq!(grid.height(), before);

    let shrunk = fit_card_images(&mut grid, before - 20.0);
    assert!(shrunk < cm(5.0));
    assert!(shrunk >= cm(1.5));
    assert!(grid.height() <= before - 20.0);
}

#[test]
fn test_mockup_has_four_zones() {
    let blocks = mockup_blocks();
    let zones: Vec<&str> = blocks
        .iter()
        .filter_map(|b| match b {
            Block::Table(table) => table.rows[0][0].content[0].text(),
            _ => None,
        })
        .collect();

    let expected: Vec<&str> = ZONES.iter().map(|(label, _)| *label).collect();
    assert_eq!(zones, expected);
    assert_eq!(zones.len(), 4);
}

#[tokio::test]
async fn test_template_repeats_heading_per_page() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let table = ProductTable {
        records: (0..5).map(|i| record("Hogar", &format!("p{i}"), "")).collect(),
        has_category: true,
    };
    let config = RenderConfig {
        include_cover: false,
        rows_per_page: 2,
        ..RenderConfig::default()
    };
    let planned = plan_catalog(&group_by_category(&table), 2, false, &resolver).await;

    let blocks = template_blocks(&planned, &config);
    assert_eq!(headings(&blocks), vec!["Hogar", "Hogar"]);

    let doc: FlowDocument = template_document(&planned, &config);
    assert_eq!(doc.page_count(), 3);
    assert!(doc.build().unwrap().starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_render_every_kind() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let config = RenderConfig {
        mini_logo: Some(png_bytes()),
        ..RenderConfig::default()
    };

    for kind in [OutputKind::PdfCatalog, OutputKind::PdfTemplate] {
        let bytes = render(RenderRequest::new(kind, demo_table(), config.clone()), &resolver)
            .await
            .unwrap();
        assert!(bytes.starts_with(b"%PDF"), "{kind:?}");
    }

    let mockup = render(RenderRequest::mockup(config.clone()), &resolver)
        .await
        .unwrap();
    assert!(mockup.starts_with(b"%PDF"));

    let docx = render(
        RenderRequest::new(OutputKind::EditableDocument, demo_table(), config),
        &resolver,
    )
    .await
    .unwrap();
    assert!(docx.starts_with(b"PK"));
}

#[tokio::test]
async fn test_render_rejects_invalid_config() {
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());
    let config = RenderConfig {
        cards_per_row: 0,
        ..RenderConfig::default()
    };

    let err = render(
        RenderRequest::new(OutputKind::PdfCatalog, demo_table(), config),
        &resolver,
    )
    .await
    .unwrap_err();
    assert!(matches!(err, RenderError::Config(_)));
    assert!(resolver.fetcher().calls().is_empty());
}

#[tokio::test]
async fn test_generate_writes_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(OutputKind::PdfMockup.default_file_name());
    let resolver = ImageResolver::new(RecordingFetcher::serving_png());

    generate(RenderRequest::mockup(RenderConfig::default()), &resolver, &path)
        .await
        .unwrap();

    let written = tokio::fs::read(&path).await.unwrap();
    assert!(written.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_render_mockup_needs_no_resolver() {
    let bytes = render_mockup(PaperSize::Letter).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[tokio::test]
async fn test_render_guide() {
    let bytes = render_guide(PaperSize::A4).await.unwrap();
    assert!(bytes.starts_with(b"%PDF"));
}

#[test]
fn test_output_kind_names() {
    assert_eq!(OutputKind::PdfCatalog.default_file_name(), "catalogo_final.pdf");
    assert_eq!(OutputKind::PdfTemplate.default_file_name(), "catalogo_template.pdf");
    assert_eq!(OutputKind::EditableDocument.default_file_name(), "catalogo_editable.docx");
    assert_eq!(OutputKind::PdfMockup.mime_type(), "application/pdf");
}
