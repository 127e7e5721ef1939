use std::io::Cursor;

use docx_rs::{AlignmentType, Docx, Paragraph, Pic, Run, Style, StyleType};
use image::ImageFormat;

use crate::catalog::CATALOG_TITLE;
use crate::layout::{price_line, stock_line};
use crate::resolve::{HttpFetch, ImageAsset, ImageResolver};
use crate::types::*;

/// Display width of embedded product pictures
pub const PICTURE_WIDTH_INCHES: f64 = 2.5;

const EMU_PER_INCH: f64 = 914_400.0;

/// One record of the editable document, with its picture already resolved
#[derive(Debug, Clone)]
pub struct EditableEntry {
    pub record: ProductRecord,
    pub image: ImageAsset,
}

/// Resolve every record's image, in input order
pub async fn resolve_entries<F: HttpFetch>(
    table: &ProductTable,
    resolver: &ImageResolver<F>,
) -> Vec<EditableEntry> {
    let mut entries = Vec::with_capacity(table.len());
    for record in &table.records {
        let image = resolver.resolve(&record.image_reference).await;
        entries.push(EditableEntry {
            record: record.clone(),
            image,
        });
    }
    entries
}

/// Generate the editable DOCX: a title, a generation line, then one flat
/// section per record in input order.
///
/// Pictures that are unavailable or cannot be decoded are left out; no
/// placeholder is written.
pub fn generate_docx(entries: &[EditableEntry], generated: &str) -> Result<Vec<u8>> {
    let mut docx = Docx::new()
        .add_style(heading_style("Heading1", "heading 1", 16))
        .add_style(heading_style("Heading2", "heading 2", 14));

    docx = docx
        .add_paragraph(heading_paragraph(CATALOG_TITLE, "Heading1"))
        .add_paragraph(body_paragraph(&format!("Generado: {}", generated)))
        .add_paragraph(Paragraph::new());

    for entry in entries {
        let record = &entry.record;
        docx = docx
            .add_paragraph(heading_paragraph(&record.name, "Heading2"))
            .add_paragraph(body_paragraph(&format!("Categoría: {}", record.category)));
        if !record.description.is_empty() {
            docx = docx.add_paragraph(body_paragraph(&record.description));
        }
        docx = docx
            .add_paragraph(body_paragraph(&price_line(&record.price)))
            .add_paragraph(body_paragraph(&stock_line(&record.stock)));

        if let Some(bytes) = entry.image.bytes() {
            match picture(bytes) {
                Ok(pic) => {
                    docx = docx.add_paragraph(Paragraph::new().add_run(Run::new().add_image(pic)));
                }
                Err(e) => tracing::warn!("Skipping picture for '{}': {}", record.name, e),
            }
        }
        docx = docx.add_paragraph(Paragraph::new());
    }

    let mut buf = Cursor::new(Vec::new());
    docx.build()
        .pack(&mut buf)
        .map_err(|e| RenderError::Docx(e.to_string()))?;

    Ok(buf.into_inner())
}

/// Re-encode as PNG and size to the fixed display width, keeping aspect ratio
fn picture(bytes: &[u8]) -> Result<Pic> {
    let decoded = image::load_from_memory(bytes)?;
    let (width_px, height_px) = (decoded.width().max(1), decoded.height().max(1));

    let mut png = Cursor::new(Vec::new());
    decoded.write_to(&mut png, ImageFormat::Png)?;

    let width_emu = PICTURE_WIDTH_INCHES * EMU_PER_INCH;
    let height_emu = width_emu * height_px as f64 / width_px as f64;

    Ok(Pic::new_with_dimensions(png.into_inner(), width_px, height_px)
        .size(width_emu.round() as u32, height_emu.round() as u32))
}

fn heading_style(style_id: &str, name: &str, size_pt: usize) -> Style {
    Style::new(style_id, StyleType::Paragraph)
        .name(name)
        .size(size_pt * 2) // OOXML uses half-points
}

fn heading_paragraph(text: &str, style_id: &str) -> Paragraph {
    Paragraph::new()
        .style(style_id)
        .add_run(Run::new().add_text(text).bold())
}

fn body_paragraph(text: &str) -> Paragraph {
    Paragraph::new()
        .align(AlignmentType::Left)
        .add_run(Run::new().add_text(text))
}
