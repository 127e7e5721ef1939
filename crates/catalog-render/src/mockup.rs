//! Visual mockup of the catalog layout zones. Independent of product data.

use crate::flow::*;
use crate::types::{PaperSize, RgbColor};

pub const MOCKUP_TITLE: &str = "Guía Visual - Mockup de Catálogo";

/// Labeled layout zones with their background colors, top to bottom
pub const ZONES: [(&str, RgbColor); 4] = [
    ("Zona: Logo / Cabecera", RgbColor::new(0.9, 0.95, 1.0)),
    ("Zona: Título de categoría", RgbColor::new(0.95, 1.0, 0.95)),
    (
        "Zona: Ficha de producto (imagen + datos)",
        RgbColor::new(0.98, 0.98, 0.98),
    ),
    ("Zona: Mini logo (opcional)", RgbColor::new(1.0, 0.98, 0.9)),
];

fn zone_table(label: &str, background: RgbColor) -> Table {
    Table::new(
        vec![vec![Cell::from(Block::paragraph(label, &ParagraphStyle::normal()))]],
        vec![cm(16.0)],
    )
    .with_row_heights(vec![cm(2.2)])
    .with_style(
        TableStyle::centered()
            .background(background)
            .outline(1.0, RgbColor::GREY),
    )
}

pub fn mockup_blocks() -> Vec<Block> {
    let mut blocks = vec![
        Block::paragraph(MOCKUP_TITLE, &ParagraphStyle::title()),
        Block::spacer(cm(0.5)),
    ];
    for (label, background) in ZONES {
        blocks.push(Block::Table(zone_table(label, background)));
        blocks.push(Block::spacer(cm(0.4)));
    }
    blocks
}

pub fn mockup_document(paper: PaperSize) -> FlowDocument {
    let mut doc = FlowDocument::new(MOCKUP_TITLE, paper);
    doc.extend(mockup_blocks());
    doc
}
