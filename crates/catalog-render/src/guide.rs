//! User guide describing the catalog workflow

use crate::flow::*;
use crate::types::{PaperSize, RgbColor};

pub const GUIDE_FILE_NAME: &str = "Guia_Usuario_Catalogo.pdf";

pub const GUIDE_TITLE: &str = "Guía de Usuario - Catálogo de Productos";

pub const GUIDE_STEPS: [&str; 7] = [
    "Preparar las credenciales de Google (token de acceso) o exportar la hoja a CSV.",
    "Indicar la hoja de Google Sheets (pestaña 'Catalogo') que contiene los datos del catálogo.",
    "Revisar que los datos se carguen correctamente: el comando informa cuántos productos se leyeron.",
    "Para diseñadores: ejecutar 'catalogo mockup' para ver las zonas de edición.",
    "Para obtener el catálogo real: ejecutar 'catalogo catalog'.",
    "Abrir los archivos generados (PDF o DOCX) desde la carpeta de salida.",
    "Verificar que las imágenes, nombres, precios y stock se visualicen correctamente en el PDF.",
];

pub const GUIDE_NOTE: &str = "Asegúrate de tener las imágenes accesibles mediante URL y que el mini logo esté disponible si se va a usar.";

const GUIDE_TITLE_COLOR: RgbColor = RgbColor::new(46.0 / 255.0, 64.0 / 255.0, 83.0 / 255.0);
const GUIDE_NOTE_COLOR: RgbColor = RgbColor::new(127.0 / 255.0, 140.0 / 255.0, 141.0 / 255.0);

pub fn guide_blocks() -> Vec<Block> {
    let title = ParagraphStyle::new("Titulo", 16.0)
        .align(Alignment::Center)
        .space_after(12.0)
        .color(GUIDE_TITLE_COLOR);
    let note = ParagraphStyle::new("Nota", 10.0).color(GUIDE_NOTE_COLOR);
    let normal = ParagraphStyle::normal();

    let mut blocks = vec![Block::paragraph(GUIDE_TITLE, &title), Block::spacer(cm(0.5))];
    for (i, step) in GUIDE_STEPS.iter().enumerate() {
        blocks.push(Block::paragraph(format!("{}. {}", i + 1, step), &normal));
        blocks.push(Block::spacer(cm(0.4)));
    }
    blocks.push(Block::paragraph(GUIDE_NOTE, &note));
    blocks
}

pub fn guide_document(paper: PaperSize) -> FlowDocument {
    let mut doc = FlowDocument::new(GUIDE_TITLE, paper);
    doc.extend(guide_blocks());
    doc
}
