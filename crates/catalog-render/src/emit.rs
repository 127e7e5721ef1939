//! Document emission: one render request in, one byte stream out

use crate::catalog::{catalog_document, template_document};
use crate::docx::{generate_docx, resolve_entries};
use crate::group::group_by_category;
use crate::layout::plan_catalog;
use crate::mockup::mockup_document;
use crate::options::RenderConfig;
use crate::resolve::{HttpFetch, ImageResolver};
use crate::types::*;
use std::path::Path;

/// Output document selector
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputKind {
    /// Flowing PDF catalog with optional cover
    PdfCatalog,
    /// PDF catalog with fixed rows per page and a page footer
    PdfTemplate,
    /// Data-independent PDF showing the layout zones
    PdfMockup,
    /// Flat DOCX with one section per record
    EditableDocument,
}

impl OutputKind {
    pub fn default_file_name(self) -> &'static str {
        match self {
            OutputKind::PdfCatalog => "catalogo_final.pdf",
            OutputKind::PdfTemplate => "catalogo_template.pdf",
            OutputKind::PdfMockup => "mockup_visual.pdf",
            OutputKind::EditableDocument => "catalogo_editable.docx",
        }
    }

    pub fn mime_type(self) -> &'static str {
        match self {
            OutputKind::EditableDocument => {
                "application/vnd.openxmlformats-officedocument.wordprocessingml.document"
            }
            _ => "application/pdf",
        }
    }
}

/// Everything one render needs, passed by value
#[derive(Debug, Clone)]
pub struct RenderRequest {
    pub kind: OutputKind,
    pub table: ProductTable,
    pub config: RenderConfig,
}

impl RenderRequest {
    pub fn new(kind: OutputKind, table: ProductTable, config: RenderConfig) -> Self {
        Self {
            kind,
            table,
            config,
        }
    }

    /// Mockups carry no product data
    pub fn mockup(config: RenderConfig) -> Self {
        Self::new(OutputKind::PdfMockup, ProductTable::default(), config)
    }
}

/// Render a request to bytes.
///
/// Images are resolved sequentially in record order; layout and
/// serialization run on a blocking task. Any failure at this level aborts the
/// whole render.
pub async fn render<F: HttpFetch>(
    request: RenderRequest,
    resolver: &ImageResolver<F>,
) -> Result<Vec<u8>> {
    let RenderRequest {
        kind,
        table,
        config,
    } = request;
    config.validate()?;

    tracing::info!("Rendering {:?} for {} records", kind, table.len());

    let bytes = match kind {
        OutputKind::PdfCatalog | OutputKind::PdfTemplate => {
            let groups = group_by_category(&table);
            let planned = plan_catalog(
                &groups,
                config.cards_per_row,
                config.mini_logo.is_some(),
                resolver,
            )
            .await;

            tokio::task::spawn_blocking(move || {
                let doc = if kind == OutputKind::PdfTemplate {
                    template_document(&planned, &config)
                } else {
                    catalog_document(&planned, &config)
                };
                doc.build()
            })
            .await??
        }
        OutputKind::PdfMockup => render_mockup(config.paper).await?,
        OutputKind::EditableDocument => {
            let entries = resolve_entries(&table, resolver).await;
            let generated = config.generated_at.format("%d %B %Y").to_string();
            tokio::task::spawn_blocking(move || generate_docx(&entries, &generated)).await??
        }
    };

    tracing::info!("Rendered {:?}: {} bytes", kind, bytes.len());
    Ok(bytes)
}

/// Render a request and write the result to `output_path`
pub async fn generate<F: HttpFetch>(
    request: RenderRequest,
    resolver: &ImageResolver<F>,
    output_path: impl AsRef<Path>,
) -> Result<()> {
    let output_path = output_path.as_ref().to_owned();
    let bytes = render(request, resolver).await?;
    tokio::fs::write(&output_path, bytes).await?;
    Ok(())
}

/// Render the layout mockup. Needs neither product data nor a resolver.
pub async fn render_mockup(paper: PaperSize) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || mockup_document(paper).build()).await?
}

/// Render the user guide PDF
pub async fn render_guide(paper: PaperSize) -> Result<Vec<u8>> {
    tokio::task::spawn_blocking(move || crate::guide::guide_document(paper).build()).await?
}
