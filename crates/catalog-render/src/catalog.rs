//! PDF catalog assembly
//!
//! Turns planned categories into flow blocks: an optional cover page, then one
//! section per category (heading plus a table of product cards) closed by a
//! page break. The template variant additionally splits each category into
//! fixed-size pages and stamps a footer on every page.

use crate::flow::*;
use crate::layout::{CardBlock, CardElement, PageRow, PlannedCategory, pack_pages};
use crate::options::RenderConfig;
use crate::types::RgbColor;

pub const CATALOG_TITLE: &str = "Catálogo de Productos";
pub const PLACEHOLDER_TEXT: &str = "Imagen no disponible";

const COVER_LOGO_CM: f32 = 6.0;
const CARD_IMAGE_CM: f32 = 5.0;
/// Template cards never shrink their picture below this side
const MIN_CARD_IMAGE_CM: f32 = 1.5;
const MINI_LOGO_CM: f32 = 0.8;
const CARD_WIDTH_CM: f32 = 6.8;
const CARD_COLUMN_CM: f32 = 9.0;

const PRODUCT_TITLE_COLOR: RgbColor = RgbColor::new(33.0 / 255.0, 47.0 / 255.0, 61.0 / 255.0);

/// Paragraph styles used by the catalog, derived from the theme color
#[derive(Debug, Clone)]
pub struct CatalogStyles {
    pub cover_title: ParagraphStyle,
    pub cover_subtitle: ParagraphStyle,
    pub cover_stamp: ParagraphStyle,
    pub category_title: ParagraphStyle,
    pub product_title: ParagraphStyle,
    pub product_text: ParagraphStyle,
}

impl CatalogStyles {
    pub fn new(theme: RgbColor) -> Self {
        Self {
            cover_title: ParagraphStyle::new("PortTitle", 22.0)
                .bold()
                .align(Alignment::Center)
                .color(theme),
            cover_subtitle: ParagraphStyle::new("PortSub", 12.0).align(Alignment::Center),
            cover_stamp: ParagraphStyle::new("PortStamp", 9.0)
                .align(Alignment::Center)
                .color(RgbColor::GREY),
            category_title: ParagraphStyle::new("CategoriaTitle", 16.0)
                .leading(18.0)
                .space_after(8.0)
                .color(theme),
            product_title: ParagraphStyle::new("ProductoTitle", 12.0)
                .leading(14.0)
                .bold()
                .align(Alignment::Center)
                .color(PRODUCT_TITLE_COLOR),
            product_text: ParagraphStyle::normal().leading(12.0),
        }
    }
}

/// Decode optional asset bytes; undecodable assets are skipped
fn decode_asset(bytes: Option<&[u8]>, what: &str) -> Option<ImageData> {
    let bytes = bytes?;
    match ImageData::decode(bytes) {
        Ok(data) => Some(data),
        Err(e) => {
            tracing::warn!("Skipping {}: {}", what, e);
            None
        }
    }
}

/// Cover page blocks, ending with a page break
pub fn cover_blocks(config: &RenderConfig, styles: &CatalogStyles) -> Vec<Block> {
    let mut blocks = vec![Block::spacer(cm(2.0))];

    if let Some(logo) = decode_asset(config.cover_logo.as_deref(), "cover logo") {
        blocks.push(Block::image(logo, cm(COVER_LOGO_CM), cm(COVER_LOGO_CM)));
        blocks.push(Block::spacer(cm(0.5)));
    }
    if !config.cover_title.is_empty() {
        blocks.push(Block::paragraph(&config.cover_title, &styles.cover_title));
        blocks.push(Block::spacer(cm(0.2)));
    }
    if !config.cover_subtitle.is_empty() {
        blocks.push(Block::paragraph(&config.cover_subtitle, &styles.cover_subtitle));
        blocks.push(Block::spacer(cm(0.5)));
    }
    blocks.push(Block::paragraph(
        format!("Generado: {}", config.generated_at.format("%d/%m/%Y %H:%M")),
        &styles.cover_stamp,
    ));
    blocks.push(Block::PageBreak);
    blocks
}

/// Single-column table holding one product card
pub fn card_table(card: &CardBlock, mini_logo: Option<&ImageData>, styles: &CatalogStyles) -> Table {
    let mut rows: Vec<Vec<Cell>> = Vec::with_capacity(card.elements.len());

    for element in &card.elements {
        let block = match element {
            CardElement::Image(bytes) => match ImageData::decode(bytes) {
                Ok(data) => Block::image(data, cm(CARD_IMAGE_CM), cm(CARD_IMAGE_CM)),
                Err(e) => {
                    tracing::warn!("Product image could not be embedded: {}", e);
                    Block::paragraph(PLACEHOLDER_TEXT, &styles.product_text)
                }
            },
            CardElement::Placeholder => Block::paragraph(PLACEHOLDER_TEXT, &styles.product_text),
            CardElement::Title(title) => Block::paragraph(title, &styles.product_title),
            CardElement::Text(text) => Block::paragraph(text, &styles.product_text),
            CardElement::MiniLogo => match mini_logo {
                Some(data) => Block::image(data.clone(), cm(MINI_LOGO_CM), cm(MINI_LOGO_CM)),
                None => continue,
            },
        };
        rows.push(vec![Cell::from(block)]);
    }

    Table::new(rows, vec![cm(CARD_WIDTH_CM)]).with_style(
        TableStyle::centered()
            .outline(0.25, RgbColor::GREY)
            .vertical_padding(6.0),
    )
}

/// Grid of cards, one table row per [`PageRow`]
pub fn rows_table(
    rows: &[PageRow],
    cards_per_row: usize,
    mini_logo: Option<&ImageData>,
    styles: &CatalogStyles,
) -> Option<Table> {
    if rows.is_empty() {
        return None;
    }

    let cells = rows
        .iter()
        .map(|row| {
            row.cards
                .iter()
                .map(|card| Cell::from(Block::Table(card_table(card, mini_logo, styles))))
                .collect()
        })
        .collect();

    Some(
        Table::new(cells, vec![cm(CARD_COLUMN_CM); cards_per_row.max(1)])
            .with_style(TableStyle::centered().vertical_padding(10.0)),
    )
}

/// Blocks for the flowing catalog: optional cover, then per category a
/// heading and its rows followed by a page break (the last one included).
pub fn catalog_blocks(planned: &[PlannedCategory], config: &RenderConfig) -> Vec<Block> {
    let styles = CatalogStyles::new(config.theme_color);
    let mini_logo = decode_asset(config.mini_logo.as_deref(), "mini logo");

    let mut blocks = Vec::new();
    if config.include_cover {
        blocks.extend(cover_blocks(config, &styles));
    }

    for category in planned {
        blocks.push(Block::paragraph(&category.category, &styles.category_title));
        blocks.push(Block::spacer(cm(0.2)));
        if let Some(table) =
            rows_table(&category.rows, config.cards_per_row, mini_logo.as_ref(), &styles)
        {
            blocks.push(Block::Table(table));
        }
        blocks.push(Block::PageBreak);
    }
    blocks
}

/// Product pictures of a card grid: the first block of each card table
fn card_images(grid: &mut Table) -> impl Iterator<Item = &mut ImageBlock> {
    grid.rows
        .iter_mut()
        .flatten()
        .flat_map(|cell| cell.content.iter_mut())
        .filter_map(|block| match block {
            Block::Table(card) => card.rows.first_mut()?.first_mut()?.content.first_mut(),
            _ => None,
        })
        .filter_map(|block| match block {
            Block::Image(image) => Some(image),
            _ => None,
        })
}

fn set_card_image_size(grid: &mut Table, size: f32) {
    for image in card_images(grid) {
        image.width = size;
        image.height = size;
    }
}

/// Shrink the product pictures until the grid is at most `available` tall.
/// Returns the picture side used.
pub fn fit_card_images(grid: &mut Table, available: f32) -> f32 {
    let full = cm(CARD_IMAGE_CM);
    if grid.height() <= available {
        return full;
    }

    let (mut low, mut high) = (cm(MIN_CARD_IMAGE_CM), full);
    set_card_image_size(grid, low);
    if grid.height() > available {
        tracing::warn!("Template page does not fit even with minimal pictures");
        return low;
    }
    for _ in 0..16 {
        let mid = (low + high) / 2.0;
        set_card_image_size(grid, mid);
        if grid.height() <= available {
            low = mid;
        } else {
            high = mid;
        }
    }
    set_card_image_size(grid, low);
    tracing::debug!("Template pictures scaled to {:.1}pt", low);
    low
}

/// Blocks for the template variant: each category is cut into pages of
/// `rows_per_page` rows, each page opened by the category heading and closed
/// by a page break. Pictures shrink as needed so a page group never spills
/// onto a second page.
pub fn template_blocks(planned: &[PlannedCategory], config: &RenderConfig) -> Vec<Block> {
    let styles = CatalogStyles::new(config.theme_color);
    let mini_logo = decode_asset(config.mini_logo.as_deref(), "mini logo");
    let (frame_width, frame_height) = frame_size(config.paper);

    let mut blocks = Vec::new();
    if config.include_cover {
        blocks.extend(cover_blocks(config, &styles));
    }

    for category in planned {
        let heading = Block::paragraph(&category.category, &styles.category_title);
        let spacer = Block::spacer(cm(0.2));
        // One point of slack absorbs rounding between measuring and paginating
        let available =
            frame_height - heading.height(frame_width) - spacer.height(frame_width) - 1.0;

        for page in pack_pages(category.rows.clone(), config.rows_per_page) {
            blocks.push(heading.clone());
            blocks.push(spacer.clone());
            if let Some(mut table) =
                rows_table(&page.rows, config.cards_per_row, mini_logo.as_ref(), &styles)
            {
                fit_card_images(&mut table, available);
                blocks.push(Block::Table(table));
            }
            blocks.push(Block::PageBreak);
        }
    }
    blocks
}

pub fn catalog_document(planned: &[PlannedCategory], config: &RenderConfig) -> FlowDocument {
    let mut doc = FlowDocument::new(CATALOG_TITLE, config.paper);
    doc.extend(catalog_blocks(planned, config));
    doc
}

pub fn template_document(planned: &[PlannedCategory], config: &RenderConfig) -> FlowDocument {
    let date = config.generated_at.format("%d/%m/%Y").to_string();
    let mut doc = FlowDocument::new(CATALOG_TITLE, config.paper)
        .with_footer(move |page| format!("Página {} · {}", page, date));
    doc.extend(template_blocks(planned, config));
    doc
}
