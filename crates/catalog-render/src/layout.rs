//! Card layout planning
//!
//! Builds one [`CardBlock`] per product and packs cards into fixed-capacity
//! rows and pages. Planning is independent of the output format; the PDF
//! emitters turn the plan into flow blocks.

use crate::resolve::{HttpFetch, ImageAsset, ImageResolver};
use crate::types::*;

/// One visual element of a product card, top to bottom
#[derive(Debug, Clone, PartialEq)]
pub enum CardElement {
    Image(Vec<u8>),
    Placeholder,
    Title(String),
    Text(String),
    MiniLogo,
}

/// The fixed visual unit for one product
#[derive(Debug, Clone, PartialEq)]
pub struct CardBlock {
    pub elements: Vec<CardElement>,
}

impl CardBlock {
    pub fn has_placeholder(&self) -> bool {
        self.elements.contains(&CardElement::Placeholder)
    }

    pub fn title(&self) -> Option<&str> {
        self.elements.iter().find_map(|e| match e {
            CardElement::Title(title) => Some(title.as_str()),
            _ => None,
        })
    }
}

/// Up to `cards_per_row` cards side by side
#[derive(Debug, Clone, PartialEq)]
pub struct PageRow {
    pub cards: Vec<CardBlock>,
}

/// Up to `rows_per_page` rows sharing one page
#[derive(Debug, Clone, PartialEq)]
pub struct PageGroup {
    pub rows: Vec<PageRow>,
}

/// A category with its cards packed into rows
#[derive(Debug, Clone, PartialEq)]
pub struct PlannedCategory {
    pub category: String,
    pub rows: Vec<PageRow>,
}

impl PlannedCategory {
    pub fn card_count(&self) -> usize {
        self.rows.iter().map(|row| row.cards.len()).sum()
    }
}

pub fn price_line(price: &str) -> String {
    format!("Precio: ${}", price)
}

pub fn stock_line(stock: &str) -> String {
    format!("Stock: {}", stock)
}

/// Build the card for one record. An unavailable image becomes a
/// placeholder; the card itself is never dropped.
pub fn build_card(record: &ProductRecord, image: ImageAsset, with_mini_logo: bool) -> CardBlock {
    let mut elements = Vec::with_capacity(6);
    elements.push(match image {
        ImageAsset::Bytes(bytes) => CardElement::Image(bytes),
        ImageAsset::Unavailable(_) => CardElement::Placeholder,
    });
    elements.push(CardElement::Title(record.name.clone()));
    elements.push(CardElement::Text(record.description.clone()));
    elements.push(CardElement::Text(price_line(&record.price)));
    elements.push(CardElement::Text(stock_line(&record.stock)));
    if with_mini_logo {
        elements.push(CardElement::MiniLogo);
    }
    CardBlock { elements }
}

/// Pack cards into rows of `cards_per_row`; the last row may be partial
pub fn pack_rows(cards: Vec<CardBlock>, cards_per_row: usize) -> Vec<PageRow> {
    let per_row = cards_per_row.max(1);
    let mut rows = Vec::with_capacity(cards.len().div_ceil(per_row));
    let mut current = Vec::with_capacity(per_row);

    for card in cards {
        current.push(card);
        if current.len() == per_row {
            rows.push(PageRow {
                cards: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        rows.push(PageRow { cards: current });
    }
    rows
}

/// Pack rows into pages of `rows_per_page`; the last page may be partial
pub fn pack_pages(rows: Vec<PageRow>, rows_per_page: usize) -> Vec<PageGroup> {
    let per_page = rows_per_page.max(1);
    let mut pages = Vec::with_capacity(rows.len().div_ceil(per_page));
    let mut current = Vec::with_capacity(per_page);

    for row in rows {
        current.push(row);
        if current.len() == per_page {
            pages.push(PageGroup {
                rows: std::mem::take(&mut current),
            });
        }
    }
    if !current.is_empty() {
        pages.push(PageGroup { rows: current });
    }
    pages
}

/// Resolve every record's image in order and pack the resulting cards
pub async fn plan_category<F: HttpFetch>(
    group: &CategoryGroup,
    cards_per_row: usize,
    with_mini_logo: bool,
    resolver: &ImageResolver<F>,
) -> PlannedCategory {
    let mut cards = Vec::with_capacity(group.records.len());
    for record in &group.records {
        let image = resolver.resolve(&record.image_reference).await;
        cards.push(build_card(record, image, with_mini_logo));
    }

    PlannedCategory {
        category: group.category.clone(),
        rows: pack_rows(cards, cards_per_row),
    }
}

/// Plan every group in order
pub async fn plan_catalog<F: HttpFetch>(
    groups: &[CategoryGroup],
    cards_per_row: usize,
    with_mini_logo: bool,
    resolver: &ImageResolver<F>,
) -> Vec<PlannedCategory> {
    let mut planned = Vec::with_capacity(groups.len());
    for group in groups {
        planned.push(plan_category(group, cards_per_row, with_mini_logo, resolver).await);
    }
    planned
}
