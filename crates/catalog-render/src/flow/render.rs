//! Pagination and PDF emission for flow documents

use super::metrics::{text_width, wrap_text};
use super::*;
use crate::types::{PaperSize, RenderError, Result, RgbColor};
use printpdf::{
    BuiltinFont, Color, LinePoint, Mm, Op, PaintMode, PdfDocument, PdfPage, PdfSaveOptions,
    Point, Polygon, PolygonRing, Pt, Rgb, TextItem, WindingOrder, XObjectId, XObjectTransform,
};
use std::collections::HashMap;
use std::ops::Range;

/// Default page margin (one inch)
const DEFAULT_MARGIN_PT: f32 = 72.0;

const FOOTER_FONT_SIZE: f32 = 8.0;

/// Text baseline sits this fraction of the font size above the line bottom
const DESCENT_RATIO: f32 = 0.2;

type FooterFn = Box<dyn Fn(usize) -> String + Send + Sync>;

/// Part of a block placed on a page
#[derive(Debug, Clone)]
enum Fragment<'a> {
    Block(&'a Block),
    TableRows {
        table: &'a Table,
        rows: Range<usize>,
        heights: Vec<f32>,
    },
}

#[derive(Debug, Clone)]
struct Placement<'a> {
    fragment: Fragment<'a>,
    y_top: f32,
}

/// Blocks assigned to one page, in drawing order
#[derive(Debug, Clone, Default)]
pub struct PageLayout<'a> {
    placements: Vec<Placement<'a>>,
}

impl PageLayout<'_> {
    pub fn is_empty(&self) -> bool {
        self.placements.is_empty()
    }

    /// Number of blocks or table fragments on the page
    pub fn len(&self) -> usize {
        self.placements.len()
    }

    /// Paragraph texts placed directly on the page
    pub fn texts(&self) -> Vec<&str> {
        self.placements
            .iter()
            .filter_map(|p| match p.fragment {
                Fragment::Block(block) => block.text(),
                Fragment::TableRows { .. } => None,
            })
            .collect()
    }
}

/// Usable (width, height) of a page inside the default margins
pub fn frame_size(paper: PaperSize) -> (f32, f32) {
    let (w, h) = paper.dimensions_mm();
    (
        Mm(w).into_pt().0 - 2.0 * DEFAULT_MARGIN_PT,
        Mm(h).into_pt().0 - 2.0 * DEFAULT_MARGIN_PT,
    )
}

/// An ordered list of blocks plus page geometry and an optional footer
pub struct FlowDocument {
    title: String,
    paper: PaperSize,
    margin: f32,
    blocks: Vec<Block>,
    footer: Option<FooterFn>,
}

impl FlowDocument {
    pub fn new(title: impl Into<String>, paper: PaperSize) -> Self {
        Self {
            title: title.into(),
            paper,
            margin: DEFAULT_MARGIN_PT,
            blocks: Vec::new(),
            footer: None,
        }
    }

    /// Draw the returned text centered in the bottom margin of every page.
    /// The callback receives the 1-based page number.
    pub fn with_footer(mut self, footer: impl Fn(usize) -> String + Send + Sync + 'static) -> Self {
        self.footer = Some(Box::new(footer));
        self
    }

    pub fn extend(&mut self, blocks: impl IntoIterator<Item = Block>) {
        self.blocks.extend(blocks);
    }

    fn page_size_pt(&self) -> (f32, f32) {
        let (w, h) = self.paper.dimensions_mm();
        (Mm(w).into_pt().0, Mm(h).into_pt().0)
    }

    fn frame_width(&self) -> f32 {
        self.page_size_pt().0 - 2.0 * self.margin
    }

    /// Flow the blocks into pages.
    ///
    /// A page break always closes the current page, so a trailing break
    /// produces a trailing empty page. Tables split between rows; any other
    /// block that does not fit moves to the next page unless the page is
    /// still empty.
    pub fn paginate(&self) -> Vec<PageLayout<'_>> {
        let (_, page_height) = self.page_size_pt();
        let frame_top = page_height - self.margin;
        let frame_bottom = self.margin;
        let frame_width = self.frame_width();

        let mut pages = Vec::new();
        let mut current = PageLayout::default();
        let mut y = frame_top;

        for block in &self.blocks {
            match block {
                Block::PageBreak => {
                    pages.push(std::mem::take(&mut current));
                    y = frame_top;
                }
                Block::Spacer { height } => {
                    if y - height < frame_bottom {
                        if !current.is_empty() {
                            pages.push(std::mem::take(&mut current));
                        }
                        y = frame_top;
                    } else {
                        y -= height;
                    }
                }
                Block::Table(table) => {
                    let heights = table_row_heights(table);
                    let mut start = 0;
                    let mut top = y;
                    for (i, height) in heights.iter().enumerate() {
                        let page_has_content = !current.is_empty() || i > start;
                        if y - height < frame_bottom && page_has_content {
                            if i > start {
                                current.placements.push(Placement {
                                    fragment: Fragment::TableRows {
                                        table,
                                        rows: start..i,
                                        heights: heights[start..i].to_vec(),
                                    },
                                    y_top: top,
                                });
                            }
                            pages.push(std::mem::take(&mut current));
                            y = frame_top;
                            top = y;
                            start = i;
                        }
                        y -= height;
                    }
                    if start < heights.len() {
                        current.placements.push(Placement {
                            fragment: Fragment::TableRows {
                                table,
                                rows: start..heights.len(),
                                heights: heights[start..].to_vec(),
                            },
                            y_top: top,
                        });
                    }
                }
                other => {
                    let height = measure(other, frame_width);
                    if y - height < frame_bottom && !current.is_empty() {
                        pages.push(std::mem::take(&mut current));
                        y = frame_top;
                    }
                    current.placements.push(Placement {
                        fragment: Fragment::Block(other),
                        y_top: y,
                    });
                    y -= height;
                }
            }
        }

        pages.push(current);
        pages
    }

    pub fn page_count(&self) -> usize {
        self.paginate().len()
    }

    /// Lay out and serialize the document
    pub fn build(&self) -> Result<Vec<u8>> {
        let (page_w_mm, page_h_mm) = self.paper.dimensions_mm();
        let (page_width, _) = self.page_size_pt();
        let frame_width = self.frame_width();

        let mut doc = PdfDocument::new(&self.title);
        let mut painter = Painter {
            images: HashMap::new(),
        };
        let mut pages = Vec::new();

        for (index, layout) in self.paginate().into_iter().enumerate() {
            let mut ops = Vec::new();
            for placement in &layout.placements {
                match &placement.fragment {
                    Fragment::Block(block) => painter.draw_block(
                        &mut doc,
                        &mut ops,
                        block,
                        self.margin,
                        placement.y_top,
                        frame_width,
                        Alignment::Center,
                    ),
                    Fragment::TableRows {
                        table,
                        rows,
                        heights,
                    } => {
                        let x = aligned_x(self.margin, frame_width, table.width(), Alignment::Center);
                        painter.draw_table_rows(
                            &mut doc,
                            &mut ops,
                            table,
                            rows.clone(),
                            heights,
                            x,
                            placement.y_top,
                        );
                    }
                }
            }

            if let Some(footer) = &self.footer {
                let text = footer(index + 1);
                let width = text_width(&text, FOOTER_FONT_SIZE, false);
                draw_text_line(
                    &mut ops,
                    &text,
                    (page_width - width) / 2.0,
                    self.margin / 2.0,
                    FOOTER_FONT_SIZE,
                    false,
                    RgbColor::GREY,
                );
            }

            pages.push(PdfPage::new(Mm(page_w_mm), Mm(page_h_mm), ops));
        }

        let page_count = pages.len();
        doc.pages = pages;

        let mut warnings = Vec::new();
        let bytes = doc.save(&PdfSaveOptions::default(), &mut warnings);
        if bytes.is_empty() {
            return Err(RenderError::Pdf(format!(
                "Empty output for '{}' ({} warnings)",
                self.title,
                warnings.len()
            )));
        }

        tracing::debug!(
            "Built '{}': {} pages, {} bytes",
            self.title,
            page_count,
            bytes.len()
        );
        Ok(bytes)
    }
}

/// Height of a block laid out in `width`
pub(super) fn measure(block: &Block, width: f32) -> f32 {
    match block {
        Block::Paragraph { text, style } => {
            let lines = wrap_text(text, style.font_size, style.bold, width);
            if lines.is_empty() {
                0.0
            } else {
                style.space_before + lines.len() as f32 * style.leading + style.space_after
            }
        }
        Block::Spacer { height } => *height,
        Block::Image(image) => image.height,
        Block::Table(table) => table_row_heights(table).iter().sum(),
        Block::PageBreak => 0.0,
    }
}

fn cell_inner_width(table: &Table, col: usize) -> f32 {
    let width = table.col_widths.get(col).copied().unwrap_or(0.0);
    (width - table.style.padding_left - table.style.padding_right).max(0.0)
}

fn cell_content_height(cell: &Cell, inner_width: f32) -> f32 {
    cell.content.iter().map(|b| measure(b, inner_width)).sum()
}

pub(super) fn table_row_heights(table: &Table) -> Vec<f32> {
    if let Some(fixed) = &table.row_heights {
        return (0..table.rows.len())
            .map(|i| fixed.get(i).or(fixed.last()).copied().unwrap_or(0.0))
            .collect();
    }

    table
        .rows
        .iter()
        .map(|row| {
            let content = row
                .iter()
                .enumerate()
                .map(|(col, cell)| cell_content_height(cell, cell_inner_width(table, col)))
                .fold(0.0_f32, f32::max);
            content + table.style.padding_top + table.style.padding_bottom
        })
        .collect()
}

fn aligned_x(x: f32, available: f32, width: f32, alignment: Alignment) -> f32 {
    match alignment {
        Alignment::Left => x,
        Alignment::Center => x + (available - width) / 2.0,
        Alignment::Right => x + available - width,
    }
}

fn pdf_color(color: RgbColor) -> Color {
    Color::Rgb(Rgb {
        r: color.r,
        g: color.g,
        b: color.b,
        icc_profile: None,
    })
}

fn rect_op(x: f32, y: f32, width: f32, height: f32, mode: PaintMode) -> Op {
    let corner = |px: f32, py: f32| LinePoint {
        p: Point {
            x: Pt(px),
            y: Pt(py),
        },
        bezier: false,
    };
    Op::DrawPolygon {
        polygon: Polygon {
            rings: vec![PolygonRing {
                points: vec![
                    corner(x, y),
                    corner(x + width, y),
                    corner(x + width, y + height),
                    corner(x, y + height),
                ],
            }],
            mode,
            winding_order: WindingOrder::NonZero,
        },
    }
}

fn draw_text_line(
    ops: &mut Vec<Op>,
    text: &str,
    x: f32,
    baseline: f32,
    font_size: f32,
    bold: bool,
    color: RgbColor,
) {
    let font = if bold {
        BuiltinFont::HelveticaBold
    } else {
        BuiltinFont::Helvetica
    };

    ops.push(Op::SaveGraphicsState);
    ops.push(Op::SetFillColor {
        col: pdf_color(color),
    });
    ops.push(Op::StartTextSection);
    ops.push(Op::SetTextCursor {
        pos: Point {
            x: Pt(x),
            y: Pt(baseline),
        },
    });
    ops.push(Op::SetFontSizeBuiltinFont {
        font,
        size: Pt(font_size),
    });
    ops.push(Op::WriteTextBuiltinFont {
        items: vec![TextItem::Text(text.to_string())],
        font,
    });
    ops.push(Op::EndTextSection);
    ops.push(Op::RestoreGraphicsState);
}

/// Emits drawing operations, registering each shared image once
struct Painter {
    images: HashMap<usize, XObjectId>,
}

impl Painter {
    fn image_id(&mut self, doc: &mut PdfDocument, data: &ImageData) -> XObjectId {
        self.images
            .entry(data.key())
            .or_insert_with(|| doc.add_image(data.raw()))
            .clone()
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_block(
        &mut self,
        doc: &mut PdfDocument,
        ops: &mut Vec<Op>,
        block: &Block,
        x: f32,
        y_top: f32,
        width: f32,
        alignment: Alignment,
    ) {
        match block {
            Block::Paragraph { text, style } => {
                let lines = wrap_text(text, style.font_size, style.bold, width);
                let mut line_top = y_top - style.space_before;
                for line in lines {
                    let line_width = text_width(&line, style.font_size, style.bold);
                    let line_x = aligned_x(x, width, line_width, style.alignment);
                    let baseline = line_top - style.leading + DESCENT_RATIO * style.font_size;
                    draw_text_line(
                        ops,
                        &line,
                        line_x,
                        baseline,
                        style.font_size,
                        style.bold,
                        style.color,
                    );
                    line_top -= style.leading;
                }
            }
            Block::Image(image) => {
                let image_x = aligned_x(x, width, image.width, alignment);
                let id = self.image_id(doc, &image.data);
                let width_px = image.data.width_px().max(1) as f32;
                let height_px = image.data.height_px().max(1) as f32;
                ops.push(Op::UseXobject {
                    id,
                    transform: XObjectTransform {
                        translate_x: Some(Pt(image_x)),
                        translate_y: Some(Pt(y_top - image.height)),
                        scale_x: Some(image.width / width_px),
                        scale_y: Some(image.height / height_px),
                        dpi: Some(72.0),
                        ..Default::default()
                    },
                });
            }
            Block::Table(table) => {
                let heights = table_row_heights(table);
                let table_x = aligned_x(x, width, table.width(), alignment);
                self.draw_table_rows(doc, ops, table, 0..table.rows.len(), &heights, table_x, y_top);
            }
            Block::Spacer { .. } | Block::PageBreak => {}
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn draw_table_rows(
        &mut self,
        doc: &mut PdfDocument,
        ops: &mut Vec<Op>,
        table: &Table,
        rows: Range<usize>,
        heights: &[f32],
        x: f32,
        y_top: f32,
    ) {
        let style = &table.style;
        let table_width = table.width();
        let fragment_height: f32 = heights.iter().sum();

        if let Some(background) = style.background {
            ops.push(Op::SaveGraphicsState);
            ops.push(Op::SetFillColor {
                col: pdf_color(background),
            });
            ops.push(rect_op(
                x,
                y_top - fragment_height,
                table_width,
                fragment_height,
                PaintMode::Fill,
            ));
            ops.push(Op::RestoreGraphicsState);
        }

        let mut row_top = y_top;
        for (row_index, height) in rows.zip(heights.iter().copied()) {
            let mut cell_x = x;
            for (col, cell) in table.rows[row_index].iter().enumerate() {
                let col_width = table.col_widths.get(col).copied().unwrap_or(0.0);
                let inner_width = cell_inner_width(table, col);
                let content_height = cell_content_height(cell, inner_width);
                let available = height - style.padding_top - style.padding_bottom;
                let offset = match style.valign {
                    VerticalAlignment::Top => 0.0,
                    VerticalAlignment::Middle => ((available - content_height) / 2.0).max(0.0),
                    VerticalAlignment::Bottom => (available - content_height).max(0.0),
                };

                let inner_x = cell_x + style.padding_left;
                let mut content_top = row_top - style.padding_top - offset;
                for block in &cell.content {
                    self.draw_block(
                        doc,
                        ops,
                        block,
                        inner_x,
                        content_top,
                        inner_width,
                        style.align,
                    );
                    content_top -= measure(block, inner_width);
                }
                cell_x += col_width;
            }
            row_top -= height;
        }

        if let Some(outline) = style.outline {
            ops.push(Op::SaveGraphicsState);
            ops.push(Op::SetOutlineColor {
                col: pdf_color(outline.color),
            });
            ops.push(Op::SetOutlineThickness {
                pt: Pt(outline.width),
            });
            ops.push(rect_op(
                x,
                y_top - fragment_height,
                table_width,
                fragment_height,
                PaintMode::Stroke,
            ));
            ops.push(Op::RestoreGraphicsState);
        }
    }
}
