//! Block-based page layout over `printpdf`
//!
//! A document is an ordered list of [`Block`]s: styled paragraphs, spacers,
//! images, tables whose cells hold further blocks, and explicit page breaks.
//! [`FlowDocument`] flows them top-down into pages and writes the PDF.
//!
//! All lengths are in points.

mod metrics;
mod picture;
mod render;

pub use picture::ImageData;
pub use metrics::{text_width, wrap_text};
pub use render::{FlowDocument, PageLayout, frame_size};

use crate::types::RgbColor;

/// Points per centimeter
pub const PT_PER_CM: f32 = 72.0 / 2.54;

/// Convert centimeters to points
#[inline]
pub fn cm(value: f32) -> f32 {
    value * PT_PER_CM
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Alignment {
    #[default]
    Left,
    Center,
    Right,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VerticalAlignment {
    Top,
    #[default]
    Middle,
    Bottom,
}

/// Named paragraph style
#[derive(Debug, Clone, PartialEq)]
pub struct ParagraphStyle {
    pub name: String,
    pub font_size: f32,
    pub leading: f32,
    pub alignment: Alignment,
    pub color: RgbColor,
    pub bold: bool,
    pub space_before: f32,
    pub space_after: f32,
}

impl ParagraphStyle {
    pub fn new(name: impl Into<String>, font_size: f32) -> Self {
        Self {
            name: name.into(),
            font_size,
            leading: font_size * 1.2,
            alignment: Alignment::Left,
            color: RgbColor::BLACK,
            bold: false,
            space_before: 0.0,
            space_after: 0.0,
        }
    }

    /// Body text: 10pt on 12pt leading
    pub fn normal() -> Self {
        Self::new("Normal", 10.0).leading(12.0)
    }

    /// Document title: 18pt bold, centered
    pub fn title() -> Self {
        Self::new("Title", 18.0)
            .leading(22.0)
            .bold()
            .align(Alignment::Center)
            .space_after(6.0)
    }

    pub fn leading(mut self, leading: f32) -> Self {
        self.leading = leading;
        self
    }

    pub fn align(mut self, alignment: Alignment) -> Self {
        self.alignment = alignment;
        self
    }

    pub fn color(mut self, color: RgbColor) -> Self {
        self.color = color;
        self
    }

    pub fn bold(mut self) -> Self {
        self.bold = true;
        self
    }

    pub fn space_before(mut self, space: f32) -> Self {
        self.space_before = space;
        self
    }

    pub fn space_after(mut self, space: f32) -> Self {
        self.space_after = space;
        self
    }
}

/// Stroke used for table boxes
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LineStyle {
    pub width: f32,
    pub color: RgbColor,
}

/// Style rules applied to every cell of a table
#[derive(Debug, Clone, PartialEq)]
pub struct TableStyle {
    pub align: Alignment,
    pub valign: VerticalAlignment,
    pub outline: Option<LineStyle>,
    pub background: Option<RgbColor>,
    pub padding_top: f32,
    pub padding_bottom: f32,
    pub padding_left: f32,
    pub padding_right: f32,
}

impl Default for TableStyle {
    fn default() -> Self {
        Self {
            align: Alignment::Left,
            valign: VerticalAlignment::Bottom,
            outline: None,
            background: None,
            padding_top: 3.0,
            padding_bottom: 3.0,
            padding_left: 6.0,
            padding_right: 6.0,
        }
    }
}

impl TableStyle {
    pub fn centered() -> Self {
        Self {
            align: Alignment::Center,
            valign: VerticalAlignment::Middle,
            ..Default::default()
        }
    }

    pub fn vertical_padding(mut self, padding: f32) -> Self {
        self.padding_top = padding;
        self.padding_bottom = padding;
        self
    }

    pub fn outline(mut self, width: f32, color: RgbColor) -> Self {
        self.outline = Some(LineStyle { width, color });
        self
    }

    pub fn background(mut self, color: RgbColor) -> Self {
        self.background = Some(color);
        self
    }
}

/// A table cell; its blocks stack top to bottom
#[derive(Debug, Clone, Default)]
pub struct Cell {
    pub content: Vec<Block>,
}

impl Cell {
    pub fn new(content: Vec<Block>) -> Self {
        Self { content }
    }
}

impl From<Block> for Cell {
    fn from(block: Block) -> Self {
        Self {
            content: vec![block],
        }
    }
}

#[derive(Debug, Clone)]
pub struct Table {
    pub rows: Vec<Vec<Cell>>,
    pub col_widths: Vec<f32>,
    /// Fixed row heights; measured from content when absent
    pub row_heights: Option<Vec<f32>>,
    pub style: TableStyle,
}

impl Table {
    pub fn new(rows: Vec<Vec<Cell>>, col_widths: Vec<f32>) -> Self {
        Self {
            rows,
            col_widths,
            row_heights: None,
            style: TableStyle::default(),
        }
    }

    pub fn with_style(mut self, style: TableStyle) -> Self {
        self.style = style;
        self
    }

    pub fn with_row_heights(mut self, heights: Vec<f32>) -> Self {
        self.row_heights = Some(heights);
        self
    }

    pub fn width(&self) -> f32 {
        self.col_widths.iter().sum()
    }

    /// Total height of all rows
    pub fn height(&self) -> f32 {
        render::table_row_heights(self).iter().sum()
    }
}

#[derive(Debug, Clone)]
pub struct ImageBlock {
    pub data: ImageData,
    pub width: f32,
    pub height: f32,
}

#[derive(Debug, Clone)]
pub enum Block {
    Paragraph { text: String, style: ParagraphStyle },
    Spacer { height: f32 },
    Image(ImageBlock),
    Table(Table),
    PageBreak,
}

impl Block {
    pub fn paragraph(text: impl Into<String>, style: &ParagraphStyle) -> Self {
        Block::Paragraph {
            text: text.into(),
            style: style.clone(),
        }
    }

    pub fn spacer(height: f32) -> Self {
        Block::Spacer { height }
    }

    pub fn image(data: ImageData, width: f32, height: f32) -> Self {
        Block::Image(ImageBlock {
            data,
            width,
            height,
        })
    }

    /// Height of the block when laid out in `width`
    pub fn height(&self, width: f32) -> f32 {
        render::measure(self, width)
    }

    pub fn is_page_break(&self) -> bool {
        matches!(self, Block::PageBreak)
    }

    pub fn text(&self) -> Option<&str> {
        match self {
            Block::Paragraph { text, .. } => Some(text),
            _ => None,
        }
    }

    pub fn style_name(&self) -> Option<&str> {
        match self {
            Block::Paragraph { style, .. } => Some(&style.name),
            _ => None,
        }
    }
}
