//! PDF output for an `Invoice`.
//!
//! Layout works in millimetres from the top-left corner of a landscape A4
//! page and is converted to PDF points only when the content streams are
//! written. Rows flow onto a new page once the next row would cross the
//! bottom break line; the header row is not repeated.

use anyhow::{Context, Result};
use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream, StringFormat};

use super::{Invoice, COLUMN_WIDTHS_MM};

const PAGE_WIDTH_MM: f32 = 297.0;
const PAGE_HEIGHT_MM: f32 = 210.0;
const MARGIN_MM: f32 = 10.0;
const BOTTOM_BREAK_MM: f32 = 20.0;
const CELL_PADDING_MM: f32 = 1.0;
const LINE_WIDTH_MM: f32 = 0.2;

const TITLE_HEIGHT_MM: f32 = 10.0;
const DATE_HEIGHT_MM: f32 = 10.0;
const GAP_AFTER_DATE_MM: f32 = 5.0;
const ROW_HEIGHT_MM: f32 = 8.0;

const TITLE_SIZE_PT: f32 = 16.0;
const BODY_SIZE_PT: f32 = 12.0;

const POINTS_PER_MM: f32 = 72.0 / 25.4;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Font {
    Regular,
    Bold,
}

impl Font {
    fn resource_name(self) -> &'static str {
        match self {
            Font::Regular => "F1",
            Font::Bold => "F2",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Align {
    Left,
    Center,
}

/// One placed text cell, in millimetres from the page's top-left corner.
#[derive(Debug, Clone, PartialEq)]
pub struct PlacedCell {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    pub text: String,
    pub font: Font,
    pub size: f32,
    pub align: Align,
    pub border: bool,
}

/// A rendered document.
#[derive(Debug, Clone)]
pub struct PdfDocument {
    pub bytes: Vec<u8>,
    pub page_count: usize,
}

/// Place every cell of the invoice, page by page.
pub fn layout(invoice: &Invoice) -> Vec<Vec<PlacedCell>> {
    let content_width = PAGE_WIDTH_MM - 2.0 * MARGIN_MM;
    let break_line = PAGE_HEIGHT_MM - BOTTOM_BREAK_MM;

    let mut pages = vec![Vec::new()];
    let mut y = MARGIN_MM;

    pages[0].push(PlacedCell {
        x: MARGIN_MM,
        y,
        width: content_width,
        height: TITLE_HEIGHT_MM,
        text: invoice.title.clone(),
        font: Font::Bold,
        size: TITLE_SIZE_PT,
        align: Align::Center,
        border: false,
    });
    y += TITLE_HEIGHT_MM;

    pages[0].push(PlacedCell {
        x: MARGIN_MM,
        y,
        width: content_width,
        height: DATE_HEIGHT_MM,
        text: invoice.date_line.clone(),
        font: Font::Regular,
        size: BODY_SIZE_PT,
        align: Align::Left,
        border: false,
    });
    y += DATE_HEIGHT_MM + GAP_AFTER_DATE_MM;

    for row in std::iter::once(&invoice.header).chain(invoice.rows.iter()) {
        if y + ROW_HEIGHT_MM > break_line {
            pages.push(Vec::new());
            y = MARGIN_MM;
        }
        let page = pages.len() - 1;

        let mut x = MARGIN_MM;
        for (text, width) in row.iter().zip(COLUMN_WIDTHS_MM) {
            pages[page].push(PlacedCell {
                x,
                y,
                width,
                height: ROW_HEIGHT_MM,
                text: text.clone(),
                font: Font::Regular,
                size: BODY_SIZE_PT,
                align: Align::Center,
                border: true,
            });
            x += width;
        }
        y += ROW_HEIGHT_MM;
    }

    pages
}

/// Lay out and encode the invoice. The same invoice always gives the same
/// bytes.
pub fn write_pdf(invoice: &Invoice) -> Result<PdfDocument> {
    let pages = layout(invoice);

    let mut doc = Document::with_version("1.5");
    let pages_id = doc.new_object_id();

    let regular_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica",
        "Encoding" => "WinAnsiEncoding",
    });
    let bold_id = doc.add_object(dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => "Helvetica-Bold",
        "Encoding" => "WinAnsiEncoding",
    });
    let resources_id = doc.add_object(dictionary! {
        "Font" => dictionary! {
            Font::Regular.resource_name() => regular_id,
            Font::Bold.resource_name() => bold_id,
        },
    });

    let mut page_ids: Vec<ObjectId> = Vec::with_capacity(pages.len());
    for cells in &pages {
        let content = Content {
            operations: page_operations(cells),
        };
        let encoded = content.encode().context("Failed to encode invoice page")?;
        let content_id = doc.add_object(Stream::new(dictionary! {}, encoded));
        let page_id = doc.add_object(dictionary! {
            "Type" => "Page",
            "Parent" => pages_id,
            "Contents" => content_id,
        });
        page_ids.push(page_id);
    }

    let page_count = page_ids.len();
    let pages_dict = dictionary! {
        "Type" => "Pages",
        "Kids" => page_ids.into_iter().map(Object::from).collect::<Vec<Object>>(),
        "Count" => page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => vec![
            Object::Integer(0),
            Object::Integer(0),
            Object::Real(mm_to_pt(PAGE_WIDTH_MM)),
            Object::Real(mm_to_pt(PAGE_HEIGHT_MM)),
        ],
    };
    doc.objects.insert(pages_id, Object::Dictionary(pages_dict));

    let catalog_id = doc.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    doc.trailer.set("Root", catalog_id);

    let mut bytes = Vec::new();
    doc.save_to(&mut bytes).context("Failed to write invoice PDF")?;
    Ok(PdfDocument { bytes, page_count })
}

fn page_operations(cells: &[PlacedCell]) -> Vec<Operation> {
    let mut ops = vec![Operation::new("w", vec![Object::Real(mm_to_pt(LINE_WIDTH_MM))])];

    for cell in cells {
        // PDF y grows upwards from the bottom edge.
        let bottom = PAGE_HEIGHT_MM - cell.y - cell.height;

        if cell.border {
            ops.push(Operation::new(
                "re",
                vec![
                    Object::Real(mm_to_pt(cell.x)),
                    Object::Real(mm_to_pt(bottom)),
                    Object::Real(mm_to_pt(cell.width)),
                    Object::Real(mm_to_pt(cell.height)),
                ],
            ));
            ops.push(Operation::new("S", vec![]));
        }

        if cell.text.is_empty() {
            continue;
        }

        let text_width = text_width_mm(&cell.text, cell.size);
        let text_x = match cell.align {
            Align::Left => cell.x + CELL_PADDING_MM,
            Align::Center => cell.x + (cell.width - text_width) / 2.0,
        };
        let font_height_mm = cell.size / POINTS_PER_MM;
        let baseline = bottom + cell.height / 2.0 - 0.3 * font_height_mm;

        ops.push(Operation::new("BT", vec![]));
        ops.push(Operation::new(
            "Tf",
            vec![cell.font.resource_name().into(), Object::Real(cell.size)],
        ));
        ops.push(Operation::new(
            "Td",
            vec![
                Object::Real(mm_to_pt(text_x)),
                Object::Real(mm_to_pt(baseline)),
            ],
        ));
        ops.push(Operation::new(
            "Tj",
            vec![Object::String(win_ansi(&cell.text), StringFormat::Literal)],
        ));
        ops.push(Operation::new("ET", vec![]));
    }

    ops
}

fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

/// Standard Type1 fonts only cover Latin-1; anything else prints as `?`.
fn win_ansi(text: &str) -> Vec<u8> {
    text.chars()
        .map(|c| u8::try_from(u32::from(c)).unwrap_or(b'?'))
        .collect()
}

/// Approximate rendered width using Helvetica metrics (1/1000 em).
fn text_width_mm(text: &str, size_pt: f32) -> f32 {
    let units: u32 = text.chars().map(helvetica_width).sum();
    units as f32 / 1000.0 * size_pt / POINTS_PER_MM
}

fn helvetica_width(c: char) -> u32 {
    match c {
        '0'..='9' => 556,
        ' ' | '.' | ',' | ':' | ';' | '!' | '/' | 'f' | 't' | 'I' => 278,
        '-' | 'r' | '(' | ')' => 333,
        'i' | 'j' | 'l' => 222,
        'm' | 'M' => 833,
        'w' => 722,
        'W' => 944,
        'c' | 'k' | 's' | 'v' | 'x' | 'y' | 'z' | 'J' => 500,
        'a'..='z' => 556,
        'C' | 'D' | 'H' | 'N' | 'R' | 'U' => 722,
        'G' | 'O' | 'Q' => 778,
        'F' | 'T' | 'Z' => 611,
        'L' => 556,
        'A'..='Z' => 667,
        _ => 556,
    }
}
