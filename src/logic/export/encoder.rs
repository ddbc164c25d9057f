//! PDF encoding of a laid-out report.
//!
//! Layout units are millimetres measured from the top of the page; PDF
//! space is points from the bottom. All drawing goes through `Canvas`.

use lopdf::content::{Content, Operation};
use lopdf::{dictionary, Document, Object, ObjectId, Stream};

use super::ExportError;
use crate::logic::palette::{self, Rgb};
use crate::logic::report::layout::{
    BANNER_HEIGHT, BLOCK_GAP, BODY_PT, CARD_HEIGHT, CELL_PADDING, HEAD_ROW, INDICATOR_COLUMNS, NOTE_PT,
    ROW_PADDING, SUBTITLE_ROW, TITLE_ROW,
};
use crate::logic::report::text::line_height;
use crate::logic::report::{Block, BlockContent, PageGeometry, ReportDocument};

/// Millimetres to points
pub const MM_TO_PT: f32 = 72.0 / 25.4;

const REGULAR: &str = "F1";
const BOLD: &str = "F2";

/// Header band height; the rest of the header block is spacing
const HEADER_BAND: f32 = 35.0;
const BAR_WIDTH: f32 = 160.0;

/// Encode every page of `doc` into one PDF.
///
/// The whole document is validated before anything is drawn, so a bad
/// block yields an error and no bytes at all.
pub fn encode(doc: &ReportDocument) -> Result<Vec<u8>, ExportError> {
    validate(doc)?;

    let geometry = doc.geometry;
    let mut pdf = Document::with_version("1.5");
    let pages_id = pdf.new_object_id();

    let regular_id = pdf.add_object(font("Helvetica"));
    let bold_id = pdf.add_object(font("Helvetica-Bold"));
    let resources_id = pdf.add_object(dictionary! {
        "Font" => dictionary! {
            REGULAR => regular_id,
            BOLD => bold_id,
        },
    });

    let mut kids: Vec<Object> = Vec::with_capacity(doc.page_count);
    for page in 1..=doc.page_count {
        let mut canvas = Canvas::new(geometry);
        for block in doc.blocks_on(page) {
            canvas.draw(block);
        }
        let page_id = add_page(&mut pdf, pages_id, canvas.finish())?;
        kids.push(page_id.into());
    }

    let media_box: Vec<Object> = vec![
        0i64.into(),
        0i64.into(),
        (geometry.width * MM_TO_PT).into(),
        (geometry.height * MM_TO_PT).into(),
    ];
    let pages = dictionary! {
        "Type" => "Pages",
        "Kids" => kids,
        "Count" => doc.page_count as i64,
        "Resources" => resources_id,
        "MediaBox" => media_box,
    };
    pdf.objects.insert(pages_id, Object::Dictionary(pages));

    let info_id = pdf.add_object(dictionary! {
        "Title" => Object::string_literal(latin1(&doc.title)),
        "Producer" => Object::string_literal("PhishGuard"),
    });
    let catalog_id = pdf.add_object(dictionary! {
        "Type" => "Catalog",
        "Pages" => pages_id,
    });
    pdf.trailer.set("Root", catalog_id);
    pdf.trailer.set("Info", info_id);
    pdf.compress();

    let mut bytes = Vec::new();
    pdf.save_to(&mut bytes)
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    Ok(bytes)
}

fn font(base: &str) -> lopdf::Dictionary {
    dictionary! {
        "Type" => "Font",
        "Subtype" => "Type1",
        "BaseFont" => base,
        "Encoding" => "WinAnsiEncoding",
    }
}

fn add_page(pdf: &mut Document, pages_id: ObjectId, content: Content) -> Result<ObjectId, ExportError> {
    let data = content
        .encode()
        .map_err(|e| ExportError::Encoding(e.to_string()))?;
    let content_id = pdf.add_object(Stream::new(dictionary! {}, data));
    Ok(pdf.add_object(dictionary! {
        "Type" => "Page",
        "Parent" => pages_id,
        "Contents" => content_id,
    }))
}

// ============================================================================
// VALIDATION
// ============================================================================

fn validate(doc: &ReportDocument) -> Result<(), ExportError> {
    let g = doc.geometry;
    let dims = [g.width, g.height, g.header_height, g.capacity, g.margin];
    if dims.iter().any(|v| !v.is_finite()) || g.width <= 0.0 || g.height <= 0.0 {
        return Err(ExportError::InvalidGeometry);
    }
    if doc.page_count == 0 {
        return Err(ExportError::EmptyDocument);
    }

    for (index, block) in doc.blocks.iter().enumerate() {
        if block.page == 0 || block.page > doc.page_count {
            return Err(ExportError::UnsupportedBlock {
                index,
                reason: format!("page {} outside 1..={}", block.page, doc.page_count),
            });
        }
        if !block.y.is_finite() || !block.height.is_finite() || block.height < 0.0 {
            return Err(ExportError::UnsupportedBlock {
                index,
                reason: "non-finite geometry".to_string(),
            });
        }
    }
    Ok(())
}

// ============================================================================
// CANVAS
// ============================================================================

/// Collects drawing operations for one page
struct Canvas {
    geometry: PageGeometry,
    ops: Vec<Operation>,
}

impl Canvas {
    fn new(geometry: PageGeometry) -> Self {
        Self { geometry, ops: Vec::new() }
    }

    fn finish(self) -> Content {
        Content { operations: self.ops }
    }

    fn x(&self, mm: f32) -> Object {
        (mm * MM_TO_PT).into()
    }

    fn y(&self, mm: f32) -> Object {
        ((self.geometry.height - mm) * MM_TO_PT).into()
    }

    fn fill_rect(&mut self, x: f32, y: f32, w: f32, h: f32, color: Rgb) {
        self.fill_color(color);
        let rect = vec![self.x(x), self.y(y + h), self.x(w), self.x(h)];
        self.ops.push(Operation::new("re", rect));
        self.ops.push(Operation::new("f", vec![]));
    }

    fn line(&mut self, x1: f32, y1: f32, x2: f32, y2: f32, color: Rgb) {
        let [r, g, b] = color.unit();
        self.ops.push(Operation::new("RG", vec![r.into(), g.into(), b.into()]));
        self.ops.push(Operation::new("w", vec![0.5f32.into()]));
        let from = vec![self.x(x1), self.y(y1)];
        let to = vec![self.x(x2), self.y(y2)];
        self.ops.push(Operation::new("m", from));
        self.ops.push(Operation::new("l", to));
        self.ops.push(Operation::new("S", vec![]));
    }

    fn fill_color(&mut self, color: Rgb) {
        let [r, g, b] = color.unit();
        self.ops.push(Operation::new("rg", vec![r.into(), g.into(), b.into()]));
    }

    /// Text with its baseline at `y`
    fn text(&mut self, x: f32, y: f32, font: &str, size: f32, color: Rgb, s: &str) {
        if s.is_empty() {
            return;
        }
        self.ops.push(Operation::new("BT", vec![]));
        self.fill_color(color);
        self.ops.push(Operation::new("Tf", vec![font.into(), size.into()]));
        let at = vec![self.x(x), self.y(y)];
        self.ops.push(Operation::new("Td", at));
        self.ops.push(Operation::new("Tj", vec![Object::string_literal(latin1(s))]));
        self.ops.push(Operation::new("ET", vec![]));
    }

    fn draw(&mut self, block: &Block) {
        let g = self.geometry;
        let left = g.margin;
        let width = g.content_width();
        let y = block.y;

        match &block.content {
            BlockContent::Header { title, subtitle, meta, theme, logo } => {
                self.fill_rect(0.0, 0.0, g.width, HEADER_BAND, *theme);
                self.fill_rect(left, 8.0, 18.0, 18.0, palette::WHITE);
                self.text(left + 3.5, 19.5, BOLD, 14.0, *theme, logo);
                self.text(left + 24.0, 16.0, BOLD, 20.0, palette::WHITE, title);
                self.text(left + 24.0, 23.0, REGULAR, 10.0, palette::WHITE, subtitle);
                for (i, line) in meta.iter().enumerate() {
                    self.text(g.width - left - 55.0, 12.0 + i as f32 * 5.0, REGULAR, 8.0, palette::WHITE, line);
                }
            }
            BlockContent::Banner { text, color } => {
                self.fill_rect(left, y, width, BANNER_HEIGHT, *color);
                self.text(left + 8.0, y + 14.0, BOLD, 16.0, palette::WHITE, text);
            }
            BlockContent::RiskCard { risk_score, confidence_label, severity_label, bar_fraction, bar_color } => {
                self.fill_rect(left, y, width, CARD_HEIGHT, palette::CARD_FILL);
                self.text(left + 5.0, y + 7.0, BOLD, 11.0, palette::BLACK, "Risk Assessment");
                self.text(left + 5.0, y + 14.0, REGULAR, 10.0, palette::TEXT_MUTED, &format!("Risk Score: {}/100", risk_score));
                self.text(left + 70.0, y + 14.0, REGULAR, 10.0, palette::TEXT_MUTED, &format!("Confidence: {}", confidence_label));
                self.text(left + 125.0, y + 14.0, REGULAR, 10.0, palette::TEXT_MUTED, &format!("Severity: {}", severity_label));
                let bar = BAR_WIDTH.min(width - 10.0);
                self.fill_rect(left + 5.0, y + 19.0, bar, 5.0, palette::GRID);
                self.fill_rect(left + 5.0, y + 19.0, bar * bar_fraction.clamp(0.0, 1.0), 5.0, *bar_color);
            }
            BlockContent::Table { title, head, rows, columns, theme } => {
                self.text(left, y + 6.0, BOLD, 12.0, *theme, title);
                let stops = column_stops(left, width, columns);
                self.head_row(y + TITLE_ROW, &stops, width, head, *theme);

                let lh = line_height(BODY_PT);
                let mut row_y = y + TITLE_ROW + HEAD_ROW;
                for (r, row) in rows.iter().enumerate() {
                    let h = row.line_count() as f32 * lh + ROW_PADDING;
                    if r % 2 == 1 {
                        self.fill_rect(left, row_y, width, h, palette::STRIPE_FILL);
                    }
                    for (cell, x) in row.cells.iter().zip(&stops) {
                        for (k, line) in cell.iter().enumerate() {
                            let baseline = row_y + CELL_PADDING + lh * (k as f32 + 1.0) - 1.0;
                            self.text(x + CELL_PADDING, baseline, REGULAR, BODY_PT, palette::BLACK, line);
                        }
                    }
                    row_y += h;
                    self.line(left, row_y, left + width, row_y, palette::GRID);
                }
            }
            BlockContent::SectionTitle { title, subtitle, head, theme } => {
                self.text(left, y + 6.0, BOLD, 13.0, palette::BLACK, title);
                self.text(left, y + TITLE_ROW + 4.0, REGULAR, 9.0, palette::TEXT_MUTED, subtitle);
                let stops = column_stops(left, width, &INDICATOR_COLUMNS);
                self.head_row(y + TITLE_ROW + SUBTITLE_ROW, &stops, width, head, *theme);
            }
            BlockContent::IndicatorRow { index, tag, lines, color, striped, .. } => {
                if *striped {
                    self.fill_rect(left, y, width, block.height, palette::STRIPE_FILL);
                }
                let stops = column_stops(left, width, &INDICATOR_COLUMNS);
                let lh = line_height(BODY_PT);
                let first = y + CELL_PADDING + lh - 1.0;
                self.text(stops[0] + CELL_PADDING, first, BOLD, BODY_PT, *color, &index.to_string());
                self.text(stops[1] + CELL_PADDING, first, BOLD, BODY_PT - 1.0, *color, tag);
                for (k, line) in lines.iter().enumerate() {
                    self.text(stops[2] + CELL_PADDING, first + lh * k as f32, REGULAR, BODY_PT, palette::BLACK, line);
                }
                let bottom = y + block.height;
                self.line(left, bottom, left + width, bottom, palette::GRID);
            }
            BlockContent::Note { title, lines, fill } => {
                let top = y + BLOCK_GAP;
                let h = (block.height - BLOCK_GAP).max(0.0);
                self.fill_rect(left, top, width, h, *fill);
                self.text(left + 5.0, top + 7.0, BOLD, 11.0, palette::BLACK, title);
                let lh = line_height(NOTE_PT);
                for (k, line) in lines.iter().enumerate() {
                    let baseline = top + TITLE_ROW + ROW_PADDING + lh * k as f32;
                    self.text(left + 5.0, baseline, REGULAR, NOTE_PT, palette::TEXT_MUTED, line);
                }
            }
            BlockContent::Footer { left: left_text, center, page_label } => {
                self.line(left, y + 5.0, left + width, y + 5.0, palette::RULE);
                self.text(left, y + 10.0, REGULAR, 8.0, palette::FOOTER_TEXT, left_text);
                self.text(g.width / 2.0 - 15.0, y + 10.0, REGULAR, 8.0, palette::FOOTER_TEXT, center);
                self.text(g.width - left - 20.0, y + 10.0, REGULAR, 8.0, palette::FOOTER_TEXT, page_label);
            }
        }
    }

    fn head_row(&mut self, y: f32, stops: &[f32], width: f32, head: &[String], theme: Rgb) {
        let left = self.geometry.margin;
        self.fill_rect(left, y, width, HEAD_ROW, theme);
        for (label, x) in head.iter().zip(stops) {
            self.text(x + CELL_PADDING, y + 5.5, BOLD, BODY_PT, palette::WHITE, label);
        }
    }
}

/// Left edge of each column
fn column_stops(left: f32, width: f32, columns: &[f32]) -> Vec<f32> {
    let mut x = left;
    columns
        .iter()
        .map(|fraction| {
            let stop = x;
            x += width * fraction;
            stop
        })
        .collect()
}

/// Map to the single-byte range the base-14 fonts can show
pub fn latin1(s: &str) -> Vec<u8> {
    s.chars()
        .map(|c| match c {
            '\u{2018}' | '\u{2019}' => b'\'',
            '\u{201C}' | '\u{201D}' => b'"',
            '\u{2013}' | '\u{2014}' => b'-',
            c if (c as u32) < 0x20 => b' ',
            c if (c as u32) <= 0xFF => c as u32 as u8,
            _ => b'?',
        })
        .collect()
}
