use serde::Serialize;

use crate::logic::analysis::ContentKind;
use crate::logic::explain::IndicatorKind;
use crate::logic::palette::Rgb;

// ============================================================================
// GEOMETRY
// ============================================================================

/// Page geometry in layout units (millimetres for A4)
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageGeometry {
    pub width: f32,
    pub height: f32,
    /// Offset where content starts below the page header
    pub header_height: f32,
    /// Lowest offset content may reach; the footer band sits below it
    pub capacity: f32,
    pub margin: f32,
}

impl PageGeometry {
    pub fn a4() -> Self {
        Self {
            width: 210.0,
            height: 297.0,
            header_height: 45.0,
            capacity: 277.0,
            margin: 20.0,
        }
    }

    pub fn content_width(&self) -> f32 {
        self.width - 2.0 * self.margin
    }
}

impl Default for PageGeometry {
    fn default() -> Self {
        Self::a4()
    }
}

/// Position of the next free slot
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageCursor {
    /// 1-based
    pub page: usize,
    pub offset: f32,
    pub capacity: f32,
}

// ============================================================================
// BLOCKS
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BlockRole {
    Header,
    Banner,
    Card,
    Table,
    Text,
    Footer,
}

/// One positioned unit of the report
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Block {
    pub role: BlockRole,
    /// 1-based
    pub page: usize,
    /// Top edge, measured from the top of the page
    pub y: f32,
    pub height: f32,
    pub content: BlockContent,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum BlockContent {
    Header {
        title: String,
        subtitle: String,
        /// "User: ...", email, "Generated: ..."
        meta: Vec<String>,
        theme: Rgb,
        logo: String,
    },
    Banner {
        text: String,
        color: Rgb,
    },
    RiskCard {
        risk_score: i32,
        confidence_label: String,
        severity_label: String,
        /// Fraction of the bar to fill, 0.0-1.0
        bar_fraction: f32,
        bar_color: Rgb,
    },
    Table {
        title: String,
        head: Vec<String>,
        rows: Vec<TableRow>,
        /// Relative column widths; sum to 1.0
        columns: Vec<f32>,
        theme: Rgb,
    },
    SectionTitle {
        title: String,
        subtitle: String,
        /// Column heads of the rows that follow
        head: Vec<String>,
        theme: Rgb,
    },
    IndicatorRow {
        index: usize,
        kind: IndicatorKind,
        tag: String,
        text: String,
        lines: Vec<String>,
        color: Rgb,
        striped: bool,
    },
    Note {
        title: String,
        lines: Vec<String>,
        fill: Rgb,
    },
    Footer {
        left: String,
        center: String,
        page_label: String,
    },
}

/// Table row; each cell is already wrapped into lines
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TableRow {
    pub cells: Vec<Vec<String>>,
}

impl TableRow {
    pub fn line_count(&self) -> usize {
        self.cells.iter().map(|c| c.len().max(1)).max().unwrap_or(1)
    }
}

// ============================================================================
// DOCUMENT
// ============================================================================

/// Fully laid-out report, ready for encoding
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ReportDocument {
    pub kind: ContentKind,
    pub title: String,
    pub geometry: PageGeometry,
    pub blocks: Vec<Block>,
    pub cursor: PageCursor,
    pub page_count: usize,
}

impl ReportDocument {
    pub fn blocks_on(&self, page: usize) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(move |b| b.page == page)
    }

    pub fn indicator_rows(&self) -> impl Iterator<Item = &Block> {
        self.blocks
            .iter()
            .filter(|b| matches!(b.content, BlockContent::IndicatorRow { .. }))
    }

    pub fn footers(&self) -> impl Iterator<Item = &Block> {
        self.blocks.iter().filter(|b| b.role == BlockRole::Footer)
    }
}
