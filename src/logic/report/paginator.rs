//! Page-cursor state machine.
//!
//! - `Placing`: the next block goes at the cursor if it fits
//! - `PageBreak`: open a new page, stamp its header, reset the cursor
//! - `Done`: the footer pass has run; further blocks are refused
//!
//! Blocks are never split. A block taller than a page is placed alone on a
//! fresh page and the cursor is clamped to capacity.

use super::types::{Block, BlockContent, BlockRole, PageCursor, PageGeometry, ReportDocument};
use crate::logic::analysis::ContentKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PaginatorState {
    Placing,
    PageBreak,
    Done,
}

/// Where a block landed
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub page: usize,
    pub y: f32,
}

/// Footer text stamped on every page during the final pass
#[derive(Debug, Clone, PartialEq)]
pub struct FooterText {
    pub left: String,
    pub center: String,
}

pub struct Paginator {
    geometry: PageGeometry,
    cursor: PageCursor,
    state: PaginatorState,
    header: BlockContent,
    blocks: Vec<Block>,
    /// Anything besides the header on the current page
    page_has_content: bool,
}

impl Paginator {
    /// Start on page 1 with the header already placed
    pub fn new(geometry: PageGeometry, header: BlockContent) -> Self {
        let mut paginator = Self {
            geometry,
            cursor: PageCursor {
                page: 1,
                offset: geometry.header_height,
                capacity: geometry.capacity,
            },
            state: PaginatorState::Placing,
            header,
            blocks: Vec::new(),
            page_has_content: false,
        };
        paginator.stamp_header();
        paginator
    }

    pub fn state(&self) -> PaginatorState {
        self.state
    }

    pub fn cursor(&self) -> PageCursor {
        self.cursor
    }

    /// Place one block. Returns `None` once the paginator is done.
    pub fn place(&mut self, role: BlockRole, height: f32, content: BlockContent) -> Option<Placement> {
        let height = if height.is_finite() { height.max(0.0) } else { 0.0 };

        loop {
            match self.state {
                PaginatorState::Done => return None,
                PaginatorState::PageBreak => {
                    self.cursor.page += 1;
                    self.cursor.offset = self.geometry.header_height;
                    self.page_has_content = false;
                    self.stamp_header();
                    self.state = PaginatorState::Placing;
                }
                PaginatorState::Placing => {
                    if self.cursor.offset + height > self.cursor.capacity && self.page_has_content {
                        self.state = PaginatorState::PageBreak;
                        continue;
                    }

                    let placement = Placement {
                        page: self.cursor.page,
                        y: self.cursor.offset,
                    };
                    self.blocks.push(Block {
                        role,
                        page: placement.page,
                        y: placement.y,
                        height,
                        content,
                    });
                    self.cursor.offset = (self.cursor.offset + height).min(self.cursor.capacity);
                    self.page_has_content = true;
                    return Some(placement);
                }
            }
        }
    }

    /// Run the footer pass and hand back the finished document
    pub fn finish(&mut self, kind: ContentKind, title: String, footer: FooterText) -> ReportDocument {
        let page_count = self.cursor.page;

        if self.state != PaginatorState::Done {
            self.state = PaginatorState::Done;
            for page in 1..=page_count {
                self.blocks.push(Block {
                    role: BlockRole::Footer,
                    page,
                    y: self.geometry.capacity,
                    height: self.geometry.height - self.geometry.capacity,
                    content: BlockContent::Footer {
                        left: footer.left.clone(),
                        center: footer.center.clone(),
                        page_label: format!("Page {} of {}", page, page_count),
                    },
                });
            }
        }

        ReportDocument {
            kind,
            title,
            geometry: self.geometry,
            blocks: std::mem::take(&mut self.blocks),
            cursor: self.cursor,
            page_count,
        }
    }

    fn stamp_header(&mut self) {
        self.blocks.push(Block {
            role: BlockRole::Header,
            page: self.cursor.page,
            y: 0.0,
            height: self.geometry.header_height,
            content: self.header.clone(),
        });
    }
}
