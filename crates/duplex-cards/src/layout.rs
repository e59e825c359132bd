//! Sheet geometry and the in-memory render target
//!
//! Coordinates are PDF points with the origin at the bottom-left corner of
//! the sheet. Slot rows count from the top of the sheet.

use crate::fit::{ContentBox, FitOutcome, FitParams, TextMeasure, fit_text};
use crate::options::{BackRotation, SheetOptions};
use crate::types::{Page, SLOTS_PER_PAGE, Side, SlotPosition};

/// Points per millimeter (1 inch = 72 points, 1 inch = 25.4mm)
pub const POINTS_PER_MM: f32 = 72.0 / 25.4;

#[inline]
pub fn mm_to_pt(mm: f32) -> f32 {
    mm * POINTS_PER_MM
}

#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Rect {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
}

impl Rect {
    pub fn right(&self) -> f32 {
        self.x + self.width
    }

    pub fn top(&self) -> f32 {
        self.y + self.height
    }

    /// Shrink by `inset` on every side, never below zero size
    pub fn inset(&self, inset: f32) -> Rect {
        Rect {
            x: self.x + inset,
            y: self.y + inset,
            width: (self.width - 2.0 * inset).max(0.0),
            height: (self.height - 2.0 * inset).max(0.0),
        }
    }
}

/// Placement of the four cut boxes on a sheet
#[derive(Debug, Clone, PartialEq)]
pub struct SheetGeometry {
    pub page_width_pt: f32,
    pub page_height_pt: f32,
    /// Cut box per slot, indexed by `SlotPosition::index`
    pub boxes: [Rect; SLOTS_PER_PAGE],
    pub padding_pt: f32,
}

impl SheetGeometry {
    /// Centre a 2 × 2 grid of cards on the page
    pub fn from_options(options: &SheetOptions) -> Self {
        let (page_w_mm, page_h_mm) = options.page_size_mm();
        let page_width_pt = mm_to_pt(page_w_mm);
        let page_height_pt = mm_to_pt(page_h_mm);

        let card_w = mm_to_pt(options.card_width_mm);
        let card_h = mm_to_pt(options.card_height_mm);
        let gap = mm_to_pt(options.gap_mm);

        let grid_w = 2.0 * card_w + gap;
        let grid_h = 2.0 * card_h + gap;
        let left = (page_width_pt - grid_w) / 2.0;
        let bottom = (page_height_pt - grid_h) / 2.0;

        let boxes = SlotPosition::ALL.map(|slot| Rect {
            x: left + slot.col() as f32 * (card_w + gap),
            y: bottom + (1 - slot.row()) as f32 * (card_h + gap),
            width: card_w,
            height: card_h,
        });

        Self {
            page_width_pt,
            page_height_pt,
            boxes,
            padding_pt: mm_to_pt(options.box_padding_mm),
        }
    }

    pub fn cut_box(&self, slot: SlotPosition) -> Rect {
        self.boxes[slot.index()]
    }

    /// Area available to text inside a cut box
    pub fn text_area(&self, slot: SlotPosition) -> Rect {
        self.cut_box(slot).inset(self.padding_pt)
    }

    pub fn content_box(&self, slot: SlotPosition) -> ContentBox {
        let area = self.text_area(slot);
        ContentBox::new(area.width, area.height)
    }
}

/// Text placed in one cut box
#[derive(Debug, Clone, PartialEq)]
pub struct TextBox {
    pub slot: SlotPosition,
    /// Card shown in this box, `None` for a padding slot
    pub card_id: Option<String>,
    pub text: String,
    pub size_pt: f32,
    /// Drawn upside-down for printers that return the back pass rotated
    pub rotated: bool,
    pub fit: Option<FitOutcome>,
}

impl TextBox {
    /// Shrink this box's text to fit `container`. Only `size_pt` changes.
    pub fn fit(
        &mut self,
        container: ContentBox,
        measure: &dyn TextMeasure,
        params: &FitParams,
    ) -> FitOutcome {
        let outcome = fit_text(&self.text, container, measure, params);
        if let Some(size_pt) = outcome.size_pt() {
            self.size_pt = size_pt;
        }
        self.fit = Some(outcome);
        outcome
    }
}

/// One rendered sheet, always four boxes
#[derive(Debug, Clone, PartialEq)]
pub struct RenderedSheet {
    pub boxes: [TextBox; SLOTS_PER_PAGE],
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct FitSummary {
    pub fitted: usize,
    pub overflowing: usize,
    pub skipped: usize,
}

impl FitSummary {
    fn record(&mut self, outcome: FitOutcome) {
        match outcome {
            FitOutcome::Fitted { .. } => self.fitted += 1,
            FitOutcome::Overflowing { .. } => self.overflowing += 1,
            FitOutcome::Skipped => self.skipped += 1,
        }
    }
}

/// Render target holding the sheets of the current print build
#[derive(Debug, Clone)]
pub struct SheetLayout {
    geometry: SheetGeometry,
    side: Side,
    show_cut_guides: bool,
    sheets: Vec<RenderedSheet>,
}

impl SheetLayout {
    pub fn new(options: &SheetOptions) -> Self {
        Self::with_geometry(SheetGeometry::from_options(options))
    }

    pub fn with_geometry(geometry: SheetGeometry) -> Self {
        Self {
            geometry,
            side: Side::Front,
            show_cut_guides: false,
            sheets: Vec::new(),
        }
    }

    pub fn geometry(&self) -> &SheetGeometry {
        &self.geometry
    }

    pub fn side(&self) -> Side {
        self.side
    }

    pub fn show_cut_guides(&self) -> bool {
        self.show_cut_guides
    }

    pub fn sheets(&self) -> &[RenderedSheet] {
        &self.sheets
    }

    pub fn clear(&mut self) {
        self.sheets.clear();
    }

    /// Replace the contents with one sheet per page, text at `base_size_pt`
    pub fn render(
        &mut self,
        pages: &[Page],
        side: Side,
        rotation: BackRotation,
        show_cut_guides: bool,
        base_size_pt: f32,
    ) {
        self.clear();
        self.side = side;
        self.show_cut_guides = show_cut_guides;

        let rotated = rotation == BackRotation::Rotate180;
        for page in pages {
            let boxes = SlotPosition::ALL.map(|slot| {
                let card = page.slot(slot);
                TextBox {
                    slot,
                    card_id: card.map(|c| c.id.clone()),
                    text: card.map(|c| c.text(side).to_string()).unwrap_or_default(),
                    size_pt: base_size_pt,
                    rotated,
                    fit: None,
                }
            });
            self.sheets.push(RenderedSheet { boxes });
        }
    }

    pub fn box_count(&self) -> usize {
        self.sheets.len() * SLOTS_PER_PAGE
    }

    /// Fit every box independently against its own content box
    pub fn fit_all(&mut self, measure: &dyn TextMeasure, params: &FitParams) -> FitSummary {
        let mut summary = FitSummary::default();
        for (sheet_idx, sheet) in self.sheets.iter_mut().enumerate() {
            for text_box in sheet.boxes.iter_mut() {
                let container = self.geometry.content_box(text_box.slot);
                let outcome = text_box.fit(container, measure, params);
                log::debug!(
                    "Sheet {} {:?}: {:?}",
                    sheet_idx + 1,
                    text_box.slot,
                    outcome
                );
                summary.record(outcome);
            }
        }
        summary
    }
}
