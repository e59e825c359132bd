//! Back-pass transforms
//!
//! Manual duplexing changes two things between the passes: the order in
//! which sheets re-enter the printer, and where each slot lands once the
//! sheet is turned over. The first is corrected per sheet, never per card,
//! so the four-card grouping of every sheet survives.

use crate::options::{PageOrder, PositionMap, PrintConfiguration};
use crate::types::{Page, Side};

/// Reorder whole sheets. Slots inside a sheet are never touched.
pub fn reorder_pages(mut pages: Vec<Page>, order: PageOrder) -> Vec<Page> {
    if order == PageOrder::Reverse {
        pages.reverse();
    }
    pages
}

/// Permute the four slots of a sheet: `new[i] = old[f(i)]`.
pub fn remap_page(page: &Page, mode: PositionMap) -> Page {
    let perm = mode.permutation();
    Page::new(std::array::from_fn(|i| page.slots[perm[i]].clone()))
}

pub fn remap_pages(pages: &[Page], mode: PositionMap) -> Vec<Page> {
    pages.iter().map(|page| remap_page(page, mode)).collect()
}

/// Sheets for the back pass, in the order they must be sent to the printer.
pub fn back_pages(front_pages: Vec<Page>, config: &PrintConfiguration) -> Vec<Page> {
    let reordered = reorder_pages(front_pages, config.page_order);
    remap_pages(&reordered, config.position_map)
}

/// Apply the transforms that belong to `side`. Fronts keep natural order.
pub fn pages_for_side(pages: Vec<Page>, side: Side, config: &PrintConfiguration) -> Vec<Page> {
    match side {
        Side::Front => pages,
        Side::Back => back_pages(pages, config),
    }
}
