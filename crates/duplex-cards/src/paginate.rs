use crate::types::{Card, Page, SLOTS_PER_PAGE};

/// Split a deck into sheets of four slots, preserving order.
///
/// The last sheet is padded with empty slots so every sheet keeps the same
/// cut geometry. An empty deck produces no pages.
pub fn paginate(deck: &[Card]) -> Vec<Page> {
    deck.chunks(SLOTS_PER_PAGE)
        .map(|chunk| Page::new(std::array::from_fn(|i| chunk.get(i).cloned())))
        .collect()
}

/// Number of sheets a deck of `card_count` cards occupies
pub fn page_count(card_count: usize) -> usize {
    card_count.div_ceil(SLOTS_PER_PAGE)
}
