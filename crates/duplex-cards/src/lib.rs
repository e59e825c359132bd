//! Print layout engine for manually duplexed flashcards
//!
//! Four cards go on every sheet. The fronts print in deck order; the backs
//! are reordered and remapped so that, once the printed stack is flipped
//! and fed back in, every back lands behind its own front.

pub mod deck;
pub mod fit;
pub mod layout;
mod options;
pub mod paginate;
pub mod pdf;
pub mod session;
pub mod transform;
mod types;

pub use deck::{DeckSource, DeckStore, load_deck, parse_qa, save_json};
pub use fit::{ContentBox, FitOutcome, FitParams, HelveticaMetrics, TextMeasure, fit_text};
pub use layout::{SheetGeometry, SheetLayout};
pub use options::*;
pub use paginate::paginate;
pub use session::{PdfFileHost, PrintHost, PrintReport, PrintSession, SessionState};
pub use transform::{remap_page, reorder_pages};
pub use types::*;
