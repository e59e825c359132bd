use serde::{Deserialize, Serialize};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum FlashcardError {
    #[error("CSV error: {0}")]
    Csv(#[from] csv::Error),
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("PDF error: {0}")]
    Pdf(String),
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
    #[error("Task join error: {0}")]
    TaskJoin(#[from] tokio::task::JoinError),
    #[error("Invalid configuration: {0}")]
    Config(String),
    #[error("Import failed: {0}")]
    Import(String),
    #[error("Add or import at least one card first")]
    EmptyDeck,
    #[error("A print is already in progress")]
    PrintInProgress,
}

pub type Result<T> = std::result::Result<T, FlashcardError>;

/// A two-sided card. Identity is the `id`; text defaults to empty.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    #[serde(default)]
    pub front: String,
    #[serde(default)]
    pub back: String,
}

impl Card {
    pub fn new(id: impl Into<String>, front: impl Into<String>, back: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            front: front.into(),
            back: back.into(),
        }
    }

    /// Text printed on the given side
    pub fn text(&self, side: Side) -> &str {
        match side {
            Side::Front => &self.front,
            Side::Back => &self.back,
        }
    }
}

/// Which pass of a manual duplex print is being produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Side {
    #[default]
    Front,
    Back,
}

impl Side {
    pub fn name(self) -> &'static str {
        match self {
            Side::Front => "front",
            Side::Back => "back",
        }
    }
}

/// Number of card slots on every sheet
pub const SLOTS_PER_PAGE: usize = 4;

/// Slot position on a physical sheet (2 × 2 grid)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SlotPosition {
    TopLeft,
    TopRight,
    BottomLeft,
    BottomRight,
}

impl SlotPosition {
    pub const ALL: [SlotPosition; SLOTS_PER_PAGE] = [
        SlotPosition::TopLeft,
        SlotPosition::TopRight,
        SlotPosition::BottomLeft,
        SlotPosition::BottomRight,
    ];

    pub fn index(self) -> usize {
        match self {
            SlotPosition::TopLeft => 0,
            SlotPosition::TopRight => 1,
            SlotPosition::BottomLeft => 2,
            SlotPosition::BottomRight => 3,
        }
    }

    pub fn from_index(index: usize) -> Option<Self> {
        Self::ALL.get(index).copied()
    }

    /// Grid row, 0 is the top row
    pub fn row(self) -> usize {
        self.index() / 2
    }

    /// Grid column, 0 is the left column
    pub fn col(self) -> usize {
        self.index() % 2
    }
}

/// One physical sheet: exactly four slots, each a card or empty.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Page {
    pub slots: [Option<Card>; SLOTS_PER_PAGE],
}

impl Page {
    pub fn new(slots: [Option<Card>; SLOTS_PER_PAGE]) -> Self {
        Self { slots }
    }

    pub fn slot(&self, position: SlotPosition) -> Option<&Card> {
        self.slots[position.index()].as_ref()
    }

    /// Ids per slot, `None` for empty slots
    pub fn ids(&self) -> [Option<&str>; SLOTS_PER_PAGE] {
        std::array::from_fn(|i| self.slots[i].as_ref().map(|c| c.id.as_str()))
    }

    pub fn cards(&self) -> impl Iterator<Item = &Card> {
        self.slots.iter().flatten()
    }

    pub fn is_empty(&self) -> bool {
        self.slots.iter().all(Option::is_none)
    }
}
