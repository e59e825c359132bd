//! Card storage and deck import/export

use crate::types::{Card, FlashcardError, Result, Side};
use serde_json::Value;
use std::path::Path;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, RwLock};
use std::time::{SystemTime, UNIX_EPOCH};

/// Read-only view of the live deck, taken once per print build
pub trait DeckSource {
    fn deck_snapshot(&self) -> Vec<Card>;
}

impl DeckSource for Vec<Card> {
    fn deck_snapshot(&self) -> Vec<Card> {
        self.clone()
    }
}

impl<T: DeckSource + ?Sized> DeckSource for Arc<T> {
    fn deck_snapshot(&self) -> Vec<Card> {
        (**self).deck_snapshot()
    }
}

impl DeckSource for RwLock<DeckStore> {
    fn deck_snapshot(&self) -> Vec<Card> {
        match self.read() {
            Ok(store) => store.snapshot(),
            Err(poisoned) => poisoned.into_inner().snapshot(),
        }
    }
}

static ID_COUNTER: AtomicU64 = AtomicU64::new(0);

/// Fresh card id, unique within the process
pub fn new_card_id() -> String {
    let nanos = SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_nanos() as u64)
        .unwrap_or_default();
    let seq = ID_COUNTER.fetch_add(1, Ordering::Relaxed);
    format!("{:x}{:04x}", nanos, seq & 0xffff)
}

/// Ordered, editable deck
#[derive(Debug, Clone, Default)]
pub struct DeckStore {
    cards: Vec<Card>,
}

impl DeckStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    pub fn cards(&self) -> &[Card] {
        &self.cards
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn snapshot(&self) -> Vec<Card> {
        self.cards.clone()
    }

    /// New blank card at the top of the deck
    pub fn add(&mut self) -> &Card {
        self.cards.insert(0, Card::new(new_card_id(), "", ""));
        &self.cards[0]
    }

    /// Copy of a card inserted right after it
    pub fn duplicate(&mut self, id: &str) -> Option<&Card> {
        let idx = self.position(id)?;
        let original = &self.cards[idx];
        let copy = Card::new(new_card_id(), original.front.clone(), original.back.clone());
        self.cards.insert(idx + 1, copy);
        Some(&self.cards[idx + 1])
    }

    pub fn delete(&mut self, id: &str) -> bool {
        let before = self.cards.len();
        self.cards.retain(|card| card.id != id);
        self.cards.len() != before
    }

    pub fn update(&mut self, id: &str, side: Side, text: impl Into<String>) -> bool {
        let Some(idx) = self.position(id) else {
            return false;
        };
        let card = &mut self.cards[idx];
        match side {
            Side::Front => card.front = text.into(),
            Side::Back => card.back = text.into(),
        }
        true
    }

    /// Add imported cards on top, or replace the deck
    pub fn import_cards(&mut self, mut cards: Vec<Card>, replace: bool) {
        if !replace {
            cards.append(&mut self.cards);
        }
        self.cards = cards;
    }

    fn position(&self, id: &str) -> Option<usize> {
        self.cards.iter().position(|card| card.id == id)
    }
}

impl DeckSource for DeckStore {
    fn deck_snapshot(&self) -> Vec<Card> {
        self.snapshot()
    }
}

/// Parse `Q: ... A: ...` blocks.
///
/// A question runs up to the next `A:`, an answer up to the next line that
/// starts with `Q:` or the end of the text. Blocks with neither part are
/// dropped.
pub fn parse_qa(raw: &str) -> Vec<Card> {
    let text = raw.replace("\r\n", "\n");
    let mut cards = Vec::new();
    let mut rest = text.as_str();

    while let Some(q_pos) = rest.find("Q:") {
        let after_q = &rest[q_pos + 2..];
        let Some(a_pos) = after_q.find("A:") else {
            break;
        };
        let question = after_q[..a_pos].trim();

        let after_a = &after_q[a_pos + 2..];
        let end = next_question(after_a);
        let answer = after_a[..end].trim();

        if !question.is_empty() || !answer.is_empty() {
            cards.push(Card::new(new_card_id(), question, answer));
        }

        rest = &after_a[end..];
    }

    cards
}

/// Offset of the newline that precedes the next `Q:` line
fn next_question(text: &str) -> usize {
    text.match_indices('\n')
        .map(|(i, _)| i)
        .find(|&i| text[i + 1..].trim_start().starts_with("Q:"))
        .unwrap_or(text.len())
}

/// Cards from a JSON export. Missing ids are generated, missing text is empty.
pub fn cards_from_json(json: &str) -> Result<Vec<Card>> {
    let value: Value = serde_json::from_str(json)?;
    let Value::Array(items) = value else {
        return Err(FlashcardError::Import(
            "Use a JSON export from this app".to_string(),
        ));
    };

    Ok(items
        .iter()
        .map(|item| {
            let id = match item.get("id") {
                Some(Value::String(s)) if !s.is_empty() => s.clone(),
                Some(Value::Number(n)) => n.to_string(),
                _ => new_card_id(),
            };
            Card::new(id, json_text(item.get("front")), json_text(item.get("back")))
        })
        .collect())
}

fn json_text(value: Option<&Value>) -> String {
    match value {
        None | Some(Value::Null) => String::new(),
        Some(Value::String(s)) => s.clone(),
        Some(other) => other.to_string(),
    }
}

pub async fn load_json(path: impl AsRef<Path>) -> Result<Vec<Card>> {
    let contents = tokio::fs::read_to_string(path).await?;
    cards_from_json(&contents)
}

pub async fn save_json(cards: &[Card], path: impl AsRef<Path>) -> Result<()> {
    let json = serde_json::to_string_pretty(cards)?;
    tokio::fs::write(path, json).await?;
    Ok(())
}

pub async fn load_from_csv(path: impl AsRef<Path>) -> Result<Vec<Card>> {
    let path = path.as_ref().to_owned();

    let contents = tokio::fs::read_to_string(&path).await?;

    let cards = tokio::task::spawn_blocking(move || {
        let mut reader = csv::Reader::from_reader(contents.as_bytes());
        let mut cards = Vec::new();

        for result in reader.records() {
            let record = result?;
            if record.len() >= 2 {
                cards.push(Card::new(new_card_id(), &record[0], &record[1]));
            }
        }
        Ok::<_, FlashcardError>(cards)
    })
    .await??;

    Ok(cards)
}

pub async fn load_qa(path: impl AsRef<Path>) -> Result<Vec<Card>> {
    let contents = tokio::fs::read_to_string(path).await?;
    Ok(parse_qa(&contents))
}

/// Load a deck, picking the format from the file extension
pub async fn load_deck(path: impl AsRef<Path>) -> Result<Vec<Card>> {
    let path = path.as_ref();
    let extension = path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase());

    match extension.as_deref() {
        Some("json") => load_json(path).await,
        Some("csv") => load_from_csv(path).await,
        _ => load_qa(path).await,
    }
}
