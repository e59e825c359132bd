use duplex_cards::deck::{cards_from_json, load_from_csv, load_json};
use duplex_cards::*;
use std::io::Write;
use tempfile::NamedTempFile;

fn fronts(cards: &[Card]) -> Vec<&str> {
    cards.iter().map(|c| c.front.as_str()).collect()
}

#[test]
fn test_parse_qa_multiline_blocks() {
    let text = "Q: What is 2 + 2?\nA: 4\n\nQ: Name the\nlargest planet\nA: Jupiter\nthe gas giant\n";
    let cards = parse_qa(text);

    assert_eq!(cards.len(), 2);
    assert_eq!(cards[0].front, "What is 2 + 2?");
    assert_eq!(cards[0].back, "4");
    assert_eq!(cards[1].front, "Name the\nlargest planet");
    assert_eq!(cards[1].back, "Jupiter\nthe gas giant");
    assert_ne!(cards[0].id, cards[1].id);
}

#[test]
fn test_parse_qa_crlf_and_indented_questions() {
    let text = "Q: one\r\nA: uno\r\n   Q: two\r\nA: dos";
    let cards = parse_qa(text);
    assert_eq!(fronts(&cards), vec!["one", "two"]);
    assert_eq!(cards[0].back, "uno");
    assert_eq!(cards[1].back, "dos");
}

#[test]
fn test_parse_qa_skips_empty_blocks() {
    let cards = parse_qa("Q: A:\nQ: real\nA: answer");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].front, "real");
}

#[test]
fn test_parse_qa_answer_may_mention_q() {
    let cards = parse_qa("Q: letter after P?\nA: it is Q: obviously");
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].back, "it is Q: obviously");
}

#[test]
fn test_parse_qa_without_answers() {
    assert!(parse_qa("Q: lonely question").is_empty());
    assert!(parse_qa("just some notes").is_empty());
    assert!(parse_qa("").is_empty());
}

#[test]
fn test_json_import_defaults() {
    let json = r#"[
        {"id": "abc", "front": "F", "back": "B"},
        {"front": "no id"},
        {"id": "", "back": 42}
    ]"#;
    let cards = cards_from_json(json).unwrap();

    assert_eq!(cards.len(), 3);
    assert_eq!(cards[0], Card::new("abc", "F", "B"));
    assert_eq!(cards[1].back, "");
    assert!(!cards[1].id.is_empty());
    assert!(!cards[2].id.is_empty());
    assert_eq!(cards[2].front, "");
    assert_eq!(cards[2].back, "42");
}

#[test]
fn test_json_import_rejects_non_array() {
    assert!(matches!(
        cards_from_json(r#"{"cards": []}"#),
        Err(FlashcardError::Import(_))
    ));
    assert!(matches!(
        cards_from_json("not json"),
        Err(FlashcardError::Json(_))
    ));
}

#[tokio::test]
async fn test_json_round_trip_through_file() {
    let cards = vec![Card::new("1", "front", "back"), Card::new("2", "", "only back")];
    let temp = NamedTempFile::new().unwrap();

    save_json(&cards, temp.path()).await.unwrap();
    let loaded = load_json(temp.path()).await.unwrap();
    assert_eq!(loaded, cards);
}

#[tokio::test]
async fn test_load_from_csv() {
    let mut temp = NamedTempFile::with_suffix(".csv").unwrap();
    writeln!(temp, "front,back").unwrap();
    writeln!(temp, "hello,hola").unwrap();
    writeln!(temp, "\"multi, word\",answer").unwrap();
    temp.flush().unwrap();

    let cards = load_from_csv(temp.path()).await.unwrap();
    assert_eq!(fronts(&cards), vec!["hello", "multi, word"]);
    assert_eq!(cards[0].back, "hola");

    let by_extension = load_deck(temp.path()).await.unwrap();
    assert_eq!(by_extension.len(), 2);
}

#[tokio::test]
async fn test_load_deck_falls_back_to_qa_text() {
    let mut temp = NamedTempFile::with_suffix(".txt").unwrap();
    write!(temp, "Q: capital of Peru\nA: Lima").unwrap();
    temp.flush().unwrap();

    let cards = load_deck(temp.path()).await.unwrap();
    assert_eq!(cards.len(), 1);
    assert_eq!(cards[0].back, "Lima");
}

#[test]
fn test_store_add_puts_card_on_top() {
    let mut store = DeckStore::from_cards(vec![Card::new("a", "A", "")]);
    let new_id = store.add().id.clone();

    assert_eq!(store.len(), 2);
    assert_eq!(store.cards()[0].id, new_id);
    assert_eq!(store.cards()[0].front, "");
}

#[test]
fn test_store_duplicate_inserts_after_original() {
    let mut store = DeckStore::from_cards(vec![
        Card::new("a", "A", "a"),
        Card::new("b", "B", "b"),
    ]);
    let copy_id = store.duplicate("a").unwrap().id.clone();

    assert_eq!(fronts(store.cards()), vec!["A", "A", "B"]);
    assert_ne!(copy_id, "a");
    assert_eq!(store.cards()[1].id, copy_id);
    assert!(store.duplicate("missing").is_none());
}

#[test]
fn test_store_update_and_delete() {
    let mut store = DeckStore::from_cards(vec![Card::new("a", "A", ""), Card::new("b", "B", "")]);

    assert!(store.update("b", Side::Back, "answer"));
    assert_eq!(store.cards()[1].back, "answer");
    assert!(!store.update("zzz", Side::Front, "x"));

    assert!(store.delete("a"));
    assert!(!store.delete("a"));
    assert_eq!(store.len(), 1);
}

#[test]
fn test_store_import_on_top_or_replace() {
    let mut store = DeckStore::from_cards(vec![Card::new("old", "old", "")]);

    store.import_cards(vec![Card::new("new", "new", "")], false);
    assert_eq!(fronts(store.cards()), vec!["new", "old"]);

    store.import_cards(vec![Card::new("only", "only", "")], true);
    assert_eq!(fronts(store.cards()), vec!["only"]);
}

#[test]
fn test_snapshot_is_detached() {
    let mut store = DeckStore::from_cards(vec![Card::new("a", "A", "")]);
    let snapshot = store.deck_snapshot();
    store.update("a", Side::Front, "changed");
    assert_eq!(snapshot[0].front, "A");
}
