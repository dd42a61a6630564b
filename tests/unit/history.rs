use super::*;

fn item(tag: &str) -> HistoryItem {
    let mut card = CardData::sample();
    card.core_trait = tag.to_string();
    HistoryItem::new(UserInput::default(), card, format!("blurb {tag}"))
}

#[test]
fn insert_puts_newest_first() {
    let mut h = History::new();
    h.insert(item("a"));
    h.insert(item("b"));
    assert_eq!(h.items()[0].card.core_trait, "b");
    assert_eq!(h.items()[1].card.core_trait, "a");
}

#[test]
fn never_exceeds_cap() {
    let mut h = History::new();
    for i in 0..250 {
        h.insert(item(&i.to_string()));
        assert!(h.len() <= HISTORY_CAP);
    }
    assert_eq!(h.len(), HISTORY_CAP);
    assert_eq!(h.items()[0].card.core_trait, "249");
    assert_eq!(h.items()[HISTORY_CAP - 1].card.core_trait, "150");
}

#[test]
fn remove_takes_exactly_one_and_keeps_order() {
    let mut h = History::new();
    for tag in ["a", "b", "c", "d"] {
        h.insert(item(tag));
    }
    let before: Vec<String> = h.items().iter().map(|i| i.id.clone()).collect();
    let victim = before[1].clone();

    let removed = h.remove(&victim).unwrap();
    assert_eq!(removed.id, victim);
    assert_eq!(h.len(), 3);

    let after: Vec<String> = h.items().iter().map(|i| i.id.clone()).collect();
    let expected: Vec<String> = before.into_iter().filter(|id| *id != victim).collect();
    assert_eq!(after, expected);

    assert!(h.remove(&victim).is_none());
    assert!(h.remove("missing").is_none());
    assert_eq!(h.len(), 3);
}

#[test]
fn ids_are_unique() {
    let a = item("a");
    let b = item("b");
    assert_ne!(a.id, b.id);
    assert!(a.created_at().is_some());
}

#[test]
fn wire_format_uses_camel_case_field_names() {
    let json = serde_json::to_value(item("x")).unwrap();
    assert!(json.get("userInput").is_some());
    assert!(json.get("cardData").is_some());
    assert_eq!(json["viralCopy"], "blurb x");
    assert!(json["timestamp"].is_i64());
}

#[test]
fn from_items_truncates_oversized_stores() {
    let items: Vec<HistoryItem> = (0..130).map(|i| item(&i.to_string())).collect();
    assert_eq!(History::from_items(items).len(), HISTORY_CAP);
}

#[test]
fn file_repository_round_trips() {
    let dir = tempfile::tempdir().unwrap();
    let repo = JsonFileRepository::new(dir.path().join("nested").join("destiny_archives.json"));

    assert!(repo.load().unwrap().is_empty());

    let mut h = History::new();
    h.insert(item("a"));
    h.insert(item("b"));
    repo.save(&h).unwrap();

    let loaded = repo.load().unwrap();
    assert_eq!(loaded, h);
}

#[test]
fn file_repository_reports_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("destiny_archives.json");
    std::fs::write(&path, "{not json").unwrap();
    let repo = JsonFileRepository::new(&path);
    assert!(matches!(repo.load(), Err(CardError::Serde(_))));
}

#[test]
fn memory_repository_counts_saves() {
    let repo = InMemoryRepository::new();
    let mut h = History::new();
    h.insert(item("a"));
    repo.save(&h).unwrap();
    repo.save(&h).unwrap();
    assert_eq!(repo.save_count(), 2);
    assert_eq!(repo.load().unwrap(), h);
}
