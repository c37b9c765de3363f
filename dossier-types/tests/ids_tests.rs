use dossier_types::{CollectionId, DocumentId, ReferenceId, RoleId};

// ── construction / conversion ────────────────────────────────────

#[test]
fn collection_id_round_trip() {
    let id = CollectionId::new(42);
    assert_eq!(id.as_i64(), 42);
    assert_eq!(CollectionId::from(42), id);
}

#[test]
fn display_and_parse() {
    let id = DocumentId::new(1234);
    assert_eq!(id.to_string(), "1234");
    assert_eq!("1234".parse::<DocumentId>().unwrap(), id);
}

#[test]
fn parse_rejects_garbage() {
    assert!("not-a-number".parse::<RoleId>().is_err());
}

// ── serde ────────────────────────────────────────────────────────

#[test]
fn serializes_transparently() {
    let id = ReferenceId::new(7);
    assert_eq!(serde_json::to_string(&id).unwrap(), "7");
    let back: ReferenceId = serde_json::from_str("7").unwrap();
    assert_eq!(back, id);
}

#[test]
fn ordering_follows_integers() {
    assert!(CollectionId::new(1) < CollectionId::new(2));
}
