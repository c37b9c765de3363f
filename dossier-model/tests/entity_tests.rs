mod common;

use chrono::Utc;
use dossier_model::{Entity, ModelError, SoftDelete};
use serde_json::json;

#[test]
fn make_signs_supplied_id() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let entity = Entity::make(
        &json!({"id": "e1", "schema": "LegalEntity", "properties": {"name": "Acme"}}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    assert_eq!(entity.id, collection.ns().sign("e1"));
    assert_eq!(entity.schema, Entity::LEGAL_ENTITY);
    assert_eq!(entity.data.get("name").unwrap(), &vec!["Acme".to_string()]);
}

#[test]
fn make_generates_id_when_absent() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let entity = Entity::make(&json!({"schema": "Thing"}), &collection, None, &registry, true).unwrap();
    // generated, then signed into the namespace
    assert_eq!(entity.id, collection.ns().sign(&entity.id));
}

#[test]
fn make_rejects_malformed_id() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let result = Entity::make(
        &json!({"id": "not valid!", "schema": "Thing"}),
        &collection,
        None,
        &registry,
        true,
    );
    assert!(matches!(result, Err(ModelError::InvalidId(_))));
}

#[test]
fn make_stringifies_numeric_id() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let entity =
        Entity::make(&json!({"id": 123, "schema": "Thing"}), &collection, None, &registry, true)
            .unwrap();
    assert_eq!(entity.id, collection.ns().sign("123"));
}

#[test]
fn make_rejects_structured_id() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    for id in [json!({"nested": true}), json!(["e1"]), json!(true)] {
        let result = Entity::make(
            &json!({"id": id, "schema": "Thing"}),
            &collection,
            None,
            &registry,
            true,
        );
        assert!(matches!(result, Err(ModelError::InvalidId(_))));
    }
}

#[test]
fn make_requires_known_schema() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let result = Entity::make(&json!({"schema": "Banana"}), &collection, None, &registry, true);
    assert!(matches!(result, Err(ModelError::UnknownSchema { .. })));
}

// ── checksum protection ──────────────────────────────────────────

#[test]
fn checksum_unset_on_creation_regardless_of_input() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let entity = Entity::make(
        &json!({"id": "e1", "schema": "LegalEntity", "properties": {
            "name": "Acme", "fingerprint": "deadbeef"
        }}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    assert!(entity.data.get("fingerprint").is_none());
}

#[test]
fn checksum_keeps_previous_value_across_updates() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let mut entity = Entity::make(
        &json!({"id": "e1", "schema": "LegalEntity", "properties": {"name": "Acme"}}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    // System-assigned elsewhere (e.g. by ingest), not via update.
    entity.data.insert("fingerprint".into(), vec!["cafebabe1234".into()]);

    entity
        .apply_update(
            &json!({"schema": "LegalEntity", "properties": {
                "name": "Acme Holdings", "fingerprint": "deadbeef0000"
            }}),
            &collection,
            &registry,
            true,
        )
        .unwrap();
    assert_eq!(
        entity.data.get("fingerprint").unwrap(),
        &vec!["cafebabe1234".to_string()]
    );
    assert_eq!(
        entity.data.get("name").unwrap(),
        &vec!["Acme Holdings".to_string()]
    );
}

#[test]
fn checksum_overwrite_is_silent() {
    // Supplying a checksum value is not a validation failure; it is simply
    // discarded.
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let result = Entity::make(
        &json!({"id": "e1", "schema": "LegalEntity", "properties": {"fingerprint": "deadbeef"}}),
        &collection,
        None,
        &registry,
        true,
    );
    assert!(result.is_ok());
}

// ── validation flag ──────────────────────────────────────────────

#[test]
fn strict_validation_reports_dropped_values() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let payload = json!({"schema": "LegalEntity", "properties": {"country": "germany"}});
    let strict = Entity::make(&payload, &collection, None, &registry, true);
    assert!(matches!(strict, Err(ModelError::Validation { .. })));

    let lax = Entity::make(&payload, &collection, None, &registry, false).unwrap();
    assert!(lax.data.get("country").is_none());
}

// ── lifecycle ────────────────────────────────────────────────────

#[test]
fn update_implicitly_undeletes_and_touches() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let mut entity = Entity::make(
        &json!({"id": "e1", "schema": "Thing", "properties": {"name": "x"}}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    entity.mark_deleted(Utc::now());
    let before = entity.updated_at;

    entity
        .apply_update(
            &json!({"schema": "Thing", "properties": {"name": "y"}}),
            &collection,
            &registry,
            true,
        )
        .unwrap();
    assert!(!entity.is_deleted());
    assert!(entity.updated_at >= before);
}

#[test]
fn undelete_does_not_touch_updated_at() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let mut entity = Entity::make(
        &json!({"id": "e1", "schema": "Thing", "properties": {"name": "x"}}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    entity.mark_deleted(Utc::now());
    let before = entity.updated_at;
    entity.undelete();
    assert!(!entity.is_deleted());
    assert_eq!(entity.updated_at, before);
}

#[test]
fn update_resigns_id_in_place() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let mut entity = Entity::make(
        &json!({"id": "e1", "schema": "Thing", "properties": {"name": "x"}}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    let id = entity.id.clone();
    entity
        .apply_update(
            &json!({"schema": "Thing", "properties": {"name": "y"}}),
            &collection,
            &registry,
            true,
        )
        .unwrap();
    // signing an already-signed id is a no-op
    assert_eq!(entity.id, id);
}

#[test]
fn entity_references_are_rekeyed() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let entity = Entity::make(
        &json!({"id": "e1", "schema": "LegalEntity", "properties": {
            "name": "Acme", "sameAs": ["e2"]
        }}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    assert_eq!(
        entity.data.get("sameAs").unwrap(),
        &vec![collection.ns().sign("e2")]
    );
}

#[test]
fn to_proxy_reflects_columns() {
    let registry = common::registry();
    let collection = common::collection(1, "coll-1");
    let entity = Entity::make(
        &json!({"id": "e1", "schema": "LegalEntity", "properties": {"name": "Acme"}}),
        &collection,
        None,
        &registry,
        true,
    )
    .unwrap();
    let proxy = entity.to_proxy(&registry).unwrap();
    assert_eq!(proxy.id.as_deref(), Some(entity.id.as_str()));
    assert_eq!(proxy.schema, entity.schema);
    assert_eq!(proxy.get("name"), ["Acme"]);
    assert!(proxy.mutable);
    assert!(proxy.created_at.is_some());
}
