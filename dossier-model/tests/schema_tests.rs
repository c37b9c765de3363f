mod common;

use dossier_model::{ModelError, Property, PropertyType, Schema, SchemaRegistry};
use serde_json::json;

// ── property type shapes ─────────────────────────────────────────

#[test]
fn country_shape() {
    let t = PropertyType::Country;
    assert!(t.check("de").is_ok());
    assert!(t.check("DE").is_ok());
    assert!(t.check("deu").is_err());
    assert!(t.check("12").is_err());
}

#[test]
fn country_cleans_to_lowercase() {
    assert_eq!(PropertyType::Country.clean("DE"), Some("de".to_string()));
}

#[test]
fn date_shape() {
    let t = PropertyType::Date;
    assert!(t.check("2019").is_ok());
    assert!(t.check("2019-04").is_ok());
    assert!(t.check("2019-04-01").is_ok());
    assert!(t.check("2019-04-01T12:30:00").is_ok());
    assert!(t.check("2019-13-01").is_err());
    assert!(t.check("yesterday").is_err());
}

#[test]
fn number_shape() {
    assert!(PropertyType::Number.check("12.5").is_ok());
    assert!(PropertyType::Number.check("twelve").is_err());
}

#[test]
fn url_shape() {
    assert!(PropertyType::Url.check("https://example.com").is_ok());
    assert!(PropertyType::Url.check("ftp://example.com").is_err());
}

#[test]
fn email_shape() {
    assert!(PropertyType::Email.check("a@example.com").is_ok());
    assert!(PropertyType::Email.check("@example.com").is_err());
    assert!(PropertyType::Email.check("a@nodot").is_err());
}

#[test]
fn checksum_shape() {
    let t = PropertyType::Checksum;
    assert!(t.check("deadbeef").is_ok());
    assert!(t.check("DEADBEEF").is_ok());
    assert!(t.check("dead").is_err()); // too short
    assert!(t.check("not-hex-at-all").is_err());
    assert_eq!(t.clean("DEADBEEF"), Some("deadbeef".to_string()));
}

#[test]
fn entity_shape() {
    assert!(PropertyType::Entity.check("abc123.deadbeef0000").is_ok());
    assert!(PropertyType::Entity.check("has space").is_err());
}

#[test]
fn empty_values_always_rejected() {
    assert!(PropertyType::Name.check("   ").is_err());
}

// ── schema validation ────────────────────────────────────────────

#[test]
fn validate_accepts_clean_payload() {
    let registry = common::registry();
    let schema = registry.resolve("LegalEntity").unwrap();
    let data = json!({
        "schema": "LegalEntity",
        "properties": {"name": "Acme", "country": "us"}
    });
    schema.validate(&data).unwrap();
}

#[test]
fn validate_names_property_and_constraint() {
    let registry = common::registry();
    let schema = registry.resolve("LegalEntity").unwrap();
    let data = json!({
        "schema": "LegalEntity",
        "properties": {"country": "germany"}
    });
    match schema.validate(&data) {
        Err(ModelError::Validation {
            schema,
            property,
            constraint,
        }) => {
            assert_eq!(schema, "LegalEntity");
            assert_eq!(property, "country");
            assert!(constraint.contains("country code"));
        }
        other => panic!("expected validation error, got {other:?}"),
    }
}

#[test]
fn validate_ignores_unknown_properties() {
    let registry = common::registry();
    let schema = registry.resolve("Thing").unwrap();
    let data = json!({"properties": {"banana": {"nested": true}}});
    schema.validate(&data).unwrap();
}

#[test]
fn validate_rejects_non_scalar_values() {
    let registry = common::registry();
    let schema = registry.resolve("Thing").unwrap();
    let data = json!({"properties": {"name": {"first": "x"}}});
    assert!(schema.validate(&data).is_err());
}

#[test]
fn validate_without_properties_is_fine() {
    let registry = common::registry();
    let schema = registry.resolve("Thing").unwrap();
    schema.validate(&json!({"schema": "Thing"})).unwrap();
}

// ── registry resolution ──────────────────────────────────────────

#[test]
fn unknown_schema_is_an_error() {
    let registry = common::registry();
    match registry.resolve("Banana") {
        Err(ModelError::UnknownSchema { name }) => assert_eq!(name, "Banana"),
        other => panic!("expected unknown schema, got {other:?}"),
    }
}

#[test]
fn property_label_defaults_to_name_until_overridden() {
    let prop = Property::new("incorporationDate", PropertyType::Date);
    assert_eq!(prop.label, "incorporationDate");
    let prop = prop.with_label("Incorporation date");
    assert_eq!(prop.label, "Incorporation date");

    let registry = common::registry();
    let schema = registry.resolve("LegalEntity").unwrap();
    assert_eq!(
        schema.property("incorporationDate").unwrap().label,
        "Incorporation date"
    );
}

#[test]
fn checksum_properties_iterates_only_checksums() {
    let schema = Schema::new("S")
        .with_property(Property::new("name", PropertyType::Name))
        .with_property(Property::new("hash", PropertyType::Checksum));
    let names: Vec<_> = schema.checksum_properties().map(|p| p.name.clone()).collect();
    assert_eq!(names, vec!["hash"]);
}
