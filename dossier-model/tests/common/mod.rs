use chrono::Utc;
use dossier_model::{Collection, Model, Property, PropertyType, Schema};
use dossier_types::CollectionId;

/// A registry with the schemata used across the test suites.
pub fn registry() -> Model {
    Model::new()
        .with_schema(Schema::new("Thing").with_property(Property::new("name", PropertyType::Name)))
        .with_schema(
            Schema::new("LegalEntity")
                .with_property(Property::new("name", PropertyType::Name))
                .with_property(Property::new("country", PropertyType::Country))
                .with_property(
                    Property::new("incorporationDate", PropertyType::Date)
                        .with_label("Incorporation date"),
                )
                .with_property(Property::new("website", PropertyType::Url))
                .with_property(Property::new("sameAs", PropertyType::Entity))
                .with_property(Property::new("fingerprint", PropertyType::Checksum)),
        )
}

pub fn collection(id: i64, foreign_id: &str) -> Collection {
    Collection {
        id: CollectionId::new(id),
        foreign_id: foreign_id.to_string(),
        label: foreign_id.to_string(),
        created_at: Utc::now(),
    }
}
