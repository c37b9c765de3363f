use dossier_model::{Model, Property, PropertyType, Schema};
use dossier_store::Database;
use std::sync::Arc;

pub fn registry() -> Arc<Model> {
    Arc::new(
        Model::new()
            .with_schema(
                Schema::new("Thing").with_property(Property::new("name", PropertyType::Name)),
            )
            .with_schema(
                Schema::new("LegalEntity")
                    .with_property(Property::new("name", PropertyType::Name))
                    .with_property(Property::new("country", PropertyType::Country))
                    .with_property(Property::new("sameAs", PropertyType::Entity))
                    .with_property(Property::new("fingerprint", PropertyType::Checksum)),
            ),
    )
}

pub fn database() -> Database {
    Database::open_in_memory(registry()).unwrap()
}
