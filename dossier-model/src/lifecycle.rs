use chrono::{DateTime, Utc};

/// Records carrying creation/update timestamps maintained by the store.
pub trait Dated {
    fn created_at(&self) -> DateTime<Utc>;
    fn updated_at(&self) -> DateTime<Utc>;
    fn set_updated_at(&mut self, at: DateTime<Utc>);

    /// Refreshes `updated_at` to now.
    fn touch(&mut self) {
        self.set_updated_at(Utc::now());
    }
}

/// Records that are logically removed by timestamp rather than deleted.
///
/// A non-null `deleted_at` excludes the record from default queries; the row
/// stays in place for audit and undelete.
pub trait SoftDelete {
    fn deleted_at(&self) -> Option<DateTime<Utc>>;
    fn set_deleted_at(&mut self, at: Option<DateTime<Utc>>);

    fn is_deleted(&self) -> bool {
        self.deleted_at().is_some()
    }

    /// Marks the record deleted as of `at`.
    fn mark_deleted(&mut self, at: DateTime<Utc>) {
        self.set_deleted_at(Some(at));
    }

    /// Returns the record to the active state.
    fn mark_active(&mut self) {
        self.set_deleted_at(None);
    }
}
