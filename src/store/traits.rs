use anyhow::Result;

use crate::model::{Record, RecordId, Save};

/// Persistence adapter over a set of flat tables. Every operation is one
/// database call; no transaction spans more than one statement.
#[async_trait::async_trait]
pub trait Store: Send + Sync {
    /// All rows of a shape, ordered by identifier.
    async fn list<T: Record>(&self) -> Result<Vec<T>>;

    /// One row by identifier, `None` if absent.
    async fn get<T: Record>(&self, id: RecordId) -> Result<Option<T>>;

    /// Insert or overwrite, per the `Save` variant. `Save::New` always
    /// returns the stored record with its assigned identifier;
    /// `Save::Existing` returns `None` when no row has that identifier.
    async fn save<T: Record>(&self, save: Save<T>) -> Result<Option<T>>;

    /// Remove by identifier. Returns whether a row was removed.
    async fn delete<T: Record>(&self, id: RecordId) -> Result<bool>;

    /// Row count of a shape.
    async fn count<T: Record>(&self) -> Result<i64>;

    /// Create every table that does not yet exist.
    async fn migrate(&self) -> Result<()>;

    /// Drop and recreate every table, leaving them empty.
    async fn reset(&self) -> Result<()>;
}
