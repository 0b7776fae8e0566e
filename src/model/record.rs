use serde::de::DeserializeOwned;
use serde::Serialize;
use sqlx::query::Query;
use sqlx::sqlite::{SqliteArguments, SqliteRow};
use sqlx::Sqlite;

/// Row identifier assigned by the store (SQLite rowid).
pub type RecordId = i64;

/// Insert-or-update, decided by the caller instead of by inspecting the
/// record at runtime. `New` lets the store assign the identifier;
/// `Existing` overwrites the row with the given identifier.
#[derive(Debug, Clone, PartialEq)]
pub enum Save<T> {
    New(T),
    Existing(RecordId, T),
}

/// One table's row structure: a fixed set of named, typed fields plus an
/// integer identifier. Implementors describe their table to the store and
/// bind their own values onto queries, which is all the store needs to
/// run every CRUD operation generically.
pub trait Record:
    Serialize
    + DeserializeOwned
    + for<'r> sqlx::FromRow<'r, SqliteRow>
    + Send
    + Sync
    + Unpin
    + 'static
{
    /// Table name.
    const TABLE: &'static str;

    /// Every column except `id`, in the order `bind` pushes values.
    const COLUMNS: &'static [&'static str];

    /// DDL used by `migrate` and `reset`.
    const CREATE_TABLE_SQL: &'static str;

    fn id(&self) -> RecordId;

    fn set_id(&mut self, id: RecordId);

    /// Bind this record's non-id values onto `query`, in `COLUMNS` order.
    fn bind<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>>;
}
