use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use crate::model::{Record, RecordId};

/// A free-form label attached to products through `ProductTag` rows.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Tag {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
}

impl Record for Tag {
    const TABLE: &'static str = "tags";
    const COLUMNS: &'static [&'static str] = &["name"];
    const CREATE_TABLE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL
    )";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn bind<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query.bind(self.name.clone())
    }
}

/// The many-to-many link between products and tags. Both sides are
/// advisory references, like every other foreign key here.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct ProductTag {
    #[serde(default)]
    pub id: RecordId,
    pub product_id: RecordId,
    pub tag_id: RecordId,
}

impl Record for ProductTag {
    const TABLE: &'static str = "product_tags";
    const COLUMNS: &'static [&'static str] = &["product_id", "tag_id"];
    const CREATE_TABLE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS product_tags (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        product_id INTEGER NOT NULL,
        tag_id INTEGER NOT NULL
    )";

    fn id(&self) -> RecordId {
        self.id
    }

    fn set_id(&mut self, id: RecordId) {
        self.id = id;
    }

    fn bind<'q>(
        &self,
        query: Query<'q, Sqlite, SqliteArguments<'q>>,
    ) -> Query<'q, Sqlite, SqliteArguments<'q>> {
        query.bind(self.product_id).bind(self.tag_id)
    }
}
