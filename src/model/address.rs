use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use crate::model::{Record, RecordId};

/// A postal address. Customers point at addresses through `address_id`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Address {
    #[serde(default)]
    pub id: RecordId,
    pub street: String,
    pub city: String,
    pub postal_code: String,
    pub country: String,
}

impl Record for Address {
    const TABLE: &'static str = "addresses";
    const COLUMNS: &'static [&'static str] = &["street", "city", "postal_code", "country"];
    const CREATE_TABLE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS addresses (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        street TEXT NOT NULL,
        city TEXT NOT NULL,
        postal_code TEXT NOT NULL,
        country TEXT NOT NULL
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
        query
            .bind(self.street.clone())
            .bind(self.city.clone())
            .bind(self.postal_code.clone())
            .bind(self.country.clone())
    }
}
