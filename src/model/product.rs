use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use crate::model::{Record, RecordId};

/// A product in the catalog. `category_id` and `supplier_id` are advisory
/// references; nothing enforces that the target rows exist.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Product {
    #[serde(default)]
    pub id: RecordId,
    pub name: String,
    pub description: String,
    pub price: f64,
    pub category_id: RecordId,
    pub supplier_id: RecordId,
}

impl Record for Product {
    const TABLE: &'static str = "products";
    const COLUMNS: &'static [&'static str] =
        &["name", "description", "price", "category_id", "supplier_id"];
    const CREATE_TABLE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS products (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        name TEXT NOT NULL,
        description TEXT NOT NULL,
        price REAL NOT NULL,
        category_id INTEGER NOT NULL,
        supplier_id INTEGER NOT NULL
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
            .bind(self.name.clone())
            .bind(self.description.clone())
            .bind(self.price)
            .bind(self.category_id)
            .bind(self.supplier_id)
    }
}
