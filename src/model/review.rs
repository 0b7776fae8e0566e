use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use crate::model::{Record, RecordId};

/// A customer's review of a product. Ratings are stored as written; there
/// is no range validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Review {
    #[serde(default)]
    pub id: RecordId,
    pub content: String,
    pub rating: i64,
    pub product_id: RecordId,
    pub customer_id: RecordId,
}

impl Record for Review {
    const TABLE: &'static str = "reviews";
    const COLUMNS: &'static [&'static str] = &["content", "rating", "product_id", "customer_id"];
    const CREATE_TABLE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS reviews (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        content TEXT NOT NULL,
        rating INTEGER NOT NULL,
        product_id INTEGER NOT NULL,
        customer_id INTEGER NOT NULL
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
            .bind(self.content.clone())
            .bind(self.rating)
            .bind(self.product_id)
            .bind(self.customer_id)
    }
}
