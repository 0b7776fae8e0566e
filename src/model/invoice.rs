use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::Sqlite;

use crate::model::{Record, RecordId};

/// An invoice issued to a customer. `total_amount` is not derived from the
/// invoice's items; both are written independently.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
    #[serde(default)]
    pub id: RecordId,
    pub date: DateTime<Utc>,
    pub total_amount: f64,
    pub customer_id: RecordId,
}

impl Record for Invoice {
    const TABLE: &'static str = "invoices";
    const COLUMNS: &'static [&'static str] = &["date", "total_amount", "customer_id"];
    const CREATE_TABLE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS invoices (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        date TEXT NOT NULL,
        total_amount REAL NOT NULL,
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
            .bind(self.date)
            .bind(self.total_amount)
            .bind(self.customer_id)
    }
}

/// One line of an invoice. `product_id` may point at a product that no
/// longer exists; the row is kept as written.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, sqlx::FromRow)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceItem {
    #[serde(default)]
    pub id: RecordId,
    pub quantity: i64,
    pub price: f64,
    pub product_id: RecordId,
    pub invoice_id: RecordId,
}

impl Record for InvoiceItem {
    const TABLE: &'static str = "invoice_items";
    const COLUMNS: &'static [&'static str] = &["quantity", "price", "product_id", "invoice_id"];
    const CREATE_TABLE_SQL: &'static str = "CREATE TABLE IF NOT EXISTS invoice_items (
        id INTEGER PRIMARY KEY AUTOINCREMENT,
        quantity INTEGER NOT NULL,
        price REAL NOT NULL,
        product_id INTEGER NOT NULL,
        invoice_id INTEGER NOT NULL
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
            .bind(self.quantity)
            .bind(self.price)
            .bind(self.product_id)
            .bind(self.invoice_id)
    }
}
