use anyhow::{Context, Result};
use log::{debug, info};
use sqlx::sqlite::{SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions};
use sqlx::SqlitePool;
use std::str::FromStr;

use crate::model::{
    Address, Category, Customer, Invoice, InvoiceItem, News, Product, ProductTag, Record,
    RecordId, Review, Save, Supplier, Tag,
};
use crate::store::traits::Store;

/// Every table the store manages, paired with its DDL. `migrate` and
/// `reset` walk this list; a new record shape must be added here to get a
/// table.
const TABLES: &[(&str, &str)] = &[
    (Address::TABLE, Address::CREATE_TABLE_SQL),
    (Category::TABLE, Category::CREATE_TABLE_SQL),
    (Customer::TABLE, Customer::CREATE_TABLE_SQL),
    (Invoice::TABLE, Invoice::CREATE_TABLE_SQL),
    (InvoiceItem::TABLE, InvoiceItem::CREATE_TABLE_SQL),
    (News::TABLE, News::CREATE_TABLE_SQL),
    (Product::TABLE, Product::CREATE_TABLE_SQL),
    (Review::TABLE, Review::CREATE_TABLE_SQL),
    (Supplier::TABLE, Supplier::CREATE_TABLE_SQL),
    (Tag::TABLE, Tag::CREATE_TABLE_SQL),
    (ProductTag::TABLE, ProductTag::CREATE_TABLE_SQL),
];

#[derive(Debug, Clone)]
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Open (or create) the SQLite database at the given URL.
    pub async fn new(database_url: &str) -> Result<Self> {
        let options = SqliteConnectOptions::from_str(database_url)
            .context("invalid SQLite database URL")?
            .journal_mode(SqliteJournalMode::Wal)
            .create_if_missing(true);

        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect_with(options)
            .await
            .context("failed to create SQLite connection pool")?;

        Ok(Self { pool })
    }

    /// In-memory database for tests. A single persistent connection keeps
    /// the database alive for the lifetime of the pool.
    pub async fn in_memory() -> Result<Self> {
        let options =
            SqliteConnectOptions::from_str("sqlite::memory:").context("invalid in-memory URL")?;

        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .connect_with(options)
            .await
            .context("failed to create in-memory SQLite pool")?;

        Ok(Self { pool })
    }

    /// Get a reference to the connection pool.
    pub fn pool(&self) -> &SqlitePool {
        &self.pool
    }
}

#[async_trait::async_trait]
impl Store for SqliteStore {
    async fn list<T: Record>(&self) -> Result<Vec<T>> {
        let sql = format!("SELECT * FROM {} ORDER BY id", T::TABLE);
        let rows = sqlx::query_as::<_, T>(&sql)
            .fetch_all(&self.pool)
            .await
            .with_context(|| format!("failed to list rows of {}", T::TABLE))?;

        Ok(rows)
    }

    async fn get<T: Record>(&self, id: RecordId) -> Result<Option<T>> {
        let sql = format!("SELECT * FROM {} WHERE id = ?", T::TABLE);
        let row = sqlx::query_as::<_, T>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .with_context(|| format!("failed to fetch row {} of {}", id, T::TABLE))?;

        Ok(row)
    }

    async fn save<T: Record>(&self, save: Save<T>) -> Result<Option<T>> {
        match save {
            Save::New(mut record) => {
                let placeholders = vec!["?"; T::COLUMNS.len()].join(", ");
                let sql = format!(
                    "INSERT INTO {} ({}) VALUES ({})",
                    T::TABLE,
                    T::COLUMNS.join(", "),
                    placeholders
                );

                let result = record
                    .bind(sqlx::query(&sql))
                    .execute(&self.pool)
                    .await
                    .with_context(|| format!("failed to insert into {}", T::TABLE))?;

                record.set_id(result.last_insert_rowid());
                debug!("inserted {} row {}", T::TABLE, record.id());
                Ok(Some(record))
            }
            Save::Existing(id, mut record) => {
                let assignments = T::COLUMNS
                    .iter()
                    .map(|column| format!("{} = ?", column))
                    .collect::<Vec<_>>()
                    .join(", ");
                let sql = format!("UPDATE {} SET {} WHERE id = ?", T::TABLE, assignments);

                let result = record
                    .bind(sqlx::query(&sql))
                    .bind(id)
                    .execute(&self.pool)
                    .await
                    .with_context(|| format!("failed to update row {} of {}", id, T::TABLE))?;

                if result.rows_affected() == 0 {
                    return Ok(None);
                }

                record.set_id(id);
                debug!("updated {} row {}", T::TABLE, id);
                Ok(Some(record))
            }
        }
    }

    async fn delete<T: Record>(&self, id: RecordId) -> Result<bool> {
        let sql = format!("DELETE FROM {} WHERE id = ?", T::TABLE);
        let result = sqlx::query(&sql)
            .bind(id)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to delete row {} of {}", id, T::TABLE))?;

        Ok(result.rows_affected() > 0)
    }

    async fn count<T: Record>(&self) -> Result<i64> {
        let sql = format!("SELECT COUNT(*) FROM {}", T::TABLE);
        let count = sqlx::query_scalar::<_, i64>(&sql)
            .fetch_one(&self.pool)
            .await
            .with_context(|| format!("failed to count rows of {}", T::TABLE))?;

        Ok(count)
    }

    async fn migrate(&self) -> Result<()> {
        for (table, create_sql) in TABLES {
            sqlx::query(create_sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to create table {}", table))?;
        }

        info!("ensured {} tables exist", TABLES.len());
        Ok(())
    }

    async fn reset(&self) -> Result<()> {
        for (table, _) in TABLES {
            let sql = format!("DROP TABLE IF EXISTS {}", table);
            sqlx::query(&sql)
                .execute(&self.pool)
                .await
                .with_context(|| format!("failed to drop table {}", table))?;
        }

        info!("dropped all tables");
        self.migrate().await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    async fn test_store() -> SqliteStore {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();
        store
    }

    fn sample_tag(name: &str) -> Tag {
        Tag {
            id: 0,
            name: name.to_string(),
        }
    }

    #[tokio::test]
    async fn save_new_assigns_identifier() {
        let store = test_store().await;

        let saved = store
            .save(Save::New(sample_tag("Mountain")))
            .await
            .unwrap()
            .unwrap();

        assert_ne!(saved.id, 0);
        assert_eq!(saved.name, "Mountain");

        let fetched: Tag = store.get(saved.id).await.unwrap().unwrap();
        assert_eq!(fetched, saved);
    }

    #[tokio::test]
    async fn save_new_ignores_caller_supplied_identifier() {
        let store = test_store().await;

        let mut tag = sample_tag("Road");
        tag.id = 999;
        let saved = store.save(Save::New(tag)).await.unwrap().unwrap();

        assert_ne!(saved.id, 999);
        assert!(store.get::<Tag>(999).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn save_existing_overwrites_in_place() {
        let store = test_store().await;

        let first = store
            .save(Save::New(sample_tag("Cycling")))
            .await
            .unwrap()
            .unwrap();
        store.save(Save::New(sample_tag("Sports"))).await.unwrap();

        let updated = store
            .save(Save::Existing(first.id, sample_tag("Gravel")))
            .await
            .unwrap()
            .unwrap();

        assert_eq!(updated.id, first.id);
        assert_eq!(updated.name, "Gravel");
        assert_eq!(store.count::<Tag>().await.unwrap(), 2);
    }

    #[tokio::test]
    async fn save_existing_missing_row_returns_none() {
        let store = test_store().await;

        let result = store
            .save(Save::Existing(42, sample_tag("Nowhere")))
            .await
            .unwrap();

        assert!(result.is_none());
        assert_eq!(store.count::<Tag>().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn delete_reports_whether_a_row_was_removed() {
        let store = test_store().await;

        let saved = store
            .save(Save::New(sample_tag("Outdoor")))
            .await
            .unwrap()
            .unwrap();

        assert!(store.delete::<Tag>(saved.id).await.unwrap());
        assert!(!store.delete::<Tag>(saved.id).await.unwrap());
        assert!(!store.delete::<Tag>(9999).await.unwrap());
    }

    #[tokio::test]
    async fn list_returns_rows_in_identifier_order() {
        let store = test_store().await;

        for name in ["B", "C", "A"] {
            store.save(Save::New(sample_tag(name))).await.unwrap();
        }

        let tags: Vec<Tag> = store.list().await.unwrap();
        let names: Vec<&str> = tags.iter().map(|t| t.name.as_str()).collect();
        assert_eq!(names, vec!["B", "C", "A"]);
        assert!(tags.windows(2).all(|pair| pair[0].id < pair[1].id));
    }

    #[tokio::test]
    async fn reset_leaves_every_table_empty() {
        let store = test_store().await;

        store.save(Save::New(sample_tag("Stale"))).await.unwrap();
        store
            .save(Save::New(Category {
                id: 0,
                name: "Stale".to_string(),
            }))
            .await
            .unwrap();

        store.reset().await.unwrap();

        assert_eq!(store.count::<Tag>().await.unwrap(), 0);
        assert_eq!(store.count::<Category>().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn date_fields_round_trip() {
        let store = test_store().await;

        let entry = News {
            id: 0,
            title: "New Office Opening".to_string(),
            description: "Downtown New York".to_string(),
            date: chrono::Utc::now(),
        };

        let saved = store.save(Save::New(entry.clone())).await.unwrap().unwrap();
        let fetched: News = store.get(saved.id).await.unwrap().unwrap();

        assert_eq!(fetched.title, entry.title);
        assert_eq!(fetched.date, entry.date);
    }
}
