pub mod api;
pub mod config;
pub mod model;
pub mod seed;
pub mod store;

// Export API types
pub use api::handlers;
pub use api::routes;

// Export all model types
pub use model::*;

// Export seed module
pub use seed::*;

// Export store types
pub use store::{SqliteStore, Store};

// Function for out-of-process use and integration testing
pub async fn run_server() -> anyhow::Result<()> {
    use axum::serve;
    use std::sync::Arc;
    use tokio::net::TcpListener;

    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with INFO level only (suppress DEBUG logs)
    let _ = env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info"))
        .try_init();

    // Load configuration
    let config = crate::config::AppConfig::load()?;

    // Open the SQLite database
    let database_url = config.database_url();
    let sqlite_store = crate::store::SqliteStore::new(&database_url).await?;

    // Create tables
    sqlite_store.migrate().await?;

    let store = Arc::new(sqlite_store);

    // Create router with state
    let app = crate::api::routes::create_router().with_state(store);

    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;

    serve(listener, app).await?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use crate::model::{Product, Save, Tag};

    #[test]
    fn records_serialize_with_camel_case_field_names() {
        let product = Product {
            id: 3,
            name: "Mountain Bike".to_string(),
            description: "Durable mountain bike.".to_string(),
            price: 500.0,
            category_id: 1,
            supplier_id: 2,
        };

        let json = serde_json::to_value(&product).unwrap();
        assert_eq!(json["id"], 3);
        assert_eq!(json["categoryId"], 1);
        assert_eq!(json["supplierId"], 2);
        assert!(json.get("category_id").is_none());
    }

    #[test]
    fn record_bodies_may_omit_the_identifier() {
        let json = r#"{"name": "Mountain"}"#;
        let tag: Tag = serde_json::from_str(json).unwrap();
        assert_eq!(tag.id, 0);
        assert_eq!(tag.name, "Mountain");
    }

    #[test]
    fn save_variants_carry_the_caller_decision() {
        let tag = Tag {
            id: 0,
            name: "Road".to_string(),
        };

        match Save::New(tag.clone()) {
            Save::New(record) => assert_eq!(record.name, "Road"),
            Save::Existing(..) => panic!("expected New"),
        }

        match Save::Existing(7, tag) {
            Save::Existing(id, record) => {
                assert_eq!(id, 7);
                assert_eq!(record.name, "Road");
            }
            Save::New(_) => panic!("expected Existing"),
        }
    }
}
