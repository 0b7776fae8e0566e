use axum::serve;
use bike_store_api::api::routes::create_router;
use bike_store_api::config::AppConfig;
use bike_store_api::seed;
use bike_store_api::store::{SqliteStore, Store};
use std::sync::Arc;
use tokio::net::TcpListener;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file if it exists
    dotenvy::dotenv().ok();

    // Initialize logging with explicit filter to suppress sqlx debug logs
    use env_logger::Builder;
    use log::LevelFilter;

    Builder::new()
        .filter_level(LevelFilter::Info)      // Default to Info for everything
        .filter_module("sqlx", LevelFilter::Warn)  // Suppress sqlx Debug logs
        .init();

    println!("Bike Store: Generic CRUD Backend");

    // Load configuration
    let config = AppConfig::load()?;
    println!(
        "Configuration loaded: server={}:{}",
        config.server.host, config.server.port
    );

    println!("Opening SQLite database...");
    let database_url = config.database_url();
    let sqlite_store = SqliteStore::new(&database_url).await?;

    println!("Creating tables...");
    sqlite_store.migrate().await?;
    println!("Database ready");

    let store = Arc::new(sqlite_store);

    // Load seed data for demonstration (optional)
    if std::env::var("LOAD_SEED_DATA").unwrap_or_default() == "true" {
        println!("Loading seed data...");
        seed::load_seed_data(&*store).await?;
        println!("Seed data loaded successfully");
    }

    run_server(create_router().with_state(store), &config).await?;

    Ok(())
}

async fn run_server(app: axum::Router, config: &AppConfig) -> anyhow::Result<()> {
    let bind_address = config.server_address();
    let listener = TcpListener::bind(&bind_address).await?;
    println!("Bike Store API running on http://{}", bind_address);

    serve(listener, app).await?;

    Ok(())
}
