use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

use crate::api::handlers;
use crate::model::{
    Address, Category, Customer, Invoice, InvoiceItem, News, Product, ProductTag, Record, Review,
    Supplier, Tag,
};
use crate::store::traits::Store;

/// Register the four CRUD routes for one record shape under `path`:
/// list, create, update-by-id, delete-by-id.
fn crud_routes<S, T>(path: &str) -> Router<Arc<S>>
where
    S: Store + 'static,
    T: Record,
{
    Router::new()
        .route(
            path,
            get(handlers::list_records::<S, T>).post(handlers::create_record::<S, T>),
        )
        .route(
            &format!("{}/:id", path),
            put(handlers::update_record::<S, T>).delete(handlers::delete_record::<S, T>),
        )
}

pub fn create_router<S: Store + 'static>() -> Router<Arc<S>> {
    Router::new()
        // Health check
        .route("/health", get(handlers::health_check))
        // CRUD surface, one resource per record shape
        .merge(crud_routes::<S, Address>("/address"))
        .merge(crud_routes::<S, Category>("/categories"))
        .merge(crud_routes::<S, Customer>("/customers"))
        .merge(crud_routes::<S, InvoiceItem>("/invoiceitems"))
        .merge(crud_routes::<S, Invoice>("/invoices"))
        .merge(crud_routes::<S, News>("/news"))
        .merge(crud_routes::<S, Review>("/reviews"))
        .merge(crud_routes::<S, Product>("/products"))
        .merge(crud_routes::<S, Supplier>("/suppliers"))
        .merge(crud_routes::<S, Tag>("/tags"))
        .merge(crud_routes::<S, ProductTag>("/producttags"))
        // Drop, recreate, and reseed all tables
        .route("/reset-database", get(handlers::reset_database::<S>))
}
