use anyhow::{Context, Result};
use chrono::{DateTime, TimeZone, Utc};

use crate::model::{
    Address, Category, Customer, Invoice, InvoiceItem, News, Product, ProductTag, Record, Save,
    Supplier, Tag,
};
use crate::store::Store;

/// Insert one record and hand back the stored row with its assigned id.
async fn insert<S: Store, T: Record>(store: &S, record: T) -> Result<T> {
    store
        .save(Save::New(record))
        .await?
        .with_context(|| format!("insert into {} returned no row", T::TABLE))
}

fn date(year: i32, month: u32, day: u32) -> DateTime<Utc> {
    Utc.with_ymd_and_hms(year, month, day, 0, 0, 0)
        .single()
        .unwrap_or_else(Utc::now)
}

/// Populate every table with the fixed demo dataset. Seed rows always go
/// through `Save::New`, so rows that reference other seed rows use the
/// identifiers the store actually assigned.
pub async fn load_seed_data<S: Store>(store: &S) -> Result<()> {
    // Addresses first; customers reference their assigned ids.
    let mut address_ids = Vec::new();
    let addresses = vec![
        ("123 Main St", "Anytown", "12345", "Poland"),
        ("456 Oak St", "Othertown", "67890", "Germany"),
        ("789 Pine St", "Sometown", "11223", "France"),
        ("101 Maple St", "Yourtown", "33445", "Italy"),
        ("202 Birch St", "Mytown", "55667", "Spain"),
    ];
    for (street, city, postal_code, country) in addresses {
        let saved = insert(
            store,
            Address {
                id: 0,
                street: street.to_string(),
                city: city.to_string(),
                postal_code: postal_code.to_string(),
                country: country.to_string(),
            },
        )
        .await?;
        address_ids.push(saved.id);
    }

    let mut category_ids = Vec::new();
    for name in ["Electronics", "Clothing", "Books", "Furniture", "Sports"] {
        let saved = insert(
            store,
            Category {
                id: 0,
                name: name.to_string(),
            },
        )
        .await?;
        category_ids.push(saved.id);
    }

    let mut supplier_ids = Vec::new();
    let suppliers = vec![
        ("Tech Supplies Co.", "supplier1@test.com"),
        ("Fashion World Ltd.", "supplier2@test.com"),
        ("Sporting Goods Inc.", "supplier3@test.com"),
        ("Home Comforts Inc.", "supplier4@test.com"),
        ("Outdoor Adventure Ltd.", "supplier5@test.com"),
    ];
    for (name, contact_email) in suppliers {
        let saved = insert(
            store,
            Supplier {
                id: 0,
                name: name.to_string(),
                contact_email: contact_email.to_string(),
            },
        )
        .await?;
        supplier_ids.push(saved.id);
    }

    // Products, spread across the seeded categories and suppliers.
    let products = vec![
        (
            "Mountain Bike",
            500.0,
            "Durable mountain bike designed for all terrains and tough rides.",
            category_ids[0],
            supplier_ids[0],
        ),
        (
            "Road Bike",
            400.0,
            "Lightweight road bike, perfect for fast riding on paved roads.",
            category_ids[0],
            supplier_ids[1],
        ),
        (
            "Cycling Cap",
            20.0,
            "Comfortable cycling cap to protect you from the sun during long rides.",
            category_ids[1],
            supplier_ids[2],
        ),
        (
            "Sports Cap",
            15.0,
            "Stylish sports cap with adjustable straps for a perfect fit.",
            category_ids[1],
            supplier_ids[3],
        ),
        (
            "Backpack 20L",
            45.0,
            "Compact backpack with 20L capacity, perfect for day trips.",
            category_ids[2],
            supplier_ids[4],
        ),
        (
            "Backpack 40L",
            70.0,
            "Large 40L backpack with multiple compartments for extended trips.",
            category_ids[2],
            supplier_ids[0],
        ),
        (
            "Running Shoes",
            80.0,
            "Breathable running shoes designed for comfort during long runs.",
            category_ids[3],
            supplier_ids[1],
        ),
        (
            "Trekking Boots",
            120.0,
            "Sturdy trekking boots for outdoor adventures and rough terrains.",
            category_ids[3],
            supplier_ids[2],
        ),
    ];
    let mut product_ids = Vec::new();
    for (name, price, description, category_id, supplier_id) in products {
        let saved = insert(
            store,
            Product {
                id: 0,
                name: name.to_string(),
                description: description.to_string(),
                price,
                category_id,
                supplier_id,
            },
        )
        .await?;
        product_ids.push(saved.id);
    }

    let customers = vec![
        (
            "John",
            "Doe",
            "john.doe@example.com",
            "+1 234 567 890",
            date(2023, 1, 15),
            address_ids[0],
        ),
        (
            "Jane",
            "Smith",
            "jane.smith@example.com",
            "+1 987 654 321",
            date(2023, 3, 22),
            address_ids[1],
        ),
        (
            "Alice",
            "Johnson",
            "alice.johnson@example.com",
            "+1 555 123 456",
            date(2023, 6, 5),
            address_ids[2],
        ),
        (
            "Bob",
            "Brown",
            "bob.brown@example.com",
            "+1 444 567 890",
            date(2023, 9, 10),
            address_ids[3],
        ),
        (
            "Charlie",
            "Davis",
            "charlie.davis@example.com",
            "+1 333 678 901",
            date(2023, 12, 1),
            address_ids[4],
        ),
    ];
    let mut customer_ids = Vec::new();
    for (first_name, last_name, email, phone_number, registration_date, address_id) in customers {
        let saved = insert(
            store,
            Customer {
                id: 0,
                first_name: first_name.to_string(),
                last_name: last_name.to_string(),
                email: email.to_string(),
                phone_number: phone_number.to_string(),
                registration_date,
                address_id,
            },
        )
        .await?;
        customer_ids.push(saved.id);
    }

    // One invoice per customer, each totaling one product's price.
    let totals = [500.0, 400.0, 20.0, 15.0, 45.0];
    let mut invoice_ids = Vec::new();
    for (customer_id, total_amount) in customer_ids.iter().zip(totals) {
        let saved = insert(
            store,
            Invoice {
                id: 0,
                date: Utc::now(),
                total_amount,
                customer_id: *customer_id,
            },
        )
        .await?;
        invoice_ids.push(saved.id);
    }

    for ((invoice_id, product_id), price) in invoice_ids.iter().zip(&product_ids).zip(totals) {
        insert(
            store,
            InvoiceItem {
                id: 0,
                quantity: 1,
                price,
                product_id: *product_id,
                invoice_id: *invoice_id,
            },
        )
        .await?;
    }

    let news = vec![
        (
            "New Office Opening",
            "Our company has officially inaugurated a new office in downtown New York.",
        ),
        (
            "Quarterly Revenue Report",
            "We are thrilled to announce that we achieved record-breaking revenues.",
        ),
        (
            "Employee of the Month",
            "Congratulations to Jane Doe for being awarded Employee of the Month.",
        ),
    ];
    for (title, description) in news {
        insert(
            store,
            News {
                id: 0,
                title: title.to_string(),
                description: description.to_string(),
                date: Utc::now(),
            },
        )
        .await?;
    }

    let mountain = insert(store, tag("Mountain")).await?;
    let road = insert(store, tag("Road")).await?;
    let cycling = insert(store, tag("Cycling")).await?;
    let sports = insert(store, tag("Sports")).await?;
    let outdoor = insert(store, tag("Outdoor")).await?;

    let product_tags = vec![
        (product_ids[0], mountain.id),
        (product_ids[1], road.id),
        (product_ids[0], cycling.id),
        (product_ids[2], cycling.id),
        (product_ids[3], sports.id),
        (product_ids[4], outdoor.id),
        (product_ids[5], outdoor.id),
    ];
    for (product_id, tag_id) in product_tags {
        insert(
            store,
            ProductTag {
                id: 0,
                product_id,
                tag_id,
            },
        )
        .await?;
    }

    Ok(())
}

fn tag(name: &str) -> Tag {
    Tag {
        id: 0,
        name: name.to_string(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::store::SqliteStore;

    #[tokio::test]
    async fn seed_populates_every_table() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();

        load_seed_data(&store).await.unwrap();

        assert_eq!(store.count::<Address>().await.unwrap(), 5);
        assert_eq!(store.count::<Category>().await.unwrap(), 5);
        assert_eq!(store.count::<Supplier>().await.unwrap(), 5);
        assert_eq!(store.count::<Product>().await.unwrap(), 8);
        assert_eq!(store.count::<Customer>().await.unwrap(), 5);
        assert_eq!(store.count::<Invoice>().await.unwrap(), 5);
        assert_eq!(store.count::<InvoiceItem>().await.unwrap(), 5);
        assert_eq!(store.count::<News>().await.unwrap(), 3);
        assert_eq!(store.count::<Tag>().await.unwrap(), 5);
        assert_eq!(store.count::<ProductTag>().await.unwrap(), 7);
    }

    #[tokio::test]
    async fn seed_links_rows_by_assigned_identifiers() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.migrate().await.unwrap();

        load_seed_data(&store).await.unwrap();

        let tags: Vec<Tag> = store.list().await.unwrap();
        let links: Vec<ProductTag> = store.list().await.unwrap();
        for link in &links {
            assert!(tags.iter().any(|t| t.id == link.tag_id));
        }

        let products: Vec<Product> = store.list().await.unwrap();
        let categories: Vec<Category> = store.list().await.unwrap();
        for product in &products {
            assert!(categories.iter().any(|c| c.id == product.category_id));
        }
    }
}
