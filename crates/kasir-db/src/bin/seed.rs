//! # Seed Data Generator
//!
//! Populates the database with a demo catalogue for development.
//!
//! ## Usage
//! ```bash
//! # Seed ./kasir.db
//! cargo run -p kasir-db --bin seed
//!
//! # Specify database path and stock per product
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db --stock 50
//! ```
//!
//! ## Generated Data
//! One category per entry in `CATALOGUE`, each with a handful of products.
//! Prices are whole units of the store's currency.

use std::env;

use kasir_core::{NewCategory, NewProduct};
use kasir_db::{Database, DbConfig};

/// (category, description, [(product, unit price)])
const CATALOGUE: &[(&str, &str, &[(&str, i64)])] = &[
    (
        "Minuman",
        "Kopi, teh dan minuman dingin",
        &[
            ("Kopi Susu", 18_000),
            ("Kopi Hitam", 12_000),
            ("Es Teh Manis", 5_000),
            ("Teh Tarik", 10_000),
            ("Jus Jeruk", 15_000),
            ("Air Mineral 600ml", 4_000),
        ],
    ),
    (
        "Makanan",
        "Makanan berat",
        &[
            ("Nasi Goreng", 25_000),
            ("Mie Goreng", 22_000),
            ("Ayam Geprek", 23_000),
            ("Soto Ayam", 20_000),
        ],
    ),
    (
        "Camilan",
        "Gorengan dan kue",
        &[
            ("Pisang Goreng", 8_000),
            ("Tahu Isi", 6_000),
            ("Roti Bakar", 15_000),
            ("Martabak Mini", 12_000),
        ],
    ),
];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut db_path = String::from("./kasir.db");
    let mut stock: i64 = 100;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--db" | "-d" => {
                if let Some(value) = args.get(i + 1) {
                    db_path = value.clone();
                    i += 1;
                }
            }
            "--stock" | "-s" => {
                if let Some(value) = args.get(i + 1) {
                    stock = value.parse()?;
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Kasir POS Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -d, --db <PATH>    Database file path (default: ./kasir.db)");
                println!("  -s, --stock <N>    Starting stock per product (default: 100)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", db_path);
    println!();

    let db = Database::new(DbConfig::new(&db_path)).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let mut generated = 0;
    for (category_name, description, products) in CATALOGUE {
        let category = db
            .categories()
            .insert(&NewCategory {
                name: category_name.to_string(),
                description: Some(description.to_string()),
            })
            .await?;

        for (name, unit_price) in products.iter() {
            let product = NewProduct {
                name: name.to_string(),
                unit_price: *unit_price,
                stock_quantity: stock,
                category_id: Some(category.id),
            };

            if let Err(e) = db.products().insert(&product).await {
                eprintln!("Failed to insert {}: {}", product.name, e);
                continue;
            }
            generated += 1;
        }

        println!("  {} ({} products)", category.name, products.len());
    }

    println!();
    println!("✓ Generated {} products in {} categories", generated, CATALOGUE.len());

    db.close().await;
    Ok(())
}
