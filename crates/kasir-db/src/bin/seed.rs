//! # Seed Data Generator
//!
//! Populates the database with the starter catalog for development.
//!
//! ## Usage
//! ```bash
//! # Starter catalog only
//! cargo run -p kasir-db --bin seed
//!
//! # Starter catalog plus 500 generated products
//! cargo run -p kasir-db --bin seed -- --extra 500
//!
//! # Specify database path
//! cargo run -p kasir-db --bin seed -- --db ./data/kasir.db
//! ```
//!
//! ## Generated Products
//! Extra products combine a warung staple with a pack size, priced in whole
//! rupiah with stock between 0 and 100.

use std::path::PathBuf;

use clap::Parser;
use kasir_core::validation::validate_new_product;
use kasir_core::{Money, NewProduct};
use kasir_db::{Database, DbConfig};

/// The catalog every fresh install starts with: (nama, harga, stok).
const STARTER_CATALOG: &[(&str, i64, i64)] = &[
    ("Indomie Godog", 3500, 10),
    ("Vit 1000ml", 3000, 40),
    ("Kecap", 12000, 20),
];

/// Staples used for generated products, with a base price.
const STAPLES: &[(&str, i64)] = &[
    ("Indomie Goreng", 3100),
    ("Mie Sedaap", 3000),
    ("Teh Botol", 4500),
    ("Aqua", 3500),
    ("Gula Pasir", 16000),
    ("Beras", 14000),
    ("Minyak Goreng", 18000),
    ("Telur", 2500),
    ("Kopi Kapal Api", 1500),
    ("Sabun Mandi", 4000),
    ("Roti Tawar", 15000),
    ("Susu Kental Manis", 12500),
];

/// Pack sizes as (label, price multiplier).
const PACKS: &[(&str, i64)] = &[("Satuan", 1), ("Isi 5", 5), ("Isi 10", 10), ("Dus", 40)];

#[derive(Debug, Parser)]
#[command(name = "seed", about = "Kasir POS seed data generator")]
struct Args {
    /// Database file path
    #[arg(short, long, default_value = "./kasir_dev.db")]
    db: PathBuf,

    /// Number of generated products to add after the starter catalog
    #[arg(short, long, default_value_t = 0)]
    extra: usize,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args = Args::parse();

    println!("🌱 Kasir POS Seed Data Generator");
    println!("================================");
    println!("Database: {}", args.db.display());
    println!("Extra products: {}", args.extra);
    println!();

    let db = Database::new(DbConfig::new(&args.db)).await?;

    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let existing = db.products().count().await?;
    if existing > 0 {
        println!("⚠ Database already has {} products", existing);
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let products = STARTER_CATALOG
        .iter()
        .map(|&(name, price, stock)| NewProduct::new(name, price, stock))
        .chain((0..args.extra).map(generate_product));

    let mut inserted = 0;
    let start = std::time::Instant::now();

    for product in products {
        if let Err(e) = validate_new_product(&product) {
            eprintln!("Skipping {}: {}", product.name, e);
            continue;
        }

        match db.products().insert(&product).await {
            Ok(saved) => {
                inserted += 1;
                if inserted <= STARTER_CATALOG.len() {
                    println!(
                        "  #{} {} @ {} (stok {})",
                        saved.id,
                        saved.name,
                        Money::from_rupiah(saved.unit_price),
                        saved.stock
                    );
                } else if inserted % 100 == 0 {
                    println!("  Inserted {} products...", inserted);
                }
            }
            Err(e) => eprintln!("Failed to insert {}: {}", product.name, e),
        }
    }

    println!();
    println!("✓ Inserted {} products in {:?}", inserted, start.elapsed());

    db.close().await;
    println!("✓ Seed complete!");

    Ok(())
}

/// Generates the `seed`-th extra product.
fn generate_product(seed: usize) -> NewProduct {
    let (staple, base_price) = STAPLES[seed % STAPLES.len()];
    let (pack, multiplier) = PACKS[(seed / STAPLES.len()) % PACKS.len()];
    let batch = seed / (STAPLES.len() * PACKS.len());

    let name = if batch == 0 {
        format!("{} {}", staple, pack)
    } else {
        format!("{} {} #{}", staple, pack, batch + 1)
    };

    // Round to the nearest 500 rupiah, like shelf prices.
    let price = ((base_price * multiplier + 250) / 500) * 500;
    let stock = ((seed * 37) % 101) as i64;

    NewProduct::new(name, price, stock)
}
