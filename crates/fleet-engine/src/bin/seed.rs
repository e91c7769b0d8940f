//! # Seed Data Generator
//!
//! Populates the database with demo fleets, boats and pool stock.
//!
//! ## Usage
//! ```bash
//! # 40 pool items (default) in ./fleet_supply.db or FLEET_DATABASE_PATH
//! cargo run -p fleet-engine --bin seed
//!
//! # Custom amount
//! cargo run -p fleet-engine --bin seed -- --count 120
//!
//! # Specify database path
//! cargo run -p fleet-engine --bin seed -- --db ./data/fleet.db
//! ```
//!
//! Pool items go through `InventoryService::create`, so every row passes
//! the same validation as live traffic. A few items are then assigned to
//! boats so the assignment listings have something to show.

use chrono::Utc;
use serde_json::json;
use std::env;
use uuid::Uuid;

use fleet_core::validation::{AssignRequest, PoolItemRequest};
use fleet_core::{Boat, Fleet};
use fleet_db::FleetRepository;
use fleet_engine::config::FleetConfig;
use fleet_engine::store::SqliteStore;
use fleet_engine::{telemetry, AllocationEngine, InventoryService};

/// Fleets and their boats.
const FLEETS: &[(&str, &[&str])] = &[
    ("North Fleet", &["Sea Wolf", "Gull", "Northern Star"]),
    ("South Fleet", &["Tern", "Marlin"]),
    ("Harbour Fleet", &["Pilot One", "Pilot Two"]),
];

/// Stock lines: (name, unit, unit size, unit price in cents).
const STOCK_LINES: &[(&str, &str, i64, i64)] = &[
    ("Gill Net", "Roll", 1, 18_500),
    ("Nylon Rope", "Coil", 1, 4_250),
    ("Hooks", "Box", 100, 1_299),
    ("Sinkers", "Box", 50, 2_100),
    ("Diesel", "Litre", 1, 145),
    ("Engine Oil", "Litre", 5, 3_800),
    ("Ice", "Bag", 1, 350),
    ("Gloves", "Pair", 1, 899),
    ("Life Jacket", "Piece", 1, 6_400),
    ("Bait", "Crate", 1, 2_750),
];

/// Note variants; each stock line is repeated once per note.
const NOTES: &[&str] = &["Main store", "Dock 2", "Supplier A", "Supplier B"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let args: Vec<String> = env::args().collect();

    let mut config = FleetConfig::load()?;
    let mut count: usize = 40;

    let mut i = 1;
    while i < args.len() {
        match args[i].as_str() {
            "--count" | "-c" => {
                if i + 1 < args.len() {
                    count = args[i + 1].parse().unwrap_or(40);
                    i += 1;
                }
            }
            "--db" | "-d" => {
                if i + 1 < args.len() {
                    config.database_path = args[i + 1].clone().into();
                    i += 1;
                }
            }
            "--help" | "-h" => {
                println!("Fleet Supply Seed Data Generator");
                println!();
                println!("Usage: seed [OPTIONS]");
                println!();
                println!("Options:");
                println!("  -c, --count <N>    Number of pool items to create (default: 40)");
                println!("  -d, --db <PATH>    Database file path (default: FLEET_DATABASE_PATH)");
                println!("  -h, --help         Show this help message");
                return Ok(());
            }
            _ => {}
        }
        i += 1;
    }

    telemetry::init(&config.log_level);

    println!("🌱 Fleet Supply Seed Data Generator");
    println!("===================================");
    println!("Database:   {}", config.database_path.display());
    println!("Pool items: {}", count);
    println!();

    let store = SqliteStore::connect(&config).await?;
    println!("✓ Connected to database");
    println!("✓ Migrations applied");

    let inventory = InventoryService::new(store.clone());
    let engine = AllocationEngine::with_policy(store.clone(), config.allocation_policy());

    // An empty pool lists as not-found
    if let Ok(existing) = inventory.list().await {
        println!("⚠ Database already has {} pool items", existing.len());
        println!("  Skipping seed to avoid duplicates.");
        println!("  Delete the database file to regenerate.");
        return Ok(());
    }

    let start = std::time::Instant::now();

    // Directory
    {
        let mut conn = store.database().acquire().await?;
        let mut directory = FleetRepository::new(&mut conn);
        for (fleet_name, boats) in FLEETS {
            let fleet = match directory.find_fleet_by_name(fleet_name).await? {
                Some(fleet) => fleet,
                None => {
                    let fleet = Fleet {
                        id: Uuid::new_v4().to_string(),
                        name: fleet_name.to_string(),
                    };
                    directory.insert_fleet(&fleet).await?;
                    fleet
                }
            };
            for boat_name in boats.iter() {
                if directory.find_boat_by_name(boat_name).await?.is_some() {
                    continue;
                }
                directory
                    .insert_boat(&Boat {
                        id: Uuid::new_v4().to_string(),
                        fleet_id: fleet.id.clone(),
                        name: boat_name.to_string(),
                    })
                    .await?;
            }
        }
    }
    println!("✓ {} fleets registered", FLEETS.len());

    // Pool
    println!();
    println!("Creating pool items...");

    let mut created = Vec::new();
    'outer: for (note_idx, note) in NOTES.iter().enumerate() {
        for (line_idx, line) in STOCK_LINES.iter().enumerate() {
            if created.len() >= count {
                break 'outer;
            }

            let request = pool_request(line, note, note_idx * STOCK_LINES.len() + line_idx);
            match inventory.create(&request).await {
                Ok(item) => created.push(item),
                Err(e) => eprintln!("Failed to create {} ({}): {}", line.0, note, e),
            }
        }
    }

    println!("✓ Created {} pool items", created.len());

    // Assignments
    println!();
    println!("Assigning stock...");

    let boats: Vec<(&str, &str)> = FLEETS
        .iter()
        .flat_map(|(fleet, boats)| boats.iter().map(move |boat| (*fleet, *boat)))
        .collect();

    let mut assigned = 0;
    for (idx, item) in created.iter().take(boats.len()).enumerate() {
        let (fleet, boat) = boats[idx];
        let quantity = item.unit_size;
        let total = item.unit_price().line_total(quantity, item.unit_size);

        let request: AssignRequest = serde_json::from_value(json!({
            "itemId": item.id,
            "fleet": fleet,
            "boat": boat,
            "quantity": quantity,
            "total": total.as_decimal(),
        }))?;

        match engine.assign(&request).await {
            Ok(outcome) => {
                assigned += 1;
                println!("  {} × {} → {} ({})", quantity, item.name, boat, outcome.message());
            }
            Err(e) => eprintln!("Failed to assign {} to {}: {}", item.name, boat, e),
        }
    }

    let elapsed = start.elapsed();
    println!();
    println!(
        "✓ Seeded {} pool items and {} assignments in {:?}",
        created.len(),
        assigned,
        elapsed
    );

    store.database().close().await;
    println!("✓ Seed complete!");

    Ok(())
}

/// Builds a valid create payload for one stock line.
fn pool_request(
    (name, unit, unit_size, price_cents): &(&str, &str, i64, i64),
    note: &str,
    seed: usize,
) -> PoolItemRequest {
    // Whole multiples of the unit size keep totals exact
    let packs = 2 + (seed % 9) as i64;
    let quantity = packs * unit_size;
    let unit_price = fleet_core::Money::from_cents(*price_cents);
    let total = unit_price.line_total(quantity, *unit_size);

    PoolItemRequest {
        name: Some(json!(name)),
        note: Some(json!(note)),
        quantity: Some(json!(quantity)),
        unit_price: Some(json!(unit_price.as_decimal())),
        select_unit: Some(json!(unit)),
        unit_size: Some(json!(unit_size)),
        total: Some(json!(total.as_decimal())),
        date_created: Some(json!(Utc::now().to_rfc3339())),
    }
}
