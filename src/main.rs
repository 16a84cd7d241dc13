use anyhow::{Context, Result};
use std::path::Path;
use tracing::{info, Level};
use tracing_subscriber::FmtSubscriber;

use price_scout::api_connection::endpoints::Provider;
use price_scout::catalog::{parse_price_list, CatalogStore};
use price_scout::cli::{parse_args, Command};
use price_scout::geo::{self, Coordinate, DEFAULT_LOCATION};
use price_scout::search::{smart_search, SearchOutcome};

const API_KEY_ENV_VAR: &str = "OPENROUTER_API_KEY";

async fn resolve_origin(address: Option<&str>) -> Coordinate {
    let Some(address) = address else {
        return DEFAULT_LOCATION;
    };
    match geo::geocode_address(address).await {
        Some(location) => {
            info!("search origin: {} ({}, {})", address, location.lat, location.lon);
            location
        }
        None => {
            eprintln!(
                "Could not geocode '{}', using the default location ({}, {}).",
                address, DEFAULT_LOCATION.lat, DEFAULT_LOCATION.lon
            );
            DEFAULT_LOCATION
        }
    }
}

async fn run_ingest(
    store: &CatalogStore,
    vendor: &str,
    vendor_address: &str,
    price_list: &str,
) -> Result<()> {
    let rows = parse_price_list(Path::new(price_list))
        .with_context(|| format!("failed to parse price list '{}'", price_list))?;
    if rows.is_empty() {
        println!("No valid rows found in '{}', nothing ingested.", price_list);
        return Ok(());
    }

    println!("Geocoding '{}'...", vendor_address);
    let location = geo::geocode_address(vendor_address).await;
    if location.is_none() {
        println!("Could not geocode the address; the vendor will be stored without a coordinate and excluded from ranking.");
    }

    let vendor_id = store
        .ingest_price_list(vendor, vendor_address, location, &rows)
        .with_context(|| format!("failed to persist price list for '{}'", vendor))?;
    println!("Ingested {} product(s) for '{}' (vendor #{}).", rows.len(), vendor, vendor_id);
    Ok(())
}

async fn run_search(
    store: &CatalogStore,
    origin: Coordinate,
    query: &str,
    distance_weight: f64,
    top: usize,
) -> Result<()> {
    anyhow::ensure!(
        distance_weight >= 0.0,
        "distance weight must be non-negative, got {}",
        distance_weight
    );

    let vendors = store.load_vendors();
    let products = store.load_products();
    let provider = Provider::openrouter(API_KEY_ENV_VAR);

    let outcome: SearchOutcome =
        smart_search(&provider, &products, &vendors, origin, query, distance_weight)
            .await
            .map_err(|e| anyhow::anyhow!("search failed: {}", e))?;

    if outcome.candidate_count == 0 {
        println!("No rankable products in the catalog (missing vendors or coordinates?).");
        return Ok(());
    }
    if outcome.results.is_empty() {
        println!(
            "The assistant found no usable matches among {} candidate(s).",
            outcome.candidate_count
        );
        return Ok(());
    }
    if outcome.dropped_items > 0 {
        println!(
            "(Dropped {} assistant item(s) that matched no catalog record.)",
            outcome.dropped_items
        );
    }

    println!("\nTop {} option(s) for '{}':", top.min(outcome.results.len()), query);
    for (i, result) in outcome.results.iter().take(top).enumerate() {
        println!("{}. {} - {}", i + 1, result.product_name, result.price);
        println!("   Store: {}", result.company_name);
        println!("   Address: {}", result.company_address);
        println!("   Distance: {:.1} km", result.distance_km);
        println!("   Score (price + distance x {}): {:.1}", distance_weight, result.score);
    }
    Ok(())
}

fn run_vendors(store: &CatalogStore, origin: Coordinate) {
    let vendors = store.load_vendors();
    println!("Known vendors ({}):", vendors.len());
    for vendor in &vendors {
        println!("{}. {}", vendor.id, vendor.name);
        println!("   Address: {}", vendor.address);
        match vendor.location {
            Some(location) => {
                println!("   Distance from you: {:.1} km", geo::distance_km(origin, location));
            }
            None => println!("   Distance from you: unknown (no coordinate)"),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv::dotenv().ok();

    let subscriber = FmtSubscriber::builder()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(Level::WARN.to_string())),
        )
        .finish();
    tracing::subscriber::set_global_default(subscriber)?;

    let cli_args = parse_args();
    let store = CatalogStore::new(&cli_args.data_dir);
    let origin = resolve_origin(cli_args.address.as_deref()).await;

    match &cli_args.command {
        Command::Ingest {
            vendor,
            vendor_address,
            price_list,
        } => run_ingest(&store, vendor, vendor_address, price_list).await?,
        Command::Search {
            query,
            distance_weight,
            top,
        } => run_search(&store, origin, query, *distance_weight, *top).await?,
        Command::Vendors => run_vendors(&store, origin),
    }

    Ok(())
}
