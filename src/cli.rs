use clap::{Parser, Subcommand};

use crate::search::DEFAULT_DISTANCE_WEIGHT;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
pub struct Cli {
    /// Directory holding the catalog JSON files
    #[arg(short, long, default_value = ".")]
    pub data_dir: String,

    /// Your address, used as the search origin (falls back to a default
    /// location when geocoding fails)
    #[arg(short, long)]
    pub address: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Ingest a vendor's price list (CSV: name, price; first row is a header)
    Ingest {
        /// Vendor display name
        #[arg(long)]
        vendor: String,
        /// Vendor postal address, geocoded on ingest
        #[arg(long)]
        vendor_address: String,
        /// Path to the price list file
        #[arg(long)]
        price_list: String,
    },
    /// Search the catalog for a product
    Search {
        /// Free-text product query
        query: String,
        /// Currency cost of one kilometer of travel
        #[arg(long, default_value_t = DEFAULT_DISTANCE_WEIGHT)]
        distance_weight: f64,
        /// How many results to print
        #[arg(long, default_value_t = 3)]
        top: usize,
    },
    /// List all known vendors with their distance from you
    Vendors,
}

pub fn parse_args() -> Cli {
    Cli::parse()
}
