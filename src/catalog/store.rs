use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::path::{Path, PathBuf};

use super::models::{Product, Vendor};
use super::price_list::PriceRow;
use crate::geo::Coordinate;

const VENDORS_FILE: &str = "vendors.json";
const PRODUCTS_FILE: &str = "products.json";

/// File-backed catalog repository. Each table is a JSON array on disk.
///
/// Reads return a fresh snapshot every call, so a search pipeline re-invoked
/// after an ingest sees the appended records. Writers must be serialized by
/// the caller; the store itself holds no locks.
#[derive(Debug, Clone)]
pub struct CatalogStore {
    vendors_path: PathBuf,
    products_path: PathBuf,
}

impl CatalogStore {
    pub fn new(data_dir: impl AsRef<Path>) -> Self {
        let data_dir = data_dir.as_ref();
        Self {
            vendors_path: data_dir.join(VENDORS_FILE),
            products_path: data_dir.join(PRODUCTS_FILE),
        }
    }

    pub fn load_vendors(&self) -> Vec<Vendor> {
        load_table(&self.vendors_path)
    }

    pub fn load_products(&self) -> Vec<Product> {
        load_table(&self.products_path)
    }

    pub fn save_vendors(&self, vendors: &[Vendor]) -> Result<()> {
        save_table(&self.vendors_path, vendors)
    }

    pub fn save_products(&self, products: &[Product]) -> Result<()> {
        save_table(&self.products_path, products)
    }

    /// Append a vendor and its price rows, assigning sequential ids.
    /// Returns the new vendor's id.
    pub fn ingest_price_list(
        &self,
        name: &str,
        address: &str,
        location: Option<Coordinate>,
        rows: &[PriceRow],
    ) -> Result<u64> {
        let mut vendors = self.load_vendors();
        let mut products = self.load_products();

        let vendor_id = vendors.iter().map(|v| v.id).max().unwrap_or(0) + 1;
        vendors.push(Vendor {
            id: vendor_id,
            name: name.to_string(),
            address: address.to_string(),
            location,
        });

        let mut next_product_id = products.iter().map(|p| p.id).max().unwrap_or(0) + 1;
        for row in rows {
            products.push(Product {
                id: next_product_id,
                name: row.name.clone(),
                price: row.price,
                vendor_id,
            });
            next_product_id += 1;
        }

        self.save_vendors(&vendors)?;
        self.save_products(&products)?;
        Ok(vendor_id)
    }
}

/// A missing file is an empty table; a corrupt file is treated the same,
/// with a warning, so a damaged catalog degrades instead of blocking reads.
fn load_table<T: DeserializeOwned>(path: &Path) -> Vec<T> {
    if !path.exists() {
        return Vec::new();
    }
    let raw = match std::fs::read_to_string(path) {
        Ok(raw) => raw,
        Err(e) => {
            tracing::warn!("failed to read {:?}: {}", path, e);
            return Vec::new();
        }
    };
    match serde_json::from_str(&raw) {
        Ok(records) => records,
        Err(e) => {
            tracing::warn!("failed to parse {:?}: {}", path, e);
            Vec::new()
        }
    }
}

fn save_table<T: Serialize>(path: &Path, records: &[T]) -> Result<()> {
    let json = serde_json::to_string_pretty(records)
        .with_context(|| format!("failed to serialize records for {:?}", path))?;
    std::fs::write(path, json).with_context(|| format!("failed to write {:?}", path))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_load_from_empty_dir_returns_empty_tables() {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path());
        assert!(store.load_vendors().is_empty());
        assert!(store.load_products().is_empty());
    }

    #[test]
    fn test_corrupt_file_loads_as_empty() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join(VENDORS_FILE), "not json at all").unwrap();
        let store = CatalogStore::new(dir.path());
        assert!(store.load_vendors().is_empty());
    }

    #[test]
    fn test_ingest_assigns_sequential_ids_and_round_trips() -> Result<()> {
        let dir = TempDir::new().unwrap();
        let store = CatalogStore::new(dir.path());

        let rows = vec![
            PriceRow {
                name: "Milk".to_string(),
                price: 80.0,
            },
            PriceRow {
                name: "Bread".to_string(),
                price: 45.0,
            },
        ];
        let first = store.ingest_price_list(
            "Dairy Corner",
            "Moscow, Tverskaya 1",
            Some(Coordinate::new(55.76, 37.61)),
            &rows,
        )?;
        assert_eq!(first, 1);

        let second = store.ingest_price_list("No Coords Shop", "Unknown st. 5", None, &rows)?;
        assert_eq!(second, 2);

        let vendors = store.load_vendors();
        let products = store.load_products();
        assert_eq!(vendors.len(), 2);
        assert_eq!(products.len(), 4);
        assert_eq!(products.iter().map(|p| p.id).collect::<Vec<_>>(), vec![1, 2, 3, 4]);
        assert!(vendors[0].location.is_some());
        assert!(vendors[1].location.is_none());
        assert!(products.iter().filter(|p| p.vendor_id == second).count() == 2);
        Ok(())
    }
}
