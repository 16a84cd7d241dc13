use serde::{Deserialize, Serialize};

use crate::geo::Coordinate;

/// A vendor whose price list has been ingested. `location` is `None` when
/// geocoding the address failed; such vendors are excluded from ranking.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Vendor {
    pub id: u64,
    pub name: String,
    pub address: String,
    pub location: Option<Coordinate>,
}

/// A single catalog entry. Immutable once persisted; `vendor_id` must refer
/// to an existing [`Vendor`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    pub id: u64,
    pub name: String,
    pub price: f64,
    pub vendor_id: u64,
}
