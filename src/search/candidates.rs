use std::collections::HashMap;

use crate::catalog::{Product, Vendor};
use crate::geo::{self, Coordinate};

/// Cost of one kilometer of travel, expressed in currency units.
pub const DEFAULT_DISTANCE_WEIGHT: f64 = 10.0;

/// A product joined to its vendor, annotated with the distance from the
/// requester and the deterministic cost score. Recomputed per search, never
/// persisted.
#[derive(Debug, Clone)]
pub struct Candidate {
    pub product: Product,
    pub vendor: Vendor,
    pub distance_km: f64,
    pub score: f64,
}

/// Build one candidate per product whose vendor has a known coordinate.
///
/// Products referencing a missing vendor, or a vendor without a coordinate,
/// are excluded: they cannot be ranked geographically. Pure over its inputs.
/// `score = price + distance_km * distance_weight`, strictly monotonic in
/// both price and distance for a non-negative weight.
pub fn build_candidates(
    products: &[Product],
    vendors: &[Vendor],
    origin: Coordinate,
    distance_weight: f64,
) -> Vec<Candidate> {
    let vendors_by_id: HashMap<u64, &Vendor> = vendors.iter().map(|v| (v.id, v)).collect();

    products
        .iter()
        .filter_map(|product| {
            let vendor = vendors_by_id.get(&product.vendor_id)?;
            let location = vendor.location?;
            let distance_km = geo::distance_km(origin, location);
            let score = product.price + distance_km * distance_weight;
            Some(Candidate {
                product: product.clone(),
                vendor: (*vendor).clone(),
                distance_km,
                score,
            })
        })
        .collect()
}
