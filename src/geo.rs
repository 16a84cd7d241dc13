use serde::{Deserialize, Serialize};

/// Fallback location used when the requester's address cannot be geocoded
/// (central Moscow).
pub const DEFAULT_LOCATION: Coordinate = Coordinate {
    lat: 55.7558,
    lon: 37.6173,
};

const EARTH_RADIUS_KM: f64 = 6371.0;
const NOMINATIM_URL: &str = "https://nominatim.openstreetmap.org/search";
const GEOCODER_USER_AGENT: &str = "PriceScout/0.1";

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    pub lat: f64,
    pub lon: f64,
}

impl Coordinate {
    pub fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }
}

/// Great-circle distance between two coordinates in kilometers (haversine).
/// Symmetric, non-negative, zero only for identical points.
pub fn distance_km(a: Coordinate, b: Coordinate) -> f64 {
    let lat_a = a.lat.to_radians();
    let lat_b = b.lat.to_radians();
    let d_lat = (b.lat - a.lat).to_radians();
    let d_lon = (b.lon - a.lon).to_radians();

    let h = (d_lat / 2.0).sin().powi(2) + lat_a.cos() * lat_b.cos() * (d_lon / 2.0).sin().powi(2);
    2.0 * EARTH_RADIUS_KM * h.sqrt().asin()
}

#[derive(Debug, Deserialize)]
struct NominatimPlace {
    lat: String,
    lon: String,
}

/// Resolve a free-text postal address to a coordinate via Nominatim.
///
/// Any failure along the way (network, non-2xx status, unparsable payload,
/// no results) degrades to `None`; the caller decides what a missing
/// coordinate means. The lookup is rate-limited upstream and can be slow.
pub async fn geocode_address(address: &str) -> Option<Coordinate> {
    match try_geocode(address).await {
        Ok(found) => found,
        Err(e) => {
            tracing::warn!("geocoding failed for '{}': {}", address, e);
            None
        }
    }
}

async fn try_geocode(address: &str) -> Result<Option<Coordinate>, reqwest::Error> {
    let client = reqwest::Client::new();
    let response = client
        .get(NOMINATIM_URL)
        .query(&[("q", address), ("format", "json"), ("limit", "1")])
        .header(reqwest::header::USER_AGENT, GEOCODER_USER_AGENT)
        .send()
        .await?
        .error_for_status()?;

    let places = response.json::<Vec<NominatimPlace>>().await?;
    let Some(place) = places.first() else {
        return Ok(None);
    };

    match (place.lat.parse::<f64>(), place.lon.parse::<f64>()) {
        (Ok(lat), Ok(lon)) => Ok(Some(Coordinate::new(lat, lon))),
        _ => {
            tracing::warn!("geocoder returned non-numeric coordinates for '{}'", address);
            Ok(None)
        }
    }
}
