pub mod models;
pub mod price_list;
pub mod store;

pub use models::{Product, Vendor};
pub use price_list::{parse_price_list, PriceRow};
pub use store::CatalogStore;
