pub mod api_connection;
pub mod catalog;
pub mod cli;
pub mod geo;
pub mod search;
