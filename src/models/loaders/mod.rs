pub mod csv_loader;

pub use csv_loader::{load_orders_from_csv, parse_orders};
