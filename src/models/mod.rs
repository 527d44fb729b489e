pub mod loaders;
pub mod order;
pub mod receipt;

pub use loaders::{load_orders_from_csv, parse_orders};
pub use order::{part_model, FieldAction, FormField, InvalidOrder, Order, PART_CATALOG};
pub use receipt::{extract_receipt_id, ArtifactLayout, ReceiptArtifact};
