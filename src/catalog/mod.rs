/// Marketplace catalog layer
/// 
/// SQLite-backed storage for workflow templates and purchases, plus the record
/// types returned to API clients.

pub mod storage;
pub mod types;

pub use storage::CatalogStorage;
pub use types::{CatalogFilter, CatalogWorkflow, NewCatalogWorkflow, Purchase};
