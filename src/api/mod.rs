/// HTTP API Layer
/// 
/// This module provides the REST API consumed by the storefront:
/// - Catalog listing with category and search filters
/// - Workflow detail and category listing
/// - Purchase recording

// Catalog endpoints (GET workflows / categories, POST purchase)
pub mod workflows;

// Error type mapped onto the response envelope
pub mod error;

// Re-export router builder and state
pub use error::ApiError;
pub use workflows::{create_workflow_routes, AppState};
