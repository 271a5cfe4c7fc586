/// Catalog record types
/// 
/// Rows of the `workflows` and `purchases` tables as returned to API clients.
/// Tags are stored as JSON text and always exposed as a parsed list.

use serde::{Deserialize, Serialize};

/// A workflow template listed in the marketplace
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CatalogWorkflow {
    pub id: i64,
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub demo_url: Option<String>,
    pub download_url: Option<String>,
    pub created_at: String,
    pub tags: Vec<String>,
    pub downloads: i64,
    pub rating: f64,
    pub image_url: Option<String>,
    /// Raw n8n export, present for imported workflows
    pub workflow_json: Option<String>,
}

impl CatalogWorkflow {
    /// Case-insensitive match against title, description and tags
    pub fn matches_search(&self, query: &str) -> bool {
        let query = query.trim().to_lowercase();
        if query.is_empty() {
            return true;
        }

        self.title.to_lowercase().contains(&query)
            || self.description.to_lowercase().contains(&query)
            || self.tags.iter().any(|tag| tag.to_lowercase().contains(&query))
    }
}

/// Fields needed to insert a catalog workflow
#[derive(Debug, Clone, Default)]
pub struct NewCatalogWorkflow {
    pub title: String,
    pub description: String,
    pub category: String,
    pub price: f64,
    pub demo_url: Option<String>,
    pub download_url: Option<String>,
    pub tags: Vec<String>,
    pub image_url: Option<String>,
    pub workflow_json: Option<String>,
}

/// Metadata refreshed when a library file is re-imported under an existing title
#[derive(Debug, Clone)]
pub struct ExtractedUpdate {
    pub description: String,
    pub category: String,
    pub tags: Vec<String>,
    pub workflow_json: String,
}

/// A recorded purchase (download) of a workflow
#[derive(Debug, Clone, Serialize)]
pub struct Purchase {
    pub id: i64,
    pub workflow_id: i64,
    pub email: String,
    pub purchased_at: String,
}

/// Optional filters for catalog listings
#[derive(Debug, Clone, Default, Deserialize)]
pub struct CatalogFilter {
    /// Exact category label
    pub category: Option<String>,
    /// Free-text search over title, description and tags
    pub search: Option<String>,
}

/// Price breakdown used by the verify report
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CatalogCounts {
    pub total: i64,
    pub paid: i64,
    pub free: i64,
}

/// Short listing row (id, title, price)
#[derive(Debug, Clone, PartialEq)]
pub struct CatalogEntry {
    pub id: i64,
    pub title: String,
    pub price: f64,
}
