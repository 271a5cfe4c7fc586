/// Catalog REST API endpoints
/// 
/// Read-only catalog browsing (list, filter, detail, categories) and purchase
/// recording. Responses use the `{ success, data, count, message }` envelope
/// the storefront expects.

use crate::{
    api::error::ApiError,
    catalog::{CatalogFilter, CatalogStorage, CatalogWorkflow},
};
use axum::{
    body::Bytes,
    extract::{Path, Query, State},
    response::Json,
    routing::{get, post},
    Router,
};
use regex::Regex;
use serde::Serialize;
use serde_json::Value;
use std::sync::LazyLock;

static EMAIL_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[^\s@]+@[^\s@]+\.[^\s@]+$").expect("email pattern is valid")
});

/// Application state containing shared resources
#[derive(Clone)]
pub struct AppState {
    /// Catalog storage for workflows and purchases
    pub storage: CatalogStorage,
}

/// Standard response envelope
#[derive(Debug, Serialize)]
pub struct ApiResponse<T> {
    pub success: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub count: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    fn data(data: T) -> Self {
        Self {
            success: true,
            count: None,
            message: None,
            data: Some(data),
        }
    }
}

/// Request body for recording a purchase
/// 
/// Parsed by hand from the raw body so that every malformed request gets the
/// API's own 400 envelope. `workflow_id` may be a number or a numeric string.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PurchaseRequest {
    pub workflow_id: i64,
    pub email: String,
}

impl PurchaseRequest {
    /// Parse a JSON body, returning None if either field is missing, zero or empty
    pub fn from_body(body: &[u8]) -> Option<Self> {
        let payload: Value = serde_json::from_slice(body).ok()?;

        let workflow_id = match payload.get("workflow_id")? {
            Value::Number(number) => number.as_i64()?,
            Value::String(text) => text.trim().parse().ok()?,
            _ => return None,
        };
        let email = payload.get("email")?.as_str()?;

        (workflow_id != 0 && !email.is_empty()).then(|| Self {
            workflow_id,
            email: email.to_string(),
        })
    }
}

/// Payload returned after a successful purchase
#[derive(Debug, Serialize)]
pub struct PurchaseReceipt {
    pub purchase_id: i64,
    pub workflow_title: String,
    pub download_url: Option<String>,
}

/// Create catalog routes
pub fn create_workflow_routes() -> Router<AppState> {
    Router::new()
        .route("/api/workflows", get(list_workflows))
        .route("/api/workflows/{id}", get(get_workflow))
        .route("/api/categories", get(list_categories))
        .route("/api/purchase", post(create_purchase))
}

/// List catalog workflows
/// 
/// GET /api/workflows?category=CRM&search=lead
async fn list_workflows(
    State(state): State<AppState>,
    Query(filter): Query<CatalogFilter>,
) -> Result<Json<ApiResponse<Vec<CatalogWorkflow>>>, ApiError> {
    let workflows = state
        .storage
        .list_workflows(&filter)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch workflows", e))?;

    match filter.category.as_deref() {
        Some(category) => tracing::info!(
            "📂 Fetched {} workflows from category: {}",
            workflows.len(),
            category
        ),
        None => tracing::info!("📋 Fetched {} total workflows", workflows.len()),
    }

    Ok(Json(ApiResponse {
        count: Some(workflows.len()),
        ..ApiResponse::data(workflows)
    }))
}

/// Get a specific workflow by ID
/// 
/// GET /api/workflows/{id}
async fn get_workflow(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ApiResponse<CatalogWorkflow>>, ApiError> {
    let id: i64 = id
        .trim()
        .parse()
        .map_err(|_| ApiError::BadRequest("Invalid workflow ID"))?;

    let workflow = state
        .storage
        .get_workflow(id)
        .await
        .map_err(|e| ApiError::internal("Failed to fetch workflow", e))?
        .ok_or(ApiError::NotFound("Workflow not found"))?;

    tracing::info!("✅ Fetched workflow: {}", workflow.title);

    Ok(Json(ApiResponse::data(workflow)))
}

/// List distinct categories present in the catalog
/// 
/// GET /api/categories
async fn list_categories(
    State(state): State<AppState>,
) -> Result<Json<ApiResponse<Vec<String>>>, ApiError> {
    let categories = state
        .storage
        .list_categories()
        .await
        .map_err(|e| ApiError::internal("Failed to fetch categories", e))?;

    Ok(Json(ApiResponse {
        count: Some(categories.len()),
        ..ApiResponse::data(categories)
    }))
}

/// Record a purchase (free download) of a workflow
/// 
/// POST /api/purchase
/// Body: { "workflow_id": 1, "email": "user@example.com" }
async fn create_purchase(
    State(state): State<AppState>,
    body: Bytes,
) -> Result<Json<ApiResponse<PurchaseReceipt>>, ApiError> {
    let Some(PurchaseRequest { workflow_id, email }) = PurchaseRequest::from_body(&body) else {
        tracing::warn!("❌ Rejected purchase request with missing or malformed fields");
        return Err(ApiError::BadRequest(
            "Missing required fields: workflow_id and email",
        ));
    };

    if !EMAIL_PATTERN.is_match(&email) {
        return Err(ApiError::BadRequest("Invalid email format"));
    }

    let workflow = state
        .storage
        .get_workflow(workflow_id)
        .await
        .map_err(|e| ApiError::internal("Failed to process purchase", e))?
        .ok_or(ApiError::NotFound("Workflow not found"))?;

    let purchase = state
        .storage
        .record_purchase(workflow_id, &email)
        .await
        .map_err(|e| ApiError::internal("Failed to process purchase", e))?;

    tracing::info!("💰 Purchase recorded: {} bought \"{}\"", purchase.email, workflow.title);

    Ok(Json(ApiResponse {
        message: Some("Purchase completed successfully".to_string()),
        ..ApiResponse::data(PurchaseReceipt {
            purchase_id: purchase.id,
            workflow_title: workflow.title,
            download_url: workflow.download_url,
        })
    }))
}
