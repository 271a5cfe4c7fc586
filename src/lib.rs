/// AutoFlow Hub: marketplace backend for n8n workflow templates
/// 
/// This library provides the workflow metadata extractor, the SQLite catalog,
/// the library importer, and the REST API served to the storefront.

// Core configuration and setup
pub mod config;

// Workflow metadata layer - n8n export types and the pure metadata extractor
pub mod workflow;

// Catalog layer - SQLite storage for workflows and purchases
pub mod catalog;

// Library import - directory of n8n exports into catalog records
pub mod library;

// HTTP API layer - REST endpoints for the storefront
pub mod api;

// Server setup and initialization
pub mod server;

// Re-export commonly used types for external consumers
pub use catalog::{CatalogStorage, CatalogWorkflow};
pub use library::{ImportReport, LibraryImporter};
pub use server::{build_router, start_server};
pub use workflow::{ExtractionResult, MetadataExtractor, WorkflowDefinition};
