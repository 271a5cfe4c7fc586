/// Workflow Metadata Layer
/// 
/// This module understands n8n workflow exports and derives catalog metadata from them:
/// - Type definitions (WorkflowDefinition, Node, ExtractionResult)
/// - Fixed keyword vocabularies for category and tag classification
/// - The pure metadata extractor used by the library importer

// Core workflow type definitions
pub mod types;

// Read-only keyword tables
pub mod vocabulary;

// Title / description / category / tag / stats extraction
pub mod extractor;

// Re-export commonly used types
pub use extractor::{extract_description, extract_title, validate_workflow_json, MetadataExtractor};
pub use types::{Category, Complexity, ExtractionResult, Node, WorkflowDefinition, WorkflowStats};
pub use vocabulary::{Vocabulary, N8N_VOCABULARY};
