/// Core workflow type definitions
/// 
/// Defines the n8n workflow export shape (definition, nodes) and the metadata
/// derived from it by the extractor. Definitions are parsed leniently: missing
/// fields fall back to defaults so that extraction never fails on partial input.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;

/// Node type identifier used by n8n for annotation-only sticky notes
pub const STICKY_NOTE_TYPE: &str = "n8n-nodes-base.stickyNote";

/// A parsed n8n workflow export
/// 
/// Only the fields the extractor inspects are typed. `connections` and `settings`
/// are kept as raw JSON so that the definition can be stored back untouched.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct WorkflowDefinition {
    /// Optional workflow name set inside the n8n editor
    #[serde(default)]
    pub name: Option<String>,
    /// Ordered list of nodes in this workflow
    #[serde(default)]
    pub nodes: Vec<Node>,
    /// Node connection map (not interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub connections: Option<Value>,
    /// Workflow settings (not interpreted)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub settings: Option<Value>,
    /// Free-form metadata, may carry a `description`
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub meta: Option<Value>,
}

impl WorkflowDefinition {
    /// Build a definition from an already parsed JSON value
    /// 
    /// Non-object values and nodes without a string `type` degrade to empty
    /// defaults instead of failing; use `validate_workflow_json` to reject them.
    pub fn from_value(value: &Value) -> Self {
        let Some(object) = value.as_object() else {
            return Self::default();
        };

        let nodes = object
            .get("nodes")
            .and_then(Value::as_array)
            .map(|nodes| nodes.iter().map(Node::from_value).collect())
            .unwrap_or_default();

        Self {
            name: object.get("name").and_then(Value::as_str).map(str::to_string),
            nodes,
            connections: object.get("connections").cloned(),
            settings: object.get("settings").cloned(),
            meta: object.get("meta").cloned(),
        }
    }

    /// Lowercased node types joined by single spaces
    /// 
    /// This is the haystack used by category detection and statistics.
    pub fn node_types_lowercase(&self) -> String {
        self.nodes
            .iter()
            .map(|node| node.node_type.to_lowercase())
            .collect::<Vec<_>>()
            .join(" ")
    }
}

/// A single node in an n8n workflow
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Node {
    /// Vendor-qualified node type (e.g., "n8n-nodes-base.hubspot")
    #[serde(rename = "type", default)]
    pub node_type: String,
    /// Display name of the node inside the editor
    #[serde(default)]
    pub name: String,
    /// Node-specific configuration parameters
    #[serde(default)]
    pub parameters: Value,
}

impl Node {
    fn from_value(value: &Value) -> Self {
        Self {
            node_type: value
                .get("type")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            name: value
                .get("name")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            parameters: value.get("parameters").cloned().unwrap_or(Value::Null),
        }
    }

    /// Whether this node only holds annotation text
    pub fn is_sticky_note(&self) -> bool {
        self.node_type == STICKY_NOTE_TYPE
    }
}

/// Catalog category assigned to a workflow
/// 
/// Closed set. Serialized with the display labels used by the storefront.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Category {
    #[serde(rename = "Social Media")]
    SocialMedia,
    Email,
    #[serde(rename = "CRM")]
    Crm,
    #[serde(rename = "Data Processing")]
    DataProcessing,
    Finance,
    Marketing,
    Productivity,
    #[default]
    Automation,
}

impl Category {
    /// Display label as stored in the catalog
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SocialMedia => "Social Media",
            Self::Email => "Email",
            Self::Crm => "CRM",
            Self::DataProcessing => "Data Processing",
            Self::Finance => "Finance",
            Self::Marketing => "Marketing",
            Self::Productivity => "Productivity",
            Self::Automation => "Automation",
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Coarse size classification by node count
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Complexity {
    Simple,
    Medium,
    Complex,
}

impl Complexity {
    /// Classify a workflow by its number of nodes
    /// 
    /// More than 15 nodes is Complex, more than 7 is Medium.
    pub fn from_node_count(node_count: usize) -> Self {
        if node_count > 15 {
            Self::Complex
        } else if node_count > 7 {
            Self::Medium
        } else {
            Self::Simple
        }
    }
}

impl fmt::Display for Complexity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            Self::Simple => "Simple",
            Self::Medium => "Medium",
            Self::Complex => "Complex",
        };
        f.write_str(label)
    }
}

/// Structural statistics of a workflow
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowStats {
    pub node_count: usize,
    #[serde(rename = "hasAI")]
    pub has_ai: bool,
    pub has_schedule: bool,
    pub complexity: Complexity,
}

/// Everything the extractor derives from one workflow file
/// 
/// Ephemeral: recomputed on every import and never persisted as a unit.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExtractionResult {
    pub title: String,
    pub description: String,
    pub category: Category,
    pub tags: Vec<String>,
    pub stats: WorkflowStats,
}
