/// Workflow metadata extractor
/// 
/// Derives catalog metadata (title, description, category, tags, statistics)
/// from an n8n workflow export. Every function here is pure and total: missing
/// or malformed fields fall back to documented defaults and nothing panics.

use crate::workflow::{
    types::{Category, Complexity, ExtractionResult, WorkflowDefinition, WorkflowStats},
    vocabulary::{contains_any, Vocabulary, BASE_TAGS, MAX_DERIVED_TAGS},
};
use regex::Regex;
use serde_json::Value;
use std::sync::LazyLock;

/// Maximum description length taken from a sticky note, in characters
pub const MAX_DESCRIPTION_CHARS: usize = 500;

/// Suffix appended to truncated descriptions
pub const ELLIPSIS: &str = "...";

/// Description suffix used when only the workflow name is known
pub const NAMED_DESCRIPTION_SUFFIX: &str = "אוטומציה מתקדמת עם N8N";

/// Description used when nothing better is available
pub const FALLBACK_DESCRIPTION: &str =
    "אוטומציה מתקדמת עם N8N. Workflow זה מאפשר ביצוע משימות אוטומטיות ושיפור תהליכי עבודה.";

static MARKUP_TAG: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]*>").expect("markup tag pattern is valid"));

/// Turn a library filename into a display title
/// 
/// `linkedin-lead-gen.json` becomes `Linkedin Lead Gen`. A trailing extension
/// is dropped, `-` and `_` separate words, and each word is capitalized.
pub fn extract_title(filename: &str) -> String {
    strip_extension(filename)
        .split(['-', '_'])
        .filter(|word| !word.is_empty())
        .map(capitalize)
        .collect::<Vec<_>>()
        .join(" ")
}

fn strip_extension(filename: &str) -> &str {
    match filename.rsplit_once('.') {
        Some((stem, extension))
            if !stem.is_empty()
                && !extension.is_empty()
                && extension.chars().all(|c| c.is_ascii_alphanumeric()) =>
        {
            stem
        }
        _ => filename,
    }
}

fn capitalize(word: &str) -> String {
    let mut chars = word.chars();
    match chars.next() {
        Some(first) => first
            .to_uppercase()
            .chain(chars.flat_map(char::to_lowercase))
            .collect(),
        None => String::new(),
    }
}

/// Pick the best human-readable description for a workflow
/// 
/// Priority: first sticky note with content (markup stripped, capped at 500
/// characters), then `meta.description`, then a template around the workflow
/// name, then a generic fallback.
pub fn extract_description(definition: &WorkflowDefinition) -> String {
    if let Some(note) = sticky_note_text(definition) {
        return truncate_chars(&note, MAX_DESCRIPTION_CHARS);
    }

    let meta_description = definition
        .meta
        .as_ref()
        .and_then(|meta| meta.get("description"))
        .and_then(Value::as_str)
        .filter(|description| !description.is_empty());
    if let Some(description) = meta_description {
        return description.to_string();
    }

    match definition.name.as_deref() {
        Some(name) if !name.is_empty() => format!("{} - {}", name, NAMED_DESCRIPTION_SUFFIX),
        _ => FALLBACK_DESCRIPTION.to_string(),
    }
}

fn sticky_note_text(definition: &WorkflowDefinition) -> Option<String> {
    let content = definition
        .nodes
        .iter()
        .filter(|node| node.is_sticky_note())
        .find_map(|node| {
            node.parameters
                .get("content")
                .and_then(Value::as_str)
                .filter(|content| !content.is_empty())
        })?;

    let text = MARKUP_TAG.replace_all(content, "");
    let text = text.trim();
    (!text.is_empty()).then(|| text.to_string())
}

fn truncate_chars(text: &str, max_chars: usize) -> String {
    match text.char_indices().nth(max_chars) {
        Some((cut, _)) => format!("{}{}", &text[..cut], ELLIPSIS),
        None => text.to_string(),
    }
}

/// Validate the structure of a parsed workflow export
/// 
/// Valid iff the value is an object whose `nodes` is a non-empty array of
/// objects that each carry a string `type`.
pub fn validate_workflow_json(value: &Value) -> bool {
    let Some(nodes) = value.get("nodes").and_then(Value::as_array) else {
        return false;
    };

    !nodes.is_empty()
        && nodes
            .iter()
            .all(|node| node.is_object() && node.get("type").is_some_and(Value::is_string))
}

/// Metadata extractor bound to a classification vocabulary
#[derive(Debug, Clone, Copy, Default)]
pub struct MetadataExtractor {
    vocabulary: Vocabulary,
}

impl MetadataExtractor {
    /// Create an extractor over the given vocabulary
    pub fn new(vocabulary: Vocabulary) -> Self {
        Self { vocabulary }
    }

    /// Run every extraction step for one workflow file
    pub fn extract(&self, filename: &str, definition: &WorkflowDefinition) -> ExtractionResult {
        ExtractionResult {
            title: extract_title(filename),
            description: extract_description(definition),
            category: self.detect_category(definition),
            tags: self.extract_tags(definition),
            stats: self.workflow_stats(definition),
        }
    }

    /// Detect the catalog category from node types
    /// 
    /// Categories are tested in vocabulary order and the first whose keywords
    /// appear in the joined node types wins.
    pub fn detect_category(&self, definition: &WorkflowDefinition) -> Category {
        let node_types = definition.node_types_lowercase();

        self.vocabulary
            .categories
            .iter()
            .find(|rule| contains_any(&node_types, rule.keywords))
            .map(|rule| rule.category)
            .unwrap_or_default()
    }

    /// Derive tags from node types
    /// 
    /// Always returns the base tags first, then at most six derived tags in the
    /// order they were first seen (node order, then rule order).
    pub fn extract_tags(&self, definition: &WorkflowDefinition) -> Vec<String> {
        let mut derived: Vec<&'static str> = Vec::new();

        for node in &definition.nodes {
            let node_type = node.node_type.to_lowercase();
            for rule in self.vocabulary.tags {
                if contains_any(&node_type, rule.keywords)
                    && !BASE_TAGS.contains(&rule.tag)
                    && !derived.contains(&rule.tag)
                {
                    derived.push(rule.tag);
                }
            }
        }

        BASE_TAGS
            .iter()
            .chain(derived.iter().take(MAX_DERIVED_TAGS))
            .map(|tag| tag.to_string())
            .collect()
    }

    /// Compute node count, AI / schedule flags and complexity
    pub fn workflow_stats(&self, definition: &WorkflowDefinition) -> WorkflowStats {
        let node_count = definition.nodes.len();
        let node_types = definition.node_types_lowercase();

        WorkflowStats {
            node_count,
            has_ai: contains_any(&node_types, self.vocabulary.ai_keywords),
            has_schedule: contains_any(&node_types, self.vocabulary.schedule_keywords),
            complexity: Complexity::from_node_count(node_count),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn definition_with_types(types: &[&str]) -> WorkflowDefinition {
        let nodes: Vec<Value> = types
            .iter()
            .map(|node_type| json!({ "type": node_type, "name": "node" }))
            .collect();
        WorkflowDefinition::from_value(&json!({ "nodes": nodes }))
    }

    #[test]
    fn title_from_hyphenated_filename() {
        assert_eq!(extract_title("linkedin-lead-gen.json"), "Linkedin Lead Gen");
    }

    #[test]
    fn title_normalizes_case_and_underscores() {
        assert_eq!(extract_title("EMAIL_to_crm-SYNC.json"), "Email To Crm Sync");
        assert_eq!(extract_title("no-extension"), "No Extension");
    }

    #[test]
    fn title_of_empty_input_is_empty() {
        assert_eq!(extract_title(""), "");
        assert_eq!(extract_title("--__"), "");
    }

    #[test]
    fn title_never_contains_separators() {
        for filename in ["a-b_c.json", "-lead-", "__x__.json", "ai--video_gen.v2", "ünïcode-wörk"] {
            let title = extract_title(filename);
            assert!(!title.contains('-'), "{title}");
            assert!(!title.contains('_'), "{title}");
        }
    }

    #[test]
    fn title_handles_non_ascii_words() {
        assert_eq!(extract_title("élan-ÜBER.json"), "Élan Über");
    }

    #[test]
    fn description_prefers_sticky_note_without_markup() {
        let definition = WorkflowDefinition::from_value(&json!({
            "name": "Ignored",
            "meta": { "description": "Also ignored" },
            "nodes": [
                { "type": "n8n-nodes-base.code" },
                { "type": STICKY_NOTE, "parameters": { "content": "  <h2>Lead</h2> <b>capture</b> flow  " } }
            ]
        }));
        assert_eq!(extract_description(&definition), "Lead capture flow");
    }

    const STICKY_NOTE: &str = crate::workflow::types::STICKY_NOTE_TYPE;

    #[test]
    fn description_truncates_long_sticky_notes() {
        let content = "x".repeat(600);
        let definition = WorkflowDefinition::from_value(&json!({
            "nodes": [{ "type": STICKY_NOTE, "parameters": { "content": content } }]
        }));
        let description = extract_description(&definition);
        assert_eq!(description, format!("{}...", "x".repeat(500)));
        assert_eq!(description.chars().count(), 503);
    }

    #[test]
    fn description_keeps_notes_at_the_limit() {
        let content = "y".repeat(500);
        let definition = WorkflowDefinition::from_value(&json!({
            "nodes": [{ "type": STICKY_NOTE, "parameters": { "content": content.clone() } }]
        }));
        assert_eq!(extract_description(&definition), content);
    }

    #[test]
    fn description_falls_through_markup_only_note_to_meta() {
        let definition = WorkflowDefinition::from_value(&json!({
            "meta": { "description": "From meta" },
            "nodes": [{ "type": STICKY_NOTE, "parameters": { "content": "<br/>  <hr>" } }]
        }));
        assert_eq!(extract_description(&definition), "From meta");
    }

    #[test]
    fn description_skips_empty_sticky_note_for_next_one() {
        let definition = WorkflowDefinition::from_value(&json!({
            "meta": { "description": "From meta" },
            "nodes": [
                { "type": STICKY_NOTE, "parameters": { "content": "" } },
                { "type": STICKY_NOTE, "parameters": { "content": "<p>Second note</p>" } }
            ]
        }));
        assert_eq!(extract_description(&definition), "Second note");
    }

    #[test]
    fn description_does_not_retry_after_markup_only_note() {
        let definition = WorkflowDefinition::from_value(&json!({
            "meta": { "description": "From meta" },
            "nodes": [
                { "type": STICKY_NOTE, "parameters": { "content": "<br/>" } },
                { "type": STICKY_NOTE, "parameters": { "content": "Later note" } }
            ]
        }));
        assert_eq!(extract_description(&definition), "From meta");
    }

    #[test]
    fn description_uses_name_template_then_fallback() {
        let named = WorkflowDefinition::from_value(&json!({
            "name": "Invoice Bot",
            "meta": { "description": "" },
            "nodes": [{ "type": "n8n-nodes-base.stripe" }]
        }));
        assert_eq!(
            extract_description(&named),
            format!("Invoice Bot - {}", NAMED_DESCRIPTION_SUFFIX)
        );

        let anonymous = WorkflowDefinition::from_value(&json!({ "meta": "not an object" }));
        assert_eq!(extract_description(&anonymous), FALLBACK_DESCRIPTION);
    }

    #[test]
    fn category_for_hubspot_is_crm() {
        let extractor = MetadataExtractor::default();
        let definition = definition_with_types(&["n8n-nodes-base.hubspot"]);
        assert_eq!(extractor.detect_category(&definition), Category::Crm);
    }

    #[test]
    fn category_priority_prefers_social_over_crm() {
        let extractor = MetadataExtractor::default();
        let definition = definition_with_types(&["n8n-nodes-base.hubspot", "n8n-nodes-base.linkedIn"]);
        assert_eq!(extractor.detect_category(&definition), Category::SocialMedia);
    }

    #[test]
    fn category_defaults_to_automation() {
        let extractor = MetadataExtractor::default();
        assert_eq!(
            extractor.detect_category(&WorkflowDefinition::default()),
            Category::Automation
        );
        assert_eq!(
            extractor.detect_category(&definition_with_types(&["n8n-nodes-base.code"])),
            Category::Automation
        );
    }

    #[test]
    fn category_is_deterministic() {
        let extractor = MetadataExtractor::default();
        let definition = definition_with_types(&["n8n-nodes-base.googleSheets", "n8n-nodes-base.stripe"]);
        let first = extractor.detect_category(&definition);
        assert_eq!(first, Category::DataProcessing);
        assert_eq!(extractor.detect_category(&definition), first);
    }

    #[test]
    fn tags_start_with_base_tags() {
        let extractor = MetadataExtractor::default();
        let tags = extractor.extract_tags(&WorkflowDefinition::default());
        assert_eq!(tags, vec!["N8N", "Real-Workflow"]);
    }

    #[test]
    fn tags_are_capped_and_unique() {
        let extractor = MetadataExtractor::default();
        let definition = definition_with_types(&[
            "n8n-nodes-base.gmail",
            "n8n-nodes-base.slack",
            "n8n-nodes-base.hubspot",
            "n8n-nodes-base.salesforce",
            "n8n-nodes-base.googleSheets",
            "n8n-nodes-base.airtable",
            "n8n-nodes-base.stripe",
            "n8n-nodes-base.redis",
            "n8n-nodes-base.slack",
        ]);
        let tags = extractor.extract_tags(&definition);

        assert_eq!(&tags[..2], &["N8N", "Real-Workflow"]);
        assert_eq!(tags.len(), 8);
        let mut unique = tags.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), tags.len());
    }

    #[test]
    fn tags_include_ai_and_integration_rules() {
        let extractor = MetadataExtractor::default();
        let definition = definition_with_types(&[
            "@n8n/n8n-nodes-langchain.lmChatOpenAi",
            "n8n-nodes-base.httpRequest",
        ]);
        let tags = extractor.extract_tags(&definition);

        assert!(tags.contains(&"AI".to_string()));
        assert!(tags.contains(&"HTTP".to_string()));
        assert!(tags.contains(&"Integration".to_string()));
        assert_eq!(tags.iter().filter(|tag| *tag == "AI").count(), 1);
    }

    #[test]
    fn stats_complexity_boundaries() {
        let extractor = MetadataExtractor::default();
        for (count, expected) in [
            (0, Complexity::Simple),
            (7, Complexity::Simple),
            (8, Complexity::Medium),
            (15, Complexity::Medium),
            (16, Complexity::Complex),
        ] {
            let types = vec!["n8n-nodes-base.code"; count];
            let stats = extractor.workflow_stats(&definition_with_types(&types));
            assert_eq!(stats.node_count, count);
            assert_eq!(stats.complexity, expected, "node count {count}");
        }
    }

    #[test]
    fn stats_detect_ai_and_schedule() {
        let extractor = MetadataExtractor::default();
        let stats = extractor.workflow_stats(&definition_with_types(&[
            "n8n-nodes-base.scheduleTrigger",
            "n8n-nodes-base.openAi",
        ]));
        assert!(stats.has_ai);
        assert!(stats.has_schedule);

        let plain = extractor.workflow_stats(&definition_with_types(&["n8n-nodes-base.set"]));
        assert!(!plain.has_ai);
        assert!(!plain.has_schedule);
    }

    #[test]
    fn validation_rules() {
        assert!(!validate_workflow_json(&Value::Null));
        assert!(!validate_workflow_json(&json!("nodes")));
        assert!(!validate_workflow_json(&json!({})));
        assert!(!validate_workflow_json(&json!({ "nodes": {} })));
        assert!(!validate_workflow_json(&json!({ "nodes": [] })));
        assert!(validate_workflow_json(&json!({ "nodes": [{ "type": "x" }] })));
        assert!(!validate_workflow_json(&json!({ "nodes": [{}] })));
        assert!(!validate_workflow_json(&json!({ "nodes": [{ "type": 1 }] })));
        assert!(!validate_workflow_json(&json!({ "nodes": [{ "type": "x" }, null] })));
    }

    #[test]
    fn extraction_is_idempotent() {
        let extractor = MetadataExtractor::default();
        let definition = WorkflowDefinition::from_value(&json!({
            "name": "Social Scheduler",
            "nodes": [
                { "type": "n8n-nodes-base.schedule" },
                { "type": "n8n-nodes-base.twitter" },
                { "type": "n8n-nodes-base.openAi" }
            ]
        }));

        let first = extractor.extract("social-scheduler.json", &definition);
        let second = extractor.extract("social-scheduler.json", &definition);
        assert_eq!(first, second);
        assert_eq!(first.title, "Social Scheduler");
        assert_eq!(first.category, Category::SocialMedia);
        assert!(first.stats.has_schedule);
    }
}
