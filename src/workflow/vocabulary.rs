/// Fixed keyword vocabularies used for classification
/// 
/// All matching is plain substring search against lowercased node types.
/// Tables are ordered: category rules are tested top to bottom and the first
/// match wins, tag rules are applied top to bottom for every node.

use crate::workflow::types::Category;

/// Tags every catalog workflow starts with
pub const BASE_TAGS: [&str; 2] = ["N8N", "Real-Workflow"];

/// Maximum number of derived tags kept after the base tags
pub const MAX_DERIVED_TAGS: usize = 6;

/// One category with the keywords that select it
#[derive(Debug, Clone, Copy)]
pub struct CategoryRule {
    pub category: Category,
    pub keywords: &'static [&'static str],
}

/// One tag with the keywords that add it
#[derive(Debug, Clone, Copy)]
pub struct TagRule {
    pub keywords: &'static [&'static str],
    pub tag: &'static str,
}

/// Read-only classification tables handed to the extractor
#[derive(Debug, Clone, Copy)]
pub struct Vocabulary {
    pub categories: &'static [CategoryRule],
    pub tags: &'static [TagRule],
    pub ai_keywords: &'static [&'static str],
    pub schedule_keywords: &'static [&'static str],
}

impl Default for Vocabulary {
    fn default() -> Self {
        N8N_VOCABULARY
    }
}

/// Category priority order. Keyword sets overlap, so order is significant.
pub const CATEGORY_RULES: &[CategoryRule] = &[
    CategoryRule {
        category: Category::SocialMedia,
        keywords: &["linkedin", "twitter", "facebook", "instagram", "social"],
    },
    CategoryRule {
        category: Category::Email,
        keywords: &["gmail", "email", "imap", "smtp", "outlook"],
    },
    CategoryRule {
        category: Category::Crm,
        keywords: &["hubspot", "salesforce", "pipedrive", "crm"],
    },
    CategoryRule {
        category: Category::DataProcessing,
        keywords: &["sheets", "airtable", "excel", "csv", "spreadsheet"],
    },
    CategoryRule {
        category: Category::Finance,
        keywords: &["stripe", "paypal", "invoice", "quickbooks"],
    },
    CategoryRule {
        category: Category::Marketing,
        keywords: &["mailchimp", "sendinblue", "campaign", "marketing"],
    },
    CategoryRule {
        category: Category::Productivity,
        keywords: &["slack", "notion", "trello", "asana", "calendar"],
    },
];

/// Keyword to tag mapping, followed by the two broader AI / Integration rules
pub const TAG_RULES: &[TagRule] = &[
    TagRule { keywords: &["gmail"], tag: "Gmail" },
    TagRule { keywords: &["email"], tag: "Email" },
    TagRule { keywords: &["slack"], tag: "Slack" },
    TagRule { keywords: &["hubspot"], tag: "HubSpot" },
    TagRule { keywords: &["salesforce"], tag: "Salesforce" },
    TagRule { keywords: &["sheets"], tag: "Google Sheets" },
    TagRule { keywords: &["airtable"], tag: "Airtable" },
    TagRule { keywords: &["linkedin"], tag: "LinkedIn" },
    TagRule { keywords: &["twitter"], tag: "Twitter" },
    TagRule { keywords: &["facebook"], tag: "Facebook" },
    TagRule { keywords: &["stripe"], tag: "Stripe" },
    TagRule { keywords: &["openai"], tag: "AI" },
    TagRule { keywords: &["anthropic"], tag: "AI" },
    TagRule { keywords: &["webhook"], tag: "Webhooks" },
    TagRule { keywords: &["http"], tag: "HTTP" },
    TagRule { keywords: &["postgres"], tag: "PostgreSQL" },
    TagRule { keywords: &["mysql"], tag: "MySQL" },
    TagRule { keywords: &["mongodb"], tag: "MongoDB" },
    TagRule { keywords: &["redis"], tag: "Redis" },
    TagRule { keywords: &["aws"], tag: "AWS" },
    TagRule { keywords: &["googlecloud"], tag: "Google Cloud" },
    TagRule { keywords: &["azure"], tag: "Azure" },
    TagRule { keywords: &["schedule"], tag: "Scheduled" },
    TagRule { keywords: &["cron"], tag: "Scheduled" },
    TagRule { keywords: &["ai", "gpt", "claude"], tag: "AI" },
    TagRule { keywords: &["webhook", "http"], tag: "Integration" },
];

/// Vocabulary for n8n workflow exports
pub const N8N_VOCABULARY: Vocabulary = Vocabulary {
    categories: CATEGORY_RULES,
    tags: TAG_RULES,
    ai_keywords: &["openai", "anthropic", "ai"],
    schedule_keywords: &["schedule", "cron"],
};

/// Whether `haystack` contains any of `keywords` as a substring
pub fn contains_any(haystack: &str, keywords: &[&str]) -> bool {
    keywords.iter().any(|keyword| haystack.contains(keyword))
}
