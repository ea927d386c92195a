//! Keyword classification used by the thematic stock-photo tier.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Search term used when no keyword group matches.
pub const DEFAULT_SEARCH_TERM: &str = "lifestyle";

/// Separator placed between matched tags in the stock search query.
pub const TAG_SEPARATOR: &str = ",";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum CategoryTag {
    Baby,
    Book,
    Park,
    Success,
}

impl CategoryTag {
    /// Every tag, in the order matches are reported.
    pub const ALL: [CategoryTag; 4] = [
        CategoryTag::Baby,
        CategoryTag::Book,
        CategoryTag::Park,
        CategoryTag::Success,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            CategoryTag::Baby => "baby",
            CategoryTag::Book => "book",
            CategoryTag::Park => "park",
            CategoryTag::Success => "success",
        }
    }

    fn keywords(&self) -> &'static [&'static str] {
        match self {
            CategoryTag::Baby => &["baby", "child", "infant", "toddler", "kid"],
            CategoryTag::Book => &["book", "reading", "study", "learn"],
            CategoryTag::Park => &["bench", "park", "outdoor", "sitting"],
            CategoryTag::Success => &["success", "business", "professional"],
        }
    }
}

impl fmt::Display for CategoryTag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Tags whose keyword group appears in `prompt` (substring, case-insensitive).
pub fn classify(prompt: &str) -> Vec<CategoryTag> {
    let lowered = prompt.to_lowercase();
    CategoryTag::ALL
        .into_iter()
        .filter(|tag| tag.keywords().iter().any(|kw| lowered.contains(kw)))
        .collect()
}

/// Stock-photo search query for `prompt`: matched tags joined, or the default term.
pub fn search_term(prompt: &str) -> String {
    let tags = classify(prompt);
    if tags.is_empty() {
        return DEFAULT_SEARCH_TERM.to_string();
    }

    tags.iter()
        .map(CategoryTag::as_str)
        .collect::<Vec<_>>()
        .join(TAG_SEPARATOR)
}
