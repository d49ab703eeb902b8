use std::collections::HashMap;

use crate::models::Language;

/// Use-case key → (Turkish label, English label).
const BUILTIN_CATEGORIES: &[(&str, &str, &str)] = &[
    ("research", "Araştırma", "Research"),
    ("presentation", "Sunum", "Presentation"),
    ("writing", "Yazım", "Writing"),
    ("education", "Eğitim", "Education"),
    ("video", "Video", "Video"),
    ("planning", "Planlama", "Planning"),
    ("assistant", "Asistan", "Assistant"),
    ("evaluation", "Değerlendirme", "Evaluation"),
];

/// Maps a tool's use-case key to a category label, one table per language.
///
/// Keys are matched case-insensitively after trimming. A key missing from a
/// language's table resolves to that language's fallback label
/// ([`Language::fallback_category`]).
#[derive(Debug, Clone)]
pub struct CategoryTable {
    labels: HashMap<Language, HashMap<String, String>>,
}

impl CategoryTable {
    pub fn new() -> Self {
        CategoryTable { labels: HashMap::new() }
    }

    pub fn builtin() -> Self {
        let mut table = Self::new();
        for (key, tr, en) in BUILTIN_CATEGORIES {
            table.insert(Language::Tr, key, tr);
            table.insert(Language::En, key, en);
        }
        table
    }

    pub fn insert(&mut self, language: Language, use_case: &str, label: &str) {
        self.labels
            .entry(language)
            .or_default()
            .insert(normalize_key(use_case), label.to_string());
    }

    pub fn resolve(&self, use_case: &str, language: Language) -> &str {
        self.labels
            .get(&language)
            .and_then(|labels| labels.get(&normalize_key(use_case)))
            .map(String::as_str)
            .filter(|label| !label.is_empty())
            .unwrap_or_else(|| language.fallback_category())
    }
}

impl Default for CategoryTable {
    fn default() -> Self {
        Self::builtin()
    }
}

fn normalize_key(key: &str) -> String {
    key.trim().to_lowercase()
}
