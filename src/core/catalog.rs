use std::collections::{HashMap, HashSet};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use thiserror::Error;
use tokio::sync::OnceCell;

use crate::core::categories::CategoryTable;
use crate::core::popularity::{Popularity, PopularitySource};
use crate::models::{DecoratedTool, Language, ToolDescriptor};

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("failed to read catalog {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("failed to parse catalog {}: {source}", .path.display())]
    Parse {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("duplicate tool name in catalog: {0}")]
    DuplicateTool(String),

    #[error("tools {first:?} and {second:?} share the slug {slug:?}")]
    DuplicateSlug {
        slug: String,
        first: String,
        second: String,
    },
}

/// The static tool list backing `/api/tools`.
///
/// The document is read from disk on demand. With caching enabled the first
/// successful parse is kept for the life of the process; a failed load is not
/// cached, so a later request retries the read.
#[derive(Debug)]
pub struct ToolCatalog {
    path: PathBuf,
    cache_enabled: bool,
    cached: OnceCell<Arc<Vec<ToolDescriptor>>>,
}

impl ToolCatalog {
    pub fn new(path: impl Into<PathBuf>, cache_enabled: bool) -> Self {
        ToolCatalog {
            path: path.into(),
            cache_enabled,
            cached: OnceCell::new(),
        }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn descriptors(&self) -> Result<Arc<Vec<ToolDescriptor>>, CatalogError> {
        if self.cache_enabled {
            self.cached.get_or_try_init(|| self.read()).await.map(Arc::clone)
        } else {
            self.read().await
        }
    }

    async fn read(&self) -> Result<Arc<Vec<ToolDescriptor>>, CatalogError> {
        let bytes = tokio::fs::read(&self.path).await.map_err(|source| CatalogError::Io {
            path: self.path.clone(),
            source,
        })?;
        let descriptors = parse_descriptors(&bytes, &self.path)?;
        tracing::debug!("Loaded {} tools from {}", descriptors.len(), self.path.display());
        Ok(Arc::new(descriptors))
    }
}

pub fn parse_descriptors(bytes: &[u8], path: &Path) -> Result<Vec<ToolDescriptor>, CatalogError> {
    let descriptors: Vec<ToolDescriptor> =
        serde_json::from_slice(bytes).map_err(|source| CatalogError::Parse {
            path: path.to_path_buf(),
            source,
        })?;

    let mut seen = HashSet::new();
    let mut slugs: HashMap<String, &str> = HashMap::new();
    for descriptor in &descriptors {
        if !seen.insert(descriptor.name.as_str()) {
            return Err(CatalogError::DuplicateTool(descriptor.name.clone()));
        }
        // slugs key the detail lookup, so they must be unique too
        let slug = descriptor.slug();
        if let Some(first) = slugs.get(&slug) {
            return Err(CatalogError::DuplicateSlug {
                slug,
                first: first.to_string(),
                second: descriptor.name.clone(),
            });
        }
        slugs.insert(slug, descriptor.name.as_str());
    }

    Ok(descriptors)
}

/// Optional narrowing of the decorated list, mirroring the catalog page's
/// search box and category buttons.
#[derive(Debug, Default, Clone)]
pub struct ToolFilter {
    pub search: Option<String>,
    pub category: Option<String>,
}

impl ToolFilter {
    pub fn is_empty(&self) -> bool {
        self.search.is_none() && self.category.is_none()
    }

    pub fn matches(&self, tool: &DecoratedTool) -> bool {
        if let Some(category) = &self.category {
            if &tool.category != category {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            let hit = tool.name.to_lowercase().contains(&needle)
                || tool.academic_use.to_lowercase().contains(&needle)
                || tool.keywords.iter().any(|k| k.to_lowercase().contains(&needle));
            if !hit {
                return false;
            }
        }

        true
    }
}

fn localized(default: &str, english: Option<&str>, language: Language) -> String {
    match (language, english) {
        (Language::En, Some(text)) if !text.trim().is_empty() => text.to_string(),
        _ => default.to_string(),
    }
}

pub fn decorate(
    descriptor: &ToolDescriptor,
    language: Language,
    categories: &CategoryTable,
    popularity: Popularity,
) -> DecoratedTool {
    DecoratedTool {
        name: descriptor.name.clone(),
        slug: descriptor.slug(),
        use_case: descriptor.use_case.clone(),
        academic_use: localized(&descriptor.academic_use, descriptor.academic_use_en.as_deref(), language),
        how_to: localized(&descriptor.how_to, descriptor.how_to_en.as_deref(), language),
        keywords: descriptor.keywords.clone(),
        link: descriptor.link.clone(),
        video_link: descriptor.video_link.clone(),
        short_video_id: descriptor.short_video_id.clone(),
        long_video_id: descriptor.long_video_id.clone(),
        rating: popularity.rating,
        review_count: popularity.review_count,
        is_free: popularity.is_free,
        category: categories.resolve(&descriptor.use_case, language).to_string(),
    }
}

/// Decorates every descriptor in source order.
pub fn decorate_all(
    descriptors: &[ToolDescriptor],
    language: Language,
    categories: &CategoryTable,
    popularity: &dyn PopularitySource,
) -> Vec<DecoratedTool> {
    descriptors
        .iter()
        .map(|d| decorate(d, language, categories, popularity.sample()))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::popularity::{FixedPopularity, RandomPopularity};
    use serde_json::json;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const FIXED: Popularity = Popularity { rating: 4.2, review_count: 17, is_free: true };

    fn sample_catalog() -> serde_json::Value {
        json!([
            {
                "tool": "Consensus",
                "use": "research",
                "academic_use": "Bilimsel makalelerden kanıta dayalı yanıtlar",
                "academic_use_en": "Evidence-based answers from scientific papers",
                "how_to": "Soru yaz",
                "how_to_en": "Type a question",
                "keywords": ["makale", "research"],
                "link": "https://consensus.app",
                "short_video": "abc123"
            },
            {
                "tool": "Gamma.app",
                "use": "presentation",
                "academic_use": "Sunum hazırlama",
                "academic_use_en": "",
                "how_to": "Konu gir",
                "keywords": ["sunum"],
                "link": "https://gamma.app"
            },
            {
                "tool": "Mystery Tool",
                "use": "astrology",
                "academic_use": "Gizemli",
                "how_to": "Bilinmiyor",
                "keywords": [],
                "link": "https://example.com"
            }
        ])
    }

    fn write_catalog(value: &serde_json::Value) -> NamedTempFile {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(value.to_string().as_bytes()).unwrap();
        file
    }

    #[tokio::test]
    async fn test_load_preserves_order() {
        let file = write_catalog(&sample_catalog());
        let catalog = ToolCatalog::new(file.path(), false);

        let descriptors = catalog.descriptors().await.unwrap();
        let names: Vec<&str> = descriptors.iter().map(|d| d.name.as_str()).collect();
        assert_eq!(names, vec!["Consensus", "Gamma.app", "Mystery Tool"]);
    }

    #[tokio::test]
    async fn test_missing_file_is_io_error() {
        let dir = tempfile::tempdir().unwrap();
        let catalog = ToolCatalog::new(dir.path().join("nope.json"), true);
        assert!(matches!(catalog.descriptors().await, Err(CatalogError::Io { .. })));
    }

    #[tokio::test]
    async fn test_invalid_json_is_parse_error() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(b"[{\"tool\": ").unwrap();
        let catalog = ToolCatalog::new(file.path(), false);
        assert!(matches!(catalog.descriptors().await, Err(CatalogError::Parse { .. })));
    }

    #[test]
    fn test_duplicate_names_are_rejected() {
        let doc = json!([
            {"tool": "Elicit", "use": "research", "academic_use": "a", "how_to": "b", "link": "x"},
            {"tool": "Elicit", "use": "research", "academic_use": "c", "how_to": "d", "link": "y"}
        ]);
        let err = parse_descriptors(doc.to_string().as_bytes(), Path::new("tools.json")).unwrap_err();
        assert!(matches!(err, CatalogError::DuplicateTool(name) if name == "Elicit"));
    }

    #[test]
    fn test_colliding_slugs_are_rejected() {
        let doc = json!([
            {"tool": "Scite.ai", "use": "research", "academic_use": "a", "how_to": "b", "link": "x"},
            {"tool": "Scite-ai", "use": "research", "academic_use": "c", "how_to": "d", "link": "y"}
        ]);
        let err = parse_descriptors(doc.to_string().as_bytes(), Path::new("tools.json")).unwrap_err();
        match err {
            CatalogError::DuplicateSlug { slug, first, second } => {
                assert_eq!(slug, "scite-ai");
                assert_eq!(first, "Scite.ai");
                assert_eq!(second, "Scite-ai");
            }
            other => panic!("unexpected error: {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_cache_survives_file_removal() {
        let file = write_catalog(&sample_catalog());
        let path = file.path().to_path_buf();
        let catalog = ToolCatalog::new(&path, true);

        let first = catalog.descriptors().await.unwrap();
        drop(file);
        assert!(!path.exists());

        let second = catalog.descriptors().await.unwrap();
        assert!(Arc::ptr_eq(&first, &second));
    }

    #[tokio::test]
    async fn test_uncached_catalog_rereads() {
        let file = write_catalog(&sample_catalog());
        let path = file.path().to_path_buf();
        let catalog = ToolCatalog::new(&path, false);

        assert_eq!(catalog.descriptors().await.unwrap().len(), 3);
        drop(file);
        assert!(catalog.descriptors().await.is_err());
    }

    #[test]
    fn test_decorate_localizes_and_categorizes() {
        let descriptors: Vec<ToolDescriptor> = serde_json::from_value(sample_catalog()).unwrap();
        let table = CategoryTable::builtin();

        let en = decorate_all(&descriptors, Language::En, &table, &FixedPopularity(FIXED));
        assert_eq!(en[0].academic_use, "Evidence-based answers from scientific papers");
        assert_eq!(en[0].how_to, "Type a question");
        assert_eq!(en[0].category, "Research");
        assert_eq!(en[0].slug, "consensus");
        assert_eq!(en[0].short_video_id.as_deref(), Some("abc123"));
        // blank English text falls back to the default text
        assert_eq!(en[1].academic_use, "Sunum hazırlama");
        assert_eq!(en[1].how_to, "Konu gir");
        assert_eq!(en[2].category, "General");

        let tr = decorate_all(&descriptors, Language::Tr, &table, &FixedPopularity(FIXED));
        assert_eq!(tr[0].academic_use, "Bilimsel makalelerden kanıta dayalı yanıtlar");
        assert_eq!(tr[0].category, "Araştırma");
        assert_eq!(tr[1].category, "Sunum");
        assert_eq!(tr[2].category, "Genel");

        for tool in en.iter().chain(tr.iter()) {
            assert_eq!(tool.rating, 4.2);
            assert_eq!(tool.review_count, 17);
            assert!(tool.is_free);
        }
    }

    #[test]
    fn test_languages_differ_only_in_localized_fields() {
        let descriptors: Vec<ToolDescriptor> = serde_json::from_value(sample_catalog()).unwrap();
        let table = CategoryTable::builtin();

        let tr = decorate_all(&descriptors, Language::Tr, &table, &FixedPopularity(FIXED));
        let en = decorate_all(&descriptors, Language::En, &table, &FixedPopularity(FIXED));

        assert_eq!(tr.len(), en.len());
        for (a, b) in tr.iter().zip(en.iter()) {
            assert_eq!(a.name, b.name);
            assert_eq!(a.slug, b.slug);
            assert_eq!(a.link, b.link);
            assert_eq!(a.keywords, b.keywords);
        }
    }

    #[test]
    fn test_random_decoration_stays_in_bounds() {
        let descriptors: Vec<ToolDescriptor> = serde_json::from_value(sample_catalog()).unwrap();
        let table = CategoryTable::builtin();

        for _ in 0..200 {
            for tool in decorate_all(&descriptors, Language::Tr, &table, &RandomPopularity) {
                assert!((3.0..=5.0).contains(&tool.rating));
                assert!((5..=54).contains(&tool.review_count));
                assert!(!tool.category.is_empty());
            }
        }
    }

    #[test]
    fn test_filter() {
        let descriptors: Vec<ToolDescriptor> = serde_json::from_value(sample_catalog()).unwrap();
        let tools = decorate_all(&descriptors, Language::En, &CategoryTable::builtin(), &FixedPopularity(FIXED));

        let all = ToolFilter::default();
        assert!(all.is_empty());
        assert!(tools.iter().all(|t| all.matches(t)));

        let by_keyword = ToolFilter { search: Some("SUNUM".to_string()), category: None };
        let hits: Vec<&str> = tools.iter().filter(|t| by_keyword.matches(t)).map(|t| t.name.as_str()).collect();
        assert_eq!(hits, vec!["Gamma.app"]);

        let by_text = ToolFilter { search: Some("evidence".to_string()), category: None };
        assert_eq!(tools.iter().filter(|t| by_text.matches(t)).count(), 1);

        let by_category = ToolFilter { search: None, category: Some("General".to_string()) };
        let hits: Vec<&str> = tools.iter().filter(|t| by_category.matches(t)).map(|t| t.name.as_str()).collect();
        assert_eq!(hits, vec!["Mystery Tool"]);

        let both = ToolFilter { search: Some("consensus".to_string()), category: Some("General".to_string()) };
        assert_eq!(tools.iter().filter(|t| both.matches(t)).count(), 0);
    }
}
