use serde::{Deserialize, Serialize};

/// One record of the static tool catalog, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescriptor {
    #[serde(rename = "tool")]
    pub name: String,
    #[serde(rename = "use")]
    pub use_case: String,
    pub academic_use: String,
    #[serde(default)]
    pub academic_use_en: Option<String>,
    pub how_to: String,
    #[serde(default)]
    pub how_to_en: Option<String>,
    #[serde(default)]
    pub keywords: Vec<String>,
    pub link: String,
    #[serde(default)]
    pub video_link: Option<String>,
    #[serde(default, rename = "short_video")]
    pub short_video_id: Option<String>,
    #[serde(default, rename = "long_video")]
    pub long_video_id: Option<String>,
}

impl ToolDescriptor {
    /// URL key used by the detail page: lowercase, every character outside
    /// `[a-z0-9]` replaced by `-`.
    pub fn slug(&self) -> String {
        self.name
            .to_lowercase()
            .chars()
            .map(|c| if c.is_ascii_lowercase() || c.is_ascii_digit() { c } else { '-' })
            .collect()
    }
}

/// A descriptor resolved for one language and decorated with synthetic
/// popularity figures. Built fresh for every response.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DecoratedTool {
    #[serde(rename = "tool")]
    pub name: String,
    pub slug: String,
    #[serde(rename = "use")]
    pub use_case: String,
    pub academic_use: String,
    pub how_to: String,
    pub keywords: Vec<String>,
    pub link: String,
    pub video_link: Option<String>,
    #[serde(rename = "short_video")]
    pub short_video_id: Option<String>,
    #[serde(rename = "long_video")]
    pub long_video_id: Option<String>,
    pub rating: f64,
    #[serde(rename = "reviewCount")]
    pub review_count: u32,
    #[serde(rename = "isFree")]
    pub is_free: bool,
    pub category: String,
}
