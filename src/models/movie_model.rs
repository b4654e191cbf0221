use serde::Serialize;

use super::city_model::ResourceLink;

#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Movie {
    pub key: String,
    pub title: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub original_title: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub rating: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub run_time: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub poster: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub trailer: Option<String>,
    pub formats: Vec<Format>,
    pub links: Vec<ResourceLink>,
}

/// A language/experience variant of a movie. Formats are positional, not
/// keyed; their order follows the upstream record order.
#[derive(Debug, Serialize, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Format {
    pub name: String,
    pub is_experience: bool,
    pub language: String,
    pub show_times: Vec<String>,
}
