use serde::Serialize;

/// Navigation link attached to every resource (`{rel, href}` pair).
#[derive(Debug, Serialize, Clone, PartialEq)]
pub struct ResourceLink {
    pub rel: &'static str,
    pub href: String,
}

impl ResourceLink {
    pub fn new(rel: &'static str, href: String) -> Self {
        Self { rel, href }
    }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct City {
    pub key: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_x: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub geo_y: Option<f64>,
    pub locations: Vec<Location>,
    pub links: Vec<ResourceLink>,
}

/// A cinema complex within a city; in schedule context one location
/// corresponds to one cinema.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Location {
    pub key: String,
    pub name: String,
    pub links: Vec<ResourceLink>,
}
