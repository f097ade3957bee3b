use serde::{Deserialize, Serialize};

/// One ranked hit from the search provider. Position is its only identity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SearchResult {
    pub title: String,
    pub url: String,
    #[serde(alias = "content")]
    pub snippet: String,
}
