use serde::{Deserialize, Serialize};
use url::Url;

pub const NOT_FOUND: &str = "not found";

/// Best guess for one person: a profile url, the role seen next to it and how
/// sure the model is about the match.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtractionResult {
    pub profile_url: String,
    pub role: String,
    pub confidence: u8,
}

impl ExtractionResult {
    pub fn new(profile_url: impl Into<String>, role: impl Into<String>, confidence: u8) -> Self {
        ExtractionResult {
            profile_url: profile_url.into(),
            role: role.into(),
            confidence,
        }
        .normalized()
    }

    pub fn not_found() -> Self {
        ExtractionResult {
            profile_url: NOT_FOUND.to_string(),
            role: String::new(),
            confidence: 0,
        }
    }

    pub fn is_not_found(&self) -> bool {
        self.profile_url == NOT_FOUND
    }

    /// Collapses anything that is not a usable http(s) url into the sentinel,
    /// and forces the sentinel to carry no role and zero confidence.
    ///
    /// Only the sentinel direction is enforced: a real url with confidence 0
    /// is kept as is.
    pub fn normalized(self) -> Self {
        let profile_url = self.profile_url.trim();

        if profile_url.is_empty()
            || profile_url.eq_ignore_ascii_case(NOT_FOUND)
            || !is_web_url(profile_url)
        {
            return ExtractionResult::not_found();
        }

        ExtractionResult {
            profile_url: profile_url.to_string(),
            role: self.role.trim().to_string(),
            confidence: self.confidence.min(100),
        }
    }
}

fn is_web_url(candidate: &str) -> bool {
    match Url::parse(candidate) {
        Ok(url) => matches!(url.scheme(), "http" | "https") && url.host_str().is_some(),
        Err(_) => false,
    }
}
