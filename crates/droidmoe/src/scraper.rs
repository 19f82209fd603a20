use crate::parser::{self, ParseError};
use crate::types::{Score, ScoreRequest, UserProfile, UserRequest};

use reqwest::Client;
use std::time::Duration;

#[derive(Debug, thiserror::Error)]
pub enum ScraperError {
    #[error("HTTP request failed: {0}")]
    HttpError(#[from] reqwest::Error),
    #[error("Parse error: {0}")]
    ParseError(#[from] ParseError),
}

#[derive(Debug, Clone)]
pub struct WebScraper {
    client: Client,
    base_url: String,
}

impl WebScraper {
    pub fn new() -> Result<Self, ScraperError> {
        Self::with_base_url(crate::BASE_URL)
    }

    /// Points the scraper at a different host. Meant for tests against a
    /// local stub serving recorded pages.
    pub fn with_base_url(base_url: impl Into<String>) -> Result<Self, ScraperError> {
        let client = Client::builder()
            .timeout(Duration::from_secs(30))
            .user_agent(format!(
                "{}/{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ))
            .build()?;

        Ok(Self {
            client,
            base_url: base_url.into(),
        })
    }

    /// Downloads the profile page for `uid` and reduces it to the usable
    /// payload. `None` means the account does not exist.
    pub async fn fetch_profile_page(&self, uid: u32) -> Result<Option<String>, ScraperError> {
        let url = format!("{}/profile.php?uid={}", self.base_url, uid);
        log::info!("Fetching profile page for uid {}...", uid);
        let body = self
            .client
            .get(&url)
            .send()
            .await?
            .error_for_status()?
            .text()
            .await?;
        Ok(parser::payload(&body)?)
    }

    pub async fn fetch_user(
        &self,
        request: &UserRequest,
    ) -> Result<Option<UserProfile>, ScraperError> {
        let Some(page) = self.resolve_page(request.uid, request.page.as_deref()).await? else {
            return Ok(None);
        };
        let user = parser::extract_user(parser::user_region(&page), request.uid)?;
        Ok(Some(user))
    }

    /// `None` when the account does not exist; an empty vec when it exists
    /// but has no plays of the requested kind. The embedded user record is
    /// extracted once from the same payload, never refetched.
    pub async fn fetch_scores(
        &self,
        request: &ScoreRequest,
    ) -> Result<Option<Vec<Score>>, ScraperError> {
        let Some(page) = self.resolve_page(request.uid, request.page.as_deref()).await? else {
            return Ok(None);
        };
        let user = parser::extract_user(parser::user_region(&page), request.uid)?;
        let scores = match parser::score_region(&page, request.kind) {
            Some(region) => parser::extract_scores(region, &user, request.limit)?,
            None => {
                log::warn!("No play history rendered for uid {}", request.uid);
                Vec::new()
            }
        };
        Ok(Some(scores))
    }

    async fn resolve_page(
        &self,
        uid: u32,
        page: Option<&str>,
    ) -> Result<Option<String>, ScraperError> {
        match page {
            Some(page) if page.contains(parser::NOT_FOUND_MARKER) => Ok(None),
            Some(page) => {
                log::debug!("Reusing caller-supplied page for uid {}", uid);
                Ok(Some(page.to_string()))
            }
            None => self.fetch_profile_page(uid).await,
        }
    }
}
