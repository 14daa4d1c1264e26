use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use reqwest::header::CONTENT_TYPE;
use tracing::debug;
use url::Url;

use crate::constants::{MAX_PAGE_SIZE_BYTES, MAX_REDIRECTS};
use crate::error::SurfError;
use crate::extractor;

/// Capability surface over the page being driven. This is the seam between
/// the walk logic and whatever actually loads pages, so the walk is
/// testable against a scripted host.
#[async_trait]
pub trait TabHost: Send {
    /// URL of the page the host currently shows.
    async fn active_url(&mut self) -> Result<String, SurfError>;

    /// Refetch the current page.
    async fn reload(&mut self) -> Result<(), SurfError>;

    /// Load `url`, pushing the current page onto history.
    async fn navigate(&mut self, url: &str) -> Result<(), SurfError>;

    /// Pop one history entry and load it. Keeps the current page when the
    /// history is empty.
    async fn go_back(&mut self) -> Result<(), SurfError>;

    /// Best-effort readiness of the last load.
    async fn page_ready(&mut self) -> Result<bool, SurfError>;

    /// Absolute hrefs present in the current document, in document order.
    async fn page_links(&mut self) -> Result<Vec<String>, SurfError>;
}

/// Whether a URL is on the open web, i.e. something the walk may fetch and
/// script. Internal schemes (`about:`, `chrome:`, `file:` ...) are not.
pub fn is_web_url(url: &str) -> bool {
    url.starts_with("http://") || url.starts_with("https://")
}

pub fn strict_redirect_policy() -> reqwest::redirect::Policy {
    reqwest::redirect::Policy::custom(|attempt| {
        if attempt.previous().len() > MAX_REDIRECTS {
            return attempt.error("Too many redirects");
        }
        if let Some(host) = attempt.url().host_str() {
            if host == "localhost" || host == "127.0.0.1" || host == "::1" {
                return attempt.error("Blocked redirect to local network (SSRF Protection)");
            }
        }
        attempt.follow()
    })
}

/// HTTP-backed page host: the stand-in for the browser tab the walk drives.
/// Navigation history lives here, like a tab's back stack.
pub struct HttpTab {
    client: Client,
    current: String,
    history: Vec<String>,
    html: Option<String>,
    loaded: bool,
}

impl HttpTab {
    pub fn new(seed: &str, user_agent: &str, timeout: Duration) -> Result<Self, SurfError> {
        Url::parse(seed).map_err(|e| SurfError::InvalidSeed(format!("{}: {}", seed, e)))?;

        let client = Client::builder()
            .user_agent(user_agent)
            .timeout(timeout)
            .redirect(strict_redirect_policy())
            .build()
            .map_err(|e| SurfError::PageLookup(e.to_string()))?;

        Ok(Self {
            client,
            current: seed.to_string(),
            history: Vec::new(),
            html: None,
            loaded: false,
        })
    }

    /// Fetch the current URL and cache the body. HTTP error statuses leave
    /// the page loaded-but-not-ready (an error page with no links), matching
    /// how a tab behaves; transport failures abort the cycle instead.
    async fn fetch_current(&mut self) -> Result<(), SurfError> {
        self.loaded = false;
        self.html = None;

        // A non-web URL can sit in the tab without being fetchable; the walk
        // notices and redirects to the fallback destination
        if !is_web_url(&self.current) {
            return Ok(());
        }

        let response = self
            .client
            .get(&self.current)
            .send()
            .await
            .map_err(|e| SurfError::Navigation(e.to_string()))?;

        if let Some(length) = response.content_length() {
            if length > MAX_PAGE_SIZE_BYTES {
                return Err(SurfError::Navigation(format!(
                    "page too large: {} bytes",
                    length
                )));
            }
        }

        let status = response.status();
        let is_html = response
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.contains("html"))
            .unwrap_or(true);

        let body = response
            .text()
            .await
            .map_err(|e| SurfError::Navigation(e.to_string()))?;

        self.loaded = status.is_success();
        // Non-HTML bodies count as pages with no links rather than failures
        self.html = Some(if self.loaded && is_html {
            body
        } else {
            String::new()
        });
        Ok(())
    }
}

#[async_trait]
impl TabHost for HttpTab {
    async fn active_url(&mut self) -> Result<String, SurfError> {
        Ok(self.current.clone())
    }

    async fn reload(&mut self) -> Result<(), SurfError> {
        debug!("reloading {}", self.current);
        self.fetch_current().await
    }

    async fn navigate(&mut self, url: &str) -> Result<(), SurfError> {
        debug!("navigating to {}", url);
        self.history.push(self.current.clone());
        self.current = url.to_string();
        self.fetch_current().await
    }

    async fn go_back(&mut self) -> Result<(), SurfError> {
        match self.history.pop() {
            Some(previous) => {
                debug!("going back to {}", previous);
                self.current = previous;
                self.fetch_current().await
            }
            None => {
                debug!("history empty, staying on {}", self.current);
                Ok(())
            }
        }
    }

    async fn page_ready(&mut self) -> Result<bool, SurfError> {
        Ok(self.loaded)
    }

    async fn page_links(&mut self) -> Result<Vec<String>, SurfError> {
        let html = self.html.as_deref().ok_or(SurfError::NoActivePage)?;
        Ok(extractor::collect_hrefs(html, &self.current))
    }
}
