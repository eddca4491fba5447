use std::time::Duration;

use once_cell::sync::Lazy;
use tracing::{debug, info};
use url::Url;

use crate::error::*;
use crate::pipeline::Fetcher;

static USER_AGENT: Lazy<String> = Lazy::new(|| {
    let os = os_info::get();

    format!(
        "Mozilla/5.0 ({} {}; {}) Threadwatch/{}",
        os.os_type(),
        os.version(),
        os.bitness(),
        env!("CARGO_PKG_VERSION")
    )
});

/// HTTP session against the forum site.
///
/// Cookies are kept between requests, so fetches made after [`HttpSession::login`]
/// carry the logged-in identity.
pub struct HttpSession {
    client: reqwest::blocking::Client,
    base_url: Url,
}

impl HttpSession {
    pub fn new(base_url: Url, timeout: Duration) -> Result<Self, WatchError> {
        let client = reqwest::blocking::Client::builder()
            .user_agent(USER_AGENT.as_str())
            .cookie_store(true)
            .timeout(timeout)
            .build()
            .map_err(|err| WatchError::Other(format!("Error building HTTP client: {err}").into()))?;

        Ok(Self { client, base_url })
    }

    /// Log in with the site's email/password form.
    pub fn login(&self, username: &str, password: &str) -> Result<(), WatchError> {
        let url = self
            .base_url
            .join("/login")
            .map_err(|err| WatchError::Other(format!("Invalid login URL: {err}").into()))?;

        info!("Logging in to {} as {}", url, username);

        let response = self
            .client
            .post(url)
            .form(&[("email", username), ("password", password)])
            .send()
            .map_err(|err| WatchError::Login(err.to_string().into()))?;

        let status = response.status();

        if !status.is_success() {
            return Err(WatchError::Login(format!("server responded with {status}").into()));
        }

        debug!("Login succeeded.");

        Ok(())
    }
}

impl Fetcher for HttpSession {
    fn fetch(&self, url: &str) -> Result<String, FetchError> {
        debug!("GET {}", url);

        let response = self
            .client
            .get(url)
            .send()
            .map_err(|err| FetchError::Network(err.to_string().into()))?;

        let status = response.status();

        if !status.is_success() {
            info!("Fetch failed: '{}' (status code: {})", url, status.as_u16());

            return Err(FetchError::Http {
                code: status.as_u16(),
                description: status.canonical_reason().unwrap_or("Unknown").into(),
            });
        }

        response.text().map_err(|err| FetchError::Network(err.to_string().into()))
    }
}
