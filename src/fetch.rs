// src/fetch.rs
// Page fetch. The controller only sees raw page text or a FetchError.

use reqwest::blocking::Client;
use reqwest::header::COOKIE;
use tracing::debug;

use crate::config::{Config, EventIds, SessionCredential};
use crate::core::net;
use crate::error::FetchError;

pub trait PageFetcher {
    fn fetch(&self, ids: &EventIds, credential: Option<&SessionCredential>) -> Result<String, FetchError>;
}

impl<T: PageFetcher + ?Sized> PageFetcher for &T {
    fn fetch(&self, ids: &EventIds, credential: Option<&SessionCredential>) -> Result<String, FetchError> {
        (**self).fetch(ids, credential)
    }
}

/// GET of the listing page, authenticated by sending the session credential
/// as the `Cookie` header.
pub struct HttpFetcher {
    client: Client,
    url_tmpl: String,
}

impl HttpFetcher {
    pub fn new(config: &Config) -> Result<Self, FetchError> {
        let client = net::client().map_err(|source| FetchError::Request { url: config.page_url(), source })?;
        Ok(Self { client, url_tmpl: config.page_url.clone() })
    }
}

impl PageFetcher for HttpFetcher {
    fn fetch(&self, ids: &EventIds, credential: Option<&SessionCredential>) -> Result<String, FetchError> {
        let credential = credential.ok_or(FetchError::MissingCredential)?;
        let url = ids.fill(&self.url_tmpl);
        debug!("GET {}", url);

        let resp = self
            .client
            .get(&url)
            .header(COOKIE, credential.expose())
            .send()
            .map_err(|source| FetchError::Request { url: url.clone(), source })?;

        let status = resp.status();
        if !status.is_success() {
            return Err(FetchError::Status { url, status: status.as_u16() });
        }

        let body = resp.text().map_err(|source| FetchError::Request { url: url.clone(), source })?;
        debug!("Fetched {} bytes from {}", body.len(), url);
        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_credential_fails_before_any_request() {
        let config = Config::default();
        let fetcher = HttpFetcher::new(&config).unwrap();
        let err = fetcher.fetch(&config.ids, None).unwrap_err();
        assert!(matches!(err, FetchError::MissingCredential));
    }
}
