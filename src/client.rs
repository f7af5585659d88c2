use reqwest::{StatusCode, Url};
use serde::de::DeserializeOwned;
use tracing::debug;

use crate::{content::ContentItem, error::Error, user::User};

/// What a successful round trip to the backend produced.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Fetch<T> {
    /// The backend replied with a success status and these items, in the order given.
    Items(Vec<T>),

    /// The backend replied with a non-success status.
    /// Nothing should be updated for this round.
    Ignored(StatusCode),
}

/// A client for the two endpoints of the backend.
///
/// Cloning is cheap, clones share the underlying connection pool.
#[derive(Debug, Clone)]
pub struct ApiClient {
    http: reqwest::Client,
    base: Url,
}

impl ApiClient {
    /// Create a client for the backend found at the given base url,
    /// for example `http://localhost:5000`.
    ///
    /// The base may carry a path prefix, in which case the endpoints are resolved below it.
    pub fn new(base_url: &str) -> Result<Self, Error> {
        let bad_url = |problem: String| Error::BadUrl {
            url: base_url.into(),
            problem,
        };

        let base = Url::parse(base_url).map_err(|e| bad_url(e.to_string()))?;

        if base.cannot_be_a_base() {
            return Err(bad_url("it cannot have a path".into()));
        }

        if !matches!(base.scheme(), "http" | "https") {
            return Err(bad_url(format!("the scheme `{}` is not http(s)", base.scheme())));
        }

        Ok(Self {
            http: reqwest::Client::new(),
            base,
        })
    }

    fn endpoint(&self, segments: &[&str]) -> Url {
        let mut url = self.base.clone();
        url.path_segments_mut()
            .expect("Base url is checked to have a path on construction")
            .pop_if_empty()
            .extend(segments);
        url
    }

    /// The url the list of users is fetched from.
    pub fn users_url(&self) -> Url {
        self.endpoint(&["api", "users"])
    }

    /// The url the content of the given user is fetched from.
    /// The user's name is percent-encoded as a single path segment.
    pub fn content_url(&self, user: &str) -> Url {
        self.endpoint(&["api", "content", user])
    }

    /// Fetch the list of users.
    pub async fn users(&self) -> Result<Fetch<User>, Error> {
        self.get_list(self.users_url()).await
    }

    /// Fetch the content belonging to the given user.
    pub async fn content(&self, user: &str) -> Result<Fetch<ContentItem>, Error> {
        self.get_list(self.content_url(user)).await
    }

    async fn get_list<T: DeserializeOwned>(&self, url: Url) -> Result<Fetch<T>, Error> {
        debug!(%url, "GET");

        let response = self
            .http
            .get(url.clone())
            .send()
            .await
            .map_err(|e| Error::request(&url, e))?;

        let status = response.status();
        if !status.is_success() {
            debug!(%url, %status, "Non-success status");
            return Ok(Fetch::Ignored(status));
        }

        let body = response
            .bytes()
            .await
            .map_err(|e| Error::request(&url, e))?;

        let items: Vec<T> = serde_json::from_slice(&body).map_err(|e| Error::bad_json(&url, e))?;
        debug!(%url, items = items.len(), "Fetched");

        Ok(Fetch::Items(items))
    }
}
