use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors thay may occur in this library.
#[derive(Debug, Clone, Error, Serialize, Deserialize, PartialEq, Eq)]
pub enum Error {
    /// The request could not be made, or the response body could not be read.
    /// For example the backend refused the connection.
    #[error("The request to `{url}` failed. Problem: {problem}")]
    Request {
        /// The url requested.
        url: String,

        /// What went wrong.
        problem: String,
    },

    /// Bad json.
    #[error("The response from `{url}` could not be deserialized. Problem: {problem}")]
    BadJson {
        /// The url which produced the response.
        url: String,

        /// The deserialization issue.
        problem: String,
    },

    /// The base url of the backend is not usable.
    #[error("The base url `{url}` is not usable. Problem: {problem}")]
    BadUrl {
        /// The offending url.
        url: String,

        /// Why it is not usable.
        problem: String,
    },

    /// The configuration was not valid.
    #[error("Bad configuration: `{0}`")]
    BadConfig(String),

    /// The panel has stopped, so it can no longer be asked to do anything.
    #[error("The panel is no longer running")]
    PanelGone,
}

impl Error {
    pub(crate) fn request(url: &reqwest::Url, error: reqwest::Error) -> Self {
        Self::Request {
            url: url.to_string(),
            problem: error.to_string(),
        }
    }

    pub(crate) fn bad_json(url: &reqwest::Url, error: serde_json::Error) -> Self {
        Self::BadJson {
            url: url.to_string(),
            problem: error.to_string(),
        }
    }

    /// Get the problem text if this is a [`Error::BadConfig`].
    pub fn try_into_bad_config(self) -> Option<String> {
        if let Self::BadConfig(problem) = self {
            Some(problem)
        } else {
            None
        }
    }
}
