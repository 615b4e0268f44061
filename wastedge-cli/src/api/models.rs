//! Connection models

use std::fmt;

use super::error::{ApiError, Result};

/// Credentials for one Wastedge installation.
///
/// Immutable once constructed; the client owns its copy for its whole lifetime.
#[derive(Clone, PartialEq, Eq)]
pub struct Credentials {
    url: String,
    company: String,
    user_name: String,
    password: String,
}

impl Credentials {
    /// Create credentials, rejecting an empty or unparseable URL and an empty
    /// company or user name
    pub fn new(
        url: impl Into<String>,
        company: impl Into<String>,
        user_name: impl Into<String>,
        password: impl Into<String>,
    ) -> Result<Self> {
        let credentials = Self {
            url: url.into(),
            company: company.into(),
            user_name: user_name.into(),
            password: password.into(),
        };

        if credentials.url.trim().is_empty() {
            return Err(ApiError::invalid_argument("url must not be empty"));
        }
        if let Err(err) = reqwest::Url::parse(&credentials.url) {
            return Err(ApiError::invalid_argument(format!(
                "url '{}' is not valid: {}",
                credentials.url, err
            )));
        }
        if credentials.company.trim().is_empty() {
            return Err(ApiError::invalid_argument("company must not be empty"));
        }
        if credentials.user_name.trim().is_empty() {
            return Err(ApiError::invalid_argument("user name must not be empty"));
        }

        Ok(credentials)
    }

    pub fn url(&self) -> &str {
        &self.url
    }

    pub fn company(&self) -> &str {
        &self.company
    }

    pub fn user_name(&self) -> &str {
        &self.user_name
    }

    pub fn password(&self) -> &str {
        &self.password
    }
}

impl fmt::Debug for Credentials {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Credentials")
            .field("url", &self.url)
            .field("company", &self.company)
            .field("user_name", &self.user_name)
            .field("password", &"********")
            .finish()
    }
}
