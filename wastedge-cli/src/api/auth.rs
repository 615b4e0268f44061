//! HTTP Basic authentication for the Wastedge API

use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use super::models::Credentials;

/// Credential string sent to the server: `company\user:password`
pub fn credential_string(credentials: &Credentials) -> String {
    format!(
        "{}\\{}:{}",
        credentials.company(),
        credentials.user_name(),
        credentials.password()
    )
}

/// Value of the `Authorization` header
pub fn basic_authorization(credentials: &Credentials) -> String {
    format!("Basic {}", STANDARD.encode(credential_string(credentials)))
}
