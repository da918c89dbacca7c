use base64::Engine;
use base64::engine::general_purpose::STANDARD;

use crate::data::AuthScheme;

/// Header naming the API version the client speaks.
pub const API_VERSION_HEADER: &str = "X-Requested-API-Version";

/// Build the `Authorization` header value for the given credentials.
///
/// # Examples
///
/// ```
/// use bodylabs_transport::{AuthScheme, authorization_header};
///
/// assert_eq!(
///     authorization_header(AuthScheme::Basic, "access_key", "secret"),
///     "Basic YWNjZXNzX2tleTpzZWNyZXQ=",
/// );
/// ```
pub fn authorization_header(scheme: AuthScheme, access_key: &str, secret: &str) -> String {
    match scheme {
        AuthScheme::Basic => {
            let token = STANDARD.encode(format!("{access_key}:{secret}"));
            format!("Basic {token}")
        }
        AuthScheme::SecretPair => format!("SecretPair accessKey={access_key},secret={secret}"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_basic_auth() {
        assert_eq!(
            authorization_header(AuthScheme::Basic, "key", "s3cr3t"),
            "Basic a2V5OnMzY3IzdA=="
        );
    }

    #[test]
    fn test_secret_pair_auth() {
        assert_eq!(
            authorization_header(AuthScheme::SecretPair, "key", "s3cr3t"),
            "SecretPair accessKey=key,secret=s3cr3t"
        );
    }
}
