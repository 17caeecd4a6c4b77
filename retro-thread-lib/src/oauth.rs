//! OAuth 1.0a user-context signing (HMAC-SHA1).
//!
//! Only query and form parameters take part in the signature. JSON and
//! multipart bodies are sent as-is.

use anyhow::{anyhow, Result};
use base64::Engine;
use hmac::{Hmac, Mac};
use rand::distributions::Alphanumeric;
use rand::Rng;
use sha1::Sha1;
use std::time::{SystemTime, UNIX_EPOCH};

type HmacSha1 = Hmac<Sha1>;

#[derive(Debug, Clone)]
pub struct OAuthCredentials {
    pub consumer_key: String,
    pub consumer_secret: String,
    pub access_token: String,
    pub access_token_secret: String,
}

/// RFC 3986 encoding: everything except `A-Z a-z 0-9 - . _ ~` is escaped.
pub fn percent_encode(s: &str) -> String {
    urlencoding::encode(s).into_owned()
}

pub fn signature_base_string(method: &str, url: &str, params: &[(String, String)]) -> String {
    let mut encoded: Vec<(String, String)> = params
        .iter()
        .map(|(k, v)| (percent_encode(k), percent_encode(v)))
        .collect();
    encoded.sort();

    let param_string = encoded
        .iter()
        .map(|(k, v)| format!("{}={}", k, v))
        .collect::<Vec<_>>()
        .join("&");

    format!(
        "{}&{}&{}",
        method.to_uppercase(),
        percent_encode(url),
        percent_encode(&param_string)
    )
}

pub fn sign(base_string: &str, consumer_secret: &str, token_secret: &str) -> Result<String> {
    let key = format!(
        "{}&{}",
        percent_encode(consumer_secret),
        percent_encode(token_secret)
    );
    let mut mac = HmacSha1::new_from_slice(key.as_bytes())
        .map_err(|_| anyhow!("Invalid OAuth signing key"))?;
    mac.update(base_string.as_bytes());
    Ok(base64::engine::general_purpose::STANDARD.encode(mac.finalize().into_bytes()))
}

fn generate_nonce() -> String {
    rand::thread_rng()
        .sample_iter(&Alphanumeric)
        .take(32)
        .map(char::from)
        .collect()
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}

impl OAuthCredentials {
    /// Build the `Authorization` header value for one request.
    ///
    /// `extra_params` are the request's query or form parameters.
    pub fn authorization_header(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(String, String)],
    ) -> Result<String> {
        self.authorization_header_with(
            method,
            url,
            extra_params,
            &generate_nonce(),
            unix_timestamp(),
        )
    }

    fn authorization_header_with(
        &self,
        method: &str,
        url: &str,
        extra_params: &[(String, String)],
        nonce: &str,
        timestamp: u64,
    ) -> Result<String> {
        let mut oauth_params = vec![
            ("oauth_consumer_key".to_string(), self.consumer_key.clone()),
            ("oauth_nonce".to_string(), nonce.to_string()),
            ("oauth_signature_method".to_string(), "HMAC-SHA1".to_string()),
            ("oauth_timestamp".to_string(), timestamp.to_string()),
            ("oauth_token".to_string(), self.access_token.clone()),
            ("oauth_version".to_string(), "1.0".to_string()),
        ];

        let mut all_params = oauth_params.clone();
        all_params.extend_from_slice(extra_params);

        let base_string = signature_base_string(method, url, &all_params);
        let signature = sign(&base_string, &self.consumer_secret, &self.access_token_secret)?;
        oauth_params.push(("oauth_signature".to_string(), signature));

        let fields = oauth_params
            .iter()
            .map(|(k, v)| format!("{}=\"{}\"", percent_encode(k), percent_encode(v)))
            .collect::<Vec<_>>()
            .join(", ");

        Ok(format!("OAuth {}", fields))
    }
}
