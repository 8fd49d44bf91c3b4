use std::time::{Duration, SystemTime};

use anyhow::{bail, Context};
use parking_lot::Mutex;
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{CONTENT_TYPE, USER_AGENT};
use reqwest::StatusCode;
use serde::Deserialize;

use crate::error::{Error, Result};

pub const DEFAULT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Tokens are considered expired five minutes early so a cached token
/// is never handed out right before Reddit invalidates it.
const EXPIRY_BUFFER: Duration = Duration::from_secs(300);

pub trait TokenProvider: Send + Sync {
    fn token(&self) -> Result<AccessToken>;
}

#[derive(Debug, Clone)]
pub struct AccessToken {
    pub value: String,
    pub expires_at: SystemTime,
}

impl AccessToken {
    pub fn is_fresh(&self, now: SystemTime) -> bool {
        now < self.expires_at
    }
}

#[derive(Debug, Clone, Default)]
pub struct Credentials {
    pub client_id: String,
    pub client_secret: String,
}

impl Credentials {
    fn is_configured(&self) -> bool {
        !self.client_id.trim().is_empty() && !self.client_secret.trim().is_empty()
    }
}

#[derive(Debug, Clone, Default)]
pub struct ProviderConfig {
    pub credentials: Credentials,
    pub user_agent: String,
    pub token_url: Option<String>,
    pub http_client: Option<HttpClient>,
}

/// Application-only (client-credentials) token source with a
/// process-wide cache. The lock is held only to read or swap the
/// cached token, never across a network call, so concurrent callers
/// may refresh twice; the last writer wins and the extra exchange is
/// harmless.
pub struct AppOnlyTokenProvider {
    credentials: Credentials,
    user_agent: String,
    token_url: String,
    http: HttpClient,
    cache: Mutex<Option<AccessToken>>,
}

impl AppOnlyTokenProvider {
    pub fn new(config: ProviderConfig) -> anyhow::Result<Self> {
        if config.user_agent.trim().is_empty() {
            bail!("token: user agent is required");
        }
        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .context("token: build http client")?,
        };

        Ok(Self {
            credentials: config.credentials,
            user_agent: config.user_agent,
            token_url: config
                .token_url
                .unwrap_or_else(|| DEFAULT_TOKEN_URL.to_string()),
            http,
            cache: Mutex::new(None),
        })
    }

    fn exchange(&self, now: SystemTime) -> Result<AccessToken> {
        let form = [("grant_type", "client_credentials")];
        let resp = self
            .http
            .post(&self.token_url)
            .basic_auth(
                &self.credentials.client_id,
                Some(&self.credentials.client_secret),
            )
            .header(USER_AGENT, self.user_agent.clone())
            .header(CONTENT_TYPE, "application/x-www-form-urlencoded")
            .form(&form)
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let message = if status == StatusCode::UNAUTHORIZED {
                "unauthorized client credentials".to_string()
            } else {
                format!("token endpoint returned {}", status)
            };
            return Err(Error::AuthFailed { message });
        }

        let payload: TokenResponse = resp
            .json()
            .map_err(|err| Error::MalformedResponse(format!("token response: {}", err)))?;
        if payload.access_token.is_empty() {
            return Err(Error::AuthFailed {
                message: "token response missing access token".into(),
            });
        }
        if !payload.token_type.eq_ignore_ascii_case("bearer") {
            return Err(Error::AuthFailed {
                message: format!("unexpected token type {:?}", payload.token_type),
            });
        }

        Ok(AccessToken {
            value: payload.access_token,
            expires_at: expiry_instant(now, payload.expires_in),
        })
    }
}

impl TokenProvider for AppOnlyTokenProvider {
    fn token(&self) -> Result<AccessToken> {
        if !self.credentials.is_configured() {
            return Err(Error::CredentialsMissing);
        }

        let now = SystemTime::now();
        if let Some(cached) = self.cache.lock().as_ref() {
            if cached.is_fresh(now) {
                return Ok(cached.clone());
            }
        }

        match self.exchange(now) {
            Ok(token) => {
                *self.cache.lock() = Some(token.clone());
                Ok(token)
            }
            Err(err) => {
                // A failed refresh must not leave a stale token behind.
                *self.cache.lock() = None;
                Err(err)
            }
        }
    }
}

fn expiry_instant(now: SystemTime, expires_in: u64) -> SystemTime {
    now + Duration::from_secs(expires_in.saturating_sub(EXPIRY_BUFFER.as_secs()))
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    #[serde(default)]
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: u64,
    #[serde(default)]
    #[allow(dead_code)]
    scope: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credentials_fail_before_any_request() {
        let provider = AppOnlyTokenProvider::new(ProviderConfig {
            user_agent: "trendypix-test/0.1".into(),
            // An unroutable token URL: reaching it would hang the test.
            token_url: Some("http://192.0.2.1/api/v1/access_token".into()),
            ..ProviderConfig::default()
        })
        .unwrap();

        match provider.token() {
            Err(Error::CredentialsMissing) => {}
            other => panic!("expected CredentialsMissing, got {:?}", other.map(|t| t.value)),
        }
    }

    #[test]
    fn empty_user_agent_rejected() {
        assert!(AppOnlyTokenProvider::new(ProviderConfig::default()).is_err());
    }

    #[test]
    fn expiry_keeps_five_minute_buffer() {
        let now = SystemTime::UNIX_EPOCH + Duration::from_secs(1_000_000);
        let expires_at = expiry_instant(now, 3600);
        assert_eq!(expires_at, now + Duration::from_secs(3300));
    }

    #[test]
    fn short_lifetimes_saturate_to_zero() {
        let now = SystemTime::now();
        let token = AccessToken {
            value: "tok".into(),
            expires_at: expiry_instant(now, 120),
        };
        assert!(!token.is_fresh(now));
    }

    #[test]
    fn freshness_is_strict() {
        let now = SystemTime::now();
        let token = AccessToken {
            value: "tok".into(),
            expires_at: now + Duration::from_secs(1),
        };
        assert!(token.is_fresh(now));
        assert!(!token.is_fresh(now + Duration::from_secs(1)));
    }
}
