use std::sync::Arc;
use std::time::Duration;

use anyhow::{bail, Context};
use reqwest::blocking::Client as HttpClient;
use reqwest::header::{AUTHORIZATION, USER_AGENT};
use serde::Deserialize;
use url::Url;

use crate::error::{Error, Result};
use crate::token::TokenProvider;

pub const DEFAULT_BASE_URL: &str = "https://oauth.reddit.com/";

pub const MIN_LIMIT: u32 = 1;
pub const MAX_LIMIT: u32 = 100;

#[derive(Debug, Clone, Default)]
pub struct ClientConfig {
    pub user_agent: String,
    pub base_url: Option<String>,
    pub http_client: Option<HttpClient>,
}

pub struct Client {
    token_provider: Arc<dyn TokenProvider>,
    http: HttpClient,
    user_agent: String,
    base_url: Url,
}

impl Client {
    pub fn new(token_provider: Arc<dyn TokenProvider>, config: ClientConfig) -> anyhow::Result<Self> {
        if config.user_agent.trim().is_empty() {
            bail!("reddit client user agent required");
        }
        let base = config
            .base_url
            .unwrap_or_else(|| DEFAULT_BASE_URL.to_string());
        let base_url = Url::parse(&base).context("reddit: parse base url")?;
        let http = match config.http_client {
            Some(client) => client,
            None => HttpClient::builder()
                .timeout(Duration::from_secs(20))
                .build()
                .context("reddit: build http client")?,
        };

        Ok(Client {
            token_provider,
            http,
            user_agent: config.user_agent,
            base_url,
        })
    }

    /// Fetches one page of the hot listing for a subreddit. No
    /// pagination follow-up; `after` is surfaced but unused here.
    pub fn hot_listing(&self, subreddit: &str, limit: u32) -> Result<Listing> {
        let token = self.token_provider.token()?;
        let limit = limit.clamp(MIN_LIMIT, MAX_LIMIT);

        let mut url = self
            .base_url
            .join(&format!("r/{}/hot", subreddit))
            .map_err(|_| Error::InvalidUrl(subreddit.to_string()))?;
        url.query_pairs_mut()
            .append_pair("limit", &limit.to_string());

        let resp = self
            .http
            .get(url)
            .header(USER_AGENT, self.user_agent.clone())
            .header(AUTHORIZATION, format!("Bearer {}", token.value))
            .send()?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().unwrap_or_default();
            return Err(match status.as_u16() {
                401 => Error::Unauthorized,
                403 => Error::Forbidden,
                404 => Error::NotFound {
                    subreddit: subreddit.to_string(),
                },
                429 => Error::RateLimited,
                code => Error::Api { status: code, body },
            });
        }

        let body = resp.text()?;
        parse_listing(&body)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Listing {
    pub after: Option<String>,
    pub posts: Vec<RawPost>,
}

#[derive(Debug, Clone, PartialEq, Deserialize)]
pub struct RawPost {
    #[serde(default)]
    pub title: String,
    #[serde(default, rename = "name")]
    pub fullname: String,
    #[serde(default)]
    pub url: String,
    #[serde(default)]
    pub is_video: bool,
    #[serde(default)]
    pub is_gallery: bool,
}

/// Decodes a listing payload, failing closed: anything that is not a
/// `Listing` envelope with a children array is rejected rather than
/// passed through as an empty result.
fn parse_listing(body: &str) -> Result<Listing> {
    let envelope: ListingEnvelope = serde_json::from_str(body)
        .map_err(|err| Error::MalformedResponse(format!("listing body: {}", err)))?;

    if envelope.kind != "Listing" {
        return Err(Error::MalformedResponse(format!(
            "expected Listing envelope, got {:?}",
            envelope.kind
        )));
    }
    let data = envelope
        .data
        .ok_or_else(|| Error::MalformedResponse("listing data missing".into()))?;
    let children = data
        .children
        .ok_or_else(|| Error::MalformedResponse("listing children missing".into()))?;

    let mut posts = Vec::with_capacity(children.len());
    for child in children {
        // Non-post things (t1 comments, t5 subreddits, ...) are skipped.
        if child.kind != "t3" {
            continue;
        }
        let post: RawPost = serde_json::from_value(child.data)
            .map_err(|err| Error::MalformedResponse(format!("post entry: {}", err)))?;
        posts.push(post);
    }

    Ok(Listing {
        after: data.after,
        posts,
    })
}

#[derive(Debug, Deserialize)]
struct ListingEnvelope {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    data: Option<ListingData>,
}

#[derive(Debug, Deserialize)]
struct ListingData {
    #[serde(default)]
    after: Option<String>,
    #[serde(default)]
    children: Option<Vec<Thing>>,
}

#[derive(Debug, Deserialize)]
struct Thing {
    #[serde(default)]
    kind: String,
    #[serde(default)]
    data: serde_json::Value,
}
