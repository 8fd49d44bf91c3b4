use std::sync::Arc;

use crate::config::Config;
use crate::error::{Error, Result};
use crate::filter::{filter_image_posts, ImagePost};
use crate::reddit::{Client, ClientConfig};
use crate::sanitize::sanitize_posts;
use crate::subreddit::extract_subreddit_name;
use crate::token::{AppOnlyTokenProvider, Credentials, ProviderConfig};

pub const DEFAULT_LIMIT: u32 = 25;

/// The whole pipeline behind one call: subreddit url in, sanitized
/// image posts out. One token acquisition at most (cache miss only)
/// and exactly one listing request per call.
pub struct Scraper {
    client: Client,
    allowed_hosts: Vec<String>,
}

impl Scraper {
    pub fn new(config: &Config) -> anyhow::Result<Self> {
        let provider = AppOnlyTokenProvider::new(ProviderConfig {
            credentials: Credentials {
                client_id: config.reddit.client_id.clone(),
                client_secret: config.reddit.client_secret.clone(),
            },
            user_agent: config.reddit.user_agent.clone(),
            ..ProviderConfig::default()
        })?;
        let client = Client::new(
            Arc::new(provider),
            ClientConfig {
                user_agent: config.reddit.user_agent.clone(),
                ..ClientConfig::default()
            },
        )?;
        Ok(Self::with_parts(client, config.images.allowed_hosts.clone()))
    }

    /// Assembles a scraper from an already-built client, e.g. one
    /// pointed at a non-default base url.
    pub fn with_parts(client: Client, allowed_hosts: Vec<String>) -> Self {
        Self {
            client,
            allowed_hosts,
        }
    }

    pub fn scrape_trendy_images(
        &self,
        subreddit_url: &str,
        limit: u32,
    ) -> Result<Vec<ImagePost>> {
        // Resolved before any network traffic.
        let name = extract_subreddit_name(subreddit_url)
            .ok_or_else(|| Error::InvalidUrl(subreddit_url.to_string()))?;

        let listing = self.client.hot_listing(&name, limit)?;
        let candidates = filter_image_posts(&listing);
        Ok(sanitize_posts(candidates, &self.allowed_hosts))
    }
}
