use thiserror::Error;

/// Failure kinds for the scrape pipeline. Callers branch on the
/// variant, never on message text.
#[derive(Debug, Error)]
pub enum Error {
    #[error("reddit: client id and secret are not configured")]
    CredentialsMissing,

    #[error("reddit: authentication failed: {message}")]
    AuthFailed { message: String },

    #[error("not a subreddit url: {0}")]
    InvalidUrl(String),

    #[error("reddit: subreddit r/{subreddit} not found")]
    NotFound { subreddit: String },

    #[error("reddit: access forbidden")]
    Forbidden,

    #[error("reddit: rate limited")]
    RateLimited,

    #[error("reddit: unauthorized")]
    Unauthorized,

    #[error("reddit: api error {status}: {body}")]
    Api { status: u16, body: String },

    #[error("reddit: invalid data structure: {0}")]
    MalformedResponse(String),

    #[error("reddit: could not connect: {0}")]
    Network(#[from] reqwest::Error),
}

pub type Result<T> = std::result::Result<T, Error>;
