use url::Url;

use crate::filter::ImagePost;

/// Shown in place of a rejected url at the helper level; posts still
/// carrying it are dropped from the final output.
pub const PLACEHOLDER_IMAGE_URL: &str = "https://via.placeholder.com/300?text=unavailable";

/// Direct Reddit image hosts, allowed regardless of configuration.
pub const BUILTIN_ALLOWED_HOSTS: [&str; 2] = ["i.redd.it", "preview.redd.it"];

/// Replaces an image url with the placeholder unless its scheme is
/// http/https and its host is allowed.
pub fn sanitize_image_url(raw: &str, allowed_hosts: &[String]) -> String {
    if is_allowed(raw, allowed_hosts) {
        raw.to_string()
    } else {
        PLACEHOLDER_IMAGE_URL.to_string()
    }
}

/// Applies the allow-list to every post and removes those whose url
/// was rejected. Order of the survivors is unchanged.
pub fn sanitize_posts(posts: Vec<ImagePost>, allowed_hosts: &[String]) -> Vec<ImagePost> {
    posts
        .into_iter()
        .map(|mut post| {
            post.image_url = sanitize_image_url(&post.image_url, allowed_hosts);
            post
        })
        .filter(|post| post.image_url != PLACEHOLDER_IMAGE_URL)
        .collect()
}

fn is_allowed(raw: &str, allowed_hosts: &[String]) -> bool {
    let url = match Url::parse(raw) {
        Ok(url) => url,
        Err(_) => return false,
    };
    if !matches!(url.scheme(), "http" | "https") {
        return false;
    }
    let host = match url.host_str() {
        Some(host) => host,
        None => return false,
    };
    BUILTIN_ALLOWED_HOSTS
        .iter()
        .any(|builtin| host.eq_ignore_ascii_case(builtin))
        || allowed_hosts
            .iter()
            .any(|allowed| host.eq_ignore_ascii_case(allowed))
}
