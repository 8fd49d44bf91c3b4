use url::Url;

/// Pulls the subreddit name out of a URL shaped like
/// `https://<host>/r/<name>/...`. Malformed input yields `None`; the
/// caller decides whether that is an error.
pub fn extract_subreddit_name(input: &str) -> Option<String> {
    let url = Url::parse(input).ok()?;
    let mut segments = url.path_segments()?.filter(|segment| !segment.is_empty());

    let marker = segments.next()?;
    if !marker.eq_ignore_ascii_case("r") {
        return None;
    }

    let name = segments.next()?;
    if name.is_empty() || !name.bytes().all(|b| b.is_ascii_alphanumeric() || b == b'_') {
        return None;
    }
    Some(name.to_string())
}
