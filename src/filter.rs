use serde::Serialize;

use crate::reddit::Listing;

pub const UNTITLED_POST: &str = "Untitled Post";

const IMAGE_EXTENSIONS: [&str; 4] = [".jpg", ".jpeg", ".png", ".gif"];

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImagePost {
    pub image_url: String,
    pub title: String,
}

/// Keeps the direct-image posts from one listing page, in listing
/// order. Pure: the same page always yields the same output.
///
/// A post qualifies when it is neither a video nor a gallery and its
/// url carries a direct image extension. Repeated urls keep only the
/// first occurrence; on a single page the accepted set stays small, so
/// the linear membership scan is fine.
pub fn filter_image_posts(listing: &Listing) -> Vec<ImagePost> {
    let mut accepted: Vec<ImagePost> = Vec::new();

    for post in &listing.posts {
        if post.is_video || post.is_gallery || !has_image_extension(&post.url) {
            continue;
        }
        if accepted.iter().any(|seen| seen.image_url == post.url) {
            continue;
        }
        let title = if post.title.trim().is_empty() {
            UNTITLED_POST.to_string()
        } else {
            post.title.clone()
        };
        accepted.push(ImagePost {
            image_url: post.url.clone(),
            title,
        });
    }

    accepted
}

fn has_image_extension(url: &str) -> bool {
    let lower = url.to_ascii_lowercase();
    IMAGE_EXTENSIONS.iter().any(|ext| lower.ends_with(ext))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::reddit::RawPost;

    fn post(title: &str, url: &str) -> RawPost {
        RawPost {
            title: title.into(),
            fullname: format!("t3_{}", title),
            url: url.into(),
            is_video: false,
            is_gallery: false,
        }
    }

    fn page(posts: Vec<RawPost>) -> Listing {
        Listing { after: None, posts }
    }

    #[test]
    fn keeps_direct_images_in_listing_order() {
        let listing = page(vec![
            post("first", "https://i.redd.it/a.png"),
            post("second", "https://i.redd.it/b.jpeg"),
        ]);
        let out = filter_image_posts(&listing);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "first");
        assert_eq!(out[1].image_url, "https://i.redd.it/b.jpeg");
    }

    #[test]
    fn extension_match_is_case_insensitive() {
        let listing = page(vec![post("caps", "https://i.redd.it/a.JPG")]);
        assert_eq!(filter_image_posts(&listing).len(), 1);
    }

    #[test]
    fn rejects_non_image_extensions() {
        let listing = page(vec![
            post("webp", "https://i.redd.it/a.webp"),
            post("page", "https://reddit.com/r/pics/comments/xyz"),
            post("empty", ""),
        ]);
        assert!(filter_image_posts(&listing).is_empty());
    }

    #[test]
    fn video_flag_wins_over_image_extension() {
        let mut video = post("clip", "https://i.redd.it/clip.png");
        video.is_video = true;
        let listing = page(vec![video]);
        assert!(filter_image_posts(&listing).is_empty());
    }

    #[test]
    fn gallery_posts_are_excluded() {
        let mut gallery = post("album", "https://i.redd.it/cover.jpg");
        gallery.is_gallery = true;
        let listing = page(vec![gallery]);
        assert!(filter_image_posts(&listing).is_empty());
    }

    #[test]
    fn duplicate_urls_keep_first_title() {
        let listing = page(vec![
            post("original", "https://i.redd.it/same.png"),
            post("repost", "https://i.redd.it/same.png"),
            post("other", "https://i.redd.it/other.gif"),
        ]);
        let out = filter_image_posts(&listing);
        assert_eq!(out.len(), 2);
        assert_eq!(out[0].title, "original");
        assert_eq!(out[1].title, "other");
    }

    #[test]
    fn blank_titles_get_a_fallback() {
        let listing = page(vec![post("", "https://i.redd.it/a.gif")]);
        assert_eq!(filter_image_posts(&listing)[0].title, UNTITLED_POST);
    }

    #[test]
    fn filtering_is_idempotent() {
        let listing = page(vec![
            post("a", "https://i.redd.it/a.png"),
            post("b", "https://i.redd.it/a.png"),
        ]);
        assert_eq!(filter_image_posts(&listing), filter_image_posts(&listing));
    }
}
