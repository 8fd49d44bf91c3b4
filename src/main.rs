use trendypix::error::Error;
use trendypix::{config, Scraper};

fn main() {
    let args: Vec<String> = std::env::args().skip(1).collect();
    if handle_cli_flags(&args) {
        return;
    }

    if let Err(err) = run(&args) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn handle_cli_flags(args: &[String]) -> bool {
    let mut saw_flag = false;
    for arg in args {
        match arg.as_str() {
            "--version" | "-V" => {
                println!("trendypix {}", trendypix::VERSION);
                saw_flag = true;
            }
            "--help" | "-h" => {
                println!(
                    "trendypix — Fetch trending image posts from a subreddit.\n\nUsage: trendypix <subreddit-url> [--limit N]\n\n  --limit N            Number of hot posts to fetch (1-100)\n  --version, -V        Show version and exit\n  --help,    -h        Show this help message"
                );
                saw_flag = true;
            }
            _ => {}
        }
    }
    saw_flag
}

fn run(args: &[String]) -> anyhow::Result<()> {
    let cfg = config::load(config::LoadOptions::default())?;

    let mut subreddit_url: Option<&str> = None;
    let mut limit = cfg.images.limit;
    let mut iter = args.iter();
    while let Some(arg) = iter.next() {
        match arg.as_str() {
            "--limit" => {
                let value = iter
                    .next()
                    .ok_or_else(|| anyhow::anyhow!("--limit requires a value"))?;
                limit = value
                    .parse()
                    .map_err(|_| anyhow::anyhow!("--limit must be a number, got {value:?}"))?;
            }
            other if !other.starts_with('-') => subreddit_url = Some(other),
            other => anyhow::bail!("unknown flag {other:?}"),
        }
    }

    let subreddit_url =
        subreddit_url.ok_or_else(|| anyhow::anyhow!("usage: trendypix <subreddit-url> [--limit N]"))?;

    let scraper = Scraper::new(&cfg)?;
    let posts = match scraper.scrape_trendy_images(subreddit_url, limit) {
        Ok(posts) => posts,
        Err(Error::CredentialsMissing) => {
            anyhow::bail!(
                "Reddit credentials are not configured. Set TRENDYPIX_REDDIT__CLIENT_ID and TRENDYPIX_REDDIT__CLIENT_SECRET, or add them to {}.",
                config::default_path()
                    .map(|p| p.display().to_string())
                    .unwrap_or_else(|| "the config file".into())
            );
        }
        Err(err @ Error::Unauthorized) | Err(err @ Error::AuthFailed { .. }) => {
            anyhow::bail!("Reddit rejected the configured credentials: {err}");
        }
        Err(err) => return Err(err.into()),
    };

    if posts.is_empty() {
        println!("no image posts found");
        return Ok(());
    }
    for post in posts {
        println!("{}\t{}", post.title, post.image_url);
    }
    Ok(())
}
