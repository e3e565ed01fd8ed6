//! One collection pass over the feed roster.
//!
//! Each pass takes the least-recently-fetched feed, stamps it fetched
//! before touching the network so a broken feed costs one slot rather
//! than wedging the rotation, then inserts whatever items it has not
//! seen before.

use {
    crate::{
        fetch::{FetchFeed, FetchFeedError},
        models::{Feed, NewPost, Post},
        CreatePostError, Database, MarkFeedFetchedError,
    },
    chrono::{DateTime, NaiveDateTime, Utc},
    thiserror::Error,
    uuid::Uuid,
};

#[derive(Debug, Error)]
pub enum ScrapeError {
    #[error("no feeds in the database")]
    NoFeeds,
    #[error("fetching {url}")]
    Fetch {
        url: String,
        #[source]
        source: FetchFeedError,
    },
    #[error("parsing publish date {value:?}")]
    PubDate {
        value: String,
        #[source]
        source: chrono::ParseError,
    },
    #[error(transparent)]
    MarkFetched(#[from] MarkFeedFetchedError),
    #[error(transparent)]
    Database(#[from] diesel::result::Error),
}

#[derive(Debug)]
pub struct ScrapeOutcome {
    /// The feed row as it was selected, before being stamped.
    pub feed:          Feed,
    pub channel_title: String,
    pub new_posts:     Vec<Post>,
    pub skipped:       usize,
}

pub async fn scrape_once<F: FetchFeed>(db: &mut Database, fetcher: &F)
    -> Result<ScrapeOutcome, ScrapeError>
{
    let feed = db.next_feed_to_fetch()?.ok_or(ScrapeError::NoFeeds)?;

    // Stamped before the fetch, and deliberately not rolled back on
    // failure: a feed that errors out has used up its turn.
    db.mark_feed_fetched(&feed.id, Utc::now())?;

    let fetched = fetcher
        .fetch(&feed.url)
        .await
        .map_err(|source| ScrapeError::Fetch { url: feed.url.clone(), source })?;

    let now = Utc::now().naive_utc();
    let mut new_posts = Vec::new();
    let mut skipped = 0;

    for item in &fetched.items {
        let published_at = parse_pub_date(item.pub_date.as_deref())?;

        let id = Uuid::new_v4().to_string();
        let post = NewPost {
            id:           &id,
            created_at:   now,
            updated_at:   now,
            title:        &item.title,
            url:          &item.link,
            description:  item.description.as_deref(),
            published_at,
            feed_id:      &feed.id,
        };

        match db.create_post(&post) {
            Ok(post) => new_posts.push(post),
            Err(CreatePostError::AlreadyExists) => skipped += 1,
            Err(CreatePostError::Database(e)) => return Err(e.into()),
        }
    }

    Ok(ScrapeOutcome { channel_title: fetched.title, feed, new_posts, skipped })
}

/// Feeds publish RFC 1123 dates ("Mon, 02 Jan 2006 15:04:05 MST"); the
/// RFC 2822 parser accepts those, including the obsolete zone names. A
/// missing date is parsed as the empty string and fails the same way a
/// malformed one does.
fn parse_pub_date(value: Option<&str>) -> Result<NaiveDateTime, ScrapeError> {
    let value = value.unwrap_or_default();
    DateTime::parse_from_rfc2822(value)
        .map(|date| date.naive_utc())
        .map_err(|source| ScrapeError::PubDate { value: value.to_owned(), source })
}

#[derive(Debug, Error)]
#[error("invalid duration {0:?} (examples: 30s, 5m, 1h30m)")]
pub struct ParseDurationError(String);

/// Parses interval strings like "500ms", "1m", "1.5h", or "2h45m" into a
/// duration. Bare numbers, unknown units, and zero-length intervals are
/// rejected.
pub fn parse_duration(input: &str) -> Result<std::time::Duration, ParseDurationError> {
    let err = || ParseDurationError(input.to_owned());

    let mut rest = input.trim();
    if rest.is_empty() {
        return Err(err());
    }

    let mut total = std::time::Duration::ZERO;
    while !rest.is_empty() {
        let number_end = rest
            .find(|c: char| !(c.is_ascii_digit() || c == '.'))
            .ok_or_else(err)?;
        if number_end == 0 {
            return Err(err());
        }
        let (number, tail) = rest.split_at(number_end);
        let value: f64 = number.parse().map_err(|_| err())?;

        let unit_end = tail
            .find(|c: char| c.is_ascii_digit() || c == '.')
            .unwrap_or(tail.len());
        let (unit, tail) = tail.split_at(unit_end);

        let unit_seconds = match unit {
            "ms" => 0.001,
            "s" => 1.0,
            "m" => 60.0,
            "h" => 3600.0,
            _ => return Err(err()),
        };

        total += std::time::Duration::from_secs_f64(value * unit_seconds);
        rest = tail;
    }

    if total.is_zero() {
        return Err(err());
    }

    Ok(total)
}
