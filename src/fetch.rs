//! Fetching and decoding remote feeds.
//!
//! A fetched feed keeps each item's publish date as the raw string from the
//! document; deciding whether that string is usable is the ingestion cycle's
//! job, not ours.

use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedFeed {
    pub title:       String,
    pub description: String,
    pub items:       Vec<FetchedItem>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FetchedItem {
    pub title:       String,
    pub link:        String,
    pub description: Option<String>,
    pub pub_date:    Option<String>,
}

#[derive(Debug, Error)]
pub enum FetchFeedError {
    #[error("requesting feed")]
    Http(#[from] reqwest::Error),
    #[error("decoding feed XML")]
    Parse(#[from] rss::Error),
}

#[allow(async_fn_in_trait)]
pub trait FetchFeed {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed, FetchFeedError>;
}

pub struct Fetcher {
    client: reqwest::Client,
}

impl Fetcher {
    pub fn new() -> Result<Fetcher, reqwest::Error> {
        let user_agent = concat!(env!("CARGO_PKG_NAME"), "/", env!("CARGO_PKG_VERSION"));
        let client = reqwest::Client::builder()
            .user_agent(user_agent)
            .build()?;
        Ok(Fetcher { client })
    }
}

impl FetchFeed for Fetcher {
    async fn fetch(&self, url: &str) -> Result<FetchedFeed, FetchFeedError> {
        let body = self.client.get(url).send().await?.bytes().await?;
        let channel = rss::Channel::read_from(&body[..])?;
        Ok(channel.into())
    }
}

impl From<rss::Channel> for FetchedFeed {
    fn from(channel: rss::Channel) -> Self {
        let items = channel
            .items()
            .iter()
            .map(|item| FetchedItem {
                title: unescape(item.title().unwrap_or_default()),
                link: item.link().unwrap_or_default().to_string(),
                description: item.description().map(unescape),
                pub_date: item.pub_date().map(str::to_string),
            })
            .collect();

        FetchedFeed {
            title: unescape(channel.title()),
            description: unescape(channel.description()),
            items,
        }
    }
}

/// Decodes HTML entities left over after XML decoding, so titles like
/// `AT&amp;amp;T` render as literal text. Unknown entities and stray
/// ampersands pass through untouched.
fn unescape(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut entity = String::new();
    let mut in_entity = false;

    for ch in text.chars() {
        if !in_entity {
            if ch == '&' {
                in_entity = true;
                entity.clear();
            } else {
                out.push(ch);
            }
            continue;
        }

        match ch {
            ';' => {
                in_entity = false;
                match entity.as_str() {
                    "amp" => out.push('&'),
                    "lt" => out.push('<'),
                    "gt" => out.push('>'),
                    "quot" => out.push('"'),
                    "apos" => out.push('\''),
                    "nbsp" => out.push(' '),
                    _ if entity.starts_with('#') => {
                        match parse_numeric_entity(&entity).and_then(char::from_u32) {
                            Some(decoded) => out.push(decoded),
                            None => {
                                out.push('&');
                                out.push_str(&entity);
                                out.push(';');
                            }
                        }
                    }
                    _ => {
                        out.push('&');
                        out.push_str(&entity);
                        out.push(';');
                    }
                }
            }
            '&' => {
                // the pending ampersand was literal; start a new entity
                out.push('&');
                out.push_str(&entity);
                entity.clear();
            }
            c if c.is_ascii_alphanumeric() || c == '#' => {
                entity.push(c);
            }
            c => {
                in_entity = false;
                out.push('&');
                out.push_str(&entity);
                out.push(c);
            }
        }
    }

    if in_entity {
        out.push('&');
        out.push_str(&entity);
    }

    out
}

fn parse_numeric_entity(entity: &str) -> Option<u32> {
    if let Some(hex) = entity.strip_prefix("#x").or_else(|| entity.strip_prefix("#X")) {
        u32::from_str_radix(hex, 16).ok()
    } else if let Some(dec) = entity.strip_prefix('#') {
        dec.parse().ok()
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn unescape_named_entities() {
        assert_eq!(unescape("AT&amp;T"), "AT&T");
        assert_eq!(unescape("5 &lt; 6 &gt; 4"), "5 < 6 > 4");
        assert_eq!(unescape("&quot;quoted&quot;"), "\"quoted\"");
        assert_eq!(unescape("it&apos;s"), "it's");
        assert_eq!(unescape("a&nbsp;b"), "a b");
    }

    #[test]
    fn unescape_numeric_entities() {
        assert_eq!(unescape("&#65;"), "A");
        assert_eq!(unescape("&#x41;"), "A");
        assert_eq!(unescape("&#X41;"), "A");
    }

    #[test]
    fn unescape_leaves_plain_text_alone() {
        assert_eq!(unescape("no entities here"), "no entities here");
        assert_eq!(unescape("fish & chips"), "fish & chips");
        assert_eq!(unescape("trailing &"), "trailing &");
        assert_eq!(unescape("&bogus;"), "&bogus;");
        assert_eq!(unescape("&#xZZ;"), "&#xZZ;");
    }

    #[test]
    fn unescape_handles_back_to_back_ampersands() {
        assert_eq!(unescape("&&amp;"), "&&");
    }

    #[test]
    fn channel_converts_with_raw_publish_dates() {
        let xml = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0">
  <channel>
    <title>Boot &amp;amp; Shoe News</title>
    <link>https://example.com</link>
    <description>All about boots &amp;amp; shoes</description>
    <item>
      <title>First post</title>
      <link>https://example.com/1</link>
      <description>An update on boots &amp;amp; shoes</description>
      <pubDate>Mon, 02 Jan 2006 15:04:05 GMT</pubDate>
    </item>
    <item>
      <title>Undated post</title>
      <link>https://example.com/2</link>
    </item>
  </channel>
</rss>"#;

        let channel = rss::Channel::read_from(xml.as_bytes()).unwrap();
        let feed: FetchedFeed = channel.into();

        assert_eq!(feed.title, "Boot & Shoe News");
        assert_eq!(feed.description, "All about boots & shoes");
        assert_eq!(feed.items.len(), 2);

        assert_eq!(feed.items[0].title, "First post");
        assert_eq!(feed.items[0].link, "https://example.com/1");
        assert_eq!(
            feed.items[0].description.as_deref(),
            Some("An update on boots & shoes"),
        );
        assert_eq!(
            feed.items[0].pub_date.as_deref(),
            Some("Mon, 02 Jan 2006 15:04:05 GMT"),
        );

        assert_eq!(feed.items[1].pub_date, None);
        assert_eq!(feed.items[1].description, None);
    }
}
