use crate::config::{SelectionConfig, TopicSpec};
use crate::text::{clean_text, truncate_chars};
use crate::types::{Article, FeedEntry, SourceClass};
use chrono::{DateTime, Duration, Utc};
use std::collections::HashSet;
use tracing::debug;
use url::Url;

/// Filter and select a topic's articles from its fetched feeds.
///
/// Feeds are scanned in input order; each entry passes the recency check
/// (fail-open when the publish date is missing), the keyword relevance check,
/// and the cleaned-title length check, then accumulates under its class cap.
/// The scan stops early once both caps are full. The merged selection is
/// sorted newest-first, deduplicated on trimmed title, and capped to the
/// final headline count.
pub fn select_articles(
    feeds: &[(String, Vec<FeedEntry>)],
    topic: &TopicSpec,
    config: &SelectionConfig,
    now: DateTime<Utc>,
) -> Vec<Article> {
    let mut domestic: Vec<Article> = Vec::new();
    let mut international: Vec<Article> = Vec::new();

    'feeds: for (feed_url, entries) in feeds {
        let source_class = classify_source(feed_url, &config.international_hosts);

        for entry in entries {
            if !is_recent(entry.published, now, config.recency_hours) {
                continue;
            }
            if !matches_keywords(entry, &topic.keywords) {
                continue;
            }

            let title = clean_text(&entry.title);
            if title.chars().count() < config.min_title_chars {
                continue;
            }
            let summary = truncate_chars(&clean_text(&entry.summary), config.max_summary_chars);

            let article = Article {
                title: truncate_chars(&title, config.max_title_chars),
                link: entry.link.clone(),
                summary,
                published: entry.published,
                source_class,
            };

            match source_class {
                SourceClass::International if international.len() < config.max_international => {
                    international.push(article)
                }
                SourceClass::Domestic if domestic.len() < config.max_domestic => {
                    domestic.push(article)
                }
                _ => {}
            }

            if domestic.len() >= config.max_domestic
                && international.len() >= config.max_international
            {
                break 'feeds;
            }
        }
    }

    debug!(
        "Topic {}: {} domestic, {} international candidates before dedup",
        topic.name,
        domestic.len(),
        international.len()
    );

    let mut selected = domestic;
    selected.extend(international);

    // Newest first; entries without a parseable date sort last.
    selected.sort_by(|a, b| b.published.cmp(&a.published));

    dedup_by_title(selected, config.max_headlines)
}

/// An entry with no publish date is never rejected for date reasons alone.
fn is_recent(published: Option<DateTime<Utc>>, now: DateTime<Utc>, recency_hours: i64) -> bool {
    match published {
        None => true,
        Some(ts) => now.signed_duration_since(ts) <= Duration::hours(recency_hours),
    }
}

fn matches_keywords(entry: &FeedEntry, keywords: &[String]) -> bool {
    if keywords.is_empty() {
        return true;
    }
    let title = entry.title.to_lowercase();
    let summary = entry.summary.to_lowercase();
    keywords
        .iter()
        .any(|k| title.contains(&k.to_lowercase()) || summary.contains(&k.to_lowercase()))
}

pub fn classify_source(feed_url: &str, international_hosts: &[String]) -> SourceClass {
    let host = Url::parse(feed_url)
        .ok()
        .and_then(|u| u.host_str().map(|h| h.to_string()))
        .unwrap_or_default();

    let international = international_hosts
        .iter()
        .any(|d| host == *d || host.ends_with(&format!(".{}", d)));

    if international {
        SourceClass::International
    } else {
        SourceClass::Domestic
    }
}

/// Collapse entries whose trimmed titles collide, keeping the first
/// occurrence, and cap the result.
pub fn dedup_by_title(articles: Vec<Article>, max: usize) -> Vec<Article> {
    let mut seen: HashSet<String> = HashSet::new();
    let mut unique = Vec::new();

    for article in articles {
        if unique.len() >= max {
            break;
        }
        if seen.insert(article.title.trim().to_string()) {
            unique.push(article);
        }
    }

    unique
}
