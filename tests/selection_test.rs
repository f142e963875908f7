use chrono::{DateTime, Duration, Utc};
use newsbrief::config::{SelectionConfig, TopicSpec};
use newsbrief::selector::{classify_source, dedup_by_title, select_articles};
use newsbrief::text::{clean_text, truncate_chars};
use newsbrief::types::{Article, FeedEntry, SourceClass};

fn entry(title: &str, summary: &str, published: Option<DateTime<Utc>>) -> FeedEntry {
    FeedEntry {
        title: title.to_string(),
        link: format!("https://example.com/{}", title.len()),
        summary: summary.to_string(),
        published,
    }
}

fn plain_topic() -> TopicSpec {
    TopicSpec::new("General", "📰", &[], &[])
}

#[test]
fn per_class_caps_are_enforced() {
    let now = Utc::now();
    let fresh = Some(now - Duration::hours(1));

    let domestic_entries: Vec<FeedEntry> = (0..8)
        .map(|i| entry(&format!("Domestic headline number {}", i), "body", fresh))
        .collect();
    let international_entries: Vec<FeedEntry> = (0..4)
        .map(|i| entry(&format!("International headline number {}", i), "body", fresh))
        .collect();

    let feeds = vec![
        ("https://example.com/rss".to_string(), domestic_entries),
        ("https://feeds.bbci.co.uk/news/rss.xml".to_string(), international_entries),
    ];

    let config = SelectionConfig {
        max_headlines: 10,
        ..SelectionConfig::default()
    };

    let selected = select_articles(&feeds, &plain_topic(), &config, now);

    let domestic = selected
        .iter()
        .filter(|a| a.source_class == SourceClass::Domestic)
        .count();
    let international = selected
        .iter()
        .filter(|a| a.source_class == SourceClass::International)
        .count();

    assert!(domestic <= config.max_domestic, "domestic cap exceeded: {}", domestic);
    assert!(
        international <= config.max_international,
        "international cap exceeded: {}",
        international
    );
    assert_eq!(domestic, 5);
    assert_eq!(international, 2);
}

#[test]
fn missing_publish_date_is_never_rejected() {
    let now = Utc::now();
    let feeds = vec![(
        "https://example.com/rss".to_string(),
        vec![
            entry("Headline with no publish date", "body", None),
            entry("Headline from two days ago", "body", Some(now - Duration::hours(48))),
            entry("Headline from one hour ago", "body", Some(now - Duration::hours(1))),
        ],
    )];

    let selected = select_articles(&feeds, &plain_topic(), &SelectionConfig::default(), now);
    let titles: Vec<&str> = selected.iter().map(|a| a.title.as_str()).collect();

    assert!(titles.contains(&"Headline with no publish date"));
    assert!(titles.contains(&"Headline from one hour ago"));
    assert!(
        !titles.contains(&"Headline from two days ago"),
        "stale entry should be rejected"
    );
}

#[test]
fn short_titles_are_rejected_after_cleaning() {
    let now = Utc::now();
    let feeds = vec![(
        "https://example.com/rss".to_string(),
        vec![
            entry("<b>Short</b>", "body", None),
            entry("<b>A perfectly reasonable headline</b>", "body", None),
        ],
    )];

    let selected = select_articles(&feeds, &plain_topic(), &SelectionConfig::default(), now);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].title, "A perfectly reasonable headline");
}

#[test]
fn keyword_filter_drops_off_topic_entries() {
    let now = Utc::now();
    let topic = TopicSpec::new("Military", "🪖", &[], &["missile"]);
    let feeds = vec![(
        "https://example.com/rss".to_string(),
        vec![
            entry("New missile test reported near the border", "details", None),
            entry("Local bakery wins national pastry award", "crumbs", None),
            entry("Regional cooperation talks", "missile program on the agenda", None),
        ],
    )];

    let selected = select_articles(&feeds, &topic, &SelectionConfig::default(), now);
    let titles: Vec<&str> = selected.iter().map(|a| a.title.as_str()).collect();

    assert!(titles.contains(&"New missile test reported near the border"));
    assert!(titles.contains(&"Regional cooperation talks"), "summary match should count");
    assert!(!titles.contains(&"Local bakery wins national pastry award"));
}

#[test]
fn selection_sorts_newest_first_with_undated_last() {
    let now = Utc::now();
    let feeds = vec![(
        "https://example.com/rss".to_string(),
        vec![
            entry("Story from three hours ago", "body", Some(now - Duration::hours(3))),
            entry("Story without any date at all", "body", None),
            entry("Story from one hour ago", "body", Some(now - Duration::hours(1))),
        ],
    )];

    let config = SelectionConfig {
        max_headlines: 10,
        ..SelectionConfig::default()
    };
    let selected = select_articles(&feeds, &plain_topic(), &config, now);

    assert_eq!(selected[0].title, "Story from one hour ago");
    assert_eq!(selected[1].title, "Story from three hours ago");
    assert_eq!(selected[2].title, "Story without any date at all");
}

#[test]
fn duplicate_titles_collapse_keeping_first() {
    let now = Utc::now();
    let fresh = Some(now - Duration::hours(1));
    let feeds = vec![
        (
            "https://example.com/rss".to_string(),
            vec![entry("Identical breaking news headline", "first copy", fresh)],
        ),
        (
            "https://other.example.org/rss".to_string(),
            vec![entry("Identical breaking news headline", "second copy", fresh)],
        ),
    ];

    let selected = select_articles(&feeds, &plain_topic(), &SelectionConfig::default(), now);

    assert_eq!(selected.len(), 1);
    assert_eq!(selected[0].summary, "first copy");
}

#[test]
fn dedup_caps_the_final_headline_count() {
    let articles: Vec<Article> = (0..6)
        .map(|i| Article {
            title: format!("Unique headline number {}", i),
            link: String::new(),
            summary: String::new(),
            published: None,
            source_class: SourceClass::Domestic,
        })
        .collect();

    let unique = dedup_by_title(articles, 3);
    assert_eq!(unique.len(), 3);
    assert_eq!(unique[0].title, "Unique headline number 0");
}

#[test]
fn source_classification_matches_host_suffix() {
    let hosts = vec!["nytimes.com".to_string(), "bbci.co.uk".to_string()];

    assert_eq!(
        classify_source("https://feeds.bbci.co.uk/news/rss.xml", &hosts),
        SourceClass::International
    );
    assert_eq!(
        classify_source("https://rss.nytimes.com/services/xml/rss/nyt/World.xml", &hosts),
        SourceClass::International
    );
    assert_eq!(
        classify_source("https://rss.cnn.com/rss/edition.rss", &hosts),
        SourceClass::Domestic
    );
    assert_eq!(classify_source("not a url", &hosts), SourceClass::Domestic);
}

#[test]
fn clean_text_strips_markup_and_collapses_whitespace() {
    assert_eq!(
        clean_text("<p>Hello&nbsp;world &amp; more</p>"),
        "Hello world & more"
    );
    assert_eq!(clean_text("<![CDATA[Top story today]]>"), "Top story today");
    assert_eq!(clean_text("line one\n\n   line two"), "line one line two");
    assert_eq!(clean_text("AT&T expands network"), "AT&T expands network");
    assert_eq!(clean_text("<p>a</p><p>b</p>"), "a b");
}

#[test]
fn truncation_respects_character_boundaries() {
    assert_eq!(truncate_chars("héllo wörld", 4), "héll");
    assert_eq!(truncate_chars("short", 100), "short");

    let summary = "é".repeat(400);
    let truncated = truncate_chars(&summary, 300);
    assert_eq!(truncated.chars().count(), 300);
}
