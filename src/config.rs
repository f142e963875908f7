use crate::types::{DigestError, Result};
use std::env;

/// Everything one run needs, built once at startup and threaded through the
/// pipeline as a parameter. No stage reads the process environment itself.
#[derive(Debug, Clone)]
pub struct Config {
    pub gemini_api_key: String,
    pub telegram_bot_token: String,
    pub telegram_chat_id: String,
    /// Optional: when absent the run delivers text only, no audio clip.
    pub tts_api_key: Option<String>,
    pub topics: Vec<TopicSpec>,
    pub fetch: FetchConfig,
    pub selection: SelectionConfig,
    pub generation: GenerationConfig,
    pub speech: SpeechConfig,
    pub delivery: DeliveryConfig,
}

impl Config {
    /// Read secrets from the environment. A missing or blank required secret
    /// aborts the run before any network activity.
    pub fn from_env() -> Result<Self> {
        let gemini_api_key = require_env("GEMINI_API_KEY")?;
        let telegram_bot_token = require_env("TELEGRAM_BOT_TOKEN")?;
        let telegram_chat_id = require_env("TELEGRAM_CHAT_ID")?;
        let tts_api_key = env::var("TTS_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty());

        Ok(Self {
            gemini_api_key,
            telegram_bot_token,
            telegram_chat_id,
            tts_api_key,
            topics: default_topics(),
            fetch: FetchConfig::default(),
            selection: SelectionConfig::default(),
            generation: GenerationConfig::default(),
            speech: SpeechConfig::default(),
            delivery: DeliveryConfig::default(),
        })
    }
}

fn require_env(name: &str) -> Result<String> {
    env::var(name)
        .ok()
        .filter(|value| !value.trim().is_empty())
        .ok_or_else(|| DigestError::MissingSecret { name: name.to_string() })
}

/// One tracked subject: its feed list plus an optional relevance keyword set.
/// When `keywords` is non-empty an entry must mention one of them in its
/// title or summary to survive selection.
#[derive(Debug, Clone)]
pub struct TopicSpec {
    pub name: String,
    pub emoji: String,
    pub feeds: Vec<String>,
    pub keywords: Vec<String>,
}

impl TopicSpec {
    pub fn new(name: &str, emoji: &str, feeds: &[&str], keywords: &[&str]) -> Self {
        Self {
            name: name.to_string(),
            emoji: emoji.to_string(),
            feeds: feeds.iter().map(|s| s.to_string()).collect(),
            keywords: keywords.iter().map(|s| s.to_string()).collect(),
        }
    }
}

pub fn default_topics() -> Vec<TopicSpec> {
    vec![
        TopicSpec::new(
            "Military",
            "🪖",
            &[
                "https://news.google.com/rss/search?q=military+defense&hl=en-US&gl=US&ceid=US:en",
                "https://www.defensenews.com/arc/outboundfeeds/rss/",
                "https://rss.nytimes.com/services/xml/rss/nyt/World.xml",
                "https://feeds.bbci.co.uk/news/world/rss.xml",
            ],
            &["military", "defense", "missile", "nuclear", "army", "weapons", "troops"],
        ),
        TopicSpec::new(
            "Politics",
            "🏛️",
            &[
                "https://news.google.com/rss/search?q=politics&hl=en-US&gl=US&ceid=US:en",
                "https://www.politico.com/rss/politicopicks.xml",
                "https://thehill.com/feed/",
                "https://rss.nytimes.com/services/xml/rss/nyt/Politics.xml",
            ],
            &["election", "parliament", "congress", "senate", "president", "policy", "government"],
        ),
        TopicSpec::new(
            "Economy",
            "💰",
            &[
                "https://news.google.com/rss/search?q=economy+markets&hl=en-US&gl=US&ceid=US:en",
                "https://search.cnbc.com/rs/search/combinedcms/view.xml?partnerId=wrss01&id=100003114",
                "https://rss.nytimes.com/services/xml/rss/nyt/Business.xml",
                "https://feeds.bbci.co.uk/news/business/rss.xml",
            ],
            &[],
        ),
        TopicSpec::new(
            "Technology",
            "🤖",
            &[
                "https://news.google.com/rss/search?q=technology&hl=en-US&gl=US&ceid=US:en",
                "https://www.technologyreview.com/feed/",
                "https://rss.nytimes.com/services/xml/rss/nyt/Technology.xml",
                "https://feeds.bbci.co.uk/news/technology/rss.xml",
            ],
            &[],
        ),
    ]
}

#[derive(Debug, Clone)]
pub struct FetchConfig {
    pub user_agent: String,
    pub timeout_secs: u64,
    /// Only the first N entries of each feed are considered for selection.
    pub max_entries_per_feed: usize,
}

impl Default for FetchConfig {
    fn default() -> Self {
        Self {
            user_agent: "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 \
                         (KHTML, like Gecko) Chrome/120.0.0.0 Safari/537.36"
                .to_string(),
            timeout_secs: 10,
            max_entries_per_feed: 10,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SelectionConfig {
    pub recency_hours: i64,
    pub max_domestic: usize,
    pub max_international: usize,
    pub min_title_chars: usize,
    pub max_title_chars: usize,
    pub max_summary_chars: usize,
    /// Cap on the final per-topic headline set after dedup.
    pub max_headlines: usize,
    pub international_hosts: Vec<String>,
}

impl Default for SelectionConfig {
    fn default() -> Self {
        Self {
            recency_hours: 24,
            max_domestic: 5,
            max_international: 2,
            min_title_chars: 10,
            max_title_chars: 100,
            max_summary_chars: 300,
            max_headlines: 3,
            international_hosts: vec!["nytimes.com".to_string(), "bbci.co.uk".to_string()],
        }
    }
}

/// Fixed sampling parameters for the generation API. One call per topic.
#[derive(Debug, Clone)]
pub struct GenerationConfig {
    pub api_base: String,
    pub model: String,
    pub temperature: f64,
    pub top_p: f64,
    pub top_k: u32,
    pub max_output_tokens: u32,
    pub max_summary_lines: usize,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_base: "https://generativelanguage.googleapis.com".to_string(),
            model: "gemini-1.5-flash".to_string(),
            temperature: 0.5,
            top_p: 0.8,
            top_k: 40,
            max_output_tokens: 1000,
            max_summary_lines: 3,
        }
    }
}

#[derive(Debug, Clone)]
pub struct SpeechConfig {
    pub api_base: String,
    pub language_code: String,
    pub voice: String,
    pub speaking_rate: f64,
    pub volume_gain_db: f64,
    /// Character budget for the spoken script, applied before synthesis.
    pub max_chars: usize,
    pub pause_ms: u64,
    pub lead_in: String,
}

impl Default for SpeechConfig {
    fn default() -> Self {
        Self {
            api_base: "https://texttospeech.googleapis.com".to_string(),
            language_code: "en-US".to_string(),
            voice: "en-US-Standard-C".to_string(),
            speaking_rate: 1.0,
            volume_gain_db: 0.0,
            max_chars: 1500,
            pause_ms: 500,
            lead_in: "Here is today's news briefing.".to_string(),
        }
    }
}

#[derive(Debug, Clone)]
pub struct DeliveryConfig {
    pub api_base: String,
    /// The send-text endpoint rejects longer messages, so the digest is
    /// truncated to this budget before posting.
    pub max_text_chars: usize,
}

impl Default for DeliveryConfig {
    fn default() -> Self {
        Self {
            api_base: "https://api.telegram.org".to_string(),
            max_text_chars: 4096,
        }
    }
}
