use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Whether an article came from one of the fixed international outlets or a
/// domestic source. Derived once from the feed URL's host, never recomputed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum SourceClass {
    Domestic,
    International,
}

impl SourceClass {
    pub fn tag(&self) -> &'static str {
        match self {
            SourceClass::Domestic => "🏠 Domestic",
            SourceClass::International => "🌍 International",
        }
    }
}

/// A feed entry as parsed off the wire, before any filtering. Title and
/// summary may still contain HTML markup at this point.
#[derive(Debug, Clone)]
pub struct FeedEntry {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Article {
    pub title: String,
    pub link: String,
    pub summary: String,
    pub published: Option<DateTime<Utc>>,
    pub source_class: SourceClass,
}

/// One topic's finished block: selected headlines plus the generated (or
/// fallback) summary body. Created by the summarizer, consumed once by the
/// assembler.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TopicSummary {
    pub topic: String,
    pub emoji: String,
    pub headlines: Vec<String>,
    pub summary: String,
    /// False when the generation call failed and the block carries only the
    /// headline fallback. Counted in the digest footer.
    pub ai_ok: bool,
}

impl TopicSummary {
    pub fn render(&self) -> String {
        if self.headlines.is_empty() {
            return format!("{} {}\n• No major news on this topic today.", self.emoji, self.topic);
        }

        format!(
            "{} {}\n[Top headlines]\n{}\n\n[Summary]\n{}",
            self.emoji,
            self.topic,
            self.headlines.join("\n"),
            self.summary
        )
    }
}

/// Outcome of one digest run, logged by the driver. Delivery failures are
/// recorded here but never change the process exit code.
#[derive(Debug)]
pub struct RunReport {
    pub completed_topics: usize,
    pub total_topics: usize,
    pub elapsed: Duration,
    pub delivered_text: bool,
    pub delivered_voice: bool,
}

#[derive(Debug, thiserror::Error)]
pub enum DigestError {
    #[error("missing required environment variable: {name}")]
    MissingSecret { name: String },

    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("feed error: {0}")]
    Feed(String),

    #[error("generation error: {0}")]
    Generation(String),

    #[error("speech synthesis error: {0}")]
    Speech(String),

    #[error("delivery error: {0}")]
    Delivery(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, DigestError>;
