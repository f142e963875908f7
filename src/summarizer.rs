use crate::config::{GenerationConfig, TopicSpec};
use crate::text::truncate_chars;
use crate::types::{Article, DigestError, Result, TopicSummary};
use async_trait::async_trait;
use reqwest::Client;
use serde_json::{json, Value};
use std::sync::Arc;
use tracing::{debug, error, warn};

/// Seam over the external generation API so tests can script replies and
/// failures without the network.
#[async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate(&self, prompt: &str) -> Result<String>;
}

/// Client for the Gemini `generateContent` endpoint. One request per call,
/// fixed sampling parameters, no retry.
pub struct GeminiClient {
    client: Client,
    api_key: String,
    config: GenerationConfig,
}

impl GeminiClient {
    pub fn new(client: Client, api_key: String, config: GenerationConfig) -> Self {
        Self { client, api_key, config }
    }
}

#[async_trait]
impl TextGenerator for GeminiClient {
    async fn generate(&self, prompt: &str) -> Result<String> {
        let url = format!(
            "{}/v1beta/models/{}:generateContent?key={}",
            self.config.api_base, self.config.model, self.api_key
        );
        let body = json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "temperature": self.config.temperature,
                "topP": self.config.top_p,
                "topK": self.config.top_k,
                "maxOutputTokens": self.config.max_output_tokens,
            }
        });

        debug!("Calling generation API ({} prompt chars)", prompt.chars().count());

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        let payload = response.text().await?;

        if !status.is_success() {
            return Err(DigestError::Generation(format!(
                "HTTP {}: {}",
                status,
                truncate_chars(&payload, 200)
            )));
        }

        let value: Value = serde_json::from_str(&payload)?;
        let text = value["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(|s| s.trim().to_string())
            .unwrap_or_default();

        if text.is_empty() {
            return Err(DigestError::Generation(
                "empty response from generation API".to_string(),
            ));
        }

        Ok(text)
    }
}

pub struct Summarizer {
    generator: Arc<dyn TextGenerator>,
    config: GenerationConfig,
}

impl Summarizer {
    pub fn new(generator: Arc<dyn TextGenerator>, config: GenerationConfig) -> Self {
        Self { generator, config }
    }

    /// Produce a topic's block. An empty article set short-circuits to the
    /// fixed no-news line without touching the generation API; any generation
    /// failure degrades to a headlines-only fallback. Never propagates an
    /// error, so one topic's failure cannot abort the run.
    pub async fn summarize(&self, topic: &TopicSpec, articles: &[Article]) -> TopicSummary {
        if articles.is_empty() {
            debug!("No articles for topic {}, skipping generation call", topic.name);
            return TopicSummary {
                topic: topic.name.clone(),
                emoji: topic.emoji.clone(),
                headlines: Vec::new(),
                summary: String::new(),
                ai_ok: true,
            };
        }

        let headlines: Vec<String> = articles
            .iter()
            .enumerate()
            .map(|(i, a)| format!("{}. {}", i + 1, a.title))
            .collect();

        let prompt = self.build_prompt(topic, articles, &headlines);

        match self.generator.generate(&prompt).await {
            Ok(raw) => {
                let summary = tidy_summary(&raw, self.config.max_summary_lines);
                if summary.is_empty() {
                    warn!("Generation API returned unusable text for topic {}", topic.name);
                    self.fallback(topic, headlines)
                } else {
                    TopicSummary {
                        topic: topic.name.clone(),
                        emoji: topic.emoji.clone(),
                        headlines,
                        summary,
                        ai_ok: true,
                    }
                }
            }
            Err(e) => {
                error!("Summary generation failed for topic {}: {}", topic.name, e);
                self.fallback(topic, headlines)
            }
        }
    }

    fn build_prompt(&self, topic: &TopicSpec, articles: &[Article], headlines: &[String]) -> String {
        let mut notes = String::new();
        for (i, article) in articles.iter().enumerate() {
            notes.push_str(&format!(
                "\n[{} article {}]\nTitle: {}\nBody: {}\n",
                article.source_class.tag(),
                i + 1,
                article.title,
                article.summary
            ));
        }

        format!(
            "Below are today's '{}' news articles. Keep only the key stories, fold \
             near-duplicate reports together, and work from the {} main headlines listed. \
             Restate each headline first, then write a detailed {}-line summary of the \
             essential points underneath. Leave out weather, culture, and anything \
             unrelated to the topic.\n\
             [Top headlines]\n{}\n\n[Article notes]{}\n[Summary ({} lines)]",
            topic.name,
            headlines.len(),
            self.config.max_summary_lines,
            headlines.join("\n"),
            notes,
            self.config.max_summary_lines
        )
    }

    fn fallback(&self, topic: &TopicSpec, headlines: Vec<String>) -> TopicSummary {
        TopicSummary {
            topic: topic.name.clone(),
            emoji: topic.emoji.clone(),
            headlines,
            summary: "AI summary could not be generated. Refer to the headlines above."
                .to_string(),
            ai_ok: false,
        }
    }
}

/// Strip emphasis markup, drop blank lines, and cap the line count.
pub fn tidy_summary(raw: &str, max_lines: usize) -> String {
    let cleaned = raw.replace('*', "");
    cleaned
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .take(max_lines)
        .collect::<Vec<_>>()
        .join("\n")
}
