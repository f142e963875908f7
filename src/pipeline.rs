use crate::assembler::assemble_digest;
use crate::config::{Config, TopicSpec};
use crate::delivery::TelegramNotifier;
use crate::fetcher::{fetch_topic_feeds, FeedSource, HttpFeedSource};
use crate::selector::select_articles;
use crate::speech::{write_temp_clip, SpeechSynthesizer};
use crate::summarizer::{GeminiClient, Summarizer, TextGenerator};
use crate::types::{RunReport, TopicSummary};
use chrono::Utc;
use futures::future::join_all;
use reqwest::Client;
use std::sync::Arc;
use std::time::{Duration, Instant};
use tracing::{error, info, warn};

const VOICE_CAPTION: &str = "🔊 Audio briefing";

/// The whole run, end to end: fetch and summarize every topic concurrently,
/// assemble the digest, optionally synthesize speech, deliver both.
pub struct DigestPipeline {
    config: Config,
    source: Arc<dyn FeedSource>,
    generator: Arc<dyn TextGenerator>,
    speech: Option<SpeechSynthesizer>,
    notifier: TelegramNotifier,
}

impl DigestPipeline {
    pub fn new(config: Config) -> Self {
        let client = Client::builder()
            .user_agent(&config.fetch.user_agent)
            .timeout(Duration::from_secs(config.fetch.timeout_secs))
            .gzip(true)
            .deflate(true)
            .brotli(true)
            .build()
            .expect("Failed to create HTTP client");

        let source: Arc<dyn FeedSource> =
            Arc::new(HttpFeedSource::new(client.clone(), config.fetch.clone()));
        let generator: Arc<dyn TextGenerator> = Arc::new(GeminiClient::new(
            client.clone(),
            config.gemini_api_key.clone(),
            config.generation.clone(),
        ));
        let speech = config.tts_api_key.as_ref().map(|key| {
            SpeechSynthesizer::new(client.clone(), key.clone(), config.speech.clone())
        });
        let notifier = TelegramNotifier::new(
            client,
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
            config.delivery.clone(),
        );

        Self { config, source, generator, speech, notifier }
    }

    /// Assemble a pipeline around substituted seams. Used by tests; the
    /// speech stage is disabled.
    pub fn with_parts(
        config: Config,
        source: Arc<dyn FeedSource>,
        generator: Arc<dyn TextGenerator>,
    ) -> Self {
        let client = Client::new();
        let notifier = TelegramNotifier::new(
            client,
            config.telegram_bot_token.clone(),
            config.telegram_chat_id.clone(),
            config.delivery.clone(),
        );
        Self { config, source, generator, speech: None, notifier }
    }

    /// Process every topic as an independent concurrent task and join them in
    /// configured order. Each task owns its accumulators; nothing is shared.
    pub async fn collect_topics(&self) -> Vec<TopicSummary> {
        let summarizer = Summarizer::new(self.generator.clone(), self.config.generation.clone());
        let tasks = self
            .config
            .topics
            .iter()
            .map(|topic| self.process_topic(topic, &summarizer));
        join_all(tasks).await
    }

    async fn process_topic(&self, topic: &TopicSpec, summarizer: &Summarizer) -> TopicSummary {
        info!("Collecting articles for topic: {}", topic.name);

        let feeds = fetch_topic_feeds(self.source.as_ref(), &topic.feeds).await;
        let articles = select_articles(&feeds, topic, &self.config.selection, Utc::now());

        info!("Topic {}: selected {} articles", topic.name, articles.len());
        summarizer.summarize(topic, &articles).await
    }

    pub async fn run(&self) -> RunReport {
        let started = Instant::now();

        let topics = self.collect_topics().await;
        let completed = topics.iter().filter(|t| t.ai_ok).count();
        let digest = assemble_digest(&topics, Utc::now(), started.elapsed());

        let mut clip_path = None;
        if let Some(speech) = &self.speech {
            if let Some(audio) = speech.synthesize(&digest).await {
                match write_temp_clip(&audio).await {
                    Ok(path) => clip_path = Some(path),
                    Err(e) => warn!("Failed to write audio clip: {}", e),
                }
            }
        }

        let delivered_text = match self.notifier.send_text(&digest).await {
            Ok(()) => true,
            Err(e) => {
                error!("Failed to deliver digest text: {}", e);
                false
            }
        };

        let mut delivered_voice = false;
        if let Some(path) = &clip_path {
            match self.notifier.send_voice(path, VOICE_CAPTION).await {
                Ok(()) => delivered_voice = true,
                Err(e) => error!("Failed to deliver voice clip: {}", e),
            }
        }

        // The clip is removed on this path regardless of delivery outcome.
        if let Some(path) = clip_path {
            if let Err(e) = tokio::fs::remove_file(&path).await {
                warn!("Failed to remove audio clip {}: {}", path.display(), e);
            }
        }

        RunReport {
            completed_topics: completed,
            total_topics: topics.len(),
            elapsed: started.elapsed(),
            delivered_text,
            delivered_voice,
        }
    }
}
