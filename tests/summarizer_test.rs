use async_trait::async_trait;
use newsbrief::config::{GenerationConfig, TopicSpec};
use newsbrief::summarizer::{tidy_summary, Summarizer, TextGenerator};
use newsbrief::types::{Article, DigestError, Result, SourceClass};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

/// Scripted stand-in for the generation API: returns a fixed reply or a
/// fixed error and counts how often it was called.
struct ScriptedGenerator {
    reply: std::result::Result<String, String>,
    calls: AtomicUsize,
}

impl ScriptedGenerator {
    fn replying(reply: &str) -> Arc<Self> {
        Arc::new(Self { reply: Ok(reply.to_string()), calls: AtomicUsize::new(0) })
    }

    fn failing(message: &str) -> Arc<Self> {
        Arc::new(Self { reply: Err(message.to_string()), calls: AtomicUsize::new(0) })
    }

    fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for ScriptedGenerator {
    async fn generate(&self, _prompt: &str) -> Result<String> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.reply {
            Ok(text) => Ok(text.clone()),
            Err(message) => Err(DigestError::Generation(message.clone())),
        }
    }
}

fn topic() -> TopicSpec {
    TopicSpec::new("Politics", "🏛️", &[], &[])
}

fn article(title: &str) -> Article {
    Article {
        title: title.to_string(),
        link: "https://example.com/story".to_string(),
        summary: "Something happened and officials responded.".to_string(),
        published: None,
        source_class: SourceClass::Domestic,
    }
}

#[tokio::test]
async fn empty_selection_skips_the_generation_api() {
    let generator = ScriptedGenerator::replying("should never be used");
    let summarizer = Summarizer::new(generator.clone(), GenerationConfig::default());

    let summary = summarizer.summarize(&topic(), &[]).await;

    assert_eq!(generator.call_count(), 0, "no articles must mean no API call");
    assert!(summary.ai_ok);
    assert!(summary.headlines.is_empty());
    assert!(summary.render().contains("No major news"));
}

#[tokio::test]
async fn successful_generation_is_cleaned_and_capped() {
    let generator =
        ScriptedGenerator::replying("**First point.**\n\nSecond point.\nThird point.\nFourth point.");
    let summarizer = Summarizer::new(generator.clone(), GenerationConfig::default());

    let summary = summarizer
        .summarize(&topic(), &[article("Parliament passes the annual budget bill")])
        .await;

    assert_eq!(generator.call_count(), 1);
    assert!(summary.ai_ok);
    assert!(!summary.summary.contains('*'), "emphasis markup must be stripped");
    assert_eq!(summary.summary.lines().count(), 3, "line count must be capped");
    assert!(summary.summary.contains("First point."));
    assert!(!summary.summary.contains("Fourth point."));
    assert_eq!(summary.headlines, vec!["1. Parliament passes the annual budget bill"]);
}

#[tokio::test]
async fn generation_failure_degrades_to_headlines_only() {
    let generator = ScriptedGenerator::failing("connection reset by peer");
    let summarizer = Summarizer::new(generator.clone(), GenerationConfig::default());

    let summary = summarizer
        .summarize(&topic(), &[article("Cabinet reshuffle announced this morning")])
        .await;

    assert_eq!(generator.call_count(), 1);
    assert!(!summary.ai_ok);
    assert!(summary
        .render()
        .contains("Cabinet reshuffle announced this morning"));
    assert!(summary.summary.contains("headlines above"));
}

#[tokio::test]
async fn empty_generation_reply_degrades_to_headlines_only() {
    let generator = ScriptedGenerator::replying("   \n  ");
    let summarizer = Summarizer::new(generator.clone(), GenerationConfig::default());

    let summary = summarizer
        .summarize(&topic(), &[article("Senate schedules a confirmation vote")])
        .await;

    assert!(!summary.ai_ok);
    assert!(summary.render().contains("Senate schedules a confirmation vote"));
}

#[test]
fn tidy_summary_strips_markup_and_blank_lines() {
    let raw = "*One*\n\n\n**Two**\nThree\nFour";
    assert_eq!(tidy_summary(raw, 3), "One\nTwo\nThree");
    assert_eq!(tidy_summary("   \n\n", 3), "");
}
