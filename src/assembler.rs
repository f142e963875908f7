use crate::types::TopicSummary;
use chrono::{DateTime, Utc};
use std::time::Duration;

const RULE: &str = "━━━━━━━━━━━━━━━━━━━━";

/// Join the topic blocks into the delivery-ready digest. Pure function of
/// its inputs: the caller supplies the completion timestamp and elapsed time,
/// so the same inputs always produce the same document.
pub fn assemble_digest(
    topics: &[TopicSummary],
    completed_at: DateTime<Utc>,
    elapsed: Duration,
) -> String {
    let completed = topics.iter().filter(|t| t.ai_ok).count();

    let header = format!(
        "📰 Daily News Digest\n📅 {} ({})\n{}",
        completed_at.format("%Y-%m-%d"),
        completed_at.format("%A"),
        RULE
    );

    let footer = format!(
        "{}\n✅ {}/{} topics summarized in {:.1}s\n🕒 Completed at {} UTC",
        RULE,
        completed,
        topics.len(),
        elapsed.as_secs_f64(),
        completed_at.format("%H:%M:%S")
    );

    let mut sections = Vec::with_capacity(topics.len() + 2);
    sections.push(header);
    for topic in topics {
        sections.push(topic.render());
    }
    sections.push(footer);

    sections.join("\n\n")
}
