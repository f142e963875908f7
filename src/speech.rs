use crate::config::SpeechConfig;
use crate::text::{speech_plain_text, truncate_chars};
use crate::types::{DigestError, Result};
use base64::{engine::general_purpose, Engine as _};
use chrono::Utc;
use reqwest::Client;
use serde_json::{json, Value};
use std::path::PathBuf;
use tracing::{debug, error, warn};

/// Client for the text-to-speech REST endpoint. Fixed voice, rate and
/// volume; requests an OGG/Opus clip suitable for a voice message.
pub struct SpeechSynthesizer {
    client: Client,
    api_key: String,
    config: SpeechConfig,
}

impl SpeechSynthesizer {
    pub fn new(client: Client, api_key: String, config: SpeechConfig) -> Self {
        Self { client, api_key, config }
    }

    /// Synthesize the digest into an audio clip. Tries the speech-markup
    /// envelope first, falls back once to plain text, and returns `None` if
    /// both attempts fail. Never fatal to the run.
    pub async fn synthesize(&self, digest: &str) -> Option<Vec<u8>> {
        let script = self.spoken_script(digest);
        if script.is_empty() {
            warn!("Nothing left to speak after plain-text projection");
            return None;
        }

        let ssml = build_ssml(&script, self.config.pause_ms);
        match self.request(json!({ "ssml": ssml })).await {
            Ok(audio) => Some(audio),
            Err(e) => {
                warn!("Speech markup synthesis failed, retrying with plain text: {}", e);
                match self.request(json!({ "text": script })).await {
                    Ok(audio) => Some(audio),
                    Err(e) => {
                        error!("Speech synthesis failed, proceeding without audio: {}", e);
                        None
                    }
                }
            }
        }
    }

    /// Project the chat-formatted digest to a spoken script: strip symbols,
    /// truncate to the character budget, prepend the lead-in sentence.
    fn spoken_script(&self, digest: &str) -> String {
        let plain = speech_plain_text(digest);
        if plain.is_empty() {
            return plain;
        }
        let trimmed = truncate_chars(&plain, self.config.max_chars);
        format!("{}\n{}", self.config.lead_in, trimmed)
    }

    async fn request(&self, input: Value) -> Result<Vec<u8>> {
        let url = format!(
            "{}/v1/text:synthesize?key={}",
            self.config.api_base, self.api_key
        );
        let body = json!({
            "input": input,
            "voice": {
                "languageCode": self.config.language_code,
                "name": self.config.voice,
            },
            "audioConfig": {
                "audioEncoding": "OGG_OPUS",
                "speakingRate": self.config.speaking_rate,
                "volumeGainDb": self.config.volume_gain_db,
            }
        });

        let response = self.client.post(&url).json(&body).send().await?;
        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            return Err(DigestError::Speech(format!(
                "HTTP {}: {}",
                status,
                truncate_chars(&detail, 200)
            )));
        }

        let payload: Value = serde_json::from_str(&response.text().await?)?;
        let audio = payload["audioContent"]
            .as_str()
            .ok_or_else(|| DigestError::Speech("no audioContent in response".to_string()))?;

        general_purpose::STANDARD
            .decode(audio)
            .map_err(|e| DigestError::Speech(format!("base64 decode failed: {}", e)))
    }
}

/// Wrap the script lines in a speech-markup envelope with a fixed pause
/// between lines, escaping the markup-significant characters.
pub fn build_ssml(script: &str, pause_ms: u64) -> String {
    let mut ssml = String::from("<speak>");
    for line in script.lines() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        ssml.push_str(&escape_ssml(line));
        ssml.push_str(&format!("<break time=\"{}ms\"/>", pause_ms));
    }
    ssml.push_str("</speak>");
    ssml
}

fn escape_ssml(text: &str) -> String {
    text.replace('&', "&amp;")
        .replace('<', "&lt;")
        .replace('>', "&gt;")
        .replace('"', "&quot;")
        .replace('\'', "&apos;")
}

/// Write the clip to the OS temp directory. The caller deletes it after
/// delivery on the same control path.
pub async fn write_temp_clip(audio: &[u8]) -> Result<PathBuf> {
    let path = std::env::temp_dir().join(format!("newsbrief-{}.ogg", Utc::now().timestamp()));
    tokio::fs::write(&path, audio).await?;
    debug!("Wrote audio clip to {} ({} bytes)", path.display(), audio.len());
    Ok(path)
}
