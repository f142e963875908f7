use crate::config::DeliveryConfig;
use crate::text::truncate_chars;
use crate::types::{DigestError, Result};
use reqwest::multipart::{Form, Part};
use reqwest::{Client, Response};
use serde_json::{json, Value};
use std::path::Path;
use tracing::{debug, info};

/// Posts the digest to the chat bot's send endpoints. Text and voice sends
/// are independent; the caller decides what a failure means.
pub struct TelegramNotifier {
    client: Client,
    token: String,
    chat_id: String,
    config: DeliveryConfig,
}

impl TelegramNotifier {
    pub fn new(client: Client, token: String, chat_id: String, config: DeliveryConfig) -> Self {
        Self { client, token, chat_id, config }
    }

    /// Post the digest text. Oversized documents are truncated to the
    /// endpoint's character cap rather than rejected.
    pub async fn send_text(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.config.api_base, self.token);
        let payload = truncate_chars(text, self.config.max_text_chars);
        let body = json!({
            "chat_id": self.chat_id,
            "text": payload,
            "disable_web_page_preview": true,
        });

        debug!("Posting digest text ({} chars)", payload.chars().count());
        let response = self.client.post(&url).json(&body).send().await?;
        check_response(response).await?;

        info!("Digest text delivered");
        Ok(())
    }

    /// Upload the audio clip as a voice message with a caption.
    pub async fn send_voice(&self, clip: &Path, caption: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendVoice", self.config.api_base, self.token);
        let audio = tokio::fs::read(clip).await?;
        let clip_len = audio.len();

        let part = Part::bytes(audio)
            .file_name("digest.ogg")
            .mime_str("audio/ogg")?;
        let form = Form::new()
            .text("chat_id", self.chat_id.clone())
            .text("caption", caption.to_string())
            .part("voice", part);

        debug!("Posting voice clip ({} bytes)", clip_len);
        let response = self.client.post(&url).multipart(form).send().await?;
        check_response(response).await?;

        info!("Voice clip delivered");
        Ok(())
    }
}

async fn check_response(response: Response) -> Result<()> {
    let status = response.status();
    let body = response.text().await?;

    if !status.is_success() {
        return Err(DigestError::Delivery(format!(
            "HTTP {}: {}",
            status,
            truncate_chars(&body, 200)
        )));
    }

    match serde_json::from_str::<Value>(&body) {
        Ok(value) if value["ok"].as_bool() == Some(true) => Ok(()),
        Ok(value) => Err(DigestError::Delivery(format!(
            "API rejected message: {}",
            value["description"].as_str().unwrap_or("unknown")
        ))),
        Err(_) => Err(DigestError::Delivery("unparseable API response".to_string())),
    }
}
