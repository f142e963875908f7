pub mod assembler;
pub mod config;
pub mod delivery;
pub mod fetcher;
pub mod pipeline;
pub mod selector;
pub mod speech;
pub mod summarizer;
pub mod text;
pub mod types;

pub use assembler::assemble_digest;
pub use config::{Config, TopicSpec};
pub use delivery::TelegramNotifier;
pub use fetcher::{FeedSource, HttpFeedSource};
pub use pipeline::DigestPipeline;
pub use speech::SpeechSynthesizer;
pub use summarizer::{GeminiClient, Summarizer, TextGenerator};
pub use types::*;
