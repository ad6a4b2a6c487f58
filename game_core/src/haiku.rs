//! Flavor haiku from a text-generation endpoint
//!
//! Best effort only: every failure resolves to a fixed line, nothing is
//! surfaced to the player as an error.

use proto::{Content, GenerateContentRequest, GenerateContentResponse, GenerationConfig, ThinkingConfig};
use thiserror::Error;

pub const MODEL: &str = "gemini-2.5-flash";
pub const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta/models";

/// Shown when no API key was configured
pub const NO_KEY_MESSAGE: &str = "APIキーが設定されていないため、俳句を詠むことができません。";
/// Shown for any request, response or content failure
pub const FALLBACK: &str = "今は言葉が…浮かばないわ。";

const SYSTEM_INSTRUCTION: &str = "あなたは「ささがね」という名の、妖艶でミステリアスな酒場の女主人です。客のゲーム結果を聞いて、その結果にちなんだ風情のある俳句を一句、日本語で返してください。解説は不要です。俳句のみを返してください。";

#[derive(Debug, Error)]
pub enum FlavorError {
    #[error("no API key configured")]
    MissingKey,
    #[error("request failed: {0}")]
    Transport(String),
    #[error("unexpected HTTP status {0}")]
    Status(u16),
    #[error("malformed JSON: {0}")]
    Json(#[from] serde_json::Error),
    #[error("response had no text")]
    Empty,
}

/// `generateContent` URL for the configured model
pub fn endpoint() -> String {
    format!("{API_BASE}/{MODEL}:generateContent")
}

pub fn prompt(label: &str, score: u32, achieved: bool) -> String {
    let outcome = if achieved { "達成" } else { "未達成" };
    format!(
        "私の{label}モードでの挑戦が終わったわ。結果は{score}点で、目標は{outcome}だった。この結果に相応しい一句を詠んでちょうだい。"
    )
}

pub fn build_request(label: &str, score: u32, achieved: bool) -> GenerateContentRequest {
    GenerateContentRequest {
        system_instruction: Content::text(None, SYSTEM_INSTRUCTION),
        contents: vec![Content::text(Some("user"), prompt(label, score, achieved))],
        generation_config: GenerationConfig {
            temperature: 0.8,
            max_output_tokens: 50,
            thinking_config: ThinkingConfig { thinking_budget: 25 },
        },
    }
}

/// Pull the haiku out of a response body
pub fn parse_response(body: &str) -> Result<String, FlavorError> {
    let response = GenerateContentResponse::from_json(body)?;
    response.text().ok_or(FlavorError::Empty)
}

/// Collapse a request outcome into the line to show
pub fn resolve(outcome: Result<String, FlavorError>) -> String {
    match outcome {
        Ok(text) => text,
        Err(FlavorError::MissingKey) => {
            log::warn!("Haiku: API key not set, flavor text disabled");
            NO_KEY_MESSAGE.to_string()
        }
        Err(FlavorError::Empty) => {
            log::warn!("Haiku: generation returned no text, the response may have been blocked");
            FALLBACK.to_string()
        }
        Err(err) => {
            log::error!("Haiku: generation failed: {err}");
            FALLBACK.to_string()
        }
    }
}
