//! AI tutor passthrough to an external chat-completions service.
//!
//! The capability is polymorphic over {available, unavailable}: a missing
//! API key, transport failure, or error status all degrade to a static
//! fallback reply. Callers never see an error cross this boundary.
//!
//! We never log the API key, and reply contents are not logged either.

use std::time::Duration;

use reqwest::header::{AUTHORIZATION, CONTENT_TYPE, USER_AGENT};
use serde::{Deserialize, Serialize};

use crate::domain::Level;

/// Static reply served whenever the external service cannot answer
pub const FALLBACK_EXPLANATION: &str = "The AI tutor is unavailable right now. Re-read the level \
     description, work through the hints in order, and compare your program's output with the \
     expected output character by character.";

const TUTOR_SYSTEM_PROMPT: &str = "You are a patient Python tutor inside a gamified learning \
     platform. Explain concepts step by step for a beginner. Guide the student toward the \
     solution without writing the final program for them. Keep answers under 200 words.";

/// Reply from the tutor capability
#[derive(Debug, Clone, PartialEq)]
pub enum TutorReply {
    /// The external model answered
    Answer(String),
    /// Degraded mode; serve the static fallback
    Unavailable,
}

impl TutorReply {
    pub fn text(&self) -> &str {
        match self {
            TutorReply::Answer(text) => text,
            TutorReply::Unavailable => FALLBACK_EXPLANATION,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, TutorReply::Unavailable)
    }
}

#[derive(Clone)]
pub struct TutorClient {
    client: reqwest::Client,
    api_key: String,
    base_url: String,
    model: String,
}

impl TutorClient {
    /// Construct the client if OPENAI_API_KEY is set; otherwise return None.
    pub fn from_env() -> Option<Self> {
        let api_key = std::env::var("OPENAI_API_KEY").ok()?;
        let base_url = std::env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".into());
        let model = std::env::var("OPENAI_MODEL").unwrap_or_else(|_| "gpt-4o-mini".into());

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(20))
            .build()
            .ok()?;

        Some(Self {
            client,
            api_key,
            base_url,
            model,
        })
    }

    /// One chat completion grounded in the level's content
    async fn explain(&self, level: &Level, question: &str) -> Result<String, String> {
        let url = format!("{}/chat/completions", self.base_url);
        let user = format!(
            "Level {} - {} ({})\nDescription: {}\nStarter code:\n{}\n\nStudent question: {}",
            level.level_number,
            level.title,
            level.difficulty.as_str(),
            level.description,
            level.starter_code,
            question,
        );

        let req = ChatCompletionRequest {
            model: self.model.clone(),
            messages: vec![
                ChatMessageReq {
                    role: "system".into(),
                    content: TUTOR_SYSTEM_PROMPT.into(),
                },
                ChatMessageReq {
                    role: "user".into(),
                    content: user,
                },
            ],
            temperature: 0.2,
        };

        let res = self
            .client
            .post(&url)
            .header(USER_AGENT, "pyquest-backend/0.1")
            .header(CONTENT_TYPE, "application/json")
            .header(AUTHORIZATION, format!("Bearer {}", self.api_key))
            .json(&req)
            .send()
            .await
            .map_err(|e| e.to_string())?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            let msg = extract_api_error(&body).unwrap_or(body);
            return Err(format!("tutor HTTP {}: {}", status, msg));
        }

        let body: ChatCompletionResponse = res.json().await.map_err(|e| e.to_string())?;
        let text = body
            .choices
            .first()
            .and_then(|c| c.message.content.clone())
            .unwrap_or_default()
            .trim()
            .to_string();

        Ok(text)
    }
}

/// Ask the tutor about a level. Every failure path degrades to
/// `TutorReply::Unavailable`; this function cannot fail.
pub async fn ask(tutor: Option<&TutorClient>, level: &Level, question: &str) -> TutorReply {
    let Some(client) = tutor else {
        tracing::debug!("tutor not configured; serving fallback");
        return TutorReply::Unavailable;
    };

    match client.explain(level, question).await {
        Ok(text) if !text.is_empty() => TutorReply::Answer(text),
        Ok(_) => {
            tracing::warn!("tutor returned an empty reply");
            TutorReply::Unavailable
        }
        Err(e) => {
            tracing::warn!("tutor call failed: {}", e);
            TutorReply::Unavailable
        }
    }
}

// --- Chat DTOs ---

#[derive(Serialize)]
struct ChatCompletionRequest {
    model: String,
    messages: Vec<ChatMessageReq>,
    temperature: f32,
}

#[derive(Serialize)]
struct ChatMessageReq {
    role: String,
    content: String,
}

#[derive(Deserialize)]
struct ChatCompletionResponse {
    choices: Vec<ChatChoice>,
}

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatMessageResp,
}

#[derive(Deserialize)]
struct ChatMessageResp {
    content: Option<String>,
}

/// Try to extract a clean error message from the provider's error body
fn extract_api_error(body: &str) -> Option<String> {
    #[derive(Deserialize)]
    struct EWrap {
        error: EObj,
    }
    #[derive(Deserialize)]
    struct EObj {
        message: String,
    }
    serde_json::from_str::<EWrap>(body).ok().map(|w| w.error.message)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Difficulty;

    fn sample_level() -> Level {
        Level {
            id: 1,
            level_number: 100,
            title: "Hello".into(),
            description: "d".into(),
            category: "c".into(),
            difficulty: Difficulty::Easy,
            xp_reward: 50,
            starter_code: String::new(),
            expected_output: "Hello, World!".into(),
            hints: vec![],
            prerequisites: vec![],
            is_active: true,
        }
    }

    #[tokio::test]
    async fn missing_client_degrades() {
        let reply = ask(None, &sample_level(), "why?").await;
        assert!(reply.is_degraded());
        assert_eq!(reply.text(), FALLBACK_EXPLANATION);
    }

    #[tokio::test]
    async fn unreachable_endpoint_degrades() {
        let client = TutorClient {
            client: reqwest::Client::builder()
                .timeout(Duration::from_millis(200))
                .build()
                .unwrap(),
            api_key: "test".into(),
            base_url: "http://127.0.0.1:1/v1".into(),
            model: "gpt-4o-mini".into(),
        };
        let reply = ask(Some(&client), &sample_level(), "why?").await;
        assert!(reply.is_degraded());
    }

    #[test]
    fn error_body_extraction() {
        let body = r#"{"error": {"message": "invalid key", "type": "auth"}}"#;
        assert_eq!(extract_api_error(body).as_deref(), Some("invalid key"));
        assert_eq!(extract_api_error("not json"), None);
    }
}
