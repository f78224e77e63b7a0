use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::{
    config::Config,
    entities::{ChatMessage, ChatRole},
    error::{upstream_error, Error},
    external::ChatModel,
};

const API_BASE: &str = "https://generativelanguage.googleapis.com/v1beta";

pub struct Gemini {
    client: reqwest::Client,
    api_key: String,
    model: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GenerateContentRequest<'a> {
    system_instruction: Content<'a>,
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<&'a str>,
    parts: Vec<Part<'a>>,
}

#[derive(Debug, Serialize)]
struct Part<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateContentResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<CandidatePart>,
}

#[derive(Debug, Deserialize)]
struct CandidatePart {
    text: Option<String>,
}

impl Gemini {
    /// `None` when no API key is configured.
    pub fn from_config(config: &Config) -> Result<Option<Self>, Error> {
        let api_key = match &config.gemini_api_key {
            Some(key) => key.clone(),
            None => return Ok(None),
        };

        let client = reqwest::Client::builder()
            .timeout(config.provider_timeout)
            .build()?;

        Ok(Some(Self {
            client,
            api_key,
            model: config.gemini_model.clone(),
        }))
    }
}

fn request<'a>(system_prompt: &'a str, history: &'a [ChatMessage]) -> GenerateContentRequest<'a> {
    let contents = history
        .iter()
        .map(|message| Content {
            role: Some(match message.role {
                ChatRole::User => "user",
                ChatRole::Model => "model",
            }),
            parts: vec![Part {
                text: &message.text,
            }],
        })
        .collect();

    GenerateContentRequest {
        system_instruction: Content {
            role: None,
            parts: vec![Part {
                text: system_prompt,
            }],
        },
        contents,
    }
}

/// Joins the text parts of the first candidate; empty when the model said nothing.
fn reply_text(data: GenerateContentResponse) -> String {
    data.candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| {
            content
                .parts
                .into_iter()
                .filter_map(|part| part.text)
                .collect::<Vec<_>>()
                .join("")
        })
        .unwrap_or_default()
}

#[async_trait]
impl ChatModel for Gemini {
    #[tracing::instrument(skip_all, fields(turns = history.len()))]
    async fn reply(&self, system_prompt: &str, history: &[ChatMessage]) -> Result<String, Error> {
        let url = format!("{}/models/{}:generateContent", API_BASE, self.model);

        let res = self
            .client
            .post(url)
            .header("x-goog-api-key", self.api_key.as_str())
            .json(&request(system_prompt, history))
            .send()
            .await?;

        if !res.status().is_success() {
            tracing::warn!("gemini returned status {}", res.status());
            return Err(upstream_error());
        }

        let data: GenerateContentResponse = res.json().await?;

        Ok(reply_text(data))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn request_carries_system_prompt_and_history() {
        let history = vec![
            ChatMessage::user("Do you have an SUV?"),
            ChatMessage::model("Yes, the Toyota Innova."),
            ChatMessage::user("How many seats?"),
        ];

        let body = serde_json::to_value(request("You are helpful.", &history)).unwrap();

        assert_eq!(body["systemInstruction"]["parts"][0]["text"], "You are helpful.");
        assert!(body["systemInstruction"].get("role").is_none());
        assert_eq!(body["contents"][1]["role"], "model");
        assert_eq!(body["contents"][2]["parts"][0]["text"], "How many seats?");
    }

    #[test]
    fn reply_joins_text_parts() {
        let data: GenerateContentResponse = serde_json::from_value(json!({
            "candidates": [{
                "content": { "role": "model", "parts": [{ "text": "Seven " }, { "text": "seats." }] }
            }]
        }))
        .unwrap();

        assert_eq!(reply_text(data), "Seven seats.");
    }

    #[test]
    fn blocked_reply_is_empty() {
        let data: GenerateContentResponse =
            serde_json::from_value(json!({ "promptFeedback": { "blockReason": "SAFETY" } }))
                .unwrap();

        assert_eq!(reply_text(data), "");
    }

    #[test]
    fn absent_key_disables_chat() {
        assert!(Gemini::from_config(&Config::for_tests()).unwrap().is_none());
    }
}
