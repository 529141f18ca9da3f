use reqwest::Client;
use serde::{Deserialize, Serialize};
use tracing::warn;

use compass_db::models::Essay;

#[derive(Debug, Clone)]
pub struct CritiqueService {
    client: Client,
    api_key: Option<String>,
    model: String,
    max_tokens: u32,
}

#[derive(Debug, Serialize)]
struct ClaudeRequest {
    model: String,
    max_tokens: u32,
    messages: Vec<ClaudeMessage>,
}

#[derive(Debug, Serialize)]
struct ClaudeMessage {
    role: String,
    content: String,
}

#[derive(Debug, Deserialize)]
struct ClaudeResponse {
    content: Vec<ContentBlock>,
}

#[derive(Debug, Deserialize)]
struct ContentBlock {
    text: Option<String>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CritiqueResult {
    pub summary: String,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub word_count: usize,
    /// 0.0-1.0 overall impression.
    pub score: f64,
    pub source: CritiqueSource,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CritiqueSource {
    Model,
    Heuristic,
}

impl CritiqueService {
    pub fn new(api_key: Option<String>, model: String, max_tokens: u32) -> Self {
        Self {
            client: Client::new(),
            api_key,
            model,
            max_tokens,
        }
    }

    pub fn is_available(&self) -> bool {
        self.api_key.is_some()
    }

    /// Critique an essay draft. Uses the Claude API when a key is
    /// configured and falls back to local heuristics when the key is
    /// missing or the remote call fails, so the endpoint always answers.
    pub async fn critique(&self, essay: &Essay) -> CritiqueResult {
        if let Some(api_key) = self.api_key.clone() {
            match self.critique_remote(&api_key, essay).await {
                Ok(result) => return result,
                Err(err) => {
                    warn!(error = %err, essay = ?essay.id, "Essay critique fell back to heuristics");
                }
            }
        }
        heuristic_critique(essay)
    }

    async fn critique_remote(
        &self,
        api_key: &str,
        essay: &Essay,
    ) -> Result<CritiqueResult, String> {
        let prompt_context = essay
            .prompt
            .as_deref()
            .map(|p| format!("The essay responds to this prompt: {p}\n\n"))
            .unwrap_or_default();
        let limit_context = essay
            .word_limit
            .map(|l| format!("The word limit is {l} words.\n\n"))
            .unwrap_or_default();

        let request = ClaudeRequest {
            model: self.model.clone(),
            max_tokens: self.max_tokens,
            messages: vec![ClaudeMessage {
                role: "user".to_string(),
                content: format!(
                    concat!(
                        "You are reviewing a college application essay draft. ",
                        "{}{}Essay:\n\n{}\n\n",
                        "Return a JSON object with these fields:\n",
                        "- \"summary\": two-sentence overall assessment\n",
                        "- \"strengths\": array of short strings\n",
                        "- \"improvements\": array of short, actionable strings\n",
                        "- \"score\": 0.0-1.0 overall impression\n",
                        "Return ONLY the JSON, no markdown fences."
                    ),
                    prompt_context, limit_context, essay.content
                ),
            }],
        };

        let response = self
            .client
            .post("https://api.anthropic.com/v1/messages")
            .header("x-api-key", api_key)
            .header("anthropic-version", "2023-06-01")
            .header("content-type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| format!("Claude API request failed: {}", e))?;

        if !response.status().is_success() {
            let status = response.status();
            let body = response.text().await.unwrap_or_default();
            return Err(format!("Claude API error {}: {}", status, body));
        }

        let claude_resp: ClaudeResponse = response
            .json()
            .await
            .map_err(|e| format!("Failed to parse Claude response: {}", e))?;

        let text = claude_resp
            .content
            .first()
            .and_then(|c| c.text.as_ref())
            .ok_or_else(|| "No text in Claude response".to_string())?;

        let json: serde_json::Value =
            serde_json::from_str(text).map_err(|e| format!("Critique was not valid JSON: {}", e))?;

        Ok(CritiqueResult {
            summary: json["summary"].as_str().unwrap_or("").to_string(),
            strengths: string_array(&json["strengths"]),
            improvements: string_array(&json["improvements"]),
            word_count: word_count(&essay.content),
            score: json["score"].as_f64().unwrap_or(0.5).clamp(0.0, 1.0),
            source: CritiqueSource::Model,
        })
    }
}

fn string_array(value: &serde_json::Value) -> Vec<String> {
    value
        .as_array()
        .map(|items| {
            items
                .iter()
                .filter_map(|v| v.as_str())
                .map(|s| s.to_string())
                .collect()
        })
        .unwrap_or_default()
}

fn word_count(content: &str) -> usize {
    content.split_whitespace().count()
}

const WEAK_PHRASES: &[&str] = &[
    "in today's society",
    "since the dawn of time",
    "throughout history",
    "webster's dictionary defines",
    "i have always wanted",
    "very unique",
];

/// Deterministic local critique used when the model is unavailable.
pub fn heuristic_critique(essay: &Essay) -> CritiqueResult {
    let content = essay.content.trim();
    let words = word_count(content);
    let lower = content.to_lowercase();

    let mut strengths = Vec::new();
    let mut improvements = Vec::new();
    let mut score: f64 = 0.7;

    if words == 0 {
        return CritiqueResult {
            summary: "The draft is empty; there is nothing to assess yet.".to_string(),
            strengths: Vec::new(),
            improvements: vec!["Write a first draft before requesting a critique.".to_string()],
            word_count: 0,
            score: 0.0,
            source: CritiqueSource::Heuristic,
        };
    }

    match essay.word_limit {
        Some(limit) if words > limit as usize => {
            improvements.push(format!(
                "The draft runs {} words over the {} word limit; cut before polishing.",
                words - limit as usize,
                limit
            ));
            score -= 0.2;
        }
        Some(limit) if words * 2 < limit as usize => {
            improvements.push(format!(
                "At {} words the draft uses less than half of the {} word limit; there is room to develop the story.",
                words, limit
            ));
            score -= 0.1;
        }
        Some(_) => {
            strengths.push("Length sits comfortably within the word limit.".to_string());
        }
        None => {}
    }

    let sentences = content
        .split(['.', '!', '?'])
        .filter(|s| !s.trim().is_empty())
        .count()
        .max(1);
    let avg_sentence_len = words / sentences;
    if avg_sentence_len > 30 {
        improvements.push(format!(
            "Sentences average {} words; breaking the longest ones up would help readability.",
            avg_sentence_len
        ));
        score -= 0.1;
    } else {
        strengths.push("Sentence length is varied and readable.".to_string());
    }

    let paragraphs = content.split("\n\n").filter(|p| !p.trim().is_empty()).count();
    if paragraphs < 2 && words > 150 {
        improvements.push("The draft reads as a single block; paragraph breaks would give it structure.".to_string());
        score -= 0.1;
    }

    for phrase in WEAK_PHRASES {
        if lower.contains(phrase) {
            improvements.push(format!(
                "The phrase \"{}\" is a common opener in application essays; a concrete personal detail would land better.",
                phrase
            ));
            score -= 0.05;
        }
    }

    if improvements.is_empty() {
        strengths.push("No structural red flags; the next step is line-level editing.".to_string());
    }

    CritiqueResult {
        summary: format!(
            "Automated review of a {} word draft across {} paragraph(s): {} strength(s), {} suggested improvement(s).",
            words,
            paragraphs.max(1),
            strengths.len(),
            improvements.len()
        ),
        strengths,
        improvements,
        word_count: words,
        score: score.clamp(0.0, 1.0),
        source: CritiqueSource::Heuristic,
    }
}
