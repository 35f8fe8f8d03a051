//! HTTP judge over an OpenAI-compatible chat-completions API
//!
//! - One user message per request; no conversation state
//! - Blocking requests with a per-request timeout
//! - Retries with exponential backoff on transport errors, 429 and 5xx;
//!   other 4xx responses fail immediately

use std::time::{Duration, Instant};

use serde_json::Value;

use super::{Judge, JudgeError, JudgeVerdict};
use crate::config::JudgeConfig;

/// First retry waits this long; each further retry doubles it
pub const DEFAULT_BACKOFF: Duration = Duration::from_millis(500);

pub struct HttpJudge {
    config: JudgeConfig,
    api_key: String,
    agent: ureq::Agent,
    backoff: Duration,
    user_agent: String,
}

impl HttpJudge {
    /// Build a judge, reading the API key from the environment.
    pub fn new(config: JudgeConfig) -> Result<Self, JudgeError> {
        let api_key = config.api_key().ok_or_else(|| JudgeError::MissingApiKey {
            var: config.api_key_env.clone(),
        })?;
        Ok(Self::with_api_key(config, api_key))
    }

    pub fn with_api_key(config: JudgeConfig, api_key: impl Into<String>) -> Self {
        let agent = ureq::AgentBuilder::new()
            .timeout(Duration::from_secs(config.timeout_seconds))
            .build();
        let user_agent = format!("citeval/{} ({})", env!("CARGO_PKG_VERSION"), std::env::consts::OS);

        Self {
            config,
            api_key: api_key.into(),
            agent,
            backoff: DEFAULT_BACKOFF,
            user_agent,
        }
    }

    /// Override the base retry delay.
    pub fn with_backoff(mut self, backoff: Duration) -> Self {
        self.backoff = backoff;
        self
    }

    fn request_body(&self, prompt: &str) -> Value {
        let mut body = serde_json::json!({
            "model": self.config.model,
            "messages": [
                {
                    "role": "user",
                    "content": prompt
                }
            ],
        });
        if let Some(temperature) = self.config.temperature {
            body["temperature"] = serde_json::json!(temperature);
        }
        body
    }

    /// One request, no retries.
    pub fn request_once(&self, prompt: &str) -> Result<JudgeVerdict, JudgeError> {
        let response = self
            .agent
            .post(&self.config.endpoint())
            .set("Authorization", &format!("Bearer {}", self.api_key))
            .set("User-Agent", &self.user_agent)
            .send_json(self.request_body(prompt));

        match response {
            Ok(res) => {
                let json: Value = res
                    .into_json()
                    .map_err(|e| JudgeError::MalformedResponse(format!("body is not JSON: {e}")))?;
                parse_completion(&json)
            }
            Err(ureq::Error::Status(code, res)) => {
                let body = res.into_string().unwrap_or_default();
                Err(JudgeError::Status { code, body })
            }
            Err(ureq::Error::Transport(e)) => Err(JudgeError::Transport(e.to_string())),
        }
    }
}

impl Judge for HttpJudge {
    fn judge(&self, prompt: &str) -> Result<JudgeVerdict, JudgeError> {
        let mut attempt = 0u32;
        loop {
            let start = Instant::now();
            match self.request_once(prompt) {
                Ok(verdict) => {
                    tracing::debug!(attempt, elapsed = ?start.elapsed(), "judge_call");
                    return Ok(verdict);
                }
                Err(e) if e.is_retryable() && attempt < self.config.max_retries => {
                    attempt += 1;
                    let delay = backoff_delay(self.backoff, attempt);
                    tracing::warn!(attempt, error = %e, delay = ?delay, "judge call failed, retrying");
                    std::thread::sleep(delay);
                }
                Err(e) => return Err(e),
            }
        }
    }
}

/// Delay before retry number `attempt` (1-based): `base * 2^(attempt-1)`, saturating.
pub fn backoff_delay(base: Duration, attempt: u32) -> Duration {
    base.saturating_mul(2_u32.saturating_pow(attempt.saturating_sub(1)))
}

/// Extract content and optional reasoning from a chat-completions response.
pub fn parse_completion(json: &Value) -> Result<JudgeVerdict, JudgeError> {
    let message = json
        .get("choices")
        .and_then(|c| c.as_array())
        .and_then(|arr| arr.first())
        .and_then(|c| c.get("message"))
        .ok_or_else(|| JudgeError::MalformedResponse("missing choices[0].message".to_string()))?;

    let verdict = message
        .get("content")
        .and_then(|c| c.as_str())
        .ok_or_else(|| JudgeError::MalformedResponse("missing message content".to_string()))?;

    let reasoning = message
        .get("reasoning_content")
        .and_then(|r| r.as_str())
        .unwrap_or_default();

    Ok(JudgeVerdict {
        reasoning: reasoning.to_string(),
        verdict: verdict.to_string(),
    })
}
