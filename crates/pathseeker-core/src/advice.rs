//! Optional LLM-backed advice assistant. The call is best-effort and fails
//! closed: a missing key, an upstream rejection or a timeout all turn into
//! a descriptive fallback string, never an error surfaced to the caller and
//! never an unbounded wait.

use std::time::Duration;

use serde_json::json;
use tracing::warn;

use crate::error::{CoreError, CoreResult};

const SYSTEM_INSTRUCTION: &str = "\
You are a helpful and knowledgeable Career & Education Assistant on the Pathseeker platform.
Your goal is to help students with questions specifically related to:
1. Higher education and college searches.
2. Career paths and professional development.
3. Skill-building and learning resources.
4. Resume tips and interview preparation.

LIMITATION: You MUST NOT answer questions unrelated to education, careers, or professional growth.
If a user asks about anything else, politely decline and remind them that you are here specifically
to assist with their career and education journey.

Be encouraging, professional, and concise.";

pub const CONFIG_FALLBACK: &str =
    "The advice assistant is not configured yet. Ask the administrator to set GEMINI_API_KEY.";
pub const KEY_REJECTED_FALLBACK: &str =
    "The advice service rejected the configured API key. Please check GEMINI_API_KEY.";
pub const BACKEND_FALLBACK: &str =
    "I'm having trouble connecting to the advice service right now. Please try again later.";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(15);
const DEFAULT_ENDPOINT: &str =
    "https://generativelanguage.googleapis.com/v1beta/models/gemini-2.0-flash:generateContent";

pub struct AdviceClient {
    http: reqwest::Client,
    api_key: Option<String>,
    endpoint: String,
}

impl AdviceClient {
    /// Reads `GEMINI_API_KEY`; a blank or placeholder value counts as
    /// unconfigured rather than an error.
    pub fn from_env() -> anyhow::Result<Self> {
        let key = std::env::var("GEMINI_API_KEY")
            .ok()
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty() && !k.contains("PASTE_YOUR"));
        Self::new(key)
    }

    pub fn new(api_key: Option<String>) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder().timeout(REQUEST_TIMEOUT).build()?;
        Ok(Self {
            http,
            api_key,
            endpoint: DEFAULT_ENDPOINT.to_string(),
        })
    }

    /// Answer a career question, or explain why we can't. Always returns a
    /// string; the taxonomy's `Unavailable` never escapes this boundary.
    pub async fn advise(&self, prompt: &str) -> String {
        match self.try_advise(prompt).await {
            Ok(text) => text,
            Err(CoreError::Unavailable(msg)) => msg,
            Err(e) => {
                warn!("Advice backend error: {}", e);
                BACKEND_FALLBACK.to_string()
            }
        }
    }

    async fn try_advise(&self, prompt: &str) -> CoreResult<String> {
        let key = self
            .api_key
            .as_deref()
            .ok_or_else(|| CoreError::Unavailable(CONFIG_FALLBACK.to_string()))?;

        let body = json!({
            "contents": [{
                "parts": [{
                    "text": format!("{}\n\nUser Question: {}", SYSTEM_INSTRUCTION, prompt)
                }]
            }]
        });

        let resp = self
            .http
            .post(&self.endpoint)
            .query(&[("key", key)])
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                warn!("Advice request failed: {}", e);
                CoreError::Unavailable(BACKEND_FALLBACK.to_string())
            })?;

        let status = resp.status();
        if status == reqwest::StatusCode::BAD_REQUEST || status == reqwest::StatusCode::FORBIDDEN {
            return Err(CoreError::Unavailable(KEY_REJECTED_FALLBACK.to_string()));
        }
        if !status.is_success() {
            warn!("Advice backend returned {}", status);
            return Err(CoreError::Unavailable(BACKEND_FALLBACK.to_string()));
        }

        let payload: serde_json::Value = resp.json().await.map_err(|e| {
            warn!("Advice response unreadable: {}", e);
            CoreError::Unavailable(BACKEND_FALLBACK.to_string())
        })?;

        payload["candidates"][0]["content"]["parts"][0]["text"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| {
                warn!("Advice backend returned no candidate text");
                CoreError::Unavailable(BACKEND_FALLBACK.to_string())
            })
    }
}
