use anyhow::{anyhow, bail, Context, Result};
use rand::{thread_rng, Rng};
use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use std::time::Duration;

use crate::config::EffectiveSettings;

pub const CLEAN_IDEA_SYSTEM_PROMPT: &str = "You are an AI assistant that helps clean and format web app ideas. Your task is to improve the given text to make it clearer, more concise, and better structured, while preserving all the original intent. Format the output as markdown.";

#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub temperature: Option<f32>,
    pub max_tokens: Option<u32>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChatMessage {
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self { role: "system".into(), content: content.into() }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self { role: "user".into(), content: content.into() }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LlmResponse {
    pub content: String,
    pub usage: Option<Usage>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Usage {
    pub prompt_tokens: Option<u32>,
    pub completion_tokens: Option<u32>,
    pub total_tokens: Option<u32>,
}

pub struct LlmClient {
    http: Client,
    api_base: String,
    api_key: Option<String>,
}

impl LlmClient {
    pub fn new_with_timeout(api_base: &str, api_key: Option<String>, timeout: Duration) -> Result<Self> {
        let http = Client::builder().timeout(timeout).build()?;
        Ok(Self { http, api_base: api_base.trim_end_matches('/').to_string(), api_key })
    }

    fn requires_key(&self) -> bool {
        !(self.api_base.contains("127.0.0.1") || self.api_base.contains("localhost"))
    }

    pub async fn send_openai(&self, req: LlmRequest) -> Result<LlmResponse> {
        if self.requires_key() && self.api_key.is_none() {
            return Err(anyhow!("missing API key for base {}", self.api_base)).context("missing OPENAI_API_KEY");
        }
        let url = format!("{}/chat/completions", self.api_base);

        #[derive(Serialize)]
        struct OpenAiRequest<'a> {
            model: &'a str,
            messages: &'a [ChatMessage],
            #[serde(skip_serializing_if = "Option::is_none")]
            temperature: Option<f32>,
            #[serde(skip_serializing_if = "Option::is_none")]
            max_tokens: Option<u32>,
        }

        #[derive(Deserialize)]
        struct OpenAiChoiceMessage {
            content: Option<String>,
        }

        #[derive(Deserialize)]
        struct OpenAiChoice {
            message: Option<OpenAiChoiceMessage>,
        }

        #[derive(Deserialize)]
        struct OpenAiResponse {
            choices: Vec<OpenAiChoice>,
            usage: Option<Usage>,
        }

        let body = OpenAiRequest {
            model: &req.model,
            messages: &req.messages,
            temperature: req.temperature,
            max_tokens: req.max_tokens,
        };

        tracing::debug!(url = %url, model = %req.model, "sending chat completion");
        let res = with_retries(|| async {
            let mut rb = self.http.post(&url).json(&body);
            if let Some(key) = self.api_key.as_ref() { rb = rb.bearer_auth(key); }
            let resp = rb.send().await?;
            Ok::<_, anyhow::Error>(resp)
        }).await?;
        if res.status() != StatusCode::OK {
            let status = res.status();
            let text = res.text().await.unwrap_or_default();
            bail!("API request failed with status {}: {}", status, text);
        }
        let parsed: OpenAiResponse = res.json().await.context("failed to parse chat completion response")?;
        let content = parsed
            .choices
            .first()
            .and_then(|c| c.message.as_ref())
            .and_then(|m| m.content.clone())
            .unwrap_or_default();
        Ok(LlmResponse { content, usage: parsed.usage })
    }
}

pub async fn with_retries<F, Fut, T>(mut f: F) -> Result<T>
where
    F: FnMut() -> Fut,
    Fut: std::future::Future<Output = Result<T, anyhow::Error>>,
{
    let mut attempt = 0u32;
    let max_retries = 3u32;
    loop {
        match f().await {
            Ok(v) => return Ok(v),
            Err(e) => {
                attempt += 1;
                if attempt > max_retries {
                    return Err(e).context("request failed after retries");
                }
                let backoff_ms = (2u64.pow(attempt) * 100) + thread_rng().gen_range(0..100);
                tracing::warn!(attempt, backoff_ms, "request failed, retrying: {e}");
                tokio::time::sleep(Duration::from_millis(backoff_ms)).await;
            }
        }
    }
}

#[async_trait::async_trait]
pub trait ModelProviderAdapter: Send + Sync {
    async fn send(&self, req: LlmRequest) -> Result<LlmResponse>;
}

pub struct OpenAiAdapter {
    client: LlmClient,
}

impl OpenAiAdapter {
    pub fn new(settings: &EffectiveSettings, timeout: Duration) -> Result<Self> {
        Ok(Self { client: LlmClient::new_with_timeout(&settings.api_base, settings.api_key.clone(), timeout)? })
    }
}

#[async_trait::async_trait]
impl ModelProviderAdapter for OpenAiAdapter {
    async fn send(&self, req: LlmRequest) -> Result<LlmResponse> { self.client.send_openai(req).await }
}

/// Offline provider: echoes the last user message back, tidied.
pub struct MockAdapter;

#[async_trait::async_trait]
impl ModelProviderAdapter for MockAdapter {
    async fn send(&self, req: LlmRequest) -> Result<LlmResponse> {
        let last = req.messages.iter().rev().find(|m| m.role == "user").map(|m| m.content.as_str()).unwrap_or("");
        let body = last.rsplit("\n\n").next().unwrap_or(last).trim();
        Ok(LlmResponse { content: format!("[mock] {}", body), usage: None })
    }
}

pub fn adapter_for(settings: &EffectiveSettings, timeout: Duration) -> Result<Box<dyn ModelProviderAdapter>> {
    match settings.provider.to_lowercase().as_str() {
        "openai" => Ok(Box::new(OpenAiAdapter::new(settings, timeout)?)),
        "mock" => Ok(Box::new(MockAdapter)),
        other => bail!("unsupported provider: {}", other),
    }
}

/// Ask the model to tidy up a raw project idea.
pub async fn clean_idea(adapter: &dyn ModelProviderAdapter, model: &str, idea: &str) -> Result<String> {
    if idea.trim().is_empty() {
        bail!("empty idea; set one with `pw state set idea ...`");
    }
    let req = LlmRequest {
        model: model.to_string(),
        messages: vec![
            ChatMessage::system(CLEAN_IDEA_SYSTEM_PROMPT),
            ChatMessage::user(format!("Please clean and format the following web app idea:\n\n{}", idea)),
        ],
        temperature: Some(0.7),
        max_tokens: Some(1000),
    };
    let res = adapter.send(req).await?;
    Ok(res.content.trim().to_string())
}

// Credential check used by `pw init --validate`
pub async fn validate_provider_credentials(settings: &EffectiveSettings, timeout: Duration) -> Result<()> {
    if settings.provider.eq_ignore_ascii_case("mock") {
        return Ok(());
    }
    let client = LlmClient::new_with_timeout(&settings.api_base, settings.api_key.clone(), timeout)?;
    if client.requires_key() && client.api_key.as_deref().is_none_or(|k| k.trim().is_empty()) {
        bail!("missing OPENAI_API_KEY for {}", settings.provider);
    }
    // Use a cheap GET to models endpoint
    let url = format!("{}/models", client.api_base);
    let mut rb = client.http.get(&url);
    if let Some(key) = client.api_key.as_ref() { rb = rb.bearer_auth(key); }
    let resp = rb.send().await?;
    if !resp.status().is_success() {
        let status = resp.status();
        let text = resp.text().await.unwrap_or_default();
        bail!("credential validation failed {}: {}", status, text);
    }
    Ok(())
}
