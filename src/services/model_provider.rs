use async_trait::async_trait;
use reqwest::Client;
use serde_json::Value as JsonValue;
use std::sync::Arc;
use std::time::Duration;

const GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta/models";
const GEMINI_MODEL: &str = "gemini-2.5-flash";
const MISTRAL_BASE_URL: &str = "https://api.mistral.ai/v1";
const MISTRAL_MODEL: &str = "mistral-small";

const REQUEST_TIMEOUT: Duration = Duration::from_secs(120);

/// Network or HTTP failure talking to an LLM backend. Never propagated
/// past the generation/evaluation services as a hard failure; they
/// degrade the enclosing operation instead.
#[derive(Debug, thiserror::Error)]
pub enum ProviderError {
    #[error("provider request failed: {0}")]
    Network(#[from] reqwest::Error),

    #[error("provider returned HTTP {status}: {body}")]
    Http {
        status: reqwest::StatusCode,
        body: String,
    },

    #[error("provider response carried no text content")]
    EmptyResponse,
}

/// Uniform interface to one LLM backend. At most one network call per
/// invocation; no internal retries.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ModelProvider: Send + Sync {
    fn name(&self) -> &str;

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError>;
}

pub struct GeminiProvider {
    client: Client,
    api_key: String,
}

impl GeminiProvider {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ModelProvider for GeminiProvider {
    fn name(&self) -> &str {
        "Gemini"
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let url = format!(
            "{}/{}:generateContent?key={}",
            GEMINI_BASE_URL, GEMINI_MODEL, self.api_key
        );
        let payload = serde_json::json!({
            "contents": [{ "parts": [{ "text": prompt }] }],
            "generationConfig": {
                "maxOutputTokens": max_tokens,
                "temperature": temperature
            }
        });

        let res = self
            .client
            .post(&url)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Http { status, body });
        }

        let body: JsonValue = res.json().await?;
        body.get("candidates")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("content"))
            .and_then(|c| c.get("parts"))
            .and_then(|p| p.get(0))
            .and_then(|p| p.get("text"))
            .and_then(|t| t.as_str())
            .map(|s| s.to_string())
            .ok_or(ProviderError::EmptyResponse)
    }
}

pub struct MistralProvider {
    client: Client,
    api_key: String,
}

impl MistralProvider {
    pub fn new(api_key: String, client: Client) -> Self {
        Self { client, api_key }
    }
}

#[async_trait]
impl ModelProvider for MistralProvider {
    fn name(&self) -> &str {
        "Mistral"
    }

    async fn generate(
        &self,
        prompt: &str,
        max_tokens: u32,
        temperature: f32,
    ) -> Result<String, ProviderError> {
        let payload = serde_json::json!({
            "model": MISTRAL_MODEL,
            "messages": [{ "role": "user", "content": prompt }],
            "max_tokens": max_tokens,
            "temperature": temperature
        });

        let res = self
            .client
            .post(format!("{}/chat/completions", MISTRAL_BASE_URL))
            .bearer_auth(&self.api_key)
            .json(&payload)
            .timeout(REQUEST_TIMEOUT)
            .send()
            .await?;

        if !res.status().is_success() {
            let status = res.status();
            let body = res.text().await.unwrap_or_default();
            return Err(ProviderError::Http { status, body });
        }

        let body: JsonValue = res.json().await?;
        body.get("choices")
            .and_then(|c| c.get(0))
            .and_then(|c| c.get("message"))
            .and_then(|m| m.get("content"))
            .and_then(|c| c.as_str())
            .map(|s| s.to_string())
            .ok_or(ProviderError::EmptyResponse)
    }
}

/// Holds every provider that has credentials, in fallback order.
///
/// `select` returns the preferred provider when it is configured,
/// otherwise the first configured one. An empty registry yields `None`:
/// "no provider available" is a value callers plan around, not an error.
#[derive(Clone)]
pub struct ProviderRegistry {
    providers: Vec<Arc<dyn ModelProvider>>,
}

impl ProviderRegistry {
    pub fn new(providers: Vec<Arc<dyn ModelProvider>>) -> Self {
        Self { providers }
    }

    pub fn from_config(config: &crate::config::Config, client: Client) -> Self {
        let mut providers: Vec<Arc<dyn ModelProvider>> = Vec::new();
        if let Some(key) = &config.gemini_api_key {
            providers.push(Arc::new(GeminiProvider::new(key.clone(), client.clone())));
        }
        if let Some(key) = &config.mistral_api_key {
            providers.push(Arc::new(MistralProvider::new(key.clone(), client)));
        }
        Self { providers }
    }

    pub fn select(&self, preferred: &str) -> Option<Arc<dyn ModelProvider>> {
        self.providers
            .iter()
            .find(|p| p.name().eq_ignore_ascii_case(preferred))
            .or_else(|| self.providers.first())
            .cloned()
    }

    pub fn names(&self) -> Vec<&str> {
        self.providers.iter().map(|p| p.name()).collect()
    }

    pub fn is_empty(&self) -> bool {
        self.providers.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    struct NamedStub(&'static str);

    #[async_trait]
    impl ModelProvider for NamedStub {
        fn name(&self) -> &str {
            self.0
        }

        async fn generate(
            &self,
            _prompt: &str,
            _max_tokens: u32,
            _temperature: f32,
        ) -> Result<String, ProviderError> {
            Ok(String::new())
        }
    }

    #[test]
    fn select_prefers_named_provider() {
        let registry =
            ProviderRegistry::new(vec![Arc::new(NamedStub("Gemini")), Arc::new(NamedStub("Mistral"))]);
        assert_eq!(registry.select("Mistral").unwrap().name(), "Mistral");
        assert_eq!(registry.select("gemini").unwrap().name(), "Gemini");
    }

    #[test]
    fn select_falls_back_to_first_configured() {
        let registry = ProviderRegistry::new(vec![Arc::new(NamedStub("Mistral"))]);
        assert_eq!(registry.select("Gemini").unwrap().name(), "Mistral");
    }

    #[test]
    fn empty_registry_selects_nothing() {
        let registry = ProviderRegistry::new(vec![]);
        assert!(registry.select("Gemini").is_none());
        assert!(registry.is_empty());
    }
}
