//! Summarization Backends
//!
//! Defines the backend trait and implementations for different model hosts.

use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;

use super::types::{BackendKind, GenerationParams, SummarizeError, SummaryCandidate};
use crate::config::SummarizerConfig;

/// Summarization backend trait
#[async_trait]
pub trait SummarizationBackend: Send + Sync {
    /// Get the backend type
    fn kind(&self) -> BackendKind;

    /// Model identifier used for requests
    fn model(&self) -> &str;

    /// Check if the backend is reachable
    async fn is_available(&self) -> bool;

    /// Summarize text, returning candidates in the model's order
    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<Vec<SummaryCandidate>, SummarizeError>;
}

/// Build the configured backend
///
/// The backend (and its HTTP client) is built once and shared by every
/// request and background task.
pub fn build_backend(
    config: &SummarizerConfig,
) -> Result<Arc<dyn SummarizationBackend>, SummarizeError> {
    let timeout = Duration::from_secs(config.timeout_secs);
    let backend: Arc<dyn SummarizationBackend> = match config.provider {
        BackendKind::HuggingFace => Arc::new(HuggingFaceBackend::new(
            &config.url,
            &config.model,
            config.api_token.clone(),
            timeout,
        )?),
        BackendKind::Ollama => Arc::new(OllamaBackend::new(&config.url, &config.model, timeout)?),
    };
    Ok(backend)
}

fn http_client(timeout: Duration) -> Result<reqwest::Client, SummarizeError> {
    reqwest::Client::builder()
        .timeout(timeout)
        .build()
        .map_err(|e| SummarizeError::Unavailable(format!("Failed to build HTTP client: {}", e)))
}

/// Hugging Face inference API backend
///
/// Works against the hosted inference API and any server exposing the same
/// `POST /models/{model}` summarization contract.
pub struct HuggingFaceBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
    api_token: Option<String>,
}

impl HuggingFaceBackend {
    pub fn new(
        base_url: &str,
        model: &str,
        api_token: Option<String>,
        timeout: Duration,
    ) -> Result<Self, SummarizeError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
            api_token,
        })
    }

    fn model_url(&self) -> String {
        format!("{}/models/{}", self.base_url, self.model)
    }

    fn authorize(&self, request: reqwest::RequestBuilder) -> reqwest::RequestBuilder {
        match &self.api_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }
}

#[async_trait]
impl SummarizationBackend for HuggingFaceBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::HuggingFace
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        let request = self.authorize(self.client.get(self.model_url()));
        match request.send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<Vec<SummaryCandidate>, SummarizeError> {
        let body = serde_json::json!({
            "inputs": text,
            "parameters": {
                "min_length": params.min_length,
                "max_length": params.max_length,
                "do_sample": params.do_sample,
            },
            "options": { "wait_for_model": true }
        });

        let response = self
            .authorize(self.client.post(self.model_url()))
            .json(&body)
            .send()
            .await
            .map_err(|e| SummarizeError::Request(e.to_string()))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api { status, body });
        }

        response
            .json::<Vec<SummaryCandidate>>()
            .await
            .map_err(|e| SummarizeError::InvalidResponse(e.to_string()))
    }
}

/// Ollama backend
///
/// Prompts a local chat model to summarize. Length bounds are given as a
/// prompt hint and an output token cap; sampling is disabled via
/// temperature 0.
pub struct OllamaBackend {
    client: reqwest::Client,
    base_url: String,
    model: String,
}

impl OllamaBackend {
    pub fn new(base_url: &str, model: &str, timeout: Duration) -> Result<Self, SummarizeError> {
        Ok(Self {
            client: http_client(timeout)?,
            base_url: base_url.trim_end_matches('/').to_string(),
            model: model.to_string(),
        })
    }

    fn prompt(text: &str, params: &GenerationParams) -> String {
        format!(
            "Summarize the following text in {} to {} words. Return only the summary, nothing else.\n\n{}",
            params.min_length, params.max_length, text
        )
    }
}

#[async_trait]
impl SummarizationBackend for OllamaBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::Ollama
    }

    fn model(&self) -> &str {
        &self.model
    }

    async fn is_available(&self) -> bool {
        let url = format!("{}/api/tags", self.base_url);
        match self.client.get(&url).send().await {
            Ok(response) => response.status().is_success(),
            Err(_) => false,
        }
    }

    async fn summarize(
        &self,
        text: &str,
        params: &GenerationParams,
    ) -> Result<Vec<SummaryCandidate>, SummarizeError> {
        let url = format!("{}/api/generate", self.base_url);
        let temperature = if params.do_sample { 0.8 } else { 0.0 };

        let request = serde_json::json!({
            "model": self.model,
            "prompt": Self::prompt(text, params),
            "stream": false,
            "options": {
                "temperature": temperature,
                "num_predict": params.max_length,
            }
        });

        let response = self
            .client
            .post(&url)
            .json(&request)
            .send()
            .await
            .map_err(|e| SummarizeError::Request(format!("Failed to call Ollama: {}", e)))?;

        if !response.status().is_success() {
            let status = response.status().as_u16();
            let body = response.text().await.unwrap_or_default();
            return Err(SummarizeError::Api { status, body });
        }

        let result: serde_json::Value = response
            .json()
            .await
            .map_err(|e| SummarizeError::InvalidResponse(e.to_string()))?;

        let summary = result["response"]
            .as_str()
            .ok_or_else(|| SummarizeError::InvalidResponse("missing 'response' field".to_string()))?
            .trim()
            .to_string();

        Ok(vec![SummaryCandidate {
            summary_text: summary,
        }])
    }
}

/// Mock backend for testing
#[cfg(test)]
pub struct MockBackend {
    mode: MockMode,
    calls: std::sync::atomic::AtomicUsize,
    inputs: parking_lot::Mutex<Vec<String>>,
}

#[cfg(test)]
enum MockMode {
    Fixed(String),
    Echo,
    Fail,
    Panic,
    Empty,
    Slow(Duration),
}

#[cfg(test)]
impl MockBackend {
    /// Always returns the given summary
    pub fn returning(summary: &str) -> Self {
        Self::with_mode(MockMode::Fixed(summary.to_string()))
    }

    /// Returns its input unchanged
    pub fn echo() -> Self {
        Self::with_mode(MockMode::Echo)
    }

    /// Always fails with an API error
    pub fn failing() -> Self {
        Self::with_mode(MockMode::Fail)
    }

    /// Panics when called
    pub fn panicking() -> Self {
        Self::with_mode(MockMode::Panic)
    }

    /// Returns zero candidates
    pub fn empty() -> Self {
        Self::with_mode(MockMode::Empty)
    }

    /// Sleeps for `delay` before answering
    pub fn slow(delay: Duration) -> Self {
        Self::with_mode(MockMode::Slow(delay))
    }

    fn with_mode(mode: MockMode) -> Self {
        Self {
            mode,
            calls: std::sync::atomic::AtomicUsize::new(0),
            inputs: parking_lot::Mutex::new(Vec::new()),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(std::sync::atomic::Ordering::SeqCst)
    }

    pub fn inputs(&self) -> Vec<String> {
        self.inputs.lock().clone()
    }
}

#[cfg(test)]
#[async_trait]
impl SummarizationBackend for MockBackend {
    fn kind(&self) -> BackendKind {
        BackendKind::HuggingFace
    }

    fn model(&self) -> &str {
        "mock"
    }

    async fn is_available(&self) -> bool {
        true
    }

    async fn summarize(
        &self,
        text: &str,
        _params: &GenerationParams,
    ) -> Result<Vec<SummaryCandidate>, SummarizeError> {
        self.calls.fetch_add(1, std::sync::atomic::Ordering::SeqCst);
        self.inputs.lock().push(text.to_string());

        let summary_text = match &self.mode {
            MockMode::Fixed(summary) => summary.clone(),
            MockMode::Echo => text.to_string(),
            MockMode::Fail => {
                return Err(SummarizeError::Api {
                    status: 503,
                    body: "model is overloaded".to_string(),
                })
            }
            MockMode::Panic => panic!("mock backend exploded"),
            MockMode::Empty => return Ok(Vec::new()),
            MockMode::Slow(delay) => {
                tokio::time::sleep(*delay).await;
                text.to_string()
            }
        };

        Ok(vec![SummaryCandidate { summary_text }])
    }
}
