use reqwest::Client;
use serde_json::{json, Value};
use std::time::Duration;
use thiserror::Error;

/// Errors that can occur when generating text
#[derive(Debug, Error)]
pub enum GenerationError {
    #[error("Text generation is not configured: missing API key")]
    NotConfigured,

    #[error("HTTP request failed: {0}")]
    RequestError(#[from] reqwest::Error),

    #[error("Model {model} returned {status}: {body}")]
    ModelError {
        model: String,
        status: u16,
        body: String,
    },

    #[error("Model {model} returned no text")]
    EmptyResponse { model: String },

    #[error("All {attempts} models failed, last error: {last}")]
    AllModelsFailed { attempts: usize, last: String },
}

/// Sampling options sent with every generation call
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct GenerationOptions {
    pub temperature: f32,
    pub top_k: u32,
    pub top_p: f32,
    pub max_output_tokens: u32,
}

impl Default for GenerationOptions {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            top_k: 40,
            top_p: 0.95,
            max_output_tokens: 1024,
        }
    }
}

/// Gemini `generateContent` client
///
/// Models are tried in the configured order until one answers. A model that
/// answers without text ends the search; transport errors and non-2xx
/// responses move on to the next model.
pub struct GeminiClient {
    endpoint: String,
    api_key: Option<String>,
    models: Vec<String>,
    options: GenerationOptions,
    client: Client,
}

impl GeminiClient {
    pub fn new(
        endpoint: String,
        api_key: Option<String>,
        models: Vec<String>,
        options: GenerationOptions,
        timeout: Duration,
    ) -> Result<Self, GenerationError> {
        let client = Client::builder().timeout(timeout).build()?;

        Ok(Self {
            endpoint,
            api_key: api_key.filter(|k| !k.trim().is_empty()),
            models,
            options,
            client,
        })
    }

    pub fn is_configured(&self) -> bool {
        self.api_key.is_some()
    }

    pub fn models(&self) -> &[String] {
        &self.models
    }

    /// Options configured for this deployment
    pub fn options(&self) -> &GenerationOptions {
        &self.options
    }

    /// Generate text for a prompt
    pub async fn generate(
        &self,
        prompt: &str,
        options: &GenerationOptions,
    ) -> Result<String, GenerationError> {
        let api_key = self.api_key.as_deref().ok_or(GenerationError::NotConfigured)?;
        let body = request_body(prompt, options);
        let mut last_err = None;

        for model in &self.models {
            match self.call_model(model, api_key, &body).await {
                Ok(json) => {
                    tracing::info!("Generated response with model: {}", model);
                    return extract_text(&json).ok_or_else(|| GenerationError::EmptyResponse {
                        model: model.clone(),
                    });
                }
                Err(e) => {
                    tracing::warn!("Model {} failed, trying next: {}", model, e);
                    last_err = Some(e);
                }
            }
        }

        Err(GenerationError::AllModelsFailed {
            attempts: self.models.len(),
            last: last_err
                .map(|e| e.to_string())
                .unwrap_or_else(|| "no models configured".to_string()),
        })
    }

    async fn call_model(&self, model: &str, api_key: &str, body: &Value) -> Result<Value, GenerationError> {
        let url = format!(
            "{}/models/{}:generateContent",
            self.endpoint.trim_end_matches('/'),
            model
        );

        let response = self
            .client
            .post(&url)
            .header("x-goog-api-key", api_key)
            .json(body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(GenerationError::ModelError {
                model: model.to_string(),
                status: status.as_u16(),
                body,
            });
        }

        Ok(response.json().await?)
    }
}

fn request_body(prompt: &str, options: &GenerationOptions) -> Value {
    json!({
        "contents": [{ "parts": [{ "text": prompt }] }],
        "generationConfig": {
            "temperature": options.temperature,
            "topK": options.top_k,
            "topP": options.top_p,
            "maxOutputTokens": options.max_output_tokens,
        },
    })
}

/// First text part of the first candidate, if non-empty
fn extract_text(json: &Value) -> Option<String> {
    json.pointer("/candidates/0/content/parts/0/text")
        .and_then(Value::as_str)
        .filter(|text| !text.trim().is_empty())
        .map(str::to_string)
}

/// Build the academic-assistant prompt for a student question
pub fn build_academic_prompt(message: &str, subject: Option<&str>) -> String {
    let subject = subject
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .unwrap_or("general academic topics");

    format!(
        "You are an AI academic assistant for college students. You specialize in helping with academic doubts and questions.\n\n\
         Context: The student is asking about {subject}.\n\n\
         Student Question: {message}\n\n\
         Please provide a helpful, accurate, and educational response. If the question is about a specific subject, \
         provide detailed explanations with examples where appropriate. If you need more context, ask clarifying questions.\n\n\
         Keep your response concise but comprehensive, and always encourage learning."
    )
}
