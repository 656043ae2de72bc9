use config::{Config, ConfigError, Environment, File, FileFormat};
use serde::Deserialize;
use std::path::Path;
use std::time::Duration;

use crate::models::ScoringWeights;
use crate::services::GenerationOptions;

/// Application configuration
#[derive(Debug, Clone, Deserialize)]
pub struct Settings {
    pub server: ServerSettings,
    pub supabase: SupabaseSettings,
    #[serde(default)]
    pub gemini: GeminiSettings,
    #[serde(default)]
    pub scoring: ScoringSettings,
    #[serde(default)]
    pub logging: LoggingSettings,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
    pub workers: Option<usize>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SupabaseSettings {
    pub url: String,
    pub anon_key: String,
    pub timeout_secs: Option<u64>,
}

impl SupabaseSettings {
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(10))
    }
}

#[derive(Debug, Clone, Deserialize)]
pub struct GeminiSettings {
    #[serde(default = "default_gemini_endpoint")]
    pub endpoint: String,
    #[serde(default)]
    pub api_key: Option<String>,
    /// Tried in order until one succeeds
    #[serde(default = "default_gemini_models")]
    pub models: Vec<String>,
    #[serde(default = "default_temperature")]
    pub temperature: f32,
    #[serde(default = "default_top_k")]
    pub top_k: u32,
    #[serde(default = "default_top_p")]
    pub top_p: f32,
    #[serde(default = "default_max_output_tokens")]
    pub max_output_tokens: u32,
    pub timeout_secs: Option<u64>,
}

impl Default for GeminiSettings {
    fn default() -> Self {
        Self {
            endpoint: default_gemini_endpoint(),
            api_key: None,
            models: default_gemini_models(),
            temperature: default_temperature(),
            top_k: default_top_k(),
            top_p: default_top_p(),
            max_output_tokens: default_max_output_tokens(),
            timeout_secs: None,
        }
    }
}

impl GeminiSettings {
    pub fn options(&self) -> GenerationOptions {
        GenerationOptions {
            temperature: self.temperature,
            top_k: self.top_k,
            top_p: self.top_p,
            max_output_tokens: self.max_output_tokens,
        }
    }

    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs.unwrap_or(30))
    }
}

fn default_gemini_endpoint() -> String { "https://generativelanguage.googleapis.com/v1beta".to_string() }
fn default_gemini_models() -> Vec<String> {
    vec![
        "gemini-1.5-flash".to_string(),
        "gemini-1.5-pro".to_string(),
        "gemini-pro".to_string(),
    ]
}
fn default_temperature() -> f32 { 0.7 }
fn default_top_k() -> u32 { 40 }
fn default_top_p() -> f32 { 0.95 }
fn default_max_output_tokens() -> u32 { 1024 }

#[derive(Debug, Clone, Default, Deserialize)]
pub struct ScoringSettings {
    #[serde(default)]
    pub weights: WeightsConfig,
    /// Clamp rating and counts to their valid domains before scoring
    #[serde(default)]
    pub clamp_inputs: bool,
}

#[derive(Debug, Clone, Deserialize)]
pub struct WeightsConfig {
    #[serde(default = "default_rating_weight")]
    pub rating: f64,
    #[serde(default = "default_responsiveness_weight")]
    pub responsiveness: f64,
    #[serde(default = "default_experience_weight")]
    pub experience: f64,
    #[serde(default = "default_response_time_cap")]
    pub response_time_cap_minutes: f64,
    #[serde(default = "default_students_helped_cap")]
    pub students_helped_cap: f64,
}

impl Default for WeightsConfig {
    fn default() -> Self {
        Self {
            rating: default_rating_weight(),
            responsiveness: default_responsiveness_weight(),
            experience: default_experience_weight(),
            response_time_cap_minutes: default_response_time_cap(),
            students_helped_cap: default_students_helped_cap(),
        }
    }
}

impl From<&WeightsConfig> for ScoringWeights {
    fn from(w: &WeightsConfig) -> Self {
        ScoringWeights {
            rating: w.rating,
            responsiveness: w.responsiveness,
            experience: w.experience,
            response_time_cap_minutes: w.response_time_cap_minutes,
            students_helped_cap: w.students_helped_cap,
        }
    }
}

fn default_rating_weight() -> f64 { 50.0 }
fn default_responsiveness_weight() -> f64 { 30.0 }
fn default_experience_weight() -> f64 { 20.0 }
fn default_response_time_cap() -> f64 { 240.0 }
fn default_students_helped_cap() -> f64 { 100.0 }

#[derive(Debug, Clone, Deserialize)]
pub struct LoggingSettings {
    #[serde(default = "default_log_level")]
    pub level: String,
    #[serde(default = "default_log_format")]
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: default_log_level(),
            format: default_log_format(),
        }
    }
}

fn default_log_level() -> String { "info".to_string() }
fn default_log_format() -> String { "compact".to_string() }

impl Settings {
    /// Load configuration from file and environment variables
    ///
    /// Configuration is loaded in the following order (later overrides earlier):
    /// 1. Default values in the struct
    /// 2. Configuration file (config/default.toml)
    /// 3. Local overrides (config/local.toml)
    /// 4. Environment variables (prefixed with CAMPUS)
    /// 5. SUPABASE_URL, SUPABASE_ANON_KEY and GEMINI_API_KEY
    pub fn load() -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::with_name("config/default").required(false))
            .add_source(File::with_name("config/local").required(false))
            .add_source(environment())
            .build()?;

        Self::finish(substitute_env_vars(settings)?)
    }

    /// Load configuration from a custom path
    pub fn load_from<P: AsRef<Path>>(path: P) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from(path.as_ref()))
            .add_source(environment())
            .build()?;

        Self::finish(substitute_env_vars(settings)?)
    }

    /// Parse configuration from TOML text alone, without the environment
    pub fn from_toml(contents: &str) -> Result<Self, ConfigError> {
        let settings = Config::builder()
            .add_source(File::from_str(contents, FileFormat::Toml))
            .build()?;

        Self::finish(settings)
    }

    pub fn scoring_weights(&self) -> ScoringWeights {
        ScoringWeights::from(&self.scoring.weights)
    }

    fn finish(config: Config) -> Result<Self, ConfigError> {
        let settings: Settings = config.try_deserialize()?;
        settings.validate()?;
        Ok(settings)
    }

    fn validate(&self) -> Result<(), ConfigError> {
        let w = &self.scoring.weights;
        if !(w.response_time_cap_minutes > 0.0 && w.response_time_cap_minutes.is_finite())
            || !(w.students_helped_cap > 0.0 && w.students_helped_cap.is_finite())
        {
            return Err(ConfigError::Message(
                "scoring caps must be positive".to_string(),
            ));
        }
        for (name, weight) in [
            ("rating", w.rating),
            ("responsiveness", w.responsiveness),
            ("experience", w.experience),
        ] {
            if !weight.is_finite() || weight < 0.0 {
                return Err(ConfigError::Message(format!(
                    "scoring weight {} must be a non-negative number",
                    name
                )));
            }
        }
        Ok(())
    }
}

/// Environment source, e.g. CAMPUS__SERVER__PORT -> server.port
fn environment() -> Environment {
    Environment::with_prefix("CAMPUS")
        .prefix_separator("__")
        .separator("__")
        .try_parsing(true)
        .list_separator(",")
        .with_list_parse_key("gemini.models")
}

/// Apply the plain deployment variables used by the hosting platform
fn substitute_env_vars(settings: Config) -> Result<Config, ConfigError> {
    use std::env;

    let mut builder = Config::builder().add_source(settings);

    if let Ok(url) = env::var("SUPABASE_URL") {
        builder = builder.set_override("supabase.url", url)?;
    }
    if let Ok(anon_key) = env::var("SUPABASE_ANON_KEY") {
        builder = builder.set_override("supabase.anon_key", anon_key)?;
    }
    if let Ok(api_key) = env::var("GEMINI_API_KEY") {
        builder = builder.set_override("gemini.api_key", api_key)?;
    }

    builder.build()
}
